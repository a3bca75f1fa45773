use serde::{Deserialize, Serialize};

// ========== USER RECORD ==========
// Stored in DynamoDB with PK = SK = USER#{clerkId}. Attribute names match
// the serialized (camelCase) field names.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    pub clerk_id: String,
    pub email: String,
    pub username: String,
    pub photo: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Projection of a provider payload into the local record shape, before
/// the gateway assigns `userId` and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedUser {
    pub clerk_id: String,
    pub email: String,
    pub username: String,
    pub photo: String,
    pub first_name: String,
    pub last_name: String,
}

// ========== WEBHOOK EVENT ==========
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: UserPayload,
}

// Subset of Clerk's UserJSON. user.deleted events carry only the id, so
// everything else defaults.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddressEntry>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddressEntry {
    pub email_address: String,
}

// ========== RESPONSES ==========
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_user_event() {
        let json = r#"{
            "type": "user.created",
            "data": {
                "id": "u1",
                "email_addresses": [{"email_address": "a@x.com", "id": "idn_1"}],
                "username": "alice",
                "image_url": "http://img/1",
                "first_name": "A",
                "last_name": "L",
                "object": "user"
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "user.created");
        assert_eq!(event.data.id, "u1");
        assert_eq!(event.data.email_addresses[0].email_address, "a@x.com");
        assert_eq!(event.data.username.as_deref(), Some("alice"));
    }

    #[test]
    fn deserializes_deleted_event_with_minimal_payload() {
        let json = r#"{"type":"user.deleted","data":{"id":"u1","deleted":true,"object":"user"}}"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "user.deleted");
        assert_eq!(event.data.id, "u1");
        assert!(event.data.email_addresses.is_empty());
        assert!(event.data.username.is_none());
    }

    #[test]
    fn user_record_serializes_camel_case() {
        let record = UserRecord {
            user_id: "internal-1".to_string(),
            clerk_id: "u1".to_string(),
            email: "a@x.com".to_string(),
            username: "alice".to_string(),
            photo: "http://img/1".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["clerkId"], "u1");
        assert_eq!(value["photo"], "http://img/1");
        assert_eq!(value["firstName"], "A");
        assert_eq!(value["lastName"], "L");
    }

    #[test]
    fn sync_response_omits_user_when_absent() {
        let response = SyncResponse {
            message: "ok".to_string(),
            user: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"message":"ok"}"#);
    }
}
