use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::SyncError;
use crate::types::{MappedUser, UserRecord};

fn user_pk(clerk_id: &str) -> String {
    format!("USER#{}", clerk_id)
}

/// Create a user record keyed by its clerkId.
///
/// The conditional put enforces at most one record per clerkId; a second
/// create for the same id fails with `DuplicateKey` so callers can fall
/// back to an update.
pub async fn create_user(
    client: &DynamoClient,
    table_name: &str,
    mapped: &MappedUser,
) -> Result<UserRecord, SyncError> {
    let record = UserRecord {
        user_id: Uuid::new_v4().to_string(),
        clerk_id: mapped.clerk_id.clone(),
        email: mapped.email.clone(),
        username: mapped.username.clone(),
        photo: mapped.photo.clone(),
        first_name: mapped.first_name.clone(),
        last_name: mapped.last_name.clone(),
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };

    let pk = user_pk(&record.clerk_id);
    let result = client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(pk.clone()))
        .item("SK", AttributeValue::S(pk))
        .item("userId", AttributeValue::S(record.user_id.clone()))
        .item("clerkId", AttributeValue::S(record.clerk_id.clone()))
        .item("email", AttributeValue::S(record.email.clone()))
        .item("username", AttributeValue::S(record.username.clone()))
        .item("photo", AttributeValue::S(record.photo.clone()))
        .item("firstName", AttributeValue::S(record.first_name.clone()))
        .item("lastName", AttributeValue::S(record.last_name.clone()))
        .item("createdAt", AttributeValue::S(record.created_at.clone()))
        .condition_expression("attribute_not_exists(PK)")
        .send()
        .await;

    match result {
        Ok(_) => Ok(record),
        Err(err) => {
            let service_err = err.into_service_error();
            if service_err.is_conditional_check_failed_exception() {
                Err(SyncError::DuplicateKey(record.clerk_id))
            } else {
                Err(SyncError::Store(service_err.to_string()))
            }
        }
    }
}

/// Atomically overwrite the mapped fields of an existing record.
///
/// Returns `None` when no record with that clerkId exists; the caller
/// decides whether that is an error. `userId` and `createdAt` are never
/// touched by updates.
pub async fn find_and_update_user(
    client: &DynamoClient,
    table_name: &str,
    clerk_id: &str,
    mapped: &MappedUser,
) -> Result<Option<UserRecord>, SyncError> {
    let pk = user_pk(clerk_id);
    let result = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .update_expression(
            "SET email = :email, username = :username, photo = :photo, \
             firstName = :firstName, lastName = :lastName, updatedAt = :updatedAt",
        )
        .expression_attribute_values(":email", AttributeValue::S(mapped.email.clone()))
        .expression_attribute_values(":username", AttributeValue::S(mapped.username.clone()))
        .expression_attribute_values(":photo", AttributeValue::S(mapped.photo.clone()))
        .expression_attribute_values(":firstName", AttributeValue::S(mapped.first_name.clone()))
        .expression_attribute_values(":lastName", AttributeValue::S(mapped.last_name.clone()))
        .expression_attribute_values(":updatedAt", AttributeValue::S(Utc::now().to_rfc3339()))
        .condition_expression("attribute_exists(PK)")
        .return_values(ReturnValue::AllNew)
        .send()
        .await;

    match result {
        Ok(output) => {
            let item = output
                .attributes()
                .ok_or_else(|| SyncError::Store("update returned no attributes".to_string()))?;
            Ok(Some(record_from_item(item)))
        }
        Err(err) => {
            let service_err = err.into_service_error();
            if service_err.is_conditional_check_failed_exception() {
                Ok(None)
            } else {
                Err(SyncError::Store(service_err.to_string()))
            }
        }
    }
}

/// Delete a record by clerkId, returning the removed record.
///
/// Returns `None` when nothing matched.
pub async fn find_and_delete_user(
    client: &DynamoClient,
    table_name: &str,
    clerk_id: &str,
) -> Result<Option<UserRecord>, SyncError> {
    let pk = user_pk(clerk_id);
    let result = client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .return_values(ReturnValue::AllOld)
        .send()
        .await
        .map_err(|err| SyncError::Store(err.into_service_error().to_string()))?;

    match result.attributes() {
        Some(item) => Ok(Some(record_from_item(item))),
        None => Ok(None),
    }
}

fn record_from_item(item: &HashMap<String, AttributeValue>) -> UserRecord {
    let field = |name: &str| {
        item.get(name)
            .and_then(|value| value.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    UserRecord {
        user_id: field("userId"),
        clerk_id: field("clerkId"),
        email: field("email"),
        username: field("username"),
        photo: field("photo"),
        first_name: field("firstName"),
        last_name: field("lastName"),
        created_at: field("createdAt"),
        updated_at: item
            .get("updatedAt")
            .and_then(|value| value.as_s().ok())
            .map(|s| s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_for(record: &UserRecord) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert(
            "PK".to_string(),
            AttributeValue::S(user_pk(&record.clerk_id)),
        );
        item.insert(
            "SK".to_string(),
            AttributeValue::S(user_pk(&record.clerk_id)),
        );
        item.insert(
            "userId".to_string(),
            AttributeValue::S(record.user_id.clone()),
        );
        item.insert(
            "clerkId".to_string(),
            AttributeValue::S(record.clerk_id.clone()),
        );
        item.insert("email".to_string(), AttributeValue::S(record.email.clone()));
        item.insert(
            "username".to_string(),
            AttributeValue::S(record.username.clone()),
        );
        item.insert("photo".to_string(), AttributeValue::S(record.photo.clone()));
        item.insert(
            "firstName".to_string(),
            AttributeValue::S(record.first_name.clone()),
        );
        item.insert(
            "lastName".to_string(),
            AttributeValue::S(record.last_name.clone()),
        );
        item.insert(
            "createdAt".to_string(),
            AttributeValue::S(record.created_at.clone()),
        );
        if let Some(updated_at) = &record.updated_at {
            item.insert(
                "updatedAt".to_string(),
                AttributeValue::S(updated_at.clone()),
            );
        }
        item
    }

    #[test]
    fn user_pk_is_prefixed_clerk_id() {
        assert_eq!(user_pk("u1"), "USER#u1");
    }

    #[test]
    fn item_round_trips_all_fields() {
        let record = UserRecord {
            user_id: "internal-1".to_string(),
            clerk_id: "u1".to_string(),
            email: "a@x.com".to_string(),
            username: "alice".to_string(),
            photo: "http://img/1".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: Some("2026-01-02T00:00:00+00:00".to_string()),
        };

        assert_eq!(record_from_item(&item_for(&record)), record);
    }

    #[test]
    fn item_round_trips_empty_email() {
        let record = UserRecord {
            user_id: "internal-2".to_string(),
            clerk_id: "u2".to_string(),
            email: String::new(),
            username: String::new(),
            photo: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: None,
        };

        let parsed = record_from_item(&item_for(&record));
        assert_eq!(parsed.email, "");
        assert_eq!(parsed, record);
    }

    #[test]
    fn missing_attributes_default_to_empty() {
        let mut item = HashMap::new();
        item.insert("clerkId".to_string(), AttributeValue::S("u3".to_string()));

        let parsed = record_from_item(&item);
        assert_eq!(parsed.clerk_id, "u3");
        assert_eq!(parsed.email, "");
        assert!(parsed.updated_at.is_none());
    }
}
