use crate::types::{MappedUser, UserPayload};

/// Project a provider user payload into the local record shape.
///
/// Email is the first entry of the email list; absent optional fields
/// become empty strings so nothing nullable reaches the store. Total over
/// well-formed input - an empty email list is accepted, not an error.
pub fn map_user(payload: &UserPayload) -> MappedUser {
    MappedUser {
        clerk_id: payload.id.clone(),
        email: payload
            .email_addresses
            .first()
            .map(|entry| entry.email_address.clone())
            .unwrap_or_default(),
        username: payload.username.clone().unwrap_or_default(),
        photo: payload.image_url.clone().unwrap_or_default(),
        first_name: payload.first_name.clone().unwrap_or_default(),
        last_name: payload.last_name.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmailAddressEntry;

    fn full_payload() -> UserPayload {
        UserPayload {
            id: "u1".to_string(),
            email_addresses: vec![
                EmailAddressEntry {
                    email_address: "a@x.com".to_string(),
                },
                EmailAddressEntry {
                    email_address: "b@x.com".to_string(),
                },
            ],
            username: Some("alice".to_string()),
            image_url: Some("http://img/1".to_string()),
            first_name: Some("A".to_string()),
            last_name: Some("L".to_string()),
        }
    }

    #[test]
    fn maps_all_fields() {
        let mapped = map_user(&full_payload());
        assert_eq!(
            mapped,
            MappedUser {
                clerk_id: "u1".to_string(),
                email: "a@x.com".to_string(),
                username: "alice".to_string(),
                photo: "http://img/1".to_string(),
                first_name: "A".to_string(),
                last_name: "L".to_string(),
            }
        );
    }

    #[test]
    fn takes_first_email_only() {
        let mapped = map_user(&full_payload());
        assert_eq!(mapped.email, "a@x.com");
    }

    #[test]
    fn empty_email_list_maps_to_empty_string() {
        let mut payload = full_payload();
        payload.email_addresses.clear();

        let mapped = map_user(&payload);
        assert_eq!(mapped.email, "");
    }

    #[test]
    fn absent_optional_fields_map_to_empty_strings() {
        let payload = UserPayload {
            id: "u2".to_string(),
            email_addresses: vec![],
            username: None,
            image_url: None,
            first_name: None,
            last_name: None,
        };

        let mapped = map_user(&payload);
        assert_eq!(mapped.clerk_id, "u2");
        assert_eq!(mapped.email, "");
        assert_eq!(mapped.username, "");
        assert_eq!(mapped.photo, "");
        assert_eq!(mapped.first_name, "");
        assert_eq!(mapped.last_name, "");
    }
}
