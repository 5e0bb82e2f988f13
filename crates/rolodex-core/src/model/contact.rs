use super::tags::TagSet;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier assigned by the contact service.
///
/// Services disagree on whether ids are numbers or strings, so both are
/// accepted on the wire and held as text locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(id) => Self(id),
            Wire::Signed(id) => Self(id.to_string()),
            Wire::Unsigned(id) => Self(id.to_string()),
        })
    }
}

/// `null` and `""` both mean the optional field is absent.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

/// A contact record as returned by `GET /contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(default)]
    pub tags: TagSet,
}

impl Contact {
    /// The writable fields of this contact, as an edit form starts from them.
    #[must_use]
    pub fn fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            tags: self.tags.clone(),
        }
    }
}

/// Body of `POST /contacts` and `PUT /contacts/{id}`.
///
/// Blank optional fields are sent as empty strings, and `tags` as the
/// comma-joined string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub tags: TagSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_full_wire_shape() {
        let contact: Contact = serde_json::from_value(json!({
            "id": 7,
            "name": "Bob",
            "phone": "555",
            "address": "1 Main St",
            "email": "bob@example.com",
            "tags": "friend,work",
            "created_at": "2024-01-01"
        }))
        .expect("contact");

        assert_eq!(contact.id.as_str(), "7");
        assert_eq!(contact.address.as_deref(), Some("1 Main St"));
        assert_eq!(contact.email.as_deref(), Some("bob@example.com"));
        assert!(contact.tags.contains("friend"));
        assert!(contact.tags.contains("work"));
    }

    #[test]
    fn optional_fields_may_be_missing_null_or_blank() {
        let contact: Contact = serde_json::from_value(json!({
            "id": "c-1",
            "name": "Ann",
            "phone": "123",
            "address": null,
            "email": ""
        }))
        .expect("contact");

        assert_eq!(contact.id, ContactId::from("c-1"));
        assert!(contact.address.is_none());
        assert!(contact.email.is_none());
        assert!(contact.tags.is_empty());
    }

    #[test]
    fn missing_name_is_rejected() {
        let result = serde_json::from_value::<Contact>(json!({"id": 1, "phone": "1"}));
        assert!(result.is_err());
    }

    #[test]
    fn fields_serialize_with_joined_tags_and_empty_strings() {
        let contact: Contact = serde_json::from_value(json!({
            "id": 3,
            "name": "Bob",
            "phone": "555",
            "tags": "work,friend"
        }))
        .expect("contact");

        let body = serde_json::to_value(contact.fields()).expect("serialize");
        assert_eq!(
            body,
            json!({
                "name": "Bob",
                "phone": "555",
                "address": "",
                "email": "",
                "tags": "friend,work"
            })
        );
    }

    #[test]
    fn contact_id_serializes_as_plain_string() {
        let id = ContactId::new("42");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"42\"");
        assert_eq!(id.to_string(), "42");
    }
}
