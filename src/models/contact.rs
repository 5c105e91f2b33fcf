use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

/// Document in the "contacts" collection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning user
    pub user_id: ObjectId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "createdAt")]
    pub created_at: BsonDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: BsonDateTime,
}

impl Contact {
    pub fn new(user_id: ObjectId, name: String, email: String, phone: String) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: ObjectId::new(),
            user_id,
            name,
            email,
            phone,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.to_hex() == user_id
    }

    /// Applies the fields present in `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        self.updated_at = BsonDateTime::now();
    }
}

/// Body for creating a contact
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        ContactResponse {
            id: contact.id.to_hex(),
            user_id: contact.user_id.to_hex(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            created_at: super::to_rfc3339(contact.created_at),
            updated_at: super::to_rfc3339(contact.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Contact {
        Contact::new(ObjectId::new(), "Bob".into(), "b@x.com".into(), "555".into())
    }

    #[test]
    fn ownership_compares_hex_ids() {
        let contact = sample();
        assert!(contact.is_owned_by(&contact.user_id.to_hex()));
        assert!(!contact.is_owned_by(&ObjectId::new().to_hex()));
        assert!(!contact.is_owned_by(""));
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut contact = sample();
        contact.apply(&ContactPatch {
            phone: Some("556".into()),
            ..Default::default()
        });
        assert_eq!(contact.name, "Bob");
        assert_eq!(contact.email, "b@x.com");
        assert_eq!(contact.phone, "556");
    }

    #[test]
    fn response_uses_document_field_names() {
        let contact = sample();
        let owner = contact.user_id.to_hex();
        let json = serde_json::to_value(ContactResponse::from(contact)).unwrap();
        assert_eq!(json["user_id"], owner);
        assert!(json["_id"].is_string());
        assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));
    }
}
