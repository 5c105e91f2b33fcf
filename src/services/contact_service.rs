use crate::{
    models::{Contact, ContactPatch, ContactResponse, CreateContactRequest, Principal},
    services::required_field,
    state::AppState,
    utils::{AppError, AppResult},
};
use mongodb::bson::oid::ObjectId;

fn owner_id(principal: &Principal) -> AppResult<ObjectId> {
    ObjectId::parse_str(&principal.id).map_err(|_| AppError::Auth("Unauthorized".to_string()))
}

fn contact_not_found() -> AppError {
    AppError::NotFound("Contact not found".to_string())
}

/// Loads a contact and enforces ownership; `action` ends up in the 403 message.
async fn owned_contact(state: &AppState, principal: &Principal, id: &str, action: &str) -> AppResult<Contact> {
    let contact_id = ObjectId::parse_str(id).map_err(|_| contact_not_found())?;
    let contact = state
        .contacts
        .find_by_id(contact_id)
        .await?
        .ok_or_else(contact_not_found)?;

    if !contact.is_owned_by(&principal.id) {
        log::warn!("🚫 User {} tried to {} contact {}", principal.id, action, id);
        return Err(AppError::Forbidden(format!("You can't {} this contact", action)));
    }

    Ok(contact)
}

pub async fn list(state: &AppState, principal: &Principal) -> AppResult<Vec<ContactResponse>> {
    let contacts = state.contacts.list_by_owner(owner_id(principal)?).await?;
    Ok(contacts.into_iter().map(ContactResponse::from).collect())
}

pub async fn create(state: &AppState, principal: &Principal, request: &CreateContactRequest) -> AppResult<ContactResponse> {
    let (name, email, phone) = match (
        required_field(&request.name),
        required_field(&request.email),
        required_field(&request.phone),
    ) {
        (Some(name), Some(email), Some(phone)) => (name, email, phone),
        _ => return Err(AppError::Validation("All fields are mandatory".to_string())),
    };

    // A token can outlive its account; never store a contact without an owner.
    let owner = owner_id(principal)?;
    if state.users.find_by_id(owner).await?.is_none() {
        log::warn!("🚫 Contact create rejected, user {} no longer exists", principal.id);
        return Err(AppError::Auth("Unauthorized".to_string()));
    }

    let contact = Contact::new(owner, name.to_string(), email.to_string(), phone.to_string());
    state.contacts.insert(&contact).await?;

    log::info!("✅ Contact {} created for user {}", contact.id, principal.id);

    Ok(ContactResponse::from(contact))
}

pub async fn get(state: &AppState, principal: &Principal, id: &str) -> AppResult<ContactResponse> {
    let contact = owned_contact(state, principal, id, "access").await?;
    Ok(ContactResponse::from(contact))
}

/// Ownership is checked before the patch is written, so a rejected request
/// leaves the stored record untouched.
pub async fn update(state: &AppState, principal: &Principal, id: &str, patch: &ContactPatch) -> AppResult<ContactResponse> {
    let contact = owned_contact(state, principal, id, "edit").await?;

    let updated = state
        .contacts
        .update(contact.id, patch)
        .await?
        .ok_or_else(contact_not_found)?;

    Ok(ContactResponse::from(updated))
}

pub async fn delete(state: &AppState, principal: &Principal, id: &str) -> AppResult<ContactResponse> {
    let contact = owned_contact(state, principal, id, "delete").await?;

    let deleted = state
        .contacts
        .delete(contact.id)
        .await?
        .ok_or_else(contact_not_found)?;

    log::info!("🗑️ Contact {} deleted by user {}", deleted.id, principal.id);

    Ok(ContactResponse::from(deleted))
}
