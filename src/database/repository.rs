use crate::models::{Contact, ContactPatch, User};
use crate::utils::AppResult;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>>;

    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert(&self, user: &User) -> AppResult<()>;

    /// Removes the user and returns the record as it was before deletion.
    async fn delete(&self, id: ObjectId) -> AppResult<Option<User>>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Contact store
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Contacts owned by `user_id`, oldest first.
    async fn list_by_owner(&self, user_id: ObjectId) -> AppResult<Vec<Contact>>;

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Contact>>;

    async fn insert(&self, contact: &Contact) -> AppResult<()>;

    /// Applies `patch` atomically and returns the updated record.
    async fn update(&self, id: ObjectId, patch: &ContactPatch) -> AppResult<Option<Contact>>;

    async fn delete(&self, id: ObjectId) -> AppResult<Option<Contact>>;

    /// Returns the number of contacts removed.
    async fn delete_by_owner(&self, user_id: ObjectId) -> AppResult<u64>;
}
