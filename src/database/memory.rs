//! In-process store selected with `DATABASE_URL=memory://`. Data lives only
//! as long as the process.

use super::{ContactRepository, UserRepository};
use crate::models::{Contact, ContactPatch, User};
use crate::utils::{AppError, AppResult};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        // Same guarantee as the unique index on users(email)
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already registered!".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users
            .iter()
            .position(|u| u.id == id)
            .map(|index| users.remove(index)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryContactRepository {
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn list_by_owner(&self, user_id: ObjectId) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts.iter().filter(|c| c.user_id == user_id).cloned().collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, contact: &Contact) -> AppResult<()> {
        self.contacts.write().await.push(contact.clone());
        Ok(())
    }

    async fn update(&self, id: ObjectId, patch: &ContactPatch) -> AppResult<Option<Contact>> {
        let mut contacts = self.contacts.write().await;
        Ok(contacts.iter_mut().find(|c| c.id == id).map(|contact| {
            contact.apply(patch);
            contact.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> AppResult<Option<Contact>> {
        let mut contacts = self.contacts.write().await;
        Ok(contacts
            .iter()
            .position(|c| c.id == id)
            .map(|index| contacts.remove(index)))
    }

    async fn delete_by_owner(&self, user_id: ObjectId) -> AppResult<u64> {
        let mut contacts = self.contacts.write().await;
        let before = contacts.len();
        contacts.retain(|c| c.user_id != user_id);
        Ok((before - contacts.len()) as u64)
    }
}
