use super::{ContactRepository, MongoDB, UserRepository, CONTACTS_COLLECTION, USERS_COLLECTION};
use crate::models::{Contact, ContactPatch, User};
use crate::utils::{is_duplicate_key, AppError, AppResult};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

pub struct MongoUserRepository {
    db: MongoDB,
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<User>(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        match self.collection.insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict("User already registered!".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self.collection.find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

pub struct MongoContactRepository {
    collection: Collection<Contact>,
}

impl MongoContactRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<Contact>(CONTACTS_COLLECTION),
        }
    }
}

fn set_document(patch: &ContactPatch) -> Document {
    let mut set = doc! { "updatedAt": BsonDateTime::now() };
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(email) = &patch.email {
        set.insert("email", email.as_str());
    }
    if let Some(phone) = &patch.phone {
        set.insert("phone", phone.as_str());
    }
    set
}

#[async_trait]
impl ContactRepository for MongoContactRepository {
    async fn list_by_owner(&self, user_id: ObjectId) -> AppResult<Vec<Contact>> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "createdAt": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Contact>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn insert(&self, contact: &Contact) -> AppResult<()> {
        self.collection.insert_one(contact).await?;
        Ok(())
    }

    async fn update(&self, id: ObjectId, patch: &ContactPatch) -> AppResult<Option<Contact>> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set_document(patch) })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> AppResult<Option<Contact>> {
        Ok(self.collection.find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn delete_by_owner(&self, user_id: ObjectId) -> AppResult<u64> {
        let result = self.collection.delete_many(doc! { "user_id": user_id }).await?;
        Ok(result.deleted_count)
    }
}
