use crate::{
    models::{LoginRequest, LoginResponse, Principal, RegisterRequest, RegisterResponse, User, UserResponse},
    services::required_field,
    state::AppState,
    utils::{AppError, AppResult},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// bcrypt cost factor for stored password hashes
pub const PASSWORD_HASH_COST: u32 = 10;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const UNAUTHORIZED: &str = "Unauthorized";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user: Principal,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String,
}

/// HS256 signing material plus the token lifetime.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, principal: &Principal) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user: principal.clone(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry and returns the embedded principal.
    pub fn verify(&self, token: &str) -> AppResult<Principal> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.user)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                AppError::Auth(UNAUTHORIZED.to_string())
            })
    }
}

/// Extracts and verifies the token from an `Authorization: Bearer <token>` value.
pub fn verify_bearer(keys: &TokenKeys, header: Option<&str>) -> AppResult<Principal> {
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth(UNAUTHORIZED.to_string()))?;

    keys.verify(token)
}

async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_HASH_COST)).await??;
    Ok(hashed)
}

async fn password_matches(password: &str, hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(valid)
}

// User registration
pub async fn register(state: &AppState, request: &RegisterRequest) -> AppResult<RegisterResponse> {
    let (username, email, password) = match (
        required_field(&request.username),
        required_field(&request.email),
        required_field(&request.password),
    ) {
        (Some(username), Some(email), Some(password)) => (username, email, password),
        _ => return Err(AppError::Validation("All fields are mandatory!".to_string())),
    };

    if state.users.find_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("User already registered!".to_string()));
    }

    let hashed_password = hash_password(password).await?;
    let user = User::new(username.to_string(), email.to_string(), hashed_password);

    // The unique index still guards against a concurrent registration
    state.users.insert(&user).await?;

    log::info!("✅ User registered successfully: {}", user.email);

    Ok(RegisterResponse {
        id: user.id.to_hex(),
        email: user.email,
    })
}

// User login
pub async fn login(state: &AppState, request: &LoginRequest) -> AppResult<LoginResponse> {
    let (email, password) = match (required_field(&request.email), required_field(&request.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(AppError::Validation("All fields are mandatory!".to_string())),
    };

    let user = match state.users.find_by_email(email).await? {
        Some(user) => user,
        None => return Err(AppError::Auth(INVALID_CREDENTIALS.to_string())),
    };

    if !password_matches(password, &user.password).await? {
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let access_token = state.tokens.issue(&user.principal())?;

    Ok(LoginResponse { access_token })
}

pub fn get_self(principal: &Principal) -> Principal {
    principal.clone()
}

/// Deletes the caller's own account together with every contact it owns.
pub async fn delete_user(state: &AppState, principal: &Principal, id: &str) -> AppResult<UserResponse> {
    let not_found = || AppError::NotFound("User not found".to_string());

    let user_id = ObjectId::parse_str(id).map_err(|_| not_found())?;
    let user = state.users.find_by_id(user_id).await?.ok_or_else(not_found)?;

    if user.id.to_hex() != principal.id {
        return Err(AppError::Forbidden("You can't delete another user's account".to_string()));
    }

    // The account goes first so a failed delete never strips a live user's contacts.
    let deleted = state.users.delete(user_id).await?.ok_or_else(not_found)?;
    let removed = state.contacts.delete_by_owner(user_id).await?;

    log::info!("🗑️ Account {} deleted along with {} contacts", deleted.email, removed);

    Ok(UserResponse::from(deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{test_state, TEST_SECRET};

    fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn register_rejects_empty_or_missing_fields() {
        let state = test_state();
        let cases = [
            register_request("", "a@x.com", "pw"),
            register_request("alice", "", "pw"),
            register_request("alice", "a@x.com", ""),
            RegisterRequest {
                username: Some("alice".into()),
                email: None,
                password: Some("pw".into()),
            },
        ];

        for request in cases {
            let err = register(&state, &request).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(state.users.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_hashes_password_and_returns_id_and_email() {
        let state = test_state();
        let response = register(&state, &register_request("alice", "a@x.com", "pw")).await.unwrap();
        assert_eq!(response.email, "a@x.com");

        let stored = state.users.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id.to_hex(), response.id);
        assert_ne!(stored.password, "pw");
        assert!(bcrypt::verify("pw", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_first_user_kept() {
        let state = test_state();
        let first = register(&state, &register_request("alice", "a@x.com", "pw")).await.unwrap();

        let err = register(&state, &register_request("mallory", "a@x.com", "other"))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Conflict("User already registered!".to_string()));

        let stored = state.users.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id.to_hex(), first.id);
        assert_eq!(stored.username, "alice");
    }

    #[tokio::test]
    async fn login_issues_token_with_stored_principal() {
        let state = test_state();
        register(&state, &register_request("alice", "a@x.com", "pw")).await.unwrap();
        let stored = state.users.find_by_email("a@x.com").await.unwrap().unwrap();

        let response = login(&state, &login_request("a@x.com", "pw")).await.unwrap();
        let principal = state.tokens.verify(&response.access_token).unwrap();

        assert_eq!(principal, stored.principal());
        assert_eq!(principal.username, "alice");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let state = test_state();
        register(&state, &register_request("alice", "a@x.com", "pw")).await.unwrap();

        let wrong_password = login(&state, &login_request("a@x.com", "nope")).await.unwrap_err();
        let unknown_email = login(&state, &login_request("z@x.com", "pw")).await.unwrap_err();

        assert_eq!(wrong_password, AppError::Auth(INVALID_CREDENTIALS.to_string()));
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn login_rejects_empty_fields() {
        let state = test_state();
        let err = login(&state, &login_request("", "pw")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn token_embeds_principal_and_expires_after_ttl() {
        let keys = TokenKeys::new(TEST_SECRET, 50);
        let principal = Principal {
            id: ObjectId::new().to_hex(),
            username: "alice".into(),
            email: "a@x.com".into(),
        };
        let token = keys.issue(&principal).unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(data.claims.user, principal);
        assert_eq!(data.claims.exp - data.claims.iat, 50 * 60);
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let keys = TokenKeys::new(TEST_SECRET, 50);
        let principal = Principal {
            id: ObjectId::new().to_hex(),
            username: "alice".into(),
            email: "a@x.com".into(),
        };

        let expired = TokenKeys::new(TEST_SECRET, -1).issue(&principal).unwrap();
        assert_eq!(keys.verify(&expired).unwrap_err(), AppError::Auth(UNAUTHORIZED.to_string()));

        let foreign = TokenKeys::new("another-secret", 50).issue(&principal).unwrap();
        assert!(keys.verify(&foreign).is_err());
        assert!(keys.verify("not-a-token").is_err());
    }

    #[test]
    fn bearer_header_must_be_present_and_well_formed() {
        let keys = TokenKeys::new(TEST_SECRET, 50);
        let principal = Principal {
            id: ObjectId::new().to_hex(),
            username: "alice".into(),
            email: "a@x.com".into(),
        };
        let token = keys.issue(&principal).unwrap();

        assert_eq!(verify_bearer(&keys, Some(format!("Bearer {}", token).as_str())).unwrap(), principal);
        assert!(verify_bearer(&keys, None).is_err());
        assert!(verify_bearer(&keys, Some(token.as_str())).is_err());
        assert!(verify_bearer(&keys, Some("Bearer ")).is_err());
    }

    #[tokio::test]
    async fn delete_user_removes_account_and_contacts() {
        use crate::models::Contact;

        let state = test_state();
        let registered = register(&state, &register_request("alice", "a@x.com", "pw")).await.unwrap();
        let alice = state.users.find_by_email("a@x.com").await.unwrap().unwrap();
        let contact = Contact::new(alice.id, "Bob".into(), "b@x.com".into(), "555".into());
        state.contacts.insert(&contact).await.unwrap();

        let deleted = delete_user(&state, &alice.principal(), &registered.id).await.unwrap();
        assert_eq!(deleted.email, "a@x.com");
        assert!(state.users.find_by_id(alice.id).await.unwrap().is_none());
        assert!(state.contacts.find_by_id(contact.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_user_checks_existence_then_ownership() {
        let state = test_state();
        let alice = register(&state, &register_request("alice", "a@x.com", "pw")).await.unwrap();
        register(&state, &register_request("carol", "c@x.com", "pw")).await.unwrap();
        let carol = state.users.find_by_email("c@x.com").await.unwrap().unwrap();

        let missing = delete_user(&state, &carol.principal(), &ObjectId::new().to_hex()).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));

        let malformed = delete_user(&state, &carol.principal(), "not-an-id").await.unwrap_err();
        assert!(matches!(malformed, AppError::NotFound(_)));

        let forbidden = delete_user(&state, &carol.principal(), &alice.id).await.unwrap_err();
        assert!(matches!(forbidden, AppError::Forbidden(_)));
        assert!(state.users.find_by_email("a@x.com").await.unwrap().is_some());
    }

    /// A user store whose account disappears between lookup and delete.
    struct VanishingUsers(User);

    #[async_trait::async_trait]
    impl crate::database::UserRepository for VanishingUsers {
        async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
            Ok(Some(self.0.clone()))
        }

        async fn find_by_id(&self, _id: ObjectId) -> AppResult<Option<User>> {
            Ok(Some(self.0.clone()))
        }

        async fn insert(&self, _user: &User) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, _id: ObjectId) -> AppResult<Option<User>> {
            Ok(None)
        }

        async fn ping(&self) -> AppResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_account_delete_keeps_contacts() {
        use crate::{database::MemoryContactRepository, models::Contact, state::test_support::test_config};
        use std::sync::Arc;

        let alice = User::new("alice".into(), "a@x.com".into(), "hash".into());
        let state = AppState::new(
            test_config(),
            Arc::new(VanishingUsers(alice.clone())),
            Arc::new(MemoryContactRepository::new()),
        );
        let contact = Contact::new(alice.id, "Bob".into(), "b@x.com".into(), "555".into());
        state.contacts.insert(&contact).await.unwrap();

        let err = delete_user(&state, &alice.principal(), &alice.id.to_hex()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(state.contacts.find_by_id(contact.id).await.unwrap().is_some());
    }
}
