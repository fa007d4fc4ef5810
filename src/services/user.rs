// User service: registration, login and account management
//
// Both login failure paths (unknown email, wrong password) surface the
// exact same message so the response never reveals whether an account
// exists.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ServiceError;
use crate::auth::jwt::JwtService;
use crate::auth::ROLE_USER;
use crate::storage::{
    password::{hash_password, verify_password},
    CreateUserRow, StorageBackend, UpdateUser, UserRow,
};

const LOGIN_FAILED: &str = "The given email and password do not match";

/// User shape safe to hand to clients (no password hash).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExposedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&UserRow> for ExposedUser {
    fn from(row: &UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            email: row.email.clone(),
            roles: row.role_set(),
        }
    }
}

/// Successful login/registration payload: the exposed user plus a signed
/// session token.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: ExposedUser,
    pub token: String,
}

pub struct UserService {
    db: StorageBackend,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(db: StorageBackend, jwt: Arc<JwtService>) -> Self {
        Self { db, jwt }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionData, ServiceError> {
        tracing::debug!("attempting login");
        let Some(user) = self.db.get_user_by_email(email).await? else {
            return Err(ServiceError::unauthorized(LOGIN_FAILED));
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(ServiceError::unauthorized(LOGIN_FAILED));
        }

        self.session_for(&user)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionData, ServiceError> {
        tracing::debug!("registering new user");
        if self.db.get_user_by_email(email).await?.is_some() {
            return Err(ServiceError::conflict(
                "An account with this email already exists",
            ));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .db
            .create_user(CreateUserRow {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                roles: vec![ROLE_USER.to_string()],
            })
            .await
            .map_err(|e| {
                tracing::error!("failed to create user: {:#}", e);
                ServiceError::from(e)
            })?;

        self.session_for(&user)
    }

    pub async fn get_all(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<UserRow>, i64), ServiceError> {
        tracing::debug!(limit, offset, "fetching all users");
        let data = self.db.list_users(limit as i64, offset as i64).await?;
        let count = self.db.count_users().await?;
        Ok((data, count))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserRow, ServiceError> {
        tracing::debug!(user_id = %id, "fetching user");
        self.db
            .get_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("No user with id {id} exists")))
    }

    pub async fn update_by_id(&self, id: Uuid, input: UpdateUser) -> Result<UserRow, ServiceError> {
        tracing::debug!(user_id = %id, "updating user");
        if let Some(email) = &input.email {
            if let Some(existing) = self.db.get_user_by_email(email).await? {
                if existing.id != id {
                    return Err(ServiceError::conflict(
                        "An account with this email already exists",
                    ));
                }
            }
        }
        self.db
            .update_user(id, input)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %id, "failed to update user: {:#}", e);
                ServiceError::from(e)
            })?
            .ok_or_else(|| ServiceError::not_found(format!("No user with id {id} exists")))
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        tracing::debug!(user_id = %id, "deleting user");
        let existed = self.db.delete_user(id).await.map_err(|e| {
            tracing::error!(user_id = %id, "failed to delete user: {:#}", e);
            ServiceError::from(e)
        })?;
        if !existed {
            return Err(ServiceError::not_found(format!(
                "No user with id {id} exists"
            )));
        }
        Ok(())
    }

    fn session_for(&self, user: &UserRow) -> Result<SessionData, ServiceError> {
        let token = self.jwt.generate_token(user.id, &user.role_set())?;
        Ok(SessionData {
            user: ExposedUser::from(user),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::config::JwtConfig;

    fn service() -> UserService {
        let db = StorageBackend::in_memory();
        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "test-secret-at-least-32-chars-long!".to_string(),
            expiration_secs: 3600,
            issuer: "calendar-api".to_string(),
            audience: "calendar-api".to_string(),
        }));
        UserService::new(db, jwt)
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let service = service();
        let session = service
            .register("Thomas", "thomas@example.com", "verysecretindeed")
            .await
            .unwrap();
        assert_eq!(session.user.roles, vec![ROLE_USER.to_string()]);
        assert!(!session.token.is_empty());

        let again = service
            .login("thomas@example.com", "verysecretindeed")
            .await
            .unwrap();
        assert_eq!(again.user.id, session.user.id);
    }

    #[tokio::test]
    async fn login_failures_share_a_message() {
        let service = service();
        service
            .register("Thomas", "thomas@example.com", "verysecretindeed")
            .await
            .unwrap();

        let unknown = service
            .login("nobody@example.com", "whatever-password")
            .await
            .unwrap_err();
        let wrong = service
            .login("thomas@example.com", "wrong-password-here")
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(unknown, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let service = service();
        service
            .register("Thomas", "thomas@example.com", "verysecretindeed")
            .await
            .unwrap();
        let err = service
            .register("Other", "thomas@example.com", "anotherpassword")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn exposed_user_never_carries_the_hash() {
        let service = service();
        let session = service
            .register("Thomas", "thomas@example.com", "verysecretindeed")
            .await
            .unwrap();
        let json = serde_json::to_value(&session.user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
