use std::sync::Arc;

use uuid::Uuid;

use crate::auth::token::{self, Claims};
use crate::auth::password;
use crate::config;
use crate::database::models::user::{NewUser, User};
use crate::database::stores::CredentialStore;
use crate::error::ApiError;

/// Registration payload, validated before anything is written.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Present for technicians: the manager overseeing the new identity.
    pub manager_id: Option<Uuid>,
}

/// Login flow and registration over an injected credential store.
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    signing_key: String,
    token_expiry_hours: u64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        signing_key: String,
        token_expiry_hours: u64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            signing_key,
            token_expiry_hours,
            bcrypt_cost,
        }
    }

    pub fn from_config(users: Arc<dyn CredentialStore>) -> Self {
        let security = &config::config().security;
        Self::new(
            users,
            security.jwt_secret.clone(),
            security.jwt_expiry_hours,
            security.bcrypt_cost,
        )
    }

    /// Authenticate an email/password pair and issue a session token.
    ///
    /// An unknown email and a wrong password produce the identical error,
    /// so the response gives away nothing about which accounts exist.
    pub async fn login(&self, email: &str, plaintext: &str) -> Result<String, ApiError> {
        let email = normalize_email(email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login failed: no identity for submitted email");
                return Err(ApiError::invalid_credentials());
            }
        };

        let matches = password::verify(plaintext, &user.password_hash).map_err(|err| {
            tracing::error!("Password verification error: {}", err);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?;
        if !matches {
            tracing::debug!("Login failed: password mismatch for {}", user.id);
            return Err(ApiError::invalid_credentials());
        }

        let claims = Claims::new(user.id, user.manager_id, self.token_expiry_hours);
        token::issue(&claims, &self.signing_key).map_err(|err| {
            tracing::error!("Failed to issue session token: {}", err);
            ApiError::internal_server_error("An error occurred while processing your request")
        })
    }

    /// Create an identity and, for technicians, its manager link.
    ///
    /// No token is issued here; a fresh registration still goes through
    /// login.
    pub async fn register(&self, input: RegisterInput) -> Result<User, ApiError> {
        validate_registration(&input)?;

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict(
                "Email already exists, please try again with a different email",
            ));
        }

        // A manager link may only point at an existing identity that is
        // itself a manager: the hierarchy is a single level deep.
        if let Some(manager_id) = input.manager_id {
            let manager = self
                .users
                .find_by_id(manager_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Manager not found"))?;
            if manager.manager_id.is_some() {
                return Err(ApiError::bad_request(
                    "Assigned manager must be a Manager",
                ));
            }
        }

        let password_hash = password::hash(&input.password, self.bcrypt_cost).map_err(|err| {
            tracing::error!("Password hashing failed: {}", err);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?;

        let mut user = self
            .users
            .insert_identity(NewUser {
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        if let Some(manager_id) = input.manager_id {
            self.users.insert_manager_link(manager_id, user.id).await?;
            user.manager_id = Some(manager_id);
        }

        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(input: &RegisterInput) -> Result<(), ApiError> {
    if input.first_name.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required fields: first_name"));
    }
    if input.last_name.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required fields: last_name"));
    }
    if input.email.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required fields: email"));
    }
    if input.password.is_empty() {
        return Err(ApiError::bad_request("Missing password"));
    }
    if input.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }
    if !input.email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    Ok(())
}
