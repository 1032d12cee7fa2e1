use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    entities::users::RegisterUserEntity,
    repositories::users::UserRepository,
    value_objects::{
        enums::user_roles::UserRole,
        users::{LoginModel, LoginResponse, RegisterUserModel, UserDto},
    },
};

use crate::{auth, config::config_model::AuthSecret};

#[derive(Debug, Error)]
pub enum AuthUseCaseError {
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthUseCaseError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AuthUseCaseError::EmailTaken => StatusCode::CONFLICT,
            AuthUseCaseError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthUseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AuthResult<T> = std::result::Result<T, AuthUseCaseError>;

pub struct AuthUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    auth_secret: AuthSecret,
}

impl<U> AuthUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, auth_secret: AuthSecret) -> Self {
        Self {
            user_repo,
            auth_secret,
        }
    }

    pub async fn register(&self, register_user_model: RegisterUserModel) -> AuthResult<UserDto> {
        info!(email = %register_user_model.email, "auth: registering user");

        let existing = self
            .user_repo
            .find_by_email(&register_user_model.email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to check existing email");
                AuthUseCaseError::Internal(err)
            })?;

        if existing.is_some() {
            warn!(email = %register_user_model.email, "auth: email already registered");
            return Err(AuthUseCaseError::EmailTaken);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(register_user_model.password.as_bytes(), &salt)
            .map_err(|err| anyhow::anyhow!("failed to hash password: {}", err))?
            .to_string();

        let now = Utc::now();
        let entity = RegisterUserEntity {
            id: Uuid::new_v4(),
            username: register_user_model.username,
            email: register_user_model.email,
            password_hash,
            role: register_user_model.role.to_string(),
            // New accounts start on the free plan.
            plan_id: None,
            skips_today: 0,
            last_skip_date: None,
            created_at: now,
            updated_at: now,
        };

        let user_id = self.user_repo.register(entity).await.map_err(|err| {
            error!(db_error = ?err, "auth: failed to insert user");
            AuthUseCaseError::Internal(err)
        })?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(AuthUseCaseError::Internal)?
            .ok_or_else(|| {
                AuthUseCaseError::Internal(anyhow::anyhow!("registered user row missing"))
            })?;

        info!(%user_id, "auth: user registered");
        Ok(UserDto::from(user))
    }

    pub async fn login(&self, login_model: LoginModel) -> AuthResult<LoginResponse> {
        let user = self
            .user_repo
            .find_by_email(&login_model.email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to load user for login");
                AuthUseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(email = %login_model.email, "auth: login for unknown email");
                AuthUseCaseError::InvalidCredentials
            })?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|err| anyhow::anyhow!("stored password hash is invalid: {}", err))?;

        if Argon2::default()
            .verify_password(login_model.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            warn!(user_id = %user.id, "auth: password mismatch");
            return Err(AuthUseCaseError::InvalidCredentials);
        }

        let role = UserRole::from_str(&user.role);
        let token = auth::issue_access_token(user.id, role, &self.auth_secret)
            .map_err(AuthUseCaseError::Internal)?;

        info!(user_id = %user.id, "auth: login succeeded");
        Ok(LoginResponse {
            token,
            user: UserDto::from(user),
        })
    }
}
