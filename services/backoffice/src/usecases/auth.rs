//! Sign-up, login and token refresh

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::error::DatabaseError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::error::{UseCaseError, UseCaseResult};
use crate::jwt::{JwtService, TokenType};
use crate::models::{Account, FormationMode, NewAccount, Role};
use crate::repositories::AccountRepository;
use crate::validation::{
    MAX_NAME_LENGTH, parse_birth_date, validate_password, validate_required, validate_username,
};

const INVALID_CREDENTIALS: &str = "invalid username or password";
const ACCOUNT_NOT_ACTIVE: &str = "account is not active";
const USERNAME_TAKEN: &str = "User name already exists";

/// Sign-up payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub birth_date: String,
    pub birth_place: String,
    pub role: Role,
    pub formation_mode: Option<FormationMode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response for a token refresh
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Clone)]
pub struct AuthUseCases {
    accounts: Arc<dyn AccountRepository>,
    jwt: JwtService,
}

impl AuthUseCases {
    pub fn new(accounts: Arc<dyn AccountRepository>, jwt: JwtService) -> Self {
        Self { accounts, jwt }
    }

    /// Register a new account. The account starts inactive and cannot log in
    /// until an administrator activates it.
    pub async fn sign_up(&self, request: SignUpRequest) -> UseCaseResult<Account> {
        let birth_date = validate_sign_up(&request).map_err(UseCaseError::Validation)?;

        if self
            .accounts
            .get_account_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(UseCaseError::InvalidState(USERNAME_TAKEN.to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let new_account = NewAccount {
            username: request.username,
            password_hash,
            firstname: request.firstname.trim().to_string(),
            lastname: request.lastname.trim().to_string(),
            birth_date,
            birth_place: request.birth_place.trim().to_string(),
            role: request.role,
            formation_mode: request.formation_mode,
        };

        let account = match self.accounts.create_account(new_account).await {
            Ok(account) => account,
            // lost a race against a concurrent sign-up with the same username
            Err(DatabaseError::UniqueViolation(_)) => {
                return Err(UseCaseError::InvalidState(USERNAME_TAKEN.to_string()));
            }
            Err(e) => {
                error!(operation = "sign_up", "Failed to create account: {}", e);
                return Err(e.into());
            }
        };

        info!(operation = "sign_up", username = %account.username, "Account created");
        Ok(account)
    }

    /// Exchange credentials for an access and a refresh token
    pub async fn login(&self, username: &str, password: &str) -> UseCaseResult<TokenPair> {
        let Some(account) = self.accounts.get_account_by_username(username).await? else {
            warn!(operation = "login", "Unknown username");
            return Err(UseCaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&account.password_hash, password)? {
            warn!(operation = "login", username, "Wrong password");
            return Err(UseCaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !account.active {
            return Err(UseCaseError::Forbidden(ACCOUNT_NOT_ACTIVE.to_string()));
        }

        let access_token = self
            .jwt
            .generate_access_token(&account)
            .map_err(|e| token_error("login", e))?;
        let refresh_token = self
            .jwt
            .generate_refresh_token(&account)
            .map_err(|e| token_error("login", e))?;

        info!(operation = "login", username, "Login succeeded");
        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry(),
        })
    }

    /// Issue a new access token from a refresh token
    pub async fn refresh(&self, refresh_token: &str) -> UseCaseResult<AccessToken> {
        let claims = self
            .jwt
            .validate_token(refresh_token)
            .map_err(|_| UseCaseError::Unauthorized("invalid refresh token".to_string()))?;

        if claims.token_type != TokenType::Refresh {
            return Err(UseCaseError::Unauthorized(
                "invalid refresh token".to_string(),
            ));
        }

        let account = self
            .accounts
            .find_account_by_id(claims.sub)
            .await?
            .ok_or_else(|| UseCaseError::Unauthorized("account no longer exists".to_string()))?;

        if !account.active {
            return Err(UseCaseError::Forbidden(ACCOUNT_NOT_ACTIVE.to_string()));
        }

        let access_token = self
            .jwt
            .generate_access_token(&account)
            .map_err(|e| token_error("refresh", e))?;

        Ok(AccessToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry(),
        })
    }
}

fn validate_sign_up(request: &SignUpRequest) -> Result<chrono::NaiveDate, String> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;
    validate_required("First name", &request.firstname, MAX_NAME_LENGTH)?;
    validate_required("Last name", &request.lastname, MAX_NAME_LENGTH)?;
    validate_required("Birth place", &request.birth_place, MAX_NAME_LENGTH)?;
    parse_birth_date(&request.birth_date)
}

pub(crate) fn hash_password(password: &str) -> UseCaseResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UseCaseError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password_hash: &str, password: &str) -> UseCaseResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| UseCaseError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn token_error(operation: &'static str, e: jsonwebtoken::errors::Error) -> UseCaseError {
    error!(operation, "Failed to sign token: {}", e);
    UseCaseError::Internal("Failed to sign token".to_string())
}
