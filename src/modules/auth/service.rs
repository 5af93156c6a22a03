use std::sync::Arc;

use tracing::{info, instrument, warn};

use bastion_auth::{AccessTokenIssuer, generate_opaque_token};
use bastion_core::{AuthError, PasswordHasher};
use bastion_db::{NewUser, UserStore};
use bastion_models::UserResponse;
use bastion_models::auth::{
    AuthResponse, LoginRequest, RefreshTokenResponse, RegisterRequest, TOKEN_TYPE_BEARER,
};
use bastion_observability::{
    track_jwt_issued, track_password_reset, track_user_login_failure, track_user_login_success,
    track_user_registered,
};

use super::hashing::{hash_password, verify_password};
use super::refresh::RefreshTokenManager;
use super::reset::PasswordResetFlow;

/// Orchestrates the auth use cases on top of the store, the hasher and the
/// token components.
///
/// Passwords and token values are never logged; spans record the email or
/// user id only.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    /// Hash checked on the unknown-email login path so it costs as much as a
    /// wrong password.
    dummy_hash: Arc<str>,
    access_tokens: Arc<AccessTokenIssuer>,
    refresh_tokens: RefreshTokenManager,
    password_resets: PasswordResetFlow,
}

impl AuthService {
    /// Builds the service. Hashes one throwaway password at the configured
    /// cost, so this blocks for one bcrypt round.
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        access_tokens: Arc<AccessTokenIssuer>,
        reset_ttl: chrono::Duration,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(&generate_opaque_token()?)?;

        Ok(Self {
            refresh_tokens: RefreshTokenManager::new(store.clone(), access_tokens.clone()),
            password_resets: PasswordResetFlow::new(store.clone(), hasher, reset_ttl),
            store,
            hasher,
            dummy_hash: dummy_hash.into(),
            access_tokens,
        })
    }

    pub fn access_tokens(&self) -> &AccessTokenIssuer {
        &self.access_tokens
    }

    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn register(&self, dto: RegisterRequest) -> Result<AuthResponse, AuthError> {
        if self.store.find_by_email(&dto.email).await?.is_some() {
            warn!("registration rejected: email already exists");
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(self.hasher, dto.password).await?;

        let user = self
            .store
            .insert_user(NewUser {
                name: &dto.name,
                email: &dto.email,
                password_hash: &password_hash,
            })
            .await?
            .ok_or_else(|| {
                warn!("registration rejected: email claimed concurrently");
                AuthError::EmailAlreadyExists
            })?;

        let access_token = self.access_tokens.issue(user.id, &user.email)?;
        track_jwt_issued();
        let refresh_token = self.refresh_tokens.issue_for_user(&user).await?;

        track_user_registered();
        info!(user_id = user.id, "user registered");

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }

    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn login(&self, dto: LoginRequest) -> Result<AuthResponse, AuthError> {
        let Some(user) = self.store.find_by_email(&dto.email).await? else {
            // The outcome is discarded; only the elapsed time matters.
            let _ = verify_password(self.hasher, self.dummy_hash.to_string(), dto.password).await;
            warn!("login failed: unknown email");
            track_user_login_failure("unknown_email");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(err) = verify_password(self.hasher, user.password.clone(), dto.password).await {
            if matches!(err, AuthError::InvalidCredentials) {
                warn!(user_id = user.id, "login failed: wrong password");
                track_user_login_failure("wrong_password");
            }
            return Err(err);
        }

        let access_token = self.access_tokens.issue(user.id, &user.email)?;
        track_jwt_issued();
        let refresh_token = self.refresh_tokens.issue_for_user(&user).await?;

        track_user_login_success();
        info!(user_id = user.id, "user logged in");

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }

    #[instrument(skip_all)]
    pub async fn refresh_token(&self, presented: &str) -> Result<RefreshTokenResponse, AuthError> {
        let pair = self.refresh_tokens.exchange(presented).await?;
        Ok(RefreshTokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }

    /// Starts a password reset.
    ///
    /// Returns `Ok(None)` when the email is unknown; the caller must respond
    /// exactly as it would for a known email.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, AuthError> {
        match self.password_resets.request_reset(email).await {
            Ok(token) => {
                track_password_reset("request", "issued");
                Ok(Some(token))
            }
            Err(AuthError::UserNotFound) => {
                info!("password reset requested for unknown email");
                track_password_reset("request", "unknown_email");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let result = self.password_resets.complete_reset(token, new_password).await;
        let status = match &result {
            Ok(()) => "completed",
            Err(AuthError::InvalidResetToken) => "invalid_token",
            Err(AuthError::ResetTokenExpired) => "expired",
            Err(_) => "error",
        };
        track_password_reset("complete", status);
        result
    }

    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: i64) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(user_id).await
    }

    /// Loads the live user behind an access token. A user deleted after the
    /// token was issued is treated as an invalid token.
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: i64) -> Result<UserResponse, AuthError> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_db::MemoryUserStore;
    use chrono::Duration;

    const SECRET: &str = "service-tests-secret-key-with-32-chars";

    fn service() -> (AuthService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let service = AuthService::new(
            store.clone(),
            PasswordHasher::new(4),
            Arc::new(AccessTokenIssuer::new(SECRET, Duration::hours(24))),
            Duration::minutes(15),
        )
        .unwrap();
        (service, store)
    }

    fn register_dto(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: "SecurePass123".to_string(),
        }
    }

    fn login_dto(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_returns_tokens_and_stores_hash() {
        let (service, store) = service();
        let response = service.register(register_dto("jane@example.com")).await.unwrap();

        assert_eq!(response.user.email, "jane@example.com");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.refresh_token.len(), 64);
        assert_eq!(
            service.access_tokens().validate(&response.access_token).unwrap(),
            response.user.id
        );

        let row = store.snapshot(response.user.id).unwrap();
        assert_ne!(row.password, "SecurePass123");
        assert!(row.password.starts_with("$2"));
        assert_eq!(row.refresh_token.as_deref(), Some(response.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, _store) = service();
        service.register(register_dto("dup@example.com")).await.unwrap();
        assert!(matches!(
            service.register(register_dto("dup@example.com")).await,
            Err(AuthError::EmailAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _store) = service();
        service.register(register_dto("jane@example.com")).await.unwrap();

        let wrong_password = service
            .login(login_dto("jane@example.com", "WrongPass123"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_dto("ghost@example.com", "SecurePass123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_unknown_email_checks_a_hash_at_configured_cost() {
        let (service, _store) = service();
        let hasher = PasswordHasher::new(4);

        assert!(service.dummy_hash.starts_with("$2b$04$"));
        assert!(matches!(
            hasher.verify(&service.dummy_hash, "SecurePass123"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(login_dto("ghost@example.com", "SecurePass123")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_replaces_refresh_token() {
        let (service, _store) = service();
        let registered = service.register(register_dto("jane@example.com")).await.unwrap();
        let logged_in = service
            .login(login_dto("jane@example.com", "SecurePass123"))
            .await
            .unwrap();

        assert_ne!(registered.refresh_token, logged_in.refresh_token);
        assert!(matches!(
            service.refresh_token(&registered.refresh_token).await,
            Err(AuthError::InvalidRefreshToken)
        ));
        assert!(service.refresh_token(&logged_in.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_forgot_password_masks_unknown_email() {
        let (service, _store) = service();
        service.register(register_dto("jane@example.com")).await.unwrap();

        assert!(service.forgot_password("jane@example.com").await.unwrap().is_some());
        assert!(service.forgot_password("ghost@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_then_login_with_new_password() {
        let (service, _store) = service();
        service.register(register_dto("jane@example.com")).await.unwrap();
        let token = service
            .forgot_password("jane@example.com")
            .await
            .unwrap()
            .unwrap();

        service.reset_password(&token, "BrandNewPass1").await.unwrap();

        assert!(service
            .login(login_dto("jane@example.com", "BrandNewPass1"))
            .await
            .is_ok());
        assert!(matches!(
            service.login(login_dto("jane@example.com", "SecurePass123")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_soft_deleted_user_cannot_authenticate() {
        let (service, store) = service();
        let registered = service.register(register_dto("gone@example.com")).await.unwrap();
        store.soft_delete(registered.user.id).await.unwrap();

        assert!(matches!(
            service.login(login_dto("gone@example.com", "SecurePass123")).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.refresh_token(&registered.refresh_token).await,
            Err(AuthError::InvalidRefreshToken)
        ));
        assert!(service.forgot_password("gone@example.com").await.unwrap().is_none());
        assert!(matches!(
            service.profile(registered.user.id).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_refresh_token() {
        let (service, _store) = service();
        let registered = service.register(register_dto("jane@example.com")).await.unwrap();

        service.logout(registered.user.id).await.unwrap();

        assert!(matches!(
            service.refresh_token(&registered.refresh_token).await,
            Err(AuthError::InvalidRefreshToken)
        ));
    }
}
