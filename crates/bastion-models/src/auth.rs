//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::UserResponse;

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Registration request.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 255, message = "Name must be between 3 and 255 characters"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
}

/// Request to exchange a refresh token.
///
/// The presented token is consumed; the response carries its replacement.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
}

/// Forgot-password response.
///
/// The message is the same whether or not the email is registered. `token`
/// is only present outside production, where no mailer delivers it, and is
/// `null` when no reset was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ForgotPasswordResponse {
    #[schema(example = "If the email exists, a password reset link has been sent")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable = true)]
    pub token: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewSecurePass456!")]
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "12345678".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_name = RegisterRequest {
            name: "Jo".to_string(),
            ..ok.clone()
        };
        assert!(short_name.validate().is_err());

        let long_name = RegisterRequest {
            name: "x".repeat(256),
            ..ok.clone()
        };
        assert!(long_name.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "1234567".to_string(),
            ..ok
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_reset_password_requires_eight_chars() {
        let request = ResetPasswordRequest {
            token: "t".to_string(),
            new_password: "short".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_forgot_password_response_token_presence() {
        let hidden = ForgotPasswordResponse {
            message: "m".to_string(),
            token: None,
        };
        let json = serde_json::to_value(&hidden).unwrap();
        assert!(json.get("token").is_none());

        let unknown = ForgotPasswordResponse {
            message: "m".to_string(),
            token: Some(None),
        };
        let json = serde_json::to_value(&unknown).unwrap();
        assert!(json["token"].is_null());
        assert!(json.as_object().unwrap().contains_key("token"));

        let issued = ForgotPasswordResponse {
            message: "m".to_string(),
            token: Some(Some("abc".to_string())),
        };
        assert_eq!(serde_json::to_value(&issued).unwrap()["token"], "abc");
    }
}
