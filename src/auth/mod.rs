pub mod extractors;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::Protect;
pub use ownership::{authorize_task, TaskAction};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Same message for an unknown email and a wrong password.
pub const INCORRECT_CREDENTIALS: &str = "Incorrect credentials";

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Represents the payload for a signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name, 3 to 20 characters.
    #[validate(length(min = 3, max = 20))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

impl SignupRequest {
    /// Field validation plus the password confirmation check, reported under
    /// `confirmPassword` alongside any other field errors.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.password != self.confirm_password {
            let mut mismatch = ValidationError::new("must_match");
            mismatch.message = Some("Passwords don't match".into());
            errors.add("confirmPassword", mismatch);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Body returned by signup and login. The token is also set as the session cookie.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub token: String,
    pub data: User,
}
