use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::middleware::NOT_LOGGED_IN_MESSAGE;
use crate::error::AppError;
use crate::models::User;

/// Extracts the authenticated user from request extensions.
///
/// Only meaningful on routes wrapped by `Protect`, which loads the user and inserts it.
/// Without it the extractor fails with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(AuthenticatedUser(user))),
            None => {
                let err = AppError::Unauthorized(NOT_LOGGED_IN_MESSAGE.to_string());
                ready(Err(err.into()))
            }
        }
    }
}
