use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::session::token_from_request;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

pub const NOT_LOGGED_IN_MESSAGE: &str = "You are not logged in! Please log in to get access.";
pub const USER_GONE_MESSAGE: &str = "The user belonging to this token does no longer exist.";

/// Per-request gate for protected scopes.
///
/// Resolves the bearer token (or session cookie) to a `User` loaded fresh from the store
/// and inserts it into request extensions for the `AuthenticatedUser` extractor.
/// Failures short-circuit with a 401 rendered by `AppError`.
pub struct Protect;

impl<S, B> Transform<S, ServiceRequest> for Protect
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ProtectService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ProtectService {
            service: Rc::new(service),
        }))
    }
}

pub struct ProtectService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ProtectService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => {
                    log::warn!("Rejected request to {}: {}", req.path(), err);
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

    let token = token_from_request(req)
        .ok_or_else(|| AppError::Unauthorized(NOT_LOGGED_IN_MESSAGE.into()))?;
    let claims = state.tokens.verify(&token)?;

    state
        .store
        .find_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized(USER_GONE_MESSAGE.into()))
}
