use crate::{auth::AuthenticatedUser, error::AppError, state::AppState};
use actix_web::{get, web, HttpResponse};
use serde_json::json;

async fn fetch_user(state: &AppState, user_id: i32) -> Result<HttpResponse, AppError> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "User fetched successfully",
        "data": user,
    })))
}

/// Returns the account behind the current session, reloaded from the store.
#[get("/me")]
pub async fn get_me(
    state: web::Data<AppState>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    fetch_user(&state, current_user.id()).await
}

/// Returns any user by id. The password hash is never serialized.
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
    _current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    fetch_user(&state, user_id.into_inner()).await
}
