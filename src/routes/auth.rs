use crate::{
    auth::{
        hash_password, session, verify_password, AuthResponse, LoginRequest, SignupRequest,
        INCORRECT_CREDENTIALS,
    },
    error::{parse_json, AppError},
    models::{NewUser, User},
    state::AppState,
};
use actix_web::{http::StatusCode, post, web, HttpResponse};
use serde_json::{json, Value};
use validator::Validate;

/// Issues a token for `user`, sets it as the session cookie and echoes it in the body.
fn send_token(
    state: &AppState,
    user: User,
    status: StatusCode,
    message: &'static str,
) -> Result<HttpResponse, AppError> {
    let token = state.tokens.issue(user.id)?;
    let cookie = session::session_cookie(&token, state.secure_cookies());

    Ok(HttpResponse::build(status).cookie(cookie).json(AuthResponse {
        status: "success",
        message,
        token,
        data: user,
    }))
}

/// Register a new user
///
/// Validates the payload, hashes the password and returns the new user with a session token.
/// A taken email surfaces from the store as a 409 conflict.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let payload: SignupRequest = parse_json(payload.into_inner())?;
    payload.check()?;

    let password_hash = hash_password(payload.password, state.config.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await?;
    log::info!("Created user {}", user.id);

    send_token(&state, user, StatusCode::CREATED, "Signup successfully")
}

/// Login user
///
/// Unknown email and wrong password produce the same 401 so callers cannot probe accounts.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let payload: LoginRequest = parse_json(payload.into_inner())?;
    payload.validate()?;

    let user = match state.store.find_user_by_email(&payload.email).await? {
        Some(user) => user,
        None => {
            log::warn!("Login failed: unknown email");
            return Err(AppError::Unauthorized(INCORRECT_CREDENTIALS.into()));
        }
    };

    if !verify_password(payload.password, user.password.clone()).await? {
        log::warn!("Login failed: wrong password for user {}", user.id);
        return Err(AppError::Unauthorized(INCORRECT_CREDENTIALS.into()));
    }

    log::info!("User {} logged in", user.id);
    send_token(&state, user, StatusCode::OK, "Login successfully")
}

/// Logout user
///
/// Replaces the session cookie with a short-lived sentinel. Tokens are not revoked
/// server-side and stay valid until they expire.
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session::logout_cookie(state.secure_cookies()))
        .json(json!({ "status": "success" }))
}
