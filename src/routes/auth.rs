use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::{CurrentUser, LoginRequest, RegisterRequest, TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Register a new user
///
/// Creates a new account. The first account ever registered becomes the
/// admin; every later one starts as a regular user.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let user = state
        .accounts
        .register(&payload.username, &payload.password)
        .await?;

    Ok(HttpResponse::Created().json(user))
}

/// Login
///
/// Exchanges credentials for a signed bearer token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let token = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Promote a user to admin
///
/// Admin-gated by the route table; the acting admin comes from the gate.
pub async fn promote(
    state: web::Data<AppState>,
    actor: CurrentUser,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    log::info!("admin '{}' promoting user {}", actor.0.username, id);

    state.accounts.promote(&id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "user promoted to admin"
    })))
}
