use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::error::AppError;
use crate::models::TaskInput;
use crate::state::AppState;

/// Retrieves every task, newest first. Reachable by any authenticated
/// user; the route table applies the user-level gate.
pub async fn get_tasks(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.get_all().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a single task by its identifier.
///
/// ## Responses:
/// - `200 OK`: the task as JSON.
/// - `404 Not Found`: no task with the given identifier.
pub async fn get_task(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get_by_id(&id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a task from the posted input. Admin-gated by the route table.
///
/// ## Responses:
/// - `201 Created`: the stored task, with its assigned identifier.
/// - `400 Bad Request`: input failed validation.
pub async fn create_task(
    state: web::Data<AppState>,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = state.tasks.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Replaces a task's fields with the posted input. Admin-gated by the
/// route table.
pub async fn update_task(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = state.tasks.update(&id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its identifier. Admin-gated by the route table.
pub async fn delete_task(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.tasks.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
