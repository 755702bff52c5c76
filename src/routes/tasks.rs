use crate::{
    auth::{authorize_task, AuthenticatedUser, TaskAction},
    error::{parse_json, AppError},
    models::{TaskInput, TaskQuery, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

/// Retrieves a page of the authenticated user's live tasks.
///
/// ## Query Parameters:
/// - `page` (optional, default 1) and `limit` (optional, default 10, max 100).
/// - `title`, `priority`, `status` (optional): equality filters.
///
/// Any other query field is rejected with `400 Bad Request`. Owner scoping cannot be
/// overridden by a filter.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    query_params: web::Query<TaskQuery>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query_params.into_inner();
    query.validate()?;
    let (filter, page) = query.into_parts();

    let tasks = state
        .store
        .list_tasks(current_user.id(), &filter, page)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Tasks fetched successfully",
        "data": tasks,
        "pagination": page,
    })))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: title shorter than 3 characters or an unknown enum value.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<Value>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let task_data: TaskInput = parse_json(task_data.into_inner())?;
    task_data.validate()?;

    let task = state
        .store
        .create_task(task_data.into_new_task(current_user.id()))
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Task created successfully",
        "data": task,
    })))
}

/// Retrieves one of the authenticated user's live tasks.
///
/// Tasks of other users are reported as `404 Not Found`, same as missing ones.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let task = state
        .store
        .find_owned_task(task_id.into_inner(), current_user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Task fetched successfully",
        "data": task,
    })))
}

/// Updates the supplied fields of a task.
///
/// The body is typed and validated only after the ownership gate passes.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: invalid fields.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no live task with that id.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<Value>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let task = authorize_task(
        state.store.as_ref(),
        task_id.into_inner(),
        current_user.id(),
        TaskAction::Update,
    )
    .await?;
    let task_data: TaskUpdate = parse_json(task_data.into_inner())?;
    task_data.validate()?;

    let updated = state.store.update_task(task.id, &task_data).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Task updated successfully",
        "data": updated,
    })))
}

/// Soft-deletes a task. A second delete of the same task is `404 Not Found`.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let task = authorize_task(
        state.store.as_ref(),
        task_id.into_inner(),
        current_user.id(),
        TaskAction::Delete,
    )
    .await?;

    state.store.soft_delete_task(task.id).await?;
    log::info!("User {} deleted task {}", current_user.id(), task.id);

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Task deleted successfully",
        "data": null,
    })))
}
