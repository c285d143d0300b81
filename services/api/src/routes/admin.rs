//! Admin endpoints: portfolio, blog, gallery, users, tickets, inquiries,
//! and site settings.
//!
//! Media-bearing resources take multipart forms. Files are written to the
//! upload store before the database row is touched; if the insert or
//! update then fails, the just-written files are removed again so the
//! store never accumulates orphans.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::require_role;
use crate::models::blog::{BlogFields, BlogForm};
use crate::models::project::{
    MAX_DRAWING_PHOTOS, MAX_PROJECT_PHOTOS, MAX_PROJECT_VIDEOS, ProjectFields, ProjectForm,
};
use crate::models::settings::SettingsUpdate;
use crate::models::ticket::{TicketStatus, TicketStatusRequest};
use crate::models::user::{CreateUserRequest, ROOT_ADMIN_USERNAME, UpdateUserRequest};
use crate::models::{AuthUser, Role};
use crate::state::AppState;
use crate::uploads::UploadStore;
use crate::validation::{validate_email, validate_password, validate_username};

/// A saved file referenced from the database, as served by `/uploads`.
fn public_path(stored_name: &str) -> String {
    format!("/uploads/{stored_name}")
}

/// Inverse of [`public_path`] for unlinking.
fn stored_name(public_path: &str) -> &str {
    public_path.strip_prefix("/uploads/").unwrap_or(public_path)
}

fn bad_form<E>(_: E) -> ApiError {
    ApiError::Validation("Invalid form data".to_string())
}

fn parse_opt<T: std::str::FromStr>(value: String) -> Result<Option<T>, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(bad_form)
}

fn parse_date_opt(value: String) -> Result<Option<NaiveDate>, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(bad_form)
}

fn text_opt(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Everything pulled out of a project multipart form. `saved` holds the
/// stored names of files written while parsing, for rollback.
#[derive(Default)]
struct ProjectUpload {
    form: ProjectForm,
    image: Option<String>,
    drawing_photos: Vec<String>,
    project_photos: Vec<String>,
    project_videos: Vec<String>,
    saved: Vec<String>,
}

async fn read_project_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<ProjectUpload, ApiError> {
    let mut upload = ProjectUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let original = field.file_name().unwrap_or_default().to_string();
            if original.is_empty() || !project_file_slot(&name) {
                continue;
            }
            let bytes = field.bytes().await.map_err(bad_form)?;
            let stored = save_upload(state, &original, &bytes, &mut upload.saved).await?;
            match name.as_str() {
                "image" => {
                    if let Some(displaced) = upload.image.replace(public_path(&stored)) {
                        remove_displaced(&state.uploads, &mut upload.saved, &displaced).await;
                    }
                }
                "drawing_photos" => upload.drawing_photos.push(public_path(&stored)),
                "project_photos" => upload.project_photos.push(public_path(&stored)),
                "project_videos" => upload.project_videos.push(public_path(&stored)),
                _ => {}
            }
            continue;
        }

        let value = field.text().await.map_err(bad_form)?;
        match name.as_str() {
            "status" => upload.form.status = text_opt(value),
            "project_type" => upload.form.project_type = text_opt(value),
            "title" => upload.form.title = text_opt(value),
            "location" => upload.form.location = text_opt(value),
            "description" => upload.form.description = text_opt(value),
            "start_date" => upload.form.start_date = parse_date_opt(value)?,
            "completed_date" => upload.form.completed_date = parse_date_opt(value)?,
            "progress" => upload.form.progress = parse_opt(value)?,
            "plot_area" => upload.form.plot_area = parse_opt(value)?,
            "plinth_area" => upload.form.plinth_area = parse_opt(value)?,
            "build_up_area" => upload.form.build_up_area = parse_opt(value)?,
            "delete_image" => upload.form.delete_image = value.trim() == "true",
            _ => {}
        }
    }

    Ok(upload)
}

/// Write one file, recording its stored name. A write failure rolls back
/// everything saved so far in this request.
async fn save_upload(
    state: &AppState,
    original: &str,
    bytes: &[u8],
    saved: &mut Vec<String>,
) -> Result<String, ApiError> {
    match state.uploads.save(original, bytes).await {
        Ok(stored) => {
            saved.push(stored.clone());
            Ok(stored)
        }
        Err(e) => {
            state.uploads.remove_all(saved).await;
            Err(ApiError::Io(e))
        }
    }
}

/// Undo the files of a request whose database step failed.
async fn rollback(state: &AppState, saved: &[String]) {
    state.uploads.remove_all(saved).await;
}

/// Unlink a file displaced by a later part of the same request, and drop
/// it from the rollback list so it is not removed twice.
async fn remove_displaced(uploads: &UploadStore, saved: &mut Vec<String>, displaced: &str) {
    let name = stored_name(displaced).to_string();
    uploads.remove(&name).await;
    saved.retain(|s| *s != name);
}

/// File parts a project form is allowed to store. Anything else is
/// drained without touching the store.
fn project_file_slot(name: &str) -> bool {
    matches!(
        name,
        "image" | "drawing_photos" | "project_photos" | "project_videos"
    )
}

fn check_gallery_caps(
    drawing: usize,
    photos: usize,
    videos: usize,
) -> Result<(), ApiError> {
    if drawing > MAX_DRAWING_PHOTOS {
        return Err(ApiError::Validation(format!(
            "Maximum {MAX_DRAWING_PHOTOS} drawing photos allowed"
        )));
    }
    if photos > MAX_PROJECT_PHOTOS {
        return Err(ApiError::Validation(format!(
            "Maximum {MAX_PROJECT_PHOTOS} project photos allowed"
        )));
    }
    if videos > MAX_PROJECT_VIDEOS {
        return Err(ApiError::Validation(format!(
            "Maximum {MAX_PROJECT_VIDEOS} project videos allowed"
        )));
    }
    Ok(())
}

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let projects = state.project_repository.list(None, None).await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let upload = read_project_upload(&state, multipart).await?;

    let fields: ProjectFields = match upload.form.validate() {
        Ok(fields) => fields,
        Err(msg) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Validation(msg));
        }
    };

    if let Err(e) = check_gallery_caps(
        upload.drawing_photos.len(),
        upload.project_photos.len(),
        upload.project_videos.len(),
    ) {
        rollback(&state, &upload.saved).await;
        return Err(e);
    }

    let project = match state
        .project_repository
        .create(
            &fields,
            upload.image.as_deref(),
            &upload.drawing_photos,
            &upload.project_photos,
            &upload.project_videos,
        )
        .await
    {
        Ok(project) => project,
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    info!(id = %project.id, title = %project.title, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// Gallery uploads append to the existing arrays; caps apply to the
/// combined result.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let upload = read_project_upload(&state, multipart).await?;
    let delete_image = upload.form.delete_image;

    let existing = match state.project_repository.find_by_id(id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::NotFound("Project not found".to_string()));
        }
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    let fields: ProjectFields = match upload.form.validate() {
        Ok(fields) => fields,
        Err(msg) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Validation(msg));
        }
    };

    let mut drawing_photos = existing.drawing_photos.0.clone();
    drawing_photos.extend(upload.drawing_photos.iter().cloned());
    let mut project_photos = existing.project_photos.0.clone();
    project_photos.extend(upload.project_photos.iter().cloned());
    let mut project_videos = existing.project_videos.0.clone();
    project_videos.extend(upload.project_videos.iter().cloned());

    if let Err(e) = check_gallery_caps(
        drawing_photos.len(),
        project_photos.len(),
        project_videos.len(),
    ) {
        rollback(&state, &upload.saved).await;
        return Err(e);
    }

    // A fresh image replaces the old one; delete_image on its own clears it.
    let replaces_image = upload.image.is_some();
    let image_path = if replaces_image {
        upload.image.clone()
    } else if delete_image {
        None
    } else {
        existing.image_path.clone()
    };

    let updated = match state
        .project_repository
        .update(
            id,
            &fields,
            image_path.as_deref(),
            &drawing_photos,
            &project_photos,
            &project_videos,
        )
        .await
    {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::NotFound("Project not found".to_string()));
        }
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    // Only after the row is safely updated does the displaced image go.
    if (replaces_image || delete_image)
        && let Some(old) = existing.image_path.as_deref()
    {
        state.uploads.remove(stored_name(old)).await;
    }

    Ok(Json(updated))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let project = state
        .project_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if let Some(image) = project.image_path.as_deref() {
        state.uploads.remove(stored_name(image)).await;
    }
    for path in project
        .drawing_photos
        .0
        .iter()
        .chain(project.project_photos.0.iter())
        .chain(project.project_videos.0.iter())
    {
        state.uploads.remove(stored_name(path)).await;
    }

    info!(id = %id, "project deleted");
    Ok(Json(json!({"message": "Project deleted"})))
}

/// Everything pulled out of a blog multipart form.
#[derive(Default)]
struct BlogUpload {
    form: BlogForm,
    image: Option<String>,
    saved: Vec<String>,
}

async fn read_blog_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<BlogUpload, ApiError> {
    let mut upload = BlogUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let original = field.file_name().unwrap_or_default().to_string();
            if original.is_empty() || name != "image" {
                continue;
            }
            let bytes = field.bytes().await.map_err(bad_form)?;
            let stored = save_upload(state, &original, &bytes, &mut upload.saved).await?;
            if let Some(displaced) = upload.image.replace(public_path(&stored)) {
                remove_displaced(&state.uploads, &mut upload.saved, &displaced).await;
            }
            continue;
        }

        let value = field.text().await.map_err(bad_form)?;
        match name.as_str() {
            "title" => upload.form.title = text_opt(value),
            "slug" => upload.form.slug = text_opt(value),
            "summary" => upload.form.summary = text_opt(value),
            "content" => upload.form.content = text_opt(value),
            "author" => upload.form.author = text_opt(value),
            "category" => upload.form.category = text_opt(value),
            "status" => upload.form.status = text_opt(value),
            "delete_image" => upload.form.delete_image = value.trim() == "true",
            _ => {}
        }
    }

    Ok(upload)
}

pub async fn list_blogs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let blogs = state.blog_repository.list_all().await?;
    Ok(Json(blogs))
}

pub async fn create_blog(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let upload = read_blog_upload(&state, multipart).await?;

    let mut fields: BlogFields = match upload.form.validate() {
        Ok(fields) => fields,
        Err(msg) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Validation(msg));
        }
    };

    fields.slug = match state
        .blog_repository
        .ensure_unique_slug(&fields.slug, None)
        .await
    {
        Ok(slug) => slug,
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    let blog = match state
        .blog_repository
        .create(&fields, upload.image.as_deref())
        .await
    {
        Ok(blog) => blog,
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    info!(id = %blog.id, slug = %blog.slug, "blog created");
    Ok((StatusCode::CREATED, Json(blog)))
}

pub async fn update_blog(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let upload = read_blog_upload(&state, multipart).await?;
    let delete_image = upload.form.delete_image;

    let existing = match state.blog_repository.find_by_id(id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::NotFound("Blog not found".to_string()));
        }
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    let mut fields: BlogFields = match upload.form.validate() {
        Ok(fields) => fields,
        Err(msg) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Validation(msg));
        }
    };

    fields.slug = match state
        .blog_repository
        .ensure_unique_slug(&fields.slug, Some(id))
        .await
    {
        Ok(slug) => slug,
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    let replaces_image = upload.image.is_some();
    let image_path = if replaces_image {
        upload.image.clone()
    } else if delete_image {
        None
    } else {
        existing.image_path.clone()
    };

    let updated = match state
        .blog_repository
        .update(id, &fields, image_path.as_deref())
        .await
    {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::NotFound("Blog not found".to_string()));
        }
        Err(e) => {
            rollback(&state, &upload.saved).await;
            return Err(ApiError::Database(e));
        }
    };

    if (replaces_image || delete_image)
        && let Some(old) = existing.image_path.as_deref()
    {
        state.uploads.remove(stored_name(old)).await;
    }

    Ok(Json(updated))
}

pub async fn delete_blog(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let blog = state
        .blog_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    if let Some(image) = blog.image_path.as_deref() {
        state.uploads.remove(stored_name(image)).await;
    }

    info!(id = %id, "blog deleted");
    Ok(Json(json!({"message": "Blog deleted"})))
}

/// The reserved root username may not be claimed by a new or renamed
/// account.
fn guard_reserved_username(username: &str) -> Result<(), ApiError> {
    if username.eq_ignore_ascii_case(ROOT_ADMIN_USERNAME) {
        return Err(ApiError::Forbidden(
            "The admin username is reserved".to_string(),
        ));
    }
    Ok(())
}

/// Renames touching the root account, or landing on its name, are refused.
fn guard_rename(target: &crate::models::User, new_username: &str) -> Result<(), ApiError> {
    if target.is_root_admin() {
        if !new_username.eq_ignore_ascii_case(&target.username) {
            return Err(ApiError::Forbidden(
                "Cannot change the root admin username".to_string(),
            ));
        }
        return Ok(());
    }
    guard_reserved_username(new_username)
}

fn guard_delete(target: &crate::models::User) -> Result<(), ApiError> {
    if target.is_root_admin() {
        return Err(ApiError::Forbidden(
            "Cannot delete the root admin account".to_string(),
        ));
    }
    Ok(())
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let users = state.user_repository.list().await?;
    let summaries: Vec<_> = users.iter().map(|u| u.summary()).collect();
    Ok(Json(summaries))
}

/// New accounts always start with the plain user role. Promotions are a
/// database operation, never an API one.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    validate_username(&payload.username).map_err(ApiError::Validation)?;
    validate_email(&payload.email).map_err(ApiError::Validation)?;
    validate_password(&payload.password).map_err(ApiError::Validation)?;

    guard_reserved_username(&payload.username)?;

    if state
        .user_repository
        .username_or_email_taken(&payload.username, &payload.email)
        .await?
    {
        return Err(ApiError::Conflict(
            "Username or email already exists".to_string(),
        ));
    }

    let password_hash = crate::repositories::hash_password(&payload.password).map_err(|e| {
        tracing::error!("failed to hash password: {}", e);
        ApiError::Internal
    })?;

    let created = state
        .user_repository
        .create(&payload.username, &payload.email, &password_hash, Role::User)
        .await
        .map_err(|e| ApiError::conflict_or_db(e, "Username or email already exists"))?;

    info!(username = %created.username, "user account created");
    Ok((StatusCode::CREATED, Json(created.summary())))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let target = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(username) = payload.username.as_deref() {
        guard_rename(&target, username)?;
        validate_username(username).map_err(ApiError::Validation)?;
    }
    if let Some(email) = payload.email.as_deref() {
        validate_email(email).map_err(ApiError::Validation)?;
    }
    if let Some(password) = payload.password.as_deref() {
        validate_password(password).map_err(ApiError::Validation)?;
    }

    let password_hash = match payload.password.as_deref() {
        Some(password) => Some(crate::repositories::hash_password(password).map_err(|e| {
            tracing::error!("failed to hash password: {}", e);
            ApiError::Internal
        })?),
        None => None,
    };

    let updated = state
        .user_repository
        .update(
            id,
            payload.username.as_deref(),
            payload.email.as_deref(),
            password_hash.as_deref(),
        )
        .await
        .map_err(|e| ApiError::conflict_or_db(e, "Username or email already exists"))?;

    if !updated {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({"message": "User updated"})))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let target = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    guard_delete(&target)?;

    if !state.user_repository.delete(id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(username = %target.username, "user account deleted");
    Ok(Json(json!({"message": "User deleted"})))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let tickets = state.ticket_repository.list_all().await?;
    Ok(Json(tickets))
}

/// An admin can resolve an open ticket as solved or closed; a resolved
/// ticket never changes state again.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let next = TicketStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::Validation("Invalid status".to_string()))?;
    if next == TicketStatus::Open {
        return Err(ApiError::Validation("Invalid status".to_string()));
    }

    let ticket = state
        .ticket_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    if !ticket.status.can_transition_to(next) {
        return Err(ApiError::Conflict(
            "Ticket has already been resolved".to_string(),
        ));
    }

    let updated = state
        .ticket_repository
        .set_status(id, next)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    info!(id = %id, status = next.as_str(), "ticket resolved");
    Ok(Json(updated))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    if !state.ticket_repository.delete(id).await? {
        return Err(ApiError::NotFound("Ticket not found".to_string()));
    }

    Ok(Json(json!({"message": "Ticket deleted"})))
}

pub async fn create_interior_design(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let mut description: Option<String> = None;
    let mut image: Option<String> = None;
    let mut saved: Vec<String> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let original = field.file_name().unwrap_or_default().to_string();
            if original.is_empty() || name != "image" {
                continue;
            }
            let bytes = field.bytes().await.map_err(bad_form)?;
            let stored = save_upload(&state, &original, &bytes, &mut saved).await?;
            if let Some(displaced) = image.replace(public_path(&stored)) {
                remove_displaced(&state.uploads, &mut saved, &displaced).await;
            }
            continue;
        }

        if name == "image_description" {
            description = text_opt(field.text().await.map_err(bad_form)?);
        }
    }

    let (Some(description), Some(image)) = (description, image) else {
        rollback(&state, &saved).await;
        return Err(ApiError::Validation(
            "Image and description are required".to_string(),
        ));
    };

    let design = match state.gallery_repository.create(&description, &image).await {
        Ok(design) => design,
        Err(e) => {
            rollback(&state, &saved).await;
            return Err(ApiError::Database(e));
        }
    };

    info!(id = %design.id, "interior design added");
    Ok((StatusCode::CREATED, Json(design)))
}

pub async fn delete_interior_design(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let design = state
        .gallery_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Design not found".to_string()))?;

    state.uploads.remove(stored_name(&design.image_path)).await;

    Ok(Json(json!({"message": "Design deleted"})))
}

pub async fn list_quotations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let quotations = state.quotation_repository.list().await?;
    Ok(Json(quotations))
}

pub async fn delete_quotation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    if !state.quotation_repository.delete(id).await? {
        return Err(ApiError::NotFound("Quotation not found".to_string()));
    }

    Ok(Json(json!({"message": "Quotation deleted"})))
}

pub async fn list_contact_messages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let messages = state.contact_repository.list().await?;
    Ok(Json(messages))
}

pub async fn delete_contact_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    if !state.contact_repository.delete(id).await? {
        return Err(ApiError::NotFound("Message not found".to_string()));
    }

    Ok(Json(json!({"message": "Message deleted"})))
}

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let settings = state.settings_repository.get().await?;
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SettingsUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let settings = state.settings_repository.update(&payload).await?;
    info!("site settings updated");
    Ok(Json(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::User;

    fn account(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn is_forbidden(result: Result<(), ApiError>) -> bool {
        matches!(result, Err(ApiError::Forbidden(_)))
    }

    #[test]
    fn reserved_username_cannot_be_claimed() {
        assert!(is_forbidden(guard_reserved_username("admin")));
        assert!(is_forbidden(guard_reserved_username("Admin")));
        assert!(is_forbidden(guard_reserved_username("ADMIN")));
        assert!(guard_reserved_username("maya").is_ok());
    }

    #[test]
    fn root_account_cannot_be_renamed() {
        let root = account("admin");
        assert!(is_forbidden(guard_rename(&root, "superuser")));
        // Case-only change keeps the same identity.
        assert!(guard_rename(&root, "Admin").is_ok());
    }

    #[test]
    fn other_accounts_cannot_take_the_root_name() {
        let maya = account("maya");
        assert!(is_forbidden(guard_rename(&maya, "ADMIN")));
        assert!(guard_rename(&maya, "maya_k").is_ok());
    }

    #[test]
    fn only_the_root_account_is_delete_protected() {
        assert!(is_forbidden(guard_delete(&account("Admin"))));
        assert!(guard_delete(&account("maya")).is_ok());
    }

    #[test]
    fn guard_rejections_map_to_403() {
        use axum::response::IntoResponse;

        let err = guard_delete(&account("admin")).expect_err("guarded");
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unrecognized_file_parts_are_never_stored() {
        assert!(project_file_slot("image"));
        assert!(project_file_slot("project_videos"));
        assert!(!project_file_slot("attachment"));
        assert!(!project_file_slot("resume"));
    }

    #[tokio::test]
    async fn displaced_image_is_unlinked_and_dropped_from_rollback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let uploads = UploadStore::new(dir.path());

        let first = uploads.save("a.png", b"first").await.expect("save");
        let second = uploads.save("b.png", b"second").await.expect("save");
        let mut saved = vec![first.clone(), second.clone()];

        remove_displaced(&uploads, &mut saved, &public_path(&first)).await;

        assert!(!dir.path().join(&first).exists());
        assert!(dir.path().join(&second).exists());
        assert_eq!(saved, vec![second]);
    }
}
