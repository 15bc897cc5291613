//! Admin dashboard endpoints; everything but login sits behind a session
//! token

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{
    BookingFilter, BookingStatus, CallbackFilter, ContactFormFilter, ContactStatus, VideoCategory,
    VideoFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::public::MonthQuery;
use crate::{
    error::{ApiError, ApiResult},
    forms::validation,
    middleware::AdminSession,
    pages::dashboard::CalendarEdit,
    repositories::{VideoDeletion, VideoUpload},
    state::AppState,
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// Response to a video deletion; `warning` is set when the stored object
/// was left behind
#[derive(Debug, Serialize)]
pub struct DeleteVideoResponse {
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<VideoDeletion> for DeleteVideoResponse {
    fn from(outcome: VideoDeletion) -> Self {
        let warning = match outcome {
            VideoDeletion::Removed => None,
            VideoDeletion::StorageOrphaned { key, reason } => Some(format!(
                "Video deleted but its stored file '{key}' could not be removed: {reason}"
            )),
        };
        Self {
            deleted: true,
            warning,
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    // Only the admin account is throttled; other names can never log in
    if !state.auth.is_admin(&payload.username) {
        warn!("Login attempt for unknown user: {}", payload.username);
        return Err(ApiError::Unauthorized);
    }

    if !state.login_limiter.is_allowed(&payload.username).await {
        return Err(ApiError::TooManyRequests);
    }

    if !state
        .auth
        .verify_credentials(&payload.username, &payload.password)
    {
        warn!("Failed admin login for user: {}", payload.username);
        return Err(ApiError::Unauthorized);
    }

    state.login_limiter.reset(&payload.username).await;
    info!("Admin logged in: {}", payload.username);

    Ok(Json(state.auth.issue_token()?))
}

pub async fn session(Extension(session): Extension<AdminSession>) -> impl IntoResponse {
    Json(json!({ "username": session.username }))
}

/// Loading and last-error flags of each repository
pub async fn activity(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.repositories.activity())
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.summary(state.today()).await?))
}

pub async fn calendar_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    let today = state.today();
    let month = query.resolve(today)?;
    Ok(Json(state.dashboard.calendar_month(month, today).await?))
}

pub async fn save_calendar_day(
    State(state): State<AppState>,
    Json(edit): Json<CalendarEdit>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.save_calendar_day(edit).await?))
}

pub async fn list_videos(
    State(state): State<AppState>,
    Query(filter): Query<VideoFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.repositories.videos.list(&filter).await?))
}

/// Multipart upload: a `category` field (`portfolio` or `hero`), an
/// optional display `name`, and one or more `file` fields. Hero uploads
/// take exactly one file.
pub async fn upload_videos(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut category = None;
    let mut name = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("category") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                category = Some(
                    text.trim()
                        .parse::<VideoCategory>()
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                name = validation::optional(&text);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

                files.push(VideoUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                    name: None,
                });
            }
            _ => {}
        }
    }

    let category =
        category.ok_or_else(|| ApiError::Validation("Video category is required".to_string()))?;
    if files.is_empty() {
        return Err(ApiError::Validation("No video file was uploaded".to_string()));
    }

    match category {
        VideoCategory::Hero => {
            if files.len() > 1 {
                return Err(ApiError::Validation(
                    "Only one hero video can be uploaded at a time".to_string(),
                ));
            }
            let mut file = files.remove(0);
            file.name = name;
            let video = state.dashboard.upload_hero(file).await?;
            Ok((StatusCode::CREATED, Json(json!({ "uploaded": [video] }))))
        }
        VideoCategory::Portfolio => {
            if files.len() == 1 {
                files[0].name = name;
            }
            let batch = state.dashboard.upload_portfolio(files).await;
            let status = if batch.failure.is_none() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            Ok((status, Json(json!(batch))))
        }
    }
}

pub async fn rename_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.rename_video(id, &payload.name).await?))
}

pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.dashboard.delete_video(id).await?;
    Ok(Json(DeleteVideoResponse::from(outcome)))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.repositories.bookings.list(&filter).await?))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdate<BookingStatus>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state.dashboard.set_booking_status(id, payload.status).await?,
    ))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.dashboard.delete_booking(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_contact_forms(
    State(state): State<AppState>,
    Query(filter): Query<ContactFormFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.repositories.contact_forms.list(&filter).await?))
}

pub async fn update_contact_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdate<ContactStatus>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state.dashboard.set_contact_status(id, payload.status).await?,
    ))
}

pub async fn list_callbacks(
    State(state): State<AppState>,
    Query(filter): Query<CallbackFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.repositories.callbacks.list(&filter).await?))
}

pub async fn advance_callback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.advance_callback(id).await?))
}

pub async fn delete_callback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.dashboard.delete_callback(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
