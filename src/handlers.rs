use crate::{
    config::AppConfig,
    error::{ApiError, Result},
    models::{
        Achievement, ContentType, CreateAchievementRequest, CreateGalleryItemRequest,
        CreateNewsRequest, CreateRegistrationRequest, GalleryItem, HealthResponse,
        MessageResponse, NewsItem, Registration, SiteSettings, UpdateRegistrationRequest,
    },
    repository::RepositoryState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

// --- Query Structs ---

/// ContentQuery
///
/// Query parameters of the content endpoint. Both are kept as raw strings so that a bad
/// value produces the store's own error body instead of an extractor rejection.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentQuery {
    /// One of `news`, `achievements`, `gallery`, `settings`.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Record id, required by DELETE.
    pub id: Option<String>,
}

/// RegistrationQuery
///
/// Query parameters of the registration endpoint.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationQuery {
    /// Registration id, required by PUT and DELETE.
    pub id: Option<String>,
}

impl ContentQuery {
    fn kind(&self) -> Result<ContentType> {
        self.content_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| ApiError::BadRequest("Invalid content type".to_string()))
    }

    fn collection(&self) -> Result<ContentType> {
        let kind = self.kind()?;
        if kind.is_collection() {
            Ok(kind)
        } else {
            Err(ApiError::BadRequest("Invalid content type".to_string()))
        }
    }
}

fn parse_id(raw: Option<&str>, missing: &str) -> Result<i64> {
    raw.and_then(|id| id.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::BadRequest(missing.to_string()))
}

// --- Health ---

/// health
///
/// Liveness probe. Reports the runtime environment.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(config): State<AppConfig>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        env: config.env.as_str().to_string(),
    })
}

// --- Content Store ---

/// list_content
///
/// [Content Store] Lists one collection, or returns the settings singleton for
/// `type=settings`.
#[utoipa::path(
    get,
    path = "/content",
    params(ContentQuery),
    responses(
        (status = 200, description = "Collection or settings object", body = [NewsItem]),
        (status = 400, description = "Invalid content type")
    )
)]
pub async fn list_content(
    State(repo): State<RepositoryState>,
    Query(query): Query<ContentQuery>,
) -> Result<Response> {
    let response = match query.kind()? {
        ContentType::News => Json::<Vec<NewsItem>>(repo.list_news().await?).into_response(),
        ContentType::Achievements => {
            Json::<Vec<Achievement>>(repo.list_achievements().await?).into_response()
        }
        ContentType::Gallery => Json::<Vec<GalleryItem>>(repo.list_gallery().await?).into_response(),
        ContentType::Settings => Json::<SiteSettings>(repo.get_settings().await?).into_response(),
    };
    Ok(response)
}

/// create_content
///
/// [Content Store] Creates a news item, achievement or gallery item. The body is decoded
/// into the record type selected by `type`; no field validation beyond decoding, so empty
/// strings are stored as sent.
#[utoipa::path(
    post,
    path = "/content",
    params(ContentQuery),
    responses(
        (status = 201, description = "Created record", body = NewsItem),
        (status = 400, description = "Invalid content type or undecodable body")
    )
)]
pub async fn create_content(
    State(repo): State<RepositoryState>,
    Query(query): Query<ContentQuery>,
    WithRejection(Json(body), _): WithRejection<Json<serde_json::Value>, ApiError>,
) -> Result<(StatusCode, Response)> {
    let kind = query.kind()?;

    let created = match kind {
        ContentType::News => {
            let req: CreateNewsRequest = serde_json::from_value(body)?;
            // An absent date means "today"; an empty string is the admin's choice.
            let date = req
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive().to_string());
            Json(repo.create_news(req.title, req.category, date).await?).into_response()
        }
        ContentType::Achievements => {
            let req: CreateAchievementRequest = serde_json::from_value(body)?;
            Json(repo.create_achievement(req).await?).into_response()
        }
        ContentType::Gallery => {
            let req: CreateGalleryItemRequest = serde_json::from_value(body)?;
            Json(repo.create_gallery_item(req).await?).into_response()
        }
        ContentType::Settings => {
            return Err(ApiError::BadRequest("Invalid content type".to_string()));
        }
    };

    tracing::info!(content_type = %kind, "content created");
    Ok((StatusCode::CREATED, created))
}

/// update_settings
///
/// [Content Store] Replaces the settings singleton. Only `type=settings` is updatable.
#[utoipa::path(
    put,
    path = "/content",
    params(ContentQuery),
    request_body = SiteSettings,
    responses(
        (status = 200, description = "Saved settings", body = SiteSettings),
        (status = 400, description = "Type is not settings")
    )
)]
pub async fn update_settings(
    State(repo): State<RepositoryState>,
    Query(query): Query<ContentQuery>,
    WithRejection(Json(body), _): WithRejection<Json<serde_json::Value>, ApiError>,
) -> Result<Json<SiteSettings>> {
    if query.kind()? != ContentType::Settings {
        return Err(ApiError::BadRequest("Invalid content type".to_string()));
    }

    let settings: SiteSettings = serde_json::from_value(body)?;
    let saved = repo.update_settings(settings).await?;
    tracing::info!("site settings updated");
    Ok(Json(saved))
}

/// delete_content
///
/// [Content Store] Removes one record of a collection by id.
#[utoipa::path(
    delete,
    path = "/content",
    params(ContentQuery),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Invalid content type or missing id"),
        (status = 404, description = "No such record")
    )
)]
pub async fn delete_content(
    State(repo): State<RepositoryState>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<MessageResponse>> {
    let kind = query.collection()?;
    let id = parse_id(query.id.as_deref(), "ID is required")?;

    if !repo.delete_content(kind, id).await? {
        return Err(ApiError::NotFound("Record not found".to_string()));
    }

    tracing::info!(content_type = %kind, id, "content deleted");
    Ok(Json(MessageResponse {
        message: "Deleted successfully".to_string(),
    }))
}

// --- Registration Store ---

/// list_registrations
///
/// [Registration Store] Lists every registration, newest first.
#[utoipa::path(
    get,
    path = "/register",
    responses((status = 200, description = "Registrations", body = [Registration]))
)]
pub async fn list_registrations(
    State(repo): State<RepositoryState>,
) -> Result<Json<Vec<Registration>>> {
    Ok(Json(repo.list_registrations().await?))
}

/// create_registration
///
/// [Registration Store] Self-service sign-up. All three fields are trimmed and must be
/// non-blank. Duplicate `user_id`s are accepted.
#[utoipa::path(
    post,
    path = "/register",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registered", body = Registration),
        (status = 400, description = "A field is blank")
    )
)]
pub async fn create_registration(
    State(repo): State<RepositoryState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateRegistrationRequest>, ApiError>,
) -> Result<(StatusCode, Json<Registration>)> {
    let req = payload.normalized().ok_or_else(|| {
        ApiError::BadRequest("Все поля обязательны для заполнения".to_string())
    })?;

    let registration = repo.create_registration(req).await?;
    tracing::info!(id = registration.id, user_id = %registration.user_id, "registration created");
    Ok((StatusCode::CREATED, Json(registration)))
}

/// update_registration
///
/// [Registration Store] Partial update by id. Only the keys present in the body are
/// applied; blank names are ignored.
#[utoipa::path(
    put,
    path = "/register",
    params(RegistrationQuery),
    request_body = UpdateRegistrationRequest,
    responses(
        (status = 200, description = "Updated", body = Registration),
        (status = 400, description = "Missing id or nothing to update"),
        (status = 404, description = "No such registration")
    )
)]
pub async fn update_registration(
    State(repo): State<RepositoryState>,
    Query(query): Query<RegistrationQuery>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRegistrationRequest>, ApiError>,
) -> Result<Json<Registration>> {
    let id = parse_id(query.id.as_deref(), "ID регистрации обязателен")?;

    let update = payload.normalized();
    if update.is_empty() {
        return Err(ApiError::BadRequest("Нет полей для обновления".to_string()));
    }

    let is_admin = update.is_admin;
    match repo.update_registration(id, update).await? {
        Some(registration) => {
            if let Some(flag) = is_admin {
                tracing::info!(id, is_admin = flag, "admin flag changed");
            }
            Ok(Json(registration))
        }
        None => Err(ApiError::NotFound("Регистрация не найдена".to_string())),
    }
}

/// delete_registration
///
/// [Registration Store] Removes a registration by id.
#[utoipa::path(
    delete,
    path = "/register",
    params(RegistrationQuery),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "No such registration")
    )
)]
pub async fn delete_registration(
    State(repo): State<RepositoryState>,
    Query(query): Query<RegistrationQuery>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(query.id.as_deref(), "ID регистрации обязателен")?;

    if !repo.delete_registration(id).await? {
        return Err(ApiError::NotFound("Регистрация не найдена".to_string()));
    }

    tracing::info!(id, "registration deleted");
    Ok(Json(MessageResponse {
        message: "Регистрация удалена".to_string(),
    }))
}
