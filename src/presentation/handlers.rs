use crate::application::auth_service::AuthService;
use crate::application::bootstrap::{SeedReport, bootstrap};
use crate::application::doctor_service::DoctorService;
use crate::application::news_service::NewsService;
use crate::data::doctor_repository::SqliteDoctorRepository;
use crate::data::news_repository::SqliteNewsRepository;
use crate::data::user_repository::SqliteUserRepository;
use crate::domain::error::DomainError;
use crate::domain::hospital::{AppointmentForm, CommentForm, DoctorForm, NewsForm, parse_id};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database;
use crate::presentation::middleware::{AuthenticatedUser, RequestId};
use crate::presentation::views;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Application context shared by all handlers: one service per aggregate over
/// a single connection pool.
pub struct AppState {
    pub auth: AuthService<SqliteUserRepository>,
    pub news: NewsService<SqliteNewsRepository>,
    pub doctors: DoctorService<SqliteDoctorRepository>,
    pub pool: SqlitePool,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            auth: AuthService::new(
                Arc::new(SqliteUserRepository::new(pool.clone())),
                config.session_secret.clone(),
                config.session_ttl_secs,
            ),
            news: NewsService::new(Arc::new(SqliteNewsRepository::new(pool.clone()))),
            doctors: DoctorService::new(Arc::new(SqliteDoctorRepository::new(pool.clone()))),
            pool,
            config,
        }
    }

    /// Opens the configured database, creates the schema and seeds empty tables.
    pub async fn initialize(config: AppConfig) -> anyhow::Result<(Self, SeedReport)> {
        let pool = database::init_pool(&config).await?;
        let report = bootstrap(
            &pool,
            &SqliteNewsRepository::new(pool.clone()),
            &SqliteDoctorRepository::new(pool.clone()),
        )
        .await?;
        Ok((Self::new(pool, config), report))
    }
}

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebError::Validation(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Conflict(_) => StatusCode::CONFLICT,
            // Browsers are sent to the login form rather than shown a 401
            WebError::Unauthorized(_) => StatusCode::FOUND,
            WebError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        match self {
            WebError::Validation(_) | WebError::NotFound(_) | WebError::Conflict(_) => {
                warn!(error = %error_msg, status = %status, "Request rejected")
            }
            WebError::Unauthorized(_) => {
                warn!(error = %error_msg, "Unauthenticated request, redirecting to login")
            }
            WebError::Database(_) | WebError::Internal(_) => {
                error!(error = %error_msg, status = %status, "Request failed")
            }
        }

        if let WebError::Unauthorized(_) = self {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish();
        }

        // Internal details stay in the log
        let public_msg = match self {
            WebError::Validation(msg) | WebError::NotFound(msg) | WebError::Conflict(msg) => {
                msg.clone()
            }
            _ => "Something went wrong. Please try again later.".to_string(),
        };

        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(views::error_page(status.as_u16(), &public_msg))
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => WebError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => WebError::NotFound(msg.clone()),
            Some(DomainError::UsernameTaken) => WebError::Conflict(err.to_string()),
            Some(DomainError::InvalidCredentials) => WebError::Unauthorized(err.to_string()),
            Some(DomainError::Internal(msg)) => WebError::Internal(msg.clone()),
            None => WebError::Database(err.to_string()),
        }
    }
}

/// Splits a service error into something a form can show (status and
/// message) and everything else, which becomes a [`WebError`].
pub(crate) fn form_rejection(err: anyhow::Error) -> Result<(StatusCode, String), WebError> {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::Validation(msg)) => Ok((StatusCode::BAD_REQUEST, msg.clone())),
        Some(DomainError::UsernameTaken) => Ok((StatusCode::CONFLICT, err.to_string())),
        Some(DomainError::InvalidCredentials) => Ok((StatusCode::UNAUTHORIZED, err.to_string())),
        _ => Err(WebError::from(err)),
    }
}

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

/// Post/redirect/get target after a successful form submission.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

// Required authentication: anonymous requests are redirected to /login
impl FromRequest for AuthenticatedUser {
    type Error = WebError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| WebError::Unauthorized("User not authenticated".to_string())))
    }
}

/// Optional authentication, for pages that render differently when logged in.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);

impl CurrentUser {
    pub fn get(&self) -> Option<&AuthenticatedUser> {
        self.0.as_ref()
    }
}

impl FromRequest for CurrentUser {
    type Error = WebError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        ready(Ok(CurrentUser(req.extensions().get::<AuthenticatedUser>().cloned())))
    }
}

impl FromRequest for RequestId {
    type Error = WebError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let id = req.extensions().get::<RequestId>().cloned();
        ready(id.ok_or_else(|| WebError::Internal("Request id missing".to_string())))
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    request_id: String,
    database: bool,
    timestamp: String,
}

#[instrument(skip_all, fields(request_id = %request_id.0))]
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let database = database::health_check(&state.pool).await;
    let response = HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        request_id: request_id.0,
        database,
        timestamp: Utc::now().to_rfc3339(),
    };
    if database {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[instrument(skip_all)]
pub async fn home(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse, WebError> {
    let latest = state.news.latest().await?;
    Ok(html(StatusCode::OK, views::home(user.get(), &latest)))
}

#[instrument(skip_all)]
pub async fn news_list(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, WebError> {
    let news = state.news.list().await?;
    info!(count = news.len(), "Listing news");
    Ok(html(StatusCode::OK, views::news_list(user.get(), &news)))
}

#[instrument(skip(state, user), fields(news_id = %*path))]
pub async fn news_detail(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, WebError> {
    let (news, comments) = state.news.detail(path.into_inner()).await?;
    Ok(html(
        StatusCode::OK,
        views::news_detail(user.get(), &news, &comments, None, &CommentForm::default()),
    ))
}

#[instrument(skip(state, user, form), fields(news_id = %*path))]
pub async fn add_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, WebError> {
    let news_id = path.into_inner();
    let form = form.into_inner();

    match state.news.add_comment(news_id, form.clone()).await {
        Ok(_) => Ok(see_other(&format!("/berita/{}", news_id))),
        Err(e) => {
            let (status, message) = form_rejection(e)?;
            let (news, comments) = state.news.detail(news_id).await?;
            Ok(html(
                status,
                views::news_detail(user.get(), &news, &comments, Some(&message), &form),
            ))
        }
    }
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn news_form_page(user: AuthenticatedUser) -> HttpResponse {
    html(
        StatusCode::OK,
        views::news_form(Some(&user), None, &NewsForm::default()),
    )
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn publish_news(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    form: web::Form<NewsForm>,
) -> Result<HttpResponse, WebError> {
    let form = form.into_inner();
    match state.news.publish(form.clone()).await {
        Ok(_) => Ok(see_other("/berita_acara")),
        Err(e) => {
            let (status, message) = form_rejection(e)?;
            Ok(html(status, views::news_form(Some(&user), Some(&message), &form)))
        }
    }
}

#[instrument(skip_all)]
pub async fn doctor_list(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, WebError> {
    let doctors = if user.0.is_some() {
        state.doctors.list_with_appointments().await?
    } else {
        state
            .doctors
            .list()
            .await?
            .into_iter()
            .map(|doctor| (doctor, Vec::new()))
            .collect()
    };
    Ok(html(StatusCode::OK, views::doctor_list(user.get(), &doctors)))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn doctor_form_page(user: AuthenticatedUser) -> HttpResponse {
    html(
        StatusCode::OK,
        views::doctor_form(Some(&user), None, &DoctorForm::default()),
    )
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn add_doctor(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    form: web::Form<DoctorForm>,
) -> Result<HttpResponse, WebError> {
    let form = form.into_inner();
    match state.doctors.add_doctor(form.clone()).await {
        Ok(_) => Ok(see_other("/jadwal_dokter")),
        Err(e) => {
            let (status, message) = form_rejection(e)?;
            Ok(html(status, views::doctor_form(Some(&user), Some(&message), &form)))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub dokter_id: Option<String>,
    pub sukses: Option<String>,
}

#[instrument(skip_all)]
pub async fn appointment_page(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<AppointmentQuery>,
) -> Result<HttpResponse, WebError> {
    let doctors = state.doctors.list().await?;
    // An unknown or malformed id pre-selects nothing
    let selected = query
        .dokter_id
        .as_deref()
        .and_then(parse_id)
        .filter(|id| doctors.iter().any(|d| d.id == *id));
    let submitted = query.sukses.is_some();

    let form = AppointmentForm {
        doctor_id: selected.map(|id| id.to_string()).unwrap_or_default(),
        ..Default::default()
    };
    Ok(html(
        StatusCode::OK,
        views::appointment_form(user.get(), &doctors, selected, None, submitted, &form),
    ))
}

#[instrument(skip_all)]
pub async fn request_appointment(
    state: web::Data<AppState>,
    user: CurrentUser,
    form: web::Form<AppointmentForm>,
) -> Result<HttpResponse, WebError> {
    let form = form.into_inner();
    match state.doctors.request_appointment(form.clone()).await {
        Ok(appointment) => {
            info!(appointment_id = appointment.id, "Appointment request stored");
            Ok(see_other("/buat_janji?sukses=1"))
        }
        Err(e) => {
            let (status, message) = form_rejection(e)?;
            let doctors = state.doctors.list().await?;
            let selected = parse_id(&form.doctor_id);
            Ok(html(
                status,
                views::appointment_form(
                    user.get(),
                    &doctors,
                    selected,
                    Some(&message),
                    false,
                    &form,
                ),
            ))
        }
    }
}
