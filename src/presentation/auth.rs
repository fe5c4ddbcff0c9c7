use crate::domain::user::Credentials;
use crate::presentation::handlers::{AppState, CurrentUser, WebError, form_rejection, html};
use crate::presentation::middleware::{AuthenticatedUser, SESSION_COOKIE};
use crate::presentation::views;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

#[instrument(skip_all)]
pub async fn login_page(user: CurrentUser) -> HttpResponse {
    html(StatusCode::OK, views::login(user.get(), None, ""))
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    state: web::Data<AppState>,
    user: CurrentUser,
    form: web::Form<Credentials>,
) -> Result<HttpResponse, WebError> {
    info!("Login request received");
    let credentials = form.into_inner();
    let username = credentials.username.clone();

    match state.auth.login(credentials).await {
        Ok(session) => {
            info!(user_id = session.user.id, "Login successful, issuing session cookie");
            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .cookie(session_cookie(session.token))
                .finish())
        }
        Err(e) => {
            let (status, message) = form_rejection(e)?;
            Ok(html(status, views::login(user.get(), Some(&message), &username)))
        }
    }
}

#[instrument(skip_all)]
pub async fn register_page(user: CurrentUser) -> HttpResponse {
    html(StatusCode::OK, views::register(user.get(), None, ""))
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    state: web::Data<AppState>,
    user: CurrentUser,
    form: web::Form<Credentials>,
) -> Result<HttpResponse, WebError> {
    info!("Registration request received");
    let credentials = form.into_inner();
    let username = credentials.username.clone();

    match state.auth.register_user(credentials).await {
        Ok(created) => {
            info!(user_id = created.id, "User registered, redirecting to login");
            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish())
        }
        Err(e) => {
            let (status, message) = form_rejection(e)?;
            Ok(html(
                status,
                views::register(user.get(), Some(&message), &username),
            ))
        }
    }
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn logout(user: AuthenticatedUser) -> HttpResponse {
    info!("Logging out");
    let mut removal = session_cookie(String::new());
    removal.make_removal();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(removal)
        .finish()
}
