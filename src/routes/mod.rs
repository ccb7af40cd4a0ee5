//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::backend::cache::{CachedBackend, QueryCache};
use crate::backend::http::HttpBackend;
use crate::models::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod appointments;
pub mod clients;
pub mod equipments;
pub mod main;
pub mod materials;
pub mod proposals;
pub mod search;
pub mod units;
pub mod users;

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: alerts, the signed-in user and navigation.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context.insert("capabilities", &user.capabilities());
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {template}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Backend client acting as `user`, reading through the shared cache.
pub fn backend_for<'a>(
    backend: &HttpBackend,
    cache: &'a QueryCache,
    user: &AuthenticatedUser,
) -> CachedBackend<'a, HttpBackend> {
    CachedBackend::new(backend.with_token(&user.token), cache, user.sub.clone())
}

/// Response for the errors every handler treats the same way. `fallback` is
/// where form and backend errors return to.
pub(crate) fn handle_error(err: ServiceError, context: &str, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Permissão insuficiente.").send();
            redirect("/na")
        }
        ServiceError::NotFound => {
            FlashMessage::error("Registro não encontrado.").send();
            redirect(fallback)
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(fallback)
        }
        err => {
            log::error!("{context}: {err}");
            FlashMessage::error(format!("{context}.")).send();
            redirect(fallback)
        }
    }
}
