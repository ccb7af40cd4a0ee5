use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::backend::cache::QueryCache;
use crate::backend::http::HttpBackend;
use crate::filters::codec::QueryParams;
use crate::forms::search::TabActionForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{backend_for, base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::search::{
    SEARCH_PATH, TabAction, back_to_search, load_search_page, search_tab_action,
    switch_search_tab,
};

#[get("/search")]
pub async fn show_search(
    req: HttpRequest,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let url = QueryParams::parse(req.query_string());
    let api = backend_for(&backend, &cache, &user);

    match load_search_page(&api, &user, &url).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "search",
                &server_config.auth_service_url,
            );
            context.insert("action_base", SEARCH_PATH);
            context.insert("tabs", &data.tabs);
            context.insert("active", &data.active);
            context.insert("view", &data.view);
            context.insert("list_view_url", &data.list_view_url);
            context.insert("calendar_view_url", &data.calendar_view_url);
            context.insert("calendar", &data.calendar);
            context.insert("modal", &data.modal);
            context.insert("modal_user", &data.modal_user);
            context.insert("modal_units", &data.modal_units);
            context.insert("modal_base_url", &data.modal_base_url);
            context.insert("modal_close_url", &data.modal_close_url);

            render_template(&tera, "search/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Permissão insuficiente.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the search page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/search/tab/{index}")]
pub async fn switch_tab(
    req: HttpRequest,
    index: web::Path<usize>,
    user: AuthenticatedUser,
) -> impl Responder {
    let url = QueryParams::parse(req.query_string());
    match switch_search_tab(&user, index.into_inner(), &url) {
        Ok(location) => redirect(&location),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Permissão insuficiente.").send();
            redirect("/na")
        }
        Err(_) => redirect(&url.to_url(SEARCH_PATH)),
    }
}

fn tab_action(user: &AuthenticatedUser, form: TabActionForm, action: TabAction) -> HttpResponse {
    let fallback = back_to_search(&form.current_query);
    match search_tab_action(user, form, action) {
        Ok(location) => redirect(&location),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Permissão insuficiente.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&fallback)
        }
        Err(err) => {
            log::error!("Failed to update the search tab: {err}");
            redirect(&fallback)
        }
    }
}

#[post("/search/apply")]
pub async fn apply_filters(
    user: AuthenticatedUser,
    web::Form(form): web::Form<HashMap<String, String>>,
) -> impl Responder {
    tab_action(&user, form.into(), TabAction::Apply)
}

#[post("/search/clear")]
pub async fn clear_filters(
    user: AuthenticatedUser,
    web::Form(form): web::Form<HashMap<String, String>>,
) -> impl Responder {
    tab_action(&user, form.into(), TabAction::Clear)
}

#[post("/search/page")]
pub async fn navigate_to_page(
    user: AuthenticatedUser,
    web::Form(form): web::Form<HashMap<String, String>>,
) -> impl Responder {
    let form = TabActionForm::from(form);
    let page = form.page.unwrap_or(1);
    tab_action(&user, form, TabAction::Page(page))
}
