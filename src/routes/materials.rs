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
use crate::services::materials::{MATERIALS_PATH, load_materials_page, materials_action};
use crate::services::search::TabAction;

#[get("/materials")]
pub async fn show_materials(
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

    match load_materials_page(&api, &user, &url).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "materials",
                &server_config.auth_service_url,
            );
            context.insert("action_base", MATERIALS_PATH);
            context.insert("active", &data.active);

            render_template(&tera, "materials/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Permissão insuficiente.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the materials page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn tab_action(user: &AuthenticatedUser, form: TabActionForm, action: TabAction) -> HttpResponse {
    let fallback = QueryParams::parse(&form.current_query).to_url(MATERIALS_PATH);
    match materials_action(user, form, action) {
        Ok(location) => redirect(&location),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Permissão insuficiente.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to update the materials filters: {err}");
            redirect(&fallback)
        }
    }
}

#[post("/materials/apply")]
pub async fn apply_material_filters(
    user: AuthenticatedUser,
    web::Form(form): web::Form<HashMap<String, String>>,
) -> impl Responder {
    tab_action(&user, form.into(), TabAction::Apply)
}

#[post("/materials/clear")]
pub async fn clear_material_filters(
    user: AuthenticatedUser,
    web::Form(form): web::Form<HashMap<String, String>>,
) -> impl Responder {
    tab_action(&user, form.into(), TabAction::Clear)
}

#[post("/materials/page")]
pub async fn navigate_materials_page(
    user: AuthenticatedUser,
    web::Form(form): web::Form<HashMap<String, String>>,
) -> impl Responder {
    let form = TabActionForm::from(form);
    let page = form.page.unwrap_or(1);
    tab_action(&user, form, TabAction::Page(page))
}
