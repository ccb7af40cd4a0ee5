use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::backend::cache::QueryCache;
use crate::backend::http::HttpBackend;
use crate::dto::clients::MutationOutcome;
use crate::filters::codec::QueryParams;
use crate::forms::clients::{AddClientForm, SaveClientForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{backend_for, base_context, handle_error, redirect, render_template};
use crate::services::ServiceError;
use crate::services::clients::{
    add_client as add_client_service, client_url, delete_client as delete_client_service,
    load_client_page, save_client as save_client_service,
};
use crate::services::search::{SEARCH_PATH, back_to_search};

/// Flashes how a mutation was taken and redirects to its page.
pub(crate) fn mutation_done(outcome: MutationOutcome, applied_message: &str) -> HttpResponse {
    if outcome.applied {
        FlashMessage::success(applied_message).send();
    } else {
        FlashMessage::info("Alteração enviada para revisão.").send();
    }
    redirect(&outcome.redirect_to)
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    req: HttpRequest,
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let url = QueryParams::parse(req.query_string());
    let api = backend_for(&backend, &cache, &user);

    match load_client_page(&api, &user, client_id.into_inner(), &url).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "search",
                &server_config.auth_service_url,
            );
            context.insert("client", &data.client);
            context.insert("cnpj", &data.cnpj);
            context.insert("units", &data.units);
            context.insert("pending_operations", &data.pending_operations);
            context.insert("changes_reviewed", &data.changes_reviewed);
            context.insert("modal", &data.modal);
            context.insert("modal_unit", &data.modal_unit);
            context.insert("modal_equipment", &data.modal_equipment);
            context.insert("modal_base_url", &data.modal_base_url);
            context.insert("modal_close_url", &data.modal_close_url);

            render_template(&tera, "clients/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Permissão insuficiente.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente não encontrado.").send();
            redirect(SEARCH_PATH)
        }
        Err(err) => {
            log::error!("Failed to load the client page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/clients/add")]
pub async fn add_client(
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AddClientForm>,
) -> impl Responder {
    let api = backend_for(&backend, &cache, &user);
    let fallback = back_to_search(&form.current_query);

    match add_client_service(&api, &user, form).await {
        Ok(outcome) => mutation_done(outcome, "Cliente adicionado."),
        Err(err) => handle_error(err, "Erro ao adicionar o cliente", &fallback),
    }
}

#[post("/clients/{client_id}/save")]
pub async fn save_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<SaveClientForm>,
) -> impl Responder {
    let client_id = client_id.into_inner();
    let api = backend_for(&backend, &cache, &user);

    match save_client_service(&api, &user, client_id, form).await {
        Ok(outcome) => mutation_done(outcome, "Cliente atualizado."),
        Err(err) => handle_error(err, "Erro ao atualizar o cliente", &client_url(client_id)),
    }
}

#[post("/clients/{client_id}/delete")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
) -> impl Responder {
    let client_id = client_id.into_inner();
    let api = backend_for(&backend, &cache, &user);

    match delete_client_service(&api, &user, client_id).await {
        Ok(outcome) => mutation_done(outcome, "Cliente removido."),
        Err(err) => handle_error(err, "Erro ao remover o cliente", &client_url(client_id)),
    }
}
