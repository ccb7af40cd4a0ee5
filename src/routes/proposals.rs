use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::backend::cache::QueryCache;
use crate::backend::http::HttpBackend;
use crate::forms::proposals::AddProposalForm;
use crate::models::auth::AuthenticatedUser;
use crate::routes::{backend_for, handle_error, redirect};
use crate::services::proposals as proposals_service;
use crate::services::search::back_to_search;

#[post("/proposals/add")]
pub async fn add_proposal(
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AddProposalForm>,
) -> impl Responder {
    let fallback = back_to_search(&form.current_query);
    let api = backend_for(&backend, &cache, &user);

    match proposals_service::add_proposal(&api, &user, form).await {
        Ok(location) => {
            FlashMessage::success("Proposta registrada.").send();
            redirect(&location)
        }
        Err(err) => handle_error(err, "Erro ao registrar a proposta", &fallback),
    }
}
