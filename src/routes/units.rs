use actix_web::{Responder, post, web};

use crate::backend::cache::QueryCache;
use crate::backend::http::HttpBackend;
use crate::forms::clients::ClientRefForm;
use crate::forms::units::{AddUnitForm, SaveUnitForm};
use crate::models::auth::AuthenticatedUser;
use crate::routes::clients::mutation_done;
use crate::routes::{backend_for, handle_error};
use crate::services::clients::client_url;
use crate::services::units as units_service;

#[post("/units/add")]
pub async fn add_unit(
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AddUnitForm>,
) -> impl Responder {
    let fallback = client_url(form.client_id);
    let api = backend_for(&backend, &cache, &user);

    match units_service::add_unit(&api, &user, form).await {
        Ok(outcome) => mutation_done(outcome, "Unidade adicionada."),
        Err(err) => handle_error(err, "Erro ao adicionar a unidade", &fallback),
    }
}

#[post("/units/{unit_id}/save")]
pub async fn save_unit(
    unit_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<SaveUnitForm>,
) -> impl Responder {
    let fallback = client_url(form.client_id);
    let api = backend_for(&backend, &cache, &user);

    match units_service::save_unit(&api, &user, unit_id.into_inner(), form).await {
        Ok(outcome) => mutation_done(outcome, "Unidade atualizada."),
        Err(err) => handle_error(err, "Erro ao atualizar a unidade", &fallback),
    }
}

#[post("/units/{unit_id}/delete")]
pub async fn delete_unit(
    unit_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<ClientRefForm>,
) -> impl Responder {
    let fallback = client_url(form.client_id);
    let api = backend_for(&backend, &cache, &user);

    match units_service::delete_unit(&api, &user, unit_id.into_inner(), form.client_id).await {
        Ok(outcome) => mutation_done(outcome, "Unidade removida."),
        Err(err) => handle_error(err, "Erro ao remover a unidade", &fallback),
    }
}
