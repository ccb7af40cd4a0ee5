use actix_web::{Responder, post, web};

use crate::backend::cache::QueryCache;
use crate::backend::http::HttpBackend;
use crate::forms::clients::ClientRefForm;
use crate::forms::equipments::{AddEquipmentForm, SaveEquipmentForm};
use crate::models::auth::AuthenticatedUser;
use crate::routes::clients::mutation_done;
use crate::routes::{backend_for, handle_error};
use crate::services::clients::client_url;
use crate::services::equipments as equipments_service;

#[post("/equipments/add")]
pub async fn add_equipment(
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AddEquipmentForm>,
) -> impl Responder {
    let fallback = client_url(form.client_id);
    let api = backend_for(&backend, &cache, &user);

    match equipments_service::add_equipment(&api, &user, form).await {
        Ok(outcome) => mutation_done(outcome, "Equipamento adicionado."),
        Err(err) => handle_error(err, "Erro ao adicionar o equipamento", &fallback),
    }
}

#[post("/equipments/{equipment_id}/save")]
pub async fn save_equipment(
    equipment_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<SaveEquipmentForm>,
) -> impl Responder {
    let fallback = client_url(form.client_id);
    let api = backend_for(&backend, &cache, &user);

    match equipments_service::save_equipment(&api, &user, equipment_id.into_inner(), form).await {
        Ok(outcome) => mutation_done(outcome, "Equipamento atualizado."),
        Err(err) => handle_error(err, "Erro ao atualizar o equipamento", &fallback),
    }
}

#[post("/equipments/{equipment_id}/delete")]
pub async fn delete_equipment(
    equipment_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<ClientRefForm>,
) -> impl Responder {
    let fallback = client_url(form.client_id);
    let api = backend_for(&backend, &cache, &user);

    match equipments_service::delete_equipment(
        &api,
        &user,
        equipment_id.into_inner(),
        form.client_id,
    )
    .await
    {
        Ok(outcome) => mutation_done(outcome, "Equipamento removido."),
        Err(err) => handle_error(err, "Erro ao remover o equipamento", &fallback),
    }
}
