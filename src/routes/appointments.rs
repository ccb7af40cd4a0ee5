use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::backend::cache::QueryCache;
use crate::backend::http::HttpBackend;
use crate::forms::appointments::AddAppointmentForm;
use crate::models::auth::AuthenticatedUser;
use crate::routes::{backend_for, handle_error, redirect};
use crate::services::appointments as appointments_service;
use crate::services::search::back_to_search;

#[post("/appointments/add")]
pub async fn add_appointment(
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AddAppointmentForm>,
) -> impl Responder {
    let fallback = back_to_search(&form.current_query);
    let api = backend_for(&backend, &cache, &user);

    match appointments_service::add_appointment(&api, &user, form).await {
        Ok(location) => {
            FlashMessage::success("Agendamento criado.").send();
            redirect(&location)
        }
        Err(err) => handle_error(err, "Erro ao criar o agendamento", &fallback),
    }
}
