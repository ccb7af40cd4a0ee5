use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::backend::cache::QueryCache;
use crate::backend::http::HttpBackend;
use crate::forms::users::UserRoleForm;
use crate::models::auth::AuthenticatedUser;
use crate::routes::{backend_for, handle_error, redirect};
use crate::services::search::back_to_search;
use crate::services::users as users_service;

#[post("/users/{user_id}/role")]
pub async fn update_user_role(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    backend: web::Data<HttpBackend>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<UserRoleForm>,
) -> impl Responder {
    let fallback = back_to_search(&form.current_query);
    let api = backend_for(&backend, &cache, &user);

    match users_service::update_role(&api, &user, user_id.into_inner(), form).await {
        Ok(location) => {
            FlashMessage::success("Perfil do usuário atualizado.").send();
            redirect(&location)
        }
        Err(err) => handle_error(err, "Erro ao atualizar o perfil do usuário", &fallback),
    }
}
