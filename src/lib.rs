//! Admin dashboard for medical-physics compliance records.
//!
//! The `data` feature builds only the backend-agnostic layer: domain types,
//! search tab filters and their URL codec, permissions and modal state. The
//! default `server` feature adds the Actix-web application talking to the
//! Prophy REST API.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod filters;
#[cfg(feature = "data")]
pub mod modal;
#[cfg(feature = "data")]
pub mod permissions;

#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::backend::cache::QueryCache;
    use crate::backend::http::HttpBackend;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::routes::appointments::add_appointment;
    use crate::routes::clients::{add_client, delete_client, save_client, show_client};
    use crate::routes::equipments::{add_equipment, delete_equipment, save_equipment};
    use crate::routes::main::{index, logout, not_assigned};
    use crate::routes::materials::{
        apply_material_filters, clear_material_filters, navigate_materials_page, show_materials,
    };
    use crate::routes::proposals::add_proposal;
    use crate::routes::search::{
        apply_filters, clear_filters, navigate_to_page, show_search, switch_tab,
    };
    use crate::routes::units::{add_unit, delete_unit, save_unit};
    use crate::routes::users::update_user_role;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let backend = HttpBackend::new(&server_config.api_base_url, server_config.api_timeout())
            .map_err(|e| std::io::Error::other(format!("Invalid backend url: {e}")))?;
        log::info!("Using backend at {}", backend.base_url());

        // One cache for all workers; entries are scoped per user.
        let cache = web::Data::new(QueryCache::new(
            server_config.cache_capacity,
            server_config.cache_ttl(),
        ));

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(index)
                        .service(not_assigned)
                        .service(logout)
                        .service(show_search)
                        .service(switch_tab)
                        .service(apply_filters)
                        .service(clear_filters)
                        .service(navigate_to_page)
                        .service(show_materials)
                        .service(apply_material_filters)
                        .service(clear_material_filters)
                        .service(navigate_materials_page)
                        .service(add_client)
                        .service(show_client)
                        .service(save_client)
                        .service(delete_client)
                        .service(add_unit)
                        .service(save_unit)
                        .service(delete_unit)
                        .service(add_equipment)
                        .service(save_equipment)
                        .service(delete_equipment)
                        .service(add_proposal)
                        .service(add_appointment)
                        .service(update_user_role),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(backend.clone()))
                .app_data(cache.clone())
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
