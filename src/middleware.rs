//! Sends unauthenticated browsers to the auth service sign-in page.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, HttpResponse, web};

use crate::models::config::ServerConfig;

/// Rewrites `401 Unauthorized` responses into a `303` redirect to
/// `{auth_service_url}/auth/signin`, or `/auth/signin` when no configuration
/// is registered.
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
}

fn signin_url(req: &ServiceRequest) -> String {
    let base = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| config.auth_service_url.trim_end_matches('/').to_string())
        .unwrap_or_default();
    format!("{base}/auth/signin")
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let location = signin_url(&req);
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let res = service.call(req).await?;
            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }

            log::debug!("Redirecting unauthorized request to {location}");
            let (req, _) = res.into_parts();
            let redirect = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            Ok(ServiceResponse::new(req, redirect).map_into_right_body())
        })
    }
}
