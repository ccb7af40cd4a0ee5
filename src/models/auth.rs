//! Signed-in user extracted from the session identity.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::types::Role;
use crate::models::config::ServerConfig;
use crate::permissions::{Action, Resource, can, capability_names};

/// Claims of the session token issued by the auth service. The raw token is
/// kept to authorize backend calls on the user's behalf.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
    #[serde(skip)]
    pub token: String,
}

impl AuthenticatedUser {
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(Self {
            token: token.to_string(),
            ..data.claims
        })
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn can(&self, resource: Resource, action: Action) -> bool {
        can(self.role, resource, action)
    }

    /// Capability names for templates, e.g. `client_delete`.
    pub fn capabilities(&self) -> Vec<String> {
        capability_names(self.role)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Ok(identity) = req.get_identity() else {
            return ready(Err(ErrorUnauthorized("Not signed in")));
        };
        let Ok(token) = identity.id() else {
            return ready(Err(ErrorUnauthorized("Invalid identity")));
        };
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("ServerConfig is not registered");
            return ready(Err(ErrorUnauthorized("Server misconfigured")));
        };

        match AuthenticatedUser::from_jwt(&token, &config.secret) {
            Ok(user) => ready(Ok(user)),
            Err(err) => {
                log::warn!("Rejected session token: {err}");
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "7".to_string(),
            email: "ana@prophy.test".to_string(),
            name: "Ana".to_string(),
            role,
            exp: 4_102_444_800,
            token: String::new(),
        }
    }

    #[test]
    fn jwt_round_trip_keeps_claims_and_token() {
        let original = user(Role::ClientManager);
        let token = original.to_jwt(SECRET).unwrap();

        let decoded = AuthenticatedUser::from_jwt(&token, SECRET).unwrap();

        assert_eq!(decoded.role, Role::ClientManager);
        assert_eq!(decoded.email, original.email);
        assert_eq!(decoded.token, token);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = user(Role::ProphyManager).to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut expired = user(Role::ProphyManager);
        expired.exp = 1;
        let token = expired.to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn role_is_serialized_as_code() {
        let value = serde_json::to_value(user(Role::UnitManager)).unwrap();
        assert_eq!(value["role"], "GU");
        assert!(value.get("token").is_none());
    }
}
