use crate::config::AuthKey;
use actix_service::{self, Transform};
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse},
    Error, HttpMessage,
};
use futures::{
    future::{ready, LocalBoxFuture, Ready},
    FutureExt,
};
use jsonwebtoken::{self, decode, errors::Error as JwtError, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Serialize, Deserialize)]
struct UserClaims {
    exp: i64,
    sub: String,
}

/// Identity of the caller, issued by the external sign-in service and
/// treated as an opaque owner id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
}

pub type UserAuthentication = Rc<AuthenticatedUser>;

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_key(key: &AuthKey) -> Result<Self, JwtError> {
        let (key, algorithm) = match key {
            AuthKey::RsaPem(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
            AuthKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
        };
        Ok(Self {
            key,
            validation: Validation::new(algorithm),
        })
    }
    pub fn verify(&self, token: &str) -> Option<String> {
        decode::<UserClaims>(token, &self.key, &self.validation)
            .ok()
            .map(|data| data.claims.sub)
            .filter(|sub| !sub.trim().is_empty())
    }
}

pub struct UserAuthenticationMiddleware<S> {
    service: Rc<S>,
    verifier: Rc<TokenVerifier>,
}
pub struct UserAuthenticationMiddlewareFactory {
    verifier: Rc<TokenVerifier>,
}

impl UserAuthenticationMiddlewareFactory {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Rc::new(verifier),
        }
    }
}

impl<S, B> Service<ServiceRequest> for UserAuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv: Rc<S> = self.service.clone();
        let verifier: Rc<TokenVerifier> = self.verifier.clone();

        async move {
            let token: Option<String> = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string());
            if let Some(id) = token.and_then(|token| verifier.verify(&token)) {
                req.extensions_mut()
                    .insert::<UserAuthentication>(Rc::new(AuthenticatedUser { id }));
            }
            let res: ServiceResponse<B> = srv.call(req).await?;
            Ok(res)
        }
        .boxed_local()
    }
}
impl<S, B> Transform<S, ServiceRequest> for UserAuthenticationMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = UserAuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthenticationMiddleware {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

/// Signs an HS256 token for `sub`, valid for an hour.
#[cfg(test)]
pub fn test_token(secret: &str, sub: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = UserClaims {
        exp: chrono::Utc::now().timestamp() + 3600,
        sub: sub.to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token")
}
