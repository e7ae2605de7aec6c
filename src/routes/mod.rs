use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    get, web, App, Error, HttpMessage, HttpRequest, HttpResponse,
};
use serde_json::json;
use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    autosave::Autosaver,
    enhance::TextEnhancer,
    error::AppError,
    export::DocumentRenderer,
    models::{
        document::DocumentStore,
        user::{TokenVerifier, UserAuthentication, UserAuthenticationMiddlewareFactory},
    },
    wizard::InFlight,
};

pub mod catalog;
pub mod document;
pub mod export;
pub mod generate;
pub mod wizard;

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub enhancer: Arc<dyn TextEnhancer>,
    pub pdf: Arc<dyn DocumentRenderer>,
    pub word: Arc<dyn DocumentRenderer>,
    pub autosave: Autosaver,
    pub in_flight: InFlight,
    pub enhance_timeout: Duration,
    pub asset_dir: PathBuf,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        enhancer: Arc<dyn TextEnhancer>,
        pdf: Arc<dyn DocumentRenderer>,
        word: Arc<dyn DocumentRenderer>,
        autosave_delay: Duration,
        enhance_timeout: Duration,
        asset_dir: PathBuf,
    ) -> Self {
        Self {
            autosave: Autosaver::new(Arc::clone(&store), autosave_delay),
            store,
            enhancer,
            pdf,
            word,
            in_flight: InFlight::default(),
            enhance_timeout,
            asset_dir,
        }
    }
}

/// Owner id of the authenticated caller.
pub fn issuer(req: &HttpRequest) -> Result<String, AppError> {
    req.extensions()
        .get::<UserAuthentication>()
        .map(|user| user.id.clone())
        .ok_or(AppError::Unauthorized)
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(catalog::get_trades)
        .service(catalog::get_jobs)
        .service(catalog::get_hazards)
        .service(catalog::get_hazard)
        .service(catalog::get_substances)
        .service(catalog::get_ppe)
        .service(catalog::get_topics)
        .service(wizard::transition_rams)
        .service(wizard::transition_coshh)
        .service(wizard::transition_toolbox)
        .service(generate::generate_rams)
        .service(generate::generate_coshh)
        .service(generate::generate_toolbox)
        .service(document::get_documents)
        .service(document::create_document)
        .service(document::update_document)
        .service(document::delete_document)
        .service(document::get_document)
        .service(document::autosave_content)
        .service(document::regenerate_document)
        .service(export::export_pdf)
        .service(export::export_word);
}

/// Application with state, authentication and JSON error handling wired
/// in. CORS is layered on by the caller.
pub fn build_app(
    state: web::Data<AppState>,
    verifier: TokenVerifier,
    max_body_bytes: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(
            web::JsonConfig::default()
                .limit(max_body_bytes)
                .error_handler(|error, _| AppError::BadRequest(error.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|error, _| AppError::BadRequest(error.to_string()).into()),
        )
        .wrap(UserAuthenticationMiddlewareFactory::new(verifier))
        .configure(configure)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::{
        config::AuthKey,
        enhance::DisabledEnhancer,
        export::{RenderError, WordRenderer},
        models::{document::MemoryDocumentStore, user::test_token},
    };
    use async_trait::async_trait;

    pub const SECRET: &str = "test-secret";

    /// Stands in for the PDF service by echoing the HTML back.
    pub struct EchoPdf;

    #[async_trait]
    impl DocumentRenderer for EchoPdf {
        fn content_type(&self) -> &'static str {
            "application/pdf"
        }
        fn extension(&self) -> &'static str {
            "pdf"
        }
        async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
            Ok(html.as_bytes().to_vec())
        }
    }

    pub fn state_with(store: Arc<MemoryDocumentStore>, enhancer: Arc<dyn TextEnhancer>) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            store,
            enhancer,
            Arc::new(EchoPdf),
            Arc::new(WordRenderer),
            Duration::from_millis(50),
            Duration::from_secs(1),
            std::env::temp_dir(),
        ))
    }

    pub fn state() -> (Arc<MemoryDocumentStore>, web::Data<AppState>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let state = state_with(store.clone(), Arc::new(DisabledEnhancer));
        (store, state)
    }

    pub fn verifier() -> TokenVerifier {
        TokenVerifier::from_key(&AuthKey::Secret(SECRET.to_string())).expect("verifier")
    }

    pub fn bearer(owner: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", test_token(SECRET, owner)))
    }
}

#[cfg(test)]
mod tests {
    use super::{test_support::*, *};
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn health_is_public() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1024)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[actix_web::test]
    async fn oversized_bodies_are_rejected_as_json() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 64)).await;
        let req = test::TestRequest::post()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "name": "x", "content": "y".repeat(200), "type": "RAMS" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());
    }
}
