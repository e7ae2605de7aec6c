use actix_web::{post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::AppError,
    routes::{issuer, AppState},
    wizard::{
        CoshhDraft, GenerateContext, GenerateOutcome, RamsDraft, ToolboxDraft, Wizard, WizardDraft,
    },
};

/// A finished draft plus an optional name for the saved document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<D> {
    #[serde(flatten)]
    pub draft: D,
    #[serde(default)]
    pub document_name: Option<String>,
}

async fn generate<D: WizardDraft>(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: GenerateRequest<D>,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let _ticket = state.in_flight.try_acquire(&owner, D::KIND).ok_or_else(|| {
        AppError::Conflict(format!("A {} document is already being generated", D::KIND.label()))
    })?;

    let mut wizard = Wizard::new(payload.draft);
    let outcome = wizard
        .generate(GenerateContext {
            owner_id: &owner,
            name: payload.document_name,
            enhancer: state.enhancer.as_ref(),
            enhance_timeout: state.enhance_timeout,
            store: state.store.as_ref(),
            now: Utc::now(),
        })
        .await?;
    let GenerateOutcome::Generated(result) = outcome else {
        return Err(AppError::Conflict("This document has already been generated".to_string()));
    };

    let mut body: Map<String, Value> = result
        .enhanced
        .iter()
        .map(|(field, text)| (field.to_string(), Value::String(text.clone())))
        .collect();
    body.insert("saved".to_string(), Value::Bool(result.saved()));
    body.insert("name".to_string(), Value::String(result.name.clone()));
    body.insert("type".to_string(), serde_json::to_value(D::KIND).unwrap_or_default());
    if let Some(id) = &result.document_id {
        body.insert("id".to_string(), Value::String(id.clone()));
    }
    if let Some(created_at) = result.created_at {
        body.insert("createdAt".to_string(), Value::String(created_at.to_rfc3339()));
    }
    if let Some(warning) = &result.warning {
        body.insert("warning".to_string(), Value::String(warning.clone()));
    }
    body.insert(
        "payload".to_string(),
        serde_json::to_value(&result.record).unwrap_or_default(),
    );
    body.insert("html".to_string(), Value::String(result.html));

    Ok(HttpResponse::Ok().json(body))
}

#[post("/generate/rams")]
pub async fn generate_rams(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<GenerateRequest<RamsDraft>>,
) -> Result<HttpResponse, AppError> {
    generate(state, req, payload.into_inner()).await
}
#[post("/generate/coshh")]
pub async fn generate_coshh(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<GenerateRequest<CoshhDraft>>,
) -> Result<HttpResponse, AppError> {
    generate(state, req, payload.into_inner()).await
}
#[post("/generate/toolbox")]
pub async fn generate_toolbox(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<GenerateRequest<ToolboxDraft>>,
) -> Result<HttpResponse, AppError> {
    generate(state, req, payload.into_inner()).await
}

#[cfg(test)]
mod tests {
    use crate::{
        models::document::DocumentStore,
        routes::{build_app, test_support::*},
        wizard::{test_support::PrefixEnhancer, NOT_SAVED_WARNING},
    };
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn rams_draft() -> Value {
        json!({
            "companyName": "Spark Bros Ltd",
            "clientName": "Mrs Jones",
            "siteAddress": "1 High Street",
            "trade": "Electrician",
            "jobType": "EICR / Periodic Inspection",
            "description": "Test   everything .",
            "hazards": ["live_electricity"],
            "operatives": "2",
            "supervisor": "Dave",
            "firstAider": "Sam",
            "hospital": "City General",
            "fireAssembly": "Front gate",
        })
    }

    #[actix_web::test]
    async fn generating_requires_authentication() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;
        let req = test::TestRequest::post()
            .uri("/generate/rams")
            .set_json(rams_draft())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn rams_generation_returns_html_and_enhanced_fields() {
        let store = Arc::new(crate::models::document::MemoryDocumentStore::new());
        let state = state_with(store.clone(), Arc::new(PrefixEnhancer));
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;

        let mut draft = rams_draft();
        draft["documentName"] = json!("Jones rewire");
        let req = test::TestRequest::post()
            .uri("/generate/rams")
            .insert_header(bearer("alice"))
            .set_json(draft)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["saved"], true);
        assert_eq!(body["name"], "Jones rewire");
        assert_eq!(body["type"], "RAMS");
        assert_eq!(body["payload"]["data"]["supervisor"], "Dave");
        assert_eq!(body["scope"], "Enhanced: Test   everything .");
        assert!(body["html"].as_str().unwrap_or_default().contains("Live Electricity"));

        let listed = store.list("alice").await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(Some(listed[0].id.as_str()), body["id"].as_str());
    }

    #[actix_web::test]
    async fn missing_critical_fields_are_a_validation_error() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;
        let mut draft = rams_draft();
        draft["hospital"] = json!("");
        let req = test::TestRequest::post()
            .uri("/generate/rams")
            .insert_header(bearer("alice"))
            .set_json(draft)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Nearest hospital is required");
    }

    #[actix_web::test]
    async fn unsaved_documents_are_still_returned() {
        let (store, state) = state();
        store.fail_writes(true);
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;
        let req = test::TestRequest::post()
            .uri("/generate/toolbox")
            .insert_header(bearer("alice"))
            .set_json(json!({
                "presenter": "Jo",
                "talkDate": "2024-05-02",
                "topic": "Manual Handling",
                "summary": "Lift safely.",
                "keyPoints": ["Bend your knees"],
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["saved"], false);
        assert_eq!(body["warning"], NOT_SAVED_WARNING);
        assert!(body.get("id").is_none());
        assert!(body["html"].as_str().unwrap_or_default().contains("Toolbox Talk"));
    }

    #[actix_web::test]
    async fn concurrent_generation_for_the_same_owner_conflicts() {
        let (_, state) = state();
        let _held = state.in_flight.try_acquire("alice", crate::models::document::DocumentKind::Coshh);
        let app = test::init_service(build_app(state.clone(), verifier(), 1 << 20)).await;
        let req = test::TestRequest::post()
            .uri("/generate/coshh")
            .insert_header(bearer("alice"))
            .set_json(json!({ "companyName": "Brush Co", "assessor": "Pat" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
