use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web, HttpRequest, HttpResponse,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppError,
    export::{attachment_filename, inline_local_images, DocumentRenderer},
    routes::{issuer, AppState},
};

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub html: String,
    #[serde(default)]
    pub filename: Option<String>,
}

async fn export(
    renderer: &dyn DocumentRenderer,
    state: &AppState,
    req: &HttpRequest,
    payload: ExportRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(req)?;
    if payload.html.trim().is_empty() {
        return Err(AppError::Validation("There is no document to export".to_string()));
    }

    let html = inline_local_images(&payload.html, &state.asset_dir);
    let bytes = renderer.render(&html).await?;
    let filename = attachment_filename(payload.filename.as_deref(), renderer.extension());
    info!(owner = %owner, filename = %filename, bytes = bytes.len(), "document exported");

    Ok(HttpResponse::Ok()
        .content_type(renderer.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(bytes))
}

#[post("/export/pdf")]
pub async fn export_pdf(
    state: web::Data<AppState>,
    payload: web::Json<ExportRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    export(state.pdf.as_ref(), &state, &req, payload.into_inner()).await
}
#[post("/export/word")]
pub async fn export_word(
    state: web::Data<AppState>,
    payload: web::Json<ExportRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    export(state.word.as_ref(), &state, &req, payload.into_inner()).await
}

#[cfg(test)]
mod tests {
    use crate::{
        enhance::DisabledEnhancer,
        export::{HttpPdfRenderer, WordRenderer},
        models::document::MemoryDocumentStore,
        routes::{build_app, test_support::*, AppState},
    };
    use actix_web::{http::StatusCode, test, web};
    use serde_json::{json, Value};
    use std::{sync::Arc, time::Duration};

    #[actix_web::test]
    async fn pdf_export_is_an_attachment() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;
        let req = test::TestRequest::post()
            .uri("/export/pdf")
            .insert_header(bearer("alice"))
            .set_json(json!({ "html": "<p>Report</p>", "filename": "Site survey" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert_eq!(
            headers.get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/pdf")
        );
        let disposition = headers
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("Site-survey.pdf"));
        let body = test::read_body(res).await;
        assert_eq!(&body[..], b"<p>Report</p>");
    }

    #[actix_web::test]
    async fn word_export_defaults_its_filename() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;
        let req = test::TestRequest::post()
            .uri("/export/word")
            .insert_header(bearer("alice"))
            .set_json(json!({ "html": "<p>Report</p>" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/msword")
        );
        let disposition = res
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("document.doc"));
    }

    #[actix_web::test]
    async fn unconfigured_pdf_renderer_is_a_server_error() {
        let state = web::Data::new(AppState::new(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(DisabledEnhancer),
            Arc::new(HttpPdfRenderer::new(None)),
            Arc::new(WordRenderer),
            Duration::from_millis(50),
            Duration::from_secs(1),
            std::env::temp_dir(),
        ));
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;
        let req = test::TestRequest::post()
            .uri("/export/pdf")
            .insert_header(bearer("alice"))
            .set_json(json!({ "html": "<p>Report</p>" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "PDF renderer is not configured");
    }

    #[actix_web::test]
    async fn empty_html_is_rejected() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;
        let req = test::TestRequest::post()
            .uri("/export/pdf")
            .insert_header(bearer("alice"))
            .set_json(json!({ "html": "  " }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
