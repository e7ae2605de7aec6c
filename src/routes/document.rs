use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    assembly::{assemble, DocumentData},
    error::AppError,
    models::document::{DocumentKind, DocumentPatch, NewDocument},
    routes::{issuer, AppState},
};

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    #[serde(default)]
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
}
#[derive(Debug, Deserialize)]
pub struct DocumentUpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub patch: DocumentPatch,
}
#[derive(Debug, Deserialize)]
pub struct DocumentQueryParams {
    pub id: String,
}
#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

#[get("/documents")]
pub async fn get_documents(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let documents = state.store.list(&owner).await?;
    Ok(HttpResponse::Ok().json(documents))
}
#[post("/documents")]
pub async fn create_document(
    state: web::Data<AppState>,
    payload: web::Json<DocumentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let payload: DocumentRequest = payload.into_inner();
    let name = match payload.name.trim() {
        "" => format!("Untitled {}", payload.kind.label()),
        name => name.to_string(),
    };

    let saved = state
        .store
        .save(NewDocument {
            owner_id: owner.clone(),
            name,
            kind: payload.kind,
            content: payload.content,
            payload: payload.payload,
        })
        .await?;
    info!(document_id = %saved.id, owner = %owner, "document created");
    Ok(HttpResponse::Created().json(saved))
}
#[put("/documents")]
pub async fn update_document(
    state: web::Data<AppState>,
    payload: web::Json<DocumentUpdateRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let DocumentUpdateRequest { id, patch } = payload.into_inner();
    if patch.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }
    state.store.find(&owner, &id).await?;
    if patch.content.is_some() {
        state.autosave.discard(&owner, &id).await;
    }

    state.store.update(&owner, &id, patch).await?;
    info!(document_id = %id, owner = %owner, "document updated");
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}
#[delete("/documents")]
pub async fn delete_document(
    state: web::Data<AppState>,
    query: web::Query<DocumentQueryParams>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let id = query.into_inner().id;

    state.store.find(&owner, &id).await?;
    state.autosave.discard(&owner, &id).await;
    state.store.delete(&owner, &id).await?;
    info!(document_id = %id, owner = %owner, "document deleted");
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}
#[get("/documents/{document_id}")]
pub async fn get_document(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let document = state.store.find(&owner, &document_id).await?;
    state.autosave.flush(&document_id).await?;
    let document = state.store.find(&owner, &document.id).await?;
    Ok(HttpResponse::Ok().json(document))
}
#[put("/documents/{document_id}/content")]
pub async fn autosave_content(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
    payload: web::Json<ContentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let document = state.store.find(&owner, &document_id).await?;

    state
        .autosave
        .queue(&owner, &document.id, payload.into_inner().content)
        .await;
    Ok(HttpResponse::Accepted().json(json!({ "id": document.id, "queued": true })))
}
#[post("/documents/{document_id}/regenerate")]
pub async fn regenerate_document(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let owner = issuer(&req)?;
    let document = state.store.find(&owner, &document_id).await?;
    let data: DocumentData = serde_json::from_value(document.payload)
        .map_err(|_| AppError::BadRequest("Document has no regenerable payload".to_string()))?;
    if data.kind() != document.kind {
        return Err(AppError::BadRequest(
            "Document payload does not match its type".to_string(),
        ));
    }

    let html = assemble(&data);
    state.autosave.discard(&owner, &document.id).await;
    state
        .store
        .update(
            &owner,
            &document.id,
            DocumentPatch {
                content: Some(html.clone()),
                ..DocumentPatch::default()
            },
        )
        .await?;
    info!(document_id = %document.id, owner = %owner, "document regenerated");
    Ok(HttpResponse::Ok().json(json!({ "id": document.id, "html": html })))
}

#[cfg(test)]
mod tests {
    use crate::models::document::DocumentStore;
    use crate::routes::{build_app, test_support::*};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};
    use std::time::Duration;

    #[actix_web::test]
    async fn crud_round_trip_is_owner_scoped() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;

        let req = test::TestRequest::post()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "name": "Site A", "content": "<p>a</p>", "payload": {}, "type": "COSHH" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;
        let id = created["id"].as_str().unwrap_or_default().to_string();
        assert!(created["createdAt"].is_string());

        let req = test::TestRequest::get()
            .uri("/documents")
            .insert_header(bearer("bob"))
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed, json!([]));

        let req = test::TestRequest::put()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "id": id, "name": "Site A (rev 2)" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/documents/{id}"))
            .insert_header(bearer("alice"))
            .to_request();
        let document: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(document["name"], "Site A (rev 2)");
        assert_eq!(document["type"], "COSHH");

        let req = test::TestRequest::delete()
            .uri(&format!("/documents?id={id}"))
            .insert_header(bearer("bob"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/documents?id={id}"))
            .insert_header(bearer("alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn invalid_ids_and_empty_updates_are_bad_requests() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;

        let req = test::TestRequest::get()
            .uri("/documents/not-an-id")
            .insert_header(bearer("alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "id": "0123456789abcdef01234567" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn autosaved_content_is_visible_on_fetch() {
        let (store, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;

        let req = test::TestRequest::post()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "name": "Doc", "content": "<p>v1</p>", "type": "RAMS" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap_or_default().to_string();

        for version in 2..=4 {
            let req = test::TestRequest::put()
                .uri(&format!("/documents/{id}/content"))
                .insert_header(bearer("alice"))
                .set_json(json!({ "content": format!("<p>v{version}</p>") }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::ACCEPTED);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/documents/{id}"))
            .insert_header(bearer("alice"))
            .to_request();
        let document: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(document["content"], "<p>v4</p>");

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(store.update_count(), 1);
    }

    #[actix_web::test]
    async fn other_users_cannot_drop_a_pending_edit() {
        let (store, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;

        let req = test::TestRequest::post()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "name": "Doc", "content": "<p>v1</p>", "type": "RAMS" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap_or_default().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/documents/{id}/content"))
            .insert_header(bearer("alice"))
            .set_json(json!({ "content": "<p>alice edit</p>" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::ACCEPTED);

        let req = test::TestRequest::put()
            .uri("/documents")
            .insert_header(bearer("bob"))
            .set_json(json!({ "id": id, "content": "<p>bob</p>" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/documents?id={id}"))
            .insert_header(bearer("bob"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let document = store.find("alice", &id).await.expect("find");
        assert_eq!(document.content, "<p>alice edit</p>");
    }

    #[actix_web::test]
    async fn regenerate_rebuilds_html_from_the_payload() {
        let (_, state) = state();
        let app = test::init_service(build_app(state, verifier(), 1 << 20)).await;

        let payload = json!({
            "type": "TOOLBOX",
            "data": { "topic": "silica dust", "presenter": "Jo", "attendees": "2" },
        });
        let req = test::TestRequest::post()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "name": "Talk", "content": "<p>edited by hand</p>", "payload": payload, "type": "TOOLBOX" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap_or_default().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/documents/{id}/regenerate"))
            .insert_header(bearer("alice"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["html"].as_str().unwrap_or_default().contains("Silica Dust"));

        let req = test::TestRequest::post()
            .uri("/documents")
            .insert_header(bearer("alice"))
            .set_json(json!({ "name": "Blank", "content": "<p>x</p>", "type": "RAMS" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::post()
            .uri(&format!("/documents/{}/regenerate", created["id"].as_str().unwrap_or_default()))
            .insert_header(bearer("alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
