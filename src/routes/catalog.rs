use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{catalog::catalog, error::AppError};

#[get("/catalog/trades")]
pub async fn get_trades() -> HttpResponse {
    HttpResponse::Ok().json(catalog().trades())
}
#[get("/catalog/trades/{trade}/jobs")]
pub async fn get_jobs(trade: web::Path<String>) -> Result<HttpResponse, AppError> {
    // The router leaves encoded slashes alone; "Carpenter / Joiner" arrives with %2F.
    let name = trade.replace("%2F", "/").replace("%2f", "/");
    let trade = catalog().trade(&name).ok_or(AppError::NotFound("Trade"))?;
    Ok(HttpResponse::Ok().json(trade.jobs))
}
#[get("/catalog/hazards")]
pub async fn get_hazards() -> HttpResponse {
    let catalog = catalog();
    HttpResponse::Ok().json(json!({
        "hazards": catalog.hazards(),
        "groups": catalog.hazard_groups(),
    }))
}
#[get("/catalog/hazards/{key}")]
pub async fn get_hazard(key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let hazard = catalog().hazard_meta(&key).ok_or(AppError::NotFound("Hazard"))?;
    Ok(HttpResponse::Ok().json(hazard))
}
#[get("/catalog/substances")]
pub async fn get_substances() -> HttpResponse {
    HttpResponse::Ok().json(catalog().substance_library())
}
#[get("/catalog/ppe")]
pub async fn get_ppe() -> HttpResponse {
    HttpResponse::Ok().json(catalog().ppe_definitions())
}
#[get("/catalog/topics")]
pub async fn get_topics() -> HttpResponse {
    HttpResponse::Ok().json(catalog().topics())
}
