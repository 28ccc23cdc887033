use crate::db::Db;
use crate::error::AppError;
use crate::models::entry::NewEntry;
use crate::services::entries as service;
use ntex::web::{self, HttpResponse};
use serde_json::{Map, Value};
use std::sync::Arc;

pub async fn add_entry(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
    body: web::types::Json<NewEntry>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();
    let result = service::add_entry(&db, &key, body.into_inner())?;
    Ok(HttpResponse::Ok().json(&result))
}

pub async fn update_entry(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<(String, String)>,
    body: web::types::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let (key, entry_id) = path.into_inner();
    let result = service::update_entry(&db, &key, &entry_id, body.into_inner())?;
    Ok(HttpResponse::Ok().json(&result))
}

pub async fn remove_entry(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (key, entry_id) = path.into_inner();
    let result = service::remove_entry(&db, &key, &entry_id)?;
    Ok(HttpResponse::Ok().json(&result))
}
