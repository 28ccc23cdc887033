use crate::db::Db;
use crate::error::AppError;
use crate::models::leaderboard::*;
use crate::services::leaderboards as service;
use crate::services::render;
use crate::templates;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn list_leaderboards(
    db: web::types::State<Arc<Db>>,
) -> Result<HttpResponse, AppError> {
    let leaderboards = service::list_leaderboards(&db)?;
    Ok(HttpResponse::Ok().json(&leaderboards))
}

pub async fn create_leaderboard(
    db: web::types::State<Arc<Db>>,
    body: web::types::Json<CreateLeaderboardRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let created = service::create_leaderboard(&db, req)?;
    Ok(HttpResponse::Created().json(&created))
}

pub async fn get_leaderboard(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();
    let leaderboard = service::get_leaderboard(&db, &key)?;
    Ok(HttpResponse::Ok().json(&leaderboard))
}

pub async fn get_leaderboard_view(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
    query: web::types::Query<ViewQuery>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();
    let view = render::get_leaderboard_view(&db, &key, &query)?;
    Ok(HttpResponse::Ok().json(&view))
}

pub async fn list_templates() -> HttpResponse {
    HttpResponse::Ok().json(&templates::all_templates())
}
