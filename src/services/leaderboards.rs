use crate::db::Db;
use crate::error::AppError;
use crate::models::entry::RANK_FIELD;
use crate::models::leaderboard::*;
use crate::ranking;
use crate::services::store::{self, with_store};
use crate::validation;
use serde_json::Value;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

const ACCESS_KEY_LEN: usize = 10;

pub fn list_leaderboards(db: &Db) -> Result<Vec<LeaderboardSummary>, AppError> {
    let leaderboards = with_store(db, store::list_leaderboards)?;
    Ok(leaderboards
        .into_iter()
        .map(|lb| LeaderboardSummary {
            entry_count: lb.entries.len(),
            id: lb.id,
            view_id: lb.view_id,
            edit_id: lb.edit_id,
            title: lb.title,
            subheading: lb.subheading,
            description: lb.description,
            template_type: lb.template_type,
            start_date: lb.start_date,
            end_date: lb.end_date,
            created_at: lb.created_at,
            updated_at: lb.updated_at,
        })
        .collect())
}

/// Fetches a leaderboard by view key, edit key or id, with its entries
/// ranked by the sort column.
pub fn get_leaderboard(db: &Db, key: &str) -> Result<LeaderboardDetail, AppError> {
    let lb = with_store(db, |conn| store::require_leaderboard(conn, key))?;
    Ok(into_detail(lb))
}

pub fn into_detail(lb: Leaderboard) -> LeaderboardDetail {
    let sort_column = lb.sort_by_column.clone().unwrap_or_default();
    LeaderboardDetail {
        entries: ranking::rank_entries(lb.entries, &sort_column),
        id: lb.id,
        view_id: lb.view_id,
        edit_id: lb.edit_id,
        title: lb.title,
        subheading: lb.subheading,
        description: lb.description,
        url: lb.url,
        note: lb.note,
        template_type: lb.template_type,
        start_date: lb.start_date,
        end_date: lb.end_date,
        columns: lb.columns,
        sort_by_column: lb.sort_by_column,
        created_at: lb.created_at,
        updated_at: lb.updated_at,
    }
}

pub fn create_leaderboard(
    db: &Db,
    req: CreateLeaderboardRequest,
) -> Result<LeaderboardDetail, AppError> {
    let title = validation::validate_title(&req.title)?;
    let columns: Vec<Column> = req
        .columns
        .into_iter()
        .map(|mut column| {
            column.name = column.name.trim().to_string();
            column
        })
        .collect();
    validation::validate_columns(&columns)?;
    let sort_by_column = req
        .sort_by_column
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    validation::validate_sort_column(sort_by_column.as_deref(), &columns)?;
    validation::validate_template_type(req.template_type.as_deref())?;
    validation::validate_date("startDate", req.start_date.as_deref())?;
    validation::validate_date("endDate", req.end_date.as_deref())?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(req.entries.len());
    for mut entry in req.entries {
        if entry.id.trim().is_empty() {
            return Err(AppError::BadRequest("Entry ID cannot be empty".into()));
        }
        if !seen.insert(entry.id.clone()) {
            return Err(AppError::BadRequest(format!("Duplicate entry ID: {}", entry.id)));
        }
        entry.fields.remove(RANK_FIELD);
        if let Some(Value::String(name)) = entry.fields.get("name") {
            let name = validation::validate_entry_name(name)?;
            entry.fields.insert("name".into(), Value::from(name));
        }
        validation::validate_required_columns(&entry, &columns)?;
        entries.push(entry);
    }

    let now = store::now_iso();
    let lb = Leaderboard {
        id: Uuid::new_v4().simple().to_string(),
        view_id: store::generate_code(ACCESS_KEY_LEN),
        edit_id: store::generate_code(ACCESS_KEY_LEN),
        title,
        subheading: req.subheading,
        description: req.description,
        url: req.url,
        note: req.note,
        template_type: req
            .template_type
            .map(|t| t.trim().to_ascii_lowercase()),
        start_date: req.start_date,
        end_date: req.end_date,
        columns,
        sort_by_column,
        entries,
        created_at: now.clone(),
        updated_at: now,
    };

    with_store(db, |conn| store::insert_leaderboard(conn, &lb))?;
    info!(id = %lb.id, view_id = %lb.view_id, entries = lb.entries.len(), "leaderboard created");
    Ok(into_detail(lb))
}

/// Test helper shared by the service test modules.
#[cfg(test)]
pub fn create_scoreboard(db: &Db, scores: &[(&str, i64)]) -> LeaderboardDetail {
    let entries = scores
        .iter()
        .map(|(id, score)| {
            crate::models::entry::Entry::new(*id)
                .with_field("name", *id)
                .with_field("score", *score)
        })
        .collect();
    create_leaderboard(
        db,
        CreateLeaderboardRequest {
            title: "Weekly Cup".into(),
            subheading: None,
            description: None,
            url: None,
            note: None,
            template_type: Some("default".into()),
            start_date: None,
            end_date: None,
            columns: vec![
                Column::new("name", ColumnType::Text),
                Column {
                    sortable: true,
                    required: true,
                    display_name: Some("Points".into()),
                    ..Column::new("score", ColumnType::Number)
                },
            ],
            sort_by_column: Some("score".into()),
            entries,
        },
    )
    .unwrap()
}
