//! Row-level access to the `leaderboards` table.
//!
//! `columns` and `entries` are stored as JSON text and normalized into typed
//! vectors on the way out.

use crate::db::Db;
use crate::error::AppError;
use crate::models::entry::Entry;
use crate::models::leaderboard::Leaderboard;
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

const SELECT_COLUMNS: &str = "id, view_id, edit_id, title, subheading, description, url, note,
     template_type, start_date, end_date, columns, sort_by_column, entries,
     created_at, updated_at";

const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Runs `f` under the connection lock, letting it fail with any [`AppError`].
pub fn with_store<F, T>(db: &Db, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Connection) -> Result<T, AppError>,
{
    db.with_conn(|conn| Ok(f(conn)))?
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Random lowercase base36 string, used for view/edit keys and entry ids.
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Raw row as read from SQLite, before JSON decoding.
struct StoredRow {
    id: String,
    view_id: String,
    edit_id: String,
    title: String,
    subheading: Option<String>,
    description: Option<String>,
    url: Option<String>,
    note: Option<String>,
    template_type: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    columns: Option<String>,
    sort_by_column: Option<String>,
    entries: Option<String>,
    created_at: String,
    updated_at: String,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(StoredRow {
            id: row.get(0)?,
            view_id: row.get(1)?,
            edit_id: row.get(2)?,
            title: row.get(3)?,
            subheading: row.get(4)?,
            description: row.get(5)?,
            url: row.get(6)?,
            note: row.get(7)?,
            template_type: row.get(8)?,
            start_date: row.get(9)?,
            end_date: row.get(10)?,
            columns: row.get(11)?,
            sort_by_column: row.get(12)?,
            entries: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }

    fn decode(self) -> Result<Leaderboard, AppError> {
        Ok(Leaderboard {
            columns: decode_json_array(self.columns.as_deref())?,
            entries: decode_json_array(self.entries.as_deref())?,
            id: self.id,
            view_id: self.view_id,
            edit_id: self.edit_id,
            title: self.title,
            subheading: self.subheading,
            description: self.description,
            url: self.url,
            note: self.note,
            template_type: self.template_type,
            start_date: self.start_date,
            end_date: self.end_date,
            sort_by_column: self.sort_by_column,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Decodes a stored JSON list.
///
/// NULL and empty text are an empty list. A JSON string holding a serialized
/// array (double-encoded by an older writer) is decoded once more.
pub fn decode_json_array<T: DeserializeOwned>(raw: Option<&str>) -> Result<Vec<T>, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") | Some("null") => return Ok(Vec::new()),
        Some(s) => s,
    };
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => Ok(serde_json::from_value(Value::Array(items))?),
        Value::String(inner) => decode_json_array(Some(&inner)),
        Value::Null => Ok(Vec::new()),
        _ => Err(AppError::Internal("Stored list is not a JSON array".into())),
    }
}

/// Looks a leaderboard up by public view key, then private edit key, then
/// internal id.
pub fn find_leaderboard(conn: &Connection, key: &str) -> Result<Option<Leaderboard>, AppError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM leaderboards
         WHERE view_id = ?1 OR edit_id = ?1 OR id = ?1
         ORDER BY CASE WHEN view_id = ?1 THEN 0 WHEN edit_id = ?1 THEN 1 ELSE 2 END
         LIMIT 1"
    );
    let row = conn
        .query_row(&sql, params![key], StoredRow::from_row)
        .optional()?;
    row.map(StoredRow::decode).transpose()
}

pub fn require_leaderboard(conn: &Connection, key: &str) -> Result<Leaderboard, AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::BadRequest("Leaderboard ID is required".into()));
    }
    find_leaderboard(conn, key)?.ok_or_else(|| AppError::NotFound("Leaderboard not found".into()))
}

/// All leaderboards, newest first. Rows whose JSON cannot be decoded are
/// still listed, with no columns or entries.
pub fn list_leaderboards(conn: &Connection) -> Result<Vec<Leaderboard>, AppError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM leaderboards ORDER BY created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], StoredRow::from_row)?;

    let mut leaderboards = Vec::new();
    for row in rows {
        let mut row = row?;
        let id = row.id.clone();
        let columns = row.columns.take();
        let entries = row.entries.take();
        let mut leaderboard = row.decode()?;
        leaderboard.columns = decode_json_array(columns.as_deref()).unwrap_or_else(|e| {
            warn!(leaderboard = %id, error = %e, "unreadable columns");
            Vec::new()
        });
        leaderboard.entries = decode_json_array(entries.as_deref()).unwrap_or_else(|e| {
            warn!(leaderboard = %id, error = %e, "unreadable entries");
            Vec::new()
        });
        leaderboards.push(leaderboard);
    }
    Ok(leaderboards)
}

pub fn insert_leaderboard(conn: &Connection, lb: &Leaderboard) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO leaderboards (id, view_id, edit_id, title, subheading, description, url,
         note, template_type, start_date, end_date, columns, sort_by_column, entries,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            lb.id,
            lb.view_id,
            lb.edit_id,
            lb.title,
            lb.subheading,
            lb.description,
            lb.url,
            lb.note,
            lb.template_type,
            lb.start_date,
            lb.end_date,
            serde_json::to_string(&lb.columns)?,
            lb.sort_by_column,
            serde_json::to_string(&lb.entries)?,
            lb.created_at,
            lb.updated_at,
        ],
    )?;
    Ok(())
}

/// Replaces the stored entry list and bumps `updated_at`.
pub fn save_entries(conn: &Connection, id: &str, entries: &[Entry]) -> Result<String, AppError> {
    let updated_at = now_iso();
    conn.execute(
        "UPDATE leaderboards SET entries = ?1, updated_at = ?2 WHERE id = ?3",
        params![serde_json::to_string(entries)?, updated_at, id],
    )?;
    Ok(updated_at)
}

pub fn count_leaderboards(conn: &Connection) -> Result<i64, AppError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM leaderboards", [], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leaderboard::Column;

    #[test]
    fn test_decode_json_array_normalizes_storage_forms() {
        let empty: Vec<Entry> = decode_json_array(None).unwrap();
        assert!(empty.is_empty());
        let empty: Vec<Entry> = decode_json_array(Some("  ")).unwrap();
        assert!(empty.is_empty());

        let direct: Vec<Entry> = decode_json_array(Some(r#"[{"id":"a","score":3}]"#)).unwrap();
        assert_eq!(direct[0].id, "a");

        let doubled: Vec<Entry> =
            decode_json_array(Some(r#""[{\"id\":\"b\",\"data\":{\"score\":1}}]""#)).unwrap();
        assert_eq!(doubled[0].id, "b");
        assert!(doubled[0].data.is_some());

        let columns: Result<Vec<Column>, _> = decode_json_array(Some(r#"{"name":"x"}"#));
        assert!(columns.is_err());
    }

    #[test]
    fn test_generate_code_alphabet() {
        let code = generate_code(9);
        assert_eq!(code.len(), 9);
        assert!(code.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let db = Db::open_in_memory().unwrap();
        let err = with_store(&db, |conn| require_leaderboard(conn, "nope")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = with_store(&db, |conn| require_leaderboard(conn, " ")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
