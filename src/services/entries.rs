use crate::db::Db;
use crate::error::AppError;
use crate::models::entry::*;
use crate::models::leaderboard::Leaderboard;
use crate::services::store::{self, with_store};
use crate::validation;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;

const ENTRY_SUFFIX_LEN: usize = 9;

fn generate_entry_id() -> String {
    format!(
        "entry-{}-{}",
        Utc::now().timestamp_millis(),
        store::generate_code(ENTRY_SUFFIX_LEN)
    )
}

fn leaderboard_ref(lb: Leaderboard) -> EntryLeaderboardRef {
    EntryLeaderboardRef {
        id: lb.id,
        view_id: lb.view_id,
        edit_id: lb.edit_id,
        title: lb.title,
        entries: lb.entries,
    }
}

fn find_entry(lb: &Leaderboard, entry_id: &str) -> Result<usize, AppError> {
    lb.entries
        .iter()
        .position(|e| e.id == entry_id)
        .ok_or_else(|| AppError::NotFound("Entry not found".into()))
}

/// Appends a new entry. `metadata` from the request becomes the entry's
/// `data` bag; unknown top-level keys are kept as top-level fields.
pub fn add_entry(db: &Db, key: &str, req: NewEntry) -> Result<EntryMutationResult, AppError> {
    let score = req.score.unwrap_or(Value::Null);
    validation::validate_score(&score)?;
    let score = if score.is_null() { Value::from(0) } else { score };

    let mut fields: Map<String, Value> = req.extra;
    for reserved in ["id", RANK_FIELD, "createdAt", "updatedAt"] {
        fields.remove(reserved);
    }
    if let Some(name) = req.name {
        fields.insert("name".into(), Value::from(validation::validate_entry_name(&name)?));
    }
    fields.insert("score".into(), score);
    if let Some(avatar) = req.avatar {
        fields.insert("avatar".into(), Value::from(avatar));
    }
    fields.insert("createdAt".into(), Value::from(store::now_iso()));

    let entry = Entry {
        id: generate_entry_id(),
        data: Some(req.metadata.or(req.data).unwrap_or_default()),
        metadata: None,
        fields,
    };

    with_store(db, |conn| {
        let mut lb = store::require_leaderboard(conn, key)?;
        validation::validate_required_columns(&entry, &lb.columns)?;
        lb.entries.push(entry.clone());
        lb.updated_at = store::save_entries(conn, &lb.id, &lb.entries)?;
        info!(leaderboard = %lb.id, entry = %entry.id, "entry added");
        Ok(EntryMutationResult {
            success: true,
            entry,
            leaderboard: leaderboard_ref(lb),
        })
    })
}

/// Shallow-merges `patch` over the stored entry. `data` and `metadata` in
/// the patch replace the whole bag. The id cannot change and `rank` is
/// ignored.
pub fn update_entry(
    db: &Db,
    key: &str,
    entry_id: &str,
    mut patch: Map<String, Value>,
) -> Result<EntryMutationResult, AppError> {
    match patch.remove("id") {
        Some(Value::String(id)) if id != entry_id => {
            return Err(AppError::BadRequest("Entry ID cannot be changed".into()));
        }
        Some(Value::String(_)) | None => {}
        Some(_) => return Err(AppError::BadRequest("Entry ID cannot be changed".into())),
    }
    patch.remove(RANK_FIELD);
    if let Some(score) = patch.get("score") {
        validation::validate_score(score)?;
    }
    if let Some(Value::String(name)) = patch.get("name") {
        let name = validation::validate_entry_name(name)?;
        patch.insert("name".into(), Value::from(name));
    }
    patch.insert("updatedAt".into(), Value::from(store::now_iso()));

    with_store(db, |conn| {
        let mut lb = store::require_leaderboard(conn, key)?;
        let index = find_entry(&lb, entry_id)?;

        let mut merged = match serde_json::to_value(&lb.entries[index])? {
            Value::Object(map) => map,
            _ => return Err(AppError::Internal("Entry did not serialize to an object".into())),
        };
        merged.extend(patch);
        let updated: Entry = serde_json::from_value(Value::Object(merged))
            .map_err(|e| AppError::BadRequest(format!("Invalid entry update: {}", e)))?;

        lb.entries[index] = updated.clone();
        lb.updated_at = store::save_entries(conn, &lb.id, &lb.entries)?;
        info!(leaderboard = %lb.id, entry = %entry_id, "entry updated");
        Ok(EntryMutationResult {
            success: true,
            entry: updated,
            leaderboard: leaderboard_ref(lb),
        })
    })
}

pub fn remove_entry(db: &Db, key: &str, entry_id: &str) -> Result<EntryRemovalResult, AppError> {
    with_store(db, |conn| {
        let mut lb = store::require_leaderboard(conn, key)?;
        let index = find_entry(&lb, entry_id)?;
        let removed_entry = lb.entries.remove(index);
        lb.updated_at = store::save_entries(conn, &lb.id, &lb.entries)?;
        info!(leaderboard = %lb.id, entry = %entry_id, "entry removed");
        Ok(EntryRemovalResult {
            success: true,
            removed_entry,
            leaderboard: leaderboard_ref(lb),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::resolve_value;
    use crate::services::leaderboards::{create_scoreboard, get_leaderboard};
    use serde_json::json;

    fn new_entry(body: Value) -> NewEntry {
        serde_json::from_value(body).unwrap()
    }

    fn patch(body: Value) -> Map<String, Value> {
        match body {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    #[test]
    fn test_add_entry_defaults_and_metadata() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("ann", 10)]);

        let result = add_entry(
            &db,
            &lb.view_id,
            new_entry(json!({"name": "  Dee ", "metadata": {"kills": 4}, "region": "EU"})),
        )
        .unwrap();
        assert!(result.success);

        let entry = &result.entry;
        assert!(entry.id.starts_with("entry-"));
        assert_eq!(entry.id.rsplit('-').next().unwrap().len(), ENTRY_SUFFIX_LEN);
        assert_eq!(resolve_value(entry, "name"), Some(&json!("Dee")));
        assert_eq!(resolve_value(entry, "score"), Some(&json!(0)));
        assert_eq!(resolve_value(entry, "kills"), Some(&json!(4)));
        assert_eq!(resolve_value(entry, "region"), Some(&json!("EU")));
        assert!(entry.fields.contains_key("createdAt"));
        assert_eq!(result.leaderboard.entries.len(), 2);
    }

    #[test]
    fn test_add_entry_ranks_on_next_read() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("ann", 10), ("bob", 50)]);
        add_entry(&db, &lb.edit_id, new_entry(json!({"name": "cy", "score": 30}))).unwrap();

        let fetched = get_leaderboard(&db, &lb.id).unwrap();
        let scores: Vec<_> = fetched
            .entries
            .iter()
            .map(|e| resolve_value(&e.entry, "score").cloned().unwrap())
            .collect();
        assert_eq!(scores, vec![json!(50), json!(30), json!(10)]);
    }

    #[test]
    fn test_add_entry_rejects_non_numeric_score() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[]);
        let err = add_entry(&db, &lb.id, new_entry(json!({"score": "lots"}))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_update_entry_merges_fields() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("ann", 10), ("bob", 50)]);

        let result = update_entry(
            &db,
            &lb.id,
            "ann",
            patch(json!({"score": 75, "rank": 1, "data": {"team": "Red"}})),
        )
        .unwrap();
        assert_eq!(resolve_value(&result.entry, "score"), Some(&json!(75)));
        assert_eq!(resolve_value(&result.entry, "name"), Some(&json!("ann")));
        assert_eq!(resolve_value(&result.entry, "team"), Some(&json!("Red")));
        assert!(!result.entry.fields.contains_key(RANK_FIELD));
        assert!(result.entry.fields.contains_key("updatedAt"));

        let fetched = get_leaderboard(&db, &lb.id).unwrap();
        assert_eq!(fetched.entries[0].entry.id, "ann");
        assert_eq!(fetched.entries[0].rank, 1);
    }

    #[test]
    fn test_update_entry_cannot_change_id() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("ann", 10)]);
        let err = update_entry(&db, &lb.id, "ann", patch(json!({"id": "zed"}))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        // Repeating the current id is allowed.
        update_entry(&db, &lb.id, "ann", patch(json!({"id": "ann", "score": 1}))).unwrap();
    }

    #[test]
    fn test_update_entry_rejects_malformed_bag() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("ann", 10)]);
        let err = update_entry(&db, &lb.id, "ann", patch(json!({"data": "oops"}))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("ann", 10)]);
        let err = update_entry(&db, &lb.id, "ghost", patch(json!({"score": 1}))).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = remove_entry(&db, &lb.id, "ghost").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_remove_entry() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("ann", 10), ("bob", 50)]);
        let result = remove_entry(&db, &lb.view_id, "bob").unwrap();
        assert_eq!(result.removed_entry.id, "bob");
        assert_eq!(result.leaderboard.entries.len(), 1);

        let fetched = get_leaderboard(&db, &lb.id).unwrap();
        assert_eq!(fetched.entries.len(), 1);
        assert_eq!(fetched.entries[0].entry.id, "ann");
    }
}
