use crate::error::AppError;
use crate::models::entry::Entry;
use crate::models::leaderboard::Column;
use crate::ranking::resolve_value;
use crate::ranking::resolver::parse_date;
use crate::templates::TemplateKind;
use serde_json::Value;
use std::collections::HashSet;

const MAX_TITLE_LEN: usize = 120;
const MAX_ENTRY_NAME_LEN: usize = 64;
const MAX_COLUMNS: usize = 32;
const MAX_COLUMN_NAME_LEN: usize = 64;

pub fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(AppError::BadRequest("Title is required".into()))
    } else if trimmed.chars().count() > MAX_TITLE_LEN {
        Err(AppError::BadRequest(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn validate_columns(columns: &[Column]) -> Result<(), AppError> {
    if columns.len() > MAX_COLUMNS {
        return Err(AppError::BadRequest(format!(
            "At most {} columns are allowed",
            MAX_COLUMNS
        )));
    }
    let mut seen = HashSet::new();
    for column in columns {
        let name = column.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Column name cannot be empty".into()));
        }
        if name.len() > MAX_COLUMN_NAME_LEN {
            return Err(AppError::BadRequest(format!("Column name too long: {}", name)));
        }
        if !seen.insert(name) {
            return Err(AppError::BadRequest(format!("Duplicate column: {}", name)));
        }
    }
    Ok(())
}

pub fn validate_sort_column(sort_column: Option<&str>, columns: &[Column]) -> Result<(), AppError> {
    match sort_column {
        None | Some("") => Ok(()),
        Some(name) if columns.iter().any(|c| c.name == name) => Ok(()),
        Some(name) => Err(AppError::BadRequest(format!(
            "Sort column is not a column of this leaderboard: {}",
            name
        ))),
    }
}

pub fn validate_template_type(template_type: Option<&str>) -> Result<(), AppError> {
    match template_type {
        None => Ok(()),
        Some(key) if TemplateKind::parse(key).is_some() => Ok(()),
        Some(key) => Err(AppError::BadRequest(format!("Invalid template type: {}", key))),
    }
}

pub fn validate_date(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(s) if parse_date(s).is_none() => {
            Err(AppError::BadRequest(format!("Invalid {}: {}", field, s)))
        }
        _ => Ok(()),
    }
}

pub fn validate_entry_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.chars().count() > MAX_ENTRY_NAME_LEN {
        Err(AppError::BadRequest(format!(
            "Entry name must be at most {} characters",
            MAX_ENTRY_NAME_LEN
        )))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn validate_score(score: &Value) -> Result<(), AppError> {
    match score {
        Value::Number(_) | Value::Null => Ok(()),
        _ => Err(AppError::BadRequest("Score must be a number".into())),
    }
}

/// Every `required` column must resolve to a non-null value on the entry.
pub fn validate_required_columns(entry: &Entry, columns: &[Column]) -> Result<(), AppError> {
    let missing: Vec<&str> = columns
        .iter()
        .filter(|c| c.required)
        .filter(|c| matches!(resolve_value(entry, &c.name), None | Some(Value::Null)))
        .map(|c| c.name.as_str())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leaderboard::ColumnType;
    use serde_json::json;

    #[test]
    fn test_title_is_trimmed_and_required() {
        assert_eq!(validate_title("  Weekly Cup ").unwrap(), "Weekly Cup");
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let columns = vec![
            Column::new("score", ColumnType::Number),
            Column::new("score", ColumnType::Text),
        ];
        assert!(validate_columns(&columns).is_err());
        assert!(validate_columns(&columns[..1]).is_ok());
        assert!(validate_columns(&[Column::new(" ", ColumnType::Text)]).is_err());
    }

    #[test]
    fn test_sort_column_must_exist() {
        let columns = vec![Column::new("score", ColumnType::Number)];
        assert!(validate_sort_column(Some("score"), &columns).is_ok());
        assert!(validate_sort_column(None, &columns).is_ok());
        assert!(validate_sort_column(Some(""), &columns).is_ok());
        assert!(validate_sort_column(Some("kills"), &columns).is_err());
    }

    #[test]
    fn test_template_and_dates() {
        assert!(validate_template_type(Some("gaming")).is_ok());
        assert!(validate_template_type(Some("retro")).is_err());
        assert!(validate_date("startDate", Some("2024-01-01")).is_ok());
        assert!(validate_date("startDate", Some("yesterday")).is_err());
        assert!(validate_date("startDate", Some("3-1-2")).is_err());
        assert!(validate_date("endDate", None).is_ok());
    }

    #[test]
    fn test_required_columns_resolve_anywhere() {
        let columns = vec![
            Column { required: true, ..Column::new("score", ColumnType::Number) },
            Column { required: true, ..Column::new("team", ColumnType::Text) },
            Column::new("region", ColumnType::Text),
        ];
        let entry = Entry::new("a").with_field("score", 0).with_metadata("team", "Red");
        assert!(validate_required_columns(&entry, &columns).is_ok());

        let entry = Entry::new("b").with_field("score", 0).with_data("team", Value::Null);
        let err = validate_required_columns(&entry, &columns).unwrap_err();
        assert!(err.to_string().contains("team"));
    }

    #[test]
    fn test_score_must_be_numeric() {
        assert!(validate_score(&json!(12.5)).is_ok());
        assert!(validate_score(&json!("12")).is_err());
    }
}
