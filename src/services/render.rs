//! Server-side render model for the leaderboard templates.

use crate::db::Db;
use crate::error::AppError;
use crate::models::entry::RankedEntry;
use crate::models::leaderboard::{Column, ColumnType, Leaderboard, ViewQuery};
use crate::models::render::*;
use crate::ranking::{self, column_display_name, format_value, resolve_ranked};
use crate::services::store::{self, with_store};
use crate::templates::{TemplateKind, DEFAULT_MAX_ENTRIES};
use serde_json::Value;

const PODIUM_SIZE: usize = 3;

pub fn get_leaderboard_view(
    db: &Db,
    key: &str,
    query: &ViewQuery,
) -> Result<RenderedLeaderboard, AppError> {
    let lb = with_store(db, |conn| store::require_leaderboard(conn, key))?;
    let kind = TemplateKind::resolve(query.template.as_deref().or(lb.template_type.as_deref()));
    Ok(render_leaderboard(lb, kind, query.limit))
}

pub fn render_leaderboard(
    lb: Leaderboard,
    kind: TemplateKind,
    limit: Option<usize>,
) -> RenderedLeaderboard {
    let template = kind.config();
    let limit = limit.filter(|&n| n > 0).unwrap_or(DEFAULT_MAX_ENTRIES);
    let sort_column = lb.sort_by_column.clone().unwrap_or_default();

    let primary = lb.columns.iter().find(|c| c.name == sort_column);
    let image = lb.columns.iter().find(|c| c.kind == ColumnType::Image);

    let ranked = ranking::rank_entries(lb.entries, &sort_column);
    let total_entries = ranked.len();

    let rows: Vec<RenderedRow> = ranked
        .iter()
        .take(limit)
        .map(|entry| render_row(entry, &lb.columns, &sort_column, primary, image))
        .collect();

    let podium = if template.podium {
        rows.iter().take(PODIUM_SIZE).cloned().collect()
    } else {
        Vec::new()
    };

    RenderedLeaderboard {
        title: lb.title,
        subheading: lb.subheading,
        description: lb.description,
        template,
        primary_display_name: primary.map(column_display_name),
        sort_by_column: lb.sort_by_column,
        headers: lb.columns.iter().map(column_display_name).collect(),
        podium,
        rows,
        total_entries,
    }
}

fn render_row(
    entry: &RankedEntry,
    columns: &[Column],
    sort_column: &str,
    primary: Option<&Column>,
    image: Option<&Column>,
) -> RenderedRow {
    let rank = entry.rank;

    let name = match resolve_ranked(entry, "name") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => format!("Player {}", rank),
    };

    let avatar = image
        .and_then(|c| resolve_ranked(entry, &c.name))
        .or_else(|| resolve_ranked(entry, "avatar"))
        .and_then(|v| v.as_str().map(str::to_string));

    let (primary_value, primary_short) = if sort_column.is_empty() {
        (format_value(None, ColumnType::Text), None)
    } else {
        let value = resolve_ranked(entry, sort_column);
        let kind = primary.map(|c| c.kind).unwrap_or(ColumnType::Custom);
        let short = value.as_ref().and_then(Value::as_f64).map(ranking::format_score);
        (format_value(value.as_ref(), kind), short)
    };

    let cells = columns
        .iter()
        .map(|column| RenderedCell {
            column: column.name.clone(),
            display_name: column_display_name(column),
            value: format_value(resolve_ranked(entry, &column.name).as_ref(), column.kind),
        })
        .collect();

    RenderedRow {
        id: entry.entry.id.clone(),
        rank,
        rank_label: format!("{}{}", rank, ranking::rank_suffix(rank)),
        medal: Medal::for_rank(rank),
        highlighted: rank as usize <= PODIUM_SIZE,
        name,
        avatar,
        primary_value,
        primary_short,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::Entry;
    use crate::services::leaderboards::create_scoreboard;

    fn gaming_board(entries: Vec<Entry>) -> Leaderboard {
        Leaderboard {
            id: "lb".into(),
            view_id: "view".into(),
            edit_id: "edit".into(),
            title: "Arena".into(),
            subheading: Some("Season 1".into()),
            description: None,
            url: None,
            note: None,
            template_type: Some("gaming".into()),
            start_date: None,
            end_date: None,
            columns: vec![
                Column {
                    display_name: Some("Total Score".into()),
                    ..Column::new("score", ColumnType::Number)
                },
                Column::new("region", ColumnType::Text),
                Column::new("lastActive", ColumnType::Date),
                Column::new("picture", ColumnType::Image),
                Column::new("rank", ColumnType::Text),
            ],
            sort_by_column: Some("score".into()),
            entries,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn test_rows_are_ranked_and_formatted() {
        let board = gaming_board(vec![
            Entry::new("p1")
                .with_field("name", "Low")
                .with_field("score", 1200)
                .with_data("region", "EU"),
            Entry::new("p2")
                .with_field("score", 25000)
                .with_field("picture", "https://img/p2.png")
                .with_metadata("lastActive", "2024-05-01T08:00:00Z")
                .with_data("rank", "Gold"),
        ]);
        let view = render_leaderboard(board, TemplateKind::Gaming, None);

        assert_eq!(view.total_entries, 2);
        assert_eq!(view.primary_display_name.as_deref(), Some("Total Score"));
        assert_eq!(view.headers, vec!["Total Score", "Region", "LastActive", "Picture", "Rank"]);
        assert!(view.podium.is_empty());

        let top = &view.rows[0];
        assert_eq!(top.id, "p2");
        assert_eq!(top.rank_label, "1st");
        assert_eq!(top.medal, Some(Medal::Gold));
        assert!(top.highlighted);
        assert_eq!(top.name, "Player 1");
        assert_eq!(top.avatar.as_deref(), Some("https://img/p2.png"));
        assert_eq!(top.primary_value, "25,000");
        assert_eq!(top.primary_short.as_deref(), Some("25.0K"));
        let values: Vec<_> = top.cells.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["25,000", "-", "5/1/2024", "https://img/p2.png", "1"]);

        let second = &view.rows[1];
        assert_eq!(second.name, "Low");
        assert_eq!(second.rank_label, "2nd");
        assert_eq!(second.cells[1].value, "EU");
    }

    #[test]
    fn test_limit_truncates_rows_but_not_total() {
        let entries = (0..10)
            .map(|i| Entry::new(format!("e{i}")).with_field("score", i))
            .collect();
        let view = render_leaderboard(gaming_board(entries), TemplateKind::Gaming, Some(4));
        assert_eq!(view.rows.len(), 4);
        assert_eq!(view.total_entries, 10);
        assert_eq!(view.rows[3].rank, 4);
        assert_eq!(view.rows[3].medal, None);
        assert!(!view.rows[3].highlighted);
    }

    #[test]
    fn test_compact_template_has_podium() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        let query = ViewQuery {
            template: Some("compact".into()),
            limit: None,
        };
        let view = get_leaderboard_view(&db, &lb.view_id, &query).unwrap();
        assert_eq!(view.template.id, TemplateKind::Compact);
        let podium: Vec<_> = view.podium.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(podium, vec!["d", "c", "b"]);
    }

    #[test]
    fn test_unknown_template_falls_back_to_default() {
        let db = Db::open_in_memory().unwrap();
        let lb = create_scoreboard(&db, &[("a", 1)]);
        let query = ViewQuery {
            template: Some("holographic".into()),
            limit: None,
        };
        let view = get_leaderboard_view(&db, &lb.id, &query).unwrap();
        assert_eq!(view.template.id, TemplateKind::Default);
        assert_eq!(view.rows[0].primary_value, "1");
    }

    #[test]
    fn test_without_sort_column_rows_keep_insertion_order() {
        let mut board = gaming_board(vec![
            Entry::new("first").with_field("score", 1),
            Entry::new("second").with_field("score", 9),
        ]);
        board.sort_by_column = None;
        let view = render_leaderboard(board, TemplateKind::Default, None);
        let ids: Vec<_> = view.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert_eq!(view.rows[0].primary_value, "-");
        assert_eq!(view.primary_display_name, None);
    }
}
