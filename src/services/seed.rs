//! Demo data for an empty store.

use crate::db::Db;
use crate::error::AppError;
use crate::models::entry::Entry;
use crate::models::leaderboard::{Column, ColumnType, CreateLeaderboardRequest};
use crate::services::leaderboards::create_leaderboard;
use crate::services::store::{self, with_store};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

const REGIONS: &[&str] = &["NA", "EU", "Asia", "SA", "OCE"];
const TIERS: &[&str] = &["Bronze", "Silver", "Gold", "Platinum", "Diamond", "Master"];
const DEPARTMENTS: &[&str] = &["Computer Science", "Mathematics", "Physics", "Biology"];

fn column(name: &str, kind: ColumnType, display_name: &str) -> Column {
    Column {
        sortable: matches!(kind, ColumnType::Number | ColumnType::Date),
        display_name: Some(display_name.to_string()),
        ..Column::new(name, kind)
    }
}

fn required(mut column: Column) -> Column {
    column.required = true;
    column
}

fn random_day(rng: &mut impl Rng, from: NaiveDate, span_days: i64) -> String {
    (from + Duration::days(rng.gen_range(0..span_days)))
        .format("%Y-%m-%d")
        .to_string()
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn board(
    title: &str,
    subheading: &str,
    template: &str,
    columns: Vec<Column>,
    entries: Vec<Entry>,
) -> CreateLeaderboardRequest {
    CreateLeaderboardRequest {
        title: title.to_string(),
        subheading: Some(subheading.to_string()),
        description: None,
        url: None,
        note: None,
        template_type: Some(template.to_string()),
        start_date: None,
        end_date: None,
        columns,
        sort_by_column: Some("score".into()),
        entries,
    }
}

fn demo_boards(rng: &mut impl Rng) -> Vec<CreateLeaderboardRequest> {
    let season_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    let gaming = (1..=20)
        .map(|i| {
            Entry::new(format!("gaming-entry-{i}"))
                .with_field("name", format!("Player{i}"))
                .with_field("score", rng.gen_range(5_000..=25_000))
                .with_data("kills", rng.gen_range(10..=100))
                .with_data("deaths", rng.gen_range(5..=50))
                .with_metadata("tier", pick(rng, TIERS))
                .with_data("region", pick(rng, REGIONS))
                .with_data("lastActive", random_day(rng, season_start, 300))
        })
        .collect();

    let academic = (1..=15)
        .map(|i| {
            let gpa = (rng.gen_range(300..=400_i32) as f64) / 100.0;
            Entry::new(format!("academic-entry-{i}"))
                .with_field("name", format!("Student{i}"))
                .with_field("score", gpa)
                .with_data("department", pick(rng, DEPARTMENTS))
                .with_data("research", rng.gen_bool(0.5))
                .with_data("graduationDate", random_day(rng, season_start, 1200))
        })
        .collect();

    let sports = (1..=12)
        .map(|i| {
            let wins: i64 = rng.gen_range(5..=25);
            let losses: i64 = rng.gen_range(0..=20);
            Entry::new(format!("sports-entry-{i}"))
                .with_field("name", format!("Team{i}"))
                .with_field("score", wins * 2)
                .with_data("wins", wins)
                .with_data("losses", losses)
                .with_data("lastGame", random_day(rng, season_start, 120))
        })
        .collect();

    vec![
        board(
            "Gaming Tournament 2024",
            "Ultimate Battle Royale Championship",
            "gaming",
            vec![
                required(column("score", ColumnType::Number, "Total Score")),
                column("kills", ColumnType::Number, "Kills"),
                column("deaths", ColumnType::Number, "Deaths"),
                column("tier", ColumnType::Text, "Tier"),
                column("region", ColumnType::Text, "Region"),
                column("lastActive", ColumnType::Date, "Last Active"),
            ],
            gaming,
        ),
        board(
            "Academic Excellence",
            "Spring Semester 2024",
            "compact",
            vec![
                required(column("score", ColumnType::Number, "GPA")),
                required(column("department", ColumnType::Text, "Department")),
                column("research", ColumnType::Boolean, "Research Active"),
                column("graduationDate", ColumnType::Date, "Expected Graduation"),
            ],
            academic,
        ),
        board(
            "Sports Championship",
            "Regional Basketball League",
            "default",
            vec![
                required(column("score", ColumnType::Number, "Points")),
                column("wins", ColumnType::Number, "Wins"),
                column("losses", ColumnType::Number, "Losses"),
                column("lastGame", ColumnType::Date, "Last Game"),
            ],
            sports,
        ),
    ]
}

/// Inserts the demo leaderboards when the store is empty. Returns how many
/// were created.
pub fn seed_demo(db: &Db) -> Result<usize, AppError> {
    if with_store(db, store::count_leaderboards)? > 0 {
        info!("store already has leaderboards, skipping demo seed");
        return Ok(0);
    }

    let boards = demo_boards(&mut rand::thread_rng());
    let mut created = 0;
    for req in boards {
        let lb = create_leaderboard(db, req)?;
        info!(title = %lb.title, view_id = %lb.view_id, "seeded demo leaderboard");
        created += 1;
    }
    Ok(created)
}
