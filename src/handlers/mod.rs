pub mod entries;
pub mod leaderboards;
