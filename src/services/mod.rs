pub mod entries;
pub mod leaderboards;
pub mod render;
pub mod seed;
pub mod store;
