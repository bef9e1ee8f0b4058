pub mod checkpoint;
pub mod common;
pub mod finish_log;
pub mod leaderboard;
pub mod pause_log;
pub mod racer;
