pub mod leaderboard;
pub mod timing;
