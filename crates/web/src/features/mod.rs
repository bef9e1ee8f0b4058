pub mod board;
pub mod checkpoints;
pub mod finish_log;
pub mod numbering;
pub mod pauses;
pub mod racers;
