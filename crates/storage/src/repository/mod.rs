pub mod checkpoint;
pub mod finish_log;
pub mod numbering;
pub mod pause_log;
pub mod racer;
