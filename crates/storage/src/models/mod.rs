pub mod category;
pub mod checkpoint;
pub mod finish_log;
pub mod pause_log;
pub mod racer;

pub use category::{AgeBucket, Category};
pub use checkpoint::Checkpoint;
pub use finish_log::FinishLogEntry;
pub use pause_log::{MAX_CUSTOM_PAUSE_SECS, PauseInterval, STALE_PAUSE_SECS};
pub use racer::{Gender, Racer};
