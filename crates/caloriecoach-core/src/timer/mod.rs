mod clock;
mod engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Timer, TimerProgress, TimerState};

pub(crate) use engine::format_hms;
