mod controller;
mod summary;

pub use controller::{ReadingInput, SessionOptions, TrainingSession};
pub use summary::{
    CoachLogEntry, HistoryEntry, ReadingStats, SessionExport, SessionSummary,
    TrainingSessionState,
};
