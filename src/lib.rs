// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod errors;
pub mod feedback;
pub mod history;
pub mod history_log;
pub mod logging;
pub mod metrics;
pub mod order;
pub mod runtime;
pub mod texts;
pub mod timer;
pub mod ui;

pub use engine::{CharState, Engine, EnginePhase, KeyCounts, KeyOutcome, TransitionSettings};
