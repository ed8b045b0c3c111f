//! CV/mission ranking: one completion call over N CV summaries, validated
//! against a fixed ranking shape. No repair pass.

pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod workflow;

pub use engine::MissionComparer;
