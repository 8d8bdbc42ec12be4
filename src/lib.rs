//! Content generation pipeline for the CoachLink athlete app
//!
//! Asks Gemini for structured coaching content (training plans, workouts,
//! diets, career and financial guidance, injury and symptom assessments,
//! nutrition analysis and chat), repairs the loosely formatted JSON it sends
//! back, and normalizes it into complete records. When no credential is set,
//! the endpoint fails or the reply cannot be repaired, a deterministic
//! fallback record is returned instead.

pub mod ai;
pub mod error;
pub mod fallback;
pub mod generation;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod recovery;
pub mod translation;

pub use error::{Error, Result};
pub use generation::{FallbackReason, Generated, Generator, RecordSource};
