//! Retention janitor: background reclamation of expired upload sessions
//! and aged-out trash.

pub mod runner;
pub mod sweep;

pub use runner::JanitorRunner;
pub use sweep::{RetentionSweep, SweepReport};
