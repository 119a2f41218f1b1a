//! Deterministic chapter / meta-progression simulator for game balancing.
//!
//! A [`simulation::Model`] plays the configured chapters in order. Each round
//! is one chapter attempt followed by one economy step that may buy the
//! cheapest meta upgrade; defeats are retried until every chapter is cleared
//! or the round ceiling trips. Everything that happens is appended to an
//! [`log::EventLog`], the product of a run.
//!
//! Modules are organized by responsibility:
//! - [`config`] loads and validates the balance tables
//! - [`meta`], [`player`], [`enemy`] hold the progression and character state
//! - [`battle`], [`day`], [`chapter`], [`simulation`] drive the run
//! - [`timer`] and [`context`] track play time per run
//! - [`log`] and [`stats`] describe what a run did
pub mod battle;
pub mod chapter;
pub mod config;
pub mod context;
pub mod day;
pub mod enemy;
pub mod error;
pub mod log;
pub mod meta;
pub mod player;
pub mod simulation;
pub mod stats;
pub mod timer;

#[cfg(feature = "python")]
mod python;

pub use config::{EngineSettings, GameConfig};
pub use error::{Result, SimError};
pub use log::{ActionKind, EventLog, LogEntry, LogEvent};
pub use simulation::{simulate, simulate_profile, sweep_profiles, Model};
pub use stats::{RunSummary, SimReport, SweepSummary};
