pub mod config;
pub mod error;
pub mod lobby;
pub mod moves;
pub mod rng;
pub mod rules;
pub mod simulation;
pub mod turnlog;

pub use config::RoundConfig;
pub use error::SimError;
pub use simulation::{RoundState, Simulation};
