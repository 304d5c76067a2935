//! Domain models for the care tracker.

mod activity;
mod checkin;
mod contact;
mod log;
mod medication;
mod task;
mod update;
mod validation;

pub use activity::*;
pub use checkin::*;
pub use contact::*;
pub use log::*;
pub use medication::*;
pub use task::*;
pub use update::*;
pub use validation::ValidationError;
