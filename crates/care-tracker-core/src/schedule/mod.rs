//! Medication scheduling and adherence engine.
//!
//! Pipeline: Weekly Schedule → Daily Expansion → Reconciliation (read path)
//!                                             → Upsert Resolution (write path)
//!           PRN logs → Interval Gate (read path)
//!
//! Everything here is a pure function over data already fetched from storage.

mod clock;
mod display;
mod expander;
mod gate;
mod reconciler;
mod upsert;

pub use clock::*;
pub use display::*;
pub use expander::*;
pub use gate::*;
pub use reconciler::*;
pub use upsert::*;
