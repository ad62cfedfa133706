//! Domain models for the care-alerts system.

mod alert;
mod insight;
mod vitals;

pub use alert::*;
pub use insight::*;
pub use vitals::*;
