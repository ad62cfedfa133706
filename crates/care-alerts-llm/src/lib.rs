//! Caregiver advisory generation through a hosted language model.
//!
//! This crate turns a snapshot of a patient alert into short, actionable
//! guidance for caregivers. The generator sits behind the [`AdvisoryGenerator`]
//! trait so callers can swap the hosted client for [`MockGenerator`] in tests.

pub mod advisory;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod prompts;

pub use advisory::*;
#[cfg(feature = "gemini")]
pub use gemini::*;
pub use prompts::*;
