//! Domain models for the EHR analytics system.

mod lab;
mod patient;

pub use lab::*;
pub use patient::*;
