//! Time entry aggregate
//!
//! Contains the TimeEntry entity, the clock state derived from it and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{ClockState, Coordinates, NewTimeEntry, TimeEntry, TimeEntryFilter};
pub use repository::TimeEntryRepository;
