//! Time-entry lifecycle: clock in / clock out with optional geolocation

pub mod geolocation;
pub mod in_flight;
pub mod service;

pub use geolocation::{GeoState, GeolocationCapture};
pub use in_flight::{InFlightActions, InFlightGuard};
pub use service::{ClockOutcome, ClockStatus, TimeClockService};
