//! Profile aggregate

pub mod model;
pub mod repository;

pub use model::{NewProfile, Profile, Role};
pub use repository::ProfileRepository;
