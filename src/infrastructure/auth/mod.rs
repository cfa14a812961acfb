//! Auth provider implementations

pub mod local;

pub use local::LocalAuthProvider;
