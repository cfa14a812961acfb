pub mod auth;
pub mod companies;
pub mod health;
pub mod invites;
pub mod metrics;
pub mod request_id;
pub mod session;
pub mod time_entries;
