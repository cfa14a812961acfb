//! Database entities module

pub mod auth_session;
pub mod company;
pub mod invitation;
pub mod profile;
pub mod time_entry;
pub mod user;

pub use auth_session::Entity as AuthSession;
pub use company::Entity as Company;
pub use invitation::Entity as Invitation;
pub use profile::Entity as Profile;
pub use time_entry::Entity as TimeEntry;
pub use user::Entity as User;
