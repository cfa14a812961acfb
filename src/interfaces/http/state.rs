//! Shared state handed to every HTTP handler

use std::sync::Arc;
use std::time::Instant;

use sea_orm::DatabaseConnection;

use crate::application::ports::AuthProvider;
use crate::application::{CompanyService, InviteService, SessionResolver, TimeClockService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<dyn AuthProvider>,
    pub resolver: Arc<SessionResolver>,
    pub companies: Arc<CompanyService>,
    pub timeclock: Arc<TimeClockService>,
    pub invites: Arc<InviteService>,
    pub started_at: Arc<Instant>,
}
