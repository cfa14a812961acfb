//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::company::CompanyRepository;
use crate::domain::identity::{SessionRepository, UserRepository};
use crate::domain::invitation::InvitationRepository;
use crate::domain::profile::ProfileRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::time_entry::TimeEntryRepository;

use super::company_repository::SeaOrmCompanyRepository;
use super::invitation_repository::SeaOrmInvitationRepository;
use super::profile_repository::SeaOrmProfileRepository;
use super::session_repository::SeaOrmSessionRepository;
use super::time_entry_repository::SeaOrmTimeEntryRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let profile = repos.profiles().find_by_id(user_id).await?;
/// let open = repos.time_entries().find_open_for_user(user_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    sessions: SeaOrmSessionRepository,
    profiles: SeaOrmProfileRepository,
    companies: SeaOrmCompanyRepository,
    time_entries: SeaOrmTimeEntryRepository,
    invitations: SeaOrmInvitationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            sessions: SeaOrmSessionRepository::new(db.clone()),
            profiles: SeaOrmProfileRepository::new(db.clone()),
            companies: SeaOrmCompanyRepository::new(db.clone()),
            time_entries: SeaOrmTimeEntryRepository::new(db.clone()),
            invitations: SeaOrmInvitationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn sessions(&self) -> &dyn SessionRepository {
        &self.sessions
    }

    fn profiles(&self) -> &dyn ProfileRepository {
        &self.profiles
    }

    fn companies(&self) -> &dyn CompanyRepository {
        &self.companies
    }

    fn time_entries(&self) -> &dyn TimeEntryRepository {
        &self.time_entries
    }

    fn invitations(&self) -> &dyn InvitationRepository {
        &self.invitations
    }
}
