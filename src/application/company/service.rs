//! Company service: create, join and administer a company
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::events::SharedEventBus;
use crate::domain::company::{Company, CompanyCode};
use crate::domain::events::{AuthEvent, AuthEventKind};
use crate::domain::profile::model::validate_hourly_rate;
use crate::domain::profile::{Profile, Role};
use crate::domain::session::Actor;
use crate::domain::time_entry::{TimeEntry, TimeEntryFilter};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{store_now, validate_name, PaginatedResult, PaginationParams};

const CODE_ATTEMPTS: usize = 5;
const MIN_COMPANY_NAME_LEN: usize = 2;

/// Worked time of one employee over a period
#[derive(Debug, Clone)]
pub struct EmployeeHours {
    pub user_id: String,
    pub full_name: String,
    pub entries: u32,
    pub worked: Duration,
    pub clocked_in: bool,
}

pub struct CompanyService {
    repos: Arc<dyn RepositoryProvider>,
    events: SharedEventBus,
}

impl CompanyService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, events: SharedEventBus) -> Self {
        Self { repos, events }
    }

    // ── Membership ──────────────────────────────────────────────

    /// Create a company owned by an admin that has none yet.
    pub async fn create_company(&self, actor: &Actor, name: &str) -> DomainResult<Company> {
        self.create_with_codes(actor, name, CompanyCode::generate)
            .await
    }

    async fn create_with_codes(
        &self,
        actor: &Actor,
        name: &str,
        mut next_code: impl FnMut() -> CompanyCode,
    ) -> DomainResult<Company> {
        if actor.profile.role != Role::Admin {
            return Err(DomainError::Forbidden(
                "Only owners can create a company".into(),
            ));
        }
        if actor.profile.company_id.is_some() {
            return Err(DomainError::AlreadyInCompany);
        }
        let name = validate_name("Company name", name, MIN_COMPANY_NAME_LEN)
            .map_err(DomainError::Validation)?;

        for attempt in 1..=CODE_ATTEMPTS {
            let company = Company {
                id: Uuid::new_v4().to_string(),
                owner_id: actor.user_id().to_string(),
                name: name.clone(),
                code: next_code(),
                created_at: store_now(),
            };
            match self.repos.companies().create_with_owner(company).await {
                Ok(created) => {
                    info!(
                        user_id = actor.user_id(),
                        company_id = %created.id,
                        "Company created"
                    );
                    self.profile_updated(actor.user_id());
                    return Ok(created);
                }
                Err(DomainError::Conflict(msg)) => {
                    warn!(attempt, "Company code collision: {}", msg);
                }
                Err(e) => return Err(e),
            }
        }
        Err(DomainError::Internal(
            "Could not allocate a unique company code".into(),
        ))
    }

    /// Attach an employee without a company to the company owning `code`.
    pub async fn join_company(&self, actor: &Actor, code: &str) -> DomainResult<Company> {
        let code = CompanyCode::parse(code)?;
        if actor.profile.role != Role::Employee {
            return Err(DomainError::Forbidden(
                "Only employees can join a company".into(),
            ));
        }
        if actor.profile.company_id.is_some() {
            return Err(DomainError::AlreadyInCompany);
        }

        let Some(company) = self.repos.companies().find_by_code(&code).await? else {
            info!(user_id = actor.user_id(), "Join attempt with unknown code");
            return Err(DomainError::InvalidCompanyCode(code.to_string()));
        };
        if !self
            .repos
            .profiles()
            .assign_company(actor.user_id(), &company.id)
            .await?
        {
            return Err(DomainError::AlreadyInCompany);
        }

        info!(user_id = actor.user_id(), company_id = %company.id, "Joined company");
        self.profile_updated(actor.user_id());
        Ok(company)
    }

    /// Company of any member.
    pub async fn company_for(&self, actor: &Actor) -> DomainResult<Company> {
        let company_id = actor.company_id()?;
        self.repos
            .companies()
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Company",
                field: "id",
                value: company_id.to_string(),
            })
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn list_employees(&self, actor: &Actor) -> DomainResult<Vec<Profile>> {
        let company_id = require_admin(actor)?;
        self.repos.profiles().list_employees(company_id).await
    }

    pub async fn set_hourly_rate(
        &self,
        actor: &Actor,
        employee_id: &str,
        hourly_rate: Option<Decimal>,
    ) -> DomainResult<Profile> {
        let company_id = require_admin(actor)?;
        let hourly_rate = hourly_rate.map(validate_hourly_rate).transpose()?;
        let updated = self
            .repos
            .profiles()
            .set_hourly_rate(employee_id, company_id, hourly_rate)
            .await?;
        if !updated {
            return Err(employee_not_found(employee_id));
        }
        self.repos
            .profiles()
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| employee_not_found(employee_id))
    }

    pub async fn company_time_entries(
        &self,
        actor: &Actor,
        filter: TimeEntryFilter,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<TimeEntry>> {
        let company_id = require_admin(actor)?;
        self.repos
            .time_entries()
            .list_for_company(company_id, filter, pagination)
            .await
    }

    /// Hours per employee for entries clocked in within the range. Open
    /// entries count up to now. Employees without entries are listed with
    /// zero hours.
    pub async fn hours_summary(
        &self,
        actor: &Actor,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<EmployeeHours>> {
        let company_id = require_admin(actor)?;
        let employees = self.repos.profiles().list_employees(company_id).await?;
        let entries = self
            .repos
            .time_entries()
            .list_for_company_in_range(company_id, from, to)
            .await?;

        let now = Utc::now();
        let mut by_user: HashMap<&str, (u32, Duration, bool)> = HashMap::new();
        for entry in &entries {
            let slot = by_user
                .entry(entry.user_id.as_str())
                .or_insert((0, Duration::zero(), false));
            slot.0 += 1;
            slot.1 = slot.1 + entry.worked_duration(now);
            slot.2 |= entry.is_open();
        }

        Ok(employees
            .into_iter()
            .map(|p| {
                let (entries, worked, clocked_in) = by_user
                    .get(p.id.as_str())
                    .copied()
                    .unwrap_or((0, Duration::zero(), false));
                EmployeeHours {
                    user_id: p.id,
                    full_name: p.full_name,
                    entries,
                    worked,
                    clocked_in,
                }
            })
            .collect())
    }

    fn profile_updated(&self, user_id: &str) {
        self.events
            .publish(AuthEvent::new(AuthEventKind::ProfileUpdated, user_id, None));
    }
}

fn require_admin(actor: &Actor) -> DomainResult<&str> {
    if actor.profile.role != Role::Admin {
        return Err(DomainError::Forbidden("Admin access required".into()));
    }
    actor.company_id()
}

fn employee_not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "Employee",
        field: "id",
        value: id.to_string(),
    }
}
