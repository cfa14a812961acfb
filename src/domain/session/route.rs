//! Company membership gate
//!
//! Pure routing decision over the resolved session snapshot.

use std::fmt;

use crate::domain::identity::Identity;
use crate::domain::profile::{Profile, Role};
use crate::shared::DomainError;

/// Snapshot published by the session resolver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    /// True while a resolution is in flight
    pub resolving: bool,
}

impl SessionSnapshot {
    pub fn resolving() -> Self {
        Self {
            identity: None,
            profile: None,
            resolving: true,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Route {
        decide_route(self)
    }
}

/// Destination a client should show for the current snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Wait,
    SignIn,
    CreateCompany,
    AdminDashboard,
    JoinCompany,
    EmployeeDashboard,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::SignIn => "sign-in",
            Self::CreateCompany => "create-company",
            Self::AdminDashboard => "admin-dashboard",
            Self::JoinCompany => "join-company",
            Self::EmployeeDashboard => "employee-dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn decide_route(snapshot: &SessionSnapshot) -> Route {
    if snapshot.resolving {
        return Route::Wait;
    }
    if snapshot.identity.is_none() {
        return Route::SignIn;
    }
    let Some(profile) = snapshot.profile.as_ref() else {
        return Route::Wait;
    };
    match (profile.role, profile.company_id.is_some()) {
        (Role::Admin, false) => Route::CreateCompany,
        (Role::Admin, true) => Route::AdminDashboard,
        (Role::Employee, false) => Route::JoinCompany,
        (Role::Employee, true) => Route::EmployeeDashboard,
    }
}

/// Fully resolved caller: an identity with its profile.
#[derive(Debug, Clone)]
pub struct Actor {
    pub identity: Identity,
    pub profile: Profile,
}

impl Actor {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Option<Self> {
        match (&snapshot.identity, &snapshot.profile) {
            (Some(identity), Some(profile)) if !snapshot.resolving => Some(Self {
                identity: identity.clone(),
                profile: profile.clone(),
            }),
            _ => None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.identity.id
    }

    pub fn route(&self) -> Route {
        decide_route(&SessionSnapshot {
            identity: Some(self.identity.clone()),
            profile: Some(self.profile.clone()),
            resolving: false,
        })
    }

    /// Company of the actor, or `Forbidden` when none is set.
    pub fn company_id(&self) -> Result<&str, DomainError> {
        self.profile
            .company_id
            .as_deref()
            .ok_or_else(|| DomainError::Forbidden("profile has no company".into()))
    }
}
