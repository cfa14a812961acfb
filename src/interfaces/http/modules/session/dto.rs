//! Session DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::session::SessionSnapshot;
use crate::interfaces::http::modules::auth::IdentityDto;
use crate::interfaces::http::modules::companies::ProfileDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    pub identity: Option<IdentityDto>,
    pub profile: Option<ProfileDto>,
    /// True while a resolution is in flight
    pub resolving: bool,
    /// Where the client belongs, e.g. `join-company`
    pub route: String,
}

impl From<&SessionSnapshot> for SessionView {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            identity: snapshot.identity.clone().map(IdentityDto::from),
            profile: snapshot.profile.clone().map(ProfileDto::from),
            resolving: snapshot.resolving,
            route: snapshot.route().to_string(),
        }
    }
}
