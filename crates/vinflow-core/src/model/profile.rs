use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// Closed set of roles known to the profile directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    BranchCoordinator,
    /// Present in the profile schema; holds no workflow capability
    BranchManager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::BranchCoordinator => "branch_coordinator",
            Role::BranchManager => "branch_manager",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "branch_coordinator" => Some(Role::BranchCoordinator),
            "branch_manager" => Some(Role::BranchManager),
            _ => None,
        }
    }
}

/// Profile directory entry for one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub locations: BTreeSet<String>,
}

/// The authenticated identity performing an operation, with its profile
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub identity: Identity,
    /// `None` when the directory has no entry; such an actor can do nothing
    pub profile: Option<UserProfile>,
}

impl Actor {
    pub fn new(identity: Identity, profile: Option<UserProfile>) -> Self {
        Self { identity, profile }
    }

    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Whether the actor is affiliated with the given location
    pub fn has_location(&self, location: &str) -> bool {
        !location.is_empty()
            && self
                .profile
                .as_ref()
                .is_some_and(|p| p.locations.contains(location))
    }

    /// Name stamped onto step records: profile name, then display name, then email
    pub fn display_name(&self) -> String {
        let profile_name = self.profile.as_ref().map(|p| p.name.as_str());
        [profile_name, Some(self.identity.name.as_str())]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty())
            .unwrap_or(self.identity.email.as_str())
            .to_string()
    }
}
