//! Workflow configuration
//!
//! Values the workflow rules depend on but that differ between deployments.

use serde::{Deserialize, Serialize};

use crate::model::Identity;

/// Default page size of the completed-orders listing
pub const DEFAULT_COMPLETED_LIST_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// The one non-admin identity allowed to create shoot rows
    pub shoot_privileged_email: Option<String>,
    /// Maximum number of completed orders returned by the listing
    pub completed_list_limit: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            shoot_privileged_email: None,
            completed_list_limit: DEFAULT_COMPLETED_LIST_LIMIT,
        }
    }
}

impl WorkflowConfig {
    /// Whether `identity` is the designated shoot-privileged identity
    pub fn is_shoot_privileged(&self, identity: &Identity) -> bool {
        match &self.shoot_privileged_email {
            Some(email) if !email.trim().is_empty() => {
                email.trim().eq_ignore_ascii_case(identity.email.trim())
            }
            _ => false,
        }
    }
}
