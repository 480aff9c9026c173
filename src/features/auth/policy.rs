//! Role-based access policy.
//!
//! Maps every (role, operation) pair to allow/deny. The check runs before any
//! store access, so a denied caller never learns whether the target exists.

use crate::core::error::AppError;
use crate::features::auth::model::Role;

/// Operations exposed by the report/team surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateReport,
    ListReports,
    ListTeams,
    AssignTeam,
    UpdateStatus,
    DeleteReport,
}

impl Operation {
    #[cfg(test)]
    pub const ALL: [Operation; 6] = [
        Operation::CreateReport,
        Operation::ListReports,
        Operation::ListTeams,
        Operation::AssignTeam,
        Operation::UpdateStatus,
        Operation::DeleteReport,
    ];
}

pub fn is_allowed(role: Role, operation: Operation) -> bool {
    match operation {
        Operation::CreateReport => role == Role::User,
        Operation::ListReports => true,
        Operation::ListTeams | Operation::AssignTeam | Operation::DeleteReport => {
            role == Role::Manager
        }
        Operation::UpdateStatus => role == Role::Worker,
    }
}

pub fn authorize(role: Role, operation: Operation) -> Result<(), AppError> {
    if is_allowed(role, operation) {
        Ok(())
    } else {
        tracing::debug!("Denied {:?} for role {}", operation, role);
        Err(AppError::Forbidden("Forbidden".to_string()))
    }
}
