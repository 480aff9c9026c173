//! Report lifecycle state machine.
//!
//! A report moves `reported -> scheduled -> resolved`. The state carries the
//! assigned team, so a team reference exists exactly when the report has left
//! `reported`. Every transition is a pure function from the current state to a
//! [`Step`]: the next state plus the team availability writes that must be
//! committed together with it. Stores execute a step inside one atomic unit.

use thiserror::Error;

use crate::core::error::AppError;
use crate::features::reports::models::{Report, ReportStatus};
use crate::features::teams::models::{Team, TeamAvailability};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Reported,
    Scheduled { team: String },
    Resolved { team: String },
}

/// A role-gated mutation requested against one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Assign { team: String },
    SetStatus(ReportStatus),
}

impl Command {
    /// Team that must be loaded (and locked) before planning
    pub fn target_team(&self) -> Option<&str> {
        match self {
            Command::Assign { team } => Some(team.as_str()),
            Command::SetStatus(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamChange {
    pub team: String,
    pub availability: TeamAvailability,
}

impl TeamChange {
    fn working(team: &str) -> Self {
        Self {
            team: team.to_string(),
            availability: TeamAvailability::Working,
        }
    }

    fn available(team: &str) -> Self {
        Self {
            team: team.to_string(),
            availability: TeamAvailability::Available,
        }
    }
}

/// Outcome of planning a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: Lifecycle,
    pub team_changes: Vec<TeamChange>,
}

impl Step {
    fn unchanged(current: &Lifecycle) -> Self {
        Self {
            next: current.clone(),
            team_changes: Vec::new(),
        }
    }

    /// True when applying the step would write nothing
    pub fn is_noop(&self, current: &Lifecycle) -> bool {
        self.team_changes.is_empty() && &self.next == current
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Report has status {status} but team {team:?}")]
    CorruptState {
        status: ReportStatus,
        team: Option<String>,
    },

    #[error("Team {0} not found")]
    UnknownTeam(String),

    #[error("Team {0} is already working on another report")]
    TeamBusy(String),

    #[error("Report is already resolved")]
    AlreadyResolved,

    #[error("Cannot change status from {from} to {to}")]
    IllegalStatusChange {
        from: ReportStatus,
        to: ReportStatus,
    },
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::CorruptState { .. } => AppError::Internal(err.to_string()),
            LifecycleError::UnknownTeam(_) => AppError::NotFound(err.to_string()),
            LifecycleError::TeamBusy(_)
            | LifecycleError::AlreadyResolved
            | LifecycleError::IllegalStatusChange { .. } => AppError::Conflict(err.to_string()),
        }
    }
}

impl Lifecycle {
    /// Rebuild the state from stored columns, rejecting combinations that break
    /// the team/status pairing
    pub fn from_record(status: ReportStatus, team: Option<&str>) -> Result<Self, LifecycleError> {
        match (status, team) {
            (ReportStatus::Reported, None) => Ok(Lifecycle::Reported),
            (ReportStatus::Scheduled, Some(team)) => Ok(Lifecycle::Scheduled {
                team: team.to_string(),
            }),
            (ReportStatus::Resolved, Some(team)) => Ok(Lifecycle::Resolved {
                team: team.to_string(),
            }),
            (status, team) => Err(LifecycleError::CorruptState {
                status,
                team: team.map(str::to_string),
            }),
        }
    }

    pub fn of(report: &Report) -> Result<Self, LifecycleError> {
        Self::from_record(report.status, report.assigned_team.as_deref())
    }

    pub fn status(&self) -> ReportStatus {
        match self {
            Lifecycle::Reported => ReportStatus::Reported,
            Lifecycle::Scheduled { .. } => ReportStatus::Scheduled,
            Lifecycle::Resolved { .. } => ReportStatus::Resolved,
        }
    }

    pub fn team(&self) -> Option<&str> {
        match self {
            Lifecycle::Reported => None,
            Lifecycle::Scheduled { team } | Lifecycle::Resolved { team } => Some(team.as_str()),
        }
    }

    /// Plan `command` against this state. `target` is the loaded team named by
    /// [`Command::target_team`], if any.
    pub fn apply(&self, command: &Command, target: Option<&Team>) -> Result<Step, LifecycleError> {
        match command {
            Command::Assign { team } => {
                let target = target
                    .filter(|t| t.name == *team)
                    .ok_or_else(|| LifecycleError::UnknownTeam(team.clone()))?;
                self.assign(target)
            }
            Command::SetStatus(status) => self.set_status(*status),
        }
    }

    fn assign(&self, target: &Team) -> Result<Step, LifecycleError> {
        match self {
            Lifecycle::Resolved { .. } => Err(LifecycleError::AlreadyResolved),
            Lifecycle::Scheduled { team } if *team == target.name => Ok(Step::unchanged(self)),
            _ if target.is_working() => Err(LifecycleError::TeamBusy(target.name.clone())),
            Lifecycle::Reported => Ok(Step {
                next: Lifecycle::Scheduled {
                    team: target.name.clone(),
                },
                team_changes: vec![TeamChange::working(&target.name)],
            }),
            Lifecycle::Scheduled { team } => Ok(Step {
                next: Lifecycle::Scheduled {
                    team: target.name.clone(),
                },
                team_changes: vec![
                    TeamChange::available(team),
                    TeamChange::working(&target.name),
                ],
            }),
        }
    }

    fn set_status(&self, status: ReportStatus) -> Result<Step, LifecycleError> {
        match (self, status) {
            (current, status) if current.status() == status => Ok(Step::unchanged(self)),
            (Lifecycle::Scheduled { team }, status) if status.is_terminal() => Ok(Step {
                next: Lifecycle::Resolved { team: team.clone() },
                team_changes: vec![TeamChange::available(team)],
            }),
            (current, status) => Err(LifecycleError::IllegalStatusChange {
                from: current.status(),
                to: status,
            }),
        }
    }

    /// Team writes owed when the report is removed
    pub fn release_on_delete(&self) -> Vec<TeamChange> {
        match self {
            Lifecycle::Scheduled { team } => vec![TeamChange::available(team)],
            Lifecycle::Reported | Lifecycle::Resolved { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn team(name: &str, availability: TeamAvailability) -> Team {
        Team {
            name: name.to_string(),
            availability,
            updated_at: Utc::now(),
        }
    }

    fn scheduled(name: &str) -> Lifecycle {
        Lifecycle::Scheduled {
            team: name.to_string(),
        }
    }

    fn assign(name: &str) -> Command {
        Command::Assign {
            team: name.to_string(),
        }
    }

    #[test]
    fn test_from_record_enforces_team_pairing() {
        assert_eq!(
            Lifecycle::from_record(ReportStatus::Reported, None),
            Ok(Lifecycle::Reported)
        );
        assert_eq!(
            Lifecycle::from_record(ReportStatus::Scheduled, Some("T1")),
            Ok(scheduled("T1"))
        );
        assert!(Lifecycle::from_record(ReportStatus::Reported, Some("T1")).is_err());
        assert!(Lifecycle::from_record(ReportStatus::Scheduled, None).is_err());
        assert!(Lifecycle::from_record(ReportStatus::Resolved, None).is_err());
    }

    #[test]
    fn test_assign_reported_report() {
        let t1 = team("T1", TeamAvailability::Available);
        let step = Lifecycle::Reported.apply(&assign("T1"), Some(&t1)).unwrap();

        assert_eq!(step.next, scheduled("T1"));
        assert_eq!(step.next.status(), ReportStatus::Scheduled);
        assert_eq!(step.team_changes, vec![TeamChange::working("T1")]);
    }

    #[test]
    fn test_assign_unknown_team() {
        assert_eq!(
            Lifecycle::Reported.apply(&assign("T9"), None),
            Err(LifecycleError::UnknownTeam("T9".to_string()))
        );

        // a loaded team with a different name is not the requested one
        let t1 = team("T1", TeamAvailability::Available);
        assert_eq!(
            Lifecycle::Reported.apply(&assign("T9"), Some(&t1)),
            Err(LifecycleError::UnknownTeam("T9".to_string()))
        );
    }

    #[test]
    fn test_assign_busy_team_rejected() {
        let t1 = team("T1", TeamAvailability::Working);
        assert_eq!(
            Lifecycle::Reported.apply(&assign("T1"), Some(&t1)),
            Err(LifecycleError::TeamBusy("T1".to_string()))
        );
    }

    #[test]
    fn test_reassign_moves_team() {
        let t2 = team("T2", TeamAvailability::Available);
        let step = scheduled("T1").apply(&assign("T2"), Some(&t2)).unwrap();

        assert_eq!(step.next, scheduled("T2"));
        assert_eq!(
            step.team_changes,
            vec![TeamChange::available("T1"), TeamChange::working("T2")]
        );
    }

    #[test]
    fn test_reassign_same_team_is_noop() {
        let current = scheduled("T1");
        let t1 = team("T1", TeamAvailability::Working);
        let step = current.apply(&assign("T1"), Some(&t1)).unwrap();
        assert!(step.is_noop(&current));
    }

    #[test]
    fn test_assign_resolved_rejected() {
        let t2 = team("T2", TeamAvailability::Available);
        let resolved = Lifecycle::Resolved {
            team: "T1".to_string(),
        };
        assert_eq!(
            resolved.apply(&assign("T2"), Some(&t2)),
            Err(LifecycleError::AlreadyResolved)
        );
    }

    #[test]
    fn test_resolve_releases_team() {
        let step = scheduled("T1")
            .apply(&Command::SetStatus(ReportStatus::Resolved), None)
            .unwrap();

        assert_eq!(
            step.next,
            Lifecycle::Resolved {
                team: "T1".to_string()
            }
        );
        assert_eq!(step.team_changes, vec![TeamChange::available("T1")]);
    }

    #[test]
    fn test_non_terminal_status_leaves_team_alone() {
        let current = scheduled("T1");
        let step = current
            .apply(&Command::SetStatus(ReportStatus::Scheduled), None)
            .unwrap();
        assert!(step.is_noop(&current));
        assert!(step.team_changes.is_empty());
    }

    #[test]
    fn test_status_changes_are_forward_only() {
        let cases = [
            (Lifecycle::Reported, ReportStatus::Scheduled),
            (Lifecycle::Reported, ReportStatus::Resolved),
            (scheduled("T1"), ReportStatus::Reported),
            (
                Lifecycle::Resolved {
                    team: "T1".to_string(),
                },
                ReportStatus::Scheduled,
            ),
        ];

        for (current, to) in cases {
            let from = current.status();
            assert_eq!(
                current.apply(&Command::SetStatus(to), None),
                Err(LifecycleError::IllegalStatusChange { from, to })
            );
        }
    }

    #[test]
    fn test_resolving_twice_is_noop() {
        let current = Lifecycle::Resolved {
            team: "T1".to_string(),
        };
        let step = current
            .apply(&Command::SetStatus(ReportStatus::Resolved), None)
            .unwrap();
        assert!(step.is_noop(&current));
    }

    #[test]
    fn test_delete_releases_only_scheduled_team() {
        assert_eq!(
            scheduled("T1").release_on_delete(),
            vec![TeamChange::available("T1")]
        );
        assert!(Lifecycle::Reported.release_on_delete().is_empty());
        assert!(Lifecycle::Resolved {
            team: "T1".to_string()
        }
        .release_on_delete()
        .is_empty());
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            AppError::from(LifecycleError::UnknownTeam("T9".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(LifecycleError::TeamBusy("T1".into())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(LifecycleError::CorruptState {
                status: ReportStatus::Reported,
                team: Some("T1".into())
            }),
            AppError::Internal(_)
        ));
    }
}
