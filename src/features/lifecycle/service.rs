use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Operation};
use crate::features::lifecycle::machine::Command;
use crate::features::lifecycle::store::LifecycleStore;
use crate::features::reports::dtos::{AssignTeamDto, CreateReportDto};
use crate::features::reports::models::{NewReport, Report, ReportStatus};
use crate::features::teams::models::Team;

/// Coordinates role-gated report transitions and the team availability they
/// imply. This is the only write path for report status, assignment, and
/// team availability.
pub struct LifecycleService {
    store: Arc<dyn LifecycleStore>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn LifecycleStore>) -> Self {
        Self { store }
    }

    /// Create a report in the `reported` state
    pub async fn create_report(
        &self,
        actor: &AuthenticatedUser,
        dto: CreateReportDto,
    ) -> Result<Report> {
        authorize(actor.role, Operation::CreateReport)?;
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let location = dto.location();
        let report = self
            .store
            .insert_report(&NewReport {
                category: dto.category.trim().to_string(),
                description: dto.description,
                location,
                reported_by: actor.sub.clone(),
            })
            .await?;

        tracing::info!(
            "Report {} created by {} ({})",
            report.id,
            actor.sub,
            report.category
        );
        Ok(report)
    }

    pub async fn list_reports(&self, actor: &AuthenticatedUser) -> Result<Vec<Report>> {
        authorize(actor.role, Operation::ListReports)?;
        self.store.list_reports().await
    }

    pub async fn list_teams(&self, actor: &AuthenticatedUser) -> Result<Vec<Team>> {
        authorize(actor.role, Operation::ListTeams)?;
        self.store.list_teams().await
    }

    /// Dispatch a team: the report becomes `scheduled` and the team `working`
    pub async fn assign_team(
        &self,
        actor: &AuthenticatedUser,
        report_id: i64,
        dto: AssignTeamDto,
    ) -> Result<Report> {
        authorize(actor.role, Operation::AssignTeam)?;
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let team = dto.team.trim().to_string();
        let report = self
            .store
            .apply(report_id, &Command::Assign { team })
            .await?;

        tracing::info!(
            "Report {} assigned to team {:?} by {}",
            report.id,
            report.assigned_team,
            actor.sub
        );
        Ok(report)
    }

    /// Move a report's repair status; resolving frees its team
    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        report_id: i64,
        status: ReportStatus,
    ) -> Result<Report> {
        authorize(actor.role, Operation::UpdateStatus)?;

        let report = self
            .store
            .apply(report_id, &Command::SetStatus(status))
            .await?;

        tracing::info!(
            "Report {} status is now {} (set by {})",
            report.id,
            report.status,
            actor.sub
        );
        Ok(report)
    }

    /// Permanently remove a report
    pub async fn delete_report(&self, actor: &AuthenticatedUser, report_id: i64) -> Result<()> {
        authorize(actor.role, Operation::DeleteReport)?;

        let removed = self.store.remove_report(report_id).await?;

        tracing::info!(
            "Report {} deleted by {} (was {})",
            removed.id,
            actor.sub,
            removed.status
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::features::lifecycle::MemoryLifecycleStore;
    use crate::features::teams::models::TeamAvailability;

    async fn service() -> (LifecycleService, Arc<MemoryLifecycleStore>) {
        let store = Arc::new(MemoryLifecycleStore::new());
        store
            .ensure_teams(&["T1".to_string(), "T2".to_string()])
            .await
            .unwrap();
        (LifecycleService::new(store.clone()), store)
    }

    fn actor(role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(format!("{}-1", role), role)
    }

    fn pothole() -> CreateReportDto {
        CreateReportDto {
            category: "pothole".to_string(),
            description: "large crack".to_string(),
            lat: 39.0,
            lng: 35.0,
        }
    }

    fn team(name: &str) -> AssignTeamDto {
        AssignTeamDto {
            team: name.to_string(),
        }
    }

    async fn create(service: &LifecycleService) -> Report {
        service
            .create_report(&actor(Role::User), pothole())
            .await
            .unwrap()
    }

    /// Status/team pairing on every report, and team availability matching
    /// the set of teams with a scheduled report
    async fn assert_consistent(store: &MemoryLifecycleStore) {
        let reports = store.list_reports().await.unwrap();
        for report in &reports {
            assert_eq!(
                report.assigned_team.is_some(),
                report.status != ReportStatus::Reported,
                "report {} has status {} with team {:?}",
                report.id,
                report.status,
                report.assigned_team
            );
        }
        for team in store.list_teams().await.unwrap() {
            let busy = reports.iter().any(|r| {
                r.status == ReportStatus::Scheduled
                    && r.assigned_team.as_deref() == Some(team.name.as_str())
            });
            assert_eq!(team.availability == TeamAvailability::Working, busy);
        }
    }

    #[tokio::test]
    async fn test_only_users_create_reports() {
        let (service, store) = service().await;
        for role in [Role::Worker, Role::Manager] {
            let result = service.create_report(&actor(role), pothole()).await;
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
        assert!(store.list_reports().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_before_validation() {
        let (service, _) = service().await;
        let invalid = CreateReportDto {
            lat: 500.0,
            ..pothole()
        };
        assert!(matches!(
            service.create_report(&actor(Role::Worker), invalid).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_report_rejected() {
        let (service, store) = service().await;
        let invalid = CreateReportDto {
            lng: -181.0,
            ..pothole()
        };
        assert!(matches!(
            service.create_report(&actor(Role::User), invalid).await,
            Err(AppError::Validation(_))
        ));
        assert!(store.list_reports().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_created_report_records_reporter() {
        let (service, _) = service().await;
        let report = create(&service).await;
        assert_eq!(report.reported_by, "user-1");
        assert_eq!(report.status, ReportStatus::Reported);
    }

    #[tokio::test]
    async fn test_user_mutations_forbidden_without_effect() {
        let (service, store) = service().await;
        let report = create(&service).await;
        let user = actor(Role::User);

        assert!(matches!(
            service.assign_team(&user, report.id, team("T1")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service
                .update_status(&user, report.id, ReportStatus::Resolved)
                .await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete_report(&user, report.id).await,
            Err(AppError::Forbidden(_))
        ));

        assert_eq!(store.list_reports().await.unwrap(), vec![report]);
        assert_consistent(&store).await;
    }

    #[tokio::test]
    async fn test_denial_does_not_reveal_missing_report() {
        let (service, _) = service().await;
        let worker = actor(Role::Worker);
        assert!(matches!(
            service.assign_team(&worker, 999, team("T1")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete_report(&worker, 999).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_full_lifecycle_keeps_invariants() {
        let (service, store) = service().await;
        let manager = actor(Role::Manager);
        let worker = actor(Role::Worker);

        let first = create(&service).await;
        let second = create(&service).await;
        assert_consistent(&store).await;

        service
            .assign_team(&manager, first.id, team("T1"))
            .await
            .unwrap();
        assert_consistent(&store).await;

        // T1 is busy with the first report
        assert!(matches!(
            service
                .assign_team(&manager, second.id, team("T1"))
                .await,
            Err(AppError::Conflict(_))
        ));
        service
            .assign_team(&manager, second.id, team("T2"))
            .await
            .unwrap();
        assert_consistent(&store).await;

        // non-terminal status leaves the team working
        service
            .update_status(&worker, first.id, ReportStatus::Scheduled)
            .await
            .unwrap();
        assert_consistent(&store).await;

        service
            .update_status(&worker, first.id, ReportStatus::Resolved)
            .await
            .unwrap();
        assert_consistent(&store).await;

        service.delete_report(&manager, second.id).await.unwrap();
        assert_consistent(&store).await;

        let teams = store.list_teams().await.unwrap();
        assert!(teams
            .iter()
            .all(|t| t.availability == TeamAvailability::Available));
    }

    #[tokio::test]
    async fn test_reassign_moves_working_flag() {
        let (service, store) = service().await;
        let manager = actor(Role::Manager);
        let report = create(&service).await;

        service
            .assign_team(&manager, report.id, team("T1"))
            .await
            .unwrap();
        let moved = service
            .assign_team(&manager, report.id, team("T2"))
            .await
            .unwrap();

        assert_eq!(moved.assigned_team.as_deref(), Some("T2"));
        assert_consistent(&store).await;
    }

    #[tokio::test]
    async fn test_skipping_schedule_is_rejected() {
        let (service, store) = service().await;
        let report = create(&service).await;

        let result = service
            .update_status(&actor(Role::Worker), report.id, ReportStatus::Resolved)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.list_reports().await.unwrap(), vec![report]);
    }
}
