//! Periodic development report viewer

use crate::auth::Viewer;
use crate::error::{PortalError, PortalResult};
use crate::gateway::{select_as, DataGateway, Direction, Query};
use crate::models::{tables, Child, PeriodicReport, Role};

/// Children registered to a parent, by first name
pub async fn children_of(gateway: &dyn DataGateway, parent_id: &str) -> PortalResult<Vec<Child>> {
    let query = Query::table(tables::CHILDREN)
        .eq("parent_id", parent_id)
        .order("first_name", Direction::Asc);
    Ok(select_as::<Child>(gateway, &query).await?)
}

/// Reports of one child, newest first.
/// Parents only see their own children; admin, teacher and counselor see all.
pub async fn reports_for(
    gateway: &dyn DataGateway,
    viewer: &Viewer,
    child_id: &str,
) -> PortalResult<Vec<PeriodicReport>> {
    if viewer.role == Role::Parent {
        let parent_id = viewer.user_id.as_deref().ok_or(PortalError::Unauthenticated)?;
        let query = Query::table(tables::CHILDREN).eq("id", child_id).limit(1);
        let child = select_as::<Child>(gateway, &query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PortalError::NotFound(format!("child {}", child_id)))?;
        if child.parent_id.as_deref() != Some(parent_id) {
            tracing::warn!("Parent {} asked for reports of child {}", parent_id, child_id);
            return Err(PortalError::Forbidden);
        }
    } else if !viewer.role.reads_all_reports() {
        return Err(PortalError::Forbidden);
    }

    let query = Query::table(tables::PERIODIC_REPORTS)
        .eq("child_id", child_id)
        .order("created_at", Direction::Desc);
    Ok(select_as::<PeriodicReport>(gateway, &query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use serde_json::json;

    fn viewer(role: Role, user_id: &str) -> Viewer {
        Viewer {
            user_id: Some(user_id.to_string()),
            role,
        }
    }

    #[tokio::test]
    async fn test_children_of_parent_sorted() {
        let gateway = MemoryGateway::with_demo_data();
        let children = children_of(&gateway, "u-parent").await.unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ayşe", "Elif"]);
    }

    #[tokio::test]
    async fn test_parent_reads_own_child_only() {
        let gateway = MemoryGateway::with_demo_data();
        let parent = viewer(Role::Parent, "u-parent");

        let reports = reports_for(&gateway, &parent, "c-1").await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].areas.len(), 2);

        assert!(matches!(
            reports_for(&gateway, &parent, "c-2").await,
            Err(PortalError::Forbidden)
        ));
        assert!(matches!(
            reports_for(&gateway, &parent, "c-404").await,
            Err(PortalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_role_access() {
        let gateway = MemoryGateway::with_demo_data();
        for role in [Role::Admin, Role::Teacher, Role::GuidanceCounselor] {
            assert!(reports_for(&gateway, &viewer(role, "u-x"), "c-2").await.is_ok());
        }
        for role in [Role::Staff, Role::Guest] {
            assert!(matches!(
                reports_for(&gateway, &viewer(role, "u-x"), "c-1").await,
                Err(PortalError::Forbidden)
            ));
        }
    }

    #[tokio::test]
    async fn test_reports_newest_first() {
        let gateway = MemoryGateway::with_demo_data();
        gateway.seed(
            tables::PERIODIC_REPORTS,
            vec![
                json!({"id": "r-1", "child_id": "c-1", "period": "Güz", "created_at": "2025-12-01T00:00:00Z"}),
                json!({"id": "r-2", "child_id": "c-1", "period": "Bahar", "created_at": "2026-05-01T00:00:00Z"}),
                json!({"id": "r-3", "child_id": "c-2", "period": "Bahar", "created_at": "2026-05-02T00:00:00Z"}),
            ],
        );
        let reports = reports_for(&gateway, &viewer(Role::Admin, "u-admin"), "c-1").await.unwrap();
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r-2", "r-1"]);
    }
}
