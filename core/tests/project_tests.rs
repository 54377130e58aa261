/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for project, milestone, version and membership operations

mod common;

use async_trait::async_trait;
use common::*;
use entity::project_permission::PermissionKind;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, TransactionTrait};
use tracker_core::error::TrackerError;
use tracker_core::forms::*;
use tracker_core::permission::{GrantAuthorizer, grant, grants_for};
use tracker_core::project::{ProjectService, cascade_delete_project};
use tracker_core::types::*;

struct DenyAll;

#[async_trait]
impl tracker_core::permission::Authorizer for DenyAll {
    async fn check<C>(
        &self,
        _db: &C,
        _user: &MUser,
        _kind: PermissionKind,
        _project: i32,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait + Sync,
    {
        Ok(false)
    }
}

struct AllowAll;

#[async_trait]
impl tracker_core::permission::Authorizer for AllowAll {
    async fn check<C>(
        &self,
        _db: &C,
        _user: &MUser,
        _kind: PermissionKind,
        _project: i32,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait + Sync,
    {
        Ok(true)
    }
}

fn milestone_form(name: &str, due_date: &str) -> MilestoneForm {
    MilestoneForm {
        name: name.to_string(),
        description: String::new(),
        due_date: due_date.to_string(),
    }
}

fn member_form(username: &str) -> MemberForm {
    MemberForm {
        username: username.to_string(),
    }
}

#[tokio::test]
async fn test_project_lifecycle_scenario() {
    let db = memory_db().await;
    let test_user = create_user(&db, "test_user").await;
    let stranger = create_user(&db, "stranger").await;
    let owner = Actor::User(test_user.clone());
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    let first = projects
        .create_project(&owner, &project_form("test project 1", "first"))
        .await
        .unwrap();
    let second = projects
        .create_project(&owner, &project_form("test project 2", "second"))
        .await
        .unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.owner, Some(test_user.id));

    let detail = projects.project_detail(first.id).await.unwrap();
    assert_eq!(detail.project.name, "test project 1");
    assert_eq!(detail.owner.as_deref(), Some("test_user"));

    let updated = projects
        .update_project(&owner, first.id, &project_form("test1 updated", "first"))
        .await
        .unwrap();
    assert_eq!(updated.name, "test1 updated");
    assert_eq!(
        projects.project_detail(first.id).await.unwrap().project.name,
        "test1 updated"
    );

    let err = projects
        .update_project(
            &Actor::User(stranger),
            first.id,
            &project_form("hijacked", ""),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::PermissionDenied));
    assert_eq!(
        projects.project_detail(first.id).await.unwrap().project.name,
        "test1 updated"
    );

    projects.delete_project(&owner, second.id).await.unwrap();
    assert!(matches!(
        projects.project_detail(second.id).await.unwrap_err(),
        TrackerError::NotFound("Project")
    ));

    let milestone = projects
        .add_milestone(&owner, first.id, &milestone_form("milestone_test", "2025-06-01"))
        .await
        .unwrap();
    assert_eq!(milestone.project, first.id);

    projects.delete_project(&owner, first.id).await.unwrap();
    assert!(matches!(
        projects.milestone(&owner, milestone.id).await.unwrap_err(),
        TrackerError::NotFound("Milestone")
    ));
}

#[tokio::test]
async fn test_create_grants_owner_every_kind() {
    let db = memory_db().await;
    let alice = create_user(&db, "alice").await;
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    let project = projects
        .create_project(&Actor::User(alice.clone()), &project_form("P", ""))
        .await
        .unwrap();

    assert_eq!(
        grants_for(&db, alice.id, project.id).await.unwrap(),
        PermissionKind::ALL.to_vec()
    );
}

#[tokio::test]
async fn test_anonymous_cannot_mutate() {
    let db = memory_db().await;
    let alice = create_user(&db, "alice").await;
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&Actor::User(alice), &project_form("P", ""))
        .await
        .unwrap();

    assert!(matches!(
        projects.start_form(&Actor::Anonymous).unwrap_err(),
        TrackerError::AuthenticationRequired
    ));
    assert!(matches!(
        projects
            .create_project(&Actor::Anonymous, &project_form("Q", ""))
            .await
            .unwrap_err(),
        TrackerError::AuthenticationRequired
    ));
    assert!(matches!(
        projects
            .delete_project(&Actor::Anonymous, project.id)
            .await
            .unwrap_err(),
        TrackerError::AuthenticationRequired
    ));

    assert_eq!(projects.list_projects().await.unwrap().len(), 1);
    assert!(projects.project_detail(project.id).await.is_ok());
}

#[tokio::test]
async fn test_missing_objects_are_not_found() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    assert!(matches!(
        projects.update_form(&alice, 42).await.unwrap_err(),
        TrackerError::NotFound("Project")
    ));
    assert!(matches!(
        projects
            .add_version(&alice, 42, &VersionForm { name: "1.0".into() })
            .await
            .unwrap_err(),
        TrackerError::NotFound("Project")
    ));
    assert!(matches!(
        projects.delete_version(&alice, 7).await.unwrap_err(),
        TrackerError::NotFound("Version")
    ));
    assert!(matches!(
        projects
            .update_milestone(&alice, 7, &milestone_form("m", "2025-01-01"))
            .await
            .unwrap_err(),
        TrackerError::NotFound("Milestone")
    ));

    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();
    assert!(matches!(
        projects
            .add_member(&alice, project.id, &member_form("ghost"))
            .await
            .unwrap_err(),
        TrackerError::NotFound("User")
    ));
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    assert!(matches!(
        projects
            .create_project(&alice, &project_form("  ", ""))
            .await
            .unwrap_err(),
        TrackerError::Validation(_)
    ));
    assert_eq!(EProject::find().count(&db).await.unwrap(), 0);

    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();
    assert!(matches!(
        projects
            .add_milestone(&alice, project.id, &milestone_form("m", "not a date"))
            .await
            .unwrap_err(),
        TrackerError::Validation(_)
    ));
}

#[tokio::test]
async fn test_children_are_gated_on_parent_project() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let bob_user = create_user(&db, "bob").await;
    let bob = Actor::User(bob_user.clone());
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();
    let version = projects
        .add_version(&alice, project.id, &VersionForm { name: "1.0".into() })
        .await
        .unwrap();

    assert!(matches!(
        projects
            .update_version(&bob, version.id, &VersionForm { name: "2.0".into() })
            .await
            .unwrap_err(),
        TrackerError::PermissionDenied
    ));

    grant(&db, bob_user.id, PermissionKind::Change, project.id)
        .await
        .unwrap();
    let version = projects
        .update_version(&bob, version.id, &VersionForm { name: "2.0".into() })
        .await
        .unwrap();
    assert_eq!(version.name, "2.0");

    // change alone does not allow deleting the project
    assert!(matches!(
        projects.delete_project(&bob, project.id).await.unwrap_err(),
        TrackerError::PermissionDenied
    ));
}

#[tokio::test]
async fn test_milestones_ordered_by_due_date() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();

    projects
        .add_milestone(&alice, project.id, &milestone_form("late", "12/31/2025"))
        .await
        .unwrap();
    projects
        .add_milestone(&alice, project.id, &milestone_form("early", "2025-01-15"))
        .await
        .unwrap();

    let detail = projects.project_detail(project.id).await.unwrap();
    let names: Vec<&str> = detail.milestones.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["early", "late"]);

    let updated = projects
        .update_milestone(&alice, detail.milestones[0].id, &milestone_form("earliest", "2024-01-01"))
        .await
        .unwrap();
    assert_eq!(
        MilestoneForm::from(&updated).due_date,
        "2024-01-01".to_string()
    );
}

#[tokio::test]
async fn test_cascade_delete_removes_everything() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    create_user(&db, "bob").await;
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    let doomed = projects
        .create_project(&alice, &project_form("Doomed", ""))
        .await
        .unwrap();
    let kept = projects
        .create_project(&alice, &project_form("Kept", ""))
        .await
        .unwrap();

    for project in [doomed.id, kept.id] {
        projects
            .add_milestone(&alice, project, &milestone_form("m", "2025-01-01"))
            .await
            .unwrap();
        projects
            .add_version(&alice, project, &VersionForm { name: "1.0".into() })
            .await
            .unwrap();
        projects
            .add_member(&alice, project, &member_form("bob"))
            .await
            .unwrap();
    }

    let report = projects.delete_project(&alice, doomed.id).await.unwrap();
    assert_eq!(report.milestones, 1);
    assert_eq!(report.versions, 1);
    assert_eq!(report.members, 1);
    assert_eq!(report.grants, 3);
    assert_eq!(report.projects, 1);

    assert_eq!(EProject::find().count(&db).await.unwrap(), 1);
    assert_eq!(EMilestone::find().count(&db).await.unwrap(), 1);
    assert_eq!(EVersion::find().count(&db).await.unwrap(), 1);
    assert_eq!(EProjectMember::find().count(&db).await.unwrap(), 1);
    assert_eq!(EProjectPermission::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_cascade_delete_rolls_back_when_not_committed() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    create_user(&db, "bob").await;
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();
    projects
        .add_milestone(&alice, project.id, &milestone_form("m", "2025-01-01"))
        .await
        .unwrap();
    projects
        .add_version(&alice, project.id, &VersionForm { name: "1.0".into() })
        .await
        .unwrap();
    projects
        .add_member(&alice, project.id, &member_form("bob"))
        .await
        .unwrap();

    let txn = db.begin().await.unwrap();
    let report = cascade_delete_project(&txn, project.id).await.unwrap();
    assert_eq!(report.projects, 1);
    assert_eq!(report.grants, 3);
    drop(txn);

    assert_eq!(EProject::find().count(&db).await.unwrap(), 1);
    assert_eq!(EMilestone::find().count(&db).await.unwrap(), 1);
    assert_eq!(EVersion::find().count(&db).await.unwrap(), 1);
    assert_eq!(EProjectMember::find().count(&db).await.unwrap(), 1);
    assert_eq!(EProjectPermission::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_denied_delete_leaves_project_intact() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let mallory = Actor::User(create_user(&db, "mallory").await);
    let projects = ProjectService::new(&db, &GrantAuthorizer);

    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();
    projects
        .add_milestone(&alice, project.id, &milestone_form("m", "2025-01-01"))
        .await
        .unwrap();

    assert!(projects.delete_project(&mallory, project.id).await.is_err());
    assert_eq!(EProject::find().count(&db).await.unwrap(), 1);
    assert_eq!(EMilestone::find().count(&db).await.unwrap(), 1);
    assert_eq!(EProjectPermission::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_membership_add_and_remove() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let bob = create_user(&db, "bob").await;
    let carol = create_user(&db, "carol").await;
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();

    projects
        .add_member(&alice, project.id, &member_form("bob"))
        .await
        .unwrap();
    projects
        .add_member(&alice, project.id, &member_form(" bob "))
        .await
        .unwrap();
    assert_eq!(EProjectMember::find().count(&db).await.unwrap(), 1);

    let members = projects.member_form(&alice, project.id).await.unwrap();
    assert_eq!(
        members,
        vec![ListItem {
            id: bob.id,
            name: "bob".to_string()
        }]
    );

    assert!(!projects
        .remove_member(&alice, project.id, carol.id)
        .await
        .unwrap());
    assert!(projects
        .remove_member(&alice, project.id, bob.id)
        .await
        .unwrap());
    assert!(!projects
        .remove_member(&alice, project.id, bob.id)
        .await
        .unwrap());
    assert_eq!(EProjectMember::find().count(&db).await.unwrap(), 0);

    assert!(matches!(
        projects
            .remove_member_form(&alice, project.id, 999)
            .await
            .unwrap_err(),
        TrackerError::NotFound("User")
    ));
}

#[tokio::test]
async fn test_concurrent_add_member_is_idempotent() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let bob = create_user(&db, "bob").await;
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();

    let form = member_form("bob");
    let (first, second) = tokio::join!(
        projects.add_member(&alice, project.id, &form),
        projects.add_member(&alice, project.id, &form),
    );
    assert_eq!(first.unwrap().id, bob.id);
    assert_eq!(second.unwrap().id, bob.id);
    assert_eq!(EProjectMember::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_membership_grants_nothing() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let bob = Actor::User(create_user(&db, "bob").await);
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();

    projects
        .add_member(&alice, project.id, &member_form("bob"))
        .await
        .unwrap();

    assert!(matches!(
        projects.update_form(&bob, project.id).await.unwrap_err(),
        TrackerError::PermissionDenied
    ));
}

#[tokio::test]
async fn test_transfer_ownership_keeps_previous_grants() {
    let db = memory_db().await;
    let alice_user = create_user(&db, "alice").await;
    let bob_user = create_user(&db, "bob").await;
    let alice = Actor::User(alice_user.clone());
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();

    let project = projects
        .transfer_ownership(&alice, project.id, &member_form("bob"))
        .await
        .unwrap();
    assert_eq!(project.owner, Some(bob_user.id));
    assert_eq!(
        grants_for(&db, bob_user.id, project.id).await.unwrap(),
        PermissionKind::ALL.to_vec()
    );
    assert_eq!(
        grants_for(&db, alice_user.id, project.id).await.unwrap(),
        PermissionKind::ALL.to_vec()
    );
}

#[tokio::test]
async fn test_staff_bypasses_grants() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let admin = Actor::User(create_staff(&db, "admin").await);
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();

    projects.delete_project(&admin, project.id).await.unwrap();
    assert_eq!(EProject::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_injected_authorizer_decides() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let bob = Actor::User(create_user(&db, "bob").await);

    let project = ProjectService::new(&db, &GrantAuthorizer)
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();

    let locked = ProjectService::new(&db, &DenyAll);
    assert!(matches!(
        locked.update_form(&alice, project.id).await.unwrap_err(),
        TrackerError::PermissionDenied
    ));

    let open = ProjectService::new(&db, &AllowAll);
    let updated = open
        .update_project(&bob, project.id, &project_form("Renamed", ""))
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");
}

#[tokio::test]
async fn test_delete_milestone() {
    let db = memory_db().await;
    let alice = Actor::User(create_user(&db, "alice").await);
    let bob = Actor::User(create_user(&db, "bob").await);
    let projects = ProjectService::new(&db, &GrantAuthorizer);
    let project = projects
        .create_project(&alice, &project_form("P", ""))
        .await
        .unwrap();
    let milestone = projects
        .add_milestone(&alice, project.id, &milestone_form("m", "2025-01-01"))
        .await
        .unwrap();

    assert!(matches!(
        projects.delete_milestone(&bob, milestone.id).await.unwrap_err(),
        TrackerError::PermissionDenied
    ));

    let deleted = projects.delete_milestone(&alice, milestone.id).await.unwrap();
    assert_eq!(deleted.id, milestone.id);
    assert_eq!(EMilestone::find().count(&db).await.unwrap(), 0);
    assert!(projects.project_detail(project.id).await.is_ok());
}
