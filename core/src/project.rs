/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::Utc;
use entity::project_permission::PermissionKind;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::OnConflict,
};
use serde::{Deserialize, Serialize};

use super::database::{get_project_members, get_user_by_username};
use super::error::{TrackerError, TrackerResult};
use super::forms::*;
use super::permission::{self, Authorizer};
use super::types::*;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectDetail {
    pub project: MProject,
    pub owner: Option<String>,
    pub members: ListResponse,
    pub milestones: Vec<MMilestone>,
    pub versions: Vec<MVersion>,
}

/// Row counts removed by [`cascade_delete_project`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub milestones: u64,
    pub versions: u64,
    pub members: u64,
    pub grants: u64,
    pub projects: u64,
}

/// A fresh project nobody owns yet. `owner` stays `None` until a user is
/// assigned; an unowned project carries no grants at all.
pub fn unowned_project(name: String, description: String) -> AProject {
    AProject {
        id: NotSet,
        name: Set(name),
        description: Set(description),
        owner: Set(None),
        created_at: Set(Utc::now().naive_utc()),
    }
}

/// Deletes a project and every row referencing it: milestones, versions,
/// memberships and grants. Children go first so no foreign key is left
/// dangling; run it on a transaction.
pub async fn cascade_delete_project<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
) -> Result<CascadeReport, DbErr> {
    let milestones = EMilestone::delete_many()
        .filter(CMilestone::Project.eq(project_id))
        .exec(db)
        .await?
        .rows_affected;

    let versions = EVersion::delete_many()
        .filter(CVersion::Project.eq(project_id))
        .exec(db)
        .await?
        .rows_affected;

    let members = EProjectMember::delete_many()
        .filter(CProjectMember::Project.eq(project_id))
        .exec(db)
        .await?
        .rows_affected;

    let grants = permission::purge_project(db, project_id).await?;

    let projects = EProject::delete_by_id(project_id)
        .exec(db)
        .await?
        .rows_affected;

    Ok(CascadeReport {
        milestones,
        versions,
        members,
        grants,
        projects,
    })
}

async fn find_project<C: ConnectionTrait>(db: &C, id: i32) -> TrackerResult<MProject> {
    EProject::find_by_id(id)
        .one(db)
        .await?
        .ok_or(TrackerError::NotFound("Project"))
}

async fn find_milestone<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> TrackerResult<(MMilestone, MProject)> {
    let milestone = EMilestone::find_by_id(id)
        .one(db)
        .await?
        .ok_or(TrackerError::NotFound("Milestone"))?;
    let project = find_project(db, milestone.project).await?;
    Ok((milestone, project))
}

async fn find_version<C: ConnectionTrait>(db: &C, id: i32) -> TrackerResult<(MVersion, MProject)> {
    let version = EVersion::find_by_id(id)
        .one(db)
        .await?
        .ok_or(TrackerError::NotFound("Version"))?;
    let project = find_project(db, version.project).await?;
    Ok((version, project))
}

async fn find_user_by_username<C: ConnectionTrait>(db: &C, username: &str) -> TrackerResult<MUser> {
    get_user_by_username(db, username.trim())
        .await?
        .ok_or(TrackerError::NotFound("User"))
}

/// Inserts the membership edge unless it already exists; returns whether a
/// row was written. Concurrent adds of the same member both succeed.
async fn insert_member<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    user_id: i32,
) -> Result<bool, DbErr> {
    let amember = AProjectMember {
        id: NotSet,
        project: Set(project_id),
        user: Set(user_id),
    };

    let res = EProjectMember::insert(amember)
        .on_conflict(
            OnConflict::columns([CProjectMember::Project, CProjectMember::User])
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await;

    match res {
        Ok(_) => Ok(true),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Project, milestone, version and membership operations. Every gated
/// operation looks its object up first, then asks the injected
/// [`Authorizer`] about the owning project.
pub struct ProjectService<'a, A: Authorizer> {
    db: &'a DatabaseConnection,
    authorizer: &'a A,
}

impl<'a, A: Authorizer> ProjectService<'a, A> {
    pub fn new(db: &'a DatabaseConnection, authorizer: &'a A) -> Self {
        ProjectService { db, authorizer }
    }

    async fn authorize<C>(
        &self,
        db: &C,
        actor: &Actor,
        kind: PermissionKind,
        project: &MProject,
    ) -> TrackerResult<()>
    where
        C: ConnectionTrait + Sync,
    {
        let user = actor.user()?;

        if self.authorizer.check(db, user, kind, project.id).await? {
            tracing::debug!(user = %user.username, project = project.id, %kind, "Permission granted");
            Ok(())
        } else {
            tracing::warn!(
                user = %user.username,
                project = project.id,
                %kind,
                "Permission denied"
            );
            Err(TrackerError::PermissionDenied)
        }
    }

    pub async fn list_projects(&self) -> TrackerResult<Vec<MProject>> {
        Ok(EProject::find()
            .order_by_asc(CProject::Id)
            .all(self.db)
            .await?)
    }

    /// Public view of a project; no permission is required.
    pub async fn project_detail(&self, id: i32) -> TrackerResult<ProjectDetail> {
        let project = find_project(self.db, id).await?;

        let owner = match project.owner {
            Some(owner) => EUser::find_by_id(owner)
                .one(self.db)
                .await?
                .map(|u| u.username),
            None => None,
        };

        let members = get_project_members(self.db, project.id)
            .await?
            .into_iter()
            .map(|u| ListItem {
                id: u.id,
                name: u.username,
            })
            .collect();

        let milestones = EMilestone::find()
            .filter(CMilestone::Project.eq(project.id))
            .order_by_asc(CMilestone::DueDate)
            .order_by_asc(CMilestone::Id)
            .all(self.db)
            .await?;

        let versions = EVersion::find()
            .filter(CVersion::Project.eq(project.id))
            .order_by_asc(CVersion::Id)
            .all(self.db)
            .await?;

        Ok(ProjectDetail {
            project,
            owner,
            members,
            milestones,
            versions,
        })
    }

    pub fn start_form(&self, actor: &Actor) -> TrackerResult<ProjectForm> {
        actor.user()?;
        Ok(ProjectForm::default())
    }

    /// Creates a project owned by the actor, who receives every permission
    /// kind on it in the same transaction.
    pub async fn create_project(&self, actor: &Actor, form: &ProjectForm) -> TrackerResult<MProject> {
        let user = actor.user()?;
        let form = form.clean()?;

        let txn = self.db.begin().await?;

        let mut aproject = unowned_project(form.name, form.description);
        aproject.owner = Set(Some(user.id));
        let project = aproject.insert(&txn).await?;

        permission::grant_all(&txn, user.id, project.id).await?;
        txn.commit().await?;

        tracing::info!(project = project.id, owner = %user.username, "Project created");
        Ok(project)
    }

    pub async fn update_form(&self, actor: &Actor, id: i32) -> TrackerResult<ProjectForm> {
        let project = find_project(self.db, id).await?;
        self.authorize(self.db, actor, PermissionKind::Change, &project)
            .await?;
        Ok(ProjectForm::from(&project))
    }

    /// Changes name and description. Owner and grants are left alone.
    pub async fn update_project(
        &self,
        actor: &Actor,
        id: i32,
        form: &ProjectForm,
    ) -> TrackerResult<MProject> {
        let txn = self.db.begin().await?;

        let project = find_project(&txn, id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;
        let form = form.clean()?;

        let mut aproject: AProject = project.into();
        aproject.name = Set(form.name);
        aproject.description = Set(form.description);
        let project = aproject.update(&txn).await?;

        txn.commit().await?;
        Ok(project)
    }

    pub async fn delete_form(&self, actor: &Actor, id: i32) -> TrackerResult<MProject> {
        let project = find_project(self.db, id).await?;
        self.authorize(self.db, actor, PermissionKind::Delete, &project)
            .await?;
        Ok(project)
    }

    pub async fn delete_project(&self, actor: &Actor, id: i32) -> TrackerResult<CascadeReport> {
        let txn = self.db.begin().await?;

        let project = find_project(&txn, id).await?;
        self.authorize(&txn, actor, PermissionKind::Delete, &project)
            .await?;

        let report = cascade_delete_project(&txn, project.id).await?;
        txn.commit().await?;

        tracing::info!(project = project.id, ?report, "Project deleted");
        Ok(report)
    }

    /// Assigns a new owner and grants them every permission kind. Grants
    /// held by the previous owner are kept.
    pub async fn transfer_ownership(
        &self,
        actor: &Actor,
        id: i32,
        form: &MemberForm,
    ) -> TrackerResult<MProject> {
        let txn = self.db.begin().await?;

        let project = find_project(&txn, id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;
        let new_owner = find_user_by_username(&txn, &form.username).await?;

        let mut aproject: AProject = project.into();
        aproject.owner = Set(Some(new_owner.id));
        let project = aproject.update(&txn).await?;

        permission::grant_all(&txn, new_owner.id, project.id).await?;
        txn.commit().await?;

        tracing::info!(project = project.id, owner = %new_owner.username, "Project ownership transferred");
        Ok(project)
    }

    pub async fn add_milestone_form(&self, actor: &Actor, project_id: i32) -> TrackerResult<MProject> {
        let project = find_project(self.db, project_id).await?;
        self.authorize(self.db, actor, PermissionKind::Change, &project)
            .await?;
        Ok(project)
    }

    pub async fn add_milestone(
        &self,
        actor: &Actor,
        project_id: i32,
        form: &MilestoneForm,
    ) -> TrackerResult<MMilestone> {
        let txn = self.db.begin().await?;

        let project = find_project(&txn, project_id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;
        let form = form.clean()?;

        let amilestone = AMilestone {
            id: NotSet,
            project: Set(project.id),
            name: Set(form.name),
            description: Set(form.description),
            due_date: Set(form.due_date),
        };
        let milestone = amilestone.insert(&txn).await?;

        txn.commit().await?;
        Ok(milestone)
    }

    pub async fn milestone(&self, actor: &Actor, id: i32) -> TrackerResult<MMilestone> {
        let (milestone, project) = find_milestone(self.db, id).await?;
        self.authorize(self.db, actor, PermissionKind::Change, &project)
            .await?;
        Ok(milestone)
    }

    pub async fn update_milestone(
        &self,
        actor: &Actor,
        id: i32,
        form: &MilestoneForm,
    ) -> TrackerResult<MMilestone> {
        let txn = self.db.begin().await?;

        let (milestone, project) = find_milestone(&txn, id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;
        let form = form.clean()?;

        let mut amilestone: AMilestone = milestone.into();
        amilestone.name = Set(form.name);
        amilestone.description = Set(form.description);
        amilestone.due_date = Set(form.due_date);
        let milestone = amilestone.update(&txn).await?;

        txn.commit().await?;
        Ok(milestone)
    }

    pub async fn delete_milestone(&self, actor: &Actor, id: i32) -> TrackerResult<MMilestone> {
        let txn = self.db.begin().await?;

        let (milestone, project) = find_milestone(&txn, id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;

        EMilestone::delete_by_id(milestone.id).exec(&txn).await?;
        txn.commit().await?;
        Ok(milestone)
    }

    pub async fn add_version_form(&self, actor: &Actor, project_id: i32) -> TrackerResult<MProject> {
        let project = find_project(self.db, project_id).await?;
        self.authorize(self.db, actor, PermissionKind::Change, &project)
            .await?;
        Ok(project)
    }

    pub async fn add_version(
        &self,
        actor: &Actor,
        project_id: i32,
        form: &VersionForm,
    ) -> TrackerResult<MVersion> {
        let txn = self.db.begin().await?;

        let project = find_project(&txn, project_id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;
        let name = form.clean()?;

        let aversion = AVersion {
            id: NotSet,
            project: Set(project.id),
            name: Set(name),
        };
        let version = aversion.insert(&txn).await?;

        txn.commit().await?;
        Ok(version)
    }

    pub async fn version(&self, actor: &Actor, id: i32) -> TrackerResult<MVersion> {
        let (version, project) = find_version(self.db, id).await?;
        self.authorize(self.db, actor, PermissionKind::Change, &project)
            .await?;
        Ok(version)
    }

    pub async fn update_version(
        &self,
        actor: &Actor,
        id: i32,
        form: &VersionForm,
    ) -> TrackerResult<MVersion> {
        let txn = self.db.begin().await?;

        let (version, project) = find_version(&txn, id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;
        let name = form.clean()?;

        let mut aversion: AVersion = version.into();
        aversion.name = Set(name);
        let version = aversion.update(&txn).await?;

        txn.commit().await?;
        Ok(version)
    }

    pub async fn delete_version(&self, actor: &Actor, id: i32) -> TrackerResult<MVersion> {
        let txn = self.db.begin().await?;

        let (version, project) = find_version(&txn, id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;

        EVersion::delete_by_id(version.id).exec(&txn).await?;
        txn.commit().await?;
        Ok(version)
    }

    pub async fn member_form(&self, actor: &Actor, project_id: i32) -> TrackerResult<ListResponse> {
        let project = find_project(self.db, project_id).await?;
        self.authorize(self.db, actor, PermissionKind::Change, &project)
            .await?;

        Ok(get_project_members(self.db, project.id)
            .await?
            .into_iter()
            .map(|u| ListItem {
                id: u.id,
                name: u.username,
            })
            .collect())
    }

    /// Adds a member by username. Adding an existing member changes nothing.
    pub async fn add_member(
        &self,
        actor: &Actor,
        project_id: i32,
        form: &MemberForm,
    ) -> TrackerResult<MUser> {
        let txn = self.db.begin().await?;

        let project = find_project(&txn, project_id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;
        let member = find_user_by_username(&txn, &form.username).await?;

        if insert_member(&txn, project.id, member.id).await? {
            tracing::info!(project = project.id, member = %member.username, "Member added");
        }

        txn.commit().await?;
        Ok(member)
    }

    pub async fn remove_member_form(
        &self,
        actor: &Actor,
        project_id: i32,
        user_id: i32,
    ) -> TrackerResult<MUser> {
        let project = find_project(self.db, project_id).await?;
        self.authorize(self.db, actor, PermissionKind::Change, &project)
            .await?;

        EUser::find_by_id(user_id)
            .one(self.db)
            .await?
            .ok_or(TrackerError::NotFound("User"))
    }

    /// Removes the membership edge if there is one; returns whether it existed.
    pub async fn remove_member(
        &self,
        actor: &Actor,
        project_id: i32,
        user_id: i32,
    ) -> TrackerResult<bool> {
        let txn = self.db.begin().await?;

        let project = find_project(&txn, project_id).await?;
        self.authorize(&txn, actor, PermissionKind::Change, &project)
            .await?;

        let res = EProjectMember::delete_many()
            .filter(CProjectMember::Project.eq(project.id))
            .filter(CProjectMember::User.eq(user_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }
}
