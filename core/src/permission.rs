/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use async_trait::async_trait;
use entity::project_permission::PermissionKind;
use sea_orm::{
    ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, sea_query::OnConflict,
};

use super::types::*;

/// Decides whether a user may act on a project.
///
/// Every kind is checked on its own: holding `change` or `delete` does not
/// imply `view`.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn check<C>(
        &self,
        db: &C,
        user: &MUser,
        kind: PermissionKind,
        project: i32,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait + Sync;

    async fn can_view<C>(&self, db: &C, user: &MUser, project: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait + Sync,
    {
        self.check(db, user, PermissionKind::View, project).await
    }

    async fn can_change<C>(&self, db: &C, user: &MUser, project: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait + Sync,
    {
        self.check(db, user, PermissionKind::Change, project).await
    }

    async fn can_delete<C>(&self, db: &C, user: &MUser, project: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait + Sync,
    {
        self.check(db, user, PermissionKind::Delete, project).await
    }
}

/// Looks grants up in the `project_permission` table. Staff users pass every
/// check.
#[derive(Copy, Clone, Debug, Default)]
pub struct GrantAuthorizer;

#[async_trait]
impl Authorizer for GrantAuthorizer {
    async fn check<C>(
        &self,
        db: &C,
        user: &MUser,
        kind: PermissionKind,
        project: i32,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait + Sync,
    {
        if user.is_staff {
            return Ok(true);
        }

        has_grant(db, user.id, kind, project).await
    }
}

pub async fn has_grant<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    kind: PermissionKind,
    project_id: i32,
) -> Result<bool, DbErr> {
    Ok(EProjectPermission::find()
        .filter(
            Condition::all()
                .add(CProjectPermission::User.eq(user_id))
                .add(CProjectPermission::Project.eq(project_id))
                .add(CProjectPermission::Kind.eq(kind)),
        )
        .one(db)
        .await?
        .is_some())
}

/// Records a grant. Granting something already held is a no-op, also when two
/// callers race on the same grant.
pub async fn grant<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    kind: PermissionKind,
    project_id: i32,
) -> Result<(), DbErr> {
    let agrant = AProjectPermission {
        id: NotSet,
        user: Set(user_id),
        project: Set(project_id),
        kind: Set(kind),
    };

    let res = EProjectPermission::insert(agrant)
        .on_conflict(
            OnConflict::columns([
                CProjectPermission::User,
                CProjectPermission::Project,
                CProjectPermission::Kind,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(db)
        .await;

    match res {
        Ok(_) => {
            tracing::debug!(user = user_id, project = project_id, %kind, "Grant recorded");
            Ok(())
        }
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}

pub async fn grant_all<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
) -> Result<(), DbErr> {
    for kind in PermissionKind::ALL {
        grant(db, user_id, kind, project_id).await?;
    }

    Ok(())
}

/// Removes a grant, returning whether one was held.
pub async fn revoke<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    kind: PermissionKind,
    project_id: i32,
) -> Result<bool, DbErr> {
    let res = EProjectPermission::delete_many()
        .filter(
            Condition::all()
                .add(CProjectPermission::User.eq(user_id))
                .add(CProjectPermission::Project.eq(project_id))
                .add(CProjectPermission::Kind.eq(kind)),
        )
        .exec(db)
        .await?;

    Ok(res.rows_affected > 0)
}

pub async fn grants_for<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
) -> Result<Vec<PermissionKind>, DbErr> {
    Ok(EProjectPermission::find()
        .filter(
            Condition::all()
                .add(CProjectPermission::User.eq(user_id))
                .add(CProjectPermission::Project.eq(project_id)),
        )
        .order_by_asc(CProjectPermission::Kind)
        .all(db)
        .await?
        .into_iter()
        .map(|g| g.kind)
        .collect())
}

/// Drops every grant targeting the project.
pub async fn purge_project<C: ConnectionTrait>(db: &C, project_id: i32) -> Result<u64, DbErr> {
    let res = EProjectPermission::delete_many()
        .filter(CProjectPermission::Project.eq(project_id))
        .exec(db)
        .await?;

    Ok(res.rows_affected)
}
