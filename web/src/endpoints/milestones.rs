/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::{found, ok, project_detail_url};
use crate::error::WebResult;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::response::Response;
use axum::{Extension, Json};
use std::sync::Arc;
use tracker_core::forms::MilestoneForm;
use tracker_core::types::*;

pub async fn get_add(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
) -> WebResult<Json<BaseResponse<MilestoneForm>>> {
    state.projects().add_milestone_form(&actor, project).await?;
    Ok(ok(MilestoneForm::default()))
}

pub async fn post_add(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
    form: Result<Form<MilestoneForm>, FormRejection>,
) -> WebResult<Response> {
    let Form(form) = form?;
    let milestone = state
        .projects()
        .add_milestone(&actor, project, &form)
        .await?;

    Ok(found(project_detail_url(milestone.project)))
}

pub async fn get_update(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(milestone): Path<i32>,
) -> WebResult<Json<BaseResponse<MilestoneForm>>> {
    let milestone = state.projects().milestone(&actor, milestone).await?;
    Ok(ok(MilestoneForm::from(&milestone)))
}

pub async fn post_update(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(milestone): Path<i32>,
    form: Result<Form<MilestoneForm>, FormRejection>,
) -> WebResult<Json<BaseResponse<MMilestone>>> {
    let Form(form) = form?;

    Ok(ok(state
        .projects()
        .update_milestone(&actor, milestone, &form)
        .await?))
}

pub async fn get_delete(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(milestone): Path<i32>,
) -> WebResult<Json<BaseResponse<MMilestone>>> {
    Ok(ok(state.projects().milestone(&actor, milestone).await?))
}

pub async fn post_delete(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(milestone): Path<i32>,
) -> WebResult<Response> {
    let milestone = state.projects().delete_milestone(&actor, milestone).await?;
    Ok(found(project_detail_url(milestone.project)))
}
