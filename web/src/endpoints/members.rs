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
use tracker_core::forms::MemberForm;
use tracker_core::types::*;

pub async fn get_add(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
) -> WebResult<Json<BaseResponse<ListResponse>>> {
    Ok(ok(state.projects().member_form(&actor, project).await?))
}

pub async fn post_add(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path(project): Path<i32>,
    form: Result<Form<MemberForm>, FormRejection>,
) -> WebResult<Response> {
    let Form(form) = form?;
    state.projects().add_member(&actor, project, &form).await?;

    Ok(found(project_detail_url(project)))
}

pub async fn get_remove(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path((project, user)): Path<(i32, i32)>,
) -> WebResult<Json<BaseResponse<ListItem>>> {
    let user = state
        .projects()
        .remove_member_form(&actor, project, user)
        .await?;

    Ok(ok(ListItem {
        id: user.id,
        name: user.username,
    }))
}

pub async fn post_remove(
    state: State<Arc<ServerState>>,
    Extension(actor): Extension<Actor>,
    Path((project, user)): Path<(i32, i32)>,
) -> WebResult<Response> {
    state.projects().remove_member(&actor, project, user).await?;
    Ok(found(project_detail_url(project)))
}
