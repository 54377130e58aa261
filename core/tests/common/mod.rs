/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, DatabaseConnection};
use tracker_core::database::connect_url;
use tracker_core::forms::ProjectForm;
use tracker_core::types::*;

pub async fn memory_db() -> DatabaseConnection {
    connect_url("sqlite::memory:", false)
        .await
        .expect("in-memory database")
}

async fn insert_user(db: &DatabaseConnection, username: &str, is_staff: bool) -> MUser {
    AUser {
        id: NotSet,
        username: Set(username.to_string()),
        name: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password: Set("unused".to_string()),
        is_staff: Set(is_staff),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> MUser {
    insert_user(db, username, false).await
}

pub async fn create_staff(db: &DatabaseConnection, username: &str) -> MUser {
    insert_user(db, username, true).await
}

pub fn project_form(name: &str, description: &str) -> ProjectForm {
    ProjectForm {
        name: name.to_string(),
        description: description.to_string(),
    }
}
