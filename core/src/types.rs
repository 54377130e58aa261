/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::error::{TrackerError, TrackerResult};
use super::input::port_in_range;
use super::permission::GrantAuthorizer;
use super::project::ProjectService;
use clap::{Parser, ValueEnum};
use entity::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Tracker", display_name = "Tracker", bin_name = "tracker-server", author = "Wavelens", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "TRACKER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "TRACKER_LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
    #[arg(long, env = "TRACKER_DEBUG", default_value = "false")]
    pub debug: bool,
    #[arg(long, env = "TRACKER_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "TRACKER_PORT", value_parser = port_in_range, default_value_t = 3000)]
    pub port: u16,
    #[arg(long, env = "TRACKER_SERVE_URL", default_value = "http://127.0.0.1:8000")]
    pub serve_url: String,
    #[arg(long, env = "TRACKER_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "TRACKER_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "TRACKER_JWT_SECRET_FILE")]
    pub jwt_secret_file: String,
    #[arg(long, env = "TRACKER_DISABLE_REGISTRATION", default_value = "false")]
    pub disable_registration: bool,
}

pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
    pub authorizer: GrantAuthorizer,
    /// HS256 key for session tokens, read once at startup; never empty.
    pub jwt_secret: String,
}

impl fmt::Debug for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerState")
            .field("db", &self.db)
            .field("cli", &self.cli)
            .field("authorizer", &self.authorizer)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    pub fn projects(&self) -> ProjectService<'_, GrantAuthorizer> {
        ProjectService::new(&self.db, &self.authorizer)
    }
}

/// Identity attached to a request by the transport layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Actor {
    Anonymous,
    User(MUser),
}

impl Actor {
    pub fn user(&self) -> TrackerResult<&MUser> {
        match self {
            Actor::User(user) => Ok(user),
            Actor::Anonymous => Err(TrackerError::AuthenticationRequired),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BaseResponse<T> {
    pub error: bool,
    pub message: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: i32,
    pub name: String,
}

pub type ListResponse = Vec<ListItem>;

pub type EMilestone = milestone::Entity;
pub type EProject = project::Entity;
pub type EProjectMember = project_member::Entity;
pub type EProjectPermission = project_permission::Entity;
pub type EUser = user::Entity;
pub type EVersion = version::Entity;

pub type MMilestone = milestone::Model;
pub type MProject = project::Model;
pub type MProjectMember = project_member::Model;
pub type MProjectPermission = project_permission::Model;
pub type MUser = user::Model;
pub type MVersion = version::Model;

pub type AMilestone = milestone::ActiveModel;
pub type AProject = project::ActiveModel;
pub type AProjectMember = project_member::ActiveModel;
pub type AProjectPermission = project_permission::ActiveModel;
pub type AUser = user::ActiveModel;
pub type AVersion = version::ActiveModel;

pub type CMilestone = milestone::Column;
pub type CProject = project::Column;
pub type CProjectMember = project_member::Column;
pub type CProjectPermission = project_permission::Column;
pub type CUser = user::Column;
pub type CVersion = version::Column;
