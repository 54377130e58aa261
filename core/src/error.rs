/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Transaction failed: {0}")]
    Transaction(#[from] DbErr),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
