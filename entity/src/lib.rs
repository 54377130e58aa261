/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod milestone;
pub mod project;
pub mod project_member;
pub mod project_permission;
pub mod user;
pub mod version;
