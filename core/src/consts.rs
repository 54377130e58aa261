/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::ops::RangeInclusive;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;

pub const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=128;

/// Accepted `due_date` input formats, tried in order.
pub const DUE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Smallest year a due date may carry; the year must be written with four digits.
pub const MIN_DUE_DATE_YEAR: i32 = 1000;

pub const TOKEN_LIFETIME_HOURS: i64 = 24;
