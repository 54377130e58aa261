/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::{Datelike, NaiveDate};

use super::consts::*;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().replace(char::from(25), "")
}

/// Trims a display name and checks it is usable as a project, milestone or
/// version name.
pub fn validate_name(field: &str, s: &str) -> Result<String, String> {
    let name = s.trim();

    if name.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "{} cannot exceed {} characters",
            field, MAX_NAME_LENGTH
        ));
    }

    if name.chars().any(char::is_control) {
        return Err(format!("{} cannot contain control characters", field));
    }

    Ok(name.to_string())
}

pub fn validate_description(s: &str) -> Result<String, String> {
    let description = s.trim();

    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }

    Ok(description.to_string())
}

pub fn parse_due_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Due date cannot be empty".to_string());
    }

    // chrono's %Y accepts any digit count, so "10/10/18" would land in year 18
    DUE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .filter(|date| date.year() >= MIN_DUE_DATE_YEAR)
        .ok_or_else(|| format!("`{}` is not a valid date", s))
}

pub fn check_username(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("Username cannot be empty".to_string());
    }

    if s.len() > 150 {
        return Err("Username cannot exceed 150 characters".to_string());
    }

    if s != s.to_lowercase() {
        return Err("Username must be lowercase".to_string());
    }

    if s.contains(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_') {
        return Err("Username can only contain letters, numbers, dashes and underscores".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < *PASSWORD_LENGTH.start() {
        return Err(format!(
            "Password must be at least {} characters long",
            PASSWORD_LENGTH.start()
        ));
    }

    if password.len() > *PASSWORD_LENGTH.end() {
        return Err(format!(
            "Password cannot exceed {} characters",
            PASSWORD_LENGTH.end()
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("Password cannot be entirely numeric".to_string());
    }

    Ok(())
}
