/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{TrackerError, TrackerResult};
use super::input::{parse_due_date, validate_description, validate_name};
use super::types::{MMilestone, MProject, MVersion};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MilestoneForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub due_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VersionForm {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MemberForm {
    pub username: String,
}

pub(crate) struct CleanProject {
    pub name: String,
    pub description: String,
}

pub(crate) struct CleanMilestone {
    pub name: String,
    pub description: String,
    pub due_date: NaiveDate,
}

impl ProjectForm {
    pub(crate) fn clean(&self) -> TrackerResult<CleanProject> {
        Ok(CleanProject {
            name: validate_name("Name", &self.name).map_err(TrackerError::Validation)?,
            description: validate_description(&self.description)
                .map_err(TrackerError::Validation)?,
        })
    }
}

impl MilestoneForm {
    pub(crate) fn clean(&self) -> TrackerResult<CleanMilestone> {
        Ok(CleanMilestone {
            name: validate_name("Name", &self.name).map_err(TrackerError::Validation)?,
            description: validate_description(&self.description)
                .map_err(TrackerError::Validation)?,
            due_date: parse_due_date(&self.due_date).map_err(TrackerError::Validation)?,
        })
    }
}

impl VersionForm {
    pub(crate) fn clean(&self) -> TrackerResult<String> {
        validate_name("Name", &self.name).map_err(TrackerError::Validation)
    }
}

impl From<&MProject> for ProjectForm {
    fn from(project: &MProject) -> Self {
        ProjectForm {
            name: project.name.clone(),
            description: project.description.clone(),
        }
    }
}

impl From<&MMilestone> for MilestoneForm {
    fn from(milestone: &MMilestone) -> Self {
        MilestoneForm {
            name: milestone.name.clone(),
            description: milestone.description.clone(),
            due_date: milestone.due_date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&MVersion> for VersionForm {
    fn from(version: &MVersion) -> Self {
        VersionForm {
            name: version.name.clone(),
        }
    }
}
