//! Job Entities
//!
//! Openings posted on the careers page and the applications submitted against
//! them. Applications reference applicants only by email; there is no foreign key.

use serde::{Deserialize, Serialize};

use super::date::FlexDate;
use super::entity::{blank_fields, Entity};
use crate::filter::{self, FieldValue, Filterable};

/// Application status values used by the careers page and the dashboard
pub mod status {
    pub const SUBMITTED: &str = "submitted";
    pub const GENERAL_SUBMISSION: &str = "general_submission";
    pub const PENDING: &str = "pending";
}

/// An open position (`jobopenings`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOpening {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<FlexDate>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<FlexDate>,
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<FlexDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<FlexDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Entity for JobOpening {
    const COLLECTION: &'static str = "jobopenings";
    const LABEL: &'static str = "Job opening";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[("jobTitle", &self.job_title)])
    }
}

impl Filterable for JobOpening {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.job_title.as_deref(),
            self.job_description.as_deref(),
            self.department.as_deref(),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "jobTitle" => filter::text(&self.job_title),
            "department" => filter::text(&self.department),
            "location" => filter::text(&self.location),
            "employmentType" => filter::text(&self.employment_type),
            "datePosted" => filter::date(&self.date_posted),
            "applicationDeadline" => filter::date(&self.application_deadline),
            "isActive" => filter::flag(self.is_active),
            _ => None,
        }
    }
}

/// A candidate's application (`jobapplications`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<FlexDate>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<FlexDate>,
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Generated resume text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_file: Option<String>,
    /// Skills joined with ", "
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<FlexDate>,
}

impl JobApplication {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .map(|s| s.split(", ").map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl Entity for JobApplication {
    const COLLECTION: &'static str = "jobapplications";
    const LABEL: &'static str = "Application";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
        ])
    }
}

impl Filterable for JobApplication {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
            self.skills.as_deref(),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "email" => filter::text(&self.email),
            "applicationStatus" => filter::text(&self.application_status),
            "skills" => filter::text(&self.skills),
            "yearsOfExperience" => filter::number(self.years_of_experience),
            "submissionDate" => filter::date(&self.submission_date),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_tolerates_missing_parts() {
        let app = JobApplication {
            first_name: Some("Ada".into()),
            ..Default::default()
        };
        assert_eq!(app.full_name(), "Ada");
    }

    #[test]
    fn test_skill_list_splits_on_comma_space() {
        let app = JobApplication {
            skills: Some("Rust, SQL, Go".into()),
            ..Default::default()
        };
        assert_eq!(app.skill_list(), vec!["Rust", "SQL", "Go"]);
    }
}
