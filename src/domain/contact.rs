//! Contact Submission Entity
//!
//! Messages sent from the contact form (`contactsubmissions`).

use serde::{Deserialize, Serialize};

use super::date::FlexDate;
use super::entity::{blank_fields, Entity};
use crate::filter::{self, FieldValue, Filterable};

pub const STATUS_NEW: &str = "new";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<FlexDate>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<FlexDate>,
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<FlexDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Entity for ContactSubmission {
    const COLLECTION: &'static str = "contactsubmissions";
    const LABEL: &'static str = "Message";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ])
    }
}

impl Filterable for ContactSubmission {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.name.as_deref(),
            self.email.as_deref(),
            self.subject.as_deref(),
            self.message.as_deref(),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "email" => filter::text(&self.email),
            "status" => filter::text(&self.status),
            "submissionDate" => filter::date(&self.submission_date),
            _ => None,
        }
    }
}
