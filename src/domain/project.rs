//! Project Entity
//!
//! Portfolio entries. `tags` is a comma-separated string.

use serde::{Deserialize, Serialize};

use super::date::FlexDate;
use super::entity::{blank_fields, Entity};
use crate::filter::{self, FieldValue, Filterable};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<FlexDate>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<FlexDate>,
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<FlexDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
}

impl Project {
    /// Trimmed tag tokens
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.as_deref().map(|t| filter::split_tags(t).collect()).unwrap_or_default()
    }
}

impl Entity for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[("projectName", &self.project_name)])
    }
}

impl Filterable for Project {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.project_name.as_deref(),
            self.project_description.as_deref(),
            self.client_name.as_deref(),
            self.tags.as_deref(),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "projectName" => filter::text(&self.project_name),
            "clientName" => filter::text(&self.client_name),
            "tags" => filter::text(&self.tags),
            "completionDate" => filter::date(&self.completion_date),
            _ => None,
        }
    }
}
