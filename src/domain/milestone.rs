//! Company Milestone Entity

use serde::{Deserialize, Serialize};

use super::date::FlexDate;
use super::entity::{blank_fields, Entity};
use crate::filter::{self, FieldValue, Filterable};

/// A point on the company timeline (`companymilestones`), ordered by `displayOrder`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMilestone {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<FlexDate>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<FlexDate>,
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_date: Option<FlexDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_achieved: Option<bool>,
}

impl Entity for CompanyMilestone {
    const COLLECTION: &'static str = "companymilestones";
    const LABEL: &'static str = "Milestone";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[("milestoneTitle", &self.milestone_title)])
    }
}

impl Filterable for CompanyMilestone {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.milestone_title.as_deref(), self.description.as_deref()]
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "milestoneTitle" => filter::text(&self.milestone_title),
            "milestoneDate" => filter::date(&self.milestone_date),
            "displayOrder" => filter::number(self.display_order),
            "isAchieved" => filter::flag(self.is_achieved),
            _ => None,
        }
    }
}
