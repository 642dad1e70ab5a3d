//! Case Study Entity

use serde::{Deserialize, Serialize};

use super::date::FlexDate;
use super::entity::{blank_fields, Entity};
use crate::filter::{self, FieldValue, Filterable};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<FlexDate>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<FlexDate>,
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_case_study_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<FlexDate>,
}

impl Entity for CaseStudy {
    const COLLECTION: &'static str = "casestudies";
    const LABEL: &'static str = "Case study";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[
            ("caseStudyTitle", &self.case_study_title),
            ("clientName", &self.client_name),
            ("summary", &self.summary),
        ])
    }
}

impl Filterable for CaseStudy {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.case_study_title.as_deref(),
            self.client_name.as_deref(),
            self.summary.as_deref(),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "caseStudyTitle" => filter::text(&self.case_study_title),
            "clientName" => filter::text(&self.client_name),
            "industry" => filter::text(&self.industry),
            "publicationDate" => filter::date(&self.publication_date),
            _ => None,
        }
    }
}
