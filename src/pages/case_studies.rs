//! Case studies page: industry facet, full CRUD, CSV download

use super::{PageContext, Section};
use crate::domain::{CaseStudy, FlexDate};
use crate::export::{CsvOptions, CsvTable, Escape};
use crate::filter::{distinct_values, ViewQuery};
use crate::form::FormError;
use crate::generators::case_study_summary;
use crate::store::SyncStrategy;

pub struct CaseStudiesPage {
    ctx: PageContext,
    pub case_studies: Section<CaseStudy>,
    search: String,
    industry: String,
}

impl CaseStudiesPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            // Every mutation is followed by a full reload of the list
            case_studies: Section::new(SyncStrategy::Refetch),
            search: String::new(),
            industry: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.case_studies.load(self.ctx.client.as_ref()).await;
    }

    pub fn is_loading(&self) -> bool {
        !self.case_studies.store.is_loaded()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn set_industry(&mut self, industry: impl Into<String>) {
        self.industry = industry.into();
    }

    pub fn view(&self) -> Vec<CaseStudy> {
        self.case_studies.store.view(
            &ViewQuery::new()
                .search(self.search.clone())
                .equals("industry", self.industry.clone()),
        )
    }

    pub fn industries(&self) -> Vec<String> {
        distinct_values(self.case_studies.store.items(), "industry")
    }

    pub fn open_create(&mut self) -> Result<(), FormError> {
        self.case_studies.form.open_create()
    }

    pub fn open_edit(&mut self, id: &str) -> Result<(), FormError> {
        self.case_studies.edit(id)
    }

    /// Fill the draft's summary from a template
    pub fn generate_summary(&mut self) -> Result<(), FormError> {
        let draft = self.case_studies.form.draft_mut().ok_or(FormError::NotEditing)?;
        let summary = case_study_summary(draft.case_study_title.as_deref(), draft.client_name.as_deref())?;
        draft.summary = Some(summary);
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<CaseStudy, FormError> {
        if let Some(draft) = self.case_studies.form.draft_mut() {
            draft.publication_date.get_or_insert_with(FlexDate::now);
        }
        self.case_studies.submit(self.ctx.client.as_ref()).await
    }

    pub fn select_for_delete(&mut self, id: &str) -> Result<(), FormError> {
        let label = self
            .case_studies
            .store
            .get(id)
            .and_then(|c| c.case_study_title.clone())
            .unwrap_or_else(|| id.to_string());
        self.case_studies.form.select_for_delete(id, label)
    }

    pub async fn confirm_delete(&mut self) -> Result<(), FormError> {
        self.case_studies.confirm_delete(self.ctx.client.as_ref()).await
    }

    /// CSV of every loaded case study with fixed columns
    pub fn export_csv(&self) -> String {
        let mut table = CsvTable::new(
            ["Title", "Client", "Industry", "Summary", "Publication Date", "URL"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        for cs in self.case_studies.store.items() {
            table.push(vec![
                cs.case_study_title.clone().unwrap_or_default(),
                cs.client_name.clone().unwrap_or_default(),
                cs.industry.clone().unwrap_or_default(),
                cs.summary.clone().unwrap_or_default(),
                cs.publication_date.map(|d| d.short_date()).unwrap_or_default(),
                cs.full_case_study_url.clone().unwrap_or_default(),
            ]);
        }
        table.render(CsvOptions {
            delimiter: ',',
            escape: Escape::Minimal,
        })
    }

    pub fn export_file_name(today: &FlexDate) -> String {
        format!("case-studies-{}.csv", today.date().format("%Y-%m-%d"))
    }
}
