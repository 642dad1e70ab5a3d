//! Careers page
//!
//! Lists active openings with search and department/location facets, takes
//! applications for a posting or in general, and lets applicants look up
//! their own applications by email.

use tracing::info;

use super::{PageContext, Section};
use crate::domain::{FlexDate, JobApplication, JobOpening};
use crate::filter::{distinct_values, ViewQuery};
use crate::form::FormError;
use crate::resume::{formatted_resume, my_resume_file_name, ApplicationForm};
use crate::store::CollectionStore;

pub struct CareersPage {
    ctx: PageContext,
    pub jobs: CollectionStore<JobOpening>,
    pub applications: Section<JobApplication>,
    pub form: ApplicationForm,
    search: String,
    department: String,
    location: String,
    submitted: bool,
}

impl CareersPage {
    pub fn new(ctx: PageContext) -> Self {
        let strategy = ctx.strategy;
        Self {
            ctx,
            jobs: CollectionStore::new(strategy),
            applications: Section::new(strategy),
            form: ApplicationForm::default(),
            search: String::new(),
            department: String::new(),
            location: String::new(),
            submitted: false,
        }
    }

    pub async fn load(&mut self) {
        self.jobs.load(self.ctx.client.as_ref()).await;
    }

    pub fn is_loading(&self) -> bool {
        !self.jobs.is_loaded()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn set_department(&mut self, department: impl Into<String>) {
        self.department = department.into();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    fn active(&self) -> Vec<JobOpening> {
        self.jobs.view(&ViewQuery::new().flag("isActive", true))
    }

    /// Active openings matching search and facets
    pub fn view(&self) -> Vec<JobOpening> {
        self.jobs.view(
            &ViewQuery::new()
                .flag("isActive", true)
                .search(self.search.clone())
                .equals("department", self.department.clone())
                .equals("location", self.location.clone()),
        )
    }

    pub fn departments(&self) -> Vec<String> {
        distinct_values(&self.active(), "department")
    }

    pub fn locations(&self) -> Vec<String> {
        distinct_values(&self.active(), "location")
    }

    /// Start an application for one posting
    pub fn apply_to(&mut self, job_id: &str) {
        self.form = ApplicationForm::for_job(job_id);
        self.submitted = false;
    }

    /// Start an application not tied to a posting
    pub fn apply_general(&mut self) {
        self.form = ApplicationForm::default();
        self.submitted = false;
    }

    pub fn was_submitted(&self) -> bool {
        self.submitted
    }

    /// Send the current form. The form is cleared only on success.
    pub async fn submit_application(&mut self) -> Result<JobApplication, FormError> {
        let application = self.form.to_application(FlexDate::now());
        self.applications.form.cancel()?;
        self.applications.form.open_create_with(application)?;
        let saved = self.applications.submit(self.ctx.client.as_ref()).await?;
        info!(id = %saved.id, "application submitted");
        self.form = ApplicationForm::default();
        self.submitted = true;
        Ok(saved)
    }

    /// Applications sent from `email`, fetched fresh each time
    pub async fn my_applications(&mut self, email: &str) -> Vec<JobApplication> {
        let email = email.trim();
        if email.is_empty() {
            return Vec::new();
        }
        self.applications.store.refresh(self.ctx.client.as_ref()).await;
        self.applications
            .store
            .view(&ViewQuery::new().equals("email", email))
    }

    /// File name and text for an applicant's own resume download
    pub fn my_resume(application: &JobApplication, today: FlexDate) -> (String, String) {
        let form = ApplicationForm::from_application(application);
        (my_resume_file_name(&today), formatted_resume(&form, &today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::form::Notice;
    use crate::repository::TypedCollections;
    use crate::testing::{Call, ScriptedClient};
    use std::sync::Arc;

    fn job(id: &str, dept: &str, loc: &str, active: bool) -> JobOpening {
        JobOpening {
            id: id.into(),
            job_title: Some(format!("{} role", dept)),
            department: Some(dept.into()),
            location: Some(loc.into()),
            is_active: Some(active),
            ..Default::default()
        }
    }

    fn seeded() -> Arc<ScriptedClient> {
        Arc::new(ScriptedClient::seeded(&[
            job("1", "Engineering", "Remote", true),
            job("2", "Design", "Berlin", true),
            job("3", "Sales", "Paris", false),
            job("4", "Engineering", "Berlin", true),
        ]))
    }

    #[tokio::test]
    async fn test_only_active_openings_and_facets() {
        let mut page = CareersPage::new(PageContext::new(seeded()));
        page.load().await;

        assert_eq!(page.view().len(), 3);
        assert_eq!(page.departments(), vec!["Engineering", "Design"]);
        assert_eq!(page.locations(), vec!["Remote", "Berlin"]);

        page.set_department("Engineering");
        page.set_location("Berlin");
        let ids: Vec<_> = page.view().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["4"]);

        page.set_department("all");
        page.set_location("");
        page.set_search("design");
        assert_eq!(page.view().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_application_and_lookup() {
        let client = seeded();
        let mut page = CareersPage::new(PageContext::new(client.clone()));
        page.load().await;

        page.apply_to("1");
        page.form.first_name = "Ada".into();
        page.form.last_name = "Lovelace".into();
        page.form.email = "ada@example.com".into();
        page.form.add_skill("Rust");
        page.form.experience = "9".into();
        let saved = page.submit_application().await.unwrap();

        assert!(page.was_submitted());
        assert_eq!(page.form, ApplicationForm::default());
        assert_eq!(saved.application_status.as_deref(), Some("submitted"));

        let stored: Vec<JobApplication> = client.fetch_all().await.unwrap();
        assert_eq!(stored.len(), 1);

        let mine = page.my_applications("ada@example.com").await;
        assert_eq!(mine.len(), 1);
        assert!(page.my_applications("").await.is_empty());
        assert!(page.my_applications("bob@example.com").await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form() {
        let client = seeded();
        client.fail(Call::Create, DomainError::write("jobapplications", "down"));
        let mut page = CareersPage::new(PageContext::new(client.clone()));

        page.apply_general();
        page.form.first_name = "Ada".into();
        page.form.last_name = "Lovelace".into();
        page.form.email = "ada@example.com".into();
        assert!(page.submit_application().await.is_err());

        assert_eq!(page.form.first_name, "Ada");
        assert!(!page.was_submitted());
        assert!(matches!(page.applications.form.notice(), Some(Notice::Error(_))));

        client.heal(Call::Create);
        let saved = page.submit_application().await.unwrap();
        assert_eq!(saved.application_status.as_deref(), Some("general_submission"));
    }

    #[test]
    fn test_my_resume_download() {
        let app = JobApplication {
            first_name: Some("Ada".into()),
            skills: Some("Rust, Go".into()),
            years_of_experience: Some(4.0),
            ..Default::default()
        };
        let today = FlexDate::from_ymd(2024, 2, 3).unwrap();
        let (name, text) = CareersPage::my_resume(&app, today);
        assert_eq!(name, "My_Resume_2024-02-03.txt");
        assert!(text.contains("Years of Experience: 4"));
        assert!(text.contains("SKILLS\nRust, Go"));
    }
}
