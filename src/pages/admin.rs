//! Admin dashboard
//!
//! Loads six collections side by side, each with its own form controller.
//! Applications get a search box, a status filter, status updates, resume
//! downloads and a CSV export of whatever the filters currently show.

use tracing::{info, warn};

use super::{PageContext, Section};
use crate::domain::{
    BlogPost, DomainError, DomainResult, Entity, FlexDate, JobApplication, Project, Service, TeamMember, Testimonial,
};
use crate::export::{to_csv, ExportError};
use crate::filter::ViewQuery;
use crate::form::FormError;
use crate::generators::{dashboard_summary, DashboardSummary};
use crate::resume::{admin_resume, resume_file_name};

pub const LOAD_ALERT: &str = "Failed to load dashboard data";
pub const APPLICATIONS_EXPORT_FILE: &str = "job-applications.csv";

pub struct AdminDashboard {
    ctx: PageContext,
    pub blog: Section<BlogPost>,
    pub applications: Section<JobApplication>,
    pub testimonials: Section<Testimonial>,
    pub projects: Section<Project>,
    pub services: Section<Service>,
    pub team: Section<TeamMember>,
    search: String,
    status: String,
    alert: Option<String>,
}

impl AdminDashboard {
    pub fn new(ctx: PageContext) -> Self {
        let strategy = ctx.strategy;
        Self {
            ctx,
            blog: Section::new(strategy),
            applications: Section::new(strategy),
            testimonials: Section::new(strategy),
            projects: Section::new(strategy),
            services: Section::new(strategy),
            team: Section::new(strategy),
            search: String::new(),
            status: String::new(),
            alert: None,
        }
    }

    /// Fetch every collection concurrently; any failure raises the alert
    pub async fn load(&mut self) {
        let client = self.ctx.client.as_ref();
        tokio::join!(
            self.blog.load(client),
            self.applications.load(client),
            self.testimonials.load(client),
            self.projects.load(client),
            self.services.load(client),
            self.team.load(client),
        );

        let failed = [
            self.blog.store.last_error(),
            self.applications.store.last_error(),
            self.testimonials.store.last_error(),
            self.projects.store.last_error(),
            self.services.store.last_error(),
            self.team.store.last_error(),
        ]
        .iter()
        .any(Option::is_some);

        if failed {
            warn!("dashboard loaded with errors");
            self.alert = Some(LOAD_ALERT.to_string());
        } else {
            info!(applications = self.applications.store.len(), "dashboard loaded");
            self.alert = None;
        }
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// `"all"` or an empty string clears the filter
    pub fn set_status_filter(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn filtered_applications(&self) -> Vec<JobApplication> {
        self.applications.store.view(
            &ViewQuery::new()
                .search(self.search.clone())
                .equals("applicationStatus", self.status.clone()),
        )
    }

    /// One-shot status change. Refused while an application form is open;
    /// a failed save closes the form again.
    pub async fn update_application_status(&mut self, id: &str, status: &str) -> Result<JobApplication, FormError> {
        self.applications.edit(id)?;
        if let Some(draft) = self.applications.form.draft_mut() {
            draft.application_status = Some(status.to_string());
        }
        match self.applications.submit(self.ctx.client.as_ref()).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                self.applications.form.cancel()?;
                Err(e)
            }
        }
    }

    /// File name and CSV body for the filtered applications
    pub fn export_applications(&self) -> Result<(String, String), ExportError> {
        let csv = to_csv(&self.filtered_applications())?;
        Ok((APPLICATIONS_EXPORT_FILE.to_string(), csv))
    }

    /// File name and plain-text resume for one application
    pub fn resume(&self, id: &str, today: &FlexDate) -> DomainResult<(String, String)> {
        let app = self
            .applications
            .store
            .get(id)
            .ok_or_else(|| DomainError::not_found(JobApplication::COLLECTION, id))?;
        Ok((resume_file_name(app), admin_resume(app, today)))
    }

    pub fn summary(&self) -> DashboardSummary {
        dashboard_summary(
            self.blog.store.items(),
            self.projects.store.items(),
            self.services.store.items(),
            self.testimonials.store.items(),
            self.applications.store.items(),
        )
    }
}
