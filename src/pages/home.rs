//! Home page: featured slices of four collections, loaded together

use tracing::info;

use super::PageContext;
use crate::domain::{CaseStudy, Project, Service, Testimonial};
use crate::filter::ViewQuery;
use crate::store::CollectionStore;

const SLICE: usize = 3;

pub struct HomePage {
    ctx: PageContext,
    pub services: CollectionStore<Service>,
    pub testimonials: CollectionStore<Testimonial>,
    pub projects: CollectionStore<Project>,
    pub case_studies: CollectionStore<CaseStudy>,
}

impl HomePage {
    pub fn new(ctx: PageContext) -> Self {
        let strategy = ctx.strategy;
        Self {
            ctx,
            services: CollectionStore::new(strategy),
            testimonials: CollectionStore::new(strategy),
            projects: CollectionStore::new(strategy),
            case_studies: CollectionStore::new(strategy),
        }
    }

    /// Fetch all four collections concurrently
    pub async fn load(&mut self) {
        let client = self.ctx.client.as_ref();
        tokio::join!(
            self.services.load(client),
            self.testimonials.load(client),
            self.projects.load(client),
            self.case_studies.load(client),
        );
        info!("home page loaded");
    }

    pub fn is_loading(&self) -> bool {
        !(self.services.is_loaded()
            && self.testimonials.is_loaded()
            && self.projects.is_loaded()
            && self.case_studies.is_loaded())
    }

    pub fn featured_services(&self) -> Vec<Service> {
        let mut view = self.services.view(&ViewQuery::new().flag("isFeatured", true));
        view.truncate(SLICE);
        view
    }

    pub fn testimonials(&self) -> &[Testimonial] {
        first(self.testimonials.items())
    }

    pub fn featured_projects(&self) -> &[Project] {
        first(self.projects.items())
    }

    pub fn case_studies(&self) -> &[CaseStudy] {
        first(self.case_studies.items())
    }
}

fn first<T>(items: &[T]) -> &[T] {
    &items[..items.len().min(SLICE)]
}
