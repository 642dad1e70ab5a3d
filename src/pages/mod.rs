//! Page compositions
//!
//! Each page owns its stores and form controllers outright and reaches the
//! remote side only through the injected client. Nothing is shared between
//! pages.

use std::sync::Arc;

use crate::config::{CompanyProfile, SiteConfig};
use crate::domain::Entity;
use crate::form::{FormError, MutationController};
use crate::repository::CollectionClient;
use crate::store::{CollectionStore, SyncStrategy};

pub mod about;
pub mod admin;
pub mod blog;
pub mod careers;
pub mod case_studies;
pub mod contact;
pub mod home;
pub mod projects;
pub mod services;
pub mod testimonials;

pub use about::AboutPage;
pub use admin::AdminDashboard;
pub use blog::BlogPage;
pub use careers::CareersPage;
pub use case_studies::CaseStudiesPage;
pub use contact::ContactPage;
pub use home::HomePage;
pub use projects::ProjectsPage;
pub use services::ServicesPage;
pub use testimonials::TestimonialsPage;

/// What every page is built from
#[derive(Clone)]
pub struct PageContext {
    pub client: Arc<dyn CollectionClient>,
    pub strategy: SyncStrategy,
    pub profile: CompanyProfile,
}

impl PageContext {
    pub fn new(client: Arc<dyn CollectionClient>) -> Self {
        Self {
            client,
            strategy: SyncStrategy::default(),
            profile: CompanyProfile::default(),
        }
    }

    pub fn from_config(client: Arc<dyn CollectionClient>, config: &SiteConfig) -> Self {
        Self {
            client,
            strategy: config.sync.strategy,
            profile: config.site.clone(),
        }
    }
}

/// One collection on a page: its snapshot plus the form editing it
pub struct Section<T> {
    pub store: CollectionStore<T>,
    pub form: MutationController<T>,
}

impl<T: Entity> Section<T> {
    pub fn new(strategy: SyncStrategy) -> Self {
        Self {
            store: CollectionStore::new(strategy),
            form: MutationController::new(),
        }
    }

    pub async fn load(&mut self, client: &dyn CollectionClient) {
        self.store.load(client).await;
    }

    pub async fn submit(&mut self, client: &dyn CollectionClient) -> Result<T, FormError> {
        self.form.submit(client, &mut self.store).await
    }

    pub async fn confirm_delete(&mut self, client: &dyn CollectionClient) -> Result<(), FormError> {
        self.form.confirm_delete(client, &mut self.store).await
    }

    /// Open the edit form on the stored record with `id`
    pub fn edit(&mut self, id: &str) -> Result<(), FormError> {
        let item = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| crate::domain::DomainError::not_found(T::COLLECTION, id))?;
        self.form.open_edit(&item)
    }
}
