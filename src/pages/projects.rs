//! Projects page: search plus a tag facet

use super::PageContext;
use crate::domain::Project;
use crate::filter::{distinct_tags, split_tags, ViewQuery};
use crate::store::CollectionStore;

const FACET_TAGS: usize = 6;
const CARD_TAGS: usize = 3;

pub struct ProjectsPage {
    ctx: PageContext,
    pub projects: CollectionStore<Project>,
    search: String,
    tag: String,
}

impl ProjectsPage {
    pub fn new(ctx: PageContext) -> Self {
        let projects = CollectionStore::new(ctx.strategy);
        Self {
            ctx,
            projects,
            search: String::new(),
            tag: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.projects.load(self.ctx.client.as_ref()).await;
    }

    pub fn is_loading(&self) -> bool {
        !self.projects.is_loaded()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Select a tag; "" or "all" clears it
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.tag.clear();
    }

    pub fn view(&self) -> Vec<Project> {
        self.projects.view(
            &ViewQuery::new()
                .search(self.search.clone())
                .tag("tags", self.tag.clone()),
        )
    }

    /// Every distinct tag in first-seen order
    pub fn tags(&self) -> Vec<String> {
        distinct_tags(self.projects.items(), "tags")
    }

    /// Tags offered as quick filters
    pub fn facet_tags(&self) -> Vec<String> {
        self.tags().into_iter().take(FACET_TAGS).collect()
    }

    /// Tags printed on a project card
    pub fn card_tags(project: &Project) -> Vec<&str> {
        project
            .tags
            .as_deref()
            .map(|raw| split_tags(raw).take(CARD_TAGS).collect())
            .unwrap_or_default()
    }
}
