//! About page: team and milestones

use super::PageContext;
use crate::domain::{CompanyMilestone, TeamMember};
use crate::filter::{SortKey, ViewQuery};
use crate::store::CollectionStore;

pub struct AboutPage {
    ctx: PageContext,
    pub team: CollectionStore<TeamMember>,
    pub milestones: CollectionStore<CompanyMilestone>,
}

impl AboutPage {
    pub fn new(ctx: PageContext) -> Self {
        let strategy = ctx.strategy;
        Self {
            ctx,
            team: CollectionStore::new(strategy),
            milestones: CollectionStore::new(strategy),
        }
    }

    pub async fn load(&mut self) {
        let client = self.ctx.client.as_ref();
        tokio::join!(self.team.load(client), self.milestones.load(client));
    }

    pub fn is_loading(&self) -> bool {
        !(self.team.is_loaded() && self.milestones.is_loaded())
    }

    pub fn team(&self) -> &[TeamMember] {
        self.team.items()
    }

    /// Milestones by `displayOrder`, unnumbered ones first
    pub fn milestones(&self) -> Vec<CompanyMilestone> {
        self.milestones
            .view(&ViewQuery::new().sort(SortKey::Ascending("displayOrder".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryCollectionClient, TypedCollections};
    use std::sync::Arc;

    fn milestone(id: &str, order: Option<f64>) -> CompanyMilestone {
        CompanyMilestone {
            id: id.into(),
            milestone_title: Some(id.into()),
            display_order: order,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_milestones_sorted_by_display_order() {
        let client = MemoryCollectionClient::new();
        for m in [milestone("c", Some(3.0)), milestone("none", None), milestone("a", Some(1.0))] {
            client.create_entity(&m).await.unwrap();
        }
        let mut page = AboutPage::new(PageContext::new(Arc::new(client)));
        page.load().await;

        let ids: Vec<_> = page.milestones().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["none", "a", "c"]);
        assert!(!page.is_loading());
    }
}
