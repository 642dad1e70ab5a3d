//! Blog page: newest-first listing with search and a detail view

use serde::Serialize;

use super::PageContext;
use crate::domain::BlogPost;
use crate::filter::{SortKey, ViewQuery};
use crate::generators::{excerpt, reading_time, EXCERPT_LENGTH};
use crate::store::CollectionStore;

const RELATED: usize = 3;

/// What a listing card shows for one post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub reading_time: String,
    pub published: String,
}

impl PostCard {
    pub fn from_post(post: &BlogPost) -> Self {
        let teaser = post.summary.as_deref().or(post.content.as_deref());
        Self {
            id: post.id.clone(),
            title: post.title.clone().unwrap_or_default(),
            excerpt: excerpt(teaser, EXCERPT_LENGTH),
            reading_time: reading_time(post.content.as_deref()),
            published: post.publish_date.map(|d| d.long_date()).unwrap_or_default(),
        }
    }
}

pub struct BlogPage {
    ctx: PageContext,
    pub posts: CollectionStore<BlogPost>,
    search: String,
    selected: Option<String>,
}

impl BlogPage {
    pub fn new(ctx: PageContext) -> Self {
        let posts = CollectionStore::new(ctx.strategy);
        Self {
            ctx,
            posts,
            search: String::new(),
            selected: None,
        }
    }

    pub async fn load(&mut self) {
        self.posts.load(self.ctx.client.as_ref()).await;
    }

    pub fn is_loading(&self) -> bool {
        !self.posts.is_loaded()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    fn query(&self) -> ViewQuery {
        ViewQuery::new()
            .search(self.search.clone())
            .sort(SortKey::NewestFirst("publishDate".into()))
    }

    /// Posts matching the search, newest first
    pub fn view(&self) -> Vec<BlogPost> {
        self.posts.view(&self.query())
    }

    /// The lead post and the rest of the listing
    pub fn featured_and_rest(&self) -> (Option<BlogPost>, Vec<BlogPost>) {
        let mut view = self.view().into_iter();
        let lead = view.next();
        (lead, view.collect())
    }

    pub fn cards(&self) -> Vec<PostCard> {
        self.view().iter().map(PostCard::from_post).collect()
    }

    pub fn open(&mut self, id: &str) -> bool {
        if self.posts.get(id).is_some() {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&BlogPost> {
        self.selected.as_deref().and_then(|id| self.posts.get(id))
    }

    /// Up to three other posts, newest first, shown under the open post
    pub fn related(&self) -> Vec<BlogPost> {
        let Some(current) = self.selected.as_deref() else {
            return Vec::new();
        };
        let all = self
            .posts
            .view(&ViewQuery::new().sort(SortKey::NewestFirst("publishDate".into())));
        all.into_iter().filter(|p| p.id != current).take(RELATED).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlexDate;
    use crate::testing::ScriptedClient;
    use std::sync::Arc;

    fn post(id: &str, title: &str, date: Option<&str>) -> BlogPost {
        BlogPost {
            id: id.into(),
            title: Some(title.into()),
            content: Some("word ".repeat(250)),
            publish_date: date.and_then(FlexDate::parse),
            ..Default::default()
        }
    }

    async fn page() -> BlogPage {
        let client = ScriptedClient::seeded(&[
            post("old", "Intro to AI", Some("2023-03-01")),
            post("new", "Cloud Basics", Some("2024-05-20")),
            post("mid", "Hiring Update", Some("2023-11-11")),
            post("undated", "Drafts", None),
        ]);
        let mut page = BlogPage::new(PageContext::new(Arc::new(client)));
        page.load().await;
        page
    }

    #[tokio::test]
    async fn test_listing_newest_first() {
        let page = page().await;
        let (lead, rest) = page.featured_and_rest();
        assert_eq!(lead.unwrap().id, "new");
        let ids: Vec<_> = rest.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["mid", "old", "undated"]);
    }

    #[tokio::test]
    async fn test_search_narrows_listing() {
        let mut page = page().await;
        page.set_search("cloud");
        let view = page.view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title.as_deref(), Some("Cloud Basics"));
    }

    #[tokio::test]
    async fn test_cards_and_related() {
        let mut page = page().await;
        let card = &page.cards()[0];
        assert_eq!(card.reading_time, "2 min read");
        assert_eq!(card.published, "May 20, 2024");
        assert!(card.excerpt.ends_with("..."));

        assert!(page.open("mid"));
        let related: Vec<_> = page.related().into_iter().map(|p| p.id).collect();
        assert_eq!(related, vec!["new", "old", "undated"]);
        assert!(!page.open("missing"));
    }
}
