//! Testimonials page: listing, rating filter, submission form

use rand::Rng;

use super::{PageContext, Section};
use crate::domain::{FlexDate, Testimonial};
use crate::filter::ViewQuery;
use crate::form::FormError;
use crate::generators::testimonial_text;
use crate::store::SyncStrategy;

const DEFAULT_RATING: f64 = 5.0;

/// Mean rating; unrated entries count as five stars and an empty list rates five
pub fn average_rating(items: &[Testimonial]) -> f64 {
    if items.is_empty() {
        return DEFAULT_RATING;
    }
    let total: f64 = items.iter().map(|t| t.rating.unwrap_or(DEFAULT_RATING)).sum();
    total / items.len() as f64
}

pub struct TestimonialsPage {
    ctx: PageContext,
    pub testimonials: Section<Testimonial>,
    search: String,
    rating: Option<u8>,
}

impl TestimonialsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            // Submissions are followed by a full reload of the list
            testimonials: Section::new(SyncStrategy::Refetch),
            search: String::new(),
            rating: None,
        }
    }

    pub async fn load(&mut self) {
        self.testimonials.load(self.ctx.client.as_ref()).await;
    }

    pub fn is_loading(&self) -> bool {
        !self.testimonials.store.is_loaded()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Only show entries with exactly this many stars; `None` shows all
    pub fn set_rating(&mut self, rating: Option<u8>) {
        self.rating = rating;
    }

    pub fn view(&self) -> Vec<Testimonial> {
        let rating = self.rating.map(|r| r.to_string()).unwrap_or_default();
        self.testimonials.store.view(
            &ViewQuery::new()
                .search(self.search.clone())
                .equals("rating", rating),
        )
    }

    pub fn average_rating(&self) -> f64 {
        average_rating(self.testimonials.store.items())
    }

    /// `4.5`
    pub fn average_label(&self) -> String {
        format!("{:.1}", self.average_rating())
    }

    pub fn open_form(&mut self) -> Result<(), FormError> {
        self.testimonials.form.open_create_with(Testimonial {
            rating: Some(DEFAULT_RATING),
            ..Default::default()
        })
    }

    /// Fill the draft's text from a template
    pub fn generate_text<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), FormError> {
        let company = self.ctx.profile.name.clone();
        let draft = self.testimonials.form.draft_mut().ok_or(FormError::NotEditing)?;
        let text = testimonial_text(
            rng,
            &company,
            draft.author_name.as_deref(),
            draft.company_name.as_deref(),
        )?;
        draft.testimonial_text = Some(text);
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<Testimonial, FormError> {
        if let Some(draft) = self.testimonials.form.draft_mut() {
            draft.date_published.get_or_insert_with(FlexDate::now);
        }
        self.testimonials.submit(self.ctx.client.as_ref()).await
    }
}
