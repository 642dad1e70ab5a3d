//! Contact page: a single create-only form

use super::{PageContext, Section};
use crate::domain::{ContactSubmission, FlexDate, STATUS_NEW};
use crate::form::FormError;

pub struct ContactPage {
    ctx: PageContext,
    pub messages: Section<ContactSubmission>,
    submitted: bool,
}

impl ContactPage {
    pub fn new(ctx: PageContext) -> Self {
        let mut messages = Section::new(ctx.strategy);
        // a fresh controller is always idle
        let _ = messages.form.open_create();
        Self {
            ctx,
            messages,
            submitted: false,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ContactSubmission> {
        self.messages.form.draft_mut()
    }

    pub fn was_submitted(&self) -> bool {
        self.submitted
    }

    /// Send the message and reopen a blank form.
    ///
    /// A failed send keeps everything the visitor typed.
    pub async fn submit(&mut self) -> Result<ContactSubmission, FormError> {
        if let Some(draft) = self.messages.form.draft_mut() {
            draft.status = Some(STATUS_NEW.to_string());
            draft.submission_date = Some(FlexDate::now());
        }
        let sent = self.messages.submit(self.ctx.client.as_ref()).await?;
        self.submitted = true;
        self.messages.form.open_create()?;
        Ok(sent)
    }

    /// Start over after the thank-you message
    pub fn send_another(&mut self) {
        self.submitted = false;
        self.messages.form.clear_notice();
    }
}
