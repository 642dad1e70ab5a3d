//! Services page

use super::PageContext;
use crate::domain::Service;
use crate::store::CollectionStore;

pub struct ServicesPage {
    ctx: PageContext,
    pub services: CollectionStore<Service>,
}

impl ServicesPage {
    pub fn new(ctx: PageContext) -> Self {
        let services = CollectionStore::new(ctx.strategy);
        Self { ctx, services }
    }

    pub async fn load(&mut self) {
        self.services.load(self.ctx.client.as_ref()).await;
    }

    pub fn is_loading(&self) -> bool {
        !self.services.is_loaded()
    }

    pub fn services(&self) -> &[Service] {
        self.services.items()
    }
}
