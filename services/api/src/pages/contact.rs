use common::models::{CallbackRequest, ContactFormRecord};

use crate::error::ApiResult;
use crate::forms::{CallbackFields, ContactFields, FormController};
use crate::repositories::Repositories;

/// Contact page: the inquiry form plus the callback panel
#[derive(Debug, Clone, Default)]
pub struct ContactPage {
    pub contact: FormController<ContactFields>,
    pub callback: FormController<CallbackFields>,
    callback_open: bool,
}

impl ContactPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback_open(&self) -> bool {
        self.callback_open
    }

    pub fn open_callback(&mut self) {
        self.callback_open = true;
    }

    /// Close the panel, discarding what was typed in it
    pub fn close_callback(&mut self) {
        self.callback_open = false;
        self.callback.reset();
    }

    pub async fn submit_contact(&mut self, repos: &Repositories) -> ApiResult<ContactFormRecord> {
        self.contact.submit(&repos.contact_forms).await
    }

    /// Submit the callback request; the panel closes once it is stored
    pub async fn submit_callback(&mut self, repos: &Repositories) -> ApiResult<CallbackRequest> {
        let request = self.callback.submit(&repos.callbacks).await?;
        self.callback_open = false;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{storage::MemoryStorage, store::Backend};
    use std::sync::Arc;

    fn repositories() -> Repositories {
        Repositories::new(Backend::in_memory(Arc::new(MemoryStorage::new(
            "https://cdn.test/videos",
        ))))
    }

    #[tokio::test]
    async fn callback_panel_closes_on_success_only() {
        let repos = repositories();
        let mut page = ContactPage::new();
        page.open_callback();

        page.callback.fields.name = "Ben".into();
        assert!(page.submit_callback(&repos).await.is_err());
        assert!(page.callback_open());
        assert_eq!(page.callback.fields.name, "Ben");

        page.callback.fields.phone = "555-0102".into();
        page.submit_callback(&repos).await.unwrap();
        assert!(!page.callback_open());
        assert_eq!(repos.callbacks.list_all().await.unwrap().len(), 1);
    }

    #[test]
    fn closing_the_panel_discards_input() {
        let mut page = ContactPage::new();
        page.open_callback();
        page.callback.fields.best_time = "Evenings".into();

        page.close_callback();
        assert!(!page.callback_open());
        assert!(page.callback.fields.best_time.is_empty());
    }
}
