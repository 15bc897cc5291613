use chrono::NaiveDate;
use common::{
    calendar::{MonthView, YearMonth},
    models::{ContactFormRecord, VideoRecord},
};
use serde::Serialize;

use crate::error::ApiResult;
use crate::forms::{ContactFields, FormController};
use crate::repositories::Repositories;

/// Portfolio videos featured on the home page
pub const FEATURED_VIDEOS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub hero: Option<VideoRecord>,
    pub featured: Vec<VideoRecord>,
    /// This month's availability
    pub availability: MonthView,
    #[serde(skip)]
    pub contact: FormController<ContactFields>,
}

impl HomePage {
    pub async fn load(repos: &Repositories, today: NaiveDate) -> ApiResult<Self> {
        let hero = repos.videos.hero().await?;
        let mut featured = repos.videos.portfolio().await?;
        featured.truncate(FEATURED_VIDEOS);

        let availability =
            super::month_view(&repos.calendar, YearMonth::containing(today), today).await?;

        Ok(Self {
            hero,
            featured,
            availability,
            contact: FormController::new(),
        })
    }

    pub async fn submit_contact(&mut self, repos: &Repositories) -> ApiResult<ContactFormRecord> {
        self.contact.submit(&repos.contact_forms).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::VideoUpload;
    use common::{
        models::{CalendarStatus, VideoCategory},
        storage::MemoryStorage,
        store::Backend,
    };
    use std::sync::Arc;

    fn repositories() -> Repositories {
        Repositories::new(Backend::in_memory(Arc::new(MemoryStorage::new(
            "https://cdn.test/videos",
        ))))
    }

    fn file(name: &str) -> VideoUpload {
        VideoUpload {
            file_name: format!("{name}.mp4"),
            content_type: "video/mp4".into(),
            bytes: vec![1],
            name: None,
        }
    }

    #[tokio::test]
    async fn loads_hero_featured_and_month() {
        let repos = repositories();
        for name in ["a", "b", "c", "d"] {
            repos
                .videos
                .upload(VideoCategory::Portfolio, file(name))
                .await
                .unwrap();
        }
        repos.videos.upload(VideoCategory::Hero, file("old")).await.unwrap();
        let hero = repos.videos.upload(VideoCategory::Hero, file("new")).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2030, 6, 10).unwrap();
        let booked = NaiveDate::from_ymd_opt(2030, 6, 20).unwrap();
        repos
            .calendar
            .set_date(booked, CalendarStatus::Booked, None)
            .await
            .unwrap();

        let page = HomePage::load(&repos, today).await.unwrap();
        assert_eq!(page.hero, Some(hero));
        assert_eq!(page.featured.len(), FEATURED_VIDEOS);
        assert_eq!(page.availability.month_name, "June");
        assert!(!page.availability.available_dates().contains(&booked));
    }

    #[tokio::test]
    async fn contact_form_submits_from_home() {
        let repos = repositories();
        let today = NaiveDate::from_ymd_opt(2030, 6, 10).unwrap();
        let mut page = HomePage::load(&repos, today).await.unwrap();

        page.contact.fields.name = "Ana".into();
        page.contact.fields.phone = "555-0101".into();
        page.submit_contact(&repos).await.unwrap();

        assert_eq!(repos.contact_forms.list_all().await.unwrap().len(), 1);
        assert!(page.contact.fields.name.is_empty());
    }
}
