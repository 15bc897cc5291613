use common::models::VideoRecord;
use serde::Serialize;

use crate::error::ApiResult;
use crate::repositories::Repositories;

/// Videos shown before "show more"
pub const INITIAL_VISIBLE: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct PortfolioPage {
    videos: Vec<VideoRecord>,
    show_all: bool,
}

/// What the portfolio grid renders
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    pub videos: Vec<VideoRecord>,
    pub total: usize,
    pub has_more: bool,
}

impl PortfolioPage {
    pub async fn load(repos: &Repositories) -> ApiResult<Self> {
        Ok(Self::from_videos(repos.videos.portfolio().await?))
    }

    pub fn from_videos(videos: Vec<VideoRecord>) -> Self {
        Self {
            videos,
            show_all: false,
        }
    }

    pub fn show_more(&mut self) {
        self.show_all = true;
    }

    pub fn visible(&self) -> &[VideoRecord] {
        if self.show_all {
            &self.videos
        } else {
            &self.videos[..self.videos.len().min(INITIAL_VISIBLE)]
        }
    }

    pub fn has_more(&self) -> bool {
        self.visible().len() < self.videos.len()
    }

    pub fn view(&self) -> PortfolioView {
        PortfolioView {
            videos: self.visible().to_vec(),
            total: self.videos.len(),
            has_more: self.has_more(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::models::VideoCategory;
    use uuid::Uuid;

    fn videos(count: usize) -> Vec<VideoRecord> {
        (0..count)
            .map(|i| VideoRecord {
                id: Uuid::new_v4(),
                name: format!("Film {i}"),
                file_path: format!("https://cdn.test/videos/portfolio/{i}.mp4"),
                video_type: VideoCategory::Portfolio,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn shows_eight_until_show_more() {
        let mut page = PortfolioPage::from_videos(videos(11));
        assert_eq!(page.visible().len(), INITIAL_VISIBLE);
        assert!(page.has_more());

        page.show_more();
        assert_eq!(page.visible().len(), 11);
        assert!(!page.has_more());
        assert_eq!(page.view().total, 11);
    }

    #[test]
    fn short_portfolio_has_nothing_more() {
        let page = PortfolioPage::from_videos(videos(3));
        assert_eq!(page.visible().len(), 3);
        assert!(!page.view().has_more);
    }
}
