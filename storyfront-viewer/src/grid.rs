//! Infinite-scroll grid of post cards.

use storyfront_common::models::{Item, Page, PageInfo};

use crate::{
    gesture::WheelPolicy,
    scroll::{HostStyle, Viewport},
    slideshow::Slideshow,
    story::{self, Story},
};

/// Parameters for the next page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub first: u32,
    pub after: Option<String>,
}

/// Status line shown under the cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footer {
    Loading,
    End,
    Idle,
}

#[derive(Clone, Debug)]
pub struct Grid {
    items: Vec<Item>,
    page_info: PageInfo,
    loading: bool,
    page_size: u32,
    site: String,
}

impl Grid {
    pub fn new(page: Page, page_size: u32, site: impl Into<String>) -> Self {
        Self {
            items: page.items,
            page_info: page.page_info,
            loading: false,
            page_size,
            site: site.into(),
        }
    }

    /// A grid that has not loaded anything yet; its first request continues
    /// from `after`, or from the beginning when there is no cursor.
    pub fn pending(after: Option<String>, page_size: u32, site: impl Into<String>) -> Self {
        Self::new(
            Page {
                items: Vec::new(),
                page_info: PageInfo {
                    end_cursor: after,
                    has_next_page: true,
                },
            },
            page_size,
            site,
        )
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn footer(&self) -> Footer {
        if self.loading {
            Footer::Loading
        } else if !self.page_info.has_next_page {
            Footer::End
        } else {
            Footer::Idle
        }
    }

    /// Called when the sentinel below the cards scrolls into view. Returns
    /// the request to issue, or `None` when there is nothing more to load
    /// or a fetch is already in flight.
    pub fn on_sentinel_visible(&mut self) -> Option<FetchRequest> {
        if !self.page_info.has_next_page || self.loading {
            return None;
        }

        self.loading = true;

        Some(FetchRequest {
            first: self.page_size,
            after: self.page_info.end_cursor.clone(),
        })
    }

    /// Appends a fetched page, even if the viewer was closed meanwhile.
    pub fn apply_page(&mut self, page: Page) {
        tracing::debug!(count = page.items.len(), has_next_page = page.page_info.has_next_page, "appending page");

        self.items.extend(page.items);
        self.page_info = page.page_info;
        self.loading = false;
    }

    /// A failed fetch leaves the grid as it was.
    pub fn fail_fetch(&mut self) {
        self.loading = false;
    }

    pub fn stories(&self) -> Vec<Story> {
        story::stories(&self.items, &self.site)
    }

    pub fn open_story(
        &self,
        index: usize,
        policy: WheelPolicy,
        host: &mut HostStyle,
        viewport: Viewport,
    ) -> Option<Slideshow> {
        Slideshow::open(self.stories(), index, policy, host, viewport)
    }
}
