use storyfront_common::{
    canonical_link,
    models::{Item, Screen},
    text,
};

/// Shown whenever a story or screen has no usable image.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1545972152-7051c7c4e9f5?q=80&w=1200&auto=format&fit=crop";

pub const UNCATEGORIZED: &str = "Uncategorized";

/// The slideshow's unit of navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image_url: Option<String>,
    pub category: String,
    pub category_slug: Option<String>,
    pub link: String,
    pub publish_date: String,
    pub excerpt: Option<String>,
    pub content_html: Option<String>,
    screens: Vec<Screen>,
}

/// What fills the background of a screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backdrop<'s> {
    Video(&'s str),
    Image(&'s str),
}

impl Story {
    pub fn from_item(item: &Item, site: &str) -> Self {
        let mut screens = item.screens.clone();

        if screens.is_empty() {
            screens.push(Screen::text(
                text::strip_html(&item.title),
                item.image.clone(),
            ));
        }

        let excerpt = item.excerpt.trim();

        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            subtitle: excerpt.to_string(),
            image_url: item.image.clone().filter(|url| !url.is_empty()),
            category: item
                .category
                .as_ref()
                .map(|category| category.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            category_slug: item.category.as_ref().map(|category| category.slug.clone()),
            link: canonical_link(site, &item.uri),
            publish_date: item.date.clone(),
            excerpt: Some(excerpt.to_string()).filter(|excerpt| !excerpt.is_empty()),
            content_html: item.content_html.clone(),
            screens,
        }
    }

    /// Always at least one: the cover.
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    pub fn screen(&self, index: usize) -> Option<&Screen> {
        self.screens.get(index)
    }

    pub fn cover_image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Video when the screen has one, otherwise the screen image, the story
    /// image, or the placeholder.
    pub fn backdrop(&self, index: usize) -> Backdrop<'_> {
        let screen = self.screen(index);

        if let Some(video) = screen.and_then(|screen| screen.video_url.as_deref()) {
            return Backdrop::Video(video);
        }

        let image = screen
            .and_then(|screen| screen.image_url.as_deref())
            .filter(|url| !url.is_empty())
            .or(self.image_url.as_deref())
            .unwrap_or(PLACEHOLDER_IMAGE);

        Backdrop::Image(image)
    }
}

pub fn stories(items: &[Item], site: &str) -> Vec<Story> {
    items.iter().map(|item| Story::from_item(item, site)).collect()
}
