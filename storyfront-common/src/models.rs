use serde::{Deserialize, Serialize};

/// Primary category of a post.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScreenBody {
    Text {
        content: String,
    },
    Quote {
        quote: Option<String>,
        author: Option<String>,
    },
}

/// A single slide of a story.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    #[serde(flatten)]
    pub body: ScreenBody,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub show_button: bool,
}

impl Screen {
    pub fn text(content: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            body: ScreenBody::Text {
                content: content.into(),
            },
            image_url,
            video_url: None,
            show_button: false,
        }
    }
}

/// A post reshaped for the grid and the slideshow.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub date: String,
    pub uri: String,
    pub category: Option<Category>,
    pub image: Option<String>,
    pub reading_time_min: u32,
    pub excerpt: String,
    pub content_html: Option<String>,
    pub screens: Vec<Screen>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One page of items as returned by the proxy endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<Item>,
    pub page_info: PageInfo,
}
