//! Resolution of the many shapes a media custom field can take.

use serde::{de::IgnoredAny, Deserialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub source_url: Option<String>,
    pub media_item_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MediaEdge {
    pub node: Option<MediaItem>,
}

/// A single media object, possibly wrapping a connection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    pub source_url: Option<String>,
    pub media_item_url: Option<String>,
    pub nodes: Option<Vec<Option<MediaItem>>>,
    pub edges: Option<Vec<Option<MediaEdge>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Media {
    Url(String),
    List(Vec<Option<MediaItem>>),
    Object(MediaObject),
    Unknown(IgnoredAny),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|url| !url.is_empty())
}

impl MediaItem {
    fn url(&self) -> Option<&str> {
        non_empty(&self.source_url).or_else(|| non_empty(&self.media_item_url))
    }
}

impl Media {
    /// Best display URL: the direct field first, then the first array entry
    /// carrying a URL, then the first node, then the first edge.
    pub fn url(&self) -> Option<&str> {
        match self {
            Media::Url(url) => Some(url.as_str()).filter(|url| !url.is_empty()),
            Media::List(items) => items.iter().flatten().find_map(MediaItem::url),
            Media::Object(object) => non_empty(&object.source_url)
                .or_else(|| non_empty(&object.media_item_url))
                .or_else(|| {
                    object
                        .nodes
                        .as_ref()?
                        .first()?
                        .as_ref()
                        .and_then(MediaItem::url)
                })
                .or_else(|| {
                    object
                        .edges
                        .as_ref()?
                        .first()?
                        .as_ref()?
                        .node
                        .as_ref()
                        .and_then(MediaItem::url)
                }),
            Media::Unknown(_) => None,
        }
    }
}
