//! Raw shapes returned by WPGraphQL.
//!
//! Optional fields are deserialized leniently: a value of the wrong shape is
//! treated as absent instead of failing the whole page.

use serde::{de::DeserializeOwned, de::IgnoredAny, Deserialize, Deserializer};
use storyfront_common::models::PageInfo;

use crate::media::Media;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
pub struct PostsData {
    pub posts: Posts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posts {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<Post>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub categories: Option<Connection<Term>>,
    #[serde(default, deserialize_with = "lenient")]
    pub featured_image: Option<Edge<Image>>,
    #[serde(default, deserialize_with = "lenient")]
    pub stories_simples: Option<StoriesSimples>,
}

impl Post {
    pub fn primary_category(&self) -> Option<&Term> {
        self.categories.as_ref()?.nodes.first()
    }

    pub fn featured_image_url(&self) -> Option<&str> {
        self.featured_image
            .as_ref()?
            .node
            .as_ref()?
            .source_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Term {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub source_url: Option<String>,
}

/// Custom-field group holding the authored slides.
#[derive(Debug, Default, Deserialize)]
pub struct StoriesSimples {
    #[serde(default, deserialize_with = "lenient")]
    pub stories: Option<Vec<Option<Slide>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default)]
    pub show_button: Option<Flag>,
    #[serde(default)]
    pub media: Option<Media>,
}

/// Checkbox fields come back as a bool or as 0/1.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(f64),
    Other(IgnoredAny),
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(value) => *value,
            Flag::Number(value) => *value != 0.0,
            Flag::Other(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_optional_fields_become_absent() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": "cG9zdDox",
            "title": "A title",
            "excerpt": 42,
            "categories": "not a connection",
            "featuredImage": { "node": { "sourceUrl": "https://cdn.example/cover.jpg" } },
            "storiesSimples": { "stories": "nope" },
        }))
        .unwrap();

        assert_eq!(post.excerpt, None);
        assert!(post.categories.is_none());
        assert!(post.stories_simples.as_ref().unwrap().stories.is_none());
        assert_eq!(
            post.featured_image_url(),
            Some("https://cdn.example/cover.jpg")
        );
    }

    #[test]
    fn show_button_accepts_bool_and_number() {
        let slides: Vec<Slide> = serde_json::from_value(serde_json::json!([
            { "showButton": true },
            { "showButton": 1 },
            { "showButton": 0 },
            { "showButton": "yes" },
            {},
        ]))
        .unwrap();

        let flags: Vec<bool> = slides
            .iter()
            .map(|slide| slide.show_button.as_ref().map_or(false, Flag::is_set))
            .collect();

        assert_eq!(flags, vec![true, true, false, false, false]);
    }
}
