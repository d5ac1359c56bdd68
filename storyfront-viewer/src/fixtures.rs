use storyfront_common::models::{Item, Screen};

use crate::story::Story;

pub(crate) const SITE: &str = "https://portal.example";

pub(crate) fn item(id: &str, screens: usize) -> Item {
    Item {
        id: id.to_string(),
        title: format!("Story {}", id),
        date: "2024-05-01T12:00:00".into(),
        uri: format!("/{}/", id),
        category: None,
        image: Some(format!("https://cdn.example/{}.jpg", id)),
        reading_time_min: 1,
        excerpt: "An excerpt.".into(),
        content_html: None,
        screens: (0..screens)
            .map(|n| Screen::text(format!("screen {}", n), None))
            .collect(),
    }
}

/// One story per entry, each with the given number of screens.
pub(crate) fn stories(screens: &[usize]) -> Vec<Story> {
    screens
        .iter()
        .enumerate()
        .map(|(n, count)| Story::from_item(&item(&n.to_string(), *count), SITE))
        .collect()
}
