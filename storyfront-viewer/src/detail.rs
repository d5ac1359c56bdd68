//! The "read more" overlay shown over the slideshow.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::story::Story;

/// Full content of one story.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detail {
    pub title: String,
    pub summary: Option<String>,
    pub date_label: String,
    pub body_html: Option<String>,
    pub link: String,
    pub image_url: String,
}

impl Detail {
    pub fn for_story(story: &Story, now: DateTime<Utc>) -> Self {
        let summary = Some(story.subtitle.clone())
            .filter(|subtitle| !subtitle.is_empty())
            .or_else(|| story.excerpt.clone());

        Self {
            title: story.title.clone(),
            summary,
            date_label: relative_date_label(&story.publish_date, now),
            body_html: story.content_html.clone(),
            link: story.link.clone(),
            image_url: story.cover_image().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailOverlay {
    #[default]
    Closed,
    Open(Detail),
}

impl DetailOverlay {
    pub fn open(&mut self, detail: Detail) {
        *self = DetailOverlay::Open(detail);
    }

    pub fn close(&mut self) {
        *self = DetailOverlay::Closed;
    }

    pub fn detail(&self) -> Option<&Detail> {
        match self {
            DetailOverlay::Closed => None,
            DetailOverlay::Open(detail) => Some(detail),
        }
    }

    pub fn is_open(&self) -> bool {
        self.detail().is_some()
    }
}

/// WordPress sends dates without an offset; those are read as UTC.
pub fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(date) {
        return Some(date.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// "posted 3 hours ago" style label for the last week, a plain
/// `dd/mm/yyyy` date before that.
pub fn relative_date_label(date: &str, now: DateTime<Utc>) -> String {
    let published = match parse_date(date) {
        Some(published) => published,
        None => return String::new(),
    };

    let elapsed = if now >= published {
        now - published
    } else {
        published - now
    };
    let days = elapsed.num_days();
    let hours = elapsed.num_hours();

    match (days, hours) {
        (0, 0) => "posted a few minutes ago".to_string(),
        (0, 1) => "posted 1 hour ago".to_string(),
        (0, hours) => format!("posted {} hours ago", hours),
        (1, _) => "posted 1 day ago".to_string(),
        (days, _) if days <= 7 => format!("posted {} days ago", days),
        _ => published.format("%d/%m/%Y").to_string(),
    }
}
