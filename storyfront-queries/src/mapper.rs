use storyfront_common::{
    models::{Category, Item, Page, Screen, ScreenBody},
    text,
};

use crate::models::{Post, Posts, Slide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlideKind {
    Text,
    Quote,
    Video,
}

impl SlideKind {
    /// Image slides and anything unrecognised render as text.
    fn normalize(kind: Option<&str>) -> Self {
        match kind.map(str::to_lowercase).as_deref() {
            Some("quote") => SlideKind::Quote,
            Some("video") => SlideKind::Video,
            _ => SlideKind::Text,
        }
    }
}

/// `text`, falling back to `title` when `text` is missing or empty.
fn slide_copy(slide: &Slide) -> String {
    [&slide.text, &slide.title]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn screen(slide: &Slide) -> Screen {
    let media_url = slide
        .media
        .as_ref()
        .and_then(|media| media.url())
        .map(str::to_string);
    let copy = slide_copy(slide);
    let show_button = slide
        .show_button
        .as_ref()
        .map_or(false, |flag| flag.is_set());

    let kind = SlideKind::normalize(slide.kind.as_deref());

    let body = match kind {
        SlideKind::Quote => ScreenBody::Quote {
            quote: Some(copy).filter(|quote| !quote.is_empty()),
            author: None,
        },
        SlideKind::Text | SlideKind::Video => ScreenBody::Text { content: copy },
    };

    let (image_url, video_url) = match kind {
        SlideKind::Video => (None, media_url),
        _ => (media_url, None),
    };

    Screen {
        body,
        image_url,
        video_url,
        show_button,
    }
}

/// Cover screen followed by the authored slides.
fn screens(post: &Post, title: &str) -> Vec<Screen> {
    let cover = Screen::text(
        text::strip_html(title),
        post.featured_image_url().map(str::to_string),
    );

    let authored = post
        .stories_simples
        .as_ref()
        .and_then(|group| group.stories.as_ref())
        .into_iter()
        .flatten()
        .flatten()
        .map(screen);

    std::iter::once(cover).chain(authored).collect()
}

pub fn item(post: Post) -> Item {
    let body = post
        .content
        .as_deref()
        .or(post.excerpt.as_deref())
        .unwrap_or_default();
    let reading_time_min = text::reading_time(&text::strip_html(body));

    let title = post.title.clone().unwrap_or_default();
    let screens = screens(&post, &title);

    let category = post.primary_category().map(|term| Category {
        name: term.name.clone(),
        slug: term.slug.clone(),
    });

    Item {
        image: post.featured_image_url().map(str::to_string),
        excerpt: text::excerpt(post.excerpt.as_deref().unwrap_or_default()),
        id: post.id,
        title,
        date: post.date.unwrap_or_default(),
        uri: post.uri.unwrap_or_default(),
        category,
        reading_time_min,
        content_html: post.content.filter(|content| !content.is_empty()),
        screens,
    }
}

pub fn page(posts: Posts) -> Page {
    Page {
        items: posts.nodes.into_iter().map(item).collect(),
        page_info: posts.page_info,
    }
}
