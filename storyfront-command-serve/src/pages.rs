//! Server-rendered grid and story viewer.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Extension, Query},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use storyfront_common::{
    err,
    models::{Screen, ScreenBody},
    text, Report,
};
use storyfront_viewer::{
    color,
    gesture::SWIPE_THRESHOLD,
    slideshow::story_bullets,
    Backdrop, Command, Detail, DetailOverlay, Event, Footer, Grid, HostStyle, Key, Mark, Position,
    Swipe, Viewer, Viewport, WheelPolicy,
};

use crate::{AppState, Error};

static STYLE: &str = include_str!("../../assets/storyfront.css");

const END_TEXT: &str = "You reached the end.";
const LOADING_TEXT: &str = "Loading more\u{2026}";

const BOUND_KEYS: [&str; 5] = ["Escape", "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

/// Most pages a single request rebuilds from the CMS.
const MAX_PAGES: usize = 40;

#[derive(Debug, serde::Deserialize)]
pub struct GridQuery {
    from: Option<String>,
    pages: Option<usize>,
}

#[derive(Debug, serde::Deserialize)]
pub struct FragmentQuery {
    from: Option<String>,
    after: Option<String>,
    pages: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, serde::Deserialize)]
pub struct StoryQuery {
    from: Option<String>,
    pages: Option<usize>,
    story: Option<usize>,
    screen: Option<usize>,
    detail: Option<u8>,
}

fn is_single(pages: &usize) -> bool {
    *pages <= 1
}

#[derive(serde::Serialize)]
struct GridLink<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(skip_serializing_if = "is_single")]
    pages: usize,
}

#[derive(serde::Serialize)]
struct FragmentLink<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a str>,
    pages: usize,
    offset: usize,
}

#[derive(serde::Serialize)]
struct StoryLink<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(skip_serializing_if = "is_single")]
    pages: usize,
    story: usize,
    screen: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<u8>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn with_query<Q>(path: &str, query: &Q) -> Result<String, Report>
where
    Q: serde::Serialize,
{
    let query = serde_urlencoded::to_string(query)?;

    Ok(if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    })
}

/// A grid as the visitor sees it: the cursor it started from and how many
/// pages the sentinel has loaded since. Story indices count from the first
/// card of `from`.
#[derive(Clone, Copy, Debug)]
struct Origin<'a> {
    from: Option<&'a str>,
    pages: usize,
}

impl<'a> Origin<'a> {
    fn new(from: Option<&'a str>, pages: Option<usize>) -> Self {
        Self {
            from: non_empty(from),
            pages: pages.unwrap_or(1).clamp(1, MAX_PAGES),
        }
    }

    fn grid_href(self) -> Result<String, Report> {
        with_query(
            "/",
            &GridLink {
                from: self.from,
                pages: self.pages,
            },
        )
    }

    fn story_href(self, at: Position, detail: bool) -> Result<String, Report> {
        with_query(
            "/story",
            &StoryLink {
                from: self.from,
                pages: self.pages,
                story: at.story,
                screen: at.screen,
                detail: detail.then(|| 1),
            },
        )
    }

    /// Where a viewer state lives: its story page, or the grid once closed.
    fn viewer_href(self, viewer: Viewer) -> Result<String, Report> {
        match viewer {
            Viewer::Open(at) => self.story_href(at, false),
            Viewer::Closed => self.grid_href(),
        }
    }

    /// Link for the fragment holding page `pages + 1`, whose first card is
    /// story `offset`.
    fn next_fragment_href(self, after: Option<&str>, offset: usize) -> Result<String, Report> {
        with_query(
            "/grid",
            &FragmentLink {
                from: self.from,
                after,
                pages: self.pages + 1,
                offset,
            },
        )
    }
}

/// Replays the sentinel from `from` until `pages` pages are loaded. Loading
/// stops at the first failure; the second value is how many pages made it.
async fn load(state: &AppState, from: Option<&str>, pages: usize) -> (Grid, usize) {
    let mut grid = Grid::pending(from.map(str::to_string), state.page_size, state.site.clone());
    let mut loaded = 0;

    while loaded < pages {
        let request = match grid.on_sentinel_visible() {
            Some(request) => request,
            None => break,
        };

        match state
            .cms
            .fetch_page(request.first, request.after.as_deref())
            .await
        {
            Ok(page) => {
                grid.apply_page(page);
                loaded += 1;
            }
            Err(error) => {
                tracing::warn!(error = %error, page = loaded, "unable to load posts");

                grid.fail_fetch();
                break;
            }
        }
    }

    (grid, loaded)
}

struct Card {
    href: String,
    title: String,
    excerpt: String,
    image: Option<String>,
    category: String,
    color: String,
    reading_time: u32,
}

/// Cards for the grid's items, the first one being story `offset` of
/// `origin`.
fn cards(grid: &Grid, origin: Origin<'_>, offset: usize) -> Result<Vec<Card>, Report> {
    grid.items()
        .iter()
        .zip(grid.stories())
        .enumerate()
        .map(|(index, (item, story))| {
            Ok(Card {
                href: origin.story_href(Position::new(offset + index, 0), false)?,
                title: text::strip_html(&item.title),
                excerpt: item.excerpt.clone(),
                image: item.image.clone(),
                color: color::category_color(&story.category, story.category_slug.as_deref()),
                category: story.category,
                reading_time: item.reading_time_min,
            })
        })
        .collect()
}

/// The sentinel below `grid`, which already holds `origin.pages` pages and
/// `loaded` cards in total.
fn sentinel(grid: &Grid, origin: Origin<'_>, loaded: usize) -> Result<Option<String>, Report> {
    let info = grid.page_info();

    if !info.has_next_page {
        return Ok(None);
    }

    origin
        .next_fragment_href(info.end_cursor.as_deref(), loaded)
        .map(Some)
}

fn footer_text(footer: Footer) -> &'static str {
    match footer {
        Footer::Loading => LOADING_TEXT,
        Footer::End => END_TEXT,
        Footer::Idle => "",
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    css: &'static str,
    root_style: String,
    body_style: String,
    cards: Vec<Card>,
    sentinel: Option<String>,
    footer: &'static str,
    end_text: &'static str,
    loading_text: &'static str,
}

#[derive(Template)]
#[template(path = "cards.html")]
struct CardsFragment {
    cards: Vec<Card>,
    sentinel: Option<String>,
}

/// The grid starting at `from`, with `pages` pages already loaded.
pub async fn index(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> Result<impl IntoResponse, Error> {
    let requested = Origin::new(query.from.as_deref(), query.pages);
    let (grid, loaded) = load(&state, requested.from, requested.pages).await;

    let origin = Origin {
        pages: loaded.max(1),
        ..requested
    };
    let sentinel_origin = Origin {
        pages: loaded,
        ..requested
    };

    Ok(Html(
        IndexPage {
            css: STYLE,
            root_style: String::new(),
            body_style: String::new(),
            cards: cards(&grid, origin, 0)?,
            sentinel: sentinel(&grid, sentinel_origin, grid.items().len())?,
            footer: footer_text(grid.footer()),
            end_text: END_TEXT,
            loading_text: LOADING_TEXT,
        }
        .render()
        .map_err(Error::from_any)?,
    ))
}

/// Cards for one more page, appended by the grid's scroll sentinel.
///
/// Without `pages` the fragment stands alone, as the first page of a grid
/// starting at `after`.
pub async fn grid(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FragmentQuery>,
) -> Result<impl IntoResponse, Error> {
    let after = non_empty(query.after.as_deref());

    let (origin, offset) = match query.pages {
        Some(pages) => (
            Origin::new(query.from.as_deref(), Some(pages)),
            query.offset.unwrap_or(0),
        ),
        None => (Origin::new(after, None), 0),
    };

    let (grid, loaded) = load(&state, after, 1).await;

    let before = Origin {
        pages: origin.pages - 1 + loaded,
        ..origin
    };

    Ok(Html(
        CardsFragment {
            cards: cards(&grid, origin, offset)?,
            sentinel: sentinel(&grid, before, offset + grid.items().len())?,
        }
        .render()
        .map_err(Error::from_any)?,
    ))
}

struct ScreenView {
    heading: String,
    quote: Option<String>,
    author: Option<String>,
    show_button: bool,
}

impl ScreenView {
    fn new(screen: &Screen) -> Self {
        let (heading, quote, author) = match &screen.body {
            ScreenBody::Text { content } => (content.clone(), None, None),
            ScreenBody::Quote { quote, author } => ("Quote".to_string(), quote.clone(), author.clone()),
        };

        Self {
            heading,
            quote,
            author,
            show_button: screen.show_button,
        }
    }
}

struct Links {
    wheel_up: String,
    wheel_down: String,
    swipe_up: String,
    swipe_down: String,
    swipe_left: String,
    swipe_right: String,
    previous_screen: String,
    next_screen: String,
    close: String,
    read_more: String,
    close_detail: String,
}

struct KeyBinding {
    key: &'static str,
    href: String,
}

fn mark_class(mark: Mark) -> &'static str {
    match mark {
        Mark::Seen => "seen",
        Mark::Current => "current",
        Mark::Upcoming => "upcoming",
    }
}

#[derive(Template)]
#[template(path = "story.html")]
struct StoryPage {
    css: &'static str,
    root_style: String,
    body_style: String,
    title: String,
    subtitle: String,
    category: String,
    color: String,
    is_cover: bool,
    screen: ScreenView,
    video: Option<String>,
    image: String,
    bars: Vec<&'static str>,
    bullets: Vec<&'static str>,
    links: Links,
    keys: Vec<KeyBinding>,
    prefetch: Vec<String>,
    detail: Option<Detail>,
    swipe_threshold: f64,
    wheel_cooldown: u64,
}

/// The slideshow over every story of the grid described by `from` and
/// `pages`, positioned at `story`/`screen`. Every navigation input is
/// rendered as the link of the state it leads to.
#[tracing::instrument(skip(state))]
pub async fn story(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<StoryQuery>,
) -> Result<Response, Error> {
    let origin = Origin::new(query.from.as_deref(), query.pages);
    let (grid, _) = load(&state, origin.from, origin.pages).await;

    let mut host = HostStyle::default();

    let mut show = match grid.open_story(0, state.wheel, &mut host, Viewport::default()) {
        Some(show) => show,
        None => return Ok(Redirect::to(&origin.grid_href()?).into_response()),
    };

    let requested = Position::new(query.story.unwrap_or(0), query.screen.unwrap_or(0));
    let at = match show.restore(requested) {
        Viewer::Open(at) => at,
        Viewer::Closed => return Ok(Redirect::to(&origin.grid_href()?).into_response()),
    };

    let mut overlay = DetailOverlay::default();
    if query.detail == Some(1) {
        let read_more = show.handle(Event::ReadMore, &mut host).read_more;

        if let Some(story) = read_more.and_then(|index| show.stories().get(index)) {
            overlay.open(Detail::for_story(story, Utc::now()));
        }
    }

    let story = show
        .stories()
        .get(at.story)
        .ok_or_else(|| err!("story {} is out of range", at.story))?;
    let screen = story
        .screen(at.screen)
        .ok_or_else(|| err!("screen {} is out of range", at.screen))?;

    let navigator = show.navigator();
    let href = |command: Command| origin.viewer_href(navigator.peek(command));

    let close_detail = origin.story_href(at, false)?;

    let links = Links {
        wheel_up: href(Command::PreviousStory)?,
        wheel_down: href(Command::NextStory)?,
        swipe_up: href(Swipe::Up.command())?,
        swipe_down: href(Swipe::Down.command())?,
        swipe_left: href(Swipe::Left.command())?,
        swipe_right: href(Swipe::Right.command())?,
        previous_screen: href(Command::PreviousScreen)?,
        next_screen: href(Command::NextScreen)?,
        close: href(Command::Close)?,
        read_more: origin.story_href(at, true)?,
        close_detail: close_detail.clone(),
    };

    let mut keys = Vec::with_capacity(BOUND_KEYS.len());
    for name in BOUND_KEYS {
        let key = match Key::from_dom(name) {
            Some(key) => key,
            None => continue,
        };

        let target = if key == Key::Escape && overlay.is_open() {
            close_detail.clone()
        } else {
            href(key.command())?
        };

        keys.push(KeyBinding {
            key: name,
            href: target,
        });
    }

    let (video, image) = match story.backdrop(at.screen) {
        Backdrop::Video(url) => (Some(url.to_string()), story.cover_image().to_string()),
        Backdrop::Image(url) => (None, url.to_string()),
    };

    let page = StoryPage {
        css: STYLE,
        root_style: host.root_css(),
        body_style: host.body_css(),
        title: text::strip_html(&story.title),
        subtitle: story.subtitle.clone(),
        color: color::category_color(&story.category, story.category_slug.as_deref()),
        category: story.category.clone(),
        is_cover: at.screen == 0,
        screen: ScreenView::new(screen),
        video,
        image,
        bars: (0..story.screen_count())
            .map(|index| mark_class(Mark::of(index, at.screen)))
            .collect(),
        bullets: story_bullets(at.story, show.stories().len())
            .into_iter()
            .map(|(_, mark)| mark_class(mark))
            .collect(),
        links,
        keys,
        prefetch: show.prefetch_hints(),
        detail: overlay.detail().cloned(),
        swipe_threshold: SWIPE_THRESHOLD,
        wheel_cooldown: match state.wheel {
            WheelPolicy::Unthrottled => 0,
            WheelPolicy::Cooldown { millis } => millis,
        },
    };

    Ok(Html(page.render().map_err(Error::from_any)?).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::testing::{get, router, Catalog};

    #[tokio::test]
    async fn index_renders_cards_and_sentinel() {
        let catalog = Arc::new(Catalog::new(12));

        let (status, _, body) = get(router(catalog), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Headline 0"));
        assert!(body.contains("Headline 8"));
        assert!(!body.contains("Headline 9"));
        assert!(body.contains(r#"href="/story?story=3&amp;screen=0""#));
        assert!(body.contains(r#"data-next="/grid?after=cursor%3A8&amp;pages=2&amp;offset=9""#));
    }

    #[tokio::test]
    async fn appended_cards_index_into_the_whole_grid() {
        let catalog = Arc::new(Catalog::new(12));

        let (_, _, body) = get(router(catalog), "/grid?after=cursor%3A8&pages=2&offset=9").await;

        assert!(body.contains("Headline 11"));
        assert!(!body.contains("Headline 8"));
        assert!(!body.contains("data-next"));
        assert!(body.contains(r#"href="/story?pages=2&amp;story=9&amp;screen=0""#));
        assert!(body.contains(r#"href="/story?pages=2&amp;story=11&amp;screen=0""#));
    }

    #[tokio::test]
    async fn standalone_fragment_starts_its_own_grid() {
        let catalog = Arc::new(Catalog::new(20));

        let (_, _, body) = get(router(catalog), "/grid?after=cursor%3A8").await;

        assert!(body.contains("Headline 9"));
        assert!(body.contains(r#"href="/story?from=cursor%3A8&amp;story=0&amp;screen=0""#));
        assert!(body.contains(
            r#"data-next="/grid?from=cursor%3A8&amp;after=cursor%3A17&amp;pages=2&amp;offset=9""#
        ));
    }

    #[tokio::test]
    async fn index_reloads_every_page_it_had() {
        let catalog = Arc::new(Catalog::new(12));

        let (_, _, body) = get(router(catalog.clone()), "/?pages=2").await;

        assert!(body.contains("Headline 0"));
        assert!(body.contains("Headline 11"));
        assert!(body.contains(r#"href="/story?pages=2&amp;story=11&amp;screen=0""#));
        assert!(!body.contains("data-next"));
        assert_eq!(catalog.requested_firsts(), vec![9, 9]);
    }

    #[tokio::test]
    async fn failed_fragment_retries_the_same_page() {
        let mut catalog = Catalog::new(12);
        catalog.down = true;

        let (status, _, body) =
            get(router(Arc::new(catalog)), "/grid?after=cursor%3A8&pages=2&offset=9").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("class=\"card\""));
        assert!(body.contains(r#"data-next="/grid?after=cursor%3A8&amp;pages=2&amp;offset=9""#));
    }

    #[tokio::test]
    async fn upstream_failure_renders_an_empty_grid() {
        let mut catalog = Catalog::new(12);
        catalog.down = true;

        let (status, _, body) = get(router(Arc::new(catalog)), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("class=\"card\""));
    }

    #[tokio::test]
    async fn story_links_follow_the_navigation_rules() {
        let catalog = Arc::new(Catalog::new(3));

        let (status, _, body) = get(router(catalog), "/story?story=0&screen=0").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"data-wheel-down="/story?story=1&amp;screen=0""#));
        assert!(body.contains(r#"data-wheel-up="/story?story=0&amp;screen=0""#));
        assert!(body.contains(r#"data-swipe-down="/""#));
        assert!(body.contains(r#"data-key="ArrowRight" href="/story?story=0&amp;screen=1""#));
        assert!(body.contains(r#"data-key="Escape" href="/""#));
        assert!(body.contains(r#"<link rel="prefetch" as="image" href="https://cdn.example/1.jpg">"#));
        assert!(body.contains(r#"<link rel="prefetch" as="image" href="https://cdn.example/1-a.jpg">"#));
        assert!(body.contains("overflow: hidden;"));
    }

    #[tokio::test]
    async fn previous_story_crosses_grid_pages() {
        let catalog = Arc::new(Catalog::new(12));

        let (status, _, body) = get(router(catalog), "/story?pages=2&story=9&screen=0").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Headline 9"));
        assert!(body.contains(r#"data-wheel-up="/story?pages=2&amp;story=8&amp;screen=0""#));
        assert!(body.contains(r#"data-wheel-down="/story?pages=2&amp;story=10&amp;screen=0""#));
        assert!(body.contains(r#"data-swipe-down="/?pages=2""#));
        assert!(body.contains(r#"data-key="Escape" href="/?pages=2""#));
        assert_eq!(body.matches(r#"class="bullet "#).count(), 5);
        assert_eq!(body.matches(r#"class="bullet seen""#).count(), 2);
    }

    #[tokio::test]
    async fn story_keeps_the_grid_start() {
        let catalog = Arc::new(Catalog::new(12));

        let (_, _, body) = get(router(catalog), "/story?from=cursor%3A8&story=0&screen=0").await;

        assert!(body.contains("Headline 9"));
        assert!(body.contains(r#"data-swipe-down="/?from=cursor%3A8""#));
        assert!(body.contains(r#"data-wheel-down="/story?from=cursor%3A8&amp;story=1&amp;screen=0""#));
    }

    #[tokio::test]
    async fn story_position_is_clamped_and_last_story_closes() {
        let catalog = Arc::new(Catalog::new(3));

        let (status, _, body) = get(router(catalog), "/story?story=9&screen=9").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Said someone"));
        assert!(body.contains(r#"data-wheel-down="/""#));
        assert!(body.contains(r#"data-key="ArrowRight" href="/story?story=2&amp;screen=2""#));
    }

    #[tokio::test]
    async fn detail_overlay_renders_full_content() {
        let catalog = Arc::new(Catalog::new(3));

        let (_, _, body) = get(router(catalog), "/story?story=1&screen=0&detail=1").await;

        assert!(body.contains("<p>Body of post 1</p>"));
        assert!(body.contains("https://portal.commarilia.com/news/1/"));
        assert!(body.contains(r#"data-key="Escape" href="/story?story=1&amp;screen=0""#));
    }

    #[tokio::test]
    async fn story_without_posts_redirects_to_grid() {
        let catalog = Arc::new(Catalog::new(0));

        let (status, headers, _) = get(router(catalog), "/story?story=0").await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/");
    }
}
