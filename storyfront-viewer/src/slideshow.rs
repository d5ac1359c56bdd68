use storyfront_common::models::Screen;

use crate::{
    gesture::{Key, Swipe, TapZone, TouchTracker, Wheel, WheelPolicy},
    navigator::{Command, Navigator, Position, Viewer},
    scroll::{HostStyle, ScrollLock, Viewport},
    story::Story,
};

/// Raw input delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Key(Key),
    /// `at` is the event timestamp in milliseconds.
    Wheel { delta_y: f64, at: u64 },
    TouchStart { x: f64, y: f64 },
    TouchEnd { x: f64, y: f64 },
    Tap { x: f64, width: f64 },
    CloseButton,
    Backdrop,
    ReadMore,
}

/// What the host should do after an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub viewer: Viewer,
    /// Images worth warming up, set whenever a story is entered.
    pub prefetch: Vec<String>,
    /// Index of the story whose detail overlay was requested.
    pub read_more: Option<usize>,
}

/// Up to three distinct image URLs of the story after `at`: its cover,
/// then the images of its first two screens that have one.
pub fn prefetch_hints(stories: &[Story], at: Position) -> Vec<String> {
    let next = match stories.get(at.story + 1) {
        Some(next) => next,
        None => return Vec::new(),
    };

    let screen_images = next
        .screens()
        .iter()
        .filter_map(|screen| screen.image_url.as_deref())
        .filter(|url| !url.is_empty())
        .take(2);

    let mut hints: Vec<String> = Vec::with_capacity(3);

    for url in next.image_url.as_deref().into_iter().chain(screen_images) {
        if !hints.iter().any(|hint| hint == url) {
            hints.push(url.to_string());
        }
    }

    hints
}

/// Progress marker state, relative to the current index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Seen,
    Current,
    Upcoming,
}

impl Mark {
    pub fn of(index: usize, current: usize) -> Self {
        match index.cmp(&current) {
            std::cmp::Ordering::Less => Mark::Seen,
            std::cmp::Ordering::Equal => Mark::Current,
            std::cmp::Ordering::Greater => Mark::Upcoming,
        }
    }
}

pub const MAX_BULLETS: usize = 5;

/// Story bullets to draw: every story when there are few, otherwise a
/// window of five that keeps the current story third from the top where
/// possible.
pub fn story_bullets(current: usize, total: usize) -> Vec<(usize, Mark)> {
    let start = if total <= MAX_BULLETS {
        0
    } else {
        current.saturating_sub(2).min(total - MAX_BULLETS)
    };

    (start..total.min(start + MAX_BULLETS))
        .map(|index| (index, Mark::of(index, current)))
        .collect()
}

/// An open story viewer together with its host-side effects.
pub struct Slideshow {
    stories: Vec<Story>,
    navigator: Navigator,
    touch: TouchTracker,
    wheel: Wheel,
    lock: Option<ScrollLock>,
}

impl Slideshow {
    /// Opens at story `index` and locks the host's scrolling; `None` when
    /// there is no such story.
    pub fn open(
        stories: Vec<Story>,
        index: usize,
        policy: WheelPolicy,
        host: &mut HostStyle,
        viewport: Viewport,
    ) -> Option<Self> {
        let mut navigator = Navigator::for_stories(&stories);

        if !navigator.apply(Command::Open(index)).is_open() {
            return None;
        }

        tracing::debug!(story = index, stories = stories.len(), "opening slideshow");

        Some(Self {
            stories,
            navigator,
            touch: TouchTracker::default(),
            wheel: Wheel::new(policy),
            lock: Some(ScrollLock::engage(host, viewport)),
        })
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn state(&self) -> Viewer {
        self.navigator.state()
    }

    pub fn position(&self) -> Option<Position> {
        self.navigator.position()
    }

    pub fn current_story(&self) -> Option<&Story> {
        self.stories.get(self.position()?.story)
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        let at = self.position()?;

        self.stories.get(at.story)?.screen(at.screen)
    }

    pub fn prefetch_hints(&self) -> Vec<String> {
        self.position()
            .map(|at| prefetch_hints(&self.stories, at))
            .unwrap_or_default()
    }

    /// Jumps to a stored position, clamped into range.
    pub fn restore(&mut self, position: Position) -> Viewer {
        self.navigator.restore(position)
    }

    fn command_for(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) => Some(key.command()),
            Event::Wheel { delta_y, at } => self.wheel.on_wheel(delta_y, at),
            Event::TouchStart { x, y } => {
                self.touch.begin(x, y);

                None
            }
            Event::TouchEnd { x, y } => {
                self.touch.end(x, y).map(Swipe::command)
            }
            Event::Tap { x, width } => TapZone::locate(x, width).command(),
            Event::CloseButton | Event::Backdrop => Some(Command::Close),
            Event::ReadMore => None,
        }
    }

    pub fn handle(&mut self, event: Event, host: &mut HostStyle) -> Outcome {
        let before = self.navigator.state();

        let read_more = match event {
            Event::ReadMore => before.position().map(|at| at.story),
            _ => None,
        };

        let after = match self.command_for(event) {
            Some(command) => self.navigator.apply(command),
            None => before,
        };

        let entered_story = match (before, after) {
            (Viewer::Open(from), Viewer::Open(to)) => from.story != to.story,
            _ => false,
        };

        if !after.is_open() {
            self.close(host);
        }

        Outcome {
            viewer: after,
            prefetch: if entered_story {
                self.prefetch_hints()
            } else {
                Vec::new()
            },
            read_more,
        }
    }

    /// Closes the viewer and hands the host its styles back.
    pub fn close(&mut self, host: &mut HostStyle) {
        self.navigator.apply(Command::Close);

        if let Some(lock) = self.lock.take() {
            tracing::debug!("releasing scroll lock");

            lock.release(host);
        }
    }
}
