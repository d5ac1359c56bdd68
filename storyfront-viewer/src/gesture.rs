//! Turning raw keyboard, wheel, touch and tap input into navigation commands.

use crate::navigator::Command;

/// Minimum travel, in pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Parses a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "Escape" | "Esc" => Some(Key::Escape),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            _ => None,
        }
    }

    pub fn command(self) -> Command {
        match self {
            Key::Escape => Command::Close,
            Key::ArrowUp => Command::PreviousStory,
            Key::ArrowDown => Command::NextStory,
            Key::ArrowLeft => Command::PreviousScreen,
            Key::ArrowRight => Command::NextScreen,
        }
    }
}

/// Direction the finger travelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swipe {
    Up,
    Down,
    Left,
    Right,
}

impl Swipe {
    /// Vertical swipes win when they dominate and pass the threshold;
    /// otherwise a long enough horizontal move counts.
    pub fn classify(dx: f64, dy: f64) -> Option<Self> {
        if dy.abs() > dx.abs() && dy.abs() > SWIPE_THRESHOLD {
            return Some(if dy > 0.0 { Swipe::Down } else { Swipe::Up });
        }

        if dx.abs() > SWIPE_THRESHOLD {
            return Some(if dx > 0.0 { Swipe::Right } else { Swipe::Left });
        }

        None
    }

    /// Swiping down always leaves the viewer.
    pub fn command(self) -> Command {
        match self {
            Swipe::Up => Command::NextStory,
            Swipe::Down => Command::Close,
            Swipe::Left => Command::NextScreen,
            Swipe::Right => Command::PreviousScreen,
        }
    }
}

/// Remembers where the current touch started.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchTracker {
    start: Option<(f64, f64)>,
}

impl TouchTracker {
    pub fn begin(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// Ends the touch; a release without a recorded start is ignored.
    pub fn end(&mut self, x: f64, y: f64) -> Option<Swipe> {
        let (start_x, start_y) = self.start.take()?;

        Swipe::classify(x - start_x, y - start_y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapZone {
    Previous,
    Middle,
    Next,
}

impl TapZone {
    /// Zone for a tap at `x` pixels from the left edge of a viewer `width` wide.
    pub fn locate(x: f64, width: f64) -> Self {
        if width <= 0.0 {
            return TapZone::Middle;
        }

        if x < width / 3.0 {
            TapZone::Previous
        } else if x > 2.0 * width / 3.0 {
            TapZone::Next
        } else {
            TapZone::Middle
        }
    }

    pub fn command(self) -> Option<Command> {
        match self {
            TapZone::Previous => Some(Command::PreviousScreen),
            TapZone::Middle => None,
            TapZone::Next => Some(Command::NextScreen),
        }
    }
}

/// How closely spaced wheel events may each move a story.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelPolicy {
    /// Every event steps, so a fast flick can skip several stories.
    Unthrottled,
    /// Events within `millis` of the last accepted one are dropped.
    Cooldown { millis: u64 },
}

impl Default for WheelPolicy {
    fn default() -> Self {
        WheelPolicy::Unthrottled
    }
}

impl WheelPolicy {
    pub fn from_cooldown(millis: Option<u64>) -> Self {
        match millis {
            Some(millis) if millis > 0 => WheelPolicy::Cooldown { millis },
            _ => WheelPolicy::Unthrottled,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Wheel {
    policy: WheelPolicy,
    last_accepted: Option<u64>,
}

impl Wheel {
    pub fn new(policy: WheelPolicy) -> Self {
        Self {
            policy,
            last_accepted: None,
        }
    }

    /// `at` is the event timestamp in milliseconds.
    pub fn on_wheel(&mut self, delta_y: f64, at: u64) -> Option<Command> {
        if let (WheelPolicy::Cooldown { millis }, Some(last)) = (self.policy, self.last_accepted) {
            if at.saturating_sub(last) < millis {
                return None;
            }
        }

        self.last_accepted = Some(at);

        Some(if delta_y > 0.0 {
            Command::NextStory
        } else {
            Command::PreviousStory
        })
    }
}
