//! Story/screen navigation as an explicit state machine.
//!
//! Every transition clamps instead of wrapping, and the only way past the
//! last story is out of the viewer.

use crate::story::Story;

/// Zero-based story and screen indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub story: usize,
    pub screen: usize,
}

impl Position {
    pub fn new(story: usize, screen: usize) -> Self {
        Self { story, screen }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewer {
    Closed,
    Open(Position),
}

impl Viewer {
    pub fn position(self) -> Option<Position> {
        match self {
            Viewer::Closed => None,
            Viewer::Open(position) => Some(position),
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Viewer::Open(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Open(usize),
    NextStory,
    PreviousStory,
    NextScreen,
    PreviousScreen,
    Close,
}

/// Computes the state that follows `state` under `command`.
///
/// `screens[i]` is the screen count of story `i`; counts of zero are treated
/// as one.
pub fn step(state: Viewer, command: Command, screens: &[usize]) -> Viewer {
    let last_story = screens.len().checked_sub(1);
    let last_screen = |story: usize| screens.get(story).map_or(0, |count| (*count).max(1) - 1);

    match (state, command) {
        (_, Command::Open(story)) if story < screens.len() => {
            Viewer::Open(Position::new(story, 0))
        }
        (state, Command::Open(_)) => state,
        (_, Command::Close) => Viewer::Closed,
        (Viewer::Closed, _) => Viewer::Closed,

        (Viewer::Open(at), Command::NextStory) => match last_story {
            Some(last) if at.story < last => Viewer::Open(Position::new(at.story + 1, 0)),
            _ => Viewer::Closed,
        },
        (Viewer::Open(at), Command::PreviousStory) if at.story > 0 => {
            Viewer::Open(Position::new(at.story - 1, 0))
        }
        (Viewer::Open(at), Command::NextScreen) if at.screen < last_screen(at.story) => {
            Viewer::Open(Position::new(at.story, at.screen + 1))
        }
        (Viewer::Open(at), Command::PreviousScreen) if at.screen > 0 => {
            Viewer::Open(Position::new(at.story, at.screen - 1))
        }
        (open, _) => open,
    }
}

/// Navigation state of one slideshow session.
#[derive(Clone, Debug)]
pub struct Navigator {
    screens: Vec<usize>,
    state: Viewer,
}

impl Navigator {
    pub fn new(screens: impl IntoIterator<Item = usize>) -> Self {
        Self {
            screens: screens.into_iter().map(|count| count.max(1)).collect(),
            state: Viewer::Closed,
        }
    }

    pub fn for_stories(stories: &[Story]) -> Self {
        Self::new(stories.iter().map(Story::screen_count))
    }

    pub fn state(&self) -> Viewer {
        self.state
    }

    pub fn position(&self) -> Option<Position> {
        self.state.position()
    }

    pub fn screen_count(&self, story: usize) -> usize {
        self.screens.get(story).copied().unwrap_or(0)
    }

    /// The state `command` would lead to, without applying it.
    pub fn peek(&self, command: Command) -> Viewer {
        step(self.state, command, &self.screens)
    }

    pub fn apply(&mut self, command: Command) -> Viewer {
        self.state = self.peek(command);

        tracing::trace!(?command, state = ?self.state, "navigation");

        self.state
    }

    /// Opens at a stored position, clamping both indices into range.
    pub fn restore(&mut self, position: Position) -> Viewer {
        self.state = match self.screens.len() {
            0 => Viewer::Closed,
            count => {
                let story = position.story.min(count - 1);
                let screen = position.screen.min(self.screens[story] - 1);

                Viewer::Open(Position::new(story, screen))
            }
        };

        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: [Command; 7] = [
        Command::Open(0),
        Command::Open(2),
        Command::NextStory,
        Command::PreviousStory,
        Command::NextScreen,
        Command::PreviousScreen,
        Command::Close,
    ];

    fn in_bounds(state: Viewer, screens: &[usize]) -> bool {
        match state {
            Viewer::Closed => true,
            Viewer::Open(at) => at.story < screens.len() && at.screen < screens[at.story].max(1),
        }
    }

    /// Every command sequence up to `depth` long, starting closed.
    fn walk(screens: &[usize], state: Viewer, depth: usize, visit: &mut dyn FnMut(Viewer, Command, Viewer)) {
        if depth == 0 {
            return;
        }

        for command in COMMANDS {
            let next = step(state, command, screens);

            visit(state, command, next);
            walk(screens, next, depth - 1, visit);
        }
    }

    #[test]
    fn indices_stay_in_bounds_for_every_sequence() {
        let screens = [3, 1, 4];

        walk(&screens, Viewer::Closed, 6, &mut |before, command, after| {
            assert!(
                in_bounds(after, &screens),
                "{:?} --{:?}--> {:?}",
                before,
                command,
                after
            );
        });
    }

    #[test]
    fn open_always_starts_at_first_screen() {
        let screens = [3, 1, 4];

        walk(&screens, Viewer::Closed, 5, &mut |_, command, after| {
            if let Command::Open(story) = command {
                assert_eq!(after, Viewer::Open(Position::new(story, 0)));
            }
        });
    }

    #[test]
    fn open_out_of_range_is_ignored() {
        let mut navigator = Navigator::new([2, 2]);

        assert_eq!(navigator.apply(Command::Open(5)), Viewer::Closed);

        navigator.apply(Command::Open(1));
        assert_eq!(
            navigator.apply(Command::Open(9)),
            Viewer::Open(Position::new(1, 0))
        );
    }

    #[test]
    fn next_screen_stops_at_last_screen() {
        let mut navigator = Navigator::new([2, 3]);
        navigator.apply(Command::Open(0));

        navigator.apply(Command::NextScreen);
        assert_eq!(navigator.position(), Some(Position::new(0, 1)));

        navigator.apply(Command::NextScreen);
        assert_eq!(navigator.position(), Some(Position::new(0, 1)));
    }

    #[test]
    fn next_story_past_the_last_closes() {
        let mut navigator = Navigator::new([2, 3]);
        navigator.apply(Command::Open(0));
        navigator.apply(Command::NextScreen);

        assert_eq!(
            navigator.apply(Command::NextStory),
            Viewer::Open(Position::new(1, 0))
        );
        assert_eq!(navigator.apply(Command::NextStory), Viewer::Closed);
    }

    #[test]
    fn retreating_at_the_start_is_a_no_op() {
        let mut navigator = Navigator::new([2, 3]);
        navigator.apply(Command::Open(0));

        assert_eq!(
            navigator.apply(Command::PreviousScreen),
            Viewer::Open(Position::new(0, 0))
        );
        assert_eq!(
            navigator.apply(Command::PreviousStory),
            Viewer::Open(Position::new(0, 0))
        );
    }

    #[test]
    fn previous_story_resets_screen() {
        let mut navigator = Navigator::new([2, 3]);
        navigator.apply(Command::Open(1));
        navigator.apply(Command::NextScreen);
        navigator.apply(Command::NextScreen);

        assert_eq!(
            navigator.apply(Command::PreviousStory),
            Viewer::Open(Position::new(0, 0))
        );
    }

    #[test]
    fn commands_while_closed_do_nothing() {
        let mut navigator = Navigator::new([2]);

        for command in [
            Command::NextStory,
            Command::PreviousStory,
            Command::NextScreen,
            Command::PreviousScreen,
            Command::Close,
        ] {
            assert_eq!(navigator.apply(command), Viewer::Closed);
        }
    }

    #[test]
    fn zero_screen_counts_behave_as_one() {
        let mut navigator = Navigator::new([0]);
        navigator.apply(Command::Open(0));

        assert_eq!(navigator.screen_count(0), 1);
        assert_eq!(
            navigator.apply(Command::NextScreen),
            Viewer::Open(Position::new(0, 0))
        );
    }

    #[test]
    fn restore_clamps_position() {
        let mut navigator = Navigator::new([2, 3]);

        assert_eq!(
            navigator.restore(Position::new(7, 9)),
            Viewer::Open(Position::new(1, 2))
        );
        assert_eq!(
            Navigator::new([]).restore(Position::new(0, 0)),
            Viewer::Closed
        );
    }
}
