//! Screen state machine
//!
//! Each screen variant carries only the state it needs. Confirm on the start
//! or lore screen enters the game; nothing leads out of the game, and the end
//! screen has no way in through input.

use crate::config::{ControlConfig, InitialScreen};
use crate::input::{apply_movement, InputSnapshot};
use crate::render::text::{TextReveal, TitlePulse};
use crate::render::TransformState;

/// Discriminant of [`Screen`], for logging and comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    /// Title screen
    Start,
    /// Lore text screen
    Lore,
    /// Model viewer
    Game,
    /// Terminal screen
    End,
}

/// The active screen and its state
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Pulsing title
    Start(TitlePulse),
    /// Progressively revealed lore
    Lore(TextReveal),
    /// Movable model
    Game(TransformState),
    /// Draws nothing
    End,
}

impl Screen {
    /// The screen the demo opens on
    pub fn initial(kind: InitialScreen, lore_text: String, reveal_interval: f32) -> Self {
        match kind {
            InitialScreen::Start => Self::Start(TitlePulse::default()),
            InitialScreen::Lore => Self::Lore(TextReveal::new(lore_text, reveal_interval)),
        }
    }

    /// Which screen this is
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Start(_) => ScreenKind::Start,
            Self::Lore(_) => ScreenKind::Lore,
            Self::Game(_) => ScreenKind::Game,
            Self::End => ScreenKind::End,
        }
    }

    /// Advance one frame
    pub fn update(self, input: &InputSnapshot, delta_seconds: f32, controls: &ControlConfig) -> Self {
        match self {
            Self::Start(_) | Self::Lore(_) if input.confirm => {
                log::info!("Leaving {:?} screen", self.kind());
                Self::Game(TransformState::default())
            }
            Self::Start(mut pulse) => {
                pulse.step();
                Self::Start(pulse)
            }
            Self::Lore(mut reveal) => {
                reveal.advance(delta_seconds);
                Self::Lore(reveal)
            }
            Self::Game(state) => Self::Game(apply_movement(state, input, controls)),
            Self::End => Self::End,
        }
    }
}

/// Application state threaded through the frame loop
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Active screen
    pub screen: Screen,
    /// Set once close was requested
    pub should_close: bool,
    controls: ControlConfig,
}

impl AppState {
    /// Start on `screen`, moving the model with `controls` once in game
    pub fn new(screen: Screen, controls: ControlConfig) -> Self {
        Self {
            screen,
            should_close: false,
            controls,
        }
    }

    /// Apply one frame of input and elapsed time
    pub fn update(self, input: &InputSnapshot, delta_seconds: f32) -> Self {
        if input.close && !self.should_close {
            log::info!("Close requested");
        }
        Self {
            should_close: self.should_close || input.close,
            screen: self.screen.update(input, delta_seconds, &self.controls),
            controls: self.controls,
        }
    }
}
