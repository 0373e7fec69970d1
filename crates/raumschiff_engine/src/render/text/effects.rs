//! Animated text state for the title and lore screens

/// Per-frame scale change of the title
const PULSE_STEP: f32 = 0.05;
/// Largest title scale before shrinking
const PULSE_MAX: f32 = 3.5;
/// Smallest title scale before growing
const PULSE_MIN: f32 = 0.5;

/// Title scale bouncing between two bounds, one step per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitlePulse {
    scale: f32,
    growing: bool,
}

impl Default for TitlePulse {
    fn default() -> Self {
        Self {
            scale: 1.0,
            growing: true,
        }
    }
}

impl TitlePulse {
    /// Advance one frame
    pub fn step(&mut self) {
        if self.growing {
            self.scale += PULSE_STEP;
            if self.scale >= PULSE_MAX {
                self.growing = false;
            }
        } else {
            self.scale -= PULSE_STEP;
            if self.scale <= PULSE_MIN {
                self.growing = true;
            }
        }
    }

    /// Current scale factor
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether the next step grows the title
    pub fn is_growing(&self) -> bool {
        self.growing
    }
}

/// Text revealed one character per fixed interval
///
/// Time accumulates across frames; every full interval held by the
/// accumulator reveals one character and is consumed, so the count after a
/// total time `t` is `min(len, floor(t / interval))` however the time was
/// split into frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TextReveal {
    text: String,
    total_chars: usize,
    revealed: usize,
    accumulator: f32,
    interval: f32,
}

impl TextReveal {
    /// Start with nothing revealed
    pub fn new(text: impl Into<String>, interval: f32) -> Self {
        let text = text.into();
        Self {
            total_chars: text.chars().count(),
            text,
            revealed: 0,
            accumulator: 0.0,
            interval,
        }
    }

    /// Add elapsed seconds
    pub fn advance(&mut self, delta_seconds: f32) {
        if self.is_complete() {
            return;
        }
        self.accumulator += delta_seconds;
        while self.accumulator >= self.interval && self.revealed < self.total_chars {
            self.accumulator -= self.interval;
            self.revealed += 1;
        }
    }

    /// Number of characters shown
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Whether every character is shown
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total_chars
    }

    /// The revealed prefix, never splitting a character
    pub fn visible_text(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.revealed)
            .map_or(self.text.len(), |(index, _)| index);
        &self.text[..end]
    }
}
