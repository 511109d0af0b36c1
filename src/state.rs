//! UI state: window size, the menu animation and the responsive metrics
//! derived from the window size.
//!
//! The menu has four phases ([`MenuPhase`]) but only two stored values, the
//! open intent and the animation parameter. The phase is always derived from
//! them.

use serde::{Deserialize, Serialize};

use crate::geometry::Color;

pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;

/// Amount the animation parameter moves per tick.
pub const MENU_ANIMATION_STEP: f32 = 0.15;

pub const BUTTON_WIDTH_RATIO: i32 = 6;
pub const MIN_BUTTON_WIDTH: i32 = 130;
pub const MAX_BUTTON_WIDTH: i32 = 200;

pub const BUTTON_HEIGHT_RATIO: i32 = 24;
pub const MIN_BUTTON_HEIGHT: i32 = 25;
pub const MAX_BUTTON_HEIGHT: i32 = 40;

pub const MENU_WIDTH_RATIO: i32 = 4;
pub const MIN_MENU_WIDTH: i32 = 200;

pub const HEADER_HEIGHT_RATIO: i32 = 15;
pub const MIN_HEADER_HEIGHT: i32 = 40;

pub const DEFAULT_BACKGROUND: [u8; 3] = [19, 19, 19];

/// How the panel offset follows the animation parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideMode {
    /// The panel slides in from the left edge.
    #[default]
    Slide,
    /// The panel appears in place; the animation only delays it.
    Frozen,
}

/// Phase of the slide-out menu, derived from the open intent and the
/// animation parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Widget sizes that follow the window size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    pub button_width: i32,
    pub button_height: i32,
    pub menu_panel_width: i32,
    pub header_height: i32,
}

impl Metrics {
    /// Computes the metrics for a window of `width` x `height` pixels.
    pub fn for_window(width: i32, height: i32) -> Self {
        Self {
            button_width: (width / BUTTON_WIDTH_RATIO).clamp(MIN_BUTTON_WIDTH, MAX_BUTTON_WIDTH),
            button_height: (height / BUTTON_HEIGHT_RATIO).clamp(MIN_BUTTON_HEIGHT, MAX_BUTTON_HEIGHT),
            menu_panel_width: (width / MENU_WIDTH_RATIO).max(MIN_MENU_WIDTH),
            header_height: (height / HEADER_HEIGHT_RATIO).max(MIN_HEADER_HEIGHT),
        }
    }
}

/// The state shared by the layout and animation steps.
#[derive(Clone, Debug)]
pub struct UiState {
    window_width: i32,
    window_height: i32,
    menu_open: bool,
    /// Steps taken towards open; the animation value is derived from it so
    /// both ends are reached exactly.
    animation_ticks: u32,
    animation_step: f32,
    slide_mode: SlideMode,
    metrics: Metrics,
    /// Background color edited by the menu sliders, in 0..=255 per channel.
    pub bg_color: [f32; 3],
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)
    }
}

impl UiState {
    pub fn new(window_width: i32, window_height: i32) -> Self {
        Self {
            window_width,
            window_height,
            menu_open: false,
            animation_ticks: 0,
            animation_step: MENU_ANIMATION_STEP,
            slide_mode: SlideMode::default(),
            metrics: Metrics::for_window(window_width, window_height),
            bg_color: DEFAULT_BACKGROUND.map(f32::from),
        }
    }

    /// Sets the per-tick animation step; values are clamped to `(0, 1]`.
    pub fn with_animation_step(mut self, step: f32) -> Self {
        self.animation_step = if step.is_finite() && step > 0.0 {
            step.min(1.0)
        } else {
            MENU_ANIMATION_STEP
        };
        self
    }

    pub fn with_slide_mode(mut self, mode: SlideMode) -> Self {
        self.slide_mode = mode;
        self
    }

    pub fn with_background(mut self, color: [u8; 3]) -> Self {
        self.bg_color = color.map(f32::from);
        self
    }

    pub fn window_width(&self) -> i32 {
        self.window_width
    }

    pub fn window_height(&self) -> i32 {
        self.window_height
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Open progress in `[0, 1]`.
    pub fn menu_animation(&self) -> f32 {
        (self.animation_ticks as f32 * self.animation_step).min(1.0)
    }

    pub fn animation_step(&self) -> f32 {
        self.animation_step
    }

    pub fn slide_mode(&self) -> SlideMode {
        self.slide_mode
    }

    /// Applies a resize notification and recomputes the metrics. Returns
    /// `false` when the size is unchanged and nothing was done.
    pub fn update_dimensions(&mut self, width: i32, height: i32) -> bool {
        if width == self.window_width && height == self.window_height {
            return false;
        }
        self.window_width = width;
        self.window_height = height;
        self.recompute_metrics();
        true
    }

    /// Recomputes the responsive metrics from the current window size.
    pub fn recompute_metrics(&mut self) {
        self.metrics = Metrics::for_window(self.window_width, self.window_height);
    }

    /// Flips the open intent without advancing the animation.
    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Advances the state machine by one frame: applies the pending toggle,
    /// then moves the animation one step towards the open intent.
    pub fn tick(&mut self, toggle: bool) {
        if toggle {
            self.toggle_menu();
        }

        if self.menu_open && self.menu_animation() < 1.0 {
            self.animation_ticks = self.animation_ticks.saturating_add(1);
        } else if !self.menu_open && self.animation_ticks > 0 {
            self.animation_ticks -= 1;
        }
    }

    pub fn phase(&self) -> MenuPhase {
        match (self.menu_open, self.menu_animation()) {
            (false, a) if a <= 0.0 => MenuPhase::Closed,
            (true, a) if a >= 1.0 => MenuPhase::Open,
            (true, _) => MenuPhase::Opening,
            (false, _) => MenuPhase::Closing,
        }
    }

    /// Whether the panel is drawn this frame. When it is not, the trigger
    /// button is drawn instead.
    pub fn panel_visible(&self) -> bool {
        self.animation_ticks > 0
    }

    /// Horizontal offset of the panel's left edge.
    pub fn panel_x(&self) -> i32 {
        let width = self.metrics.menu_panel_width;
        let x = (-width as f32 + width as f32 * self.menu_animation()) as i32;
        match self.slide_mode {
            SlideMode::Slide => x.clamp(-width, 0),
            SlideMode::Frozen => x.clamp(0, 0),
        }
    }

    /// The background color as an opaque [`Color`].
    pub fn background(&self) -> Color {
        let [r, g, b] = self.bg_color.map(|c| c.clamp(0.0, 255.0) as u8);
        Color::rgb(r, g, b)
    }
}
