//! Translation of SDL events into per-frame UI input.

use glam::IVec2;
use sdl2::{event::Event, mouse::MouseButton};
use slidemenu::ui::UiInput;

/// Pixels scrolled per wheel notch.
const SCROLL_STEP: i32 = 30;

/// Mouse state accumulated between two frames.
#[derive(Debug, Default)]
pub struct MouseState {
    pub position: IVec2,
    pub down: bool,
    pub pressed: bool,
    pub released: bool,
    pub scroll: IVec2,
}

impl MouseState {
    /// Folds one event into the state. `scale` converts logical window
    /// coordinates into drawable pixels.
    pub fn handle_event(&mut self, event: &Event, scale: f32) {
        let to_pixels = |x: i32, y: i32| (glam::Vec2::new(x as f32, y as f32) * scale).as_ivec2();
        match *event {
            Event::MouseMotion { x, y, .. } => {
                self.position = to_pixels(x, y);
            }
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => {
                self.position = to_pixels(x, y);
                self.down = true;
                self.pressed = true;
            }
            Event::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => {
                self.position = to_pixels(x, y);
                self.down = false;
                self.released = true;
            }
            Event::MouseWheel { x, y, .. } => {
                self.scroll += IVec2::new(x, y) * -SCROLL_STEP;
            }
            _ => {}
        }
    }

    /// The held state without any one-shot events, for frames rendered
    /// outside the regular loop.
    pub fn current(&self) -> UiInput {
        UiInput {
            mouse_pos: self.position,
            mouse_down: self.down,
            ..Default::default()
        }
    }

    /// Produces the input for the coming frame and clears the one-shot flags.
    pub fn take_frame(&mut self) -> UiInput {
        let input = UiInput {
            mouse_pos: self.position,
            mouse_down: self.down,
            mouse_pressed: self.pressed,
            mouse_released: self.released,
            scroll: self.scroll,
        };
        self.pressed = false;
        self.released = false;
        self.scroll = IVec2::ZERO;
        input
    }
}
