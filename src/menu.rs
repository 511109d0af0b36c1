//! The slide-out menu scene.
//!
//! One call to [`MenuScene::frame`] runs a whole UI tick: it advances the
//! animation state machine, then emits either the trigger button or the panel
//! into the widget context.

use glam::IVec2;

use crate::{
    geometry::{Color, Rect},
    logbuf::LogBuffer,
    state::UiState,
    ui::{Align, UiContext, UiInput},
};

pub const TITLE_TEXT: &str = "Slide Menu";
pub const OPEN_BUTTON_TEXT: &str = "Open Menu";
pub const CLOSE_BUTTON_TEXT: &str = "X";

pub const BUTTON_X_RATIO: i32 = 40;
pub const BUTTON_Y_RATIO: i32 = 30;

pub const MENU_PADDING_X: i32 = 10;
pub const CLOSE_BUTTON_PADDING: i32 = 10;
pub const CLOSE_BUTTON_MARGIN: i32 = 5;
pub const HEADER_TEXT_PADDING: i32 = 10;
pub const HEADER_SEPARATOR_Y_OFFSET: i32 = 5;
pub const SEPARATOR_HEIGHT: i32 = 1;

pub const OPTION_HEIGHT_RATIO: i32 = 20;
pub const MIN_OPTION_HEIGHT: i32 = 25;
pub const LOG_HEIGHT_RATIO: i32 = 4;
pub const MIN_LOG_HEIGHT: i32 = 100;
pub const SLIDER_LABEL_WIDTH: i32 = 60;

const PANEL_COLOR: Color = Color::rgb(30, 30, 30);
const HEADER_COLOR: Color = Color::rgb(40, 40, 40);
const TITLE_COLOR: Color = Color::rgb(230, 230, 230);

const MENU_WINDOW: &str = "Open Menu";
const BUTTON_WINDOW: &str = "MenuButton";
pub const LOG_PANEL: &str = "Log Panel";

const OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];
const CHANNELS: [(&str, &str); 3] = [("Red:", "red"), ("Green:", "green"), ("Blue:", "blue")];

/// Height of one option row for a window `window_height` pixels tall.
pub fn option_height(window_height: i32) -> i32 {
    (window_height / OPTION_HEIGHT_RATIO).max(MIN_OPTION_HEIGHT)
}

/// Height of the log panel for a window `window_height` pixels tall.
pub fn log_height(window_height: i32) -> i32 {
    (window_height / LOG_HEIGHT_RATIO).max(MIN_LOG_HEIGHT)
}

/// Drives the menu. The only state it keeps between frames is the toggle
/// requested by a button press, which the next tick consumes.
#[derive(Debug, Default)]
pub struct MenuScene {
    pending_toggle: bool,
}

impl MenuScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a button press is waiting for the next tick.
    pub fn pending_toggle(&self) -> bool {
        self.pending_toggle
    }

    /// Runs one tick and records its commands into `ctx`.
    pub fn frame(&mut self, ctx: &mut UiContext, state: &mut UiState, log: &mut LogBuffer, input: UiInput) {
        let viewport = Rect::new(0, 0, state.window_width(), state.window_height());
        ctx.begin(input, viewport);

        state.recompute_metrics();
        state.tick(std::mem::take(&mut self.pending_toggle));

        if state.panel_visible() {
            self.draw_menu(ctx, state, log);
        } else {
            self.draw_menu_button(ctx, state);
        }

        ctx.end();
    }

    fn draw_menu_button(&mut self, ctx: &mut UiContext, state: &UiState) {
        let metrics = state.metrics();
        let rect = Rect::new(
            state.window_width() / BUTTON_X_RATIO,
            state.window_height() / BUTTON_Y_RATIO,
            metrics.button_width,
            metrics.button_height,
        );

        ctx.begin_window(BUTTON_WINDOW, rect);
        ctx.draw_rect(rect, HEADER_COLOR);
        ctx.layout_row(&[-1], -1);
        if ctx.button_ex(OPEN_BUTTON_TEXT, false) && !state.menu_open() {
            self.pending_toggle = true;
        }
        ctx.end_window();
    }

    fn draw_menu(&mut self, ctx: &mut UiContext, state: &mut UiState, log: &mut LogBuffer) {
        let metrics = state.metrics();
        let width = metrics.menu_panel_width;
        let height = state.window_height();
        let header_height = metrics.header_height;
        let window = Rect::new(state.panel_x(), 0, width, height);

        ctx.begin_window(MENU_WINDOW, window);
        ctx.draw_rect(window, PANEL_COLOR);
        ctx.draw_rect(Rect::new(window.x, 0, width, header_height), HEADER_COLOR);

        self.draw_header(ctx, state, window, header_height);
        draw_content(ctx, state, log, window, header_height);

        ctx.end_window();
    }

    fn draw_header(&mut self, ctx: &mut UiContext, state: &UiState, window: Rect, header_height: i32) {
        let close_size = header_height - CLOSE_BUTTON_PADDING;
        let title_width = window.w - close_size - HEADER_TEXT_PADDING;
        ctx.layout_row(&[title_width, close_size], header_height);

        let text_x = (title_width - ctx.text_width(TITLE_TEXT)) / 2;
        let text_y = (header_height - ctx.text_height()) / 2;
        ctx.draw_text(TITLE_TEXT, IVec2::new(window.x + text_x, text_y), TITLE_COLOR);
        ctx.layout_next();

        let button_y = (header_height - close_size) / 2;
        ctx.layout_set_next(Rect::new(
            window.w - close_size - CLOSE_BUTTON_MARGIN,
            button_y,
            close_size,
            close_size,
        ));
        if ctx.button(CLOSE_BUTTON_TEXT) && state.menu_open() {
            self.pending_toggle = true;
        }
    }
}

fn draw_content(ctx: &mut UiContext, state: &mut UiState, log: &mut LogBuffer, window: Rect, header_height: i32) {
    let option_height = option_height(state.window_height());
    let border = ctx.style().border;

    ctx.layout_row(&[-1], SEPARATOR_HEIGHT);
    ctx.draw_rect(
        Rect::new(
            window.x + MENU_PADDING_X,
            header_height + HEADER_SEPARATOR_Y_OFFSET,
            window.w - MENU_PADDING_X * 2,
            SEPARATOR_HEIGHT,
        ),
        border,
    );

    ctx.layout_row(&[-1], option_height);
    ctx.label("Menu Options");
    for option in OPTIONS {
        if ctx.button(option) {
            let entry = format!("Selected {option}");
            log::info!("{entry}");
            if let Err(e) = log.write(&entry) {
                log::error!("Failed to append to log: {e}");
            }
        }
    }

    ctx.layout_row(&[-1], option_height);
    ctx.label("Background Color");

    ctx.layout_row(&[SLIDER_LABEL_WIDTH, -1], option_height);
    for (channel, (label, name)) in CHANNELS.into_iter().enumerate() {
        ctx.label(label);
        ctx.slider(name, &mut state.bg_color[channel], 0.0, 255.0);
    }

    ctx.layout_row(&[-1], option_height * 3 / 2);
    let preview = ctx.layout_next();
    let color = state.background();
    let text = ctx.style().text;
    ctx.draw_rect(preview, color);
    ctx.draw_control_text(&color.to_hex(), preview, text, Align::Center);

    ctx.layout_row(&[-1], option_height);
    ctx.label("Log Output");

    ctx.layout_row(&[-1], log_height(state.window_height()));
    ctx.text_panel(LOG_PANEL, log.as_str(), log.is_updated());
    log.reset_updated();
}
