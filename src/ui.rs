//! A small immediate-mode widget layer.
//!
//! Every frame the caller brackets its widget calls with [`UiContext::begin`]
//! and [`UiContext::end`]; the widgets append [`Command`]s which are then read
//! back through [`UiContext::commands`] and replayed by the renderer. Layout is
//! resolved to final window-pixel rectangles before a command is recorded.
//!
//! Interaction state (the focused widget and scroll offsets) survives
//! across frames and is keyed by a hash of the container and widget names.

use fxhash::FxHashMap;
use glam::IVec2;

use crate::{
    atlas::{Atlas, Icon, glyph_bytes},
    command::Command,
    geometry::{Color, Rect},
};

pub type WidgetId = u64;

/// Measures text for layout.
pub trait TextMetrics {
    fn text_width(&self, text: &str) -> i32;
    fn text_height(&self) -> i32;
}

/// Metrics for fonts where every glyph has the same advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedMetrics {
    pub advance: i32,
    pub line_height: i32,
}

impl FixedMetrics {
    /// Reads the advance and line height of the atlas font.
    pub fn for_atlas(atlas: &Atlas) -> Self {
        Self {
            advance: atlas.glyph(b'M').w,
            line_height: atlas.text_height(),
        }
    }
}

impl TextMetrics for FixedMetrics {
    fn text_width(&self, text: &str) -> i32 {
        glyph_bytes(text).count() as i32 * self.advance
    }

    fn text_height(&self) -> i32 {
        self.line_height
    }
}

/// Mouse state for one frame, in window pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiInput {
    pub mouse_pos: IVec2,
    pub mouse_down: bool,
    /// The button went down during this frame.
    pub mouse_pressed: bool,
    /// The button went up during this frame.
    pub mouse_released: bool,
    /// Scroll amount in pixels, positive towards the end of the content.
    pub scroll: IVec2,
}

/// Horizontal text placement inside a control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub padding: i32,
    pub spacing: i32,
    pub thumb_size: i32,
    pub text: Color,
    pub border: Color,
    pub button: Color,
    pub button_hover: Color,
    pub button_focus: Color,
    pub base: Color,
    pub base_hover: Color,
    pub base_focus: Color,
    pub panel: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            padding: 5,
            spacing: 4,
            thumb_size: 8,
            text: Color::rgb(230, 230, 230),
            border: Color::rgb(25, 25, 25),
            button: Color::rgb(75, 75, 75),
            button_hover: Color::rgb(95, 95, 95),
            button_focus: Color::rgb(115, 115, 115),
            base: Color::rgb(30, 30, 30),
            base_hover: Color::rgb(35, 35, 35),
            base_focus: Color::rgb(40, 40, 40),
            panel: Color::rgb(20, 20, 20),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Row {
    y: i32,
    x: i32,
    height: i32,
    widths: Vec<i32>,
    index: usize,
}

#[derive(Clone, Debug)]
struct Container {
    id: WidgetId,
    rect: Rect,
    body: Rect,
    next_row_y: i32,
    row: Row,
    next: Option<Rect>,
}

/// Immediate-mode widget context producing one command list per frame.
pub struct UiContext {
    metrics: Box<dyn TextMetrics>,
    style: Style,
    input: UiInput,
    viewport: Rect,
    commands: Vec<Command>,
    clip_stack: Vec<Rect>,
    containers: Vec<Container>,
    focus: Option<WidgetId>,
    scroll: FxHashMap<WidgetId, i32>,
    in_frame: bool,
}

impl UiContext {
    pub fn new(metrics: impl TextMetrics + 'static) -> Self {
        Self {
            metrics: Box::new(metrics),
            style: Style::default(),
            input: UiInput::default(),
            viewport: Rect::default(),
            commands: Vec::new(),
            clip_stack: Vec::new(),
            containers: Vec::new(),
            focus: None,
            scroll: FxHashMap::default(),
            in_frame: false,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn text_width(&self, text: &str) -> i32 {
        self.metrics.text_width(text)
    }

    pub fn text_height(&self) -> i32 {
        self.metrics.text_height()
    }

    pub fn input(&self) -> &UiInput {
        &self.input
    }

    /// Starts a frame for a window of `viewport` size. The first command of
    /// every frame resets the clip to the whole window.
    pub fn begin(&mut self, input: UiInput, viewport: Rect) {
        if self.in_frame {
            log::warn!("UiContext::begin called twice without end");
        }
        self.input = input;
        self.viewport = viewport;
        self.commands.clear();
        self.clip_stack.clear();
        self.containers.clear();
        self.in_frame = true;
        self.commands.push(Command::Clip { rect: viewport });
    }

    /// Finishes the frame. Unbalanced containers and clips are closed.
    pub fn end(&mut self) {
        if !self.containers.is_empty() || !self.clip_stack.is_empty() {
            log::warn!(
                "Frame ended with {} open containers and {} clip rects",
                self.containers.len(),
                self.clip_stack.len()
            );
            self.containers.clear();
            self.clip_stack.clear();
        }
        if self.input.mouse_released || !self.input.mouse_down {
            self.focus = None;
        }
        self.in_frame = false;
    }

    /// The commands recorded since the last [`UiContext::begin`].
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focus
    }

    // Drawing primitives

    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(Command::Rect { rect, color });
    }

    /// Draws a one pixel outline just inside `rect`.
    pub fn draw_box(&mut self, rect: Rect, color: Color) {
        self.draw_rect(Rect::new(rect.x + 1, rect.y, rect.w - 2, 1), color);
        self.draw_rect(Rect::new(rect.x + 1, rect.y + rect.h - 1, rect.w - 2, 1), color);
        self.draw_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.draw_rect(Rect::new(rect.x + rect.w - 1, rect.y, 1, rect.h), color);
    }

    pub fn draw_text(&mut self, text: &str, pos: IVec2, color: Color) {
        if text.is_empty() {
            return;
        }
        self.commands.push(Command::Text {
            text: text.to_string(),
            pos,
            color,
        });
    }

    pub fn draw_icon(&mut self, icon: Icon, rect: Rect, color: Color) {
        self.commands.push(Command::Icon { icon, rect, color });
    }

    /// Draws `text` vertically centered in `rect`, clipped to it.
    pub fn draw_control_text(&mut self, text: &str, rect: Rect, color: Color, align: Align) {
        let width = self.text_width(text);
        let y = rect.y + (rect.h - self.text_height()) / 2;
        let x = match align {
            Align::Left => rect.x + self.style.padding,
            Align::Center => rect.x + (rect.w - width) / 2,
        };
        self.push_clip(rect);
        self.draw_text(text, IVec2::new(x, y), color);
        self.pop_clip();
    }

    /// Narrows the clip rectangle to its intersection with `rect`.
    pub fn push_clip(&mut self, rect: Rect) {
        let clipped = rect.intersect(&self.current_clip());
        self.clip_stack.push(clipped);
        self.commands.push(Command::Clip { rect: clipped });
    }

    /// Restores the clip rectangle that was active before the last push.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_none() {
            log::warn!("pop_clip without matching push_clip");
        }
        let rect = self.current_clip();
        self.commands.push(Command::Clip { rect });
    }

    pub fn current_clip(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or(self.viewport)
    }

    // Containers and layout

    /// Opens a container covering `rect`. Everything drawn until the matching
    /// [`UiContext::end_window`] is clipped to it.
    pub fn begin_window(&mut self, name: &str, rect: Rect) {
        let id = fxhash::hash64(name);
        let body = rect.shrink(self.style.padding);
        self.containers.push(Container {
            id,
            rect,
            body,
            next_row_y: body.y,
            row: Row::default(),
            next: None,
        });
        self.push_clip(rect);
    }

    pub fn end_window(&mut self) {
        if self.containers.pop().is_none() {
            log::warn!("end_window without matching begin_window");
            return;
        }
        self.pop_clip();
    }

    /// The rectangle of the innermost open container.
    pub fn window_rect(&self) -> Rect {
        self.containers.last().map_or(self.viewport, |c| c.rect)
    }

    /// Starts a new row of cells. A width or height of zero or less extends
    /// the cell to the container edge minus `-value - 1` pixels.
    pub fn layout_row(&mut self, widths: &[i32], height: i32) {
        let spacing = self.style.spacing;
        let Some(container) = self.containers.last_mut() else {
            log::warn!("layout_row outside of a container");
            return;
        };
        container.row = Row {
            y: container.next_row_y,
            x: container.body.x,
            height: resolve_extent(height, container.body.y + container.body.h - container.next_row_y),
            widths: widths.to_vec(),
            index: 0,
        };
        container.next_row_y = container.row.y + container.row.height + spacing;
    }

    /// Overrides the rectangle returned by the next [`UiContext::layout_next`].
    /// `rect` is relative to the container's top-left corner.
    pub fn layout_set_next(&mut self, rect: Rect) {
        if let Some(container) = self.containers.last_mut() {
            container.next = Some(rect.offset(IVec2::new(container.rect.x, container.rect.y)));
        }
    }

    /// Returns the next cell of the current row, wrapping into a new row with
    /// the same shape when the row is full.
    pub fn layout_next(&mut self) -> Rect {
        let default_height = self.text_height() + self.style.padding * 2;
        let spacing = self.style.spacing;
        if self.containers.is_empty() {
            return self.viewport;
        }

        if let Some(next) = self.containers.last_mut().and_then(|c| c.next.take()) {
            return next;
        }

        let row_full = self
            .containers
            .last()
            .is_some_and(|c| c.row.widths.is_empty() || c.row.index >= c.row.widths.len());
        if row_full {
            let (widths, height) = self
                .containers
                .last()
                .map(|c| {
                    if c.row.widths.is_empty() {
                        (vec![-1], default_height)
                    } else {
                        (c.row.widths.clone(), c.row.height)
                    }
                })
                .unwrap_or((vec![-1], default_height));
            self.layout_row(&widths, height);
        }

        let Some(container) = self.containers.last_mut() else {
            return self.viewport;
        };
        let row = &mut container.row;
        let width = resolve_extent(
            row.widths[row.index],
            container.body.x + container.body.w - row.x,
        );
        let rect = Rect::new(row.x, row.y, width, row.height);
        row.x += width + spacing;
        row.index += 1;
        rect
    }

    // Widgets

    fn widget_id(&self, name: &str) -> WidgetId {
        let seed = self.containers.last().map_or(0, |c| c.id);
        fxhash::hash64(&(seed, name))
    }

    fn mouse_over(&self, rect: Rect) -> bool {
        !rect.is_degenerate()
            && rect.contains(self.input.mouse_pos)
            && self.current_clip().contains(self.input.mouse_pos)
    }

    /// Takes focus for a control pressed this frame and reports whether the
    /// mouse is over it.
    fn update_control(&mut self, id: WidgetId, rect: Rect) -> bool {
        let over = self.mouse_over(rect);
        if over && self.input.mouse_pressed {
            self.focus = Some(id);
        }
        over
    }

    fn control_color(&self, id: WidgetId, over: bool, normal: Color, hover: Color, focus: Color) -> Color {
        if self.focus == Some(id) && self.input.mouse_down {
            focus
        } else if over {
            hover
        } else {
            normal
        }
    }

    /// A single line of text in the next layout cell.
    pub fn label(&mut self, text: &str) {
        let rect = self.layout_next();
        let color = self.style.text;
        self.draw_control_text(text, rect, color, Align::Left);
    }

    /// A framed button with centered text. Returns `true` on the frame the
    /// mouse is released over it after being pressed on it.
    pub fn button(&mut self, label: &str) -> bool {
        self.button_ex(label, true)
    }

    /// Like [`UiContext::button`], optionally without the background frame.
    pub fn button_ex(&mut self, label: &str, frame: bool) -> bool {
        let id = self.widget_id(label);
        let rect = self.layout_next();
        let over = self.update_control(id, rect);
        let clicked = over && self.focus == Some(id) && self.input.mouse_released;

        if frame {
            let style = self.style;
            let color = self.control_color(id, over, style.button, style.button_hover, style.button_focus);
            self.draw_rect(rect, color);
            self.draw_box(rect, style.border);
        }
        let text_color = self.style.text;
        self.draw_control_text(label, rect, text_color, Align::Center);
        clicked
    }

    /// A horizontal slider editing `value` within `low..=high`. Returns
    /// `true` if the value changed this frame.
    pub fn slider(&mut self, name: &str, value: &mut f32, low: f32, high: f32) -> bool {
        let id = self.widget_id(name);
        let rect = self.layout_next();
        let over = self.update_control(id, rect);
        let before = *value;

        if self.focus == Some(id) && self.input.mouse_down && rect.w > 0 {
            let t = (self.input.mouse_pos.x - rect.x) as f32 / rect.w as f32;
            *value = (low + t * (high - low)).round();
        }
        *value = value.clamp(low.min(high), high.max(low));
        let changed = *value != before;

        let style = self.style;
        let base = self.control_color(id, over, style.base, style.base_hover, style.base_focus);
        self.draw_rect(rect, base);
        self.draw_box(rect, style.border);

        let range = high - low;
        let t = if range == 0.0 { 0.0 } else { (*value - low) / range };
        let thumb_x = rect.x + (t * (rect.w - style.thumb_size) as f32) as i32;
        let thumb = Rect::new(thumb_x, rect.y, style.thumb_size, rect.h);
        self.draw_rect(thumb, style.button);

        let text = format!("{:.0}", *value);
        self.draw_control_text(&text, rect, style.text, Align::Center);
        changed
    }

    /// A clipped panel showing `text` line by line, scrolled by the mouse
    /// wheel while hovered. With `scroll_to_bottom` the last line is brought
    /// into view.
    pub fn text_panel(&mut self, name: &str, text: &str, scroll_to_bottom: bool) {
        let id = self.widget_id(name);
        let rect = self.layout_next();
        let over = self.update_control(id, rect);

        let style = self.style;
        let line_height = self.text_height();
        let line_count = text.split('\n').count() as i32;
        let content_height = line_count * line_height + style.padding * 2;
        let max_scroll = (content_height - rect.h).max(0);

        let scroll = self.scroll.entry(id).or_insert(0);
        if over {
            *scroll += self.input.scroll.y;
        }
        if scroll_to_bottom {
            *scroll = max_scroll;
        }
        *scroll = (*scroll).clamp(0, max_scroll);
        let scroll = *scroll;

        self.draw_rect(rect, style.panel);
        self.push_clip(rect);
        for (i, line) in text.split('\n').enumerate() {
            let y = rect.y + style.padding + i as i32 * line_height - scroll;
            if y + line_height < rect.y || y > rect.y + rect.h {
                continue;
            }
            self.draw_text(line, IVec2::new(rect.x + style.padding, y), style.text);
        }
        self.pop_clip();
    }

    /// Current scroll offset of a [`UiContext::text_panel`] opened inside the
    /// container `window`.
    pub fn panel_scroll(&self, window: &str, name: &str) -> i32 {
        let id = fxhash::hash64(&(fxhash::hash64(window), name));
        self.scroll.get(&id).copied().unwrap_or(0)
    }
}

fn resolve_extent(value: i32, remaining: i32) -> i32 {
    if value > 0 {
        value
    } else {
        (remaining + value + 1).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: FixedMetrics = FixedMetrics {
        advance: 8,
        line_height: 12,
    };

    fn viewport() -> Rect {
        Rect::new(0, 0, 800, 600)
    }

    fn click_frames(ctx: &mut UiContext, pos: IVec2, mut widgets: impl FnMut(&mut UiContext) -> bool) -> Vec<bool> {
        let frames = [
            UiInput { mouse_pos: pos, ..Default::default() },
            UiInput { mouse_pos: pos, mouse_down: true, mouse_pressed: true, ..Default::default() },
            UiInput { mouse_pos: pos, mouse_down: true, ..Default::default() },
            UiInput { mouse_pos: pos, mouse_released: true, ..Default::default() },
            UiInput { mouse_pos: pos, ..Default::default() },
        ];
        frames
            .into_iter()
            .map(|input| {
                ctx.begin(input, viewport());
                let result = widgets(ctx);
                ctx.end();
                result
            })
            .collect()
    }

    #[test]
    fn test_frame_starts_with_viewport_clip() {
        let mut ctx = UiContext::new(METRICS);
        ctx.begin(UiInput::default(), viewport());
        ctx.end();
        let commands: Vec<_> = ctx.commands().collect();
        assert_eq!(commands, vec![&Command::Clip { rect: viewport() }]);
    }

    #[test]
    fn test_begin_discards_previous_frame() {
        let mut ctx = UiContext::new(METRICS);
        ctx.begin(UiInput::default(), viewport());
        ctx.draw_rect(Rect::new(0, 0, 1, 1), Color::WHITE);
        ctx.end();
        ctx.begin(UiInput::default(), viewport());
        ctx.end();
        assert_eq!(ctx.command_count(), 1);
    }

    #[test]
    fn test_clip_stack_intersects_and_restores() {
        let mut ctx = UiContext::new(METRICS);
        ctx.begin(UiInput::default(), viewport());
        ctx.push_clip(Rect::new(100, 100, 200, 200));
        ctx.push_clip(Rect::new(250, 50, 200, 100));
        assert_eq!(ctx.current_clip(), Rect::new(250, 100, 50, 50));
        ctx.pop_clip();
        assert_eq!(ctx.current_clip(), Rect::new(100, 100, 200, 200));
        ctx.pop_clip();
        ctx.end();

        let clips: Vec<Rect> = ctx
            .commands()
            .filter_map(|c| match c {
                Command::Clip { rect } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(
            clips,
            vec![
                viewport(),
                Rect::new(100, 100, 200, 200),
                Rect::new(250, 100, 50, 50),
                Rect::new(100, 100, 200, 200),
                viewport(),
            ]
        );
    }

    #[test]
    fn test_layout_row_cells() {
        let mut ctx = UiContext::new(METRICS);
        ctx.begin(UiInput::default(), viewport());
        ctx.begin_window("w", Rect::new(0, 0, 210, 300));
        ctx.layout_row(&[60, -1], 20);
        let a = ctx.layout_next();
        let b = ctx.layout_next();
        let c = ctx.layout_next();
        ctx.end_window();
        ctx.end();

        assert_eq!(a, Rect::new(5, 5, 60, 20));
        assert_eq!(b, Rect::new(69, 5, 136, 20));
        assert_eq!(c, Rect::new(5, 29, 60, 20));
    }

    #[test]
    fn test_layout_fill_height() {
        let mut ctx = UiContext::new(METRICS);
        ctx.begin(UiInput::default(), viewport());
        ctx.begin_window("w", Rect::new(10, 10, 130, 25));
        ctx.layout_row(&[-1], -1);
        let cell = ctx.layout_next();
        ctx.end_window();
        ctx.end();
        assert_eq!(cell, Rect::new(15, 15, 120, 15));
    }

    #[test]
    fn test_layout_set_next_is_window_relative() {
        let mut ctx = UiContext::new(METRICS);
        ctx.begin(UiInput::default(), viewport());
        ctx.begin_window("w", Rect::new(-50, 0, 200, 600));
        ctx.layout_set_next(Rect::new(160, 5, 30, 30));
        assert_eq!(ctx.layout_next(), Rect::new(110, 5, 30, 30));
        ctx.end_window();
        ctx.end();
    }

    #[test]
    fn test_button_clicks_on_release() {
        let mut ctx = UiContext::new(METRICS);
        let results = click_frames(&mut ctx, IVec2::new(50, 15), |ctx| {
            ctx.begin_window("w", Rect::new(0, 0, 200, 200));
            ctx.layout_row(&[-1], 20);
            let clicked = ctx.button("Press");
            ctx.end_window();
            clicked
        });
        assert_eq!(results, vec![false, false, false, true, false]);
        assert_eq!(ctx.focused(), None);
    }

    #[test]
    fn test_button_outside_clip_is_not_clickable() {
        let mut ctx = UiContext::new(METRICS);
        let results = click_frames(&mut ctx, IVec2::new(150, 15), |ctx| {
            ctx.begin_window("w", Rect::new(0, 0, 100, 200));
            ctx.layout_set_next(Rect::new(120, 5, 60, 20));
            let clicked = ctx.button("Hidden");
            ctx.end_window();
            clicked
        });
        assert!(results.iter().all(|clicked| !clicked));
    }

    #[test]
    fn test_zero_width_button_is_not_clickable() {
        let mut ctx = UiContext::new(METRICS);
        let results = click_frames(&mut ctx, IVec2::new(10, 15), |ctx| {
            ctx.begin_window("w", Rect::new(0, 0, 200, 200));
            ctx.layout_set_next(Rect::new(10, 5, 0, 20));
            let clicked = ctx.button("Empty");
            ctx.end_window();
            clicked
        });
        assert!(results.iter().all(|clicked| !clicked));
        assert_eq!(ctx.focused(), None);
    }

    #[test]
    fn test_button_requires_press_on_itself() {
        let mut ctx = UiContext::new(METRICS);
        let pos = IVec2::new(50, 15);
        let frames = [
            UiInput { mouse_pos: IVec2::new(500, 500), mouse_down: true, mouse_pressed: true, ..Default::default() },
            UiInput { mouse_pos: pos, mouse_down: true, ..Default::default() },
            UiInput { mouse_pos: pos, mouse_released: true, ..Default::default() },
        ];
        for input in frames {
            ctx.begin(input, viewport());
            ctx.begin_window("w", Rect::new(0, 0, 200, 200));
            ctx.layout_row(&[-1], 20);
            assert!(!ctx.button("Press"));
            ctx.end_window();
            ctx.end();
        }
    }

    #[test]
    fn test_slider_drag_sets_value() {
        let mut ctx = UiContext::new(METRICS);
        let mut value = 19.0;
        let rect = Rect::new(5, 5, 255, 20);
        let frames = [
            UiInput { mouse_pos: IVec2::new(10, 10), mouse_down: true, mouse_pressed: true, ..Default::default() },
            UiInput { mouse_pos: IVec2::new(5 + 128, 10), mouse_down: true, ..Default::default() },
            UiInput { mouse_pos: IVec2::new(900, 10), mouse_down: true, ..Default::default() },
            UiInput { mouse_pos: IVec2::new(900, 10), mouse_released: true, ..Default::default() },
        ];
        let mut changes = Vec::new();
        let mut values = Vec::new();
        for input in frames {
            ctx.begin(input, viewport());
            ctx.begin_window("w", Rect::new(0, 0, 265, 200));
            ctx.layout_row(&[rect.w], rect.h);
            changes.push(ctx.slider("red", &mut value, 0.0, 255.0));
            values.push(value);
            ctx.end_window();
            ctx.end();
        }
        assert_eq!(changes, vec![true, true, true, false]);
        assert_eq!(values, vec![5.0, 128.0, 255.0, 255.0]);
    }

    #[test]
    fn test_slider_clamps_external_value() {
        let mut ctx = UiContext::new(METRICS);
        let mut value = 300.0;
        ctx.begin(UiInput::default(), viewport());
        ctx.begin_window("w", Rect::new(0, 0, 200, 200));
        assert!(ctx.slider("s", &mut value, 0.0, 255.0));
        ctx.end_window();
        ctx.end();
        assert_eq!(value, 255.0);
    }

    #[test]
    fn test_text_panel_scrolls_to_bottom() {
        let mut ctx = UiContext::new(METRICS);
        let text = (0..40).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");

        ctx.begin(UiInput::default(), viewport());
        ctx.begin_window("menu", Rect::new(0, 0, 200, 600));
        ctx.layout_row(&[-1], 100);
        ctx.text_panel("log", &text, true);
        ctx.end_window();
        ctx.end();

        let content = 40 * 12 + 10;
        assert_eq!(ctx.panel_scroll("menu", "log"), content - 100);

        let texts: Vec<&str> = ctx
            .commands()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"line 39"));
        assert!(!texts.contains(&"line 0"));
    }

    #[test]
    fn test_text_panel_wheel_scroll_is_clamped() {
        let mut ctx = UiContext::new(METRICS);
        let input = UiInput {
            mouse_pos: IVec2::new(20, 20),
            scroll: IVec2::new(0, -90),
            ..Default::default()
        };
        ctx.begin(input, viewport());
        ctx.begin_window("menu", Rect::new(0, 0, 200, 600));
        ctx.layout_row(&[-1], 100);
        ctx.text_panel("log", "a\nb", false);
        ctx.end_window();
        ctx.end();
        assert_eq!(ctx.panel_scroll("menu", "log"), 0);
    }

    #[test]
    fn test_fixed_metrics_match_atlas() {
        let atlas = Atlas::builtin();
        let metrics = FixedMetrics::for_atlas(&atlas);
        for text in ["", "Hi", "Open Menu", "\u{e9}t\u{e9}"] {
            assert_eq!(metrics.text_width(text), atlas.text_width(text));
        }
        assert_eq!(metrics.text_height(), atlas.text_height());
    }

    #[test]
    fn test_end_closes_unbalanced_containers() {
        let mut ctx = UiContext::new(METRICS);
        ctx.begin(UiInput::default(), viewport());
        ctx.begin_window("w", Rect::new(0, 0, 10, 10));
        ctx.end();
        assert_eq!(ctx.window_rect(), viewport());
    }
}
