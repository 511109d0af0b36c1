//! Draw commands and the interpreter that replays them on a [`Renderer`].

use glam::IVec2;

use crate::{
    atlas::Icon,
    batch::RenderBackend,
    geometry::{Color, Rect},
    render::Renderer,
};

/// One drawing instruction emitted by the widget layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Rect { rect: Rect, color: Color },
    Text { text: String, pos: IVec2, color: Color },
    Icon { icon: Icon, rect: Rect, color: Color },
    Clip { rect: Rect },
}

/// Replays one frame's commands in order.
pub fn render_commands<'a, B, I>(renderer: &mut Renderer<B>, commands: I)
where
    B: RenderBackend,
    I: IntoIterator<Item = &'a Command>,
{
    for command in commands {
        match command {
            Command::Rect { rect, color } => renderer.draw_rect(*rect, *color),
            Command::Text { text, pos, color } => renderer.draw_text(text, *pos, *color),
            Command::Icon { icon, rect, color } => renderer.draw_icon(*icon, *rect, *color),
            Command::Clip { rect } => renderer.set_clip_rect(*rect),
        }
    }
}
