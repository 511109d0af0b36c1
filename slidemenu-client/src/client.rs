//! Per-frame orchestration: UI tick, command replay and present.

use slidemenu::{
    atlas::Atlas,
    command::render_commands,
    logbuf::LogBuffer,
    menu::MenuScene,
    render::Renderer,
    state::UiState,
    ui::{FixedMetrics, UiContext, UiInput},
};

use crate::render::GlBackend;

/// Everything that lives for the whole session besides the window itself.
pub struct Client {
    state: UiState,
    ctx: UiContext,
    scene: MenuScene,
    log: LogBuffer,
    renderer: Renderer<GlBackend>,
}

impl Client {
    pub fn new(backend: GlBackend, atlas: Atlas, mut state: UiState, capacity: usize, size: (i32, i32)) -> Self {
        let (width, height) = size;
        state.update_dimensions(width, height);
        let ctx = UiContext::new(FixedMetrics::for_atlas(&atlas));
        let renderer = Renderer::new(backend, atlas, capacity, width, height);

        Self {
            state,
            ctx,
            scene: MenuScene::new(),
            log: LogBuffer::default(),
            renderer,
        }
    }

    /// Applies a new drawable size to the layout and the renderer. Returns
    /// whether the size actually changed.
    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        if !self.state.update_dimensions(width, height) {
            return false;
        }
        self.renderer.resize(width, height);
        true
    }

    /// Runs one tick and shows the result.
    pub fn frame(&mut self, input: UiInput) {
        self.scene
            .frame(&mut self.ctx, &mut self.state, &mut self.log, input);

        self.renderer.clear(self.state.background());
        render_commands(&mut self.renderer, self.ctx.commands());
        self.renderer.present();
    }

    pub fn renderer(&self) -> &Renderer<GlBackend> {
        &self.renderer
    }
}
