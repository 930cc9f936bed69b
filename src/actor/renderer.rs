//! Renderer: the drawing side as seen by the dispatcher.
//!
//! The dispatcher never draws. It tells a [`Renderer`] what changed, after
//! it has released the config lock, and asks it where panels are for mouse
//! hit testing. [`LayoutRenderer`] is a headless implementation that keeps
//! the panel layout and coalesces redraw requests for a drawing front end.

use super::messages::{Menu, Notice, RedrawScope};
use crate::config::SharedConfig;
use crate::layout::{Layout, Panel, Rect};
use std::sync::PoisonError;

/// The renderer collaborator.
pub trait Renderer {
    /// Recompute panel geometry from the current configuration.
    fn recompute_layout(&mut self);

    /// Redraw (part of) the screen.
    fn request_redraw(&mut self, scope: RedrawScope);

    /// Open a modal menu.
    fn show_menu(&mut self, menu: Menu);

    /// Show a notice.
    fn show_notice(&mut self, notice: Notice);

    /// Show the filter being edited, or hide it with `None`.
    fn show_filter(&mut self, text: Option<&str>);

    /// Screen bounds of a visible panel, border included.
    fn panel_bounds(&self, panel: Panel) -> Option<Rect>;
}

/// Headless renderer holding the layout and the pending requests.
#[derive(Debug)]
pub struct LayoutRenderer {
    config: SharedConfig,
    layout: Layout,
    pending: Option<RedrawScope>,
    menu: Option<Menu>,
    notice: Option<Notice>,
    filter: Option<String>,
}

impl LayoutRenderer {
    /// Create a renderer and compute the initial layout.
    pub fn new(config: SharedConfig) -> Self {
        let size = config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .terminal_size();
        let mut renderer = Self {
            config,
            layout: Layout::new(size),
            pending: Some(RedrawScope::Full),
            menu: None,
            notice: None,
            filter: None,
        };
        renderer.recompute_layout();
        renderer
    }

    /// Current layout.
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Take the coalesced redraw request, if any.
    pub fn take_redraw(&mut self) -> Option<RedrawScope> {
        self.pending.take()
    }

    /// Take the menu requested since the last call.
    pub fn take_menu(&mut self) -> Option<Menu> {
        self.menu.take()
    }

    /// Take the notice raised since the last call.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Filter text being edited.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

impl Renderer for LayoutRenderer {
    fn recompute_layout(&mut self) {
        let (size, panels, arrangement) = {
            let cfg = self.config.read().unwrap_or_else(PoisonError::into_inner);
            (cfg.terminal_size(), cfg.visible(), cfg.arrangement())
        };
        self.layout.resize(size);
        self.layout.arrange(panels, arrangement);
        log::debug!("layout {} for {size:?}: {:?}", self.layout.generation(), self.layout.regions());
    }

    fn request_redraw(&mut self, scope: RedrawScope) {
        self.pending = Some(self.pending.map_or(scope, |p| p.merge(scope)));
    }

    fn show_menu(&mut self, menu: Menu) {
        self.menu = Some(menu);
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    fn show_filter(&mut self, text: Option<&str>) {
        self.filter = text.map(str::to_owned);
    }

    fn panel_bounds(&self, panel: Panel) -> Option<Rect> {
        self.layout.get(panel).map(|r| r.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{shared, ConfigManager};
    use crate::layout::TermSize;

    #[test]
    fn test_layout_follows_config() {
        let config = shared(ConfigManager::new());
        let mut renderer = LayoutRenderer::new(config.clone());
        assert!(renderer.panel_bounds(Panel::Proc).is_some());

        {
            let mut cfg = config.write().unwrap();
            assert!(cfg.toggle_box("proc"));
            cfg.set_terminal_size(TermSize::new(120, 40));
        }
        renderer.recompute_layout();
        assert!(renderer.panel_bounds(Panel::Proc).is_none());
        assert_eq!(renderer.layout().terminal_size(), TermSize::new(120, 40));
    }

    #[test]
    fn test_redraws_coalesce() {
        let mut renderer = LayoutRenderer::new(shared(ConfigManager::new()));
        assert_eq!(renderer.take_redraw(), Some(RedrawScope::Full));
        renderer.request_redraw(RedrawScope::Panel(Panel::Cpu));
        renderer.request_redraw(RedrawScope::Panel(Panel::Cpu));
        assert_eq!(renderer.take_redraw(), Some(RedrawScope::Panel(Panel::Cpu)));
        renderer.request_redraw(RedrawScope::Panel(Panel::Cpu));
        renderer.request_redraw(RedrawScope::Panel(Panel::Mem));
        assert_eq!(renderer.take_redraw(), Some(RedrawScope::Full));
        assert_eq!(renderer.take_redraw(), None);
    }
}
