//! Dashboard: drive the dispatcher from a real terminal.
//!
//! Panels are drawn as labelled boxes and a status line shows the last menu,
//! notice or filter. The collector is simulated.
//!
//! Logs go to stderr, so redirect them:
//! `RUST_LOG=debug cargo run --example dashboard 2>vigil.log`

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use vigil::actor::{CollectorCommand, CollectorView, Menu, Notice, RedrawScope, RunRequest};
use vigil::layout::{Panel, Rect};
use vigil::{
    shared, Collect, CollectorActor, ConfigManager, Dispatcher, EventLoop, EventLoopConfig,
    LayoutRenderer, Poller, Renderer, TerminalSession,
};

const INTERFACES: [&str; 3] = ["eth0", "lo", "wlan0"];

/// Pretends to collect: the process count shrinks as the filter grows.
#[derive(Default)]
struct Simulated {
    cycles: u64,
}

impl Collect for Simulated {
    fn collect(&mut self, config: &ConfigManager, request: &RunRequest) -> CollectorView {
        if !request.no_update {
            self.cycles += 1;
        }
        let filter = config.string("proc_filter");
        CollectorView {
            proc_count: 240 / (filter.len() + 1),
            interfaces: INTERFACES.iter().map(|s| (*s).to_string()).collect(),
            detailed_dead: false,
        }
    }

    fn apply(&mut self, command: CollectorCommand) {
        log::info!("simulated collector got {command:?} after {} cycles", self.cycles);
    }

    fn reset(&mut self) {
        self.cycles = 0;
    }
}

/// Draws each panel region as a box with its name.
struct BoxRenderer {
    inner: LayoutRenderer,
    status: String,
}

impl BoxRenderer {
    fn draw(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        queue!(out, Clear(ClearType::All))?;
        for region in self.inner.layout().regions() {
            draw_box(&mut out, region.rect, region.panel)?;
        }
        let size = self.inner.layout().terminal_size();
        queue!(out, MoveTo(0, size.height.saturating_sub(1)), Print(&self.status))?;
        out.flush()
    }

    fn flush_redraw(&mut self) {
        if self.inner.take_redraw().is_some() {
            if let Err(e) = self.draw() {
                log::error!("draw failed: {e}");
            }
        }
    }
}

fn draw_box(out: &mut impl Write, rect: Rect, panel: Panel) -> io::Result<()> {
    if rect.width < 2 || rect.height < 2 {
        return Ok(());
    }
    // Rect is 1-based, crossterm is 0-based.
    let (x, y) = (rect.x - 1, rect.y - 1);
    let horizontal = "─".repeat(usize::from(rect.width - 2));
    queue!(out, MoveTo(x, y), Print(format!("┌{horizontal}┐")))?;
    for row in 1..rect.height - 1 {
        queue!(
            out,
            MoveTo(x, y + row),
            Print('│'),
            MoveTo(x + rect.width - 1, y + row),
            Print('│')
        )?;
    }
    queue!(
        out,
        MoveTo(x, y + rect.height - 1),
        Print(format!("└{horizontal}┘")),
        MoveTo(x + 2, y),
        Print(format!(" {panel} "))
    )
}

impl Renderer for BoxRenderer {
    fn recompute_layout(&mut self) {
        self.inner.recompute_layout();
    }

    fn request_redraw(&mut self, scope: RedrawScope) {
        self.inner.request_redraw(scope);
        self.flush_redraw();
    }

    fn show_menu(&mut self, menu: Menu) {
        self.status = format!("menu: {menu:?}");
        self.request_redraw(RedrawScope::Full);
    }

    fn show_notice(&mut self, notice: Notice) {
        self.status = match notice {
            Notice::SizeError => "terminal too small for that".to_string(),
        };
        self.request_redraw(RedrawScope::Full);
    }

    fn show_filter(&mut self, text: Option<&str>) {
        self.status = text.map_or_else(String::new, |t| format!("filter: {t}_"));
        self.request_redraw(RedrawScope::Full);
    }

    fn panel_bounds(&self, panel: Panel) -> Option<Rect> {
        self.inner.panel_bounds(panel)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut manager = ConfigManager::new();
    manager.set_terminal_size(vigil::terminal::size()?);
    let report = manager.load([("update_ms", "1500"), ("proc_sorting", "memory")]);
    if !report.is_clean() {
        log::warn!("config: {:?}", report.warnings);
    }
    let config = shared(manager);

    let collector = CollectorActor::spawn(config.clone(), Simulated::default())?;
    let renderer = BoxRenderer {
        inner: LayoutRenderer::new(config.clone()),
        status: "q quits, 1-4 toggle panels, p/P presets, Tab focus".to_string(),
    };
    let dispatcher = Dispatcher::new(config, renderer, collector);

    let loop_config = EventLoopConfig::default();
    let session = TerminalSession::enter(&loop_config)?;
    let mut event_loop = EventLoop::new(loop_config, Poller::stdin()?, dispatcher);
    event_loop
        .dispatcher_mut()
        .renderer_mut()
        .request_redraw(RedrawScope::Full);

    let result = event_loop.run();
    drop(event_loop);
    session.leave()?;
    result?;
    Ok(())
}
