//! Input Dispatcher: the focus/mode state machine.
//!
//! One decoded [`KeyEvent`] at a time is matched against the global keys
//! and then offered to the visible panels, focused panel first. Handlers
//! read and write the [`SharedConfig`] and record what the renderer and the
//! collector should do; those effects are applied once the config lock has
//! been released.
//!
//! # Locking
//!
//! Reads share the config read lock with the collector. Before the first
//! write of a turn the dispatcher drops its read lock, waits for the
//! collector to go idle and takes the write lock for the rest of the turn:
//!
//! ```text
//! read ──▶ wait_idle ──▶ write ──▶ (release) ──▶ renderer / collector
//! ```

mod accel;
mod filter;
mod proc;

#[cfg(test)]
mod fixtures;

pub use accel::{Direction, IntervalAccel, COARSE_STEP, FINE_STEP, REPEAT_WINDOW};
pub use filter::FilterBuffer;
pub use proc::{navigate, Nav, Selection};

use crate::actor::{
    Collector, CollectorCommand, Control, Menu, Notice, RedrawScope, Renderer, RunRequest,
};
use crate::config::{ConfigManager, ConfigValue, SharedConfig};
use crate::input::{EscapeCode, InputHistory, KeyEvent};
use crate::layout::{Panel, TermSize};
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Order in which unfocused panels are offered a key.
const PANEL_ORDER: [Panel; 4] = [Panel::Proc, Panel::Cpu, Panel::Mem, Panel::Net];

/// Dispatcher-private state that survives between events.
#[derive(Debug, Default)]
struct InputState {
    focus: Option<Panel>,
    filter: FilterBuffer,
    accel: IntervalAccel,
    history: InputHistory,
}

/// Routes decoded input to config changes, renderer effects and collector
/// requests.
pub struct Dispatcher<R, C> {
    config: SharedConfig,
    renderer: R,
    collector: C,
    state: InputState,
}

impl<R: Renderer, C: Collector> Dispatcher<R, C> {
    /// Create a dispatcher with no focused panel.
    pub fn new(config: SharedConfig, renderer: R, collector: C) -> Self {
        Self {
            config,
            renderer,
            collector,
            state: InputState::default(),
        }
    }

    /// Handle one event. `None` (an undecodable burst) is ignored.
    pub fn dispatch(&mut self, event: Option<KeyEvent>) -> Control {
        self.dispatch_at(event, Instant::now())
    }

    /// Handle one event as if it arrived at `now`.
    pub fn dispatch_at(&mut self, event: Option<KeyEvent>, now: Instant) -> Control {
        let Some(key) = event else {
            return Control::Continue;
        };

        let effects = {
            let mut turn = Turn {
                cfg: ConfigAccess::new(&self.config, &self.collector),
                collector: &self.collector,
                renderer: &self.renderer,
                state: &mut self.state,
                effects: Effects::default(),
                now,
            };
            turn.handle(key);
            turn.effects
        };

        self.state.history.push(key);
        self.apply(effects)
    }

    /// The terminal was resized to `size`.
    pub fn resize(&mut self, size: TermSize) {
        log::debug!("resize to {size:?}");
        ConfigAccess::new(&self.config, &self.collector)
            .get_mut()
            .set_terminal_size(size);
        self.renderer.recompute_layout();
        self.renderer.request_redraw(RedrawScope::Full);
        self.collector.run(RunRequest {
            no_update: true,
            ..RunRequest::all()
        });
    }

    /// Panel receiving keys first.
    pub const fn focus(&self) -> Option<Panel> {
        self.state.focus
    }

    /// Text in the filter editor (meaningful while `proc_filtering`).
    pub fn filter_text(&self) -> &str {
        self.state.filter.text()
    }

    /// Recently processed keys.
    pub const fn history(&self) -> &InputHistory {
        &self.state.history
    }

    /// The shared configuration.
    pub const fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The collector.
    pub const fn collector(&self) -> &C {
        &self.collector
    }

    fn apply(&mut self, effects: Effects) -> Control {
        if effects.restart {
            self.collector.restart();
        }
        if effects.relayout {
            self.renderer.recompute_layout();
        }
        if let Some(filter) = &effects.filter {
            self.renderer.show_filter(filter.as_deref());
        }
        if let Some(scope) = effects.redraw {
            self.renderer.request_redraw(scope);
        }
        if let Some(menu) = effects.menu {
            self.renderer.show_menu(menu);
        }
        if let Some(notice) = effects.notice {
            self.renderer.show_notice(notice);
        }
        if let Some(command) = effects.command {
            self.collector.command(command);
        }
        if let Some(request) = effects.run {
            self.collector.run(request);
        }

        if effects.quit {
            log::info!("quit requested");
            Control::Quit
        } else {
            Control::Continue
        }
    }
}

impl<R, C> std::fmt::Debug for Dispatcher<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("focus", &self.state.focus)
            .field("filter", &self.state.filter)
            .field("history", &self.state.history.len())
            .finish_non_exhaustive()
    }
}

/// Lazily taken config lock for one turn.
///
/// The write lock is only taken once the collector is idle.
struct ConfigAccess<'a, C> {
    config: &'a SharedConfig,
    collector: &'a C,
    read: Option<RwLockReadGuard<'a, ConfigManager>>,
    write: Option<RwLockWriteGuard<'a, ConfigManager>>,
}

impl<'a, C: Collector> ConfigAccess<'a, C> {
    const fn new(config: &'a SharedConfig, collector: &'a C) -> Self {
        Self {
            config,
            collector,
            read: None,
            write: None,
        }
    }

    fn get(&mut self) -> &ConfigManager {
        if let Some(write) = &self.write {
            return write;
        }
        let config = self.config;
        self.read
            .get_or_insert_with(|| config.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn get_mut(&mut self) -> &mut ConfigManager {
        if self.write.is_none() {
            self.read = None;
            self.collector.wait_idle();
        }
        let config = self.config;
        self.write
            .get_or_insert_with(|| config.write().unwrap_or_else(PoisonError::into_inner))
    }
}

/// What a turn asks of the renderer and the collector.
#[derive(Debug, Default)]
struct Effects {
    relayout: bool,
    redraw: Option<RedrawScope>,
    run: Option<RunRequest>,
    command: Option<CollectorCommand>,
    menu: Option<Menu>,
    notice: Option<Notice>,
    /// `Some(None)` hides the filter editor.
    filter: Option<Option<String>>,
    restart: bool,
    quit: bool,
}

impl Effects {
    fn redraw(&mut self, scope: RedrawScope) {
        self.redraw = Some(self.redraw.map_or(scope, |s| s.merge(scope)));
    }

    fn run(&mut self, request: RunRequest) {
        self.run = Some(self.run.map_or(request, |r| r.merge(request)));
    }
}

/// One event being handled.
struct Turn<'a, R, C> {
    cfg: ConfigAccess<'a, C>,
    collector: &'a C,
    renderer: &'a R,
    state: &'a mut InputState,
    effects: Effects,
    now: Instant,
}

impl<R: Renderer, C: Collector> Turn<'_, R, C> {
    fn handle(&mut self, key: KeyEvent) {
        let filtering = self.filtering();
        if !filtering && self.global(key) {
            return;
        }

        for panel in self.panel_order(filtering) {
            if self.panel_key(panel, key) {
                log::debug!("{key:?} handled by {panel}");
                return;
            }
        }
        log::debug!("{key:?} not handled");
    }

    fn filtering(&mut self) -> bool {
        self.cfg.get().boolean("proc_filtering")
    }

    fn vim_keys(&mut self) -> bool {
        self.cfg.get().boolean("vim_keys")
    }

    fn panel_order(&mut self, filtering: bool) -> Vec<Panel> {
        if filtering {
            return vec![Panel::Proc];
        }
        let cfg = self.cfg.get();
        let mut order: Vec<Panel> = self.state.focus.into_iter().collect();
        for panel in PANEL_ORDER {
            if !order.contains(&panel) {
                order.push(panel);
            }
        }
        order.retain(|p| cfg.is_shown(*p));
        order
    }

    fn panel_key(&mut self, panel: Panel, key: KeyEvent) -> bool {
        match panel {
            Panel::Proc => self.proc_key(key),
            Panel::Cpu => self.cpu_key(key),
            Panel::Mem => self.mem_key(key),
            Panel::Net => self.net_key(key),
        }
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    fn set<T: ConfigValue>(&mut self, key: &str, value: T) {
        if let Err(e) = self.cfg.get_mut().set(key, value) {
            log::error!("{e}");
        }
    }

    fn flip(&mut self, key: &str) {
        if let Err(e) = self.cfg.get_mut().flip(key) {
            log::error!("{e}");
        }
    }

    /// Ask the collector to refresh `panel`, redrawing it if `redraw`.
    fn refresh(&mut self, panel: Panel, no_update: bool, redraw: bool) {
        if redraw {
            self.effects.redraw(RedrawScope::Panel(panel));
        }
        self.effects.run(RunRequest::panel(panel, no_update, redraw));
    }

    /// Send a collector command; the collector refreshes the panel itself.
    fn command(&mut self, command: CollectorCommand) {
        self.effects.redraw(RedrawScope::Panel(command.panel()));
        self.effects.command = Some(command);
    }

    /// Everything moved: new layout, full redraw, fresh data.
    fn rearrange(&mut self) {
        self.effects.relayout = true;
        self.effects.redraw(RedrawScope::Full);
        self.effects.run(RunRequest::all());
    }

    // ------------------------------------------------------------------
    // Global keys
    // ------------------------------------------------------------------

    fn global(&mut self, key: KeyEvent) -> bool {
        let help_key = if self.vim_keys() { b'H' } else { b'h' };
        match key {
            KeyEvent::Char(b'q' | b'Q') => self.effects.quit = true,
            KeyEvent::Named(EscapeCode::Escape) | KeyEvent::Char(b'm') => {
                self.effects.menu = Some(Menu::Main);
            }
            KeyEvent::Named(EscapeCode::F1) | KeyEvent::Char(b'?') => {
                self.effects.menu = Some(Menu::Help);
            }
            KeyEvent::Char(c) if c == help_key => self.effects.menu = Some(Menu::Help),
            KeyEvent::Named(EscapeCode::F2) | KeyEvent::Char(b'o') => {
                self.effects.menu = Some(Menu::Options);
            }
            KeyEvent::Char(b'0'..=b'9') => {
                if let Some(panel) = key.digit().and_then(Panel::from_digit) {
                    self.toggle_panel(panel);
                }
            }
            KeyEvent::Char(b'p' | b'P') => return self.cycle_preset(key.is_char(b'p')),
            KeyEvent::Named(EscapeCode::CtrlR) => self.effects.restart = true,
            KeyEvent::Named(EscapeCode::Tab) => self.cycle_focus(true),
            KeyEvent::Named(EscapeCode::ShiftTab) => self.cycle_focus(false),
            _ => return false,
        }
        true
    }

    fn toggle_panel(&mut self, panel: Panel) {
        let cfg = self.cfg.get_mut();
        if !cfg.toggle_box(panel.name()) {
            self.effects.notice = Some(Notice::SizeError);
            return;
        }
        cfg.set_current_preset(None);
        if !cfg.is_shown(panel) && self.state.focus == Some(panel) {
            self.state.focus = None;
        }
        self.rearrange();
    }

    fn cycle_preset(&mut self, forward: bool) -> bool {
        let count = self.cfg.get().preset_list().len();
        if count < 2 {
            return false;
        }

        let cfg = self.cfg.get_mut();
        let next = match (cfg.current_preset(), forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        let descriptor = cfg.preset_list()[next].clone();
        if !cfg.apply_preset(&descriptor) {
            self.effects.notice = Some(Notice::SizeError);
            return true;
        }
        cfg.set_current_preset(Some(next));
        if self.state.focus.is_some_and(|p| !cfg.is_shown(p)) {
            self.state.focus = None;
        }
        log::debug!("preset {next}: {descriptor}");
        self.rearrange();
        true
    }

    fn cycle_focus(&mut self, forward: bool) {
        let boxes = self.cfg.get().current_boxes().to_vec();
        let len = boxes.len();
        self.state.focus = if len == 0 {
            None
        } else {
            let pos = self
                .state
                .focus
                .and_then(|f| boxes.iter().position(|p| *p == f));
            let next = match (pos, forward) {
                (None, true) => 0,
                (None, false) => len - 1,
                (Some(i), true) => (i + 1) % len,
                (Some(i), false) => (i + len - 1) % len,
            };
            Some(boxes[next])
        };
        self.effects.redraw(RedrawScope::Full);
    }

    // ------------------------------------------------------------------
    // Cpu, mem and net panels
    // ------------------------------------------------------------------

    fn cpu_key(&mut self, key: KeyEvent) -> bool {
        let direction = match key {
            KeyEvent::Char(b'+') => Direction::Up,
            KeyEvent::Char(b'-') => Direction::Down,
            _ => return false,
        };
        let current = self.cfg.get().int("update_ms");
        let Some(next) = self
            .state
            .accel
            .adjust(direction, current, &self.state.history, self.now)
        else {
            return false;
        };
        self.set("update_ms", next);
        self.refresh(Panel::Cpu, true, true);
        true
    }

    fn mem_key(&mut self, key: KeyEvent) -> bool {
        match key {
            KeyEvent::Char(b'i') => {
                self.flip("io_mode");
                self.refresh(Panel::Mem, true, true);
            }
            KeyEvent::Char(b'd') => {
                self.flip("show_disks");
                self.effects.relayout = true;
                self.refresh(Panel::Mem, false, true);
            }
            _ => return false,
        }
        true
    }

    fn net_key(&mut self, key: KeyEvent) -> bool {
        match key {
            KeyEvent::Char(c @ (b'b' | b'n')) => {
                let interfaces = self.collector.view().interfaces;
                if interfaces.is_empty() {
                    return true;
                }
                let current = self.cfg.get().string("net_iface");
                let last = interfaces.len() - 1;
                let next = match (interfaces.iter().position(|i| *i == current), c) {
                    (None, b'n') => 0,
                    (None, _) => last,
                    (Some(i), b'n') => if i == last { 0 } else { i + 1 },
                    (Some(i), _) => if i == 0 { last } else { i - 1 },
                };
                self.set("net_iface", interfaces[next].clone());
                self.refresh(Panel::Net, true, true);
            }
            KeyEvent::Char(b'y') => {
                self.flip("net_sync");
                self.refresh(Panel::Net, true, true);
            }
            KeyEvent::Char(b'a') => {
                self.flip("net_auto");
                self.refresh(Panel::Net, true, true);
            }
            KeyEvent::Char(b'z') => {
                let iface = self.cfg.get().string("net_iface");
                if !iface.is_empty() {
                    self.command(CollectorCommand::ToggleNetTotals(iface));
                }
            }
            _ => return false,
        }
        true
    }
}
