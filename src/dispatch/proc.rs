//! Process panel keys: filter editing, sorting, the detailed view, tree
//! commands, signal menus, list navigation and mouse selection.
//!
//! Selection `0` means "nothing selected". Rows of the list are numbered
//! from `1`; `proc_start` is the index of the first visible row.

use super::{FilterBuffer, Turn};
use crate::actor::{Collector, CollectorCommand, Menu, Renderer};
use crate::config::{ConfigManager, SORT_OPTIONS};
use crate::input::{EscapeCode, KeyEvent, MouseEvent};
use crate::layout::Panel;
use signal_hook::consts::{SIGKILL, SIGTERM};

/// Rows taken by the detailed view at the top of the process panel.
const DETAILED_ROWS: i64 = 8;

/// Scroll position and selection of the process list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// First visible row.
    pub start: i64,
    /// Selected row on screen, `0` for none.
    pub selected: i64,
    /// Selection saved while the detailed view is open.
    pub last_selected: i64,
}

impl Selection {
    /// Current selection from the config.
    pub fn read(cfg: &ConfigManager) -> Self {
        Self {
            start: cfg.int("proc_start"),
            selected: cfg.int("proc_selected"),
            last_selected: cfg.int("proc_last_selected"),
        }
    }
}

/// A movement in the process list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One page up.
    PageUp,
    /// One page down.
    PageDown,
    /// First row.
    Home,
    /// Last row.
    End,
    /// Scroll to a position on the scrollbar (row offset from its top).
    Jump(i64),
}

impl Nav {
    fn from_key(key: KeyEvent, vim_keys: bool) -> Option<Self> {
        Some(match key {
            KeyEvent::Named(EscapeCode::ArrowUp) => Self::Up,
            KeyEvent::Named(EscapeCode::ArrowDown) => Self::Down,
            KeyEvent::Named(EscapeCode::PageUp) => Self::PageUp,
            KeyEvent::Named(EscapeCode::PageDown) => Self::PageDown,
            KeyEvent::Named(EscapeCode::Home) => Self::Home,
            KeyEvent::Named(EscapeCode::End) => Self::End,
            KeyEvent::Char(b'k') if vim_keys => Self::Up,
            KeyEvent::Char(b'j') if vim_keys => Self::Down,
            KeyEvent::Char(b'g') if vim_keys => Self::Home,
            KeyEvent::Char(b'G') if vim_keys => Self::End,
            _ => return None,
        })
    }
}

/// Apply `nav` to a list of `count` rows showing `rows` at a time.
///
/// The selection never exceeds the visible rows or the row count, and the
/// list never scrolls past its end.
pub fn navigate(selection: Selection, nav: Nav, rows: i64, count: i64) -> Selection {
    let Selection {
        mut start,
        mut selected,
        mut last_selected,
    } = selection;
    let max_start = (count - rows).max(0);

    match nav {
        Nav::Up => {
            if selected > 0 {
                if start > 0 && selected == 1 {
                    start -= 1;
                } else {
                    selected -= 1;
                }
                last_selected = 0;
            }
        }
        Nav::Down => {
            if start < max_start && selected == rows {
                start += 1;
            } else if selected == 0 && last_selected > 0 {
                selected = last_selected;
                last_selected = 0;
            } else {
                selected += 1;
            }
        }
        Nav::PageUp => {
            if selected > 0 && start == 0 {
                selected = 0;
            } else {
                start -= rows;
            }
        }
        Nav::PageDown => {
            if selected > 0 && start >= max_start {
                selected = rows;
            } else {
                start += rows;
            }
        }
        Nav::Home => {
            start = 0;
            if selected > 0 {
                selected = 1;
            }
        }
        Nav::End => {
            start = max_start;
            if selected > 0 {
                selected = rows;
            }
        }
        Nav::Jump(offset) => start = scrollbar_start(offset, rows, count),
    }

    Selection {
        start: start.clamp(0, max_start),
        selected: selected.clamp(0, rows.min(count).max(0)),
        last_selected,
    }
}

/// First row when the scrollbar is clicked `offset` rows below its top.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn scrollbar_start(offset: i64, rows: i64, count: i64) -> i64 {
    if rows <= 2 {
        return 0;
    }
    (offset as f64 * (count - rows - 2) as f64 / (rows - 2) as f64).round() as i64
}

impl<R: Renderer, C: Collector> Turn<'_, R, C> {
    pub(super) fn proc_key(&mut self, key: KeyEvent) -> bool {
        if self.filtering() {
            return self.filter_key(key);
        }
        if let Some(mouse) = key.mouse() {
            return self.proc_mouse(mouse);
        }

        let vim = self.vim_keys();
        if let Some(nav) = Nav::from_key(key, vim) {
            return self.proc_navigate(nav);
        }

        let kill_key = if vim { b'K' } else { b'k' };
        match key {
            KeyEvent::Named(EscapeCode::ArrowLeft) => self.cycle_sorting(false),
            KeyEvent::Named(EscapeCode::ArrowRight) => self.cycle_sorting(true),
            KeyEvent::Char(b'h') if vim => self.cycle_sorting(false),
            KeyEvent::Char(b'l') if vim => self.cycle_sorting(true),
            KeyEvent::Char(b'f' | b'/') => self.start_filter(),
            KeyEvent::Char(b'e') => {
                self.flip("proc_tree");
                self.refresh(Panel::Proc, false, true);
            }
            KeyEvent::Char(b'r') => self.flip_and_redraw("proc_reversed"),
            KeyEvent::Char(b'c') => self.flip_and_redraw("proc_per_core"),
            KeyEvent::Char(b'%') => self.flip_and_redraw("proc_mem_bytes"),
            KeyEvent::Named(EscapeCode::Delete) => return self.clear_filter(),
            KeyEvent::Named(EscapeCode::Return) => self.toggle_detailed(),
            KeyEvent::Char(b't') => return self.signal_menu(Menu::SignalSend(SIGTERM)),
            KeyEvent::Char(c) if c == kill_key => {
                return self.signal_menu(Menu::SignalSend(SIGKILL));
            }
            KeyEvent::Char(b's') => return self.signal_menu(Menu::SignalChoose),
            KeyEvent::Char(b'+' | b'-') => return self.tree_command(key),
            _ if key.is_space() => return self.tree_command(key),
            _ => return false,
        }
        true
    }

    // ------------------------------------------------------------------
    // Filter editing
    // ------------------------------------------------------------------

    fn filter_key(&mut self, key: KeyEvent) -> bool {
        match key {
            KeyEvent::Named(EscapeCode::Return | EscapeCode::ArrowDown) => {
                let text = self.state.filter.text().to_owned();
                log::debug!("filter set to {text:?}");
                let cfg = self.cfg.get_mut();
                if let Err(e) = cfg.stage("proc_filter", text) {
                    log::error!("{e}");
                }
                cfg.commit();
                self.set("proc_filtering", false);
                self.effects.filter = Some(None);
                self.refresh(Panel::Proc, false, true);
                if key.is_named(EscapeCode::ArrowDown) {
                    self.proc_key(key);
                }
            }
            KeyEvent::Named(EscapeCode::Escape) => self.cancel_filter(),
            KeyEvent::Mouse(mouse) if mouse.is_left_press() => self.cancel_filter(),
            _ => {
                if self.state.filter.command(key) {
                    let text = self.state.filter.text().to_owned();
                    if let Err(e) = self.cfg.get_mut().stage("proc_filter", text.clone()) {
                        log::error!("{e}");
                    }
                    self.effects.filter = Some(Some(text));
                    self.refresh(Panel::Proc, true, true);
                }
            }
        }
        true
    }

    fn start_filter(&mut self) {
        let current = self.cfg.get().string("proc_filter");
        self.state.filter = FilterBuffer::new(current.clone());
        self.set("proc_filtering", true);
        self.effects.filter = Some(Some(current));
        self.refresh(Panel::Proc, true, true);
    }

    fn cancel_filter(&mut self) {
        self.cfg.get_mut().rollback();
        self.set("proc_filtering", false);
        self.effects.filter = Some(None);
        self.refresh(Panel::Proc, true, true);
    }

    fn clear_filter(&mut self) -> bool {
        if self.cfg.get().string("proc_filter").is_empty() {
            return false;
        }
        self.set("proc_filter", String::new());
        self.refresh(Panel::Proc, false, true);
        true
    }

    // ------------------------------------------------------------------
    // Normal mode
    // ------------------------------------------------------------------

    fn flip_and_redraw(&mut self, key: &str) {
        self.flip(key);
        self.refresh(Panel::Proc, true, true);
    }

    fn cycle_sorting(&mut self, forward: bool) {
        let current = self.cfg.get().string("proc_sorting");
        let len = SORT_OPTIONS.len();
        let pos = SORT_OPTIONS.iter().position(|s| *s == current).unwrap_or(0);
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        self.set("proc_sorting", SORT_OPTIONS[next].to_owned());
        self.refresh(Panel::Proc, false, true);
    }

    fn toggle_detailed(&mut self) {
        let cfg = self.cfg.get();
        let selected = cfg.int("proc_selected");
        let shown = cfg.boolean("show_detailed");
        let detailed_pid = cfg.int("detailed_pid");
        let selected_pid = cfg.int("selected_pid");
        let last_selected = cfg.int("proc_last_selected");

        if selected == 0 && !shown {
            return;
        }
        if selected > 0 && detailed_pid != selected_pid {
            self.set("detailed_pid", selected_pid);
            self.set("proc_last_selected", selected);
            self.set("proc_selected", 0_i64);
            self.set("show_detailed", true);
        } else if shown {
            if last_selected > 0 {
                self.set("proc_selected", last_selected);
            }
            self.set("proc_last_selected", 0_i64);
            self.set("detailed_pid", 0_i64);
            self.set("show_detailed", false);
        }
        self.refresh(Panel::Proc, false, true);
    }

    fn tree_command(&mut self, key: KeyEvent) -> bool {
        let cfg = self.cfg.get();
        if !cfg.boolean("proc_tree") || cfg.int("proc_selected") <= 0 {
            return false;
        }
        let pid = cfg.int("selected_pid");
        let command = match key {
            KeyEvent::Char(b'+') => CollectorCommand::Expand(pid),
            KeyEvent::Char(b'-') => CollectorCommand::Collapse(pid),
            _ => CollectorCommand::ToggleTree(pid),
        };
        self.command(command);
        true
    }

    fn signal_menu(&mut self, menu: Menu) -> bool {
        let cfg = self.cfg.get();
        let shown = cfg.boolean("show_detailed");
        if !shown && cfg.int("selected_pid") <= 0 {
            return false;
        }
        let targets_detailed = shown && cfg.int("proc_selected") == 0;
        if targets_detailed && self.collector.view().detailed_dead {
            log::debug!("detailed process is gone, no signal menu");
            return true;
        }
        self.effects.menu = Some(menu);
        true
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Rows of the process list on screen.
    fn list_rows(&self, detailed: bool) -> i64 {
        let height = self
            .renderer
            .panel_bounds(Panel::Proc)
            .map_or(0, |r| i64::from(r.height));
        let reserved = if detailed { 3 + DETAILED_ROWS } else { 3 };
        (height - reserved).max(0)
    }

    fn proc_count(&self) -> i64 {
        i64::try_from(self.collector.view().proc_count).unwrap_or(i64::MAX)
    }

    fn proc_navigate(&mut self, nav: Nav) -> bool {
        let detailed = self.cfg.get().boolean("show_detailed");
        let rows = self.list_rows(detailed);
        let count = self.proc_count();
        let before = Selection::read(self.cfg.get());
        let after = navigate(before, nav, rows, count);
        if after == before {
            return true;
        }

        let cfg = self.cfg.get_mut();
        for (key, old, new) in [
            ("proc_start", before.start, after.start),
            ("proc_selected", before.selected, after.selected),
            ("proc_last_selected", before.last_selected, after.last_selected),
        ] {
            if old != new {
                if let Err(e) = cfg.set(key, new) {
                    log::error!("{e}");
                }
            }
        }
        let redraw = (before.selected == 0) != (after.selected == 0);
        self.refresh(Panel::Proc, true, redraw);
        true
    }

    fn proc_mouse(&mut self, mouse: MouseEvent) -> bool {
        if !mouse.is_left_press() {
            return false;
        }
        let Some(bounds) = self.renderer.panel_bounds(Panel::Proc) else {
            return false;
        };

        let cfg = self.cfg.get();
        let detailed = cfg.boolean("show_detailed");
        let current = cfg.int("proc_selected");
        let tree = cfg.boolean("proc_tree");
        let depth = cfg.int("selected_depth");

        let x = i64::from(bounds.x);
        let width = i64::from(bounds.width);
        let (y, height) = if detailed {
            (i64::from(bounds.y) + DETAILED_ROWS, i64::from(bounds.height) - DETAILED_ROWS)
        } else {
            (i64::from(bounds.y), i64::from(bounds.height))
        };
        let (col, line) = (i64::from(mouse.x), i64::from(mouse.y));

        let in_list = col > x && col < x + width && line > y && line < y + height - 1;
        if !in_list {
            if current == 0 {
                return false;
            }
            self.set("proc_selected", 0_i64);
            self.refresh(Panel::Proc, true, true);
            return true;
        }

        if col >= x + width - 2 {
            let nav = if line == y + 1 {
                Nav::PageUp
            } else if line == y + height - 2 {
                Nav::PageDown
            } else {
                Nav::Jump(line - y - 2)
            };
            return self.proc_navigate(nav);
        }

        let row = line - y - 1;
        if row == current {
            let offset = depth * 3;
            let on_expander = tree && col - x > offset && col - x < offset + 4;
            if on_expander {
                self.proc_key(KeyEvent::Named(EscapeCode::Space));
            } else {
                self.proc_key(KeyEvent::Named(EscapeCode::Return));
            }
            return true;
        }

        let row = row.min(self.proc_count());
        let redraw = current == 0 || row == 0;
        self.set("proc_selected", row);
        self.refresh(Panel::Proc, true, redraw);
        true
    }
}
