//! Region and Layout: panel placement for a terminal size.
//!
//! A layout is computed once per relayout (toggle, preset, resize). There is
//! no tree: just a flat list of panel regions, looked up by panel.

use super::panel::{Panel, PanelSet};
use super::rect::Rect;
use super::sizing::TermSize;

/// Share of the rows given to the processor panel when others are shown.
const CPU_HEIGHT_PERCENT: u16 = 32;
/// Share of the columns given to the memory/network column beside the
/// process list.
const MEM_NET_WIDTH_PERCENT: u16 = 45;
/// Share of the memory/network column given to memory when both are shown.
const MEM_HEIGHT_PERCENT: u16 = 60;

/// Placement switches read from the configuration.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Arrangement {
    /// Processor panel at the bottom instead of the top.
    pub cpu_bottom: bool,
    /// Memory panel below the network panel.
    pub mem_below_net: bool,
    /// Process list on the left of the memory/network column.
    pub proc_left: bool,
}

/// A placed panel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Region {
    /// Which panel.
    pub panel: Panel,
    /// Where it is drawn, border included.
    pub rect: Rect,
}

/// Placement of every visible panel.
#[derive(Clone, Debug)]
pub struct Layout {
    regions: Vec<Region>,
    terminal_size: TermSize,
    generation: u64,
}

impl Layout {
    /// An empty layout for the given terminal size.
    pub const fn new(terminal_size: TermSize) -> Self {
        Self {
            regions: Vec::new(),
            terminal_size,
            generation: 0,
        }
    }

    /// Recompute the placement of `panels` on the current terminal size.
    pub fn arrange(&mut self, panels: PanelSet, arrangement: Arrangement) {
        self.regions.clear();
        self.generation += 1;

        let screen = self.terminal_size.rect();
        let others = panels.intersects(PanelSet::MEM | PanelSet::NET | PanelSet::PROC);

        let rest = if panels.has(Panel::Cpu) {
            let cpu_rows = if others {
                percent(screen.height, CPU_HEIGHT_PERCENT)
            } else {
                screen.height
            };
            let (cpu, rest) = if arrangement.cpu_bottom {
                let (rest, cpu) = screen.split_rows(screen.height - cpu_rows);
                (cpu, rest)
            } else {
                screen.split_rows(cpu_rows)
            };
            self.push(Panel::Cpu, cpu);
            rest
        } else {
            screen
        };

        let has_column = panels.intersects(PanelSet::MEM | PanelSet::NET);
        let column = if panels.has(Panel::Proc) {
            let proc_cols = if has_column {
                rest.width - percent(rest.width, MEM_NET_WIDTH_PERCENT)
            } else {
                rest.width
            };
            let (proc, column) = if arrangement.proc_left {
                rest.split_columns(proc_cols)
            } else {
                let (column, proc) = rest.split_columns(rest.width - proc_cols);
                (proc, column)
            };
            self.push(Panel::Proc, proc);
            column
        } else {
            rest
        };

        match (panels.has(Panel::Mem), panels.has(Panel::Net)) {
            (true, true) => {
                let mem_rows = percent(column.height, MEM_HEIGHT_PERCENT);
                if arrangement.mem_below_net {
                    let (net, mem) = column.split_rows(column.height - mem_rows);
                    self.push(Panel::Mem, mem);
                    self.push(Panel::Net, net);
                } else {
                    let (mem, net) = column.split_rows(mem_rows);
                    self.push(Panel::Mem, mem);
                    self.push(Panel::Net, net);
                }
            }
            (true, false) => self.push(Panel::Mem, column),
            (false, true) => self.push(Panel::Net, column),
            (false, false) => {}
        }

        self.regions.sort_by_key(|r| r.panel);
    }

    fn push(&mut self, panel: Panel, rect: Rect) {
        self.regions.push(Region { panel, rect });
    }

    /// Region of a panel, if visible.
    pub fn get(&self, panel: Panel) -> Option<&Region> {
        self.regions.iter().find(|r| r.panel == panel)
    }

    /// All placed panels in canonical order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Terminal size the layout was computed for.
    pub const fn terminal_size(&self) -> TermSize {
        self.terminal_size
    }

    /// Number of recomputations so far.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Change the terminal size. Call [`arrange`](Self::arrange) afterwards.
    pub fn resize(&mut self, terminal_size: TermSize) {
        self.terminal_size = terminal_size;
    }
}

fn percent(total: u16, pct: u16) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let part = (u32::from(total) * u32::from(pct) / 100) as u16;
    part
}
