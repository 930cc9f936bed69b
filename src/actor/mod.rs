//! Actors: the event loop and the collaborators of the dispatcher.
//!
//! - **Event Loop**: owns the poller, decodes bursts, calls the dispatcher
//! - **Collector Actor**: background thread collecting metrics every
//!   `update_ms`, with a busy flag the dispatcher waits on
//! - **Renderer**: receives layout, redraw, menu and notice requests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   KeyEvent    ┌──────────────┐  RedrawScope, Menu  ┌──────────┐
//! │  Event Loop  │ ────────────▶ │  Dispatcher  │ ──────────────────▶ │ Renderer │
//! │   (Poller)   │               │              │                     └──────────┘
//! └──────────────┘               │              │  RunRequest, Command ┌───────────┐
//!                                │              │ ───────────────────▶ │ Collector │
//!                                └──────────────┘ ◀── wait_idle ────── │  thread   │
//!                                       │                              └───────────┘
//!                                       ▼                                    │
//!                                ┌──────────────┐        read lock           │
//!                                │ SharedConfig │ ◀──────────────────────────┘
//!                                └──────────────┘
//! ```

mod collector;
mod engine;
mod messages;
mod renderer;

pub use collector::{Collect, Collector, CollectorActor};
pub use engine::{EventLoop, EventLoopConfig, SizeQuery, StopHandle};
pub use messages::{
    CollectorCommand, CollectorView, Control, Menu, Notice, RedrawScope, RunRequest,
};
pub use renderer::{LayoutRenderer, Renderer};
