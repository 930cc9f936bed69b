//! # Vigil
//!
//! The interactive control core of a terminal resource monitor.
//!
//! Vigil turns raw terminal bytes into key and mouse events, keeps a typed,
//! validated configuration with staged edits, and dispatches events against
//! that configuration while a metrics collector runs concurrently.
//!
//! ## Core Concepts
//!
//! - **Burst decoding**: one read burst decodes to at most one event
//! - **Validated config**: every key has a type and an optional validator;
//!   edits can be staged and later committed or rolled back
//! - **Idle barrier**: config writes wait for the collector to go idle
//! - **Effects after unlock**: the dispatcher talks to the renderer only
//!   after releasing the config lock
//!
//! ## Example
//!
//! ```rust,ignore
//! use vigil::{shared, ConfigManager, Dispatcher, LayoutRenderer, KeyEvent};
//!
//! let config = shared(ConfigManager::new());
//! let renderer = LayoutRenderer::new(config.clone());
//! let mut dispatcher = Dispatcher::new(config, renderer, collector);
//!
//! // Hide the memory panel
//! dispatcher.dispatch(Some(KeyEvent::Char(b'2')));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod dispatch;
pub mod input;
pub mod layout;
pub mod terminal;

// Re-exports for convenience
pub use actor::{
    Collect, Collector, CollectorActor, Control, EventLoop, EventLoopConfig, LayoutRenderer,
    Renderer, StopHandle,
};
pub use config::{shared, ConfigError, ConfigManager, SharedConfig};
pub use dispatch::Dispatcher;
pub use input::{decode, EscapeCode, KeyEvent, MouseEvent, Poller, PollerError, Timeout};
pub use layout::{Panel, PanelSet, Rect, TermSize};
pub use terminal::TerminalSession;
