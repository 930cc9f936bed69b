//! Terminal input: readiness polling and byte decoding.
//!
//! The [`Poller`] waits on the terminal descriptor and drains a whole burst
//! of bytes at once; [`decode`] turns a burst into at most one
//! [`KeyEvent`]. The dispatcher records processed keys in an
//! [`InputHistory`].
//!
//! ```text
//! fd ──▶ Poller::read_burst ──▶ decode ──▶ KeyEvent ──▶ Dispatcher
//! ```

mod decoder;
mod event;
mod history;
mod poller;

pub use decoder::{decode, lookup, parse_sgr_mouse, ESCAPE_SEQUENCES};
pub use event::{EscapeCode, KeyEvent, MouseEvent};
pub use history::{InputHistory, HISTORY_CAPACITY};
pub use poller::{Interrupter, Poller, PollerError, Timeout, READ_CHUNK};
