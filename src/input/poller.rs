//! Poller: readiness wait on the terminal input descriptor.
//!
//! The poller blocks the calling thread until input is ready, a timeout
//! elapses, or it is interrupted. Readiness is multiplexed with [`mio`] over
//! three sources:
//!
//! | Token      | Source                              | Effect                     |
//! | :--------- | :---------------------------------- | :------------------------- |
//! | `INPUT`    | the input descriptor                | drain burst, return `true` |
//! | `SIGNALS`  | `SIGWINCH`, `SIGUSR1` (signal pipe) | resize flag / interrupt    |
//! | `WAKER`    | [`Interrupter::interrupt`]          | return `false`             |
//!
//! Signals arrive through a self-pipe registered with the same poll, so a
//! signal delivered while waiting wakes the wait instead of racing with it.
//! An interrupted system call (`EINTR`) resumes the wait with whatever is
//! left of the timeout.

use super::decoder::decode;
use super::event::KeyEvent;
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token, Waker};
use signal_hook::consts::{SIGUSR1, SIGWINCH};
use signal_hook_mio::v1_0::Signals;
use std::io::{self, ErrorKind, Read, Stdin};
use std::os::fd::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const INPUT: Token = Token(0);
const SIGNALS: Token = Token(1);
const WAKER: Token = Token(2);

/// Size of a single read while draining a burst.
pub const READ_CHUNK: usize = 1024;

const EVENTS_CAPACITY: usize = 8;

/// How long a poll may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Give up after this many milliseconds.
    Millis(u64),
    /// Block until input arrives or the wait is interrupted.
    Infinite,
}

impl Timeout {
    fn deadline(self, now: Instant) -> Option<Instant> {
        match self {
            Self::Millis(ms) => Some(now + Duration::from_millis(ms)),
            Self::Infinite => None,
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self::Millis(duration.as_millis() as u64)
    }
}

/// Failures of the poller itself. Malformed input is never an error.
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    /// The OS readiness facility (epoll/kqueue) could not be created.
    #[error("failed to create readiness poll")]
    Create(#[source] io::Error),
    /// The input descriptor or waker could not be registered.
    #[error("failed to register input source")]
    Register(#[source] io::Error),
    /// Signal handlers could not be installed.
    #[error("failed to install signal handlers")]
    Signals(#[source] io::Error),
    /// The readiness wait failed with something other than `EINTR`.
    #[error("readiness wait failed")]
    Wait(#[source] io::Error),
    /// Reading the input descriptor failed.
    #[error("failed to read terminal input")]
    Read(#[source] io::Error),
    /// The input descriptor reached end of file (the terminal hung up).
    #[error("terminal input closed")]
    Closed,
}

/// Cloneable handle that cancels a blocked [`Poller::poll`] from any thread.
#[derive(Debug, Clone)]
pub struct Interrupter {
    waker: Arc<Waker>,
    polling: Arc<AtomicBool>,
}

impl Interrupter {
    /// Wake the poller. The in-flight (or next) poll returns `false`.
    pub fn interrupt(&self) {
        if let Err(e) = self.waker.wake() {
            log::warn!("failed to wake input poller: {e}");
        }
    }

    /// Check if a poll is currently in flight.
    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::SeqCst)
    }
}

/// Readiness wait and burst reader over an input descriptor.
///
/// Draining stops at a short read or when the source would block. A read of
/// zero bytes is taken as end of file, so the source must not be a terminal
/// in `VMIN = 0` mode.
pub struct Poller<S = Stdin> {
    poll: Poll,
    events: Events,
    source: S,
    signals: Signals,
    waker: Arc<Waker>,
    polling: Arc<AtomicBool>,
    burst: Vec<u8>,
    resized: bool,
    closed: bool,
}

impl Poller<Stdin> {
    /// Poll the process's standard input.
    pub fn stdin() -> Result<Self, PollerError> {
        Self::new(io::stdin())
    }
}

impl<S: Read + AsRawFd> Poller<S> {
    /// Create a poller over `source`.
    pub fn new(source: S) -> Result<Self, PollerError> {
        let poll = Poll::new().map_err(PollerError::Create)?;
        let waker = Waker::new(poll.registry(), WAKER).map_err(PollerError::Register)?;

        poll.registry()
            .register(&mut SourceFd(&source.as_raw_fd()), INPUT, Interest::READABLE)
            .map_err(PollerError::Register)?;

        let mut signals = Signals::new([SIGWINCH, SIGUSR1]).map_err(PollerError::Signals)?;
        poll.registry()
            .register(&mut signals, SIGNALS, Interest::READABLE)
            .map_err(PollerError::Register)?;

        Ok(Self {
            poll,
            events: Events::with_capacity(EVENTS_CAPACITY),
            source,
            signals,
            waker: Arc::new(waker),
            polling: Arc::new(AtomicBool::new(false)),
            burst: Vec::with_capacity(READ_CHUNK),
            resized: false,
            closed: false,
        })
    }

    /// Handle for interrupting this poller from elsewhere.
    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            waker: Arc::clone(&self.waker),
            polling: Arc::clone(&self.polling),
        }
    }

    /// Wait for input for at most `timeout`.
    ///
    /// Returns `true` once a burst has been drained (see [`read_burst`]),
    /// `false` on timeout, interrupt, or a terminal resize (see
    /// [`take_resized`]). Once the source has reached end of file every
    /// call fails with [`PollerError::Closed`]; bytes read before the end
    /// are still returned first.
    ///
    /// [`read_burst`]: Self::read_burst
    /// [`take_resized`]: Self::take_resized
    pub fn poll(&mut self, timeout: Timeout) -> Result<bool, PollerError> {
        if self.closed {
            return Err(PollerError::Closed);
        }
        self.polling.store(true, Ordering::SeqCst);
        let polling = Arc::clone(&self.polling);
        let _release = scopeguard::guard((), move |()| polling.store(false, Ordering::SeqCst));

        let deadline = timeout.deadline(Instant::now());
        loop {
            let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            match self.poll.poll(&mut self.events, remaining) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    if expired(deadline) {
                        return Ok(false);
                    }
                    continue;
                }
                Err(e) => return Err(PollerError::Wait(e)),
            }

            if self.events.is_empty() {
                return Ok(false);
            }

            let mut input_ready = false;
            let mut hung_up = false;
            let mut signals_ready = false;
            let mut woken = false;
            for event in &self.events {
                match event.token() {
                    INPUT => {
                        input_ready = true;
                        hung_up |= event.is_read_closed();
                    }
                    SIGNALS => signals_ready = true,
                    WAKER => woken = true,
                    _ => {}
                }
            }

            if signals_ready {
                for signal in self.signals.pending() {
                    match signal {
                        SIGWINCH => self.resized = true,
                        SIGUSR1 => woken = true,
                        _ => {}
                    }
                }
            }

            if input_ready {
                self.drain()?;
                self.closed |= hung_up;
                if !self.burst.is_empty() {
                    return Ok(true);
                }
                if self.closed {
                    return Err(PollerError::Closed);
                }
            }

            if woken || self.resized || expired(deadline) {
                return Ok(false);
            }
        }
    }

    /// Take the burst drained by the last successful poll.
    pub fn read_burst(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.burst)
    }

    /// Poll for at most `timeout` and decode whatever arrived.
    pub fn try_get(&mut self, timeout: Timeout) -> Result<Option<KeyEvent>, PollerError> {
        if !self.poll(timeout)? {
            return Ok(None);
        }
        Ok(decode(&self.read_burst()))
    }

    /// Block until input is ready, then decode it.
    ///
    /// Interrupts and resizes do not end the wait.
    pub fn wait(&mut self) -> Result<Option<KeyEvent>, PollerError> {
        while !self.poll(Timeout::Infinite)? {}
        Ok(decode(&self.read_burst()))
    }

    /// Report (and clear) a terminal resize seen while polling.
    pub fn take_resized(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    /// Read everything currently available into the burst buffer.
    fn drain(&mut self) -> Result<(), PollerError> {
        self.burst.clear();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.source.read(&mut chunk) {
                Ok(0) => {
                    log::debug!("input source reached end of file");
                    self.closed = true;
                    break;
                }
                Ok(n) => {
                    self.burst.extend_from_slice(&chunk[..n]);
                    // A short read means the descriptor is empty; stopping
                    // here avoids blocking on a descriptor left in blocking mode.
                    if n < READ_CHUNK {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => return Err(PollerError::Read(e)),
            }
        }
        Ok(())
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}
