//! Event loop: the thread that owns poll → decode → dispatch.
//!
//! The loop blocks only inside the [`Poller`]. A [`StopHandle`] ends it from
//! any thread: it raises the stop flag and interrupts the wait.

use super::collector::Collector;
use super::messages::Control;
use super::renderer::Renderer;
use crate::dispatch::Dispatcher;
use crate::input::{decode, Interrupter, Poller, PollerError, Timeout};
use crate::layout::TermSize;
use std::io::{Read, Stdin};
use std::os::fd::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration for the event loop and the terminal session around it.
#[derive(Debug, Clone)]
pub struct EventLoopConfig {
    /// Longest single wait for input.
    pub poll_timeout: Timeout,
    /// Whether to enable mouse reporting.
    pub enable_mouse: bool,
    /// Whether to use the alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Timeout::Millis(1000),
            enable_mouse: true,
            alternate_screen: true,
        }
    }
}

/// Ends an [`EventLoop`] from another thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
    interrupter: Interrupter,
}

impl StopHandle {
    /// Ask the loop to return after the current event.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.interrupter.interrupt();
    }
}

/// Current terminal size, `None` if it cannot be queried.
pub type SizeQuery = fn() -> Option<TermSize>;

fn terminal_size() -> Option<TermSize> {
    crate::terminal::size()
        .map_err(|e| log::warn!("terminal size query failed: {e}"))
        .ok()
}

/// Poll → decode → dispatch loop.
pub struct EventLoop<R, C, S = Stdin> {
    config: EventLoopConfig,
    poller: Poller<S>,
    dispatcher: Dispatcher<R, C>,
    size: SizeQuery,
    stop: Arc<AtomicBool>,
}

impl<R: Renderer, C: Collector, S: Read + AsRawFd> EventLoop<R, C, S> {
    /// Create a loop feeding `poller` input to `dispatcher`.
    pub fn new(config: EventLoopConfig, poller: Poller<S>, dispatcher: Dispatcher<R, C>) -> Self {
        Self {
            config,
            poller,
            dispatcher,
            size: terminal_size,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the terminal size query used on resize.
    #[must_use]
    pub fn with_size_query(mut self, query: SizeQuery) -> Self {
        self.size = query;
        self
    }

    /// Handle for stopping the loop.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop: Arc::clone(&self.stop),
            interrupter: self.poller.interrupter(),
        }
    }

    /// The dispatcher.
    pub const fn dispatcher(&self) -> &Dispatcher<R, C> {
        &self.dispatcher
    }

    /// The dispatcher, mutably.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<R, C> {
        &mut self.dispatcher
    }

    /// Run until a key quits, the loop is stopped, or the input closes.
    ///
    /// Only a failing poller ends the loop with an error.
    pub fn run(&mut self) -> Result<(), PollerError> {
        log::info!("event loop started");
        while !self.stop.load(Ordering::SeqCst) {
            match self.step() {
                Ok(Control::Quit) => break,
                Ok(Control::Continue) => {}
                Err(PollerError::Closed) => {
                    log::info!("terminal input closed");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        log::info!("event loop stopped");
        Ok(())
    }

    /// Wait for input once and dispatch what arrived.
    pub fn step(&mut self) -> Result<Control, PollerError> {
        let ready = self.poller.poll(self.config.poll_timeout)?;
        if self.poller.take_resized() {
            if let Some(size) = (self.size)() {
                self.dispatcher.resize(size);
            }
        }
        if !ready {
            return Ok(Control::Continue);
        }
        let key = decode(&self.poller.read_burst());
        Ok(self.dispatcher.dispatch(key))
    }
}

impl<R, C, S> std::fmt::Debug for EventLoop<R, C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("config", &self.config)
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{CollectorCommand, CollectorView, LayoutRenderer, RunRequest};
    use crate::config::{shared, ConfigManager};
    use crate::layout::Panel;
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::thread;
    use std::time::{Duration, Instant};

    struct Idle;

    impl Collector for Idle {
        fn wait_idle(&self) {}
        fn is_active(&self) -> bool {
            false
        }
        fn run(&self, _request: RunRequest) {}
        fn command(&self, _command: CollectorCommand) {}
        fn restart(&self) {}
        fn view(&self) -> CollectorView {
            CollectorView::default()
        }
    }

    fn event_loop() -> (UnixStream, EventLoop<LayoutRenderer, Idle, UnixStream>) {
        let (tx, rx) = UnixStream::pair().unwrap();
        rx.set_nonblocking(true).unwrap();
        let config = shared(ConfigManager::new());
        let dispatcher = Dispatcher::new(config.clone(), LayoutRenderer::new(config), Idle);
        let config = EventLoopConfig {
            poll_timeout: Timeout::Millis(50),
            ..EventLoopConfig::default()
        };
        let event_loop = EventLoop::new(config, Poller::new(rx).unwrap(), dispatcher)
            .with_size_query(|| Some(TermSize::new(100, 30)));
        (tx, event_loop)
    }

    #[test]
    fn test_step_dispatches_decoded_key() {
        let (mut tx, mut event_loop) = event_loop();
        tx.write_all(b"2").unwrap();
        assert_eq!(event_loop.step().unwrap(), Control::Continue);
        let cfg = event_loop.dispatcher().config().read().unwrap();
        assert!(!cfg.is_shown(Panel::Mem));
    }

    #[test]
    fn test_step_times_out() {
        let (_tx, mut event_loop) = event_loop();
        assert_eq!(event_loop.step().unwrap(), Control::Continue);
        assert!(event_loop.dispatcher().history().is_empty());
    }

    #[test]
    fn test_quit_key_ends_run() {
        let (mut tx, mut event_loop) = event_loop();
        tx.write_all(b"q").unwrap();
        event_loop.run().unwrap();
    }

    #[test]
    fn test_closed_input_ends_run() {
        let (tx, mut event_loop) = event_loop();
        drop(tx);
        assert!(matches!(event_loop.step(), Err(PollerError::Closed)));
        event_loop.run().unwrap();
    }

    #[test]
    fn test_stop_handle_ends_run() {
        let (_tx, mut event_loop) = event_loop();
        let handle = event_loop.stop_handle();
        let start = Instant::now();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            handle.stop();
        });
        event_loop.run().unwrap();
        stopper.join().unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
