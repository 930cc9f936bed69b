//! Collector Actor: background thread running the metrics collection.
//!
//! The actor wakes every `update_ms` or when triggered, marks itself
//! active, runs one collection under a config read lock and marks itself
//! idle again. The active flag lives behind a mutex paired with a condvar,
//! so [`Collector::wait_idle`] blocks instead of spinning.
//!
//! The collection itself is pluggable through [`Collect`].

use super::messages::{CollectorCommand, CollectorView, RunRequest};
use crate::config::{ConfigManager, SharedConfig, UPDATE_MS_MIN};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::io;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The collector collaborator.
pub trait Collector: Send + Sync {
    /// Block until no collection is in progress.
    fn wait_idle(&self);

    /// Check if a collection is in progress.
    fn is_active(&self) -> bool;

    /// Run a collection cycle now.
    fn run(&self, request: RunRequest);

    /// Apply a command before the next cycle.
    fn command(&self, command: CollectorCommand);

    /// Drop collected state and start over.
    fn restart(&self);

    /// Snapshot of what the last cycle found.
    fn view(&self) -> CollectorView;
}

/// The collection work run by [`CollectorActor`].
pub trait Collect: Send + 'static {
    /// Run one cycle. Called with the config read lock held.
    fn collect(&mut self, config: &ConfigManager, request: &RunRequest) -> CollectorView;

    /// Apply a dispatcher command.
    fn apply(&mut self, command: CollectorCommand) {
        log::debug!("collector ignores {command:?}");
    }

    /// Forget all collected state.
    fn reset(&mut self) {}
}

enum Trigger {
    Run(RunRequest),
    Command(CollectorCommand),
    Restart,
    Shutdown,
}

/// Busy flag, idle condvar and the last view.
#[derive(Debug, Default)]
struct RunnerState {
    active: Mutex<bool>,
    idle: Condvar,
    view: Mutex<CollectorView>,
}

impl RunnerState {
    fn set_active(&self, active: bool) {
        let mut flag = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        *flag = active;
        if !active {
            self.idle.notify_all();
        }
    }

    fn is_active(&self) -> bool {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_idle(&self) {
        let flag = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let _idle = self
            .idle
            .wait_while(flag, |active| *active)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

/// Collector running a [`Collect`] implementation on its own thread.
#[derive(Debug)]
pub struct CollectorActor {
    handle: Option<JoinHandle<()>>,
    trigger_tx: Sender<Trigger>,
    state: Arc<RunnerState>,
}

impl CollectorActor {
    /// Spawn the collector thread. The first cycle runs immediately.
    pub fn spawn(config: SharedConfig, work: impl Collect) -> io::Result<Self> {
        let state = Arc::new(RunnerState::default());
        let (trigger_tx, trigger_rx) = unbounded();
        trigger_tx
            .send(Trigger::Run(RunRequest::all()))
            .map_err(|_| io::Error::other("collector channel closed"))?;

        let thread_state = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name("vigil-collector".to_string())
            .spawn(move || {
                Self::run_loop(&config, work, &trigger_rx, &thread_state);
            })?;

        Ok(Self {
            handle: Some(handle),
            trigger_tx,
            state,
        })
    }

    /// Signal the collector thread to stop after the current cycle.
    pub fn shutdown(&self) {
        let _ = self.trigger_tx.send(Trigger::Shutdown);
    }

    /// Stop the collector and wait for its thread.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(
        config: &SharedConfig,
        mut work: impl Collect,
        trigger_rx: &Receiver<Trigger>,
        state: &RunnerState,
    ) {
        log::info!("collector started");
        loop {
            let interval = Self::interval(config);
            let request = match trigger_rx.recv_timeout(interval) {
                Ok(Trigger::Run(request)) => request,
                Ok(Trigger::Command(command)) => {
                    let panel = command.panel();
                    work.apply(command);
                    RunRequest::panel(panel, false, true)
                }
                Ok(Trigger::Restart) => {
                    log::info!("collector restarting");
                    work.reset();
                    RunRequest::all()
                }
                Err(RecvTimeoutError::Timeout) => RunRequest {
                    force_redraw: false,
                    ..RunRequest::all()
                },
                Ok(Trigger::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            };

            state.set_active(true);
            let _idle = scopeguard::guard(state, |s| s.set_active(false));
            let view = {
                let cfg = config.read().unwrap_or_else(PoisonError::into_inner);
                work.collect(&cfg, &request)
            };
            *state.view.lock().unwrap_or_else(PoisonError::into_inner) = view;
        }
        log::info!("collector stopped");
    }

    fn interval(config: &SharedConfig) -> Duration {
        let ms = config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .int("update_ms")
            .max(UPDATE_MS_MIN);
        Duration::from_millis(ms.unsigned_abs())
    }

    fn send(&self, trigger: Trigger) {
        if self.trigger_tx.send(trigger).is_err() {
            log::warn!("collector thread is gone");
        }
    }
}

impl Collector for CollectorActor {
    fn wait_idle(&self) {
        self.state.wait_idle();
    }

    fn is_active(&self) -> bool {
        self.state.is_active()
    }

    fn run(&self, request: RunRequest) {
        self.send(Trigger::Run(request));
    }

    fn command(&self, command: CollectorCommand) {
        self.send(Trigger::Command(command));
    }

    fn restart(&self) {
        self.send(Trigger::Restart);
    }

    fn view(&self) -> CollectorView {
        self.state
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for CollectorActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{shared, ConfigManager};
    use crossbeam_channel::bounded;
    use std::time::Instant;

    /// Reports how many cycles ran and blocks each cycle until released.
    struct Gate {
        entered: Sender<RunRequest>,
        release: Receiver<()>,
        commands: Sender<CollectorCommand>,
    }

    impl Collect for Gate {
        fn collect(&mut self, _config: &ConfigManager, request: &RunRequest) -> CollectorView {
            let _ = self.entered.send(*request);
            let _ = self.release.recv_timeout(Duration::from_secs(2));
            CollectorView {
                proc_count: 42,
                ..CollectorView::default()
            }
        }

        fn apply(&mut self, command: CollectorCommand) {
            let _ = self.commands.send(command);
        }
    }

    fn gated() -> (CollectorActor, Receiver<RunRequest>, Sender<()>, Receiver<CollectorCommand>) {
        let (entered_tx, entered_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        let (command_tx, command_rx) = unbounded();
        let work = Gate {
            entered: entered_tx,
            release: release_rx,
            commands: command_tx,
        };
        let actor = CollectorActor::spawn(shared(ConfigManager::new()), work).unwrap();
        (actor, entered_rx, release_tx, command_rx)
    }

    #[test]
    fn test_first_cycle_runs_immediately() {
        let (actor, entered, release, _) = gated();
        let first = entered.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(first, RunRequest::all());
        assert!(actor.is_active());
        release.send(()).unwrap();
        actor.wait_idle();
        assert!(!actor.is_active());
        assert_eq!(actor.view().proc_count, 42);
        actor.join();
    }

    #[test]
    fn test_wait_idle_blocks_until_cycle_ends() {
        let (actor, entered, release, _) = gated();
        entered.recv_timeout(Duration::from_secs(1)).unwrap();

        let (done_tx, done_rx) = bounded(1);
        let actor = Arc::new(actor);
        let waiter = Arc::clone(&actor);
        let handle = thread::spawn(move || {
            waiter.wait_idle();
            done_tx.send(Instant::now()).unwrap();
        });

        assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());
        let released_at = Instant::now();
        release.send(()).unwrap();
        let finished_at = done_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(finished_at >= released_at);
        handle.join().unwrap();
    }

    #[test]
    fn test_commands_reach_work_before_cycle() {
        let (actor, entered, release, commands) = gated();
        entered.recv_timeout(Duration::from_secs(1)).unwrap();
        release.send(()).unwrap();

        actor.command(CollectorCommand::ToggleTree(7));
        assert_eq!(
            commands.recv_timeout(Duration::from_secs(1)).unwrap(),
            CollectorCommand::ToggleTree(7)
        );
        let request = entered.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(request.panels, crate::layout::PanelSet::PROC);
        release.send(()).unwrap();
        actor.join();
    }
}
