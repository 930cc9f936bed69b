//! Test doubles for dispatcher tests.

use super::Dispatcher;
use crate::actor::{Collector, CollectorCommand, CollectorView, LayoutRenderer, RunRequest};
use crate::config::{shared, ConfigManager};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Collector that records requests instead of collecting.
#[derive(Debug, Default)]
pub struct Recorder {
    runs: Mutex<Vec<RunRequest>>,
    commands: Mutex<Vec<CollectorCommand>>,
    restarts: AtomicUsize,
    idle_waits: AtomicUsize,
    view: Mutex<CollectorView>,
}

impl Recorder {
    pub fn runs(&self) -> Vec<RunRequest> {
        self.runs.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<CollectorCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn idle_waits(&self) -> usize {
        self.idle_waits.load(Ordering::SeqCst)
    }

    pub fn set_view(&self, view: CollectorView) {
        *self.view.lock().unwrap() = view;
    }
}

impl Collector for Recorder {
    fn wait_idle(&self) {
        self.idle_waits.fetch_add(1, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        false
    }

    fn run(&self, request: RunRequest) {
        self.runs.lock().unwrap().push(request);
    }

    fn command(&self, command: CollectorCommand) {
        self.commands.lock().unwrap().push(command);
    }

    fn restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }

    fn view(&self) -> CollectorView {
        self.view.lock().unwrap().clone()
    }
}

pub type Harness = Dispatcher<LayoutRenderer, Recorder>;

/// Dispatcher over default config on an 80x24 terminal.
pub fn harness() -> Harness {
    let config = shared(ConfigManager::new());
    let renderer = LayoutRenderer::new(config.clone());
    Dispatcher::new(config, renderer, Recorder::default())
}
