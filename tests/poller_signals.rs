//! Poller behaviour under process signals.
//!
//! Signal handlers are process wide, so these tests live in their own binary
//! and take a lock to run one at a time.

#![allow(unsafe_code)]

use signal_hook::consts::{SIGUSR1, SIGUSR2, SIGWINCH};
use signal_hook::low_level::raise;
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use vigil::input::Interrupter;
use vigil::{Poller, Timeout};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn pair() -> (UnixStream, Poller<UnixStream>) {
    let (tx, rx) = UnixStream::pair().unwrap();
    rx.set_nonblocking(true).unwrap();
    (tx, Poller::new(rx).unwrap())
}

/// Run `action` on a helper thread once the poller is waiting.
fn once_polling(
    interrupter: Interrupter,
    action: impl FnOnce() + Send + 'static,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !interrupter.is_polling() {
            thread::sleep(Duration::from_millis(1));
        }
        thread::sleep(Duration::from_millis(20));
        action();
    })
}

#[test]
fn test_resize_signal_ends_wait() {
    let _serial = serial();
    let (_tx, mut poller) = pair();
    let helper = once_polling(poller.interrupter(), || raise(SIGWINCH).unwrap());

    assert!(!poller.poll(Timeout::Infinite).unwrap());
    helper.join().unwrap();
    assert!(poller.take_resized());
    assert!(!poller.take_resized());

    // Later waits are unaffected.
    assert!(!poller.poll(Timeout::Millis(20)).unwrap());
    assert!(!poller.take_resized());
}

#[test]
fn test_usr1_interrupts_wait() {
    let _serial = serial();
    let (_tx, mut poller) = pair();
    let helper = once_polling(poller.interrupter(), || raise(SIGUSR1).unwrap());

    assert!(!poller.poll(Timeout::Infinite).unwrap());
    helper.join().unwrap();
    assert!(!poller.take_resized());
}

#[test]
fn test_unrelated_signal_resumes_wait() {
    let _serial = serial();
    let (_tx, mut poller) = pair();
    let caught = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGUSR2, Arc::clone(&caught)).unwrap();

    // Deliver to the polling thread so the wait itself sees EINTR.
    let target = unsafe { libc::pthread_self() };
    let helper = once_polling(poller.interrupter(), move || unsafe {
        libc::pthread_kill(target, SIGUSR2);
    });

    let start = Instant::now();
    assert!(!poller.poll(Timeout::Millis(200)).unwrap());
    helper.join().unwrap();
    assert!(caught.load(Ordering::SeqCst));
    assert!(start.elapsed() >= Duration::from_millis(190));
    assert!(!poller.take_resized());
}
