//! Freed-space tracking and the background status line.
//!
//! [`ProgressState`] is written only by whichever path is currently deleting
//! (the cache purge, then the batch deleter) and read by the reporter thread.
//! Deleters send an update after every deletion; the reporter also redraws
//! on a fixed interval. Dropping every sender tells the reporter to
//! draw one last time and exit, and [`ProgressReporter::finish`] waits for it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::scanner::format_size;

/// Cumulative totals shared between the deleting path and the reporter.
#[derive(Debug)]
pub struct ProgressState {
    freed_bytes: AtomicU64,
    deletions: AtomicU64,
    started: Instant,
}

impl ProgressState {
    pub fn new() -> Self {
        Self {
            freed_bytes: AtomicU64::new(0),
            deletions: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one deletion event (a batch or a cache directory).
    pub fn record_deletion(&self, bytes: u64) {
        self.freed_bytes.fetch_add(bytes, Ordering::SeqCst);
        self.deletions.fetch_add(1, Ordering::SeqCst);
    }

    pub fn freed_bytes(&self) -> u64 {
        self.freed_bytes.load(Ordering::SeqCst)
    }

    pub fn deletions(&self) -> u64 {
        self.deletions.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn status_line(&self) -> String {
        format!(
            "Freed space: {}      Time elapsed: {}s",
            format_size(self.freed_bytes()),
            self.elapsed().as_secs()
        )
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle given to deleters: raises events and keeps other output from
/// tearing the status line.
#[derive(Clone)]
pub struct ProgressNotifier {
    events: Sender<()>,
    bar: ProgressBar,
}

impl ProgressNotifier {
    pub fn notify(&self) {
        // A gone reporter only means nobody is watching.
        let _ = self.events.send(());
    }

    /// Run `f` with the status line cleared, e.g. to print or prompt.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }
}

/// Background status line, redrawn on events and every `interval`.
pub struct ProgressReporter {
    events: Option<Sender<()>>,
    bar: ProgressBar,
    handle: Option<JoinHandle<u64>>,
}

impl ProgressReporter {
    /// Spawn the reporter thread drawing to `target`.
    pub fn start(
        state: Arc<ProgressState>,
        interval: Duration,
        target: ProgressDrawTarget,
    ) -> Self {
        Self::spawn(state, interval, target, false)
    }

    /// Spawn the reporter thread drawing to stdout.
    ///
    /// When stdout is not a terminal nothing is redrawn, but the final status
    /// line is still printed as a plain line.
    pub fn start_on_stdout(state: Arc<ProgressState>, interval: Duration) -> Self {
        Self::spawn(state, interval, ProgressDrawTarget::stdout(), true)
    }

    fn spawn(
        state: Arc<ProgressState>,
        interval: Duration,
        target: ProgressDrawTarget,
        plain_fallback: bool,
    ) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        let print_plain = plain_fallback && bar.is_hidden();
        let style = ProgressStyle::with_template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);

        let (tx, rx) = mpsc::channel();
        let thread_bar = bar.clone();

        let handle = thread::spawn(move || {
            let mut draws = 0u64;
            let mut next_tick = Instant::now() + interval;

            thread_bar.set_message(state.status_line());

            loop {
                let wait = next_tick.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(()) => {}
                    Err(RecvTimeoutError::Timeout) => next_tick += interval,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                thread_bar.set_message(state.status_line());
                draws += 1;
            }

            let last = state.status_line();
            tracing::debug!("{}", last);
            thread_bar.finish_with_message(last.clone());
            if print_plain {
                println!("{}", last);
            }
            draws + 1
        });

        Self {
            events: Some(tx),
            bar,
            handle: Some(handle),
        }
    }

    pub fn notifier(&self) -> ProgressNotifier {
        ProgressNotifier {
            // `events` is only taken by `finish`, which consumes self.
            events: self.events.clone().unwrap_or_else(|| mpsc::channel().0),
            bar: self.bar.clone(),
        }
    }

    /// Close the event channel and wait for the final status line.
    ///
    /// Every [`ProgressNotifier`] must already be dropped, otherwise this
    /// blocks until they are. Returns the number of redraws performed.
    pub fn finish(mut self) -> u64 {
        self.events.take();
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_reporter(interval: Duration) -> (Arc<ProgressState>, ProgressReporter) {
        let state = Arc::new(ProgressState::new());
        let reporter =
            ProgressReporter::start(Arc::clone(&state), interval, ProgressDrawTarget::hidden());
        (state, reporter)
    }

    #[test]
    fn test_record_deletion_accumulates() {
        let state = ProgressState::new();
        state.record_deletion(1024);
        state.record_deletion(512);

        assert_eq!(state.freed_bytes(), 1536);
        assert_eq!(state.deletions(), 2);
    }

    #[test]
    fn test_status_line_format() {
        let state = ProgressState::new();
        state.record_deletion(1536);

        let line = state.status_line();
        assert!(line.starts_with("Freed space: 1.50 KB"));
        assert!(line.contains("Time elapsed: 0s"));
    }

    #[test]
    fn test_finish_without_events_draws_final_line() {
        let (_state, reporter) = hidden_reporter(Duration::from_secs(60));
        assert_eq!(reporter.finish(), 1);
    }

    #[test]
    fn test_each_event_triggers_a_redraw() {
        let (state, reporter) = hidden_reporter(Duration::from_secs(60));
        let notifier = reporter.notifier();

        for _ in 0..3 {
            state.record_deletion(10);
            notifier.notify();
        }
        drop(notifier);

        // three event redraws plus the final line
        assert_eq!(reporter.finish(), 4);
        assert_eq!(state.freed_bytes(), 30);
    }

    #[test]
    fn test_timer_redraws_without_events() {
        let (_state, reporter) = hidden_reporter(Duration::from_millis(10));
        thread::sleep(Duration::from_millis(100));

        assert!(reporter.finish() >= 3);
    }

    #[test]
    fn test_stdout_reporter_finishes_without_a_terminal() {
        // test output is captured, so stdout is never a terminal here
        let state = Arc::new(ProgressState::new());
        let reporter =
            ProgressReporter::start_on_stdout(Arc::clone(&state), Duration::from_secs(60));
        state.record_deletion(2048);

        assert_eq!(reporter.finish(), 1);
    }

    #[test]
    fn test_suspend_returns_closure_value() {
        let (_state, reporter) = hidden_reporter(Duration::from_secs(60));
        let notifier = reporter.notifier();

        assert_eq!(notifier.suspend(|| 7), 7);
        drop(notifier);
        reporter.finish();
    }
}
