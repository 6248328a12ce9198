//! Background dataset loading.
//!
//! One worker thread owns the data source; the UI thread requests categories
//! and polls outcomes between input events. Communication is via `mpsc`
//! channels.
//!
//! Every request carries a generation number from a monotonically increasing
//! counter. Only the outcome of the *latest* generation may publish: switching
//! categories mid-fetch supersedes the older request, and its result is
//! discarded on arrival instead of overwriting newer state. The worker also
//! collapses a backlog of queued requests down to the newest one, so
//! superseded fetches are skipped entirely when they have not started yet.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::app::pipeline::load_dataset;
use crate::data::DataSource;
use crate::domain::{Category, Dataset};
use crate::error::AppError;

enum Command {
    Load { generation: u64, category: Category },
    Shutdown,
}

/// A publishable load result.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        category: Category,
        dataset: Dataset,
    },
    /// The fetch or parse failed. Prior dataset state is left untouched; the
    /// caller only surfaces the error.
    Failed {
        category: Category,
        error: AppError,
    },
}

struct Reply {
    generation: u64,
    outcome: LoadOutcome,
}

pub struct Loader {
    tx: Sender<Command>,
    rx: Receiver<Reply>,
    latest: u64,
    answered: u64,
    handle: Option<JoinHandle<()>>,
}

impl Loader {
    pub fn spawn(source: Box<dyn DataSource>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("mdash-loader".into())
            .spawn(move || worker_loop(source, cmd_rx, reply_tx))
            .expect("failed to spawn loader thread");
        Self {
            tx: cmd_tx,
            rx: reply_rx,
            latest: 0,
            answered: 0,
            handle: Some(handle),
        }
    }

    /// Request a (re)load. Any in-flight request is superseded.
    pub fn request(&mut self, category: &Category) {
        self.latest += 1;
        let _ = self.tx.send(Command::Load {
            generation: self.latest,
            category: *category,
        });
    }

    /// Next publishable outcome, if any.
    ///
    /// Superseded outcomes are dropped here and never reach the caller; the
    /// drain continues so a stale reply sitting in front of the current one
    /// cannot delay it.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        loop {
            match self.rx.try_recv() {
                Ok(reply) => {
                    self.answered = self.answered.max(reply.generation);
                    if reply.generation == self.latest {
                        return Some(reply.outcome);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// True while the latest request has not been answered. A stale arrival
    /// never clears this early.
    pub fn in_flight(&self) -> bool {
        self.answered < self.latest
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(source: Box<dyn DataSource>, rx: Receiver<Command>, tx: Sender<Reply>) {
    loop {
        let mut cmd = match rx.recv() {
            Ok(cmd) => cmd,
            Err(_) => break,
        };

        // Collapse the backlog: only the most recent command still matters.
        while let Ok(next) = rx.try_recv() {
            cmd = next;
        }

        match cmd {
            Command::Shutdown => break,
            Command::Load {
                generation,
                category,
            } => {
                let outcome = match load_dataset(source.as_ref(), &category) {
                    Ok(dataset) => LoadOutcome::Loaded { category, dataset },
                    Err(error) => LoadOutcome::Failed { category, error },
                };
                if tx.send(Reply { generation, outcome }).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CATEGORIES;
    use crate::domain::Record;
    use std::sync::{Arc, Condvar, Mutex};
    use std::time::{Duration, Instant};

    /// Source that logs fetches and can hold the first fetch open until the
    /// test releases it, so "switch category mid-fetch" is deterministic.
    struct StubSource {
        log: Arc<Mutex<Vec<String>>>,
        gate: Option<Arc<(Mutex<bool>, Condvar)>>,
    }

    impl DataSource for StubSource {
        fn fetch(&self, category: &Category) -> Result<Vec<Record>, AppError> {
            self.log.lock().unwrap().push(category.key.to_string());
            if let Some(gate) = &self.gate {
                let (lock, cvar) = gate.as_ref();
                let mut released = lock.lock().unwrap();
                while !*released {
                    released = cvar.wait(released).unwrap();
                }
            }
            let date = "2024-01-01".parse().unwrap();
            Ok(vec![Record::new(
                date,
                vec![(category.key.to_lowercase(), Some(1.0))],
            )])
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    fn open_gate(gate: &Arc<(Mutex<bool>, Condvar)>) {
        let (lock, cvar) = gate.as_ref();
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    /// Block until the stub has started fetching `n` times.
    fn wait_for_fetches(log: &Arc<Mutex<Vec<String>>>, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if log.lock().unwrap().len() >= n {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("stub never started fetch #{n}");
    }

    struct FailingSource;

    impl DataSource for FailingSource {
        fn fetch(&self, _category: &Category) -> Result<Vec<Record>, AppError> {
            Err(AppError::data("host unreachable"))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn poll_until(loader: &mut Loader, timeout: Duration) -> Option<LoadOutcome> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(outcome) = loader.poll() {
                return Some(outcome);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn loads_publish_for_the_requested_category() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut loader = Loader::spawn(Box::new(StubSource { log, gate: None }));

        loader.request(&CATEGORIES[0]);
        assert!(loader.in_flight());

        let outcome = poll_until(&mut loader, Duration::from_secs(2)).expect("load completes");
        match outcome {
            LoadOutcome::Loaded { category, dataset } => {
                assert_eq!(category.key, CATEGORIES[0].key);
                assert_eq!(dataset.len(), 1);
            }
            LoadOutcome::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
        assert!(!loader.in_flight());
    }

    #[test]
    fn stale_results_never_publish() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        let mut loader = Loader::spawn(Box::new(StubSource {
            log: Arc::clone(&log),
            gate: Some(Arc::clone(&gate)),
        }));

        loader.request(&CATEGORIES[0]);
        // Wait until the first fetch is in progress, then supersede it.
        wait_for_fetches(&log, 1);
        loader.request(&CATEGORIES[1]);
        open_gate(&gate);

        let outcome = poll_until(&mut loader, Duration::from_secs(2)).expect("load completes");
        match outcome {
            LoadOutcome::Loaded { category, .. } => assert_eq!(category.key, CATEGORIES[1].key),
            LoadOutcome::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
        assert!(!loader.in_flight());
        // Nothing else may publish afterwards.
        assert!(poll_until(&mut loader, Duration::from_millis(100)).is_none());
    }

    #[test]
    fn backlogged_requests_collapse_to_the_newest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        let mut loader = Loader::spawn(Box::new(StubSource {
            log: Arc::clone(&log),
            gate: Some(Arc::clone(&gate)),
        }));

        loader.request(&CATEGORIES[0]);
        wait_for_fetches(&log, 1);
        // Two more requests queue up while the first fetch is held open; the
        // worker must collapse them down to the newest.
        loader.request(&CATEGORIES[1]);
        loader.request(&CATEGORIES[2]);
        open_gate(&gate);

        let outcome = poll_until(&mut loader, Duration::from_secs(2)).expect("load completes");
        match outcome {
            LoadOutcome::Loaded { category, .. } => assert_eq!(category.key, CATEGORIES[2].key),
            LoadOutcome::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }

        // The middle request was superseded before it started; it must not
        // have been fetched at all.
        let fetched = log.lock().unwrap().clone();
        assert!(!fetched.contains(&CATEGORIES[1].key.to_string()));
    }

    #[test]
    fn failures_surface_and_clear_the_loading_state() {
        let mut loader = Loader::spawn(Box::new(FailingSource));
        loader.request(&CATEGORIES[0]);

        let outcome = poll_until(&mut loader, Duration::from_secs(2)).expect("failure surfaces");
        match outcome {
            LoadOutcome::Failed { category, error } => {
                assert_eq!(category.key, CATEGORIES[0].key);
                assert_eq!(error.exit_code(), 4);
            }
            LoadOutcome::Loaded { .. } => panic!("expected a failure"),
        }
        assert!(!loader.in_flight());
    }

    #[test]
    fn loader_shuts_down_cleanly() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let loader = Loader::spawn(Box::new(StubSource { log, gate: None }));
        // Drop sends Shutdown and joins the worker.
        drop(loader);
    }
}
