//! Bounded worker pool
//!
//! Stage items (exports, conversions, pulls) run on at most `jobs` scoped
//! threads. Workers take the next index from a shared counter and report
//! over a channel; results come back in input order. Once the cancel token
//! is set no new item is started.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;

/// Operator interrupt flag shared with the Ctrl+C handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run `work` over `items`. Slot `i` holds the result for `items[i]`, or
/// `None` if the item was never started because of cancellation.
pub fn run_bounded<T, R, F>(items: &[T], jobs: usize, cancel: &CancelToken, work: F) -> Vec<Option<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let mut slots: Vec<Option<R>> = items.iter().map(|_| None).collect();
    if items.is_empty() {
        return slots;
    }

    let workers = jobs.clamp(1, items.len());
    let next = AtomicUsize::new(0);
    let (tx, rx) = channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            let work = &work;
            scope.spawn(move || loop {
                if cancel.is_cancelled() {
                    break;
                }
                let index = next.fetch_add(1, Ordering::SeqCst);
                let Some(item) = items.get(index) else {
                    break;
                };
                if tx.send((index, work(item))).is_err() {
                    break;
                }
            });
        }
    });
    drop(tx);

    for (index, result) in rx {
        slots[index] = Some(result);
    }
    slots
}
