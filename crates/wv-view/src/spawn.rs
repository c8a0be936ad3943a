use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs follow-up work (re-reads requested by events) on the page's
/// single-threaded executor.
pub trait Spawner {
    fn spawn(&self, task: LocalTask);
}

/// Holds tasks until the test drives them with `run_all`.
#[derive(Default)]
pub struct QueueSpawner {
    queue: RefCell<VecDeque<LocalTask>>,
}

impl QueueSpawner {
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs queued tasks in spawn order, including any they spawn.
    pub async fn run_all(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl Spawner for QueueSpawner {
    fn spawn(&self, task: LocalTask) {
        self.queue.borrow_mut().push_back(task);
    }
}
