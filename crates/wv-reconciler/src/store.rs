//! Local mirror of on-chain records and the single reducer that mutates it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;
use wv_api_types::{Keyed, Notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The event could not be applied locally; re-read everything.
    Refetch,
}

#[derive(Debug, Clone)]
pub enum Msg<R, E> {
    /// Result of a bulk read.
    Snapshot(Vec<R>),
    Event(E),
}

/// How one contract event changes the record list.
pub trait Reduce<R: Keyed> {
    fn reduce(self, records: &mut Records<R>) -> Effect;

    fn notice(&self) -> Option<Notification> {
        None
    }
}

/// Ordered records. Events never add a second record for a key; a bulk
/// read is kept as the contract returned it, identical entries included.
pub struct Records<R: Keyed> {
    items: Vec<R>,
    // First position of each key.
    index: HashMap<R::Key, usize>,
    // Inserted or changed by events and not yet seen in a snapshot.
    unconfirmed: Vec<R::Key>,
}

impl<R: Keyed> Default for Records<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            unconfirmed: Vec::new(),
        }
    }
}

impl<R> Records<R>
where
    R: Keyed + Clone,
{
    pub fn as_slice(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &R::Key) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    /// Appends `record` unless a record with the same key exists.
    pub fn insert_if_absent(&mut self, record: R) -> bool {
        let key = record.key();
        if self.index.contains_key(&key) {
            debug!("ignoring duplicate record {:?}", key);
            return false;
        }
        self.index.insert(key.clone(), self.items.len());
        self.items.push(record);
        self.mark(key);
        true
    }

    pub fn update<F>(&mut self, key: &R::Key, f: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        match self.index.get(key) {
            Some(&i) => {
                f(&mut self.items[i]);
                self.mark(key.clone());
                true
            }
            None => false,
        }
    }

    /// Takes the bulk read as the new base list. Records that events
    /// touched since the last snapshot are folded into the snapshot's copy
    /// via [`Keyed::absorb`], or kept after it, in arrival order, when the
    /// read started before they were written.
    pub fn replace_with_snapshot(&mut self, snapshot: Vec<R>) {
        let previous = std::mem::take(&mut self.items);
        let mut pending = std::mem::take(&mut self.unconfirmed);
        self.index.clear();

        for record in snapshot {
            self.index.entry(record.key()).or_insert(self.items.len());
            self.items.push(record);
        }

        for record in previous {
            let key = record.key();
            let Some(pos) = pending.iter().position(|k| *k == key) else {
                continue;
            };
            pending.swap_remove(pos);

            match self.index.get(&key) {
                Some(&i) => self.items[i].absorb(&record),
                None => {
                    self.index.insert(key.clone(), self.items.len());
                    self.items.push(record);
                    self.unconfirmed.push(key);
                }
            }
        }
    }

    fn mark(&mut self, key: R::Key) {
        if !self.unconfirmed.contains(&key) {
            self.unconfirmed.push(key);
        }
    }
}

/// Shared store; every mutation goes through `dispatch`.
pub struct Store<R: Keyed> {
    records: RefCell<Records<R>>,
    version: Cell<u64>,
    observers: RefCell<Vec<Rc<dyn Fn()>>>,
}

impl<R: Keyed> Default for Store<R> {
    fn default() -> Self {
        Self {
            records: RefCell::new(Records::default()),
            version: Cell::new(0),
            observers: RefCell::new(Vec::new()),
        }
    }
}

impl<R> Store<R>
where
    R: Keyed + Clone,
{
    pub fn dispatch<E>(&self, msg: Msg<R, E>) -> Effect
    where
        E: Reduce<R>,
    {
        let effect = {
            let mut records = self.records.borrow_mut();
            match msg {
                Msg::Snapshot(snapshot) => {
                    records.replace_with_snapshot(snapshot);
                    Effect::None
                }
                Msg::Event(event) => event.reduce(&mut records),
            }
        };

        self.version.set(self.version.get() + 1);
        self.notify();
        effect
    }

    pub fn snapshot(&self) -> Vec<R> {
        self.records.borrow().as_slice().to_vec()
    }

    pub fn with<T>(&self, f: impl FnOnce(&Records<R>) -> T) -> T {
        f(&self.records.borrow())
    }

    /// Bumped on every dispatch.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn observe(&self, observer: impl Fn() + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    fn notify(&self) {
        let observers: Vec<Rc<dyn Fn()>> = self.observers.borrow().clone();
        for observer in observers {
            observer();
        }
    }
}
