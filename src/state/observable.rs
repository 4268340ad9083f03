//! Shared state cell with an explicit subscriber list.
//!
//! DESIGN
//! ======
//! Stores keep their state here instead of in framework signals so they stay
//! testable without a reactive runtime. The app shell subscribes once and
//! mirrors every snapshot into an `RwSignal`. Subscribers run after the lock
//! is released, so they may read the cell again.

#[cfg(test)]
#[path = "observable_test.rs"]
mod observable_test;

use std::sync::{Arc, Mutex, PoisonError};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct Observable<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<Subscriber<T>>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self { value: Mutex::new(value), subscribers: Mutex::new(Vec::new()) }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.value.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Read through a borrow without cloning the whole value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Mutate in place, then notify every subscriber with the new snapshot.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut value);
            value.clone()
        };
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }

    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(f));
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
