//! Writable reactive cells.
//!
//! The value lives in the handle (`Rc<RefCell<T>>`); the runtime only knows
//! the node id and its edges. A handle outlives its node: after disposal
//! reads still return the last value, they just stop tracking.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::arena::NodeId;
use super::runtime::{Runtime, WeakRuntime};

/// A readable, writable reactive value.
pub struct Signal<T> {
    id: NodeId,
    value: Rc<RefCell<T>>,
    runtime: WeakRuntime,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: self.value.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &*self.value.borrow())
            .finish()
    }
}

impl Runtime {
    /// Create a signal owned by the current owner.
    pub fn create_signal<T: 'static>(&self, initial: T) -> Signal<T> {
        let id = self.insert_signal();
        Signal {
            id,
            value: Rc::new(RefCell::new(initial)),
            runtime: self.downgrade(),
        }
    }

    /// Create a signal and split it into read and write halves.
    pub fn create_signal_pair<T: 'static>(&self, initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
        self.create_signal(initial).split()
    }
}

impl<T: 'static> Signal<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn track(&self) {
        if let Some(rt) = self.runtime.upgrade() {
            rt.track(self.id);
        }
    }

    fn notify(&self) {
        if let Some(rt) = self.runtime.upgrade() {
            if rt.is_alive(self.id) {
                rt.notify(self.id);
            }
        }
    }

    /// Read and subscribe the running computation.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.track();
        self.value.borrow().clone()
    }

    /// Read without subscribing.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Borrow the value and subscribe.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.value.borrow())
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Store `value`; dependents are notified only if it differs.
    pub fn set(&self, value: T)
    where
        T: PartialEq,
    {
        if *self.value.borrow() == value {
            return;
        }
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Replace the value with `f(current)`, equality-gated like [`set`](Self::set).
    pub fn update(&self, f: impl FnOnce(&T) -> T)
    where
        T: PartialEq,
    {
        let next = f(&self.value.borrow());
        self.set(next);
    }

    /// Mutate in place. Always notifies.
    pub fn update_in_place(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.value.borrow_mut());
        self.notify();
    }

    /// Swap in a new value and return the old one. Always notifies.
    pub fn replace(&self, value: T) -> T {
        let old = std::mem::replace(&mut *self.value.borrow_mut(), value);
        self.notify();
        old
    }

    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (ReadSignal(self.clone()), WriteSignal(self))
    }

    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal(self.clone())
    }
}

// =============================================================================
// Split halves
// =============================================================================

/// Read half of a signal.
pub struct ReadSignal<T>(Signal<T>);

/// Write half of a signal.
pub struct WriteSignal<T>(Signal<T>);

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.get_untracked()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }
}

impl<T: 'static> WriteSignal<T> {
    pub fn set(&self, value: T)
    where
        T: PartialEq,
    {
        self.0.set(value)
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T)
    where
        T: PartialEq,
    {
        self.0.update(f)
    }

    pub fn update_in_place(&self, f: impl FnOnce(&mut T)) {
        self.0.update_in_place(f)
    }

    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_update_is_equality_gated() {
        let rt = Runtime::new();
        let sig = rt.create_signal(vec![1, 2]);
        let runs = Rc::new(Cell::new(0));

        let (s, r) = (sig.clone(), runs.clone());
        rt.create_effect(move || {
            s.with(|v| v.len());
            r.set(r.get() + 1);
        });

        sig.update(|v| v.clone());
        assert_eq!(runs.get(), 1);
        sig.update(|v| v.iter().map(|x| x * 2).collect());
        assert_eq!(runs.get(), 2);
        sig.update_in_place(|v| v.push(3));
        assert_eq!(runs.get(), 3);
        assert_eq!(sig.get_untracked(), vec![2, 4, 3]);
    }

    #[test]
    fn test_split_halves_share_value() {
        let rt = Runtime::new();
        let (read, write) = rt.create_signal_pair(String::from("a"));
        write.set("b".into());
        assert_eq!(read.get_untracked(), "b");
        assert_eq!(write.replace("c".into()), "b");
        assert_eq!(read.with(|s| s.len()), 1);
    }

    #[test]
    fn test_disposed_signal_keeps_last_value() {
        let rt = Runtime::new();
        let sig = rt.create_signal(7);
        rt.dispose(sig.id());
        sig.set(8);
        assert_eq!(sig.get(), 8);
        assert!(!rt.is_alive(sig.id()));
    }
}
