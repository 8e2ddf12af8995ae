//! Cached derived values.
//!
//! A memo is computed on first read and afterwards only when read while
//! stale. Downstream effects are notified only when the recomputed value
//! differs from the cached one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::arena::NodeId;
use super::runtime::{MemoFn, Runtime, WeakRuntime};

pub struct Memo<T> {
    id: NodeId,
    value: Rc<RefCell<Option<T>>>,
    compute: Rc<RefCell<dyn FnMut() -> T>>,
    runtime: WeakRuntime,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: self.value.clone(),
            compute: self.compute.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("id", &self.id)
            .field("value", &*self.value.borrow())
            .finish()
    }
}

impl Runtime {
    /// Create a lazily evaluated derived value.
    pub fn create_memo<T, F>(&self, f: F) -> Memo<T>
    where
        T: PartialEq + 'static,
        F: FnMut() -> T + 'static,
    {
        let value: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));
        let compute: Rc<RefCell<dyn FnMut() -> T>> = Rc::new(RefCell::new(f));

        let slot = value.clone();
        let body = compute.clone();
        let recompute: MemoFn = Box::new(move || {
            let next = (body.borrow_mut())();
            let mut current = slot.borrow_mut();
            if current.as_ref() == Some(&next) {
                return false;
            }
            *current = Some(next);
            true
        });

        Memo {
            id: self.insert_memo(recompute),
            value,
            compute,
            runtime: self.downgrade(),
        }
    }
}

impl<T: 'static> Memo<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Borrow the current value, recomputing first if stale.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        if let Some(rt) = self.runtime.upgrade() {
            if rt.is_alive(self.id) {
                rt.refresh_memo(self.id);
                rt.track(self.id);
            }
        }

        let cached = self.value.borrow();
        if let Some(value) = cached.as_ref() {
            return f(value);
        }
        drop(cached);

        // Disposed before its first read: compute once, untracked.
        let value = (self.compute.borrow_mut())();
        let result = f(&value);
        *self.value.borrow_mut() = Some(value);
        result
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        match self.runtime.upgrade() {
            Some(rt) => rt.untrack(|| self.get()),
            None => self.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_memo_is_lazy_and_cached() {
        let rt = Runtime::new();
        let sig = rt.create_signal(2);
        let computed = Rc::new(Cell::new(0));

        let (s, c) = (sig.clone(), computed.clone());
        let doubled = rt.create_memo(move || {
            c.set(c.get() + 1);
            s.get() * 2
        });
        assert_eq!(computed.get(), 0);

        assert_eq!(doubled.get(), 4);
        assert_eq!(doubled.get(), 4);
        assert_eq!(computed.get(), 1);

        sig.set(3);
        assert_eq!(computed.get(), 1, "stale memo waits for a read");
        assert_eq!(doubled.get(), 6);
        assert_eq!(computed.get(), 2);
    }

    #[test]
    fn test_unchanged_memo_skips_downstream_effect() {
        let rt = Runtime::new();
        let sig = rt.create_signal(3);
        let s = sig.clone();
        let parity = rt.create_memo(move || s.get() % 2);
        let runs = Rc::new(Cell::new(0));

        let (p, r) = (parity.clone(), runs.clone());
        rt.create_effect(move || {
            p.get();
            r.set(r.get() + 1);
        });

        sig.set(5);
        assert_eq!(runs.get(), 1, "parity unchanged");
        sig.set(6);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_memo_chain_propagates() {
        let rt = Runtime::new();
        let sig = rt.create_signal(1);
        let s = sig.clone();
        let plus_one = rt.create_memo(move || s.get() + 1);
        let p = plus_one.clone();
        let times_ten = rt.create_memo(move || p.get() * 10);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let (t, log) = (times_ten.clone(), seen.clone());
        rt.create_effect(move || log.borrow_mut().push(t.get()));

        sig.set(4);
        assert_eq!(*seen.borrow(), vec![20, 50]);
    }
}
