//! The hook API handed to render functions.
//!
//! # Example
//!
//! ```ignore
//! fn counter(cx: &mut Scope) -> Node {
//!     let count = cx.use_state(|| 0);
//!     let c = count.clone();
//!     cx.use_input(move |event| {
//!         if event.key.up_arrow {
//!             c.update(|n| n + 1);
//!         }
//!     });
//!     plain(format!("Count: {}", count.get()))
//! }
//! ```
//!
//! Hooks must be called in the same order on every render. A violation is
//! reported as [`Error::HookKindMismatch`] or [`Error::HookCountMismatch`]
//! from the flush that ran the render; the hook itself hands back a
//! throwaway value so the render function can finish.

use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::pipeline::AppHandle;
use crate::primitives::Node;
use crate::reactive::{Cleanup, Memo, Runtime, Signal};
use crate::state::keyboard::{InputHandler, KeyboardEvent};

use super::instance::{ComponentInstance, ContextMap};
use super::slots::{Claim, SlotKind, SlotTag};

/// Outcome of claiming a slot for one hook call.
enum Slot<T> {
    Existing(T),
    /// First render: create the value and [`Scope::store`] it.
    New(SlotTag),
    /// A hook error is recorded for this render.
    Failed,
}

/// Render-time handle to the component being rendered.
pub struct Scope {
    instance: Rc<ComponentInstance>,
    error: Option<Error>,
}

impl Scope {
    pub(crate) fn new(instance: Rc<ComponentInstance>) -> Self {
        Self {
            instance,
            error: None,
        }
    }

    pub(crate) fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn runtime(&self) -> &Runtime {
        self.instance.runtime()
    }

    /// Name the component was mounted with.
    pub fn component_name(&self) -> &'static str {
        self.instance.name()
    }

    // =========================================================================
    // Slot plumbing
    // =========================================================================

    fn claim<T: Clone + 'static>(&mut self, kind: SlotKind) -> Slot<T> {
        if self.error.is_some() {
            return Slot::Failed;
        }
        let tag = SlotTag::of::<T>(kind);
        let claim = self.instance.table.borrow_mut().claim(tag);
        match claim {
            Ok(Claim::Existing(index)) => match self.instance.table.borrow().get::<T>(index) {
                Some(value) => Slot::Existing(value),
                None => Slot::Failed,
            },
            Ok(Claim::New(_)) => Slot::New(tag),
            Err(err) => {
                self.fail(err);
                Slot::Failed
            }
        }
    }

    fn store<T: 'static>(&mut self, tag: SlotTag, value: T, cleanup: Option<Cleanup>) {
        self.instance.table.borrow_mut().push(tag, value, cleanup);
    }

    /// Run `f` untracked, owned by the instance scope, so what it creates
    /// lives as long as the component.
    fn persistent<R>(&self, f: impl FnOnce(&Runtime) -> R) -> R {
        let rt = self.runtime();
        rt.untrack(|| rt.with_owner(self.instance.scope(), || f(rt)))
    }

    /// Run `f` untracked under a throwaway scope that is disposed right
    /// after. Used once the render has failed: handles keep their value,
    /// the graph keeps nothing.
    fn detached<R>(&self, f: impl FnOnce(&Runtime) -> R) -> R {
        let rt = self.runtime();
        let scope = rt.untrack(|| rt.create_scope());
        let value = rt.untrack(|| rt.with_owner(scope, || f(rt)));
        rt.dispose(scope);
        value
    }

    // =========================================================================
    // State
    // =========================================================================

    /// A signal that persists across renders. `init` runs on the first
    /// render only.
    pub fn use_state<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Signal<T> {
        match self.claim::<Signal<T>>(SlotKind::State) {
            Slot::Existing(signal) => signal,
            Slot::New(tag) => {
                let signal = self.persistent(|rt| rt.create_signal(init()));
                self.store(tag, signal.clone(), None);
                signal
            }
            Slot::Failed => self.detached(|rt| rt.create_signal(init())),
        }
    }

    /// A derived value created once and recomputed lazily.
    pub fn use_memo<T, F>(&mut self, compute: F) -> Memo<T>
    where
        T: PartialEq + 'static,
        F: FnMut() -> T + 'static,
    {
        match self.claim::<Memo<T>>(SlotKind::Memo) {
            Slot::Existing(memo) => memo,
            Slot::New(tag) => {
                let memo = self.persistent(|rt| rt.create_memo(compute));
                self.store(tag, memo.clone(), None);
                memo
            }
            Slot::Failed => self.detached(|rt| rt.create_memo(compute)),
        }
    }

    /// A side effect created on the first render.
    ///
    /// It runs immediately and again whenever a signal it read changes. A
    /// returned cleanup runs before the next run and when the component
    /// unmounts.
    pub fn use_effect<F>(&mut self, mut effect: F)
    where
        F: FnMut() -> Option<Cleanup> + 'static,
    {
        let Slot::New(tag) = self.claim::<()>(SlotKind::Effect) else {
            return;
        };
        let id = self.persistent(|rt| {
            let weak = rt.downgrade();
            rt.create_effect(move || {
                if let Some(cleanup) = effect() {
                    if let Some(rt) = weak.upgrade() {
                        rt.on_cleanup(cleanup);
                    }
                }
            })
        });
        let rt = self.runtime().clone();
        self.store(tag, (), Some(Box::new(move || rt.dispose(id))));
    }

    /// A plain mutable cell that persists across renders. Writes do not
    /// re-render.
    pub fn use_ref<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
        match self.claim::<Rc<RefCell<T>>>(SlotKind::Ref) {
            Slot::Existing(cell) => cell,
            Slot::New(tag) => {
                let cell = Rc::new(RefCell::new(init()));
                self.store(tag, cell.clone(), None);
                cell
            }
            Slot::Failed => Rc::new(RefCell::new(init())),
        }
    }

    // =========================================================================
    // Context
    // =========================================================================

    /// Make `value` visible to this component and its descendants. A nested
    /// provider of the same type shadows this one within its subtree.
    pub fn provide_context<T: 'static>(&mut self, value: T) {
        self.instance.provide(TypeId::of::<T>(), Rc::new(value));
    }

    /// Nearest provided value of type `T`.
    pub fn use_context<T: Clone + 'static>(&self) -> Option<T> {
        let value = self.instance.lookup(TypeId::of::<T>())?;
        value.downcast_ref::<T>().cloned()
    }

    /// The app this component is mounted in.
    pub fn use_app(&mut self) -> AppHandle {
        match self.use_context::<AppHandle>() {
            Some(app) => app,
            None => {
                self.fail(Error::MissingContext {
                    type_name: "AppHandle",
                });
                self.detached(AppHandle::detached)
            }
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Receive every key event. The closure from the most recent render is
    /// the one called, so it may capture per-render values.
    pub fn use_input<F>(&mut self, handler: F)
    where
        F: Fn(&KeyboardEvent) + 'static,
    {
        let handler: InputHandler = Rc::new(handler);
        match self.claim::<Rc<RefCell<InputHandler>>>(SlotKind::Input) {
            Slot::Existing(current) => *current.borrow_mut() = handler,
            Slot::New(tag) => {
                let Some(app) = self.use_context::<AppHandle>() else {
                    self.fail(Error::MissingContext {
                        type_name: "AppHandle",
                    });
                    return;
                };
                let current = Rc::new(RefCell::new(handler));
                let target = current.clone();
                let registry = app.input_registry();
                let id = registry.register(Rc::new(move |event: &KeyboardEvent| {
                    let handler = target.borrow().clone();
                    handler(event);
                }));
                self.store(tag, current, Some(Box::new(move || registry.unregister(id))));
            }
            Slot::Failed => {}
        }
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Mount `render` as a child component on the first render and return a
    /// node standing in for its output.
    ///
    /// Later renders reuse the mounted child and drop `render`, so pass
    /// changing data through signals. The child re-renders on its own,
    /// without re-running this component.
    pub fn child<F>(&mut self, name: &'static str, render: F) -> Node
    where
        F: FnMut(&mut Scope) -> Node + 'static,
    {
        match self.claim::<Rc<ComponentInstance>>(SlotKind::Child) {
            Slot::Existing(child) if child.name() == name => child.as_node(),
            Slot::Existing(child) => {
                let index = self.instance.table.borrow().cursor().saturating_sub(1);
                self.fail(Error::HookKindMismatch {
                    component: self.instance.name().to_string(),
                    index,
                    expected: format!("child `{}`", child.name()),
                    found: format!("child `{name}`"),
                });
                Node::empty()
            }
            Slot::New(tag) => {
                let parent = self.instance.clone();
                let mounted = self.persistent(|rt| {
                    ComponentInstance::mount(rt, name, Some(&parent), ContextMap::new(), Box::new(render))
                });
                match mounted {
                    Ok(child) => {
                        let node = child.as_node();
                        let handle = child.clone();
                        self.store(tag, child, Some(Box::new(move || handle.unmount())));
                        node
                    }
                    Err(err) => {
                        self.fail(err);
                        Node::empty()
                    }
                }
            }
            Slot::Failed => Node::empty(),
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("component", &self.instance.name())
            .finish_non_exhaustive()
    }
}
