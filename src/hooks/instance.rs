//! Mounted component instances.
//!
//! An instance owns a reactive scope, a hook table and a render effect.
//! The render effect re-invokes the component's render function whenever a
//! signal it read changes, and publishes the returned tree through the
//! instance's `output` signal. Hook-created nodes are owned by the scope,
//! not the render effect, so they survive re-renders.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::primitives::{ComponentRef, Node};
use crate::reactive::{NodeId, Phase, Runtime, Signal};

use super::scope::Scope;
use super::slots::HookTable;

/// A component's render function.
pub type RenderFn = Box<dyn FnMut(&mut Scope) -> Node>;

/// Type-keyed context values provided by one instance.
pub(crate) type ContextMap = HashMap<TypeId, Rc<dyn Any>>;

pub(crate) struct ComponentInstance {
    name: &'static str,
    runtime: Runtime,
    scope: NodeId,
    render_effect: Cell<Option<NodeId>>,
    pub(crate) table: RefCell<HookTable>,
    output: Signal<Node>,
    contexts: RefCell<ContextMap>,
    parent: Option<Weak<ComponentInstance>>,
    disposed: Cell<bool>,
}

impl ComponentInstance {
    /// Mount a component under the runtime's current owner and render it
    /// once. On a failed first render the instance is unmounted again.
    pub(crate) fn mount(
        runtime: &Runtime,
        name: &'static str,
        parent: Option<&Rc<ComponentInstance>>,
        contexts: ContextMap,
        mut render: RenderFn,
    ) -> Result<Rc<Self>> {
        let scope = runtime.create_scope();
        let output = runtime.with_owner(scope, || runtime.create_signal(Node::empty()));
        let instance = Rc::new(Self {
            name,
            runtime: runtime.clone(),
            scope,
            render_effect: Cell::new(None),
            table: RefCell::new(HookTable::new(name)),
            output,
            contexts: RefCell::new(contexts),
            parent: parent.map(Rc::downgrade),
            disposed: Cell::new(false),
        });

        let weak = Rc::downgrade(&instance);
        let (effect, first) = runtime.with_owner(scope, || {
            runtime.create_effect_with(
                Phase::Component,
                Box::new(move || match weak.upgrade() {
                    Some(instance) => instance.render_once(&mut render),
                    None => Ok(()),
                }),
            )
        });
        instance.render_effect.set(Some(effect));

        match first {
            Ok(()) => {
                tracing::debug!(component = name, hooks = instance.table.borrow().len(), "mounted");
                Ok(instance)
            }
            Err(err) => {
                instance.unmount();
                Err(err)
            }
        }
    }

    fn render_once(self: &Rc<Self>, render: &mut RenderFn) -> Result<()> {
        if self.disposed.get() {
            return Ok(());
        }
        self.table.borrow_mut().begin_render();

        let mut cx = Scope::new(self.clone());
        let node = self.runtime.with_owner(self.scope, || render(&mut cx));
        if let Some(err) = cx.take_error() {
            tracing::warn!(component = self.name, error = %err, "render failed");
            return Err(err);
        }
        if let Err(err) = self.table.borrow_mut().finish_render() {
            tracing::warn!(component = self.name, error = %err, "render failed");
            return Err(err);
        }

        tracing::trace!(component = self.name, "rendered");
        self.output.replace(node);
        Ok(())
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub(crate) fn scope(&self) -> NodeId {
        self.scope
    }

    pub(crate) fn is_mounted(&self) -> bool {
        !self.disposed.get()
    }

    /// Latest render output, untracked.
    pub(crate) fn output(&self) -> Node {
        self.output.get_untracked()
    }

    /// Placeholder node that substitutes this instance's output.
    pub(crate) fn as_node(&self) -> Node {
        Node::Component(ComponentRef::new(self.name, self.output.clone()))
    }

    pub(crate) fn provide(&self, key: TypeId, value: Rc<dyn Any>) {
        self.contexts.borrow_mut().insert(key, value);
    }

    /// Nearest value for `key`, starting at this instance.
    pub(crate) fn lookup(&self, key: TypeId) -> Option<Rc<dyn Any>> {
        if let Some(value) = self.contexts.borrow().get(&key) {
            return Some(value.clone());
        }
        let mut current = self.parent.as_ref().and_then(Weak::upgrade);
        while let Some(instance) = current {
            if let Some(value) = instance.contexts.borrow().get(&key) {
                return Some(value.clone());
            }
            current = instance.parent.as_ref().and_then(Weak::upgrade);
        }
        None
    }

    /// Run slot cleanups newest first, then release the scope.
    ///
    /// Idempotent; cleanups run exactly once.
    pub(crate) fn unmount(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let cleanups = self.table.borrow_mut().drain_cleanups();
        let count = cleanups.len();
        self.runtime.untrack(|| {
            for cleanup in cleanups {
                cleanup();
            }
        });
        self.runtime.dispose(self.scope);
        self.render_effect.set(None);
        self.contexts.borrow_mut().clear();
        tracing::debug!(component = self.name, cleanups = count, "unmounted");
    }
}

impl Drop for ComponentInstance {
    fn drop(&mut self) {
        self.unmount();
    }
}
