//! Reactive runtime: dependency graph plus scheduler.
//!
//! Every signal, memo, effect and ownership scope is a node in one arena.
//! Edges are plain [`NodeId`] lists on both ends (`sources` / `subscribers`),
//! so unsubscribing or disposing is an explicit id removal.
//!
//! # Propagation
//!
//! 1. A signal write marks its direct subscribers `Dirty` and everything
//!    further down `Check`. A `Check` memo or effect only recomputes after
//!    one of its memo sources actually produced a new value.
//! 2. Dirty and checked effects are queued once (the `queued` flag dedupes).
//! 3. Outside a batch the write flushes immediately; inside a batch the flush
//!    happens once, when the outermost batch exits.
//!
//! # Flush
//!
//! A flush runs in passes. Each pass takes the queued effects of the lowest
//! pending [`Phase`], sorts them by creation order and runs each one at most
//! once. Owners always exist before the effects they create, so creation
//! order puts parents before children; unrelated siblings keep registration
//! order. Writes made while a pass runs are queued for the next pass of the
//! same flush. More than `max_update_depth` passes aborts the flush with
//! [`Error::TooManyUpdates`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};

use super::arena::{Arena, NodeId};

/// Cleanup callback registered on an owner.
pub type Cleanup = Box<dyn FnOnce()>;

pub(crate) type EffectFn = Box<dyn FnMut() -> Result<()>>;
pub(crate) type MemoFn = Box<dyn FnMut() -> bool>;

// =============================================================================
// Node types
// =============================================================================

/// Scheduling phase of an effect.
///
/// All queued `Component` effects (component renders, user effects) settle
/// before any `Render` effect runs, so the frame is painted once per flush
/// from a consistent tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Phase {
    #[default]
    Component,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Signal,
    Memo,
    Effect,
    Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NodeState {
    Clean,
    Check,
    Dirty,
}

enum Computation {
    Effect(EffectFn),
    Memo(MemoFn),
}

struct ReactiveNode {
    kind: NodeKind,
    state: NodeState,
    phase: Phase,
    order: u64,
    queued: bool,
    sources: Vec<NodeId>,
    subscribers: Vec<NodeId>,
    owner: Option<NodeId>,
    owned: Vec<NodeId>,
    cleanups: Vec<Cleanup>,
    computation: Option<Computation>,
}

// =============================================================================
// Runtime
// =============================================================================

pub(crate) struct RuntimeInner {
    config: RuntimeConfig,
    nodes: RefCell<Arena<ReactiveNode>>,
    observer: Cell<Option<NodeId>>,
    owner: Cell<Option<NodeId>>,
    batch_depth: Cell<usize>,
    flushing: Cell<bool>,
    pending: RefCell<Vec<NodeId>>,
    next_order: Cell<u64>,
    deferred_error: RefCell<Option<Error>>,
}

/// Handle to one reactive runtime.
///
/// Runtimes are independent: signals and effects created through one never
/// interact with another, which keeps tests and multiple apps isolated.
/// Cloning the handle shares the runtime.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

/// Non-owning runtime reference held by signal and memo handles.
#[derive(Clone)]
pub(crate) struct WeakRuntime(Weak<RuntimeInner>);

impl WeakRuntime {
    pub(crate) fn upgrade(&self) -> Option<Runtime> {
        self.0.upgrade().map(|inner| Runtime { inner })
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("nodes", &self.inner.nodes.borrow().len())
            .field("batch_depth", &self.inner.batch_depth.get())
            .field("flushing", &self.inner.flushing.get())
            .finish()
    }
}

struct RestoreCell<'a> {
    cell: &'a Cell<Option<NodeId>>,
    previous: Option<NodeId>,
}

impl Drop for RestoreCell<'_> {
    fn drop(&mut self) {
        self.cell.set(self.previous);
    }
}

struct BatchGuard<'a>(&'a Cell<usize>);

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl Runtime {
    /// Create a runtime with default limits.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime with explicit limits.
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                config,
                nodes: RefCell::new(Arena::new()),
                observer: Cell::new(None),
                owner: Cell::new(None),
                batch_depth: Cell::new(0),
                flushing: Cell::new(false),
                pending: RefCell::new(Vec::new()),
                next_order: Cell::new(0),
                deferred_error: RefCell::new(None),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakRuntime {
        WeakRuntime(Rc::downgrade(&self.inner))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Number of live nodes (signals, memos, effects, scopes).
    pub fn node_count(&self) -> usize {
        self.inner.nodes.borrow().len()
    }

    /// True while `id` has not been disposed.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.inner.nodes.borrow().contains(id)
    }

    /// True while a batch is open.
    pub fn is_batching(&self) -> bool {
        self.inner.batch_depth.get() > 0
    }

    /// The owner new nodes attach to right now.
    pub fn current_owner(&self) -> Option<NodeId> {
        self.inner.owner.get()
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    fn insert_node(&self, kind: NodeKind, phase: Phase, computation: Option<Computation>) -> NodeId {
        let order = self.inner.next_order.get();
        self.inner.next_order.set(order + 1);
        let owner = self.inner.owner.get();
        let state = match kind {
            NodeKind::Memo | NodeKind::Effect => NodeState::Dirty,
            NodeKind::Signal | NodeKind::Scope => NodeState::Clean,
        };

        let mut nodes = self.inner.nodes.borrow_mut();
        let owner = owner.filter(|id| nodes.contains(*id));
        let id = nodes.insert(ReactiveNode {
            kind,
            state,
            phase,
            order,
            queued: false,
            sources: Vec::new(),
            subscribers: Vec::new(),
            owner,
            owned: Vec::new(),
            cleanups: Vec::new(),
            computation,
        });
        if let Some(owner) = owner.and_then(|o| nodes.get_mut(o)) {
            owner.owned.push(id);
        }
        id
    }

    pub(crate) fn insert_signal(&self) -> NodeId {
        self.insert_node(NodeKind::Signal, Phase::Component, None)
    }

    pub(crate) fn insert_memo(&self, compute: MemoFn) -> NodeId {
        self.insert_node(NodeKind::Memo, Phase::Component, Some(Computation::Memo(compute)))
    }

    /// Create an ownership scope under the current owner.
    ///
    /// Nodes created inside [`with_owner`](Self::with_owner) for this scope
    /// are disposed together with it.
    pub fn create_scope(&self) -> NodeId {
        self.insert_node(NodeKind::Scope, Phase::Component, None)
    }

    /// Run `f` with `owner` as the owner of every node it creates.
    pub fn with_owner<R>(&self, owner: NodeId, f: impl FnOnce() -> R) -> R {
        let _restore = RestoreCell {
            cell: &self.inner.owner,
            previous: self.inner.owner.replace(Some(owner)),
        };
        f()
    }

    /// Register `cleanup` on the current owner.
    ///
    /// It runs before the owner's next re-run or when the owner is disposed.
    /// Without an owner the cleanup can never run and is dropped.
    pub fn on_cleanup(&self, cleanup: impl FnOnce() + 'static) {
        let Some(owner) = self.inner.owner.get() else {
            tracing::debug!("on_cleanup called without an owner; cleanup dropped");
            return;
        };
        if let Some(node) = self.inner.nodes.borrow_mut().get_mut(owner) {
            node.cleanups.push(Box::new(cleanup));
        }
    }

    /// Dispose a node and everything it owns.
    ///
    /// Owned nodes go first (newest to oldest), then the node's own cleanups
    /// in reverse registration order.
    pub fn dispose(&self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.clean_node(id);

        let removed = {
            let mut nodes = self.inner.nodes.borrow_mut();
            let Some(node) = nodes.remove(id) else {
                return;
            };
            for &sub in &node.subscribers {
                if let Some(sub) = nodes.get_mut(sub) {
                    sub.sources.retain(|s| *s != id);
                }
            }
            if let Some(owner) = node.owner.and_then(|o| nodes.get_mut(o)) {
                owner.owned.retain(|o| *o != id);
            }
            node
        };
        drop(removed);
    }

    /// Unsubscribe from sources, dispose owned nodes and run cleanups.
    fn clean_node(&self, id: NodeId) {
        let (sources, owned, cleanups) = {
            let mut nodes = self.inner.nodes.borrow_mut();
            let Some(node) = nodes.get_mut(id) else {
                return;
            };
            (
                std::mem::take(&mut node.sources),
                std::mem::take(&mut node.owned),
                std::mem::take(&mut node.cleanups),
            )
        };

        {
            let mut nodes = self.inner.nodes.borrow_mut();
            for source in sources {
                if let Some(source) = nodes.get_mut(source) {
                    source.subscribers.retain(|s| *s != id);
                }
            }
        }

        for child in owned.into_iter().rev() {
            self.dispose(child);
        }

        if !cleanups.is_empty() {
            self.untrack(|| {
                for cleanup in cleanups.into_iter().rev() {
                    cleanup();
                }
            });
        }
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    /// Record that the running computation read `source`.
    pub(crate) fn track(&self, source: NodeId) {
        let Some(observer) = self.inner.observer.get() else {
            return;
        };
        if observer == source {
            return;
        }
        let mut nodes = self.inner.nodes.borrow_mut();
        if !nodes.contains(source) {
            return;
        }
        match nodes.get_mut(observer) {
            Some(obs) if !obs.sources.contains(&source) => obs.sources.push(source),
            _ => return,
        }
        if let Some(src) = nodes.get_mut(source) {
            src.subscribers.push(observer);
        }
    }

    /// Run `f` without registering any dependency.
    pub fn untrack<R>(&self, f: impl FnOnce() -> R) -> R {
        let _restore = RestoreCell {
            cell: &self.inner.observer,
            previous: self.inner.observer.replace(None),
        };
        f()
    }

    /// A signal changed: invalidate dependents and request a flush.
    pub(crate) fn notify(&self, source: NodeId) {
        self.mark_subscribers(source, NodeState::Dirty);
        self.schedule();
    }

    fn mark_subscribers(&self, source: NodeId, state: NodeState) {
        let mut nodes = self.inner.nodes.borrow_mut();
        let mut pending = self.inner.pending.borrow_mut();
        let mut stack = vec![(source, state)];

        while let Some((id, incoming)) = stack.pop() {
            let subscribers = match nodes.get(id) {
                Some(node) => node.subscribers.clone(),
                None => continue,
            };
            for sub in subscribers {
                let Some(node) = nodes.get_mut(sub) else {
                    continue;
                };
                match node.kind {
                    NodeKind::Effect => {
                        if incoming > node.state {
                            node.state = incoming;
                        }
                        if !node.queued {
                            node.queued = true;
                            pending.push(sub);
                        }
                    }
                    NodeKind::Memo => {
                        if incoming > node.state {
                            let was_clean = node.state == NodeState::Clean;
                            node.state = incoming;
                            if was_clean {
                                stack.push((sub, NodeState::Check));
                            }
                        }
                    }
                    NodeKind::Signal | NodeKind::Scope => {}
                }
            }
        }
    }

    fn schedule(&self) {
        if self.inner.batch_depth.get() > 0 || self.inner.flushing.get() {
            return;
        }
        if let Err(err) = self.flush_pending() {
            tracing::error!(error = %err, "implicit flush failed");
            let mut slot = self.inner.deferred_error.borrow_mut();
            if slot.is_none() {
                *slot = Some(err);
            }
        }
    }

    // =========================================================================
    // Effects & memos
    // =========================================================================

    /// Create an effect that runs now and again whenever a signal it read
    /// during its last run changes.
    ///
    /// Cleanups registered with [`on_cleanup`](Self::on_cleanup) inside the
    /// body run before the next run and on disposal.
    pub fn create_effect(&self, mut f: impl FnMut() + 'static) -> NodeId {
        let (id, result) = self.create_effect_with(
            Phase::Component,
            Box::new(move || {
                f();
                Ok(())
            }),
        );
        debug_assert!(result.is_ok());
        id
    }

    /// Create an effect with an explicit phase and a fallible body.
    ///
    /// The first run happens immediately; its result is returned alongside
    /// the id so the caller can surface it.
    ///
    /// Flushing is held for the length of the first run. Writes it makes
    /// (including to signals it just read) queue and run as a regular pass
    /// once the body is back in place, under the same update cap.
    pub(crate) fn create_effect_with(&self, phase: Phase, body: EffectFn) -> (NodeId, Result<()>) {
        let id = self.insert_node(NodeKind::Effect, phase, Some(Computation::Effect(body)));
        let result = {
            self.inner.batch_depth.set(self.inner.batch_depth.get() + 1);
            let _guard = BatchGuard(&self.inner.batch_depth);
            self.run_effect(id)
        };
        if !self.inner.pending.borrow().is_empty() {
            self.schedule();
        }
        (id, result)
    }

    /// Force an effect to run again on the next flush.
    pub fn invalidate(&self, id: NodeId) {
        {
            let mut nodes = self.inner.nodes.borrow_mut();
            let Some(node) = nodes.get_mut(id) else {
                return;
            };
            if node.kind != NodeKind::Effect {
                return;
            }
            node.state = NodeState::Dirty;
            if node.queued {
                return;
            }
            node.queued = true;
            self.inner.pending.borrow_mut().push(id);
        }
        self.schedule();
    }

    fn run_effect(&self, id: NodeId) -> Result<()> {
        let computation = {
            let mut nodes = self.inner.nodes.borrow_mut();
            let Some(node) = nodes.get_mut(id) else {
                return Ok(());
            };
            node.state = NodeState::Clean;
            node.computation.take()
        };
        let Some(Computation::Effect(mut body)) = computation else {
            return Ok(());
        };

        self.clean_node(id);

        tracing::trace!(effect = id.index(), "running effect");
        let result = {
            let _observer = RestoreCell {
                cell: &self.inner.observer,
                previous: self.inner.observer.replace(Some(id)),
            };
            let _owner = RestoreCell {
                cell: &self.inner.owner,
                previous: self.inner.owner.replace(Some(id)),
            };
            body()
        };

        if let Some(node) = self.inner.nodes.borrow_mut().get_mut(id) {
            node.computation = Some(Computation::Effect(body));
        }
        result
    }

    /// Recompute a stale memo. Returns true if its value changed.
    fn update_memo(&self, id: NodeId) -> bool {
        let computation = {
            let mut nodes = self.inner.nodes.borrow_mut();
            let Some(node) = nodes.get_mut(id) else {
                return false;
            };
            node.state = NodeState::Clean;
            node.computation.take()
        };
        let Some(Computation::Memo(mut compute)) = computation else {
            return false;
        };

        self.clean_node(id);

        let changed = {
            let _observer = RestoreCell {
                cell: &self.inner.observer,
                previous: self.inner.observer.replace(Some(id)),
            };
            let _owner = RestoreCell {
                cell: &self.inner.owner,
                previous: self.inner.owner.replace(Some(id)),
            };
            compute()
        };

        if let Some(node) = self.inner.nodes.borrow_mut().get_mut(id) {
            node.computation = Some(Computation::Memo(compute));
        }
        if changed {
            self.mark_subscribers(id, NodeState::Dirty);
        }
        changed
    }

    /// Bring a memo up to date before it is read.
    ///
    /// A `Dirty` memo recomputes. A `Check` memo first refreshes its own
    /// memo sources and recomputes only if one of them changed.
    pub(crate) fn refresh_memo(&self, id: NodeId) {
        let state = match self.inner.nodes.borrow().get(id) {
            Some(node) if node.kind == NodeKind::Memo => node.state,
            _ => return,
        };
        match state {
            NodeState::Clean => {}
            NodeState::Dirty => {
                self.update_memo(id);
            }
            NodeState::Check => {
                if self.sources_changed(id) {
                    self.update_memo(id);
                } else if let Some(node) = self.inner.nodes.borrow_mut().get_mut(id) {
                    node.state = NodeState::Clean;
                }
            }
        }
    }

    // =========================================================================
    // Batching & flushing
    // =========================================================================

    /// Run `f` with flushes suppressed, then flush once.
    ///
    /// Nested batches collapse into the outermost one. Inside a running
    /// flush the writes simply join the flush's next pass.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        let value = {
            self.inner.batch_depth.set(self.inner.batch_depth.get() + 1);
            let _guard = BatchGuard(&self.inner.batch_depth);
            f()
        };
        if self.inner.batch_depth.get() == 0 {
            self.flush_pending()?;
        }
        Ok(value)
    }

    /// Surface an error left by an earlier implicit flush, then flush
    /// anything still queued.
    pub fn flush(&self) -> Result<()> {
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.flush_pending()
    }

    /// Take the error recorded by an implicit flush (a write made outside of
    /// any batch), if there was one.
    pub fn take_error(&self) -> Option<Error> {
        self.inner.deferred_error.borrow_mut().take()
    }

    fn flush_pending(&self) -> Result<()> {
        if self.inner.flushing.get() {
            return Ok(());
        }
        self.inner.flushing.set(true);
        let result = self.run_passes();
        self.inner.flushing.set(false);
        if result.is_err() {
            self.discard_pending();
        }
        result
    }

    fn run_passes(&self) -> Result<()> {
        let limit = self.inner.config.max_update_depth;
        let mut passes = 0usize;

        loop {
            let batch = self.take_pass();
            if batch.is_empty() {
                if passes > 0 {
                    tracing::debug!(passes, "flush settled");
                }
                return Ok(());
            }
            passes += 1;
            if passes > limit {
                self.release(&batch);
                tracing::warn!(limit, "flush exceeded update depth");
                return Err(Error::TooManyUpdates { limit });
            }
            tracing::trace!(pass = passes, effects = batch.len(), "flush pass");

            for (i, &id) in batch.iter().enumerate() {
                if let Err(err) = self.process(id) {
                    self.release(&batch[i + 1..]);
                    return Err(err);
                }
            }
        }
    }

    fn take_pass(&self) -> Vec<NodeId> {
        let mut pending = self.inner.pending.borrow_mut();
        if pending.is_empty() {
            return Vec::new();
        }
        let nodes = self.inner.nodes.borrow();
        pending.retain(|id| nodes.contains(*id));

        let Some(phase) = pending.iter().filter_map(|id| nodes.get(*id)).map(|n| n.phase).min() else {
            return Vec::new();
        };
        let (mut pass, rest): (Vec<NodeId>, Vec<NodeId>) = pending
            .iter()
            .partition(|id| nodes.get(**id).is_some_and(|n| n.phase == phase));
        *pending = rest;
        pass.sort_by_key(|id| nodes.get(*id).map_or(u64::MAX, |n| n.order));
        pass
    }

    fn process(&self, id: NodeId) -> Result<()> {
        let state = {
            let mut nodes = self.inner.nodes.borrow_mut();
            let Some(node) = nodes.get_mut(id) else {
                return Ok(());
            };
            node.queued = false;
            node.state
        };
        match state {
            NodeState::Clean => Ok(()),
            NodeState::Dirty => self.run_effect(id),
            NodeState::Check => {
                if self.sources_changed(id) {
                    self.run_effect(id)
                } else {
                    if let Some(node) = self.inner.nodes.borrow_mut().get_mut(id) {
                        node.state = NodeState::Clean;
                    }
                    Ok(())
                }
            }
        }
    }

    /// Refresh the memo sources of a `Check` node; true once any of them
    /// produced a new value.
    fn sources_changed(&self, id: NodeId) -> bool {
        let sources = match self.inner.nodes.borrow().get(id) {
            Some(node) => node.sources.clone(),
            None => return false,
        };
        for source in sources {
            self.refresh_memo(source);
            if self.state_of(id) == Some(NodeState::Dirty) {
                return true;
            }
        }
        self.state_of(id) == Some(NodeState::Dirty)
    }

    fn state_of(&self, id: NodeId) -> Option<NodeState> {
        self.inner.nodes.borrow().get(id).map(|n| n.state)
    }

    fn release(&self, ids: &[NodeId]) {
        let mut nodes = self.inner.nodes.borrow_mut();
        for &id in ids {
            if let Some(node) = nodes.get_mut(id) {
                node.queued = false;
                node.state = NodeState::Clean;
            }
        }
    }

    fn discard_pending(&self) {
        let pending = std::mem::take(&mut *self.inner.pending.borrow_mut());
        self.release(&pending);
    }
}
