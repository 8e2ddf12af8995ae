//! Headless app driver and one-shot rendering.
//!
//! [`App`] runs the whole pipeline without a terminal: events come in
//! through [`App::dispatch_key`] / [`App::dispatch_mouse`], encoded frames
//! pile up for [`App::take_output`]. The live session in
//! [`terminal`](super::terminal) drives the same type.
//!
//! # Example
//!
//! ```ignore
//! let mut app = App::new(counter, AppConfig::default().with_size(20, 1))?;
//! app.dispatch_key(&KeyboardEvent::key(Key { up_arrow: true, ..Key::default() }))?;
//! assert_eq!(app.last_frame().unwrap().to_lines()[0].trim_end(), "Count: 1");
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::hooks::{ComponentInstance, ContextMap, Scope};
use crate::layout::Constraints;
use crate::primitives::Node;
use crate::reactive::{NodeId, Runtime};
use crate::renderer::{Frame, TermOp};
use crate::state::keyboard::KeyboardEvent;
use crate::state::mouse::MouseEvent;

use super::mount::{AppHandle, FrameState, Sink, mount_frame, paint_tree};

/// Render `node` once at `width` x `height` (content height when `None`)
/// and return the text, one line per row, trailing spaces trimmed.
pub fn render_to_string(node: &Node, width: u16, height: Option<u16>) -> String {
    let result = paint_tree(node, Constraints::new(width, height));
    result
        .frame
        .to_lines()
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// App
// =============================================================================

/// A mounted component tree with its own runtime and frame pipeline.
pub struct App {
    runtime: Runtime,
    handle: AppHandle,
    config: AppConfig,
    root: Option<Rc<ComponentInstance>>,
    frame_effect: Option<NodeId>,
    state: Rc<RefCell<FrameState>>,
}

impl App {
    /// Mount `component` and paint the first frame.
    pub fn new<F>(component: F, config: AppConfig) -> Result<Self>
    where
        F: FnMut(&mut Scope) -> Node + 'static,
    {
        Self::with_sink(component, config, Sink::Capture(Vec::new()))
    }

    pub(crate) fn with_sink<F>(component: F, config: AppConfig, sink: Sink) -> Result<Self>
    where
        F: FnMut(&mut Scope) -> Node + 'static,
    {
        let runtime = Runtime::with_config(config.runtime.clone());
        let handle = AppHandle::new(&runtime, Constraints::new(config.width, config.height));
        let state = Rc::new(RefCell::new(FrameState::new(sink)));

        let mut contexts = ContextMap::new();
        contexts.insert(TypeId::of::<AppHandle>(), Rc::new(handle.clone()) as Rc<dyn Any>);

        let mounted = runtime.batch(|| -> Result<_> {
            let root = ComponentInstance::mount(&runtime, "App", None, contexts, Box::new(component))?;
            let (effect, first) = mount_frame(&runtime, root.as_node(), handle.clone(), state.clone());
            if let Err(err) = first {
                runtime.dispose(effect);
                root.unmount();
                return Err(err);
            }
            Ok((root, effect))
        });
        let (root, effect) = match mounted {
            Ok(Ok(parts)) => parts,
            Ok(Err(err)) | Err(err) => {
                runtime.dispose(handle.viewport_signal());
                return Err(err);
            }
        };

        tracing::debug!(width = config.width, height = ?config.height, "app mounted");
        Ok(Self {
            runtime,
            handle,
            config,
            root: Some(root),
            frame_effect: Some(effect),
            state,
        })
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// The handle components get from `use_app`.
    pub fn handle(&self) -> AppHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // =========================================================================
    // Stimuli
    // =========================================================================

    /// Change the viewport. The next frame is a full redraw when the size
    /// actually changed.
    pub fn resize(&mut self, width: u16, height: Option<u16>) -> Result<()> {
        self.config.width = width;
        self.config.height = height;
        let handle = &self.handle;
        self.runtime
            .batch(|| handle.set_viewport(Constraints::new(width, height)))
    }

    /// Deliver a key event to every `use_input` handler, in registration
    /// order, inside one batch. Ctrl+C exits instead when
    /// `exit_on_ctrl_c` is set.
    pub fn dispatch_key(&mut self, event: &KeyboardEvent) -> Result<()> {
        if self.config.exit_on_ctrl_c && event.is_ctrl_c() {
            self.handle.exit();
            return Ok(());
        }
        let registry = self.handle.input_registry();
        let delivered = self.runtime.batch(|| registry.dispatch(event))?;
        tracing::trace!(handlers = delivered, "key dispatched");
        Ok(())
    }

    /// Route a mouse event to the deepest box under it with a matching
    /// callback. Returns whether a callback ran.
    pub fn dispatch_mouse(&mut self, event: &MouseEvent) -> Result<bool> {
        let callback = self.state.borrow().hits.resolve(event);
        let Some(callback) = callback else {
            return Ok(false);
        };
        self.runtime.batch(|| callback(event))?;
        Ok(true)
    }

    /// Surface an error from an implicit flush and run anything queued.
    pub fn flush(&mut self) -> Result<()> {
        self.runtime.flush()
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Bytes written since the last call.
    pub fn take_output(&mut self) -> Vec<u8> {
        match &mut self.state.borrow_mut().sink {
            Sink::Capture(bytes) => std::mem::take(bytes),
            Sink::Terminal => Vec::new(),
        }
    }

    /// The frame currently on screen.
    pub fn last_frame(&self) -> Option<Frame> {
        self.state.borrow().differ.previous().cloned()
    }

    /// Ops of the most recent frame.
    pub fn last_ops(&self) -> Vec<TermOp> {
        self.state.borrow().last_ops.clone()
    }

    /// Frames written so far.
    pub fn frame_count(&self) -> usize {
        self.state.borrow().frames
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn exit(&self) {
        self.handle.exit();
    }

    pub fn is_exited(&self) -> bool {
        self.handle.is_exited()
    }

    /// Stop rendering and unmount the tree. Cleanups run once, newest
    /// first. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(effect) = self.frame_effect.take() {
            self.runtime.dispose(effect);
        }
        let Some(root) = self.root.take() else {
            return;
        };
        root.unmount();
        self.runtime.dispose(self.handle.viewport_signal());
        tracing::debug!("app unmounted");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("mounted", &self.root.is_some())
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::error::Error;
    use crate::primitives::{BoxProps, box_primitive, plain};
    use crate::state::keyboard::Key;
    use crate::types::{BorderStyle, FlexDirection};

    fn up() -> KeyboardEvent {
        KeyboardEvent::key(Key {
            up_arrow: true,
            ..Key::default()
        })
    }

    #[test]
    fn test_render_to_string_trims_lines() {
        let node = box_primitive(
            BoxProps {
                border_style: BorderStyle::Single,
                flex_direction: FlexDirection::Row,
                ..Default::default()
            },
            vec![plain("hi")],
        );
        assert_eq!(render_to_string(&node, 6, None), "┌────┐\n│hi  │\n└────┘");
        assert_eq!(render_to_string(&plain("x"), 5, Some(2)), "x\n");
    }

    #[test]
    fn test_key_handlers_run_in_one_batch() {
        let renders = Rc::new(Cell::new(0));
        let r = renders.clone();
        let mut app = App::new(
            move |cx: &mut Scope| {
                r.set(r.get() + 1);
                let a = cx.use_state(|| 0);
                let b = cx.use_state(|| 0);
                let (a2, b2) = (a.clone(), b.clone());
                cx.use_input(move |_| a2.update(|n| n + 1));
                cx.use_input(move |_| b2.update(|n| n + 10));
                plain(format!("{} {}", a.get(), b.get()))
            },
            AppConfig::default().with_size(10, 1),
        )
        .unwrap();
        assert_eq!(renders.get(), 1);

        app.dispatch_key(&up()).unwrap();
        assert_eq!(renders.get(), 2);
        assert_eq!(app.last_frame().unwrap().to_lines()[0].trim_end(), "1 10");
    }

    #[test]
    fn test_ctrl_c_exits() {
        let mut app = App::new(|_: &mut Scope| plain("x"), AppConfig::default()).unwrap();
        assert!(!app.is_exited());
        app.dispatch_key(&KeyboardEvent::ctrl('c')).unwrap();
        assert!(app.is_exited());
    }

    #[test]
    fn test_resize_redraws_fully() {
        let mut app = App::new(|_: &mut Scope| plain("hello"), AppConfig::default().with_size(10, 2)).unwrap();
        app.take_output();
        app.resize(12, Some(3)).unwrap();
        let ops = app.last_ops();
        assert_eq!(ops.first(), Some(&TermOp::Clear));
        assert_eq!(ops.len(), 4);
        assert_eq!(app.last_frame().unwrap().width(), 12);
        assert!(!app.take_output().is_empty());
    }

    #[test]
    fn test_runaway_effect_surfaces_too_many_updates() {
        let mut app = App::new(
            |cx: &mut Scope| {
                let n = cx.use_state(|| 0u64);
                let m = n.clone();
                cx.use_input(move |_| m.update(|v| v + 1));
                let looped = n.clone();
                cx.use_effect(move || {
                    let v = looped.get();
                    if v > 0 {
                        looped.set(v + 1);
                    }
                    None
                });
                plain(n.get().to_string())
            },
            AppConfig::default().with_size(10, 1),
        )
        .unwrap();

        let err = app.dispatch_key(&up()).unwrap_err();
        assert!(matches!(err, Error::TooManyUpdates { .. }));
    }

    #[test]
    fn test_unmount_releases_every_node() {
        let mut app = App::new(
            |cx: &mut Scope| {
                let count = cx.use_state(|| 1);
                let child = cx.child("Child", |cx| {
                    cx.use_ref(|| 0);
                    plain("child")
                });
                box_primitive(BoxProps::default(), vec![plain(count.get().to_string()), child])
            },
            AppConfig::default(),
        )
        .unwrap();
        assert!(app.runtime().node_count() > 0);
        app.unmount();
        app.unmount();
        assert_eq!(app.runtime().node_count(), 0);
    }
}
