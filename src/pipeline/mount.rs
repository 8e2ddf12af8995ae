//! Mount - app services and the frame effect.
//!
//! The frame effect is the one place where a laid-out tree turns into
//! terminal bytes:
//!
//! ```text
//! viewport + root output ──layout──> LayoutBox ──paint──> Frame ──diff/encode──> Sink
//! ```
//!
//! It runs in [`Phase::Render`], so it only ever sees component output
//! after every dirty component of the same flush has re-rendered. Reading
//! the viewport signal and the root's output (through layout) subscribes it
//! to exactly those.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;

use crate::error::Result;
use crate::layout::{Constraints, layout};
use crate::primitives::Node;
use crate::reactive::{NodeId, Phase, Runtime, Signal};
use crate::renderer::{Differ, Frame, OutputBuffer, PaintResult, TermOp, encode, paint};
use crate::state::keyboard::InputRegistry;
use crate::state::mouse::HitRegistry;

// =============================================================================
// AppHandle
// =============================================================================

/// App-level services, reachable from components through
/// [`Scope::use_app`](crate::hooks::Scope::use_app).
///
/// Cloning shares the same app.
#[derive(Clone)]
pub struct AppHandle {
    inner: Rc<AppShared>,
}

struct AppShared {
    exited: Cell<bool>,
    inputs: InputRegistry,
    viewport: Signal<Constraints>,
}

impl AppHandle {
    pub(crate) fn new(runtime: &Runtime, viewport: Constraints) -> Self {
        Self {
            inner: Rc::new(AppShared {
                exited: Cell::new(false),
                inputs: InputRegistry::new(),
                viewport: runtime.create_signal(viewport),
            }),
        }
    }

    /// A handle attached to no app, handed out when a component asks for
    /// one outside of an [`App`](super::App).
    pub(crate) fn detached(runtime: &Runtime) -> Self {
        Self::new(runtime, Constraints::new(0, Some(0)))
    }

    /// Ask the app to stop. The live loop returns at its next poll.
    pub fn exit(&self) {
        if !self.inner.exited.replace(true) {
            tracing::debug!("exit requested");
        }
    }

    pub fn is_exited(&self) -> bool {
        self.inner.exited.get()
    }

    /// Handlers registered by `use_input`.
    pub fn input_registry(&self) -> InputRegistry {
        self.inner.inputs.clone()
    }

    /// Current viewport, tracked.
    pub fn viewport(&self) -> Constraints {
        self.inner.viewport.get()
    }

    pub(crate) fn set_viewport(&self, viewport: Constraints) {
        self.inner.viewport.set(viewport);
    }

    pub(crate) fn viewport_signal(&self) -> NodeId {
        self.inner.viewport.id()
    }
}

impl std::fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppHandle")
            .field("exited", &self.inner.exited.get())
            .field("handlers", &self.inner.inputs.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Output sink
// =============================================================================

/// Where encoded frames go.
#[derive(Debug)]
pub(crate) enum Sink {
    /// Kept in memory for [`App::take_output`](super::App::take_output).
    Capture(Vec<u8>),
    /// Written to stdout.
    Terminal,
}

impl Sink {
    fn write(&mut self, buf: &mut OutputBuffer) -> io::Result<()> {
        match self {
            Sink::Capture(bytes) => {
                bytes.extend_from_slice(&buf.take());
                Ok(())
            }
            Sink::Terminal => {
                let mut stdout = io::stdout().lock();
                buf.flush_to(&mut stdout)?;
                stdout.flush()
            }
        }
    }
}

// =============================================================================
// Frame state
// =============================================================================

/// Everything the frame effect keeps between runs.
#[derive(Debug)]
pub(crate) struct FrameState {
    pub differ: Differ,
    pub hits: HitRegistry,
    pub sink: Sink,
    pub last_ops: Vec<TermOp>,
    pub frames: usize,
}

impl FrameState {
    pub fn new(sink: Sink) -> Self {
        Self {
            differ: Differ::new(),
            hits: HitRegistry::new(),
            sink,
            last_ops: Vec::new(),
            frames: 0,
        }
    }
}

/// Lay out and paint `node` at `viewport`. An unbounded viewport gets a
/// frame as tall as the content.
pub(crate) fn paint_tree(node: &Node, viewport: Constraints) -> PaintResult {
    let tree = layout(node, viewport);
    let height = viewport.height.unwrap_or_else(|| tree.rect().bottom());
    paint(&tree, viewport.width, height)
}

/// Create the frame effect. It runs once right away; that result is
/// returned with the effect id.
pub(crate) fn mount_frame(
    runtime: &Runtime,
    root: Node,
    handle: AppHandle,
    state: Rc<RefCell<FrameState>>,
) -> (NodeId, Result<()>) {
    runtime.create_effect_with(
        Phase::Render,
        Box::new(move || {
            let viewport = handle.viewport();
            let PaintResult { frame, hits } = paint_tree(&root, viewport);
            commit_frame(&mut state.borrow_mut(), frame, hits)
        }),
    )
}

/// Diff, encode and write one frame. The differ moves forward only when
/// the write went through.
fn commit_frame(state: &mut FrameState, frame: Frame, hits: HitRegistry) -> Result<()> {
    let ops = state.differ.diff(&frame);
    let mut buf = OutputBuffer::new();
    encode(&ops, &mut buf)?;
    state.sink.write(&mut buf)?;

    state.frames += 1;
    tracing::debug!(
        frame = state.frames,
        width = frame.width(),
        height = frame.height(),
        ops = ops.len(),
        "frame written"
    );
    state.differ.commit(frame);
    state.hits = hits;
    state.last_ops = ops;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::plain;

    #[test]
    fn test_content_height_when_unbounded() {
        let node = crate::primitives::fragment(vec![plain("a"), plain("b"), plain("c")]);
        let result = paint_tree(&node, Constraints::new(4, None));
        assert_eq!(result.frame.height(), 3);
        let result = paint_tree(&node, Constraints::new(4, Some(10)));
        assert_eq!(result.frame.height(), 10);
    }

    #[test]
    fn test_commit_records_frame_and_ops() {
        let mut state = FrameState::new(Sink::Capture(Vec::new()));
        commit_frame(&mut state, Frame::new(2, 1), HitRegistry::new()).unwrap();
        assert_eq!(state.frames, 1);
        assert_eq!(state.last_ops.first(), Some(&TermOp::Clear));
        assert!(state.differ.previous().is_some());
        assert!(matches!(&state.sink, Sink::Capture(bytes) if !bytes.is_empty()));

        commit_frame(&mut state, Frame::new(2, 1), HitRegistry::new()).unwrap();
        assert!(state.last_ops.is_empty());
    }

    #[test]
    fn test_handle_exit_and_viewport() {
        let rt = Runtime::new();
        let handle = AppHandle::new(&rt, Constraints::new(10, Some(2)));
        assert!(!handle.is_exited());
        handle.clone().exit();
        assert!(handle.is_exited());

        handle.set_viewport(Constraints::new(20, None));
        assert_eq!(handle.viewport(), Constraints::new(20, None));
        assert!(handle.input_registry().is_empty());
    }
}
