//! Fine-grained reactivity: signals, memos, effects, ownership scopes.
//!
//! Everything hangs off an explicit [`Runtime`] value. There is no
//! process-global graph, so independent runtimes never observe each other.
//!
//! # Example
//!
//! ```ignore
//! let rt = Runtime::new();
//! let count = rt.create_signal(0);
//! let c = count.clone();
//! rt.create_effect(move || println!("count = {}", c.get()));
//! rt.batch(|| {
//!     count.set(1);
//!     count.set(2);
//! })?; // effect prints once, with 2
//! ```

mod arena;
mod memo;
mod runtime;
mod signal;

pub use arena::NodeId;
pub use memo::Memo;
pub use runtime::{Cleanup, Phase, Runtime};
pub use signal::{ReadSignal, Signal, WriteSignal};

pub(crate) use runtime::{EffectFn, WeakRuntime};
