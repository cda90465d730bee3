//! Draw-key sorting and batch coalescing (`spec.md` §4.5, "Draw Batching").

mod batcher;
mod draw_key;

pub use batcher::{Batch, DrawBatcher, DrawCommand};
pub use draw_key::{opaque_key, overlay_key, transparent_key, DrawLayer};
