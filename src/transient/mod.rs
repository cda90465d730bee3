//! Transient per-frame buffer allocator (`spec.md` §4.2).
//!
//! Three independent ring allocators — vertex, index, uniform — each reset
//! at the start of every frame. Grounded on
//! `myth::renderer::core::resources::allocator::ModelBufferAllocator`'s
//! cursor/capacity/reset-per-frame idiom, generalized from one ring
//! (model uniforms only) to the spec's three.

mod allocation;
mod pool;
mod ring;
mod stats;

pub use allocation::TransientAllocation;
pub use pool::TransientBufferPool;
pub use ring::{RingKind, TransientRing};
pub use stats::TransientStats;

/// Alignment (bytes) required for vertex/index ring allocations
/// (`spec.md` §4.2).
pub const VERTEX_INDEX_ALIGNMENT: u64 = 16;
