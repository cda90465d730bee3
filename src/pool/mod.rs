//! Generation-indexed resource pools (`spec.md` §4.1).
//!
//! [`ResourcePool<T>`] is the generic slot table every typed pool in this
//! crate builds on — the per-proxy tables in [`crate::world`], the mesh
//! pool in [`crate::mesh`], and the concrete [`BufferPool`] / [`TexturePool`]
//! here. Grounded on the slot-table idiom in
//! `myth::renderer::core::resources` and on
//! `other_examples/40bb8f6c_..._resource_pool.rs.rs` for the
//! statistics/deferred-destruction shape.

mod buffer_pool;
mod deferred;
mod resource_pool;
mod stats;
mod texture_pool;

pub use buffer_pool::{BufferHandle, BufferPool, BufferSlotInfo};
pub use deferred::DeferredDestructionQueue;
pub use resource_pool::ResourcePool;
pub use stats::PoolStats;
pub use texture_pool::{TextureHandle, TexturePool, TextureSlotInfo};

/// Number of frames a released GPU resource is kept alive before actual
/// destruction (`spec.md` §3, "Deferred Destruction"). Matches the typical
/// swapchain frame count.
pub const N_FRAMES_IN_FLIGHT: u64 = 3;
