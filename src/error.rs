//! Crate-wide error type.
//!
//! Mirrors the taxonomy in `spec.md` §7: frame-critical failures are typed
//! [`CoreError`] variants returned from `Result`; per-object failures
//! (an invalid handle, an overflowed transient allocation) are sentinels or
//! `Option::None` returned from total functions, never an `Err`. Nothing in
//! this crate panics on well-formed input.

use thiserror::Error;

use crate::graph::RgError;

/// Crate-wide error type for frame-critical operations.
///
/// Per-object operations (handle lookups, transient allocation overflow)
/// intentionally do not use this type — see the module docs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// HAL device/resource creation failed during renderer setup. Fatal.
    #[error("renderer initialization failed: {0}")]
    Initialization(String),

    /// A pool or transient allocation failed to acquire backing memory.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// The render graph failed to compile for the current frame.
    #[error("render graph compile error: {0}")]
    GraphCompile(#[from] RgError),

    /// A fence wait or swapchain acquire exceeded its timeout.
    #[error("gpu operation timed out: {0}")]
    GpuTimeout(String),

    /// The swapchain surface is no longer valid; the caller must recreate it.
    #[error("swapchain lost, recreate surface")]
    SwapchainLost,
}

/// Alias for `Result<T, CoreError>`, used by every frame-critical operation.
pub type Result<T> = std::result::Result<T, CoreError>;
