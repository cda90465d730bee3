#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]

//! Core subsystems for a real-time clustered-forward 3D renderer.
//!
//! This crate turns a scene description into a correctly ordered, GPU-safe
//! sequence of commands each frame. It does **not** implement a graphics
//! backend, a windowing loop, shader compilation, or asset loading — those
//! are external collaborators. See [`hal`] for the contract this crate
//! expects a backend to provide.
//!
//! # Layout
//!
//! - [`handle`] / [`pool`] — generation-indexed resource pools.
//! - [`transient`] — per-frame ring allocators for vertex/index/uniform data.
//! - [`world`] — the render-world proxy store (meshes, lights, cameras, ...).
//! - [`mesh`] — GPU mesh pool, uploader, and instance batching.
//! - [`visibility`] — frustum culling and multi-view aggregation.
//! - [`batching`] — draw-key sorting and batch coalescing.
//! - [`lighting`] — clustered forward light assignment.
//! - [`shadows`] — cascaded shadow maps and the local-light shadow atlas.
//! - [`graph`] — the render graph compiler and executor.
//! - [`renderer`] — the façade that owns everything above and drives frames.

pub mod batching;
pub mod error;
pub mod graph;
pub mod hal;
pub mod handle;
pub mod lighting;
pub mod mesh;
pub mod pool;
pub mod renderer;
pub mod shadows;
pub mod transient;
pub mod visibility;
pub mod world;

pub use error::{CoreError, Result};
pub use handle::Handle;
pub use renderer::Renderer;
