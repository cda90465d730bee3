//! Declarative render graph: resources and passes are declared each frame,
//! compiled into a culled topological order, then executed (`spec.md`
//! §4.8).

mod compile;
mod graph;
mod pass;
mod resource;

pub use compile::{compile, CompiledGraph, RgError};
pub use graph::RenderGraph;
pub use pass::{ColorAttachment, DepthStencilAttachment, LoadOp, PassBuilder, PassContext, PassFlags, PassKind, RGPass, StoreOp};
pub use resource::{BufferResourceDesc, Color, RGResource, RGResourceHandle, RGResourceKind, TextureResourceDesc};
