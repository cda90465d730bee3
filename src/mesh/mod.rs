//! GPU mesh pool, CPU→GPU upload, and instance batching (`spec.md` §4.4).

pub mod bounds;
mod cpu_mesh;
mod draw_system;
mod gpu_mesh;
mod instance;
pub mod primitives;
mod uploader;

pub use bounds::Aabb;
pub use cpu_mesh::{CpuMesh, IndexFormat, SubMesh, VertexLayout};
pub use draw_system::{MeshDrawOutput, MeshDrawSystem};
pub use gpu_mesh::{GpuMesh, MeshHandle};
pub use instance::{BoneRange, GpuInstance, MeshInstanceData};
pub use uploader::MeshUploader;

use crate::pool::ResourcePool;

/// The crate-wide pool of GPU-resident meshes (`spec.md` §4.4, "MeshPool").
pub type MeshPool = ResourcePool<GpuMesh>;
