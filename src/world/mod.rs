//! The render-world proxy store (`spec.md` §4.3).

mod proxies;
mod render_world;

pub use proxies::{
    BlendMode, CameraHandle, CameraProxy, ForceFieldHandle, ForceFieldKind, ForceFieldProxy, LightHandle, LightKind,
    LightProxy, MaterialHandle, MeshFlags, ParticleEmitterHandle, ParticleEmitterProxy, ProjectionKind,
    SkinnedMeshHandle, SkinnedMeshProxy, SpriteHandle, SpriteProxy, StaticMeshHandle, StaticMeshProxy,
};
pub use render_world::RenderWorld;
