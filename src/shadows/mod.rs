//! Cascaded directional shadows and the local-light shadow atlas
//! (`spec.md` §4.7).

mod atlas;
mod cascades;
mod draw_system;

pub use atlas::{region_size_for, ShadowAtlas, ShadowRegion, MAX_REGION_SIZE, MIN_REGION_SIZE};
pub use cascades::{compute_cascade_splits, build_cascade_vp, frustum_corners_world, Cascade, CascadedShadowMaps, MAX_CASCADES};
pub use draw_system::{CascadeUniform, LocalShadowUniform, ShadowDrawSystem};
