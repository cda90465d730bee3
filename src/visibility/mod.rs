//! Frustum culling and multi-view visibility aggregation (`spec.md` §4.5).

mod batch_cull;
mod frustum;
mod view;

pub use batch_cull::BatchCuller;
pub use frustum::{AabbTest, FrustumCuller, PointTest};
pub use view::{RenderView, VisibilityStats, VisibilitySystem, MAX_VIEWS};
