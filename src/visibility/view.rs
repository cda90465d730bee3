//! Multi-view visibility aggregation (`spec.md` §4.5, "VisibilitySystem").
//!
//! Grounded on `myth::renderer::core::view`'s "everything is a view" design
//! (`ViewTarget`, `RenderView`), generalized from the teacher's two concrete
//! view kinds (main camera, shadow light) to an opaque `view_mask: u64`
//! covering any number of simultaneously active views (main camera, shadow
//! cascades, future point-light faces).

use glam::{Mat4, Vec3};

use crate::mesh::bounds::Aabb;
use crate::visibility::frustum::{AabbTest, FrustumCuller, PointTest};

/// Maximum number of simultaneously active views (`view_mask` is `u64`).
pub const MAX_VIEWS: usize = 64;

/// One active view this frame: a camera, a shadow cascade, or a future
/// point-light cube face. Visibility and depth are both evaluated per view.
#[derive(Debug, Clone)]
pub struct RenderView {
    pub name: String,
    pub view_projection: Mat4,
    pub frustum: FrustumCuller,
    pub eye_position: Vec3,
    pub forward: Vec3,
    pub near: f32,
    pub far: f32,
}

impl RenderView {
    #[must_use]
    pub fn new(name: impl Into<String>, view_projection: Mat4, eye_position: Vec3, forward: Vec3, near: f32, far: f32) -> Self {
        Self {
            name: name.into(),
            frustum: FrustumCuller::from_view_projection(view_projection),
            view_projection,
            eye_position,
            forward: forward.normalize_or_zero(),
            near,
            far,
        }
    }

    /// Linearized depth in `[0, 1]` of `position`, used as the opaque sort
    /// key's depth field: `(|view_z| - near) / (far - near)`.
    #[must_use]
    pub fn linear_depth(&self, position: Vec3) -> f32 {
        let view_z = (position - self.eye_position).dot(self.forward);
        ((view_z.abs() - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Running counters for a frame's visibility pass (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityStats {
    pub objects_tested: u64,
    pub objects_visible: u64,
    pub objects_culled: u64,
}

/// Owns this frame's active [`RenderView`]s and tests objects against all
/// of them in one pass, producing a per-object `view_mask`.
#[derive(Default)]
pub struct VisibilitySystem {
    views: Vec<RenderView>,
    stats: VisibilityStats,
}

impl VisibilitySystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all views and counters; called at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.views.clear();
        self.stats = VisibilityStats::default();
    }

    /// Registers a view for this frame. Views beyond [`MAX_VIEWS`] are
    /// dropped with a warning — the `view_mask` cannot address them.
    pub fn add_view(&mut self, view: RenderView) -> Option<usize> {
        if self.views.len() >= MAX_VIEWS {
            log::warn!("VisibilitySystem: dropping view {:?}, MAX_VIEWS ({MAX_VIEWS}) reached", view.name);
            return None;
        }
        self.views.push(view);
        Some(self.views.len() - 1)
    }

    #[must_use]
    pub fn views(&self) -> &[RenderView] {
        &self.views
    }

    #[must_use]
    pub fn stats(&self) -> VisibilityStats {
        self.stats
    }

    /// Tests `aabb` against every active view, returning `(is_visible,
    /// view_mask)` where bit `i` is set iff view `i` did not reject it.
    pub fn test_aabb(&mut self, aabb: &Aabb) -> (bool, u64) {
        self.stats.objects_tested += 1;
        let mut mask = 0u64;
        for (i, view) in self.views.iter().enumerate() {
            if view.frustum.test_aabb(aabb) != AabbTest::Outside {
                mask |= 1 << i;
            }
        }
        let visible = mask != 0;
        if visible {
            self.stats.objects_visible += 1;
        } else {
            self.stats.objects_culled += 1;
        }
        (visible, mask)
    }

    /// Tests `(center, radius)` against every active view.
    pub fn test_sphere(&mut self, center: Vec3, radius: f32) -> (bool, u64) {
        self.stats.objects_tested += 1;
        let mut mask = 0u64;
        for (i, view) in self.views.iter().enumerate() {
            if view.frustum.test_sphere(center, radius) == PointTest::Inside {
                mask |= 1 << i;
            }
        }
        let visible = mask != 0;
        if visible {
            self.stats.objects_visible += 1;
        } else {
            self.stats.objects_culled += 1;
        }
        (visible, mask)
    }

    /// Linearized `[0,1]` depth of `position` relative to `view_index`.
    #[must_use]
    pub fn depth(&self, view_index: usize, position: Vec3) -> f32 {
        self.views.get(view_index).map_or(0.0, |view| view.linear_depth(position))
    }
}
