//! Render-graph resource descriptors (`spec.md` §6, "Render-graph public
//! types").

use crate::hal::{BufferUsage, Format, GpuResource, TextureUsage};

/// An opaque index into a [`crate::graph::RenderGraph`]'s resource table,
/// valid only for the frame it was created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGResourceHandle(pub(crate) u32);

/// A solid clear color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureResourceDesc {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_count: u32,
    pub sample_count: u32,
    pub format: Format,
    pub usage: TextureUsage,
}

impl TextureResourceDesc {
    /// A color render target: `usage = ColorAttachment | Sampled`.
    #[must_use]
    pub fn render_target(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            depth: 1,
            mip_count: 1,
            sample_count: 1,
            format,
            usage: TextureUsage::COLOR_ATTACHMENT | TextureUsage::SAMPLED,
        }
    }

    /// A depth/stencil target: `usage = DepthStencilAttachment | Sampled`.
    #[must_use]
    pub fn depth_stencil(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            depth: 1,
            mip_count: 1,
            sample_count: 1,
            format,
            usage: TextureUsage::DEPTH_ATTACHMENT | TextureUsage::SAMPLED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferResourceDesc {
    pub size: u64,
    pub usage: BufferUsage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RGResourceKind {
    Texture(TextureResourceDesc),
    Buffer(BufferResourceDesc),
}

/// One entry in the graph's resource table: its descriptor, whether it is
/// externally imported (and therefore never-cullable), and the access
/// stamps the compiler fills in (`spec.md` §4.8, "Compile algorithm").
#[derive(Debug, Clone)]
pub struct RGResource {
    pub name: String,
    pub kind: RGResourceKind,
    pub imported: bool,
    pub imported_physical: Option<GpuResource>,
    pub first_write_pass: Option<usize>,
    pub last_use_pass: Option<usize>,
}

impl RGResource {
    pub(crate) fn transient(name: impl Into<String>, kind: RGResourceKind) -> Self {
        Self { name: name.into(), kind, imported: false, imported_physical: None, first_write_pass: None, last_use_pass: None }
    }

    pub(crate) fn imported(name: impl Into<String>, kind: RGResourceKind, physical: GpuResource) -> Self {
        Self { name: name.into(), kind, imported: true, imported_physical: Some(physical), first_write_pass: None, last_use_pass: None }
    }
}
