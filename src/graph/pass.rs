//! Render-graph pass declaration and fluent builder (`spec.md` §4.8).

use bitflags::bitflags;

use crate::graph::resource::{Color, RGResourceHandle};
use crate::hal::CommandEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Clear,
    Load,
    DontCare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Store,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachment {
    pub handle: RGResourceHandle,
    pub clear_color: Color,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
    pub mip_level: u32,
    pub array_layer: u32,
}

impl ColorAttachment {
    /// Clear-then-store, mip 0, layer 0.
    #[must_use]
    pub fn with_default_ops(handle: RGResourceHandle) -> Self {
        Self { handle, clear_color: Color::BLACK, load_op: LoadOp::Clear, store_op: StoreOp::Store, mip_level: 0, array_layer: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStencilAttachment {
    pub handle: RGResourceHandle,
    pub depth_load_op: LoadOp,
    pub depth_store_op: StoreOp,
    pub stencil_load_op: LoadOp,
    pub stencil_store_op: StoreOp,
    pub clear_depth: f32,
    pub clear_stencil: u32,
    pub read_only: bool,
}

impl DepthStencilAttachment {
    #[must_use]
    pub fn with_default_ops(handle: RGResourceHandle) -> Self {
        Self {
            handle,
            depth_load_op: LoadOp::Clear,
            depth_store_op: StoreOp::Store,
            stencil_load_op: LoadOp::DontCare,
            stencil_store_op: StoreOp::Discard,
            clear_depth: 1.0,
            clear_stencil: 0,
            read_only: false,
        }
    }
}

bitflags! {
    /// Per-pass behavior flags (`spec.md` §6, "PassFlags").
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PassFlags: u32 {
        /// Never culled even if nothing downstream reads its writes.
        const NEVER_CULL    = 1 << 0;
        /// Scheduled on an async-compute queue where the backend supports it.
        const ASYNC_COMPUTE = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Graphics,
    Compute,
}

/// Everything a compiled pass exposes to its callback: resolved attachment
/// views it declared, and the raw command encoder.
pub struct PassContext<'a> {
    pub encoder: &'a mut dyn CommandEncoder,
}

type PassCallback = Box<dyn FnMut(&mut PassContext)>;

/// One declared pass: its kind, resource accesses, attachments, flags, and
/// the callback that records its GPU work at execute time.
pub struct RGPass {
    pub name: String,
    pub kind: PassKind,
    pub reads: Vec<RGResourceHandle>,
    pub writes: Vec<RGResourceHandle>,
    pub color_attachments: Vec<ColorAttachment>,
    pub depth_attachment: Option<DepthStencilAttachment>,
    pub flags: PassFlags,
    pub callback: Option<PassCallback>,
}

impl RGPass {
    pub(crate) fn new(name: impl Into<String>, kind: PassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            reads: Vec::new(),
            writes: Vec::new(),
            color_attachments: Vec::new(),
            depth_attachment: None,
            flags: PassFlags::empty(),
            callback: None,
        }
    }
}

/// Fluent builder returned by `RenderGraph::add_graphics_pass` /
/// `add_compute_pass`. Mutates the pass it was created for in place.
pub struct PassBuilder<'g> {
    pass: &'g mut RGPass,
}

impl<'g> PassBuilder<'g> {
    pub(crate) fn new(pass: &'g mut RGPass) -> Self {
        Self { pass }
    }

    #[must_use]
    pub fn color_attachment(self, slot: usize, attachment: ColorAttachment) -> Self {
        if self.pass.color_attachments.len() <= slot {
            self.pass.color_attachments.resize(
                slot + 1,
                ColorAttachment { handle: attachment.handle, clear_color: Color::TRANSPARENT, load_op: LoadOp::DontCare, store_op: StoreOp::Discard, mip_level: 0, array_layer: 0 },
            );
        }
        self.pass.color_attachments[slot] = attachment;
        self.pass.writes.push(attachment.handle);
        self
    }

    #[must_use]
    pub fn depth_attachment(self, attachment: DepthStencilAttachment) -> Self {
        if !attachment.read_only {
            self.pass.writes.push(attachment.handle);
        } else {
            self.pass.reads.push(attachment.handle);
        }
        self.pass.depth_attachment = Some(attachment);
        self
    }

    #[must_use]
    pub fn reads(self, handle: RGResourceHandle) -> Self {
        self.pass.reads.push(handle);
        self
    }

    #[must_use]
    pub fn writes(self, handle: RGResourceHandle) -> Self {
        self.pass.writes.push(handle);
        self
    }

    #[must_use]
    pub fn flags(self, flags: PassFlags) -> Self {
        self.pass.flags |= flags;
        self
    }

    pub fn callback(self, callback: impl FnMut(&mut PassContext) + 'static) -> Self {
        self.pass.callback = Some(Box::new(callback));
        self
    }
}
