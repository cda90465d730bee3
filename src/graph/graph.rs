//! The render graph: declare a frame's passes and resources, compile an
//! ordered/culled execution plan, execute it (`spec.md` §4.8).

use crate::graph::compile::{compile, CompiledGraph, RgError};
use crate::graph::pass::{PassBuilder, PassContext, PassKind, RGPass};
use crate::graph::resource::{BufferResourceDesc, RGResource, RGResourceHandle, RGResourceKind, TextureResourceDesc};
use crate::hal::{Device, GpuResource};

/// Declares a frame's passes and resource dependencies, compiles a culled
/// execution order, and drives pass callbacks at execute time. One instance
/// is reused across frames; `begin_frame` clears all state (`spec.md`
/// §4.8, "begin_frame").
#[derive(Default)]
pub struct RenderGraph {
    resources: Vec<RGResource>,
    passes: Vec<RGPass>,
    compiled: Option<CompiledGraph>,
}

impl RenderGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all passes and resources from the previous frame.
    pub fn begin_frame(&mut self) {
        self.resources.clear();
        self.passes.clear();
        self.compiled = None;
    }

    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn create_texture(&mut self, name: impl Into<String>, desc: TextureResourceDesc) -> RGResourceHandle {
        self.push_resource(RGResource::transient(name, RGResourceKind::Texture(desc)))
    }

    pub fn create_buffer(&mut self, name: impl Into<String>, desc: BufferResourceDesc) -> RGResourceHandle {
        self.push_resource(RGResource::transient(name, RGResourceKind::Buffer(desc)))
    }

    /// Imports an externally owned texture (e.g. the swapchain backbuffer).
    /// Imported resources are never culled: any pass writing one is kept.
    pub fn import_texture(&mut self, name: impl Into<String>, desc: TextureResourceDesc, view: crate::hal::TextureId) -> RGResourceHandle {
        self.push_resource(RGResource::imported(name, RGResourceKind::Texture(desc), GpuResource::Texture(view)))
    }

    pub fn import_buffer(&mut self, name: impl Into<String>, desc: BufferResourceDesc, buffer: crate::hal::BufferId) -> RGResourceHandle {
        self.push_resource(RGResource::imported(name, RGResourceKind::Buffer(desc), GpuResource::Buffer(buffer)))
    }

    pub fn add_graphics_pass(&mut self, name: impl Into<String>) -> PassBuilder<'_> {
        self.passes.push(RGPass::new(name, PassKind::Graphics));
        let last = self.passes.len() - 1;
        PassBuilder::new(&mut self.passes[last])
    }

    pub fn add_compute_pass(&mut self, name: impl Into<String>) -> PassBuilder<'_> {
        self.passes.push(RGPass::new(name, PassKind::Compute));
        let last = self.passes.len() - 1;
        PassBuilder::new(&mut self.passes[last])
    }

    /// Builds the DAG, culls unreachable passes, and topologically sorts
    /// what remains. Must run before `execute`.
    pub fn compile(&mut self) -> Result<(), RgError> {
        let compiled = compile(&self.passes, &mut self.resources)?;
        self.compiled = Some(compiled);
        Ok(())
    }

    #[must_use]
    pub fn culled_pass_count(&self) -> usize {
        self.compiled.as_ref().map_or(0, |c| c.culled_pass_count)
    }

    #[must_use]
    pub fn pass_order(&self) -> &[usize] {
        self.compiled.as_ref().map_or(&[], |c| &c.pass_order)
    }

    /// Invokes every compiled pass's callback in order. `spec.md` §4.8's
    /// barrier/attachment bookkeeping is left to the callback: this crate's
    /// HAL (`spec.md` §9, "Polymorphism") exposes no render-pass-begin or
    /// barrier primitives of its own, so a concrete backend performs those
    /// inside the callback using the encoder passed here.
    pub fn execute(&mut self, device: &dyn Device) {
        let Some(compiled) = self.compiled.clone() else {
            log::warn!("RenderGraph::execute called without a successful compile()");
            return;
        };

        let mut encoder = device.create_command_encoder();
        for &pass_index in &compiled.pass_order {
            let pass = &mut self.passes[pass_index];
            if let Some(callback) = pass.callback.as_mut() {
                let mut ctx = PassContext { encoder: encoder.as_mut() };
                callback(&mut ctx);
            }
        }
    }

    /// No-op beyond bookkeeping (`spec.md` §4.8, "end_frame").
    pub fn end_frame(&mut self) {}

    fn push_resource(&mut self, resource: RGResource) -> RGResourceHandle {
        let handle = RGResourceHandle(self.resources.len() as u32);
        self.resources.push(resource);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::pass::{ColorAttachment, PassFlags};
    use crate::graph::resource::TextureResourceDesc;
    use crate::hal::{BufferId, BufferUsage, CommandEncoder, DeviceCaps, Format, TextureId, TextureUsage};

    struct NullEncoder;
    impl CommandEncoder for NullEncoder {
        fn copy_buffer_to_buffer(&mut self, _: BufferId, _: u64, _: BufferId, _: u64, _: u64) {}
        fn copy_buffer_to_texture(&mut self, _: BufferId, _: TextureId) {}
        fn copy_texture_to_texture(&mut self, _: TextureId, _: TextureId) {}
        fn generate_mipmaps(&mut self, _: TextureId) {}
    }

    struct NullDevice;
    impl Device for NullDevice {
        fn caps(&self) -> DeviceCaps {
            DeviceCaps::default()
        }
        fn create_buffer(&self, _: u64, _: BufferUsage, _: Option<&str>) -> Option<BufferId> {
            None
        }
        fn create_texture_2d(&self, _: u32, _: u32, _: Format, _: TextureUsage, _: u32, _: Option<&str>) -> Option<TextureId> {
            None
        }
        fn destroy_buffer(&self, _: BufferId) {}
        fn destroy_texture(&self, _: TextureId) {}
        fn create_command_encoder(&self) -> Box<dyn CommandEncoder> {
            Box::new(NullEncoder)
        }
        fn wait_idle(&self) {}
    }

    fn rt(graph: &mut RenderGraph, name: &str) -> RGResourceHandle {
        graph.create_texture(name, TextureResourceDesc::render_target(1920, 1080, Format::Rgba8Unorm))
    }

    #[test]
    fn unused_write_is_culled_without_never_cull() {
        let mut graph = RenderGraph::new();
        graph.begin_frame();
        let unused = rt(&mut graph, "Unused");
        graph.add_graphics_pass("UnusedPass").color_attachment(0, ColorAttachment::with_default_ops(unused));
        graph.compile().unwrap();

        assert_eq!(graph.pass_order().len(), 0);
        assert_eq!(graph.culled_pass_count(), 1);
    }

    #[test]
    fn never_cull_pass_survives_with_no_readers() {
        let mut graph = RenderGraph::new();
        graph.begin_frame();
        let unused = rt(&mut graph, "Unused");
        graph.add_graphics_pass("UnusedPass").color_attachment(0, ColorAttachment::with_default_ops(unused)).flags(PassFlags::NEVER_CULL);
        graph.compile().unwrap();

        assert_eq!(graph.pass_order().len(), 1);
        assert_eq!(graph.culled_pass_count(), 0);
    }

    #[test]
    fn two_pass_chain_compiles_and_executes_in_order() {
        let mut graph = RenderGraph::new();
        graph.begin_frame();
        let t = rt(&mut graph, "T");
        graph.add_graphics_pass("P1").color_attachment(0, ColorAttachment::with_default_ops(t)).flags(PassFlags::NEVER_CULL);
        graph.add_graphics_pass("P2").reads(t).color_attachment(0, ColorAttachment::with_default_ops(t)).flags(PassFlags::NEVER_CULL);
        graph.compile().unwrap();

        assert_eq!(graph.pass_order(), &[0, 1]);
    }

    #[test]
    fn gbuffer_lighting_postprocess_chain_has_no_culling() {
        let mut graph = RenderGraph::new();
        graph.begin_frame();
        let albedo = rt(&mut graph, "Albedo");
        let normal = rt(&mut graph, "Normal");
        let depth = graph.create_texture("Depth", TextureResourceDesc::depth_stencil(1920, 1080, Format::Depth32Float));
        let lit = rt(&mut graph, "Lit");
        let present = rt(&mut graph, "Present");

        graph
            .add_graphics_pass("GBuffer")
            .color_attachment(0, ColorAttachment::with_default_ops(albedo))
            .color_attachment(1, ColorAttachment::with_default_ops(normal))
            .writes(depth)
            .flags(PassFlags::NEVER_CULL);
        graph.add_graphics_pass("Lighting").reads(albedo).reads(normal).reads(depth).color_attachment(0, ColorAttachment::with_default_ops(lit)).flags(PassFlags::NEVER_CULL);
        graph.add_graphics_pass("PostProcess").reads(lit).color_attachment(0, ColorAttachment::with_default_ops(present)).flags(PassFlags::NEVER_CULL);

        graph.compile().unwrap();
        assert_eq!(graph.resource_count(), 5);
        assert_eq!(graph.pass_count(), 3);
        assert_eq!(graph.culled_pass_count(), 0);
    }

    #[test]
    fn begin_frame_fully_resets_state() {
        let mut graph = RenderGraph::new();
        graph.begin_frame();
        let t = rt(&mut graph, "T");
        graph.add_graphics_pass("P").color_attachment(0, ColorAttachment::with_default_ops(t)).flags(PassFlags::NEVER_CULL);
        graph.compile().unwrap();
        assert_eq!(graph.pass_count(), 1);

        graph.begin_frame();
        assert_eq!(graph.pass_count(), 0);
        assert_eq!(graph.resource_count(), 0);
    }

    #[test]
    fn render_graph_cull_scenario_matches_spec() {
        let mut graph = RenderGraph::new();
        graph.begin_frame();
        let albedo = rt(&mut graph, "Albedo");
        let normal = rt(&mut graph, "Normal");
        let depth = graph.create_texture("Depth", TextureResourceDesc::depth_stencil(1920, 1080, Format::Depth32Float));
        let unused = rt(&mut graph, "Unused");

        graph
            .add_graphics_pass("GBuffer")
            .color_attachment(0, ColorAttachment::with_default_ops(albedo))
            .color_attachment(1, ColorAttachment::with_default_ops(normal))
            .writes(depth)
            .flags(PassFlags::NEVER_CULL);
        graph.add_graphics_pass("UnusedPass").color_attachment(0, ColorAttachment::with_default_ops(unused));

        graph.compile().unwrap();
        assert_eq!(graph.pass_count(), 2);
        assert_eq!(graph.culled_pass_count(), 1);
    }

    #[test]
    fn execute_invokes_surviving_pass_callbacks() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let mut graph = RenderGraph::new();
        graph.begin_frame();
        let t = rt(&mut graph, "T");
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        graph
            .add_graphics_pass("P")
            .color_attachment(0, ColorAttachment::with_default_ops(t))
            .flags(PassFlags::NEVER_CULL)
            .callback(move |_ctx| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            });

        graph.compile().unwrap();
        graph.execute(&NullDevice);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
