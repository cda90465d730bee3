//! Shared HAL test doubles for the black-box integration tests in this
//! directory. A real backend would record GPU commands; these just record
//! that the contract was called correctly.

use forgelight_core::hal::{
    BufferId, BufferUsage, CommandEncoder, Device, DeviceCaps, Format, Queue, TextureId, TextureUsage,
};

pub struct NullEncoder;

impl CommandEncoder for NullEncoder {
    fn copy_buffer_to_buffer(&mut self, _src: BufferId, _src_offset: u64, _dst: BufferId, _dst_offset: u64, _size: u64) {}
    fn copy_buffer_to_texture(&mut self, _src: BufferId, _dst: TextureId) {}
    fn copy_texture_to_texture(&mut self, _src: TextureId, _dst: TextureId) {}
    fn generate_mipmaps(&mut self, _texture: TextureId) {}
}

pub struct FakeDevice {
    next_id: std::cell::Cell<u64>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self { next_id: std::cell::Cell::new(1) }
    }
}

impl Device for FakeDevice {
    fn caps(&self) -> DeviceCaps {
        DeviceCaps { flip_projection_required: false, min_uniform_buffer_offset_alignment: 256 }
    }

    fn create_buffer(&self, _size: u64, _usage: BufferUsage, _label: Option<&str>) -> Option<BufferId> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Some(BufferId(id))
    }

    fn create_texture_2d(&self, _width: u32, _height: u32, _format: Format, _usage: TextureUsage, _mip_count: u32, _label: Option<&str>) -> Option<TextureId> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Some(TextureId(id))
    }

    fn destroy_buffer(&self, _buffer: BufferId) {}
    fn destroy_texture(&self, _texture: TextureId) {}

    fn create_command_encoder(&self) -> Box<dyn CommandEncoder> {
        Box::new(NullEncoder)
    }

    fn wait_idle(&self) {}
}

pub struct NullQueue;

impl Queue for NullQueue {
    fn write_buffer(&self, _buffer: BufferId, _offset: u64, _data: &[u8]) {}
    fn write_texture(&self, _texture: TextureId, _data: &[u8]) {}
    fn submit(&self, _encoder: Box<dyn CommandEncoder>) {}
    fn wait_idle(&self) {}
}
