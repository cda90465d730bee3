//! Draw-command sorting and batch coalescing (`spec.md` §4.5,
//! "DrawBatcher").

use crate::batching::draw_key::{opaque_key, overlay_key, transparent_key, DrawLayer};

/// One draw submission, carrying its packed sort key (`spec.md` §3,
/// "DrawCommand").
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand {
    pub sort_key: u64,
    pub pipeline_id: u32,
    pub material_id: u32,
    pub mesh_id: u32,
    pub instance_offset: u32,
    pub instance_count: u32,
    pub view_depth: f32,
    pub layer: DrawLayer,
}

/// A contiguous run of commands sharing `(pipeline, material, mesh)`, so
/// they can be issued with a single pipeline/material/vertex-buffer bind.
#[derive(Debug, Clone, Copy)]
pub struct Batch {
    pub pipeline_id: u32,
    pub material_id: u32,
    pub mesh_id: u32,
    pub layer: DrawLayer,
    pub first_command: u32,
    pub command_count: u32,
}

/// Accumulates [`DrawCommand`]s across a frame and coalesces them into
/// [`Batch`]es at `build_batches()`. Grounded on the sort-key batching shape
/// in `other_examples/7ccb82e7_..._batch.rs.rs`.
#[derive(Default)]
pub struct DrawBatcher {
    opaque: Vec<DrawCommand>,
    transparent: Vec<DrawCommand>,
    overlay: Vec<DrawCommand>,
}

impl DrawBatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
        self.overlay.clear();
    }

    pub fn add_opaque(
        &mut self,
        pipeline_id: u32,
        material_id: u32,
        mesh_id: u32,
        instance_offset: u32,
        instance_count: u32,
        depth: f32,
    ) {
        self.opaque.push(DrawCommand {
            sort_key: opaque_key(pipeline_id, material_id, mesh_id, depth),
            pipeline_id,
            material_id,
            mesh_id,
            instance_offset,
            instance_count,
            view_depth: depth,
            layer: DrawLayer::Opaque,
        });
    }

    pub fn add_transparent(
        &mut self,
        pipeline_id: u32,
        material_id: u32,
        mesh_id: u32,
        instance_offset: u32,
        instance_count: u32,
        depth: f32,
    ) {
        self.transparent.push(DrawCommand {
            sort_key: transparent_key(pipeline_id, material_id, mesh_id, depth),
            pipeline_id,
            material_id,
            mesh_id,
            instance_offset,
            instance_count,
            view_depth: depth,
            layer: DrawLayer::Transparent,
        });
    }

    pub fn add_overlay(
        &mut self,
        pipeline_id: u32,
        material_id: u32,
        mesh_id: u32,
        instance_offset: u32,
        instance_count: u32,
        depth: f32,
    ) {
        self.overlay.push(DrawCommand {
            sort_key: overlay_key(pipeline_id, material_id, mesh_id, depth),
            pipeline_id,
            material_id,
            mesh_id,
            instance_offset,
            instance_count,
            view_depth: depth,
            layer: DrawLayer::Overlay,
        });
    }

    /// Sorts each layer independently by `sort_key` (ties broken by mesh id,
    /// then original insertion order), then coalesces adjacent commands
    /// sharing `(pipeline, material, mesh)` into one [`Batch`]. Returns the
    /// flattened, sorted command list alongside the batch list; batch
    /// `first_command`/`command_count` index into that list.
    #[must_use]
    pub fn build_batches(&self) -> (Vec<DrawCommand>, Vec<Batch>) {
        let mut commands = Vec::with_capacity(self.opaque.len() + self.transparent.len() + self.overlay.len());
        for layer_commands in [&self.opaque, &self.transparent, &self.overlay] {
            let mut indexed: Vec<(usize, DrawCommand)> = layer_commands.iter().copied().enumerate().collect();
            indexed.sort_by(|(ia, a), (ib, b)| {
                a.sort_key.cmp(&b.sort_key).then(a.mesh_id.cmp(&b.mesh_id)).then(ia.cmp(ib))
            });
            commands.extend(indexed.into_iter().map(|(_, cmd)| cmd));
        }

        let mut batches = Vec::new();
        let mut i = 0usize;
        while i < commands.len() {
            let head = commands[i];
            let mut j = i + 1;
            while j < commands.len()
                && commands[j].pipeline_id == head.pipeline_id
                && commands[j].material_id == head.material_id
                && commands[j].mesh_id == head.mesh_id
                && commands[j].layer == head.layer
            {
                j += 1;
            }
            batches.push(Batch {
                pipeline_id: head.pipeline_id,
                material_id: head.material_id,
                mesh_id: head.mesh_id,
                layer: head.layer,
                first_command: i as u32,
                command_count: (j - i) as u32,
            });
            i = j;
        }

        (commands, batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_commands_sharing_state_coalesce_into_one_batch() {
        let mut batcher = DrawBatcher::new();
        batcher.add_opaque(1, 1, 1, 0, 1, 0.1);
        batcher.add_opaque(1, 1, 1, 1, 1, 0.2);
        batcher.add_opaque(2, 2, 2, 2, 1, 0.1);

        let (commands, batches) = batcher.build_batches();
        assert_eq!(commands.len(), 3);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].command_count, 2);
        assert_eq!(batches[1].command_count, 1);
    }

    #[test]
    fn every_command_in_a_batch_shares_its_batchs_layer() {
        let mut batcher = DrawBatcher::new();
        batcher.add_opaque(1, 1, 1, 0, 1, 0.5);
        batcher.add_transparent(1, 1, 1, 1, 1, 0.5);

        let (commands, batches) = batcher.build_batches();
        for batch in &batches {
            let range = batch.first_command as usize..(batch.first_command + batch.command_count) as usize;
            for cmd in &commands[range] {
                assert_eq!(cmd.layer, batch.layer);
            }
        }
    }

    #[test]
    fn opaque_commands_sort_before_transparent_within_build() {
        let mut batcher = DrawBatcher::new();
        batcher.add_transparent(1, 1, 1, 0, 1, 0.5);
        batcher.add_opaque(9, 9, 9, 0, 1, 0.5);

        let (commands, _) = batcher.build_batches();
        assert_eq!(commands[0].layer, DrawLayer::Opaque);
        assert_eq!(commands[1].layer, DrawLayer::Transparent);
    }
}
