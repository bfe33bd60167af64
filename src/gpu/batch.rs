use easygpu::prelude::*;

use super::pipeline::{ControlPointUniform, SplinePipeline, WidthUniform};
use crate::{math::Point, mesh::BatchMesh};

/// The device resources of one batch: its static mesh and its parameter
/// block.
pub struct GpuBatch {
    pub buffers: MeshBuffers,
    pub binding: BindingGroup,
    control_points: UniformBuffer,
    width: UniformBuffer,
}

impl GpuBatch {
    /// Uploads `mesh` and allocates a parameter block with room for
    /// `capacity` control points.
    pub fn new<S>(
        renderer: &Renderer,
        pipeline: &SplinePipeline<S>,
        mesh: &BatchMesh,
        capacity: usize,
    ) -> Self {
        let buffers = MeshBuffers {
            vertices: renderer.device.create_buffer(mesh.vertices()),
            indices: renderer.device.create_index(mesh.indices()),
            index_count: mesh.indices().len() as u32,
        };
        let control_points = renderer
            .device
            .create_uniform_buffer(&vec![ControlPointUniform::default(); capacity]);
        let width = renderer
            .device
            .create_uniform_buffer(&[WidthUniform::default()]);
        let binding = pipeline.binding(renderer, &control_points, &width);

        Self {
            buffers,
            binding,
            control_points,
            width,
        }
    }

    pub fn write_control_points(&self, renderer: &Renderer, points: &[Point]) {
        let uniforms = points
            .iter()
            .copied()
            .map(ControlPointUniform::from)
            .collect::<Vec<_>>();
        renderer
            .device
            .update_uniform_buffer::<ControlPointUniform>(&uniforms, &self.control_points);
    }

    pub fn write_width(&self, renderer: &Renderer, width: f32) {
        renderer
            .device
            .update_uniform_buffer::<WidthUniform>(&[WidthUniform::from(width)], &self.width);
    }
}

pub struct MeshBuffers {
    pub vertices: VertexBuffer,
    pub indices: IndexBuffer,
    pub index_count: u32,
}

impl Draw for MeshBuffers {
    fn draw<'a, 'b>(&'a self, binding: &'a BindingGroup, pass: &'b mut wgpu::RenderPass<'a>) {
        if self.index_count > 0 {
            pass.set_binding(binding, &[]);
            pass.set_easy_vertex_buffer(&self.vertices);
            pass.set_easy_index_buffer(&self.indices);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}
