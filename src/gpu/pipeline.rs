use std::marker::PhantomData;
use std::ops::Deref;

use bytemuck::{Pod, Zeroable};
use easygpu::prelude::*;

use crate::math::Point;

/// A pipeline for rendering batched spline ribbons.
pub struct SplinePipeline<S> {
    core: PipelineCore,
    _shader: PhantomData<S>,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
/// The uniforms shared by every batch.
pub struct Uniforms {
    /// The orthographic projection matrix
    pub ortho: [f32; 16],
    /// The transformation matrix
    pub transform: [f32; 16],
}

/// One element of the `_ControlPoints` uniform array. Array elements are
/// 16 bytes apart in a uniform block, so the point is padded to a `vec4`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ControlPointUniform {
    /// The control point's x and y.
    pub position: [f32; 2],
    _padding: [f32; 2],
}

impl From<Point> for ControlPointUniform {
    fn from(point: Point) -> Self {
        Self {
            position: point.to_array(),
            _padding: [0.; 2],
        }
    }
}

/// The `_Width` uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WidthUniform {
    /// The full width of the ribbon.
    pub width: f32,
    _padding: [f32; 3],
}

impl From<f32> for WidthUniform {
    fn from(width: f32) -> Self {
        Self {
            width,
            _padding: [0.; 3],
        }
    }
}

impl<S> SplinePipeline<S> {
    /// Creates the per-batch binding group holding `control_points` and
    /// `width`.
    pub fn binding(
        &self,
        renderer: &Renderer,
        control_points: &UniformBuffer,
        width: &UniformBuffer,
    ) -> BindingGroup {
        renderer
            .device
            .create_binding_group(&self.pipeline.layout.sets[1], &[control_points, width])
    }
}

impl<'a, S> AbstractPipeline<'a> for SplinePipeline<S>
where
    S: SplineShader,
{
    type PrepareContext = ScreenTransformation<f32>;
    type Uniforms = self::Uniforms;

    fn description() -> PipelineDescription<'a> {
        PipelineDescription {
            vertex_layout: &[VertexFormat::Float3, VertexFormat::UByte4],
            pipeline_layout: &[
                Set(&[Binding {
                    binding: BindingType::UniformBuffer,
                    stage: ShaderStage::VERTEX,
                }]),
                Set(&[
                    Binding {
                        binding: BindingType::UniformBuffer,
                        stage: ShaderStage::VERTEX,
                    },
                    Binding {
                        binding: BindingType::UniformBuffer,
                        stage: ShaderStage::VERTEX,
                    },
                ]),
            ],
            vertex_shader: S::vertex_shader(),
            fragment_shader: S::fragment_shader(),
        }
    }

    fn setup(pipeline: easygpu::pipeline::Pipeline, dev: &Device) -> Self {
        let transform = ScreenTransformation::identity().to_array();
        let ortho = ScreenTransformation::identity().to_array();
        let uniforms = dev.create_uniform_buffer(&[self::Uniforms { ortho, transform }]);
        let bindings = dev.create_binding_group(&pipeline.layout.sets[0], &[&uniforms]);

        Self {
            core: PipelineCore {
                pipeline,
                bindings,
                uniforms,
            },
            _shader: PhantomData::default(),
        }
    }

    fn prepare(
        &'a self,
        ortho: ScreenTransformation<f32>,
    ) -> Option<(&'a UniformBuffer, Vec<self::Uniforms>)> {
        let ortho = ortho.to_array();
        let transform = ScreenTransformation::identity().to_array();
        Some((&self.uniforms, vec![self::Uniforms { ortho, transform }]))
    }
}

impl<S> Deref for SplinePipeline<S> {
    type Target = PipelineCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// The compiled evaluation stage for spline ribbons.
///
/// The vertex shader receives, per vertex, a `vec3` holding
/// `(progress, blend, control_point_index)` and a normalized `vec4` whose red
/// channel is `0` on the left edge and `1` on the right edge. Set 0 binding 0
/// holds [`Uniforms`]. Set 1 binding 0 holds `_ControlPoints`, an array of
/// `vec4` as long as the batch capacity, and set 1 binding 1 holds `_Width`.
/// `shaders/spline.vert` is a reference implementation.
pub trait SplineShader {
    /// The SPIR-V vertex shader.
    #[must_use]
    fn vertex_shader() -> &'static [u8];

    /// The SPIR-V fragment shader.
    #[must_use]
    fn fragment_shader() -> &'static [u8];
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn uniform_layouts() {
        assert_eq!(size_of::<ControlPointUniform>(), 16);
        assert_eq!(size_of::<WidthUniform>(), 16);
    }

    #[test]
    fn control_point_conversion() {
        let uniform = ControlPointUniform::from(Point::new(1.5, -2.));
        assert_relative_eq!(uniform.position[0], 1.5);
        assert_relative_eq!(uniform.position[1], -2.);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniform));
        assert_eq!(&floats[2..], &[0., 0.]);
    }
}
