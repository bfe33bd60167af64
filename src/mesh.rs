use bytemuck::{Pod, Zeroable};

use crate::curve::Curve;

/// Side flag of the left edge of the ribbon.
pub const LEFT_SIDE: u8 = 0;
/// Side flag of the right edge of the ribbon. Read through a normalized
/// attribute, this is `1.0`.
pub const RIGHT_SIDE: u8 = u8::MAX;

/// One ribbon vertex. The vertex stage rebuilds the curve position from the
/// encoding and the batch's control point array, then offsets it by half the
/// ribbon width along the curve normal, towards the side named by `side[0]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SplineVertex {
    /// `[progress, blend, control_point_index]`, see [`SampleEncoding`].
    pub encoding: [f32; 3],
    /// The red channel holds [`LEFT_SIDE`] or [`RIGHT_SIDE`]. The remaining
    /// channels are unused.
    pub side: [u8; 4],
}

impl SplineVertex {
    /// Returns true if this vertex is on the right edge of the ribbon.
    #[must_use]
    pub const fn is_right(&self) -> bool {
        self.side[0] == RIGHT_SIDE
    }
}

/// Where on a curve a sample lies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleEncoding {
    /// Normalized progress along the curve, `sample / sample_count`.
    pub progress: f32,
    /// Blend factor inside the interpolation segment.
    pub blend: f32,
    /// Absolute index of the first of the four control points the segment
    /// reads from the batch's control point array.
    pub control_point_index: u32,
}

impl SampleEncoding {
    /// Encodes sample `sample` of a curve with `sample_count` samples and
    /// `control_point_count` control points starting at `control_point_offset`.
    ///
    /// A curve with `n` control points has `n - 3` segments. Curves with fewer
    /// than four points have none, so every sample lands at the start of the
    /// curve.
    #[must_use]
    pub fn new(
        sample: usize,
        sample_count: usize,
        control_point_count: usize,
        control_point_offset: usize,
    ) -> Self {
        let progress = sample as f32 / sample_count as f32;
        let interval = progress * control_point_count.saturating_sub(3) as f32;
        let segment = interval.floor();
        Self {
            progress,
            blend: interval - segment,
            control_point_index: (control_point_offset + segment as usize) as u32,
        }
    }

    /// Returns the vertex encoding of this sample.
    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        [self.progress, self.blend, self.control_point_index as f32]
    }
}

/// The static topology of one batch. Generated once when the batch is
/// finalized and never rebuilt.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchMesh {
    vertices: Vec<SplineVertex>,
    indices: Vec<u16>,
}

impl BatchMesh {
    /// Emits the ribbons of `curves`, in order. `curves` must be every curve
    /// of one batch, so that the running control point cursor matches the
    /// layout of the batch's control point buffer.
    #[must_use]
    pub fn generate(curves: &[Curve]) -> Self {
        let (vertex_count, index_count) = curves.iter().fold((0, 0), |(v, i), curve| {
            (v + curve.vertex_count(), i + curve.triangle_count() * 3)
        });
        let mut mesh = Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
        };

        let mut vertex_cursor = 0;
        let mut control_point_cursor = 0;
        for curve in curves {
            debug_assert_eq!(curve.control_point_offset, control_point_cursor);
            mesh.add_ribbon(curve, vertex_cursor, control_point_cursor);
            vertex_cursor += curve.vertex_count();
            control_point_cursor += curve.control_point_count;
        }

        mesh
    }

    fn add_ribbon(&mut self, curve: &Curve, vertex_cursor: usize, control_point_cursor: usize) {
        for sample in 0..curve.sample_count {
            let encoding = SampleEncoding::new(
                sample,
                curve.sample_count,
                curve.control_point_count,
                control_point_cursor,
            )
            .to_array();
            self.vertices.push(SplineVertex {
                encoding,
                side: [LEFT_SIDE, 0, 0, 0],
            });
            self.vertices.push(SplineVertex {
                encoding,
                side: [RIGHT_SIDE, 0, 0, 0],
            });
        }

        for sample in 1..curve.sample_count {
            let left = (vertex_cursor + (sample - 1) * 2) as u16;
            self.add_quad(left, left + 1, left + 2, left + 3);
        }
    }

    fn add_quad(&mut self, left: u16, right: u16, next_left: u16, next_right: u16) {
        self.indices.push(left);
        self.indices.push(next_left);
        self.indices.push(right);

        self.indices.push(right);
        self.indices.push(next_left);
        self.indices.push(next_right);
    }

    /// The ribbon vertices.
    #[must_use]
    pub fn vertices(&self) -> &[SplineVertex] {
        &self.vertices
    }

    /// The triangle list, three indices per triangle.
    #[must_use]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// The number of triangles in the mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::batch::BatchId;

    fn curve(offset: usize, count: usize, samples: usize) -> Curve {
        Curve {
            batch: BatchId(0),
            control_point_offset: offset,
            control_point_count: count,
            sample_count: samples,
        }
    }

    #[test]
    fn single_segment_curve() {
        let mesh = BatchMesh::generate(&[curve(0, 4, 4)]);
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.triangle_count(), 6);
        assert_eq!(mesh.indices().len(), 18);
        for (sample, pair) in mesh.vertices().chunks(2).enumerate() {
            assert_relative_eq!(pair[0].encoding[0], sample as f32 * 0.25);
            assert_relative_eq!(pair[0].encoding[1], sample as f32 * 0.25);
            assert_relative_eq!(pair[0].encoding[2], 0.);
            assert_eq!(pair[0].encoding, pair[1].encoding);
            assert!(!pair[0].is_right());
            assert!(pair[1].is_right());
        }
    }

    #[test]
    fn winding() {
        let mesh = BatchMesh::generate(&[curve(0, 4, 3)]);
        assert_eq!(mesh.indices(), &[0, 2, 1, 1, 2, 3, 2, 4, 3, 3, 4, 5]);
    }

    #[test]
    fn segments_and_blend() {
        // 7 control points give 4 segments.
        let encoding = SampleEncoding::new(3, 8, 7, 0);
        assert_relative_eq!(encoding.progress, 0.375);
        assert_eq!(encoding.control_point_index, 1);
        assert_relative_eq!(encoding.blend, 0.5);

        let encoding = SampleEncoding::new(7, 8, 7, 10);
        assert_eq!(encoding.control_point_index, 13);
        assert_relative_eq!(encoding.blend, 0.5);
    }

    #[test]
    fn short_curves_stay_at_their_start() {
        for count in 1..=3 {
            for sample in 0..5 {
                let encoding = SampleEncoding::new(sample, 5, count, 42);
                assert_eq!(encoding.control_point_index, 42);
                assert_relative_eq!(encoding.blend, 0.);
            }
        }
    }

    #[test]
    fn cursors_advance_across_curves() {
        let mesh = BatchMesh::generate(&[curve(0, 5, 2), curve(5, 4, 3)]);
        assert_eq!(mesh.vertices().len(), 10);
        assert_eq!(mesh.triangle_count(), 2 + 4);
        // The second curve starts at vertex 4 and control point 5.
        assert_relative_eq!(mesh.vertices()[4].encoding[2], 5.);
        assert_eq!(&mesh.indices()[6..12], &[4, 6, 5, 5, 6, 7]);
    }

    #[test]
    fn degenerate_curves_have_no_triangles() {
        let mesh = BatchMesh::generate(&[curve(0, 4, 1), curve(4, 4, 2)]);
        assert_eq!(mesh.vertices().len(), 6);
        assert_eq!(mesh.indices(), &[2, 4, 3, 3, 4, 5]);
    }
}
