use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    headless::{Command, HeadlessBackend},
    prelude::*,
};

fn square() -> Vec<Point> {
    vec![
        Point::new(0., 0.),
        Point::new(1., 0.),
        Point::new(1., 1.),
        Point::new(0., 1.),
    ]
}

fn line(count: usize, seed: f32) -> Vec<Point> {
    (0..count)
        .map(|i| Point::new(seed + i as f32, seed * 2. - i as f32))
        .collect()
}

#[test]
fn single_square_curve() {
    let mut batcher = SplineBatcher::new();
    let handle = batcher.add(&square(), 4).unwrap();
    assert_eq!(handle.index(), 0);
    let curve = *batcher.curve(handle).unwrap();
    assert_eq!(curve.control_point_count, 4);
    assert_eq!(curve.control_point_offset, 0);
    assert!(batcher.batches()[0].mesh().is_none());

    batcher.generate();
    let mesh = batcher.batches()[0].mesh().unwrap();
    assert_eq!(mesh.vertices().len(), 8);
    assert_eq!(mesh.triangle_count(), 6);
    let progress = mesh
        .vertices()
        .iter()
        .step_by(2)
        .map(|vertex| vertex.encoding[0])
        .collect::<Vec<_>>();
    for (actual, expected) in progress.iter().zip(&[0., 0.25, 0.5, 0.75]) {
        assert_relative_eq!(*actual, *expected);
    }
    assert!(mesh
        .vertices()
        .iter()
        .all(|vertex| vertex.encoding[2] == 0.));
}

#[test]
fn overflowing_control_points_starts_a_new_batch() {
    let mut batcher = SplineBatcher::new();
    for i in 0..249 {
        batcher.add(&line(4, i as f32), 8).unwrap();
    }
    batcher.add(&line(3, 0.), 8).unwrap();
    assert_eq!(batcher.batches().len(), 1);
    assert_eq!(batcher.batches()[0].control_point_fill(), 999);
    assert!(!batcher.batches()[0].is_finalized());

    let overflow = batcher.add(&line(2, 0.), 8).unwrap();
    assert_eq!(batcher.batches().len(), 2);
    assert_eq!(batcher.curve(overflow).unwrap().batch.index(), 1);

    let closed = &batcher.batches()[0];
    assert!(closed.is_finalized());
    assert_eq!(closed.curves(), 0..250);
    assert_eq!(closed.mesh().unwrap().vertices().len(), 250 * 16);
    assert_eq!(closed.mesh().unwrap().triangle_count(), 250 * 14);
    assert!(!batcher.batches()[1].is_finalized());
}

#[test]
fn overflowing_vertices_starts_a_new_batch() {
    let mut batcher = SplineBatcher::new();
    batcher.add(&square(), 32_000).unwrap();
    batcher.add(&square(), 500).unwrap();
    assert_eq!(batcher.batches().len(), 1);
    assert_eq!(batcher.batches()[0].vertex_fill(), 65_000);

    batcher.add(&square(), 1).unwrap();
    assert_eq!(batcher.batches().len(), 2);
    assert_eq!(batcher.batches()[1].vertex_fill(), 2);
}

#[test]
fn random_curves_partition_into_batches() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = Config::default()
        .with_max_control_points(64)
        .with_max_vertices(400);
    let mut batcher = SplineBatcher::with_config(config).unwrap();
    for _ in 0..500 {
        let control_points = rng.gen_range(1..=64);
        let samples = rng.gen_range(1..=200);
        batcher
            .add(&line(control_points, rng.gen()), samples)
            .unwrap();
    }
    batcher.generate();

    let mut next_curve = 0;
    for batch in batcher.batches() {
        assert!(batch.control_point_fill() <= 64);
        assert!(batch.vertex_fill() <= 400);
        assert!(batch.is_finalized());
        assert_eq!(batch.curves().start, next_curve);
        assert!(!batch.curves().is_empty());
        next_curve = batch.curves().end;

        let mut offset = 0;
        let mut vertices = 0;
        let mut triangles = 0;
        for (handle, curve) in batcher
            .curves()
            .iter()
            .filter(|(handle, _)| batch.curves().contains(&handle.index()))
        {
            assert_eq!(curve.batch, batch.id());
            assert_eq!(curve.control_point_offset, offset, "curve {:?}", handle);
            offset += curve.control_point_count;
            vertices += curve.vertex_count();
            triangles += curve.triangle_count();
        }
        assert_eq!(offset, batch.control_point_fill());
        assert_eq!(vertices, batch.vertex_fill());

        let mesh = batch.mesh().unwrap();
        assert_eq!(mesh.vertices().len(), vertices);
        assert_eq!(mesh.triangle_count(), triangles);
        assert!(mesh
            .indices()
            .iter()
            .all(|&index| usize::from(index) < vertices));
    }
    assert_eq!(next_curve, batcher.len());
}

#[test]
fn modify_round_trip() {
    let mut batcher =
        SplineBatcher::with_config(Config::default().with_max_control_points(10)).unwrap();
    let originals = (0..9).map(|i| line(4 + i % 3, i as f32)).collect::<Vec<_>>();
    let handles = originals
        .iter()
        .map(|points| batcher.add(points, 5).unwrap())
        .collect::<Vec<_>>();
    batcher.generate();
    assert!(batcher.batches().len() > 1);

    let flattened = originals.concat();
    let shifted = flattened
        .iter()
        .map(|point| Point::new(point.x + 100., point.y))
        .collect::<Vec<_>>();
    batcher.modify(&shifted).unwrap();
    assert_ne!(batcher.curve_control_points(handles[0]).unwrap(), originals[0].as_slice());

    batcher.modify(&flattened).unwrap();
    for (handle, original) in handles.iter().zip(&originals) {
        assert_eq!(batcher.curve_control_points(*handle).unwrap(), original.as_slice());
    }
    let read_back = batcher
        .batches()
        .iter()
        .flat_map(|batch| batch.control_points().iter().copied())
        .collect::<Vec<_>>();
    assert_eq!(read_back, flattened);
}

#[test]
fn thousand_single_point_curves() {
    for max_control_points in [1000, 300] {
        let mut batcher = SplineBatcher::with_config(
            Config::default().with_max_control_points(max_control_points),
        )
        .unwrap();
        for i in 0..1000 {
            batcher.add(&[Point::new(i as f32, 0.)], 1).unwrap();
        }
        batcher.generate();
        assert_eq!(
            batcher.batches().len(),
            (1000 + max_control_points - 1) / max_control_points
        );

        let values = (0..1000)
            .map(|i| Point::new(-(i as f32), i as f32 * 0.5))
            .collect::<Vec<_>>();
        batcher.modify(&values).unwrap();

        let mut remaining = values.as_slice();
        for batch in batcher.batches() {
            let (expected, rest) = remaining.split_at(batch.control_point_fill());
            assert_eq!(batch.control_points(), expected);
            remaining = rest;
        }
        assert!(remaining.is_empty());
    }
}

#[test]
fn generate_is_idempotent() {
    let mut batcher = SplineBatcher::new();
    batcher.generate();
    assert!(batcher.batches().is_empty());

    batcher.add(&square(), 10).unwrap();
    batcher.add(&line(6, 1.), 7).unwrap();
    batcher.generate();
    let first = batcher.batches()[0].mesh().unwrap().clone();
    let first_address = batcher.batches()[0].mesh().unwrap() as *const BatchMesh;

    batcher.generate();
    let second = batcher.batches()[0].mesh().unwrap();
    assert!(std::ptr::eq(first_address, second));
    assert_eq!(&first, second);
    assert_eq!(batcher.batches().len(), 1);
}

#[test]
fn frames_upload_only_what_changed() {
    let mut batcher =
        SplineBatcher::with_config(Config::default().with_max_control_points(8)).unwrap();
    for i in 0..4 {
        batcher.add(&line(4, i as f32), 6).unwrap();
    }
    batcher.generate();
    let mut backend = HeadlessBackend::default();

    let stats = batcher.update(&mut backend);
    assert_eq!(stats.finalized, 0);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.control_point_uploads, 2);
    assert_eq!(stats.width_uploads, 2);
    assert_eq!(backend.draws().collect::<Vec<_>>(), [BatchId(0), BatchId(1)]);
    // Uploads for a batch precede its draw.
    assert_eq!(
        &backend.commands()[..4],
        &[
            Command::CreateBatch {
                batch: BatchId(0),
                vertices: 24,
                indices: 60,
            },
            Command::UploadControlPoints {
                batch: BatchId(0),
                len: 8,
            },
            Command::UploadWidth {
                batch: BatchId(0),
                width: batcher.width(),
            },
            Command::Draw(BatchId(0)),
        ]
    );

    let stats = batcher.update(&mut backend);
    assert_eq!(
        stats,
        FrameStats {
            draws: 2,
            ..FrameStats::default()
        }
    );
    assert_eq!(backend.frames(), 2);

    let values = (0..16)
        .map(|i| Point::new(i as f32, 1.))
        .collect::<Vec<_>>();
    batcher.modify(&values).unwrap();
    batcher.set_width(0.75);
    let stats = batcher.update(&mut backend);
    assert_eq!(stats.control_point_uploads, 2);
    assert_eq!(stats.width_uploads, 2);
    for batch in batcher.batches() {
        let uploaded = backend.batch(batch.id()).unwrap();
        assert_eq!(uploaded.control_points, batch.control_point_buffer());
        assert_relative_eq!(uploaded.width.unwrap(), 0.75);
        assert_eq!(uploaded.draws, 3);
        assert_eq!(&uploaded.mesh, batch.mesh().unwrap());
    }
}

#[test]
fn update_finalizes_pending_batch() {
    let mut batcher = SplineBatcher::new();
    batcher.add(&square(), 3).unwrap();
    let mut backend = HeadlessBackend::default();

    let stats = batcher.update(&mut backend);
    assert_eq!(stats.finalized, 1);
    assert_eq!(stats.created, 1);
    assert!(batcher.batches()[0].is_finalized());
    assert_eq!(backend.batch_count(), 1);
}

#[test]
fn late_batches_still_receive_their_first_upload() {
    let mut batcher = SplineBatcher::new();
    batcher.add(&square(), 3).unwrap();
    batcher.generate();
    let mut backend = HeadlessBackend::default();
    batcher.update(&mut backend);

    let late = batcher.add(&line(5, 3.), 3).unwrap();
    assert_eq!(batcher.curve(late).unwrap().batch, BatchId(1));
    assert_eq!(batcher.dirty(BatchId(1)), DirtyFlags::default());
    let stats = batcher.update(&mut backend);
    assert_eq!(stats.finalized, 1);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.control_point_uploads, 1);
    assert_eq!(stats.width_uploads, 1);
    assert_eq!(stats.draws, 2);
    assert_eq!(
        &backend.batch(BatchId(1)).unwrap().control_points[..5],
        line(5, 3.).as_slice()
    );
}
