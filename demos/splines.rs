//! Randomly placed copies of one spline, each wiggling on its own phase.

use std::time::Instant;

use rand::Rng;
use spline_batcher::{headless::HeadlessBackend, prelude::*};
use tracing::Level;

const SPLINE_COUNT: usize = 80;
const SAMPLES_PER_SPLINE: usize = 80;
const FRAMES: usize = 600;
const FRAME_TIME: f32 = 1. / 60.;

fn template() -> Vec<Point> {
    vec![
        Point::new(0., 0.),
        Point::new(0., 0.),
        Point::new(1., 0.),
        Point::new(1., 2.),
        Point::new(0., 2.),
        Point::new(-1., 3.),
        Point::new(-2., 3.),
        Point::new(-2., 3.),
        Point::new(-4., 3.),
    ]
}

/// A repeating displacement, periodic over `0..1`.
fn wiggle(time: f32) -> (f32, f32) {
    let angle = time * std::f32::consts::TAU;
    (angle.sin() * 0.25, (angle * 2.).cos() * 0.1)
}

fn main() -> spline_batcher::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let mut rng = rand::thread_rng();
    let mut batcher = SplineBatcher::new();
    let mut originals = Vec::new();
    for _ in 0..SPLINE_COUNT {
        let dx = rng.gen_range(-2.0..2.0);
        let dy = rng.gen_range(-4.0..2.0);
        let points = template()
            .into_iter()
            .map(|point| Point::new(point.x + dx, point.y + dy))
            .collect::<Vec<_>>();
        batcher.add(&points, SAMPLES_PER_SPLINE)?;
        originals.extend(points);
    }
    batcher.generate();

    let mut backend = HeadlessBackend::default();
    let mut frame = originals.clone();
    let started = Instant::now();
    let mut uploads = 0;
    for tick in 0..FRAMES {
        let time = (tick as f32 * FRAME_TIME * 0.25).fract();
        for (i, (target, original)) in frame.iter_mut().zip(&originals).enumerate() {
            let (dx, dy) = wiggle((time + (i % 5) as f32 / 5.).fract());
            *target = Point::new(original.x + dx, original.y + dy);
        }
        batcher.modify(&frame)?;
        uploads += batcher.update(&mut backend).control_point_uploads;
    }

    tracing::info!(
        splines = batcher.len(),
        batches = batcher.batches().len(),
        frames = FRAMES,
        uploads,
        elapsed = ?started.elapsed(),
        "finished"
    );
    Ok(())
}
