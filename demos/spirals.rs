//! A grid of high sample count shapes morphing between circles and spirals.

use std::time::Instant;

use spline_batcher::{headless::HeadlessBackend, prelude::*};
use tracing::Level;

const SHAPES: usize = 10;
const SAMPLES_PER_SHAPE: usize = 1000;
const FRAMES: usize = 600;
const FRAME_TIME: f32 = 1. / 60.;
const SPEED: f32 = 0.25;
const THETA_STEP: f32 = 0.4;
const THETA_END: f32 = std::f32::consts::PI * 16.;

fn thetas() -> impl Iterator<Item = f32> {
    (0..)
        .map(|step| step as f32 * THETA_STEP)
        .take_while(|theta| *theta < THETA_END)
}

fn circle(origin: Point) -> Vec<Point> {
    thetas()
        .map(|theta| {
            let theta = theta / 7.6;
            Point::new(origin.x + theta.cos(), origin.y + theta.sin())
        })
        .collect()
}

fn spiral(origin: Point, growth: f32) -> Vec<Point> {
    thetas()
        .map(|theta| {
            let distance = growth.powf(theta) * 0.1;
            Point::new(
                origin.x + distance * theta.cos(),
                origin.y + distance * theta.sin(),
            )
        })
        .collect()
}

/// Eases in and out over `0..1` and back.
fn ping_pong(time: f32) -> f32 {
    let t = 1. - (time * 2. - 1.).abs();
    t * t * (3. - 2. * t)
}

fn main() -> spline_batcher::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let columns = ((SHAPES as f32).sqrt().ceil() as usize).max(2);
    let anchor: Point = Point::new(-2., -3.);
    let (range_x, range_y) = (4., 6.);

    let mut batcher = SplineBatcher::new();
    let mut circles = Vec::new();
    let mut spirals = Vec::new();
    for index in 0..SHAPES {
        let (x, y) = (index % columns, index / columns);
        let origin = Point::new(
            anchor.x + range_x * x as f32 / (columns - 1) as f32,
            anchor.y + range_y * y as f32 / (columns - 1) as f32,
        );
        let outline = circle(origin);
        let growth = 1.04 + (x + y) as f32 / (32 * columns) as f32;
        batcher.add(&outline, SAMPLES_PER_SHAPE)?;
        spirals.extend(spiral(origin, growth));
        circles.extend(outline);
    }
    batcher.generate();
    let points_per_shape = circles.len() / SHAPES;

    let mut backend = HeadlessBackend::default();
    let mut target = circles.clone();
    let started = Instant::now();
    for tick in 0..FRAMES {
        let time = (tick as f32 * FRAME_TIME * SPEED).fract();
        for (shape, ((morphed, from), to)) in target
            .chunks_mut(points_per_shape)
            .zip(circles.chunks(points_per_shape))
            .zip(spirals.chunks(points_per_shape))
            .enumerate()
        {
            let blend = ping_pong((time + shape as f32 / SHAPES as f32).fract());
            for ((point, from), to) in morphed.iter_mut().zip(from).zip(to) {
                *point = from.lerp(*to, blend);
            }
        }
        batcher.modify(&target)?;
        batcher.update(&mut backend);
    }

    tracing::info!(
        shapes = batcher.len(),
        batches = batcher.batches().len(),
        control_points = batcher.total_control_points(),
        frames = backend.frames(),
        elapsed = ?started.elapsed(),
        "finished"
    );
    Ok(())
}
