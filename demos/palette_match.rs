//! Assigns every pixel of a synthetic image a distinct palette color.
//!
//! Each pixel takes the closest color that has not been used yet, so the
//! palette is consumed through nearest-then-delete. Run with
//! `RUST_LOG=debug cargo run --example palette_match` to see rebuilds.

use kd3::{KdTree, Point, TreeConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SIDE: usize = 64;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(1);

    // One palette color per pixel, spread over RGB space.
    let mut palette = KdTree::new();
    for r in 0..16u8 {
        for g in 0..16u8 {
            for b in 0..16u8 {
                let rgb = [r * 17, g * 17, b * 17];
                palette.insert(to_point(rgb), rgb)?;
            }
        }
    }
    println!("Palette: {} colors, depth {}", palette.len(), palette.depth());
    let mut palette = palette.rebuild();
    println!("Balanced palette depth: {}", palette.depth());

    // A smooth gradient with a little noise, visited in random order.
    let mut pixels: Vec<(usize, [f64; 3])> = (0..SIDE * SIDE)
        .map(|i| {
            let (x, y) = ((i % SIDE) as f64, (i / SIDE) as f64);
            let noise: f64 = rng.gen_range(-8.0..8.0);
            (i, [x * 4.0 + noise, y * 4.0 + noise, 128.0 + noise])
        })
        .collect();
    pixels.shuffle(&mut rng);

    let config = TreeConfig::default();
    let mut image = vec![[0u8; 3]; SIDE * SIDE];
    let mut total_error = 0.0;
    let mut rebuilds = 0;

    for (n, (index, target)) in pixels.into_iter().enumerate() {
        let target = Point::from(target);
        let (key, rgb) = palette.take_nearest(&target)?;
        total_error += key.distance(&target);
        image[index] = rgb;

        if n % 256 == 255 && palette.needs_rebuild(&config) {
            palette = palette.rebuild();
            rebuilds += 1;
        }
    }

    println!(
        "Matched {} pixels, mean error {:.2}, {} rebuilds, {} colors left",
        image.len(),
        total_error / image.len() as f64,
        rebuilds,
        palette.len()
    );
    Ok(())
}

fn to_point(rgb: [u8; 3]) -> Point {
    Point::new(rgb[0] as f64, rgb[1] as f64, rgb[2] as f64)
}
