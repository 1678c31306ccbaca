#![allow(clippy::cast_precision_loss)]
//! GPU picking demonstration.
//!
//! Fills the scene with 50 randomly placed boxes. Hovering a box blinks it
//! between the two highlight colors; clicking deletes it.
//!
//! Run with: cargo run --example picking

use glance::{Color, Geometry, Material, Options, Result, Transform, Vec3, Viewer};
use rand::Rng;

fn main() -> Result<()> {
    glance::init();

    let mut viewer = Viewer::new(Options::default());
    viewer.camera.position = Vec3::new(10.0, 10.0, 10.0);
    viewer.camera.target = Vec3::ZERO;

    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let geometry = Geometry::cuboid(
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
        );
        let color = Color::new(rng.gen(), rng.gen(), rng.gen());
        let mut transform = Transform::at(Vec3::new(
            rng.gen_range(-6.0..6.0),
            rng.gen_range(-6.0..6.0),
            rng.gen_range(-6.0..6.0),
        ));
        transform.rotation = Vec3::new(
            rng.gen_range(0.0..std::f32::consts::TAU),
            rng.gen_range(0.0..std::f32::consts::TAU),
            rng.gen_range(0.0..std::f32::consts::TAU),
        );
        viewer.add_pickable(geometry, Material::standard(color), transform)?;
    }

    log::info!("hover a box to highlight it, click to delete");
    viewer.run()
}
