//! Render-to-texture demonstration.
//!
//! A spinning cube is rendered into a 512x512 offscreen target each frame;
//! a box in the primary scene samples that target as its surface texture.
//!
//! Run with: cargo run --example render_target

use glance::{
    Color, Compositor, Geometry, Material, Mesh, Options, Result, TexturedMaterial, Transform,
    Vec3, Viewer,
};

fn main() -> Result<()> {
    glance::init();

    let options = Options::default();
    let resolution = options.composite_resolution;
    let mut viewer = Viewer::new(options);
    viewer.camera.position = Vec3::new(3.0, 2.5, 3.0);
    viewer.camera.target = Vec3::ZERO;

    // The sub-scene: a single cube spinning against a blue backdrop.
    let mut compositor = Compositor::new(resolution);
    compositor.scene.background = Color::from_hex(0x224466);
    let cube = compositor.scene.insert(Mesh::new(
        Geometry::cuboid(1.5, 1.5, 1.5),
        Material::standard(Color::from_hex(0xDD8833)),
        Transform::default(),
    ));
    compositor.spin(cube, 1.0);
    viewer.set_compositor(compositor);

    // The primary scene: a box textured with the sub-scene's output.
    viewer.add_mesh(Mesh::new(
        Geometry::cuboid(2.0, 2.0, 2.0),
        Material::Textured(TexturedMaterial::composite()),
        Transform::default(),
    ));

    viewer.run()
}
