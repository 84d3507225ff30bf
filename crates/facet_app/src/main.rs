use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::path::PathBuf;

use facet_app::{
    App, AppConfig, Camera, Color, Cube, Diamond, Geometry, Light, Quad, Quat, Sphere, Transform,
    Vec3,
};

/// Ground plane with one of each shape on it, lit from two sides.
fn demo_scene() -> (Camera, Vec<Geometry>, Vec<Light>) {
    let mut camera = Camera::new();
    camera.look_at(Vec3::new(4.0, 3.0, 6.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y);

    let ground = Transform::from_translation_rotation(Vec3::ZERO, Quat::from_rotation_x(-FRAC_PI_2))
        .with_uniform_scale(8.0);
    let shapes = vec![
        Quad::new(ground, Color::rgb(0.35, 0.35, 0.35)).into(),
        Cube::new(
            Transform::from_translation_rotation(
                Vec3::new(-1.5, 0.5, 0.0),
                Quat::from_rotation_y(FRAC_PI_4),
            ),
            Color::from_hex(0xD94A3DFF),
        )
        .into(),
        Sphere::new(
            Transform::from_translation(Vec3::new(0.5, 0.75, 0.5)).with_uniform_scale(1.5),
            Color::from_hex(0x3D7FD9FF),
        )
        .into(),
        Diamond::new(
            Transform::from_translation(Vec3::new(2.0, 1.0, -1.0)),
            Color::from_hex(0xE8C547FF),
        )
        .into(),
    ];
    let lights = vec![
        Light::white(Vec3::new(3.0, 5.0, 4.0)),
        Light::new(Vec3::new(-4.0, 3.0, -2.0), Color::rgb(0.3, 0.35, 0.6)),
    ];
    (camera, shapes, lights)
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;
    facet_app::logging::init(&config.log_level)?;

    let (camera, shapes, lights) = demo_scene();
    App::new(config).with_scene(camera, shapes, lights).run()
}
