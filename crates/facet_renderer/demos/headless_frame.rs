// Renders one lit frame of a small scene without a window and writes it to
// `facet_frame.png`.  Useful for checking the pipelines on machines with no
// display.

use anyhow::Context as _;
use facet_core::{Camera, Color, Cube, Diamond, GpuContext, Light, Quad, Sphere, Transform};
use facet_renderer::{PipelineKind, PipelineSettings, Renderer, Scene};
use glam::{Quat, Vec3};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn main() -> anyhow::Result<()> {
    let context = pollster::block_on(GpuContext::new())?;

    let mut camera = Camera::new();
    camera.look_at(Vec3::new(3.0, 2.5, 4.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y);
    let shapes = vec![
        Quad::new(
            Transform::from_translation_rotation(
                Vec3::ZERO,
                Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            )
            .with_uniform_scale(6.0),
            Color::GRAY,
        )
        .into(),
        Cube::new(Transform::from_translation(Vec3::new(-1.2, 0.5, 0.0)), Color::RED).into(),
        Sphere::new(
            Transform::from_translation(Vec3::new(0.6, 0.5, 0.4)),
            Color::rgb(0.2, 0.5, 0.9),
        )
        .into(),
        Diamond::new(
            Transform::from_translation(Vec3::new(0.0, 1.6, -1.0)),
            Color::rgb(0.9, 0.8, 0.2),
        )
        .into(),
    ];
    let lights = vec![
        Light::white(Vec3::new(2.0, 4.0, 3.0)),
        Light::new(Vec3::new(-3.0, 2.0, -1.0), Color::rgb(0.4, 0.4, 0.9)),
    ];
    let scene = Scene::build(&context, camera, shapes, lights)?;

    // PNG wants 8-bit RGBA
    let settings = PipelineSettings {
        sample_count: 4,
        color_format: wgpu::TextureFormat::Rgba8Unorm,
        ..Default::default()
    };
    let mut renderer = Renderer::headless(context, scene, settings, WIDTH, HEIGHT)?;
    renderer.set_active_pipeline(PipelineKind::Raster);
    renderer.set_debug_mode(true);
    renderer.render(None)?;

    let bytes_per_row = (4 * WIDTH).div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let ctx = renderer.context();
    let readback = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("frame readback"),
        size: bytes_per_row as u64 * HEIGHT as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    let texture = renderer
        .target()
        .color
        .output_texture()
        .context("headless renderer has no output texture")?;

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame copy"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &readback,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: None,
            },
        },
        wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit([encoder.finish()]);

    let slice = readback.slice(..);
    slice.map_async(wgpu::MapMode::Read, |_| {});
    let _ = ctx.device.poll(wgpu::Maintain::Wait);

    // drop the row padding
    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((4 * WIDTH * HEIGHT) as usize);
    for row in data.chunks_exact(bytes_per_row as usize) {
        pixels.extend_from_slice(&row[..(4 * WIDTH) as usize]);
    }
    drop(data);
    readback.unmap();

    image::save_buffer(
        "facet_frame.png",
        &pixels,
        WIDTH,
        HEIGHT,
        image::ColorType::Rgba8,
    )?;
    println!("wrote facet_frame.png ({WIDTH}x{HEIGHT})");
    Ok(())
}
