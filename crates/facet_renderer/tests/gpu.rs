//! Integration tests that need a real device.  Each test skips (and says
//! so) when no adapter is available, e.g. on CI machines without a GPU.

use facet_core::{
    Camera, Color, Cube, Diamond, Geometry, GpuContext, Light, Quad, Sphere, StorageMode,
    Transform, Vertex,
};
use facet_renderer::pipeline::{FrameLoad, PipelineKind, PipelineSettings, RenderPipeline};
use facet_renderer::scene::{vertex_capacity, Scene};
use facet_renderer::{Buffer, BufferError, Renderer, RendererCommand, ShaderLibrary};
use glam::Vec3;

fn context() -> Option<GpuContext> {
    match pollster::block_on(GpuContext::new()) {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping: no GPU adapter ({err:#})");
            None
        }
    }
}

/// Copies `buffer` back to the host through a mappable staging buffer.
/// Panics if the copy is rejected by validation.
fn read_back<T: bytemuck::Pod>(ctx: &GpuContext, buffer: &Buffer<T>) -> Vec<T> {
    assert!(
        buffer.raw().usage().contains(wgpu::BufferUsages::COPY_SRC),
        "`{}` cannot be copied from",
        buffer.label()
    );
    let size = (buffer.capacity() * std::mem::size_of::<T>()) as u64;
    ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
    encoder.copy_buffer_to_buffer(buffer.raw(), 0, &staging, 0, size);
    ctx.queue.submit([encoder.finish()]);
    if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
        panic!("reading back `{}` failed: {err}", buffer.label());
    }

    let slice = staging.slice(..);
    slice.map_async(wgpu::MapMode::Read, |r| r.expect("map failed"));
    let _ = ctx.device.poll(wgpu::Maintain::Wait);
    let out = bytemuck::cast_slice(&slice.get_mapped_range()).to_vec();
    staging.unmap();
    out
}

fn demo_shapes() -> Vec<Geometry> {
    vec![
        Quad::new(Transform::IDENTITY.with_uniform_scale(4.0), Color::GRAY).into(),
        Cube::new(Transform::from_translation(Vec3::new(1.0, 0.5, 0.0)), Color::RED).into(),
        Sphere::new(Transform::from_translation(Vec3::new(-1.0, 0.5, 0.0)), Color::WHITE).into(),
        Diamond::new(Transform::from_translation(Vec3::new(0.0, 1.5, 0.0)), Color::GRID).into(),
    ]
}

#[test]
fn buffer_writes_respect_capacity_in_both_storage_modes() {
    for mode in [StorageMode::Shared, StorageMode::Managed] {
        let Some(ctx) = context() else { return };
        let ctx = ctx.with_storage_mode(mode);

        let mut buf =
            Buffer::<u32>::new(&ctx, "bounds", 4, wgpu::BufferUsages::COPY_SRC).unwrap();
        assert_eq!(buf.capacity(), 4);

        buf.write(0, &[1, 2, 3, 4]).unwrap();
        let err = buf.write(3, &[9, 9]).unwrap_err();
        assert!(matches!(err, BufferError::OutOfBounds { .. }));
        assert_eq!(buf.contents(), &[1, 2, 3, 4]);

        buf.write(1, &[7, 8]).unwrap();
        assert_eq!(buf.is_dirty(), mode == StorageMode::Managed);
        buf.flush();
        assert!(!buf.is_dirty());
        assert_eq!(read_back(&ctx, &buf), vec![1, 7, 8, 4], "{mode:?}");
    }
}

#[test]
fn oversized_buffers_fail_to_allocate() {
    let Some(ctx) = context() else { return };
    let too_many = (ctx.device.limits().max_buffer_size / 16 + 1) as usize;
    let result = Buffer::<[f32; 4]>::new(&ctx, "huge", too_many, wgpu::BufferUsages::VERTEX);
    assert!(matches!(result, Err(BufferError::Allocation { .. })));
}

#[test]
fn scene_buffers_are_sized_from_its_contents() {
    let Some(ctx) = context() else { return };
    let shapes = demo_shapes();
    let expected = vertex_capacity(&shapes);
    let lights = vec![
        Light::white(Vec3::new(2.0, 4.0, 2.0)),
        Light::new(Vec3::new(-3.0, 2.0, 1.0), Color::rgb(0.3, 0.3, 0.8)),
    ];
    let scene = Scene::build(&ctx, Camera::new(), shapes, lights).unwrap();

    assert_eq!(scene.vertex_buffer().capacity(), expected);
    assert_eq!(scene.vertex_count(), expected);
    assert_eq!(scene.light_buffer().capacity(), 2);
    assert_eq!(scene.light_buffer().contents()[1].position, [-3.0, 2.0, 1.0]);
}

#[test]
fn scene_without_lights_or_shapes_still_builds() {
    let Some(ctx) = context() else { return };
    let scene = Scene::build(&ctx, Camera::new(), Vec::new(), Vec::new()).unwrap();
    assert_eq!(scene.vertex_count(), 0);
    assert_eq!(scene.light_buffer().capacity(), 0);
    assert!(scene.bind_group(0).is_ok());
}

#[test]
fn identity_quad_lands_unchanged_in_the_vertex_buffer() {
    let Some(ctx) = context() else { return };
    let quad = Quad::new(Transform::IDENTITY, Color::RED);
    let local: Vec<Vertex> = Geometry::from(quad.clone()).local_vertices().to_vec();

    let mut camera = Camera::new();
    camera.look_at(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO, Vec3::Y);
    camera.set_clip_planes(1.0, 20.0);
    camera.perspective(65f32.to_radians(), 2.0, 2.0);

    let mut scene = Scene::build(&ctx, camera, vec![quad.into()], Vec::new()).unwrap();
    scene.flush();

    assert_eq!(scene.vertex_count(), 6);
    assert!(scene
        .vertex_buffer()
        .raw()
        .usage()
        .contains(wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_SRC));
    let gpu = read_back(&ctx, scene.vertex_buffer());
    assert_eq!(gpu.len(), 6);
    for (got, want) in gpu.iter().zip(&local) {
        assert_eq!(got.position, want.position);
    }
    let m = scene.camera().projection().matrix().to_cols_array_2d();
    assert_eq!(m[0][0], m[1][1]);
}

#[test]
fn set_transform_rewrites_only_that_shape() {
    let Some(ctx) = context() else { return };
    let mut scene = Scene::build(&ctx, Camera::new(), demo_shapes(), Vec::new()).unwrap();
    let before = scene.vertex_buffer().contents().to_vec();

    let moved = Transform::from_translation(Vec3::new(0.0, 3.0, 0.0));
    scene.set_transform(1, moved).unwrap();
    let after = scene.vertex_buffer().contents();

    let quad_len = scene.shapes()[0].vertex_count();
    let cube_len = scene.shapes()[1].vertex_count();
    assert_eq!(after[..quad_len], before[..quad_len]);
    assert_eq!(
        after[quad_len..quad_len + cube_len],
        scene.shapes()[1].transformed_vertices()[..]
    );
    assert_eq!(
        after[quad_len + cube_len..],
        before[quad_len + cube_len..]
    );
    assert!(scene.set_transform(99, moved).is_err());
}

#[test]
fn every_pipeline_builds_and_renders() {
    let Some(ctx) = context() else { return };
    let scene = Scene::build(&ctx, Camera::new(), demo_shapes(), Vec::new()).unwrap();
    let settings = PipelineSettings {
        color_format: wgpu::TextureFormat::Rgba8Unorm,
        ..Default::default()
    };
    let library = ShaderLibrary::new(&ctx.device);
    let target = facet_renderer::RenderTarget::offscreen(&ctx.device, 64, 64, &settings);

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
    for kind in PipelineKind::ALL {
        let pipeline = RenderPipeline::new(kind, &ctx, &library, &settings, &scene).unwrap();
        assert_eq!(pipeline.kind(), kind);
        pipeline
            .render_frame(
                &mut encoder,
                &target.frame(None).unwrap(),
                &scene,
                0,
                FrameLoad::Clear,
            )
            .unwrap();
    }
    ctx.queue.submit([encoder.finish()]);
    let _ = ctx.device.poll(wgpu::Maintain::Wait);
}

#[test]
fn missing_shaders_are_reported() {
    let Some(ctx) = context() else { return };
    let scene = Scene::build(&ctx, Camera::new(), demo_shapes(), Vec::new()).unwrap();
    let empty = ShaderLibrary::empty();
    let err = RenderPipeline::new(
        PipelineKind::SolidColor,
        &ctx,
        &empty,
        &PipelineSettings::default(),
        &scene,
    )
    .err()
    .unwrap();
    assert!(matches!(
        err,
        facet_renderer::PipelineError::ShaderNotFound(_)
    ));
}

#[test]
fn renderer_runs_more_frames_than_slots() {
    let Some(ctx) = context() else { return };
    let scene = Scene::build(
        &ctx,
        Camera::new(),
        demo_shapes(),
        vec![Light::white(Vec3::new(0.0, 5.0, 5.0))],
    )
    .unwrap();
    let settings = PipelineSettings {
        color_format: wgpu::TextureFormat::Rgba8Unorm,
        sample_count: 4,
        ..Default::default()
    };
    let mut renderer = Renderer::headless(ctx, scene, settings, 32, 32).unwrap();
    renderer.apply(RendererCommand::SetActivePipeline(PipelineKind::Raster));
    renderer.apply(RendererCommand::SetDebugMode(true));

    for frame in 0..10 {
        if frame == 5 {
            renderer.toggle_phong_shading(false);
            renderer.on_resize(48, 24);
        }
        renderer.render(None).unwrap();
        assert!(renderer.frames_in_flight() <= facet_renderer::MAX_FRAMES_IN_FLIGHT);
    }
    renderer.wait_idle();
    assert!(!renderer.phong_enabled());
    assert_eq!(renderer.scene().camera().projection().width, 48.0);
}
