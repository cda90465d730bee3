//! End-to-end: upload a mesh, populate the render world with a camera, a
//! shadow-casting directional light, and a static mesh instance, then run
//! one full `Renderer::render_frame` and check the reported stats line up
//! with what the scene actually contains.

mod support;

use forgelight_core::mesh::primitives;
use forgelight_core::renderer::{Renderer, RendererConfig};
use forgelight_core::world::{CameraProxy, LightKind, LightProxy, MeshFlags, StaticMeshProxy};
use glam::{Affine3A, Mat4, Vec3};
use support::{FakeDevice, NullQueue};

#[test]
fn single_cube_single_directional_light_frame() {
    let device = FakeDevice::new();
    let queue = NullQueue;
    let mut renderer = Renderer::new(&device, RendererConfig::default());

    let cube = primitives::cube(0.5);
    let mesh = renderer.upload_mesh(&device, &queue, &cube);

    renderer.world_mut().create_static_mesh(StaticMeshProxy {
        world_transform: Mat4::IDENTITY,
        flags: MeshFlags::default(),
        world_bounds: cube.bounds,
        mesh,
        material: 0,
        render_layer: 0,
    });

    renderer.world_mut().create_light(LightProxy {
        kind: LightKind::Directional,
        position: Vec3::ZERO,
        direction: Vec3::new(0.3, -1.0, 0.2),
        color: Vec3::ONE,
        intensity: 2.0,
        range: 0.0,
        inner_cone_angle: 0.0,
        outer_cone_angle: 0.0,
        casts_shadows: true,
        shadow_bias: 0.002,
        normal_bias: 0.5,
        shadow_index: -1,
    });

    let mut camera = CameraProxy::new_perspective(Vec3::new(0.0, 1.0, 6.0), Vec3::new(0.0, -0.15, -1.0).normalize(), std::f32::consts::FRAC_PI_4, 0.1, 100.0, (1280, 720));
    camera.is_main = true;
    let camera_handle = renderer.world_mut().create_camera(camera);

    let stats = renderer.render_frame(&device, &queue, camera_handle, Vec3::splat(0.02), 1.0).unwrap();

    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.batch_count, 1);
    assert_eq!(stats.triangles, 12);
    assert_eq!(stats.light_count, 1);
    assert!(stats.active_shadow_maps >= 1, "directional light casting shadows should allocate at least one cascade");
    assert_eq!(stats.graph_pass_count, 1);
    assert_eq!(stats.culled_pass_count, 0);
}

#[test]
fn object_outside_frustum_is_culled_and_not_drawn() {
    let device = FakeDevice::new();
    let queue = NullQueue;
    let mut renderer = Renderer::new(&device, RendererConfig::default());

    let cube = primitives::cube(0.5);
    let mesh = renderer.upload_mesh(&device, &queue, &cube);

    // Placed far behind the camera: outside the view frustum.
    renderer.world_mut().create_static_mesh(StaticMeshProxy {
        world_transform: Mat4::from_translation(Vec3::new(0.0, 0.0, 50.0)),
        flags: MeshFlags::default(),
        world_bounds: cube.bounds.transform(&Affine3A::from_translation(Vec3::new(0.0, 0.0, 50.0))),
        mesh,
        material: 0,
        render_layer: 0,
    });

    let mut camera = CameraProxy::new_perspective(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, std::f32::consts::FRAC_PI_4, 0.1, 100.0, (1280, 720));
    camera.is_main = true;
    let camera_handle = renderer.world_mut().create_camera(camera);

    let stats = renderer.render_frame(&device, &queue, camera_handle, Vec3::ZERO, 0.0).unwrap();

    assert_eq!(stats.draw_calls, 0);
    assert_eq!(stats.culled_objects, 1);
}
