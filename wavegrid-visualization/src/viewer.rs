//! Interactive wave viewer

use std::sync::Arc;

use wavegrid_core::{step, Error, NoiseField, Result, Rgb, WaveConfig, WaveState};
use wavegrid_gpu::{InstanceRaw, LightingUniform, MaterialUniform, SphereMesh, SphereRenderConfig, SphereRenderer, SpotLight};
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use crate::camera::{Camera, OrbitControls};
use crate::input::PointerState;
use crate::scene::SphereGrid;

/// Pixels of trackpad scroll that count as one wheel notch
const PIXELS_PER_WHEEL_STEP: f32 = 100.0;

/// Build the renderer configuration for a scene description
pub fn render_config_from(config: &WaveConfig) -> Result<SphereRenderConfig> {
    let scene = &config.scene;
    let lights = &config.lights;

    let background = Rgb::from_hex(&scene.background)?.to_linear();
    let spot = SpotLight {
        position: lights.spot_position.into(),
        target: lights.spot_target.into(),
        color: Rgb::from_hex(&lights.spot_color)?.to_linear(),
        intensity: lights.spot_intensity,
        distance: lights.spot_distance,
        angle: lights.spot_angle_degrees.to_radians(),
    };

    Ok(SphereRenderConfig {
        lighting: LightingUniform::new(
            Rgb::from_hex(&lights.ambient_color)?.to_linear(),
            lights.ambient_intensity,
            &spot,
        ),
        material: MaterialUniform::new(
            Rgb::from_hex(&scene.sphere_color)?.to_linear(),
            scene.roughness,
            scene.metalness,
        ),
        background_color: [background[0] as f64, background[1] as f64, background[2] as f64, 1.0],
        enable_depth_test: true,
        enable_backface_culling: true,
        enable_multisampling: scene.msaa,
    })
}

/// Animated sphere grid with orbit controls.
///
/// Everything except the window and GPU state lives here, so a frame can be
/// advanced and input applied without a display.
pub struct WaveViewer<N> {
    config: WaveConfig,
    noise: N,
    state: WaveState,
    scene: SphereGrid,
    camera: Camera,
    controls: OrbitControls,
    pointer: PointerState,
    instances: Vec<InstanceRaw>,
    frame_count: u64,
}

impl<N: NoiseField> WaveViewer<N> {
    pub fn new(config: WaveConfig, noise: N) -> Result<Self> {
        config.validate()?;

        let scene = SphereGrid::from_config(&config.grid);
        let aspect_ratio = config.window.width as f32 / config.window.height as f32;
        let camera = Camera::from_config(&config.camera, aspect_ratio);
        let controls = OrbitControls::from_config(&camera, &config.camera);
        let instances = scene.instances();

        Ok(Self {
            config,
            noise,
            state: WaveState::default(),
            scene,
            camera,
            controls,
            pointer: PointerState::new(),
            instances,
            frame_count: 0,
        })
    }

    /// Run one wave step and refresh the instance data
    pub fn advance(&mut self) {
        self.state = step(self.state, self.scene.grid_mut(), &self.config.wave, &self.noise);
        self.scene.write_instances(&mut self.instances);
        self.frame_count += 1;
    }

    /// Apply a cursor move; drags orbit or pan the camera
    pub fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>, viewport: PhysicalSize<u32>) {
        let Some((dx, dy)) = self.pointer.moved(position, viewport) else {
            return;
        };
        let height = viewport.height as f32;
        if self.pointer.rotating {
            self.controls.rotate(&mut self.camera, dx as f32, dy as f32, height);
        } else if self.pointer.panning {
            self.controls.pan(&mut self.camera, dx as f32, dy as f32, height);
        }
    }

    /// Apply wheel notches, positive towards the target
    pub fn on_wheel(&mut self, steps: f32) {
        self.controls.zoom(&mut self.camera, steps);
    }

    /// Handle a pressed key. Returns `true` when the viewer should close.
    pub fn on_key(&mut self, key: &Key) -> bool {
        match key {
            Key::Named(NamedKey::Escape) => true,
            Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                self.controls.reset(&mut self.camera);
                tracing::debug!("camera reset");
                false
            }
            _ => false,
        }
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn state(&self) -> WaveState {
        self.state
    }

    pub fn scene(&self) -> &SphereGrid {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Open the window and animate until it is closed
    pub fn run(mut self) -> Result<()> {
        let event_loop =
            EventLoop::new().map_err(|e| Error::Visualization(format!("failed to create event loop: {e}")))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(self.config.window.title.clone())
                .with_inner_size(LogicalSize::new(
                    self.config.window.width as f64,
                    self.config.window.height as f64,
                ))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("failed to create window: {e}")))?,
        );

        let segments = self.config.scene.sphere_segments;
        let mesh = SphereMesh::uv_sphere(self.config.scene.sphere_radius, segments, segments);
        let render_config = render_config_from(&self.config)?;
        let mut renderer = pollster::block_on(SphereRenderer::new(window.clone(), &mesh, render_config))?;

        let size = renderer.size();
        self.camera.set_viewport(size.width, size.height);
        tracing::info!(
            spheres = self.scene.len(),
            triangles = mesh.triangle_count(),
            width = size.width,
            height = size.height,
            "viewer started"
        );

        let mut failure = None;
        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Poll);

                match event {
                    Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                            self.camera.set_viewport(new_size.width, new_size.height);
                        }
                        WindowEvent::MouseInput { state, button, .. } => self.pointer.button(button, state),
                        WindowEvent::CursorMoved { position, .. } => self.on_cursor_moved(position, renderer.size()),
                        WindowEvent::CursorLeft { .. } => self.pointer.left(),
                        WindowEvent::MouseWheel { delta, .. } => {
                            let steps = match delta {
                                MouseScrollDelta::LineDelta(_, y) => y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_WHEEL_STEP,
                            };
                            self.on_wheel(steps);
                        }
                        WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                            if self.on_key(&event.logical_key) {
                                target.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            self.advance();
                            renderer.update_instances(&self.instances);
                            renderer.update_camera(self.camera.view_projection(), self.camera.position.coords);
                            if let Err(e) = renderer.render() {
                                tracing::error!(error = %e, "render failed");
                                failure = Some(e);
                                target.exit();
                            }
                            if self.frame_count % 600 == 0 {
                                tracing::debug!(frame = self.frame_count, phase = self.state.phase, "frame");
                            }
                        }
                        _ => {}
                    },
                    Event::AboutToWait => window.request_redraw(),
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("event loop error: {e}")))?;

        tracing::info!(frames = self.frame_count, "viewer closed");
        failure.map_or(Ok(()), Err)
    }
}
