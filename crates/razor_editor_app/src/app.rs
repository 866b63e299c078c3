// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor application setup and event loop.

use egui_wgpu::wgpu;
use razor_editor_graph::ui::GraphEditorUi;
use razor_editor_graph::{EditorSettings, GraphEditorState, NodeCatalog};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Backdrop behind every egui panel
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.08,
    b: 0.09,
    a: 1.0,
};

fn renderer_error(err: impl std::fmt::Display) -> EditorError {
    EditorError::RendererInit(err.to_string())
}

/// Window surface plus the egui painter drawing into it
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window).map_err(renderer_error)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| renderer_error("No suitable GPU adapter"))?;
        let info = adapter.get_info();
        tracing::info!("Rendering with {} ({:?})", info.name, info.backend);

        let descriptor = wgpu::DeviceDescriptor {
            label: Some("razor-material-editor"),
            ..Default::default()
        };
        let (device, queue) = pollster::block_on(adapter.request_device(&descriptor, None))
            .map_err(renderer_error)?;

        let surface_config = Self::surface_config(&surface, &adapter, size)?;
        surface.configure(&device, &surface_config);

        let renderer = egui_wgpu::Renderer::new(&device, surface_config.format, None, 1, false);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            renderer,
        })
    }

    /// Prefer an sRGB format, falling back to whatever the surface offers first
    fn surface_config(
        surface: &wgpu::Surface<'_>,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| renderer_error("Surface has no formats"))?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Tessellate one egui frame and present it
    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        pixels_per_point: f32,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let target = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point,
        };
        let primitives = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let textures = full_output.textures_delta;

        for (id, delta) in &textures.set {
            self.renderer.update_texture(&self.device, &self.queue, *id, delta);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("egui-frame") });
        let extra_commands =
            self.renderer
                .update_buffers(&self.device, &self.queue, &mut encoder, &primitives, &screen);

        let attachment = wgpu::RenderPassColorAttachment {
            view: &target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                store: wgpu::StoreOp::Store,
            },
        };
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui-pass"),
                color_attachments: &[Some(attachment)],
                ..Default::default()
            })
            .forget_lifetime();
        self.renderer.render(&mut pass, &primitives, &screen);
        drop(pass);

        self.queue
            .submit(extra_commands.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();

        for id in &textures.free {
            self.renderer.free_texture(id);
        }
        Ok(())
    }
}

/// Running state of the editor
struct EditorRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    editor: EditorInner,
}

/// Material editor state and its front end
struct EditorInner {
    catalog: NodeCatalog,
    graph_editor: GraphEditorState,
    graph_ui: GraphEditorUi,
    settings_path: PathBuf,
}

impl EditorInner {
    fn new(settings: EditorSettings, settings_path: PathBuf) -> Self {
        Self {
            catalog: NodeCatalog::builtin(),
            graph_editor: GraphEditorState::new(settings),
            graph_ui: GraphEditorUi::new(),
            settings_path,
        }
    }

    fn update(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                self.graph_menu(ui);
                self.view_menu(ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Material editor");
            self.graph_ui
                .show(ui, &mut self.graph_editor, &self.catalog);
        });
    }

    fn graph_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Graph", |ui| {
            if ui.button("New graph").clicked() {
                tracing::info!("Clearing material graph");
                self.graph_editor.reset();
                ui.close_menu();
            }

            ui.separator();

            if ui.button("Save settings").clicked() {
                match self.graph_editor.settings.save(&self.settings_path) {
                    Ok(()) => tracing::info!("Saved settings to {:?}", self.settings_path),
                    Err(e) => tracing::error!("Failed to save settings: {}", e),
                }
                ui.close_menu();
            }
        });
    }

    fn view_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            if ui.button("Reset view").clicked() {
                self.graph_editor.pan = egui::Vec2::ZERO;
                ui.close_menu();
            }
        });
    }
}

/// Main editor application
pub struct EditorApp {
    running: Option<EditorRunning>,
    /// Settings handed to the editor on first resume
    settings: Option<EditorSettings>,
    settings_path: PathBuf,
    /// First fatal error raised inside the event loop
    error: Option<EditorError>,
}

impl EditorApp {
    /// Create a new editor application
    pub fn new(settings: EditorSettings, settings_path: PathBuf) -> Self {
        Self {
            running: None,
            settings: Some(settings),
            settings_path,
            error: None,
        }
    }

    /// Run the editor application until its window closes
    pub fn run(settings: EditorSettings, settings_path: PathBuf) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = EditorApp::new(settings, settings_path);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<EditorRunning> {
        tracing::info!("Creating editor window...");

        let window_attrs = Window::default_attributes()
            .with_title("Razor Material Editor")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 480));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        let settings = self.settings.take().unwrap_or_default();
        let editor = EditorInner::new(settings, self.settings_path.clone());

        tracing::info!("Editor initialized, window size: {:?}", window.inner_size());

        Ok(EditorRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            editor,
        })
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(err) => {
                tracing::error!("Editor startup failed: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.editor.update(ctx);
                });

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                let pixels_per_point = running.window.scale_factor() as f32;
                match running.graphics.render(&running.egui_ctx, full_output, pixels_per_point) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                if running.egui_ctx.has_requested_repaint() {
                    running.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
