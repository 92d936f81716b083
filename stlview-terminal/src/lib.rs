//! Terminal viewer for binary STL meshes
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::sync::Arc;
use std::time::Duration;
use stlview_core::{
    transform, Bounds, Camera, ControlPanel, Material, Mesh, ParameterName, ProjectionMode,
    RenderUpdate, Renderer, RotationState,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

pub mod renderer;

pub use renderer::{shade, AsciiRenderer, Shade, CELL_ASPECT};

/// Radians per rotation key press
const ROTATION_STEP: f32 = 0.1;

/// Rows taken by the title and control lines
const STATUS_ROWS: u16 = 2;

/// Log filter for `directives` in `RUST_LOG` syntax. With no directives
/// only warnings and errors are logged.
pub fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Rotate { dx: f32, dy: f32, dz: f32 },
    NextControl,
    PreviousControl,
    Step(isize),
    Reset,
    ToggleProjection,
}

/// Map a key to an action. Unbound keys yield `None`.
pub fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    let rotate = |dx, dy, dz| Some(Action::Rotate { dx, dy, dz });
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('w') | KeyCode::Up => rotate(ROTATION_STEP, 0.0, 0.0),
        KeyCode::Char('s') | KeyCode::Down => rotate(-ROTATION_STEP, 0.0, 0.0),
        KeyCode::Char('a') | KeyCode::Left => rotate(0.0, -ROTATION_STEP, 0.0),
        KeyCode::Char('d') | KeyCode::Right => rotate(0.0, ROTATION_STEP, 0.0),
        KeyCode::Char('e') => rotate(0.0, 0.0, ROTATION_STEP),
        KeyCode::BackTab => Some(Action::PreviousControl),
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => Some(Action::PreviousControl),
        KeyCode::Tab => Some(Action::NextControl),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => Some(Action::Step(1)),
        KeyCode::Char('-') | KeyCode::Char('[') => Some(Action::Step(-1)),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('p') => Some(Action::ToggleProjection),
        _ => None,
    }
}

/// Interactive viewer: owns the controls and draws the mesh with the
/// material they produce.
pub struct TerminalApp {
    mesh: Option<Arc<Mesh>>,
    bounds: Option<Bounds>,
    material: Material,
    controls: ControlPanel,
    focus: usize,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    dirty: bool,
    message: Option<String>,
}

impl TerminalApp {
    /// Viewer sized to the current terminal.
    pub fn new(controls: ControlPanel) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(controls, width, height))
    }

    /// Viewer for a terminal of `width` x `height` cells.
    pub fn with_size(controls: ControlPanel, width: u16, height: u16) -> Self {
        let rows = height.saturating_sub(STATUS_ROWS);
        Self {
            mesh: None,
            bounds: None,
            material: Material::default(),
            controls,
            focus: 0,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            camera: Camera::new(width as u32, rows as u32, CELL_ASPECT),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            running: true,
            dirty: true,
            message: None,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn projection(&self) -> ProjectionMode {
        self.camera.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The parameter whose control currently has focus.
    pub fn focused(&self) -> ParameterName {
        ParameterName::ALL[self.focus]
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            if self.dirty {
                self.render()?;
                self.dirty = false;
            }

            if event::poll(frame_time)? {
                match event::read()? {
                    Event::Key(KeyEvent {
                        code,
                        modifiers,
                        kind: KeyEventKind::Press,
                        ..
                    }) => {
                        if let Some(action) = action_for(code, modifiers) {
                            self.handle_action(action);
                        }
                    }
                    Event::Resize(width, height) => self.resize(width, height),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Apply one action. Control changes go through the panel and reach
    /// the material as render updates.
    pub fn handle_action(&mut self, action: Action) {
        let count = ParameterName::ALL.len();
        let focused = self.focused();
        let result = match action {
            Action::Quit => {
                self.running = false;
                return;
            }
            Action::Rotate { dx, dy, dz } => {
                self.rotation.rotate(dx, dy, dz);
                Ok(None)
            }
            Action::NextControl => {
                self.focus = (self.focus + 1) % count;
                Ok(None)
            }
            Action::PreviousControl => {
                self.focus = (self.focus + count - 1) % count;
                Ok(None)
            }
            Action::ToggleProjection => {
                self.camera.toggle_projection();
                debug!(mode = ?self.camera.mode, "projection changed");
                Ok(None)
            }
            Action::Step(delta) => self.controls.step(focused, delta).map(Some),
            Action::Reset => self.controls.reset(focused).map(Some),
        };

        match result {
            Ok(Some(update)) => {
                self.message = None;
                self.apply_update(&update);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(%err, "control change rejected");
                self.message = Some(err.to_string());
            }
        }
        self.dirty = true;
    }

    fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(STATUS_ROWS);
        debug!(width, rows, "terminal resized");
        let mode = self.camera.mode;
        self.camera = Camera::new(width as u32, rows as u32, CELL_ASPECT);
        self.camera.mode = mode;
        self.renderer.resize(width as usize, rows as usize);
        self.dirty = true;
    }

    /// Rasterize the current frame without writing it anywhere.
    pub fn rasterize(&mut self) -> &AsciiRenderer {
        self.renderer.clear();
        if let Some(mesh) = &self.mesh {
            let model = transform::model_matrix(&self.rotation, self.bounds.as_ref());
            self.renderer
                .render_mesh(mesh, &self.material, &model, &self.camera);
        }
        &self.renderer
    }

    /// One `Title: label` entry per control, the focused one bracketed.
    pub fn status_line(&self) -> String {
        self.controls
            .bindings()
            .enumerate()
            .map(|(i, binding)| {
                let entry = format!("{}: {}", binding.parameter().title(), binding.current_label());
                if i == self.focus {
                    format!("[{entry}]")
                } else {
                    entry
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn render(&mut self) -> io::Result<()> {
        self.rasterize();

        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;
        self.renderer.draw(&mut stdout, 1)?;

        let title = match &self.message {
            Some(message) => format!("stlview | {message}"),
            None => format!(
                "stlview | {} triangles | WASD/Arrows=Rotate Tab=Control +/-=Step R=Reset P=Projection Q=Quit",
                self.mesh.as_ref().map_or(0, |m| m.triangle_count())
            ),
        };
        let bottom = 1 + self.renderer.height() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(title),
            cursor::MoveTo(0, bottom),
            SetForegroundColor(Color::Cyan),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

impl Renderer for TerminalApp {
    fn load_mesh(&mut self, mesh: Arc<Mesh>) {
        self.bounds = mesh.bounds();
        info!(
            triangles = mesh.triangle_count(),
            framed = self.bounds.is_some(),
            "mesh loaded"
        );
        self.mesh = Some(mesh);
        self.dirty = true;
    }

    fn apply_update(&mut self, update: &RenderUpdate) {
        debug!(%update, "applying update");
        self.material.apply(update);
        self.dirty = true;
    }
}
