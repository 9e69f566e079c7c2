/// Terminal render loop for normalized OBJ meshes
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use objview_core::{view::model_view_projection, Camera, InterleavedMesh, Mat4, ObjectTransform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Object offset per arrow key press
const MOVE_STEP: f32 = 0.1;
/// Object offset per `+`/`-` press along Z
const DEPTH_STEP: f32 = 0.2;
/// Spin about Y per frame: 0.6 degrees
const SPIN_PER_FRAME: f32 = 0.6 * std::f32::consts::PI / 180.0;

/// Per-frame scene inputs driven by the keyboard.
///
/// The texture toggle lives here and is handed to the renderer explicitly
/// each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub object: ObjectTransform,
    pub use_texture: bool,
    pub running: bool,
}

impl FrameState {
    pub fn new(use_texture: bool) -> Self {
        Self {
            object: ObjectTransform::identity(),
            use_texture,
            running: true,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char(' ') => self.use_texture = !self.use_texture,
            KeyCode::Left => self.object.translate_by(-MOVE_STEP, 0.0, 0.0),
            KeyCode::Right => self.object.translate_by(MOVE_STEP, 0.0, 0.0),
            KeyCode::Up => self.object.translate_by(0.0, MOVE_STEP, 0.0),
            KeyCode::Down => self.object.translate_by(0.0, -MOVE_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.object.translate_by(0.0, 0.0, DEPTH_STEP)
            }
            KeyCode::Char('-') => self.object.translate_by(0.0, 0.0, -DEPTH_STEP),
            _ => {}
        }
    }

    /// Advance the spin by one frame
    pub fn tick(&mut self) {
        self.object.spin(SPIN_PER_FRAME);
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: InterleavedMesh,
    view_projection: Mat4,
    state: FrameState,
    renderer: AsciiRenderer,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: InterleavedMesh, camera: Camera, use_texture: bool) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // terminal cells are roughly twice as tall as they are wide
        let camera = camera.with_aspect(width as u32, height as u32 * 2);

        Ok(Self {
            mesh,
            view_projection: camera.view_projection(),
            state: FrameState::new(use_texture),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
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
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.state.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    self.state.handle_key(key);
                }
            }

            self.state.tick();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.state.object.model_matrix();
        let mvp = model_view_projection(&self.view_projection, &model);

        self.renderer.clear();
        self.renderer
            .render_mesh(&self.mesh, &mvp, &model, self.state.use_texture);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "objview | {} vertices | FPS: {:.1} | {} | Arrows=Move +/-=Depth Space=Texture Q=Quit",
                self.mesh.vertex_count(),
                self.fps,
                if self.state.use_texture { "Texture" } else { "Faces" }
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
