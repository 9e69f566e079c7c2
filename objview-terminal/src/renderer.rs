/// ASCII rasterizer for interleaved vertex buffers
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector2, Vector3};
use objview_core::{GpuVertex, InterleavedMesh, Mat4};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Checker tiles per unit of UV in texture mode
const TEXTURE_SCALE: f32 = 5.0;

/// Floor applied to lit faces so back-lit geometry stays visible
const AMBIENT: f32 = 0.15;

/// ASCII renderer that converts triangle lists to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

/// Screen-space vertex: pixel coordinates plus NDC depth
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Draw every triangle of `mesh`.
    ///
    /// `mvp` maps model space to clip space; `model` alone orients normals for
    /// lighting. With `use_texture` the faces show a UV checker pattern,
    /// otherwise each face gets its own color.
    pub fn render_mesh(&mut self, mesh: &InterleavedMesh, mvp: &Mat4, model: &Mat4, use_texture: bool) {
        for (index, triangle) in mesh.vertices().chunks_exact(3).enumerate() {
            self.render_triangle(index, triangle, mvp, model, use_texture);
        }
    }

    fn render_triangle(
        &mut self,
        index: usize,
        triangle: &[GpuVertex],
        mvp: &Mat4,
        model: &Mat4,
        use_texture: bool,
    ) {
        let mut screen = [ScreenVertex { x: 0.0, y: 0.0, depth: 0.0 }; 3];
        for (slot, vertex) in screen.iter_mut().zip(triangle) {
            match self.project_to_screen(mvp, &Point3::from(vertex.position)) {
                Some(projected) => *slot = projected,
                None => return, // Triangle is clipped
            }
        }

        let normal = triangle
            .iter()
            .map(|v| Vector3::from(v.normal))
            .sum::<Vector3<f32>>();
        let brightness = shade(&model.transform_vector(&normal));
        let uvs = [
            Vector2::from(triangle[0].uv),
            Vector2::from(triangle[1].uv),
            Vector2::from(triangle[2].uv),
        ];
        let color = if use_texture {
            Color::Rgb { r: 230, g: 200, b: 140 }
        } else {
            face_color(index)
        };

        self.rasterize_triangle(&screen, |w0, w1, w2| {
            let intensity = if use_texture {
                let uv = uvs[0] * w0 + uvs[1] * w1 + uvs[2] * w2;
                brightness * checker(&uv)
            } else {
                brightness
            };
            (ramp_char(intensity), color)
        });
    }

    fn project_to_screen(&self, mvp: &Mat4, point: &Point3<f32>) -> Option<ScreenVertex> {
        let clip = mvp.apply(&point.to_homogeneous());

        // Behind the camera or on the eye plane
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        // Clip test
        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        // Convert to screen space
        let x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let y = (1.0 - ndc_y) * 0.5 * self.height as f32;

        Some(ScreenVertex { x, y, depth })
    }

    fn rasterize_triangle<F>(&mut self, coords: &[ScreenVertex; 3], mut fragment: F)
    where
        F: FnMut(f32, f32, f32) -> (char, Color),
    {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            let (c, color) = fragment(w0, w1, w2);
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = c;
                            self.color_buffer[idx] = color;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Lambert term against a light over the viewer's right shoulder
fn shade(normal: &Vector3<f32>) -> f32 {
    let light_dir = Vector3::new(0.4, 0.6, 1.0).normalize();
    match normal.try_normalize(0.0) {
        Some(n) => AMBIENT + (1.0 - AMBIENT) * n.dot(&light_dir).max(0.0),
        None => AMBIENT,
    }
}

/// 1.0 on light tiles, 0.4 on dark ones
fn checker(uv: &Vector2<f32>) -> f32 {
    let tile = (uv.x * TEXTURE_SCALE).floor() as i64 + (uv.y * TEXTURE_SCALE).floor() as i64;
    if tile.rem_euclid(2) == 0 {
        1.0
    } else {
        0.4
    }
}

fn ramp_char(intensity: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    // keep lit pixels off the blank first entry
    let index = 1 + (intensity.clamp(0.0, 1.0) * (last - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

/// Pseudo-random but stable color per triangle
fn face_color(index: usize) -> Color {
    let t = index as f32;
    let channel = |k: f32| (((t * k) % 1.0) * 200.0 + 55.0) as u8;
    Color::Rgb {
        r: channel(0.37),
        g: channel(0.91),
        b: channel(0.53),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
