use super::Renderer;
use crate::config::RenderConfig;
use crate::engines::generation::Gene;
use crate::error::{GlobeError, Result};
use crate::types::Viewpoint;
use image::{GrayImage, Luma};
use std::path::Path;

/// Layout units per scene unit.
pub const SIZE_SCALE: f64 = 1000.0;

/// Texels darker than this (0..=255) are glyph ink; the rest is transparent.
const INK_LEVEL: u8 = 229;

/// Cards closer to the camera plane than this are not drawn.
const NEAR_PLANE: f64 = 1e-3;

type Vec3 = [f64; 3];

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// One glyph card in world space, already turned to the viewpoint.
struct Card {
    center: Vec3,
    right: Vec3,
    normal: Vec3,
    size: f64,
}

impl Card {
    fn place(gene: &Gene, scene_angle: f64) -> Self {
        let (sin_t, cos_t) = scene_angle.sin_cos();
        let x = gene.x as f64 / SIZE_SCALE;
        let y = gene.y as f64 / SIZE_SCALE;
        let z = gene.z as f64 / SIZE_SCALE;
        let heading = (gene.heading as f64).to_radians() + scene_angle;
        let (sin_h, cos_h) = heading.sin_cos();
        Self {
            center: [x * cos_t - y * sin_t, x * sin_t + y * cos_t, z],
            right: [cos_h, sin_h, 0.0],
            // right x up, facing -y at heading 0
            normal: [sin_h, -cos_h, 0.0],
            size: gene.scale as f64 / SIZE_SCALE,
        }
    }

    fn corners(&self) -> [Vec3; 4] {
        let half = self.size / 2.0;
        let mut corners = [[0.0; 3]; 4];
        for (corner, (du, dz)) in corners
            .iter_mut()
            .zip([(-half, -half), (half, -half), (half, half), (-half, half)])
        {
            *corner = [
                self.center[0] + self.right[0] * du,
                self.center[1] + self.right[1] * du,
                self.center[2] + dz,
            ];
        }
        corners
    }
}

/// Perspective camera on the y axis looking along +y, z up.
struct Camera {
    position: Vec3,
    focal: f64,
    cx: f64,
    cy: f64,
}

impl Camera {
    fn new(config: &RenderConfig) -> Self {
        let cx = config.frame_width as f64 / 2.0;
        Self {
            position: [0.0, config.camera_distance, 0.0],
            focal: cx / (config.field_of_view.to_radians() / 2.0).tan(),
            cx,
            cy: config.frame_height as f64 / 2.0,
        }
    }

    fn project(&self, point: Vec3) -> Option<(f64, f64)> {
        let rel = sub(point, self.position);
        if rel[1] <= NEAR_PLANE {
            return None;
        }
        Some((
            self.cx + self.focal * rel[0] / rel[1],
            self.cy - self.focal * rel[2] / rel[1],
        ))
    }

    fn ray(&self, col: u32, row: u32) -> Vec3 {
        [
            (col as f64 + 0.5 - self.cx) / self.focal,
            1.0,
            (self.cy - (row as f64 + 0.5)) / self.focal,
        ]
    }
}

/// Headless CPU renderer for the digit globe.
///
/// Each gene becomes a square single-sided card showing its digit glyph.
/// Back faces are skipped and overlapping ink keeps the darker value, so
/// draw order does not matter.
pub struct SoftwareRenderer {
    glyphs: Vec<GrayImage>,
    config: RenderConfig,
    scene: Vec<Gene>,
}

impl SoftwareRenderer {
    pub fn new(glyphs: Vec<GrayImage>, config: RenderConfig) -> Result<Self> {
        if glyphs.len() != 10 {
            return Err(GlobeError::Configuration(format!(
                "Expected 10 digit glyphs, got {}",
                glyphs.len()
            )));
        }
        Ok(Self {
            glyphs,
            config,
            scene: Vec::new(),
        })
    }

    /// Load `0.png` .. `9.png` from `config.glyph_path`.
    pub fn load(config: &RenderConfig) -> Result<Self> {
        let dir = Path::new(&config.glyph_path);
        let mut glyphs = Vec::with_capacity(10);
        for digit in 0..10 {
            let path = dir.join(format!("{}.png", digit));
            if !path.is_file() {
                return Err(GlobeError::MissingGlyph { path });
            }
            glyphs.push(image::open(&path)?.into_luma8());
        }
        log::debug!("Loaded digit glyphs from {}", dir.display());
        Self::new(glyphs, config.clone())
    }

    fn draw_card(&self, frame: &mut GrayImage, camera: &Camera, card: &Card, glyph: &GrayImage) {
        if dot(sub(camera.position, card.center), card.normal) <= 0.0 {
            return;
        }

        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for corner in card.corners() {
            let Some((px, py)) = camera.project(corner) else {
                return;
            };
            min = (min.0.min(px), min.1.min(py));
            max = (max.0.max(px), max.1.max(py));
        }

        let (width, height) = frame.dimensions();
        let col_start = min.0.floor().max(0.0) as u32;
        let row_start = min.1.floor().max(0.0) as u32;
        let col_end = (max.0.ceil().max(0.0) as u32).min(width);
        let row_end = (max.1.ceil().max(0.0) as u32).min(height);

        let (glyph_width, glyph_height) = glyph.dimensions();
        let plane_offset = dot(sub(card.center, camera.position), card.normal);

        for row in row_start..row_end {
            for col in col_start..col_end {
                let dir = camera.ray(col, row);
                let denom = dot(dir, card.normal);
                if denom.abs() < 1e-9 {
                    continue;
                }
                let t = plane_offset / denom;
                if t <= 0.0 {
                    continue;
                }
                let hit = [
                    camera.position[0] + dir[0] * t,
                    camera.position[1] + dir[1] * t,
                    camera.position[2] + dir[2] * t,
                ];
                let local = sub(hit, card.center);
                let u = dot(local, card.right) / card.size + 0.5;
                let v = 0.5 - local[2] / card.size;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let tx = ((u * glyph_width as f64) as u32).min(glyph_width - 1);
                let ty = ((v * glyph_height as f64) as u32).min(glyph_height - 1);
                let texel = glyph.get_pixel(tx, ty)[0];
                if texel < INK_LEVEL {
                    let pixel = frame.get_pixel_mut(col, row);
                    pixel[0] = pixel[0].min(texel);
                }
            }
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn set_configuration(&mut self, genes: &[Gene]) {
        self.scene.clear();
        self.scene.extend_from_slice(genes);
    }

    fn make_screenshot(&mut self, viewpoint: Viewpoint) -> Result<GrayImage> {
        let mut frame = GrayImage::from_pixel(
            self.config.frame_width,
            self.config.frame_height,
            Luma([255]),
        );
        let camera = Camera::new(&self.config);
        let scene_angle = viewpoint.degrees().to_radians();
        for gene in &self.scene {
            let glyph = self.glyphs.get(gene.digit as usize).ok_or_else(|| GlobeError::Render {
                viewpoint,
                message: format!("no glyph for digit {}", gene.digit),
            })?;
            let card = Card::place(gene, scene_angle);
            self.draw_card(&mut frame, &camera, &card, glyph);
        }
        Ok(frame)
    }
}
