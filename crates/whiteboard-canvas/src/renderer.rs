//! Canvas Renderer
//!
//! Paints drawings onto a raster [`Surface`] using tiny-skia. A full render
//! clears the surface, strokes every line, then every shape in array order,
//! so later shapes stack on top of earlier ones and of all lines. Shapes are
//! outlines only; text is rasterized with ab_glyph, using the bundled
//! DejaVu Sans face unless another font is configured.

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use tiny_skia::{
    Color as SkColor, LineCap, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke,
    Transform,
};
use tracing::debug;
use whiteboard_core::{Drawing, Line, Shape};

use crate::color::to_paint_color;
use crate::config::CanvasConfig;
use crate::error::{Error, Result};
use crate::state::{CanvasState, Effect};

/// Anything with lines and shapes to paint
pub trait Scene {
    /// Segments in draw order
    fn lines(&self) -> &[Line];
    /// Shapes in draw order
    fn shapes(&self) -> &[Shape];
}

impl Scene for Drawing {
    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

impl Scene for CanvasState {
    fn lines(&self) -> &[Line] {
        CanvasState::lines(self)
    }

    fn shapes(&self) -> &[Shape] {
        CanvasState::shapes(self)
    }
}

/// A raster surface, transparent when cleared
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocate a transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Pixmap::new(width, height)
            .map(|pixmap| Self { pixmap })
            .ok_or_else(|| Error::rendering(format!("cannot allocate a {width}x{height} surface")))
    }

    /// Allocate a surface of the configured size
    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        Self::new(config.width, config.height)
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.pixmap.fill(SkColor::TRANSPARENT);
    }

    /// Straight-alpha RGBA of one pixel
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Whether nothing has been painted
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Export the surface as a PNG image
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::rendering(e.to_string()))
    }

    /// Underlying pixmap
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    // Source-over blend of `color` at `coverage` into one pixel.
    fn blend(&mut self, x: i32, y: i32, color: SkColor, coverage: f32) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width() || y >= self.height() {
            return;
        }
        let src_a = color.alpha() * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let idx = (y * self.width() + x) as usize;
        let dst = self.pixmap.pixels()[idx];
        let inv = 1.0 - src_a;
        let to_u8 = |v: f32| v.round().clamp(0.0, 255.0) as u8;

        let a = to_u8(src_a * 255.0 + f32::from(dst.alpha()) * inv);
        let mix = |src: f32, dst: u8| to_u8(src * src_a * 255.0 + f32::from(dst) * inv).min(a);
        let blended = PremultipliedColorU8::from_rgba(
            mix(color.red(), dst.red()),
            mix(color.green(), dst.green()),
            mix(color.blue(), dst.blue()),
            a,
        );
        if let Some(px) = blended {
            self.pixmap.pixels_mut()[idx] = px;
        }
    }
}

/// Font used for text shapes when none is configured
const DEFAULT_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Paints scenes onto surfaces
#[derive(Clone)]
pub struct Renderer {
    font: FontArc,
    text_size: f32,
    shape_line_width: f32,
}

impl Renderer {
    /// Create a renderer with the configured font, or the bundled one
    pub fn new(config: &CanvasConfig) -> Result<Self> {
        let font = match &config.font_path {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .map_err(|e| Error::font(format!("{}: {}", path.display(), e)))?;
                FontArc::try_from_vec(bytes).map_err(|e| Error::font(e.to_string()))?
            }
            None => FontArc::try_from_slice(DEFAULT_FONT).map_err(|e| Error::font(e.to_string()))?,
        };
        debug!(custom = config.font_path.is_some(), "renderer font loaded");

        Ok(Self {
            font,
            text_size: config.text_size,
            shape_line_width: config.shape_line_width as f32,
        })
    }

    /// Use an already loaded font for text
    #[must_use]
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = font;
        self
    }

    /// Parse font data and use it for text
    pub fn with_font_bytes(self, bytes: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| Error::font(e.to_string()))?;
        Ok(self.with_font(font))
    }

    /// Clear the surface and paint the whole scene
    pub fn render<S: Scene + ?Sized>(&self, surface: &mut Surface, scene: &S) {
        surface.clear();
        for line in scene.lines() {
            self.paint_line(surface, line);
        }
        for shape in scene.shapes() {
            self.paint_shape(surface, shape);
        }
    }

    /// Carry out a dispatch effect
    pub fn apply<S: Scene + ?Sized>(&self, surface: &mut Surface, scene: &S, effect: &Effect) {
        match effect {
            Effect::None => {}
            Effect::PaintLine(line) => self.paint_line(surface, line),
            Effect::PaintShape(shape) => self.paint_shape(surface, shape),
            Effect::Repaint => self.render(surface, scene),
        }
    }

    /// Stroke one segment with round caps
    pub fn paint_line(&self, surface: &mut Surface, line: &Line) {
        let mut pb = PathBuilder::new();
        pb.move_to(line.start.x as f32, line.start.y as f32);
        pb.line_to(line.end.x as f32, line.end.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: line.line_width as f32,
            line_cap: LineCap::Round,
            ..Default::default()
        };
        surface.pixmap.stroke_path(
            &path,
            &paint_for(to_paint_color(&line.color)),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    /// Paint one shape: rectangle and circle outlines, or text glyphs
    pub fn paint_shape(&self, surface: &mut Surface, shape: &Shape) {
        let color = to_paint_color(shape.color());
        let path = match shape {
            Shape::Rectangle {
                x, y, width, height, ..
            } => {
                let (x, y, w, h) = (*x as f32, *y as f32, *width as f32, *height as f32);
                let mut pb = PathBuilder::new();
                pb.move_to(x, y);
                pb.line_to(x + w, y);
                pb.line_to(x + w, y + h);
                pb.line_to(x, y + h);
                pb.close();
                pb.finish()
            }
            Shape::Circle { x, y, radius, .. } => {
                PathBuilder::from_circle(*x as f32, *y as f32, *radius as f32)
            }
            Shape::Text { x, y, text, .. } => {
                self.paint_text(surface, *x as f32, *y as f32, text, color);
                return;
            }
        };

        let Some(path) = path else {
            debug!(kind = shape.kind(), "degenerate shape skipped");
            return;
        };
        let stroke = Stroke {
            width: self.shape_line_width,
            ..Default::default()
        };
        surface
            .pixmap
            .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
    }

    // Glyphs are placed with their baseline at `y`.
    fn paint_text(&self, surface: &mut Surface, x: f32, y: f32, text: &str, color: SkColor) {
        let font = &self.font;
        let scale = PxScale::from(self.text_size);
        let scaled = font.as_scaled(scale);
        let mut caret = point(x, y);
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                surface.blend(
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage,
                );
            });
        }
    }
}

fn paint_for(color: SkColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}
