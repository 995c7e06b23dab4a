/// Terminal output for rasterized frames
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use scenery_core::{Camera, Color, Error, FrameBuffer, Rasterizer, RenderSurface, Result, Scene};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '\u{2580}';

/// How framebuffer pixels map onto character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Two pixels per cell in true color.
    HalfBlock,
    /// One pixel per cell, shaded with the luminosity ramp.
    Ascii,
}

impl RenderStyle {
    /// Framebuffer rows for `rows` terminal rows.
    pub fn pixel_rows(self, rows: u16) -> u32 {
        match self {
            RenderStyle::HalfBlock => u32::from(rows) * 2,
            RenderStyle::Ascii => u32::from(rows),
        }
    }
}

fn term_color(color: Color) -> TermColor {
    let [r, g, b] = color.to_rgb8();
    TermColor::Rgb { r, g, b }
}

fn ramp_char(color: Color) -> char {
    let index = (color.luminance() * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Render surface that rasterizes and then paints the frame onto a writer
pub struct TerminalSurface<W: Write> {
    out: W,
    raster: Rasterizer,
    style: RenderStyle,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, style: RenderStyle, width: u32, height: u32) -> Self {
        Self {
            out,
            raster: Rasterizer::new(width as usize, height as usize),
            style,
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        self.raster.frame()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> std::io::Result<()> {
        let frame = self.raster.frame();
        let out = &mut self.out;
        match self.style {
            RenderStyle::HalfBlock => {
                for row in 0..frame.height().div_ceil(2) {
                    out.queue(cursor::MoveTo(0, row as u16))?;
                    let mut last = None;
                    for x in 0..frame.width() {
                        let top = frame.pixel(x, row * 2);
                        let bottom = if row * 2 + 1 < frame.height() {
                            frame.pixel(x, row * 2 + 1)
                        } else {
                            Color::BLACK
                        };
                        if last != Some((top, bottom)) {
                            out.queue(SetForegroundColor(term_color(top)))?;
                            out.queue(SetBackgroundColor(term_color(bottom)))?;
                            last = Some((top, bottom));
                        }
                        out.queue(Print(HALF_BLOCK))?;
                    }
                }
            }
            RenderStyle::Ascii => {
                for y in 0..frame.height() {
                    out.queue(cursor::MoveTo(0, y as u16))?;
                    for x in 0..frame.width() {
                        if frame.is_covered(x, y) {
                            let color = frame.pixel(x, y);
                            out.queue(SetForegroundColor(term_color(color)))?;
                            out.queue(Print(ramp_char(color)))?;
                        } else {
                            out.queue(Print(' '))?;
                        }
                    }
                }
            }
        }

        let pixels_per_row = self.style.pixel_rows(1) as f32;
        for label in self.raster.labels() {
            let column = (label.x.max(0.0) as usize).saturating_sub(label.text.chars().count() / 2);
            if column >= frame.width() || label.y < 0.0 {
                continue;
            }
            let text: String = label.text.chars().take(frame.width() - column).collect();
            out.queue(cursor::MoveTo(column as u16, (label.y / pixels_per_row) as u16))?;
            out.queue(SetForegroundColor(TermColor::White))?;
            out.queue(SetBackgroundColor(TermColor::Black))?;
            out.queue(Print(text))?;
        }
        out.queue(ResetColor)?;
        out.flush()
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.raster.resize(width, height)
    }

    fn size(&self) -> (u32, u32) {
        self.raster.size()
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.raster.draw(scene, camera);
        self.draw().map_err(|e| Error::Surface(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenery_core::demos;
    use scenery_core::scene::Helper;

    fn render(style: RenderStyle) -> String {
        let demo = demos::build("basic", 40, 20).unwrap();
        let mut surface = TerminalSurface::new(Vec::new(), style, 40, 20);
        surface.render(&demo.ctx.scene, &demo.ctx.camera).unwrap();
        assert!(surface.frame().covered_count() > 0);
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn half_blocks_pack_two_pixel_rows_per_cell() {
        let output = render(RenderStyle::HalfBlock);
        assert_eq!(output.matches(HALF_BLOCK).count(), 40 * 10);
        assert!(output.contains("\x1b[38;2;"));
    }

    #[test]
    fn ascii_uses_the_ramp() {
        let output = render(RenderStyle::Ascii);
        assert!(!output.contains(HALF_BLOCK));
        assert!(output.chars().any(|c| LUMINOSITY_RAMP[1..].contains(&c)));
    }

    #[test]
    fn labels_are_printed_over_the_picture() {
        let mut scene = Scene::new(0x202020);
        scene.add_helper(Helper::label("Phong", 2.0, 1.0));
        let mut surface = TerminalSurface::new(Vec::new(), RenderStyle::Ascii, 40, 20);
        surface.render(&scene, &Camera::new(75.0, 40, 20)).unwrap();
        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert!(output.contains("Phong"));
    }

    #[test]
    fn ramp_spans_dark_to_bright() {
        assert_eq!(ramp_char(Color::BLACK), ' ');
        assert_eq!(ramp_char(Color::WHITE), '@');
        assert_eq!(RenderStyle::HalfBlock.pixel_rows(12), 24);
    }
}
