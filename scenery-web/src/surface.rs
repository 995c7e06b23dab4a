use scenery_core::{Camera, Error, RenderSurface, Rasterizer, Result, Scene};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

fn surface_error(value: JsValue) -> Error {
    Error::Surface(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Rasterizes into a framebuffer and blits it onto a 2d canvas
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    raster: Rasterizer,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32) -> std::result::Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        canvas.set_width(width);
        canvas.set_height(height);
        Ok(Self {
            canvas,
            context,
            raster: Rasterizer::new(width as usize, height as usize),
        })
    }
}

impl RenderSurface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.raster.resize(width, height)?;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.raster.size()
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.raster.draw(scene, camera);
        let frame = self.raster.frame();
        let rgba = frame.to_rgba();
        let image =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(&rgba[..]), frame.width() as u32, frame.height() as u32)
                .map_err(surface_error)?;
        self.context.put_image_data(&image, 0.0, 0.0).map_err(surface_error)?;

        if !self.raster.labels().is_empty() {
            self.context.set_fill_style(&JsValue::from_str("#ffffff"));
            self.context.set_font("bold 14px sans-serif");
            self.context.set_text_align("center");
            self.context.set_text_baseline("middle");
            for label in self.raster.labels() {
                self.context
                    .fill_text(&label.text, f64::from(label.x), f64::from(label.y))
                    .map_err(surface_error)?;
            }
        }
        Ok(())
    }
}
