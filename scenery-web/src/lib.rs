/// Scenery Web - the tutorial scenes on an HTML canvas
///
/// The page provides a `<canvas>` plus one element per control the scene
/// declares. Listeners push commands onto the loop's queue; every
/// `requestAnimationFrame` callback stamps the clock and ticks once.
/// Sliders with a display text also get it written into their display
/// element (`<id>Value` unless the scene names another) when the page has
/// one. Dragging on the canvas orbits the camera of scenes that have orbit
/// controls: the left button rotates, the right button or Shift pans, and
/// the wheel zooms.
use log::{error, info, LevelFilter};
use scenery_core::{
    demos, Command, CommandQueue, ControlKind, ControlPanel, ControlSpec, Error, HostClock, StopHandle, UpdateLoop,
};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, HtmlInputElement, MouseEvent, WheelEvent, Window};

mod console;
mod surface;

pub use surface::CanvasSurface;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// World units panned by a drag across the full canvas height.
const PAN_PER_HEIGHT: f64 = 8.0;
/// Distance factor per wheel notch toward the target.
const ZOOM_STEP: f32 = 0.95;

const PRIMARY_BUTTON: u16 = 1;
const SECONDARY_BUTTON: u16 = 2;

fn to_js(error: Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Viewport size from the window's inner size, never zero.
fn viewport_size(inner_width: f64, inner_height: f64) -> (u32, u32) {
    (inner_width.max(1.0) as u32, inner_height.max(1.0) as u32)
}

/// Pointer position relative to the viewport, `-1..1` with `+y` up.
fn pointer_command(client_x: f64, client_y: f64, width: f64, height: f64) -> Command {
    Command::Pointer {
        x: (client_x / width.max(1.0) * 2.0 - 1.0) as f32,
        y: (-(client_y / height.max(1.0)) * 2.0 + 1.0) as f32,
    }
}

/// Orbit command for a drag of `dx`, `dy` pixels on a canvas `height`
/// pixels tall while `buttons` are held.
fn drag_command(dx: f64, dy: f64, buttons: u16, shift: bool, height: f64) -> Option<Command> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let height = height.max(1.0);
    let primary = buttons & PRIMARY_BUTTON != 0;
    if buttons & SECONDARY_BUTTON != 0 || (primary && shift) {
        Some(Command::OrbitPan {
            right: (-dx / height * PAN_PER_HEIGHT) as f32,
            up: (dy / height * PAN_PER_HEIGHT) as f32,
        })
    } else if primary {
        Some(Command::OrbitRotate {
            left: (TAU * dx / height) as f32,
            up: (TAU * dy / height) as f32,
        })
    } else {
        None
    }
}

/// Scrolling down moves away from the target.
fn wheel_command(delta_y: f64) -> Option<Command> {
    if delta_y < 0.0 {
        Some(Command::OrbitZoom(ZOOM_STEP))
    } else if delta_y > 0.0 {
        Some(Command::OrbitZoom(1.0 / ZOOM_STEP))
    } else {
        None
    }
}

fn window_size(window: &Window) -> Result<(u32, u32), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(1.0);
    let height = window.inner_height()?.as_f64().unwrap_or(1.0);
    Ok(viewport_size(width, height))
}

fn listen_event<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn listen<F>(target: &EventTarget, event: &str, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    listen_event(target, event, move |_| handler())
}

fn input_element(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| to_js(Error::MissingControl(id.to_string())))?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("control `{id}` is not an <input>")))
}

fn bind_control(document: &Document, spec: &ControlSpec, queue: &CommandQueue) -> Result<(), JsValue> {
    let id = spec.id.clone();
    let queue = queue.clone();
    match spec.kind {
        ControlKind::Slider { .. } => {
            let input = input_element(document, &id)?;
            let source = input.clone();
            listen(&input, "input", move || {
                queue.push(Command::slider(id.as_str(), source.value_as_number() as f32));
            })
        }
        ControlKind::Checkbox { .. } => {
            let input = input_element(document, &id)?;
            let source = input.clone();
            listen(&input, "change", move || {
                queue.push(Command::checkbox(id.as_str(), source.checked()));
            })
        }
        ControlKind::Button => {
            let element = document
                .get_element_by_id(&id)
                .ok_or_else(|| to_js(Error::MissingControl(id.clone())))?;
            listen(&element, "click", move || queue.push(Command::click(id.as_str())))
        }
    }
}

fn listen_window(window: &Window, queue: &CommandQueue) -> Result<(), JsValue> {
    let source = window.clone();
    let resize_queue = queue.clone();
    listen(window, "resize", move || match window_size(&source) {
        Ok((width, height)) => resize_queue.push(Command::Resize { width, height }),
        Err(err) => error!("cannot read window size: {err:?}"),
    })?;

    let source = window.clone();
    let queue = queue.clone();
    listen_event(window, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let width = source.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(1.0);
        let height = source.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(1.0);
        queue.push(pointer_command(
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            width,
            height,
        ));
    })
}

fn listen_canvas(canvas: &HtmlCanvasElement, queue: &CommandQueue) -> Result<(), JsValue> {
    // The right button pans, so keep the context menu away.
    listen_event(canvas, "contextmenu", |event| event.prevent_default())?;

    let source = canvas.clone();
    let drag_queue = queue.clone();
    listen_event(canvas, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let command = drag_command(
            f64::from(event.movement_x()),
            f64::from(event.movement_y()),
            event.buttons(),
            event.shift_key(),
            f64::from(source.client_height()),
        );
        if let Some(command) = command {
            drag_queue.push(command);
        }
    })?;

    let queue = queue.clone();
    listen_event(canvas, "wheel", move |event| {
        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        event.prevent_default();
        if let Some(command) = wheel_command(wheel.delta_y()) {
            queue.push(command);
        }
    })
}

/// Copy slider display texts into their display elements.
fn publish_displays(document: &Document, panel: &ControlPanel) {
    for control in panel.controls() {
        if let Some(text) = control.display() {
            if let Some(element) = document.get_element_by_id(&control.spec.display_element()) {
                element.set_text_content(Some(text));
            }
        }
    }
}

fn start_frames(
    window: Window,
    document: Document,
    mut update: UpdateLoop<HostClock>,
    mut surface: CanvasSurface,
    clock: HostClock,
) -> Result<(), JsValue> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let handle = callback.clone();
    let stop = update.stop_handle();
    let scheduler = window.clone();

    *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        if stop.is_stopped() {
            info!("`{}` stopped after {} frames", update.name(), update.frames());
            let _ = handle.borrow_mut().take();
            return;
        }
        clock.record_millis(timestamp);
        if let Err(err) = update.tick(&mut surface) {
            error!("`{}` frame {} failed: {err}", update.name(), update.frames() + 1);
            stop.stop();
            let _ = handle.borrow_mut().take();
            return;
        }
        publish_displays(&document, update.panel());
        if let Some(next) = handle.borrow().as_ref() {
            if let Err(err) = scheduler.request_animation_frame(next.as_ref().unchecked_ref()) {
                error!("cannot schedule the next frame: {err:?}");
            }
        }
    }));

    let first = callback.borrow();
    let first = first.as_ref().ok_or_else(|| JsValue::from_str("frame callback missing"))?;
    window.request_animation_frame(first.as_ref().unchecked_ref())?;
    Ok(())
}

/// A running scene on a page
#[wasm_bindgen]
pub struct SceneryApp {
    queue: CommandQueue,
    stop: StopHandle,
}

#[wasm_bindgen]
impl SceneryApp {
    /// Build `scene`, bind the page controls and start the frame loop.
    ///
    /// Fails if the canvas or any control the scene declares is missing.
    pub fn start(canvas_id: &str, scene: &str) -> Result<SceneryApp, JsValue> {
        console::init(LevelFilter::Info);
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("window has no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no canvas with id `{canvas_id}`")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("`{canvas_id}` is not a <canvas>")))?;

        let (width, height) = window_size(&window)?;
        let demo = demos::build(scene, width, height).map_err(to_js)?;
        demo.panel
            .validate(|id| document.get_element_by_id(id).is_some())
            .map_err(to_js)?;
        let specs: Vec<ControlSpec> = demo.panel.controls().iter().map(|c| c.spec.clone()).collect();

        let clock = HostClock::new();
        let update = UpdateLoop::new(demo, clock.clone());
        let queue = update.queue();
        let stop = update.stop_handle();

        for spec in &specs {
            bind_control(&document, spec, &queue)?;
        }
        listen_window(&window, &queue)?;
        listen_canvas(&canvas, &queue)?;

        let surface = CanvasSurface::new(canvas, width, height)?;
        info!("starting `{scene}` at {width}x{height} with {} controls", specs.len());
        start_frames(window, document, update, surface, clock)?;

        Ok(SceneryApp { queue, stop })
    }

    /// End the loop after the current frame.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Same as moving slider `id` to `value` on the page.
    pub fn set_slider(&self, id: &str, value: f32) {
        self.queue.push(Command::slider(id, value));
    }

    pub fn set_checkbox(&self, id: &str, checked: bool) {
        self.queue.push(Command::checkbox(id, checked));
    }

    pub fn click(&self, id: &str) {
        self.queue.push(Command::click(id));
    }

    /// Names of the scenes `start` accepts.
    pub fn scenes() -> Vec<JsValue> {
        demos::names().map(JsValue::from_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_size_is_never_zero() {
        assert_eq!(viewport_size(1280.0, 720.0), (1280, 720));
        assert_eq!(viewport_size(0.0, -5.0), (1, 1));
    }

    #[test]
    fn pointer_is_normalized_with_y_up() {
        assert_eq!(pointer_command(300.0, 0.0, 400.0, 200.0), Command::Pointer { x: 0.5, y: 1.0 });
        assert_eq!(pointer_command(0.0, 200.0, 400.0, 200.0), Command::Pointer { x: -1.0, y: -1.0 });
    }

    #[test]
    fn left_drag_rotates_a_full_turn_per_canvas_height() {
        assert_eq!(
            drag_command(100.0, 0.0, PRIMARY_BUTTON, false, 200.0),
            Some(Command::OrbitRotate { left: std::f32::consts::PI, up: 0.0 })
        );
        assert_eq!(
            drag_command(0.0, 50.0, PRIMARY_BUTTON, false, 200.0),
            Some(Command::OrbitRotate { left: 0.0, up: std::f32::consts::FRAC_PI_2 })
        );
    }

    #[test]
    fn right_or_shift_drag_pans_against_the_motion() {
        let pan = Some(Command::OrbitPan { right: -2.0, up: -4.0 });
        assert_eq!(drag_command(50.0, -100.0, SECONDARY_BUTTON, false, 200.0), pan);
        assert_eq!(drag_command(50.0, -100.0, PRIMARY_BUTTON, true, 200.0), pan);
    }

    #[test]
    fn moves_without_a_button_do_not_orbit() {
        assert_eq!(drag_command(10.0, 10.0, 0, false, 200.0), None);
        assert_eq!(drag_command(10.0, 10.0, 4, false, 200.0), None);
        assert_eq!(drag_command(0.0, 0.0, PRIMARY_BUTTON, false, 200.0), None);
    }

    #[test]
    fn wheel_zooms_in_when_scrolling_up() {
        assert_eq!(wheel_command(-120.0), Some(Command::OrbitZoom(ZOOM_STEP)));
        assert_eq!(wheel_command(120.0), Some(Command::OrbitZoom(1.0 / ZOOM_STEP)));
        assert_eq!(wheel_command(0.0), None);
    }
}
