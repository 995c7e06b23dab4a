/// The per-frame update loop
///
/// One tick reads the clock, applies queued input in arrival order, writes
/// every time-driven field, steps the orbit controls and renders exactly one
/// frame. Blocking hosts call [`UpdateLoop::run`] with a scheduler; hosts
/// that own the frame callback (the browser) call [`UpdateLoop::tick`].
use log::{debug, info, trace};
use std::cell::Cell;
use std::rc::Rc;

use crate::animation::Animator;
use crate::clock::Clock;
use crate::command::{Command, CommandQueue};
use crate::context::SceneContext;
use crate::control::ControlPanel;
use crate::demos::Demo;
use crate::error::Result;
use crate::projection::Camera;
use crate::scene::Scene;

/// A drawable target sized to the viewport
pub trait RenderSurface {
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn size(&self) -> (u32, u32);

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;
}

/// Waits for the next display refresh. Implementations may translate host
/// input into commands while waiting.
pub trait FrameScheduler {
    fn wait_for_next_frame(&mut self, queue: &CommandQueue) -> Result<()>;
}

/// Cloneable request to end the loop after the current frame
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Number of frames rendered so far, this one included.
    pub frame: u64,
    pub elapsed: f64,
}

pub struct UpdateLoop<C: Clock> {
    name: &'static str,
    ctx: SceneContext,
    panel: ControlPanel,
    animator: Animator,
    queue: CommandQueue,
    clock: C,
    stop: StopHandle,
    frame: u64,
    last_elapsed: Option<f64>,
}

impl<C: Clock> UpdateLoop<C> {
    pub fn new(demo: Demo, clock: C) -> Self {
        Self {
            name: demo.name,
            ctx: demo.ctx,
            panel: demo.panel,
            animator: demo.animator,
            queue: CommandQueue::new(),
            clock,
            stop: StopHandle::default(),
            frame: 0,
            last_elapsed: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn queue(&self) -> CommandQueue {
        self.queue.clone()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn context(&self) -> &SceneContext {
        &self.ctx
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Advance every time-driven field and render one frame.
    pub fn tick<S: RenderSurface>(&mut self, surface: &mut S) -> Result<FrameStats> {
        let elapsed = self.clock.elapsed();

        for command in self.queue.drain() {
            self.apply(command, elapsed, surface)?;
        }

        self.animator.apply(&mut self.ctx.scene, elapsed)?;

        let dt = self.last_elapsed.map_or(0.0, |last| (elapsed - last).max(0.0)) as f32;
        if dt > 0.0 {
            if let Some(orbit) = self.ctx.orbit.as_mut() {
                orbit.update(&mut self.ctx.camera, dt);
            }
        }
        if let Some(pointer) = &self.ctx.pointer {
            pointer.apply(&mut self.ctx.camera, elapsed);
        }

        surface.render(&self.ctx.scene, &self.ctx.camera)?;

        self.last_elapsed = Some(elapsed);
        self.frame += 1;
        trace!("frame {} at {:.3}s", self.frame, elapsed);
        Ok(FrameStats {
            frame: self.frame,
            elapsed,
        })
    }

    /// Tick until stopped, yielding to `scheduler` between frames.
    pub fn run<S, F>(&mut self, surface: &mut S, scheduler: &mut F) -> Result<u64>
    where
        S: RenderSurface,
        F: FrameScheduler,
    {
        let viewport = self.ctx.viewport;
        surface.resize(viewport.width, viewport.height)?;
        info!("starting `{}` at {}x{}", self.name, viewport.width, viewport.height);

        while !self.stop.is_stopped() {
            self.tick(surface)?;
            if self.stop.is_stopped() {
                break;
            }
            scheduler.wait_for_next_frame(&self.queue)?;
        }

        info!("`{}` stopped after {} frames", self.name, self.frame);
        Ok(self.frame)
    }

    fn apply<S: RenderSurface>(&mut self, command: Command, elapsed: f64, surface: &mut S) -> Result<()> {
        match command {
            Command::Control(event) => self.panel.handle(&event, &mut self.ctx)?,
            Command::Resize { width, height } => {
                self.ctx.resize(width, height)?;
                surface.resize(width, height)?;
            }
            Command::Pointer { x, y } => match self.ctx.pointer.as_mut() {
                Some(pointer) => pointer.pointer_moved(&self.ctx.camera, x, y, elapsed),
                None => debug!("pointer input ignored by `{}`", self.name),
            },
            Command::OrbitRotate { left, up } => {
                if let Some(orbit) = self.ctx.orbit.as_mut() {
                    orbit.rotate(left, up);
                }
            }
            Command::OrbitZoom(factor) => {
                if let Some(orbit) = self.ctx.orbit.as_mut() {
                    orbit.zoom(factor);
                }
            }
            Command::OrbitPan { right, up } => {
                if let Some(orbit) = self.ctx.orbit.as_mut() {
                    orbit.pan(&self.ctx.camera, right, up);
                }
            }
            Command::Stop => self.stop.stop(),
        }
        Ok(())
    }
}
