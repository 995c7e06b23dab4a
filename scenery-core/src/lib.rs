/// Scenery Core Library - scene graph, controls and the frame loop
///
/// Everything a host needs to run the tutorial scenes: the scene model,
/// the control bindings and command queue, time-driven animation, orbit
/// and pointer camera control, a software rasterizer and the update loop
/// tying them together. Hosts supply a clock, a render surface and a
/// frame scheduler.

pub mod animation;
pub mod clock;
pub mod color;
pub mod command;
pub mod context;
pub mod control;
pub mod demos;
pub mod error;
pub mod frame_loop;
pub mod geometry;
pub mod light;
pub mod material;
pub mod orbit;
pub mod pointer;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod script;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use clock::{Clock, HostClock, ManualClock, SystemClock};
pub use color::Color;
pub use command::{Command, CommandQueue, ControlEvent, ControlValue};
pub use context::{SceneContext, Viewport};
pub use control::{Action, ControlKind, ControlPanel, ControlSpec};
pub use demos::Demo;
pub use error::{Error, Result};
pub use frame_loop::{FrameScheduler, FrameStats, RenderSurface, StopHandle, UpdateLoop};
pub use geometry::{Mesh, Shape, Triangle, Vertex};
pub use projection::Camera;
pub use raster::{FrameBuffer, Rasterizer, ScreenLabel};
pub use scene::{Scene, Helper, Object};
pub use script::Script;
pub use transform::{RotationState, Transform};
