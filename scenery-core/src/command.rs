/// Host input queued for the next frame
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Value carried by a control's change event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Checked(bool),
    Number(f32),
    Click,
}

impl ControlValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ControlValue::Checked(_) => "checkbox",
            ControlValue::Number(_) => "slider",
            ControlValue::Click => "button",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlEvent {
    pub control: String,
    pub value: ControlValue,
}

impl ControlEvent {
    pub fn new(control: impl Into<String>, value: ControlValue) -> Self {
        Self {
            control: control.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Control(ControlEvent),
    Resize { width: u32, height: u32 },
    /// Normalized pointer position, both axes in `[-1, 1]`, +Y up.
    Pointer { x: f32, y: f32 },
    OrbitRotate { left: f32, up: f32 },
    OrbitZoom(f32),
    OrbitPan { right: f32, up: f32 },
    Stop,
}

impl Command {
    pub fn slider(control: impl Into<String>, value: f32) -> Self {
        Command::Control(ControlEvent::new(control, ControlValue::Number(value)))
    }

    pub fn checkbox(control: impl Into<String>, checked: bool) -> Self {
        Command::Control(ControlEvent::new(control, ControlValue::Checked(checked)))
    }

    pub fn click(control: impl Into<String>) -> Self {
        Command::Control(ControlEvent::new(control, ControlValue::Click))
    }
}

/// FIFO shared between input callbacks and the update loop. Clones refer
/// to the same queue; everything runs on one thread.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Rc<RefCell<VecDeque<Command>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: Command) {
        self.inner.borrow_mut().push_back(command);
    }

    /// Take every queued command in arrival order.
    pub fn drain(&self) -> Vec<Command> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_across_clones() {
        let queue = CommandQueue::new();
        let producer = queue.clone();
        producer.push(Command::slider("ambientSlider", 0.5));
        producer.push(Command::Resize { width: 80, height: 24 });

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], Command::slider("ambientSlider", 0.5));
        assert!(queue.is_empty());
    }
}
