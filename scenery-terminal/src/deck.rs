/// Keyboard-driven stand-ins for the page controls
///
/// The deck owns the widget state the way a page owns its inputs: it keeps
/// each checkbox and slider value, and turns key presses into the same
/// change events a browser would send.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use scenery_core::{Command, ControlKind, ControlSpec};

/// Orbit rotation per arrow press, in radians.
const ROTATE_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 0.9;
const PAN_STEP: f32 = 0.5;

#[derive(Debug, Clone)]
struct Widget {
    spec: ControlSpec,
    kind: ControlKind,
}

impl Widget {
    fn describe(&self) -> String {
        match self.kind {
            ControlKind::Checkbox { checked } => {
                format!("[{}] {}", if checked { "x" } else { " " }, self.spec.label)
            }
            ControlKind::Slider { value, .. } => {
                let decimals = self.spec.display_decimals.unwrap_or(2);
                format!("{}: {value:.decimals$}", self.spec.label)
            }
            ControlKind::Button => format!("<{}>", self.spec.label),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ControlDeck {
    widgets: Vec<Widget>,
    selected: usize,
}

impl ControlDeck {
    pub fn new<I: IntoIterator<Item = ControlSpec>>(specs: I) -> Self {
        let widgets = specs
            .into_iter()
            .map(|spec| Widget { kind: spec.kind, spec })
            .collect();
        Self { widgets, selected: 0 }
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.widgets.get(self.selected).map(|w| w.spec.id.as_str())
    }

    /// One-line summary of the selected control.
    pub fn status(&self) -> String {
        match self.widgets.get(self.selected) {
            Some(widget) => format!("({}/{}) {}", self.selected + 1, self.widgets.len(), widget.describe()),
            None => "no controls".to_string(),
        }
    }

    /// Translate a key press into a command, if it maps to one.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Stop),
            KeyCode::Tab => {
                self.select(1);
                None
            }
            KeyCode::BackTab => {
                self.select(-1);
                None
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.step(1.0),
            KeyCode::Char('-') | KeyCode::Char('_') => self.step(-1.0),
            KeyCode::Char(' ') | KeyCode::Enter => self.activate(),
            KeyCode::Left if shifted => Some(Command::OrbitPan { right: -PAN_STEP, up: 0.0 }),
            KeyCode::Right if shifted => Some(Command::OrbitPan { right: PAN_STEP, up: 0.0 }),
            KeyCode::Up if shifted => Some(Command::OrbitPan { right: 0.0, up: PAN_STEP }),
            KeyCode::Down if shifted => Some(Command::OrbitPan { right: 0.0, up: -PAN_STEP }),
            KeyCode::Left => Some(Command::OrbitRotate { left: ROTATE_STEP, up: 0.0 }),
            KeyCode::Right => Some(Command::OrbitRotate { left: -ROTATE_STEP, up: 0.0 }),
            KeyCode::Up => Some(Command::OrbitRotate { left: 0.0, up: ROTATE_STEP }),
            KeyCode::Down => Some(Command::OrbitRotate { left: 0.0, up: -ROTATE_STEP }),
            KeyCode::PageUp => Some(Command::OrbitZoom(ZOOM_STEP)),
            KeyCode::PageDown => Some(Command::OrbitZoom(1.0 / ZOOM_STEP)),
            _ => None,
        }
    }

    fn select(&mut self, offset: isize) {
        if self.widgets.is_empty() {
            return;
        }
        let count = self.widgets.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(count) as usize;
    }

    fn step(&mut self, direction: f32) -> Option<Command> {
        let widget = self.widgets.get_mut(self.selected)?;
        let ControlKind::Slider { min, max, step, value } = &mut widget.kind else {
            return None;
        };
        // Snap to the step grid so repeated presses do not drift.
        let ticks = ((*value - *min) / *step).round() + direction;
        *value = (*min + ticks * *step).clamp(*min, *max);
        Some(Command::slider(widget.spec.id.clone(), *value))
    }

    fn activate(&mut self) -> Option<Command> {
        let widget = self.widgets.get_mut(self.selected)?;
        match &mut widget.kind {
            ControlKind::Checkbox { checked } => {
                *checked = !*checked;
                Some(Command::checkbox(widget.spec.id.clone(), *checked))
            }
            ControlKind::Button => Some(Command::click(widget.spec.id.clone())),
            ControlKind::Slider { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn deck() -> ControlDeck {
        ControlDeck::new([
            ControlSpec::slider("ambientSlider", "Ambient", 0.0, 2.0, 0.1, 0.3),
            ControlSpec::checkbox("helpersToggle", "Helpers", true),
            ControlSpec::button("topView", "Top view"),
        ])
    }

    #[test]
    fn plus_steps_the_selected_slider() {
        let mut deck = deck();
        assert_eq!(deck.handle_key(key(KeyCode::Char('+'))), Some(Command::slider("ambientSlider", 0.4)));
        assert_eq!(deck.status(), "(1/3) Ambient: 0.4");
    }

    #[test]
    fn slider_stops_at_its_bounds() {
        let mut deck = deck();
        for _ in 0..10 {
            deck.handle_key(key(KeyCode::Char('-')));
        }
        assert_eq!(deck.handle_key(key(KeyCode::Char('-'))), Some(Command::slider("ambientSlider", 0.0)));
    }

    #[test]
    fn tab_cycles_and_space_activates() {
        let mut deck = deck();
        assert_eq!(deck.handle_key(key(KeyCode::Tab)), None);
        assert_eq!(deck.selected_id(), Some("helpersToggle"));
        assert_eq!(deck.handle_key(key(KeyCode::Char(' '))), Some(Command::checkbox("helpersToggle", false)));

        deck.handle_key(key(KeyCode::Tab));
        assert_eq!(deck.handle_key(key(KeyCode::Enter)), Some(Command::click("topView")));

        deck.handle_key(key(KeyCode::Tab));
        assert_eq!(deck.selected_id(), Some("ambientSlider"));
        deck.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(deck.selected_id(), Some("topView"));
    }

    #[test]
    fn arrows_orbit_and_quit_stops() {
        let mut deck = ControlDeck::default();
        assert_eq!(
            deck.handle_key(key(KeyCode::Left)),
            Some(Command::OrbitRotate { left: ROTATE_STEP, up: 0.0 })
        );
        let mut shifted = KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT);
        shifted.kind = KeyEventKind::Press;
        assert_eq!(deck.handle_key(shifted), Some(Command::OrbitPan { right: 0.0, up: PAN_STEP }));
        assert_eq!(deck.handle_key(key(KeyCode::Char('q'))), Some(Command::Stop));
        assert_eq!(deck.status(), "no controls");
    }
}
