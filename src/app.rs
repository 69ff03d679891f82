use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::debug;

use crate::{
    game::{ClickOutcome, GameSession},
    runtime::{AppEvent, TickScheduler},
    ui::{Hit, ScreenLayout},
};

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Redraw,
    Quit,
}

/// Routes terminal events into the game session.
#[derive(Debug)]
pub struct App<T: TickScheduler> {
    pub session: GameSession<T>,
    /// area of the last frame, used to hit-test mouse presses
    pub area: Rect,
}

impl<T: TickScheduler> App<T> {
    pub fn new(session: GameSession<T>) -> Self {
        Self {
            session,
            area: Rect::default(),
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn layout(&self) -> ScreenLayout {
        ScreenLayout::new(self.area, self.session.button_label())
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Control {
        match event {
            AppEvent::Tick(generation) => {
                if self.session.on_tick(generation) {
                    Control::Redraw
                } else {
                    Control::Continue
                }
            }
            AppEvent::Resize => Control::Redraw,
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Mouse(mouse) => self.on_mouse(mouse),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Esc => Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
            KeyCode::Enter => {
                self.session.start_or_restart();
                Control::Redraw
            }
            KeyCode::Backspace => {
                let mut candidate = self.session.points_text().to_string();
                candidate.pop();
                self.session.set_target_count(&candidate);
                Control::Redraw
            }
            KeyCode::Char(c) => {
                let mut candidate = self.session.points_text().to_string();
                candidate.push(c);
                self.session.set_target_count(&candidate);
                Control::Redraw
            }
            _ => Control::Continue,
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Control {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Control::Continue;
        }

        let hit = self
            .layout()
            .hit_test(self.session.markers(), mouse.column, mouse.row);

        match hit {
            // A press on a marker stops here; nothing underneath sees it.
            Some(Hit::Marker(value)) => {
                let outcome = self.session.handle_marker_click(value);
                if let ClickOutcome::Missed { expected, clicked } = outcome {
                    debug!(expected, clicked, "marker press consumed");
                }
                Control::Redraw
            }
            Some(Hit::Button) => {
                self.session.start_or_restart();
                Control::Redraw
            }
            Some(Hit::Field) | None => Control::Continue,
        }
    }
}
