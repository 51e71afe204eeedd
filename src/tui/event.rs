use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::app::Result;
use crate::domain::MagnitudeRange;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                return Ok(AppEvent::Key(key));
            }
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    CycleSource,
    SetRange(MagnitudeRange),
    TestAlarm,
    Refresh,
    OpenInBrowser,
    SafetyInfo,
    Dismiss,
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
            KeyCode::Char('s') => Action::CycleSource,
            KeyCode::Char('1') => Action::SetRange(MagnitudeRange::R0to2),
            KeyCode::Char('2') => Action::SetRange(MagnitudeRange::R2to4),
            KeyCode::Char('3') => Action::SetRange(MagnitudeRange::R4to6),
            KeyCode::Char('4') => Action::SetRange(MagnitudeRange::R6Plus),
            KeyCode::Char('5') => Action::SetRange(MagnitudeRange::All),
            KeyCode::Char('t') => Action::TestAlarm,
            KeyCode::Char('R') => Action::Refresh,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('i') => Action::SafetyInfo,
            KeyCode::Esc => Action::Dismiss,
            _ => Action::None,
        }
    }
}
