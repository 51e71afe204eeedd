use crate::domain::{Coordinate, Earthquake, MagnitudeRange, Source};

/// All state the TUI renders from. Poll results land here; the list,
/// banner, and map are pure views of it.
pub struct TuiApp {
    pub events: Vec<Earthquake>,
    pub selected: usize,
    pub source: Source,
    pub magnitude_range: MagnitudeRange,
    pub emergency: bool,
    pub error: Option<String>,
    pub status_message: Option<String>,
    pub show_safety_info: bool,
    pub test_alarm_on: bool,
    pub is_polling: bool,
    pub user: Option<Coordinate>,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(source: Source, magnitude_range: MagnitudeRange, user: Option<Coordinate>) -> Self {
        Self {
            events: Vec::new(),
            selected: 0,
            source,
            magnitude_range,
            emergency: false,
            error: None,
            status_message: None,
            show_safety_info: false,
            test_alarm_on: false,
            is_polling: false,
            user,
            should_quit: false,
        }
    }

    /// Events passing the display magnitude filter. Alerting never sees
    /// this view; it works on the full standardized list.
    pub fn visible_events(&self) -> Vec<&Earthquake> {
        self.events
            .iter()
            .filter(|e| self.magnitude_range.contains(e.magnitude))
            .collect()
    }

    pub fn selected_event(&self) -> Option<&Earthquake> {
        self.visible_events().get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let len = self.visible_events().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    /// Keep the selection inside the visible list after a filter change or
    /// a poll shrinks it.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_events().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
