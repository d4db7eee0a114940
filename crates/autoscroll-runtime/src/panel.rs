#![forbid(unsafe_code)]

//! View-model of the control panel.
//!
//! The controller keeps a [`PanelView`] in step with the driver state; the
//! host renders it verbatim after every handled event.

/// What the control panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// Panel on screen.
    pub visible: bool,
    /// Highlighted while a countdown or run is in progress.
    pub active: bool,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    /// `"Starting in N..."` during the countdown.
    pub countdown_text: Option<String>,
    /// Last user-facing error, cleared by the next successful start request.
    pub message: Option<String>,
}

impl Default for PanelView {
    fn default() -> Self {
        Self {
            visible: true,
            active: false,
            start_enabled: true,
            stop_enabled: false,
            countdown_text: None,
            message: None,
        }
    }
}

impl PanelView {
    /// Countdown display text.
    #[must_use]
    pub fn countdown_label(remaining: u32) -> String {
        format!("Starting in {remaining}...")
    }

    pub(crate) fn show_idle(&mut self) {
        self.visible = true;
        self.active = false;
        self.start_enabled = true;
        self.stop_enabled = false;
        self.countdown_text = None;
    }

    pub(crate) fn show_countdown(&mut self, remaining: u32) {
        self.visible = true;
        self.active = true;
        self.start_enabled = false;
        self.stop_enabled = false;
        self.countdown_text = Some(Self::countdown_label(remaining));
        self.message = None;
    }

    pub(crate) fn show_running(&mut self) {
        self.visible = false;
        self.active = true;
        self.start_enabled = false;
        self.stop_enabled = true;
        self.countdown_text = None;
    }
}
