#![forbid(unsafe_code)]

//! Panel markup, styles, and the `PanelView` → DOM presentation mapping.
//!
//! Everything here is plain string and struct work so it can be tested on
//! native targets; the wasm host only splices the results into the page.

use core::fmt::Write as _;

use autoscroll_core::config::{Axis, ConfigField, Direction, ScrollConfig};
use autoscroll_core::input::Shortcut;
use autoscroll_core::options::PanelPosition;
use autoscroll_runtime::panel::PanelView;

/// Panel title shown in the drag handle.
pub const PANEL_TITLE: &str = "Dev Scroll Utility";

/// Class toggled on the root while a countdown or run is in progress.
pub const ACTIVE_CLASS: &str = "is-active";

/// Class toggled on the countdown display while it shows text.
pub const COUNTDOWN_ACTIVE_CLASS: &str = "active";

/// Addressable pieces of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelPart {
    Handle,
    Countdown,
    Message,
    Start,
    Stop,
    Field(ConfigField),
    Direction(Axis),
    Manual(Axis, Direction),
}

impl PanelPart {
    /// Every manual-scroll button, in display order.
    pub const MANUAL: [Self; 4] = [
        Self::Manual(Axis::Y, Direction::Backward),
        Self::Manual(Axis::Y, Direction::Forward),
        Self::Manual(Axis::X, Direction::Backward),
        Self::Manual(Axis::X, Direction::Forward),
    ];

    fn suffix(self) -> &'static str {
        match self {
            Self::Handle => "handle",
            Self::Countdown => "countdown",
            Self::Message => "message",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Field(ConfigField::DistanceX) => "distance-x",
            Self::Field(ConfigField::DistanceY) => "distance-y",
            Self::Field(ConfigField::TickInterval) => "tick-interval",
            Self::Field(ConfigField::Countdown) => "countdown-seconds",
            Self::Direction(Axis::X) => "direction-x",
            Self::Direction(Axis::Y) => "direction-y",
            Self::Manual(Axis::Y, Direction::Backward) => "scroll-up",
            Self::Manual(Axis::Y, Direction::Forward) => "scroll-down",
            Self::Manual(Axis::X, Direction::Backward) => "scroll-left",
            Self::Manual(Axis::X, Direction::Forward) => "scroll-right",
        }
    }
}

/// Element ids, all derived from the panel root id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelIds {
    root: String,
}

impl PanelIds {
    /// `root` must already be a plain identifier (`PanelOptions` checks it).
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn id(&self, part: PanelPart) -> String {
        format!("{}-{}", self.root, part.suffix())
    }
}

/// Label text of a numeric field.
#[must_use]
pub const fn field_label(field: ConfigField) -> &'static str {
    match field {
        ConfigField::DistanceX => "Horizontal (px/tick)",
        ConfigField::DistanceY => "Vertical (px/tick)",
        ConfigField::TickInterval => "Tick interval (ms)",
        ConfigField::Countdown => "Countdown (s)",
    }
}

/// Human name of travel along `axis` in `direction`.
#[must_use]
pub const fn direction_name(axis: Axis, direction: Direction) -> &'static str {
    match (axis, direction) {
        (Axis::X, Direction::Forward) => "Right",
        (Axis::X, Direction::Backward) => "Left",
        (Axis::Y, Direction::Forward) => "Down",
        (Axis::Y, Direction::Backward) => "Up",
    }
}

/// Text of a manual-scroll button.
#[must_use]
pub fn manual_label(axis: Axis, direction: Direction, step_px: u32) -> String {
    format!("Scroll {} {step_px}", direction_name(axis, direction))
}

/// Inner HTML of the panel root.
#[must_use]
pub fn panel_html(
    ids: &PanelIds,
    config: &ScrollConfig,
    shortcut: &Shortcut,
    manual_step_px: u32,
) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="header" id="{handle}"><span class="title">{PANEL_TITLE}</span><span class="shortcut">Shortcut: <kbd>{shortcut}</kbd></span></div>"#,
        handle = ids.id(PanelPart::Handle),
    );

    html.push_str(r#"<div class="controls">"#);
    for field in ConfigField::ALL {
        let id = ids.id(PanelPart::Field(field));
        let _ = write!(
            html,
            r#"<div class="control-group"><label for="{id}">{label}:</label><input type="number" id="{id}" value="{value}" min="{min}" step="1"></div>"#,
            label = field_label(field),
            value = config.field(field),
            min = field.minimum(),
        );
    }
    for axis in Axis::ALL {
        let id = ids.id(PanelPart::Direction(axis));
        let _ = write!(
            html,
            r#"<div class="control-group"><label for="{id}">{name} direction:</label><select id="{id}">"#,
            name = if axis == Axis::X { "Horizontal" } else { "Vertical" },
        );
        for direction in [Direction::Forward, Direction::Backward] {
            let selected = if config.direction(axis) == direction {
                " selected"
            } else {
                ""
            };
            let _ = write!(
                html,
                r#"<option value="{value}"{selected}>{name}</option>"#,
                value = direction.as_str(),
                name = direction_name(axis, direction),
            );
        }
        html.push_str("</select></div>");
    }

    let _ = write!(
        html,
        r#"<button id="{start}" class="action-btn start">Start Auto Scroll</button><button id="{stop}" class="action-btn stop" disabled>Stop Scroll</button>"#,
        start = ids.id(PanelPart::Start),
        stop = ids.id(PanelPart::Stop),
    );

    html.push_str(r#"<div class="manual-control"><p>Manual Control:</p>"#);
    for part in PanelPart::MANUAL {
        if let PanelPart::Manual(axis, direction) = part {
            let _ = write!(
                html,
                r#"<button id="{id}" class="manual-btn">{label}</button>"#,
                id = ids.id(part),
                label = manual_label(axis, direction, manual_step_px),
            );
        }
    }
    html.push_str("</div></div>");

    let _ = write!(
        html,
        r#"<div id="{countdown}" class="countdown-display"></div><div id="{message}" class="message" hidden></div><div class="disclaimer"><p>Record using OS tools. Supports all devices/browsers.</p></div>"#,
        countdown = ids.id(PanelPart::Countdown),
        message = ids.id(PanelPart::Message),
    );
    html
}

/// Stylesheet for the panel, scoped to its root id.
#[must_use]
pub fn panel_css(ids: &PanelIds, position: &PanelPosition) -> String {
    let root = format!("#{}", ids.root());
    let mut css = String::new();
    let _ = writeln!(
        css,
        "{root} {{ position: fixed; top: {top}px; right: {right}px; z-index: 99999; \
         background: #282c34; color: #fff; border: 1px solid #61dafb; padding: 10px; \
         border-radius: 5px; box-shadow: 0 4px 8px rgba(0, 0, 0, 0.5); \
         font-family: Arial, sans-serif; font-size: 14px; width: 250px; cursor: grab; \
         touch-action: none; }}",
        top = position.top,
        right = position.right,
    );
    for rule in [
        "{root}.is-active { box-shadow: 0 0 15px 3px #61dafb; border-color: #61dafb; }",
        "{root}.is-dragging { cursor: grabbing; }",
        "{root} .header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 10px; border-bottom: 1px solid #444; padding-bottom: 5px; }",
        "{root} .title { font-weight: bold; color: #61dafb; }",
        "{root} .shortcut kbd { background: #555; padding: 2px 4px; border-radius: 3px; font-size: 12px; color: #fff; }",
        "{root} .controls button, {root} .controls input, {root} .controls select { width: 100%; padding: 8px; margin-top: 5px; border: none; border-radius: 4px; cursor: pointer; box-sizing: border-box; }",
        "{root} .controls input[type=\"number\"], {root} .controls select { background: #333; color: white; text-align: center; }",
        "{root} .action-btn.start { background: #4caf50; color: white; }",
        "{root} .action-btn.stop { background: #f44336; color: white; }",
        "{root} button:disabled { opacity: 0.5; cursor: not-allowed; }",
        "{root} .control-group { margin-bottom: 10px; }",
        "{root} .control-group label { display: block; margin-bottom: 5px; }",
        "{root} .manual-control { margin-top: 10px; border-top: 1px solid #444; padding-top: 10px; }",
        "{root} .manual-control p { margin: 0 0 5px 0; font-size: 12px; color: #aaa; }",
        "{root} .manual-btn { background: #3f51b5; color: white; margin-bottom: 5px; }",
        "{root} .message { color: #ff8a80; font-size: 12px; margin-top: 8px; }",
        "{root} .disclaimer { font-size: 10px; color: #aaa; margin-top: 10px; border-top: 1px solid #444; padding-top: 5px; }",
        "{root} .countdown-display { font-size: 2em; font-weight: bold; color: #ffeb3b; text-align: center; height: 0; overflow: hidden; opacity: 0; transition: height 0.3s ease, opacity 0.3s ease; }",
        "{root} .countdown-display.active { height: 35px; opacity: 1; margin-bottom: 10px; }",
    ] {
        css.push_str(&rule.replace("{root}", &root));
        css.push('\n');
    }
    css
}

/// Concrete DOM state for one [`PanelView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// CSS `visibility` of the root.
    pub visibility: &'static str,
    pub root_active: bool,
    pub countdown_active: bool,
    pub countdown_text: String,
    pub message: Option<String>,
    pub start_disabled: bool,
    pub stop_disabled: bool,
}

impl Presentation {
    #[must_use]
    pub fn of(view: &PanelView) -> Self {
        Self {
            visibility: if view.visible { "visible" } else { "hidden" },
            root_active: view.active,
            countdown_active: view.countdown_text.is_some(),
            countdown_text: view.countdown_text.clone().unwrap_or_default(),
            message: view.message.clone(),
            start_disabled: !view.start_enabled,
            stop_disabled: !view.stop_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_prefixed_with_root() {
        let ids = PanelIds::new("p");
        assert_eq!(ids.id(PanelPart::Start), "p-start");
        assert_eq!(ids.id(PanelPart::Field(ConfigField::TickInterval)), "p-tick-interval");
        assert_eq!(
            ids.id(PanelPart::Manual(Axis::Y, Direction::Backward)),
            "p-scroll-up"
        );
    }

    #[test]
    fn html_carries_config_and_shortcut() {
        let ids = PanelIds::new("p");
        let config = ScrollConfig::new()
            .with_distance(Axis::Y, 4)
            .with_direction(Axis::X, Direction::Backward);
        let html = panel_html(&ids, &config, &Shortcut::default(), 500);

        assert!(html.contains(r#"id="p-distance-y" value="4" min="0""#));
        assert!(html.contains(r#"id="p-tick-interval" value="16" min="1""#));
        assert!(html.contains(r#"<option value="backward" selected>Left</option>"#));
        assert!(html.contains("<kbd>Ctrl+S</kbd>"));
        assert!(html.contains(">Scroll Down 500</button>"));
        assert!(html.contains(r#"id="p-stop" class="action-btn stop" disabled"#));
    }

    #[test]
    fn css_is_scoped_and_positioned() {
        let css = panel_css(
            &PanelIds::new("p"),
            &PanelPosition {
                top: 40.0,
                right: 8.0,
            },
        );
        assert!(css.starts_with("#p { position: fixed; top: 40px; right: 8px;"));
        assert!(css.contains("#p.is-active {"));
        assert!(!css.contains("{root}"));
    }

    #[test]
    fn presentation_follows_view() {
        let idle = Presentation::of(&PanelView::default());
        assert_eq!(idle.visibility, "visible");
        assert!(!idle.start_disabled && idle.stop_disabled);
        assert!(!idle.countdown_active);

        let view = PanelView {
            visible: false,
            active: true,
            start_enabled: false,
            stop_enabled: true,
            countdown_text: None,
            message: None,
        };
        let running = Presentation::of(&view);
        assert_eq!(running.visibility, "hidden");
        assert!(running.root_active);
        assert!(running.start_disabled && !running.stop_disabled);
    }
}
