//! Property-based invariant tests for configuration, boundary and gestures.
//!
//! 1. Every numeric write is clamped to the field's minimum and `u32::MAX`.
//! 2. In-range writes read back unchanged.
//! 3. Non-numeric text never changes a field.
//! 4. `parse_leading_integer` agrees with `str::parse` on plain integers.
//! 5. The scroll vector is `distance * direction` on each axis.
//! 6. A zero axis never reports an edge on that axis.
//! 7. A viewport strictly inside the document reports no edge.
//! 8. Field gestures never produce drag actions, and drag gestures never
//!    produce adjustments.
//! 9. Gesture steps sum to the truncated total travel.
//! 10. Shortcut display output parses back to the same shortcut.
//! 11. A panel id is accepted iff it is a CSS-safe identifier: a letter or
//!     `_`, then letters, digits, `-` or `_`.

use autoscroll_core::boundary::{BOUNDARY_EPSILON_PX, reached_edge};
use autoscroll_core::config::{
    Axis, ConfigField, Direction, ScrollConfig, parse_leading_integer,
};
use autoscroll_core::geometry::{Point, Rect, ScrollMetrics, ScrollVector};
use autoscroll_core::gesture::{GESTURE_STEP_PX, GestureAction, GestureRouter, Region};
use autoscroll_core::input::{Modifiers, Shortcut};
use autoscroll_core::options::{OptionsError, PanelOptions};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn field_strategy() -> impl Strategy<Value = ConfigField> {
    prop_oneof![
        Just(ConfigField::DistanceX),
        Just(ConfigField::DistanceY),
        Just(ConfigField::TickInterval),
        Just(ConfigField::Countdown),
    ]
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
}

/// Metrics with the viewport somewhere inside a larger document.
fn metrics_strategy() -> impl Strategy<Value = ScrollMetrics> {
    (100.0f64..2000.0, 100.0f64..2000.0, 0.0f64..5000.0, 0.0f64..5000.0, 0.0f64..1.0, 0.0f64..1.0)
        .prop_map(|(vw, vh, extra_w, extra_h, fx, fy)| {
            let mut m = ScrollMetrics::at_origin((vw, vh), (vw + extra_w, vh + extra_h));
            m.offset_x = extra_w * fx;
            m.offset_y = extra_h * fy;
            m
        })
}

fn router() -> GestureRouter {
    let mut router = GestureRouter::new();
    router.set_regions(vec![
        (Rect::new(0.0, 0.0, 300.0, 40.0), Region::DragHandle),
        (Rect::new(0.0, 40.0, 300.0, 40.0), Region::Field(ConfigField::DistanceY)),
        (Rect::new(0.0, 80.0, 300.0, 40.0), Region::Field(ConfigField::TickInterval)),
    ]);
    router
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Field writes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn writes_are_clamped(field in field_strategy(), value in any::<i64>()) {
        let mut config = ScrollConfig::new();
        let stored = config.set_field(field, value);
        prop_assert!(stored >= field.minimum());
        prop_assert_eq!(config.field(field), stored);
        if value <= i64::from(field.minimum()) {
            prop_assert_eq!(stored, field.minimum());
        }
        if value >= i64::from(u32::MAX) {
            prop_assert_eq!(stored, u32::MAX);
        }
    }

    #[test]
    fn in_range_writes_read_back(field in field_strategy(), value in 1u32..=u32::MAX) {
        let mut config = ScrollConfig::new();
        prop_assert_eq!(config.set_field(field, i64::from(value)), value);
        prop_assert_eq!(config.field(field), value);
    }

    #[test]
    fn non_numeric_input_is_ignored(field in field_strategy(), raw in "[a-zA-Z .]{0,12}") {
        let mut config = ScrollConfig::new().with_distance(Axis::Y, 42);
        let before = config;
        config.apply_input(field, &raw);
        prop_assert_eq!(config, before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Parsing and vectors
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn leading_integer_matches_std_parse(n in any::<i64>(), suffix in "[a-z.]{0,4}") {
        let raw = format!("{n}{suffix}");
        prop_assert_eq!(parse_leading_integer(&raw), Some(n));
    }

    #[test]
    fn vector_is_signed_distance(
        x in 0i64..10_000,
        y in 0i64..10_000,
        dir_x in direction_strategy(),
        dir_y in direction_strategy(),
    ) {
        let config = ScrollConfig::new()
            .with_distance(Axis::X, x)
            .with_distance(Axis::Y, y)
            .with_direction(Axis::X, dir_x)
            .with_direction(Axis::Y, dir_y);
        let v = config.vector();
        prop_assert_eq!(v, ScrollVector::new(x * dir_x.sign(), y * dir_y.sign()));
        prop_assert_eq!(config.has_motion(), x != 0 || y != 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6-7. Boundary policy
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zero_axis_never_reports(m in metrics_strategy(), dy in -100i64..100) {
        let edge = reached_edge(ScrollVector::new(0, dy), &m);
        prop_assert!(edge.is_none_or(|e| e.axis() == Axis::Y), "edge {:?}", edge);
        if dy == 0 {
            prop_assert_eq!(edge, None);
        }
    }

    #[test]
    fn interior_viewport_reports_nothing(
        m in metrics_strategy(),
        dx in -100i64..100,
        dy in -100i64..100,
    ) {
        let margin = BOUNDARY_EPSILON_PX + 0.01;
        let inside_x = m.offset_x > margin && m.right() < m.content_width - margin;
        let inside_y = m.offset_y > margin && m.bottom() < m.content_height - margin;
        prop_assume!(inside_x && inside_y);
        prop_assert_eq!(reached_edge(ScrollVector::new(dx, dy), &m), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8-9. Gesture routing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn gestures_stay_in_their_region(
        start_y in 0.0f64..120.0,
        moves in prop::collection::vec((0.0f64..300.0, -400.0f64..400.0), 1..20),
    ) {
        let mut router = router();
        let region = router.touch_start(Point::new(150.0, start_y));
        prop_assert!(region.is_some());

        let mut total_steps = 0i64;
        let mut last_y = start_y;
        for (x, y) in moves {
            last_y = y;
            match (region, router.touch_move(Point::new(x, y))) {
                (Some(Region::DragHandle), GestureAction::Adjust { .. }) => {
                    prop_assert!(false, "drag gesture adjusted a field");
                }
                (Some(Region::Field(_)), GestureAction::Drag(_)) => {
                    prop_assert!(false, "field gesture moved the panel");
                }
                (Some(Region::Field(expected)), GestureAction::Adjust { field, steps }) => {
                    prop_assert_eq!(field, expected);
                    total_steps += steps;
                }
                _ => {}
            }
        }
        prop_assert_eq!(router.touch_end(), region);

        if matches!(region, Some(Region::Field(_))) {
            let expected = ((start_y - last_y) / GESTURE_STEP_PX) as i64;
            prop_assert_eq!(total_steps, expected);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 10. Shortcut text
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shortcut_display_parses_back(key in "[a-z0-9]", bits in 1u8..16) {
        let mods = Modifiers::from_bits_truncate(bits);
        let key = key.chars().next().unwrap();
        let shortcut = Shortcut::new(key, mods);
        let parsed: Shortcut = shortcut.to_string().parse().unwrap();
        prop_assert_eq!(parsed, shortcut);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 11. Panel ids
// ═════════════════════════════════════════════════════════════════════════

fn options_with_id(id: &str) -> Result<PanelOptions, OptionsError> {
    PanelOptions::from_json(&format!(r#"{{"panel_id":"{id}"}}"#))
}

proptest! {
    #[test]
    fn selector_safe_ids_are_accepted(id in "[a-zA-Z_][a-zA-Z0-9_-]{0,16}") {
        let options = options_with_id(&id);
        prop_assert!(options.is_ok(), "{:?}", options.err());
    }

    #[test]
    fn ids_starting_with_digit_or_dash_are_rejected(id in "[0-9-][a-zA-Z0-9_-]{0,16}") {
        prop_assert!(matches!(options_with_id(&id), Err(OptionsError::PanelId(_))));
    }
}
