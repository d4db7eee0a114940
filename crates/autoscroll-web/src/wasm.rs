#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use autoscroll_core::config::{Axis, ConfigField, Direction, ScrollConfig};
use autoscroll_core::drag::PanelDrag;
use autoscroll_core::geometry::{Point, Rect};
use autoscroll_core::gesture::{GestureAction, GestureRouter, Region};
use autoscroll_core::input::{KeyInput, Modifiers, Shortcut};
use autoscroll_core::options::PanelOptions;
use autoscroll_runtime::controller::ScrollController;
use autoscroll_runtime::timer::TimerId;
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent,
};

use crate::host::{TimerSink, WindowTicks, WindowViewport};
use crate::lifecycle::{self, Attachments, Installed, Unavailable};
use crate::markup::{self, PanelIds, PanelPart, Presentation};

type Controller = ScrollController<WindowTicks, WindowViewport>;
type Shared = Rc<RefCell<App>>;

const DRAGGING_CLASS: &str = "is-dragging";

struct PanelUi {
    style: Element,
    root: HtmlElement,
    handle: HtmlElement,
    countdown: HtmlElement,
    message: HtmlElement,
    start: HtmlButtonElement,
    stop: HtmlButtonElement,
    fields: Vec<(ConfigField, HtmlInputElement)>,
    directions: Vec<(Axis, HtmlSelectElement)>,
    manual: Vec<(Axis, Direction, HtmlButtonElement)>,
}

struct App {
    controller: Controller,
    ui: PanelUi,
    shortcut: Shortcut,
    drag: PanelDrag,
    gestures: GestureRouter,
    listeners: Attachments<EventListener>,
    installed: bool,
}

impl App {
    /// Mirror the panel view-model into the DOM.
    fn render(&self) {
        let p = Presentation::of(self.controller.panel());
        let ui = &self.ui;
        let _ = ui.root.style().set_property("visibility", p.visibility);
        let _ = ui
            .root
            .class_list()
            .toggle_with_force(markup::ACTIVE_CLASS, p.root_active);
        let _ = ui
            .countdown
            .class_list()
            .toggle_with_force(markup::COUNTDOWN_ACTIVE_CLASS, p.countdown_active);
        ui.countdown.set_text_content(Some(&p.countdown_text));
        ui.message.set_text_content(p.message.as_deref());
        ui.message.set_hidden(p.message.is_none());
        ui.start.set_disabled(p.start_disabled);
        ui.stop.set_disabled(p.stop_disabled);
    }

    /// Write the stored configuration back into the inputs (shows clamping).
    fn render_config(&self) {
        let config = self.controller.config();
        for (field, input) in &self.ui.fields {
            input.set_value(&config.field(*field).to_string());
        }
        for (axis, select) in &self.ui.directions {
            select.set_value(config.direction(*axis).as_str());
        }
    }

    fn finish(&mut self) {
        for event in self.controller.drain_events() {
            debug!(?event, "controller event");
        }
        self.render();
    }

    fn panel_origin(&self) -> Point {
        let rect = self.ui.root.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }

    fn place_panel(&self, origin: Point) {
        let style = self.ui.root.style();
        let _ = style.set_property("left", &format!("{}px", origin.x));
        let _ = style.set_property("top", &format!("{}px", origin.y));
        let _ = style.set_property("right", "auto");
    }

    fn refresh_regions(&mut self) {
        let mut regions = vec![(client_rect(&self.ui.handle), Region::DragHandle)];
        for (field, input) in &self.ui.fields {
            regions.push((client_rect(input), Region::Field(*field)));
        }
        self.gestures.set_regions(regions);
    }

    fn teardown(&mut self) {
        self.controller.request_stop();
        self.controller.cancel_countdown();
        self.controller.ticks_mut().cancel_all();
        let released = self.listeners.release();
        self.ui.root.remove();
        self.ui.style.remove();
        self.installed = false;
        debug!(listeners = released, "panel torn down");
    }
}

impl Installed for App {
    fn is_installed(&self) -> bool {
        self.installed
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if self.installed {
            self.teardown();
        }
    }
}

/// Handle to an installed scroll panel.
#[wasm_bindgen]
pub struct AutoScroll {
    app: Shared,
}

#[wasm_bindgen]
impl AutoScroll {
    /// Same as the keyboard shortcut.
    pub fn toggle(&self) {
        let _ = with_app(&self.app, |app| {
            let outcome = app.controller.toggle();
            debug!(?outcome, "toggle from script");
            true
        });
    }

    /// Begin the countdown.
    ///
    /// Rejects when both distances are zero, when no timer can be scheduled,
    /// and when the call could not reach the panel (destroyed, or issued from
    /// inside one of its own callbacks).
    pub fn start(&self) -> Result<(), JsValue> {
        let mut outcome = Ok(());
        with_app(&self.app, |app| {
            outcome = app.controller.request_start().map(drop);
            true
        })
        .map_err(to_js)?;
        outcome.map_err(to_js)
    }

    pub fn stop(&self) {
        let _ = with_app(&self.app, |app| app.controller.request_stop());
    }

    /// `"idle"`, `"counting_down"` or `"running"`.
    pub fn state(&self) -> String {
        self.app
            .try_borrow()
            .map(|app| app.controller.state().as_str().to_owned())
            .unwrap_or_default()
    }

    /// Stop everything and remove the panel from the page.
    pub fn destroy(&self) {
        match lifecycle::enter(&self.app, App::teardown) {
            Ok(()) => info!("scroll panel removed"),
            Err(Unavailable::Removed) => {}
            Err(Unavailable::Busy) => warn!("destroy called re-entrantly; ignored"),
        }
    }
}

/// Build the panel and bind it to the page.
///
/// Returns `None` if an element with the panel id already exists. The panel
/// lives until `destroy()` is called or the returned handle is freed.
#[wasm_bindgen]
pub fn install(options_json: &str) -> Result<Option<AutoScroll>, JsValue> {
    console_error_panic_hook::set_once();
    // A second install under another id keeps the first subscriber.
    let _ = tracing_wasm::try_set_as_global_default();

    let options = PanelOptions::from_json(options_json).map_err(to_js)?;
    let shortcut = options.parsed_shortcut().map_err(to_js)?;
    let window = web_sys::window().ok_or_else(|| missing("window"))?;
    let document = window.document().ok_or_else(|| missing("document"))?;

    if document.get_element_by_id(&options.panel_id).is_some() {
        debug!(panel_id = %options.panel_id, "panel already installed");
        return Ok(None);
    }

    let ids = PanelIds::new(options.panel_id.as_str());
    let config = options.scroll_config();
    let ui = build_panel(&document, &ids, &options, &config, &shortcut)?;
    let manual_step = options.manual_step_px;

    let app: Shared = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
        let weak = weak.clone();
        let sink: TimerSink = Rc::new(move |id: TimerId| {
            if let Some(app) = weak.upgrade() {
                let _ = with_app(&app, |app| {
                    app.controller.on_timer(id);
                    true
                });
            }
        });
        let controller = ScrollController::new(
            config,
            WindowTicks::new(window.clone(), sink),
            WindowViewport::new(window.clone()),
        )
        .with_manual_step(manual_step);
        RefCell::new(App {
            controller,
            ui,
            shortcut,
            drag: PanelDrag::new(),
            gestures: GestureRouter::new(),
            listeners: Attachments::new(),
            installed: true,
        })
    });

    bind_controls(&app);
    bind_keyboard(&app, &document);
    bind_mouse_drag(&app, &document);
    bind_touch(&app);
    {
        let app = app.borrow();
        app.render();
        app.render_config();
    }

    info!(panel_id = %ids.root(), %shortcut, "scroll panel installed");
    Ok(Some(AutoScroll { app }))
}

// ============================================================================
// DOM construction
// ============================================================================

fn build_panel(
    document: &Document,
    ids: &PanelIds,
    options: &PanelOptions,
    config: &ScrollConfig,
    shortcut: &Shortcut,
) -> Result<PanelUi, JsValue> {
    let style = document.create_element("style")?;
    style.set_text_content(Some(&markup::panel_css(ids, &options.position)));
    document
        .head()
        .ok_or_else(|| missing("head"))?
        .append_child(&style)?;

    let root: HtmlElement = document.create_element("div")?.unchecked_into();
    root.set_id(ids.root());
    root.set_inner_html(&markup::panel_html(
        ids,
        config,
        shortcut,
        options.manual_step_px,
    ));
    document
        .body()
        .ok_or_else(|| missing("body"))?
        .append_child(&root)?;

    let fields = ConfigField::ALL
        .into_iter()
        .map(|field| Ok((field, lookup(document, ids, PanelPart::Field(field))?)))
        .collect::<Result<Vec<_>, JsValue>>()?;
    let directions = Axis::ALL
        .into_iter()
        .map(|axis| Ok((axis, lookup(document, ids, PanelPart::Direction(axis))?)))
        .collect::<Result<Vec<_>, JsValue>>()?;
    let mut manual = Vec::with_capacity(PanelPart::MANUAL.len());
    for part in PanelPart::MANUAL {
        if let PanelPart::Manual(axis, direction) = part {
            manual.push((axis, direction, lookup(document, ids, part)?));
        }
    }

    Ok(PanelUi {
        handle: lookup(document, ids, PanelPart::Handle)?,
        countdown: lookup(document, ids, PanelPart::Countdown)?,
        message: lookup(document, ids, PanelPart::Message)?,
        start: lookup(document, ids, PanelPart::Start)?,
        stop: lookup(document, ids, PanelPart::Stop)?,
        style,
        root,
        fields,
        directions,
        manual,
    })
}

fn lookup<T: JsCast>(document: &Document, ids: &PanelIds, part: PanelPart) -> Result<T, JsValue> {
    let id = ids.id(part);
    document
        .get_element_by_id(&id)
        .ok_or_else(|| missing(&id))?
        .dyn_into::<T>()
        .map_err(|_| to_js(format_args!("#{id} has an unexpected element type")))
}

fn missing(what: &str) -> JsValue {
    js_sys::Error::new(&format!("missing {what}")).into()
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn client_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

// ============================================================================
// Event binding
// ============================================================================

/// Run `f` against the app, then drain events and re-render if it returns
/// `true`. Calls that arrive while the app is borrowed are dropped.
fn with_app(app: &Shared, f: impl FnOnce(&mut App) -> bool) -> Result<(), Unavailable> {
    let result = lifecycle::enter(app, |app| {
        if f(app) {
            app.finish();
        }
    });
    if result == Err(Unavailable::Busy) {
        warn!("re-entrant callback dropped");
    }
    result
}

/// Register `handler` on `target`. The listener only holds a weak reference
/// to the app and is removed again when the app releases its listeners.
fn listen<F>(target: &EventTarget, kind: &'static str, app: &Shared, mut handler: F)
where
    F: FnMut(&mut App, &Event) -> bool + 'static,
{
    let weak = Rc::downgrade(app);
    // Not passive: the shortcut and touch adjustments call `preventDefault`.
    let options = EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    };
    let listener = EventListener::new_with_options(target, kind, options, move |event: &Event| {
        if let Some(app) = weak.upgrade() {
            let _ = with_app(&app, |app| handler(app, event));
        }
    });
    app.borrow_mut().listeners.attach(listener);
}

fn bind_controls(app: &Shared) {
    let (start, stop, fields, directions, manual) = {
        let app = app.borrow();
        let ui = &app.ui;
        (
            ui.start.clone(),
            ui.stop.clone(),
            ui.fields.clone(),
            ui.directions.clone(),
            ui.manual.clone(),
        )
    };

    listen(&start, "click", app, |app, _| {
        // Rejections are already on the panel.
        let _ = app.controller.request_start();
        true
    });
    listen(&stop, "click", app, |app, _| app.controller.request_stop());

    for (field, input) in fields {
        let source = input.clone();
        listen(&input, "change", app, move |app, _| {
            app.controller.apply_input(field, &source.value());
            app.render_config();
            true
        });
    }

    for (axis, select) in directions {
        let source = select.clone();
        listen(&select, "change", app, move |app, _| {
            let raw = source.value();
            match Direction::parse(&raw) {
                Some(direction) => app.controller.set_direction(axis, direction),
                None => warn!(axis = axis.as_str(), %raw, "unknown direction"),
            }
            app.render_config();
            true
        });
    }

    for (axis, direction, button) in manual {
        listen(&button, "click", app, move |app, _| {
            app.controller.manual_scroll(axis, direction);
            true
        });
    }
}

fn bind_keyboard(app: &Shared, document: &Document) {
    listen(document, "keydown", app, |app, event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return false;
        };
        let mods = Modifiers::from_dom(
            event.ctrl_key(),
            event.alt_key(),
            event.shift_key(),
            event.meta_key(),
        );
        let input = KeyInput::from_dom(&event.key(), &event.code(), mods, false);
        if !app.shortcut.matches(&input) {
            return false;
        }
        // Swallow the browser's own binding (Ctrl+S saves the page), repeats included.
        event.prevent_default();
        if event.repeat() {
            return false;
        }
        let outcome = app.controller.toggle();
        debug!(?outcome, "shortcut");
        true
    })
}

fn is_form_control(target: Option<EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|el| {
            matches!(
                el.tag_name().as_str(),
                "INPUT" | "BUTTON" | "SELECT" | "OPTION" | "LABEL"
            )
        })
}

fn bind_mouse_drag(app: &Shared, document: &Document) {
    let root = app.borrow().ui.root.clone();

    listen(&root, "mousedown", app, |app, event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return false;
        };
        if is_form_control(event.target()) {
            return false;
        }
        let pointer = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
        let origin = app.panel_origin();
        app.drag.begin(pointer, origin);
        let _ = app.ui.root.class_list().add_1(DRAGGING_CLASS);
        false
    });

    listen(document, "mousemove", app, |app, event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return false;
        };
        let pointer = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
        if let Some(origin) = app.drag.move_to(pointer) {
            app.place_panel(origin);
        }
        false
    });

    listen(document, "mouseup", app, |app, _| {
        if app.drag.end() {
            let _ = app.ui.root.class_list().remove_1(DRAGGING_CLASS);
        }
        false
    })
}

fn first_touch(event: &TouchEvent) -> Option<Point> {
    let touch = event.touches().get(0)?;
    Some(Point::new(
        f64::from(touch.client_x()),
        f64::from(touch.client_y()),
    ))
}

fn bind_touch(app: &Shared) {
    let root = app.borrow().ui.root.clone();

    listen(&root, "touchstart", app, |app, event| {
        let Some(point) = event.dyn_ref::<TouchEvent>().and_then(first_touch) else {
            return false;
        };
        app.refresh_regions();
        if app.gestures.touch_start(point) == Some(Region::DragHandle) {
            let origin = app.panel_origin();
            app.drag.begin(point, origin);
        }
        false
    });

    listen(&root, "touchmove", app, |app, event| {
        let Some(touch) = event.dyn_ref::<TouchEvent>() else {
            return false;
        };
        let Some(point) = first_touch(touch) else {
            return false;
        };
        match app.gestures.touch_move(point) {
            GestureAction::None => false,
            GestureAction::Drag(pointer) => {
                event.prevent_default();
                if let Some(origin) = app.drag.move_to(pointer) {
                    app.place_panel(origin);
                }
                false
            }
            GestureAction::Adjust { field, steps } => {
                event.prevent_default();
                app.controller.adjust(field, steps);
                app.render_config();
                true
            }
        }
    });

    for kind in ["touchend", "touchcancel"] {
        listen(&root, kind, app, |app, _| {
            app.gestures.touch_end();
            app.drag.end();
            false
        });
    }
}
