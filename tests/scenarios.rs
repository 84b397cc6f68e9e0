//! End to end scenarios driving the window manager with synthetic X events.
//!
//! Each test builds a manager over a recording stub connection, feeds it the
//! event stream a real server would produce and asserts on the resulting
//! state and the requests that reached the "server".
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};
use tessella::{
    core::bindings::{KeyBindings, MouseBindings},
    pure::geometry::{Point, Rect},
    x::{
        event::{ConfigureEvent, CrossingEvent, PropertyEvent, StateChangeEvent},
        mock::StubXConn,
        Atom, WindowAttributes, XEvent,
    },
    Config, Result, WindowManager, Xid,
};

fn xid(n: u32) -> Xid {
    Xid::from(n)
}

#[derive(Default)]
struct TestConn {
    screens: RefCell<Vec<Rect>>,
    pointer: RefCell<Point>,
    requested: RefCell<HashMap<Xid, Rect>>,
    urgent: RefCell<HashSet<Xid>>,
    fullscreen_props: RefCell<Vec<(Xid, bool)>>,
    focus_calls: RefCell<Vec<Xid>>,
    next_bar: RefCell<u32>,
}

impl TestConn {
    fn new(screens: &[Rect]) -> Self {
        Self {
            screens: RefCell::new(screens.to_vec()),
            next_bar: RefCell::new(9000),
            ..Self::default()
        }
    }
}

impl StubXConn for TestConn {
    fn stub_screen_details(&self) -> Result<Vec<Rect>> {
        Ok(self.screens.borrow().clone())
    }

    fn stub_cursor_position(&self) -> Result<Point> {
        Ok(*self.pointer.borrow())
    }

    fn stub_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        let rect = self
            .requested
            .borrow()
            .get(&client)
            .copied()
            .unwrap_or(Rect::new(0, 0, 400, 300));

        Ok(WindowAttributes::new(rect, 0))
    }

    fn stub_urgency_hint(&self, client: Xid) -> Result<bool> {
        Ok(self.urgent.borrow().contains(&client))
    }

    fn stub_clear_urgency_hint(&self, client: Xid) -> Result<()> {
        self.urgent.borrow_mut().remove(&client);
        Ok(())
    }

    fn stub_set_fullscreen_prop(&self, client: Xid, fullscreen: bool) -> Result<()> {
        self.fullscreen_props.borrow_mut().push((client, fullscreen));
        Ok(())
    }

    fn stub_set_input_focus(&self, win: Xid) -> Result<()> {
        self.focus_calls.borrow_mut().push(win);
        Ok(())
    }

    fn stub_create_bar_window(&self, _: Rect) -> Result<Xid> {
        let mut n = self.next_bar.borrow_mut();
        *n += 1;
        Ok(xid(*n))
    }
}

const SCREEN: Rect = Rect::new(0, 0, 1920, 1080);

fn test_wm(screens: &[Rect]) -> WindowManager<TestConn> {
    let mut config = Config::default();
    config.show_bar = false;
    config.border_px = 1;
    config.mfact = 0.55;

    WindowManager::new(
        config,
        KeyBindings::new(),
        MouseBindings::new(),
        TestConn::new(screens),
    )
    .unwrap()
}

fn rect_of(wm: &WindowManager<TestConn>, id: u32) -> Rect {
    wm.state().client_set.client(xid(id)).unwrap().rect()
}

fn outer_of(wm: &WindowManager<TestConn>, id: u32) -> (i32, i32, u32, u32) {
    let c = wm.state().client_set.client(xid(id)).unwrap();
    let r = c.rect();

    (r.x, r.y, c.outer_w(), c.outer_h())
}

#[test]
fn single_client_fills_the_work_area() {
    let mut wm = test_wm(&[SCREEN]);

    wm.handle_event(XEvent::MapRequest(xid(10))).unwrap();

    assert_eq!(rect_of(&wm, 10), Rect::new(0, 0, 1918, 1078));
    assert_eq!(wm.state().client_set.monitors()[0].layout_symbol(), "[]=");
    assert_eq!(wm.state().client_set.focused_client(), Some(xid(10)));
}

#[test]
fn second_client_stacks_to_the_right() {
    let mut wm = test_wm(&[SCREEN]);

    wm.handle_event(XEvent::MapRequest(xid(10))).unwrap();
    wm.handle_event(XEvent::MapRequest(xid(11))).unwrap();

    // the first client keeps the master column at mfact of the work area
    assert_eq!(rect_of(&wm, 10), Rect::new(0, 0, 1054, 1078));
    assert_eq!(rect_of(&wm, 11), Rect::new(1056, 0, 862, 1078));
}

#[test]
fn stack_heights_split_the_work_area() {
    let mut wm = test_wm(&[SCREEN]);

    for id in [10, 11, 12] {
        wm.handle_event(XEvent::MapRequest(xid(id))).unwrap();
    }

    assert_eq!(rect_of(&wm, 10), Rect::new(0, 0, 1054, 1078));

    let (x1, y1, w1, h1) = outer_of(&wm, 11);
    let (x2, y2, w2, h2) = outer_of(&wm, 12);
    assert_eq!((x1, y1, w1, h1), (1056, 0, 864, 540));
    assert_eq!((x2, y2, w2, h2), (1056, 540, 864, 540));
}

#[test]
fn odd_heights_give_the_remainder_to_the_top() {
    // an 1081px tall screen leaves one spare row for the upper stack slot
    let mut wm = test_wm(&[Rect::new(0, 0, 1920, 1081)]);

    for id in [10, 11, 12] {
        wm.handle_event(XEvent::MapRequest(xid(id))).unwrap();
    }

    let (_, _, _, h1) = outer_of(&wm, 11);
    let (_, y2, _, h2) = outer_of(&wm, 12);
    assert_eq!(h1, 541);
    assert_eq!((y2, h2), (541, 540));
}

#[test]
fn urgency_is_tracked_and_cleared_by_focus() {
    let mut wm = test_wm(&[SCREEN]);
    wm.handle_event(XEvent::MapRequest(xid(10))).unwrap();
    wm.handle_event(XEvent::MapRequest(xid(11))).unwrap();
    // focus the other client so 11 is not selected
    wm.handle_event(XEvent::Enter(CrossingEvent {
        id: xid(10),
        is_root: false,
        normal: true,
    }))
    .unwrap();

    wm.x_conn().urgent.borrow_mut().insert(xid(11));
    wm.handle_event(XEvent::PropertyNotify(PropertyEvent {
        id: xid(11),
        atom: Atom::WmHints,
        is_root: false,
        deleted: false,
    }))
    .unwrap();

    assert!(wm.state().client_set.client(xid(11)).unwrap().is_urgent());
    assert!(wm.state().client_set.view_has_urgent(0, 0));

    // focusing the urgent client clears the flag locally and on the server
    wm.handle_event(XEvent::Enter(CrossingEvent {
        id: xid(11),
        is_root: false,
        normal: true,
    }))
    .unwrap();

    assert!(!wm.state().client_set.client(xid(11)).unwrap().is_urgent());
    assert!(!wm.x_conn().urgent.borrow().contains(&xid(11)));
}

#[test]
fn fullscreen_round_trips_exactly() {
    let mut wm = test_wm(&[SCREEN]);
    for id in [10, 11, 12] {
        wm.handle_event(XEvent::MapRequest(xid(id))).unwrap();
    }
    let before = rect_of(&wm, 10);
    assert_eq!(before, Rect::new(0, 0, 1054, 1078));

    wm.handle_event(XEvent::ClientMessage(StateChangeEvent {
        id: xid(10),
        fullscreen: true,
    }))
    .unwrap();

    {
        let c = wm.state().client_set.client(xid(10)).unwrap();
        assert_eq!(c.rect(), SCREEN);
        assert_eq!(c.border_width(), 0);
        assert!(c.is_floating());
        assert!(c.is_fullscreen());
    }
    assert!(wm
        .x_conn()
        .fullscreen_props
        .borrow()
        .contains(&(xid(10), true)));

    // a second ADD must not clobber the saved geometry
    wm.handle_event(XEvent::ClientMessage(StateChangeEvent {
        id: xid(10),
        fullscreen: true,
    }))
    .unwrap();

    wm.handle_event(XEvent::ClientMessage(StateChangeEvent {
        id: xid(10),
        fullscreen: false,
    }))
    .unwrap();

    let c = wm.state().client_set.client(xid(10)).unwrap();
    assert_eq!(c.rect(), before);
    assert_eq!(c.border_width(), 1);
    assert!(!c.is_floating());
    assert!(!c.is_fullscreen());
}

#[test]
fn losing_a_monitor_rehomes_its_clients() {
    let screens = [SCREEN, Rect::new(1920, 0, 1920, 1080)];
    let mut wm = test_wm(&screens);

    // one client on each monitor: move the pointer to the second monitor
    // so that the root crossing selects it before the second map
    wm.handle_event(XEvent::MapRequest(xid(10))).unwrap();
    *wm.x_conn().pointer.borrow_mut() = Point::new(2000, 10);
    wm.handle_event(XEvent::Enter(CrossingEvent {
        id: xid(1),
        is_root: true,
        normal: false,
    }))
    .unwrap();
    wm.handle_event(XEvent::MapRequest(xid(11))).unwrap();
    assert_eq!(wm.state().client_set.monitor_of(xid(11)), Some(1));

    // Xinerama now reports a single screen
    wm.x_conn().screens.borrow_mut().truncate(1);
    wm.handle_event(XEvent::ConfigureNotify(ConfigureEvent {
        id: xid(1),
        rect: SCREEN,
        is_root: true,
    }))
    .unwrap();

    let cs = &wm.state().client_set;
    assert_eq!(cs.monitors().len(), 1);
    assert_eq!(cs.selected_monitor_index(), 0);
    assert_eq!(cs.monitor_of(xid(11)), Some(0));
    // the rehomed client attaches at the head of the first monitor's list
    assert_eq!(
        cs.monitors()[0].view(0).clients(),
        &[xid(11), xid(10)]
    );
}

#[test]
fn float_toggle_restores_the_floating_geometry() {
    use tessella::{
        core::{
            actions::toggle_floating,
            bindings::{KeyCode, ModMask},
        },
        x::event::ConfigureRequestEvent,
    };

    let toggle = KeyCode {
        mask: ModMask::MOD4,
        code: 65,
    };
    let mut keys = KeyBindings::new();
    keys.insert(toggle, toggle_floating());

    let mut config = Config::default();
    config.show_bar = false;
    config.border_px = 1;
    let mut wm = WindowManager::new(
        config,
        keys,
        MouseBindings::new(),
        TestConn::new(&[SCREEN]),
    )
    .unwrap();

    wm.handle_event(XEvent::MapRequest(xid(10))).unwrap();
    wm.handle_event(XEvent::MapRequest(xid(11))).unwrap();

    // float the focused client, then let it pick its own position
    wm.handle_event(XEvent::KeyPress(toggle)).unwrap();
    assert!(wm.state().client_set.client(xid(11)).unwrap().is_floating());
    wm.handle_event(XEvent::ConfigureRequest(ConfigureRequestEvent {
        id: xid(11),
        x: Some(100),
        y: Some(100),
        w: Some(300),
        h: Some(200),
        ..ConfigureRequestEvent::default()
    }))
    .unwrap();
    assert_eq!(rect_of(&wm, 11), Rect::new(100, 100, 300, 200));

    // tiling it again assigns a layout slot
    wm.handle_event(XEvent::KeyPress(toggle)).unwrap();
    assert!(!wm.state().client_set.client(xid(11)).unwrap().is_floating());
    assert_eq!(rect_of(&wm, 11), Rect::new(1056, 0, 862, 1078));

    // floating once more restores the geometry from before the round trip
    wm.handle_event(XEvent::KeyPress(toggle)).unwrap();
    assert_eq!(rect_of(&wm, 11), Rect::new(100, 100, 300, 200));
}

#[test]
fn focus_stealing_clients_are_put_back_in_their_place() {
    let mut wm = test_wm(&[SCREEN]);
    wm.handle_event(XEvent::MapRequest(xid(10))).unwrap();

    wm.x_conn().focus_calls.borrow_mut().clear();
    wm.handle_event(XEvent::FocusIn(xid(99))).unwrap();

    assert_eq!(wm.x_conn().focus_calls.borrow().last(), Some(&xid(10)));
}

#[test]
fn key_bindings_dispatch_with_lock_modifiers_held() {
    use tessella::{
        core::{
            actions::set_layout,
            bindings::{KeyCode, ModMask},
        },
        pure::Layout,
    };

    let mut keys = KeyBindings::new();
    let code = KeyCode {
        mask: ModMask::MOD4,
        code: 58,
    };
    keys.insert(code, set_layout(Layout::Monocle));

    let mut config = Config::default();
    config.show_bar = false;
    config.border_px = 1;
    let mut wm = WindowManager::new(
        config,
        keys,
        MouseBindings::new(),
        TestConn::new(&[SCREEN]),
    )
    .unwrap();

    for id in [10, 11, 12] {
        wm.handle_event(XEvent::MapRequest(xid(id))).unwrap();
    }

    // NumLock and CapsLock held with the bound chord must still match
    wm.handle_event(XEvent::KeyPress(KeyCode {
        mask: ModMask::MOD4 | ModMask::MOD2 | ModMask::LOCK,
        code: 58,
    }))
    .unwrap();

    let m = &wm.state().client_set.monitors()[0];
    assert_eq!(m.selected_view().layout(), Layout::Monocle);
    // monocle shows the total client count as its symbol
    assert_eq!(m.layout_symbol(), "[3]");
    assert_eq!(rect_of(&wm, 12), Rect::new(0, 0, 1918, 1078));
}
