//! Core data structures and event handling for the window manager.
//!
//! The [WindowManager] owns the pure state, the X connection and the user
//! bindings, and drives everything from the event loop in
//! [run][WindowManager::run]. Individual event handlers are free functions
//! over `(&mut State, &X)` so that gestures and actions can re-enter them.
use crate::{
    bar,
    config::{ColorScheme, Config},
    core::bindings::{
        client_button_specs, ButtonSpec, ClickContext, ClickRegion, KeyBindings, KeyCode,
        MouseBindings,
    },
    pure::{
        client::Client,
        client_set::ResizeContext,
        geometry::{Point, Rect},
        ClientSet,
    },
    x::{
        event::{
            ButtonEvent, ConfigureEvent, ConfigureRequestEvent, CrossingEvent, ExposeEvent,
            PropertyEvent, StateChangeEvent,
        },
        Atom, WmState, XConn, XEvent,
    },
    Result, Xid,
};
use nix::sys::signal::{signal, SigHandler, Signal};
use tracing::{debug, error, info, trace};

pub mod actions;
pub mod bindings;
pub mod mouse;
pub mod screens;

/// Mutable state for the window manager.
#[derive(Debug)]
pub struct State {
    /// The static configuration the manager was started with
    pub config: Config,
    /// The pure client / view / monitor state
    pub client_set: ClientSet,
    pub(crate) norm_scheme: ColorScheme,
    pub(crate) sel_scheme: ColorScheme,
    pub(crate) status: String,
    pub(crate) bar_h: u32,
    pub(crate) display: Rect,
    pub(crate) running: bool,
    pub(crate) button_specs: Vec<ButtonSpec>,
}

impl State {
    /// The current status bar text
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The bar height in use
    pub fn bar_height(&self) -> u32 {
        self.bar_h
    }

    pub(crate) fn resize_ctx(&self) -> ResizeContext {
        ResizeContext {
            display: self.display,
            bar_h: self.bar_h,
            honor_hints: self.config.resize_hints,
        }
    }
}

/// A tiling window manager in the spirit of dwm.
pub struct WindowManager<X: XConn> {
    state: State,
    x: X,
    key_bindings: KeyBindings<X>,
    mouse_bindings: MouseBindings<X>,
}

impl<X: XConn> std::fmt::Debug for WindowManager<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<X: XConn> WindowManager<X> {
    /// Construct a window manager over the given connection.
    ///
    /// Fails on invalid configuration, unparsable colors or a display with
    /// no usable screens; the caller reports the error and exits nonzero.
    pub fn new(
        config: Config,
        key_bindings: KeyBindings<X>,
        mouse_bindings: MouseBindings<X>,
        x: X,
    ) -> Result<Self> {
        config.validate()?;
        let (norm_scheme, sel_scheme) = config.color_schemes()?;

        // Spawned programs become children of the manager process; letting
        // the kernel reap them keeps the event loop signal-free.
        if let Err(errno) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
            error!(%errno, "unable to set SIGCHLD handling");
        }

        let bar_h = x.bar_height();
        let display = x.display_rect();
        let client_set = ClientSet::new(x.screen_details()?, &config, bar_h)?;
        let button_specs = client_button_specs(&mouse_bindings);

        let state = State {
            status: format!("tessella-{}", env!("CARGO_PKG_VERSION")),
            config,
            client_set,
            norm_scheme,
            sel_scheme,
            bar_h,
            display,
            running: true,
            button_specs,
        };

        Ok(Self {
            state,
            x,
            key_bindings,
            mouse_bindings,
        })
    }

    /// Read access to the current window manager state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Read access to the underlying X connection
    pub fn x_conn(&self) -> &X {
        &self.x
    }

    /// Grab bindings, adopt existing windows and serve X events until the
    /// quit action clears the running flag.
    pub fn run(&mut self) -> Result<()> {
        info!("initialising bars and bindings");
        self.setup()?;

        info!("entering main event loop");
        while self.state.running {
            let event = self.x.next_event()?;
            trace!(%event, "received event");
            if let Err(error) = self.handle_event(event) {
                error!(%error, "error handling event");
            }
            self.x.flush();
        }

        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let Self {
            state,
            x,
            key_bindings,
            ..
        } = self;

        screens::update_bars(state, x)?;
        update_status(state, x)?;

        let codes: Vec<KeyCode> = key_bindings.keys().copied().collect();
        x.grab_keys(&codes)?;

        scan(state, x)?;
        arrange(state, x, None)
    }

    /// Process a single event against the current state.
    ///
    /// Exposed so that synthetic event streams can drive the manager in
    /// tests.
    pub fn handle_event(&mut self, event: XEvent) -> Result<()> {
        let Self {
            state,
            x,
            key_bindings,
            mouse_bindings,
        } = self;

        use XEvent::*;
        match event {
            ButtonPress(e) => handle_button_press(state, x, mouse_bindings, e),
            ClientMessage(e) => handle_client_message(state, x, e),
            ConfigureNotify(e) => handle_configure_notify(state, x, e),
            ConfigureRequest(e) => handle_configure_request(state, x, &e),
            Destroy(id) => handle_destroy(state, x, id),
            Enter(e) => handle_enter(state, x, e),
            Expose(e) => handle_expose(state, x, e),
            FocusIn(id) => handle_focus_in(state, x, id),
            KeyPress(key) => {
                let key = key.clean(x.numlock_mask());
                if let Some(action) = key_bindings.get_mut(&key) {
                    action(state, x)
                } else {
                    Ok(())
                }
            }
            MappingNotify => handle_mapping_notify(state, x, key_bindings),
            MapRequest(id) => handle_map_request(state, x, id),
            PropertyNotify(e) => handle_property_notify(state, x, e),
            UnmapNotify(id) => handle_unmap_notify(state, x, id),
            // gestures consume these from their own inner loops
            ButtonRelease | MotionNotify(_) => Ok(()),
        }
    }
}

// event handlers

pub(crate) fn handle_button_press<X: XConn>(
    state: &mut State,
    x: &X,
    bindings: &mut MouseBindings<X>,
    ev: ButtonEvent,
) -> Result<()> {
    // clicking a monitor focuses it
    let mon = win_to_monitor(state, x, ev.id)?;
    if mon != state.client_set.selected_monitor_index() {
        if let Some(sel) = state.client_set.focused_client() {
            unfocus(state, x, sel, true)?;
        }
        state.client_set.set_selected_monitor(mon);
        focus(state, x, None)?;
    }

    let (region, tag) = {
        let cs = &state.client_set;
        if ev.id == cs.selected_monitor().bar_win() {
            bar::click_region(
                cs,
                &state.config,
                &state.status,
                cs.selected_monitor_index(),
                ev.wpt.x.max(0) as u32,
                x,
            )
        } else if cs.contains(ev.id) {
            (ClickRegion::ClientWin, None)
        } else {
            (ClickRegion::RootWin, None)
        }
    };
    if region == ClickRegion::ClientWin {
        focus(state, x, Some(ev.id))?;
    }

    let key = (region, ev.state.clean(x.numlock_mask()), ev.button);
    if let Some(action) = bindings.get_mut(&key) {
        debug!(?region, ?tag, button = ev.button, "running mouse binding");
        let ctx = ClickContext {
            region,
            tag,
            event: ev,
        };
        action(state, x, &ctx)?;
    }

    Ok(())
}

pub(crate) fn handle_client_message<X: XConn>(
    state: &mut State,
    x: &X,
    ev: StateChangeEvent,
) -> Result<()> {
    if !state.client_set.contains(ev.id) {
        return Ok(());
    }

    if ev.fullscreen {
        set_fullscreen(state, x, ev.id)
    } else {
        exit_fullscreen(state, x, ev.id)
    }
}

pub(crate) fn handle_configure_notify<X: XConn>(
    state: &mut State,
    x: &X,
    ev: ConfigureEvent,
) -> Result<()> {
    if !ev.is_root {
        return Ok(());
    }

    state.display = Rect::new(0, 0, ev.rect.w, ev.rect.h);
    if screens::update_monitors(state, x)? {
        info!("monitor layout changed, re-arranging");
        arrange(state, x, None)?;
    }

    Ok(())
}

pub(crate) fn handle_configure_request<X: XConn>(
    state: &mut State,
    x: &X,
    ev: &ConfigureRequestEvent,
) -> Result<()> {
    if !state.client_set.contains(ev.id) {
        x.configure_unmanaged(ev)?;
        return x.sync();
    }

    let cs = &mut state.client_set;
    let mon = cs.monitor_of(ev.id).expect("client is managed");
    let (screen, arranges, visible) = {
        let m = &cs.monitors()[mon];
        (
            m.screen(),
            m.selected_view().layout().arranges(),
            m.selected_view().contains(ev.id),
        )
    };

    if let Some(bw) = ev.border_width {
        cs.client_mut(ev.id).expect("client is managed").bw = bw;
    } else if !arranges || cs.client(ev.id).expect("client is managed").is_floating() {
        let c = cs.client_mut(ev.id).expect("client is managed");
        let floating = c.is_floating;
        // requested coordinates are interpreted relative to the monitor
        if let Some(cx) = ev.x {
            c.rect.x = screen.x + cx;
        }
        if let Some(cy) = ev.y {
            c.rect.y = screen.y + cy;
        }
        if let Some(w) = ev.w {
            c.rect.w = w;
        }
        if let Some(h) = ev.h {
            c.rect.h = h;
        }
        if c.rect.right() > screen.right() && floating {
            c.rect.x = screen.x + (screen.w as i32 / 2 - c.rect.w as i32 / 2);
        }
        if c.rect.bottom() > screen.bottom() && floating {
            c.rect.y = screen.y + (screen.h as i32 / 2 - c.rect.h as i32 / 2);
        }

        let moved_only = (ev.x.is_some() || ev.y.is_some()) && ev.w.is_none() && ev.h.is_none();
        let (rect, bw) = (c.rect, c.bw);
        if moved_only {
            x.send_configure_notify(ev.id, rect, bw)?;
        }
        if visible {
            x.position_client(ev.id, rect, bw)?;
        }
    } else {
        // tiled clients get a synthetic notify restating current geometry
        let c = cs.client(ev.id).expect("client is managed");
        x.send_configure_notify(ev.id, c.rect(), c.border_width())?;
    }

    x.sync()
}

pub(crate) fn handle_destroy<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    if state.client_set.contains(id) {
        unmanage(state, x, id, true)?;
    }

    Ok(())
}

pub(crate) fn handle_unmap_notify<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    if state.client_set.contains(id) {
        unmanage(state, x, id, false)?;
    }

    Ok(())
}

pub(crate) fn handle_enter<X: XConn>(state: &mut State, x: &X, ev: CrossingEvent) -> Result<()> {
    if !(ev.is_root || ev.normal) {
        return Ok(());
    }

    let mon = win_to_monitor(state, x, ev.id)?;
    if mon != state.client_set.selected_monitor_index() {
        if let Some(sel) = state.client_set.focused_client() {
            unfocus(state, x, sel, true)?;
        }
        state.client_set.set_selected_monitor(mon);
    }

    let target = state.client_set.contains(ev.id).then_some(ev.id);
    focus(state, x, target)
}

pub(crate) fn handle_expose<X: XConn>(state: &mut State, x: &X, ev: ExposeEvent) -> Result<()> {
    if ev.count == 0 {
        if let Some(mon) = state.client_set.monitor_with_bar(ev.id) {
            draw_bar(state, x, mon)?;
        }
    }

    Ok(())
}

// Some clients acquire the input focus without asking; re-assert the
// selection we are tracking when that happens.
pub(crate) fn handle_focus_in<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    match state.client_set.focused_client() {
        Some(sel) if sel != id => x.set_input_focus(sel),
        _ => Ok(()),
    }
}

pub(crate) fn handle_mapping_notify<X: XConn>(
    _state: &mut State,
    x: &X,
    key_bindings: &mut KeyBindings<X>,
) -> Result<()> {
    x.refresh_keyboard_mapping()?;
    let codes: Vec<KeyCode> = key_bindings.keys().copied().collect();

    x.grab_keys(&codes)
}

pub(crate) fn handle_map_request<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    let attrs = x.window_attributes(id)?;
    if attrs.override_redirect || state.client_set.contains(id) {
        return Ok(());
    }

    manage(state, x, id)
}

pub(crate) fn handle_property_notify<X: XConn>(
    state: &mut State,
    x: &X,
    ev: PropertyEvent,
) -> Result<()> {
    if ev.is_root && ev.atom == Atom::WmName {
        return update_status(state, x);
    }
    if ev.deleted || !state.client_set.contains(ev.id) {
        return Ok(());
    }

    match ev.atom {
        Atom::WmTransientFor => {
            let already_floating = state
                .client_set
                .client(ev.id)
                .map(|c| c.is_floating)
                .unwrap_or(true);
            let parent = x.transient_for(ev.id)?;
            if !already_floating && parent.map(|p| state.client_set.contains(p)).unwrap_or(false) {
                let mon = {
                    let c = state.client_set.client_mut(ev.id).expect("checked above");
                    c.is_floating = true;
                    c.mon
                };
                arrange(state, x, Some(mon))?;
            }
        }
        Atom::WmNormalHints => {
            let hints = x.size_hints(ev.id)?;
            if let Some(c) = state.client_set.client_mut(ev.id) {
                c.hints = hints;
            }
        }
        Atom::WmHints => {
            update_wm_hints(state, x, ev.id)?;
            draw_bars(state, x)?;
        }
        _ => (),
    }

    if ev.atom == Atom::WmName || ev.atom == Atom::NetWmName {
        let title = x.window_title(ev.id)?;
        let (mon, is_view_focus) = {
            let c = state.client_set.client_mut(ev.id).expect("checked above");
            c.set_name(&title);
            let mon = c.mon;
            let view = c.view;
            (
                mon,
                state.client_set.monitors()[mon].view(view).focused() == Some(ev.id),
            )
        };
        if is_view_focus {
            draw_bar(state, x, mon)?;
        }
    }

    Ok(())
}

// state transitions shared by handlers and actions

/// Bring a window under management and make it the focus of its monitor.
pub(crate) fn manage<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    trace!(%id, "managing new client");
    let wa = x.window_attributes(id)?;
    let transient_parent = x.transient_for(id)?.filter(|t| state.client_set.contains(*t));

    let mon = transient_parent
        .and_then(|t| state.client_set.monitor_of(t))
        .unwrap_or_else(|| state.client_set.selected_monitor_index());
    let view = state.client_set.monitors()[mon].selected_view_index();

    let (screen, wa_rect, bar_y) = {
        let m = &state.client_set.monitors()[mon];
        (m.screen(), m.window_area(), m.bar_y())
    };
    let mut c = Client::new(id, wa.rect, state.config.border_px, mon, view);
    c.old_bw = wa.border_width;
    c.rect.x += wa_rect.x;
    c.rect.y += wa_rect.y;

    if c.rect.w == screen.w && c.rect.h == screen.h {
        // windows mapping at exactly the screen size start floating and
        // borderless at the screen origin
        c.is_floating = true;
        c.rect.x = screen.x;
        c.rect.y = screen.y;
        c.bw = 0;
    } else {
        if c.rect.x + c.outer_w() as i32 > screen.right() {
            c.rect.x = screen.right() - c.outer_w() as i32;
        }
        if c.rect.y + c.outer_h() as i32 > screen.bottom() {
            c.rect.y = screen.bottom() - c.outer_h() as i32;
        }
        c.rect.x = c.rect.x.max(screen.x);
        // only fix the y offset if the client center might cover a top bar
        let center_x = c.rect.x + c.rect.w as i32 / 2;
        let over_bar = bar_y == 0 && center_x >= wa_rect.x && center_x < wa_rect.right();
        c.rect.y = c.rect.y.max(if over_bar {
            state.bar_h as i32
        } else {
            screen.y
        });
    }

    let title = x.window_title(id)?;
    c.set_name(&title);
    c.hints = x.size_hints(id)?;
    if !c.is_floating {
        c.is_floating = transient_parent.is_some() || c.is_fixed();
    }

    x.set_border_width(id, c.bw)?;
    x.set_border_color(id, state.norm_scheme.border)?;
    x.send_configure_notify(id, c.rect, c.bw)?;
    x.select_client_events(id)?;
    x.grab_client_buttons(id, false, &state.button_specs)?;
    if c.is_floating {
        x.raise_client(id)?;
    }

    // park the window off to the side until the arrange positions it
    let parked = Point::new(c.rect.x + 2 * state.display.w as i32, c.rect.y);
    state.client_set.insert(c);
    x.move_client(id, parked)?;
    x.map_client(id)?;
    x.set_wm_state(id, WmState::Normal)?;

    arrange(state, x, Some(mon))
}

/// Drop a client from management, optionally restoring its pre-managed
/// state when the window itself still exists.
pub(crate) fn unmanage<X: XConn>(state: &mut State, x: &X, id: Xid, destroyed: bool) -> Result<()> {
    trace!(%id, destroyed, "unmanaging client");
    let c = match state.client_set.remove(id) {
        Some(c) => c,
        None => return Ok(()),
    };

    if !destroyed {
        x.release_client(id, c.old_bw)?;
    }

    focus(state, x, None)?;
    arrange(state, x, Some(c.mon))
}

/// Focus the given client, or the most recently focused client of the
/// selected view when `None`.
pub(crate) fn focus<X: XConn>(state: &mut State, x: &X, c: Option<Xid>) -> Result<()> {
    let target = c.or_else(|| state.client_set.focused_client());

    if let Some(current) = state.client_set.focused_client() {
        if Some(current) != target {
            unfocus(state, x, current, false)?;
        }
    }

    match target {
        Some(id) => {
            if let Some(mon) = state.client_set.monitor_of(id) {
                state.client_set.set_selected_monitor(mon);
            }
            if state.client_set.client(id).map(|c| c.is_urgent).unwrap_or(false) {
                clear_urgent(state, x, id)?;
            }
            state.client_set.promote_focus(id);
            x.grab_client_buttons(id, true, &state.button_specs)?;
            x.set_border_color(id, state.sel_scheme.border)?;
            x.set_input_focus(id)?;
        }
        None => x.set_input_focus(x.root())?,
    }

    draw_bars(state, x)
}

/// Return a client to the unfocused visual state, optionally handing the
/// input focus back to the root window.
pub(crate) fn unfocus<X: XConn>(state: &mut State, x: &X, id: Xid, set_focus: bool) -> Result<()> {
    x.grab_client_buttons(id, false, &state.button_specs)?;
    x.set_border_color(id, state.norm_scheme.border)?;
    if set_focus {
        x.set_input_focus(x.root())?;
    }

    Ok(())
}

/// Clear the urgency state both locally and on the server.
pub(crate) fn clear_urgent<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    if let Some(c) = state.client_set.client_mut(id) {
        c.is_urgent = false;
    }

    x.clear_urgency_hint(id)
}

/// Re-read WM_HINTS for a client. An urgency hint on the currently focused
/// client is cleared on the server instead of being recorded.
pub(crate) fn update_wm_hints<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    let urgent = x.urgency_hint(id)?;

    if urgent && state.client_set.focused_client() == Some(id) {
        x.clear_urgency_hint(id)?;
    } else if let Some(c) = state.client_set.client_mut(id) {
        c.is_urgent = urgent;
    }

    Ok(())
}

/// Re-show the selected view of each monitor, re-run its layout and fix the
/// focus and stacking order. `None` arranges every monitor.
pub(crate) fn arrange<X: XConn>(state: &mut State, x: &X, mon: Option<usize>) -> Result<()> {
    let targets: Vec<usize> = match mon {
        Some(m) => vec![m],
        None => (0..state.client_set.monitors().len()).collect(),
    };

    for &m in &targets {
        show_hide(state, x, m)?;
    }
    focus(state, x, None)?;
    for &m in &targets {
        let ctx = state.resize_ctx();
        let changed = state.client_set.arrange_monitor(m, &ctx);
        for id in changed {
            push_geometry(state, x, id)?;
        }
        restack(state, x, m)?;
    }

    Ok(())
}

/// Move the selected view's clients to their stored positions and park all
/// other views' clients off screen.
pub(crate) fn show_hide<X: XConn>(state: &mut State, x: &X, mon: usize) -> Result<()> {
    let arranges = state.client_set.monitors()[mon]
        .selected_view()
        .layout()
        .arranges();

    for id in state.client_set.visible_stack(mon) {
        let (pos, floating) = {
            let c = state.client_set.client(id).expect("client in view list");
            (Point::new(c.rect.x, c.rect.y), c.is_floating)
        };
        x.move_client(id, pos)?;
        if floating || !arranges {
            let rect = state.client_set.client(id).expect("checked above").rect;
            apply_resize(state, x, id, rect, false)?;
        }
    }

    for id in state.client_set.hidden_clients(mon) {
        let c = state.client_set.client(id).expect("client in view list");
        x.move_client(id, Point::new(-2 * c.outer_w() as i32, c.rect.y))?;
    }

    Ok(())
}

/// Redraw a monitor's bar and enforce the Z-order: focused floating clients
/// on top, tiled clients below the bar in focus-stack order.
pub(crate) fn restack<X: XConn>(state: &mut State, x: &X, mon: usize) -> Result<()> {
    draw_bar(state, x, mon)?;

    let (sel, arranges, bar_win) = {
        let m = &state.client_set.monitors()[mon];
        (
            m.focused(),
            m.selected_view().layout().arranges(),
            m.bar_win(),
        )
    };
    let sel = match sel {
        Some(sel) => sel,
        None => return Ok(()),
    };

    let floating = state
        .client_set
        .client(sel)
        .map(|c| c.is_floating)
        .unwrap_or(false);
    if floating || !arranges {
        x.raise_client(sel)?;
    }

    if arranges {
        let mut sibling = bar_win;
        for id in state.client_set.visible_stack(mon) {
            let is_floating = state
                .client_set
                .client(id)
                .map(|c| c.is_floating)
                .unwrap_or(false);
            if !is_floating {
                x.stack_below(id, sibling)?;
                sibling = id;
            }
        }
    }

    x.sync()?;
    // windows revealed by the restack must not steal the focus
    x.drain_enter_events()
}

/// Apply the size-hint aware resize path to a proposed rect, pushing the
/// result to the server only when the geometry actually changed.
pub(crate) fn apply_resize<X: XConn>(
    state: &mut State,
    x: &X,
    id: Xid,
    proposed: Rect,
    interact: bool,
) -> Result<()> {
    let ctx = state.resize_ctx();
    if state.client_set.resize_client(id, proposed, &ctx, interact) {
        push_geometry(state, x, id)?;
    }

    Ok(())
}

/// Force a client to the exact rect given, bypassing size hints (used for
/// fullscreen where the hint limits must not apply).
pub(crate) fn force_resize<X: XConn>(state: &mut State, x: &X, id: Xid, rect: Rect) -> Result<()> {
    if let Some(c) = state.client_set.client_mut(id) {
        c.rect = rect;
    }

    push_geometry(state, x, id)
}

pub(crate) fn push_geometry<X: XConn>(state: &State, x: &X, id: Xid) -> Result<()> {
    let c = match state.client_set.client(id) {
        Some(c) => c,
        None => return Ok(()),
    };

    x.position_client(id, c.rect, c.bw)?;
    x.send_configure_notify(id, c.rect, c.bw)?;
    x.sync()
}

/// Make a client fullscreen: borderless, floating and covering its whole
/// monitor. A second request while already fullscreen is a no-op.
pub(crate) fn set_fullscreen<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    let screen = {
        let c = match state.client_set.client(id) {
            Some(c) if !c.is_fullscreen() => c,
            _ => return Ok(()),
        };
        state.client_set.monitors()[c.mon].screen()
    };

    x.set_fullscreen_prop(id, true)?;
    {
        let c = state.client_set.client_mut(id).expect("checked above");
        c.saved_fullscreen = Some(crate::pure::client::FullscreenRestore {
            rect: c.rect,
            bw: c.bw,
            floating: c.is_floating,
        });
        c.is_floating = true;
        c.bw = 0;
    }

    force_resize(state, x, id, screen)?;
    x.raise_client(id)
}

/// Undo a fullscreen request, restoring the saved geometry, border and
/// floating state exactly.
pub(crate) fn exit_fullscreen<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    let (saved, mon) = match state.client_set.client_mut(id) {
        Some(c) => match c.saved_fullscreen.take() {
            Some(saved) => {
                c.is_floating = saved.floating;
                c.bw = saved.bw;
                (saved, c.mon)
            }
            None => return Ok(()),
        },
        None => return Ok(()),
    };

    x.set_fullscreen_prop(id, false)?;
    force_resize(state, x, id, saved.rect)?;

    arrange(state, x, Some(mon))
}

/// Hand a client over to another monitor's selected view.
pub(crate) fn send_to_monitor<X: XConn>(
    state: &mut State,
    x: &X,
    id: Xid,
    target: usize,
) -> Result<()> {
    if state.client_set.monitor_of(id) == Some(target) {
        return Ok(());
    }

    unfocus(state, x, id, true)?;
    state.client_set.move_to_monitor(id, target);
    focus(state, x, None)?;

    arrange(state, x, None)
}

// bar plumbing

pub(crate) fn draw_bar<X: XConn>(state: &State, x: &X, mon: usize) -> Result<()> {
    let m = &state.client_set.monitors()[mon];
    if m.bar_win() == Xid(0) {
        return Ok(());
    }

    let segments = bar::content(&state.client_set, &state.config, &state.status, mon, x);

    x.draw_bar(
        m.bar_win(),
        m.window_area().w,
        state.norm_scheme,
        state.sel_scheme,
        &segments,
    )
}

pub(crate) fn draw_bars<X: XConn>(state: &State, x: &X) -> Result<()> {
    for mon in 0..state.client_set.monitors().len() {
        draw_bar(state, x, mon)?;
    }

    Ok(())
}

/// Refresh the status text from the root window name, falling back to the
/// version banner when none is set.
pub(crate) fn update_status<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    state.status = x
        .text_prop(x.root(), Atom::WmName)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("tessella-{}", env!("CARGO_PKG_VERSION")));

    draw_bar(state, x, state.client_set.selected_monitor_index())
}

// lookups

/// Resolve the monitor a window belongs to: the pointer's monitor for the
/// root window, then bar windows, then managed clients.
pub(crate) fn win_to_monitor<X: XConn>(state: &State, x: &X, win: Xid) -> Result<usize> {
    if win == x.root() {
        let p = x.cursor_position()?;
        return Ok(state.client_set.monitor_at_point(p));
    }

    if let Some(mon) = state.client_set.monitor_with_bar(win) {
        return Ok(mon);
    }

    Ok(state
        .client_set
        .monitor_of(win)
        .unwrap_or_else(|| state.client_set.selected_monitor_index()))
}

/// Adopt windows that existed before the manager started: viewable or
/// iconified children of the root, transients last so their parents are
/// already managed.
pub(crate) fn scan<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    let ids = x.existing_clients()?;

    let mut transients = Vec::new();
    for &id in &ids {
        let wa = match x.window_attributes(id) {
            Ok(wa) => wa,
            Err(_) => continue,
        };
        if wa.override_redirect {
            continue;
        }
        if x.transient_for(id)?.is_some() {
            transients.push((id, wa));
            continue;
        }
        if wa.viewable || x.get_wm_state(id)? == Some(WmState::Iconic) {
            manage(state, x, id)?;
        }
    }

    for (id, wa) in transients {
        if !state.client_set.contains(id)
            && (wa.viewable || x.get_wm_state(id)? == Some(WmState::Iconic))
        {
            manage(state, x, id)?;
        }
    }

    info!(managed = state.client_set.len(), "scanned existing windows");

    Ok(())
}
