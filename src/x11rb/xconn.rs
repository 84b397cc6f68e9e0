//! API wrapper for talking to the X server using x11rb
use crate::{
    bar::{Marker, Segment},
    config::ColorScheme,
    core::bindings::{ButtonSpec, KeyCode, ModMask},
    pure::{
        geometry::{Point, Rect},
        SizeHints,
    },
    x::{
        event::{
            ButtonEvent, ConfigureEvent, ConfigureRequestEvent, CrossingEvent, ExposeEvent,
            PropertyEvent, StateChangeEvent, XEvent,
        },
        Atom, PointerShape, WindowAttributes, WmState, XConn, EWMH_SUPPORTED_ATOMS,
    },
    Color, Error, Result, Xid,
};
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
};
use strum::IntoEnumIterator;
use tracing::{debug, error, warn};
use x11rb::{
    connection::{Connection, RequestConnection},
    properties::{WmHints, WmSizeHints},
    protocol::{
        xinerama::{self, ConnectionExt as _},
        xproto::{
            AtomEnum, ButtonIndex, ChangeGCAux, ChangeWindowAttributesAux, Char2b,
            ClientMessageEvent, CloseDown, ConfigWindow, ConfigureNotifyEvent,
            ConfigureWindowAux, ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask,
            Fontable, Gcontext, GrabMode, GrabStatus, InputFocus, MapState, Mapping,
            ModMask as XModMask, NotifyDetail, NotifyMode, PropMode, Property, Rectangle,
            StackMode, Window, WindowClass, CONFIGURE_NOTIFY_EVENT,
        },
        ErrorKind, Event,
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
    COPY_DEPTH_FROM_PARENT, CURRENT_TIME, NONE,
};

// Cursor font glyph indices (X11/cursorfont.h)
const XC_LEFT_PTR: u16 = 68;
const XC_SIZING: u16 = 120;
const XC_FLEUR: u16 = 52;

const XK_NUM_LOCK: u32 = 0xff7f;

fn root_event_mask() -> EventMask {
    EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::BUTTON_PRESS
        | EventMask::ENTER_WINDOW
        | EventMask::LEAVE_WINDOW
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::PROPERTY_CHANGE
}

fn client_event_mask() -> EventMask {
    EventMask::ENTER_WINDOW
        | EventMask::FOCUS_CHANGE
        | EventMask::PROPERTY_CHANGE
        | EventMask::STRUCTURE_NOTIFY
}

fn button_mask() -> EventMask {
    EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE
}

fn mouse_mask() -> EventMask {
    button_mask() | EventMask::POINTER_MOTION
}

fn button_index(n: u8) -> ButtonIndex {
    match n {
        1 => ButtonIndex::M1,
        2 => ButtonIndex::M2,
        3 => ButtonIndex::M3,
        4 => ButtonIndex::M4,
        5 => ButtonIndex::M5,
        _ => ButtonIndex::ANY,
    }
}

struct Font {
    id: Fontable,
    ascent: i16,
    height: u32,
}

struct Cursors {
    normal: u32,
    moving: u32,
    sizing: u32,
}

/// Handles communication with an X server via the x11rb crate.
pub struct RustConn {
    conn: RustConnection,
    root: Window,
    depth: u8,
    display: Rect,
    atoms: HashMap<Atom, u32>,
    font: Font,
    gc: Gcontext,
    cursors: Cursors,
    numlock: Cell<ModMask>,
    // events pulled off the wire while selectively draining are replayed
    // from here before the socket is read again
    pending: RefCell<VecDeque<Event>>,
    char_widths: RefCell<HashMap<char, u32>>,
}

impl std::fmt::Debug for RustConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustConn")
            .field("root", &self.root)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

// Releases a server grab taken around a destructive critical section on all
// exit paths.
struct ServerGuard<'a> {
    conn: &'a RustConnection,
}

impl<'a> ServerGuard<'a> {
    fn grab(conn: &'a RustConnection) -> Result<Self> {
        conn.grab_server()?;

        Ok(Self { conn })
    }
}

impl Drop for ServerGuard<'_> {
    fn drop(&mut self) {
        let _ = self.conn.ungrab_server();
        let _ = self.conn.flush();
    }
}

impl RustConn {
    /// Connect to the X server and claim window manager rights on the root
    /// window.
    ///
    /// Fails with [Error::OtherWmRunning] when another client already holds
    /// substructure redirection on the root window.
    pub fn new(font_name: &str) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let depth = screen.root_depth;
        let display = Rect::new(
            0,
            0,
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        );

        // only one client may select substructure redirection on the root
        let redirect =
            ChangeWindowAttributesAux::new().event_mask(EventMask::SUBSTRUCTURE_REDIRECT);
        if let Err(e) = conn.change_window_attributes(root, &redirect)?.check() {
            debug!(?e, "substructure redirect refused");
            return Err(Error::OtherWmRunning);
        }

        // batch the atom intern round trips
        let cookies: Vec<_> = Atom::iter()
            .map(|a| Ok((a, conn.intern_atom(false, a.as_ref().as_bytes())?)))
            .collect::<Result<_>>()?;
        let atoms = cookies
            .into_iter()
            .map(|(a, c)| Ok((a, c.reply()?.atom)))
            .collect::<Result<HashMap<_, _>>>()?;

        let font = open_font(&conn, font_name)?;
        let gc = conn.generate_id()?;
        conn.create_gc(gc, root, &CreateGCAux::new().font(font.id))?;

        let cursors = create_cursors(&conn)?;

        let supported: Vec<u32> = EWMH_SUPPORTED_ATOMS
            .iter()
            .map(|a| atoms[a])
            .collect();
        conn.change_property32(
            PropMode::REPLACE,
            root,
            atoms[&Atom::NetSupported],
            AtomEnum::ATOM,
            &supported,
        )?;

        let full = ChangeWindowAttributesAux::new()
            .event_mask(root_event_mask())
            .cursor(cursors.normal);
        conn.change_window_attributes(root, &full)?.check()?;

        let numlock = Cell::new(ModMask::empty());
        let this = Self {
            conn,
            root,
            depth,
            display,
            atoms,
            font,
            gc,
            cursors,
            numlock,
            pending: RefCell::new(VecDeque::new()),
            char_widths: RefCell::new(HashMap::new()),
        };
        this.numlock.set(this.discover_numlock_mask());
        this.conn.flush()?;

        Ok(this)
    }

    fn known_atom(&self, atom: Atom) -> u32 {
        self.atoms[&atom]
    }

    fn atom_from_raw(&self, raw: u32) -> Option<Atom> {
        self.atoms
            .iter()
            .find(|(_, &v)| v == raw)
            .map(|(&a, _)| a)
    }

    fn discover_numlock_mask(&self) -> ModMask {
        let inner = || -> Result<ModMask> {
            let setup = self.conn.setup();
            let (min, max) = (setup.min_keycode, setup.max_keycode);
            let mapping = self
                .conn
                .get_keyboard_mapping(min, max - min + 1)?
                .reply()?;
            let per = std::cmp::max(mapping.keysyms_per_keycode as usize, 1);
            let numlock_codes: Vec<u8> = mapping
                .keysyms
                .chunks(per)
                .enumerate()
                .filter(|(_, syms)| syms.contains(&XK_NUM_LOCK))
                .map(|(i, _)| min + i as u8)
                .collect();

            let mods = self.conn.get_modifier_mapping()?.reply()?;
            let per_mod = std::cmp::max(mods.keycodes.len() / 8, 1);
            for (row, codes) in mods.keycodes.chunks(per_mod).enumerate() {
                if codes.iter().any(|c| numlock_codes.contains(c)) {
                    return Ok(ModMask::from_bits_truncate(1 << row));
                }
            }

            Ok(ModMask::empty())
        };

        match inner() {
            Ok(mask) => mask,
            Err(e) => {
                warn!(%e, "unable to probe the NumLock modifier");
                ModMask::empty()
            }
        }
    }

    // The four modifier combinations a binding must be grabbed under so
    // that CapsLock and NumLock do not mask it.
    fn lock_combinations(&self) -> [ModMask; 4] {
        let numlock = self.numlock.get();

        [
            ModMask::empty(),
            ModMask::LOCK,
            numlock,
            numlock | ModMask::LOCK,
        ]
    }

    // Whitelisted error pairs mirror the races a window manager cannot
    // avoid: windows vanishing underneath us and grab collisions.
    fn ignorable(error: &x11rb::x11_utils::X11Error) -> bool {
        const SET_INPUT_FOCUS: u8 = 42;
        const CONFIGURE_WINDOW: u8 = 12;
        const GRAB_BUTTON: u8 = 28;
        const GRAB_KEY: u8 = 33;
        const COPY_AREA: u8 = 62;
        const POLY_SEGMENT: u8 = 66;
        const POLY_FILL_RECTANGLE: u8 = 70;

        matches!(
            (error.error_kind, error.major_opcode),
            (ErrorKind::Window, _)
                | (ErrorKind::Match, SET_INPUT_FOCUS)
                | (ErrorKind::Match, CONFIGURE_WINDOW)
                | (ErrorKind::Access, GRAB_BUTTON)
                | (ErrorKind::Access, GRAB_KEY)
                | (ErrorKind::Drawable, COPY_AREA)
                | (ErrorKind::Drawable, POLY_SEGMENT)
                | (ErrorKind::Drawable, POLY_FILL_RECTANGLE)
        )
    }

    fn next_raw_event(&self) -> Result<Event> {
        if let Some(ev) = self.pending.borrow_mut().pop_front() {
            return Ok(ev);
        }

        Ok(self.conn.wait_for_event()?)
    }

    fn convert_event(&self, event: Event) -> Option<XEvent> {
        match event {
            Event::Error(e) => {
                if Self::ignorable(&e) {
                    debug!(
                        error_kind = ?e.error_kind,
                        request = e.major_opcode,
                        "ignoring X error from a known race"
                    );
                } else {
                    error!(
                        error_kind = ?e.error_kind,
                        request = e.major_opcode,
                        "unexpected X error"
                    );
                }
                None
            }

            Event::ButtonPress(e) => Some(XEvent::ButtonPress(ButtonEvent {
                id: Xid(e.event),
                rpt: Point::new(e.root_x as i32, e.root_y as i32),
                wpt: Point::new(e.event_x as i32, e.event_y as i32),
                button: e.detail,
                state: ModMask::from_bits_truncate(u16::from(e.state)),
            })),

            Event::ButtonRelease(_) => Some(XEvent::ButtonRelease),

            Event::MotionNotify(e) => Some(XEvent::MotionNotify(Point::new(
                e.root_x as i32,
                e.root_y as i32,
            ))),

            Event::KeyPress(e) => Some(XEvent::KeyPress(KeyCode {
                mask: ModMask::from_bits_truncate(u16::from(e.state)),
                code: e.detail,
            })),

            Event::MapRequest(e) => Some(XEvent::MapRequest(Xid(e.window))),

            Event::EnterNotify(e) => Some(XEvent::Enter(CrossingEvent {
                id: Xid(e.event),
                is_root: e.event == self.root,
                normal: e.mode == NotifyMode::NORMAL && e.detail != NotifyDetail::INFERIOR,
            })),

            Event::DestroyNotify(e) => Some(XEvent::Destroy(Xid(e.window))),

            Event::UnmapNotify(e) => Some(XEvent::UnmapNotify(Xid(e.window))),

            Event::ConfigureNotify(e) => Some(XEvent::ConfigureNotify(ConfigureEvent {
                id: Xid(e.window),
                rect: Rect::new(
                    e.x as i32,
                    e.y as i32,
                    e.width as u32,
                    e.height as u32,
                ),
                is_root: e.window == self.root,
            })),

            Event::ConfigureRequest(e) => {
                let mask = e.value_mask;
                let has = |flag: ConfigWindow| u16::from(mask) & u16::from(flag) != 0;

                Some(XEvent::ConfigureRequest(ConfigureRequestEvent {
                    id: Xid(e.window),
                    x: has(ConfigWindow::X).then_some(e.x as i32),
                    y: has(ConfigWindow::Y).then_some(e.y as i32),
                    w: has(ConfigWindow::WIDTH).then_some(e.width as u32),
                    h: has(ConfigWindow::HEIGHT).then_some(e.height as u32),
                    border_width: has(ConfigWindow::BORDER_WIDTH)
                        .then_some(e.border_width as u32),
                    sibling: has(ConfigWindow::SIBLING).then_some(Xid(e.sibling)),
                    stack_mode: has(ConfigWindow::STACK_MODE)
                        .then_some(u32::from(e.stack_mode)),
                }))
            }

            Event::ClientMessage(e) => {
                if e.type_ != self.known_atom(Atom::NetWmState) {
                    return None;
                }
                let data = e.data.as_data32();
                let fullscreen = self.known_atom(Atom::NetWmStateFullscreen);
                if data[1] != fullscreen && data[2] != fullscreen {
                    return None;
                }

                Some(XEvent::ClientMessage(StateChangeEvent {
                    id: Xid(e.window),
                    fullscreen: data[0] != 0,
                }))
            }

            Event::PropertyNotify(e) => {
                let atom = self.atom_from_raw(e.atom)?;

                Some(XEvent::PropertyNotify(PropertyEvent {
                    id: Xid(e.window),
                    atom,
                    is_root: e.window == self.root,
                    deleted: e.state == Property::DELETE,
                }))
            }

            Event::FocusIn(e) => Some(XEvent::FocusIn(Xid(e.event))),

            Event::Expose(e) => Some(XEvent::Expose(ExposeEvent {
                id: Xid(e.window),
                count: e.count as usize,
            })),

            Event::MappingNotify(e) => {
                (e.request == Mapping::KEYBOARD).then_some(XEvent::MappingNotify)
            }

            _ => None,
        }
    }

    fn measure_char(&self, c: char) -> u32 {
        if let Some(&w) = self.char_widths.borrow().get(&c) {
            return w;
        }

        let encoded = Char2b {
            byte1: 0,
            byte2: if c.is_ascii() { c as u8 } else { b'?' },
        };
        let w = self
            .conn
            .query_text_extents(self.font.id, &[encoded])
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map(|r| r.overall_width.max(0) as u32)
            .unwrap_or(self.font.height / 2);

        self.char_widths.borrow_mut().insert(c, w);

        w
    }

    fn raw_text_width(&self, text: &str) -> u32 {
        text.chars().map(|c| self.measure_char(c)).sum()
    }

    // Core-font rendering of one bar cell: background fill, centered text
    // shortened with an ellipsis when needed, optional corner marker.
    fn draw_segment(
        &self,
        pixmap: u32,
        bar_h: u32,
        norm: ColorScheme,
        sel: ColorScheme,
        s: &Segment,
    ) -> Result<()> {
        let scheme = if s.selected { sel } else { norm };
        let (fg, bg) = if s.invert {
            (scheme.bg, scheme.fg)
        } else {
            (scheme.fg, scheme.bg)
        };

        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(bg.pixel()))?;
        self.conn.poly_fill_rectangle(
            pixmap,
            self.gc,
            &[Rectangle {
                x: s.x as i16,
                y: 0,
                width: s.width as u16,
                height: bar_h as u16,
            }],
        )?;

        let font_h = self.font.height;
        let pad = font_h / 2;
        if s.width > font_h {
            let max_w = s.width - font_h;
            let mut chars: Vec<char> = s.text.chars().collect();

            // shorten with an ellipsis when the cell is too narrow
            if self.raw_text_width(&s.text) > max_w {
                while !chars.is_empty()
                    && chars.iter().map(|&c| self.measure_char(c)).sum::<u32>() > max_w
                {
                    chars.pop();
                }
                let len = chars.len();
                for c in chars.iter_mut().skip(len.saturating_sub(3)) {
                    *c = '.';
                }
            }

            if !chars.is_empty() {
                let y = (bar_h as i16 / 2) - (font_h as i16 / 2) + self.font.ascent;
                let bytes: Vec<u8> = chars
                    .iter()
                    .map(|&c| if c.is_ascii() { c as u8 } else { b'?' })
                    .collect();
                self.conn.change_gc(
                    self.gc,
                    &ChangeGCAux::new()
                        .foreground(fg.pixel())
                        .background(bg.pixel()),
                )?;
                self.conn
                    .image_text8(pixmap, self.gc, (s.x + pad) as i16, y, &bytes)?;
            }
        }

        if let Some(marker) = s.marker {
            let sz = ((font_h + 2) / 4) as u16;
            let r = Rectangle {
                x: s.x as i16 + 1,
                y: 1,
                width: sz,
                height: sz,
            };
            self.conn
                .change_gc(self.gc, &ChangeGCAux::new().foreground(fg.pixel()))?;
            match marker {
                Marker::Filled => self.conn.poly_fill_rectangle(pixmap, self.gc, &[r])?,
                Marker::Outline => self.conn.poly_rectangle(pixmap, self.gc, &[r])?,
            };
        }

        Ok(())
    }
}

impl XConn for RustConn {
    fn root(&self) -> Xid {
        Xid(self.root)
    }

    fn display_rect(&self) -> Rect {
        self.display
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        let has_xinerama = self
            .conn
            .extension_information(xinerama::X11_EXTENSION_NAME)?
            .is_some();
        if !has_xinerama || self.conn.xinerama_is_active()?.reply()?.state == 0 {
            return Ok(vec![self.display]);
        }

        let screens = self
            .conn
            .xinerama_query_screens()?
            .reply()?
            .screen_info
            .into_iter()
            .map(|s| {
                Rect::new(
                    s.x_org as i32,
                    s.y_org as i32,
                    s.width as u32,
                    s.height as u32,
                )
            })
            .collect();

        Ok(screens)
    }

    fn cursor_position(&self) -> Result<Point> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;

        Ok(Point::new(reply.root_x as i32, reply.root_y as i32))
    }

    fn next_event(&self) -> Result<XEvent> {
        loop {
            let raw = self.next_raw_event()?;
            if let Some(event) = self.convert_event(raw) {
                return Ok(event);
            }
        }
    }

    // The equivalent of waiting on a masked event: anything a gesture does
    // not act on is parked in the pending buffer so the main loop sees it
    // once the pointer is released.
    fn next_gesture_event(&self) -> Result<XEvent> {
        loop {
            let raw = self.conn.wait_for_event()?;
            let in_gesture_mask = matches!(
                raw,
                Event::MotionNotify(_)
                    | Event::ButtonPress(_)
                    | Event::ButtonRelease(_)
                    | Event::Expose(_)
                    | Event::ConfigureRequest(_)
                    | Event::MapRequest(_)
                    | Event::Error(_)
            );
            if !in_gesture_mask {
                self.pending.borrow_mut().push_back(raw);
                continue;
            }
            if let Some(event) = self.convert_event(raw) {
                return Ok(event);
            }
        }
    }

    fn flush(&self) {
        let _ = self.conn.flush();
    }

    fn sync(&self) -> Result<()> {
        // a round trip forces the server to process everything buffered
        self.conn.get_input_focus()?.reply()?;

        Ok(())
    }

    fn numlock_mask(&self) -> ModMask {
        self.numlock.get()
    }

    fn refresh_keyboard_mapping(&self) -> Result<()> {
        self.numlock.set(self.discover_numlock_mask());

        Ok(())
    }

    fn client_geometry(&self, client: Xid) -> Result<Rect> {
        let g = self.conn.get_geometry(*client)?.reply()?;

        Ok(Rect::new(
            g.x as i32,
            g.y as i32,
            g.width as u32,
            g.height as u32,
        ))
    }

    fn window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        let attrs = self.conn.get_window_attributes(*client)?;
        let geo = self.conn.get_geometry(*client)?;
        let attrs = attrs.reply()?;
        let geo = geo.reply()?;

        Ok(WindowAttributes {
            rect: Rect::new(
                geo.x as i32,
                geo.y as i32,
                geo.width as u32,
                geo.height as u32,
            ),
            border_width: geo.border_width as u32,
            override_redirect: attrs.override_redirect,
            viewable: attrs.map_state == MapState::VIEWABLE,
        })
    }

    fn existing_clients(&self) -> Result<Vec<Xid>> {
        let reply = self.conn.query_tree(self.root)?.reply()?;

        Ok(reply.children.into_iter().map(Xid).collect())
    }

    fn text_prop(&self, win: Xid, atom: Atom) -> Result<Option<String>> {
        let raw = self.known_atom(atom);
        let reply = self
            .conn
            .get_property(false, *win, raw, AtomEnum::ANY, 0, 1024)?
            .reply()?;
        if reply.value.is_empty() {
            return Ok(None);
        }

        let text = String::from_utf8_lossy(&reply.value)
            .trim_end_matches('\0')
            .to_string();

        Ok(Some(text))
    }

    fn size_hints(&self, client: Xid) -> Result<SizeHints> {
        let hints = WmSizeHints::get_normal_hints(&self.conn, *client)
            .ok()
            .and_then(|cookie| cookie.reply_unchecked().ok().flatten())
            .unwrap_or_default();

        let pair = |v: Option<(i32, i32)>| {
            v.map(|(a, b)| (a.max(0) as u32, b.max(0) as u32))
                .unwrap_or((0, 0))
        };

        // ICCCM fallbacks: base defaults to min and min defaults to base
        let base = pair(hints.base_size.or(hints.min_size));
        let min = pair(hints.min_size.or(hints.base_size));
        let max = pair(hints.max_size);
        let inc = pair(hints.size_increment);
        let aspect = hints
            .aspect
            .map(|(min_a, max_a)| {
                let mina = if min_a.numerator > 0 {
                    min_a.denominator as f32 / min_a.numerator as f32
                } else {
                    0.0
                };
                let maxa = if max_a.denominator > 0 {
                    max_a.numerator as f32 / max_a.denominator as f32
                } else {
                    0.0
                };
                (mina, maxa)
            })
            .unwrap_or((0.0, 0.0));

        Ok(SizeHints {
            base,
            inc,
            min,
            max,
            aspect,
        })
    }

    fn urgency_hint(&self, client: Xid) -> Result<bool> {
        let urgent = WmHints::get(&self.conn, *client)
            .ok()
            .and_then(|cookie| cookie.reply_unchecked().ok().flatten())
            .map(|hints| hints.urgent)
            .unwrap_or(false);

        Ok(urgent)
    }

    fn clear_urgency_hint(&self, client: Xid) -> Result<()> {
        let hints = WmHints::get(&self.conn, *client)
            .ok()
            .and_then(|cookie| cookie.reply_unchecked().ok().flatten());

        if let Some(mut hints) = hints {
            hints.urgent = false;
            hints.set(&self.conn, *client)?;
        }

        Ok(())
    }

    fn transient_for(&self, client: Xid) -> Result<Option<Xid>> {
        let reply = self
            .conn
            .get_property(
                false,
                *client,
                AtomEnum::WM_TRANSIENT_FOR,
                AtomEnum::WINDOW,
                0,
                1,
            )?
            .reply()?;

        Ok(reply
            .value32()
            .and_then(|mut it| it.next())
            .filter(|&w| w != NONE)
            .map(Xid))
    }

    fn get_wm_state(&self, client: Xid) -> Result<Option<WmState>> {
        let wm_state = self.known_atom(Atom::WmState);
        let reply = self
            .conn
            .get_property(false, *client, wm_state, wm_state, 0, 2)?
            .reply()?;

        Ok(reply
            .value32()
            .and_then(|mut it| it.next())
            .and_then(WmState::from_raw))
    }

    fn supports_protocol(&self, client: Xid, proto: Atom) -> Result<bool> {
        let reply = self
            .conn
            .get_property(
                false,
                *client,
                self.known_atom(Atom::WmProtocols),
                AtomEnum::ATOM,
                0,
                32,
            )?
            .reply()?;
        let wanted = self.known_atom(proto);

        Ok(reply
            .value32()
            .map(|mut it| it.any(|a| a == wanted))
            .unwrap_or(false))
    }

    fn select_client_events(&self, client: Xid) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().event_mask(client_event_mask());
        self.conn.change_window_attributes(*client, &aux)?;

        Ok(())
    }

    fn map_client(&self, client: Xid) -> Result<()> {
        self.conn.map_window(*client)?;

        Ok(())
    }

    fn position_client(&self, client: Xid, r: Rect, bw: u32) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(r.x)
            .y(r.y)
            .width(r.w)
            .height(r.h)
            .border_width(bw);
        self.conn.configure_window(*client, &aux)?;

        Ok(())
    }

    fn move_client(&self, client: Xid, p: Point) -> Result<()> {
        let aux = ConfigureWindowAux::new().x(p.x).y(p.y);
        self.conn.configure_window(*client, &aux)?;

        Ok(())
    }

    fn set_border_width(&self, client: Xid, bw: u32) -> Result<()> {
        let aux = ConfigureWindowAux::new().border_width(bw);
        self.conn.configure_window(*client, &aux)?;

        Ok(())
    }

    fn set_border_color(&self, client: Xid, color: Color) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().border_pixel(color.pixel());
        self.conn.change_window_attributes(*client, &aux)?;

        Ok(())
    }

    fn raise_client(&self, client: Xid) -> Result<()> {
        let aux = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
        self.conn.configure_window(*client, &aux)?;

        Ok(())
    }

    fn stack_below(&self, client: Xid, sibling: Xid) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .sibling(*sibling)
            .stack_mode(StackMode::BELOW);
        self.conn.configure_window(*client, &aux)?;

        Ok(())
    }

    fn send_configure_notify(&self, client: Xid, r: Rect, bw: u32) -> Result<()> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: *client,
            window: *client,
            above_sibling: NONE,
            x: r.x as i16,
            y: r.y as i16,
            width: r.w as u16,
            height: r.h as u16,
            border_width: bw as u16,
            override_redirect: false,
        };
        self.conn
            .send_event(false, *client, EventMask::STRUCTURE_NOTIFY, event)?;

        Ok(())
    }

    fn configure_unmanaged(&self, ev: &ConfigureRequestEvent) -> Result<()> {
        let mut aux = ConfigureWindowAux::new()
            .x(ev.x)
            .y(ev.y)
            .width(ev.w)
            .height(ev.h)
            .border_width(ev.border_width)
            .sibling(ev.sibling.map(|s| *s));
        if let Some(mode) = ev.stack_mode {
            aux = aux.stack_mode(StackMode::from(mode as u8));
        }
        self.conn.configure_window(*ev.id, &aux)?;

        Ok(())
    }

    fn set_input_focus(&self, win: Xid) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, *win, CURRENT_TIME)?;

        Ok(())
    }

    fn set_wm_state(&self, client: Xid, state: WmState) -> Result<()> {
        let wm_state = self.known_atom(Atom::WmState);
        let data = [u32::from(state), NONE];
        self.conn
            .change_property32(PropMode::REPLACE, *client, wm_state, wm_state, &data)?;

        Ok(())
    }

    fn set_fullscreen_prop(&self, client: Xid, fullscreen: bool) -> Result<()> {
        let net_wm_state = self.known_atom(Atom::NetWmState);
        let value = [self.known_atom(Atom::NetWmStateFullscreen)];
        let data: &[u32] = if fullscreen { &value } else { &[] };
        self.conn
            .change_property32(PropMode::REPLACE, *client, net_wm_state, AtomEnum::ATOM, data)?;

        Ok(())
    }

    fn send_protocol_message(&self, client: Xid, proto: Atom) -> Result<()> {
        let event = ClientMessageEvent::new(
            32,
            *client,
            self.known_atom(Atom::WmProtocols),
            [self.known_atom(proto), CURRENT_TIME, 0, 0, 0],
        );
        self.conn
            .send_event(false, *client, EventMask::NO_EVENT, event)?;

        Ok(())
    }

    fn kill_client(&self, client: Xid) -> Result<()> {
        let _guard = ServerGuard::grab(&self.conn)?;
        self.conn.set_close_down_mode(CloseDown::DESTROY_ALL)?;
        self.conn.kill_client(*client)?;

        self.sync()
    }

    fn release_client(&self, client: Xid, bw: u32) -> Result<()> {
        let _guard = ServerGuard::grab(&self.conn)?;
        let aux = ConfigureWindowAux::new().border_width(bw);
        self.conn.configure_window(*client, &aux)?;
        self.conn
            .ungrab_button(ButtonIndex::ANY, *client, XModMask::ANY)?;
        self.set_wm_state(client, WmState::Withdrawn)?;

        self.sync()
    }

    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()> {
        self.conn.ungrab_key(0u8, self.root, XModMask::ANY)?;

        for key in keys {
            for combo in self.lock_combinations() {
                self.conn.grab_key(
                    true,
                    self.root,
                    XModMask::from((key.mask | combo).bits()),
                    key.code,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )?;
            }
        }
        self.conn.flush()?;

        Ok(())
    }

    fn grab_client_buttons(
        &self,
        client: Xid,
        focused: bool,
        buttons: &[ButtonSpec],
    ) -> Result<()> {
        self.conn
            .ungrab_button(ButtonIndex::ANY, *client, XModMask::ANY)?;

        if focused {
            for spec in buttons {
                for combo in self.lock_combinations() {
                    self.conn.grab_button(
                        false,
                        *client,
                        button_mask(),
                        GrabMode::ASYNC,
                        GrabMode::SYNC,
                        NONE,
                        NONE,
                        button_index(spec.button),
                        XModMask::from((spec.mask | combo).bits()),
                    )?;
                }
            }
        } else {
            // any click on an unfocused client is ours so it can be focused
            self.conn.grab_button(
                false,
                *client,
                button_mask(),
                GrabMode::ASYNC,
                GrabMode::SYNC,
                NONE,
                NONE,
                ButtonIndex::ANY,
                XModMask::ANY,
            )?;
        }

        Ok(())
    }

    fn grab_pointer(&self, shape: PointerShape) -> Result<bool> {
        let cursor = match shape {
            PointerShape::Move => self.cursors.moving,
            PointerShape::Resize => self.cursors.sizing,
        };
        let reply = self
            .conn
            .grab_pointer(
                false,
                self.root,
                mouse_mask(),
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                NONE,
                cursor,
                CURRENT_TIME,
            )?
            .reply()?;

        Ok(reply.status == GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.conn.ungrab_pointer(CURRENT_TIME)?;

        Ok(())
    }

    fn warp_pointer(&self, win: Xid, x: i16, y: i16) -> Result<()> {
        self.conn.warp_pointer(NONE, *win, 0, 0, 0, 0, x, y)?;

        Ok(())
    }

    fn drain_enter_events(&self) -> Result<()> {
        let mut pending = self.pending.borrow_mut();
        pending.retain(|ev| !matches!(ev, Event::EnterNotify(_)));

        while let Some(ev) = self.conn.poll_for_event()? {
            if !matches!(ev, Event::EnterNotify(_)) {
                pending.push_back(ev);
            }
        }

        Ok(())
    }

    fn create_bar_window(&self, r: Rect) -> Result<Xid> {
        let win = self.conn.generate_id()?;
        let aux = CreateWindowAux::new()
            .override_redirect(1)
            .background_pixel(0)
            .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE)
            .cursor(self.cursors.normal);
        self.conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            win,
            self.root,
            r.x as i16,
            r.y as i16,
            r.w as u16,
            r.h as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &aux,
        )?;
        self.conn.map_window(win)?;
        self.raise_client(Xid(win))?;

        Ok(Xid(win))
    }

    fn destroy_window(&self, win: Xid) -> Result<()> {
        self.conn.unmap_window(*win)?;
        self.conn.destroy_window(*win)?;

        Ok(())
    }

    fn move_resize_window(&self, win: Xid, r: Rect) -> Result<()> {
        self.position_client(win, r, 0)
    }

    fn text_width(&self, text: &str) -> u32 {
        self.raw_text_width(text) + self.font.height
    }

    fn bar_height(&self) -> u32 {
        self.font.height + 2
    }

    fn draw_bar(
        &self,
        bar: Xid,
        width: u32,
        norm: ColorScheme,
        sel: ColorScheme,
        segments: &[Segment],
    ) -> Result<()> {
        let bar_h = self.bar_height();
        let pixmap = self.conn.generate_id()?;
        self.conn
            .create_pixmap(self.depth, pixmap, self.root, width as u16, bar_h as u16)?;

        let res = (|| -> Result<()> {
            for s in segments {
                self.draw_segment(pixmap, bar_h, norm, sel, s)?;
            }
            self.conn.copy_area(
                pixmap,
                *bar,
                self.gc,
                0,
                0,
                0,
                0,
                width as u16,
                bar_h as u16,
            )?;

            self.sync()
        })();

        let _ = self.conn.free_pixmap(pixmap);

        res
    }
}

fn open_font(conn: &RustConnection, name: &str) -> Result<Font> {
    let id = conn.generate_id()?;
    conn.open_font(id, name.as_bytes())?;
    let info = conn.query_font(id)?.reply()?;
    let (ascent, descent) = (info.font_ascent, info.font_descent);

    Ok(Font {
        id,
        ascent,
        height: (ascent + descent).max(1) as u32,
    })
}

fn create_cursors(conn: &RustConnection) -> Result<Cursors> {
    let font = conn.generate_id()?;
    conn.open_font(font, b"cursor")?;

    let mut glyph_cursor = |glyph: u16| -> Result<u32> {
        let id = conn.generate_id()?;
        conn.create_glyph_cursor(
            id, font, font, glyph, glyph + 1, 0, 0, 0, 0xffff, 0xffff, 0xffff,
        )?;
        Ok(id)
    };

    let cursors = Cursors {
        normal: glyph_cursor(XC_LEFT_PTR)?,
        moving: glyph_cursor(XC_FLEUR)?,
        sizing: glyph_cursor(XC_SIZING)?,
    };
    conn.close_font(font)?;

    Ok(cursors)
}
