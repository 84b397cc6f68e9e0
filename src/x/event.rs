//! Data types for working with X events
use crate::{
    core::bindings::{KeyCode, ModMask},
    pure::geometry::{Point, Rect},
    x::atom::Atom,
    Xid,
};

/// Wrapper around the low level X event types that the window manager
/// dispatches on.
///
/// Payloads carry only what the handlers consume; anything the manager
/// ignores (sub-structure details, timestamps, serials) is dropped at the
/// backend boundary. Unhandled event types are never surfaced.
#[derive(Debug, Clone, PartialEq)]
pub enum XEvent {
    /// A grabbed mouse button was pressed on some window
    ButtonPress(ButtonEvent),
    /// A grabbed mouse button was released (observed inside gesture loops)
    ButtonRelease,
    /// A `_NET_WM_STATE` fullscreen change was requested for a client
    ClientMessage(StateChangeEvent),
    /// A window's geometry changed; tracked for the root window only
    ConfigureNotify(ConfigureEvent),
    /// A window is asking to be repositioned or restacked
    ConfigureRequest(ConfigureRequestEvent),
    /// A window has been destroyed
    Destroy(Xid),
    /// The pointer has crossed into a window
    Enter(CrossingEvent),
    /// Part of a window became visible
    Expose(ExposeEvent),
    /// The X server asserts that a window holds the input focus
    FocusIn(Xid),
    /// A grabbed key combination was pressed
    KeyPress(KeyCode),
    /// The keyboard mapping has changed
    MappingNotify,
    /// A window is asking to be mapped onto the screen
    MapRequest(Xid),
    /// The pointer moved while grabbed (observed inside gesture loops)
    MotionNotify(Point),
    /// A property changed on some window
    PropertyNotify(PropertyEvent),
    /// A window is being unmapped
    UnmapNotify(Xid),
}

impl std::fmt::Display for XEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use XEvent::*;

        match self {
            ButtonPress(_) => write!(f, "ButtonPress"),
            ButtonRelease => write!(f, "ButtonRelease"),
            ClientMessage(_) => write!(f, "ClientMessage"),
            ConfigureNotify(_) => write!(f, "ConfigureNotify"),
            ConfigureRequest(_) => write!(f, "ConfigureRequest"),
            Destroy(_) => write!(f, "Destroy"),
            Enter(_) => write!(f, "Enter"),
            Expose(_) => write!(f, "Expose"),
            FocusIn(_) => write!(f, "FocusIn"),
            KeyPress(_) => write!(f, "KeyPress"),
            MappingNotify => write!(f, "MappingNotify"),
            MapRequest(_) => write!(f, "MapRequest"),
            MotionNotify(_) => write!(f, "MotionNotify"),
            PropertyNotify(_) => write!(f, "PropertyNotify"),
            UnmapNotify(_) => write!(f, "UnmapNotify"),
        }
    }
}

/// A mouse button press on a window, the bar or the root window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// The window that was clicked
    pub id: Xid,
    /// Click position relative to the root window
    pub rpt: Point,
    /// Click position relative to the clicked window
    pub wpt: Point,
    /// The button number (1 = left ... 5 = scroll down)
    pub button: u8,
    /// Modifiers held at press time
    pub state: ModMask,
}

/// A `_NET_WM_STATE` request for the fullscreen property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChangeEvent {
    /// The client the state change applies to
    pub id: Xid,
    /// Whether fullscreen is being added or removed
    pub fullscreen: bool,
}

/// A configure notification; only deliveries for the root window reach the
/// event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureEvent {
    /// The window that changed
    pub id: Xid,
    /// Its new geometry
    pub rect: Rect,
    /// Whether this is the root window
    pub is_root: bool,
}

/// A client request to change geometry, border or stacking.
///
/// Fields mirror the request's value mask: absent fields were not part of
/// the request and must be left unchanged (or omitted on pass-through).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequestEvent {
    /// The window asking to be configured
    pub id: Xid,
    /// Requested x position
    pub x: Option<i32>,
    /// Requested y position
    pub y: Option<i32>,
    /// Requested width
    pub w: Option<u32>,
    /// Requested height
    pub h: Option<u32>,
    /// Requested border width
    pub border_width: Option<u32>,
    /// Requested stacking sibling
    pub sibling: Option<Xid>,
    /// Requested stacking mode, as the raw protocol value
    pub stack_mode: Option<u32>,
}

/// The pointer crossed into a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingEvent {
    /// The window that was entered
    pub id: Xid,
    /// Whether that window is the root
    pub is_root: bool,
    /// A normal, non-inferior crossing (grab transitions and crossings into
    /// child windows are filtered by this flag)
    pub normal: bool,
}

/// Part of a window was exposed and needs redrawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposeEvent {
    /// The exposed window
    pub id: Xid,
    /// The number of expose events still pending for this window
    pub count: usize,
}

/// A property changed on a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyEvent {
    /// The window whose property changed
    pub id: Xid,
    /// Which property changed
    pub atom: Atom,
    /// Whether this is the root window
    pub is_root: bool,
    /// Whether the property was deleted rather than replaced
    pub deleted: bool,
}
