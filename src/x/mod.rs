//! Logic for interacting with the X server.
//!
//! [XConn] is the boundary between the window manager core and the X
//! protocol: everything the core needs from the server is a method here, so
//! the full event handling surface can be driven by the stub connection in
//! [mock] without a display.
use crate::{
    bar::Segment,
    config::ColorScheme,
    core::bindings::{ButtonSpec, KeyCode, ModMask},
    pure::{
        geometry::{Point, Rect},
        SizeHints,
    },
    Color, Result, Xid,
};

pub mod atom;
pub mod event;
pub mod mock;
pub mod property;

pub use atom::{Atom, EWMH_SUPPORTED_ATOMS};
pub use event::XEvent;
pub use property::{WindowAttributes, WmState};

/// The pointer shapes used while a gesture grab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerShape {
    /// Shown while interactively moving a client
    Move,
    /// Shown while interactively resizing a client
    Resize,
}

/// A handle on a running X11 connection that we can use for issuing
/// requests.
///
/// The core treats the connection as a serial, single threaded resource:
/// requests are buffered until [flush][XConn::flush] or
/// [sync][XConn::sync], and the only blocking call is
/// [next_event][XConn::next_event].
pub trait XConn {
    /// The ID of the window manager root window
    fn root(&self) -> Xid;
    /// The geometry of the whole X display
    fn display_rect(&self) -> Rect;
    /// Per-screen geometries from Xinerama, or the display geometry when
    /// Xinerama is inactive. May contain duplicates.
    fn screen_details(&self) -> Result<Vec<Rect>>;
    /// The current root-relative position of the mouse cursor
    fn cursor_position(&self) -> Result<Point>;
    /// Block and wait for the next event from the X server
    fn next_event(&self) -> Result<XEvent>;
    /// Block and wait for the next event a gesture loop acts on: pointer
    /// motion and release, exposures and map/configure requests. Anything
    /// else stays queued for the main loop to pick up after the gesture.
    fn next_gesture_event(&self) -> Result<XEvent>;
    /// Flush any buffered requests to the X server
    fn flush(&self);
    /// Flush and wait for the server to have processed everything
    fn sync(&self) -> Result<()>;
    /// The modifier bit currently mapped to NumLock
    fn numlock_mask(&self) -> ModMask;
    /// Re-read the keyboard mapping after a MappingNotify
    fn refresh_keyboard_mapping(&self) -> Result<()>;

    /// Look up the current dimensions and position of a window
    fn client_geometry(&self, client: Xid) -> Result<Rect>;
    /// Request the window attributes the manager inspects before managing
    fn window_attributes(&self, client: Xid) -> Result<WindowAttributes>;
    /// The IDs of all current children of the root window
    fn existing_clients(&self) -> Result<Vec<Xid>>;
    /// Read a text property from a window
    fn text_prop(&self, win: Xid, atom: Atom) -> Result<Option<String>>;
    /// Read and normalize the WM_NORMAL_HINTS property of a client
    fn size_hints(&self, client: Xid) -> Result<SizeHints>;
    /// Whether the client has raised the ICCCM urgency hint
    fn urgency_hint(&self, client: Xid) -> Result<bool>;
    /// The window this client is transient for, if any
    fn transient_for(&self, client: Xid) -> Result<Option<Xid>>;
    /// Read the ICCCM WM_STATE property of a client
    fn get_wm_state(&self, client: Xid) -> Result<Option<WmState>>;
    /// Whether a client participates in the given WM_PROTOCOLS protocol
    fn supports_protocol(&self, client: Xid, proto: Atom) -> Result<bool>;

    /// Select the event mask the manager needs on a managed client
    fn select_client_events(&self, client: Xid) -> Result<()>;
    /// Map a window onto the screen
    fn map_client(&self, client: Xid) -> Result<()>;
    /// Set the position, size and border width of a client
    fn position_client(&self, client: Xid, r: Rect, bw: u32) -> Result<()>;
    /// Move a client without touching its size (used to park hidden clients)
    fn move_client(&self, client: Xid, p: Point) -> Result<()>;
    /// Set only the border width of a window
    fn set_border_width(&self, client: Xid, bw: u32) -> Result<()>;
    /// Set the border color of a window
    fn set_border_color(&self, client: Xid, color: Color) -> Result<()>;
    /// Raise a window to the top of the stacking order
    fn raise_client(&self, client: Xid) -> Result<()>;
    /// Stack a window directly below the given sibling
    fn stack_below(&self, client: Xid, sibling: Xid) -> Result<()>;
    /// Send a synthetic ConfigureNotify reflecting the given geometry
    fn send_configure_notify(&self, client: Xid, r: Rect, bw: u32) -> Result<()>;
    /// Pass an unmanaged window's configure request through unchanged
    fn configure_unmanaged(&self, ev: &event::ConfigureRequestEvent) -> Result<()>;
    /// Give a window the input focus
    fn set_input_focus(&self, win: Xid) -> Result<()>;
    /// Set the ICCCM WM_STATE property of a client
    fn set_wm_state(&self, client: Xid, state: WmState) -> Result<()>;
    /// Set or clear the EWMH fullscreen state property of a client
    fn set_fullscreen_prop(&self, client: Xid, fullscreen: bool) -> Result<()>;
    /// Clear the urgency flag from a client's WM_HINTS on the server
    fn clear_urgency_hint(&self, client: Xid) -> Result<()>;
    /// Send a WM_PROTOCOLS client message (e.g. WM_DELETE_WINDOW)
    fn send_protocol_message(&self, client: Xid, proto: Atom) -> Result<()>;
    /// Forcibly kill a client under a server grab with errors ignored
    fn kill_client(&self, client: Xid) -> Result<()>;
    /// Return a live window to an unmanaged state: restore its border,
    /// drop our button grabs and mark it withdrawn. Runs under a server
    /// grab with errors ignored since the window may be going away.
    fn release_client(&self, client: Xid, bw: u32) -> Result<()>;

    /// Grab the given key codes on the root window, under every lock
    /// modifier combination
    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()>;
    /// Update the button grabs on a client for its focus state: focused
    /// clients grab only the bound buttons, unfocused clients grab
    /// everything so that a click can focus them
    fn grab_client_buttons(&self, client: Xid, focused: bool, buttons: &[ButtonSpec])
        -> Result<()>;
    /// Start a pointer grab for a gesture, reporting whether it succeeded
    fn grab_pointer(&self, shape: PointerShape) -> Result<bool>;
    /// Release the active pointer grab
    fn ungrab_pointer(&self) -> Result<()>;
    /// Reposition the pointer relative to the given window
    fn warp_pointer(&self, win: Xid, x: i16, y: i16) -> Result<()>;
    /// Throw away any queued pointer crossing events so that windows
    /// revealed by a restack do not steal the focus
    fn drain_enter_events(&self) -> Result<()>;

    /// Create an override-redirect bar window with the given geometry
    fn create_bar_window(&self, r: Rect) -> Result<Xid>;
    /// Destroy a window created by the manager
    fn destroy_window(&self, win: Xid) -> Result<()>;
    /// Move and resize a manager-owned window
    fn move_resize_window(&self, win: Xid, r: Rect) -> Result<()>;
    /// The rendered width of the given text in the bar font, including the
    /// cell padding
    fn text_width(&self, text: &str) -> u32;
    /// The bar height derived from the loaded font
    fn bar_height(&self) -> u32;
    /// Render a bar's segments with the given color schemes and blit them
    /// to the bar window
    fn draw_bar(
        &self,
        bar: Xid,
        width: u32,
        norm: ColorScheme,
        sel: ColorScheme,
        segments: &[Segment],
    ) -> Result<()>;

    /// The display name of a client following EWMH then ICCCM conventions
    fn window_title(&self, client: Xid) -> Result<String> {
        match self.text_prop(client, Atom::NetWmName)? {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Ok(self.text_prop(client, Atom::WmName)?.unwrap_or_default()),
        }
    }
}
