//! A stub implementation of [XConn] for driving the window manager in
//! tests without a running X server.
//!
//! Implement [StubXConn] and override only the methods your test cares
//! about: everything else defaults to a benign no-op (queries return empty
//! or zero values, mutations succeed silently), so whole event sequences
//! can be run through the manager unmodified.
use crate::{
    bar::Segment,
    config::ColorScheme,
    core::bindings::{ButtonSpec, KeyCode, ModMask},
    pure::{
        geometry::{Point, Rect},
        SizeHints,
    },
    x::{
        event::{ConfigureRequestEvent, XEvent},
        Atom, PointerShape, WindowAttributes, WmState, XConn,
    },
    Color, Error, Result, Xid,
};

/// Any implementation of `StubXConn` automatically implements [XConn] by
/// forwarding each `method` to `stub_method`.
#[allow(unused_variables)]
pub trait StubXConn {
    /// The root window ID used by this stub
    fn stub_root(&self) -> Xid {
        Xid(1)
    }

    /// The display geometry used by this stub
    fn stub_display_rect(&self) -> Rect {
        Rect::new(0, 0, 1920, 1080)
    }

    /// Screens reported by this stub: a single full-display screen
    fn stub_screen_details(&self) -> Result<Vec<Rect>> {
        Ok(vec![self.stub_display_rect()])
    }

    fn stub_cursor_position(&self) -> Result<Point> {
        Ok(Point::new(0, 0))
    }

    fn stub_next_event(&self) -> Result<XEvent> {
        Err(Error::UnimplementedStub("next_event"))
    }

    fn stub_next_gesture_event(&self) -> Result<XEvent> {
        Err(Error::UnimplementedStub("next_gesture_event"))
    }

    fn stub_flush(&self) {}

    fn stub_sync(&self) -> Result<()> {
        Ok(())
    }

    fn stub_numlock_mask(&self) -> ModMask {
        ModMask::MOD2
    }

    fn stub_refresh_keyboard_mapping(&self) -> Result<()> {
        Ok(())
    }

    fn stub_client_geometry(&self, client: Xid) -> Result<Rect> {
        Ok(Rect::new(0, 0, 400, 300))
    }

    fn stub_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        Ok(WindowAttributes::new(Rect::new(0, 0, 400, 300), 0))
    }

    fn stub_existing_clients(&self) -> Result<Vec<Xid>> {
        Ok(vec![])
    }

    fn stub_text_prop(&self, win: Xid, atom: Atom) -> Result<Option<String>> {
        Ok(None)
    }

    fn stub_size_hints(&self, client: Xid) -> Result<SizeHints> {
        Ok(SizeHints::default())
    }

    fn stub_urgency_hint(&self, client: Xid) -> Result<bool> {
        Ok(false)
    }

    fn stub_transient_for(&self, client: Xid) -> Result<Option<Xid>> {
        Ok(None)
    }

    fn stub_get_wm_state(&self, client: Xid) -> Result<Option<WmState>> {
        Ok(None)
    }

    fn stub_supports_protocol(&self, client: Xid, proto: Atom) -> Result<bool> {
        Ok(false)
    }

    fn stub_select_client_events(&self, client: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_map_client(&self, client: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_position_client(&self, client: Xid, r: Rect, bw: u32) -> Result<()> {
        Ok(())
    }

    fn stub_move_client(&self, client: Xid, p: Point) -> Result<()> {
        Ok(())
    }

    fn stub_set_border_width(&self, client: Xid, bw: u32) -> Result<()> {
        Ok(())
    }

    fn stub_set_border_color(&self, client: Xid, color: Color) -> Result<()> {
        Ok(())
    }

    fn stub_raise_client(&self, client: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_stack_below(&self, client: Xid, sibling: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_send_configure_notify(&self, client: Xid, r: Rect, bw: u32) -> Result<()> {
        Ok(())
    }

    fn stub_configure_unmanaged(&self, ev: &ConfigureRequestEvent) -> Result<()> {
        Ok(())
    }

    fn stub_set_input_focus(&self, win: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_set_wm_state(&self, client: Xid, state: WmState) -> Result<()> {
        Ok(())
    }

    fn stub_set_fullscreen_prop(&self, client: Xid, fullscreen: bool) -> Result<()> {
        Ok(())
    }

    fn stub_clear_urgency_hint(&self, client: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_send_protocol_message(&self, client: Xid, proto: Atom) -> Result<()> {
        Ok(())
    }

    fn stub_kill_client(&self, client: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_release_client(&self, client: Xid, bw: u32) -> Result<()> {
        Ok(())
    }

    fn stub_grab_keys(&self, keys: &[KeyCode]) -> Result<()> {
        Ok(())
    }

    fn stub_grab_client_buttons(
        &self,
        client: Xid,
        focused: bool,
        buttons: &[ButtonSpec],
    ) -> Result<()> {
        Ok(())
    }

    fn stub_grab_pointer(&self, shape: PointerShape) -> Result<bool> {
        Ok(true)
    }

    fn stub_ungrab_pointer(&self) -> Result<()> {
        Ok(())
    }

    fn stub_warp_pointer(&self, win: Xid, x: i16, y: i16) -> Result<()> {
        Ok(())
    }

    fn stub_drain_enter_events(&self) -> Result<()> {
        Ok(())
    }

    fn stub_create_bar_window(&self, r: Rect) -> Result<Xid> {
        Ok(Xid(999))
    }

    fn stub_destroy_window(&self, win: Xid) -> Result<()> {
        Ok(())
    }

    fn stub_move_resize_window(&self, win: Xid, r: Rect) -> Result<()> {
        Ok(())
    }

    fn stub_text_width(&self, text: &str) -> u32 {
        10 * text.chars().count() as u32 + 10
    }

    fn stub_bar_height(&self) -> u32 {
        18
    }

    fn stub_draw_bar(
        &self,
        bar: Xid,
        width: u32,
        norm: ColorScheme,
        sel: ColorScheme,
        segments: &[Segment],
    ) -> Result<()> {
        Ok(())
    }
}

impl<T> XConn for T
where
    T: StubXConn,
{
    fn root(&self) -> Xid {
        self.stub_root()
    }

    fn display_rect(&self) -> Rect {
        self.stub_display_rect()
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        self.stub_screen_details()
    }

    fn cursor_position(&self) -> Result<Point> {
        self.stub_cursor_position()
    }

    fn next_event(&self) -> Result<XEvent> {
        self.stub_next_event()
    }

    fn next_gesture_event(&self) -> Result<XEvent> {
        self.stub_next_gesture_event()
    }

    fn flush(&self) {
        self.stub_flush()
    }

    fn sync(&self) -> Result<()> {
        self.stub_sync()
    }

    fn numlock_mask(&self) -> ModMask {
        self.stub_numlock_mask()
    }

    fn refresh_keyboard_mapping(&self) -> Result<()> {
        self.stub_refresh_keyboard_mapping()
    }

    fn client_geometry(&self, client: Xid) -> Result<Rect> {
        self.stub_client_geometry(client)
    }

    fn window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        self.stub_window_attributes(client)
    }

    fn existing_clients(&self) -> Result<Vec<Xid>> {
        self.stub_existing_clients()
    }

    fn text_prop(&self, win: Xid, atom: Atom) -> Result<Option<String>> {
        self.stub_text_prop(win, atom)
    }

    fn size_hints(&self, client: Xid) -> Result<SizeHints> {
        self.stub_size_hints(client)
    }

    fn urgency_hint(&self, client: Xid) -> Result<bool> {
        self.stub_urgency_hint(client)
    }

    fn transient_for(&self, client: Xid) -> Result<Option<Xid>> {
        self.stub_transient_for(client)
    }

    fn get_wm_state(&self, client: Xid) -> Result<Option<WmState>> {
        self.stub_get_wm_state(client)
    }

    fn supports_protocol(&self, client: Xid, proto: Atom) -> Result<bool> {
        self.stub_supports_protocol(client, proto)
    }

    fn select_client_events(&self, client: Xid) -> Result<()> {
        self.stub_select_client_events(client)
    }

    fn map_client(&self, client: Xid) -> Result<()> {
        self.stub_map_client(client)
    }

    fn position_client(&self, client: Xid, r: Rect, bw: u32) -> Result<()> {
        self.stub_position_client(client, r, bw)
    }

    fn move_client(&self, client: Xid, p: Point) -> Result<()> {
        self.stub_move_client(client, p)
    }

    fn set_border_width(&self, client: Xid, bw: u32) -> Result<()> {
        self.stub_set_border_width(client, bw)
    }

    fn set_border_color(&self, client: Xid, color: Color) -> Result<()> {
        self.stub_set_border_color(client, color)
    }

    fn raise_client(&self, client: Xid) -> Result<()> {
        self.stub_raise_client(client)
    }

    fn stack_below(&self, client: Xid, sibling: Xid) -> Result<()> {
        self.stub_stack_below(client, sibling)
    }

    fn send_configure_notify(&self, client: Xid, r: Rect, bw: u32) -> Result<()> {
        self.stub_send_configure_notify(client, r, bw)
    }

    fn configure_unmanaged(&self, ev: &ConfigureRequestEvent) -> Result<()> {
        self.stub_configure_unmanaged(ev)
    }

    fn set_input_focus(&self, win: Xid) -> Result<()> {
        self.stub_set_input_focus(win)
    }

    fn set_wm_state(&self, client: Xid, state: WmState) -> Result<()> {
        self.stub_set_wm_state(client, state)
    }

    fn set_fullscreen_prop(&self, client: Xid, fullscreen: bool) -> Result<()> {
        self.stub_set_fullscreen_prop(client, fullscreen)
    }

    fn clear_urgency_hint(&self, client: Xid) -> Result<()> {
        self.stub_clear_urgency_hint(client)
    }

    fn send_protocol_message(&self, client: Xid, proto: Atom) -> Result<()> {
        self.stub_send_protocol_message(client, proto)
    }

    fn kill_client(&self, client: Xid) -> Result<()> {
        self.stub_kill_client(client)
    }

    fn release_client(&self, client: Xid, bw: u32) -> Result<()> {
        self.stub_release_client(client, bw)
    }

    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()> {
        self.stub_grab_keys(keys)
    }

    fn grab_client_buttons(
        &self,
        client: Xid,
        focused: bool,
        buttons: &[ButtonSpec],
    ) -> Result<()> {
        self.stub_grab_client_buttons(client, focused, buttons)
    }

    fn grab_pointer(&self, shape: PointerShape) -> Result<bool> {
        self.stub_grab_pointer(shape)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.stub_ungrab_pointer()
    }

    fn warp_pointer(&self, win: Xid, x: i16, y: i16) -> Result<()> {
        self.stub_warp_pointer(win, x, y)
    }

    fn drain_enter_events(&self) -> Result<()> {
        self.stub_drain_enter_events()
    }

    fn create_bar_window(&self, r: Rect) -> Result<Xid> {
        self.stub_create_bar_window(r)
    }

    fn destroy_window(&self, win: Xid) -> Result<()> {
        self.stub_destroy_window(win)
    }

    fn move_resize_window(&self, win: Xid, r: Rect) -> Result<()> {
        self.stub_move_resize_window(win, r)
    }

    fn text_width(&self, text: &str) -> u32 {
        self.stub_text_width(text)
    }

    fn bar_height(&self) -> u32 {
        self.stub_bar_height()
    }

    fn draw_bar(
        &self,
        bar: Xid,
        width: u32,
        norm: ColorScheme,
        sel: ColorScheme,
        segments: &[Segment],
    ) -> Result<()> {
        self.stub_draw_bar(bar, width, norm, sel, segments)
    }
}
