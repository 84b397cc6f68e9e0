//! Interactive move and resize gestures.
//!
//! Both gestures grab the pointer and run an inner event loop: map,
//! configure and expose events are dispatched to their normal handlers so
//! the rest of the UI stays live, motion drives the gesture and the first
//! button release ends it. If the client's center lands on a different
//! monitor it is handed over there.
use crate::{
    core::{
        self, actions,
        State,
    },
    pure::geometry::{Point, Rect},
    x::{PointerShape, XConn, XEvent},
    Result, Xid,
};
use tracing::trace;

/// Drag the focused client with the pointer, snapping to work area edges
/// and promoting tiled clients to floating once dragged past the snap
/// threshold.
pub(crate) fn move_with_pointer<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    let id = match state.client_set.focused_client() {
        Some(id) => id,
        None => return Ok(()),
    };
    let mon = state.client_set.selected_monitor_index();
    core::restack(state, x, mon)?;

    let (ocx, ocy) = {
        let r = state.client_set.client(id).expect("focused client").rect();
        (r.x, r.y)
    };

    if !x.grab_pointer(PointerShape::Move)? {
        return Ok(());
    }
    let origin = x.cursor_position()?;
    trace!(%id, ?origin, "starting interactive move");

    loop {
        match x.next_gesture_event()? {
            XEvent::ConfigureRequest(e) => core::handle_configure_request(state, x, &e)?,
            XEvent::Expose(e) => core::handle_expose(state, x, e)?,
            XEvent::MapRequest(w) => core::handle_map_request(state, x, w)?,
            XEvent::MotionNotify(p) => {
                drag_to(state, x, id, ocx + (p.x - origin.x), ocy + (p.y - origin.y))?;
            }
            XEvent::ButtonRelease => break,
            _ => (),
        }
    }

    x.ungrab_pointer()?;
    hand_over_if_crossed(state, x, id)
}

fn drag_to<X: XConn>(state: &mut State, x: &X, id: Xid, mut nx: i32, mut ny: i32) -> Result<()> {
    let snap = state.config.snap as i32;
    let wa = state.client_set.selected_monitor().window_area();
    let arranges = state
        .client_set
        .selected_monitor()
        .selected_view()
        .layout()
        .arranges();
    let (rect, outer_w, outer_h, floating) = match state.client_set.client(id) {
        Some(c) => (
            c.rect(),
            c.outer_w() as i32,
            c.outer_h() as i32,
            c.is_floating(),
        ),
        None => return Ok(()),
    };

    if snap > 0 && wa.x <= nx && nx <= wa.right() && wa.y <= ny && ny <= wa.bottom() {
        if (wa.x - nx).abs() < snap {
            nx = wa.x;
        } else if (wa.right() - (nx + outer_w)).abs() < snap {
            nx = wa.right() - outer_w;
        }
        if (wa.y - ny).abs() < snap {
            ny = wa.y;
        } else if (wa.bottom() - (ny + outer_h)).abs() < snap {
            ny = wa.bottom() - outer_h;
        }

        if !floating && arranges && ((nx - rect.x).abs() > snap || (ny - rect.y).abs() > snap) {
            actions::toggle_floating_impl(state, x)?;
        }
    }

    let floating = state
        .client_set
        .client(id)
        .map(|c| c.is_floating())
        .unwrap_or(false);
    if floating || !arranges {
        if let Some(r) = state.client_set.client(id).map(|c| c.rect()) {
            core::apply_resize(state, x, id, Rect::new(nx, ny, r.w, r.h), true)?;
        }
    }

    Ok(())
}

/// Resize the focused client by dragging its bottom-right corner with the
/// pointer.
pub(crate) fn resize_with_pointer<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    let id = match state.client_set.focused_client() {
        Some(id) => id,
        None => return Ok(()),
    };
    let mon = state.client_set.selected_monitor_index();
    core::restack(state, x, mon)?;

    let (ocx, ocy) = {
        let r = state.client_set.client(id).expect("focused client").rect();
        (r.x, r.y)
    };

    if !x.grab_pointer(PointerShape::Resize)? {
        return Ok(());
    }
    warp_to_corner(state, x, id)?;
    trace!(%id, "starting interactive resize");

    loop {
        match x.next_gesture_event()? {
            XEvent::ConfigureRequest(e) => core::handle_configure_request(state, x, &e)?,
            XEvent::Expose(e) => core::handle_expose(state, x, e)?,
            XEvent::MapRequest(w) => core::handle_map_request(state, x, w)?,
            XEvent::MotionNotify(p) => resize_to(state, x, id, ocx, ocy, p)?,
            XEvent::ButtonRelease => break,
            _ => (),
        }
    }

    warp_to_corner(state, x, id)?;
    x.ungrab_pointer()?;
    x.drain_enter_events()?;
    hand_over_if_crossed(state, x, id)
}

fn resize_to<X: XConn>(state: &mut State, x: &X, id: Xid, ocx: i32, ocy: i32, p: Point) -> Result<()> {
    let snap = state.config.snap as i32;
    let wa = state.client_set.selected_monitor().window_area();
    let arranges = state
        .client_set
        .selected_monitor()
        .selected_view()
        .layout()
        .arranges();
    let (rect, bw, floating) = match state.client_set.client(id) {
        Some(c) => (c.rect(), c.border_width() as i32, c.is_floating()),
        None => return Ok(()),
    };

    // absolute pointer position maps to the new size, floored at 1x1
    let nw = std::cmp::max(p.x - ocx - 2 * bw + 1, 1);
    let nh = std::cmp::max(p.y - ocy - 2 * bw + 1, 1);

    if snap > 0 && wa.x <= nw && nw <= wa.right() && wa.y <= nh && nh <= wa.bottom() {
        let (dw, dh) = (nw - rect.w as i32, nh - rect.h as i32);
        if !floating && arranges && (dw.abs() > snap || dh.abs() > snap) {
            actions::toggle_floating_impl(state, x)?;
        }
    }

    let floating = state
        .client_set
        .client(id)
        .map(|c| c.is_floating())
        .unwrap_or(false);
    if floating || !arranges {
        core::apply_resize(
            state,
            x,
            id,
            Rect::new(rect.x, rect.y, nw as u32, nh as u32),
            true,
        )?;
    }

    Ok(())
}

fn warp_to_corner<X: XConn>(state: &State, x: &X, id: Xid) -> Result<()> {
    let c = match state.client_set.client(id) {
        Some(c) => c,
        None => return Ok(()),
    };
    let (w, h, bw) = (c.rect().w as i16, c.rect().h as i16, c.border_width() as i16);

    x.warp_pointer(id, w + bw - 1, h + bw - 1)
}

// After a gesture the client may have been dragged onto another monitor:
// transfer it there and follow with the focus.
fn hand_over_if_crossed<X: XConn>(state: &mut State, x: &X, id: Xid) -> Result<()> {
    let center = match state.client_set.client(id) {
        Some(c) => c.center(),
        None => return Ok(()),
    };

    let target = state.client_set.monitor_at_point(center);
    if target != state.client_set.selected_monitor_index() {
        core::send_to_monitor(state, x, id, target)?;
        state.client_set.set_selected_monitor(target);
        core::focus(state, x, None)?;
    }

    Ok(())
}
