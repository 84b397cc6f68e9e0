//! Pre-defined actions for use in user key and mouse bindings
use crate::{
    core::{
        self,
        bindings::{ClickContext, KeyEventHandler, MouseEventHandler},
        mouse, State,
    },
    pure::{monitor::NUM_VIEWS, Layout},
    util,
    x::{Atom, XConn},
    Result, Xid,
};
use tracing::debug;

/// Construct a [KeyEventHandler] from a closure or free function
pub fn key_handler<F, X>(f: F) -> KeyEventHandler<X>
where
    F: FnMut(&mut State, &X) -> Result<()> + 'static,
    X: XConn,
{
    Box::new(f)
}

/// Construct a [MouseEventHandler] from a closure or free function
pub fn mouse_handler<F, X>(f: F) -> MouseEventHandler<X>
where
    F: FnMut(&mut State, &X, &ClickContext) -> Result<()> + 'static,
    X: XConn,
{
    Box::new(f)
}

/// Adapt a key binding action for use as a mouse binding, discarding the
/// click context
pub fn with_ignored_click<X: XConn + 'static>(mut handler: KeyEventHandler<X>) -> MouseEventHandler<X> {
    Box::new(move |s: &mut State, x: &X, _: &ClickContext| handler(s, x))
}

/// Spawn an external program
pub fn spawn<X: XConn>(program: &'static str) -> KeyEventHandler<X> {
    key_handler(move |_, _| util::spawn(program))
}

/// Exit the window manager after the current event
pub fn quit<X: XConn>() -> KeyEventHandler<X> {
    key_handler(|s: &mut State, _| {
        s.running = false;
        Ok(())
    })
}

/// Close the focused client, politely when it participates in
/// WM_DELETE_WINDOW and forcibly otherwise
pub fn kill_focused<X: XConn>() -> KeyEventHandler<X> {
    key_handler(|s: &mut State, x: &X| {
        let id = match s.client_set.focused_client() {
            Some(id) => id,
            None => return Ok(()),
        };

        if x.supports_protocol(id, Atom::WmDeleteWindow)? {
            debug!(%id, "sending WM_DELETE_WINDOW");
            x.send_protocol_message(id, Atom::WmDeleteWindow)
        } else {
            debug!(%id, "client does not support WM_DELETE_WINDOW: killing");
            x.kill_client(id)
        }
    })
}

/// Adjust the selected view's master fraction
pub fn set_mfact<X: XConn>(delta: f64) -> KeyEventHandler<X> {
    key_handler(move |s: &mut State, x: &X| {
        if s.client_set.bump_mfact(delta) {
            let mon = s.client_set.selected_monitor_index();
            core::arrange(s, x, Some(mon))
        } else {
            Ok(())
        }
    })
}

/// Switch the selected view to the given layout
pub fn set_layout<X: XConn>(layout: Layout) -> KeyEventHandler<X> {
    key_handler(move |s: &mut State, x: &X| set_layout_impl(s, x, layout))
}

pub(crate) fn set_layout_impl<X: XConn>(s: &mut State, x: &X, layout: Layout) -> Result<()> {
    let mon = s.client_set.selected_monitor_index();
    let has_focus = {
        let m = s.client_set.selected_monitor_mut();
        m.selected_view_mut().layout = layout;
        m.ltsymbol = layout.symbol().to_owned();
        m.focused().is_some()
    };

    if has_focus {
        core::arrange(s, x, Some(mon))
    } else {
        core::draw_bar(s, x, mon)
    }
}

/// Switch the focused monitor to the given view
pub fn select_view<X: XConn>(view: usize) -> KeyEventHandler<X> {
    key_handler(move |s: &mut State, x: &X| select_view_impl(s, x, view))
}

pub(crate) fn select_view_impl<X: XConn>(s: &mut State, x: &X, view: usize) -> Result<()> {
    let mon = s.client_set.selected_monitor_index();
    if view >= NUM_VIEWS || view == s.client_set.selected_monitor().selected_view_index() {
        return Ok(());
    }

    s.client_set.select_view(view);

    core::arrange(s, x, Some(mon))
}

/// Move the focused client to the given view on its monitor
pub fn move_to_view<X: XConn>(view: usize) -> KeyEventHandler<X> {
    key_handler(move |s: &mut State, x: &X| move_to_view_impl(s, x, view))
}

pub(crate) fn move_to_view_impl<X: XConn>(s: &mut State, x: &X, view: usize) -> Result<()> {
    let id = match s.client_set.focused_client() {
        Some(id) => id,
        None => return Ok(()),
    };
    if view >= NUM_VIEWS {
        return Ok(());
    }

    s.client_set.move_to_view(id, view);
    let mon = s.client_set.selected_monitor_index();

    core::arrange(s, x, Some(mon))
}

/// Cycle the focus through the selected view's client list
pub fn focus_stack<X: XConn>(forward: bool) -> KeyEventHandler<X> {
    key_handler(move |s: &mut State, x: &X| {
        let m = s.client_set.selected_monitor();
        let sel = match m.focused() {
            Some(sel) => sel,
            None => return Ok(()),
        };

        let list = m.selected_view().clients();
        let pos = match list.iter().position(|&id| id == sel) {
            Some(pos) => pos,
            None => return Ok(()),
        };
        let target = if forward {
            list[(pos + 1) % list.len()]
        } else {
            list[(pos + list.len() - 1) % list.len()]
        };

        core::focus(s, x, Some(target))?;
        let mon = s.client_set.selected_monitor_index();
        core::restack(s, x, mon)
    })
}

/// Promote the focused tiled client to master, or the next tiled client
/// when it already is the master
pub fn zoom<X: XConn>() -> KeyEventHandler<X> {
    key_handler(|s: &mut State, x: &X| {
        let mon = s.client_set.selected_monitor_index();
        let m = s.client_set.selected_monitor();
        let layout = m.selected_view().layout();
        if !layout.arranges() || layout == Layout::Monocle {
            return Ok(());
        }

        let sel = match m.focused() {
            Some(sel) => sel,
            None => return Ok(()),
        };
        if s.client_set.client(sel).map(|c| c.is_floating()).unwrap_or(true) {
            return Ok(());
        }

        let tiled = s.client_set.tiled_clients(mon);
        let mut target = sel;
        if tiled.first() == Some(&sel) {
            match tiled.get(1) {
                Some(&next) => target = next,
                None => return Ok(()),
            }
        }

        s.client_set.promote_client(target);
        core::focus(s, x, Some(target))?;

        core::arrange(s, x, Some(mon))
    })
}

/// Show or hide the focused monitor's bar
pub fn toggle_bar<X: XConn>() -> KeyEventHandler<X> {
    key_handler(|s: &mut State, x: &X| {
        let bar_h = s.bar_h;
        let mon = s.client_set.selected_monitor_index();
        let (bar_win, bar_rect) = {
            let m = s.client_set.selected_monitor_mut();
            m.show_bar = !m.show_bar;
            m.update_bar_pos(bar_h);
            (m.bar_win(), m.bar_rect(bar_h))
        };

        if bar_win != Xid(0) {
            x.move_resize_window(bar_win, bar_rect)?;
        }

        core::arrange(s, x, Some(mon))
    })
}

/// Toggle the focused client between tiled and floating, restoring its
/// previous floating geometry on the way out
pub fn toggle_floating<X: XConn>() -> KeyEventHandler<X> {
    key_handler(|s: &mut State, x: &X| toggle_floating_impl(s, x))
}

pub(crate) fn toggle_floating_impl<X: XConn>(s: &mut State, x: &X) -> Result<()> {
    let mon = s.client_set.selected_monitor_index();
    let id = match s.client_set.focused_client() {
        Some(id) => id,
        None => return Ok(()),
    };

    let restore = {
        let c = s.client_set.client_mut(id).expect("focused client in state");
        c.is_floating = !c.is_floating || c.is_fixed();
        if c.is_floating {
            Some(c.saved_float.take().unwrap_or(c.rect))
        } else {
            c.saved_float = Some(c.rect);
            None
        }
    };

    if let Some(rect) = restore {
        core::apply_resize(s, x, id, rect, false)?;
    }

    core::arrange(s, x, Some(mon))
}

/// Focus the next or previous monitor
pub fn focus_monitor<X: XConn>(forward: bool) -> KeyEventHandler<X> {
    key_handler(move |s: &mut State, x: &X| {
        let target = dir_to_mon(s, forward);
        if target == s.client_set.selected_monitor_index() {
            return Ok(());
        }

        if let Some(sel) = s.client_set.focused_client() {
            core::unfocus(s, x, sel, true)?;
        }
        s.client_set.set_selected_monitor(target);

        core::focus(s, x, None)
    })
}

/// Send the focused client to the next or previous monitor
pub fn tag_monitor<X: XConn>(forward: bool) -> KeyEventHandler<X> {
    key_handler(move |s: &mut State, x: &X| {
        let id = match s.client_set.focused_client() {
            Some(id) => id,
            None => return Ok(()),
        };
        let target = dir_to_mon(s, forward);

        core::send_to_monitor(s, x, id, target)
    })
}

fn dir_to_mon(s: &State, forward: bool) -> usize {
    let n = s.client_set.monitors().len();
    let cur = s.client_set.selected_monitor_index();

    if forward {
        (cur + 1) % n
    } else {
        (cur + n - 1) % n
    }
}

// mouse bindings

/// Interactively move the focused client with the pointer
pub fn move_with_mouse<X: XConn>() -> MouseEventHandler<X> {
    mouse_handler(|s: &mut State, x: &X, _: &ClickContext| mouse::move_with_pointer(s, x))
}

/// Interactively resize the focused client with the pointer
pub fn resize_with_mouse<X: XConn>() -> MouseEventHandler<X> {
    mouse_handler(|s: &mut State, x: &X, _: &ClickContext| mouse::resize_with_pointer(s, x))
}

/// Toggle the focused client's floating state from a mouse binding
pub fn toggle_floating_mouse<X: XConn>() -> MouseEventHandler<X> {
    mouse_handler(|s: &mut State, x: &X, _: &ClickContext| toggle_floating_impl(s, x))
}

/// Switch to the view whose tag cell was clicked
pub fn select_clicked_view<X: XConn>() -> MouseEventHandler<X> {
    mouse_handler(|s: &mut State, x: &X, ctx: &ClickContext| match ctx.tag {
        Some(view) => select_view_impl(s, x, view),
        None => Ok(()),
    })
}

/// Move the focused client to the view whose tag cell was clicked
pub fn move_to_clicked_view<X: XConn>() -> MouseEventHandler<X> {
    mouse_handler(|s: &mut State, x: &X, ctx: &ClickContext| match ctx.tag {
        Some(view) => move_to_view_impl(s, x, view),
        None => Ok(()),
    })
}

/// Switch the selected view to the given layout from a mouse binding
pub fn set_layout_mouse<X: XConn>(layout: Layout) -> MouseEventHandler<X> {
    mouse_handler(move |s: &mut State, x: &X, _: &ClickContext| set_layout_impl(s, x, layout))
}
