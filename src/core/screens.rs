//! Reacting to monitors appearing, disappearing and changing shape
use crate::{
    core::State,
    x::XConn,
    Result, Xid,
};
use tracing::{debug, info};

/// Re-query the screen layout and reshape the monitor list to match.
///
/// Returns whether anything changed. On change, bar windows are created or
/// repositioned as needed and the selected monitor becomes whichever one
/// holds the pointer.
pub(crate) fn update_monitors<X: XConn>(state: &mut State, x: &X) -> Result<bool> {
    let screens = x.screen_details()?;
    debug!(?screens, "screen details from the server");

    let (dirty, removed_bars) =
        state
            .client_set
            .reconcile_monitors(&screens, &state.config, state.bar_h);

    if dirty {
        info!(monitors = state.client_set.monitors().len(), "monitor list changed");
        for bar in removed_bars {
            x.destroy_window(bar)?;
        }
        update_bars(state, x)?;

        let p = x.cursor_position()?;
        let mon = state.client_set.monitor_at_point(p);
        state.client_set.set_selected_monitor(mon);
    }

    Ok(dirty)
}

/// Ensure every monitor has a bar window at its current bar position.
pub(crate) fn update_bars<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    let bar_h = state.bar_h;

    for i in 0..state.client_set.monitors.len() {
        let (bar_win, rect) = {
            let m = &state.client_set.monitors[i];
            (m.bar_win(), m.bar_rect(bar_h))
        };

        if bar_win == Xid(0) {
            let win = x.create_bar_window(rect)?;
            state.client_set.monitors[i].bar_win = win;
        } else {
            x.move_resize_window(bar_win, rect)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::bindings::{KeyBindings, MouseBindings},
        pure::geometry::{Point, Rect},
        x::mock::StubXConn,
        Config, Result, WindowManager, Xid,
    };
    use std::cell::RefCell;

    struct ScreenConn {
        screens: RefCell<Vec<Rect>>,
        next_bar: RefCell<u32>,
        destroyed: RefCell<Vec<Xid>>,
        pointer: Point,
    }

    impl ScreenConn {
        fn new(screens: Vec<Rect>) -> Self {
            Self {
                screens: RefCell::new(screens),
                next_bar: RefCell::new(900),
                destroyed: RefCell::new(vec![]),
                pointer: Point::new(5, 5),
            }
        }
    }

    impl StubXConn for ScreenConn {
        fn stub_screen_details(&self) -> Result<Vec<Rect>> {
            Ok(self.screens.borrow().clone())
        }

        fn stub_cursor_position(&self) -> Result<Point> {
            Ok(self.pointer)
        }

        fn stub_create_bar_window(&self, _: Rect) -> Result<Xid> {
            let mut n = self.next_bar.borrow_mut();
            *n += 1;
            Ok(Xid(*n))
        }

        fn stub_destroy_window(&self, win: Xid) -> Result<()> {
            self.destroyed.borrow_mut().push(win);
            Ok(())
        }
    }

    fn manager(screens: Vec<Rect>) -> WindowManager<ScreenConn> {
        let conn = ScreenConn::new(screens);
        WindowManager::new(
            Config::default(),
            KeyBindings::new(),
            MouseBindings::new(),
            conn,
        )
        .unwrap()
    }

    #[test]
    fn each_monitor_gets_its_own_bar_window() {
        let screens = vec![Rect::new(0, 0, 800, 600), Rect::new(800, 0, 800, 600)];
        let mut wm = manager(screens);

        update_bars(&mut wm.state, &wm.x).unwrap();

        let bars: Vec<Xid> = wm
            .state
            .client_set
            .monitors()
            .iter()
            .map(|m| m.bar_win())
            .collect();
        assert_eq!(bars, vec![Xid(901), Xid(902)]);
    }

    #[test]
    fn removing_a_screen_destroys_its_bar() {
        let screens = vec![Rect::new(0, 0, 800, 600), Rect::new(800, 0, 800, 600)];
        let mut wm = manager(screens);
        update_bars(&mut wm.state, &wm.x).unwrap();

        wm.x.screens.borrow_mut().truncate(1);
        let dirty = update_monitors(&mut wm.state, &wm.x).unwrap();

        assert!(dirty);
        assert_eq!(wm.state.client_set.monitors().len(), 1);
        assert_eq!(*wm.x.destroyed.borrow(), vec![Xid(902)]);
    }

    #[test]
    fn unchanged_screens_are_clean() {
        let screens = vec![Rect::new(0, 0, 800, 600)];
        let mut wm = manager(screens);
        update_bars(&mut wm.state, &wm.x).unwrap();

        let dirty = update_monitors(&mut wm.state, &wm.x).unwrap();

        assert!(!dirty);
    }
}
