//! Per-monitor state: screen geometry, bar placement and the fixed view set
use crate::{
    pure::{geometry::Rect, layout::Layout, view::View},
    Xid,
};

/// The number of views available on every monitor
pub const NUM_VIEWS: usize = 9;

/// A physical or logical screen with its own bar and set of views.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub(crate) num: usize,
    pub(crate) ltsymbol: String,
    pub(crate) screen: Rect,
    pub(crate) window_area: Rect,
    pub(crate) bar_y: i32,
    pub(crate) bar_win: Xid,
    pub(crate) show_bar: bool,
    pub(crate) top_bar: bool,
    pub(crate) sel_view: usize,
    pub(crate) views: [View; NUM_VIEWS],
}

impl Monitor {
    pub(crate) fn new(
        num: usize,
        screen: Rect,
        bar_h: u32,
        show_bar: bool,
        top_bar: bool,
        mfact: f64,
        layout: Layout,
    ) -> Self {
        let mut m = Self {
            num,
            ltsymbol: layout.symbol().to_owned(),
            screen,
            window_area: screen,
            bar_y: 0,
            bar_win: Xid(0),
            show_bar,
            top_bar,
            sel_view: 0,
            views: std::array::from_fn(|_| View::new(mfact, layout)),
        };
        m.update_bar_pos(bar_h);

        m
    }

    /// The ordinal of this monitor in discovery order
    pub fn num(&self) -> usize {
        self.num
    }

    /// The full screen rect of this monitor
    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// The screen rect minus the bar strip
    pub fn window_area(&self) -> Rect {
        self.window_area
    }

    /// The y position of the bar window
    pub fn bar_y(&self) -> i32 {
        self.bar_y
    }

    /// The window ID of this monitor's bar
    pub fn bar_win(&self) -> Xid {
        self.bar_win
    }

    /// Whether the bar is currently shown
    pub fn show_bar(&self) -> bool {
        self.show_bar
    }

    /// The layout symbol to display in the bar
    pub fn layout_symbol(&self) -> &str {
        &self.ltsymbol
    }

    /// The index of the currently selected view
    pub fn selected_view_index(&self) -> usize {
        self.sel_view
    }

    /// The currently selected view
    pub fn selected_view(&self) -> &View {
        &self.views[self.sel_view]
    }

    pub(crate) fn selected_view_mut(&mut self) -> &mut View {
        &mut self.views[self.sel_view]
    }

    /// A specific view by index
    pub fn view(&self, ix: usize) -> &View {
        &self.views[ix]
    }

    /// The selected client of the selected view
    pub fn focused(&self) -> Option<Xid> {
        self.selected_view().focused()
    }

    /// Recompute the window area and bar position from the screen rect.
    ///
    /// The work area equals the screen when the bar is hidden; otherwise it
    /// excludes a strip of `bar_h` pixels at the top or bottom.
    pub(crate) fn update_bar_pos(&mut self, bar_h: u32) {
        self.window_area = self.screen;
        if self.show_bar {
            self.window_area.h = self.screen.h - bar_h;
            if self.top_bar {
                self.bar_y = self.screen.y;
                self.window_area.y = self.screen.y + bar_h as i32;
            } else {
                self.bar_y = self.window_area.bottom();
            }
        } else {
            self.bar_y = -(bar_h as i32);
        }
    }

    /// The rect the bar window should occupy
    pub fn bar_rect(&self, bar_h: u32) -> Rect {
        Rect::new(self.window_area.x, self.bar_y, self.window_area.w, bar_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    const SCREEN: Rect = Rect::new(0, 0, 1920, 1080);
    const OFFSET_SCREEN: Rect = Rect::new(1920, 100, 1280, 1024);

    #[test_case(SCREEN, true, true, Rect::new(0, 18, 1920, 1062), 0; "top bar")]
    #[test_case(SCREEN, true, false, Rect::new(0, 0, 1920, 1062), 1062; "bottom bar")]
    #[test_case(SCREEN, false, true, SCREEN, -18; "hidden bar")]
    #[test_case(OFFSET_SCREEN, true, true, Rect::new(1920, 118, 1280, 1006), 100; "top bar offset screen")]
    #[test_case(OFFSET_SCREEN, true, false, Rect::new(1920, 100, 1280, 1006), 1106; "bottom bar offset screen")]
    #[test]
    fn bar_positioning(screen: Rect, show: bool, top: bool, expected_wa: Rect, expected_by: i32) {
        let m = Monitor::new(0, screen, 18, show, top, 0.55, Layout::Tile);

        assert_eq!(m.window_area(), expected_wa);
        assert_eq!(m.bar_y(), expected_by);
    }

    #[test]
    fn work_area_equals_screen_without_bar() {
        let m = Monitor::new(0, SCREEN, 18, false, true, 0.55, Layout::Tile);

        assert_eq!(m.window_area(), m.screen());
    }

    #[test]
    fn every_view_starts_with_the_default_layout_and_mfact() {
        let m = Monitor::new(0, SCREEN, 18, true, true, 0.62, Layout::Monocle);

        assert!(m.views.iter().all(|v| v.mfact() == 0.62));
        assert!(m.views.iter().all(|v| v.layout() == Layout::Monocle));
        assert_eq!(m.selected_view_index(), 0);
    }
}
