//! The aggregate pure state of the window manager.
//!
//! A [ClientSet] owns every monitor (and through them, every view) plus a
//! registry of all managed clients keyed by window ID. The view lists hold
//! only IDs; the registry holds the data. Every state transition the window
//! manager performs is a method here, which is what keeps the invariants
//! (one view per client, focus stack head == selected client) in a single
//! place that can be tested without an X server.
use crate::{
    config::Config,
    pure::{
        client::Client,
        geometry::{Point, Rect},
        monitor::{Monitor, NUM_VIEWS},
    },
    Error, Result, Xid,
};
use std::collections::HashMap;

/// Parameters threaded through every hint-aware resize.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResizeContext {
    /// Full X display geometry, used to bound interactive moves
    pub(crate) display: Rect,
    /// Bar height: the minimum useful client dimension
    pub(crate) bar_h: u32,
    /// Whether size hints are honored for tiled clients
    pub(crate) honor_hints: bool,
}

/// The pure window manager state: monitors, views and the client registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSet {
    pub(crate) monitors: Vec<Monitor>,
    pub(crate) sel_mon: usize,
    pub(crate) clients: HashMap<Xid, Client>,
}

impl ClientSet {
    /// Build the initial state for the given screen geometries.
    ///
    /// Returns [Error::NoScreens] when no usable screen is reported.
    pub fn new(screens: Vec<Rect>, config: &Config, bar_h: u32) -> Result<Self> {
        let mut cs = Self {
            monitors: Vec::new(),
            sel_mon: 0,
            clients: HashMap::new(),
        };

        let (dirty, _) = cs.reconcile_monitors(&screens, config, bar_h);
        if !dirty || cs.monitors.is_empty() {
            return Err(Error::NoScreens);
        }

        Ok(cs)
    }

    // monitor access

    /// All monitors in discovery order
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// The index of the focused monitor
    pub fn selected_monitor_index(&self) -> usize {
        self.sel_mon
    }

    /// The focused monitor
    pub fn selected_monitor(&self) -> &Monitor {
        &self.monitors[self.sel_mon]
    }

    pub(crate) fn selected_monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.sel_mon]
    }

    pub(crate) fn set_selected_monitor(&mut self, ix: usize) {
        if ix < self.monitors.len() {
            self.sel_mon = ix;
        }
    }

    /// The first monitor whose work area contains the given point, falling
    /// back to the selected monitor.
    pub fn monitor_at_point(&self, p: Point) -> usize {
        self.monitors
            .iter()
            .position(|m| m.window_area.contains_point(p))
            .unwrap_or(self.sel_mon)
    }

    /// The monitor owning the given bar window, if any
    pub fn monitor_with_bar(&self, win: Xid) -> Option<usize> {
        self.monitors.iter().position(|m| m.bar_win == win)
    }

    // client access

    /// Whether the given window is managed
    pub fn contains(&self, id: Xid) -> bool {
        self.clients.contains_key(&id)
    }

    /// Look up a managed client by window ID
    pub fn client(&self, id: Xid) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub(crate) fn client_mut(&mut self, id: Xid) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// The monitor index owning the given client
    pub fn monitor_of(&self, id: Xid) -> Option<usize> {
        self.clients.get(&id).map(|c| c.mon)
    }

    /// The selected client: head of the focus stack of the selected view of
    /// the selected monitor.
    pub fn focused_client(&self) -> Option<Xid> {
        self.selected_monitor().focused()
    }

    /// Iterate over all managed clients in arbitrary order
    pub fn iter_clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// The number of managed clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether any clients are managed at all
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    // membership transitions

    /// Insert a new client into the lists of its (monitor, view) pair.
    ///
    /// The client list keeps creation order; the newcomer becomes the head
    /// of the view's focus stack.
    pub(crate) fn insert(&mut self, c: Client) {
        let (id, mon, view) = (c.id, c.mon, c.view);
        self.clients.insert(id, c);
        self.monitors[mon].views[view].attach(id);
    }

    /// Remove a client from state entirely, returning its record.
    pub(crate) fn remove(&mut self, id: Xid) -> Option<Client> {
        let c = self.clients.remove(&id)?;
        self.monitors[c.mon].views[c.view].detach(id);

        Some(c)
    }

    /// Move a client to the head of its view's focus stack.
    pub(crate) fn promote_focus(&mut self, id: Xid) {
        if let Some(c) = self.clients.get(&id) {
            self.monitors[c.mon].views[c.view].promote_focus(id);
        }
    }

    /// Move a client to the head of its view's client list (new master).
    pub(crate) fn promote_client(&mut self, id: Xid) {
        if let Some(c) = self.clients.get(&id) {
            self.monitors[c.mon].views[c.view].promote_client(id);
        }
    }

    /// Move a client to another view on its current monitor.
    pub(crate) fn move_to_view(&mut self, id: Xid, view: usize) {
        if view >= NUM_VIEWS {
            return;
        }

        if let Some(c) = self.clients.get_mut(&id) {
            let (mon, old) = (c.mon, c.view);
            if old == view {
                return;
            }
            c.view = view;
            self.monitors[mon].views[old].detach(id);
            self.monitors[mon].views[view].attach(id);
        }
    }

    /// Move a client to the selected view of another monitor.
    pub(crate) fn move_to_monitor(&mut self, id: Xid, mon: usize) {
        if mon >= self.monitors.len() {
            return;
        }

        if let Some(c) = self.clients.get_mut(&id) {
            let (old_mon, old_view) = (c.mon, c.view);
            if old_mon == mon {
                return;
            }
            c.mon = mon;
            c.view = self.monitors[mon].sel_view;
            let view = c.view;
            self.monitors[old_mon].views[old_view].detach(id);
            self.monitors[mon].views[view].attach(id);
        }
    }

    /// Select a view on the focused monitor.
    pub(crate) fn select_view(&mut self, view: usize) {
        if view < NUM_VIEWS {
            self.selected_monitor_mut().sel_view = view;
        }
    }

    /// Adjust the selected view's master fraction by `delta`, keeping it
    /// within [0.1, 0.9]. Deltas outside (-1.0, 1.0) and floating layouts
    /// are ignored. Returns whether the fraction changed.
    pub(crate) fn bump_mfact(&mut self, delta: f64) -> bool {
        let v = self.selected_monitor_mut().selected_view_mut();
        if !v.layout.arranges() || delta <= -1.0 || delta >= 1.0 {
            return false;
        }

        let f = v.mfact + delta;
        if (0.1..=0.9).contains(&f) && f != v.mfact {
            v.mfact = f;
            return true;
        }

        false
    }

    // derived views of the state

    /// The selected view's clients that are positioned by the layout, in
    /// layout order.
    pub fn tiled_clients(&self, mon: usize) -> Vec<Xid> {
        self.monitors[mon]
            .selected_view()
            .clients
            .iter()
            .filter(|id| !self.clients[*id].is_floating)
            .copied()
            .collect()
    }

    /// The selected view's clients in most-recently-focused order.
    pub fn visible_stack(&self, mon: usize) -> Vec<Xid> {
        self.monitors[mon].selected_view().stack.clone()
    }

    /// Clients of the monitor that are on a deselected view.
    pub fn hidden_clients(&self, mon: usize) -> Vec<Xid> {
        let m = &self.monitors[mon];
        m.views
            .iter()
            .enumerate()
            .filter(|(ix, _)| *ix != m.sel_view)
            .flat_map(|(_, v)| v.clients.iter().copied())
            .collect()
    }

    /// Whether any client of the given view has raised the urgency hint.
    pub fn view_has_urgent(&self, mon: usize, view: usize) -> bool {
        self.monitors[mon].views[view]
            .clients
            .iter()
            .any(|id| self.clients[id].is_urgent)
    }

    // geometry

    /// Apply the constraint rules of [Client::constrained] to a proposed
    /// rect and store the result, reporting whether anything changed. The
    /// caller uses the result to skip spurious configure requests.
    pub(crate) fn resize_client(
        &mut self,
        id: Xid,
        proposed: Rect,
        ctx: &ResizeContext,
        interact: bool,
    ) -> bool {
        let mon_rect = match self.clients.get(&id) {
            Some(c) => self.monitors[c.mon].screen,
            None => return false,
        };

        let c = self.clients.get_mut(&id).expect("checked above");
        let new = c.constrained(
            proposed,
            ctx.display,
            mon_rect,
            ctx.bar_h,
            ctx.honor_hints,
            interact,
        );

        if new != c.rect {
            c.rect = new;
            true
        } else {
            false
        }
    }

    /// Run the selected view's layout for a monitor, refreshing the bar
    /// symbol, and return the clients whose geometry changed.
    pub(crate) fn arrange_monitor(&mut self, mon: usize, ctx: &ResizeContext) -> Vec<Xid> {
        let layout = self.monitors[mon].selected_view().layout;
        self.monitors[mon].ltsymbol = layout.symbol().to_owned();

        if layout == crate::pure::Layout::Monocle {
            let n = self.monitors[mon].selected_view().clients.len();
            if n > 0 {
                self.monitors[mon].ltsymbol = format!("[{n}]");
            }
        }

        layout.arrange(self, mon, ctx)
    }

    // monitor topology

    /// Reshape the monitor list to match the given screen geometries.
    ///
    /// Screens are deduplicated by exact geometry. Extra screens grow the
    /// monitor list; missing screens shrink it from the tail, rehoming every
    /// client of a removed monitor to the same view index on the first
    /// monitor. Returns whether anything changed plus the bar windows of any
    /// removed monitors so the caller can destroy them.
    pub(crate) fn reconcile_monitors(
        &mut self,
        screens: &[Rect],
        config: &Config,
        bar_h: u32,
    ) -> (bool, Vec<Xid>) {
        let mut unique: Vec<Rect> = Vec::with_capacity(screens.len());
        for r in screens {
            if !unique.contains(r) {
                unique.push(*r);
            }
        }

        let mut dirty = false;
        let mut removed_bars = Vec::new();
        let n = self.monitors.len();
        let nn = unique.len();

        if nn == 0 {
            return (false, removed_bars);
        }

        if n <= nn {
            for (i, &r) in unique.iter().enumerate().skip(n) {
                dirty = true;
                self.monitors.push(Monitor::new(
                    i,
                    r,
                    bar_h,
                    config.show_bar,
                    config.top_bar,
                    config.mfact,
                    config.layouts[0],
                ));
            }
            for (i, &r) in unique.iter().enumerate().take(n) {
                let m = &mut self.monitors[i];
                if m.screen != r {
                    dirty = true;
                    m.num = i;
                    m.screen = r;
                    m.update_bar_pos(bar_h);
                }
            }
        } else {
            for i in (nn..n).rev() {
                dirty = true;
                for view in 0..NUM_VIEWS {
                    while let Some(&id) = self.monitors[i].views[view].clients.first() {
                        self.monitors[i].views[view].detach(id);
                        self.monitors[0].views[view].attach_front(id);
                        if let Some(c) = self.clients.get_mut(&id) {
                            c.mon = 0;
                        }
                    }
                }
                let m = self.monitors.remove(i);
                if m.bar_win != Xid(0) {
                    removed_bars.push(m.bar_win);
                }
            }
        }

        if dirty {
            self.sel_mon = 0;
        }

        (dirty, removed_bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::Layout;
    use quickcheck_macros::quickcheck;
    use simple_test_case::test_case;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.show_bar = false;

        config
    }

    fn test_set(screens: &[Rect]) -> ClientSet {
        ClientSet::new(screens.to_vec(), &test_config(), 18).unwrap()
    }

    fn add_client(cs: &mut ClientSet, id: u32, mon: usize) {
        let view = cs.monitors[mon].sel_view;
        cs.insert(Client::new(
            Xid(id),
            Rect::new(0, 0, 100, 100),
            1,
            mon,
            view,
        ));
    }

    // Every managed client appears in exactly one view's lists, exactly
    // once, and always in both the client list and the focus stack of that
    // view.
    fn assert_membership_invariant(cs: &ClientSet) {
        for c in cs.iter_clients() {
            let mut list_hits = 0;
            let mut stack_hits = 0;
            for m in cs.monitors() {
                for v in m.views.iter() {
                    list_hits += v.clients.iter().filter(|&&id| id == c.id).count();
                    stack_hits += v.stack.iter().filter(|&&id| id == c.id).count();
                }
            }
            assert_eq!(list_hits, 1, "client {} in {} lists", c.id, list_hits);
            assert_eq!(stack_hits, 1, "client {} in {} stacks", c.id, stack_hits);

            let v = &cs.monitors[c.mon].views[c.view];
            assert!(v.contains(c.id), "client {} not where it claims", c.id);
        }
    }

    #[test]
    fn new_requires_at_least_one_screen() {
        let res = ClientSet::new(vec![], &test_config(), 18);

        assert!(matches!(res, Err(Error::NoScreens)));
    }

    #[test]
    fn insert_remove_round_trip() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);

        add_client(&mut cs, 1, 0);
        add_client(&mut cs, 2, 0);
        assert_membership_invariant(&cs);
        assert_eq!(cs.focused_client(), Some(Xid(2)));

        let c = cs.remove(Xid(2)).unwrap();
        assert_eq!(c.id(), Xid(2));
        assert_membership_invariant(&cs);
        assert_eq!(cs.focused_client(), Some(Xid(1)));
        assert!(cs.remove(Xid(2)).is_none());
    }

    #[test]
    fn move_to_view_updates_placement_atomically() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);
        add_client(&mut cs, 1, 0);
        add_client(&mut cs, 2, 0);

        cs.move_to_view(Xid(1), 4);

        assert_membership_invariant(&cs);
        let c = cs.client(Xid(1)).unwrap();
        assert_eq!((c.mon, c.view), (0, 4));
        assert!(cs.monitors[0].views[4].contains(Xid(1)));
        assert!(!cs.monitors[0].views[0].contains(Xid(1)));
    }

    #[test]
    fn move_to_monitor_targets_its_selected_view() {
        let screens = [Rect::new(0, 0, 800, 600), Rect::new(800, 0, 800, 600)];
        let mut cs = test_set(&screens);
        cs.monitors[1].sel_view = 3;
        add_client(&mut cs, 1, 0);

        cs.move_to_monitor(Xid(1), 1);

        assert_membership_invariant(&cs);
        let c = cs.client(Xid(1)).unwrap();
        assert_eq!((c.mon, c.view), (1, 3));
    }

    #[test]
    fn out_of_range_moves_are_ignored() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);
        add_client(&mut cs, 1, 0);

        cs.move_to_view(Xid(1), NUM_VIEWS);
        cs.move_to_monitor(Xid(1), 7);

        assert_membership_invariant(&cs);
        let c = cs.client(Xid(1)).unwrap();
        assert_eq!((c.mon, c.view), (0, 0));
    }

    #[test]
    fn promote_focus_tracks_selection() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);
        for id in 1..=3 {
            add_client(&mut cs, id, 0);
        }

        cs.promote_focus(Xid(1));

        assert_eq!(cs.focused_client(), Some(Xid(1)));
        assert_membership_invariant(&cs);
    }

    #[test_case(Point::new(10, 10), 0; "first monitor")]
    #[test_case(Point::new(810, 10), 1; "second monitor")]
    #[test_case(Point::new(5000, 5000), 0; "outside falls back to selected")]
    #[test]
    fn monitor_at_point(p: Point, expected: usize) {
        let screens = [Rect::new(0, 0, 800, 600), Rect::new(800, 0, 800, 600)];
        let cs = test_set(&screens);

        assert_eq!(cs.monitor_at_point(p), expected);
    }

    #[quickcheck]
    fn mfact_stays_in_bounds(deltas: Vec<f64>) -> bool {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);

        for d in deltas {
            // restrict to the (-1, 1) interval the operation accepts
            cs.bump_mfact(d.fract());
            let f = cs.selected_monitor().selected_view().mfact();
            if !(0.1..=0.9).contains(&f) {
                return false;
            }
        }

        true
    }

    #[test]
    fn mfact_is_ignored_for_floating_layouts() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);
        cs.selected_monitor_mut().selected_view_mut().layout = Layout::Float;

        cs.bump_mfact(0.2);

        assert_eq!(cs.selected_monitor().selected_view().mfact(), 0.55);
    }

    #[test]
    fn growing_screens_appends_monitors() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);

        let (dirty, removed) = cs.reconcile_monitors(
            &[Rect::new(0, 0, 800, 600), Rect::new(800, 0, 1024, 768)],
            &test_config(),
            18,
        );

        assert!(dirty);
        assert!(removed.is_empty());
        assert_eq!(cs.monitors.len(), 2);
        assert_eq!(cs.monitors[1].num(), 1);
        assert_eq!(cs.monitors[1].screen(), Rect::new(800, 0, 1024, 768));
    }

    #[test]
    fn duplicate_screen_geometries_collapse() {
        let r = Rect::new(0, 0, 800, 600);
        let cs = test_set(&[r, r, r]);

        assert_eq!(cs.monitors.len(), 1);
    }

    #[test]
    fn geometry_changes_reshape_in_place() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);

        let (dirty, _) = cs.reconcile_monitors(&[Rect::new(0, 0, 1920, 1080)], &test_config(), 18);

        assert!(dirty);
        assert_eq!(cs.monitors.len(), 1);
        assert_eq!(cs.monitors[0].screen(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(cs.monitors[0].window_area(), Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn unchanged_screens_report_clean() {
        let r = Rect::new(0, 0, 800, 600);
        let mut cs = test_set(&[r]);

        let (dirty, _) = cs.reconcile_monitors(&[r], &test_config(), 18);

        assert!(!dirty);
    }

    #[test]
    fn removed_monitors_rehome_clients_to_the_first() {
        let screens = [Rect::new(0, 0, 800, 600), Rect::new(800, 0, 800, 600)];
        let mut cs = test_set(&screens);
        add_client(&mut cs, 1, 0);
        add_client(&mut cs, 2, 1);
        cs.sel_mon = 1;

        let (dirty, _) = cs.reconcile_monitors(&screens[..1], &test_config(), 18);

        assert!(dirty);
        assert_eq!(cs.monitors.len(), 1);
        assert_eq!(cs.sel_mon, 0);
        assert_membership_invariant(&cs);

        // rehomed clients keep their view index and attach at the head
        let v = &cs.monitors[0].views[0];
        assert_eq!(v.clients(), &[Xid(2), Xid(1)]);
        assert_eq!(cs.client(Xid(2)).unwrap().mon, 0);
    }

    #[test]
    fn tiled_clients_excludes_floating() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);
        for id in 1..=3 {
            add_client(&mut cs, id, 0);
        }
        cs.client_mut(Xid(2)).unwrap().is_floating = true;

        assert_eq!(cs.tiled_clients(0), vec![Xid(1), Xid(3)]);
    }

    #[test]
    fn hidden_clients_are_those_on_deselected_views() {
        let mut cs = test_set(&[Rect::new(0, 0, 800, 600)]);
        add_client(&mut cs, 1, 0);
        add_client(&mut cs, 2, 0);
        cs.move_to_view(Xid(1), 5);

        assert_eq!(cs.hidden_clients(0), vec![Xid(1)]);

        cs.select_view(5);
        assert_eq!(cs.hidden_clients(0), vec![Xid(2)]);
    }
}
