//! The closed set of layouts used to position tiled clients.
//!
//! Layouts are a tagged enum rather than function pointers: new layouts are
//! added by extending the set. The [Float][Layout::Float] layout is the one
//! with no arrange step; clients keep whatever geometry they last requested.
use crate::{
    pure::{
        client_set::{ClientSet, ResizeContext},
        geometry::Rect,
    },
    Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rule for assigning rectangles to the tiled clients of a view.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Vertical master/stack split: master column on the left, remaining
    /// clients stacked in a column on the right
    Tile,
    /// Horizontal master/stack split: master row on top, remaining clients
    /// side by side below
    MirrorTile,
    /// Every tiled client fills the whole work area
    Monocle,
    /// No arrangement: clients are positioned by the user
    Float,
}

impl Layout {
    /// The symbol shown in the bar while this layout is selected
    pub fn symbol(&self) -> &'static str {
        match self {
            Layout::Tile => "[]=",
            Layout::MirrorTile => "TTT",
            Layout::Monocle => "[M]",
            Layout::Float => "><>",
        }
    }

    /// Whether this layout imposes geometry on tiled clients
    pub fn arranges(&self) -> bool {
        !matches!(self, Layout::Float)
    }

    /// Position the tiled clients of the selected view of monitor `mon`,
    /// returning the ids whose geometry changed.
    pub(crate) fn arrange(
        &self,
        cs: &mut ClientSet,
        mon: usize,
        ctx: &ResizeContext,
    ) -> Vec<Xid> {
        match self {
            Layout::Tile => tile(cs, mon, ctx),
            Layout::MirrorTile => mirror_tile(cs, mon, ctx),
            Layout::Monocle => monocle(cs, mon, ctx),
            Layout::Float => Vec::new(),
        }
    }
}

// Width and height reach resize as signed values: hint application and the
// 1x1 floor happen inside ClientSet::resize_client.
fn proposed(x: i32, y: i32, w: i32, h: i32) -> Rect {
    Rect::new(x, y, std::cmp::max(w, 1) as u32, std::cmp::max(h, 1) as u32)
}

fn tile(cs: &mut ClientSet, mon: usize, ctx: &ResizeContext) -> Vec<Xid> {
    let mut changed = Vec::new();
    let (wa, mfact) = {
        let m = &cs.monitors[mon];
        (m.window_area, m.selected_view().mfact)
    };
    let tiled = cs.tiled_clients(mon);
    let n = tiled.len();
    if n == 0 {
        return changed;
    }

    // master column
    let master = tiled[0];
    let bw = cs.clients[&master].bw as i32;
    let mw = (mfact * wa.w as f64) as i32;
    let master_w = if n == 1 { wa.w as i32 } else { mw };
    if cs.resize_client(
        master,
        proposed(wa.x, wa.y, master_w - 2 * bw, wa.h as i32 - 2 * bw),
        ctx,
        false,
    ) {
        changed.push(master);
    }
    if n == 1 {
        return changed;
    }

    // stack column: the master may have been shrunk by its size hints, in
    // which case the stack absorbs the freed width
    let mr = cs.clients[&master].rect;
    let master_right = mr.x + mr.w as i32 + 2 * bw;
    let stack_n = (n - 1) as i32;
    let x = if wa.x + mw > mr.x + mr.w as i32 {
        master_right
    } else {
        wa.x + mw
    };
    let w = if wa.x + mw > mr.x + mr.w as i32 {
        wa.x + wa.w as i32 - x
    } else {
        wa.w as i32 - mw
    };
    let mut y = wa.y;
    let mut h = wa.h as i32 / stack_n;
    let mut remainder = wa.h as i32 % stack_n;
    if h < ctx.bar_h as i32 {
        h = wa.h as i32;
        remainder = 0;
    }

    for (i, &id) in tiled[1..].iter().enumerate() {
        let bw = cs.clients[&id].bw as i32;
        // the bottom slot absorbs the remaining work area edge exactly
        let slot_h = if i as i32 + 1 == stack_n {
            wa.y + wa.h as i32 - y - 2 * bw
        } else {
            h - 2 * bw
        } + if remainder > 0 { 1 } else { 0 };

        if cs.resize_client(id, proposed(x, y, w - 2 * bw, slot_h), ctx, false) {
            changed.push(id);
        }
        if h != wa.h as i32 {
            let c = &cs.clients[&id];
            y = c.rect.y + c.outer_h() as i32;
        }
        remainder -= 1;
    }

    changed
}

fn mirror_tile(cs: &mut ClientSet, mon: usize, ctx: &ResizeContext) -> Vec<Xid> {
    let mut changed = Vec::new();
    let (wa, screen, mfact) = {
        let m = &cs.monitors[mon];
        (m.window_area, m.screen, m.selected_view().mfact)
    };
    let tiled = cs.tiled_clients(mon);
    let n = tiled.len();
    if n == 0 {
        return changed;
    }

    // master row
    let master = tiled[0];
    let bw = cs.clients[&master].bw as i32;
    let mh = (mfact * wa.h as f64) as i32;
    let master_h = if n == 1 { wa.h as i32 } else { mh };
    if cs.resize_client(
        master,
        proposed(wa.x, wa.y, wa.w as i32 - 2 * bw, master_h - 2 * bw),
        ctx,
        false,
    ) {
        changed.push(master);
    }
    if n == 1 {
        return changed;
    }

    // stack row below the master
    let mr = cs.clients[&master].rect;
    let master_bottom = mr.y + mr.h as i32 + 2 * bw;
    let stack_n = (n - 1) as i32;
    let y = if wa.y + mh > mr.y + mr.h as i32 {
        master_bottom
    } else {
        wa.y + mh
    };
    let h = if wa.y + mh > mr.y + mr.h as i32 {
        wa.y + wa.h as i32 - y
    } else {
        wa.h as i32 - mh
    };
    let mut x = wa.x;
    let w = wa.w as i32 / stack_n;
    let mut remainder = wa.w as i32 % stack_n;

    for (i, &id) in tiled[1..].iter().enumerate() {
        let bw = cs.clients[&id].bw as i32;
        // the final slot runs to the right screen edge exactly
        let slot_w = if i as i32 + 1 == stack_n {
            screen.x + screen.w as i32 - x - 2 * bw
        } else {
            w - 2 * bw
        } + if remainder > 0 { 1 } else { 0 };

        if cs.resize_client(id, proposed(x, y, slot_w, h - 2 * bw), ctx, false) {
            changed.push(id);
        }
        if w != wa.w as i32 {
            let c = &cs.clients[&id];
            x = c.rect.x + c.outer_w() as i32;
        }
        remainder -= 1;
    }

    changed
}

fn monocle(cs: &mut ClientSet, mon: usize, ctx: &ResizeContext) -> Vec<Xid> {
    let mut changed = Vec::new();
    let wa = cs.monitors[mon].window_area;

    for id in cs.tiled_clients(mon) {
        let bw = cs.clients[&id].bw as i32;
        if cs.resize_client(
            id,
            proposed(wa.x, wa.y, wa.w as i32 - 2 * bw, wa.h as i32 - 2 * bw),
            ctx,
            false,
        ) {
            changed.push(id);
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    fn test_set(wa: Rect, n: usize, bw: u32, mfact: f64) -> ClientSet {
        let mut config = Config::default();
        config.show_bar = false;
        config.mfact = mfact;

        let mut cs = ClientSet::new(vec![wa], &config, 18).unwrap();
        for i in 0..n {
            let mut c =
                crate::pure::Client::new(Xid(i as u32 + 1), Rect::new(0, 0, 50, 50), bw, 0, 0);
            c.rect = Rect::new(0, 0, 50, 50);
            cs.insert(c);
        }

        cs
    }

    fn outer_rects(cs: &ClientSet) -> Vec<Rect> {
        cs.tiled_clients(0)
            .iter()
            .map(|id| {
                let c = &cs.clients[id];
                Rect::new(c.rect.x, c.rect.y, c.outer_w(), c.outer_h())
            })
            .collect()
    }

    fn overlaps(a: &Rect, b: &Rect) -> bool {
        a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
    }

    #[derive(Debug, Clone, Copy)]
    struct TileCase {
        n: usize,
        bw: u32,
        w: u32,
        h: u32,
        mfact: f64,
    }

    impl Arbitrary for TileCase {
        fn arbitrary(g: &mut Gen) -> Self {
            TileCase {
                n: 1 + usize::arbitrary(g) % 8,
                bw: u32::arbitrary(g) % 4,
                w: 600 + u32::arbitrary(g) % 1400,
                h: 400 + u32::arbitrary(g) % 1200,
                mfact: 0.1 + (u64::arbitrary(g) % 81) as f64 / 100.0,
            }
        }
    }

    fn assert_exact_cover(case: TileCase, layout: Layout) {
        let wa = Rect::new(0, 0, case.w, case.h);
        let mut cs = test_set(wa, case.n, case.bw, case.mfact);

        let ctx = ResizeContext {
            display: wa,
            bar_h: 18,
            honor_hints: false,
        };
        layout.arrange(&mut cs, 0, &ctx);

        let rects = outer_rects(&cs);
        let total: u64 = rects.iter().map(|r| r.w as u64 * r.h as u64).sum();
        assert_eq!(
            total,
            wa.w as u64 * wa.h as u64,
            "area not covered exactly: {rects:?}"
        );

        for (i, a) in rects.iter().enumerate() {
            assert!(
                a.x >= wa.x && a.y >= wa.y && a.right() <= wa.right() && a.bottom() <= wa.bottom(),
                "client escapes the work area: {a:?}"
            );
            for b in rects.iter().skip(i + 1) {
                assert!(!overlaps(a, b), "overlapping rects: {a:?} {b:?}");
            }
        }
    }

    #[quickcheck]
    fn tile_covers_the_work_area_exactly(case: TileCase) {
        assert_exact_cover(case, Layout::Tile);
    }

    #[quickcheck]
    fn mirror_tile_covers_the_work_area_exactly(case: TileCase) {
        assert_exact_cover(case, Layout::MirrorTile);
    }

    #[test]
    fn tile_remainder_goes_to_the_top_slots() {
        // 1081 work area rows over two stack clients: 541 then 540
        let wa = Rect::new(0, 0, 1920, 1081);
        let mut cs = test_set(wa, 3, 1, 0.55);
        let ctx = ResizeContext {
            display: wa,
            bar_h: 18,
            honor_hints: false,
        };

        Layout::Tile.arrange(&mut cs, 0, &ctx);

        let rects = outer_rects(&cs);
        assert_eq!(rects[1].h, 541);
        assert_eq!(rects[2].h, 540);
        assert_eq!(rects[2].bottom(), wa.bottom());
    }

    #[test]
    fn short_stack_slots_collapse_to_full_height() {
        // 20 clients in a 100px tall work area: every stack slot would be
        // below the bar height, so they all take the full height instead
        let wa = Rect::new(0, 0, 1920, 100);
        let mut cs = test_set(wa, 20, 1, 0.55);
        let ctx = ResizeContext {
            display: wa,
            bar_h: 18,
            honor_hints: false,
        };

        Layout::Tile.arrange(&mut cs, 0, &ctx);

        let rects = outer_rects(&cs);
        assert!(rects[1..].iter().all(|r| r.h == 100));
    }

    #[test]
    fn monocle_gives_every_tiled_client_the_work_area() {
        let wa = Rect::new(0, 0, 1920, 1080);
        let mut cs = test_set(wa, 4, 1, 0.55);
        let ctx = ResizeContext {
            display: wa,
            bar_h: 18,
            honor_hints: false,
        };

        Layout::Monocle.arrange(&mut cs, 0, &ctx);

        for r in outer_rects(&cs) {
            assert_eq!(r, wa);
        }
    }

    #[test]
    fn float_arranges_nothing() {
        let wa = Rect::new(0, 0, 1920, 1080);
        let mut cs = test_set(wa, 3, 1, 0.55);
        let ctx = ResizeContext {
            display: wa,
            bar_h: 18,
            honor_hints: false,
        };

        let before: Vec<Rect> = cs.tiled_clients(0).iter().map(|id| cs.clients[id].rect).collect();
        let changed = Layout::Float.arrange(&mut cs, 0, &ctx);
        let after: Vec<Rect> = cs.tiled_clients(0).iter().map(|id| cs.clients[id].rect).collect();

        assert!(changed.is_empty());
        assert_eq!(before, after);
    }
}
