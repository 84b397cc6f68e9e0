//! The state tracked for each managed client window
use crate::{
    pure::geometry::{Point, Rect},
    Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The name used for clients that do not provide a usable WM_NAME
pub const FALLBACK_NAME: &str = "broken";

/// ICCCM WM_NORMAL_HINTS size constraints for a client window.
///
/// A value of zero for any dimension pair means the corresponding hint was
/// not provided by the client; aspect limits of `0.0` are likewise unset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct SizeHints {
    /// Preferred base size used as the origin for resize increments
    pub base: (u32, u32),
    /// Resize increment steps
    pub inc: (u32, u32),
    /// Minimum acceptable size
    pub min: (u32, u32),
    /// Maximum acceptable size
    pub max: (u32, u32),
    /// Aspect ratio limits as (min = h/w, max = w/h)
    pub aspect: (f32, f32),
}

impl SizeHints {
    /// A client is fixed size when its minimum and maximum hints pin both
    /// dimensions to a single value.
    pub fn is_fixed(&self) -> bool {
        let (minw, minh) = self.min;
        let (maxw, maxh) = self.max;

        maxw > 0 && maxh > 0 && (minw, minh) == (maxw, maxh)
    }

    /// Apply these hints to a proposed width and height following the
    /// ICCCM 4.1.2.3 ordering: base subtraction, aspect clamping, increment
    /// snapping and finally min/max clamping.
    pub fn apply(&self, w: u32, h: u32) -> (u32, u32) {
        let (basew, baseh) = (self.base.0 as i32, self.base.1 as i32);
        let (incw, inch) = (self.inc.0 as i32, self.inc.1 as i32);
        let (minw, minh) = (self.min.0 as i32, self.min.1 as i32);
        let (maxw, maxh) = (self.max.0 as i32, self.max.1 as i32);
        let (mina, maxa) = self.aspect;

        let mut w = w as i32;
        let mut h = h as i32;

        // When base == min the base is kept through the aspect step so that
        // increments are still computed from the base origin (ICCCM 4.1.2.3,
        // final two sentences).
        let base_is_min = (basew, baseh) == (minw, minh);
        if !base_is_min {
            w -= basew;
            h -= baseh;
        }

        if mina > 0.0 && maxa > 0.0 {
            if maxa < w as f32 / h as f32 {
                w = (h as f32 * maxa + 0.5) as i32;
            } else if mina < h as f32 / w as f32 {
                h = (w as f32 * mina + 0.5) as i32;
            }
        }

        if base_is_min {
            w -= basew;
            h -= baseh;
        }

        if incw > 0 {
            w -= w % incw;
        }
        if inch > 0 {
            h -= h % inch;
        }

        w = std::cmp::max(w + basew, minw);
        h = std::cmp::max(h + baseh, minh);
        if maxw > 0 {
            w = std::cmp::min(w, maxw);
        }
        if maxh > 0 {
            h = std::cmp::min(h, maxh);
        }

        (std::cmp::max(w, 1) as u32, std::cmp::max(h, 1) as u32)
    }
}

/// Saved client geometry for undoing a fullscreen request.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenRestore {
    /// The rect the client occupied before going fullscreen
    pub rect: Rect,
    /// The border width before going fullscreen
    pub bw: u32,
    /// Whether the client was floating before going fullscreen
    pub floating: bool,
}

/// A managed top level client window.
///
/// A client belongs to exactly one (monitor, view) pair at any time and
/// appears in that view's client list and focus stack only.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub(crate) id: Xid,
    pub(crate) name: String,
    pub(crate) rect: Rect,
    pub(crate) bw: u32,
    /// Border width the window had before being managed, restored when it
    /// is released while still alive
    pub(crate) old_bw: u32,
    pub(crate) hints: SizeHints,
    pub(crate) is_floating: bool,
    pub(crate) is_urgent: bool,
    /// Floating geometry to restore when the client is toggled back from
    /// tiled to floating
    pub(crate) saved_float: Option<Rect>,
    /// Pre-fullscreen state, present only while the client is fullscreen
    pub(crate) saved_fullscreen: Option<FullscreenRestore>,
    /// Index of the owning monitor
    pub(crate) mon: usize,
    /// Index of the owning view on that monitor
    pub(crate) view: usize,
}

impl Client {
    pub(crate) fn new(id: Xid, rect: Rect, bw: u32, mon: usize, view: usize) -> Self {
        Self {
            id,
            name: FALLBACK_NAME.to_owned(),
            rect,
            bw,
            old_bw: 0,
            hints: SizeHints::default(),
            is_floating: false,
            is_urgent: false,
            saved_float: None,
            saved_fullscreen: None,
            mon,
            view,
        }
    }

    /// The window ID of this client
    pub fn id(&self) -> Xid {
        self.id
    }

    /// The display name of this client
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = if name.is_empty() {
            FALLBACK_NAME.to_owned()
        } else {
            name.chars().take(256).collect()
        };
    }

    /// Current position and size, excluding the border
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Current border width in pixels
    pub fn border_width(&self) -> u32 {
        self.bw
    }

    /// Whether this client is positioned by the user rather than a layout
    pub fn is_floating(&self) -> bool {
        self.is_floating
    }

    /// Whether this client has raised the ICCCM urgency hint
    pub fn is_urgent(&self) -> bool {
        self.is_urgent
    }

    /// Whether the size hints pin this client to a fixed size
    pub fn is_fixed(&self) -> bool {
        self.hints.is_fixed()
    }

    /// Whether this client is currently fullscreen
    pub fn is_fullscreen(&self) -> bool {
        self.saved_fullscreen.is_some()
    }

    /// Width including both borders
    pub fn outer_w(&self) -> u32 {
        self.rect.w + 2 * self.bw
    }

    /// Height including both borders
    pub fn outer_h(&self) -> u32 {
        self.rect.h + 2 * self.bw
    }

    /// The center of this client's current rect
    pub fn center(&self) -> Point {
        self.rect.midpoint()
    }

    /// Constrain a proposed rect for this client.
    ///
    /// The rect is clamped to at least 1x1, pushed back inside `display`
    /// (during interactive moves) or `monitor` (otherwise) if it has been
    /// placed fully outside, floored at `min_dim` in each dimension and then,
    /// when `honor_hints` is set or the client is floating, passed through
    /// the ICCCM size hint sequence.
    pub(crate) fn constrained(
        &self,
        proposed: Rect,
        display: Rect,
        monitor: Rect,
        min_dim: u32,
        honor_hints: bool,
        interact: bool,
    ) -> Rect {
        let mut x = proposed.x;
        let mut y = proposed.y;
        let mut w = std::cmp::max(1, proposed.w);
        let mut h = std::cmp::max(1, proposed.h);
        let bw2 = 2 * self.bw as i32;

        let bounds = if interact { display } else { monitor };
        if x > bounds.right() {
            x = bounds.right() - self.outer_w() as i32;
        }
        if y > bounds.bottom() {
            y = bounds.bottom() - self.outer_h() as i32;
        }
        if x + w as i32 + bw2 < bounds.x {
            x = bounds.x;
        }
        if y + h as i32 + bw2 < bounds.y {
            y = bounds.y;
        }

        w = std::cmp::max(w, min_dim);
        h = std::cmp::max(h, min_dim);

        if honor_hints || self.is_floating {
            let (hw, hh) = self.hints.apply(w, h);
            w = hw;
            h = hh;
        }

        Rect::new(x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use simple_test_case::test_case;

    fn hints(base: (u32, u32), inc: (u32, u32), min: (u32, u32), max: (u32, u32)) -> SizeHints {
        SizeHints {
            base,
            inc,
            min,
            max,
            aspect: (0.0, 0.0),
        }
    }

    #[test_case(SizeHints::default(), (400, 300), (400, 300); "no hints")]
    #[test_case(hints((0, 0), (0, 0), (500, 350), (0, 0)), (400, 300), (500, 350); "min clamp")]
    #[test_case(hints((0, 0), (0, 0), (0, 0), (320, 240)), (400, 300), (320, 240); "max clamp")]
    #[test_case(hints((10, 20), (7, 13), (0, 0), (0, 0)), (400, 300), (395, 293); "increments from base")]
    #[test_case(hints((10, 20), (7, 13), (10, 20), (0, 0)), (400, 300), (395, 293); "base equal to min")]
    #[test]
    fn hint_application(hints: SizeHints, proposed: (u32, u32), expected: (u32, u32)) {
        assert_eq!(hints.apply(proposed.0, proposed.1), expected);
    }

    #[test_case((0.5, 2.0), (400, 100), (200, 100); "wider than max aspect")]
    #[test_case((0.5, 2.0), (100, 400), (100, 50); "taller than min aspect")]
    #[test_case((0.5, 2.0), (200, 150), (200, 150); "within limits")]
    #[test]
    fn aspect_clamping(aspect: (f32, f32), proposed: (u32, u32), expected: (u32, u32)) {
        let hints = SizeHints {
            aspect,
            ..SizeHints::default()
        };

        assert_eq!(hints.apply(proposed.0, proposed.1), expected);
    }

    // Restricted to the hint combinations real clients send: terminals set
    // base + increments + min, fixed-size dialogs set min == max. Maximum
    // sizes unaligned with the increment grid are excluded (re-snapping
    // after a max clamp is lossy for those in the ICCCM sequence itself).
    #[derive(Debug, Clone)]
    struct ArbHints(SizeHints);

    impl Arbitrary for ArbHints {
        fn arbitrary(g: &mut Gen) -> Self {
            let dim = |g: &mut Gen| (u32::arbitrary(g) % 200, u32::arbitrary(g) % 200);

            let hints = if bool::arbitrary(g) {
                SizeHints {
                    base: dim(g),
                    inc: (u32::arbitrary(g) % 40, u32::arbitrary(g) % 40),
                    min: dim(g),
                    max: (0, 0),
                    aspect: (0.0, 0.0),
                }
            } else {
                let min = dim(g);
                let max = (min.0 + u32::arbitrary(g) % 800, min.1 + u32::arbitrary(g) % 800);
                SizeHints {
                    base: dim(g),
                    inc: (0, 0),
                    min,
                    max,
                    aspect: (0.0, 0.0),
                }
            };

            ArbHints(hints)
        }
    }

    #[quickcheck]
    fn hint_application_is_idempotent(h: ArbHints, w: u32, hgt: u32) -> bool {
        let (w, hgt) = (w % 5000 + 1, hgt % 5000 + 1);
        let first = h.0.apply(w, hgt);
        let second = h.0.apply(first.0, first.1);

        first == second
    }

    #[test]
    fn constrained_is_idempotent() {
        let mut c = Client::new(
            Xid(1),
            Rect::new(10, 10, 400, 300),
            2,
            0,
            0,
        );
        // max sizes sit on the base + increment grid
        c.hints = hints((10, 20), (7, 13), (100, 100), (801, 605));

        let display = Rect::new(0, 0, 1920, 1080);
        let monitor = display;

        let first = c.constrained(Rect::new(-50, 700, 4000, 40), display, monitor, 18, true, false);
        c.rect = first;
        let second = c.constrained(first, display, monitor, 18, true, false);

        assert_eq!(first, second);
    }

    #[test]
    fn names_fall_back_when_empty() {
        let mut c = Client::new(Xid(1), Rect::default(), 1, 0, 0);

        c.set_name("st");
        assert_eq!(c.name(), "st");

        c.set_name("");
        assert_eq!(c.name(), FALLBACK_NAME);
    }
}
