//! Data types for window properties requested from the X server
use crate::pure::geometry::Rect;

/// The ICCCM `WM_STATE` client states tracked by the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WmState {
    /// A window that is not visible to the user in any way
    Withdrawn,
    /// A window that is currently visible or parked off screen
    Normal,
    /// A window that is iconified
    Iconic,
}

impl From<WmState> for u32 {
    fn from(s: WmState) -> u32 {
        match s {
            WmState::Withdrawn => 0,
            WmState::Normal => 1,
            WmState::Iconic => 3,
        }
    }
}

impl WmState {
    /// Parse the numeric property value, ignoring unknown states.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(WmState::Withdrawn),
            1 => Some(WmState::Normal),
            3 => Some(WmState::Iconic),
            _ => None,
        }
    }
}

/// A subset of the window attributes the manager inspects before and while
/// managing a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    /// Requested position and size
    pub rect: Rect,
    /// Requested border width
    pub border_width: u32,
    /// Whether the window asked not to be managed
    pub override_redirect: bool,
    /// Whether the window is currently viewable on screen
    pub viewable: bool,
}

impl WindowAttributes {
    /// Attributes for a window requesting the given rect with no flags set
    pub fn new(rect: Rect, border_width: u32) -> Self {
        Self {
            rect,
            border_width,
            override_redirect: false,
            viewable: true,
        }
    }
}
