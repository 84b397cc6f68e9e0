//! tessella: a tiling window manager for X11 in the spirit of dwm.
//!
//! The crate is split into a pure layer ([pure]) holding the window manager
//! state model (clients, views, monitors, layouts) with no X dependencies,
//! a [core] layer driving that state from X events, and an [x] boundary
//! trait with a production [x11rb] backed implementation. Everything the
//! window manager does on screen is expressible as a pure state transition
//! followed by a reconciliation pass against the X server, which is what
//! makes the state model testable without a running display.
#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::style,
    future_incompatible,
    missing_debug_implementations,
    rust_2018_idioms
)]

#[macro_use]
pub mod macros;

pub mod bar;
pub mod config;
pub mod core;
pub mod pure;
pub mod util;
pub mod x;
pub mod x11rb;

use std::ops::Deref;

pub use crate::core::WindowManager;
pub use config::Config;

/// A Result where the error type is a tessella [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// The error variants tessella can produce
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A window manager is already running on this display
    #[error("another window manager is already running")]
    OtherWmRunning,

    /// A color string from the configuration could not be parsed
    #[error("invalid hex color code: '{hex}'")]
    InvalidHexColor {
        /// The string that failed to parse
        hex: String,
    },

    /// A key binding referenced a key name missing from the user's keymap
    #[error("'{name}' is not a known key name: check the output of `xmodmap -pke`")]
    UnknownKeyName {
        /// The name that failed to resolve
        name: String,
    },

    /// A key binding could not be parsed
    #[error("invalid key binding: '{binding}'")]
    InvalidKeyBinding {
        /// The raw binding that failed to parse
        binding: String,
    },

    /// The user supplied configuration is unusable
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected
        reason: String,
    },

    /// The X server reported no usable screens
    #[error("the X server reported no usable screens")]
    NoScreens,

    /// An operation referenced a client that is not in state
    #[error("client {0} is not in the window manager state")]
    UnknownClient(Xid),

    /// A stub XConn method was called without a test implementation
    #[error("stub XConn method called without an implementation: {0}")]
    UnimplementedStub(&'static str),

    /// Wrapper around spawn and keymap-probe IO failures
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An error from the underlying X connection
    #[error(transparent)]
    X11rb(#[from] crate::x11rb::BackendError),
}

/// An X11 ID for a given resource
#[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Xid(pub(crate) u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A simple RGB color as a single pixel value for use with X border and
/// bar rendering requests.
#[derive(Default, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(u32);

impl Color {
    /// The raw `0x00RRGGBB` pixel value for this color
    pub fn pixel(&self) -> u32 {
        self.0
    }
}

impl std::str::FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return Err(Error::InvalidHexColor { hex: s.to_owned() });
        }

        u32::from_str_radix(hex, 16)
            .map(Color)
            .map_err(|_| Error::InvalidHexColor { hex: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case("#000000", Some(0x000000); "black")]
    #[test_case("#ffffff", Some(0xffffff); "white")]
    #[test_case("#005577", Some(0x005577); "dwm blue")]
    #[test_case("005577", Some(0x005577); "no hash prefix")]
    #[test_case("#05577", None; "too short")]
    #[test_case("#0055779", None; "too long")]
    #[test_case("#teal..", None; "not hex")]
    #[test]
    fn color_from_str(s: &str, expected: Option<u32>) {
        let res: Result<Color> = s.parse();

        match expected {
            Some(pixel) => assert_eq!(res.unwrap().pixel(), pixel),
            None => assert!(res.is_err()),
        }
    }
}
