//! User facing configuration of the window manager.
//!
//! Everything here is fixed at compile time: edit the defaults (or build a
//! [Config] by hand in `main`) and recompile, in the tradition this window
//! manager descends from. Key and mouse bindings are constructed alongside
//! the config in `main.rs` as they need access to the action constructors.
use crate::{
    pure::{monitor::NUM_VIEWS, Layout},
    Color, Error, Result,
};

/// A border, background and foreground pixel triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    /// Window border color
    pub border: Color,
    /// Bar cell background
    pub bg: Color,
    /// Bar cell text color
    pub fg: Color,
}

/// The static configuration surface of the window manager.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Names shown in the tag bar, one per view
    pub tags: [&'static str; NUM_VIEWS],
    /// X core font used for the bar
    pub font: &'static str,
    /// Border width for managed clients, in pixels
    pub border_px: u32,
    /// Pixel threshold for edge snapping and tiled-drag float promotion
    pub snap: u32,
    /// Whether monitors start with their bar visible
    pub show_bar: bool,
    /// Whether the bar sits at the top of the screen
    pub top_bar: bool,
    /// Whether size hints are honored for tiled clients
    pub resize_hints: bool,
    /// Default master fraction for every view
    pub mfact: f64,
    /// Layouts cycled by the layout action; the first is the default
    pub layouts: Vec<Layout>,
    /// Border / background / foreground for unfocused elements
    pub norm_colors: [&'static str; 3],
    /// Border / background / foreground for the focused element
    pub sel_colors: [&'static str; 3],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: ["1", "2", "3", "4", "5", "6", "7", "8", "9"],
            font: "fixed",
            border_px: 1,
            snap: 32,
            show_bar: true,
            top_bar: true,
            resize_hints: true,
            mfact: 0.55,
            layouts: vec![Layout::Tile, Layout::MirrorTile, Layout::Monocle, Layout::Float],
            norm_colors: ["#444444", "#222222", "#bbbbbb"],
            sel_colors: ["#005577", "#005577", "#eeeeee"],
        }
    }
}

impl Config {
    /// Check that the configured values can actually drive the manager.
    pub fn validate(&self) -> Result<()> {
        if self.layouts.is_empty() {
            return Err(Error::InvalidConfig {
                reason: "layouts must not be empty".to_owned(),
            });
        }
        if !(0.1..=0.9).contains(&self.mfact) {
            return Err(Error::InvalidConfig {
                reason: format!("mfact must be within [0.1, 0.9]: {}", self.mfact),
            });
        }

        Ok(())
    }

    /// Parse the configured color strings into (normal, selected) schemes.
    pub fn color_schemes(&self) -> Result<(ColorScheme, ColorScheme)> {
        let parse = |cols: [&str; 3]| -> Result<ColorScheme> {
            Ok(ColorScheme {
                border: cols[0].parse()?,
                bg: cols[1].parse()?,
                fg: cols[2].parse()?,
            })
        };

        Ok((parse(self.norm_colors)?, parse(self.sel_colors)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert!(config.color_schemes().is_ok());
    }

    #[test]
    fn bad_colors_are_a_startup_error() {
        let mut config = Config::default();
        config.sel_colors = ["#005577", "oops", "#eeeeee"];

        assert!(matches!(
            config.color_schemes(),
            Err(Error::InvalidHexColor { .. })
        ));
    }

    #[test]
    fn empty_layouts_are_rejected() {
        let mut config = Config::default();
        config.layouts = vec![];

        assert!(config.validate().is_err());
    }
}
