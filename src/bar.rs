//! Per-monitor status bar content.
//!
//! This module computes *what* the bar shows: an ordered list of positioned
//! [Segment]s plus the reverse mapping from a click position back to a
//! [ClickRegion]. Actually rendering text and rectangles is a backend
//! concern behind [XConn::draw_bar][crate::x::XConn::draw_bar].
use crate::{
    config::Config,
    core::bindings::ClickRegion,
    pure::ClientSet,
    x::XConn,
};

/// A single run of text in the bar with its resolved position and styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Horizontal offset inside the bar window
    pub x: u32,
    /// Width of this cell
    pub width: u32,
    /// The text to draw
    pub text: String,
    /// Use the selected color scheme rather than the normal one
    pub selected: bool,
    /// Swap foreground and background (urgent styling)
    pub invert: bool,
    /// Optional small square marker in the cell's top left corner
    pub marker: Option<Marker>,
}

/// The corner marker drawn for tag occupancy and client state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A solid square: selected tag with a focused client, or a fixed client
    Filled,
    /// A square outline: occupied tag, or a floating client
    Outline,
}

/// Compute the full segment list for one monitor's bar.
pub fn content<X: XConn>(
    cs: &ClientSet,
    config: &Config,
    status: &str,
    mon: usize,
    x: &X,
) -> Vec<Segment> {
    let m = &cs.monitors()[mon];
    let is_selected_mon = mon == cs.selected_monitor_index();
    let bar_w = m.window_area().w;
    let mut segments = Vec::with_capacity(config.tags.len() + 3);
    let mut cursor = 0;

    // tag cells
    for (i, tag) in config.tags.iter().enumerate() {
        let width = x.text_width(tag);
        let occupied = !m.view(i).is_empty();
        let marker = if is_selected_mon && i == m.selected_view_index() && m.focused().is_some() {
            Some(Marker::Filled)
        } else if occupied {
            Some(Marker::Outline)
        } else {
            None
        };

        segments.push(Segment {
            x: cursor,
            width,
            text: (*tag).to_owned(),
            selected: i == m.selected_view_index(),
            invert: cs.view_has_urgent(mon, i),
            marker,
        });
        cursor += width;
    }

    // layout symbol
    let symbol_w = x.text_width(m.layout_symbol());
    segments.push(Segment {
        x: cursor,
        width: symbol_w,
        text: m.layout_symbol().to_owned(),
        selected: false,
        invert: false,
        marker: None,
    });
    cursor += symbol_w;

    // status text, right aligned on the selected monitor only
    let mut status_x = bar_w;
    if is_selected_mon {
        let status_w = x.text_width(status);
        status_x = if status_w + cursor > bar_w {
            cursor
        } else {
            bar_w - status_w
        };
        segments.push(Segment {
            x: status_x,
            width: bar_w - status_x,
            text: status.to_owned(),
            selected: false,
            invert: false,
            marker: None,
        });
    }

    // selected client title fills whatever is left in the middle
    if status_x > cursor {
        let (text, marker) = match m.focused().and_then(|id| cs.client(id)) {
            Some(c) => {
                let marker = if c.is_fixed() {
                    Some(Marker::Filled)
                } else if c.is_floating() {
                    Some(Marker::Outline)
                } else {
                    None
                };
                (c.name().to_owned(), marker)
            }
            None => (String::new(), None),
        };

        segments.push(Segment {
            x: cursor,
            width: status_x - cursor,
            text,
            selected: is_selected_mon,
            invert: false,
            marker,
        });
    }

    segments
}

/// Resolve a click x-offset within a monitor's bar to the region it hit.
///
/// Returns the region plus the tag index for tag cell hits.
pub fn click_region<X: XConn>(
    cs: &ClientSet,
    config: &Config,
    status: &str,
    mon: usize,
    click_x: u32,
    x: &X,
) -> (ClickRegion, Option<usize>) {
    let m = &cs.monitors()[mon];
    let bar_w = m.window_area().w;

    let mut edge = 0;
    for (i, tag) in config.tags.iter().enumerate() {
        edge += x.text_width(tag);
        if click_x < edge {
            return (ClickRegion::TagBar, Some(i));
        }
    }

    if click_x < edge + x.text_width(m.layout_symbol()) {
        (ClickRegion::LayoutSymbol, None)
    } else if click_x >= bar_w.saturating_sub(x.text_width(status)) {
        (ClickRegion::StatusText, None)
    } else {
        (ClickRegion::WinTitle, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pure::{Client, Rect},
        x::mock::StubXConn,
        Xid,
    };

    struct FixedWidths;
    impl StubXConn for FixedWidths {
        // every string is 10px per char plus padding handled by the stub
        fn stub_text_width(&self, text: &str) -> u32 {
            10 * text.len() as u32 + 10
        }
    }

    fn test_state() -> (ClientSet, Config) {
        let mut config = Config::default();
        config.show_bar = true;
        let cs = ClientSet::new(vec![Rect::new(0, 0, 1920, 1080)], &config, 18).unwrap();

        (cs, config)
    }

    #[test]
    fn tag_cells_come_first_and_abut() {
        let (cs, config) = test_state();

        let segments = content(&cs, &config, "status", 0, &FixedWidths);

        // 9 single character tags, each 20 wide
        for (i, s) in segments.iter().take(9).enumerate() {
            assert_eq!(s.x, 20 * i as u32);
            assert_eq!(s.width, 20);
        }
        assert!(segments[0].selected);
        assert!(!segments[1].selected);
    }

    #[test]
    fn occupied_tags_are_marked() {
        let (mut cs, config) = test_state();
        cs.insert(Client::new(Xid(7), Rect::new(0, 0, 10, 10), 1, 0, 2));

        let segments = content(&cs, &config, "", 0, &FixedWidths);

        assert_eq!(segments[2].marker, Some(Marker::Outline));
        assert_eq!(segments[0].marker, None);
    }

    #[test]
    fn selected_tag_with_focus_is_filled() {
        let (mut cs, config) = test_state();
        cs.insert(Client::new(Xid(7), Rect::new(0, 0, 10, 10), 1, 0, 0));

        let segments = content(&cs, &config, "", 0, &FixedWidths);

        assert_eq!(segments[0].marker, Some(Marker::Filled));
    }

    #[test]
    fn urgent_tags_render_inverted() {
        let (mut cs, config) = test_state();
        let mut c = Client::new(Xid(7), Rect::new(0, 0, 10, 10), 1, 0, 4);
        c.is_urgent = true;
        cs.insert(c);

        let segments = content(&cs, &config, "", 0, &FixedWidths);

        assert!(segments[4].invert);
        assert!(!segments[0].invert);
    }

    #[test]
    fn status_is_right_aligned() {
        let (cs, config) = test_state();

        let segments = content(&cs, &config, "up 3 days", 0, &FixedWidths);
        let status = segments.iter().find(|s| s.text == "up 3 days").unwrap();

        assert_eq!(status.x, 1920 - 100);
        assert_eq!(status.width, 100);
    }

    #[test]
    fn click_regions_resolve_left_to_right() {
        let (cs, config) = test_state();
        let status = "up";

        let x = FixedWidths;
        // tags span 0..180, layout symbol 180..220 ("[]=" is 40 wide)
        assert_eq!(
            click_region(&cs, &config, status, 0, 25, &x),
            (ClickRegion::TagBar, Some(1))
        );
        assert_eq!(
            click_region(&cs, &config, status, 0, 185, &x),
            (ClickRegion::LayoutSymbol, None)
        );
        assert_eq!(
            click_region(&cs, &config, status, 0, 1000, &x),
            (ClickRegion::WinTitle, None)
        );
        assert_eq!(
            click_region(&cs, &config, status, 0, 1900, &x),
            (ClickRegion::StatusText, None)
        );
    }
}
