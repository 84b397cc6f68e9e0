//! tessella: a tiling window manager for X11 in the spirit of dwm.
//!
//! Configuration is compile time: adjust [Config] and the binding tables
//! below and rebuild. Logging is controlled through `RUST_LOG`.
use std::{env, process};
use tessella::{
    core::{
        actions::{
            focus_monitor, focus_stack, kill_focused, move_to_clicked_view, move_to_view,
            move_with_mouse, quit, resize_with_mouse, select_clicked_view, select_view,
            set_layout, set_layout_mouse, set_mfact, spawn, tag_monitor, toggle_bar,
            toggle_floating, toggle_floating_mouse, with_ignored_click, zoom,
        },
        bindings::{
            keycodes_from_xmodmap, parse_key_binding, ClickRegion, KeyBindings, KeyEventHandler,
            ModMask, MouseBindings,
        },
    },
    pure::Layout,
    x11rb::RustConn,
    Config, Result, WindowManager,
};
use tracing_subscriber::EnvFilter;

const TERMINAL: &str = "st";
const LAUNCHER: &str = "dmenu_run";

fn key_bindings() -> Result<KeyBindings<RustConn>> {
    let mut raw: Vec<(String, KeyEventHandler<RustConn>)> = vec![
        ("M-p".to_owned(), spawn(LAUNCHER)),
        ("M-S-Return".to_owned(), spawn(TERMINAL)),
        ("M-b".to_owned(), toggle_bar()),
        ("M-j".to_owned(), focus_stack(true)),
        ("M-k".to_owned(), focus_stack(false)),
        ("M-h".to_owned(), set_mfact(-0.05)),
        ("M-l".to_owned(), set_mfact(0.05)),
        ("M-Return".to_owned(), zoom()),
        ("M-S-c".to_owned(), kill_focused()),
        ("M-t".to_owned(), set_layout(Layout::Tile)),
        ("M-u".to_owned(), set_layout(Layout::MirrorTile)),
        ("M-m".to_owned(), set_layout(Layout::Monocle)),
        ("M-f".to_owned(), set_layout(Layout::Float)),
        ("M-S-space".to_owned(), toggle_floating()),
        ("M-comma".to_owned(), focus_monitor(false)),
        ("M-period".to_owned(), focus_monitor(true)),
        ("M-S-comma".to_owned(), tag_monitor(false)),
        ("M-S-period".to_owned(), tag_monitor(true)),
        ("M-S-q".to_owned(), quit()),
    ];

    for i in 0..9 {
        raw.push((format!("M-{}", i + 1), select_view(i)));
        raw.push((format!("M-S-{}", i + 1), move_to_view(i)));
    }

    let codes = keycodes_from_xmodmap()?;
    let mut bindings = KeyBindings::new();
    for (pattern, action) in raw {
        bindings.insert(parse_key_binding(&pattern, &codes)?, action);
    }

    Ok(bindings)
}

fn mouse_bindings() -> MouseBindings<RustConn> {
    use ClickRegion::*;

    let m = ModMask::MOD4;
    let none = ModMask::empty();

    tessella::map! {
        (TagBar, none, 1) => select_clicked_view(),
        (TagBar, m, 1) => move_to_clicked_view(),
        (LayoutSymbol, none, 1) => set_layout_mouse(Layout::Tile),
        (LayoutSymbol, none, 3) => set_layout_mouse(Layout::Monocle),
        (WinTitle, none, 2) => with_ignored_click(zoom()),
        (StatusText, none, 2) => with_ignored_click(spawn(TERMINAL)),
        (ClientWin, m, 1) => move_with_mouse(),
        (ClientWin, m, 2) => toggle_floating_mouse(),
        (ClientWin, m, 3) => resize_with_mouse(),
    }
}

fn run() -> Result<()> {
    let config = Config::default();
    let conn = RustConn::new(config.font)?;
    let mut wm = WindowManager::new(config, key_bindings()?, mouse_bindings(), conn)?;

    wm.run()
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() == 2 && args[1] == "-v" {
        println!("tessella-{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    } else if args.len() > 1 {
        eprintln!("usage: tessella [-v]");
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run() {
        eprintln!("tessella: {e}");
        process::exit(1);
    }
}
