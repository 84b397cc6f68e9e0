//! Setting up and responding to user defined key and mouse bindings
use crate::{core::State, x::event::ButtonEvent, Error, Result};
use bitflags::bitflags;
use std::{collections::HashMap, process::Command};
use tracing::debug;

bitflags! {
    /// An X modifier mask for key and button events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModMask: u16 {
        /// Shift
        const SHIFT = 1 << 0;
        /// Caps lock
        const LOCK = 1 << 1;
        /// Control
        const CONTROL = 1 << 2;
        /// Mod1 (Alt on most keymaps)
        const MOD1 = 1 << 3;
        /// Mod2 (NumLock on most keymaps)
        const MOD2 = 1 << 4;
        /// Mod3
        const MOD3 = 1 << 5;
        /// Mod4 (Super on most keymaps)
        const MOD4 = 1 << 6;
        /// Mod5
        const MOD5 = 1 << 7;
    }
}

impl ModMask {
    /// Strip the lock modifiers so that bindings are insensitive to the
    /// CapsLock and NumLock state.
    pub fn clean(self, numlock: ModMask) -> ModMask {
        self & !(numlock | ModMask::LOCK)
    }
}

/// A key press and the (cleaned) modifiers held with it
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyCode {
    /// The held modifier mask
    pub mask: ModMask,
    /// The X key code that was pressed
    pub code: u8,
}

impl KeyCode {
    /// Create a new [KeyCode] from this one with the lock modifiers removed
    pub fn clean(&self, numlock: ModMask) -> KeyCode {
        KeyCode {
            mask: self.mask.clean(numlock),
            code: self.code,
        }
    }
}

/// The region of the screen a mouse binding applies to.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ClickRegion {
    /// One of the tag cells in the bar
    TagBar,
    /// The layout symbol in the bar
    LayoutSymbol,
    /// The status text area of the bar
    StatusText,
    /// The selected client title area of the bar
    WinTitle,
    /// A managed client window
    ClientWin,
    /// The root window
    RootWin,
}

/// What was clicked, resolved against the bar geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickContext {
    /// The resolved region
    pub region: ClickRegion,
    /// For tag bar clicks, the tag index that was hit
    pub tag: Option<usize>,
    /// The raw button event
    pub event: ButtonEvent,
}

/// Some action to be run by a user key binding
pub type KeyEventHandler<X> = Box<dyn FnMut(&mut State, &X) -> Result<()>>;

/// An action to be run in response to a mouse event
pub type MouseEventHandler<X> = Box<dyn FnMut(&mut State, &X, &ClickContext) -> Result<()>>;

/// User defined key bindings, keyed by cleaned modifier mask and key code
pub type KeyBindings<X> = HashMap<KeyCode, KeyEventHandler<X>>;

/// User defined mouse bindings, keyed by click region, cleaned modifier
/// mask and button number
pub type MouseBindings<X> = HashMap<(ClickRegion, ModMask, u8), MouseEventHandler<X>>;

/// A (modifier, button) pair grabbed on client windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonSpec {
    /// The modifier mask to grab with
    pub mask: ModMask,
    /// The button number to grab
    pub button: u8,
}

/// The buttons that need to be grabbed on managed client windows: every
/// binding targeting the client window region.
pub fn client_button_specs<X>(bindings: &MouseBindings<X>) -> Vec<ButtonSpec> {
    bindings
        .keys()
        .filter(|(region, _, _)| *region == ClickRegion::ClientWin)
        .map(|&(_, mask, button)| ButtonSpec { mask, button })
        .collect()
}

/// Map xmodmap key names to their X key code so that bindings can refer to
/// keys by name
pub type CodeMap = HashMap<String, u8>;

/// Run the xmodmap command to dump the system keymap table in a form that
/// can be parsed back into name -> keycode pairs. Referring the user to the
/// xmodmap output keeps odd binding issues debuggable.
pub fn keycodes_from_xmodmap() -> Result<CodeMap> {
    let output = Command::new("xmodmap").arg("-pke").output()?;
    let stdout = String::from_utf8(output.stdout).map_err(|_| Error::UnknownKeyName {
        name: "<invalid utf8 from xmodmap>".to_owned(),
    })?;

    Ok(parse_keycodes(&stdout))
}

// Lines have the form `keycode <code> = <name> <name> ...`
fn parse_keycodes(xmodmap_output: &str) -> CodeMap {
    xmodmap_output
        .lines()
        .flat_map(|l| {
            let mut words = l.split_whitespace();
            let code: Option<u8> = words.nth(1).and_then(|w| w.parse().ok());

            words
                .skip(1)
                .map(move |name| (name.to_owned(), code))
                .filter_map(|(name, code)| code.map(|c| (name, c)))
        })
        .collect()
}

/// Parse a user friendly key binding of the form `"M-S-j"` into a grabbable
/// [KeyCode].
///
/// Allowed modifier prefixes are `M` (Super), `A` (Alt), `S` (Shift) and
/// `C` (Control); the final element is a key name from `xmodmap -pke`.
pub fn parse_key_binding(pattern: &str, known_codes: &CodeMap) -> Result<KeyCode> {
    let mut parts: Vec<&str> = pattern.split('-').collect();
    let name = parts.pop().ok_or_else(|| Error::InvalidKeyBinding {
        binding: pattern.to_owned(),
    })?;

    let code = known_codes.get(name).ok_or_else(|| Error::UnknownKeyName {
        name: name.to_owned(),
    })?;

    let mut mask = ModMask::empty();
    for part in parts {
        mask |= match part {
            "M" => ModMask::MOD4,
            "A" => ModMask::MOD1,
            "S" => ModMask::SHIFT,
            "C" => ModMask::CONTROL,
            _ => {
                return Err(Error::InvalidKeyBinding {
                    binding: pattern.to_owned(),
                })
            }
        };
    }

    debug!(%pattern, ?mask, code, "parsed key binding");

    Ok(KeyCode { mask, code: *code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use simple_test_case::test_case;

    const XMODMAP_SAMPLE: &str = "\
keycode  24 = q Q q Q
keycode  25 = w W w W
keycode  36 = Return NoSymbol Return
keycode  44 = j J j J
keycode  45 = k K k K
keycode  65 = space NoSymbol space
";

    fn codes() -> CodeMap {
        parse_keycodes(XMODMAP_SAMPLE)
    }

    #[test]
    fn parsing_keycodes_takes_all_names() {
        let map = codes();

        assert_eq!(map.get("j"), Some(&44));
        assert_eq!(map.get("J"), Some(&44));
        assert_eq!(map.get("Return"), Some(&36));
        assert_eq!(map.get("space"), Some(&65));
    }

    #[test_case("M-j", ModMask::MOD4, 44; "super binding")]
    #[test_case("M-S-j", ModMask::MOD4.union(ModMask::SHIFT), 44; "super shift binding")]
    #[test_case("A-C-Return", ModMask::MOD1.union(ModMask::CONTROL), 36; "alt ctrl named key")]
    #[test_case("k", ModMask::empty(), 45; "no modifiers")]
    #[test]
    fn parse_bindings(pattern: &str, mask: ModMask, code: u8) {
        let kc = parse_key_binding(pattern, &codes()).unwrap();

        assert_eq!(kc, KeyCode { mask, code });
    }

    #[test_case("M-unknown"; "unknown key name")]
    #[test_case("X-j"; "unknown modifier")]
    #[test]
    fn invalid_bindings_error(pattern: &str) {
        assert!(parse_key_binding(pattern, &codes()).is_err());
    }

    #[quickcheck]
    fn clean_mask_ignores_lock_state(bits: u16) -> bool {
        let numlock = ModMask::MOD2;
        let m = ModMask::from_bits_truncate(bits);
        let locked = m | ModMask::MOD2 | ModMask::LOCK;

        m.clean(numlock) == locked.clean(numlock)
    }
}
