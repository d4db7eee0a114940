#![forbid(unsafe_code)]

//! Keyboard input normalization and the global toggle shortcut.
//!
//! The web host passes the DOM `key`/`code` pair plus modifier state. Keys are
//! reduced to a lowercase ASCII character so that `Ctrl+S` matches regardless
//! of Shift/CapsLock, and falls back to the physical `code` (`KeyS`) on
//! layouts where the logical key is not ASCII.

use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;

use crate::options::OptionsError;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Build from the four DOM modifier booleans.
    #[must_use]
    pub fn from_dom(ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::CTRL, ctrl);
        mods.set(Self::ALT, alt);
        mods.set(Self::SHIFT, shift);
        mods.set(Self::SUPER, meta);
        mods
    }
}

/// Normalized key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    /// Lowercase ASCII key, or `None` for keys the shortcut layer ignores.
    pub key: Option<char>,
    /// Modifier bitset, see [`Modifiers`].
    pub mods: u8,
    /// Auto-repeat from a held key.
    pub repeat: bool,
}

impl KeyInput {
    #[must_use]
    pub fn new(key: char, mods: Modifiers) -> Self {
        Self {
            key: Some(key.to_ascii_lowercase()),
            mods: mods.bits(),
            repeat: false,
        }
    }

    /// Normalize a DOM `keydown`.
    #[must_use]
    pub fn from_dom(dom_key: &str, dom_code: &str, mods: Modifiers, repeat: bool) -> Self {
        Self {
            key: normalize_key(dom_key, dom_code),
            mods: mods.bits(),
            repeat,
        }
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        Modifiers::from_bits_truncate(self.mods)
    }
}

fn normalize_key(dom_key: &str, dom_code: &str) -> Option<char> {
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
        && first.is_ascii_alphanumeric()
    {
        return Some(first.to_ascii_lowercase());
    }

    let physical = dom_code
        .strip_prefix("Key")
        .or_else(|| dom_code.strip_prefix("Digit"))?;
    let mut chars = physical.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

/// Key combination that toggles the scroll driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    key: char,
    modifiers: Modifiers,
}

impl Default for Shortcut {
    fn default() -> Self {
        Self::CTRL_S
    }
}

impl Shortcut {
    /// `Ctrl+S`.
    pub const CTRL_S: Self = Self {
        key: 's',
        modifiers: Modifiers::CTRL,
    };

    #[must_use]
    pub fn new(key: char, modifiers: Modifiers) -> Self {
        Self {
            key: key.to_ascii_lowercase(),
            modifiers,
        }
    }

    #[must_use]
    pub const fn key(&self) -> char {
        self.key
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Exact match: same key and the same modifier set. Shift is ignored
    /// unless the shortcut asks for it, so CapsLock-style input still matches.
    /// Auto-repeat never matches.
    #[must_use]
    pub fn matches(&self, input: &KeyInput) -> bool {
        if input.repeat || input.key != Some(self.key) {
            return false;
        }
        let mut held = input.modifiers();
        if !self.modifiers.contains(Modifiers::SHIFT) {
            held.remove(Modifiers::SHIFT);
        }
        held == self.modifiers
    }
}

impl FromStr for Shortcut {
    type Err = OptionsError;

    /// Parse `"ctrl+s"`, `"Ctrl+Shift+K"`, `"cmd+s"` and similar.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || OptionsError::Shortcut(raw.to_owned());
        let mut modifiers = Modifiers::empty();
        let mut key = None;

        for part in raw.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= Modifiers::CTRL,
                "alt" | "option" => modifiers |= Modifiers::ALT,
                "shift" => modifiers |= Modifiers::SHIFT,
                "meta" | "cmd" | "super" => modifiers |= Modifiers::SUPER,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) if c.is_ascii_alphanumeric() => key = Some(c),
                        _ => return Err(invalid()),
                    }
                }
            }
        }

        let key = key.ok_or_else(invalid)?;
        if modifiers.is_empty() {
            // A bare letter would fire while typing into the page.
            return Err(invalid());
        }
        Ok(Self::new(key, modifiers))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl+"),
            (Modifiers::ALT, "Alt+"),
            (Modifiers::SHIFT, "Shift+"),
            (Modifiers::SUPER, "Meta+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn ctrl_s_matches_with_and_without_shift() {
        let shortcut = Shortcut::default();
        assert!(shortcut.matches(&KeyInput::new('s', Modifiers::CTRL)));
        assert!(shortcut.matches(&KeyInput::new('S', Modifiers::CTRL | Modifiers::SHIFT)));
        assert!(!shortcut.matches(&KeyInput::new('s', Modifiers::empty())));
        assert!(!shortcut.matches(&KeyInput::new('s', Modifiers::CTRL | Modifiers::ALT)));
        assert!(!shortcut.matches(&KeyInput::new('d', Modifiers::CTRL)));
    }

    #[test]
    fn repeat_never_matches() {
        let mut input = KeyInput::new('s', Modifiers::CTRL);
        input.repeat = true;
        assert!(!Shortcut::default().matches(&input));
    }

    #[test]
    fn dom_code_fallback_for_non_ascii_layouts() {
        let input = KeyInput::from_dom("ы", "KeyS", Modifiers::CTRL, false);
        assert_eq!(input.key, Some('s'));
        assert!(Shortcut::default().matches(&input));

        let named = KeyInput::from_dom("Enter", "Enter", Modifiers::CTRL, false);
        assert_eq!(named.key, None);
    }

    #[test]
    fn parse_and_display() {
        let parsed: Shortcut = "Ctrl+Shift+k".parse().unwrap();
        assert_eq!(parsed.key(), 'k');
        assert_eq!(parsed.modifiers(), Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(parsed.to_string(), "Ctrl+Shift+K");
        assert_eq!("cmd+s".parse::<Shortcut>().unwrap().to_string(), "Meta+S");
    }

    #[test]
    fn parse_rejects_bare_or_malformed_keys() {
        assert!("s".parse::<Shortcut>().is_err());
        assert!("ctrl+".parse::<Shortcut>().is_err());
        assert!("ctrl+s+d".parse::<Shortcut>().is_err());
        assert!("ctrl+enter".parse::<Shortcut>().is_err());
    }

    #[test]
    fn shift_required_when_declared() {
        let shortcut: Shortcut = "ctrl+shift+s".parse().unwrap();
        assert!(!shortcut.matches(&KeyInput::new('s', Modifiers::CTRL)));
        assert!(shortcut.matches(&KeyInput::new('s', Modifiers::CTRL | Modifiers::SHIFT)));
    }

    #[test]
    fn modifiers_from_dom() {
        let mods = Modifiers::from_dom(true, false, true, false);
        assert_eq!(mods, Modifiers::CTRL | Modifiers::SHIFT);
    }
}
