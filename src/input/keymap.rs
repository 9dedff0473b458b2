use crate::event::KeyMods;

/// Modifier bits folded into a translated key symbol.
pub const KEY_SHIFT: u16 = 0x8000;
pub const KEY_CTRL: u16 = 0x4000;
pub const KEY_ALT: u16 = 0x2000;

/// One keycode after translation: the application key symbol plus the
/// printable character it produces, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatedKey {
    pub key: u16,
    pub character: Option<char>,
}

/// Translation from hardware keycodes to application key symbols. The table
/// itself lives outside this crate; the driver only runs keycodes through it.
pub trait Keymap {
    /// Translate one keycode. `None` drops the press.
    fn translate(&self, keycode: u32) -> Option<TranslatedKey>;
}

pub(crate) fn apply_mods(key: u16, mods: KeyMods) -> u16 {
    let mut key = key;
    if mods.shift {
        key |= KEY_SHIFT;
    }
    if mods.ctrl {
        key |= KEY_CTRL;
    }
    if mods.alt {
        key |= KEY_ALT;
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mods_fold_into_the_symbol() {
        let none = KeyMods::default();
        assert_eq!(apply_mods(0x41, none), 0x41);

        let shift = KeyMods {
            shift: true,
            ..KeyMods::default()
        };
        assert_eq!(apply_mods(0x41, shift), 0x41 | KEY_SHIFT);

        let all = KeyMods {
            shift: true,
            ctrl: true,
            alt: true,
        };
        assert_eq!(apply_mods(0x41, all), 0x41 | KEY_SHIFT | KEY_CTRL | KEY_ALT);
    }
}
