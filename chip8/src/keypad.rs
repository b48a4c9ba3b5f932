use crate::KEY_COUNT;

/// A hex keypad key resolved from a host keyboard label, using the usual layout:
///
/// ```text
/// Keypad       Keyboard
/// 1 2 3 C      1 2 3 4
/// 4 5 6 D  =>  Q W E R
/// 7 8 9 E      A S D F
/// A 0 B F      Z X C V
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key(Option<u8>);

impl Key {
    pub fn from_label(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "1" => Self(Some(0x1)), // 1 -> 1
            "2" => Self(Some(0x2)), // 2 -> 2
            "3" => Self(Some(0x3)), // 3 -> 3
            "4" => Self(Some(0xC)), // 4 -> C
            "q" => Self(Some(0x4)), // Q -> 4
            "w" => Self(Some(0x5)), // W -> 5
            "e" => Self(Some(0x6)), // E -> 6
            "r" => Self(Some(0xD)), // R -> D
            "a" => Self(Some(0x7)), // A -> 7
            "s" => Self(Some(0x8)), // S -> 8
            "d" => Self(Some(0x9)), // D -> 9
            "f" => Self(Some(0xE)), // F -> E
            "z" => Self(Some(0xA)), // Z -> A
            "x" => Self(Some(0x0)), // X -> 0
            "c" => Self(Some(0xB)), // C -> B
            "v" => Self(Some(0xF)), // V -> F
            _ => Self(None),
        }
    }

    pub fn index(&self) -> Option<u8> {
        self.0
    }
}

pub struct Keypad {
    pub(crate) keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    /// Set the state of key `index`. Indices past 0xF are ignored
    pub fn set_key(&mut self, index: usize, pressed: bool) {
        match self.keys.get_mut(index) {
            Some(key) => *key = pressed,
            None => log::debug!("ignored state change for key index {}", index),
        }
    }

    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    pub fn is_key_up(&self, key: u8) -> bool {
        !self.is_key_down(key)
    }

    /// The lowest-numbered key currently held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, Keypad};

    #[test]
    fn test_from_label() {
        assert_eq!(Key::from_label("1").index(), Some(0x1));
        assert_eq!(Key::from_label("4").index(), Some(0xC));
        assert_eq!(Key::from_label("X").index(), Some(0x0));
        assert_eq!(Key::from_label("v").index(), Some(0xF));
        assert_eq!(Key::from_label("p").index(), None);
    }

    #[test]
    fn test_set_key_out_of_range_ignored() {
        let mut keypad = Keypad::new();
        keypad.set_key(16, true);
        keypad.set_key(usize::MAX, true);
        assert_eq!(keypad.first_pressed(), None);
        assert!(keypad.is_key_up(16));
    }

    #[test]
    fn test_first_pressed_lowest_wins() {
        let mut keypad = Keypad::new();
        keypad.set_key(0xB, true);
        keypad.set_key(0x3, true);
        assert_eq!(keypad.first_pressed(), Some(0x3));
        keypad.set_key(0x3, false);
        assert_eq!(keypad.first_pressed(), Some(0xB));
        assert!(keypad.is_key_down(0xB));
    }
}
