//! Host events and the preset/engine actions bound to keys.

/// Change applied to the beat sensitivity per key press.
pub const BEAT_SENSITIVITY_STEP: f32 = 0.1;

/// Keys the actor reacts to. Codes follow libvisual's key symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Space,
    N,
    P,
    R,
    Up,
    Down,
    Other(u32),
}

impl Key {
    pub const BACKSPACE_CODE: u32 = 8;
    pub const SPACE_CODE: u32 = 32;
    pub const N_CODE: u32 = 110;
    pub const P_CODE: u32 = 112;
    pub const R_CODE: u32 = 114;
    pub const UP_CODE: u32 = 273;
    pub const DOWN_CODE: u32 = 274;

    pub fn from_code(code: u32) -> Self {
        match code {
            Self::BACKSPACE_CODE => Self::Backspace,
            Self::SPACE_CODE => Self::Space,
            Self::N_CODE => Self::N,
            Self::P_CODE => Self::P,
            Self::R_CODE => Self::R,
            Self::UP_CODE => Self::Up,
            Self::DOWN_CODE => Self::Down,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Backspace => Self::BACKSPACE_CODE,
            Self::Space => Self::SPACE_CODE,
            Self::N => Self::N_CODE,
            Self::P => Self::P_CODE,
            Self::R => Self::R_CODE,
            Self::Up => Self::UP_CODE,
            Self::Down => Self::DOWN_CODE,
            Self::Other(code) => code,
        }
    }

    /// Parses the names accepted on the command line (`space`, `n`, `up`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.trim().to_ascii_lowercase().as_str() {
            "backspace" | "bksp" => Self::Backspace,
            "space" => Self::Space,
            "n" => Self::N,
            "p" => Self::P,
            "r" => Self::R,
            "up" => Self::Up,
            "down" => Self::Down,
            _ => return None,
        };
        Some(key)
    }
}

/// Event polled from the host's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    KeyDown(Key),
    KeyUp(Key),
    Resize { width: i32, height: i32 },
    Other,
}

/// What a key press does to the engine or playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleLock,
    /// Next preset in playlist order, regardless of shuffle.
    NextPreset,
    /// Previous preset in playlist order, regardless of shuffle.
    PreviousPreset,
    /// Next preset under the active shuffle mode.
    RandomPreset,
    /// Back through the play history.
    LastPreset,
    BeatSensitivityUp,
    BeatSensitivityDown,
}

impl Action {
    pub fn for_key(key: Key) -> Option<Self> {
        let action = match key {
            Key::Space => Self::ToggleLock,
            Key::N => Self::NextPreset,
            Key::P => Self::PreviousPreset,
            Key::R => Self::RandomPreset,
            Key::Backspace => Self::LastPreset,
            Key::Up => Self::BeatSensitivityUp,
            Key::Down => Self::BeatSensitivityDown,
            Key::Other(_) => return None,
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_round_trip() {
        for key in [Key::Backspace, Key::Space, Key::N, Key::P, Key::R, Key::Up, Key::Down] {
            assert_eq!(Key::from_code(key.code()), key);
        }
        assert_eq!(Key::from_code(97), Key::Other(97));
    }

    #[test]
    fn only_bound_keys_produce_actions() {
        assert_eq!(Action::for_key(Key::Space), Some(Action::ToggleLock));
        assert_eq!(Action::for_key(Key::R), Some(Action::RandomPreset));
        assert_eq!(Action::for_key(Key::Backspace), Some(Action::LastPreset));
        assert_eq!(Action::for_key(Key::Other(97)), None);
    }

    #[test]
    fn parses_command_line_names() {
        assert_eq!(Key::from_name(" Space "), Some(Key::Space));
        assert_eq!(Key::from_name("down"), Some(Key::Down));
        assert_eq!(Key::from_name("q"), None);
    }
}
