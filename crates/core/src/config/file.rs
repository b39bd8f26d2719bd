//! Reader for projectM's `key = value` config file format.

use std::{collections::HashMap, fs, path::Path, str::FromStr};

use crate::Result;

/// Separates a key from its value.
pub const DELIMITER: char = '=';

/// Starts a comment that runs to the end of the line.
pub const COMMENT: char = '#';

/// A line containing this marker ends parsing; everything after it is ignored.
pub const SENTRY: &str = "EndConfigFile";

/// Flat `Key = Value` store read from a config file.
///
/// Lines without a delimiter that directly follow a key are treated as a
/// continuation of that key's value and joined with a newline. Continuation
/// stops at a blank line, the next key, the sentry or the end of input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    entries: HashMap<String, String>,
}

impl ConfigFile {
    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Parses config text. Parsing never fails; malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        let mut lines = text.lines().peekable();

        while let Some(raw) = lines.next() {
            let line = strip_comment(raw);
            if line.contains(SENTRY) {
                break;
            }

            let Some((key, first)) = line.split_once(DELIMITER) else {
                continue;
            };

            let mut value = first.to_string();
            while let Some(next) = lines.peek() {
                if next.trim().is_empty() {
                    break;
                }
                let stripped = strip_comment(next);
                if stripped.contains(DELIMITER) || stripped.contains(SENTRY) {
                    break;
                }
                if !stripped.trim().is_empty() {
                    value.push('\n');
                    value.push_str(stripped);
                }
                lines.next();
            }

            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        Self { entries }
    }

    /// Returns the raw value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads `key` as `T`. Like stream extraction, the longest leading part
    /// of the value that parses is used, so `30.5` reads as `30` for an
    /// integer. Falls back to `default` when the key is absent or no prefix
    /// parses.
    pub fn read<T: FromStr>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get(key) else {
            return default;
        };

        if let Ok(value) = raw.parse() {
            return value;
        }
        match parse_leading(raw) {
            Some(value) => {
                tracing::debug!(key, value = raw, "using leading part of config value");
                value
            }
            None => {
                tracing::warn!(key, value = raw, "ignoring unparsable config value");
                default
            }
        }
    }

    /// Reads `key` as a boolean. `false`, `f`, `no`, `n`, `0` and `none` are
    /// false (any case); every other present value is true.
    pub fn read_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(raw) => !matches!(
                raw.to_ascii_lowercase().as_str(),
                "false" | "f" | "no" | "n" | "0" | "none"
            ),
        }
    }
}

fn parse_leading<T: FromStr>(raw: &str) -> Option<T> {
    (1..raw.len())
        .rev()
        .filter(|&end| raw.is_char_boundary(end))
        .find_map(|end| raw[..end].parse().ok())
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    }
}
