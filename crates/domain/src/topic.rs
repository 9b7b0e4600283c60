//! Topic naming: the single place MQTT topics for a panel are derived.
//!
//! | Purpose | Topic |
//! |---------|-------|
//! | command root | `{prefix}/{name}/command/` |
//! | state subscription | `{prefix}/{name}/state/#` |
//! | light switch root | `{prefix}/{name}/light/` |
//! | brightness root | `{prefix}/{name}/brightness/` |
//! | availability | `{prefix}/{name}/status` |
//!
//! Publishers and subscribers both go through [`TopicSet`], so the two
//! sides can never drift apart.

/// Default prefix used by HASP firmware.
pub const DEFAULT_TOPIC_PREFIX: &str = "hasp";

/// Multi-level MQTT wildcard.
pub const MULTI_LEVEL_WILDCARD: char = '#';

/// Single-level MQTT wildcard.
pub const SINGLE_LEVEL_WILDCARD: char = '+';

/// Topic level separator.
pub const SEPARATOR: char = '/';

/// Every topic belonging to one node or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    pub command: String,
    pub state: String,
    pub light: String,
    pub brightness: String,
    pub availability: String,
}

impl TopicSet {
    /// Derive the topics for `name` under `prefix`.
    #[must_use]
    pub fn new(prefix: &str, name: &str) -> Self {
        Self {
            command: format!("{prefix}/{name}/command/"),
            state: format!("{prefix}/{name}/state/{MULTI_LEVEL_WILDCARD}"),
            light: format!("{prefix}/{name}/light/"),
            brightness: format!("{prefix}/{name}/brightness/"),
            availability: format!("{prefix}/{name}/status"),
        }
    }

    /// State subscription pattern with its trailing wildcard stripped.
    #[must_use]
    pub fn state_root(&self) -> &str {
        self.state
            .strip_suffix(MULTI_LEVEL_WILDCARD)
            .unwrap_or(&self.state)
    }

    /// Full topic for one attribute of one button, e.g. `hasp/kitchen/command/p1b3.txt`.
    #[must_use]
    pub fn command_for(&self, button_id: &str, attribute: CommandAttribute) -> String {
        format!("{}{button_id}.{}", self.command, attribute.suffix())
    }
}

/// Button attribute addressed by an outbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAttribute {
    /// Background color.
    Background,
    /// Foreground (text) color.
    Foreground,
    /// Displayed text.
    Text,
    /// Font size code.
    Font,
}

impl CommandAttribute {
    /// Topic suffix understood by the panel firmware.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Background => "bco",
            Self::Foreground => "pco",
            Self::Text => "txt",
            Self::Font => "font",
        }
    }
}

/// Whether `topic` is matched by the subscription `filter`.
///
/// `+` matches exactly one level and `#` matches the remaining levels,
/// including none (`a/#` matches `a`).
#[must_use]
pub fn topic_matches_filter(topic: &str, filter: &str) -> bool {
    let mut topic_levels = topic.split(SEPARATOR);
    let mut filter_levels = filter.split(SEPARATOR).peekable();

    while let Some(level) = filter_levels.next() {
        if level.len() == 1 && level.starts_with(MULTI_LEVEL_WILDCARD) {
            return filter_levels.peek().is_none();
        }
        match topic_levels.next() {
            Some(_) if level.len() == 1 && level.starts_with(SINGLE_LEVEL_WILDCARD) => {}
            Some(topic_level) if topic_level == level => {}
            _ => return false,
        }
    }

    topic_levels.next().is_none()
}

/// Whether `name` can be embedded as a single topic level.
#[must_use]
pub fn is_valid_level(name: &str) -> bool {
    !name.is_empty()
        && !name.contains([SEPARATOR, MULTI_LEVEL_WILDCARD, SINGLE_LEVEL_WILDCARD])
}
