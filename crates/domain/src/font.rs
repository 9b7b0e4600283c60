//! Font-size policy for button text.
//!
//! Panels offer four font sizes; `3` is the largest. Shorter labels get a
//! larger font so they fill the button.

use std::fmt;

use crate::error::ValidationError;

/// A panel font size code in `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontSize(u8);

impl FontSize {
    pub const LARGEST: Self = Self(3);

    /// Pick the font size for `text` from its character count.
    ///
    /// | length | size |
    /// |--------|------|
    /// | 0..=6 | 3 |
    /// | 7..=10 | 2 |
    /// | 11..=15 | 1 |
    /// | 16.. | 0 |
    #[must_use]
    pub fn for_text(text: &str) -> Self {
        Self::for_length(text.chars().count())
    }

    /// Pick the font size for a label of `length` characters.
    #[must_use]
    pub fn for_length(length: usize) -> Self {
        match length {
            0..=6 => Self(3),
            7..=10 => Self(2),
            11..=15 => Self(1),
            _ => Self(0),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for FontSize {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(size) if size <= Self::LARGEST.0 => Ok(Self(size)),
            _ => Err(ValidationError::FontSizeOutOfRange(value)),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
