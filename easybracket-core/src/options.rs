//! # Bracket Options
//!
//! A bracket can be configured in two ways: where the byes of an uneven field are placed and
//! whether a recorded result may be replaced by a different one.
//!
//! [`BracketOptions`] is a small builder-style struct. Unset options use their defaults, see
//! [`BracketOptions::default`].
#[cfg(feature = "serde")]
mod serde_impl;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown bye placement {0}, expected \"standard\" or \"trailing\"")]
    UnknownPlacement(String),
}

/// The options of a [`SingleElimination`] bracket.
///
/// [`SingleElimination`]: crate::SingleElimination
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BracketOptions {
    /// Replace a completed result when different scores are recorded for it. When disabled
    /// recording different scores fails with [`Error::AlreadyCompleted`].
    ///
    /// [`Error::AlreadyCompleted`]: crate::Error::AlreadyCompleted
    pub overwrite_allowed: bool,
    pub bye_placement: ByePlacement,
}

impl BracketOptions {
    /// Creates new `BracketOptions` using the default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn overwrite_allowed(mut self, overwrite_allowed: bool) -> Self {
        self.overwrite_allowed = overwrite_allowed;
        self
    }

    #[inline]
    pub fn bye_placement(mut self, bye_placement: ByePlacement) -> Self {
        self.bye_placement = bye_placement;
        self
    }
}

/// Where byes are placed when the number of competitors is not a power of two.
///
/// The competitors given to the bracket are always treated as ordered by seed. The bracket
/// never reorders them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByePlacement {
    /// Standard bracket seeding: seed 1 plays the lowest seed, seed 2 the second lowest and so
    /// on, with the top seeds meeting as late as possible. Missing seeds are byes, so the
    /// highest seeds receive the byes.
    #[default]
    Standard,
    /// Byes are appended after the last competitor and neighbours are paired. This can create
    /// matches between two byes.
    Trailing,
}

impl ByePlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Trailing => "trailing",
        }
    }
}

impl Display for ByePlacement {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ByePlacement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "trailing" => Ok(Self::Trailing),
            _ => Err(Error::UnknownPlacement(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BracketOptions, ByePlacement, Error};

    #[test]
    fn test_bracket_options_builder() {
        let options = BracketOptions::new();
        assert!(!options.overwrite_allowed);
        assert_eq!(options.bye_placement, ByePlacement::Standard);

        let options = BracketOptions::new()
            .overwrite_allowed(true)
            .bye_placement(ByePlacement::Trailing);
        assert!(options.overwrite_allowed);
        assert_eq!(options.bye_placement, ByePlacement::Trailing);
    }

    #[test]
    fn test_bye_placement_parse() {
        assert_eq!("standard".parse(), Ok(ByePlacement::Standard));
        assert_eq!("trailing".parse(), Ok(ByePlacement::Trailing));
        assert_eq!(
            "random".parse::<ByePlacement>(),
            Err(Error::UnknownPlacement(String::from("random")))
        );
    }
}
