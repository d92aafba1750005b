//! # easybracket-core
//!
//! This crate contains everything required to run a single elimination bracket: generating the
//! match tree from a seeded list of competitors, recording scores and advancing winners, and
//! predicting the outcome of upcoming matches.
//!
//! Important types:
//! - [`Competitor`]: A team (or single player) registered for the tournament.
//! - [`Entrants`]: A wrapper around `Vec<T>` where `T` is an entrant in a tournament.
//! - [`Matches`]: A `Vec` of matches contained in the tournament, stored round by round.
//! - [`Match`]: A *match* of two parties, with optional scores and a [`MatchStatus`].
//! - [`Slot`]: A *spot* within a match, which can contain an entrant, a bye or a to-be-done
//! spot.
//! - [`SingleElimination`]: The bracket itself.
//! - [`Predictor`]: A rating based match outcome predictor.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to almost all types.
//!
pub mod options;
pub mod predict;
pub mod seeding;
pub mod standings;

mod single_elimination;
mod utils;

pub use options::{BracketOptions, ByePlacement};
pub use predict::{Confidence, Prediction, Predictor, TeamStats};
pub use single_elimination::{generate, SingleElimination};
pub use standings::Standings;

use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::result;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The identifier of a [`Competitor`]. Identifiers must be unique within a bracket.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CompetitorId(pub u64);

impl Display for CompetitorId {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for CompetitorId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single competitor of the tournament. This is either a team of two members or a single
/// player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub members: Vec<String>,
    /// The seed rank of the competitor. A lower rank is a stronger competitor.
    pub seed: Option<u32>,
}

impl Competitor {
    /// Creates a new unseeded `Competitor`.
    pub fn new<I, N, M>(id: I, name: N, members: M) -> Self
    where
        I: Into<CompetitorId>,
        N: ToString,
        M: IntoIterator,
        M::Item: ToString,
    {
        Self {
            id: id.into(),
            name: name.to_string(),
            members: members.into_iter().map(|m| m.to_string()).collect(),
            seed: None,
        }
    }

    /// Sets the seed rank of the `Competitor`.
    #[inline]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A wrapper around a `Vec<T>` where `T` should be considered an entrant for a tournament.
///
/// This is a wrapper around a `Vec<T>` and has the same layout as a `Vec<T>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entrants<T> {
    entrants: Vec<T>,
}

impl<T> Entrants<T> {
    /// Creates a new empty `Entrants` list.
    #[inline]
    pub fn new() -> Self {
        Self {
            entrants: Vec::new(),
        }
    }

    /// Creates a new empty `Entrants` list with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entrants: Vec::with_capacity(capacity),
        }
    }

    /// Returns the entrant referred to by `slot`. Returns `None` if the slot does not contain an
    /// entrant or the entrant is out-of-bounds.
    #[inline]
    pub fn get_slot(&self, slot: Slot) -> Option<&T> {
        slot.entrant().and_then(|index| self.entrants.get(index))
    }
}

impl<T> FromIterator<T> for Entrants<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entrants = iter.into_iter().collect();

        Self { entrants }
    }
}

impl<T> IntoIterator for Entrants<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entrants.into_iter()
    }
}

impl<T> Deref for Entrants<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entrants
    }
}

impl<T> DerefMut for Entrants<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entrants
    }
}

impl<T> From<Vec<T>> for Entrants<T> {
    #[inline]
    fn from(entrants: Vec<T>) -> Self {
        Self { entrants }
    }
}

/// A wrapper around a `Vec<Match>`. Matches are stored round by round, starting with the first
/// round. The identifier of a match is its index.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Matches {
    matches: Vec<Match>,
}

impl Matches {
    #[inline]
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matches: Vec::with_capacity(capacity),
        }
    }
}

impl Deref for Matches {
    type Target = Vec<Match>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.matches
    }
}

impl DerefMut for Matches {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.matches
    }
}

impl<U> PartialEq<U> for Matches
where
    U: AsRef<[Match]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.matches == other.as_ref()
    }
}

impl Eq for Matches {}

impl AsRef<[Match]> for Matches {
    #[inline]
    fn as_ref(&self) -> &[Match] {
        &self.matches
    }
}

impl From<Vec<Match>> for Matches {
    #[inline]
    fn from(matches: Vec<Match>) -> Self {
        Self { matches }
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),
    #[error("match {index} is already completed")]
    AlreadyCompleted { index: usize },
    #[error("invalid number of matches: expected {expected}, found {found}")]
    InvalidNumberOfMatches { expected: usize, found: usize },
    #[error(
        "invalid entrant: match refers to entrant at {index} but only {length} entrants are given"
    )]
    InvalidEntrant { index: usize, length: usize },
}

/// The reason a list of competitors was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("no competitors given")]
    Empty,
    #[error("competitor {0} appears more than once")]
    DuplicateCompetitor(CompetitorId),
    #[error("competitor {id} has {count} members, expected 1 or 2")]
    InvalidMembers { id: CompetitorId, count: usize },
}

/// The reason an operation on a match was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no match with index {0}")]
    UnknownMatch(usize),
    #[error("match {0} is waiting for its entrants")]
    NotReady(usize),
    #[error("match {0} is resolved by a bye")]
    Bye(usize),
    #[error("match {0} cannot end in a tie")]
    Tie(usize),
}

/// The state of a [`Match`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl Display for MatchStatus {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A match between two parties.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    /// The round of the match, starting at 1.
    pub round: usize,
    /// The position of the match within its round, starting at 1.
    pub position: usize,
    pub entrants: [Slot; 2],
    pub scores: Option<[u32; 2]>,
    pub status: MatchStatus,
}

impl Match {
    /// Creates a new scheduled `Match` without any scores.
    #[inline]
    pub fn new(round: usize, position: usize, entrants: [Slot; 2]) -> Self {
        Self {
            round,
            position,
            entrants,
            scores: None,
            status: MatchStatus::Scheduled,
        }
    }

    /// Returns `true` if any of the slots of the match is a [`Slot::Bye`]. Such a match is never
    /// played.
    #[inline]
    pub fn is_bye(&self) -> bool {
        self.entrants.iter().any(Slot::is_bye)
    }

    /// Returns `true` if both slots contain an entrant.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.entrants.iter().all(Slot::is_entrant)
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Returns the position of the winning slot, `0` or `1`.
    ///
    /// The winner is only known once the match is completed. A scored match is won by the slot
    /// with the higher score, a bye match by the slot that is not a bye.
    pub fn winner_position(&self) -> Option<usize> {
        if !self.is_completed() {
            return None;
        }

        match self.scores {
            Some([first, second]) if first > second => Some(0),
            Some([first, second]) if second > first => Some(1),
            Some(_) => None,
            None => match self.entrants {
                [_, Slot::Bye] => Some(0),
                [Slot::Bye, _] => Some(1),
                _ => None,
            },
        }
    }

    /// Returns the winning [`Slot`] of the match. See [`winner_position`] for details.
    ///
    /// [`winner_position`]: Self::winner_position
    #[inline]
    pub fn winner(&self) -> Option<Slot> {
        self.winner_position().map(|index| self.entrants[index])
    }

    /// Returns the losing [`Slot`] of the match.
    #[inline]
    pub fn loser(&self) -> Option<Slot> {
        self.winner_position().map(|index| self.entrants[1 - index])
    }
}

impl Index<usize> for Match {
    type Output = Slot;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.entrants[index]
    }
}

impl IndexMut<usize> for Match {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.entrants[index]
    }
}

/// A spot for an entrant in the bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slot {
    /// The entrant at the given index of the [`Entrants`] of the bracket.
    Entrant(usize),
    /// No opponent. The other party advances without playing.
    Bye,
    /// Waiting for the winner of an earlier match.
    TBD,
}

impl Slot {
    /// Returns `true` if the `Slot` is [`Entrant`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use easybracket_core::Slot;
    /// let slot = Slot::Entrant(0);
    /// assert!(slot.is_entrant());
    /// ```
    ///
    /// [`Entrant`]: Self::Entrant
    #[inline]
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns `true` if the `Slot` is [`Bye`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use easybracket_core::Slot;
    /// assert!(Slot::Bye.is_bye());
    /// ```
    ///
    /// [`Bye`]: Self::Bye
    #[inline]
    pub fn is_bye(&self) -> bool {
        matches!(self, Self::Bye)
    }

    /// Returns `true` if the `Slot` is [`TBD`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use easybracket_core::Slot;
    /// assert!(Slot::TBD.is_tbd());
    /// ```
    ///
    /// [`TBD`]: Self::TBD
    #[inline]
    pub fn is_tbd(&self) -> bool {
        matches!(self, Self::TBD)
    }

    /// Returns the index of the entrant, if the `Slot` contains one.
    #[inline]
    pub fn entrant(&self) -> Option<usize> {
        match self {
            Self::Entrant(index) => Some(*index),
            _ => None,
        }
    }
}
