//! # Match Prediction
//!
//! A simple rating based predictor for the outcome of a match. Every team is rated from its
//! completed matches:
//!
//! ```text
//! rating = 1000 + 500 * win_rate + 10 * average_margin
//! ```
//!
//! The win probability follows the logistic curve used by Elo ratings, with a rating difference
//! of 400 translating into odds of 10:1.
use std::fmt::{self, Display, Formatter};

use crate::{MatchStatus, SingleElimination, Slot};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The score a game is played to when no other target is configured.
pub const DEFAULT_TARGET_SCORE: u32 = 21;

/// The results of a team in its completed matches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TeamStats {
    pub wins: u32,
    pub losses: u32,
    pub points_scored: u32,
    pub points_allowed: u32,
}

impl TeamStats {
    /// Collects the stats of the entrant at `entrant` from all completed matches in the bracket
    /// that have scores. Matches resolved by a bye are not counted.
    pub fn from_bracket(bracket: &SingleElimination, entrant: usize) -> Self {
        let mut stats = Self::default();

        for r#match in bracket.matches().iter() {
            if r#match.status != MatchStatus::Completed {
                continue;
            }

            let scores = match r#match.scores {
                Some(scores) => scores,
                None => continue,
            };

            let position = match r#match
                .entrants
                .iter()
                .position(|slot| *slot == Slot::Entrant(entrant))
            {
                Some(position) => position,
                None => continue,
            };

            let ours = scores[position];
            let theirs = scores[1 - position];

            stats.points_scored = stats.points_scored.saturating_add(ours);
            stats.points_allowed = stats.points_allowed.saturating_add(theirs);

            if ours > theirs {
                stats.wins += 1;
            } else {
                stats.losses += 1;
            }
        }

        stats
    }

    /// Returns the number of completed games.
    #[inline]
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Returns the share of games won, `0.0` without any games.
    pub fn win_rate(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => f64::from(self.wins) / f64::from(games),
        }
    }

    /// Returns the average point margin per game, `0.0` without any games.
    pub fn average_margin(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => {
                (f64::from(self.points_scored) - f64::from(self.points_allowed)) / f64::from(games)
            }
        }
    }

    /// Returns the average points scored per game, `0.0` without any games.
    pub fn average_points(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => f64::from(self.points_scored) / f64::from(games),
        }
    }

    /// Returns the rating of the team.
    #[inline]
    pub fn rating(&self) -> f64 {
        1000.0 + 500.0 * self.win_rate() + 10.0 * self.average_margin()
    }
}

/// How much a [`Prediction`] can be trusted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Buckets a prediction by the absolute rating difference and the smaller number of games
    /// played by either team.
    pub fn new(rating_difference: f64, games: u32) -> Self {
        let difference = rating_difference.abs();

        if difference > 200.0 && games >= 3 {
            Self::High
        } else if difference > 100.0 && games >= 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Confidence {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The predicted outcome of a match between two teams.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Prediction {
    /// The probability of each team winning. Both values add up to `1.0`.
    pub win_probability: [f64; 2],
    pub predicted_score: [u32; 2],
    pub confidence: Confidence,
}

/// Predicts match outcomes from [`TeamStats`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Predictor {
    /// The score a game is played to.
    pub target_score: u32,
}

impl Predictor {
    #[inline]
    pub fn new(target_score: u32) -> Self {
        Self { target_score }
    }

    /// Predicts the outcome of a match between the teams `first` and `second`.
    pub fn predict(&self, first: &TeamStats, second: &TeamStats) -> Prediction {
        let difference = first.rating() - second.rating();

        let first_probability = 1.0 / (1.0 + 10_f64.powf(-difference / 400.0));
        let second_probability = 1.0 - first_probability;

        let games = first.games().min(second.games());

        Prediction {
            win_probability: [first_probability, second_probability],
            predicted_score: [
                self.score(first, first_probability),
                self.score(second, second_probability),
            ],
            confidence: Confidence::new(difference, games),
        }
    }

    /// Predicts every scheduled match in the bracket that has both of its entrants. Returns the
    /// index of the match together with its prediction.
    pub fn upcoming(&self, bracket: &SingleElimination) -> Vec<(usize, Prediction)> {
        bracket
            .matches()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.status == MatchStatus::Scheduled)
            .filter_map(|(index, m)| match m.entrants {
                [Slot::Entrant(first), Slot::Entrant(second)] => {
                    let first = TeamStats::from_bracket(bracket, first);
                    let second = TeamStats::from_bracket(bracket, second);

                    Some((index, self.predict(&first, &second)))
                }
                _ => None,
            })
            .collect()
    }

    fn score(&self, stats: &TeamStats, probability: f64) -> u32 {
        let score = f64::from(self.target_score) * probability + 0.3 * stats.average_points();
        score.round().max(0.0) as u32
    }
}

impl Default for Predictor {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SCORE)
    }
}
