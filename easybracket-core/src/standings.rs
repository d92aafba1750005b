//! # Standings
//!
//! Final placements computed from the played matches of a bracket.
use std::iter::FusedIterator;

use crate::{MatchStatus, SingleElimination};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The placements of all entrants that played at least one scored match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Standings {
    entries: Vec<Entry>,
}

impl Standings {
    /// Computes the standings from the completed, scored matches of the `bracket`.
    ///
    /// Entries are ordered by wins, then by point differential, both descending. Entrants with
    /// the same record keep their entrant order.
    pub fn from_bracket(bracket: &SingleElimination) -> Self {
        let mut entries: Vec<Entry> = (0..bracket.entrants().len())
            .map(|index| Entry {
                place: 0,
                index,
                wins: 0,
                losses: 0,
                point_differential: 0,
            })
            .collect();

        for r#match in bracket.matches().iter() {
            if r#match.status != MatchStatus::Completed {
                continue;
            }

            let scores = match r#match.scores {
                Some(scores) => scores,
                None => continue,
            };

            for (position, slot) in r#match.entrants.iter().enumerate() {
                let index = match slot.entrant() {
                    Some(index) => index,
                    None => continue,
                };

                let entry = match entries.get_mut(index) {
                    Some(entry) => entry,
                    None => continue,
                };

                let ours = i64::from(scores[position]);
                let theirs = i64::from(scores[1 - position]);

                entry.point_differential += ours - theirs;
                if ours > theirs {
                    entry.wins += 1;
                } else {
                    entry.losses += 1;
                }
            }
        }

        entries.retain(|entry| entry.games() > 0);
        entries.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(b.point_differential.cmp(&a.point_differential))
        });

        for (index, entry) in entries.iter_mut().enumerate() {
            entry.place = index + 1;
        }

        log::debug!("Computed standings for {} entrants", entries.len());

        Self { entries }
    }

    /// Returns the entry at `place`, starting at 1.
    #[inline]
    pub fn place(&self, place: usize) -> Option<&Entry> {
        place.checked_sub(1).and_then(|index| self.entries.get(index))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: &'a Standings,
    next: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.entries.get(self.next)?;
        self.next += 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.entries.len() - self.next
    }
}

impl<'a> FusedIterator for Iter<'a> {}

/// The record of a single entrant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    /// The final placement, starting at 1.
    pub place: usize,
    /// The index of the entrant in the bracket.
    pub index: usize,
    pub wins: u32,
    pub losses: u32,
    pub point_differential: i64,
}

impl Entry {
    #[inline]
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }
}
