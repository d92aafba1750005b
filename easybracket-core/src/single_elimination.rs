use std::collections::HashSet;

use crate::options::{BracketOptions, ByePlacement};
use crate::seeding;
use crate::utils::NumExt;
use crate::{Competitor, Entrants, Error, InputError, Match, MatchStatus, Matches, Result};
use crate::{Slot, StateError};

/// A single elimination tournament.
///
/// The bracket owns its [`Entrants`] and [`Matches`]. Matches are stored round by round: the
/// first round occupies the indices `0..size / 2`, where `size` is the number of entrants
/// rounded up to the next power of two, followed by every later round.
#[derive(Clone, Debug)]
pub struct SingleElimination {
    entrants: Entrants<Competitor>,
    matches: Matches,
    options: BracketOptions,
}

impl SingleElimination {
    /// Creates a new `SingleElimination` bracket from the `entrants`, ordered by seed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `entrants` is empty, contains the same competitor twice
    /// or contains a competitor without 1 or 2 members.
    pub fn new<I>(entrants: I, options: BracketOptions) -> Result<Self>
    where
        I: IntoIterator<Item = Competitor>,
    {
        log::debug!("Using options: {:?}", options);

        let entrants: Entrants<Competitor> = entrants.into_iter().collect();

        log::debug!(
            "Creating new SingleElimination bracket with {} entrants",
            entrants.len()
        );

        let matches = generate(&entrants, &options)?;

        log::debug!(
            "Created new SingleElimination bracket with {} matches",
            matches.len()
        );

        Ok(Self {
            entrants,
            matches,
            options,
        })
    }

    /// Resumes the bracket from existing matches.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `entrants` is invalid, `matches` has an invalid number of
    /// matches for `entrants` or a [`Slot`] in `matches` points to a value that is out-of-bounds.
    pub fn resume(
        entrants: Entrants<Competitor>,
        matches: Matches,
        options: BracketOptions,
    ) -> Result<Self> {
        log::debug!(
            "Trying to resume SingleElimination bracket with {} entrants and {} matches",
            entrants.len(),
            matches.len()
        );

        validate(&entrants)?;

        let expected = Self::calculate_matches(entrants.len());
        let found = matches.len();

        if found != expected {
            return Err(Error::InvalidNumberOfMatches { expected, found });
        }

        for m in matches.iter() {
            for slot in m.entrants.iter() {
                if let Slot::Entrant(index) = slot {
                    if *index >= entrants.len() {
                        return Err(Error::InvalidEntrant {
                            index: *index,
                            length: entrants.len(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            entrants,
            matches,
            options,
        })
    }

    /// Returns a reference to the entrants in the tournament.
    #[inline]
    pub fn entrants(&self) -> &Entrants<Competitor> {
        &self.entrants
    }

    /// Returns a reference to the matches in the tournament.
    #[inline]
    pub fn matches(&self) -> &Matches {
        &self.matches
    }

    #[inline]
    pub fn options(&self) -> &BracketOptions {
        &self.options
    }

    /// Consumes the bracket, returning its entrants and matches.
    #[inline]
    pub fn into_parts(self) -> (Entrants<Competitor>, Matches) {
        (self.entrants, self.matches)
    }

    /// Returns the competitor in `slot`.
    #[inline]
    pub fn entrant(&self, slot: Slot) -> Option<&Competitor> {
        self.entrants.get_slot(slot)
    }

    /// Returns the number of rounds in the bracket.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.entrants.len().ilog2_ceil()
    }

    /// Returns the matches of `round`, starting at 1. Returns an empty slice if the round does
    /// not exist.
    pub fn round(&self, round: usize) -> &[Match] {
        if round == 0 || round > self.rounds() {
            return &[];
        }

        let size = self.size();
        let start = size - (size >> (round - 1));
        let end = start + (size >> round);

        &self.matches[start..end]
    }

    /// Returns the index and slot of the match the winner of the match at `index` advances to.
    /// Returns `None` for the final or if `index` is out-of-bounds.
    #[inline]
    pub fn next_match(&self, index: usize) -> Option<(usize, usize)> {
        next_match(self.size(), self.matches.len(), index)
    }

    /// Returns an iterator over all matches that can be played now: both slots contain an
    /// entrant and the match is not completed.
    pub fn playable(&self) -> impl Iterator<Item = (usize, &Match)> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_ready() && !m.is_completed())
    }

    /// Returns the number of matches that require play, i.e. matches without a bye.
    pub fn contested_matches(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_bye()).count()
    }

    /// Returns the number of matches resolved by a bye.
    pub fn bye_matches(&self) -> usize {
        self.matches.iter().filter(|m| m.is_bye()).count()
    }

    /// Returns the winner of the tournament once the final is completed. A bracket with a single
    /// entrant is won by that entrant immediately.
    pub fn champion(&self) -> Option<&Competitor> {
        if self.entrants.len() == 1 {
            return self.entrants.first();
        }

        let winner = self.matches.last()?.winner()?;
        self.entrant(winner)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// Marks the match at `index` as in progress. Returns the indices of the changed matches,
    /// which is empty if the match is already in progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the match does not exist or does not contain two
    /// entrants yet. Returns [`Error::AlreadyCompleted`] if the match is completed.
    pub fn start_match(&mut self, index: usize) -> Result<Vec<usize>> {
        let r#match = self.get(index)?;

        if r#match.is_completed() {
            return Err(Error::AlreadyCompleted { index });
        }

        if !r#match.is_ready() {
            return Err(StateError::NotReady(index).into());
        }

        if r#match.status == MatchStatus::InProgress {
            return Ok(Vec::new());
        }

        log::debug!("Starting match {}", index);

        self.matches[index].status = MatchStatus::InProgress;
        Ok(vec![index])
    }

    /// Records the scores of the match at `index` and advances the winner into the next match.
    ///
    /// Returns the indices of all matches whose state changed. Recording the same scores again
    /// changes nothing and returns an empty list. No state is changed when an error is returned.
    ///
    /// When the match is already completed with different scores the result is replaced if
    /// [`BracketOptions::overwrite_allowed`] is set. If that changes the winner, all later
    /// results that depended on the previous winner are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the match does not exist, does not contain two
    /// entrants or both scores are equal. Returns [`Error::AlreadyCompleted`] if the match is
    /// completed with different scores and overwriting is not allowed.
    pub fn record_score(&mut self, index: usize, score1: u32, score2: u32) -> Result<Vec<usize>> {
        let r#match = self.get(index)?;

        if r#match.is_bye() {
            return Err(StateError::Bye(index).into());
        }

        if !r#match.is_ready() {
            return Err(StateError::NotReady(index).into());
        }

        if score1 == score2 {
            return Err(StateError::Tie(index).into());
        }

        let scores = [score1, score2];

        if r#match.is_completed() {
            if r#match.scores == Some(scores) {
                log::debug!("Match {} already has scores {:?}", index, scores);
                return Ok(Vec::new());
            }

            if !self.options.overwrite_allowed {
                return Err(Error::AlreadyCompleted { index });
            }

            log::debug!(
                "Overwriting scores of match {}: {:?} -> {:?}",
                index,
                r#match.scores,
                scores
            );
        }

        let previous = r#match.winner();

        let r#match = &mut self.matches[index];
        r#match.scores = Some(scores);
        r#match.status = MatchStatus::Completed;

        let winner = r#match.winner();

        log::debug!("Match {} completed, winner: {:?}", index, winner);

        let mut changed = vec![index];
        if previous.is_some() && previous != winner {
            self.clear_following(index, &mut changed);
        }

        let size = self.size();
        advance(&mut self.matches, size, index, &mut changed);

        Ok(changed)
    }

    /// Clears the result of the match at `index` and every later result that depended on it.
    /// Returns the indices of the changed matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the match does not exist or is resolved by a bye.
    pub fn reset_match(&mut self, index: usize) -> Result<Vec<usize>> {
        let r#match = self.get(index)?;

        if r#match.is_bye() {
            return Err(StateError::Bye(index).into());
        }

        if r#match.status == MatchStatus::Scheduled {
            return Ok(Vec::new());
        }

        log::debug!("Resetting match {}", index);

        let was_completed = r#match.is_completed();

        let r#match = &mut self.matches[index];
        r#match.scores = None;
        r#match.status = MatchStatus::Scheduled;

        let mut changed = vec![index];
        if was_completed {
            self.clear_following(index, &mut changed);
        }

        Ok(changed)
    }

    fn get(&self, index: usize) -> Result<&Match> {
        self.matches
            .get(index)
            .ok_or_else(|| StateError::UnknownMatch(index).into())
    }

    /// Removes the winner of the match at `index` from the following matches. Every following
    /// match that was played with that winner is reset.
    fn clear_following(&mut self, index: usize, changed: &mut Vec<usize>) {
        let mut index = index;

        while let Some((next, position)) = self.next_match(index) {
            let r#match = &mut self.matches[next];
            let was_completed = r#match.is_completed();

            r#match[position] = Slot::TBD;
            r#match.scores = None;
            r#match.status = MatchStatus::Scheduled;
            push_unique(changed, next);

            // Only completed matches have advanced their winner.
            if !was_completed {
                break;
            }

            index = next;
        }
    }

    /// Returns the number of entrants rounded up to the next power of two.
    #[inline]
    fn size(&self) -> usize {
        1 << self.rounds()
    }

    /// Calculates the number of matches required to build a [`SingleElimination`] tournament
    /// using `entrants`-number of entrants.
    fn calculate_matches(entrants: usize) -> usize {
        (1 << entrants.ilog2_ceil()) - 1
    }
}

/// Generates the matches of a single elimination bracket for the `competitors`, ordered by
/// seed.
///
/// The competitors are padded with byes up to the next power of two. Matches containing a bye
/// are completed immediately and the opposing slot advances, so the returned matches already
/// reflect all byes.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `competitors` is empty, contains the same competitor twice
/// or contains a competitor without 1 or 2 members.
pub fn generate(competitors: &[Competitor], options: &BracketOptions) -> Result<Matches> {
    validate(competitors)?;

    let entrants = competitors.len();
    let rounds = entrants.ilog2_ceil();
    let size = 1 << rounds;

    let field: Vec<Slot> = match options.bye_placement {
        ByePlacement::Standard => seeding::standard_order(size)
            .into_iter()
            .map(|seed| {
                if seed <= entrants {
                    Slot::Entrant(seed - 1)
                } else {
                    Slot::Bye
                }
            })
            .collect(),
        ByePlacement::Trailing => (0..size)
            .map(|index| {
                if index < entrants {
                    Slot::Entrant(index)
                } else {
                    Slot::Bye
                }
            })
            .collect(),
    };

    let mut matches = Matches::with_capacity(size - 1);

    for (index, pair) in field.chunks_exact(2).enumerate() {
        matches.push(Match::new(1, index + 1, [pair[0], pair[1]]));
    }

    for round in 2..=rounds {
        for position in 1..=size >> round {
            matches.push(Match::new(round, position, [Slot::TBD, Slot::TBD]));
        }
    }

    // Resolve all byes in the first round. Later rounds are resolved while advancing.
    let mut changed = Vec::new();
    for index in 0..size / 2 {
        if matches[index].is_bye() {
            matches[index].status = MatchStatus::Completed;
            advance(&mut matches, size, index, &mut changed);
        }
    }

    log::debug!(
        "Generated {} matches in {} rounds, {} resolved by byes",
        matches.len(),
        rounds,
        matches.iter().filter(|m| m.is_bye()).count()
    );

    Ok(matches)
}

fn validate(competitors: &[Competitor]) -> Result<()> {
    if competitors.is_empty() {
        return Err(InputError::Empty.into());
    }

    let mut ids = HashSet::with_capacity(competitors.len());
    for competitor in competitors {
        if !ids.insert(competitor.id) {
            return Err(InputError::DuplicateCompetitor(competitor.id).into());
        }

        let count = competitor.members.len();
        if !(1..=2).contains(&count) {
            return Err(InputError::InvalidMembers {
                id: competitor.id,
                count,
            }
            .into());
        }
    }

    Ok(())
}

/// Returns the index and slot of the match following the match at `index` in a bracket of
/// `size` entrants with `len` matches.
#[inline]
fn next_match(size: usize, len: usize, index: usize) -> Option<(usize, usize)> {
    if index + 1 >= len {
        None
    } else {
        Some((size / 2 + index / 2, index % 2))
    }
}

/// Moves the winner of the completed match at `index` into the following match. A following
/// match that is completed by a bye this way advances its winner too.
fn advance(matches: &mut Matches, size: usize, index: usize, changed: &mut Vec<usize>) {
    let mut index = index;

    loop {
        let winner = match matches[index].winner() {
            Some(winner) => winner,
            None => return,
        };

        let (next, position) = match next_match(size, matches.len(), index) {
            Some(next) => next,
            None => return,
        };

        let r#match = &mut matches[next];
        if r#match[position] == winner {
            return;
        }

        log::debug!(
            "Advancing {:?} from match {} to match {} (slot {})",
            winner,
            index,
            next,
            position
        );

        r#match[position] = winner;
        push_unique(changed, next);

        let resolved = r#match.status == MatchStatus::Scheduled
            && !r#match.entrants.iter().any(Slot::is_tbd)
            && r#match.is_bye();

        if !resolved {
            return;
        }

        r#match.status = MatchStatus::Completed;
        index = next;
    }
}

#[inline]
fn push_unique(changed: &mut Vec<usize>, index: usize) {
    if !changed.contains(&index) {
        changed.push(index);
    }
}
