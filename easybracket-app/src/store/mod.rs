//! Persistence of tournaments, teams, solo players and brackets.
//!
//! A [`Store`] is also responsible for announcing changes: every successful bracket write is
//! broadcast as an [`Event`] to all subscribers of the tournament.
mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, NaiveDate, Utc};
use easybracket_core::{Competitor, Match, Matches, SingleElimination};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::{SoloPlayerId, TeamId, TournamentId, UserId};
use crate::Result;

pub trait Store {
    fn insert_tournament(&self, tournament: &Tournament) -> Result<()>;

    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>>;

    fn update_tournament(&self, tournament: &Tournament) -> Result<()>;

    /// Returns all tournaments, oldest first.
    fn list_tournaments(&self) -> Result<Vec<Tournament>>;

    fn insert_team(&self, team: &Team) -> Result<()>;

    /// Removes the team, returning whether it existed.
    fn remove_team(&self, tournament: TournamentId, id: TeamId) -> Result<bool>;

    /// Returns the teams of the tournament in registration order.
    fn list_teams(&self, tournament: TournamentId) -> Result<Vec<Team>>;

    /// Updates the seed of every listed team.
    fn update_seeds(&self, tournament: TournamentId, seeds: &[(TeamId, u32)]) -> Result<()>;

    fn insert_solo_player(&self, player: &SoloPlayer) -> Result<()>;

    /// Removes the solo player, returning whether it existed.
    fn remove_solo_player(&self, tournament: TournamentId, id: SoloPlayerId) -> Result<bool>;

    /// Returns all solo players of the tournament that are not part of a team yet, in
    /// registration order.
    fn list_unpaired(&self, tournament: TournamentId) -> Result<Vec<SoloPlayer>>;

    fn mark_paired(&self, tournament: TournamentId, ids: &[SoloPlayerId]) -> Result<()>;

    /// Stores the bracket of the tournament, replacing any previous bracket. Emits
    /// [`Event::BracketCreated`].
    fn replace_bracket(&self, tournament: TournamentId, bracket: &SingleElimination) -> Result<()>;

    fn get_bracket(&self, tournament: TournamentId) -> Result<Option<SingleElimination>>;

    /// Stores the bracket after the matches at `indexes` have changed. Emits an
    /// [`Event::MatchUpdated`] for every changed match.
    fn update_matches(
        &self,
        tournament: TournamentId,
        bracket: &SingleElimination,
        indexes: &[usize],
    ) -> Result<()>;

    /// Subscribes to the bracket changes of the tournament.
    fn subscribe(&self, tournament: TournamentId) -> broadcast::Receiver<Event>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub status: TournamentStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentStatus {
    /// Teams are registered and seeded.
    #[default]
    Setup,
    /// The bracket was generated and matches are played.
    Active,
    /// The final was played.
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub tournament: TournamentId,
    pub name: String,
    pub players: Vec<String>,
    pub seed: Option<u32>,
}

impl From<&Team> for Competitor {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.into(),
            name: team.name.clone(),
            members: team.players.clone(),
            seed: team.seed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoloPlayer {
    pub id: SoloPlayerId,
    pub tournament: TournamentId,
    pub name: String,
    pub paired: bool,
}

/// A change to the bracket of a tournament.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    BracketCreated {
        matches: Matches,
    },
    MatchUpdated {
        index: usize,
        #[serde(rename = "match")]
        r#match: Match,
    },
}
