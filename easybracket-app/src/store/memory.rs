use std::collections::{BTreeMap, HashMap};

use easybracket_core::{BracketOptions, Competitor, Entrants, Matches, SingleElimination};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{Event, SoloPlayer, Store, Team, Tournament};
use crate::id::{SoloPlayerId, TeamId, TournamentId};
use crate::{Error, Result};

/// The capacity of the change channel of a single tournament.
const CHANNEL_CAPACITY: usize = 32;

/// A [`Store`] keeping all data in memory.
///
/// Brackets are kept as serialized JSON records and resumed on every read, the same way they
/// would be loaded from a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    channels: RwLock<HashMap<TournamentId, broadcast::Sender<Event>>>,
}

#[derive(Debug, Default)]
struct Inner {
    tournaments: BTreeMap<TournamentId, Tournament>,
    teams: Vec<Team>,
    solo_players: Vec<SoloPlayer>,
    brackets: HashMap<TournamentId, Vec<u8>>,
}

#[derive(Serialize, Deserialize)]
struct BracketRecord {
    entrants: Entrants<Competitor>,
    matches: Matches,
    options: BracketOptions,
}

impl MemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_bracket(&self, tournament: TournamentId, bracket: &SingleElimination) -> Result<()> {
        let record = BracketRecord {
            entrants: bracket.entrants().clone(),
            matches: bracket.matches().clone(),
            options: *bracket.options(),
        };

        let data = serde_json::to_vec(&record)?;

        let mut inner = self.inner.write();
        if !inner.tournaments.contains_key(&tournament) {
            return Err(Error::NotFound);
        }

        inner.brackets.insert(tournament, data);
        Ok(())
    }

    fn notify(&self, tournament: TournamentId, event: Event) {
        let channels = self.channels.read();

        if let Some(tx) = channels.get(&tournament) {
            // Sending only fails without any receivers.
            let _ = tx.send(event);
        }
    }
}

impl Store for MemoryStore {
    fn insert_tournament(&self, tournament: &Tournament) -> Result<()> {
        let mut inner = self.inner.write();
        inner.tournaments.insert(tournament.id, tournament.clone());
        Ok(())
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>> {
        let inner = self.inner.read();
        Ok(inner.tournaments.get(&id).cloned())
    }

    fn update_tournament(&self, tournament: &Tournament) -> Result<()> {
        let mut inner = self.inner.write();

        match inner.tournaments.get_mut(&tournament.id) {
            Some(stored) => {
                *stored = tournament.clone();
                Ok(())
            }
            None => Err(Error::NotFound),
        }
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        let inner = self.inner.read();
        Ok(inner.tournaments.values().cloned().collect())
    }

    fn insert_team(&self, team: &Team) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.tournaments.contains_key(&team.tournament) {
            return Err(Error::NotFound);
        }

        inner.teams.push(team.clone());
        Ok(())
    }

    fn remove_team(&self, tournament: TournamentId, id: TeamId) -> Result<bool> {
        let mut inner = self.inner.write();

        let len = inner.teams.len();
        inner
            .teams
            .retain(|team| !(team.tournament == tournament && team.id == id));

        Ok(inner.teams.len() != len)
    }

    fn list_teams(&self, tournament: TournamentId) -> Result<Vec<Team>> {
        let inner = self.inner.read();

        Ok(inner
            .teams
            .iter()
            .filter(|team| team.tournament == tournament)
            .cloned()
            .collect())
    }

    fn update_seeds(&self, tournament: TournamentId, seeds: &[(TeamId, u32)]) -> Result<()> {
        let mut inner = self.inner.write();

        for (id, seed) in seeds {
            if let Some(team) = inner
                .teams
                .iter_mut()
                .find(|team| team.tournament == tournament && team.id == *id)
            {
                team.seed = Some(*seed);
            }
        }

        Ok(())
    }

    fn insert_solo_player(&self, player: &SoloPlayer) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.tournaments.contains_key(&player.tournament) {
            return Err(Error::NotFound);
        }

        inner.solo_players.push(player.clone());
        Ok(())
    }

    fn remove_solo_player(&self, tournament: TournamentId, id: SoloPlayerId) -> Result<bool> {
        let mut inner = self.inner.write();

        let len = inner.solo_players.len();
        inner
            .solo_players
            .retain(|player| !(player.tournament == tournament && player.id == id));

        Ok(inner.solo_players.len() != len)
    }

    fn list_unpaired(&self, tournament: TournamentId) -> Result<Vec<SoloPlayer>> {
        let inner = self.inner.read();

        Ok(inner
            .solo_players
            .iter()
            .filter(|player| player.tournament == tournament && !player.paired)
            .cloned()
            .collect())
    }

    fn mark_paired(&self, tournament: TournamentId, ids: &[SoloPlayerId]) -> Result<()> {
        let mut inner = self.inner.write();

        for player in inner.solo_players.iter_mut() {
            if player.tournament == tournament && ids.contains(&player.id) {
                player.paired = true;
            }
        }

        Ok(())
    }

    fn replace_bracket(&self, tournament: TournamentId, bracket: &SingleElimination) -> Result<()> {
        self.write_bracket(tournament, bracket)?;

        log::debug!("Stored new bracket for tournament {}", tournament);

        self.notify(
            tournament,
            Event::BracketCreated {
                matches: bracket.matches().clone(),
            },
        );

        Ok(())
    }

    fn get_bracket(&self, tournament: TournamentId) -> Result<Option<SingleElimination>> {
        let inner = self.inner.read();

        let data = match inner.brackets.get(&tournament) {
            Some(data) => data,
            None => return Ok(None),
        };

        let record: BracketRecord = serde_json::from_slice(data)?;
        let bracket = SingleElimination::resume(record.entrants, record.matches, record.options)?;

        Ok(Some(bracket))
    }

    fn update_matches(
        &self,
        tournament: TournamentId,
        bracket: &SingleElimination,
        indexes: &[usize],
    ) -> Result<()> {
        self.write_bracket(tournament, bracket)?;

        log::debug!(
            "Stored {} updated matches for tournament {}",
            indexes.len(),
            tournament
        );

        for index in indexes {
            if let Some(r#match) = bracket.matches().get(*index) {
                self.notify(
                    tournament,
                    Event::MatchUpdated {
                        index: *index,
                        r#match: r#match.clone(),
                    },
                );
            }
        }

        Ok(())
    }

    fn subscribe(&self, tournament: TournamentId) -> broadcast::Receiver<Event> {
        if let Some(tx) = self.channels.read().get(&tournament) {
            return tx.subscribe();
        }

        let mut channels = self.channels.write();
        channels
            .entry(tournament)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use easybracket_core::{BracketOptions, Competitor, MatchStatus, SingleElimination, Slot};
    use tokio::sync::broadcast::error::TryRecvError;

    use super::MemoryStore;
    use crate::id::{SoloPlayerId, TeamId, TournamentId, UserId};
    use crate::store::{Event, SoloPlayer, Store, Team, Tournament, TournamentStatus};
    use crate::Error;

    fn tournament(store: &MemoryStore) -> TournamentId {
        let tournament = Tournament {
            id: TournamentId::generate(),
            name: String::from("Summer Cup"),
            date: NaiveDate::from_ymd_opt(2024, 7, 6).unwrap(),
            location: String::from("Town Park"),
            status: TournamentStatus::Setup,
            created_by: UserId(1),
            created_at: Utc::now(),
        };

        store.insert_tournament(&tournament).unwrap();
        tournament.id
    }

    fn team(tournament: TournamentId, id: u64) -> Team {
        Team {
            id: TeamId(id),
            tournament,
            name: format!("Team {}", id),
            players: vec![format!("Player {}", id)],
            seed: None,
        }
    }

    fn bracket(store: &MemoryStore, tournament: TournamentId) -> SingleElimination {
        let competitors: Vec<Competitor> = store
            .list_teams(tournament)
            .unwrap()
            .iter()
            .map(Competitor::from)
            .collect();

        SingleElimination::new(competitors, BracketOptions::default()).unwrap()
    }

    #[test]
    fn test_memory_store_tournaments() {
        let store = MemoryStore::new();
        let first = tournament(&store);
        let second = tournament(&store);

        let ids: Vec<TournamentId> = store
            .list_tournaments()
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![first, second]);

        let mut stored = store.get_tournament(first).unwrap().unwrap();
        stored.status = TournamentStatus::Active;
        store.update_tournament(&stored).unwrap();
        assert_eq!(
            store.get_tournament(first).unwrap().unwrap().status,
            TournamentStatus::Active
        );

        assert_eq!(store.get_tournament(TournamentId(0)).unwrap(), None);

        stored.id = TournamentId(0);
        assert!(matches!(
            store.update_tournament(&stored),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_memory_store_teams() {
        let store = MemoryStore::new();
        let id = tournament(&store);
        let other = tournament(&store);

        for n in [3, 1, 2] {
            store.insert_team(&team(id, n)).unwrap();
        }
        store.insert_team(&team(other, 4)).unwrap();

        let names: Vec<String> = store
            .list_teams(id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Team 3", "Team 1", "Team 2"]);

        store
            .update_seeds(id, &[(TeamId(1), 1), (TeamId(3), 2)])
            .unwrap();
        let seeds: Vec<Option<u32>> = store
            .list_teams(id)
            .unwrap()
            .into_iter()
            .map(|t| t.seed)
            .collect();
        assert_eq!(seeds, vec![Some(2), Some(1), None]);

        assert!(store.remove_team(id, TeamId(1)).unwrap());
        assert!(!store.remove_team(id, TeamId(1)).unwrap());
        assert!(!store.remove_team(id, TeamId(4)).unwrap());
        assert_eq!(store.list_teams(id).unwrap().len(), 2);
        assert_eq!(store.list_teams(other).unwrap().len(), 1);

        assert!(matches!(
            store.insert_team(&team(TournamentId(0), 5)),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_memory_store_solo_players() {
        let store = MemoryStore::new();
        let id = tournament(&store);

        for (n, name) in ["Ann", "Bob", "Cid"].iter().enumerate() {
            store
                .insert_solo_player(&SoloPlayer {
                    id: SoloPlayerId(n as u64),
                    tournament: id,
                    name: name.to_string(),
                    paired: false,
                })
                .unwrap();
        }

        store
            .mark_paired(id, &[SoloPlayerId(0), SoloPlayerId(1)])
            .unwrap();

        let unpaired = store.list_unpaired(id).unwrap();
        assert_eq!(unpaired.len(), 1);
        assert_eq!(unpaired[0].name, "Cid");

        assert!(store.remove_solo_player(id, SoloPlayerId(2)).unwrap());
        assert!(store.list_unpaired(id).unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_bracket() {
        let store = MemoryStore::new();
        let id = tournament(&store);

        for n in 1..=5 {
            store.insert_team(&team(id, n)).unwrap();
        }

        assert!(store.get_bracket(id).unwrap().is_none());

        let mut bracket = bracket(&store, id);
        store.replace_bracket(id, &bracket).unwrap();

        let stored = store.get_bracket(id).unwrap().unwrap();
        assert_eq!(stored.matches(), bracket.matches());
        assert_eq!(stored.entrants(), bracket.entrants());

        let changed = bracket.record_score(1, 21, 17).unwrap();
        store.update_matches(id, &bracket, &changed).unwrap();

        let stored = store.get_bracket(id).unwrap().unwrap();
        assert_eq!(stored.matches()[1].status, MatchStatus::Completed);
        assert_eq!(stored.matches()[1].scores, Some([21, 17]));

        assert!(matches!(
            store.replace_bracket(TournamentId(0), &bracket),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_memory_store_events() {
        let store = MemoryStore::new();
        let id = tournament(&store);

        for n in 1..=4 {
            store.insert_team(&team(id, n)).unwrap();
        }

        let mut bracket = bracket(&store, id);

        // Writes without subscribers are not buffered.
        store.replace_bracket(id, &bracket).unwrap();

        let mut rx = store.subscribe(id);
        let mut other = store.subscribe(tournament(&store));

        store.replace_bracket(id, &bracket).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::BracketCreated {
                matches: bracket.matches().clone(),
            }
        );

        let changed = bracket.record_score(0, 21, 9).unwrap();
        store.update_matches(id, &bracket, &changed).unwrap();

        match rx.try_recv().unwrap() {
            Event::MatchUpdated { index, r#match } => {
                assert_eq!(index, 0);
                assert_eq!(r#match.status, MatchStatus::Completed);
            }
            event => panic!("unexpected event: {:?}", event),
        }

        match rx.try_recv().unwrap() {
            Event::MatchUpdated { index, r#match } => {
                assert_eq!(index, 2);
                assert_eq!(r#match.entrants, [Slot::Entrant(0), Slot::TBD]);
            }
            event => panic!("unexpected event: {:?}", event),
        }

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(other.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_event_serialize() {
        let event = Event::BracketCreated {
            matches: Default::default(),
        };

        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"bracket-created","matches":[]}"#
        );
    }
}
