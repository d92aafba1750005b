//! The application controller.
//!
//! The [`Controller`] holds the [`AppState`] of a single user and performs every operation of
//! the application through its injected [`Store`] and [`Auth`] collaborators.
use chrono::{NaiveDate, Utc};
use easybracket_core::{
    seeding, BracketOptions, Competitor, MatchStatus, Prediction, Predictor, SingleElimination,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::auth::{Auth, Session, User};
use crate::id::{SoloPlayerId, TeamId, TournamentId};
use crate::report::Report;
use crate::store::{Event, SoloPlayer, Store, Team, Tournament, TournamentStatus};
use crate::{Config, Error, Result};

/// The screens of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    SignIn,
    CreateTournament,
    Teams,
    Seeding,
    Bracket,
    Dashboard,
    Report,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub page: Page,
    /// The currently opened tournament.
    pub tournament: Option<TournamentId>,
    pub session: Option<Session>,
}

/// Match counts of the current tournament. Matches resolved by a bye are not counted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub teams: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub scheduled: usize,
}

impl Dashboard {
    /// Returns the share of completed matches in percent.
    pub fn progress(&self) -> u32 {
        let total = self.completed + self.in_progress + self.scheduled;

        match total {
            0 => 0,
            _ => (self.completed * 100 / total) as u32,
        }
    }
}

#[derive(Debug)]
pub struct Controller<S, A>
where
    S: Store,
    A: Auth,
{
    store: S,
    auth: A,
    state: AppState,
    options: BracketOptions,
    predictor: Predictor,
}

impl<S, A> Controller<S, A>
where
    S: Store,
    A: Auth,
{
    pub fn new(store: S, auth: A, config: &Config) -> Self {
        let state = AppState {
            session: auth.session(),
            ..Default::default()
        };

        Self {
            store,
            auth,
            state,
            options: config.bracket.options(),
            predictor: Predictor::new(config.predictions.target_score),
        }
    }

    #[inline]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn auth(&self) -> &A {
        &self.auth
    }

    #[inline]
    pub fn navigate(&mut self, page: Page) {
        log::debug!("Navigating to {:?}", page);
        self.state.page = page;
    }

    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.auth.sign_up(email, password)?;
        self.state.page = Page::SignIn;
        Ok(user)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        let session = self.auth.sign_in(email, password)?;

        log::info!("Signed in as {}", session.user.email);

        self.state.session = Some(session.clone());
        self.state.page = Page::Home;
        Ok(session)
    }

    pub fn sign_out(&mut self) -> Result<()> {
        self.auth.sign_out()?;

        self.state = AppState::default();
        Ok(())
    }

    /// Creates a new tournament owned by the signed in user and opens it.
    pub fn create_tournament(
        &mut self,
        name: &str,
        date: NaiveDate,
        location: &str,
    ) -> Result<Tournament> {
        let session = self.require_session()?;

        let tournament = Tournament {
            id: TournamentId::generate(),
            name: name.trim().to_owned(),
            date,
            location: location.trim().to_owned(),
            status: TournamentStatus::Setup,
            created_by: session.user.id,
            created_at: Utc::now(),
        };

        self.store.insert_tournament(&tournament)?;

        log::info!("Created tournament {} ({})", tournament.name, tournament.id);

        self.state.tournament = Some(tournament.id);
        self.state.page = Page::Teams;
        Ok(tournament)
    }

    /// Opens an existing tournament, showing the page matching its status.
    pub fn open_tournament(&mut self, id: TournamentId) -> Result<Tournament> {
        let tournament = self.store.get_tournament(id)?.ok_or(Error::NotFound)?;

        self.state.tournament = Some(id);
        self.state.page = match tournament.status {
            TournamentStatus::Setup => Page::Teams,
            TournamentStatus::Active => Page::Dashboard,
            TournamentStatus::Completed => Page::Report,
        };

        Ok(tournament)
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>> {
        self.store.list_tournaments()
    }

    /// Returns the currently opened tournament.
    pub fn tournament(&self) -> Result<Tournament> {
        let id = self.state.tournament.ok_or(Error::NoTournament)?;
        self.store.get_tournament(id)?.ok_or(Error::NotFound)
    }

    /// Registers a team of 1 or 2 players. Without a `name` the team is named after its players.
    pub fn add_team<I, P>(&mut self, players: I, name: Option<&str>) -> Result<Team>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let tournament = self.setup_tournament()?;

        let players: Vec<String> = players
            .into_iter()
            .map(|player| player.as_ref().trim().to_owned())
            .filter(|player| !player.is_empty())
            .collect();

        if !(1..=2).contains(&players.len()) {
            return Err(Error::InvalidPlayers);
        }

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => players.join(" / "),
        };

        let team = Team {
            id: TeamId::generate(),
            tournament: tournament.id,
            name,
            players,
            seed: None,
        };

        self.store.insert_team(&team)?;

        log::debug!("Added team {} to tournament {}", team.name, tournament.id);

        Ok(team)
    }

    pub fn remove_team(&mut self, id: TeamId) -> Result<()> {
        let tournament = self.setup_tournament()?;

        if !self.store.remove_team(tournament.id, id)? {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Returns the teams of the current tournament in registration order.
    pub fn teams(&self) -> Result<Vec<Team>> {
        let tournament = self.tournament()?;
        self.store.list_teams(tournament.id)
    }

    pub fn add_solo_player(&mut self, name: &str) -> Result<SoloPlayer> {
        let tournament = self.setup_tournament()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidPlayers);
        }

        let player = SoloPlayer {
            id: SoloPlayerId::generate(),
            tournament: tournament.id,
            name: name.to_owned(),
            paired: false,
        };

        self.store.insert_solo_player(&player)?;
        Ok(player)
    }

    pub fn remove_solo_player(&mut self, id: SoloPlayerId) -> Result<()> {
        let tournament = self.setup_tournament()?;

        if !self.store.remove_solo_player(tournament.id, id)? {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    pub fn solo_players(&self) -> Result<Vec<SoloPlayer>> {
        let tournament = self.tournament()?;
        self.store.list_unpaired(tournament.id)
    }

    /// Groups all unpaired solo players into teams of two in registration order. With an odd
    /// number of players the last one remains unpaired.
    pub fn auto_group(&mut self) -> Result<Vec<Team>> {
        let tournament = self.setup_tournament()?;
        let players = self.store.list_unpaired(tournament.id)?;

        let mut teams = Vec::with_capacity(players.len() / 2);
        for pair in players.chunks_exact(2) {
            let team = Team {
                id: TeamId::generate(),
                tournament: tournament.id,
                name: format!("{} / {}", pair[0].name, pair[1].name),
                players: vec![pair[0].name.clone(), pair[1].name.clone()],
                seed: None,
            };

            self.store.insert_team(&team)?;
            self.store
                .mark_paired(tournament.id, &[pair[0].id, pair[1].id])?;

            teams.push(team);
        }

        log::debug!("Grouped {} solo players into teams", teams.len() * 2);

        Ok(teams)
    }

    /// Returns the teams of the current tournament in seed order. Unseeded teams follow all
    /// seeded teams in registration order.
    pub fn seeding(&self) -> Result<Vec<Competitor>> {
        let mut competitors: Vec<Competitor> =
            self.teams()?.iter().map(Competitor::from).collect();
        seeding::sort_by_seed(&mut competitors);
        Ok(competitors)
    }

    /// Moves the team at `index` of the seeding one position up. Returns `false` if the team
    /// cannot move.
    pub fn move_seed_up(&mut self, index: usize) -> Result<bool> {
        self.reseed(|competitors| seeding::move_up(competitors, index))
    }

    /// Moves the team at `index` of the seeding one position down. Returns `false` if the team
    /// cannot move.
    pub fn move_seed_down(&mut self, index: usize) -> Result<bool> {
        self.reseed(|competitors| seeding::move_down(competitors, index))
    }

    pub fn shuffle_seeds<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        self.reseed(|competitors| {
            competitors.shuffle(rng);
            true
        })?;

        Ok(())
    }

    /// Generates the bracket of the current tournament from its seeding. An existing bracket and
    /// all of its results are discarded.
    pub fn generate_bracket(&mut self) -> Result<SingleElimination> {
        let mut tournament = self.tournament()?;
        self.require_owner(&tournament)?;

        let competitors = self.seeding()?;
        let bracket = SingleElimination::new(competitors, self.options)?;

        self.store.replace_bracket(tournament.id, &bracket)?;

        tournament.status = if bracket.is_complete() {
            TournamentStatus::Completed
        } else {
            TournamentStatus::Active
        };
        self.store.update_tournament(&tournament)?;

        log::info!(
            "Generated bracket for tournament {} with {} matches",
            tournament.id,
            bracket.matches().len()
        );

        self.state.page = Page::Bracket;
        Ok(bracket)
    }

    pub fn bracket(&self) -> Result<SingleElimination> {
        let tournament = self.tournament()?;
        self.store.get_bracket(tournament.id)?.ok_or(Error::NotFound)
    }

    pub fn start_match(&mut self, index: usize) -> Result<Vec<usize>> {
        self.update_bracket(|bracket| bracket.start_match(index))
    }

    /// Records the scores of the match at `index`. Returns the indices of all changed matches.
    pub fn record_score(&mut self, index: usize, score1: u32, score2: u32) -> Result<Vec<usize>> {
        self.update_bracket(|bracket| bracket.record_score(index, score1, score2))
    }

    pub fn reset_match(&mut self, index: usize) -> Result<Vec<usize>> {
        self.update_bracket(|bracket| bracket.reset_match(index))
    }

    /// Predicts the outcome of every upcoming match of the current tournament.
    pub fn predictions(&self) -> Result<Vec<(usize, Prediction)>> {
        let bracket = self.bracket()?;
        Ok(self.predictor.upcoming(&bracket))
    }

    pub fn report(&self) -> Result<Report> {
        let tournament = self.tournament()?;
        let bracket = self.bracket()?;

        Ok(Report::new(&tournament.name, &bracket))
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        let tournament = self.tournament()?;

        let mut dashboard = Dashboard {
            teams: self.store.list_teams(tournament.id)?.len(),
            ..Default::default()
        };

        if let Some(bracket) = self.store.get_bracket(tournament.id)? {
            for r#match in bracket.matches().iter().filter(|m| !m.is_bye()) {
                match r#match.status {
                    MatchStatus::Completed => dashboard.completed += 1,
                    MatchStatus::InProgress => dashboard.in_progress += 1,
                    MatchStatus::Scheduled => dashboard.scheduled += 1,
                }
            }
        }

        Ok(dashboard)
    }

    /// Subscribes to the bracket changes of the current tournament.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<Event>> {
        let id = self.state.tournament.ok_or(Error::NoTournament)?;
        Ok(self.store.subscribe(id))
    }

    fn require_session(&self) -> Result<&Session> {
        self.state.session.as_ref().ok_or(Error::Unauthorized)
    }

    fn require_owner(&self, tournament: &Tournament) -> Result<()> {
        let session = self.require_session()?;

        if session.user.id != tournament.created_by {
            return Err(Error::Unauthorized);
        }

        Ok(())
    }

    /// Returns the current tournament if it is owned by the signed in user and still accepts
    /// changes to its teams.
    fn setup_tournament(&self) -> Result<Tournament> {
        let tournament = self.tournament()?;
        self.require_owner(&tournament)?;

        if tournament.status != TournamentStatus::Setup {
            return Err(Error::Locked);
        }

        Ok(tournament)
    }

    fn reseed<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut [Competitor]) -> bool,
    {
        let tournament = self.setup_tournament()?;

        let mut competitors = self.seeding()?;
        if !f(&mut competitors) {
            return Ok(false);
        }

        seeding::assign_seeds(&mut competitors);

        let seeds: Vec<(TeamId, u32)> = competitors
            .iter()
            .filter_map(|c| c.seed.map(|seed| (c.id.into(), seed)))
            .collect();

        self.store.update_seeds(tournament.id, &seeds)?;
        Ok(true)
    }

    /// Applies `f` to the bracket of the current tournament and stores all changed matches.
    fn update_bracket<F>(&mut self, f: F) -> Result<Vec<usize>>
    where
        F: FnOnce(&mut SingleElimination) -> easybracket_core::Result<Vec<usize>>,
    {
        let mut tournament = self.tournament()?;
        self.require_owner(&tournament)?;

        let mut bracket = self.store.get_bracket(tournament.id)?.ok_or(Error::NotFound)?;

        let changed = f(&mut bracket)?;
        if changed.is_empty() {
            return Ok(changed);
        }

        self.store.update_matches(tournament.id, &bracket, &changed)?;

        let status = if bracket.is_complete() {
            TournamentStatus::Completed
        } else {
            TournamentStatus::Active
        };

        if tournament.status != status {
            log::info!("Tournament {} is now {}", tournament.id, status.as_str());

            tournament.status = status;
            self.store.update_tournament(&tournament)?;
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use easybracket_core::{Confidence, MatchStatus, Slot, StateError};
    use rand::rngs::mock::StepRng;

    use super::{Controller, Dashboard, Page};
    use crate::auth::{Auth, AuthError, DemoAuth};
    use crate::store::{Event, MemoryStore, Store, TournamentStatus};
    use crate::{Config, Error};

    type TestController = Controller<MemoryStore, DemoAuth>;

    fn controller() -> TestController {
        let mut controller =
            Controller::new(MemoryStore::new(), DemoAuth::new(), &Config::default());
        controller.sign_up("host@example.com", "secret").unwrap();
        controller.sign_in("host@example.com", "secret").unwrap();
        controller
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 6).unwrap()
    }

    fn with_teams(n: usize) -> TestController {
        let mut controller = controller();
        controller
            .create_tournament("Summer Cup", date(), "Town Park")
            .unwrap();

        for i in 1..=n {
            controller
                .add_team([format!("A{}", i), format!("B{}", i)], None)
                .unwrap();
        }

        controller
    }

    #[test]
    fn test_controller_sign_in() {
        let mut controller =
            Controller::new(MemoryStore::new(), DemoAuth::new(), &Config::default());
        assert_eq!(controller.state().session, None);

        controller.sign_up("host@example.com", "secret").unwrap();
        assert_eq!(controller.state().session, None);
        assert_eq!(controller.state().page, Page::SignIn);

        assert!(matches!(
            controller.sign_in("host@example.com", "wrong"),
            Err(Error::Auth(AuthError::InvalidCredentials))
        ));

        let session = controller.sign_in("host@example.com", "secret").unwrap();
        assert_eq!(controller.state().session, Some(session));
        assert_eq!(controller.state().page, Page::Home);

        controller
            .create_tournament("Summer Cup", date(), "Town Park")
            .unwrap();
        controller.sign_out().unwrap();

        assert_eq!(controller.state().session, None);
        assert_eq!(controller.state().tournament, None);
        assert_eq!(controller.auth().session(), None);
    }

    #[test]
    fn test_controller_create_tournament() {
        let mut controller =
            Controller::new(MemoryStore::new(), DemoAuth::new(), &Config::default());
        assert!(matches!(
            controller.create_tournament("Summer Cup", date(), "Town Park"),
            Err(Error::Unauthorized)
        ));

        let mut controller = controller_signed_in(controller);
        let tournament = controller
            .create_tournament(" Summer Cup ", date(), "Town Park")
            .unwrap();

        assert_eq!(tournament.name, "Summer Cup");
        assert_eq!(tournament.status, TournamentStatus::Setup);
        assert_eq!(controller.state().tournament, Some(tournament.id));
        assert_eq!(controller.state().page, Page::Teams);
        assert_eq!(controller.tournaments().unwrap(), vec![tournament.clone()]);

        controller.navigate(Page::Home);
        controller.open_tournament(tournament.id).unwrap();
        assert_eq!(controller.state().page, Page::Teams);
    }

    fn controller_signed_in(mut controller: TestController) -> TestController {
        controller.sign_up("host@example.com", "secret").unwrap();
        controller.sign_in("host@example.com", "secret").unwrap();
        controller
    }

    #[test]
    fn test_controller_teams() {
        let mut controller = controller();
        assert!(matches!(
            controller.add_team(["A"], None),
            Err(Error::NoTournament)
        ));

        controller
            .create_tournament("Summer Cup", date(), "Town Park")
            .unwrap();

        let team = controller.add_team(["Ann", " Bob "], None).unwrap();
        assert_eq!(team.name, "Ann / Bob");
        assert_eq!(team.players, vec!["Ann", "Bob"]);

        let solo = controller.add_team(["Cid"], Some("Lone Wolf")).unwrap();
        assert_eq!(solo.name, "Lone Wolf");

        let named = controller.add_team(["Dan", "Eve"], Some("  ")).unwrap();
        assert_eq!(named.name, "Dan / Eve");

        assert!(matches!(
            controller.add_team(["A", "B", "C"], None),
            Err(Error::InvalidPlayers)
        ));
        assert!(matches!(
            controller.add_team(["", " "], None),
            Err(Error::InvalidPlayers)
        ));

        controller.remove_team(solo.id).unwrap();
        assert!(matches!(controller.remove_team(solo.id), Err(Error::NotFound)));

        let names: Vec<String> = controller
            .teams()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Ann / Bob", "Dan / Eve"]);
    }

    #[test]
    fn test_controller_teams_locked() {
        let mut controller = with_teams(4);
        let teams = controller.teams().unwrap();

        controller.generate_bracket().unwrap();

        assert!(matches!(
            controller.add_team(["Late"], None),
            Err(Error::Locked)
        ));
        assert!(matches!(
            controller.remove_team(teams[0].id),
            Err(Error::Locked)
        ));
        assert!(matches!(controller.move_seed_up(1), Err(Error::Locked)));
    }

    #[test]
    fn test_controller_auto_group() {
        let mut controller = controller();
        controller
            .create_tournament("Summer Cup", date(), "Town Park")
            .unwrap();

        for name in ["Ann", "Bob", "Cid", "Dan", "Eve"] {
            controller.add_solo_player(name).unwrap();
        }
        assert!(matches!(
            controller.add_solo_player(" "),
            Err(Error::InvalidPlayers)
        ));

        let teams = controller.auto_group().unwrap();
        let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Ann / Bob", "Cid / Dan"]);

        let remaining = controller.solo_players().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Eve");

        assert!(controller.auto_group().unwrap().is_empty());
        assert_eq!(controller.teams().unwrap().len(), 2);

        controller.remove_solo_player(remaining[0].id).unwrap();
        assert!(controller.solo_players().unwrap().is_empty());
    }

    #[test]
    fn test_controller_seeding() {
        let mut controller = with_teams(3);

        let names = |controller: &TestController| -> Vec<String> {
            controller
                .seeding()
                .unwrap()
                .into_iter()
                .map(|c| c.name)
                .collect()
        };

        assert_eq!(names(&controller), vec!["A1 / B1", "A2 / B2", "A3 / B3"]);

        assert!(controller.move_seed_up(2).unwrap());
        assert_eq!(names(&controller), vec!["A1 / B1", "A3 / B3", "A2 / B2"]);

        assert!(!controller.move_seed_up(0).unwrap());
        assert!(!controller.move_seed_down(2).unwrap());

        assert!(controller.move_seed_down(0).unwrap());
        assert_eq!(names(&controller), vec!["A3 / B3", "A1 / B1", "A2 / B2"]);

        let seeds: Vec<Option<u32>> = controller
            .seeding()
            .unwrap()
            .iter()
            .map(|c| c.seed)
            .collect();
        assert_eq!(seeds, vec![Some(1), Some(2), Some(3)]);

        // Teams registered later are seeded last.
        controller.add_team(["A4"], None).unwrap();
        assert_eq!(names(&controller)[3], "A4");

        controller.shuffle_seeds(&mut StepRng::new(0, 1)).unwrap();
        let mut seeds: Vec<u32> = controller
            .seeding()
            .unwrap()
            .iter()
            .filter_map(|c| c.seed)
            .collect();
        seeds.sort_unstable();
        assert_eq!(seeds, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_controller_generate_bracket() {
        let mut controller = with_teams(5);
        assert!(matches!(controller.bracket(), Err(Error::NotFound)));

        let bracket = controller.generate_bracket().unwrap();
        assert_eq!(bracket.matches().len(), 7);
        assert_eq!(bracket.bye_matches(), 3);
        assert_eq!(controller.state().page, Page::Bracket);
        assert_eq!(
            controller.tournament().unwrap().status,
            TournamentStatus::Active
        );

        assert_eq!(controller.bracket().unwrap().matches(), bracket.matches());

        assert_eq!(
            controller.dashboard().unwrap(),
            Dashboard {
                teams: 5,
                completed: 0,
                in_progress: 0,
                scheduled: 4,
            }
        );
    }

    #[test]
    fn test_controller_regenerate_bracket() {
        let mut controller = with_teams(4);
        controller.generate_bracket().unwrap();
        controller.record_score(0, 21, 12).unwrap();

        let bracket = controller.generate_bracket().unwrap();
        assert!(bracket.matches().iter().all(|m| !m.is_completed()));
        assert_eq!(controller.bracket().unwrap().matches()[0].scores, None);
    }

    #[test]
    fn test_controller_single_team() {
        let mut controller = with_teams(1);

        let bracket = controller.generate_bracket().unwrap();
        assert!(bracket.matches().is_empty());
        assert_eq!(bracket.champion().map(|c| c.name.as_str()), Some("A1 / B1"));

        let tournament = controller.tournament().unwrap();
        assert_eq!(tournament.status, TournamentStatus::Completed);

        controller.navigate(Page::Home);
        controller.open_tournament(tournament.id).unwrap();
        assert_eq!(controller.state().page, Page::Report);
        assert_eq!(
            controller.report().unwrap().champion.as_deref(),
            Some("A1 / B1")
        );
    }

    #[test]
    fn test_controller_play_tournament() {
        let mut controller = with_teams(4);
        controller.generate_bracket().unwrap();

        let mut rx = controller.subscribe().unwrap();

        assert_eq!(controller.start_match(0).unwrap(), vec![0]);
        assert_eq!(controller.dashboard().unwrap().in_progress, 1);

        assert_eq!(controller.record_score(0, 21, 15).unwrap(), vec![0, 2]);
        assert_eq!(controller.record_score(0, 21, 15).unwrap(), Vec::<usize>::new());
        assert!(matches!(
            controller.record_score(1, 20, 20),
            Err(Error::Bracket(easybracket_core::Error::InvalidState(
                StateError::Tie(1)
            )))
        ));
        assert!(matches!(
            controller.record_score(0, 21, 17),
            Err(Error::Bracket(easybracket_core::Error::AlreadyCompleted {
                index: 0
            }))
        ));

        controller.record_score(1, 21, 19).unwrap();

        let predictions = controller.predictions().unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].0, 2);
        assert_eq!(predictions[0].1.confidence, Confidence::Low);

        controller.record_score(2, 12, 21).unwrap();

        let tournament = controller.tournament().unwrap();
        assert_eq!(tournament.status, TournamentStatus::Completed);

        let dashboard = controller.dashboard().unwrap();
        assert_eq!(dashboard.completed, 3);
        assert_eq!(dashboard.progress(), 100);

        let report = controller.report().unwrap();
        assert_eq!(report.champion.as_deref(), Some("A2 / B2"));
        assert_eq!(report.runner_up.as_deref(), Some("A1 / B1"));
        assert_eq!(report.third.as_deref(), Some("A3 / B3"));

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        let updated: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                Event::MatchUpdated { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(updated, vec![0, 0, 2, 1, 2, 2]);

        controller.open_tournament(tournament.id).unwrap();
        assert_eq!(controller.state().page, Page::Report);
    }

    #[test]
    fn test_controller_overwrite_reopens_tournament() {
        let mut config = Config::default();
        config.bracket.overwrite_allowed = true;

        let mut controller = Controller::new(MemoryStore::new(), DemoAuth::new(), &config);
        controller.sign_up("host@example.com", "secret").unwrap();
        controller.sign_in("host@example.com", "secret").unwrap();
        controller
            .create_tournament("Final", date(), "Town Park")
            .unwrap();
        controller.add_team(["Ann"], None).unwrap();
        controller.add_team(["Bob"], None).unwrap();
        controller.generate_bracket().unwrap();

        controller.record_score(0, 21, 10).unwrap();
        assert_eq!(
            controller.tournament().unwrap().status,
            TournamentStatus::Completed
        );
        assert_eq!(controller.report().unwrap().champion.as_deref(), Some("Ann"));

        controller.record_score(0, 10, 21).unwrap();
        assert_eq!(controller.report().unwrap().champion.as_deref(), Some("Bob"));

        assert_eq!(controller.reset_match(0).unwrap(), vec![0]);
        assert_eq!(
            controller.tournament().unwrap().status,
            TournamentStatus::Active
        );
        assert_eq!(
            controller.bracket().unwrap().matches()[0].status,
            MatchStatus::Scheduled
        );
    }

    #[test]
    fn test_controller_requires_owner() {
        let mut controller = with_teams(2);
        controller.generate_bracket().unwrap();

        controller.sign_out().unwrap();
        let id = controller.store().list_tournaments().unwrap()[0].id;
        controller.open_tournament(id).unwrap();

        // Viewing works without a session.
        assert_eq!(
            controller.bracket().unwrap().matches()[0].entrants,
            [Slot::Entrant(0), Slot::Entrant(1)]
        );
        assert!(matches!(
            controller.record_score(0, 21, 3),
            Err(Error::Unauthorized)
        ));

        controller.sign_up("guest@example.com", "secret").unwrap();
        controller.sign_in("guest@example.com", "secret").unwrap();
        controller.open_tournament(id).unwrap();
        assert!(matches!(
            controller.record_score(0, 21, 3),
            Err(Error::Unauthorized)
        ));
    }
}
