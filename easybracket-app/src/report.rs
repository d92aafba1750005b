//! The post tournament report.
use std::fmt::{self, Display, Formatter};

use easybracket_core::{SingleElimination, Slot, Standings};
use serde::{Deserialize, Serialize};

const TBD: &str = "TBD";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub tournament: String,
    /// The number of registered teams.
    pub teams: usize,
    pub champion: Option<String>,
    pub runner_up: Option<String>,
    pub third: Option<String>,
    pub standings: Vec<Placement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub place: usize,
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub point_differential: i64,
}

impl Report {
    /// Creates the report of the tournament `name` from its `bracket`.
    ///
    /// The champion and runner-up are the winner and loser of the final. Third place goes to the
    /// better placed loser of the semifinals.
    pub fn new(name: &str, bracket: &SingleElimination) -> Self {
        let standings = Standings::from_bracket(bracket);

        let team = |slot: Option<Slot>| -> Option<String> {
            let competitor = bracket.entrant(slot?)?;
            Some(competitor.name.clone())
        };

        let champion = bracket.champion().map(|c| c.name.clone());
        let runner_up = team(bracket.matches().last().and_then(|m| m.loser()));

        let third = match bracket.rounds() {
            0 | 1 => None,
            rounds => {
                let place = |index: usize| {
                    standings
                        .iter()
                        .find(|entry| entry.index == index)
                        .map(|entry| entry.place)
                        .unwrap_or(usize::MAX)
                };

                bracket
                    .round(rounds - 1)
                    .iter()
                    .filter_map(|m| m.loser().and_then(|slot| slot.entrant()))
                    .min_by_key(|index| place(*index))
                    .and_then(|index| team(Some(Slot::Entrant(index))))
            }
        };

        let standings = standings
            .iter()
            .map(|entry| Placement {
                place: entry.place,
                team: bracket
                    .entrants()
                    .get(entry.index)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                wins: entry.wins,
                losses: entry.losses,
                point_differential: entry.point_differential,
            })
            .collect();

        Self {
            tournament: name.to_owned(),
            teams: bracket.entrants().len(),
            champion,
            runner_up,
            third,
            standings,
        }
    }

    /// Returns the results as a short message suitable for sharing.
    pub fn share_text(&self) -> String {
        format!(
            "{} Results!\n\n\
             Champions: {}\n\
             Runner-up: {}\n\
             3rd Place: {}\n\n\
             Thanks to all {} teams for a great tournament!",
            self.tournament,
            self.champion.as_deref().unwrap_or(TBD),
            self.runner_up.as_deref().unwrap_or(TBD),
            self.third.as_deref().unwrap_or(TBD),
            self.teams,
        )
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.tournament)?;
        writeln!(f, "{:>5}  {:<24} {:>4} {:>6} {:>6}", "Place", "Team", "Wins", "Losses", "+/-")?;

        for placement in &self.standings {
            writeln!(
                f,
                "{:>5}  {:<24} {:>4} {:>6} {:>+6}",
                placement.place,
                placement.team,
                placement.wins,
                placement.losses,
                placement.point_differential
            )?;
        }

        Ok(())
    }
}
