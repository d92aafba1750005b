use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;
use easybracket_app::Config;
use easybracket_core::{Match, SingleElimination, Slot};

use crate::teams;

#[derive(Clone, Debug, Args)]
pub struct Command {
    /// Path to a JSON file containing the teams.
    teams: PathBuf,
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn Error>> {
        let teams = teams::read(&self.teams)?;
        log::debug!("Read {} teams from {}", teams.len(), self.teams.display());

        let bracket =
            SingleElimination::new(teams::competitors(&teams), config.bracket.options())?;

        print!("{}", render(&bracket));
        Ok(())
    }
}

/// Returns the name of the round `round` of a bracket with `rounds` rounds.
pub fn round_name(round: usize, rounds: usize) -> String {
    match rounds - round {
        0 => String::from("Final"),
        1 => String::from("Semifinals"),
        2 => String::from("Quarterfinals"),
        _ => format!("Round {}", round),
    }
}

/// Renders all matches of the bracket, grouped by round.
pub fn render(bracket: &SingleElimination) -> String {
    let mut buf = String::new();
    let mut round = 0;

    for (index, m) in bracket.matches().iter().enumerate() {
        if m.round != round {
            round = m.round;
            if index != 0 {
                buf.push('\n');
            }

            let _ = writeln!(buf, "{}", round_name(round, bracket.rounds()));
        }

        let _ = writeln!(buf, "{}", render_match(bracket, index, m));
    }

    buf
}

pub fn render_match(bracket: &SingleElimination, index: usize, m: &Match) -> String {
    let slot = |slot: Slot| match slot {
        Slot::Entrant(_) => bracket
            .entrant(slot)
            .map(|c| c.name.as_str())
            .unwrap_or("?"),
        Slot::Bye => "BYE",
        Slot::TBD => "TBD",
    };

    let mut buf = format!(
        "  [{:>2}] {} vs {}",
        index,
        slot(m.entrants[0]),
        slot(m.entrants[1])
    );

    if m.is_bye() {
        return buf;
    }

    let _ = write!(buf, " ({}", m.status);
    if let Some([score1, score2]) = m.scores {
        let _ = write!(buf, ", {}-{}", score1, score2);
    }
    buf.push(')');

    buf
}

#[cfg(test)]
mod tests {
    use easybracket_core::{BracketOptions, Competitor, SingleElimination};

    use super::{render, round_name};

    #[test]
    fn test_round_name() {
        assert_eq!(round_name(3, 3), "Final");
        assert_eq!(round_name(2, 3), "Semifinals");
        assert_eq!(round_name(1, 3), "Quarterfinals");
        assert_eq!(round_name(1, 4), "Round 1");
    }

    #[test]
    fn test_render() {
        let competitors = (1..=3).map(|id| Competitor::new(id, format!("Team {}", id), ["P"]));
        let mut bracket = SingleElimination::new(competitors, BracketOptions::default()).unwrap();

        let output = render(&bracket);
        assert!(output.starts_with("Semifinals\n"));
        assert!(output.contains("BYE"));
        assert!(output.contains("Final\n"));
        assert!(output.contains("TBD"));

        let (index, _) = bracket.playable().next().unwrap();
        bracket.record_score(index, 21, 17).unwrap();

        let output = render(&bracket);
        assert!(output.contains("(completed, 21-17)"));
    }
}
