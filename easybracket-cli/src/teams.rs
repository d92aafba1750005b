//! The team file read by the `bracket` and `play` commands.
//!
//! The file is a JSON array of teams:
//!
//! ```json
//! [
//!     { "name": "Sandbaggers", "players": ["Ann", "Bob"], "seed": 1 },
//!     { "players": ["Cid"] }
//! ]
//! ```
use std::fs;
use std::io;
use std::path::Path;

use easybracket_core::{seeding, Competitor};
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TeamEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub players: Vec<String>,
    #[serde(default)]
    pub seed: Option<u32>,
}

impl TeamEntry {
    /// Returns the name of the team, defaulting to the names of its players.
    pub fn name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
            _ => self.players.join(" / "),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read team file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid team file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads the teams from the file at `path`, ordered by seed.
pub fn read<P>(path: P) -> Result<Vec<TeamEntry>, Error>
where
    P: AsRef<Path>,
{
    let buf = fs::read(path)?;
    let mut teams: Vec<TeamEntry> = serde_json::from_slice(&buf)?;

    teams.sort_by_key(|team| (team.seed.is_none(), team.seed));
    Ok(teams)
}

/// Converts the teams into seeded competitors.
pub fn competitors(teams: &[TeamEntry]) -> Vec<Competitor> {
    let mut competitors: Vec<Competitor> = teams
        .iter()
        .enumerate()
        .map(|(index, team)| {
            Competitor::new(index as u64 + 1, team.name(), team.players.iter())
        })
        .collect();

    seeding::assign_seeds(&mut competitors);
    competitors
}

#[cfg(test)]
mod tests {
    use super::{competitors, TeamEntry};

    #[test]
    fn test_team_entry() {
        let teams: Vec<TeamEntry> = serde_json::from_str(
            r#"[
                { "name": "Sandbaggers", "players": ["Ann", "Bob"], "seed": 2 },
                { "players": ["Cid", "Dan"] },
                { "name": " ", "players": ["Eve"] }
            ]"#,
        )
        .unwrap();

        assert_eq!(teams[0].name(), "Sandbaggers");
        assert_eq!(teams[0].seed, Some(2));
        assert_eq!(teams[1].name(), "Cid / Dan");
        assert_eq!(teams[2].name(), "Eve");

        let competitors = competitors(&teams);
        assert_eq!(competitors.len(), 3);
        assert_eq!(competitors[1].members, vec!["Cid", "Dan"]);
        assert_eq!(competitors[2].seed, Some(3));
    }
}
