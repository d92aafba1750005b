use std::error::Error;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Local;
use clap::Args;
use easybracket_app::auth::DemoAuth;
use easybracket_app::controller::Controller;
use easybracket_app::store::MemoryStore;
use easybracket_app::Config;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::bracket;
use crate::teams;
use crate::utils::Prompt;

const ORGANIZER_EMAIL: &str = "organizer@localhost";
const ORGANIZER_PASSWORD: &str = "organizer";

#[derive(Clone, Debug, Args)]
pub struct Command {
    /// Path to a JSON file containing the teams.
    teams: PathBuf,
    /// Name of the tournament.
    #[clap(short, long, default_value = "Tournament")]
    name: String,
    #[clap(short, long, default_value = "")]
    location: String,
    /// Randomize the seeding instead of using the order of the team file.
    #[clap(long)]
    shuffle: bool,
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn Error>> {
        let teams = teams::read(&self.teams)?;

        let mut controller = Controller::new(MemoryStore::new(), DemoAuth::default(), config);
        controller.sign_up(ORGANIZER_EMAIL, ORGANIZER_PASSWORD)?;
        controller.sign_in(ORGANIZER_EMAIL, ORGANIZER_PASSWORD)?;

        controller.create_tournament(&self.name, Local::now().date_naive(), &self.location)?;

        for team in &teams {
            controller.add_team(&team.players, team.name.as_deref())?;
        }

        if self.shuffle {
            controller.shuffle_seeds(&mut OsRng)?;
        }

        controller.generate_bracket()?;

        loop {
            let bracket = controller.bracket()?;
            println!();
            print!("{}", bracket::render(&bracket));

            if bracket.is_complete() {
                break;
            }

            for (index, prediction) in controller.predictions()? {
                println!(
                    "  [{:>2}] predicted {}-{} ({:.0}% - {:.0}%, {} confidence)",
                    index,
                    prediction.predicted_score[0],
                    prediction.predicted_score[1],
                    prediction.win_probability[0] * 100.0,
                    prediction.win_probability[1] * 100.0,
                    prediction.confidence
                );
            }

            let dashboard = controller.dashboard()?;
            println!(
                "{} of {} matches completed ({}%)",
                dashboard.completed,
                dashboard.completed + dashboard.in_progress + dashboard.scheduled,
                dashboard.progress()
            );

            let action = quit_on_eof(
                Prompt::new("Match ('N' to score, 's N' to start, 'r N' to reset, 'q' to quit)")
                    .read_valid(),
            )?;

            let res = match action {
                Action::Quit => break,
                Action::Start(index) => controller.start_match(index),
                Action::Reset(index) => controller.reset_match(index),
                Action::Score(index) => {
                    let score1: u32 = Prompt::new("Score of the first team").read_valid()?;
                    let score2: u32 = Prompt::new("Score of the second team").read_valid()?;
                    controller.record_score(index, score1, score2)
                }
            };

            if let Err(err) = res {
                println!("Error: {}", err);
            }
        }

        let report = controller.report()?;
        println!();
        print!("{}", report);
        println!();
        println!("{}", report.share_text());

        Ok(())
    }
}

/// Closing stdin ends the tournament loop like a `q` input.
fn quit_on_eof(res: io::Result<Action>) -> io::Result<Action> {
    match res {
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(Action::Quit),
        res => res,
    }
}

/// An input of the interactive prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Start(usize),
    Reset(usize),
    Score(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseActionError {
    #[error("unknown action: {0:?}")]
    Unknown(String),
    #[error("invalid match: {0}")]
    InvalidIndex(ParseIntError),
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();

        let (action, index): (fn(usize) -> Self, &str) = match (parts.next(), parts.next()) {
            (Some("q"), None) => return Ok(Self::Quit),
            (Some("s"), Some(index)) => (Self::Start, index),
            (Some("r"), Some(index)) => (Self::Reset, index),
            (Some(index), None) => (Self::Score, index),
            _ => return Err(ParseActionError::Unknown(s.to_owned())),
        };

        if parts.next().is_some() {
            return Err(ParseActionError::Unknown(s.to_owned()));
        }

        index
            .parse()
            .map(action)
            .map_err(ParseActionError::InvalidIndex)
    }
}
