use std::error::Error;
use std::num::ParseIntError;
use std::str::FromStr;

use clap::Args;
use easybracket_app::Config;
use easybracket_core::{Predictor, TeamStats};
use thiserror::Error;

#[derive(Clone, Debug, Args)]
pub struct Command {
    /// Record of the first team as WINS-LOSSES-POINTS_SCORED-POINTS_ALLOWED.
    #[clap(long)]
    first: Record,
    /// Record of the second team as WINS-LOSSES-POINTS_SCORED-POINTS_ALLOWED.
    #[clap(long)]
    second: Record,
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn Error>> {
        let predictor = Predictor::new(config.predictions.target_score);
        let prediction = predictor.predict(&self.first.0, &self.second.0);

        println!(
            "Win probability: {:.1}% - {:.1}%",
            prediction.win_probability[0] * 100.0,
            prediction.win_probability[1] * 100.0
        );
        println!(
            "Predicted score: {}-{}",
            prediction.predicted_score[0], prediction.predicted_score[1]
        );
        println!("Confidence: {}", prediction.confidence);

        Ok(())
    }
}

/// The record of a team, parsed from `W-L-PF-PA`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Record(pub TeamStats);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseRecordError {
    #[error("expected 4 values separated by '-', found {0}")]
    InvalidLength(usize),
    #[error("invalid number: {0}")]
    InvalidNumber(#[from] ParseIntError),
}

impl FromStr for Record {
    type Err = ParseRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split('-')
            .map(|value| value.trim().parse())
            .collect::<Result<Vec<u32>, _>>()?;

        match values[..] {
            [wins, losses, points_scored, points_allowed] => Ok(Self(TeamStats {
                wins,
                losses,
                points_scored,
                points_allowed,
            })),
            _ => Err(ParseRecordError::InvalidLength(values.len())),
        }
    }
}
