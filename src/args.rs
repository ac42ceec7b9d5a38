use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use crate::date::parse_roll_date;

#[derive(Parser, Debug)]
#[command(name = "fix-photos", version)]
#[command(about = "Rename a roll of film scans and stamp them with the roll date")]
#[command(after_help = "Example:\n  fix-photos -i /Users/me/Pictures/some-film-scans-folder -n 72 -d 01/01/2020")]
pub struct Args {
    /// Folder containing the film scans
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Film roll number
    #[arg(
        short = 'n',
        long = "roll-number",
        visible_alias = "roll_number",
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..),
        required_unless_present = "legacy_roll"
    )]
    pub roll_number: Option<u32>,

    /// Deprecated spelling of --roll-number
    #[arg(
        long = "roll",
        value_name = "N",
        hide = true,
        value_parser = clap::value_parser!(u32).range(1..),
        conflicts_with = "roll_number"
    )]
    pub legacy_roll: Option<u32>,

    /// Film roll date (dd/mm/yyyy)
    #[arg(short, long, value_name = "dd/mm/yyyy")]
    pub date: String,

    /// Process the scans in reverse order
    #[arg(short, long)]
    pub reverse: bool,
}

/// Validated parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollContext {
    pub input_dir: PathBuf,
    pub roll_number: u32,
    pub roll_date: NaiveDate,
    pub reverse: bool,
}

impl RollContext {
    /// Validate arguments; fails before anything on disk is touched
    pub fn from_args(args: Args) -> Result<Self> {
        let roll_number = match (args.roll_number, args.legacy_roll) {
            (Some(n), _) => n,
            (None, Some(n)) => {
                warn!("--roll is deprecated, use -n/--roll-number instead");
                n
            }
            (None, None) => bail!("A roll number must be specified with -n/--roll-number"),
        };

        let roll_date = parse_roll_date(&args.date)?;

        if !args.input.exists() {
            bail!("Input directory does not exist: {}", args.input.display());
        }
        if !args.input.is_dir() {
            bail!("Input path is not a directory: {}", args.input.display());
        }

        Ok(RollContext {
            input_dir: args.input,
            roll_number,
            roll_date,
            reverse: args.reverse,
        })
    }

    /// Output folder for the roll: <input>/<roll number>
    pub fn output_dir(&self) -> PathBuf {
        self.input_dir.join(self.roll_number.to_string())
    }
}
