use crate::util::{parse_proximity, parse_skill};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SKILL: f64 = 19.0 / 20.0;
pub const DEFAULT_PROXIMITY: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "fumble",
    about = "Nobody's perfect! Takes a MIDI file and messes up a few of the notes."
)]
pub struct Args {
    /// Path to the MIDI file to flub.
    #[arg(default_value = "resources/songs/moonlight.mid")]
    pub input: PathBuf,

    /// Where to write the flubbed MIDI file.
    #[arg(default_value = "flubbed.mid")]
    pub output: PathBuf,

    /// Approximate fraction of notes that will be played correctly <0.0..=1.0>.
    #[arg(short, long, default_value_t = DEFAULT_SKILL, value_parser = parse_skill)]
    pub skill: f64,

    /// How far (in semitones) a missed note may land from the intended one.
    /// The search only widens past this when every nearby pitch is already held.
    #[arg(short, long, default_value_t = DEFAULT_PROXIMITY, value_parser = parse_proximity)]
    pub proximity: u8,

    /// Seed for the random source. Runs with the same seed and input produce the same output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Flub the song and report, but don't write anything.
    #[arg(short, long, default_value_t = false)]
    pub dry_run: bool,

    /// Prints extra information to the terminal.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn flub_config(&self) -> FlubConfig {
        FlubConfig {
            skill: self.skill,
            proximity: self.proximity,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FlubConfig {
    /// Probability that a note-on is played correctly, absent a collision.
    pub skill: f64,

    /// Initial search radius for substitute pitches.
    pub proximity: u8,
}

impl Default for FlubConfig {
    fn default() -> Self {
        Self {
            skill: DEFAULT_SKILL,
            proximity: DEFAULT_PROXIMITY,
        }
    }
}
