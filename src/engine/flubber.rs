use crate::engine::Dice;
use crate::model::config::FlubConfig;
use crate::model::song::{Song, Track};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::ops::AddAssign;

const MAX_PITCH: u8 = 127;
const PITCH_COUNT: usize = MAX_PITCH as usize + 1;

/// Failed attempts before the search radius grows by one semitone.
const RADIUS_GROWTH_ATTEMPTS: u32 = 20;

/// By this point the radius spans the whole keyboard from any starting pitch.
const MAX_SEARCH_ATTEMPTS: u32 = RADIUS_GROWTH_ATTEMPTS * PITCH_COUNT as u32;

/// Tally of what happened while flubbing a song.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlubReport {
    pub tracks: usize,
    pub note_ons: usize,
    pub note_offs: usize,
    /// Note-ons that were played at a different pitch than intended.
    pub flubbed: usize,
    /// Subset of `flubbed` caused by the intended pitch already being held.
    pub forced: usize,
    pub orphaned_note_offs: usize,
}

impl AddAssign for FlubReport {
    fn add_assign(&mut self, other: Self) {
        self.tracks += other.tracks;
        self.note_ons += other.note_ons;
        self.note_offs += other.note_offs;
        self.flubbed += other.flubbed;
        self.forced += other.forced;
        self.orphaned_note_offs += other.orphaned_note_offs;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub pitch: u8,
    pub flubbed: bool,
    pub forced: bool,
}

/// Working state for a single track. Dropped when the track is done.
#[derive(Debug, Default)]
pub struct TrackState {
    /// Pitches currently down, in actual (post-flub) pitch space.
    held: BTreeSet<u8>,

    /// Intended pitch => actual pitches of its sounding notes, most recent last.
    sounding: HashMap<u8, Vec<u8>>,
}

impl TrackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, pitch: u8) -> bool {
        self.held.contains(&pitch)
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// The pitch a release of `intended` would currently resolve to.
    pub fn resolve(&self, intended: u8) -> Option<u8> {
        self.sounding
            .get(&intended)
            .and_then(|stack| stack.last().copied())
    }

    /// Press a key, possibly missing it. Returns the pitch that actually sounds.
    pub fn strike<D: Dice + ?Sized>(
        &mut self,
        intended: u8,
        config: &FlubConfig,
        dice: &mut D,
    ) -> Strike {
        let collision = self.is_held(intended);
        let mut strike = Strike {
            pitch: intended,
            flubbed: false,
            forced: false,
        };

        if collision || dice.draw() > config.skill {
            match self.find_substitute(intended, config.proximity, dice) {
                Some(pitch) => {
                    strike = Strike {
                        pitch,
                        flubbed: true,
                        forced: collision,
                    };
                }
                None => warn!(
                    "No free pitch left to flub {} onto ({} held), playing it as written..!",
                    intended,
                    self.held.len()
                ),
            }
        }

        self.held.insert(strike.pitch);
        self.sounding.entry(intended).or_default().push(strike.pitch);

        strike
    }

    /// Let go of the most recent note struck for `intended`.
    /// Returns `None` when nothing is sounding for that pitch.
    pub fn release(&mut self, intended: u8) -> Option<u8> {
        let stack = self.sounding.get_mut(&intended)?;
        let actual = stack.pop()?;

        if stack.is_empty() {
            self.sounding.remove(&intended);
        }

        self.held.remove(&actual);
        Some(actual)
    }

    fn find_substitute<D: Dice + ?Sized>(
        &self,
        intended: u8,
        proximity: u8,
        dice: &mut D,
    ) -> Option<u8> {
        if self.held.len() >= PITCH_COUNT {
            return None;
        }

        for attempt in 0..MAX_SEARCH_ATTEMPTS {
            // Slowly widen the range so a saturated neighbourhood can't trap us
            let radius = proximity.max(1) as u32 + attempt / RADIUS_GROWTH_ATTEMPTS;
            let sign = if dice.draw() < 0.5 { 1 } else { -1 };
            let magnitude = ((dice.draw() * radius as f64).ceil() as i32).clamp(1, radius as i32);
            let candidate = intended as i32 + sign * magnitude;

            if let Ok(pitch) = u8::try_from(candidate)
                && pitch <= MAX_PITCH
                && !self.is_held(pitch)
            {
                return Some(pitch);
            }
        }

        debug!(
            "Random search for a flub of {} gave up after {} attempts, scanning outward..!",
            intended, MAX_SEARCH_ATTEMPTS
        );
        self.nearest_unheld(intended)
    }

    fn nearest_unheld(&self, intended: u8) -> Option<u8> {
        let intended = intended as i32;

        (1..PITCH_COUNT as i32)
            .flat_map(|offset| [intended + offset, intended - offset])
            .filter_map(|candidate| u8::try_from(candidate).ok())
            .find(|&pitch| pitch <= MAX_PITCH && !self.is_held(pitch))
    }
}

/// Flubs every track of the song in place. Tracks don't share any state.
pub fn flub_song<D: Dice + ?Sized>(song: &mut Song, config: &FlubConfig, dice: &mut D) -> FlubReport {
    let mut report = FlubReport::default();

    for (track_idx, track) in song.tracks.iter_mut().enumerate() {
        let track_report = flub_track(track, config, dice);
        debug!(
            "Track {}: flubbed {} of {} note(s)",
            track_idx, track_report.flubbed, track_report.note_ons
        );
        report += track_report;
    }

    report
}

/// Flubs a single track in place, starting from a clean slate.
pub fn flub_track<D: Dice + ?Sized>(
    track: &mut Track,
    config: &FlubConfig,
    dice: &mut D,
) -> FlubReport {
    let mut state = TrackState::new();
    let mut report = FlubReport {
        tracks: 1,
        ..Default::default()
    };

    for event in track.events.iter_mut() {
        if event.is_release() {
            report.note_offs += 1;

            match state.release(event.pitch) {
                Some(actual) => event.pitch = actual,
                None => {
                    report.orphaned_note_offs += 1;
                    debug!("Orphaned note-off for {}..!", event.pitch);
                }
            }
        } else if event.is_strike() {
            report.note_ons += 1;

            let strike = state.strike(event.pitch, config, dice);
            if strike.flubbed {
                report.flubbed += 1;
                if strike.forced {
                    report.forced += 1;
                }

                debug!(
                    "Flubbed {} -> {}{}",
                    event.pitch,
                    strike.pitch,
                    if strike.forced { " (already held)" } else { "" }
                );
            }

            event.pitch = strike.pitch;
        }
    }

    if state.held_count() > 0 {
        debug!("{} note(s) still held at the end of the track", state.held_count());
    }

    report
}
