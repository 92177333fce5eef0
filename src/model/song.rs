use serde::{Deserialize, Serialize};

/// What the flub engine cares about for a single track event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub channel: u8,
    pub pitch: u8,
    pub velocity: u8,
    /// Ticks since the previous event in the same track. Never touched by the engine.
    pub delta: u32,
}

impl Event {
    pub fn note_on(pitch: u8, velocity: u8, delta: u32) -> Self {
        Self {
            kind: EventKind::NoteOn,
            channel: 0,
            pitch,
            velocity,
            delta,
        }
    }

    pub fn note_off(pitch: u8, delta: u32) -> Self {
        Self {
            kind: EventKind::NoteOff,
            channel: 0,
            pitch,
            velocity: 0,
            delta,
        }
    }

    pub fn other(delta: u32) -> Self {
        Self {
            kind: EventKind::Other,
            channel: 0,
            pitch: 0,
            velocity: 0,
            delta,
        }
    }

    /// A note-on with zero velocity counts as a release.
    pub fn is_release(&self) -> bool {
        match self.kind {
            EventKind::NoteOff => true,
            EventKind::NoteOn => self.velocity == 0,
            EventKind::Other => false,
        }
    }

    pub fn is_strike(&self) -> bool {
        self.kind == EventKind::NoteOn && self.velocity > 0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub events: Vec<Event>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Song {
    pub title: Option<String>,
    pub tracks: Vec<Track>,
}

impl Song {
    pub fn note_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(|track| track.events.iter())
            .filter(|event| event.is_strike())
            .count()
    }
}
