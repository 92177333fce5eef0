use crate::engine::{Dice, FlubReport, flub_song};
use crate::model::config::FlubConfig;
use crate::model::song::*;
use anyhow::{Result, anyhow, bail};
use log::debug;
use midly::{MetaMessage, MidiMessage, Smf, TrackEvent, TrackEventKind};
use std::fs;
use std::path::Path;

const MAX_PITCH: u8 = 127;

pub fn read_midi_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).map_err(|e| {
        anyhow!(
            "Failed to read MIDI file {}: {}",
            path.as_ref().display(),
            e
        )
    })
}

pub fn write_midi_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    fs::write(path.as_ref(), bytes).map_err(|e| {
        anyhow!(
            "Failed to write MIDI file {}: {}",
            path.as_ref().display(),
            e
        )
    })
}

pub fn parse_smf(bytes: &[u8]) -> Result<Smf<'_>> {
    let smf = Smf::parse(bytes).map_err(|e| anyhow!("Failed to parse MIDI: {:?}", e))?;

    debug!(
        "MIDI format: {:?}, timing: {:?}, tracks: {}",
        smf.header.format,
        smf.header.timing,
        smf.tracks.len()
    );

    Ok(smf)
}

pub fn encode_smf(smf: &Smf) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)
        .map_err(|e| anyhow!("Failed to encode MIDI: {}", e))?;

    Ok(bytes)
}

/// Lift every track of the file into the engine's event model, one event per SMF event.
pub fn decode_song(smf: &Smf) -> Song {
    let mut title: Option<String> = None;
    let mut tracks = Vec::with_capacity(smf.tracks.len());

    for track in smf.tracks.iter() {
        let mut events = Vec::with_capacity(track.len());

        for event in track.iter() {
            if title.is_none()
                && let TrackEventKind::Meta(MetaMessage::TrackName(bytes)) = &event.kind
            {
                title = Some(String::from_utf8_lossy(bytes).into_owned());
                debug!("Track name: {:?}", title);
            }

            events.push(decode_event(event));
        }

        tracks.push(Track { events });
    }

    Song { title, tracks }
}

fn decode_event(event: &TrackEvent) -> Event {
    let delta = event.delta.as_int();

    let TrackEventKind::Midi { channel, message } = &event.kind else {
        return Event::other(delta);
    };

    let (kind, pitch, velocity) = match message {
        MidiMessage::NoteOn { key, vel } => (EventKind::NoteOn, key.as_int(), vel.as_int()),
        MidiMessage::NoteOff { key, vel } => (EventKind::NoteOff, key.as_int(), vel.as_int()),
        _ => (EventKind::Other, 0, 0),
    };

    Event {
        kind,
        channel: channel.as_int(),
        pitch,
        velocity,
        delta,
    }
}

/// Copy note pitches from `song` back onto the raw file. Nothing else is written.
pub fn apply_song(smf: &mut Smf, song: &Song) -> Result<()> {
    if smf.tracks.len() != song.tracks.len() {
        bail!(
            "Song has {} track(s) but the MIDI file has {}..!",
            song.tracks.len(),
            smf.tracks.len()
        );
    }

    for (track_idx, (raw, track)) in smf.tracks.iter_mut().zip(song.tracks.iter()).enumerate() {
        if raw.len() != track.events.len() {
            bail!(
                "Track {} has {} event(s) but the MIDI track has {}..!",
                track_idx,
                track.events.len(),
                raw.len()
            );
        }

        for (raw_event, event) in raw.iter_mut().zip(track.events.iter()) {
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. },
                ..
            } = &mut raw_event.kind
            {
                if event.pitch > MAX_PITCH {
                    bail!(
                        "Pitch {} in track {} is outside the MIDI range..!",
                        event.pitch,
                        track_idx
                    );
                }

                *key = event.pitch.into();
            }
        }
    }

    Ok(())
}

/// Parse, flub and re-encode a whole MIDI file held in memory.
pub fn flub_midi_bytes<D: Dice + ?Sized>(
    bytes: &[u8],
    config: &FlubConfig,
    dice: &mut D,
) -> Result<(Vec<u8>, Song, FlubReport)> {
    let mut smf = parse_smf(bytes)?;
    let mut song = decode_song(&smf);

    let report = flub_song(&mut song, config, dice);

    apply_song(&mut smf, &song)?;
    let output = encode_smf(&smf)?;

    Ok((output, song, report))
}
