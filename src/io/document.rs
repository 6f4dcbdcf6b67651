//! In-memory MIDI document and its Standard MIDI File encoding
//!
//! Times and durations are in beats (quarter notes) until encoding, where
//! they are converted to ticks at the document's PPQ.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use midly::num::{u15, u24, u28};
use midly::{Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};

use super::MidiEvent;
use crate::error::DocumentError;

/// Ticks per quarter note unless told otherwise
pub const DEFAULT_PPQ: u16 = 960;

/// Latest absolute tick an event may sit at. Keeping every event at or below
/// it bounds each delta to the 28-bit field SMF uses.
pub const MAX_TICK: u32 = 0x0FFF_FFFF;

/// A single note appended to a track
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pub track: usize,
    pub channel: u8,
    /// MIDI note number
    pub pitch: u8,
    /// Start time in beats
    pub start: f64,
    /// Length in beats
    pub duration: f64,
    /// Note-on velocity
    pub volume: u8,
}

#[derive(Debug, Clone, PartialEq)]
enum MetaEvent {
    Tempo { time: f64, bpm: u32 },
    TrackName { time: f64, name: String },
}

#[derive(Debug, Clone, Default)]
struct TrackData {
    meta: Vec<MetaEvent>,
    notes: Vec<NoteEvent>,
}

/// Append-only collection of tracks, written out as a format 1 SMF
#[derive(Debug, Clone)]
pub struct MidiDocument {
    ppq: u16,
    tracks: Vec<TrackData>,
}

impl MidiDocument {
    pub fn new(num_tracks: usize) -> Self {
        Self::with_ppq(num_tracks, DEFAULT_PPQ)
    }

    /// PPQ is held to the 15-bit range SMF headers allow
    pub fn with_ppq(num_tracks: usize, ppq: u16) -> Self {
        Self {
            ppq: ppq.clamp(1, 0x7FFF),
            tracks: vec![TrackData::default(); num_tracks],
        }
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn ppq(&self) -> u16 {
        self.ppq
    }

    fn track_mut(&mut self, track: usize) -> Result<&mut TrackData, DocumentError> {
        let tracks = self.tracks.len();
        self.tracks
            .get_mut(track)
            .ok_or(DocumentError::NoSuchTrack { track, tracks })
    }

    pub fn add_tempo(&mut self, track: usize, time: f64, bpm: u32) -> Result<(), DocumentError> {
        self.checked_ticks(time)?;
        self.track_mut(track)?
            .meta
            .push(MetaEvent::Tempo { time, bpm });
        Ok(())
    }

    pub fn add_track_name(
        &mut self,
        track: usize,
        time: f64,
        name: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.checked_ticks(time)?;
        self.track_mut(track)?.meta.push(MetaEvent::TrackName {
            time,
            name: name.into(),
        });
        Ok(())
    }

    /// Fails without appending if the note would end past `MAX_TICK`
    pub fn add_note(&mut self, note: NoteEvent) -> Result<(), DocumentError> {
        let on_tick = self.checked_ticks(note.start)?;
        let end = note.start + note.duration;
        if self.checked_ticks(end)?.max(on_tick.saturating_add(1)) > MAX_TICK {
            return Err(DocumentError::TimeOutOfRange { beats: end });
        }
        self.track_mut(note.track)?.notes.push(note);
        Ok(())
    }

    /// Notes appended to `track`, in insertion order
    pub fn notes(&self, track: usize) -> &[NoteEvent] {
        self.tracks
            .get(track)
            .map(|t| t.notes.as_slice())
            .unwrap_or(&[])
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes.len()).sum()
    }

    /// Negative times pin to tick 0; non-finite or past `MAX_TICK` is an error
    fn checked_ticks(&self, beats: f64) -> Result<u32, DocumentError> {
        let ticks = (beats * self.ppq as f64).round();
        if !ticks.is_finite() || ticks > MAX_TICK as f64 {
            return Err(DocumentError::TimeOutOfRange { beats });
        }
        Ok(ticks.max(0.0) as u32)
    }

    /// Only called on times `checked_ticks` already accepted
    fn beats_to_ticks(&self, beats: f64) -> u32 {
        (beats * self.ppq as f64).round().clamp(0.0, MAX_TICK as f64) as u32
    }

    /// Build the SMF view of this document, borrowing track names
    pub fn to_smf(&self) -> Smf<'_> {
        let header = Header::new(Format::Parallel, Timing::Metrical(u15::new(self.ppq)));
        let mut smf = Smf::new(header);
        for track in &self.tracks {
            smf.tracks.push(self.encode_track(track));
        }
        smf
    }

    fn encode_track<'a>(&self, track: &'a TrackData) -> Vec<TrackEvent<'a>> {
        // (tick, rank, event); meta first at a shared tick, then note-offs, then note-ons
        let mut timed: Vec<(u32, u8, TrackEventKind<'a>)> =
            Vec::with_capacity(track.meta.len() + track.notes.len() * 2);

        for meta in &track.meta {
            match meta {
                MetaEvent::Tempo { time, bpm } => {
                    let micros = 60_000_000 / (*bpm).max(1);
                    timed.push((
                        self.beats_to_ticks(*time),
                        0,
                        TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros.min(0xFF_FFFF)))),
                    ));
                }
                MetaEvent::TrackName { time, name } => {
                    timed.push((
                        self.beats_to_ticks(*time),
                        0,
                        TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
                    ));
                }
            }
        }

        for note in &track.notes {
            let on_tick = self.beats_to_ticks(note.start);
            // a note always sounds for at least one tick
            let off_tick = self
                .beats_to_ticks(note.start + note.duration)
                .max(on_tick.saturating_add(1));
            let on = MidiEvent::NoteOn {
                channel: note.channel,
                key: note.pitch,
                velocity: note.volume,
            };
            let off = MidiEvent::NoteOff {
                channel: note.channel,
                key: note.pitch,
                velocity: 0,
            };
            timed.push((on_tick, on.tick_rank(), on.to_track_event_kind()));
            timed.push((off_tick, off.tick_rank(), off.to_track_event_kind()));
        }

        timed.sort_by_key(|(tick, rank, _)| (*tick, *rank));

        let mut events = Vec::with_capacity(timed.len() + 1);
        let mut last_tick = 0u32;
        for (tick, _, kind) in timed {
            events.push(TrackEvent {
                delta: u28::new(tick - last_tick),
                kind,
            });
            last_tick = tick;
        }
        events.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        events
    }

    pub fn write_to<W: Write>(&self, out: W) -> Result<(), DocumentError> {
        self.to_smf().write_std(out)?;
        Ok(())
    }

    pub fn to_smf_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Replace the file at `path` with the current document
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::MidiMessage;

    fn note(track: usize, pitch: u8, start: f64, duration: f64) -> NoteEvent {
        NoteEvent {
            track,
            channel: 0,
            pitch,
            start,
            duration,
            volume: 100,
        }
    }

    /// (absolute tick, kind) pairs for one parsed track
    fn absolute<'a>(track: &[TrackEvent<'a>]) -> Vec<(u32, TrackEventKind<'a>)> {
        let mut tick = 0;
        track
            .iter()
            .map(|e| {
                tick += e.delta.as_int();
                (tick, e.kind)
            })
            .collect()
    }

    #[test]
    fn add_note_to_missing_track_fails() {
        let mut doc = MidiDocument::new(2);
        let err = doc.add_note(note(5, 60, 0.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::NoSuchTrack { track: 5, tracks: 2 }
        ));
        assert_eq!(doc.note_count(), 0);
    }

    #[test]
    fn header_matches_document() {
        let doc = MidiDocument::with_ppq(3, 480);
        let bytes = doc.to_smf_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 3);
    }

    #[test]
    fn notes_become_on_off_pairs_in_ticks() {
        let mut doc = MidiDocument::with_ppq(1, 960);
        doc.add_note(note(0, 65, 1.0, 2.0)).unwrap();
        let bytes = doc.to_smf_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let events = absolute(&smf.tracks[0]);

        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            (960, TrackEventKind::Midi { message: MidiMessage::NoteOn { key, vel }, .. })
                if key.as_int() == 65 && vel.as_int() == 100
        ));
        assert!(matches!(
            events[1],
            (2880, TrackEventKind::Midi { message: MidiMessage::NoteOff { key, .. }, .. })
                if key.as_int() == 65
        ));
        assert!(matches!(events[2].1, TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    }

    #[test]
    fn meta_events_lead_and_tempo_is_in_microseconds() {
        let mut doc = MidiDocument::new(1);
        doc.add_note(note(0, 60, 0.0, 1.0)).unwrap();
        doc.add_track_name(0, 0.0, "CPU 0").unwrap();
        doc.add_tempo(0, 0.0, 120).unwrap();
        let bytes = doc.to_smf_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let kinds: Vec<_> = smf.tracks[0].iter().map(|e| e.kind).collect();

        assert_eq!(kinds[0], TrackEventKind::Meta(MetaMessage::TrackName(b"CPU 0")));
        assert_eq!(
            kinds[1],
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))
        );
        assert!(matches!(
            kinds[2],
            TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. }
        ));
    }

    #[test]
    fn overlapping_notes_release_before_next_attack() {
        let mut doc = MidiDocument::new(1);
        doc.add_note(note(0, 60, 0.0, 1.0)).unwrap();
        doc.add_note(note(0, 60, 1.0, 1.0)).unwrap();
        let bytes = doc.to_smf_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let events = absolute(&smf.tracks[0]);

        assert!(matches!(
            events[1],
            (960, TrackEventKind::Midi { message: MidiMessage::NoteOff { .. }, .. })
        ));
        assert!(matches!(
            events[2],
            (960, TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. })
        ));
    }

    #[test]
    fn zero_length_note_still_lasts_one_tick() {
        let mut doc = MidiDocument::new(1);
        doc.add_note(note(0, 60, 0.0, 0.0)).unwrap();
        let bytes = doc.to_smf_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let events = absolute(&smf.tracks[0]);
        assert_eq!(events[0].0, 0);
        assert_eq!(events[1].0, 1);
    }

    #[test]
    fn distant_note_keeps_its_tick() {
        let mut doc = MidiDocument::with_ppq(1, 960);
        doc.add_note(note(0, 60, 0.0, 1.0)).unwrap();
        doc.add_note(note(0, 62, 200_000.0, 1.0)).unwrap();
        let bytes = doc.to_smf_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let events = absolute(&smf.tracks[0]);

        assert!(matches!(
            events[2],
            (192_000_000, TrackEventKind::Midi { message: MidiMessage::NoteOn { key, .. }, .. })
                if key.as_int() == 62
        ));
        assert_eq!(events[3].0, 192_000_960);
    }

    #[test]
    fn times_past_the_last_tick_are_refused() {
        let mut doc = MidiDocument::with_ppq(1, 960);
        let err = doc.add_note(note(0, 60, 400_000.0, 1.0)).unwrap_err();
        assert!(matches!(err, DocumentError::TimeOutOfRange { .. }));

        // starts in range but ends past it
        let last_beat = MAX_TICK as f64 / 960.0;
        assert!(doc.add_note(note(0, 60, last_beat - 0.5, 1.0)).is_err());

        assert!(doc.add_note(note(0, 60, f64::NAN, 1.0)).is_err());
        assert!(doc.add_tempo(0, f64::INFINITY, 120).is_err());
        assert!(doc.add_track_name(0, 1.0e9, "late").is_err());
        assert_eq!(doc.note_count(), 0);
    }

    #[test]
    fn save_writes_parseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");
        let mut doc = MidiDocument::new(2);
        doc.add_note(note(1, 70, 0.0, 0.5)).unwrap();
        doc.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 2);
        assert_eq!(smf.tracks[0].len(), 1);
        assert_eq!(smf.tracks[1].len(), 3);
    }
}
