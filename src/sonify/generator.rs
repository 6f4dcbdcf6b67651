//! Note generation - maps per-core utilization onto pitch and duration
//!
//! Pitch comes from one core's reading: `floor(percent) + 15`, so 0-100% spans
//! MIDI notes 15-115. Duration comes from another core's reading:
//! `percent mod 3`, rounded to hundredths and clamped to 0.2-2.5 beats.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::clamp::clamp;
use super::policy::IndexPolicy;
use crate::error::{CoreRole, SonifyError};
use crate::io::{MidiDocument, NoteEvent};
use crate::sampling::CpuSampler;

pub const PITCH_OFFSET: u8 = 15;
pub const MIN_DURATION: f64 = 0.2;
pub const MAX_DURATION: f64 = 2.5;
pub const NOTE_CHANNEL: u8 = 0;
pub const NOTE_VOLUME: u8 = 100;

/// Blocking window for each utilization read
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// One note stream: which cores drive it and which track receives it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub pitch_core: usize,
    pub duration_core: usize,
    pub track: usize,
}

impl Voice {
    pub fn new(pitch_core: usize, duration_core: usize, track: usize) -> Self {
        Self {
            pitch_core,
            duration_core,
            track,
        }
    }

    /// Core `i` drives both pitch and duration on track `i`
    pub fn per_core(i: usize) -> Self {
        Self::new(i, i, i)
    }
}

/// Index handling for core lookups and for the target track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexPolicies {
    pub core: IndexPolicy,
    pub track: IndexPolicy,
}

/// Non-finite readings count as idle; everything else is held to 0-100
fn sanitize(percent: f32) -> f64 {
    let percent = f64::from(percent);
    if percent.is_finite() {
        clamp(percent, 0.0, 100.0)
    } else {
        0.0
    }
}

pub fn pitch_for(percent: f32) -> u8 {
    sanitize(percent).floor() as u8 + PITCH_OFFSET
}

pub fn duration_for(percent: f32) -> f64 {
    let raw = ((sanitize(percent) % 3.0) * 100.0).round() / 100.0;
    clamp(raw, MIN_DURATION, MAX_DURATION)
}

fn resolve_core(
    policy: IndexPolicy,
    role: CoreRole,
    index: usize,
    cores: usize,
) -> Result<usize, SonifyError> {
    let resolved = policy
        .resolve(index, cores)
        .ok_or(SonifyError::CoreIndexOutOfRange { role, index, cores })?;
    if resolved != index {
        tracing::debug!(%role, index, resolved, cores, "core index substituted");
    }
    Ok(resolved)
}

/// Build the note for `voice` from an already-sampled utilization vector.
///
/// `tracks` is the number of tracks the note may land on.
pub fn derive_note(
    utilization: &[f32],
    voice: Voice,
    policies: IndexPolicies,
    tracks: usize,
    start: f64,
) -> Result<NoteEvent, SonifyError> {
    if utilization.is_empty() {
        return Err(SonifyError::EmptySample);
    }
    let cores = utilization.len();
    let pitch_core = resolve_core(policies.core, CoreRole::Pitch, voice.pitch_core, cores)?;
    let duration_core =
        resolve_core(policies.core, CoreRole::Duration, voice.duration_core, cores)?;

    let track = policies
        .track
        .resolve(voice.track, tracks)
        .ok_or(SonifyError::TrackIndexOutOfRange {
            index: voice.track,
            tracks,
        })?;
    if track != voice.track {
        tracing::debug!(index = voice.track, resolved = track, tracks, "track index substituted");
    }

    Ok(NoteEvent {
        track,
        channel: NOTE_CHANNEL,
        pitch: pitch_for(utilization[pitch_core]),
        start,
        duration: duration_for(utilization[duration_core]),
        volume: NOTE_VOLUME,
    })
}

/// Samples utilization and appends one note per call to a document.
pub struct NoteGenerator<S> {
    sampler: S,
    interval: Duration,
    policies: IndexPolicies,
}

impl<S: CpuSampler> NoteGenerator<S> {
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            interval: DEFAULT_SAMPLE_INTERVAL,
            policies: IndexPolicies::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_policies(mut self, policies: IndexPolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn policies(&self) -> IndexPolicies {
        self.policies
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Sample, derive and append a note starting at beat 0
    pub fn generate(
        &mut self,
        document: &mut MidiDocument,
        voice: Voice,
    ) -> Result<NoteEvent, SonifyError> {
        self.generate_at(document, voice, 0.0)
    }

    /// Sample, derive and append a note starting at `start` beats.
    ///
    /// Sampler failures are returned unchanged; on any error nothing is appended.
    pub fn generate_at(
        &mut self,
        document: &mut MidiDocument,
        voice: Voice,
        start: f64,
    ) -> Result<NoteEvent, SonifyError> {
        let utilization = self.sampler.cpu_percent(self.interval, true)?;
        let note = derive_note(
            &utilization,
            voice,
            self.policies,
            document.track_count(),
            start,
        )?;
        document.add_note(note.clone())?;
        tracing::debug!(
            track = note.track,
            pitch = note.pitch,
            duration = note.duration,
            start = note.start,
            "note"
        );
        Ok(note)
    }
}
