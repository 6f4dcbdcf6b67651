//! Recorder - the sampling loop that drives note generation
//!
//! Each tick asks the generator for one note per voice, then sleeps out the
//! rest of the tick interval. The document is written to disk every
//! `save_every` ticks and again when the loop ends, so the file on disk is
//! always a complete SMF.

use std::thread;
use std::time::Instant;

use crate::config::SonifyConfig;
use crate::error::SonifyError;
use crate::io::{MidiDocument, NoteEvent};
use crate::sampling::CpuSampler;
use crate::sonify::NoteGenerator;

pub struct Recorder<S> {
    config: SonifyConfig,
    generator: NoteGenerator<S>,
    document: MidiDocument,
    ticks_done: u64,
}

impl<S: CpuSampler> Recorder<S> {
    /// Set up a document with one named, tempo-stamped track per configured track
    pub fn new(config: SonifyConfig, sampler: S) -> Result<Self, SonifyError> {
        config.validate()?;
        let mut document = MidiDocument::with_ppq(config.tracks.len(), config.ppq);
        for (track, name) in config.tracks.iter().enumerate() {
            document.add_tempo(track, 0.0, config.bpm)?;
            document.add_track_name(track, 0.0, name.as_str())?;
        }

        for voice in &config.voices {
            if voice.track >= config.tracks.len() {
                tracing::warn!(
                    track = voice.track,
                    tracks = config.tracks.len(),
                    policy = ?config.track_policy,
                    "voice targets a track that does not exist"
                );
            }
        }

        let generator = NoteGenerator::new(sampler)
            .with_interval(config.sample_interval())
            .with_policies(config.policies());

        Ok(Self {
            config,
            generator,
            document,
            ticks_done: 0,
        })
    }

    pub fn config(&self) -> &SonifyConfig {
        &self.config
    }

    pub fn document(&self) -> &MidiDocument {
        &self.document
    }

    pub fn ticks_done(&self) -> u64 {
        self.ticks_done
    }

    pub fn generator(&self) -> &NoteGenerator<S> {
        &self.generator
    }

    /// Beat at which the current tick's notes start
    fn tick_start(&self) -> f64 {
        if self.config.sequential {
            self.ticks_done as f64 * self.config.beats_per_tick()
        } else {
            0.0
        }
    }

    /// Generate one note per voice
    pub fn tick(&mut self) -> Result<Vec<NoteEvent>, SonifyError> {
        let start = self.tick_start();
        let mut notes = Vec::with_capacity(self.config.voices.len());
        for voice in &self.config.voices {
            notes.push(self.generator.generate_at(&mut self.document, *voice, start)?);
        }
        self.ticks_done += 1;
        Ok(notes)
    }

    pub fn save(&self) -> Result<(), SonifyError> {
        self.document.save(&self.config.output)?;
        tracing::info!(
            path = %self.config.output.display(),
            notes = self.document.note_count(),
            ticks = self.ticks_done,
            "saved"
        );
        Ok(())
    }

    /// Loop until the configured tick count is reached, or forever without one.
    ///
    /// Returns the number of ticks completed by this call. A failing tick ends
    /// the loop; whatever was recorded up to it is saved before the error is
    /// returned.
    pub fn run(&mut self) -> Result<u64, SonifyError> {
        let tick_interval = self.config.tick_interval();
        let mut completed = 0u64;

        while self.config.ticks.map_or(true, |limit| completed < limit) {
            let started = Instant::now();
            if let Err(err) = self.tick() {
                tracing::warn!(error = %err, ticks = completed, "tick failed, saving partial recording");
                if let Err(save_err) = self.save() {
                    tracing::warn!(error = %save_err, "failed to save partial recording");
                }
                return Err(err);
            }
            completed += 1;

            if self.ticks_done % self.config.save_every == 0 {
                self.save()?;
            }

            if let Some(rest) = tick_interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }

        self.save()?;
        tracing::info!(
            ticks = completed,
            notes = self.document.note_count(),
            "recording finished"
        );
        Ok(completed)
    }
}
