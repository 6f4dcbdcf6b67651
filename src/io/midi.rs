use midly::num::{u4, u7};
use midly::{MidiMessage, TrackEventKind};

/// Channel messages written to a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Encode as an SMF track event. Out-of-range fields are saturated to
    /// their 4-bit / 7-bit limits.
    pub fn to_track_event_kind(self) -> TrackEventKind<'static> {
        match self {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => TrackEventKind::Midi {
                channel: u4::new(channel.min(15)),
                message: MidiMessage::NoteOn {
                    key: u7::new(key.min(127)),
                    vel: u7::new(velocity.min(127)),
                },
            },
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => TrackEventKind::Midi {
                channel: u4::new(channel.min(15)),
                message: MidiMessage::NoteOff {
                    key: u7::new(key.min(127)),
                    vel: u7::new(velocity.min(127)),
                },
            },
        }
    }

    /// Ordering among events sharing a tick: releases before attacks
    pub(crate) fn tick_rank(&self) -> u8 {
        match self {
            MidiEvent::NoteOff { .. } => 1,
            MidiEvent::NoteOn { .. } => 2,
        }
    }
}
