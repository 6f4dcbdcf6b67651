// Purpose - external interfaces, format conversions

pub mod document;
pub mod midi;

pub use document::{MidiDocument, NoteEvent, DEFAULT_PPQ};
pub use midi::MidiEvent;
