//! Benchmarks for the utilization-to-MIDI path.

mod derive;
mod encode;

pub use derive::bench_derive_note;
pub use encode::bench_encode;
