//! Benchmarks for SMF encoding of a recorded document.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cpu_sonify::io::{MidiDocument, NoteEvent};

use crate::CORE_COUNTS;

const TICKS: usize = 600;

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("sonify/encode");

    for &cores in CORE_COUNTS {
        let mut doc = MidiDocument::new(cores);
        for track in 0..cores {
            doc.add_tempo(track, 0.0, 120).unwrap();
            doc.add_track_name(track, 0.0, format!("CPU {}", track)).unwrap();
            for tick in 0..TICKS {
                doc.add_note(NoteEvent {
                    track,
                    channel: 0,
                    pitch: 15 + (tick % 100) as u8,
                    start: tick as f64 * 2.0,
                    duration: 0.2 + (tick % 23) as f64 * 0.1,
                    volume: 100,
                })
                .unwrap();
            }
        }

        group.bench_with_input(BenchmarkId::new("smf_bytes", cores), &cores, |b, _| {
            b.iter(|| black_box(doc.to_smf_bytes().unwrap()))
        });
    }

    group.finish();
}
