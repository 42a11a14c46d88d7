//! Example: Compare a practice recording against a reference
//!
//! Usage: `cargo run --example compare_files -- reference.wav practice.wav`

use duet_dsp::{compare_performances, ComparisonConfig};

/// Load a WAV file as mono f32 samples
fn load_wav(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mono = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <reference.wav> <practice.wav>", args[0]);
        std::process::exit(2);
    }

    let (sample, sample_rate) = load_wav(&args[1])?;
    let (practice, practice_rate) = load_wav(&args[2])?;

    let config = ComparisonConfig::default();
    let result = compare_performances(&sample, sample_rate, &practice, practice_rate, &config)?;

    for (label, analysis) in [("Reference", &result.sample), ("Practice", &result.practice)] {
        println!("{} ({:.2}s):", label, analysis.metadata.duration_seconds);
        for note in &analysis.notes {
            println!(
                "  {:>6.3}s  {:<2} octave {:>2}  ({:.1} Hz)",
                note.onset_seconds,
                note.name(),
                note.octave,
                note.frequency
            );
        }
        for flag in &analysis.metadata.flags {
            println!("  warning: {:?}", flag);
        }
    }

    println!("Comparison:");
    println!("  DTW distance: {:.2}", result.comparison.distance());
    println!("  Weighted distance: {:.2}", result.comparison.weighted_distance);
    println!("  Path length: {}", result.comparison.score.path.len());

    Ok(())
}
