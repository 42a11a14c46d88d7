//! Example: Score several practice takes against one reference in parallel
//!
//! Usage:
//!   cargo run --release --example compare_batch -- [--jobs N] [--json] <reference.wav> <take1.wav> <take2.wav> ...
//!
//! Notes:
//! - Parallelism is across takes. Each comparison is still single-threaded.
//! - The reference is analyzed once and reused for every take.

use duet_dsp::{analyze_recording, compare_recordings, ComparisonConfig, RecordingAnalysis};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

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

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

#[derive(Debug, Clone, Serialize)]
struct TakeOut {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weighted_distance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn score_take(
    path: &str,
    reference: &RecordingAnalysis,
    config: &ComparisonConfig,
) -> TakeOut {
    let failed = |error: String| TakeOut {
        file: path.to_string(),
        notes: None,
        distance: None,
        weighted_distance: None,
        error: Some(error),
    };

    let (samples, sample_rate) = match load_wav(path) {
        Ok(decoded) => decoded,
        Err(e) => return failed(format!("decode failed: {e}")),
    };

    if sample_rate != reference.metadata.sample_rate {
        return failed(format!(
            "sample rate {} Hz does not match reference {} Hz",
            sample_rate, reference.metadata.sample_rate
        ));
    }

    let take = match analyze_recording(&samples, sample_rate, config) {
        Ok(take) => take,
        Err(e) => return failed(format!("analysis failed: {e}")),
    };

    match compare_recordings(reference, &take, config) {
        Ok(result) => TakeOut {
            file: path.to_string(),
            notes: Some(take.notes.len()),
            distance: Some(result.distance()),
            weighted_distance: Some(result.weighted_distance),
            error: None,
        },
        Err(e) => failed(format!("comparison failed: {e}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut jobs: Option<usize> = None;
    let mut json = false;
    let mut paths: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--jobs" => {
                let n = args.next().ok_or("--jobs needs a value")?;
                jobs = Some(n.parse()?);
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Usage: compare_batch [--jobs N] [--json] <reference.wav> <take.wav>...");
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.len() < 2 {
        eprintln!("ERROR: Provide a reference and at least one take. Use --help for usage.");
        std::process::exit(2);
    }

    let config = ComparisonConfig::default();
    let (reference_samples, reference_rate) = load_wav(&paths[0])?;
    let reference = analyze_recording(&reference_samples, reference_rate, &config)?;

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!(
        "Reference: {} ({} notes); {} takes, jobs={}",
        paths[0],
        reference.notes.len(),
        paths.len() - 1,
        jobs
    );

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let mut outs: Vec<TakeOut> = pool.install(|| {
        paths[1..]
            .par_iter()
            .map(|path| score_take(path, &reference, &config))
            .collect()
    });

    // Best take first; failures last
    outs.sort_by(|a, b| {
        let key = |o: &TakeOut| o.weighted_distance.unwrap_or(f32::INFINITY);
        key(a).total_cmp(&key(b))
    });

    if json {
        for o in &outs {
            println!("{}", serde_json::to_string(o)?);
        }
    } else {
        for (rank, o) in outs.iter().enumerate() {
            match (&o.error, o.distance, o.weighted_distance) {
                (None, Some(distance), Some(weighted)) => println!(
                    "#{} {}: distance={:.2} weighted={:.2} notes={}",
                    rank + 1,
                    o.file,
                    distance,
                    weighted,
                    o.notes.unwrap_or(0)
                ),
                (error, _, _) => println!(
                    "-- {}: {}",
                    o.file,
                    error.as_deref().unwrap_or("unknown error")
                ),
            }
        }
    }

    eprintln!("Done in {:.2}s", t0.elapsed().as_secs_f32());
    Ok(())
}
