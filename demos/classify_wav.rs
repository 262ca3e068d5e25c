//! Example: Classify the spectral frames of a WAV file
//!
//! Usage:
//!   cargo run --release --example classify_wav -- [--fft N] [--hop N] [--json] <file.wav>
//!
//! Notes:
//! - Each channel gets its own ChannelGuide; channels are processed in parallel.
//! - The FFT here only produces magnitudes for the demo; the library does none.

use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;
use spectral_guide::filters::Peak;
use spectral_guide::{ChannelGuide, GuideConfig, Segmentation};
use std::env;
use std::time::Instant;

/// Load a WAV file and return (per-channel samples, sample_rate)
fn load_wav(path: &str) -> Result<(Vec<Vec<f32>>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mut split = vec![Vec::with_capacity(interleaved.len() / channels); channels];
    for frame in interleaved.chunks(channels) {
        for (channel, &sample) in frame.iter().enumerate() {
            split[channel].push(sample);
        }
    }

    Ok((split, spec.sample_rate))
}

/// Hann-windowed magnitude spectra, `fft_size / 2 + 1` bins per frame
fn magnitude_frames(samples: &[f32], fft_size: usize, hop_size: usize) -> Vec<Vec<f64>> {
    if samples.len() < fft_size {
        return Vec::new();
    }

    let window: Vec<f64> = (0..fft_size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / fft_size as f64).cos())
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];

    let num_frames = (samples.len() - fft_size) / hop_size + 1;
    let mut frames = Vec::with_capacity(num_frames);

    for frame in 0..num_frames {
        let start = frame * hop_size;
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = Complex::new(samples[start + i] as f64 * window[i], 0.0);
        }
        fft.process(&mut buffer);
        frames.push(
            buffer[..fft_size / 2 + 1]
                .iter()
                .map(|c| c.norm() / fft_size as f64)
                .collect(),
        );
    }

    frames
}

#[derive(Serialize)]
struct FrameReport {
    channel: usize,
    frame: usize,
    time_seconds: f64,
    segmentation: Segmentation,
    percussive_bins: usize,
    spectral_peaks: usize,
}

fn analyze_channel(
    channel: usize,
    samples: &[f32],
    config: &GuideConfig,
    hop_size: usize,
) -> Result<Vec<FrameReport>, spectral_guide::GuideError> {
    let mut guide = ChannelGuide::new(config)?;
    let fft_size = config.effective_fft_size();
    let frames = magnitude_frames(samples, fft_size, hop_size);
    let mut peak = Peak::<f64>::new(guide.bin_count());
    let mut next_peaks = vec![0; guide.bin_count()];

    let mut reports = Vec::with_capacity(frames.len());
    for (index, magnitudes) in frames.iter().enumerate() {
        guide.advance(magnitudes);

        let bins = &magnitudes[..guide.bin_count()];
        peak.find_nearest_and_next_peaks(bins, 3, None, Some(&mut next_peaks[..]));
        let spectral_peaks = next_peaks
            .iter()
            .enumerate()
            .filter(|&(i, &p)| i == p && bins[p] > 1e-4)
            .count();

        let percussive_bins = guide
            .next_classification()
            .iter()
            .filter(|&&c| c == spectral_guide::Classification::Percussive)
            .count();

        reports.push(FrameReport {
            channel,
            frame: index,
            time_seconds: (index * hop_size) as f64 / config.sample_rate,
            segmentation: guide.next_segmentation(),
            percussive_bins,
            spectral_peaks,
        });
    }

    Ok(reports)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut fft_size = 2048usize;
    let mut hop_size = 512usize;
    let mut json = false;
    let mut path = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fft" => fft_size = args.next().ok_or("--fft needs a value")?.parse()?,
            "--hop" => hop_size = args.next().ok_or("--hop needs a value")?.parse()?,
            "--json" => json = true,
            "-h" | "--help" => {
                println!("Usage: classify_wav [--fft N] [--hop N] [--json] <file.wav>");
                return Ok(());
            }
            _ => path = Some(arg),
        }
    }

    let path = path.ok_or("Provide a WAV file path. Use --help for usage.")?;
    if hop_size == 0 {
        return Err("Hop size must be > 0".into());
    }

    let (channels, sample_rate) = load_wav(&path)?;
    let config = GuideConfig::new(fft_size, sample_rate as f64);

    let t0 = Instant::now();
    let results: Vec<Vec<FrameReport>> = channels
        .par_iter()
        .enumerate()
        .map(|(channel, samples)| analyze_channel(channel, samples, &config, hop_size))
        .collect::<Result<_, _>>()?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    for report in results.iter().flatten() {
        if json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            let s = &report.segmentation;
            println!(
                "ch{} {:>8.3}s  perc<{:>7.0} Hz  perc>{:>7.0} Hz  resid>{:>7.0} Hz  ({} percussive bins, {} peaks)",
                report.channel,
                report.time_seconds,
                s.percussive_below,
                s.percussive_above,
                s.residual_above,
                report.percussive_bins,
                report.spectral_peaks
            );
        }
    }

    eprintln!(
        "Classified {} channel(s), {} frames in {:.1} ms",
        results.len(),
        results.iter().map(Vec::len).sum::<usize>(),
        elapsed_ms
    );

    Ok(())
}
