//! Tempo estimation over downloaded audio.
//!
//! Decodes the MP3 to mono samples and estimates the beat period from the
//! autocorrelation of the onset-energy envelope. Good enough to label a
//! generated track; not a general beat tracker.

use std::fs::File;
use std::path::Path;

use log::debug;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Error, Result};

/// Search range for the beat period.
const MIN_BPM: f32 = 60.0;
const MAX_BPM: f32 = 200.0;

/// Analysis window and hop, in samples.
const WINDOW: usize = 1024;
const HOP: usize = 512;

/// Estimate the tempo of an audio file in beats per minute.
pub fn estimate_bpm(path: &Path) -> Result<f32> {
    let (samples, sample_rate) = decode_mono(path)?;
    tempo_from_samples(&samples, sample_rate)
        .ok_or_else(|| Error::Audio(format!("{}: too little audio to estimate tempo", path.display())))
}

/// Decode the default track to interleaved-downmixed mono f32 samples.
fn decode_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let file = File::open(path)?;
    let source = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| Error::Audio(format!("probe failed: {err}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| Error::Audio("no default audio track".to_string()))?;
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let channels = track.codec_params.channels.map_or(2, |set| set.count()).max(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| Error::Audio(format!("decoder init failed: {err}")))?;

    let mut mono = Vec::new();
    while let Ok(packet) = format.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                for frame in buffer.samples().chunks(channels) {
                    mono.push(frame.iter().sum::<f32>() / frame.len() as f32);
                }
            }
            Err(err) => {
                // MP3 tails often end mid-frame; keep what decoded so far.
                debug!("decode stopped early: {err}");
                break;
            }
        }
    }

    Ok((mono, sample_rate))
}

/// Pick the beat period whose lag maximizes the autocorrelation of the
/// onset-energy envelope, searched across the plausible BPM range.
/// Returns `None` when the signal is too short to measure.
pub(crate) fn tempo_from_samples(samples: &[f32], sample_rate: u32) -> Option<f32> {
    // Short-time energy envelope.
    let mut envelope = Vec::with_capacity(samples.len() / HOP + 1);
    let mut offset = 0;
    while offset + WINDOW <= samples.len() {
        let energy: f32 = samples[offset..offset + WINDOW].iter().map(|s| s * s).sum();
        envelope.push(energy);
        offset += HOP;
    }
    if envelope.len() < 64 {
        return None;
    }

    // Onset strength: positive energy flux, mean-removed.
    let mut flux: Vec<f32> = envelope
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).max(0.0))
        .collect();
    let mean = flux.iter().sum::<f32>() / flux.len() as f32;
    for value in &mut flux {
        *value -= mean;
    }

    let frame_rate = sample_rate as f32 / HOP as f32;
    let min_lag = ((frame_rate * 60.0 / MAX_BPM) as usize).max(1);
    let max_lag = ((frame_rate * 60.0 / MIN_BPM) as usize).min(flux.len().saturating_sub(1));
    if min_lag >= max_lag {
        return None;
    }

    let scores: Vec<f32> = (min_lag..=max_lag)
        .map(|lag| {
            let mut score = 0.0;
            for t in lag..flux.len() {
                score += flux[t] * flux[t - lag];
            }
            score / (flux.len() - lag) as f32
        })
        .collect();

    let peak = scores.iter().copied().fold(f32::MIN, f32::max);
    if peak <= 0.0 {
        return None;
    }

    // A periodic envelope peaks at every multiple of the beat period; take
    // the smallest lag near the peak to avoid halving the tempo.
    let threshold = 0.85 * peak;
    let lag = scores.iter().position(|&score| score >= threshold)? + min_lag;
    Some(60.0 * frame_rate / lag as f32)
}
