//! Procedural sound synthesis: every effect in the game is rendered from raw
//! waveform math at startup, no sample assets on disk.

use bevy::audio::{Decodable, Source};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

pub const SAMPLE_RATE: u32 = 44_100;

/// Gain applied after the envelope so overlapping effects don't clip.
const MASTER_GAIN: f32 = 0.4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Wave {
    Sine,
    Square,
    Saw,
    Noise,
}

/// Renders `duration` seconds of a single tone into an interleaved stereo
/// 16-bit buffer. When `slide` is non-zero the instantaneous frequency ramps
/// linearly from `freq` to `freq + slide` across the buffer.
pub fn synthesize(freq: f32, duration: f32, wave: Wave, slide: f32) -> Vec<i16> {
    let n = (duration * SAMPLE_RATE as f32).round() as usize;
    let ramp_steps = n.saturating_sub(1).max(1) as f32;
    let mut rng = rand::rng();
    let mut out = Vec::with_capacity(n * 2);

    for i in 0..n {
        let t = i as f32 / SAMPLE_RATE as f32;
        let f = if slide != 0.0 {
            freq + slide * (i as f32 / ramp_steps)
        } else {
            freq
        };
        let raw = raw_sample(wave, f, t, &mut rng);
        let env = (-3.0 * t / duration).exp();
        let sample = (raw * env * MASTER_GAIN * i16::MAX as f32) as i16;
        // Mono source duplicated into both channels.
        out.push(sample);
        out.push(sample);
    }
    out
}

fn raw_sample<R: Rng>(wave: Wave, f: f32, t: f32, rng: &mut R) -> f32 {
    match wave {
        Wave::Sine => (TAU * f * t).sin(),
        // sign(0) is taken as +1 so the output is strictly binary.
        Wave::Square => {
            if (TAU * f * t).sin() < 0.0 {
                -1.0
            } else {
                1.0
            }
        }
        Wave::Saw => 2.0 * (f * t - (f * t + 0.5).floor()),
        Wave::Noise => rng.random_range(-1.0..=1.0),
    }
}

/// A precomputed stereo clip, playable through Bevy's audio mixer.
#[derive(Asset, TypePath)]
pub struct SfxBuffer {
    samples: Arc<[i16]>,
}

impl SfxBuffer {
    pub fn synthesize(freq: f32, duration: f32, wave: Wave, slide: f32) -> Self {
        Self {
            samples: synthesize(freq, duration, wave, slide).into(),
        }
    }
}

pub struct SfxDecoder {
    samples: Arc<[i16]>,
    cursor: usize,
}

impl Iterator for SfxDecoder {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let sample = self.samples.get(self.cursor).copied();
        self.cursor += 1;
        sample
    }
}

impl Source for SfxDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len().saturating_sub(self.cursor))
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.samples.len() as f64 / (2.0 * SAMPLE_RATE as f64),
        ))
    }
}

impl Decodable for SfxBuffer {
    type DecoderItem = i16;
    type Decoder = SfxDecoder;

    fn decoder(&self) -> Self::Decoder {
        SfxDecoder {
            samples: self.samples.clone(),
            cursor: 0,
        }
    }
}
