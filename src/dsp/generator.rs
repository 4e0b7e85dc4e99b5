//! Periodic waveform synthesis over absolute sample indices.
//!
//! Every generator derives its timebase from the sample index
//! (`time = i / sample_rate`) rather than a running phase accumulator, so a
//! buffer's contents depend only on its length, the frequency, and the
//! sample rate.

use std::f64::consts::PI;

/// Supported waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
}

impl Waveform {
    /// Map the numeric selector used by song scripts and the CLI.
    pub fn from_index(index: u32) -> Option<Waveform> {
        match index {
            0 => Some(Waveform::Sine),
            1 => Some(Waveform::Square),
            2 => Some(Waveform::Saw),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Waveform> {
        match name {
            "sine" => Some(Waveform::Sine),
            "square" => Some(Waveform::Square),
            "saw" => Some(Waveform::Saw),
            _ => None,
        }
    }
}

/// Fill `buf` with the requested waveform at `freq_hz`.
///
/// Saw generation divides by the frequency; `freq_hz = 0` is the caller's
/// responsibility to guard (sine and square degrade gracefully to silence
/// and all-`i16::MIN` respectively).
pub fn generate(waveform: Waveform, buf: &mut [i16], freq_hz: f32, sample_rate: u32) {
    match waveform {
        Waveform::Sine => fill_sine(buf, freq_hz, sample_rate),
        Waveform::Square => fill_square(buf, freq_hz, sample_rate),
        Waveform::Saw => fill_saw(buf, freq_hz, sample_rate),
    }
}

/// `sample[i] = trunc(32767 × sin(2π·f·t))`, rounding toward zero.
pub fn fill_sine(buf: &mut [i16], freq_hz: f32, sample_rate: u32) {
    for (i, sample) in buf.iter_mut().enumerate() {
        let time = i as f32 / sample_rate as f32;
        let value = f64::from(i16::MAX) * (2.0 * PI * f64::from(freq_hz) * f64::from(time)).sin();
        *sample = value as i16;
    }
}

/// Square wave keyed off the sine's sign.
///
/// The decision signal is the truncated sine sample: strictly positive maps
/// to `i16::MAX`, everything else (including an exact zero, as at
/// `freq_hz = 0`) maps to `i16::MIN`. The asymmetric tie-break is part of
/// the waveform's contract.
pub fn fill_square(buf: &mut [i16], freq_hz: f32, sample_rate: u32) {
    for (i, sample) in buf.iter_mut().enumerate() {
        let time = i as f32 / sample_rate as f32;
        let level =
            (f64::from(i16::MAX) * (2.0 * PI * f64::from(freq_hz) * f64::from(time)).sin()) as i16;
        *sample = if level > 0 { i16::MAX } else { i16::MIN };
    }
}

/// Sawtooth from the fractional phase `frac ∈ [0, 1)`.
///
/// `frac == 0.5` yields exactly 0; otherwise the line value
/// `frac × 65535 − 32767` is narrowed without clipping, so a boundary value
/// reaching 32768 wraps to −32768 rather than saturating.
pub fn fill_saw(buf: &mut [i16], freq_hz: f32, sample_rate: u32) {
    let period = 1.0f32 / freq_hz;
    for (i, sample) in buf.iter_mut().enumerate() {
        let time = (1.0 / f64::from(sample_rate)) * i as f64;
        let cycles = time / f64::from(period);
        let frac = cycles - cycles.floor();
        *sample = if frac == 0.5 {
            0
        } else {
            wrap_i16(frac * 65535.0 - 32767.0)
        };
    }
}

/// Narrow a line value to 16 bits, wrapping instead of saturating.
fn wrap_i16(value: f64) -> i16 {
    value as i32 as i16
}
