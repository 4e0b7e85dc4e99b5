//! Amplitude shaping — static gain and the piecewise-linear ADSR envelope.

/// ADSR phase lengths in samples, shared by every envelope application.
///
/// Injected per call rather than compiled in, so tests and embedders can use
/// their own lengths. The sustain phase has no length of its own: it is
/// whatever remains of the buffer after the other three phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopePhases {
    pub attack: usize,
    pub decay: usize,
    pub release: usize,
}

impl Default for EnvelopePhases {
    /// 0.1 s per phase at 44.1 kHz.
    fn default() -> Self {
        EnvelopePhases {
            attack: 4410,
            decay: 4410,
            release: 4410,
        }
    }
}

impl EnvelopePhases {
    /// Minimum buffer length for the standard three-phase envelope.
    pub fn total(&self) -> usize {
        self.attack + self.decay + self.release
    }
}

/// Saturate a widened sample back into the 16-bit signed range.
pub(crate) fn clip_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Scale every sample by `gain`, saturating to the 16-bit range.
///
/// `gain` is expected to be non-negative; this is the caller's contract and
/// is not re-validated here.
pub fn apply_gain(buf: &mut [i16], gain: f32) {
    for sample in buf.iter_mut() {
        let value = (f32::from(*sample) * gain) as i32;
        *sample = clip_i16(value);
    }
}

/// Apply the ADSR envelope in place.
///
/// Buffers shorter than `phases.total()` get a two-piece fallback: a linear
/// rise over the first half (`(1/(len/2))·i`, integer halving) and a fall
/// over the second (`(−2/len)·(i − len)`). The two expressions are
/// reproduced as given and are not smoothed into one continuous ramp.
///
/// The standard envelope ramps 0→1.2 over the attack, 1.2→1.0 over the
/// decay, leaves the sustain region untouched (the decay already lands at
/// 1.0), and ramps 1.0→0 over the release. Envelope multiplies narrow
/// without saturation; with in-range input the 1.2 overshoot is the only
/// way past 16 bits.
pub fn apply_adsr_envelope(buf: &mut [i16], phases: &EnvelopePhases) {
    let len = buf.len();

    if len < phases.total() {
        let half = len / 2;
        let slope = 1.0f32 / half as f32;
        for i in 0..len {
            let multiplier = if i < half {
                slope * i as f32
            } else {
                (-2.0 / len as f32) * (i as f32 - len as f32)
            };
            buf[i] = (multiplier * f32::from(buf[i])) as i32 as i16;
        }
        return;
    }

    let slope_a = 1.2f32 / phases.attack as f32;
    let slope_d = -0.2f32 / phases.decay as f32;
    let slope_r = -1.0f32 / phases.release as f32;

    for i in 0..phases.attack {
        buf[i] = ((slope_a * i as f32) * f32::from(buf[i])) as i32 as i16;
    }
    for i in phases.attack..phases.attack + phases.decay {
        let multiplier = 1.2 + slope_d * (i - phases.attack) as f32;
        buf[i] = (multiplier * f32::from(buf[i])) as i32 as i16;
    }
    // Sustain: deliberate pass-through.
    let release_start = len - phases.release;
    for i in release_start..len {
        let multiplier = 1.0 + slope_r * (i - release_start) as f32;
        buf[i] = (multiplier * f32::from(buf[i])) as i32 as i16;
    }
}
