//! Stereo placement — pan gains from an angle, and saturating mix-in.

use super::dynamics::clip_i16;

/// Index of the left channel in an interleaved stereo buffer.
pub const LEFT: usize = 0;
/// Index of the right channel in an interleaved stereo buffer.
pub const RIGHT: usize = 1;

/// Compute `(left, right)` gains for a pan angle in radians.
///
/// `L = (√2/2)(cos θ + sin θ)`, `R = (√2/2)(cos θ − sin θ)`. At θ = 0 both
/// gains are √2/2 (center). Extreme angles can push a gain above unity or
/// below zero; the pair is returned unclamped by design.
pub fn compute_pan(angle: f32) -> (f32, f32) {
    let theta = f64::from(angle);
    let scale = 2.0f64.sqrt() / 2.0;
    let left = scale * (theta.cos() + theta.sin());
    let right = scale * (theta.cos() - theta.sin());
    (left as f32, right as f32)
}

/// Accumulate a mono buffer into one channel of an interleaved stereo
/// buffer, saturating each sum to the 16-bit range.
///
/// Frame `k` of `mono` lands at `stereo[2k + channel]`. Existing content is
/// added to, not overwritten, so multiple sources layer across calls.
///
/// # Panics
///
/// Panics if `stereo` is shorter than `2 × mono.len()` or `channel` is not
/// 0 or 1; callers are responsible for both (the buffers are theirs).
pub fn mix_in(stereo: &mut [i16], channel: usize, mono: &[i16]) {
    for (k, &sample) in mono.iter().enumerate() {
        let index = 2 * k + channel;
        stereo[index] = clip_i16(i32::from(stereo[index]) + i32::from(sample));
    }
}
