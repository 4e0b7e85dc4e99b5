//! Echo — accumulate a gain-scaled, delayed copy of a stereo buffer.

use super::dynamics::{apply_gain, clip_i16};

/// Produce `stereo` followed by its echo.
///
/// The output is `delay_frames` frames longer than the input: a copy of the
/// input, scaled by `gain`, is mixed in starting at the delayed offset with
/// the same i16 saturation as [`super::mixer::mix_in`]. The dry signal is
/// untouched.
pub fn apply_echo(stereo: &[i16], delay_frames: usize, gain: f32) -> Vec<i16> {
    let delay = delay_frames * 2;
    let mut out = vec![0i16; stereo.len() + delay];
    out[..stereo.len()].copy_from_slice(stereo);

    let mut delayed = stereo.to_vec();
    apply_gain(&mut delayed, gain);

    for (i, &sample) in delayed.iter().enumerate() {
        let index = i + delay;
        out[index] = clip_i16(i32::from(out[index]) + i32::from(sample));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_extended_by_the_delay() {
        let stereo = [0i16; 8];
        let out = apply_echo(&stereo, 3, 0.5);
        assert_eq!(out.len(), 8 + 6);
    }

    #[test]
    fn impulse_echoes_at_the_delay_offset() {
        let mut stereo = [0i16; 8];
        stereo[0] = 1000; // left impulse on frame 0
        let out = apply_echo(&stereo, 2, 0.5);
        assert_eq!(out[0], 1000);
        assert_eq!(out[4], 500); // frame 2, left
        assert!(out[1..4].iter().all(|&s| s == 0));
        assert!(out[5..].iter().all(|&s| s == 0));
    }

    #[test]
    fn zero_delay_doubles_the_signal() {
        let stereo = [100i16, -200, 300, -400];
        let out = apply_echo(&stereo, 0, 1.0);
        assert_eq!(out, vec![200, -400, 600, -800]);
    }

    #[test]
    fn echo_sum_saturates() {
        let stereo = [30_000i16, -30_000];
        let out = apply_echo(&stereo, 0, 1.0);
        assert_eq!(out, vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn zero_gain_leaves_only_the_dry_signal() {
        let stereo = [123i16, -456, 789, -1011];
        let out = apply_echo(&stereo, 1, 0.0);
        assert_eq!(&out[..4], &stereo);
        assert_eq!(&out[4..], &[0, 0]);
    }
}
