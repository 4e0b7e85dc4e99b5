//! Render pipelines — single tones and parsed song scripts to interleaved
//! stereo sample buffers.

use crate::dsp::dynamics::{self, EnvelopePhases};
use crate::dsp::generator::{self, Waveform};
use crate::dsp::mixer;
use crate::error::RenderError;
use crate::song::{Directive, Song};
use crate::wav::AudioFormat;

/// Size of the song instrument table.
pub const NUM_INSTRUMENTS: usize = 16;

/// Per-instrument render state, updated by `W`/`P`/`E`/`G` directives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    /// Raw waveform selector; resolved (and validated) when a note plays.
    pub waveform: u32,
    /// Pan angle in radians.
    pub angle: f32,
    /// Whether notes get the ADSR envelope.
    pub adsr: bool,
    pub gain: f32,
}

impl Default for Instrument {
    fn default() -> Self {
        Instrument {
            waveform: 0,
            angle: 0.0,
            adsr: false,
            gain: 0.2,
        }
    }
}

/// Equal-tempered MIDI note to frequency: `440 × 2^((note − 69)/12)`.
pub fn midi_to_frequency(note: u32) -> f32 {
    let semitones = (note as i32 - 69) as f32 / 12.0;
    (440.0 * 2.0f64.powf(f64::from(semitones))) as f32
}

/// Render a single tone: generate, apply gain, and mix the same mono signal
/// into both channels of a fresh stereo buffer.
pub fn render_tone(
    waveform: Waveform,
    freq_hz: f32,
    gain: f32,
    frames: usize,
    fmt: &AudioFormat,
) -> Vec<i16> {
    let mut mono = vec![0i16; frames];
    generator::generate(waveform, &mut mono, freq_hz, fmt.sample_rate);
    dynamics::apply_gain(&mut mono, gain);

    let mut stereo = vec![0i16; frames * 2];
    mixer::mix_in(&mut stereo, mixer::LEFT, &mono);
    mixer::mix_in(&mut stereo, mixer::RIGHT, &mono);
    stereo
}

/// Interpret a parsed song against a 16-slot instrument table and mix every
/// note into one stereo buffer of `song.total_frames` frames.
///
/// Each `N` directive renders `end − start + 1` samples per channel, then
/// applies in order: note gain, instrument gain, the ADSR envelope when
/// enabled, and the pan gains, before accumulating at frame offset `start`.
///
/// # Panics
///
/// Instrument indices and note frame ranges are not range-checked (the
/// script is trusted, matching the front-end contract); an out-of-range
/// index or a note extending past `total_frames` panics.
pub fn render_song(
    song: &Song,
    fmt: &AudioFormat,
    phases: &EnvelopePhases,
) -> Result<Vec<i16>, RenderError> {
    let mut instruments = [Instrument::default(); NUM_INSTRUMENTS];
    let mut stereo = vec![0i16; song.total_frames * 2];

    for spanned in &song.directives {
        match spanned.directive {
            Directive::Waveform { instrument, index } => {
                instruments[instrument].waveform = index;
            }
            Directive::Pan { instrument, angle } => {
                instruments[instrument].angle = angle;
            }
            Directive::Envelope {
                instrument,
                enabled,
            } => {
                instruments[instrument].adsr = enabled;
            }
            Directive::Gain { instrument, gain } => {
                instruments[instrument].gain = gain;
            }
            Directive::Note {
                instrument,
                start,
                end,
                note,
                gain,
            } => {
                let inst = instruments[instrument];
                let waveform = Waveform::from_index(inst.waveform).ok_or(
                    RenderError::UnknownWaveform {
                        index: inst.waveform,
                    },
                )?;

                let frames = end - start + 1;
                let freq = midi_to_frequency(note);
                let mut left = vec![0i16; frames];
                let mut right = vec![0i16; frames];
                generator::generate(waveform, &mut left, freq, fmt.sample_rate);
                generator::generate(waveform, &mut right, freq, fmt.sample_rate);

                dynamics::apply_gain(&mut left, gain);
                dynamics::apply_gain(&mut right, gain);
                dynamics::apply_gain(&mut left, inst.gain);
                dynamics::apply_gain(&mut right, inst.gain);

                if inst.adsr {
                    dynamics::apply_adsr_envelope(&mut left, phases);
                    dynamics::apply_adsr_envelope(&mut right, phases);
                }

                let (left_gain, right_gain) = mixer::compute_pan(inst.angle);
                dynamics::apply_gain(&mut left, left_gain);
                dynamics::apply_gain(&mut right, right_gain);

                let region = &mut stereo[2 * start..];
                mixer::mix_in(region, mixer::LEFT, &left);
                mixer::mix_in(region, mixer::RIGHT, &right);
            }
        }
    }

    Ok(stereo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{Span, SpannedDirective};

    fn song_of(total_frames: usize, directives: Vec<Directive>) -> Song {
        Song {
            total_frames,
            directives: directives
                .into_iter()
                .map(|directive| SpannedDirective {
                    directive,
                    span: Span { start: 0, end: 0 },
                })
                .collect(),
        }
    }

    #[test]
    fn midi_reference_pitches() {
        assert!((midi_to_frequency(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_frequency(81) - 880.0).abs() < 1e-3);
        assert!((midi_to_frequency(57) - 220.0).abs() < 1e-3);
        assert!((midi_to_frequency(60) - 261.626).abs() < 1e-2);
    }

    #[test]
    fn tone_fills_both_channels_identically() {
        let stereo = render_tone(Waveform::Sine, 440.0, 1.0, 256, &AudioFormat::default());
        assert_eq!(stereo.len(), 512);
        for frame in stereo.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(stereo.iter().any(|&s| s != 0));
    }

    #[test]
    fn tone_gain_scales_square_levels() {
        let stereo = render_tone(Waveform::Square, 440.0, 0.25, 64, &AudioFormat::default());
        // 32767 × 0.25 truncates to 8191; −32768 × 0.25 to −8192.
        assert!(stereo.iter().all(|&s| s == 8191 || s == -8192));
    }

    #[test]
    fn empty_song_renders_silence() {
        let song = song_of(64, vec![]);
        let stereo = render_song(&song, &AudioFormat::default(), &EnvelopePhases::default())
            .unwrap();
        assert_eq!(stereo.len(), 128);
        assert!(stereo.iter().all(|&s| s == 0));
    }

    #[test]
    fn note_lands_at_its_frame_offset() {
        let song = song_of(
            8,
            vec![Directive::Note {
                instrument: 0,
                start: 1,
                end: 2,
                note: 69,
                gain: 1.0,
            }],
        );
        let stereo = render_song(&song, &AudioFormat::default(), &EnvelopePhases::default())
            .unwrap();
        // Frames 0 and 3.. stay silent; the note's second sample is nonzero
        // on both channels (its first is the sine's zero crossing).
        assert_eq!(&stereo[..2], &[0, 0]);
        assert_ne!(stereo[4], 0);
        assert_eq!(stereo[4], stereo[5]); // center pan
        assert!(stereo[6..].iter().all(|&s| s == 0));
    }

    #[test]
    fn default_instrument_gain_and_pan_applied() {
        // Square at sample index 0 is i16::MIN regardless of pitch:
        // −32768 × 0.2 → −6553, × √2/2 → −4634 on both channels.
        let song = song_of(
            1,
            vec![
                Directive::Waveform {
                    instrument: 0,
                    index: 1,
                },
                Directive::Note {
                    instrument: 0,
                    start: 0,
                    end: 0,
                    note: 60,
                    gain: 1.0,
                },
            ],
        );
        let stereo = render_song(&song, &AudioFormat::default(), &EnvelopePhases::default())
            .unwrap();
        assert_eq!(stereo, vec![-4634, -4634]);
    }

    #[test]
    fn notes_layer_by_accumulation() {
        let note = Directive::Note {
            instrument: 0,
            start: 0,
            end: 3,
            note: 69,
            gain: 1.0,
        };
        let single = render_song(
            &song_of(4, vec![note]),
            &AudioFormat::default(),
            &EnvelopePhases::default(),
        )
        .unwrap();
        let double = render_song(
            &song_of(4, vec![note, note]),
            &AudioFormat::default(),
            &EnvelopePhases::default(),
        )
        .unwrap();
        for (s, d) in single.iter().zip(&double) {
            assert_eq!(*d, (*s as i32 * 2).clamp(-32768, 32767) as i16);
        }
    }

    #[test]
    fn unknown_waveform_selector_fails() {
        let song = song_of(
            4,
            vec![
                Directive::Waveform {
                    instrument: 2,
                    index: 7,
                },
                Directive::Note {
                    instrument: 2,
                    start: 0,
                    end: 3,
                    note: 69,
                    gain: 1.0,
                },
            ],
        );
        let result = render_song(&song, &AudioFormat::default(), &EnvelopePhases::default());
        assert_eq!(result, Err(RenderError::UnknownWaveform { index: 7 }));
    }

    #[test]
    fn envelope_zeroes_a_note_start() {
        let phases = EnvelopePhases {
            attack: 2,
            decay: 2,
            release: 2,
        };
        let song = song_of(
            16,
            vec![
                Directive::Waveform {
                    instrument: 0,
                    index: 1, // square: full-scale from sample 1 on
                },
                Directive::Envelope {
                    instrument: 0,
                    enabled: true,
                },
                Directive::Note {
                    instrument: 0,
                    start: 0,
                    end: 15,
                    note: 69,
                    gain: 1.0,
                },
            ],
        );
        let stereo = render_song(&song, &AudioFormat::default(), &phases).unwrap();
        // Attack multiplier is 0 at the note's first sample.
        assert_eq!(stereo[0], 0);
        assert_eq!(stereo[1], 0);
        assert!(stereo.iter().any(|&s| s != 0));
    }
}
