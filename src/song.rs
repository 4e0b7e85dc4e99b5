//! Song script — a tiny directive language for sequencing notes onto a
//! fixed-length stereo timeline.
//!
//! A script is whitespace-separated tokens: a leading integer giving the
//! total frame count of the output, followed by directives:
//!
//! ```text
//! 44100
//! W 0 2          // instrument 0 plays a saw
//! P 0 0.6        // panned right of center
//! E 0 1          // ADSR on
//! G 0 0.3        // instrument gain
//! N 0 0 22049 69 1.0   // play MIDI note 69 over frames [0, 22049]
//! ```
//!
//! Every directive and every parse error carries its source byte range so
//! front-ends can point at the offending token.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};

/// Byte range in the source script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One song directive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    /// `N inst start end note gain` — play a note covering frames
    /// `[start, end]` inclusive.
    Note {
        instrument: usize,
        start: usize,
        end: usize,
        note: u32,
        gain: f32,
    },
    /// `W inst index` — set the instrument's waveform selector. The index
    /// is validated at render time, not here.
    Waveform { instrument: usize, index: u32 },
    /// `P inst angle` — set the instrument's pan angle in radians.
    Pan { instrument: usize, angle: f32 },
    /// `E inst flag` — enable the ADSR envelope iff `flag == 1`.
    Envelope { instrument: usize, enabled: bool },
    /// `G inst gain` — set the instrument's gain.
    Gain { instrument: usize, gain: f32 },
}

/// A directive plus the byte range it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpannedDirective {
    pub directive: Directive,
    pub span: Span,
}

/// A parsed song script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Total stereo frame count of the rendered output.
    pub total_frames: usize,
    pub directives: Vec<SpannedDirective>,
}

/// Parse a song script.
pub fn parse(src: &str) -> Result<Song, ParseError> {
    Parser::new(src).parse_song()
}

struct Parser<'a> {
    src: &'a str,
    /// Byte ranges of whitespace-separated tokens.
    tokens: Vec<(usize, usize)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut start = None;
        for (i, ch) in src.char_indices() {
            if ch.is_whitespace() {
                if let Some(s) = start.take() {
                    tokens.push((s, i));
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            tokens.push((s, src.len()));
        }
        Parser {
            src,
            tokens,
            pos: 0,
        }
    }

    fn eof_span(&self) -> Span {
        Span {
            start: self.src.len(),
            end: self.src.len(),
        }
    }

    fn advance(&mut self) -> Option<(usize, usize)> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_token(&mut self, expected: &str) -> Result<(usize, usize), ParseError> {
        self.advance().ok_or_else(|| ParseError::UnexpectedEnd {
            expected: expected.to_string(),
            span: self.eof_span(),
        })
    }

    fn text(&self, token: (usize, usize)) -> &'a str {
        &self.src[token.0..token.1]
    }

    fn expect_i64(&mut self, expected: &str) -> Result<(i64, Span), ParseError> {
        let token = self.expect_token(expected)?;
        let span = Span {
            start: token.0,
            end: token.1,
        };
        let text = self.text(token);
        let value = text.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
            text: text.to_string(),
            span,
        })?;
        Ok((value, span))
    }

    fn expect_f32(&mut self, expected: &str) -> Result<(f32, Span), ParseError> {
        let token = self.expect_token(expected)?;
        let span = Span {
            start: token.0,
            end: token.1,
        };
        let text = self.text(token);
        let value = text.parse::<f32>().map_err(|_| ParseError::InvalidNumber {
            text: text.to_string(),
            span,
        })?;
        Ok((value, span))
    }

    /// A non-negative integer; negatives report against `directive`.
    fn expect_count(
        &mut self,
        expected: &str,
        directive: char,
    ) -> Result<usize, ParseError> {
        let (value, span) = self.expect_i64(expected)?;
        if value < 0 {
            return Err(ParseError::NegativeValue { directive, span });
        }
        Ok(value as usize)
    }

    fn expect_instrument(&mut self, directive: char) -> Result<usize, ParseError> {
        self.expect_count("an instrument index", directive)
    }

    fn parse_song(&mut self) -> Result<Song, ParseError> {
        let total_frames = {
            let (value, span) = self.expect_i64("the total sample count")?;
            if value < 0 {
                return Err(ParseError::NegativeValue {
                    directive: '#',
                    span,
                });
            }
            value as usize
        };

        let mut directives = Vec::new();
        while let Some(token) = self.advance() {
            let start = token.0;
            let directive = match self.text(token) {
                "N" => {
                    let instrument = self.expect_instrument('N')?;
                    let note_start = self.expect_count("a start frame", 'N')?;
                    let note_end = self.expect_count("an end frame", 'N')?;
                    let (note, note_span) = self.expect_i64("a MIDI note number")?;
                    if note < 0 {
                        return Err(ParseError::NegativeValue {
                            directive: 'N',
                            span: note_span,
                        });
                    }
                    let (gain, gain_span) = self.expect_f32("a note gain")?;
                    if gain < 0.0 {
                        return Err(ParseError::NegativeValue {
                            directive: 'N',
                            span: gain_span,
                        });
                    }
                    Directive::Note {
                        instrument,
                        start: note_start,
                        end: note_end,
                        note: note as u32,
                        gain,
                    }
                }
                "W" => {
                    let instrument = self.expect_instrument('W')?;
                    let (index, index_span) = self.expect_i64("a waveform index")?;
                    if index < 0 {
                        return Err(ParseError::NegativeValue {
                            directive: 'W',
                            span: index_span,
                        });
                    }
                    Directive::Waveform {
                        instrument,
                        index: index as u32,
                    }
                }
                "P" => {
                    let instrument = self.expect_instrument('P')?;
                    let (angle, _) = self.expect_f32("a pan angle")?;
                    Directive::Pan { instrument, angle }
                }
                "E" => {
                    let instrument = self.expect_instrument('E')?;
                    let (flag, _) = self.expect_i64("an envelope flag")?;
                    Directive::Envelope {
                        instrument,
                        enabled: flag == 1,
                    }
                }
                "G" => {
                    let instrument = self.expect_instrument('G')?;
                    let (gain, _) = self.expect_f32("an instrument gain")?;
                    Directive::Gain { instrument, gain }
                }
                other => {
                    return Err(ParseError::UnknownDirective {
                        found: other.to_string(),
                        span: Span {
                            start: token.0,
                            end: token.1,
                        },
                    });
                }
            };

            let end = self.tokens[self.pos - 1].1;
            directives.push(SpannedDirective {
                directive,
                span: Span { start, end },
            });
        }

        Ok(Song {
            total_frames,
            directives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_script() {
        let src = "100\nW 0 2\nP 0 0.5\nE 0 1\nG 0 0.3\nN 0 0 99 69 1.0\n";
        let song = parse(src).unwrap();
        assert_eq!(song.total_frames, 100);
        assert_eq!(song.directives.len(), 5);
        assert_eq!(
            song.directives[0].directive,
            Directive::Waveform {
                instrument: 0,
                index: 2
            }
        );
        assert_eq!(
            song.directives[4].directive,
            Directive::Note {
                instrument: 0,
                start: 0,
                end: 99,
                note: 69,
                gain: 1.0
            }
        );
    }

    #[test]
    fn directive_spans_cover_their_tokens() {
        let src = "100 W 0 2";
        let song = parse(src).unwrap();
        let span = song.directives[0].span;
        assert_eq!(&src[span.start..span.end], "W 0 2");
    }

    #[test]
    fn header_only_script_is_empty_song() {
        let song = parse(" 250 ").unwrap();
        assert_eq!(song.total_frames, 250);
        assert!(song.directives.is_empty());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            parse(""),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn negative_frame_count_is_rejected() {
        assert!(matches!(
            parse("-5"),
            Err(ParseError::NegativeValue { directive: '#', .. })
        ));
    }

    #[test]
    fn unknown_directive_is_reported_with_span() {
        let src = "10\nQ 0 1";
        match parse(src) {
            Err(ParseError::UnknownDirective { found, span }) => {
                assert_eq!(found, "Q");
                assert_eq!(&src[span.start..span.end], "Q");
            }
            other => panic!("expected UnknownDirective, got {other:?}"),
        }
    }

    #[test]
    fn missing_note_arguments_are_rejected() {
        assert!(matches!(
            parse("10 N 0 0"),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn negative_note_values_are_rejected() {
        assert!(matches!(
            parse("10 N 0 0 5 -3 1.0"),
            Err(ParseError::NegativeValue { directive: 'N', .. })
        ));
        assert!(matches!(
            parse("10 N 0 0 5 60 -0.5"),
            Err(ParseError::NegativeValue { directive: 'N', .. })
        ));
    }

    #[test]
    fn non_numeric_token_is_invalid_number() {
        match parse("10 P 0 wide") {
            Err(ParseError::InvalidNumber { text, .. }) => assert_eq!(text, "wide"),
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn envelope_flag_must_be_exactly_one() {
        let song = parse("10 E 3 1 E 4 2").unwrap();
        assert_eq!(
            song.directives[0].directive,
            Directive::Envelope {
                instrument: 3,
                enabled: true
            }
        );
        assert_eq!(
            song.directives[1].directive,
            Directive::Envelope {
                instrument: 4,
                enabled: false
            }
        );
    }

    #[test]
    fn songs_serialize_to_json() {
        let song = parse("10 G 0 0.25").unwrap();
        let json = serde_json::to_string(&song).unwrap();
        let back: Song = serde_json::from_str(&json).unwrap();
        assert_eq!(back, song);
    }
}
