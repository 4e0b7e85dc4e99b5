use crate::song::Span;
use std::fmt;
use std::io;

/// Top-level error type for the crate.
#[derive(Debug)]
pub enum TonesmithError {
    Io(io::Error),
    Format(FormatError),
    Parse(ParseError),
    Render(RenderError),
}

/// A malformed WAVE header field, reported at the exact field that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    MissingRiffTag,
    MissingWaveTag,
    MissingFmtTag,
    MissingDataTag,
    BadSubchunkSize { found: u32 },
    NotPcm { found: u16 },
    BadChannelCount { found: u16, expected: u16 },
    BadSampleRate { found: u32, expected: u32 },
    BadBitDepth { found: u16, expected: u16 },
}

/// A song-script parse error, with the byte range it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedEnd { expected: String, span: Span },
    InvalidNumber { text: String, span: Span },
    UnknownDirective { found: String, span: Span },
    NegativeValue { directive: char, span: Span },
}

/// A render-time failure while interpreting song directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    UnknownWaveform { index: u32 },
}

impl ParseError {
    /// Byte range of the offending token, for diagnostics.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedEnd { span, .. }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::UnknownDirective { span, .. }
            | ParseError::NegativeValue { span, .. } => *span,
        }
    }
}

impl fmt::Display for TonesmithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TonesmithError::Io(e) => write!(f, "I/O error: {e}"),
            TonesmithError::Format(e) => write!(f, "{e}"),
            TonesmithError::Parse(e) => write!(f, "Parse error: {e}"),
            TonesmithError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TonesmithError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TonesmithError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::MissingRiffTag => write!(f, "Bad wave header (no RIFF label)"),
            FormatError::MissingWaveTag => write!(f, "Bad wave header (no WAVE label)"),
            FormatError::MissingFmtTag => write!(f, "Bad wave header (no 'fmt ' subchunk ID)"),
            FormatError::MissingDataTag => write!(f, "Bad wave header (no 'data' subchunk ID)"),
            FormatError::BadSubchunkSize { found } => {
                write!(f, "Bad wave header (fmt subchunk size was {found}, not 16)")
            }
            FormatError::NotPcm { found } => {
                write!(f, "Bad wave header (audio format {found} is not PCM)")
            }
            FormatError::BadChannelCount { found, expected } => {
                write!(f, "Bad wave header (channel count {found}, expected {expected})")
            }
            FormatError::BadSampleRate { found, expected } => {
                write!(f, "Bad wave header (sample rate {found}, expected {expected})")
            }
            FormatError::BadBitDepth { found, expected } => {
                write!(f, "Bad wave header ({found} bits per sample, expected {expected})")
            }
        }
    }
}

impl std::error::Error for FormatError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEnd { expected, .. } => {
                write!(f, "Unexpected end of song file, expected {expected}")
            }
            ParseError::InvalidNumber { text, span } => {
                write!(f, "Invalid number '{text}' at byte {}", span.start)
            }
            ParseError::UnknownDirective { found, span } => {
                write!(f, "Unknown directive '{found}' at byte {}", span.start)
            }
            ParseError::NegativeValue { directive, span } => {
                write!(
                    f,
                    "Negative value in '{directive}' directive at byte {}",
                    span.start
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownWaveform { index } => {
                write!(f, "Invalid waveform selector {index} in song")
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<io::Error> for TonesmithError {
    fn from(e: io::Error) -> Self {
        TonesmithError::Io(e)
    }
}

impl From<FormatError> for TonesmithError {
    fn from(e: FormatError) -> Self {
        TonesmithError::Format(e)
    }
}

impl From<ParseError> for TonesmithError {
    fn from(e: ParseError) -> Self {
        TonesmithError::Parse(e)
    }
}

impl From<RenderError> for TonesmithError {
    fn from(e: RenderError) -> Self {
        TonesmithError::Render(e)
    }
}
