//! tonesmith — a small PCM audio toolkit.
//!
//! The crate is built from pure, caller-owned-buffer transforms: a strict
//! WAVE container codec ([`wav`]), periodic waveform generators, gain and
//! ADSR dynamics, pan/mix primitives and an echo effect ([`dsp`]), and a
//! tiny song-script language ([`song`]) that the renderer sequences into a
//! finished stereo mix. Everything is synchronous and single-threaded;
//! errors propagate as [`error::TonesmithError`] so embedders choose their
//! own termination policy.

pub mod dsp;
pub mod error;
pub mod song;
pub mod wav;

use crate::error::TonesmithError;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a song script into a [`song::Song`].
pub fn parse_song(input: &str) -> Result<song::Song, TonesmithError> {
    Ok(song::parse(input)?)
}
