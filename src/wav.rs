//! WAVE container codec — 44-byte canonical header read/write over 16-bit PCM.
//!
//! The header layout is the classic RIFF/WAVE "fmt " + "data" pair
//! (see <http://soundfile.sapp.org/doc/WaveFormat/>). Reading is strict:
//! every field is validated in stream order against the injected
//! [`AudioFormat`] and the first mismatch is reported as a [`FormatError`].
//! There is no lenient or partial parse mode.

use crate::error::{FormatError, TonesmithError};
use std::io::{Read, Write};

/// Size of the canonical header in bytes.
pub const HEADER_LEN: usize = 44;

/// PCM stream parameters, injected into the codec and renderer instead of
/// compiled-in constants so tests can run against alternate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Sample frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Bits per sample per channel.
    pub bits_per_sample: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat {
            sample_rate: 44_100,
            channels: 2,
            bits_per_sample: 16,
        }
    }
}

impl AudioFormat {
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes of audio data per second.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.channels) * u32::from(self.bytes_per_sample())
    }

    /// Bytes per interleaved sample frame.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Size of the data chunk for `num_samples` frames.
    pub fn data_size(&self, num_samples: u32) -> u32 {
        num_samples * u32::from(self.channels) * u32::from(self.bytes_per_sample())
    }
}

/// Write the 44-byte WAVE header for `num_samples` stereo frames.
///
/// No sample data is written; the caller streams the interleaved samples
/// immediately after (see [`write_samples`]).
pub fn write_header<W: Write>(
    out: &mut W,
    fmt: &AudioFormat,
    num_samples: u32,
) -> Result<(), TonesmithError> {
    let subchunk1_size: u32 = 16;
    let subchunk2_size = fmt.data_size(num_samples);
    let chunk_size = 4 + (8 + subchunk1_size) + (8 + subchunk2_size);

    // RIFF chunk descriptor
    out.write_all(b"RIFF")?;
    write_u32(out, chunk_size)?;
    out.write_all(b"WAVE")?;

    // "fmt " sub-chunk
    out.write_all(b"fmt ")?;
    write_u32(out, subchunk1_size)?;
    write_u16(out, 1)?; // PCM
    write_u16(out, fmt.channels)?;
    write_u32(out, fmt.sample_rate)?;
    write_u32(out, fmt.byte_rate())?;
    write_u16(out, fmt.block_align())?;
    write_u16(out, fmt.bits_per_sample)?;

    // "data" sub-chunk header, without the data itself
    out.write_all(b"data")?;
    write_u32(out, subchunk2_size)?;

    Ok(())
}

/// Read and validate a WAVE header, returning the frame count derived from
/// the data-chunk size.
///
/// Chunk size, byte rate, and block align are read and ignored; every other
/// field must match `fmt` exactly.
pub fn read_header<R: Read>(input: &mut R, fmt: &AudioFormat) -> Result<u32, TonesmithError> {
    if &read_tag(input)? != b"RIFF" {
        return Err(FormatError::MissingRiffTag.into());
    }
    read_u32(input)?; // chunk size, ignored

    if &read_tag(input)? != b"WAVE" {
        return Err(FormatError::MissingWaveTag.into());
    }
    if &read_tag(input)? != b"fmt " {
        return Err(FormatError::MissingFmtTag.into());
    }

    let subchunk1_size = read_u32(input)?;
    if subchunk1_size != 16 {
        return Err(FormatError::BadSubchunkSize {
            found: subchunk1_size,
        }
        .into());
    }

    let audio_format = read_u16(input)?;
    if audio_format != 1 {
        return Err(FormatError::NotPcm {
            found: audio_format,
        }
        .into());
    }

    let channels = read_u16(input)?;
    if channels != fmt.channels {
        return Err(FormatError::BadChannelCount {
            found: channels,
            expected: fmt.channels,
        }
        .into());
    }

    let sample_rate = read_u32(input)?;
    if sample_rate != fmt.sample_rate {
        return Err(FormatError::BadSampleRate {
            found: sample_rate,
            expected: fmt.sample_rate,
        }
        .into());
    }

    read_u32(input)?; // byte rate, ignored
    read_u16(input)?; // block align, ignored

    let bits_per_sample = read_u16(input)?;
    if bits_per_sample != fmt.bits_per_sample {
        return Err(FormatError::BadBitDepth {
            found: bits_per_sample,
            expected: fmt.bits_per_sample,
        }
        .into());
    }

    if &read_tag(input)? != b"data" {
        return Err(FormatError::MissingDataTag.into());
    }

    let subchunk2_size = read_u32(input)?;
    Ok(subchunk2_size / (u32::from(fmt.channels) * u32::from(fmt.bytes_per_sample())))
}

/// Write an interleaved sample buffer as little-endian 16-bit PCM.
pub fn write_samples<W: Write>(out: &mut W, samples: &[i16]) -> Result<(), TonesmithError> {
    for &sample in samples {
        out.write_all(&sample.to_le_bytes())?;
    }
    Ok(())
}

/// Read exactly `count` little-endian 16-bit samples.
///
/// A short read is fatal: the caller gets an I/O error, never a partial
/// buffer.
pub fn read_samples<R: Read>(input: &mut R, count: usize) -> Result<Vec<i16>, TonesmithError> {
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        samples.push(read_i16(input)?);
    }
    Ok(samples)
}

// ── Fixed-width primitives ───────────────────────────────────
//
// Each transfer either completes or fails; `read_exact`/`write_all` never
// hand back a silently-partial result.

fn read_tag<R: Read>(input: &mut R) -> Result<[u8; 4], TonesmithError> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_u16<R: Read>(input: &mut R) -> Result<u16, TonesmithError> {
    let mut buf = [0u8; 2];
    input.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(input: &mut R) -> Result<u32, TonesmithError> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i16<R: Read>(input: &mut R) -> Result<i16, TonesmithError> {
    let mut buf = [0u8; 2];
    input.read_exact(&mut buf)?;
    Ok(i16::from_le_bytes(buf))
}

fn write_u16<W: Write>(out: &mut W, value: u16) -> Result<(), TonesmithError> {
    out.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_u32<W: Write>(out: &mut W, value: u32) -> Result<(), TonesmithError> {
    out.write_all(&value.to_le_bytes())?;
    Ok(())
}
