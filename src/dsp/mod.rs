//! DSP primitives — pure transforms over caller-owned sample buffers.
//!
//! Nothing here retains state between calls: generators fill a buffer from
//! the sample index, dynamics and the mixer mutate buffers in place, and
//! the renderer sequences them into a finished stereo mix.

pub mod dynamics;
pub mod echo;
pub mod generator;
pub mod mixer;
pub mod renderer;
