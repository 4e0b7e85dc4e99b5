//! tonesmith CLI — render tones, echoes, and song scripts to WAV files.
//!
//! Every failure prints a single `error:` line and exits nonzero; song
//! parse errors additionally get a span-labelled source report.

use anyhow::{Context, Result, bail};
use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tonesmith::dsp::dynamics::EnvelopePhases;
use tonesmith::dsp::echo::apply_echo;
use tonesmith::dsp::generator::Waveform;
use tonesmith::dsp::renderer::{render_song, render_tone};
use tonesmith::error::ParseError;
use tonesmith::song;
use tonesmith::wav::{self, AudioFormat};

/// tonesmith — PCM synthesis and WAV container toolkit
#[derive(Parser)]
#[command(name = "tonesmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single periodic tone to a stereo WAV file
    Tone {
        /// Waveform shape
        #[arg(short, long, default_value = "sine", value_parser = ["sine", "square", "saw"])]
        waveform: String,

        /// Frequency in Hz
        #[arg(short, long)]
        frequency: f32,

        /// Linear gain applied after generation
        #[arg(short, long, default_value_t = 0.5)]
        gain: f32,

        /// Length in sample frames
        #[arg(short, long)]
        samples: u32,

        /// Output WAV path
        output: PathBuf,
    },

    /// Append a delayed, attenuated echo to an existing WAV file
    Echo {
        /// Echo delay in sample frames
        #[arg(short, long)]
        delay: u32,

        /// Gain applied to the echoed copy
        #[arg(short, long)]
        gain: f32,

        /// Input WAV path
        input: PathBuf,

        /// Output WAV path
        output: PathBuf,
    },

    /// Render a song script to a stereo WAV file
    Song {
        /// Print the parsed directives as JSON before rendering
        #[arg(long)]
        dump_events: bool,

        /// Song script path
        input: PathBuf,

        /// Output WAV path
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let fmt = AudioFormat::default();

    match cli.command {
        Commands::Tone {
            waveform,
            frequency,
            gain,
            samples,
            output,
        } => {
            if frequency < 0.0 {
                bail!("frequency must be non-negative");
            }
            if gain < 0.0 {
                bail!("gain must be non-negative");
            }
            let Some(waveform) = Waveform::from_name(&waveform) else {
                bail!("unknown waveform '{waveform}'");
            };

            let stereo = render_tone(waveform, frequency, gain, samples as usize, &fmt);
            write_wav(&output, &fmt, samples, &stereo)?;
            report_written(&output, samples);
        }

        Commands::Echo {
            delay,
            gain,
            input,
            output,
        } => {
            if gain < 0.0 {
                bail!("gain must be non-negative");
            }

            let file = File::open(&input)
                .with_context(|| format!("cannot open {}", input.display()))?;
            let mut reader = BufReader::new(file);
            let frames = wav::read_header(&mut reader, &fmt)?;
            let stereo = wav::read_samples(&mut reader, frames as usize * 2)?;

            let echoed = apply_echo(&stereo, delay as usize, gain);
            write_wav(&output, &fmt, frames + delay, &echoed)?;
            report_written(&output, frames + delay);
        }

        Commands::Song {
            dump_events,
            input,
            output,
        } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("cannot open {}", input.display()))?;
            let parsed = match song::parse(&source) {
                Ok(parsed) => parsed,
                Err(e) => {
                    report_parse_error(&input, &source, &e)?;
                    bail!("failed to parse {}", input.display());
                }
            };

            if dump_events {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            }

            let stereo = render_song(&parsed, &fmt, &EnvelopePhases::default())?;
            write_wav(&output, &fmt, parsed.total_frames as u32, &stereo)?;
            report_written(&output, parsed.total_frames as u32);
        }
    }

    Ok(())
}

/// Write header + samples through one buffered writer.
fn write_wav(path: &Path, fmt: &AudioFormat, frames: u32, samples: &[i16]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    wav::write_header(&mut writer, fmt, frames)?;
    wav::write_samples(&mut writer, samples)?;
    writer.flush()?;
    Ok(())
}

fn report_written(path: &Path, frames: u32) {
    println!(
        "{} {} frames to {}",
        "wrote".green().bold(),
        frames,
        path.display()
    );
}

/// Render a span-labelled source report for a song parse error.
fn report_parse_error(path: &Path, source: &str, err: &ParseError) -> Result<()> {
    let name = path.display().to_string();
    let span = err.span();
    Report::build(ReportKind::Error, (name.as_str(), span.start..span.end))
        .with_message(err.to_string())
        .with_label(
            Label::new((name.as_str(), span.start..span.end))
                .with_message("here")
                .with_color(Color::Red),
        )
        .finish()
        .eprint((name.as_str(), Source::from(source)))?;
    Ok(())
}
