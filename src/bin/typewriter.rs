use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use typewriter_core::config::TypewriterConfig;
use typewriter_core::dsp::renderer::{encode_wav, render_timeline};
use typewriter_core::error::TypewriterError;
use typewriter_core::native::{TerminalSurface, run};
use typewriter_core::rng::Lcg;
use typewriter_core::sound::OfflineAudio;
use typewriter_core::typewriter::Typewriter;

/// Typewriter text animation in the terminal.
///
/// Commands on stdin: s (sound), e (typos), v (speed), r (restart), q (quit).
#[derive(Parser, Debug)]
#[command(name = "typewriter")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for timing, typo and pitch draws
    #[arg(long)]
    seed: Option<u64>,

    /// Behave as if the system asked for reduced motion
    #[arg(long)]
    reduced_motion: bool,

    /// Start with typo simulation on
    #[arg(short, long)]
    errors: bool,

    /// Start with sound off
    #[arg(short, long)]
    mute: bool,

    /// Stop after this many seconds of animation time
    #[arg(long, value_name = "SECS")]
    duration: Option<f64>,

    /// Write every tone played to a WAV file on exit
    #[arg(long, value_name = "FILE")]
    wav: Option<PathBuf>,

    /// Sample rate for --wav
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,
}

#[tokio::main]
async fn main() -> Result<(), TypewriterError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TypewriterConfig::from_json(&tokio::fs::read_to_string(path).await?)?,
        None => TypewriterConfig::default(),
    };
    config.errors |= cli.errors;
    if cli.mute {
        config.sound = false;
    }
    let seed = cli.seed.or(config.seed).unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let audio = if cli.wav.is_some() {
        OfflineAudio::new()
    } else {
        OfflineAudio::discarding()
    };
    let log = audio.log();
    let surface = TerminalSurface::new(std::io::stdout());
    let mut tw = Typewriter::new(&config, surface, audio, Box::new(Lcg::new(seed)), cli.reduced_motion)?;

    run(&mut tw, cli.duration.map(|secs| secs * 1000.0)).await?;
    println!();

    if let Some(path) = &cli.wav {
        let samples = render_timeline(&log.borrow().played, cli.sample_rate, 250.0);
        tokio::fs::write(path, encode_wav(&samples, cli.sample_rate)).await?;
        tracing::info!(path = %path.display(), tones = log.borrow().played.len(), "wrote WAV");
    }
    Ok(())
}
