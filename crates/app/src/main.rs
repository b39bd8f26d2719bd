use std::{f32::consts::TAU, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use projectm_actor_core::{
    ActorConfig, ActorError, ConfigFile, ConfigLocator, ConfigSource, Engine, Event,
    HeadlessBackend, Key, MemoryVideo, ProjectmActor, SliceSource, PCM_FRAMES,
};
use tracing_subscriber::EnvFilter;

fn main() -> projectm_actor_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let locator = cli.locator();

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommand::Path => show_path(&locator),
            ConfigCommand::Show { json } => show_config(&locator, json),
            ConfigCommand::Init { force } => init_config(&locator, force),
        },
        Commands::Simulate(args) => run_simulation(&locator, &args),
    }
}

fn show_path(locator: &ConfigLocator) -> projectm_actor_core::Result<()> {
    match locator.find() {
        ConfigSource::Unavailable => {
            println!("no config file found, built-in defaults apply");
            if let Some(path) = locator.xdg_path() {
                println!("`config init` would create {}", path.display());
            }
        }
        source => {
            if let Some(path) = source.path() {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn show_config(locator: &ConfigLocator, json: bool) -> projectm_actor_core::Result<()> {
    let config = read_config(locator)?;

    if json {
        let text = serde_json::to_string_pretty(&config)
            .map_err(|err| ActorError::msg(format!("cannot serialise config: {err}")))?;
        println!("{text}");
    } else {
        println!("{config:#?}");
    }
    Ok(())
}

fn init_config(locator: &ConfigLocator, force: bool) -> projectm_actor_core::Result<()> {
    let path = locator.write_default(force)?;
    tracing::info!(path = %path.display(), "wrote default config file");
    Ok(())
}

/// Reads the effective settings without creating a file.
fn read_config(locator: &ConfigLocator) -> projectm_actor_core::Result<ActorConfig> {
    match locator.find().path() {
        Some(path) => Ok(ActorConfig::from_file(&ConfigFile::load(path)?)),
        None => Ok(ActorConfig::default()),
    }
}

fn run_simulation(locator: &ConfigLocator, args: &SimulateArgs) -> projectm_actor_core::Result<()> {
    let config = if args.defaults {
        ActorConfig::default()
    } else {
        read_config(locator)?
    };
    let schedule = key_schedule(&args.keys, args.frames)?;
    tracing::info!(frames = args.frames, keys = schedule.len(), "starting simulation");

    let mut actor = ProjectmActor::new(HeadlessBackend::new(), config);
    actor.init()?;

    let (width, height) = actor.requisition(args.width, args.height);
    let mut video = MemoryVideo::new(width, height);
    actor.dimension(&mut video, width, height)?;

    let mut tone = Tone::new(args.frequency, args.sample_rate);
    for frame in 0..args.frames {
        let events = schedule
            .iter()
            .filter(|(at, _)| *at == frame)
            .map(|(_, key)| Event::KeyDown(*key));
        actor.events(&mut video, events)?;

        let (left, right) = tone.next_block();
        actor.render(&mut video, &mut SliceSource::new(&left, &right))?;
    }

    if let (Some(engine), Some(playlist)) = (actor.engine(), actor.playlist()) {
        tracing::info!(
            frames_rendered = engine.frames_rendered(),
            pcm_frames = engine.pcm_frames(),
            window = ?engine.window_size(),
            locked = engine.preset_locked(),
            beat_sensitivity = engine.beat_sensitivity(),
            presets = playlist.items().len(),
            current = ?playlist.current(),
            "simulation finished"
        );
    }

    if args.trace_calls {
        for call in actor.backend().journal().calls() {
            println!("{call:?}");
        }
    }

    actor.cleanup()
}

/// Spreads the key presses evenly over the simulated frames.
fn key_schedule(names: &[String], frames: u64) -> projectm_actor_core::Result<Vec<(u64, Key)>> {
    let spacing = frames / (names.len() as u64 + 1);
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let key = Key::from_name(name)
                .ok_or_else(|| ActorError::msg(format!("unknown key `{name}`")))?;
            Ok(((index as u64 + 1) * spacing, key))
        })
        .collect()
}

/// Stereo sine generator; the right channel runs a quarter period behind.
struct Tone {
    phase: f32,
    step: f32,
}

impl Tone {
    fn new(frequency: f32, sample_rate: u32) -> Self {
        Self {
            phase: 0.0,
            step: TAU * frequency / sample_rate.max(1) as f32,
        }
    }

    fn next_block(&mut self) -> (Vec<f32>, Vec<f32>) {
        let mut left = Vec::with_capacity(PCM_FRAMES);
        let mut right = Vec::with_capacity(PCM_FRAMES);
        for _ in 0..PCM_FRAMES {
            left.push(self.phase.sin());
            right.push((self.phase - TAU / 4.0).sin());
            self.phase = (self.phase + self.step) % TAU;
        }
        (left, right)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Companion tool for the projectM libvisual actor", long_about = None)]
struct Cli {
    /// Home directory to resolve the config file from (defaults to $HOME).
    #[arg(long, global = true)]
    home: Option<PathBuf>,
    /// XDG config directory (defaults to $XDG_CONFIG_HOME, then ~/.config).
    #[arg(long, global = true)]
    xdg_config_home: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn locator(&self) -> ConfigLocator {
        let env = |name: &str| std::env::var_os(name).map(PathBuf::from);
        ConfigLocator::new(
            self.home.clone().or_else(|| env("HOME")),
            self.xdg_config_home
                .clone()
                .or_else(|| env("XDG_CONFIG_HOME")),
        )
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect or create the actor's config file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Drive the actor against an in-memory engine with a synthetic tone.
    Simulate(SimulateArgs),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print which config file the plug-in would read.
    Path,
    /// Print the effective settings.
    Show {
        /// Emit JSON instead of the debug representation.
        #[arg(long)]
        json: bool,
    },
    /// Write the commented default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of frames to render.
    #[arg(long, default_value_t = 120)]
    frames: u64,
    #[arg(long, default_value_t = 512)]
    width: i32,
    #[arg(long, default_value_t = 512)]
    height: i32,
    /// Comma separated key presses, e.g. `n,p,space,up`.
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,
    /// Frequency of the generated tone in Hz.
    #[arg(long, default_value_t = 440.0)]
    frequency: f32,
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,
    /// Ignore the config file and use built-in defaults.
    #[arg(long)]
    defaults: bool,
    /// Print every engine and playlist call afterwards.
    #[arg(long)]
    trace_calls: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedules_keys_evenly() {
        let keys = vec!["n".to_string(), "space".to_string()];
        let schedule = key_schedule(&keys, 90).unwrap();

        assert_eq!(schedule, vec![(30, Key::N), (60, Key::Space)]);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = key_schedule(&["q".to_string()], 10).unwrap_err();
        assert!(err.to_string().contains("`q`"));
    }

    #[test]
    fn tone_fills_a_full_block() {
        let mut tone = Tone::new(440.0, 44_100);
        let (left, right) = tone.next_block();

        assert_eq!(left.len(), PCM_FRAMES);
        assert_eq!(right.len(), PCM_FRAMES);
        assert!(left.iter().chain(&right).all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn cli_parses_simulation_keys() {
        let cli = Cli::parse_from(["projectm-actor", "simulate", "--keys", "n,p", "--frames", "4"]);
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.keys, vec!["n", "p"]);
                assert_eq!(args.frames, 4);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
