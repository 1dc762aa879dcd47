use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Result};
use arch_sampler_core::{sampler_route, ArchKind, ArchRequest, SampledArchitecture, SearchSpace};
use clap::{command, CommandFactory, Parser, ValueEnum};
use tokio::{
    fs::File,
    io::{AsyncReadExt, BufReader},
};

use crate::config::{Config, SampleOption};

mod config;

const DEFAULT_CONFIG: &str = "assets/configs/Sampler.toml";

pub async fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents).await?;
    Ok(toml::from_str(&contents)?)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Distill,
    Mlm,
}

impl From<Mode> for ArchKind {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Distill => ArchKind::Distill,
            Mode::Mlm => ArchKind::Mlm,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long, short, value_enum)]
    mode: Option<Mode>,
    #[arg(long, short = 'n')]
    count: Option<usize>,
    #[arg(long, short)]
    seed: Option<u64>,
}

impl Args {
    /// Command line flags take precedence over the config file.
    fn apply(&self, option: SampleOption) -> SampleOption {
        SampleOption {
            mode: self.mode.map(Into::into).unwrap_or(option.mode),
            count: self.count.unwrap_or(option.count),
            seed: self.seed.or(option.seed),
        }
    }
}

/// Draw `option.count` architectures through a dedicated sampler task.
pub async fn sample_space(
    space: SearchSpace,
    option: SampleOption,
) -> Result<Vec<SampledArchitecture>> {
    let (sender, receiver) = flume::unbounded::<ArchRequest>();
    let route = tokio::spawn(sampler_route(receiver));

    if let Some(seed) = option.seed {
        sender.send(ArchRequest::Reseed(seed))?;
    }

    let space = Arc::new(space);
    let mut samples = Vec::with_capacity(option.count);
    for index in 0..option.count {
        let (result_sender, result_receiver) = flume::bounded(1);
        sender.send(ArchRequest::Sample {
            kind: option.mode,
            space: space.clone(),
            seed: None,
            sender: result_sender,
        })?;
        match result_receiver.recv_async().await? {
            Ok(arch) => samples.push(arch),
            Err(err) => bail!("sample {index} failed: {err}"),
        }
    }

    drop(sender);
    route.await?;
    Ok(samples)
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            log::info!("reading config {}...", path.to_string_lossy());
            load_config(path).await?
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            log::info!("reading config {DEFAULT_CONFIG}...");
            load_config(DEFAULT_CONFIG).await?
        }
        None => {
            log::info!("no config found, using the default search space");
            Config::default()
        }
    };

    let option = args.apply(config.sample);
    log::info!("{:?}", option);

    let samples = sample_space(config.space, option).await?;

    let mut stdout = std::io::stdout().lock();
    for arch in samples {
        writeln!(stdout, "{}", serde_json::to_string(&arch)?)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .with_module_level("arch_sampler", log::LevelFilter::Info)
        .with_module_level("arch_sampler_core", log::LevelFilter::Info)
        .init()
        .expect("start logger");

    let args = Args::parse();

    let cmd = Args::command();
    let version = cmd.get_version().unwrap_or("0.0.1");
    let bin_name = cmd.get_bin_name().unwrap_or("arch_sampler");

    log::info!("{}\tversion: {}", bin_name, version);

    if let Err(err) = run(args).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &[&str]) -> Args {
        Args::parse_from(std::iter::once("arch-sampler").chain(line.iter().copied()))
    }

    #[test]
    fn flags_override_config() {
        let option = SampleOption {
            mode: ArchKind::Distill,
            count: 3,
            seed: Some(1),
        };

        let merged = args(&["--mode", "mlm", "-n", "8"]).apply(option.clone());
        assert_eq!(
            merged,
            SampleOption {
                mode: ArchKind::Mlm,
                count: 8,
                seed: Some(1),
            }
        );

        assert_eq!(args(&[]).apply(option.clone()), option);
        assert_eq!(args(&["--seed", "9"]).apply(option).seed, Some(9));
    }

    #[tokio::test]
    async fn seeded_runs_repeat() {
        let option = SampleOption {
            mode: ArchKind::Distill,
            count: 6,
            seed: Some(2021),
        };
        let first = sample_space(SearchSpace::default(), option.clone())
            .await
            .unwrap();
        let second = sample_space(SearchSpace::default(), option).await.unwrap();

        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalid_space_fails_once() {
        let space = SearchSpace {
            hidden_sizes: vec![],
            ..Default::default()
        };
        let option = SampleOption {
            count: 4,
            ..Default::default()
        };
        let err = sample_space(space, option).await.unwrap_err();
        assert!(err.to_string().contains("hidden_sizes"));
    }

    #[tokio::test]
    async fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[space]\nhead_numbers = [2, 4]\n\n[sample]\nmode = \"mlm\"").unwrap();

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.space.head_numbers, vec![2, 4]);
        assert_eq!(config.sample.mode, ArchKind::Mlm);

        assert!(load_config(file.path().with_extension("missing")).await.is_err());
    }
}
