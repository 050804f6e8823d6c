//! gwmon: groundwater level monitor
//!
//! Loads the recorded series, replays it with the selected dashboard variant
//! and draws the forecast. Running `gwmon` (or `gwmon run`) is the start
//! action; there is no pause or stop besides interrupting the process.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use gwmon_service::alert::AlertPolicy;
use gwmon_service::config::{self, ConfigOverrides, DEFAULT_CONFIG_FILE};
use gwmon_service::export::{write_report, RunReport};
use gwmon_service::ingest::SeriesLoader;
use gwmon_service::logging::{self, Component, LogLevel};
use gwmon_service::render::{Legend, Renderer, TerminalRenderer};
use gwmon_service::simulation::run_simulation;
use gwmon_service::variants::VARIANT_REGISTRY;

#[derive(Parser, Debug)]
#[command(name = "gwmon")]
#[command(about = "Groundwater level monitor: threshold replay and scenario forecast")]
struct Cli {
    /// Config file (defaults to ./gwmon.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV file with Time and Height columns
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Dashboard variant preset
    #[arg(long, global = true)]
    variant: Option<String>,

    /// Seconds between replay steps, within [0.001, 0.5]
    #[arg(long, global = true)]
    delay: Option<f64>,

    /// Alert behavior after the shutdown point: reevaluate | latched
    #[arg(long, global = true)]
    policy: Option<AlertPolicy>,

    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[arg(long, global = true)]
    log_file: Option<String>,

    /// No colors and no screen clearing
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay the series and draw the forecast (default)
    Run {
        /// Write a JSON run report to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List the available variant presets
    Variants,
    /// Print the legend of the selected variant
    Legend,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            variant: self.variant.clone(),
            delay_secs: self.delay,
            alert_policy: self.policy,
            data_file: self.data.clone(),
            log_level: self.log_level,
            log_file: self.log_file.clone(),
            ..ConfigOverrides::default()
        }
    }
}

fn main() {
    // Errors before the config is resolved still need to be visible.
    logging::init_logger(LogLevel::Warning, None, false);

    if let Err(e) = run() {
        logging::error(Component::System, None, &e.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Command::Variants) = cli.command {
        for variant in VARIANT_REGISTRY {
            println!("{:<8} {:?}  {}", variant.name, variant.alert_policy, variant.description);
        }
        return Ok(());
    }

    let file = match cli.config {
        Some(ref path) => config::load_file_config(path, true)?,
        None => config::load_file_config(Path::new(DEFAULT_CONFIG_FILE), false)?,
    };
    let env = config::overrides_from_env()?;
    let config = config::resolve(&file, &env, &cli.overrides())?;
    logging::init_logger(config.log_level, config.log_file.as_deref(), false);
    logging::debug(Component::Config, Some(&config.variant), &format!("{:?}", config));

    let stdout = std::io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock(), &config);
    if cli.plain {
        renderer = renderer.plain();
    }

    let export = match cli.command {
        Some(Command::Legend) => {
            renderer.show_legend(&Legend::from_config(&config))?;
            return Ok(());
        }
        Some(Command::Run { export }) => export,
        Some(Command::Variants) | None => None,
    };

    // Missing data is fatal here, before anything is drawn.
    let loader = SeriesLoader::new(&config.data_file);
    let series = loader.load()?;

    let summary = run_simulation(&series, &config, &mut renderer)?;

    if let Some(path) = export {
        write_report(&path, &RunReport::new(loader.path(), series.len(), &summary))?;
    }
    Ok(())
}
