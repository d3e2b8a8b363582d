use clap::{Parser, Subcommand};
use iolat::bench::{create_test_file, ProbeConfig, RandomReadProbe};
use iolat::chart::render_reference;
use iolat::config::persistence::ProbeHistory;
use iolat::config::IolatConfig;
use iolat::models::ProbeRecord;
use iolat::util::units::{calculate_throughput_mbps, format_bytes, format_duration, parse_bytes};
use iolat::{error, Result};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "iolat", version, about = "Filesystem random-read latency chart and probe")]
struct Cli {
    /// Renders the latency chart when omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the filesystem latency chart
    Plot {
        /// Output image; .png or .svg
        #[arg(long)]
        output: Option<PathBuf>,
        /// Image width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Image height in pixels
        #[arg(long)]
        height: Option<u32>,
    },
    /// Create a zero-filled test file of BLOCKS 4 KiB blocks
    Create { file: PathBuf, blocks: u64 },
    /// Measure median latency of random reads from FILE
    Probe {
        file: PathBuf,
        /// Bytes per read, e.g. 4096 or 64KiB
        #[arg(value_parser = parse_size)]
        io_size: u64,
        samples: u64,
        /// Seed for reproducible offsets
        #[arg(long)]
        seed: Option<u64>,
        /// Bypass the page cache where supported
        #[arg(long)]
        direct: bool,
        /// Print the full record as JSON
        #[arg(long)]
        json: bool,
        /// Append the result to the probe history
        #[arg(long)]
        record: bool,
    },
    /// Show recent probe history
    History {
        #[arg(long, default_value_t = 10)]
        last: usize,
        /// Remove all stored records
        #[arg(long)]
        clear: bool,
    },
}

fn parse_size(s: &str) -> std::result::Result<u64, String> {
    parse_bytes(s)
}

fn run(cli: Cli) -> Result<()> {
    let config = match IolatConfig::config_file_path() {
        Ok(path) => IolatConfig::load_or_default(&path),
        Err(e) => {
            log::warn!("{}, using default settings", e);
            IolatConfig::default()
        }
    };

    let default_plot = Command::Plot {
        output: None,
        width: None,
        height: None,
    };
    match cli.command.unwrap_or(default_plot) {
        Command::Plot {
            output,
            width,
            height,
        } => {
            let mut chart = config.chart.apply_env();
            if let Some(output) = output {
                chart = chart.with_output(output);
            }
            if width.is_some() || height.is_some() {
                let (w, h) = (width.unwrap_or(chart.width), height.unwrap_or(chart.height));
                chart = chart.with_size(w, h);
            }
            render_reference(&chart)?;
        }
        Command::Create { file, blocks } => {
            let report = create_test_file(&file, blocks)?;
            log::info!(
                "wrote {} in {} ({:.1} MiB/s)",
                format_bytes(report.bytes_written),
                format_duration(report.elapsed),
                calculate_throughput_mbps(report.bytes_written, report.elapsed)
            );
        }
        Command::Probe {
            file,
            io_size,
            samples,
            seed,
            direct,
            json,
            record,
        } => {
            let mut probe_config = ProbeConfig::new(file, io_size, samples)
                .with_block_size(config.probe.block_size)
                .with_direct(direct || config.probe.direct);
            if let Some(seed) = seed {
                probe_config = probe_config.with_seed(seed);
            }

            let report = RandomReadProbe::new(probe_config)?.run()?;
            let entry = ProbeRecord::new(report);
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("{:.2}", entry.report.latency.median_us);
            }

            if record || config.probe.record {
                let history = ProbeHistory::new()?;
                history.append(entry)?;
                log::info!("recorded probe in {}", history.path().display());
            }
        }
        Command::History { last, clear } => {
            let history = ProbeHistory::new()?;
            if clear {
                history.clear()?;
                log::info!("cleared {}", history.path().display());
            } else {
                println!(
                    "{} probes recorded in {}",
                    history.count()?,
                    history.path().display()
                );
                for entry in history.recent(last)? {
                    println!("{}", entry.summary());
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", error::user_friendly_message(&e));
            log::debug!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}
