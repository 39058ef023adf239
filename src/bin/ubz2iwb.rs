//! Command line front end: `ubz2iwb <from> <to> [--config options.json] [--report]`.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use ubz_iwb_tools::{ConverterOptions, IwbAdaptor};

/// Converts a UBZ whiteboard document into an IWB package.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// UBZ package: an archive or an extracted directory.
    from: PathBuf,
    /// Destination: an archive when it has an extension, a directory otherwise.
    to: PathBuf,
    /// JSON file with converter options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the conversion report as JSON.
    #[arg(long)]
    report: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let options = match &args.config {
        Some(path) => ConverterOptions::from_json_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ConverterOptions::default(),
    };

    let adaptor = IwbAdaptor::new(options);
    let report = match adaptor.try_convert(&args.from, &args.to) {
        Ok(report) => report,
        Err(e) => bail!("Conversion of {} failed: {}", args.from.display(), e),
    };

    log::info!(
        "Converted {} into {}",
        args.from.display(),
        args.to.display()
    );
    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
