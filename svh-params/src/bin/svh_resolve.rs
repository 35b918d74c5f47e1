//! Resolve a parameter file for one firmware version and print the result.
//!
//! Usage:
//!   cargo run -p svh-params --bin svh-resolve -- \
//!     --params svh-params/config/svh_parameters.yaml \
//!     --version 1.2

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use svh_params::{
    DEFAULT_SECTION, FirmwareVersion, ParameterResolver, ParameterTable, yaml::load_parameter_file,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Parser)]
struct Args {
    /// Parameter file holding the version-keyed parameter sets
    #[arg(short, long)]
    params: PathBuf,

    /// Firmware version to resolve, as <major>.<minor>
    #[arg(short, long)]
    version: FirmwareVersion,

    /// Section of the file holding the parameter sets
    #[arg(short, long, default_value = DEFAULT_SECTION)]
    section: String,

    #[arg(long)]
    debug: bool,
}

fn init_logger(debug: bool) {
    let filter = if debug {
        EnvFilter::new("svh_params=debug,svh_resolve=debug")
    } else {
        EnvFilter::new("svh_params=info,svh_resolve=info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.debug);

    let doc = match load_parameter_file(&args.params) {
        Ok(doc) => doc,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let table = match ParameterTable::from_document(&doc, &args.section) {
        Ok(table) => table,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} parameter set(s) from {:?}", table.len(), args.params);

    let resolution = ParameterResolver::new(&table).resolve(args.version);
    let issues = table.issues().len() + resolution.issues.len();
    if issues > 0 {
        warn!(
            "{issues} problem(s) in {:?}, affected entries keep the hardware defaults",
            args.params
        );
    }

    match serde_yaml::to_string(&resolution.set) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize resolved parameters: {e}");
            ExitCode::FAILURE
        }
    }
}
