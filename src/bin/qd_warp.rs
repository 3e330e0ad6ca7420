use clap::Parser;
use qd_graticules::model::ModelKind;
use qd_graticules::utils::constants::WARP_EPOCH;
use qd_graticules::utils::epoch::parse_epoch;
use qd_graticules::warp::WarpConfig;
use std::path::PathBuf;

pub type BinResult<T, E = Box<dyn std::error::Error + Send + Sync>> = Result<T, E>;

fn main() {
    if let Err(e) = bin_main() {
        eprintln!("error: {e}");
        if let Some(e) = e.source() {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input vector file, in WGS84 longitude/latitude
    #[arg()]
    input: PathBuf,

    /// Output vector file path
    #[arg()]
    output: PathBuf,

    /// Model epoch, as a decimal year or an ISO date
    #[arg(long, value_parser = parse_epoch, default_value_t = WARP_EPOCH)]
    epoch: f64,

    /// Magnetic coordinate model
    #[arg(long, value_enum, default_value_t = ModelKind::Dipole)]
    model: ModelKind,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn bin_main() -> BinResult<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = WarpConfig {
        decimal_year: args.epoch,
        ..Default::default()
    };
    let model = args.model.build();
    qd_graticules::warp_file(model.as_ref(), &args.input, &args.output, &config)?;
    Ok(())
}
