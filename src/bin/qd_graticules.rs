use clap::Parser;
use qd_graticules::contour::Bounds;
use qd_graticules::graticule::GraticuleConfig;
use qd_graticules::io::Driver;
use qd_graticules::model::ModelKind;
use qd_graticules::utils::constants::{
    DEFAULT_SIZE_X, DEFAULT_SIZE_Y, GRATICULE_EPOCH, VALUE_FIELD,
};
use qd_graticules::utils::epoch::parse_epoch;
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
    /// Output vector file path
    #[arg()]
    output: PathBuf,

    /// Degrees between neighbouring graticule lines
    #[arg()]
    stepsize: f64,

    /// Model grid width, in nodes
    #[arg(long, visible_alias = "size_x", default_value_t = DEFAULT_SIZE_X)]
    size_x: usize,

    /// Model grid height, in nodes
    #[arg(long, visible_alias = "size_y", default_value_t = DEFAULT_SIZE_Y)]
    size_y: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = Driver::GeoJson)]
    driver: Driver,

    /// Model epoch, as a decimal year or an ISO date
    #[arg(long, value_parser = parse_epoch, default_value_t = GRATICULE_EPOCH)]
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

    let config = GraticuleConfig {
        bounds: Bounds::global(),
        size_x: args.size_x,
        size_y: args.size_y,
        stepsize: args.stepsize,
        base: 0.0,
        elevation: 0.0,
        decimal_year: args.epoch,
        field_name: VALUE_FIELD.to_string(),
    };
    let model = args.model.build();
    qd_graticules::generate_graticules_file(model.as_ref(), &config, &args.output, args.driver)?;
    Ok(())
}
