mod args;
mod console;

use clap::Parser;
use log::{error, info};
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if args.verbose { "debug" } else { "info" },
    ));
    builder.init();
    info!("args: {:?}", args);

    if let Err(e) = console::run_console(&args) {
        error!("{}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            error!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
