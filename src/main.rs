use clap::Parser;
use log::{debug, error};

mod args;
mod assign;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = assign::run_assignment(&args) {
        error!("{}", e);
        eprintln!("The team allocation failed: {}", e);
        std::process::exit(1);
    }
}
