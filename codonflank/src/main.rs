use clap::Parser;
use codonflank::{Args, codonflank};
use log::{error, info};
use simple_logger::init_with_level;

use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    init_with_level(args.level).unwrap_or_else(|e| panic!("{}", e));
    info!("Starting codonflank with args: {}", args);

    match codonflank(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
