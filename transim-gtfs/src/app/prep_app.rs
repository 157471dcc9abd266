use super::PrepOperation;
use clap::Parser;

/// command line tool for preparing transit scenarios from GTFS archives
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct PrepApp {
    #[command(subcommand)]
    pub op: PrepOperation,
}
