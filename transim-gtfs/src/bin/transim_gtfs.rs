//! converts a GTFS archive into a cleaned transit scenario for the transim
//! simulation: transit schedule, pseudo network and vehicle fleet.
use clap::Parser;
use transim_gtfs::app::PrepApp;

fn main() {
    env_logger::init();
    let args = PrepApp::parse();
    if let Err(e) = args.op.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
