mod feed_summary;

pub use feed_summary::FeedSummary;

use gtfs_structures::Gtfs;

use crate::prepare::PrepareError;

/// reads a GTFS archive from a zip file or an extracted directory and logs
/// its size and date coverage. a missing or malformed archive fails fast
/// with the underlying read error; nothing is retried.
pub fn load_feed(path: &str) -> Result<Gtfs, PrepareError> {
    log::info!("GTFS archive: {path}");
    let gtfs = Gtfs::new(path)?;
    let summary = FeedSummary::new(&gtfs);
    log::info!("{summary}");
    Ok(gtfs)
}
