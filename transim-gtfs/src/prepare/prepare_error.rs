#[derive(thiserror::Error, Debug)]
pub enum PrepareError {
    #[error("failed to read GTFS archive: {0}")]
    FeedRead(#[from] gtfs_structures::Error),
    #[error("GTFS archive is malformed: {0}")]
    MalformedFeed(String),
    #[error("failure running scenario preparation: {0}")]
    PrepApp(String),
    #[error("internal error: {0}")]
    Internal(String),
}
