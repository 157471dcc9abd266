use std::fmt::Display;

use chrono::NaiveDate;
use gtfs_structures::Gtfs;
use serde::{Deserialize, Serialize};

/// size and date-coverage counters of a parsed GTFS archive, collected for
/// diagnostics before conversion starts.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedSummary {
    pub trips: usize,
    pub routes: usize,
    pub stops: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FeedSummary {
    pub fn new(gtfs: &Gtfs) -> FeedSummary {
        let feed_info = gtfs.feed_info.first();
        FeedSummary {
            trips: gtfs.trips.len(),
            routes: gtfs.routes.len(),
            stops: gtfs.stops.len(),
            start_date: feed_info.and_then(|info| info.start_date),
            end_date: feed_info.and_then(|info| info.end_date),
        }
    }
}

impl Display for FeedSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_date = |date: &Option<NaiveDate>| match date {
            Some(d) => d.to_string(),
            None => String::from("(not listed)"),
        };
        write!(
            f,
            "feed start date: {}, feed end date: {}, parsed trips: {}, parsed routes: {}, parsed stops: {}",
            fmt_date(&self.start_date),
            fmt_date(&self.end_date),
            self.trips,
            self.routes,
            self.stops
        )
    }
}
