use chrono::{Datelike, NaiveDate};
use gtfs_structures::{Calendar, Exception, Gtfs};

use crate::prepare::PrepareError;

/// tests whether a service runs on the given date: the regular weekday
/// pattern of calendar.txt, as amended by calendar_dates.txt exceptions.
/// an Added exception includes the date even outside the regular pattern,
/// a Deleted exception excludes it even inside.
pub fn service_runs_on(
    gtfs: &Gtfs,
    service_id: &str,
    date: &NaiveDate,
) -> Result<bool, PrepareError> {
    let calendar = gtfs.calendar.get(service_id);
    let calendar_dates = gtfs.calendar_dates.get(service_id);

    if calendar.is_none() && calendar_dates.is_none() {
        let msg = format!(
            "service_id '{service_id}' has no entry in either calendar.txt or calendar_dates.txt"
        );
        return Err(PrepareError::MalformedFeed(msg));
    }

    let exception =
        calendar_dates.and_then(|dates| dates.iter().find(|cd| cd.date == *date));

    match exception {
        Some(cd) if cd.exception_type == Exception::Added => Ok(true),
        Some(cd) if cd.exception_type == Exception::Deleted => Ok(false),
        _ => Ok(calendar.is_some_and(|c| runs_in_calendar(c, date))),
    }
}

/// true if the date falls within the calendar's date range on a weekday the
/// service operates.
fn runs_in_calendar(calendar: &Calendar, date: &NaiveDate) -> bool {
    if *date < calendar.start_date || calendar.end_date < *date {
        return false;
    }
    match date.weekday() {
        chrono::Weekday::Mon => calendar.monday,
        chrono::Weekday::Tue => calendar.tuesday,
        chrono::Weekday::Wed => calendar.wednesday,
        chrono::Weekday::Thu => calendar.thursday,
        chrono::Weekday::Fri => calendar.friday,
        chrono::Weekday::Sat => calendar.saturday,
        chrono::Weekday::Sun => calendar.sunday,
    }
}
