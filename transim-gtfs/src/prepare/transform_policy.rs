use clap::ValueEnum;
use geo::Point;
use gtfs_structures::Gtfs;
use serde::{Deserialize, Serialize};
use transim_core::model::{CoordinateTransform, EquirectangularTransform, IdentityTransform};

/// selects the projection applied to stop coordinates during conversion.
#[derive(Serialize, Deserialize, Debug, ValueEnum, Clone)]
pub enum CoordinateTransformPolicy {
    /// keep WGS84 lon,lat values as-is
    Identity,
    /// project into planar meters about the mean stop location of the feed
    Equirectangular,
}

impl CoordinateTransformPolicy {
    pub fn build(&self, gtfs: &Gtfs) -> Box<dyn CoordinateTransform> {
        match self {
            CoordinateTransformPolicy::Identity => Box::new(IdentityTransform),
            CoordinateTransformPolicy::Equirectangular => {
                let origin = mean_stop_location(gtfs);
                Box::new(EquirectangularTransform::new(origin))
            }
        }
    }
}

/// the mean location over all stops carrying one, or the null island origin
/// for feeds without located stops.
fn mean_stop_location(gtfs: &Gtfs) -> Point<f64> {
    let located = gtfs
        .stops
        .values()
        .filter_map(|stop| match (stop.longitude, stop.latitude) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        })
        .collect::<Vec<_>>();
    if located.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = located.len() as f64;
    let (sum_lon, sum_lat) = located
        .iter()
        .fold((0.0, 0.0), |(lon, lat), (x, y)| (lon + x, lat + y));
    Point::new(sum_lon / n, sum_lat / n)
}
