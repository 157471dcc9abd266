use geo::Point;

/// mean earth radius in meters, as used for spherical approximations.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// projects WGS84 lon,lat coordinates into the planar coordinate system of
/// the simulation. implementations must be pure: the same input always maps
/// to the same output within one preparation run.
pub trait CoordinateTransform {
    fn transform(&self, coord: Point<f64>) -> Point<f64>;
}

/// passes coordinates through unchanged. useful for feeds that are already
/// projected, and for tests.
pub struct IdentityTransform;

impl CoordinateTransform for IdentityTransform {
    fn transform(&self, coord: Point<f64>) -> Point<f64> {
        coord
    }
}

/// an equirectangular projection about a reference origin, mapping degrees
/// of lon,lat into planar meters. accurate enough at the extent of a single
/// transit feed, which is all this scenario builder requires.
pub struct EquirectangularTransform {
    origin: Point<f64>,
    cos_origin_lat: f64,
}

impl EquirectangularTransform {
    pub fn new(origin: Point<f64>) -> EquirectangularTransform {
        EquirectangularTransform {
            origin,
            cos_origin_lat: origin.y().to_radians().cos(),
        }
    }
}

impl CoordinateTransform for EquirectangularTransform {
    fn transform(&self, coord: Point<f64>) -> Point<f64> {
        let meters_per_degree = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        let x = (coord.x() - self.origin.x()) * meters_per_degree * self.cos_origin_lat;
        let y = (coord.y() - self.origin.y()) * meters_per_degree;
        Point::new(x, y)
    }
}
