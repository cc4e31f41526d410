use climbate_protocol::Coordinate;

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance between two points.
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Drive time at a constant average speed, rounded to the nearest minute.
pub fn estimate_minutes(distance_miles: f64, speed_mph: f64) -> u32 {
    if speed_mph <= 0.0 || !distance_miles.is_finite() {
        return u32::MAX;
    }
    (distance_miles / speed_mph * 60.0).round().clamp(0.0, u32::MAX as f64) as u32
}
