//! Planar projections used to bin geographic points.
//!
//! The hotspot pipeline only ever talks to the [`Projection`] / [`InverseProjection`]
//! traits; [`LambertConformalConic`] is the one regional projection bundled with the
//! crate, configured for the contiguous United States by
//! [`LambertConformalConic::continental_us`].

use crate::hotspots::error::HotspotError;
use crate::hotspots::grid_spec::Point;
use crate::types::lat_lon::LatLon;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Maps planar coordinates back to latitude/longitude.
///
/// Implemented for any `Fn(Point) -> LatLon`, so a closure can be passed wherever an
/// inverse projection is expected.
///
/// # Examples
///
/// ```
/// use accident_hotspots::{InverseProjection, LatLon, Point};
///
/// let swap = |p: Point| LatLon(p.y, p.x);
/// assert_eq!(swap.inverse(Point::new(-95.0, 30.0)), LatLon(30.0, -95.0));
/// ```
pub trait InverseProjection {
    fn inverse(&self, point: Point) -> LatLon;
}

impl<F> InverseProjection for F
where
    F: Fn(Point) -> LatLon,
{
    fn inverse(&self, point: Point) -> LatLon {
        self(point)
    }
}

/// A projection that can be applied in both directions.
pub trait Projection: InverseProjection {
    fn forward(&self, location: LatLon) -> Point;
}

// WGS84 semi-axes in metres.
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const SEMI_MINOR_AXIS: f64 = 6_356_752.3142;

const INVERSE_TOLERANCE: f64 = 1e-12;
const INVERSE_MAX_ITERATIONS: usize = 20;

/// Ellipsoidal Lambert conformal conic projection with one standard parallel at the
/// origin latitude.
///
/// Map coordinates are shifted so that the lower-left corner of a `width × height`
/// box centred on the origin is `(0, 0)`; the origin itself maps to
/// `(width / 2, height / 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformalConic {
    lat_0: f64,
    lon_0: f64,
    width: f64,
    height: f64,
    eccentricity: f64,
    // Cone constant.
    n: f64,
    // Semi-major axis times the scale constant F.
    a_f: f64,
    rho_0: f64,
}

impl LambertConformalConic {
    /// Creates a projection centred on `(lat_0, lon_0)` (degrees) covering a
    /// `width × height` box in metres.
    ///
    /// # Errors
    ///
    /// [`HotspotError::InvalidProjection`] if `lat_0` is not strictly between -90 and 90
    /// or is 0 (the cone degenerates), if `lon_0` is not finite, or if the map box is
    /// not positive.
    pub fn new(lat_0: f64, lon_0: f64, width: f64, height: f64) -> Result<Self, HotspotError> {
        if !(lat_0.abs() < 90.0) || lat_0 == 0.0 {
            return Err(HotspotError::InvalidProjection(format!(
                "origin latitude {} must be non-zero and within (-90, 90)",
                lat_0
            )));
        }
        if !lon_0.is_finite() {
            return Err(HotspotError::InvalidProjection(format!(
                "origin longitude {} is not finite",
                lon_0
            )));
        }
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(HotspotError::InvalidProjection(format!(
                "map box {} x {} must be positive",
                width, height
            )));
        }

        Ok(Self::with_parameters(lat_0, lon_0, width, height))
    }

    /// Regional map of the contiguous United States: origin 39.5°N 98.35°W,
    /// 5 500 km wide and 3 200 km tall.
    pub fn continental_us() -> Self {
        Self::with_parameters(39.5, -98.35, 5.5e6, 3.2e6)
    }

    // Parameters must already be validated.
    fn with_parameters(lat_0: f64, lon_0: f64, width: f64, height: f64) -> Self {
        let eccentricity = (1.0 - (SEMI_MINOR_AXIS / SEMI_MAJOR_AXIS).powi(2)).sqrt();
        let phi_0 = lat_0.to_radians();
        let n = phi_0.sin();
        let t_0 = conformal_t(phi_0, eccentricity);
        let a_f = SEMI_MAJOR_AXIS * scale_m(phi_0, eccentricity) / (n * t_0.powf(n));
        Self {
            lat_0,
            lon_0,
            width,
            height,
            eccentricity,
            n,
            a_f,
            rho_0: a_f * t_0.powf(n),
        }
    }

    pub fn origin(&self) -> LatLon {
        LatLon(self.lat_0, self.lon_0)
    }

    /// `(width, height)` of the map box in metres.
    pub fn extent(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn latitude_from_t(&self, t: f64) -> f64 {
        let e = self.eccentricity;
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..INVERSE_MAX_ITERATIONS {
            let es = e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).atan();
            let done = (next - phi).abs() < INVERSE_TOLERANCE;
            phi = next;
            if done {
                break;
            }
        }
        phi
    }
}

impl InverseProjection for LambertConformalConic {
    fn inverse(&self, point: Point) -> LatLon {
        let x = point.x - self.width / 2.0;
        let dy = self.rho_0 - (point.y - self.height / 2.0);
        let sign = self.n.signum();

        let rho = sign * x.hypot(dy);
        if rho == 0.0 {
            return LatLon(sign * 90.0, self.lon_0);
        }
        let theta = (sign * x).atan2(sign * dy);
        let t = (rho / self.a_f).powf(1.0 / self.n);

        let lat = self.latitude_from_t(t).to_degrees();
        let lon = normalize_longitude(self.lon_0 + (theta / self.n).to_degrees());
        LatLon(lat, lon)
    }
}

impl Projection for LambertConformalConic {
    fn forward(&self, location: LatLon) -> Point {
        let phi = location.lat().to_radians();
        let delta_lon = normalize_longitude(location.lon() - self.lon_0).to_radians();

        let rho = self.a_f * conformal_t(phi, self.eccentricity).powf(self.n);
        let theta = self.n * delta_lon;

        Point::new(
            rho * theta.sin() + self.width / 2.0,
            self.rho_0 - rho * theta.cos() + self.height / 2.0,
        )
    }
}

fn conformal_t(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

fn scale_m(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    phi.cos() / (1.0 - es * es).sqrt()
}

fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // Keep +180 instead of folding it onto -180.
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}
