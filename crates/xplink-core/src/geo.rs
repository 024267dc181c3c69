//! Geodetic and body-frame geometry
//!
//! Positions are carried in two representations:
//! - [`Location`]: absolute geodetic position as reported by the simulator,
//!   latitude/longitude in 1e-7 degree units and altitude in centimeters.
//! - [`Vector3`]: Cartesian offsets and body/earth-frame vectors in meters
//!   (NED axis convention: x north, y east, z down).

use std::ops::{Add, Mul, Neg, Sub};

use crate::units::DEG_TO_RAD;

/// Mean Earth radius in meters, spherical approximation
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per 1e-7 degree of latitude
const LATLON_TO_M: f64 = EARTH_RADIUS_M * (DEG_TO_RAD as f64) * 1.0e-7;

/// 3-component vector, single precision
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3 { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    #[inline]
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    #[inline]
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    #[inline]
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, rhs: f32) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// 3x3 rotation matrix, row major
///
/// Used as the body-to-earth direction cosine matrix composed from the
/// simulator's reported euler attitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3 {
    pub a: Vector3,
    pub b: Vector3,
    pub c: Vector3,
}

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3 {
        a: Vector3 {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        },
        b: Vector3 {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        },
        c: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        },
    };

    /// Compose a rotation from euler angles in radians (roll about x,
    /// pitch about y, yaw about z, applied in yaw-pitch-roll order)
    pub fn from_euler(roll: f32, pitch: f32, yaw: f32) -> Self {
        let (sr, cr) = roll.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let (sy, cy) = yaw.sin_cos();

        Matrix3 {
            a: Vector3::new(cp * cy, sr * sp * cy - cr * sy, cr * sp * cy + sr * sy),
            b: Vector3::new(cp * sy, sr * sp * sy + cr * cy, cr * sp * sy - sr * cy),
            c: Vector3::new(-sp, sr * cp, cr * cp),
        }
    }

    #[inline]
    fn dot(row: Vector3, v: Vector3) -> f32 {
        row.x * v.x + row.y * v.y + row.z * v.z
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::IDENTITY
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, v: Vector3) -> Vector3 {
        Vector3::new(
            Matrix3::dot(self.a, v),
            Matrix3::dot(self.b, v),
            Matrix3::dot(self.c, v),
        )
    }
}

/// Absolute geodetic position
///
/// Latitude and longitude in 1e-7 degree units, altitude in centimeters
/// above mean sea level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub lat: i32,
    pub lng: i32,
    pub alt: i32,
}

impl Location {
    #[inline]
    pub fn lat_degrees(self) -> f64 {
        self.lat as f64 * 1.0e-7
    }

    #[inline]
    pub fn lng_degrees(self) -> f64 {
        self.lng as f64 * 1.0e-7
    }

    #[inline]
    pub fn alt_meters(self) -> f32 {
        self.alt as f32 * 0.01
    }

    /// Horizontal ground distance to another location in meters.
    ///
    /// Flat-earth approximation with longitude scaled by cos(latitude);
    /// adequate for the few-meter divergences the bridge cares about.
    pub fn distance_m(self, other: Location) -> f32 {
        let dlat = (other.lat - self.lat) as f64;
        let dlng = (other.lng - self.lng) as f64;
        let scale = (self.lat_degrees() * DEG_TO_RAD as f64).cos();
        let north = dlat * LATLON_TO_M;
        let east = dlng * LATLON_TO_M * scale;
        ((north * north + east * east).sqrt()) as f32
    }

    /// Vertical separation to another location in meters
    pub fn alt_difference_m(self, other: Location) -> f32 {
        ((other.alt - self.alt).abs() as f32) * 0.01
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_ops() {
        let v = Vector3::new(1.0, 2.0, 3.0) + Vector3::new(0.5, -2.0, 1.0);
        assert_eq!(v, Vector3::new(1.5, 0.0, 4.0));
        assert_eq!(-v, Vector3::new(-1.5, 0.0, -4.0));
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(Matrix3::IDENTITY * v, v);

        let rotated = Matrix3::from_euler(0.0, 0.0, 0.0) * v;
        assert!((rotated.x - v.x).abs() < 1e-6);
        assert!((rotated.y - v.y).abs() < 1e-6);
        assert!((rotated.z - v.z).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_rotation() {
        // 90 degrees of yaw turns body-x (forward) into earth-y (east)
        let dcm = Matrix3::from_euler(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let fwd = dcm * Vector3::new(1.0, 0.0, 0.0);
        assert!((fwd.x - 0.0).abs() < 1e-6);
        assert!((fwd.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_latitude_distance() {
        // one degree of latitude is roughly 111 km
        let a = Location::default();
        let b = Location {
            lat: 10_000_000,
            lng: 0,
            alt: 0,
        };
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_alt_difference() {
        let a = Location {
            lat: 0,
            lng: 0,
            alt: 1000,
        };
        let b = Location {
            lat: 0,
            lng: 0,
            alt: 1350,
        };
        assert!((a.alt_difference_m(b) - 3.5).abs() < 1e-6);
    }
}
