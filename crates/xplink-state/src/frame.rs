//! Normalized flight-state record and the field transform table
//!
//! One [`TelemetryFrame`] is mutated field by field as telemetry records
//! are decoded. A field that does not arrive in a cycle keeps its previous
//! value. The simulator's south/up/east-like local axes are remapped to
//! the bridge's north/east/down convention on decode, and imperial units
//! become SI.

use xplink_core::{
    radians, Location, Matrix3, Vector3, FEET_TO_METERS, GRAVITY_MSS, KNOTS_TO_M_PER_S,
};
use xplink_wire::{FieldCode, TelemetryRecord};

/// Channel-like input slots carried in the frame
pub const INPUT_CHANNELS: usize = 8;

/// Airframe variant the bridge is flying
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Airframe {
    #[default]
    FixedWing,
    /// Rotary wing: collective is sourced from the trim record and the
    /// commanded-throttle channel is ignored entirely
    RotaryWing,
}

/// Effects a record can have beyond mutating the frame itself
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordEffect {
    /// Frame updated in place (or payload deliberately ignored)
    Applied,
    /// Simulator-reported elapsed seconds, for the clock synchronizer
    Elapsed(f32),
    /// Candidate manual throttle input; needs echo disambiguation before
    /// it may land in the throttle channel
    ThrottleCandidate(f32),
}

/// Normalized per-cycle flight state
#[derive(Clone, Debug)]
pub struct TelemetryFrame {
    /// Absolute geodetic position as reported by the simulator
    pub location: Location,
    /// Ground elevation estimate, meters above sea level
    pub ground_level_m: f32,
    /// True airspeed, m/s
    pub airspeed: f32,
    /// Pitot airspeed, m/s (the simulator reports no separate value)
    pub airspeed_pitot: f32,
    /// Body-to-earth rotation composed from reported euler attitude
    pub dcm: Matrix3,
    /// Reported local position offset, NED meters
    pub sim_position: Vector3,
    /// Earth-frame velocity, NED m/s
    pub velocity_ef: Vector3,
    /// Body-frame angular rate, rad/s
    pub gyro: Vector3,
    /// Body-frame specific force, m/s^2
    pub accel_body: Vector3,
    /// Earth-frame acceleration derived from `accel_body` and `dcm`
    pub accel_earth: Vector3,
    /// Channel-like input values in [0,1] (sticks, throttle, switches)
    pub rcin: [f32; INPUT_CHANNELS],
    /// How many input channels carry live data
    pub rcin_chan_count: u8,
    /// Engine and prop RPM
    pub rpm: [f32; 2],
}

impl Default for TelemetryFrame {
    fn default() -> Self {
        TelemetryFrame {
            location: Location::default(),
            ground_level_m: 0.0,
            airspeed: 0.0,
            airspeed_pitot: 0.0,
            dcm: Matrix3::IDENTITY,
            sim_position: Vector3::ZERO,
            velocity_ef: Vector3::ZERO,
            gyro: Vector3::ZERO,
            accel_body: Vector3::ZERO,
            accel_earth: Vector3::ZERO,
            rcin: [0.0; INPUT_CHANNELS],
            rcin_chan_count: 0,
            rpm: [0.0; 2],
        }
    }
}

impl TelemetryFrame {
    pub fn new() -> Self {
        TelemetryFrame::default()
    }

    /// Apply one decoded record to the frame.
    ///
    /// Unknown codes and deliberately ignored fields return
    /// [`RecordEffect::Applied`] without touching anything; time and
    /// commanded throttle are surfaced to the caller instead of being
    /// applied here.
    pub fn apply(&mut self, rec: &TelemetryRecord, airframe: Airframe) -> RecordEffect {
        let v = &rec.values;
        let Some(field) = FieldCode::from_code(rec.code) else {
            return RecordEffect::Applied;
        };

        match field {
            FieldCode::Times => return RecordEffect::Elapsed(v[2]),

            FieldCode::LatLonAlt => {
                self.location.lat = (v[0] as f64 * 1.0e7) as i32;
                self.location.lng = (v[1] as f64 * 1.0e7) as i32;
                self.location.alt = (v[2] * FEET_TO_METERS * 100.0) as i32;
                let altitude_above_ground = v[3] * FEET_TO_METERS;
                self.ground_level_m = self.location.alt as f32 * 0.01 - altitude_above_ground;
            }

            FieldCode::Speed => {
                self.airspeed = v[1] * KNOTS_TO_M_PER_S;
                self.airspeed_pitot = self.airspeed;
            }

            FieldCode::PitchRollHeading => {
                let pitch = radians(v[0]);
                let roll = radians(v[1]);
                let yaw = radians(v[2]);
                self.dcm = Matrix3::from_euler(roll, pitch, yaw);
            }

            FieldCode::LocVelDistTraveled => {
                self.sim_position.y = v[0];
                self.sim_position.z = -v[1];
                self.sim_position.x = -v[2];
                self.velocity_ef.y = v[3];
                self.velocity_ef.z = -v[4];
                self.velocity_ef.x = -v[5];
            }

            FieldCode::AngularVelocities => {
                self.gyro.y = v[0];
                self.gyro.x = v[1];
                self.gyro.z = v[2];
            }

            FieldCode::Gload => {
                self.accel_body.z = -v[4] * GRAVITY_MSS;
                self.accel_body.x = v[5] * GRAVITY_MSS;
                self.accel_body.y = v[6] * GRAVITY_MSS;
            }

            FieldCode::Joystick1 => {
                self.rcin_chan_count = self.rcin_chan_count.max(4);
                self.rcin[0] = (v[1] + 1.0) * 0.5;
                self.rcin[1] = (v[0] + 1.0) * 0.5;
                self.rcin[3] = (v[2] + 1.0) * 0.5;
            }

            FieldCode::ThrottleCommand => {
                if airframe == Airframe::FixedWing {
                    return RecordEffect::ThrottleCandidate(v[0]);
                }
            }

            FieldCode::Trim => {
                if airframe == Airframe::RotaryWing {
                    // no direct collective input exists; the flap trim slot
                    // stands in for it
                    self.rcin[2] = v[3];
                }
            }

            FieldCode::EngineRPM => self.rpm[0] = v[0],
            FieldCode::PropRPM => self.rpm[1] = v[0],

            FieldCode::Generator => {
                // generator on/off doubles as the interlock switch channel
                self.rcin_chan_count = self.rcin_chan_count.max(8);
                self.rcin[7] = v[0];
            }

            FieldCode::Mixture => {
                self.rcin_chan_count = self.rcin_chan_count.max(7);
                self.rcin[5] = v[2];
                self.rcin[6] = v[3];
            }

            // decoded but carry nothing the bridge wants
            FieldCode::AoA
            | FieldCode::AtmosphereWeather
            | FieldCode::Joystick2
            | FieldCode::PropPitch => {}

            _ => {}
        }

        RecordEffect::Applied
    }

    /// Derive earth-frame acceleration from the current body-frame specific
    /// force and attitude, gravity added back on the down axis.
    pub fn update_earth_accel(&mut self) {
        self.accel_earth = self.dcm * self.accel_body;
        self.accel_earth.z += GRAVITY_MSS;
    }
}
