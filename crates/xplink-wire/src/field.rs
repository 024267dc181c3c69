//! Telemetry field codes and the fields-seen mask
//!
//! Each telemetry record carries a small integer code identifying which
//! quantity its payload holds. Codes follow the simulator's data-output
//! screen indexes and stay well below 64, so a set of codes fits a u64
//! bitmask.

/// Telemetry field codes (simulator data-output indexes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldCode {
    FrameRate = 0,
    Times = 1,
    SimStats = 2,
    Speed = 3,
    Gload = 4,
    AtmosphereWeather = 5,
    AtmospherePressure = 6,
    SystemPressures = 7,
    Joystick1 = 8,
    Joystick2 = 9,
    ArtStab = 10,
    FlightCon = 11,
    WingSweep = 12,
    Trim = 13,
    Brakes = 14,
    AngularMoments = 15,
    AngularVelocities = 16,
    PitchRollHeading = 17,
    AoA = 18,
    MagCompass = 19,
    LatLonAlt = 20,
    LocVelDistTraveled = 21,
    ThrottleCommand = 25,
    Mixture = 29,
    EngineRPM = 37,
    PropRPM = 38,
    PropPitch = 39,
    Generator = 58,
}

impl FieldCode {
    /// Map a wire code to a known field, if any
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => FieldCode::FrameRate,
            1 => FieldCode::Times,
            2 => FieldCode::SimStats,
            3 => FieldCode::Speed,
            4 => FieldCode::Gload,
            5 => FieldCode::AtmosphereWeather,
            6 => FieldCode::AtmospherePressure,
            7 => FieldCode::SystemPressures,
            8 => FieldCode::Joystick1,
            9 => FieldCode::Joystick2,
            10 => FieldCode::ArtStab,
            11 => FieldCode::FlightCon,
            12 => FieldCode::WingSweep,
            13 => FieldCode::Trim,
            14 => FieldCode::Brakes,
            15 => FieldCode::AngularMoments,
            16 => FieldCode::AngularVelocities,
            17 => FieldCode::PitchRollHeading,
            18 => FieldCode::AoA,
            19 => FieldCode::MagCompass,
            20 => FieldCode::LatLonAlt,
            21 => FieldCode::LocVelDistTraveled,
            25 => FieldCode::ThrottleCommand,
            29 => FieldCode::Mixture,
            37 => FieldCode::EngineRPM,
            38 => FieldCode::PropRPM,
            39 => FieldCode::PropPitch,
            58 => FieldCode::Generator,
            _ => return None,
        })
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A set of field codes, one bit per code
///
/// Cleared before each datagram parse; grows monotonically while records
/// are consumed; compared against [`REQUIRED_FIELDS`] afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldMask(u64);

impl FieldMask {
    pub const EMPTY: FieldMask = FieldMask(0);

    /// Number of codes a mask can hold
    pub const CAPACITY: u8 = 64;

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        FieldMask(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Add one code. Codes outside the mask range are ignored.
    #[inline]
    pub fn insert(&mut self, code: u8) {
        if code < Self::CAPACITY {
            self.0 |= 1u64 << code;
        }
    }

    #[inline]
    pub const fn with(self, field: FieldCode) -> Self {
        FieldMask(self.0 | (1u64 << (field as u8)))
    }

    #[inline]
    pub fn contains(self, field: FieldCode) -> bool {
        self.0 & (1u64 << (field as u8)) != 0
    }

    #[inline]
    pub const fn union(self, other: FieldMask) -> Self {
        FieldMask(self.0 | other.0)
    }

    /// Codes in `self` that are not in `other`
    #[inline]
    pub const fn difference(self, other: FieldMask) -> Self {
        FieldMask(self.0 & !other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate the codes present, ascending
    pub fn codes(self) -> impl Iterator<Item = u8> {
        (0..Self::CAPACITY).filter(move |c| self.0 & (1u64 << c) != 0)
    }
}

/// The fields the simulator must emit every cycle for a datagram to be
/// considered complete
pub const REQUIRED_FIELDS: FieldMask = FieldMask::EMPTY
    .with(FieldCode::Times)
    .with(FieldCode::LatLonAlt)
    .with(FieldCode::Speed)
    .with(FieldCode::PitchRollHeading)
    .with(FieldCode::LocVelDistTraveled)
    .with(FieldCode::AngularVelocities)
    .with(FieldCode::Gload)
    .with(FieldCode::Joystick1)
    .with(FieldCode::ThrottleCommand)
    .with(FieldCode::Trim)
    .with(FieldCode::PropPitch)
    .with(FieldCode::EngineRPM)
    .with(FieldCode::PropRPM)
    .with(FieldCode::Generator)
    .with(FieldCode::Mixture);
