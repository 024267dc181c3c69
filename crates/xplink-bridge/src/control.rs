//! Control-output encoding
//!
//! Actuator PWM inputs are smoothed with a first-order low-pass, scaled,
//! and written to named simulator variables. Writes are skipped when a
//! surface has not moved more than a negligible epsilon since the last
//! write.
//!
//! The simulator reports commanded throttle in the same telemetry channel
//! whether the command came from this bridge or from an operator's input
//! device on the simulator side. Every throttle value we send is therefore
//! perturbed by a small fixed tag; a received value whose fractional
//! remainder matches the tag is our own command coming back and is
//! discarded rather than treated as operator input.

use std::time::Instant;

use bytes::Bytes;

use xplink_core::XplinkResult;
use xplink_wire::encode_named_write;

/// Fractional offset added to every outbound throttle value
pub const THROTTLE_TAG: f32 = 0.000123;

/// Tag detection works on the value scaled to integer millionths
const TAG_SCALE: f32 = 1.0e6;

/// Modulo interval the tag is recovered in
const TAG_INTERVAL: u32 = 1000;

/// Surface moves smaller than this skip the write
const SURFACE_EPSILON: f32 = 1.0e-6;

/// Full control-surface deflection, degrees
const SURFACE_DEFLECTION_DEG: f32 = 45.0;

/// Actuator slots feeding the encoder, PWM microseconds (1000-2000)
#[derive(Clone, Copy, Debug)]
pub struct ActuatorInputs {
    pub servos: [u16; 16],
}

impl Default for ActuatorInputs {
    fn default() -> Self {
        ActuatorInputs { servos: [1500; 16] }
    }
}

/// First-order low-pass over a raw actuator input
#[derive(Clone, Copy, Debug)]
struct ServoFilter {
    value: f32,
    tau_s: f32,
}

impl ServoFilter {
    fn new(tau_s: f32) -> Self {
        ServoFilter { value: 0.0, tau_s }
    }

    fn apply(&mut self, target: f32, dt_s: f32) -> f32 {
        let alpha = dt_s / (dt_s + self.tau_s);
        self.value += (target - self.value) * alpha;
        self.value
    }
}

/// Builds the outbound named-value writes for one tick
pub struct ControlEncoder {
    horizontal: ServoFilter,
    vertical: ServoFilter,
    last_flap: f32,
    last_horizontal: f32,
    last_vertical: f32,
    throttle_sent: f32,
    last_send: Option<Instant>,
}

impl ControlEncoder {
    pub fn new(servo_time_constant: f32) -> Self {
        ControlEncoder {
            horizontal: ServoFilter::new(servo_time_constant),
            vertical: ServoFilter::new(servo_time_constant),
            last_flap: 0.0,
            last_horizontal: 0.0,
            last_vertical: 0.0,
            throttle_sent: 0.0,
            last_send: None,
        }
    }

    /// The most recently sent tagged throttle value
    pub fn throttle_sent(&self) -> f32 {
        self.throttle_sent
    }

    /// Is this received throttle value our own command echoed back?
    ///
    /// Anything negative, bit-identical to the last sent value, or carrying
    /// the tag remainder is an echo. Only values failing all three tests are
    /// genuine operator input.
    pub fn is_echo(&self, value: f32) -> bool {
        if value < 0.0 {
            return true;
        }
        if value.to_bits() == self.throttle_sent.to_bits() {
            return true;
        }
        ((value * TAG_SCALE) as u32) % TAG_INTERVAL == (THROTTLE_TAG * TAG_SCALE) as u32
    }

    /// Encode this tick's outbound command datagrams
    pub fn encode(
        &mut self,
        inputs: &ActuatorInputs,
        flap_channel: Option<usize>,
    ) -> XplinkResult<Vec<Bytes>> {
        let now = Instant::now();
        let dt = self
            .last_send
            .map(|t| (now - t).as_secs_f32())
            .unwrap_or(0.01)
            .clamp(0.001, 0.1);
        self.last_send = Some(now);

        let mut out = Vec::new();

        if let Some(channel) = flap_channel {
            let flap = Self::unit_range(inputs.servos[channel]);
            if (flap - self.last_flap).abs() > SURFACE_EPSILON {
                out.push(encode_named_write(
                    "sim/flightmodel/controls/flaprqst",
                    flap,
                )?);
                out.push(encode_named_write(
                    "sim/aircraft/overflow/acf_flap_arm",
                    if flap > 0.0 { 1.0 } else { 0.0 },
                )?);
                self.last_flap = flap;
            }
        }

        let horizontal = self
            .horizontal
            .apply(Self::angle_range(inputs.servos[0]), dt);
        let vertical = self.vertical.apply(Self::angle_range(inputs.servos[1]), dt);
        let horizontal_moved = (horizontal - self.last_horizontal).abs() > SURFACE_EPSILON;
        let vertical_moved = (vertical - self.last_vertical).abs() > SURFACE_EPSILON;

        if horizontal_moved || vertical_moved {
            out.push(encode_named_write(
                "sim/operation/override/override_control_surfaces",
                1.0,
            )?);
        }
        if vertical_moved {
            let deflection = vertical * SURFACE_DEFLECTION_DEG;
            out.push(encode_named_write(
                "sim/flightmodel2/wing/aileron1_deg[8]",
                deflection,
            )?);
            out.push(encode_named_write(
                "sim/flightmodel2/wing/aileron1_deg[9]",
                deflection,
            )?);
            self.last_vertical = vertical;
        }
        if horizontal_moved {
            let deflection = horizontal * SURFACE_DEFLECTION_DEG;
            out.push(encode_named_write(
                "sim/flightmodel2/wing/rudder1_deg[10]",
                deflection,
            )?);
            out.push(encode_named_write(
                "sim/flightmodel2/wing/rudder1_deg[11]",
                deflection,
            )?);
            self.last_horizontal = horizontal;
        }

        // throttle goes out every tick, tagged so its echo is recognizable
        let throttle = Self::unit_range(inputs.servos[2]).clamp(0.0, 1.0) + THROTTLE_TAG;
        out.push(encode_named_write(
            "sim/flightmodel/engine/ENGN_thro[0]",
            throttle,
        )?);
        self.throttle_sent = throttle;

        Ok(out)
    }

    /// PWM microseconds to centered [-1, 1]
    fn angle_range(pwm: u16) -> f32 {
        (pwm as f32 - 1500.0) / 500.0
    }

    /// PWM microseconds to [0, 1]
    fn unit_range(pwm: u16) -> f32 {
        (pwm as f32 - 1000.0) / 1000.0
    }
}
