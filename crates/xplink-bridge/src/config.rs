//! Bridge configuration

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use xplink_state::Airframe;

/// Default local port telemetry arrives on
pub const TELEMETRY_BIND_PORT: u16 = 49001;

/// Default port the simulator listens on for commands
pub const SIMULATOR_COMMAND_PORT: u16 = 49000;

/// Bridge configuration
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Airframe variant being flown
    pub airframe: Airframe,
    /// Local address the telemetry socket binds to
    pub bind_addr: SocketAddr,
    /// Simulator address when known out of band; otherwise learned from the
    /// source of the first valid telemetry datagram
    pub peer: Option<SocketAddr>,
    /// Port the simulator accepts commands on (combined with a learned
    /// peer IP)
    pub command_port: u16,
    /// Longest silence bridged by extrapolation before cycles fail outright
    pub silence_cap: Duration,
    /// Clock step for one extrapolated cycle
    pub nominal_step: Duration,
    /// Actuator smoothing filter time constant, seconds
    pub servo_time_constant: f32,
    /// Actuator slot driving the flap request, when the airframe has one
    pub flap_channel: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            airframe: Airframe::FixedWing,
            bind_addr: SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::UNSPECIFIED,
                TELEMETRY_BIND_PORT,
            )),
            peer: None,
            command_port: SIMULATOR_COMMAND_PORT,
            silence_cap: Duration::from_millis(200),
            nominal_step: Duration::from_millis(1),
            servo_time_constant: 0.05,
            flap_channel: None,
        }
    }
}
