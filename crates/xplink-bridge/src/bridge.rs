//! Per-tick bridge orchestration
//!
//! The bridge is invoked once per external simulation step. Each tick does
//! at most one bounded-wait receive and, on acceptance, one batch of
//! control sends. All bridge state lives in this one owned object.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use xplink_core::{SimTime, XplinkResult};
use xplink_state::{Integrator, LocalFrame, ParamStore, RecordEffect, TelemetryFrame};
use xplink_time::SimClock;
use xplink_wire::{decode_telemetry, MAX_TELEMETRY_DATAGRAM};

use crate::{ActuatorInputs, BridgeConfig, ControlEncoder, Negotiator, UdpLink};

/// Outcome of one bridge tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A complete telemetry datagram was decoded and consumed
    Accepted,
    /// No usable datagram; state was extrapolated one nominal step
    Extrapolated,
    /// Silence exceeded the cap; nothing was mutated this tick
    Starved,
}

/// What one receive attempt produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CycleOutcome {
    Accepted,
    /// Selection requests went out; the packet must not be consumed yet
    Deferred,
    /// Nothing arrived, or what arrived was not a telemetry datagram
    NoData,
}

/// Bidirectional protocol bridge to the simulator
pub struct Bridge {
    config: BridgeConfig,
    link: UdpLink,
    clock: SimClock,
    frame: TelemetryFrame,
    local: LocalFrame,
    negotiator: Negotiator,
    control: ControlEncoder,
    /// Wall-clock instant of the last accepted datagram
    last_accepted: Option<Instant>,
    /// Observed gap between accepted datagrams, when plausible
    frame_interval: Option<Duration>,
}

impl Bridge {
    /// Create the bridge and bind its telemetry socket.
    ///
    /// The simulator's telemetry is too coarse for the harness's own state
    /// estimator and startup gyro calibration; both are defaulted off in
    /// the parameter store, once, here.
    pub fn new(config: BridgeConfig, params: &mut dyn ParamStore) -> XplinkResult<Self> {
        params.set_default("estimator.bypass", 1.0);
        params.set_default("gyro.startup_cal", 0.0);

        let link = UdpLink::bind(config.bind_addr, config.command_port, config.peer)?;
        tracing::info!(addr = %link.local_addr(), "waiting for simulator telemetry");

        Ok(Bridge {
            control: ControlEncoder::new(config.servo_time_constant),
            config,
            link,
            clock: SimClock::new(),
            frame: TelemetryFrame::new(),
            local: LocalFrame::new(),
            negotiator: Negotiator::new(),
            last_accepted: None,
            frame_interval: None,
        })
    }

    /// Local address of the telemetry socket
    pub fn local_addr(&self) -> SocketAddr {
        self.link.local_addr()
    }

    /// Whether the simulator peer is known yet
    pub fn connected(&self) -> bool {
        self.link.established()
    }

    /// The normalized flight state as of the last tick
    pub fn frame(&self) -> &TelemetryFrame {
        &self.frame
    }

    /// Tracked simulator time
    pub fn sim_time(&self) -> SimTime {
        self.clock.now()
    }

    /// Run one simulation tick: bounded receive, then control output on
    /// acceptance.
    pub fn tick(
        &mut self,
        integrator: &mut dyn Integrator,
        inputs: &ActuatorInputs,
    ) -> XplinkResult<TickOutcome> {
        let outcome = self.receive(integrator)?;
        if outcome == TickOutcome::Accepted {
            self.send_controls(inputs)?;
        }
        Ok(outcome)
    }

    fn receive(&mut self, integrator: &mut dyn Integrator) -> XplinkResult<TickOutcome> {
        let mut buf = [0u8; MAX_TELEMETRY_DATAGRAM];
        let wait = self.wait_window();

        let cycle = match self.link.recv(&mut buf, wait)? {
            Some((len, src)) => self.ingest(&buf[..len], src)?,
            None => CycleOutcome::NoData,
        };

        match cycle {
            CycleOutcome::Accepted => {
                self.accept(integrator);
                Ok(TickOutcome::Accepted)
            }
            CycleOutcome::Deferred | CycleOutcome::NoData => Ok(self.fallback(integrator)),
        }
    }

    /// Decode one datagram and dispatch its records.
    fn ingest(&mut self, datagram: &[u8], src: SocketAddr) -> XplinkResult<CycleOutcome> {
        let packet = match decode_telemetry(datagram) {
            Ok(packet) => packet,
            // malformed input is indistinguishable from silence
            Err(_) => return Ok(CycleOutcome::NoData),
        };

        self.link.establish(src);

        for record in &packet.records {
            match self.frame.apply(record, self.config.airframe) {
                RecordEffect::Elapsed(seconds) => {
                    self.clock.absorb_elapsed(seconds);
                }
                RecordEffect::ThrottleCandidate(value) => {
                    if !self.control.is_echo(value) {
                        self.frame.rcin[2] = value;
                    }
                }
                RecordEffect::Applied => {}
            }
        }

        let requests = self.negotiator.reconcile(packet.seen);
        if !requests.is_empty() {
            for request in requests {
                self.link.send(&request)?;
            }
            return Ok(CycleOutcome::Deferred);
        }

        Ok(CycleOutcome::Accepted)
    }

    /// Consume an accepted datagram: integrate position, repair drift,
    /// track the inter-packet interval.
    fn accept(&mut self, integrator: &mut dyn Integrator) {
        let measured = self.frame.sim_position;
        let position = self.local.compose(measured);
        integrator.update_position(self.local.home(), position);
        integrator.time_advance();

        self.frame.update_earth_accel();

        if self
            .local
            .correct_drift(measured, self.frame.location, integrator.location())
        {
            integrator.update_position(self.local.home(), self.local.position());
            integrator.time_advance();
        }

        let now = Instant::now();
        if let Some(last) = self.last_accepted {
            let gap = now - last;
            if gap > Duration::ZERO && gap < Duration::from_millis(100) {
                self.frame_interval = Some(gap);
            }
        }
        self.last_accepted = Some(now);
    }

    /// Synthesize state when no usable datagram is available, bounded by
    /// the silence cap.
    fn fallback(&mut self, integrator: &mut dyn Integrator) -> TickOutcome {
        let Some(last) = self.last_accepted else {
            return TickOutcome::Starved;
        };
        if last.elapsed() > self.config.silence_cap {
            return TickOutcome::Starved;
        }

        self.clock.advance(self.config.nominal_step);
        integrator.extrapolate_sensors(self.config.nominal_step.as_secs_f32());
        integrator.update_position(self.local.home(), self.local.position());
        integrator.time_advance();

        TickOutcome::Extrapolated
    }

    /// The receive wait stays minimal unless another datagram is expected
    /// imminently based on the observed inter-packet interval.
    fn wait_window(&self) -> Duration {
        let minimal = Duration::from_millis(1);
        if let (Some(interval), Some(last)) = (self.frame_interval, self.last_accepted) {
            if interval > minimal && last.elapsed() + minimal >= interval {
                return Duration::from_millis(10);
            }
        }
        minimal
    }

    fn send_controls(&mut self, inputs: &ActuatorInputs) -> XplinkResult<()> {
        for datagram in self.control.encode(inputs, self.config.flap_channel)? {
            self.link.send(&datagram)?;
        }
        Ok(())
    }
}
