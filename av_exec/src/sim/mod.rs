//! # Simulation platform
//!
//! A simple kinematic simulation of the robot on a ring track, following a lead vehicle, used to
//! run the executable without hardware and to test the tick driver.
//!
//! The robot's position is tracked relative to the line: `offset_cm` is the lateral distance of
//! the wheel axle centre from the line centre (positive to the left) and `heading_rad` the angle
//! between the robot and the track tangent (positive turned left). The ring turns left, so a robot
//! driving straight drifts towards the outside (right) of the ring.
//!
//! The line sensors sit on a bar ahead of the axle, so the bar's offset also moves with the
//! heading.
//!
//! The lead vehicle drives along the ring with a sinusoidally varying speed, the range sensor
//! reads the gap to it. The room lights follow a fixed schedule so the startup sequence can run.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use comms_if::eqpt::{
    Buzzer, Indicator, IndicatorDems, LightSensor, LineSensData, LineSensor, MonotonicClock,
    RangeSensor, Tone, WheelDems, WheelDriver,
};
use log::{debug, trace, warn};
use serde::Deserialize;
use std::f64::consts::PI;

use util::time::MICROS_PER_SECOND;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Parameters of the simulation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Ground speed of a wheel at 100 %.
    ///
    /// Units: centimeters/second
    pub max_wheel_speed_cm_s: f64,

    /// Distance between the wheels.
    ///
    /// Units: centimeters
    pub wheel_base_cm: f64,

    /// Radius of the ring track.
    ///
    /// Units: centimeters
    pub ring_radius_cm: f64,

    /// Width of the black line.
    ///
    /// Units: centimeters
    pub line_width_cm: f64,

    /// Distance between the two line follower sensors.
    ///
    /// Units: centimeters
    pub sensor_spacing_cm: f64,

    /// Distance of the line sensor bar ahead of the wheel axle.
    ///
    /// Units: centimeters
    pub sensor_lead_cm: f64,

    /// Distance to the lead vehicle at the start.
    ///
    /// Units: centimeters
    pub initial_gap_cm: f64,

    /// Mean speed of the lead vehicle.
    ///
    /// Units: centimeters/second
    pub lead_mean_speed_cm_s: f64,

    /// Amplitude of the lead vehicle's speed variation.
    ///
    /// Units: centimeters/second
    pub lead_speed_amplitude_cm_s: f64,

    /// Period of the lead vehicle's speed variation.
    ///
    /// Units: seconds
    pub lead_speed_period_s: f64,

    /// Largest distance the range sensor reports.
    ///
    /// Units: centimeters
    pub range_max_cm: f64,

    /// Simulation time at which the lights are switched off.
    ///
    /// Units: seconds
    pub lights_off_at_s: f64,

    /// Simulation time at which the lights are switched back on.
    ///
    /// Units: seconds
    pub lights_on_at_s: f64,

    pub light_on_level: f64,
    pub light_off_level: f64,

    /// Initial value of the microsecond counter, set close to `u32::MAX` to exercise wrapping.
    pub clock_start_us: u32,
}

/// The simulated robot and its environment.
pub struct SimPlatform {
    params: SimParams,

    time_s: f64,
    micros: u32,

    offset_cm: f64,
    heading_rad: f64,
    gap_cm: f64,

    wheels: WheelDems,
    indicator: IndicatorDems,
    tones: Vec<Tone>,

    num_collisions: u64,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            max_wheel_speed_cm_s: 40.0,
            wheel_base_cm: 11.5,
            ring_radius_cm: 150.0,
            line_width_cm: 2.5,
            sensor_spacing_cm: 1.5,
            sensor_lead_cm: 6.0,
            initial_gap_cm: 60.0,
            lead_mean_speed_cm_s: 20.0,
            lead_speed_amplitude_cm_s: 15.0,
            lead_speed_period_s: 20.0,
            range_max_cm: 400.0,
            lights_off_at_s: 2.0,
            lights_on_at_s: 8.0,
            light_on_level: 600.0,
            light_off_level: 20.0,
            clock_start_us: 0,
        }
    }
}

impl SimPlatform {
    pub fn new(params: SimParams) -> Self {
        Self {
            time_s: 0.0,
            micros: params.clock_start_us,
            offset_cm: 0.0,
            heading_rad: 0.0,
            gap_cm: params.initial_gap_cm,
            wheels: WheelDems::stop(),
            indicator: IndicatorDems::off(),
            tones: Vec::new(),
            num_collisions: 0,
            params,
        }
    }

    /// Advance the simulation by `dt_s` seconds using the last wheel demands.
    pub fn advance(&mut self, dt_s: f64) {
        if !(dt_s > 0.0) {
            return;
        }

        // Wheels are driven through the 8 bit motor driver
        let (left_duty, right_duty) = self.wheels.to_motor_duty();
        let v_left = left_duty as f64 / 255.0 * self.params.max_wheel_speed_cm_s;
        let v_right = right_duty as f64 / 255.0 * self.params.max_wheel_speed_cm_s;

        let speed = 0.5 * (v_left + v_right);
        let yaw_rate = (v_right - v_left) / self.params.wheel_base_cm;

        // The track tangent turns left at speed / radius
        self.heading_rad += (yaw_rate - speed / self.params.ring_radius_cm) * dt_s;
        self.heading_rad = wrap_angle(self.heading_rad);
        self.offset_cm += speed * self.heading_rad.sin() * dt_s;

        // Lead vehicle
        let lead_speed = self.lead_speed(self.time_s);
        self.gap_cm += (lead_speed - speed * self.heading_rad.cos()) * dt_s;
        if self.gap_cm < 0.0 {
            warn!("Simulated collision with the lead vehicle at {:.2} s", self.time_s);
            self.num_collisions += 1;
            self.gap_cm = 0.0;
        }

        self.time_s += dt_s;
        self.micros = self.micros.wrapping_add((dt_s * MICROS_PER_SECOND).round() as u32);

        trace!(
            "Sim t = {:.3} s: offset {:.2} cm, heading {:.3} rad, gap {:.1} cm",
            self.time_s,
            self.offset_cm,
            self.heading_rad,
            self.gap_cm
        );
    }

    fn lead_speed(&self, time_s: f64) -> f64 {
        let p = &self.params;
        let phase = if p.lead_speed_period_s > 0.0 {
            2.0 * PI * time_s / p.lead_speed_period_s
        } else {
            0.0
        };

        (p.lead_mean_speed_cm_s + p.lead_speed_amplitude_cm_s * phase.sin()).max(0.0)
    }

    /// Lateral distance of the sensor bar centre from the line centre.
    pub fn sensor_offset_cm(&self) -> f64 {
        self.offset_cm + self.params.sensor_lead_cm * self.heading_rad.sin()
    }

    fn on_line(&self, sensor_offset_cm: f64) -> bool {
        sensor_offset_cm.abs() <= 0.5 * self.params.line_width_cm
    }

    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn offset_cm(&self) -> f64 {
        self.offset_cm
    }

    pub fn gap_cm(&self) -> f64 {
        self.gap_cm
    }

    /// Move the robot sideways relative to the line, keeping its heading.
    pub fn set_offset_cm(&mut self, offset_cm: f64) {
        self.offset_cm = offset_cm;
    }

    pub fn set_gap_cm(&mut self, gap_cm: f64) {
        self.gap_cm = gap_cm;
    }

    pub fn wheels(&self) -> WheelDems {
        self.wheels
    }

    pub fn indicator(&self) -> IndicatorDems {
        self.indicator
    }

    /// All tones played so far.
    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn num_collisions(&self) -> u64 {
        self.num_collisions
    }
}

impl LightSensor for SimPlatform {
    fn read_light(&mut self) -> f64 {
        let p = &self.params;
        if self.time_s >= p.lights_off_at_s && self.time_s < p.lights_on_at_s {
            p.light_off_level
        } else {
            p.light_on_level
        }
    }
}

impl LineSensor for SimPlatform {
    fn read_line(&mut self) -> LineSensData {
        let half_spacing = 0.5 * self.params.sensor_spacing_cm;
        let bar_cm = self.sensor_offset_cm();
        let data = LineSensData::new(
            self.on_line(bar_cm + half_spacing),
            self.on_line(bar_cm - half_spacing)
        );

        trace!("Sim line code {}", data.to_raw());

        data
    }
}

impl RangeSensor for SimPlatform {
    fn read_headway_cm(&mut self) -> f64 {
        self.gap_cm.min(self.params.range_max_cm)
    }
}

impl WheelDriver for SimPlatform {
    fn drive(&mut self, dems: &WheelDems) {
        self.wheels = *dems;
    }
}

impl Indicator for SimPlatform {
    fn set_colour(&mut self, dems: &IndicatorDems) {
        if *dems != self.indicator {
            debug!("Indicator {} | {}", dems.left, dems.right);
        }
        self.indicator = *dems;
    }
}

impl Buzzer for SimPlatform {
    fn tone(&mut self, tone: Tone) {
        debug!("Tone {} Hz for {} ms", tone.frequency_hz, tone.duration_ms);
        self.tones.push(tone);
    }
}

impl MonotonicClock for SimPlatform {
    fn micros(&self) -> u32 {
        self.micros
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Wrap an angle into [-pi, pi).
fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}
