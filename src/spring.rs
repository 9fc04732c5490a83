//! Spring-driven motion values.
//!
//! A [`MotionValue`] moves toward its target under a damped spring force
//! instead of a fixed-duration easing, so it overshoots slightly and settles.
//! Changing the target while a transition is running redirects that same
//! transition: position and velocity carry over, nothing is queued.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Largest integration step. Longer frames are split into substeps.
const MAX_STEP: f64 = 1.0 / 1000.0;

/// Hard stop for [`SpringConfig::settle_time`] in case a config never settles.
const MAX_SETTLE_SECONDS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from target under which the value may come to rest.
    pub rest_delta: f64,
    /// Speed under which the value may come to rest.
    pub rest_speed: f64,
}

impl SpringConfig {
    /// Spring used by the post row hover affordances.
    pub const HOVER: SpringConfig = SpringConfig {
        stiffness: 26.7,
        damping: 4.1,
        mass: 0.2,
        rest_delta: 0.01,
        rest_speed: 0.1,
    };

    /// `damping / (2 * sqrt(stiffness * mass))`. Below 1 the spring overshoots.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0
    }

    fn acceleration(&self, displacement: f64, velocity: f64) -> f64 {
        (-self.stiffness * displacement - self.damping * velocity) / self.mass
    }

    fn at_rest(&self, displacement: f64, velocity: f64) -> bool {
        displacement.abs() <= self.rest_delta && velocity.abs() <= self.rest_speed
    }

    /// Time for a value starting at rest to travel `distance` and settle.
    pub fn settle_time(&self, distance: f64) -> Duration {
        let mut value = MotionValue::new(*self, 0.0);
        value.set_target(distance);
        let mut elapsed = 0.0;
        while value.is_animating() && elapsed < MAX_SETTLE_SECONDS {
            value.step(MAX_STEP);
            elapsed += MAX_STEP;
        }
        Duration::from_secs_f64(elapsed)
    }

    /// Samples a 0 to 1 transition of this spring as a CSS `linear()` easing,
    /// for browsers that run the page without the motion script.
    pub fn linear_easing(&self, distance: f64, samples: usize) -> LinearEasing {
        if distance == 0.0 {
            return LinearEasing {
                duration: Duration::ZERO,
                stops: vec![0.0, 1.0],
            };
        }
        let duration = self.settle_time(distance);
        let samples = samples.max(2);
        let total = duration.as_secs_f64();
        let interval = total / (samples - 1) as f64;

        let mut value = MotionValue::new(*self, 0.0);
        value.set_target(distance);
        let mut stops = Vec::with_capacity(samples);
        stops.push(0.0);
        for _ in 1..samples {
            value.step(interval);
            stops.push(value.get() / distance);
        }
        if let Some(last) = stops.last_mut() {
            *last = 1.0;
        }

        LinearEasing { duration, stops }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        SpringConfig::HOVER
    }
}

/// Piecewise-linear approximation of a spring curve.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearEasing {
    pub duration: Duration,
    pub stops: Vec<f64>,
}

impl fmt::Display for LinearEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("linear(")?;
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:.4}", stop)?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    target: f64,
}

/// An animated scalar.
#[derive(Debug, Clone)]
pub struct MotionValue {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    transition: Option<Transition>,
}

impl MotionValue {
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        MotionValue {
            config,
            position: initial,
            velocity: 0.0,
            transition: None,
        }
    }

    pub fn get(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Where the value is heading, or where it rests.
    pub fn target(&self) -> f64 {
        self.transition.map_or(self.position, |t| t.target)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Always 0 or 1.
    pub fn active_transitions(&self) -> usize {
        usize::from(self.transition.is_some())
    }

    /// Points the value at a new target. A running transition is redirected
    /// in place, keeping the current velocity.
    pub fn set_target(&mut self, target: f64) {
        if self.transition.is_none() && self.config.at_rest(self.position - target, self.velocity) {
            self.position = target;
            return;
        }
        self.transition = Some(Transition { target });
    }

    /// Advances the transition by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        let Some(transition) = self.transition else {
            return;
        };
        if dt <= 0.0 {
            return;
        }

        let substeps = (dt / MAX_STEP).ceil().max(1.0) as usize;
        let h = dt / substeps as f64;
        for _ in 0..substeps {
            let displacement = self.position - transition.target;
            // semi-implicit Euler: velocity first, then position
            self.velocity += self.config.acceleration(displacement, self.velocity) * h;
            self.position += self.velocity * h;

            if self.config.at_rest(self.position - transition.target, self.velocity) {
                self.position = transition.target;
                self.velocity = 0.0;
                self.transition = None;
                return;
            }
        }
    }
}
