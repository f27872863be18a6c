//! # PID controller
//!
//! The controller is stepped once per control cycle with the fixed cycle
//! period as its time step, and is given its gains on every step so that
//! dashboard changes apply immediately.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::ControlGains;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller with feed-forward.
#[derive(Debug, Serialize, Clone, Default)]
pub struct PidController {
    /// Previous error, `None` on the first step after a reset
    prev_error: Option<f64>,

    /// The integral accumulation
    ///
    /// Units: error * seconds
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the integral and previous error.
    pub fn reset(&mut self) {
        self.prev_error = None;
        self.integral = 0.0;
    }

    /// Get the limited controller output for the given error.
    ///
    /// The output is `kP*e + kI*integral(e) + kD*de/dt + kF*target`, limited to
    /// the gains' output range. The derivative term is zero on the first step
    /// after a reset.
    pub fn get(&mut self, error: f64, target: f64, gains: &ControlGains, dt_s: f64) -> f64 {
        // Accumulate the integral term
        self.integral += error * dt_s;

        // Derivative, none without a previous error or a time step
        let deriv = match self.prev_error {
            Some(e) if dt_s > 0.0 => (error - e) / dt_s,
            _ => 0.0,
        };

        let out = gains.k_p * error
            + gains.k_i * self.integral
            + gains.k_d * deriv
            + gains.k_f * target;

        self.prev_error = Some(error);

        util::maths::clamp(&out, &gains.min_output, &gains.max_output)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_proportional_only() {
        let mut pid = PidController::new();
        let gains = ControlGains::proportional(0.015);

        for &avg in [0.0, 10.0, 33.3, 58.0, 61.5, 200.0].iter() {
            let e: f64 = 60.0 - avg;
            let expected = (0.015 * e).max(-1.0).min(1.0);
            assert_eq!(pid.get(e, 60.0, &gains, 0.02), expected);
        }
    }

    #[test]
    fn test_limits() {
        let mut pid = PidController::new();
        let mut gains = ControlGains::proportional(1.0);
        gains.min_output = -0.3;
        gains.max_output = 0.4;

        assert_eq!(pid.get(10.0, 0.0, &gains, 0.02), 0.4);
        assert_eq!(pid.get(-10.0, 0.0, &gains, 0.02), -0.3);
    }

    #[test]
    fn test_integral_derivative_feed_forward() {
        let mut pid = PidController::new();
        let gains = ControlGains {
            k_p: 0.0,
            k_i: 1.0,
            k_d: 0.0,
            k_f: 0.0,
            min_output: -100.0,
            max_output: 100.0,
        };

        // Integral accumulates e * dt
        assert!((pid.get(2.0, 0.0, &gains, 0.5) - 1.0).abs() < 1e-12);
        assert!((pid.get(2.0, 0.0, &gains, 0.5) - 2.0).abs() < 1e-12);

        pid.reset();
        let gains = ControlGains {
            k_i: 0.0,
            k_d: 1.0,
            ..gains
        };

        // No derivative on the first step
        assert_eq!(pid.get(4.0, 0.0, &gains, 0.5), 0.0);
        assert!((pid.get(3.0, 0.0, &gains, 0.5) + 2.0).abs() < 1e-12);

        let gains = ControlGains {
            k_d: 0.0,
            k_f: 0.1,
            ..gains
        };
        assert!((pid.get(0.0, 50.0, &gains, 0.5) - 5.0).abs() < 1e-12);
    }
}
