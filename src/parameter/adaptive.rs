//! An integer parameter that drifts under stagnation.

use super::SolveParameter;
use crate::solver::SolveInformation;
use thiserror::Error;

/// Errors raised when constructing an [`AdaptiveParameter`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("invalid range: min_value {min} is greater than max_value {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("start_value {start} is outside the range [{min}, {max}]")]
    StartOutOfRange { start: i64, min: i64, max: i64 },
}

/// Configuration for an [`AdaptiveParameter`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntParameterOptions {
    /// Value at the start of a solve, and the value snapped back to.
    pub start_value: i64,

    /// Number of consecutive non-improving iterations tolerated before the
    /// value starts moving.
    pub delta_after_iterations: u64,

    /// Amount added to the value on each move.
    pub delta: i64,

    /// Lower bound of the value.
    pub min_value: i64,

    /// Upper bound of the value.
    pub max_value: i64,

    /// Reset the value to `start_value` when the best solution improves.
    pub snap_back_after_improvement: bool,

    /// Reverse direction instead of saturating at a bound.
    pub zigzag: bool,
}

/// An adaptively-updated integer parameter.
///
/// The value stays put as long as iterations keep improving the best
/// solution. Once `delta_after_iterations` consecutive iterations have
/// passed without improvement, the value moves by `delta` on every further
/// non-improving iteration, clamped to `[min_value, max_value]`. With
/// `zigzag` the direction reverses at a bound, so the value sweeps back and
/// forth; with `snap_back_after_improvement` any improvement returns the
/// value to `start_value`.
///
/// The invariant `min_value <= value <= max_value` holds after construction
/// and after every update.
pub struct AdaptiveParameter {
    options: IntParameterOptions,
    value: i64,
    delta: i64,
    start_delta: i64,
    iterations: u64,
}

impl AdaptiveParameter {
    /// Creates an adaptive parameter.
    ///
    /// Returns an error if the range is inverted or the start value lies
    /// outside it. If the start value sits on the bound its delta points at,
    /// the sign of the delta is flipped so the parameter can move away from
    /// that bound.
    pub fn new(options: IntParameterOptions) -> Result<Self, ParameterError> {
        if options.min_value > options.max_value {
            return Err(ParameterError::InvalidRange {
                min: options.min_value,
                max: options.max_value,
            });
        }
        if options.start_value < options.min_value || options.start_value > options.max_value {
            return Err(ParameterError::StartOutOfRange {
                start: options.start_value,
                min: options.min_value,
                max: options.max_value,
            });
        }

        let mut delta = options.delta;
        if (options.start_value == options.max_value && delta > 0)
            || (options.start_value == options.min_value && delta < 0)
        {
            delta = -delta;
        }

        Ok(Self {
            options,
            value: options.start_value,
            delta,
            start_delta: delta,
            iterations: 0,
        })
    }

    fn at_bound_in_direction(&self) -> bool {
        (self.value == self.options.max_value && self.delta > 0)
            || (self.value == self.options.min_value && self.delta < 0)
    }
}

impl SolveParameter for AdaptiveParameter {
    fn update(&mut self, info: &SolveInformation) {
        if info.delta_score() < 0.0 {
            self.iterations = 0;
            if self.options.snap_back_after_improvement && self.value != self.options.start_value {
                self.delta = self.start_delta;
                self.value = self.options.start_value;
            }
            return;
        }

        self.iterations += 1;
        if self.iterations > self.options.delta_after_iterations {
            if self.options.zigzag && self.at_bound_in_direction() {
                self.delta = -self.delta;
            }
            self.value = (self.value + self.delta)
                .clamp(self.options.min_value, self.options.max_value);
        }
    }

    fn value(&self) -> i64 {
        self.value
    }
}
