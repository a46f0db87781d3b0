//! Multi-octave fractal parameters shared by fBm and fractal domain warp.

use serde::{Deserialize, Serialize};

/// Configuration for multi-octave fractal summation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of octaves (at least 1).
    pub octaves: u8,
    /// Amplitude decay per octave.
    pub gain: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            gain: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl FractalNoiseConfig {
    pub fn new(gain: f32, octaves: u8, lacunarity: f32) -> Self {
        Self { octaves, gain, lacunarity }
    }

    /// Returns `(amplitude, frequency)` for every octave.
    pub fn octave_weights(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        (0..self.octaves.max(1)).scan((1.0f32, 1.0f32), |state, _| {
            let current = *state;
            state.0 *= self.gain;
            state.1 *= self.lacunarity;
            Some(current)
        })
    }

    /// Sum of octave amplitudes, used to normalize fBm back to roughly `[-1, 1]`.
    pub fn amplitude_bound(&self) -> f32 {
        self.octave_weights().map(|(amp, _)| amp).sum()
    }
}
