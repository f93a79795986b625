//! Accuracy to generation-parameter mapping
//!
//! Maps the user-facing 0-100 accuracy slider onto the sampling controls a
//! llama-style backend understands. Higher accuracy raises temperature; the
//! direction is part of the backend contract and kept as is.

use serde::{Deserialize, Serialize};

pub const ACCURACY_MIN: f64 = 0.0;
pub const ACCURACY_MAX: f64 = 100.0;

const TEMPERATURE_RANGE: (f64, f64) = (0.5, 0.9);
const TOP_K_RANGE: (f64, f64) = (10.0, 100.0);
const REPEAT_PENALTY_RANGE: (f64, f64) = (1.0, 1.5);
const NUM_CTX_RANGE: (f64, f64) = (1024.0, 4096.0);
const NUM_PREDICT: u32 = 50;

/// Backend sampling controls derived from accuracy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub temperature: f64,
    pub top_k: u32,
    pub repeat_penalty: f64,
    /// 0 = off, 1 = Mirostat, 2 = Mirostat 2.0
    pub mirostat: u8,
    pub num_ctx: u32,
    pub num_predict: u32,
}

/// Clamp accuracy into `[0, 100]`; NaN counts as 0
pub fn clamp_accuracy(accuracy: f64) -> f64 {
    if accuracy.is_nan() {
        return ACCURACY_MIN;
    }
    accuracy.clamp(ACCURACY_MIN, ACCURACY_MAX)
}

fn lerp((from, to): (f64, f64), t: f64) -> f64 {
    from + (to - from) * t
}

fn mirostat_for(accuracy: f64) -> u8 {
    if accuracy < 34.0 {
        0
    } else if accuracy <= 66.0 {
        1
    } else {
        2
    }
}

/// Derive generation parameters from an accuracy value
///
/// Out-of-range input is clamped first, so every output stays within the
/// documented bounds.
pub fn map_accuracy_to_parameters(accuracy: f64) -> GenerationParameters {
    let accuracy = clamp_accuracy(accuracy);
    let t = accuracy / ACCURACY_MAX;

    GenerationParameters {
        temperature: lerp(TEMPERATURE_RANGE, t),
        top_k: lerp(TOP_K_RANGE, t).round() as u32,
        repeat_penalty: lerp(REPEAT_PENALTY_RANGE, t),
        mirostat: mirostat_for(accuracy),
        num_ctx: lerp(NUM_CTX_RANGE, t).round() as u32,
        num_predict: NUM_PREDICT,
    }
}
