//! Jump distance and reaction time.
//!
//! Notes spawn half a jump distance in front of the player and travel at the
//! note jump speed (NJS). The half jump, measured in beats, starts at four and
//! is halved until its length in units fits the game's limit; the start-beat
//! offset is then added and floored.

/// Half jump length (units) the game will not exceed.
pub const MAX_HALF_JUMP_DISTANCE: f64 = 17.999;

/// Half jump duration, in beats, before any halving.
pub const BASE_HALF_JUMP_BEATS: f64 = 4.0;

/// Smallest half jump, in beats, after the offset is applied.
pub const MIN_HALF_JUMP_BEATS: f64 = 0.25;

pub fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm
}

/// Half jump duration in beats before the start-beat offset is applied.
pub fn pre_offset_half_jump(bpm: f64, njs: f64) -> f64 {
    let units_per_beat = njs * seconds_per_beat(bpm);
    let mut half_jump = BASE_HALF_JUMP_BEATS;
    while units_per_beat * half_jump > MAX_HALF_JUMP_DISTANCE && half_jump > f64::MIN_POSITIVE {
        half_jump /= 2.0;
    }
    half_jump
}

/// Full jump distance in units.
pub fn jump_distance(bpm: f64, njs: f64, offset: f64) -> f64 {
    let half_jump = (pre_offset_half_jump(bpm, njs) + offset).max(MIN_HALF_JUMP_BEATS);
    njs * seconds_per_beat(bpm) * half_jump * 2.0
}

/// Time in milliseconds between a note spawning and reaching the player.
pub fn reaction_time_ms(jump_distance: f64, njs: f64) -> f64 {
    jump_distance / (2.0 * njs) * 1000.0
}

/// Jump distance that yields `reaction_time_ms` at the given speed.
pub fn jump_distance_for_reaction_time(reaction_time_ms: f64, njs: f64) -> f64 {
    reaction_time_ms * (2.0 * njs) / 1000.0
}

/// Start-beat offset that yields `reaction_time_ms` at a fixed tempo and speed.
pub fn offset_for_reaction_time(reaction_time_ms: f64, bpm: f64, njs: f64) -> f64 {
    let jump_distance = jump_distance_for_reaction_time(reaction_time_ms, njs);
    jump_distance / (njs * seconds_per_beat(bpm) * 2.0) - pre_offset_half_jump(bpm, njs)
}

/// Reaction time of a difficulty with the given parameters.
pub fn reaction_time_for(bpm: f64, njs: f64, offset: f64) -> f64 {
    reaction_time_ms(jump_distance(bpm, njs, offset), njs)
}

/// Whether the formulas are defined for these inputs.
pub fn is_valid_input(bpm: f64, njs: f64) -> bool {
    bpm.is_finite() && njs.is_finite() && bpm > 0.0 && njs > 0.0
}
