//! Density-driven light-show synthesis for maps that ship without lighting.
//!
//! Notes are grouped into clusters of identical timestamps. Each cluster lights
//! the lasers according to which colors it contains and where they sit, and the
//! laser rotation speed follows how many clusters fall within a short window.

use std::collections::HashMap;

use crate::map::Note;

/// Note type of a left-hand (red) cut.
pub const RED_NOTE: i64 = 0;

/// Note type of a right-hand (blue) cut.
pub const BLUE_NOTE: i64 = 1;

pub const LIGHT_OFF: u8 = 0;
pub const LIGHT_BLUE_ON: u8 = 3;
pub const LIGHT_RED_ON: u8 = 7;

/// Number of note columns in the playfield.
const COLUMNS: usize = 4;

/// Half-width, in beats, of the window used to measure cluster density.
const DENSITY_WINDOW: f64 = 2.0;

const MIN_ROTATION_SPEED: usize = 1;
const MAX_ROTATION_SPEED: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    BackLasers = 0,
    RingLights = 1,
    LeftLasers = 2,
    RightLasers = 3,
    LeftRotationSpeed = 12,
    RightRotationSpeed = 13,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEvent {
    pub time: f64,
    pub kind: EventKind,
    pub value: u8,
}

impl LightEvent {
    fn new(time: f64, kind: EventKind, value: u8) -> Self {
        Self { time, kind, value }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ColumnNotes {
    red: bool,
    blue: bool,
}

impl ColumnNotes {
    fn is_occupied(&self) -> bool {
        self.red || self.blue
    }
}

/// Notes sharing one timestamp.
#[derive(Debug, Clone)]
struct Cluster {
    time: f64,
    columns: [ColumnNotes; COLUMNS],
}

impl Cluster {
    fn new(time: f64) -> Self {
        Self {
            time,
            columns: [ColumnNotes::default(); COLUMNS],
        }
    }

    fn add(&mut self, column: usize, note_type: i64) {
        let slot = &mut self.columns[column];
        if note_type == RED_NOTE {
            slot.red = true;
        } else {
            slot.blue = true;
        }
    }

    fn occupied(&self) -> Vec<(usize, ColumnNotes)> {
        self.columns
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, column)| column.is_occupied())
            .collect()
    }

    fn has_red(&self) -> bool {
        self.columns.iter().any(|c| c.red)
    }

    fn has_blue(&self) -> bool {
        self.columns.iter().any(|c| c.blue)
    }

    /// Light events for this cluster. `last_main_red` carries the alternation
    /// state between clusters.
    fn light_events(&self, last_main_red: &mut bool) -> Vec<LightEvent> {
        let occupied = self.occupied();
        let time = self.time;

        if self.has_red() != self.has_blue() {
            let value = if self.has_red() {
                LIGHT_RED_ON
            } else {
                LIGHT_BLUE_ON
            };
            if occupied.len() == 1 {
                let kind = if occupied[0].0 <= 1 {
                    EventKind::LeftLasers
                } else {
                    EventKind::RightLasers
                };
                return vec![LightEvent::new(time, kind, value)];
            }
            *last_main_red = self.has_red();
            return [
                EventKind::BackLasers,
                EventKind::RingLights,
                EventKind::LeftLasers,
                EventKind::RightLasers,
            ]
            .into_iter()
            .map(|kind| LightEvent::new(time, kind, value))
            .collect();
        }

        let back = if *last_main_red {
            LIGHT_RED_ON
        } else {
            LIGHT_BLUE_ON
        };
        *last_main_red = !*last_main_red;

        let (left, right) = if occupied.len() == 1 {
            if *last_main_red {
                (LIGHT_RED_ON, LIGHT_BLUE_ON)
            } else {
                (LIGHT_BLUE_ON, LIGHT_RED_ON)
            }
        } else {
            let first = occupied[0].1;
            let last = occupied[occupied.len() - 1].1;
            if first.red && last.blue {
                (LIGHT_RED_ON, LIGHT_BLUE_ON)
            } else if first.blue && last.red {
                (LIGHT_BLUE_ON, LIGHT_RED_ON)
            } else {
                (LIGHT_OFF, LIGHT_OFF)
            }
        };

        vec![
            LightEvent::new(time, EventKind::BackLasers, back),
            LightEvent::new(time, EventKind::RingLights, back),
            LightEvent::new(time, EventKind::LeftLasers, left),
            LightEvent::new(time, EventKind::RightLasers, right),
        ]
    }
}

/// Group cut notes by exact timestamp, in order of first appearance.
///
/// Bombs and other non-cut types are ignored, as are notes outside the four
/// standard columns.
fn cluster_notes(notes: &[Note]) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut index_by_time: HashMap<u64, usize> = HashMap::new();

    for note in notes {
        if note.note_type != RED_NOTE && note.note_type != BLUE_NOTE {
            continue;
        }
        let Some(column) = usize::try_from(note.column).ok().filter(|c| *c < COLUMNS) else {
            continue;
        };
        // -0.0 and 0.0 are the same beat.
        let time = if note.time == 0.0 { 0.0 } else { note.time };
        let index = *index_by_time.entry(time.to_bits()).or_insert_with(|| {
            clusters.push(Cluster::new(time));
            clusters.len() - 1
        });
        clusters[index].add(column, note.note_type);
    }

    clusters
}

fn rotation_speed(time: f64, clusters: &[Cluster]) -> u8 {
    let nearby = clusters
        .iter()
        .filter(|other| (other.time - time).abs() <= DENSITY_WINDOW)
        .count();
    nearby.clamp(MIN_ROTATION_SPEED, MAX_ROTATION_SPEED) as u8
}

/// Build a complete event list for `notes`.
///
/// Rotation-speed changes are emitted as a left/right pair directly before the
/// light events of the cluster where the speed changes.
pub fn synthesize(notes: &[Note]) -> Vec<LightEvent> {
    let clusters = cluster_notes(notes);
    let mut events = Vec::new();
    let mut last_main_red = false;
    let mut current_speed: Option<u8> = None;

    for cluster in &clusters {
        let lights = cluster.light_events(&mut last_main_red);

        let speed = rotation_speed(cluster.time, &clusters);
        if current_speed != Some(speed) {
            current_speed = Some(speed);
            events.push(LightEvent::new(cluster.time, EventKind::LeftRotationSpeed, speed));
            events.push(LightEvent::new(cluster.time, EventKind::RightRotationSpeed, speed));
        }
        events.extend(lights);
    }

    events
}
