//! Pure slot arithmetic: candidate-slot generation and occupancy
//! resolution. No I/O here; the availability and booking services feed
//! this module date-scoped rows and interpret the results.

use crate::models::ScheduleConfig;
use chrono::{NaiveTime, Timelike};
use std::collections::HashSet;

/// An appointment reduced to what occupancy needs: start slot and
/// total service duration.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentSpan {
    pub start: NaiveTime,
    pub duration_minutes: u32,
}

/// A blocked window reduced to times. `end = None` is a single-slot
/// block; otherwise the half-open range `[start, end)`.
#[derive(Debug, Clone, Copy)]
pub struct BlockSpan {
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
}

impl BlockSpan {
    /// Whether this block covers the given slot start.
    pub fn covers(&self, slot: NaiveTime) -> bool {
        match self.end {
            Some(end) => self.start <= slot && slot < end,
            None => self.start == slot,
        }
    }
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Number of grid slots a service duration occupies, rounded up.
pub fn slots_needed(duration_minutes: u32, slot_duration_minutes: u32) -> u32 {
    if slot_duration_minutes == 0 {
        return 0;
    }
    (duration_minutes + slot_duration_minutes - 1) / slot_duration_minutes
}

/// The grid slot times an appointment span occupies, regardless of
/// whether they exist on the day's base grid. Callers intersect with
/// the base slots, which clamps durations extending past closing.
pub fn span_slots(span: AppointmentSpan, slot_duration_minutes: u32) -> Vec<NaiveTime> {
    let needed = slots_needed(span.duration_minutes.max(1), slot_duration_minutes);
    let start = minutes_of(span.start);

    (0..needed)
        .filter_map(|i| time_from_minutes(start + i * slot_duration_minutes))
        .collect()
}

/// Generate the ordered candidate slots for a day.
///
/// Starts at opening, steps by the slot duration while strictly before
/// closing, and skips slots starting inside [break_start, break_end).
/// A partial trailing slot is excluded by the strict bound; an empty
/// break (break_start == break_end) skips nothing.
pub fn generate_slots(config: &ScheduleConfig) -> Vec<NaiveTime> {
    let step = config.slot_duration_minutes;
    if step == 0 {
        return Vec::new();
    }

    let opening = minutes_of(config.opening_time);
    let closing = minutes_of(config.closing_time);
    let break_start = minutes_of(config.break_start);
    let break_end = minutes_of(config.break_end);

    let mut slots = Vec::new();
    let mut cursor = opening;
    while cursor < closing {
        if !(cursor >= break_start && cursor < break_end) {
            if let Some(slot) = time_from_minutes(cursor) {
                slots.push(slot);
            }
        }
        cursor += step;
    }

    slots
}

/// Union of appointment occupancy (duration-aware) and block occupancy
/// over the day's base slots.
///
/// Appointment slots not present in `base_slots` are ignored, which
/// clamps services whose duration would run past closing time. Blocks
/// occupy the single matching slot or every base slot inside their
/// half-open range.
pub fn resolve_occupied(
    base_slots: &[NaiveTime],
    appointments: &[AppointmentSpan],
    blocks: &[BlockSpan],
    slot_duration_minutes: u32,
) -> HashSet<NaiveTime> {
    let base: HashSet<NaiveTime> = base_slots.iter().copied().collect();
    let mut occupied = HashSet::new();

    for span in appointments {
        for slot in span_slots(*span, slot_duration_minutes) {
            if base.contains(&slot) {
                occupied.insert(slot);
            }
        }
    }

    for block in blocks {
        for slot in base_slots {
            if block.covers(*slot) {
                occupied.insert(*slot);
            }
        }
    }

    occupied
}
