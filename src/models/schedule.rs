use chrono::{NaiveTime, Weekday};
use serde::Serialize;
use std::collections::HashSet;

/// Operating-hours snapshot for one availability computation.
///
/// Loaded from the settings table on every request and treated as
/// immutable for the duration of the computation, so configuration
/// changes are visible to the next request without any cache
/// invalidation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
    pub slot_duration_minutes: u32,
    pub working_days: HashSet<Weekday>,
}

impl Default for ScheduleConfig {
    /// Documented fallback used when schedule settings are missing:
    /// 08:00-18:00, lunch break 12:00-13:00, 30-minute slots, Mon-Sat.
    fn default() -> Self {
        Self {
            opening_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            closing_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            break_start: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
            break_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_duration_minutes: 30,
            working_days: [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl ScheduleConfig {
    /// Check the structural invariant:
    /// opening < break_start <= break_end < closing, slot duration > 0.
    pub fn validate(&self) -> Result<(), String> {
        if self.slot_duration_minutes == 0 {
            return Err("slot_duration_minutes must be greater than zero".to_string());
        }
        if self.opening_time >= self.closing_time {
            return Err("opening_time must be before closing_time".to_string());
        }
        if self.break_start > self.break_end {
            return Err("break_start must not be after break_end".to_string());
        }
        if self.break_start <= self.opening_time || self.break_end >= self.closing_time {
            return Err("break interval must fall strictly inside operating hours".to_string());
        }
        Ok(())
    }
}

/// Parse a "HH:MM" time-of-day value.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Format a time-of-day back to the "HH:MM" wire/storage form.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Map a lowercase English day name to a weekday.
///
/// Comparison happens on enum values, never on locale-formatted day
/// strings, so the engine is immune to locale configuration.
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parse a comma-separated working-days setting ("monday,tuesday,...").
/// Unknown names are ignored rather than failing the whole computation.
pub fn parse_working_days(value: &str) -> HashSet<Weekday> {
    value.split(',').filter_map(weekday_from_name).collect()
}

pub fn format_working_days(days: &HashSet<Weekday>) -> String {
    let mut names: Vec<&str> = days.iter().copied().map(weekday_name).collect();
    names.sort_by_key(|name| {
        [
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
            "sunday",
        ]
        .iter()
        .position(|candidate| candidate == name)
    });
    names.join(",")
}

/// Bookable slots for one date. Transient, recomputed per request.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: String,
    pub slots: Vec<String>,
    pub closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
