//! Weekday numbering conversions.
//!
//! Habits number weekdays Monday=1 through Sunday=7. Platform calendars
//! commonly number them Sunday=1 through Saturday=7. Every conversion between
//! the two, and between either and [`chrono::Weekday`], goes through here.

use chrono::Weekday;

/// Habit-native number (Monday=1..Sunday=7) for a chrono weekday.
pub fn habit_weekday(weekday: Weekday) -> u8 {
    weekday.number_from_monday() as u8
}

/// Chrono weekday for a habit-native number, `None` outside 1..=7.
pub fn weekday_from_habit(number: u8) -> Option<Weekday> {
    match number {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Convert a calendar-native number (Sunday=1..Saturday=7) to habit-native.
pub fn habit_from_calendar_weekday(calendar: u8) -> Option<u8> {
    match calendar {
        1 => Some(7),
        2..=7 => Some(calendar - 1),
        _ => None,
    }
}

/// Convert a habit-native number to calendar-native (Sunday=1..Saturday=7).
pub fn calendar_from_habit_weekday(habit: u8) -> Option<u8> {
    match habit {
        7 => Some(1),
        1..=6 => Some(habit + 1),
        _ => None,
    }
}

/// Plural English name used in user-facing explanations ("Mondays").
pub fn plural_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mondays",
        Weekday::Tue => "Tuesdays",
        Weekday::Wed => "Wednesdays",
        Weekday::Thu => "Thursdays",
        Weekday::Fri => "Fridays",
        Weekday::Sat => "Saturdays",
        Weekday::Sun => "Sundays",
    }
}
