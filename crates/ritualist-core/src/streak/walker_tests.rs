//! Tests for the streak walker.

use super::*;
use chrono::TimeZone;
use chrono_tz::America::Los_Angeles;
use chrono_tz::UTC;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn logs_on_days(habit: &Habit, days: &[(i32, u32, u32)]) -> Vec<HabitLog> {
    days.iter()
        .map(|&(y, m, d)| HabitLog::new(habit.id, noon(y, m, d), Some(1.0)))
        .collect()
}

fn january(days: impl IntoIterator<Item = u32>) -> Vec<(i32, u32, u32)> {
    days.into_iter().map(|d| (2025, 1, d)).collect()
}

fn strict() -> StreakWalker {
    StreakWalker::with_config(StreakConfig {
        grace_policy: GracePolicy::Strict,
        ..Default::default()
    })
}

#[test]
fn daily_streak_stops_at_missing_day() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 1));
    let mut days = january([1, 2, 3]);
    days.extend(january(5..=10));
    let logs = logs_on_days(&habit, &days);

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 10), UTC), 6);
}

#[test]
fn unscheduled_days_are_skipped() {
    let habit = Habit::binary(
        "Run",
        HabitSchedule::days_of_week([1, 3, 5]),
        date(2025, 1, 1),
    );
    // Mon/Wed/Fri of the weeks starting 2025-01-06, 13 and 20
    let logs = logs_on_days(&habit, &january([6, 8, 10, 13, 15, 17, 20, 22, 24]));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 24), UTC), 9);
    // Viewing on the following Sunday changes nothing
    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 26), UTC), 9);
}

#[test]
fn unfinished_today_does_not_break_by_default() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 1));
    let logs = logs_on_days(&habit, &january(5..=9));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 10), UTC), 5);
    assert_eq!(
        strict().current_streak(&habit, &logs, noon(2025, 1, 10), UTC),
        0
    );
}

#[test]
fn missed_yesterday_breaks_under_any_policy() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 1));
    let logs = logs_on_days(&habit, &january(5..=8));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 10), UTC), 0);
    assert_eq!(
        strict().current_streak(&habit, &logs, noon(2025, 1, 10), UTC),
        0
    );
}

#[test]
fn walk_stops_at_start_date() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 5));
    let logs = logs_on_days(&habit, &january(5..=10));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 10), UTC), 6);
    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 4), UTC), 0);
}

#[test]
fn walk_respects_lookback_cap() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 1));
    let logs = logs_on_days(&habit, &january(1..=10));
    let walker = StreakWalker::with_config(StreakConfig {
        max_lookback_days: 3,
        ..Default::default()
    });

    assert_eq!(walker.current_streak(&habit, &logs, noon(2025, 1, 10), UTC), 3);
    assert_eq!(walker.longest_streak(&habit, &logs, noon(2025, 1, 10), UTC), 3);
}

#[test]
fn days_after_end_date_are_skipped() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 1))
        .with_end_date(date(2025, 1, 8));
    let logs = logs_on_days(&habit, &january(5..=8));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 12), UTC), 4);
}

#[test]
fn numeric_streak_needs_full_target() {
    let habit = Habit::numeric("Water", 10.0, HabitSchedule::Daily, date(2025, 1, 1));
    let logs = vec![
        HabitLog::new(habit.id, noon(2025, 1, 8), Some(9.999)),
        HabitLog::new(habit.id, noon(2025, 1, 9), Some(6.0)),
        HabitLog::new(habit.id, noon(2025, 1, 9), Some(4.0)),
        HabitLog::new(habit.id, noon(2025, 1, 10), Some(12.0)),
    ];

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 10), UTC), 2);
}

#[test]
fn times_per_week_counts_logged_days_of_met_weeks() {
    let habit = Habit::binary(
        "Gym",
        HabitSchedule::TimesPerWeek { target: 3 },
        date(2025, 1, 1),
    );
    // Week of Jan 6: Mon/Wed/Fri. Week of Jan 13: Tue/Thu/Sat.
    let logs = logs_on_days(&habit, &january([6, 8, 10, 14, 16, 18]));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 19), UTC), 6);
    assert_eq!(
        strict().current_streak(&habit, &logs, noon(2025, 1, 19), UTC),
        6
    );
}

#[test]
fn times_per_week_in_progress_week_is_lenient_while_reachable() {
    let habit = Habit::binary(
        "Gym",
        HabitSchedule::TimesPerWeek { target: 3 },
        date(2025, 1, 1),
    );
    let logs = logs_on_days(&habit, &january([6, 8, 10, 13]));

    // Wednesday the 15th: one of three done, five days still open
    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 15), UTC), 4);
}

#[test]
fn times_per_week_in_progress_week_breaks_once_unreachable() {
    let habit = Habit::binary(
        "Gym",
        HabitSchedule::TimesPerWeek { target: 3 },
        date(2025, 1, 1),
    );
    let logs = logs_on_days(&habit, &january([6, 8, 10, 18]));

    // Sunday the 19th: one done, only today left, the quota is out of reach
    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 19), UTC), 1);
}

#[test]
fn times_per_week_ignores_logs_after_reference_day() {
    let habit = Habit::binary(
        "Gym",
        HabitSchedule::TimesPerWeek { target: 5 },
        date(2025, 1, 1),
    );
    let logs = logs_on_days(&habit, &january([6, 7, 8, 9, 10, 13]));
    let friday = noon(2025, 1, 17);

    // Friday the 17th: one of five done, Friday to Sunday left
    assert_eq!(current_streak(&habit, &logs, friday, UTC), 0);

    // Weekend logs recorded later do not rewrite Friday's answer
    let backfilled = logs_on_days(&habit, &january([6, 7, 8, 9, 10, 13, 18, 19]));
    assert_eq!(current_streak(&habit, &backfilled, friday, UTC), 0);
    assert_eq!(
        strict().current_streak(&habit, &backfilled, friday, UTC),
        strict().current_streak(&habit, &logs, friday, UTC)
    );
}

#[test]
fn times_per_week_missed_week_breaks_at_its_boundary() {
    let habit = Habit::binary(
        "Gym",
        HabitSchedule::TimesPerWeek { target: 3 },
        date(2025, 1, 1),
    );
    let logs = logs_on_days(&habit, &january([6, 8, 13, 14, 15]));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 19), UTC), 3);
}

#[test]
fn times_per_week_first_week_target_is_prorated() {
    // Starts on Saturday; only two days exist in its first week
    let habit = Habit::binary(
        "Gym",
        HabitSchedule::TimesPerWeek { target: 3 },
        date(2025, 1, 11),
    );
    let logs = logs_on_days(&habit, &january([11, 12, 13, 15, 17]));

    assert_eq!(current_streak(&habit, &logs, noon(2025, 1, 19), UTC), 5);
}

#[test]
fn log_timezone_places_days_for_travelers() {
    let habit = Habit::binary("Stretch", HabitSchedule::Daily, date(2025, 1, 4));
    let logs = vec![
        // 01:00 on Jan 5 in Tokyo, still Jan 4 in Los Angeles
        HabitLog::new(habit.id, Utc.with_ymd_and_hms(2025, 1, 4, 16, 0, 0).unwrap(), Some(1.0))
            .with_timezone("Asia/Tokyo"),
        // 09:00 on Jan 6 in Los Angeles
        HabitLog::new(habit.id, Utc.with_ymd_and_hms(2025, 1, 6, 17, 0, 0).unwrap(), Some(1.0))
            .with_timezone("America/Los_Angeles"),
    ];
    let as_of = Utc.with_ymd_and_hms(2025, 1, 6, 20, 0, 0).unwrap();

    assert_eq!(current_streak(&habit, &logs, as_of, Los_Angeles), 2);

    // Read in the viewer's timezone instead, the Tokyo log lands on Jan 4
    let unzoned: Vec<HabitLog> = logs
        .into_iter()
        .map(|mut log| {
            log.timezone = None;
            log
        })
        .collect();
    assert_eq!(current_streak(&habit, &unzoned, as_of, Los_Angeles), 1);
}

#[test]
fn status_reports_at_risk_streak() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 1));
    let mut days = january([1, 2, 3]);
    days.extend(january(5..=9));
    let logs = logs_on_days(&habit, &days);

    let status = streak_status(&habit, &logs, noon(2025, 1, 10), UTC);
    assert_eq!(status.current_streak_length, 5);
    assert!(status.is_active);
    assert_eq!(
        status.last_qualifying_day.map(|day| day.date()),
        Some(date(2025, 1, 9))
    );
    assert_eq!(status.longest_streak, 5);
    assert!(status.scheduled_today);
    assert!(!status.completed_today);
    assert!(status.is_at_risk());
}

#[test]
fn status_tracks_longest_streak_separately() {
    let habit = Habit::binary("Journal", HabitSchedule::Daily, date(2025, 1, 1));
    let mut days = january(1..=7);
    days.extend(january([9, 10]));
    let logs = logs_on_days(&habit, &days);

    let status = streak_status(&habit, &logs, noon(2025, 1, 10), UTC);
    assert_eq!(status.current_streak_length, 2);
    assert_eq!(status.longest_streak, 7);
    assert!(status.completed_today);
    assert!(!status.is_at_risk());
}

#[test]
fn status_without_logs_is_inactive() {
    let habit = Habit::binary("Journal", HabitSchedule::days_of_week([1]), date(2025, 1, 1));
    // 2025-01-07 is a Tuesday
    let status = streak_status(&habit, &[], noon(2025, 1, 7), UTC);
    assert_eq!(status.current_streak_length, 0);
    assert!(!status.is_active);
    assert_eq!(status.last_qualifying_day, None);
    assert_eq!(status.longest_streak, 0);
    assert!(!status.scheduled_today);
}
