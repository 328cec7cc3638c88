//! Pure display formatting over the service's wire strings.

use chrono::{NaiveDate, NaiveTime};

use shared::domain::{EmployeeRecord, ScheduleEntry};

use crate::{error::ValidationError, EmployeeRow, ScheduleRow};

/// Fixed en-US rendering: abbreviated weekday, abbreviated month, day, year
/// (`"2024-01-15"` -> `"Mon, Jan 15, 2024"`). Unparseable input propagates.
pub fn format_date(iso_date: &str) -> Result<String, ValidationError> {
    let date = NaiveDate::parse_from_str(iso_date, "%Y-%m-%d")
        .map_err(|_| ValidationError::Date(iso_date.to_string()))?;
    Ok(date.format("%a, %b %-d, %Y").to_string())
}

/// Duration between two same-day clock times, in hours. A shift whose end is
/// at or before its start is treated as crossing midnight and wraps forward.
pub fn compute_duration_hours(start: &str, end: &str) -> Result<f64, ValidationError> {
    let start = parse_clock_time(start)?;
    let end = parse_clock_time(end)?;
    let mut minutes = (end - start).num_minutes();
    if minutes <= 0 {
        minutes += 24 * 60;
    }
    Ok(minutes as f64 / 60.0)
}

pub fn format_time_range(start: &str, end: &str) -> String {
    format!("{start} - {end}")
}

pub fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

fn parse_clock_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ValidationError::Time(value.to_string()))
}

/// Display form of one schedule entry; malformed fields propagate rather than
/// rendering blank.
pub fn schedule_row(entry: &ScheduleEntry) -> Result<ScheduleRow, ValidationError> {
    Ok(ScheduleRow {
        date: format_date(&entry.date)?,
        day: entry.day.clone(),
        time_range: format_time_range(&entry.start_time, &entry.end_time),
        hours: compute_duration_hours(&entry.start_time, &entry.end_time)?,
    })
}

pub fn employee_row(record: &EmployeeRecord) -> EmployeeRow {
    EmployeeRow {
        username: record.username.clone(),
        name: full_name(&record.first_name, &record.last_name),
        email: record.email.clone(),
        role: record.role,
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::Role;

    use super::*;

    #[test]
    fn formats_weekday_qualified_us_date() {
        assert_eq!(format_date("2024-01-15").expect("format"), "Mon, Jan 15, 2024");
    }

    #[test]
    fn single_digit_days_are_not_padded() {
        assert_eq!(format_date("2024-03-05").expect("format"), "Tue, Mar 5, 2024");
    }

    #[test]
    fn rejects_unparseable_date_loudly() {
        assert_eq!(
            format_date("01/15/2024"),
            Err(ValidationError::Date("01/15/2024".to_string()))
        );
    }

    #[test]
    fn computes_eight_hour_day_shift() {
        assert_eq!(compute_duration_hours("09:00", "17:00").expect("hours"), 8.0);
    }

    #[test]
    fn closing_shift_wraps_past_midnight() {
        assert_eq!(compute_duration_hours("16:00", "00:00").expect("hours"), 8.0);
    }

    #[test]
    fn half_hours_survive_the_division() {
        assert_eq!(compute_duration_hours("09:30", "17:00").expect("hours"), 7.5);
    }

    #[test]
    fn rejects_unparseable_time_loudly() {
        assert_eq!(
            compute_duration_hours("9am", "17:00"),
            Err(ValidationError::Time("9am".to_string()))
        );
    }

    #[test]
    fn schedule_row_formats_every_field() {
        let entry = ScheduleEntry {
            date: "2024-01-15".to_string(),
            day: "Monday".to_string(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
        };
        let row = schedule_row(&entry).expect("row");
        assert_eq!(row.date, "Mon, Jan 15, 2024");
        assert_eq!(row.time_range, "09:00 - 17:00");
        assert_eq!(row.hours, 8.0);
    }

    #[test]
    fn employee_row_joins_name_parts() {
        let record = EmployeeRecord {
            username: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            role: Role::Employee,
        };
        let row = employee_row(&record);
        assert_eq!(row.name, "Jane Doe");
        assert_eq!(row.role, Role::Employee);
    }
}
