use crate::core::Result;
use crate::records::{MeetingDay, Member, Record};
use crate::storage::Table;
use chrono::{Datelike, NaiveDate};

/// A named entry whose date falls inside a look-ahead window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingDate {
    pub name: String,
    pub date: NaiveDate,
    pub days_away: i64,
}

/// Members whose birthday this calendar year falls in
/// `[today, today + horizon_days]`.
///
/// Birthdays already past this year are excluded; the window does not roll
/// over into next year.
pub fn upcoming_birthdays(members: &Table, today: NaiveDate, horizon_days: u32) -> Result<Vec<UpcomingDate>> {
    let mut upcoming = Vec::new();
    for row in members.rows() {
        let member = Member::from_row(row)?;
        if let Some(birthday) = member.birthday_in(today.year())
            && let Some(entry) = within(member.name, birthday, today, horizon_days)
        {
            upcoming.push(entry);
        }
    }
    Ok(upcoming)
}

/// Meeting days whose next occurrence falls in `[today, today + horizon_days]`.
pub fn upcoming_meeting_days(days: &Table, today: NaiveDate, horizon_days: u32) -> Result<Vec<UpcomingDate>> {
    let mut upcoming = Vec::new();
    for row in days.rows() {
        let day = MeetingDay::from_row(row)?;
        if let Some(next) = day.next_occurrence(today)
            && let Some(entry) = within(day.name, next, today, horizon_days)
        {
            upcoming.push(entry);
        }
    }
    Ok(upcoming)
}

fn within(name: String, date: NaiveDate, today: NaiveDate, horizon_days: u32) -> Option<UpcomingDate> {
    let days_away = (date - today).num_days();
    (0..=i64::from(horizon_days))
        .contains(&days_away)
        .then_some(UpcomingDate { name, date, days_away })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::schema::{EntityType, SchemaRegistry};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn members(dobs: &[(&str, NaiveDate)]) -> Table {
        let mut table = Table::new(SchemaRegistry::schema(EntityType::Member).clone());
        for (name, dob) in dobs {
            table.push(vec![
                Value::from(*name),
                Value::Date(*dob),
                Value::from(""),
                Value::from(""),
                Value::from("Male"),
                Value::from("Adult"),
            ]);
        }
        table
    }

    #[test]
    fn test_birthday_inside_window() {
        let table = members(&[("Ada", ymd(1990, 6, 15))]);
        let upcoming = upcoming_birthdays(&table, ymd(2024, 6, 1), 30).unwrap();
        assert_eq!(
            upcoming,
            vec![UpcomingDate { name: "Ada".into(), date: ymd(2024, 6, 15), days_away: 14 }]
        );
    }

    #[test]
    fn test_past_birthday_does_not_roll_over() {
        let table = members(&[("Bola", ymd(1990, 5, 1))]);
        assert!(upcoming_birthdays(&table, ymd(2024, 6, 1), 30).unwrap().is_empty());

        // Early-January birthdays are not visible from late December.
        let table = members(&[("Chi", ymd(1985, 1, 3))]);
        assert!(upcoming_birthdays(&table, ymd(2024, 12, 20), 30).unwrap().is_empty());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let table = members(&[("Today", ymd(2000, 6, 1)), ("Edge", ymd(2000, 7, 1)), ("Out", ymd(2000, 7, 2))]);
        let names: Vec<_> = upcoming_birthdays(&table, ymd(2024, 6, 1), 30)
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Today", "Edge"]);
    }

    #[test]
    fn test_upcoming_meeting_days() {
        let mut table = Table::new(SchemaRegistry::schema(EntityType::MeetingDay).clone());
        for name in ["Sunday", "2024-06-20", "2024-05-01", "2024-08-01", "Harvest"] {
            table.push(vec![Value::from(name)]);
        }

        let upcoming = upcoming_meeting_days(&table, ymd(2024, 6, 1), 30).unwrap();
        assert_eq!(
            upcoming,
            vec![
                UpcomingDate { name: "Sunday".into(), date: ymd(2024, 6, 2), days_away: 1 },
                UpcomingDate { name: "2024-06-20".into(), date: ymd(2024, 6, 20), days_away: 19 },
            ]
        );
    }
}
