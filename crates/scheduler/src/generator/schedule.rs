//! A complete choice of one section per course.

use crate::catalog::{day_name, Instructor, Meeting, Section};
use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};

/// A goal schedule: one section for every course and buffer, with no
/// conflicts between them.
///
/// Two schedules are equal when their meetings, put in canonical order, read
/// the same. Which sections produced those meetings does not matter.
#[derive(Debug, Clone)]
pub struct Schedule {
    path: Vec<Section>,
    key: String,
}

/// A meeting together with the section it belongs to, for display.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledMeeting<'a> {
    pub course: &'a str,
    pub section: &'a str,
    pub day: &'static str,
    pub start: String,
    pub end: String,
    pub location: &'a str,
    #[serde(skip_serializing_if = "no_instructors")]
    pub instructors: &'a [Instructor],
}

impl Schedule {
    /// Creates a schedule from the chosen sections, in the order chosen.
    pub fn new(path: Vec<Section>) -> Self {
        let key = canonical_key(&path);
        Self { path, key }
    }

    /// The chosen sections, in the order the search picked them.
    pub fn path(&self) -> &[Section] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Every meeting of every chosen section, ordered by day of week
    /// (Sunday first) and then by start time.
    pub fn sorted_meetings(&self) -> Vec<(&Section, &Meeting)> {
        sort_meetings(&self.path)
    }

    /// Text form of [`Schedule::sorted_meetings`] used for equality.
    pub fn canonical_key(&self) -> &str {
        &self.key
    }

    /// Display rows for every meeting, in canonical order.
    pub fn scheduled_meetings(&self) -> Vec<ScheduledMeeting<'_>> {
        self.sorted_meetings()
            .into_iter()
            .map(|(section, meeting)| ScheduledMeeting {
                course: &section.course,
                section: &section.code,
                day: day_name(meeting.day),
                start: meeting.start.format("%H:%M").to_string(),
                end: meeting.end.format("%H:%M").to_string(),
                location: &meeting.location,
                instructors: &section.instructors,
            })
            .collect()
    }
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Schedule {}

impl Hash for Schedule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            sections: &'a [Section],
            meetings: Vec<ScheduledMeeting<'a>>,
        }

        View {
            sections: &self.path,
            meetings: self.scheduled_meetings(),
        }
        .serialize(serializer)
    }
}

fn no_instructors(list: &&[Instructor]) -> bool {
    list.is_empty()
}

fn sort_meetings(path: &[Section]) -> Vec<(&Section, &Meeting)> {
    let mut meetings: Vec<(&Section, &Meeting)> = path
        .iter()
        .flat_map(|s| s.meetings.iter().map(move |m| (s, m)))
        .collect();

    meetings.sort_by(|(_, a), (_, b)| {
        a.week_order()
            .cmp(&b.week_order())
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.location.cmp(&b.location))
    });
    meetings
}

fn canonical_key(path: &[Section]) -> String {
    sort_meetings(path)
        .iter()
        .map(|(_, m)| m.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn section(course: &str, code: &str, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> Section {
        let mut s = Section::synthetic(course, days, start, end);
        s.code = code.to_string();
        for m in &mut s.meetings {
            m.location = "PCYNH 106".to_string();
        }
        s
    }

    #[test]
    fn test_sorted_meetings_order() {
        let a = section("CSE 100", "A00", &[Weekday::Wed, Weekday::Mon], at(14, 0), at(15, 0));
        let b = section("MATH 20C", "A01", &[Weekday::Mon, Weekday::Sun], at(9, 0), at(10, 0));
        let schedule = Schedule::new(vec![a, b]);

        let order: Vec<(Weekday, NaiveTime)> = schedule
            .sorted_meetings()
            .iter()
            .map(|(_, m)| (m.day, m.start))
            .collect();

        assert_eq!(
            order,
            vec![
                (Weekday::Sun, at(9, 0)),
                (Weekday::Mon, at(9, 0)),
                (Weekday::Mon, at(14, 0)),
                (Weekday::Wed, at(14, 0)),
            ]
        );
    }

    #[test]
    fn test_equality_ignores_path_order_and_section_ids() {
        let a = section("CSE 100", "A00", &[Weekday::Tue], at(9, 0), at(10, 0));
        let b = section("MATH 20C", "A01", &[Weekday::Thu], at(9, 0), at(10, 0));
        let b_alias = section("MATH 20C", "B01", &[Weekday::Thu], at(9, 0), at(10, 0));

        let one = Schedule::new(vec![a.clone(), b]);
        let two = Schedule::new(vec![b_alias, a.clone()]);
        let three = Schedule::new(vec![a]);

        assert_eq!(one, two);
        assert_ne!(one, three);
    }

    #[test]
    fn test_serialize_includes_meetings() {
        let a = section("CSE 100", "A00", &[Weekday::Tue], at(9, 0), at(10, 0));
        let value = serde_json::to_value(Schedule::new(vec![a])).unwrap();

        assert_eq!(value["sections"][0]["code"], "A00");
        assert_eq!(value["meetings"][0]["day"], "Tuesday");
        assert_eq!(value["meetings"][0]["start"], "09:00");
        assert!(value["meetings"][0].get("instructors").is_none());
    }
}
