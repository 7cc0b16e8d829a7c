//! Plain-text rendering of generated schedules.

use crate::generator::Schedule;
use std::fmt::Write;

/// Renders a numbered listing of schedules.
///
/// Each meeting is one line: day, time range, section and room. With
/// `verbose`, instructor contact details follow each meeting.
pub fn render(schedules: &[Schedule], verbose: bool) -> String {
    let mut out = String::new();

    if schedules.is_empty() {
        out.push_str("No schedules found.\n");
        return out;
    }

    for (i, schedule) in schedules.iter().enumerate() {
        let _ = writeln!(out, "Schedule {}:", i + 1);

        for row in schedule.scheduled_meetings() {
            let label = if row.course == row.section {
                row.course.to_string()
            } else {
                format!("{} {}", row.course, row.section)
            };
            let _ = writeln!(
                out,
                "  {:<10} {}-{}  {:<16} {}",
                row.day, row.start, row.end, label, row.location
            );

            if verbose {
                for instructor in row.instructors {
                    let _ = writeln!(
                        out,
                        "      {} <{}> {}",
                        instructor.name,
                        instructor.email.as_deref().unwrap_or("no email"),
                        instructor.office.as_deref().unwrap_or("")
                    );
                }
            }
        }

        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Instructor, Section};
    use chrono::{NaiveTime, Weekday};

    fn sample() -> Schedule {
        let mut section = Section::synthetic(
            "CSE 100",
            &[Weekday::Mon],
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 50, 0).unwrap(),
        );
        section.code = "A00".to_string();
        section.meetings[0].location = "CENTR 101".to_string();
        section.instructors.push(Instructor {
            name: "Doe, Jane".to_string(),
            email: Some("jdoe@ucsd.edu".to_string()),
            office: Some("CSE 4102".to_string()),
        });
        Schedule::new(vec![section])
    }

    #[test]
    fn test_render_compact() {
        let text = render(&[sample()], false);

        assert!(text.starts_with("Schedule 1:\n"));
        assert!(text.contains("Monday"));
        assert!(text.contains("09:00-09:50"));
        assert!(text.contains("CSE 100 A00"));
        assert!(text.contains("CENTR 101"));
        assert!(!text.contains("jdoe@ucsd.edu"));
    }

    #[test]
    fn test_render_verbose_lists_instructors() {
        let text = render(&[sample()], true);

        assert!(text.contains("Doe, Jane <jdoe@ucsd.edu> CSE 4102"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[], false), "No schedules found.\n");
    }
}
