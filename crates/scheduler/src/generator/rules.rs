/// Turns rules and buffers into filtered courses and buffer pseudo-courses
use super::config::{Buffer, Rules};
use crate::catalog::{Course, Section};
use chrono::{NaiveTime, Weekday};
use tracing::{debug, warn};

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Course list after preprocessing
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Catalog courses and buffer pseudo-courses, fewest sections first
    pub courses: Vec<Course>,
    /// Names of courses left with no sections
    pub empty: Vec<String>,
}

/// Applies rules and buffers to the catalog courses.
///
/// Steps run in a fixed order: time/day exclusions, online filtering, layover
/// propagation, buffer injection, and finally an ascending sort by section
/// count. Buffer pseudo-courses are never filtered and never get a layover.
/// Running this again on its own output changes nothing.
///
/// # Arguments
/// * `courses` - Courses built from the catalog
/// * `rules` - Global rules (absent rules are skipped)
/// * `buffers` - Protected time blocks
///
/// # Returns
/// * `Preprocessed` - The working course list and any courses left empty
pub fn preprocess(courses: Vec<Course>, rules: &Rules, buffers: &[Buffer]) -> Preprocessed {
    let mut courses = courses;

    for (label, blocked) in rule_sections(rules) {
        courses = exclude_conflicting(courses, &label, &blocked);
    }

    if rules.allow_online == Some(false) {
        courses = exclude_online(courses);
    }

    if let Some(layover) = rules.layover {
        courses = apply_layover(courses, layover);
    }

    courses = inject_buffers(courses, buffers);
    sort_by_section_count(&mut courses);

    let empty: Vec<String> = courses
        .iter()
        .filter(|c| c.sections.is_empty())
        .map(|c| c.name.clone())
        .collect();

    Preprocessed { courses, empty }
}

/// Synthesizes one blocking section per time/day exclusion rule.
pub fn rule_sections(rules: &Rules) -> Vec<(String, Section)> {
    let mut blocked = Vec::new();

    if let Some(days) = &rules.no_class_on {
        let label = "No class on".to_string();
        let section = Section::synthetic(&label, days, NaiveTime::MIN, end_of_day());
        blocked.push((label, section));
    }

    if let Some(before) = rules.no_class_before {
        let label = format!("No class before {}", before.format("%H:%M"));
        let section = Section::synthetic(&label, &ALL_DAYS, NaiveTime::MIN, before);
        blocked.push((label, section));
    }

    if let Some(after) = rules.no_class_after {
        let label = format!("No class after {}", after.format("%H:%M"));
        let section = Section::synthetic(&label, &ALL_DAYS, after, end_of_day());
        blocked.push((label, section));
    }

    blocked
}

/// Removes every catalog section whose meeting times overlap `blocked`.
///
/// Layovers are not considered here; they only separate real meetings.
pub fn exclude_conflicting(courses: Vec<Course>, label: &str, blocked: &Section) -> Vec<Course> {
    retain_sections(courses, label, |s| !s.overlaps(blocked))
}

/// Removes every catalog section that meets online.
pub fn exclude_online(courses: Vec<Course>) -> Vec<Course> {
    retain_sections(courses, "No online sections", |s| !s.is_online())
}

/// Sets the layover on every meeting of every catalog course.
pub fn apply_layover(courses: Vec<Course>, layover: u32) -> Vec<Course> {
    courses
        .into_iter()
        .map(|mut course| {
            if !course.is_buffer() {
                for section in &mut course.sections {
                    section.set_layover(layover);
                }
            }
            course
        })
        .collect()
}

/// Appends one pseudo-course per buffer not already present.
pub fn inject_buffers(mut courses: Vec<Course>, buffers: &[Buffer]) -> Vec<Course> {
    for buffer in buffers {
        let exists = courses
            .iter()
            .any(|c| c.is_buffer() && c.name == buffer.name);
        if exists {
            continue;
        }

        debug!(buffer = %buffer.name, "Adding buffer");
        courses.push(Course::buffer(
            &buffer.name,
            &buffer.days,
            buffer.start_time,
            buffer.end_time,
        ));
    }

    courses
}

/// Orders courses by ascending section count, keeping ties in input order.
pub fn sort_by_section_count(courses: &mut [Course]) {
    courses.sort_by_key(|c| c.sections.len());
}

fn retain_sections<F>(courses: Vec<Course>, label: &str, keep: F) -> Vec<Course>
where
    F: Fn(&Section) -> bool,
{
    courses
        .into_iter()
        .map(|mut course| {
            if course.is_buffer() || course.sections.is_empty() {
                return course;
            }

            let before = course.sections.len();
            course.sections.retain(|s| keep(s));
            let removed = before - course.sections.len();

            if removed > 0 {
                debug!(course = %course.name, rule = %label, removed, "Filtered sections");
            }
            if course.sections.is_empty() {
                warn!(course = %course.name, rule = %label, "Rule removed every section of course");
            }
            course
        })
        .collect()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}
