//! Courses and sections, built either from catalog records or from a
//! rule/buffer definition.

mod loader;
mod meeting;
mod types;

pub use loader::{load_catalog_file, parse_catalog};
pub use meeting::*;
pub use types::*;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Whether a course came from the catalog or stands in for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseKind {
    Catalog,
    Buffer,
}

/// A course and the sections that can satisfy it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub kind: CourseKind,
    pub sections: Vec<Section>,
}

impl Course {
    /// Builds a course from catalog data, keeping only sections that still
    /// have a weekly meeting pattern inside the term window.
    pub fn from_catalog(raw: &CatalogCourse, window: Option<&TermWindow>) -> Self {
        let sections = raw
            .sections
            .iter()
            .filter_map(|s| Section::from_catalog(&raw.code, s, window))
            .collect();

        Self {
            name: raw.code.clone(),
            kind: CourseKind::Catalog,
            sections,
        }
    }

    /// Builds a single-section pseudo-course for a protected time block.
    pub fn buffer(name: &str, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            name: name.to_string(),
            kind: CourseKind::Buffer,
            sections: vec![Section::synthetic(name, days, start, end)],
        }
    }

    pub fn is_buffer(&self) -> bool {
        self.kind == CourseKind::Buffer
    }
}

/// One alternative offering of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Name of the owning course
    pub course: String,
    /// Section identifier (e.g., "A00")
    pub code: String,
    /// One representative week, ordered Sunday first
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
}

impl Section {
    /// Builds a section from every occurrence the catalog reported.
    ///
    /// Only regular class meetings inside `window` are used. The catalog
    /// repeats the same week across the whole term, so meetings are added in
    /// date order until the first repeat. Returns `None` when nothing usable
    /// remains.
    pub fn from_catalog(
        course: &str,
        raw: &CatalogSection,
        window: Option<&TermWindow>,
    ) -> Option<Self> {
        let mut occurrences: Vec<&CatalogMeeting> = raw
            .meetings
            .iter()
            .filter(|m| m.meeting_type.is_regular())
            .filter(|m| window.map_or(true, |w| w.contains(m.date)))
            .collect();
        occurrences.sort_by_key(|m| m.date);

        let mut meetings: Vec<Meeting> = Vec::new();
        for occ in occurrences {
            if occ.start > occ.end {
                warn!(
                    course = %course,
                    section = %raw.section_id,
                    "Skipping meeting that ends before it starts"
                );
                continue;
            }

            let meeting = Meeting::new(occ.day, occ.start, occ.end, occ.room.clone());
            if meetings.contains(&meeting) {
                break;
            }
            meetings.push(meeting);
        }

        if meetings.is_empty() {
            warn!(
                course = %course,
                section = %raw.section_id,
                "Section has no regular meetings in the term window, skipping"
            );
            return None;
        }

        meetings.sort_by_key(|m| m.week_order());

        Some(Self {
            course: course.to_string(),
            code: raw.section_id.clone(),
            meetings,
            instructors: raw.instructors.clone(),
        })
    }

    /// Builds a section with one identical meeting on each listed day.
    pub fn synthetic(name: &str, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> Self {
        let mut meetings: Vec<Meeting> = Vec::with_capacity(days.len());
        for &day in days {
            let meeting = Meeting::new(day, start, end, name);
            if !meetings.contains(&meeting) {
                meetings.push(meeting);
            }
        }
        meetings.sort_by_key(|m| m.week_order());

        Self {
            course: name.to_string(),
            code: name.to_string(),
            meetings,
            instructors: Vec::new(),
        }
    }

    /// Returns true if any meeting of this section conflicts with any meeting
    /// of `other`.
    pub fn conflicts_with(&self, other: &Section) -> bool {
        self.meetings
            .iter()
            .any(|a| other.meetings.iter().any(|b| a.conflicts_with(b)))
    }

    /// Like [`Section::conflicts_with`], but compares raw meeting times
    /// without layovers.
    pub fn overlaps(&self, other: &Section) -> bool {
        self.meetings
            .iter()
            .any(|a| other.meetings.iter().any(|b| a.overlaps(b)))
    }

    /// Returns true if any meeting is held online.
    pub fn is_online(&self) -> bool {
        self.meetings.iter().any(Meeting::is_online)
    }

    /// Applies the same layover to every meeting.
    pub fn set_layover(&mut self, layover: u32) {
        for meeting in &mut self.meetings {
            meeting.layover = layover;
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.course == self.code {
            write!(f, "{}", self.course)
        } else {
            write!(f, "{} {}", self.course, self.code)
        }
    }
}
