//! Records handed to us by the catalog client.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// One course as returned by the catalog, with every offered section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCourse {
    /// Course code (e.g., "CSE 100")
    pub code: String,
    #[serde(default)]
    pub sections: Vec<CatalogSection>,
}

/// One section as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSection {
    /// Section identifier (e.g., "A00")
    pub section_id: String,
    /// Every occurrence over the term, not just one week
    #[serde(default)]
    pub meetings: Vec<CatalogMeeting>,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
}

/// A single occurrence of a section meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMeeting {
    pub day: Weekday,
    /// Calendar date of this occurrence, when the catalog provides one
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub meeting_type: MeetingType,
    /// Room display name, already resolved from the room identifier
    pub room: String,
}

/// Meeting-type tag attached to each occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    /// Regular weekly class meeting
    Class,
    Lab,
    Midterm,
    Final,
    #[serde(other)]
    Other,
}

impl MeetingType {
    /// Returns true for the meeting types that make up the weekly pattern.
    pub fn is_regular(&self) -> bool {
        matches!(self, MeetingType::Class)
    }
}

/// Instructor display record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub office: Option<String>,
}

/// Inclusive range of dates that make up the requested term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TermWindow {
    /// Checks whether an occurrence falls inside the window.
    ///
    /// Occurrences without a date are treated as in-window.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(d) => self.start <= d && d <= self.end,
            None => true,
        }
    }
}
