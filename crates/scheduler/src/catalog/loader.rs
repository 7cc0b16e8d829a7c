//! Reads catalog dumps, skipping malformed records instead of failing.

use super::types::{CatalogCourse, CatalogMeeting, CatalogSection, Instructor};
use crate::generator::ConfigError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Deserialize)]
struct LooseCourse {
    code: String,
    #[serde(default)]
    sections: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseSection {
    section_id: String,
    #[serde(default)]
    meetings: Vec<Value>,
    #[serde(default)]
    instructors: Vec<Instructor>,
}

/// Loads a catalog dump (a JSON array of courses) from disk.
///
/// # Arguments
/// * `path` - Path to the catalog file
///
/// # Returns
/// * `Ok(Vec<CatalogCourse>)` - Every course that could be read
/// * `Err` - If the file can't be read or isn't a JSON array
pub fn load_catalog_file(path: &Path) -> Result<Vec<CatalogCourse>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let courses = parse_catalog(value).ok_or_else(|| ConfigError::Parse {
        path: path.display().to_string(),
        message: "expected a JSON array of courses".to_string(),
    })?;

    info!("Loaded {} courses from {}", courses.len(), path.display());
    Ok(courses)
}

/// Converts a JSON array of courses, dropping any course, section or meeting
/// that doesn't have the expected shape.
///
/// Returns `None` if `value` isn't an array.
pub fn parse_catalog(value: Value) -> Option<Vec<CatalogCourse>> {
    let Value::Array(items) = value else {
        return None;
    };

    let courses = parse_each::<LooseCourse>(items, "course")
        .into_iter()
        .map(|course| {
            let sections = parse_each::<LooseSection>(course.sections, "section")
                .into_iter()
                .map(|section| CatalogSection {
                    meetings: parse_each::<CatalogMeeting>(section.meetings, "meeting"),
                    section_id: section.section_id,
                    instructors: section.instructors,
                })
                .collect();

            CatalogCourse {
                code: course.code,
                sections,
            }
        })
        .collect();

    Some(courses)
}

fn parse_each<T: DeserializeOwned>(values: Vec<Value>, what: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<T>(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping malformed {} #{}: {}", what, i, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_records_are_skipped() {
        let courses = parse_catalog(json!([
            { "code": "CSE 100", "sections": [
                { "sectionId": "A00", "meetings": [
                    { "day": "Mon", "start": "09:00:00", "end": "09:50:00", "meetingType": "class", "room": "CENTR 101" },
                    { "day": "Someday", "start": "09:00:00", "end": "09:50:00", "meetingType": "class", "room": "CENTR 101" },
                    { "day": "Wed", "start": "nine", "end": "09:50:00", "meetingType": "class", "room": "CENTR 101" }
                ]},
                { "meetings": [] }
            ]},
            { "sections": [] },
            "not a course"
        ]))
        .unwrap();

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].sections.len(), 1);
        assert_eq!(courses[0].sections[0].meetings.len(), 1);
    }

    #[test]
    fn test_non_array_is_rejected() {
        assert!(parse_catalog(json!({ "code": "CSE 100" })).is_none());
    }
}
