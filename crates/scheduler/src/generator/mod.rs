//! Schedule generation: rule preprocessing, search, and the pipeline that
//! ties them to catalog data.

pub mod config;
mod error;
pub mod rules;
mod schedule;
pub mod solver;

pub use config::{Buffer, EmptyCoursePolicy, Rules, ScheduleConfig};
pub use error::{ConfigError, ScheduleError};
pub use rules::{preprocess, Preprocessed};
pub use schedule::{Schedule, ScheduledMeeting};
pub use solver::{SearchNode, SearchStats, Solver};

use crate::catalog::{CatalogCourse, Course};
use std::time::Instant;
use tracing::{info, warn};

/// Result of a full generation run
#[derive(Debug, Clone)]
pub struct Generation {
    /// Every distinct conflict-free schedule
    pub schedules: Vec<Schedule>,
    /// Courses dropped because no section survived the rules
    pub dropped: Vec<String>,
    pub stats: SearchStats,
}

/// Picks the requested courses out of the catalog and builds them.
///
/// # Arguments
/// * `catalog` - Every course the catalog returned
/// * `config` - Run configuration (requested codes and term window)
///
/// # Returns
/// * `Ok(Vec<Course>)` - The requested courses, in request order
/// * `Err` - If a requested code isn't in the catalog
pub fn build_courses(
    catalog: &[CatalogCourse],
    config: &ScheduleConfig,
) -> Result<Vec<Course>, ConfigError> {
    let window = config.term.as_ref();

    if config.courses.is_empty() {
        return Ok(catalog
            .iter()
            .map(|raw| Course::from_catalog(raw, window))
            .collect());
    }

    config
        .courses
        .iter()
        .map(|code| {
            catalog
                .iter()
                .find(|raw| same_code(&raw.code, code))
                .map(|raw| Course::from_catalog(raw, window))
                .ok_or_else(|| ConfigError::UnknownCourse { code: code.clone() })
        })
        .collect()
}

/// Applies rules and buffers, then the empty-course policy.
///
/// # Returns
/// * `Ok((courses, dropped))` - Courses ready for the solver, plus the names of
///   any dropped
/// * `Err(ScheduleError::EmptyCourse)` - If a course is empty and the policy
///   is to abort
pub fn prepare(
    courses: Vec<Course>,
    config: &ScheduleConfig,
) -> Result<(Vec<Course>, Vec<String>), ScheduleError> {
    let Preprocessed { courses, empty } = preprocess(courses, &config.rules, &config.buffers);

    if empty.is_empty() {
        return Ok((courses, empty));
    }

    match config.on_empty_course {
        EmptyCoursePolicy::Abort => Err(ScheduleError::EmptyCourse {
            course: empty[0].clone(),
        }),
        EmptyCoursePolicy::Drop => {
            for name in &empty {
                warn!(course = %name, "Dropping course with no usable sections");
            }
            let kept = courses
                .into_iter()
                .filter(|c| !c.sections.is_empty())
                .collect();
            Ok((kept, empty))
        }
    }
}

/// Runs the whole pipeline: build, preprocess, search.
///
/// # Arguments
/// * `catalog` - Every course the catalog returned
/// * `config` - Run configuration
/// * `deadline` - Optional point in time after which the search gives up
///
/// # Returns
/// * `Ok(Generation)` - Schedules and run details
/// * `Err(ScheduleError)` - Bad input, an empty course under `Abort`, or a
///   passed deadline
pub fn generate(
    catalog: &[CatalogCourse],
    config: &ScheduleConfig,
    deadline: Option<Instant>,
) -> Result<Generation, ScheduleError> {
    config.validate()?;

    let courses = build_courses(catalog, config)?;
    info!("Generating schedules for {} courses", courses.len());

    let (courses, dropped) = prepare(courses, config)?;

    let start = Instant::now();
    let mut solver = Solver::new(courses);
    let schedules = match deadline {
        Some(deadline) => solver.solve_within(deadline)?,
        None => solver.solve(),
    };

    info!(
        duration_ms = start.elapsed().as_millis() as u64,
        "Found {} schedules",
        schedules.len()
    );

    Ok(Generation {
        schedules,
        dropped,
        stats: solver.stats(),
    })
}

fn same_code(a: &str, b: &str) -> bool {
    a.split_whitespace()
        .map(str::to_uppercase)
        .eq(b.split_whitespace().map(str::to_uppercase))
}
