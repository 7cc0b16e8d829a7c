//! Depth-first search for every conflict-free choice of one section per
//! course.
//!
//! Courses are visited in a fixed order, fewest sections first. A search node
//! holds the index of the section chosen for each course visited so far; the
//! courses not yet visited form the remaining pool. Children of a node try
//! every section of the next course, and a child is only expanded if its
//! newest section conflicts with nothing already chosen.
//!
//! The search runs on an explicit stack rather than native recursion, and
//! visits nodes in the same order a recursive depth-first search would.

use super::error::ScheduleError;
use super::schedule::Schedule;
use crate::catalog::{Course, Section};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;
use tracing::debug;

/// How many nodes to expand between deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes taken off the stack
    pub nodes_expanded: u64,
    /// Children rejected by the validity test
    pub pruned: u64,
    /// Goal nodes equal to a schedule already found
    pub duplicates: u64,
    /// Distinct schedules found
    pub schedules: u64,
}

/// One node of the search: a section index per course visited so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchNode {
    picks: Vec<usize>,
}

impl SearchNode {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of courses with a section chosen.
    pub fn depth(&self) -> usize {
        self.picks.len()
    }

    /// Sections chosen so far, in the order chosen.
    pub fn path<'a>(&'a self, courses: &'a [Course]) -> impl Iterator<Item = &'a Section> + 'a {
        self.picks
            .iter()
            .enumerate()
            .map(move |(course, &section)| &courses[course].sections[section])
    }

    /// One child per section of the next unvisited course.
    pub fn successors<'a>(&'a self, courses: &'a [Course]) -> impl Iterator<Item = SearchNode> + 'a {
        let next = courses
            .get(self.depth())
            .map(|c| c.sections.len())
            .unwrap_or(0);

        (0..next).map(move |section| {
            let mut picks = Vec::with_capacity(self.picks.len() + 1);
            picks.extend_from_slice(&self.picks);
            picks.push(section);
            SearchNode { picks }
        })
    }

    /// Returns true if the newest section conflicts with nothing before it.
    pub fn is_valid(&self, courses: &[Course]) -> bool {
        let depth = self.depth();
        if depth <= 1 {
            return true;
        }

        debug_assert!(
            courses[depth - 2].sections.len() <= courses[depth - 1].sections.len(),
            "courses must be visited in ascending section-count order"
        );

        let newest = &courses[depth - 1].sections[self.picks[depth - 1]];
        !self
            .path(courses)
            .take(depth - 1)
            .any(|earlier| earlier.conflicts_with(newest))
    }

    /// Returns true once every course has a section.
    pub fn is_goal(&self, courses: &[Course]) -> bool {
        self.depth() == courses.len()
    }

    fn to_schedule(&self, courses: &[Course]) -> Schedule {
        Schedule::new(self.path(courses).cloned().collect())
    }
}

/// Enumerates every valid schedule for a list of courses.
pub struct Solver {
    courses: Vec<Course>,
    stats: SearchStats,
}

impl Solver {
    /// Creates a solver, ordering the courses by ascending section count.
    pub fn new(mut courses: Vec<Course>) -> Self {
        courses.sort_by_key(|c| c.sections.len());
        Self {
            courses,
            stats: SearchStats::default(),
        }
    }

    /// Courses in the order the search visits them.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Finds every distinct schedule.
    pub fn solve(&mut self) -> Vec<Schedule> {
        match self.search(None) {
            Ok(schedules) => schedules,
            Err(partial) => partial,
        }
    }

    /// Finds every distinct schedule, giving up once `deadline` has passed.
    pub fn solve_within(&mut self, deadline: Instant) -> Result<Vec<Schedule>, ScheduleError> {
        self.search(Some(deadline))
            .map_err(|partial| ScheduleError::DeadlineExceeded {
                found: partial.len(),
            })
    }

    /// Runs the search. `Err` carries what was found before the deadline.
    fn search(&mut self, deadline: Option<Instant>) -> Result<Vec<Schedule>, Vec<Schedule>> {
        self.stats = SearchStats::default();

        let mut schedules = Vec::new();
        if self.courses.is_empty() {
            return Ok(schedules);
        }

        let courses = &self.courses;
        let mut seen: HashSet<String> = HashSet::new();
        let mut stack = vec![SearchNode::root()];

        while let Some(node) = stack.pop() {
            self.stats.nodes_expanded += 1;

            if let Some(deadline) = deadline {
                if self.stats.nodes_expanded % DEADLINE_CHECK_INTERVAL == 0
                    && Instant::now() >= deadline
                {
                    debug!(stats = ?self.stats, "Search deadline passed");
                    return Err(schedules);
                }
            }

            if node.is_goal(courses) {
                let schedule = node.to_schedule(courses);
                if seen.insert(schedule.canonical_key().to_string()) {
                    self.stats.schedules += 1;
                    schedules.push(schedule);
                } else {
                    self.stats.duplicates += 1;
                }
                continue;
            }

            let mut children: Vec<SearchNode> = Vec::new();
            for child in node.successors(courses) {
                if child.is_valid(courses) {
                    children.push(child);
                } else {
                    self.stats.pruned += 1;
                }
            }

            // Last pushed is explored first, so reverse to keep section order.
            stack.extend(children.into_iter().rev());
        }

        debug!(
            nodes = self.stats.nodes_expanded,
            pruned = self.stats.pruned,
            duplicates = self.stats.duplicates,
            schedules = self.stats.schedules,
            "Search finished"
        );

        Ok(schedules)
    }
}
