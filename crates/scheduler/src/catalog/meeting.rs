//! Weekly recurring meetings and the conflict rule between them.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Location string the catalog uses for sections with no physical room.
pub const ONLINE_LOCATION: &str = "Online";

/// One weekly occurrence of a section.
///
/// Two meetings are the same meeting when they share day, location, start
/// and end; the layover does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub location: String,
    /// Minutes of free time required around this meeting's end
    #[serde(default)]
    pub layover: u32,
}

impl Meeting {
    /// Creates a meeting with no layover.
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime, location: impl Into<String>) -> Self {
        debug_assert!(start <= end, "meeting must not end before it starts");
        Self {
            day,
            start,
            end,
            location: location.into(),
            layover: 0,
        }
    }

    /// Sets the layover.
    pub fn with_layover(mut self, layover: u32) -> Self {
        self.layover = layover;
        self
    }

    /// Start and end as seconds since midnight.
    #[inline]
    pub fn span(&self) -> (u32, u32) {
        (second_of_day(self.start), second_of_day(self.end))
    }

    /// Returns true if this meeting and `other` cannot both be attended.
    ///
    /// Meetings on different days never conflict. On the same day the larger
    /// of the two layovers is the minimum gap that must separate them, so
    /// back-to-back meetings are fine until either side asks for a layover.
    pub fn conflicts_with(&self, other: &Meeting) -> bool {
        self.conflicts_with_gap(other, self.layover.max(other.layover))
    }

    /// Returns true if the raw meeting times overlap, ignoring layovers.
    pub fn overlaps(&self, other: &Meeting) -> bool {
        self.conflicts_with_gap(other, 0)
    }

    fn conflicts_with_gap(&self, other: &Meeting, gap: u32) -> bool {
        if self.day != other.day {
            return false;
        }

        let (a_start, a_end) = self.span();
        let (b_start, b_end) = other.span();
        let gap = gap.saturating_mul(60);

        a_start < b_end.saturating_add(gap) && b_start < a_end.saturating_add(gap)
    }

    /// Returns true if the meeting is held online.
    pub fn is_online(&self) -> bool {
        self.location == ONLINE_LOCATION
    }

    /// Position of the meeting in a Sunday-first week, then by start time.
    pub fn week_order(&self) -> (u32, NaiveTime) {
        (self.day.num_days_from_sunday(), self.start)
    }
}

impl PartialEq for Meeting {
    fn eq(&self, other: &Self) -> bool {
        self.day == other.day
            && self.location == other.location
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Meeting {}

impl Hash for Meeting {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.day.hash(state);
        self.location.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Meeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} {}",
            day_name(self.day),
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.location
        )
    }
}

/// Seconds elapsed since midnight. Leap seconds count as the second before.
#[inline]
pub fn second_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

/// Full English name of a weekday, for display.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn meeting(day: Weekday, start: (u32, u32), end: (u32, u32)) -> Meeting {
        Meeting::new(day, at(start.0, start.1), at(end.0, end.1), "CENTR 101")
    }

    #[test]
    fn test_overlap_conflicts() {
        let a = meeting(Weekday::Mon, (9, 0), (10, 30));
        let b = meeting(Weekday::Mon, (10, 0), (11, 0));

        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
    }

    #[test]
    fn test_back_to_back_boundary() {
        let a = meeting(Weekday::Tue, (9, 0), (10, 0));
        let b = meeting(Weekday::Tue, (10, 0), (11, 0));
        assert!(!a.conflicts_with(&b));
        assert!(!b.conflicts_with(&a));

        let a_lay = a.clone().with_layover(1);
        assert!(a_lay.conflicts_with(&b));
        assert!(b.conflicts_with(&a_lay));

        let b_lay = b.clone().with_layover(1);
        assert!(a.conflicts_with(&b_lay));
        assert!(b_lay.conflicts_with(&a));
    }

    #[test]
    fn test_layover_gap_is_satisfied() {
        let a = meeting(Weekday::Wed, (9, 0), (10, 0)).with_layover(15);
        let b = meeting(Weekday::Wed, (10, 15), (11, 0));
        let c = meeting(Weekday::Wed, (10, 14), (11, 0));

        assert!(!a.conflicts_with(&b));
        assert!(a.conflicts_with(&c));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_huge_layover_saturates() {
        let a = meeting(Weekday::Tue, (9, 0), (10, 0)).with_layover(u32::MAX);
        let b = meeting(Weekday::Tue, (12, 0), (13, 0));
        let c = meeting(Weekday::Wed, (12, 0), (13, 0)).with_layover(u32::MAX);

        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
        assert!(!a.conflicts_with(&c));
    }

    #[test]
    fn test_seconds_are_not_truncated() {
        let a = Meeting::new(
            Weekday::Mon,
            at(9, 0),
            NaiveTime::from_hms_opt(9, 50, 30).unwrap(),
            "CENTR 101",
        );
        let b = Meeting::new(
            Weekday::Mon,
            NaiveTime::from_hms_opt(9, 50, 15).unwrap(),
            at(10, 40),
            "CENTR 101",
        );
        let c = Meeting::new(
            Weekday::Mon,
            NaiveTime::from_hms_opt(9, 50, 30).unwrap(),
            at(10, 40),
            "CENTR 101",
        );

        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
        assert!(!a.conflicts_with(&c));
    }

    #[test]
    fn test_different_days_never_conflict() {
        let a = meeting(Weekday::Mon, (9, 0), (12, 0)).with_layover(60);
        let b = meeting(Weekday::Thu, (9, 0), (12, 0)).with_layover(60);

        assert!(!a.conflicts_with(&b));
        assert!(!b.conflicts_with(&a));
    }

    #[test]
    fn test_conflict_is_symmetric() {
        let days = [Weekday::Mon, Weekday::Tue];
        let times = [(8, 0), (9, 0), (9, 30), (10, 0), (11, 0)];
        let layovers = [0, 10, 30];

        let mut meetings = Vec::new();
        for &day in &days {
            for (i, &s) in times.iter().enumerate() {
                for &e in &times[i..] {
                    for &l in &layovers {
                        meetings.push(meeting(day, s, e).with_layover(l));
                    }
                }
            }
        }

        for a in &meetings {
            for b in &meetings {
                assert_eq!(a.conflicts_with(b), b.conflicts_with(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_equality_ignores_layover() {
        let a = meeting(Weekday::Fri, (13, 0), (14, 0));
        let b = a.clone().with_layover(20);
        let mut c = a.clone();
        c.location = "WLH 2001".to_string();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_week_order_starts_on_sunday() {
        let sun = meeting(Weekday::Sun, (18, 0), (19, 0));
        let mon = meeting(Weekday::Mon, (8, 0), (9, 0));

        assert!(sun.week_order() < mon.week_order());
    }
}
