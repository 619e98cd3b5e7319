// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Dated coverage targets

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A coverage target with a deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Short name shown in reports
    pub name: String,
    /// Required overall progress, in percent
    pub target_percent: f64,
    /// Deadline
    pub due: NaiveDate,
}

/// Where a milestone stands on a given day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneStatus {
    /// Milestone name
    pub name: String,
    /// Required overall progress, in percent
    pub target_percent: f64,
    /// Deadline
    pub due: NaiveDate,
    /// Days until the deadline (negative when overdue)
    pub days_remaining: i64,
    /// Coverage has reached the target
    pub met: bool,
}

impl MilestoneStatus {
    /// Deadline passed without reaching the target
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        !self.met && self.days_remaining < 0
    }
}

/// The rollout plan used when none is configured
#[must_use]
pub fn default_milestones() -> Vec<Milestone> {
    [
        ("Phase 1", 10.0, (2025, 3, 15)),
        ("Phase 2", 50.0, (2025, 5, 1)),
        ("Phase 3", 100.0, (2025, 6, 1)),
    ]
    .into_iter()
    .filter_map(|(name, target_percent, (y, m, d))| {
        NaiveDate::from_ymd_opt(y, m, d).map(|due| Milestone {
            name: name.to_string(),
            target_percent,
            due,
        })
    })
    .collect()
}

impl Milestone {
    /// Evaluate against the overall coverage on `today`
    #[must_use]
    pub fn status(&self, today: NaiveDate, coverage_percent: f64) -> MilestoneStatus {
        MilestoneStatus {
            name: self.name.clone(),
            target_percent: self.target_percent,
            due: self.due,
            days_remaining: (self.due - today).num_days(),
            met: coverage_percent >= self.target_percent,
        }
    }
}

/// Evaluate every milestone, sorted by deadline
#[must_use]
pub fn status(milestones: &[Milestone], today: NaiveDate, coverage_percent: f64) -> Vec<MilestoneStatus> {
    let mut statuses: Vec<_> = milestones
        .iter()
        .map(|m| m.status(today, coverage_percent))
        .collect();
    statuses.sort_by_key(|s| s.due);
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_plan() {
        let plan = default_milestones();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].due, day(2025, 3, 15));
        assert!((plan[2].target_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_days_remaining_and_met() {
        let statuses = status(&default_milestones(), day(2025, 4, 1), 20.0);

        assert_eq!(statuses[0].days_remaining, -17);
        assert!(statuses[0].met);
        assert!(!statuses[0].is_overdue());
        assert_eq!(statuses[1].days_remaining, 30);
        assert!(!statuses[1].met);
    }

    #[test]
    fn test_overdue() {
        let statuses = status(&default_milestones(), day(2025, 7, 1), 60.0);

        assert!(statuses[1].met);
        assert!(statuses[2].is_overdue());
    }

    #[test]
    fn test_sorted_by_deadline() {
        let mut plan = default_milestones();
        plan.reverse();

        let statuses = status(&plan, day(2025, 1, 1), 0.0);

        assert_eq!(statuses[0].name, "Phase 1");
    }
}
