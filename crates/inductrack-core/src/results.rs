//! Read-side status derivation and roster rollups.
//!
//! `overdue` lives here and only here: it is computed from the due date at
//! read time and never written back, so it cannot go stale.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::{Assignment, AssignmentStatus};

/// What a dashboard shows for an assignment: the stored status, or `overdue`
/// when the due date has passed without completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Assigned,
    InProgress,
    Complete,
    Overdue,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayStatus::Assigned => "assigned",
            DisplayStatus::InProgress => "in_progress",
            DisplayStatus::Complete => "complete",
            DisplayStatus::Overdue => "overdue",
        };
        write!(f, "{name}")
    }
}

/// Derive the display status of an assignment at `now`.
///
/// `complete` always wins — a finished assignment is never overdue, no
/// matter its due date.
pub fn derive_display_status(assignment: &Assignment, now: DateTime<Utc>) -> DisplayStatus {
    if assignment.status.is_terminal() {
        return DisplayStatus::Complete;
    }
    if now > assignment.due_date {
        return DisplayStatus::Overdue;
    }
    match assignment.status {
        AssignmentStatus::Assigned => DisplayStatus::Assigned,
        _ => DisplayStatus::InProgress,
    }
}

/// Counts of assignments per display status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub complete: usize,
    pub overdue: usize,
}

impl StatusSummary {
    fn record(&mut self, status: DisplayStatus) {
        self.total += 1;
        match status {
            DisplayStatus::Assigned => self.assigned += 1,
            DisplayStatus::InProgress => self.in_progress += 1,
            DisplayStatus::Complete => self.complete += 1,
            DisplayStatus::Overdue => self.overdue += 1,
        }
    }

    pub fn count(&self, status: DisplayStatus) -> usize {
        match status {
            DisplayStatus::Assigned => self.assigned,
            DisplayStatus::InProgress => self.in_progress,
            DisplayStatus::Complete => self.complete,
            DisplayStatus::Overdue => self.overdue,
        }
    }

    /// Share of assignments in `status`, in percent. 0.0 for an empty roster.
    pub fn percentage(&self, status: DisplayStatus) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(status) as f64 * 100.0 / self.total as f64
    }

    /// Fraction of the roster that has completed, 0.0..=1.0.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.complete as f64 / self.total as f64
    }
}

/// Group a roster by display status. Pure, O(n).
pub fn summarize<'a, I>(assignments: I, now: DateTime<Utc>) -> StatusSummary
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut summary = StatusSummary::default();
    for assignment in assignments {
        summary.record(derive_display_status(assignment, now));
    }
    summary
}

/// Roster-wide and per-induction rollups at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRollup {
    pub overall: StatusSummary,
    pub per_induction: BTreeMap<String, StatusSummary>,
}

/// Compute the dashboard rollup for a roster.
pub fn compute_rollup(assignments: &[Assignment], now: DateTime<Utc>) -> RosterRollup {
    let mut overall = StatusSummary::default();
    let mut per_induction: BTreeMap<String, StatusSummary> = BTreeMap::new();
    for assignment in assignments {
        let status = derive_display_status(assignment, now);
        overall.record(status);
        per_induction
            .entry(assignment.induction_id.clone())
            .or_default()
            .record(status);
    }
    RosterRollup {
        overall,
        per_induction,
    }
}

/// One answer waiting on a human reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub induction_id: String,
    pub question_id: String,
}

/// Collect every answer flagged for review across a roster, in roster order.
pub fn review_queue(assignments: &[Assignment]) -> Vec<ReviewItem> {
    let mut queue = Vec::new();
    for assignment in assignments {
        for answer in assignment.answers.values() {
            if answer.flagged_for_review {
                queue.push(ReviewItem {
                    assignment_id: assignment.id,
                    user_id: assignment.user_id,
                    induction_id: assignment.induction_id.clone(),
                    question_id: answer.question_id.clone(),
                });
            }
        }
    }
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{Answer, AnswerPayload};
    use std::collections::BTreeMap as Map;

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn assignment(induction_id: &str, status: AssignmentStatus) -> Assignment {
        Assignment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            induction_id: induction_id.into(),
            status,
            available_from: instant("2024-01-01T00:00:00Z"),
            due_date: instant("2024-01-10T00:00:00Z"),
            assigned_at: instant("2023-12-20T00:00:00Z"),
            started_at: None,
            completed_at: None,
            answers: Map::new(),
            feedback: None,
        }
    }

    #[test]
    fn overdue_is_derived_past_due_date() {
        let a = assignment("safety", AssignmentStatus::Assigned);
        assert_eq!(
            derive_display_status(&a, instant("2024-01-15T00:00:00Z")),
            DisplayStatus::Overdue
        );
        assert_eq!(
            derive_display_status(&a, instant("2024-01-05T00:00:00Z")),
            DisplayStatus::Assigned
        );
    }

    #[test]
    fn complete_never_reads_as_overdue() {
        let a = assignment("safety", AssignmentStatus::Complete);
        assert_eq!(
            derive_display_status(&a, instant("2030-01-01T00:00:00Z")),
            DisplayStatus::Complete
        );
    }

    #[test]
    fn due_instant_itself_is_not_overdue() {
        let a = assignment("safety", AssignmentStatus::InProgress);
        assert_eq!(
            derive_display_status(&a, instant("2024-01-10T00:00:00Z")),
            DisplayStatus::InProgress
        );
    }

    #[test]
    fn summarize_counts_and_percentages() {
        let now = instant("2024-01-15T00:00:00Z");
        let roster = vec![
            assignment("safety", AssignmentStatus::Complete),
            assignment("safety", AssignmentStatus::Assigned),
            assignment("safety", AssignmentStatus::InProgress),
            assignment("safety", AssignmentStatus::Complete),
        ];
        let summary = summarize(&roster, now);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.complete, 2);
        // both non-complete assignments read as overdue at this instant
        assert_eq!(summary.overdue, 2);
        assert_eq!(summary.assigned, 0);
        assert!((summary.percentage(DisplayStatus::Complete) - 50.0).abs() < f64::EPSILON);
        assert!((summary.completion_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_roster_summary() {
        let summary = summarize([], instant("2024-01-01T00:00:00Z"));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage(DisplayStatus::Overdue), 0.0);
        assert_eq!(summary.completion_rate(), 0.0);
    }

    #[test]
    fn rollup_groups_by_induction() {
        let now = instant("2024-01-05T00:00:00Z");
        let roster = vec![
            assignment("safety", AssignmentStatus::Complete),
            assignment("safety", AssignmentStatus::Assigned),
            assignment("fire-drill", AssignmentStatus::InProgress),
        ];
        let rollup = compute_rollup(&roster, now);
        assert_eq!(rollup.overall.total, 3);
        assert_eq!(rollup.per_induction.len(), 2);
        assert_eq!(rollup.per_induction["safety"].complete, 1);
        assert_eq!(rollup.per_induction["fire-drill"].in_progress, 1);
    }

    #[test]
    fn review_queue_picks_flagged_answers() {
        let mut a = assignment("safety", AssignmentStatus::InProgress);
        a.answers.insert(
            "q1".into(),
            Answer {
                question_id: "q1".into(),
                payload: AnswerPayload::ShortAnswer {
                    text_value: "notes".into(),
                },
                is_correct: None,
                flagged_for_review: true,
            },
        );
        a.answers.insert(
            "q2".into(),
            Answer {
                question_id: "q2".into(),
                payload: AnswerPayload::YesNo {
                    selected_option: Some(crate::model::OptionIndex(0)),
                },
                is_correct: Some(true),
                flagged_for_review: false,
            },
        );
        let queue = review_queue(std::slice::from_ref(&a));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].question_id, "q1");
    }
}
