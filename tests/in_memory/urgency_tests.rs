//! Deadline classification against the system clock.

use std::sync::Arc;

use chrono::{Days, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use tasklane::task::{
    domain::{Task, TaskId, UrgencyLevel, UrgencyThresholds},
    services::DeadlineClassifier,
};

fn classifier() -> DeadlineClassifier<DefaultClock> {
    DeadlineClassifier::new(UrgencyThresholds::default(), Arc::new(DefaultClock))
}

#[rstest]
#[case(30, UrgencyLevel::Normal)]
#[case(4, UrgencyLevel::Warning)]
#[case(1, UrgencyLevel::Critical)]
fn distant_and_near_deadlines(#[case] days_ahead: u64, #[case] expected: UrgencyLevel) {
    let deadline = Utc::now()
        .checked_add_days(Days::new(days_ahead))
        .expect("deadline in range");
    assert_eq!(classifier().classify(Some(deadline)), Some(expected));
}

#[rstest]
fn overdue_task_is_critical() {
    let deadline = Utc::now()
        .checked_sub_days(Days::new(3))
        .expect("deadline in range");
    let task = Task::new(TaskId::new(1).expect("id"), "Overdue")
        .expect("task")
        .with_deadline(Some(deadline));
    assert_eq!(classifier().classify_task(&task), Some(UrgencyLevel::Critical));
}

#[rstest]
fn task_without_deadline_is_unclassified() {
    let task = Task::new(TaskId::new(1).expect("id"), "Someday").expect("task");
    assert_eq!(classifier().classify_task(&task), None);
}
