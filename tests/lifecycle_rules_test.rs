// Pure-logic tests for the review and forwarding state machines and the
// delegation scoping rules. These run without a database.

use chrono::{Duration, Utc};
use hirepath_backend_core::models::application::ApplicationStatus;
use hirepath_backend_core::models::forwarded_cv::ForwardingStatus;
use hirepath_backend_core::models::plan::BillingPeriod;
use hirepath_backend_core::models::sub_employer::DashboardPermission;
use hirepath_backend_core::services::{Actor, ActorKind};
use hirepath_backend_core::utils::ServiceError;
use uuid::Uuid;

fn employer_actor(employer_id: Uuid) -> Actor {
    Actor {
        kind: ActorKind::Employer,
        user_id: employer_id,
        employer_id,
        sub_employer_id: None,
        display_name: "Acme Hiring".to_string(),
        display_role: "Employer".to_string(),
        permissions: Vec::new(),
    }
}

fn sub_employer_actor(parent_employer_id: Uuid) -> Actor {
    sub_employer_actor_with(
        parent_employer_id,
        vec![DashboardPermission::Accept, DashboardPermission::Reject],
    )
}

fn sub_employer_actor_with(
    parent_employer_id: Uuid,
    permissions: Vec<DashboardPermission>,
) -> Actor {
    Actor {
        kind: ActorKind::SubEmployer,
        user_id: Uuid::new_v4(),
        employer_id: parent_employer_id,
        sub_employer_id: Some(Uuid::new_v4()),
        display_name: "Sam Lee".to_string(),
        display_role: "Engineering".to_string(),
        permissions,
    }
}

#[test]
fn sub_employer_scopes_to_parent() {
    let parent = Uuid::new_v4();
    let actor = sub_employer_actor(parent);

    assert!(actor.assert_scope(parent).is_ok());
    assert!(matches!(
        actor.assert_scope(Uuid::new_v4()),
        Err(ServiceError::Unauthorized)
    ));
}

#[test]
fn employer_scopes_to_itself() {
    let employer = Uuid::new_v4();
    let actor = employer_actor(employer);

    assert!(actor.assert_scope(employer).is_ok());
    assert!(actor.assert_scope(Uuid::new_v4()).is_err());
}

#[test]
fn actor_display_names_department_or_employer() {
    let employer = employer_actor(Uuid::new_v4());
    assert_eq!(employer.display(), "Acme Hiring (Employer)");

    let delegate = sub_employer_actor(Uuid::new_v4());
    assert_eq!(delegate.display(), "Sam Lee (Engineering)");
}

#[test]
fn sub_employer_actions_require_granted_permissions() {
    let ungranted = sub_employer_actor_with(Uuid::new_v4(), Vec::new());
    for permission in [
        DashboardPermission::Accept,
        DashboardPermission::Reject,
        DashboardPermission::Delete,
        DashboardPermission::Meeting,
        DashboardPermission::View,
    ] {
        assert!(matches!(
            ungranted.assert_permission(permission),
            Err(ServiceError::Unauthorized)
        ));
    }

    let reviewer = sub_employer_actor_with(
        Uuid::new_v4(),
        vec![DashboardPermission::Reject, DashboardPermission::View],
    );
    assert!(reviewer.assert_permission(DashboardPermission::Reject).is_ok());
    assert!(reviewer.assert_permission(DashboardPermission::View).is_ok());
    assert!(reviewer.assert_permission(DashboardPermission::Accept).is_err());
    assert!(reviewer.assert_permission(DashboardPermission::Delete).is_err());
}

#[test]
fn employer_is_never_capability_restricted() {
    let employer = employer_actor(Uuid::new_v4());
    for permission in [
        DashboardPermission::Accept,
        DashboardPermission::Reject,
        DashboardPermission::Delete,
        DashboardPermission::Meeting,
    ] {
        assert!(employer.assert_permission(permission).is_ok());
    }
}

#[test]
fn transition_targets_are_shortlisted_or_rejected_only() {
    assert!(ApplicationStatus::Shortlisted.is_transition_target());
    assert!(ApplicationStatus::Rejected.is_transition_target());
    assert!(!ApplicationStatus::Pending.is_transition_target());
    assert!(!ApplicationStatus::Hired.is_transition_target());
}

#[test]
fn re_transition_restamps_single_attribution() {
    let first_reviewer = Uuid::new_v4();
    let second_reviewer = Uuid::new_v4();

    let (shortlisted_by, rejected_by) =
        ApplicationStatus::Shortlisted.attribution(first_reviewer);
    assert_eq!(shortlisted_by, Some(first_reviewer));
    assert_eq!(rejected_by, None);

    // a later rejection by someone else replaces the attribution entirely
    let (shortlisted_by, rejected_by) = ApplicationStatus::Rejected.attribution(second_reviewer);
    assert_eq!(shortlisted_by, None);
    assert_eq!(rejected_by, Some(second_reviewer));
}

#[test]
fn forwarding_flows_pending_viewed_terminal() {
    assert!(ForwardingStatus::Pending.is_actionable());
    assert!(ForwardingStatus::Viewed.is_actionable());
    assert!(!ForwardingStatus::Accepted.is_actionable());
    assert!(!ForwardingStatus::Rejected.is_actionable());

    // only the terminal pair are valid accept/reject actions
    assert!(ForwardingStatus::Accepted.is_terminal());
    assert!(ForwardingStatus::Rejected.is_terminal());
    assert!(!ForwardingStatus::Viewed.is_terminal());
}

#[test]
fn sub_employers_survive_parent_employer_deletion() {
    // the employer cascade deletes the users row while its sub-employers
    // stay behind with a dangling parent id, so the schema must not tie
    // parent_employer_id to users with a foreign key
    let ddl = include_str!("../migrations/diesel/2025-07-14-000000_core_tables/up.sql");
    let sub_employers = ddl
        .split("CREATE TABLE sub_employers")
        .nth(1)
        .and_then(|rest| rest.split(");").next())
        .unwrap();

    let parent_column = sub_employers
        .lines()
        .find(|line| line.trim_start().starts_with("parent_employer_id"))
        .unwrap();
    assert!(
        !parent_column.contains("REFERENCES"),
        "parent_employer_id must not reference users: {}",
        parent_column
    );
}

#[test]
fn billing_periods_extend_expiry_forward() {
    let now = Utc::now();
    assert_eq!(BillingPeriod::Monthly.expiry_from(now), now + Duration::days(30));
    assert_eq!(BillingPeriod::Quarterly.expiry_from(now), now + Duration::days(90));
    assert_eq!(BillingPeriod::Yearly.expiry_from(now), now + Duration::days(365));
    assert!(BillingPeriod::Free.expiry_from(now) > BillingPeriod::Yearly.expiry_from(now));
}
