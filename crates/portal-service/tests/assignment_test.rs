//! Integration tests for supervisor assignment.

mod helpers;

use helpers::{TestApp, ids};
use portal_core::error::ErrorKind;
use portal_core::types::{PageRequest, UserId};
use portal_entity::user::{StudentFilter, SupervisorFilter, SupervisorListFilter, UserRole};
use portal_service::ActorContext;

#[tokio::test]
async fn test_assign_succeeds_until_capacity() {
    let app = TestApp::new().await;
    let dept = app.department("Computer Science").await;
    let supervisor = app.supervisor(&dept).await;
    let students = app.students(&dept, 9).await;

    for (i, student) in students.iter().take(8).enumerate() {
        let plan = app
            .state
            .assignments
            .assign_student(&app.admin, student.id, supervisor.id)
            .await
            .unwrap();
        assert_eq!(plan.previous_count, i as u32);
        assert_eq!(app.load(&supervisor).await, i as u32 + 1);
    }

    let err = app
        .state
        .assignments
        .assign_student(&app.admin, students[8].id, supervisor.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert_eq!(app.load(&supervisor).await, 8);
    assert_eq!(app.user(students[8].id).await.supervisor_id, None);
}

#[tokio::test]
async fn test_bulk_over_capacity_changes_nothing() {
    let app = TestApp::new().await;
    let dept = app.department("Mathematics").await;
    let supervisor = app.supervisor(&dept).await;
    let held = app.students(&dept, 7).await;
    let extra = app.students(&dept, 2).await;

    app.state
        .assignments
        .bulk_assign(&app.admin, ids(&held), supervisor.id, None)
        .await
        .unwrap();
    assert_eq!(app.load(&supervisor).await, 7);

    let err = app
        .state
        .assignments
        .bulk_assign(&app.admin, ids(&extra), supervisor.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert_eq!(
        err.message,
        "Supervisor can only take 1 more students (currently has 7/8)"
    );
    assert_eq!(app.load(&supervisor).await, 7);
    for student in &extra {
        assert_eq!(app.user(student.id).await.supervisor_id, None);
    }
}

#[tokio::test]
async fn test_bulk_duplicates_collapse_and_empty_rejected() {
    let app = TestApp::new().await;
    let dept = app.department("Physics").await;
    let supervisor = app.supervisor(&dept).await;
    let student = app.student(&dept).await;

    let plan = app
        .state
        .assignments
        .bulk_assign(
            &app.admin,
            [student.id, student.id, student.id],
            supervisor.id,
            None,
        )
        .await
        .unwrap();
    assert_eq!(plan.student_ids, vec![student.id]);
    assert_eq!(app.load(&supervisor).await, 1);

    let err = app
        .state
        .assignments
        .bulk_assign(&app.admin, Vec::<UserId>::new(), supervisor.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_bulk_with_unknown_student_is_all_or_nothing() {
    let app = TestApp::new().await;
    let dept = app.department("Chemistry").await;
    let supervisor = app.supervisor(&dept).await;
    let student = app.student(&dept).await;

    let err = app
        .state
        .assignments
        .bulk_assign(&app.admin, [student.id, UserId::new()], supervisor.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.user(student.id).await.supervisor_id, None);
}

#[tokio::test]
async fn test_assign_overwrites_previous_supervisor() {
    let app = TestApp::new().await;
    let dept = app.department("Biology").await;
    let first = app.supervisor(&dept).await;
    let second = app.supervisor(&dept).await;
    let student = app.student(&dept).await;

    let assignments = &app.state.assignments;
    assignments
        .assign_student(&app.admin, student.id, first.id)
        .await
        .unwrap();
    assignments
        .assign_student(&app.admin, student.id, second.id)
        .await
        .unwrap();

    assert_eq!(app.user(student.id).await.supervisor_id, Some(second.id));
    assert_eq!(app.load(&first).await, 0);
    assert_eq!(app.load(&second).await, 1);
}

#[tokio::test]
async fn test_target_must_be_supervisor() {
    let app = TestApp::new().await;
    let dept = app.department("Computer Science").await;
    let students = app.students(&dept, 2).await;

    let err = app
        .state
        .assignments
        .assign_student(&app.admin, students[0].id, students[1].id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSupervisor);
}

#[tokio::test]
async fn test_cross_department_assignment_rejected() {
    let app = TestApp::new().await;
    let cs = app.department("Computer Science").await;
    let maths = app.department("Mathematics").await;
    let supervisor = app.supervisor(&cs).await;
    let student = app.student(&maths).await;

    let err = app
        .state
        .assignments
        .assign_student(&app.admin, student.id, supervisor.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSupervisor);
}

#[tokio::test]
async fn test_scoped_bulk_assign() {
    let app = TestApp::new().await;
    let cs = app.department("Computer Science").await;
    let physics = app.department("Physics").await;
    let cs_supervisor = app.supervisor(&cs).await;
    let physics_supervisor = app.supervisor(&physics).await;
    let cs_students = app.students(&cs, 2).await;
    let physics_student = app.student(&physics).await;

    let err = app
        .state
        .assignments
        .bulk_assign(&app.admin, ids(&cs_students), physics_supervisor.id, Some(cs.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSupervisor);

    let err = app
        .state
        .assignments
        .bulk_assign(
            &app.admin,
            [cs_students[0].id, physics_student.id],
            cs_supervisor.id,
            Some(cs.id),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.load(&cs_supervisor).await, 0);

    let plan = app
        .state
        .assignments
        .bulk_assign(&app.admin, ids(&cs_students), cs_supervisor.id, Some(cs.id))
        .await
        .unwrap();
    assert_eq!(plan.resulting_count, 2);
}

#[tokio::test]
async fn test_unassign_is_idempotent() {
    let app = TestApp::new().await;
    let dept = app.department("Physics").await;
    let supervisor = app.supervisor(&dept).await;
    let student = app.student(&dept).await;
    let assignments = &app.state.assignments;

    assignments
        .assign_student(&app.admin, student.id, supervisor.id)
        .await
        .unwrap();

    let once = assignments.unassign_student(&app.admin, student.id).await.unwrap();
    let twice = assignments.unassign_student(&app.admin, student.id).await.unwrap();
    assert_eq!(once.supervisor_id, None);
    assert_eq!(twice.supervisor_id, None);
    assert_eq!(app.load(&supervisor).await, 0);

    let err = assignments
        .unassign_student(&app.admin, UserId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_remove_supervisor_guarded_by_department() {
    let app = TestApp::new().await;
    let cs = app.department("Computer Science").await;
    let biology = app.department("Biology").await;
    let supervisor = app.supervisor(&cs).await;
    let student = app.student(&cs).await;
    let assignments = &app.state.assignments;

    assignments
        .assign_student(&app.admin, student.id, supervisor.id)
        .await
        .unwrap();

    let err = assignments
        .remove_supervisor_from_student(&app.admin, biology.id, student.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.user(student.id).await.supervisor_id, Some(supervisor.id));

    let student = assignments
        .remove_supervisor_from_student(&app.admin, cs.id, student.id)
        .await
        .unwrap();
    assert_eq!(student.supervisor_id, None);
}

#[tokio::test]
async fn test_concurrent_bulk_assigns_respect_capacity() {
    let app = TestApp::new().await;
    let dept = app.department("Mathematics").await;
    let supervisor = app.supervisor(&dept).await;
    let first = app.students(&dept, 5).await;
    let second = app.students(&dept, 5).await;

    let assignments = app.state.assignments.clone();
    let (a, b) = tokio::join!(
        assignments.bulk_assign(&app.admin, ids(&first), supervisor.id, None),
        assignments.bulk_assign(&app.admin, ids(&second), supervisor.id, None),
    );

    assert!(a.is_ok() != b.is_ok(), "exactly one batch should win");
    let loser = a.err().or(b.err()).unwrap();
    assert_eq!(loser.kind, ErrorKind::CapacityExceeded);
    assert_eq!(app.load(&supervisor).await, 5);
}

#[tokio::test]
async fn test_listings_and_selection() {
    let app = TestApp::new().await;
    let dept = app.department("Computer Science").await;
    let supervisor = app.supervisor(&dept).await;
    let students = app.students(&dept, 3).await;
    let assignments = &app.state.assignments;

    assignments
        .assign_student(&app.admin, students[0].id, supervisor.id)
        .await
        .unwrap();

    let unassigned = StudentFilter::default()
        .in_department(dept.id)
        .with_supervisor(SupervisorFilter::Unassigned);
    let page = assignments
        .list_students(&app.admin, &unassigned, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 2);
    // Newest first.
    assert_eq!(page.items[0].id, students[2].id);

    let selected = assignments.select_students(&app.admin, &unassigned).await.unwrap();
    assert_eq!(selected.len(), 2);
    assert!(!selected.contains(&students[0].id));

    let by_matric = StudentFilter::default().with_search(students[1].matric_no.as_deref());
    let found = assignments
        .list_students(&app.admin, &by_matric, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(found.total_items, 1);

    let loads = assignments
        .list_supervisors(
            &app.admin,
            &SupervisorListFilter::default().in_department(dept.id),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(loads.items.len(), 1);
    assert_eq!(loads.items[0].assigned, 1);
    assert_eq!(loads.items[0].available(), 7);

    let held = assignments
        .students_of(&app.admin, supervisor.id)
        .await
        .unwrap();
    assert_eq!(ids(&held), vec![students[0].id]);
}

#[tokio::test]
async fn test_non_admin_cannot_assign() {
    let app = TestApp::new().await;
    let dept = app.department("Physics").await;
    let supervisor = app.supervisor(&dept).await;
    let student = app.student(&dept).await;

    let actor = ActorContext::new(supervisor.id, UserRole::Supervisor);
    let err = app
        .state
        .assignments
        .assign_student(&actor, student.id, supervisor.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let load = app
        .state
        .assignments
        .supervisor_load(&actor, supervisor.id)
        .await
        .unwrap();
    assert_eq!(load.assigned, 0);
}

#[tokio::test]
async fn test_configured_capacity() {
    let app = TestApp::with_config(
        r#"
        [database]
        url = "postgres://unused@localhost/unused"

        [assignment]
        max_students_per_supervisor = 2
        "#,
    )
    .await;
    let dept = app.department("Biology").await;
    let supervisor = app.supervisor(&dept).await;
    let students = app.students(&dept, 3).await;

    let err = app
        .state
        .assignments
        .bulk_assign(&app.admin, ids(&students), supervisor.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert!(err.message.contains("0/2"));
}

#[tokio::test]
async fn test_full_supervisors_leave_the_free_slot_listing() {
    let app = TestApp::new().await;
    let dept = app.department("Economics").await;
    let full = app.supervisor(&dept).await;
    let busy = app.supervisor(&dept).await;
    let idle = app.supervisor(&dept).await;
    let assignments = &app.state.assignments;

    let first = app.students(&dept, 8).await;
    assignments
        .bulk_assign(&app.admin, ids(&first), full.id, Some(dept.id))
        .await
        .unwrap();
    let second = app.students(&dept, 6).await;
    assignments
        .bulk_assign(&app.admin, ids(&second), busy.id, Some(dept.id))
        .await
        .unwrap();

    let filter = SupervisorListFilter::default()
        .in_department(dept.id)
        .with_free_slots(assignments.capacity());
    let open = assignments
        .list_supervisors(&app.admin, &filter, PageRequest::default())
        .await
        .unwrap();
    let mut open_ids: Vec<UserId> = open.items.iter().map(|l| l.supervisor.id).collect();
    open_ids.sort();
    let mut expected = vec![busy.id, idle.id];
    expected.sort();
    assert_eq!(open_ids, expected);
    assert!(open.items.iter().all(|l| !l.is_full()));

    let stats = assignments
        .supervisor_load_stats(&app.admin, Some(dept.id))
        .await
        .unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.available, 1);
    assert_eq!(stats.nearly_full, 1);
    assert_eq!(stats.full, 1);

    let elsewhere = app.department("Law").await;
    let empty = assignments
        .supervisor_load_stats(&app.admin, Some(elsewhere.id))
        .await
        .unwrap();
    assert_eq!(empty.total, 0);

    let actor = ActorContext::for_user(&idle);
    let err = assignments
        .supervisor_load_stats(&actor, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_listing_far_past_the_last_page() {
    let app = TestApp::new().await;
    let dept = app.department("Philosophy").await;
    app.students(&dept, 3).await;

    let page = app
        .state
        .assignments
        .list_students(
            &app.admin,
            &StudentFilter::default(),
            PageRequest::new(u64::MAX, 10),
        )
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 3);
    assert!(!page.has_next);
}
