//! Integration tests for department administration.

mod helpers;

use helpers::TestApp;
use portal_core::error::ErrorKind;
use portal_core::types::{DepartmentId, PageRequest};
use portal_entity::department::{CreateDepartment, DepartmentFilter, UpdateDepartment};

#[tokio::test]
async fn test_delete_empty_department_succeeds() {
    let app = TestApp::new().await;
    let physics = app.department("Physics").await;
    let departments = &app.state.departments;

    departments.delete_department(&app.admin, physics.id).await.unwrap();
    let err = departments
        .get_department(&app.admin, physics.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_non_empty_department_fails() {
    let app = TestApp::new().await;
    let cs = app.department("Computer Science").await;
    app.student(&cs).await;

    let err = app
        .state
        .departments
        .delete_department(&app.admin, cs.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepartmentNotEmpty);
    assert!(app.state.departments.get_department(&app.admin, cs.id).await.is_ok());
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let app = TestApp::new().await;
    let physics = app.department("Physics").await;
    let chemistry = app.department("Chemistry").await;
    let departments = &app.state.departments;

    let err = departments
        .create_department(&app.admin, CreateDepartment::new("  physics ", None, true))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = departments
        .update_department(&app.admin, chemistry.id, UpdateDepartment::new("PHYSICS", None, true))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Keeping its own name is fine.
    let renamed = departments
        .update_department(
            &app.admin,
            physics.id,
            UpdateDepartment::new("Physics", Some("Matter and energy"), true),
        )
        .await
        .unwrap();
    assert_eq!(renamed.description.as_deref(), Some("Matter and energy"));
}

#[tokio::test]
async fn test_validation_rules() {
    let app = TestApp::new().await;
    let departments = &app.state.departments;

    let err = departments
        .create_department(&app.admin, CreateDepartment::new("   ", None, true))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let long = "x".repeat(1001);
    let err = departments
        .create_department(&app.admin, CreateDepartment::new("History", Some(&long), true))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = departments
        .update_department(
            &app.admin,
            DepartmentId::new(),
            UpdateDepartment::new("History", None, true),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_toggle_and_stats() {
    let app = TestApp::new().await;
    let physics = app.department("Physics").await;
    app.department("Biology").await;
    let departments = &app.state.departments;

    let toggled = departments
        .toggle_department_status(&app.admin, physics.id)
        .await
        .unwrap();
    assert!(!toggled.is_active);

    let stats = departments.department_stats(&app.admin).await.unwrap();
    assert_eq!((stats.total, stats.active, stats.inactive), (2, 1, 1));

    let active = departments.active_departments().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Biology");

    let toggled = departments
        .toggle_department_status(&app.admin, physics.id)
        .await
        .unwrap();
    assert!(toggled.is_active);
}

#[tokio::test]
async fn test_active_departments_ordered_by_name() {
    let app = TestApp::new().await;
    for name in ["Physics", "Biology", "Mathematics"] {
        app.department(name).await;
    }
    let names: Vec<String> = app
        .state
        .departments
        .active_departments()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["Biology", "Mathematics", "Physics"]);
}

#[tokio::test]
async fn test_list_with_counts_and_search() {
    let app = TestApp::new().await;
    let cs = app.department("Computer Science").await;
    app.department("Physics").await;
    app.supervisor(&cs).await;
    app.students(&cs, 3).await;

    let departments = &app.state.departments;
    let page = departments
        .list_departments(&app.admin, &DepartmentFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 2);
    let summary = page
        .items
        .iter()
        .find(|s| s.department.id == cs.id)
        .unwrap();
    assert_eq!(summary.student_count, 3);
    assert_eq!(summary.supervisor_count, 1);

    let found = departments
        .list_departments(
            &app.admin,
            &DepartmentFilter::default().with_search(Some("comp")),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
}

#[tokio::test]
async fn test_overview_counts() {
    let app = TestApp::new().await;
    let cs = app.department("Computer Science").await;
    let supervisor = app.supervisor(&cs).await;
    let students = app.students(&cs, 3).await;
    app.state
        .assignments
        .assign_student(&app.admin, students[0].id, supervisor.id)
        .await
        .unwrap();

    let overview = app
        .state
        .departments
        .department_overview(&app.admin, cs.id)
        .await
        .unwrap();
    assert_eq!(overview.department.id, cs.id);
    assert_eq!(overview.members.total_students, 3);
    assert_eq!(overview.members.total_supervisors, 1);
    assert_eq!(overview.members.unassigned_students, 2);
}
