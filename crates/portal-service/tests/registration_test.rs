//! Integration tests for student and supervisor registration.

mod helpers;

use helpers::{DOMAIN, TestApp};
use portal_core::error::ErrorKind;
use portal_core::types::DepartmentId;
use portal_entity::user::{UserRole, UserStatus};
use portal_service::RegisterAccount;

#[tokio::test]
async fn test_student_matric_taken_from_email() {
    let app = TestApp::new().await;
    let dept = app.department("Computer Science").await;

    let student = app
        .state
        .registration
        .register_student(RegisterAccount::new(
            "  Ada Obi ",
            &format!("ada.20231234@{DOMAIN}"),
            "hash",
            dept.id,
        ))
        .await
        .unwrap();

    assert_eq!(student.name, "Ada Obi");
    assert_eq!(student.role, UserRole::Student);
    assert_eq!(student.status, UserStatus::Active);
    assert_eq!(student.matric_no.as_deref(), Some("20231234"));
    assert_eq!(student.department_id, Some(dept.id));
    assert_eq!(student.supervisor_id, None);
}

#[tokio::test]
async fn test_email_format_enforced_per_role() {
    let app = TestApp::new().await;
    let dept = app.department("Physics").await;
    let registration = &app.state.registration;

    for email in [
        format!("ada.obi@{DOMAIN}"),
        "ada.2023@gmail.com".to_string(),
        format!("ada2023@{DOMAIN}"),
    ] {
        let err = registration
            .register_student(RegisterAccount::new("Ada", &email, "hash", dept.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{email}");
    }

    let err = registration
        .register_supervisor(RegisterAccount::new(
            "Dr Eze",
            &format!("eze.2023@{DOMAIN}"),
            "hash",
            dept.id,
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let supervisor = registration
        .register_supervisor(RegisterAccount::new(
            "Dr Eze",
            &format!("chidi.eze@{DOMAIN}"),
            "hash",
            dept.id,
        ))
        .await
        .unwrap();
    assert_eq!(supervisor.role, UserRole::Supervisor);
    assert_eq!(supervisor.matric_no, None);
}

#[tokio::test]
async fn test_department_must_exist_and_be_active() {
    let app = TestApp::new().await;
    let dept = app.department("Biology").await;
    app.state
        .departments
        .toggle_department_status(&app.admin, dept.id)
        .await
        .unwrap();
    let registration = &app.state.registration;

    let err = registration
        .register_student(RegisterAccount::new(
            "Ada",
            &format!("ada.1@{DOMAIN}"),
            "hash",
            dept.id,
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "The selected department is invalid.");

    let err = registration
        .register_student(RegisterAccount::new(
            "Ada",
            &format!("ada.1@{DOMAIN}"),
            "hash",
            DepartmentId::new(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::new().await;
    let dept = app.department("Chemistry").await;
    let registration = &app.state.registration;
    let email = format!("ada.77@{DOMAIN}");

    registration
        .register_student(RegisterAccount::new("Ada", &email, "hash", dept.id))
        .await
        .unwrap();
    let err = registration
        .register_student(RegisterAccount::new("Ada Again", &email, "hash", dept.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("already been taken"));
}

#[tokio::test]
async fn test_blank_fields_rejected() {
    let app = TestApp::new().await;
    let dept = app.department("History").await;

    let err = app
        .state
        .registration
        .register_student(RegisterAccount::new(
            "   ",
            &format!("ada.5@{DOMAIN}"),
            "",
            dept.id,
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("Name is required"));
    assert!(err.message.contains("credential is required"));
}
