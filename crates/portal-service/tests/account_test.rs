//! Integration tests for superadmin account management.

mod helpers;

use helpers::TestApp;
use portal_core::error::ErrorKind;
use portal_core::types::PageRequest;
use portal_entity::user::{AccountFilter, UserRole, UserStatus};

#[tokio::test]
async fn test_pause_self_forbidden() {
    let app = TestApp::new().await;
    let err = app
        .state
        .accounts
        .pause_user(&app.admin, app.admin.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SelfActionForbidden);
    assert!(app.state.accounts.is_active(app.admin.user_id).await.unwrap());
}

#[tokio::test]
async fn test_pause_and_activate_other() {
    let app = TestApp::new().await;
    let dept = app.department("Physics").await;
    let student = app.student(&dept).await;
    let accounts = &app.state.accounts;

    let paused = accounts.pause_user(&app.admin, student.id).await.unwrap();
    assert_eq!(paused.status, UserStatus::Paused);
    assert!(!accounts.is_active(student.id).await.unwrap());

    accounts.activate_user(&app.admin, student.id).await.unwrap();
    assert!(accounts.is_active(student.id).await.unwrap());

    let err = accounts
        .activate_user(&app.admin, app.admin.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SelfActionForbidden);
}

#[tokio::test]
async fn test_delete_self_forbidden_and_other_removed() {
    let app = TestApp::new().await;
    let dept = app.department("Chemistry").await;
    let student = app.student(&dept).await;
    let accounts = &app.state.accounts;

    let err = accounts
        .delete_user(&app.admin, app.admin.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SelfActionForbidden);

    accounts.delete_user(&app.admin, student.id).await.unwrap();
    let err = accounts
        .get_account(&app.admin, student.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_deleting_supervisor_unassigns_students() {
    let app = TestApp::new().await;
    let dept = app.department("Biology").await;
    let supervisor = app.supervisor(&dept).await;
    let student = app.student(&dept).await;

    app.state
        .assignments
        .assign_student(&app.admin, student.id, supervisor.id)
        .await
        .unwrap();
    app.state
        .accounts
        .delete_user(&app.admin, supervisor.id)
        .await
        .unwrap();

    assert_eq!(app.user(student.id).await.supervisor_id, None);
}

#[tokio::test]
async fn test_list_accounts_excludes_caller_and_filters() {
    let app = TestApp::new().await;
    let dept = app.department("Computer Science").await;
    let supervisor = app.supervisor(&dept).await;
    let student = app.student(&dept).await;
    let accounts = &app.state.accounts;
    accounts.pause_user(&app.admin, supervisor.id).await.unwrap();

    let all = accounts
        .list_accounts(&app.admin, AccountFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total_items, 2);
    assert!(all.items.iter().all(|u| u.id != app.admin.user_id));
    // Newest first.
    assert_eq!(all.items[0].id, student.id);

    let paused = accounts
        .list_accounts(
            &app.admin,
            AccountFilter::default().with_status(Some(UserStatus::Paused)),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(paused.items.len(), 1);
    assert_eq!(paused.items[0].id, supervisor.id);

    let students = accounts
        .list_accounts(
            &app.admin,
            AccountFilter::default()
                .with_role(Some(UserRole::Student))
                .with_search(Some(&student.email.to_uppercase())),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(students.items.len(), 1);
}

#[tokio::test]
async fn test_account_listing_paginates() {
    let app = TestApp::new().await;
    let dept = app.department("Mathematics").await;
    app.students(&dept, 12).await;

    let first = app
        .state
        .accounts
        .list_accounts(&app.admin, AccountFilter::default(), PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next);

    let second = app
        .state
        .accounts
        .list_accounts(&app.admin, AccountFilter::default(), PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_next);
}
