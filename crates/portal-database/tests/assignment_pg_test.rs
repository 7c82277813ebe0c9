//! Assignment races against a live PostgreSQL database.
//! Run with `DATABASE_URL=... cargo test -p portal-database -- --ignored`.

use portal_core::config::DatabaseConfig;
use portal_core::error::ErrorKind;
use portal_core::types::{PageRequest, UserId};
use portal_database::migration::run_migrations;
use portal_database::repositories::{AssignmentRepository, DepartmentRepository, UserRepository};
use portal_database::{AssignmentStore, DatabasePool, DepartmentStore, UserStore};
use portal_entity::assignment::AssignmentRequest;
use portal_entity::department::{CreateDepartment, Department};
use portal_entity::user::{NewUser, SupervisorListFilter, User, UserRole, UserStatus};

const CAPACITY: u32 = 8;

struct PgWorld {
    users: UserRepository,
    assignments: AssignmentRepository,
    department: Department,
}

async fn world() -> Option<PgWorld> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("SKIP: set DATABASE_URL to run");
        return None;
    };
    let db = DatabasePool::connect(&DatabaseConfig {
        url,
        max_connections: 5,
        min_connections: 1,
        connect_timeout_seconds: 5,
        idle_timeout_seconds: 60,
    })
    .await
    .unwrap();
    run_migrations(db.pool()).await.unwrap();

    let department = DepartmentRepository::new(db.pool().clone())
        .create_department(&CreateDepartment::new(
            &format!("Race {}", UserId::new()),
            None,
            true,
        ))
        .await
        .unwrap();

    Some(PgWorld {
        users: UserRepository::new(db.pool().clone()),
        assignments: AssignmentRepository::new(db.pool().clone()),
        department,
    })
}

impl PgWorld {
    async fn member(&self, role: UserRole) -> User {
        let id = UserId::new();
        self.users
            .create_user(NewUser {
                name: format!("{role} {id}"),
                email: format!("{id}@bouesti.edu.ng"),
                credential_hash: "!".to_string(),
                matric_no: None,
                role,
                status: UserStatus::Active,
                department_id: Some(self.department.id),
                supervisor_id: None,
            })
            .await
            .unwrap()
    }

    async fn students(&self, count: usize) -> Vec<UserId> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.member(UserRole::Student).await.id);
        }
        ids
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_concurrent_batches_never_overfill() {
    let Some(w) = world().await else { return };
    let supervisor = w.member(UserRole::Supervisor).await;
    let first = AssignmentRequest::bulk(w.students(5).await, supervisor.id).unwrap();
    let second = AssignmentRequest::bulk(w.students(5).await, supervisor.id).unwrap();

    let (a, b) = tokio::join!(
        w.assignments.assign(&first, CAPACITY),
        w.assignments.assign(&second, CAPACITY),
    );

    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let rejected = a.err().or(b.err()).unwrap();
    assert_eq!(rejected.kind, ErrorKind::CapacityExceeded);
    assert_eq!(w.assignments.student_count(supervisor.id).await.unwrap(), 5);
    assert_eq!(
        w.assignments
            .supervisor_counts(Some(w.department.id))
            .await
            .unwrap(),
        vec![5]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_overlapping_batches_do_not_deadlock() {
    let Some(w) = world().await else { return };
    let left = w.member(UserRole::Supervisor).await;
    let right = w.member(UserRole::Supervisor).await;
    let students = w.students(4).await;
    let forward = AssignmentRequest::bulk(students.clone(), left.id).unwrap();
    let backward = AssignmentRequest::bulk(students.iter().rev().copied(), right.id).unwrap();

    let (a, b) = tokio::join!(
        w.assignments.assign(&forward, CAPACITY),
        w.assignments.assign(&backward, CAPACITY),
    );
    a.unwrap();
    b.unwrap();

    let held = w.assignments.student_count(left.id).await.unwrap()
        + w.assignments.student_count(right.id).await.unwrap();
    assert_eq!(held, 4);

    let open = w
        .users
        .list_supervisors(
            &SupervisorListFilter::default()
                .in_department(w.department.id)
                .with_free_slots(4),
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(open.total_items, 1);
}
