//! Shared helpers for service integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use portal_core::config::AppConfig;
use portal_core::types::UserId;
use portal_database::{MemoryStore, Stores};
use portal_entity::department::{CreateDepartment, Department};
use portal_entity::user::{NewUser, User, UserRole, UserStatus};
use portal_service::{ActorContext, AppState, RegisterAccount};

pub const DOMAIN: &str = "bouesti.edu.ng";

static SEQUENCE: AtomicU32 = AtomicU32::new(1);

fn next() -> u32 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Letters-only rendering of `n`, for supervisor emails.
fn letters(mut n: u32) -> String {
    let mut out = String::new();
    loop {
        out.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
    }
    out
}

/// Test application over a fresh in-memory store.
pub struct TestApp {
    pub state: AppState,
    pub admin: ActorContext,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(
            r#"
            [database]
            url = "postgres://unused@localhost/unused"
            "#,
        )
        .await
    }

    pub async fn with_config(toml: &str) -> Self {
        let config = AppConfig::from_toml(toml).expect("test config should parse");
        let stores = Stores::memory(MemoryStore::new());
        let state = AppState::new(config, stores).expect("state should build");

        let admin = state
            .stores
            .users
            .create_user(NewUser {
                name: "Portal Admin".to_string(),
                email: format!("admin{}@{DOMAIN}", next()),
                credential_hash: "!".to_string(),
                matric_no: None,
                role: UserRole::Superadmin,
                status: UserStatus::Active,
                department_id: None,
                supervisor_id: None,
            })
            .await
            .expect("admin should be created");

        Self {
            admin: ActorContext::for_user(&admin),
            state,
        }
    }

    pub async fn department(&self, name: &str) -> Department {
        self.state
            .departments
            .create_department(&self.admin, CreateDepartment::new(name, None, true))
            .await
            .expect("department should be created")
    }

    pub async fn supervisor(&self, department: &Department) -> User {
        let email = format!("dr.{}@{DOMAIN}", letters(next()));
        self.state
            .registration
            .register_supervisor(RegisterAccount::new(
                "Dr Test Supervisor",
                &email,
                "hash",
                department.id,
            ))
            .await
            .expect("supervisor should register")
    }

    pub async fn student(&self, department: &Department) -> User {
        let n = next();
        let email = format!("student.{n}@{DOMAIN}");
        self.state
            .registration
            .register_student(RegisterAccount::new(
                &format!("Student {n}"),
                &email,
                "hash",
                department.id,
            ))
            .await
            .expect("student should register")
    }

    pub async fn students(&self, department: &Department, count: usize) -> Vec<User> {
        let mut students = Vec::with_capacity(count);
        for _ in 0..count {
            students.push(self.student(department).await);
        }
        students
    }

    pub async fn user(&self, id: UserId) -> User {
        self.state
            .stores
            .users
            .find_user(id)
            .await
            .expect("lookup should succeed")
            .expect("user should exist")
    }

    pub async fn load(&self, supervisor: &User) -> u32 {
        self.state
            .assignments
            .supervisor_load(&self.admin, supervisor.id)
            .await
            .expect("load should be readable")
            .assigned
    }
}

pub fn ids(users: &[User]) -> Vec<UserId> {
    users.iter().map(|u| u.id).collect()
}
