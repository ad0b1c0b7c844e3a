//! In-process reference backend and fixtures.
//!
//! [`InMemoryResearch`] implements the gateway trait entirely in memory,
//! applying the same canonical transition tables the client interprets.
//! Integration tests and the `simlit` binary drive full lifecycles against
//! it without any network.

mod service;

pub use service::InMemoryResearch;

use simlit_model::{DosenProfile, Role, StudentProfile, User, UserId, UserType};
use std::sync::Arc;

/// The standard cast of actors most scenarios need.
pub struct Cast {
    pub service: Arc<InMemoryResearch>,
    pub chief: User,
    pub dosen_member: User,
    pub student_member: User,
    pub reviewer_one: User,
    pub reviewer_two: User,
    pub faculty_head: User,
    pub dean: User,
    pub lppm_head: User,
    pub admin: User,
}

/// Seeds a service with one user per workflow role.
#[must_use]
pub fn standard_cast() -> Cast {
    let service = Arc::new(InMemoryResearch::new());

    let dosen = |id: i64, username: &str, name: &str, roles: &[Role]| {
        User::new(
            UserId(id),
            username,
            format!("{username}@kampus.ac.id"),
            UserType::DosenStaff,
            roles.iter().copied(),
        )
        .with_dosen(DosenProfile {
            id,
            name: name.into(),
            nidn: Some(format!("00{id:08}")),
        })
    };

    let chief = dosen(1, "arini", "Arini Wulandari", &[Role::Dosen]);
    let dosen_member = dosen(2, "bagus", "Bagus Prakoso", &[Role::Dosen]);
    let student_member = User::new(
        UserId(3),
        "citra",
        "citra@student.kampus.ac.id",
        UserType::Student,
        [Role::Mahasiswa],
    )
    .with_student(StudentProfile {
        id: 3,
        name: "Citra Ayu".into(),
    });
    let reviewer_one = dosen(4, "dewi", "Dewi Lestari", &[Role::Dosen, Role::Reviewer]);
    let reviewer_two = dosen(5, "eko", "Eko Nugroho", &[Role::Dosen, Role::Reviewer]);
    let faculty_head = dosen(
        6,
        "fajar",
        "Fajar Hidayat",
        &[Role::Dosen, Role::KetuaPenelitianFakultas],
    );
    let dean = dosen(7, "gita", "Gita Maharani", &[Role::Dosen, Role::Dekan]);
    let lppm_head = dosen(8, "hadi", "Hadi Kusuma", &[Role::Dosen, Role::KetuaLppm]);
    let admin = User::new(
        UserId(9),
        "admin",
        "admin@kampus.ac.id",
        UserType::DosenStaff,
        [Role::Admin],
    );

    for user in [
        &chief,
        &dosen_member,
        &student_member,
        &reviewer_one,
        &reviewer_two,
        &faculty_head,
        &dean,
        &lppm_head,
        &admin,
    ] {
        service.seed_user(user.clone());
    }

    Cast {
        service,
        chief,
        dosen_member,
        student_member,
        reviewer_one,
        reviewer_two,
        faculty_head,
        dean,
        lppm_head,
        admin,
    }
}
