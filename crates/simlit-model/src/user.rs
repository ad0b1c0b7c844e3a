use crate::ids::UserId;
use crate::role::{Role, UserType};
use serde::{Deserialize, Serialize};

/// A role entry as the backend nests it under `user.roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RoleEntry {
    pub(crate) name: Role,
}

/// Linked lecturer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DosenProfile {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nidn: Option<String>,
}

/// Linked student profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: i64,
    pub name: String,
}

/// A user identity, also the minimal profile the client caches locally.
///
/// This is intentionally the same projection the backend returns inside
/// proposal records and the one persisted next to the auth token: id,
/// username, email, account type, role set, and the optional linked profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
    #[serde(default)]
    pub(crate) roles: Vec<RoleEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosen: Option<DosenProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentProfile>,
}

impl User {
    /// Build a user record from parts. Mostly useful for tests and harnesses;
    /// real records come off the wire.
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        user_type: UserType,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            user_type,
            roles: roles.into_iter().map(|name| RoleEntry { name }).collect(),
            dosen: None,
            student: None,
        }
    }

    /// With a linked lecturer profile.
    #[must_use]
    pub fn with_dosen(mut self, profile: DosenProfile) -> Self {
        self.dosen = Some(profile);
        self
    }

    /// With a linked student profile.
    #[must_use]
    pub fn with_student(mut self, profile: StudentProfile) -> Self {
        self.student = Some(profile);
        self
    }

    /// Whether the user holds the given named role.
    #[inline]
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }

    /// Display name: linked profile name when present, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if let Some(dosen) = &self.dosen {
            return &dosen.name;
        }
        if let Some(student) = &self.student {
            return &student.name;
        }
        &self.username
    }

    /// Iterate the user's roles.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().map(|r| r.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_backend_user_shape() {
        let json = r#"{
            "id": 7,
            "username": "bsantoso",
            "email": "bsantoso@kampus.ac.id",
            "userType": "DOSEN_STAFF",
            "roles": [{"name": "DOSEN"}, {"name": "REVIEWER"}],
            "dosen": {"id": 3, "name": "Budi Santoso", "nidn": "0012088001"}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, UserId(7));
        assert!(user.has_role(Role::Dosen));
        assert!(user.has_role(Role::Reviewer));
        assert!(!user.has_role(Role::Dekan));
        assert_eq!(user.display_name(), "Budi Santoso");
    }

    #[test]
    fn missing_roles_field_means_no_roles() {
        let json = r#"{
            "id": 1,
            "username": "x",
            "email": "x@kampus.ac.id",
            "userType": "STUDENT"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(!user.has_role(Role::Dosen));
        assert_eq!(user.display_name(), "x");
    }
}
