use serde::{Deserialize, Serialize};

/// Named roles as the backend assigns them.
///
/// Role names reaching the client that this build does not know are folded
/// into [`Role::Unrecognized`]; permission checks treat them as no role at
/// all rather than failing deserialization of the whole user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "DOSEN")]
    Dosen,
    #[serde(rename = "MAHASISWA")]
    Mahasiswa,
    #[serde(rename = "REVIEWER")]
    Reviewer,
    #[serde(rename = "KETUA_PENELITIAN_FAKULTAS")]
    KetuaPenelitianFakultas,
    #[serde(rename = "DEKAN")]
    Dekan,
    #[serde(rename = "KETUA_LPPM")]
    KetuaLppm,
    #[serde(other)]
    Unrecognized,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Dosen => "DOSEN",
            Role::Mahasiswa => "MAHASISWA",
            Role::Reviewer => "REVIEWER",
            Role::KetuaPenelitianFakultas => "KETUA_PENELITIAN_FAKULTAS",
            Role::Dekan => "DEKAN",
            Role::KetuaLppm => "KETUA_LPPM",
            Role::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Account type, orthogonal to the role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "DOSEN_STAFF")]
    DosenStaff,
    #[serde(rename = "STUDENT")]
    Student,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_wire_names() {
        let json = serde_json::to_string(&Role::KetuaPenelitianFakultas).unwrap();
        assert_eq!(json, "\"KETUA_PENELITIAN_FAKULTAS\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::KetuaPenelitianFakultas);
    }

    #[test]
    fn unknown_role_folds_to_unrecognized() {
        let role: Role = serde_json::from_str("\"KEPALA_PERPUSTAKAAN\"").unwrap();
        assert_eq!(role, Role::Unrecognized);
    }

    #[test]
    fn user_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&UserType::DosenStaff).unwrap(),
            "\"DOSEN_STAFF\""
        );
        assert_eq!(
            serde_json::to_string(&UserType::Student).unwrap(),
            "\"STUDENT\""
        );
    }
}
