use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(PositionId);
id_newtype!(TeacherId);

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(rename = "_id", alias = "id")]
    pub id: PositionId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
}

impl Position {
    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }

    /// `needle` must already be trimmed and lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.code.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Partial position embedded in a teacher record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRef {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PositionId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl fmt::Display for PositionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "-" } else { &self.name };
        match self.code.as_deref().filter(|code| !code.is_empty()) {
            Some(code) => write!(f, "{name} ({code})"),
            None => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeacherStatus {
    Active,
    #[default]
    Inactive,
}

impl TeacherStatus {
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Working",
            Self::Inactive => "Stopped",
        }
    }
}

// Anything other than "ACTIVE" (including null) reads as inactive.
impl<'de> Deserialize<'de> for TeacherStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw.as_ref().and_then(|value| value.as_str()) {
            Some("ACTIVE") => Self::Active,
            _ => Self::Inactive,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Degree {
    Bachelor,
    Master,
    Doctor,
}

impl Degree {
    pub const ALL: [Degree; 3] = [Degree::Bachelor, Degree::Master, Degree::Doctor];

    /// Value stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bachelor => "Cử nhân",
            Self::Master => "Thạc sĩ",
            Self::Doctor => "Tiến sĩ",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Bachelor => "bachelor",
            Self::Master => "master",
            Self::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown degree '{0}' (expected bachelor, master or doctor)")]
pub struct UnknownDegree(pub String);

impl FromStr for Degree {
    type Err = UnknownDegree;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Degree::ALL
            .into_iter()
            .find(|degree| degree.key().eq_ignore_ascii_case(raw) || degree.as_str() == raw)
            .ok_or_else(|| UnknownDegree(raw.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherUser {
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub major: String,
}

impl Education {
    pub fn is_blank(&self) -> bool {
        self.degree.is_empty() && self.major.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(rename = "_id", alias = "id")]
    pub id: TeacherId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: TeacherUser,
    #[serde(default)]
    pub status: TeacherStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Education,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positions: Vec<PositionRef>,
}

impl Teacher {
    /// Staff code, preferring the one stored on the user record.
    pub fn display_code(&self) -> &str {
        self.user
            .code
            .as_deref()
            .or(self.code.as_deref())
            .filter(|code| !code.is_empty())
            .unwrap_or("-")
    }

    pub fn display_name(&self) -> &str {
        if self.user.username.is_empty() {
            "-"
        } else {
            &self.user.username
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_accepts_underscore_and_plain_id() {
        let mongo: Position = serde_json::from_value(json!({
            "_id": "p1", "code": "GV01", "name": "Teacher", "description": "d", "isActive": true
        }))
        .expect("mongo shaped");
        let plain: Position = serde_json::from_value(json!({ "id": "p2", "name": "Lab" }))
            .expect("plain shaped");

        assert_eq!(mongo.id, PositionId::from("p1"));
        assert!(mongo.is_active);
        assert_eq!(plain.id.as_str(), "p2");
        assert_eq!(plain.code, "");
        assert_eq!(plain.status_label(), "Inactive");
    }

    #[test]
    fn teacher_tolerates_nulls_and_unknown_status() {
        let teacher: Teacher = serde_json::from_value(json!({
            "_id": "t1",
            "user": null,
            "status": "ON_LEAVE",
            "education": null,
            "positions": null
        }))
        .expect("teacher");

        assert_eq!(teacher.status, TeacherStatus::Inactive);
        assert_eq!(teacher.display_name(), "-");
        assert_eq!(teacher.display_code(), "-");
        assert!(teacher.education.is_blank());
        assert!(teacher.positions.is_empty());
    }

    #[test]
    fn teacher_code_prefers_user_record() {
        let teacher: Teacher = serde_json::from_value(json!({
            "_id": "t1",
            "code": "T-OUTER",
            "user": { "username": "An", "email": "an@school.vn", "code": "T-USER" },
            "status": "ACTIVE"
        }))
        .expect("teacher");

        assert_eq!(teacher.display_code(), "T-USER");
        assert_eq!(teacher.status.label(), "Working");
    }

    #[test]
    fn position_ref_renders_name_and_code() {
        let with_code = PositionRef {
            id: None,
            name: "Homeroom".into(),
            code: Some("HR".into()),
        };
        let without_code = PositionRef {
            name: "Homeroom".into(),
            ..PositionRef::default()
        };
        assert_eq!(with_code.to_string(), "Homeroom (HR)");
        assert_eq!(without_code.to_string(), "Homeroom");
        assert_eq!(PositionRef::default().to_string(), "-");
    }

    #[test]
    fn degree_parses_keys_and_stored_values() {
        assert_eq!("Master".parse::<Degree>(), Ok(Degree::Master));
        assert_eq!("Tiến sĩ".parse::<Degree>(), Ok(Degree::Doctor));
        assert!("diploma".parse::<Degree>().is_err());
    }

    #[test]
    fn position_match_covers_code_name_and_description() {
        let position = Position {
            id: "p1".into(),
            code: "GV01".into(),
            name: "Giáo viên chính".into(),
            description: "Main classroom teacher".into(),
            is_active: true,
        };
        assert!(position.matches(""));
        assert!(position.matches("gv0"));
        assert!(position.matches("giáo viên"));
        assert!(position.matches("classroom"));
        assert!(!position.matches("library"));
    }
}
