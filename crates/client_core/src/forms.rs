//! Create-dialog forms and their client-side validation. A form that fails
//! validation never reaches the network.

use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use shared::{
    domain::{Degree, Education, Position, PositionId, TeacherStatus},
    error::ValidationErrors,
    protocol::{CreatePositionRequest, CreateTeacherRequest, NewTeacherUser},
};
use thiserror::Error;

// Dot-separated atoms (or a quoted string) before the `@`; after it either an
// IPv4 literal or labels that may use non-ASCII letters, ending in a TLD of at
// least two letters.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*|".+")"#,
        r"@(?:\[[0-9]{1,3}(?:\.[0-9]{1,3}){3}\]",
        r"|(?:[a-zA-Z0-9\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]+\.)+",
        r"[a-zA-Z\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,})$",
    ))
    .expect("Invalid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Two-valued status picker of the position dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveChoice {
    #[default]
    Active,
    Inactive,
}

impl ActiveChoice {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status must be 'active' or 'inactive', got '{0}'")]
pub struct InvalidActiveChoice(pub String);

impl FromStr for ActiveChoice {
    type Err = InvalidActiveChoice;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(InvalidActiveChoice(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionForm {
    pub code: String,
    pub name: String,
    pub description: String,
    pub status: Option<ActiveChoice>,
}

impl Default for PositionForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            description: String::new(),
            status: Some(ActiveChoice::Active),
        }
    }
}

impl PositionForm {
    pub fn validate(&self) -> Result<CreatePositionRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let code = required(&mut errors, "code", &self.code, "Code is required");
        let name = required(&mut errors, "name", &self.name, "Name is required");
        let description = required(
            &mut errors,
            "description",
            &self.description,
            "Description is required",
        );
        if self.status.is_none() {
            errors.push("isActive", "Status is required");
        }

        errors.into_result(CreatePositionRequest {
            code,
            name,
            description,
            is_active: self.status.is_some_and(ActiveChoice::is_active),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherForm {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub active: bool,
    pub degree: Option<Degree>,
    pub major: String,
    pub position_ids: Vec<PositionId>,
}

impl Default for TeacherForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            active: true,
            degree: None,
            major: String::new(),
            position_ids: Vec::new(),
        }
    }
}

impl TeacherForm {
    pub fn validate(&self) -> Result<CreateTeacherRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let username = required(&mut errors, "username", &self.username, "Username is required");
        let email = required(&mut errors, "email", &self.email, "Email is required");
        if !email.is_empty() && !is_valid_email(&email) {
            errors.push("email", "Email is not valid");
        }

        let mut position_ids: Vec<PositionId> = Vec::with_capacity(self.position_ids.len());
        for id in &self.position_ids {
            if !position_ids.contains(id) {
                position_ids.push(id.clone());
            }
        }

        errors.into_result(CreateTeacherRequest {
            user: NewTeacherUser {
                username,
                email,
                phone: optional(&self.phone),
                address: optional(&self.address),
            },
            status: TeacherStatus::from_active(self.active),
            education: Education {
                degree: self
                    .degree
                    .map(|degree| degree.as_str().to_string())
                    .unwrap_or_default(),
                major: self.major.trim().to_string(),
            },
            position_ids,
        })
    }
}

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    message: &'static str,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, message);
    }
    value.to_string()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Entry of the positions multi-select in the teacher dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: PositionId,
}

impl From<&Position> for SelectOption {
    fn from(position: &Position) -> Self {
        let label = if position.code.trim().is_empty() {
            position.name.clone()
        } else {
            format!("{} ({})", position.name, position.code)
        };
        Self {
            label,
            value: position.id.clone(),
        }
    }
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_form_requires_every_text_field() {
        let errors = PositionForm::default().validate().expect_err("blank form");
        assert_eq!(errors.message_for("code"), Some("Code is required"));
        assert_eq!(errors.message_for("name"), Some("Name is required"));
        assert_eq!(
            errors.message_for("description"),
            Some("Description is required")
        );
        assert_eq!(errors.message_for("isActive"), None);
    }

    #[test]
    fn position_form_requires_a_status() {
        let form = PositionForm {
            code: "GV01".into(),
            name: "Teacher".into(),
            description: "d".into(),
            status: None,
        };
        let errors = form.validate().expect_err("no status");
        assert_eq!(errors.message_for("isActive"), Some("Status is required"));
    }

    #[test]
    fn position_form_derives_is_active_from_choice() {
        let form = PositionForm {
            code: " GV01 ".into(),
            name: "Giáo viên chính".into(),
            description: "Main teacher".into(),
            status: Some("inactive".parse().expect("choice")),
        };
        let request = form.validate().expect("valid");
        assert_eq!(request.code, "GV01");
        assert!(!request.is_active);
    }

    #[test]
    fn teacher_form_rejects_malformed_email() {
        let form = TeacherForm {
            username: "Nguyen Van A".into(),
            email: "not-an-email".into(),
            ..TeacherForm::default()
        };
        let errors = form.validate().expect_err("bad email");
        assert_eq!(errors.message_for("email"), Some("Email is not valid"));
        assert_eq!(errors.message_for("username"), None);
    }

    #[test]
    fn teacher_form_reports_missing_required_fields_once() {
        let errors = TeacherForm::default().validate().expect_err("blank form");
        assert_eq!(errors.message_for("username"), Some("Username is required"));
        assert_eq!(errors.message_for("email"), Some("Email is required"));
        assert_eq!(errors.fields().count(), 2);
    }

    #[test]
    fn teacher_form_assembles_nested_payload() {
        let form = TeacherForm {
            username: "  Nguyen Van A ".into(),
            email: "a@school.edu.vn".into(),
            phone: "   ".into(),
            address: " Da Nang ".into(),
            active: false,
            degree: Some(Degree::Master),
            major: "Mathematics".into(),
            position_ids: vec!["p1".into(), "p2".into(), "p1".into()],
        };
        let request = form.validate().expect("valid");

        assert_eq!(request.user.username, "Nguyen Van A");
        assert_eq!(request.user.phone, None);
        assert_eq!(request.user.address.as_deref(), Some("Da Nang"));
        assert_eq!(request.status, TeacherStatus::Inactive);
        assert_eq!(request.education.degree, "Thạc sĩ");
        assert_eq!(request.position_ids, vec![PositionId::from("p1"), "p2".into()]);
    }

    #[test]
    fn email_check_needs_local_part_domain_and_tld() {
        assert!(is_valid_email("giaovien@truong.edu.vn"));
        assert!(!is_valid_email("giaovien@truong"));
        assert!(!is_valid_email("@truong.vn"));
        assert!(!is_valid_email("a b@truong.vn"));
        assert!(is_valid_email("giáo.viên@trường.vn"));
        assert!(is_valid_email("le_van-c+1@school.edu.vn"));
        assert!(!is_valid_email("a..b@truong.vn"));
        assert!(!is_valid_email(".a@truong.vn"));
        assert!(!is_valid_email("a.@truong.vn"));
        assert!(!is_valid_email("a@truong.v"));
    }

    #[test]
    fn select_option_label_includes_code_when_present() {
        let position = Position {
            id: "p1".into(),
            code: "GV01".into(),
            name: "Homeroom".into(),
            description: String::new(),
            is_active: true,
        };
        let option = SelectOption::from(&position);
        assert_eq!(option.label, "Homeroom (GV01)");
        assert_eq!(option.value, PositionId::from("p1"));

        let uncoded = Position {
            code: String::new(),
            ..position
        };
        assert_eq!(SelectOption::from(&uncoded).label, "Homeroom");
    }
}
