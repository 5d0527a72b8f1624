//! Pre-registration inquiry form

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{PortalError, PortalResult};
use crate::gateway::DataGateway;
use crate::models::tables;
use crate::utils::{is_valid_email, non_blank, phone_digits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Program {
    Toddler,
    Primary,
    Elementary,
}

impl Program {
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::Toddler => "toddler",
            Program::Primary => "primary",
            Program::Elementary => "elementary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "toddler" => Some(Program::Toddler),
            "primary" => Some(Program::Primary),
            "elementary" => Some(Program::Elementary),
            _ => None,
        }
    }
}

/// Raw form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryForm {
    #[serde(default)]
    pub parent_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub child_name: String,
    /// YYYY-MM-DD
    #[serde(default)]
    pub child_birth_date: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated inquiry, ready to store
#[derive(Debug, Clone, Serialize)]
pub struct Inquiry {
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    pub child_name: String,
    pub child_birth_date: NaiveDate,
    pub program: Program,
    pub message: Option<String>,
}

pub(crate) fn required(field: &'static str, value: &str) -> PortalResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortalError::validation(field, "required"));
    }
    Ok(value.to_string())
}

pub(crate) fn valid_email(field: &'static str, value: &str) -> PortalResult<String> {
    let email = required(field, value)?;
    if !is_valid_email(&email) {
        return Err(PortalError::validation(field, "invalid email address"));
    }
    Ok(email.to_lowercase())
}

pub(crate) fn valid_phone(field: &'static str, value: &str) -> PortalResult<String> {
    let phone = required(field, value)?;
    match phone_digits(&phone) {
        Some(digits) if (10..=15).contains(&digits.len()) => Ok(phone),
        _ => Err(PortalError::validation(field, "phone number must have 10 to 15 digits")),
    }
}

impl InquiryForm {
    /// Check every field; `today` bounds the birth date
    pub fn validate(&self, today: NaiveDate) -> PortalResult<Inquiry> {
        let parent_name = required("parent_name", &self.parent_name)?;
        let email = valid_email("email", &self.email)?;
        let phone = valid_phone("phone", &self.phone)?;
        let child_name = required("child_name", &self.child_name)?;

        let birth = required("child_birth_date", &self.child_birth_date)?;
        let child_birth_date = NaiveDate::parse_from_str(&birth, "%Y-%m-%d")
            .map_err(|_| PortalError::validation("child_birth_date", "expected YYYY-MM-DD"))?;
        if child_birth_date > today {
            return Err(PortalError::validation("child_birth_date", "birth date is in the future"));
        }

        let program = Program::parse(&self.program)
            .ok_or_else(|| PortalError::validation("program", "unknown program"))?;

        Ok(Inquiry {
            parent_name,
            email,
            phone,
            child_name,
            child_birth_date,
            program,
            message: non_blank(self.message.as_deref()),
        })
    }
}

/// Validate and store an inquiry. Returns the stored row.
pub async fn submit_inquiry(gateway: &dyn DataGateway, form: &InquiryForm) -> PortalResult<Value> {
    let inquiry = form.validate(Utc::now().date_naive())?;
    let row = json!({
        "parent_name": inquiry.parent_name,
        "email": inquiry.email,
        "phone": inquiry.phone,
        "child_name": inquiry.child_name,
        "child_birth_date": inquiry.child_birth_date.format("%Y-%m-%d").to_string(),
        "program": inquiry.program.as_str(),
        "message": inquiry.message,
        "status": "new",
        "created_at": Utc::now().to_rfc3339(),
    });
    let stored = gateway.insert(tables::INQUIRIES, row).await?;
    tracing::info!("New inquiry from {} ({})", inquiry.email, inquiry.program.as_str());
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    fn form() -> InquiryForm {
        InquiryForm {
            parent_name: "Selin Yılmaz".to_string(),
            email: "Selin@Example.com".to_string(),
            phone: "0532 123 45 67".to_string(),
            child_name: "Deniz".to_string(),
            child_birth_date: "2022-05-14".to_string(),
            program: "primary".to_string(),
            message: Some("  ".to_string()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn invalid_field(result: PortalResult<Inquiry>) -> &'static str {
        match result {
            Err(PortalError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_valid_form() {
        let inquiry = form().validate(today()).unwrap();
        assert_eq!(inquiry.email, "selin@example.com");
        assert_eq!(inquiry.program, Program::Primary);
        assert_eq!(inquiry.message, None);
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut f = form();
        f.email = "selin@example".to_string();
        assert_eq!(invalid_field(f.validate(today())), "email");

        let mut f = form();
        f.phone = "12345".to_string();
        assert_eq!(invalid_field(f.validate(today())), "phone");

        let mut f = form();
        f.child_birth_date = "2026-10-17".to_string();
        assert_eq!(invalid_field(f.validate(today())), "child_birth_date");

        let mut f = form();
        f.child_birth_date = "14.05.2022".to_string();
        assert_eq!(invalid_field(f.validate(today())), "child_birth_date");

        let mut f = form();
        f.program = "high_school".to_string();
        assert_eq!(invalid_field(f.validate(today())), "program");

        let mut f = form();
        f.parent_name = "   ".to_string();
        assert_eq!(invalid_field(f.validate(today())), "parent_name");
    }

    #[test]
    fn test_birth_date_today_is_accepted() {
        let mut f = form();
        f.child_birth_date = "2026-10-16".to_string();
        assert!(f.validate(today()).is_ok());
    }

    #[tokio::test]
    async fn test_submit_stores_new_inquiry() {
        let gateway = MemoryGateway::new();
        let stored = submit_inquiry(&gateway, &form()).await.unwrap();
        assert_eq!(stored["status"], "new");

        let rows = gateway.rows(tables::INQUIRIES);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["program"], "primary");
        assert_eq!(rows[0]["child_birth_date"], "2022-05-14");
    }
}
