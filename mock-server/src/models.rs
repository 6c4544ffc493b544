//! Wire types for the mock recruitment and company services.
//!
//! Enumerated fields stay plain strings here; the mock stores whatever the
//! real services would, and the client is the one that types them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub job_posting_id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub employment_type: String,
    pub experience_level: String,
    pub status: String,
    pub application_deadline: Option<DateTime<Utc>>,
    pub department_id: i64,
    pub position_id: i64,
    pub headquarter_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl JobPosting {
    pub fn is_published(&self) -> bool {
        self.is_active && matches!(self.status.as_str(), "published" | "active")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub candidate_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub education: String,
    pub work_experience: String,
    pub skills: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    pub postal_code: Option<String>,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub work_experience: String,
    #[serde(default)]
    pub skills: String,
    pub certifications: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub resume_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub skills: Option<String>,
    pub certifications: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub resume_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: i64,
    pub candidate_id: i64,
    pub job_posting_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screening_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplication {
    pub candidate_id: i64,
    pub job_posting_id: i64,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_id: i64,
    pub department_name: String,
    pub description: Option<String>,
    pub department_code: String,
    pub headquarter_id: i64,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub position_id: i64,
    pub position_name: String,
    pub description: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub level: i32,
    pub position_code: String,
    pub requirements: Option<String>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headquarter {
    pub headquarter_id: i64,
    pub headquarter_name: String,
    pub headquarter_address: String,
    pub headquarter_phone: String,
    pub headquarter_email: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub description: Option<String>,
    pub is_main_headquarter: bool,
    pub is_active: bool,
}

/// A résumé held in memory after upload.
#[derive(Clone, Debug)]
pub struct StoredFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub job_id: Option<i64>,
    pub candidate_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
    pub file_name: String,
    pub size: u64,
    pub mime_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingQuery {
    pub status: Option<String>,
    pub department_id: Option<i64>,
    pub headquarter_id: Option<i64>,
    pub search: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationQuery {
    pub candidate_id: Option<i64>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_candidate_defaults_optional_text() {
        let input: CreateCandidate = serde_json::from_str(
            r#"{"firstName":"An","lastName":"Nguyen","email":"an@example.com","phoneNumber":"0901"}"#,
        )
        .unwrap();
        assert!(input.address.is_empty());
        assert!(input.status.is_none());
        assert!(input.date_of_birth.is_none());
    }

    #[test]
    fn create_candidate_rejects_missing_email() {
        let result: Result<CreateCandidate, _> = serde_json::from_str(
            r#"{"firstName":"An","lastName":"Nguyen","phoneNumber":"0901"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_candidate_all_fields_optional() {
        let input: UpdateCandidate = serde_json::from_str("{}").unwrap();
        assert!(input.city.is_none());
        assert!(input.status.is_none());
    }

    #[test]
    fn candidate_serializes_camel_case() {
        let now = Utc::now();
        let candidate = Candidate {
            candidate_id: 1,
            first_name: "An".into(),
            last_name: "Nguyen".into(),
            email: "an@example.com".into(),
            phone_number: "0901".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1998, 4, 2),
            address: String::new(),
            city: "Hà Nội".into(),
            postal_code: None,
            education: String::new(),
            work_experience: String::new(),
            skills: String::new(),
            certifications: None,
            portfolio_url: None,
            linkedin_url: None,
            resume_url: None,
            status: "active".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["candidateId"], 1);
        assert_eq!(json["dateOfBirth"], "1998-04-02");
        assert!(json.get("postalCode").is_none());
    }

    #[test]
    fn published_includes_legacy_active_status() {
        let now = Utc::now();
        let mut job = JobPosting {
            job_posting_id: 1,
            slug: "x-1".into(),
            title: "x".into(),
            description: String::new(),
            requirements: String::new(),
            benefits: String::new(),
            min_salary: None,
            max_salary: None,
            employment_type: "full-time".into(),
            experience_level: "mid".into(),
            status: "active".into(),
            application_deadline: None,
            department_id: 1,
            position_id: 1,
            headquarter_id: 1,
            created_at: now,
            updated_at: now,
            is_active: true,
        };
        assert!(job.is_published());
        job.status = "draft".into();
        assert!(!job.is_published());
    }
}
