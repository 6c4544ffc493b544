//! Domain DTOs for the recruitment and company services.
//!
//! # Design
//! These mirror the backend's JSON (camelCase) and are defined independently
//! from the mock-server crate; integration tests catch schema drift. Stored
//! records, create payloads and partial updates are separate types so a
//! payload can never carry server-assigned fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::query::QueryParams;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    #[serde(other)]
    Other,
}

impl EmploymentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full Time",
            Self::PartTime => "Part Time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Other => "Other",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
    #[serde(other)]
    Other,
}

impl ExperienceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "Entry Level",
            Self::Mid => "Mid Level",
            Self::Senior => "Senior Level",
            Self::Lead => "Lead Level",
            Self::Executive => "Executive",
            Self::Other => "Other",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Lead => "lead",
            Self::Executive => "executive",
            Self::Other => "other",
        }
    }
}

/// Publication state. Older services report `active` for `published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    #[serde(alias = "active")]
    Published,
    Closed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

/// A job posting as returned by the recruitment service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub job_posting_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<f64>,
    /// Legacy spelling of `min_salary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    /// Legacy spelling of `max_salary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarter_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl JobPosting {
    /// Salary bounds, preferring `minSalary`/`maxSalary` over the legacy
    /// names. An inverted range is reported as absent.
    pub fn salary_range(&self) -> Option<SalaryRange> {
        let min = self.min_salary.or(self.salary_min)?;
        let max = self.max_salary.or(self.salary_max)?;
        if min > max {
            tracing::warn!(
                job_posting_id = self.job_posting_id,
                min,
                max,
                "ignoring inverted salary range"
            );
            return None;
        }
        Some(SalaryRange { min, max })
    }

    /// Published, active and not past its deadline.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Published
            && self.is_active
            && self.application_deadline.map_or(true, |deadline| deadline >= now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    #[default]
    Active,
    Inactive,
}

/// A stored candidate. Email is the key applicants use to look up their
/// applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub candidate_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub work_experience: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub status: CandidateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Request payload for creating a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
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
    pub status: CandidateStatus,
}

/// Partial candidate update. Omitted fields are left unchanged on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidateStatus>,
}

/// Where an application sits in the hiring pipeline. Transitions are owned
/// by the backend; the client only reads the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Screening,
    ScreeningPassed,
    ScreeningFailed,
    Interviewing,
    Offer,
    Hired,
    Rejected,
    Withdrawn,
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    /// Applicant-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Screening => "Under Review",
            Self::ScreeningPassed => "Screening Passed",
            Self::ScreeningFailed => "Under Review",
            Self::Interviewing => "Interview Stage",
            Self::Offer => "Offer Extended",
            Self::Hired => "Hired",
            Self::Rejected => "Not Selected",
            Self::Withdrawn => "Withdrawn",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Hired | Self::Rejected | Self::Withdrawn)
    }
}

/// The four-step tracker shown on the status lookup page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressStep {
    Submitted = 1,
    Processing = 2,
    SchedulingInterview = 3,
    Completed = 4,
}

const KNOWN_SCREENING_STATUSES: &[&str] = &[
    "pending",
    "processing",
    "completed",
    "passed",
    "screening_passed",
    "failed",
    "screening_failed",
];

/// A stored application linking one candidate to one job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: i64,
    pub candidate_id: i64,
    pub job_posting_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screening_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screening_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offered_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Application {
    pub fn progress_step(&self) -> ProgressStep {
        use ApplicationStatus as S;
        match self.status {
            S::Interviewing | S::ScreeningPassed => ProgressStep::SchedulingInterview,
            S::Offer | S::Hired | S::Rejected | S::Withdrawn => ProgressStep::Completed,
            S::ScreeningFailed => ProgressStep::Processing,
            S::Submitted | S::Screening
                if self
                    .screening_status
                    .as_deref()
                    .is_some_and(|s| KNOWN_SCREENING_STATUSES.contains(&s)) =>
            {
                ProgressStep::Processing
            }
            S::Screening => ProgressStep::Processing,
            S::Submitted | S::Unknown => ProgressStep::Submitted,
        }
    }
}

/// Request payload for creating an application. The backend assigns the
/// initial `submitted` status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub candidate_id: i64,
    pub job_posting_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDepartment {
    pub department_id: i64,
    pub department_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub department_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarter_id: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPosition {
    pub position_id: i64,
    pub position_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub position_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyHeadquarter {
    pub headquarter_id: i64,
    pub headquarter_name: String,
    #[serde(default)]
    pub headquarter_address: String,
    #[serde(default)]
    pub headquarter_phone: String,
    #[serde(default)]
    pub headquarter_email: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_main_headquarter: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Filters for the job listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPostingFilters {
    pub status: Option<JobStatus>,
    pub department_id: Option<i64>,
    pub headquarter_id: Option<i64>,
    pub search: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub experience_level: Option<ExperienceLevel>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl JobPostingFilters {
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("status", self.status.map(JobStatus::as_str))
            .push("departmentId", self.department_id)
            .push("headquarterId", self.headquarter_id)
            .push(
                "search",
                self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            )
            .push("employmentType", self.employment_type.map(EmploymentType::as_str))
            .push("experienceLevel", self.experience_level.map(ExperienceLevel::as_str))
            .push("minSalary", self.min_salary)
            .push("maxSalary", self.max_salary)
            .push("page", self.page)
            .push("limit", self.limit)
    }
}

/// Result of a résumé upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}
