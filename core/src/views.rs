//! Composite reads and the apply flow, built on the endpoint methods.
//!
//! # Design
//! Independent requests are issued concurrently. Reference data only feeds
//! display labels, so its failures are logged and replaced with defaults
//! instead of failing the whole view; the primary resource's failure is
//! always propagated.

use futures::future::join_all;
use thiserror::Error;
use tracing::warn;

use crate::client::CareersClient;
use crate::error::ApiError;
use crate::http::FilePayload;
use crate::types::{
    Application, Candidate, CompanyDepartment, CompanyHeadquarter, JobPosting, NewApplication,
    NewCandidate,
};

pub const DEFAULT_LOCATION: &str = "Hồ Chí Minh";
pub const DEFAULT_DEPARTMENT: &str = "Engineering";

/// A posting with its reference labels resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDetails {
    pub job: JobPosting,
    pub department: String,
    pub location: String,
}

pub fn resolve_location(headquarters: &[CompanyHeadquarter], headquarter_id: Option<i64>) -> String {
    headquarter_id
        .and_then(|id| headquarters.iter().find(|hq| hq.headquarter_id == id))
        .map(|hq| hq.city.trim())
        .filter(|city| !city.is_empty())
        .unwrap_or(DEFAULT_LOCATION)
        .to_string()
}

pub fn resolve_department(departments: &[CompanyDepartment], department_id: Option<i64>) -> String {
    department_id
        .and_then(|id| departments.iter().find(|d| d.department_id == id))
        .map(|d| d.department_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DEPARTMENT)
        .to_string()
}

fn or_default<T>(result: Result<Vec<T>, ApiError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!(status = err.status(), error = %err, "failed to load {what}, using defaults");
        Vec::new()
    })
}

/// Fetch a posting together with the department and headquarters lists.
///
/// # Errors
///
/// Only the posting's own failure is returned.
pub async fn job_details(client: &CareersClient, id: i64) -> Result<JobDetails, ApiError> {
    let (job, departments, headquarters) = tokio::join!(
        client.get_job_posting(id),
        client.get_departments(),
        client.get_headquarters(),
    );
    let job = job?;
    let departments = or_default(departments, "departments");
    let headquarters = or_default(headquarters, "headquarters");

    let location = match job.location.as_deref().map(str::trim) {
        Some(location) if !location.is_empty() => location.to_string(),
        _ => resolve_location(&headquarters, job.headquarter_id),
    };
    let department = resolve_department(&departments, job.department_id);
    Ok(JobDetails {
        job,
        department,
        location,
    })
}

/// An application with its posting, when the posting could be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationWithJob {
    pub application: Application,
    pub job: Option<JobPosting>,
}

/// Look up everything submitted under `email`. A blank email returns no
/// results without touching the network.
///
/// # Errors
///
/// Fails only if the application lookup itself fails; postings that cannot
/// be fetched are left as `None`.
pub async fn application_status(
    client: &CareersClient,
    email: &str,
) -> Result<Vec<ApplicationWithJob>, ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(Vec::new());
    }

    let applications = client.get_applications_by_email(email).await?;
    let jobs = join_all(
        applications
            .iter()
            .map(|app| client.get_job_posting(app.job_posting_id)),
    )
    .await;

    Ok(applications
        .into_iter()
        .zip(jobs)
        .map(|(application, job)| {
            let job = job
                .inspect_err(|err| {
                    warn!(
                        job_posting_id = application.job_posting_id,
                        error = %err,
                        "failed to load job posting for application"
                    );
                })
                .ok();
            ApplicationWithJob { application, job }
        })
        .collect())
}

/// Everything the apply form collects.
#[derive(Debug, Clone)]
pub struct SubmitApplication {
    pub job_posting_id: i64,
    pub candidate: NewCandidate,
    pub cover_letter: Option<String>,
    pub resume: FilePayload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedApplication {
    pub candidate: Candidate,
    pub application: Application,
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(
        "this email is already registered; if you applied before, contact us to update your \
         details, or use a different email"
    )]
    DuplicateEmail(#[source] ApiError),

    #[error("could not create candidate profile: {0}")]
    Candidate(#[source] ApiError),

    #[error("could not upload résumé: {0}")]
    Upload(#[source] ApiError),

    #[error("could not submit application: {0}")]
    Application(#[source] ApiError),
}

impl ApplyError {
    pub fn api_error(&self) -> &ApiError {
        match self {
            Self::DuplicateEmail(e) | Self::Candidate(e) | Self::Upload(e) | Self::Application(e) => e,
        }
    }
}

/// Create the candidate, upload the résumé, then create the application
/// pointing at the uploaded file. Steps run in order and stop at the first
/// failure.
///
/// # Errors
///
/// Reports which step failed; a reused email is singled out.
pub async fn submit_application(
    client: &CareersClient,
    submission: SubmitApplication,
) -> Result<SubmittedApplication, ApplyError> {
    let candidate = client
        .create_candidate(&submission.candidate)
        .await
        .map_err(|err| {
            if err.is_duplicate_email() {
                ApplyError::DuplicateEmail(err)
            } else {
                ApplyError::Candidate(err)
            }
        })?;

    let uploaded = client
        .upload_resume(
            submission.resume,
            submission.job_posting_id,
            candidate.candidate_id,
        )
        .await
        .map_err(ApplyError::Upload)?;

    let application = client
        .create_application(&NewApplication {
            candidate_id: candidate.candidate_id,
            job_posting_id: submission.job_posting_id,
            cover_letter: submission
                .cover_letter
                .filter(|letter| !letter.trim().is_empty()),
            resume_url: Some(uploaded.file_url),
        })
        .await
        .map_err(ApplyError::Application)?;

    Ok(SubmittedApplication {
        candidate,
        application,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hq(id: i64, city: &str) -> CompanyHeadquarter {
        CompanyHeadquarter {
            headquarter_id: id,
            headquarter_name: format!("HQ {id}"),
            headquarter_address: String::new(),
            headquarter_phone: String::new(),
            headquarter_email: String::new(),
            city: city.to_string(),
            postal_code: None,
            description: None,
            is_main_headquarter: false,
            is_active: true,
        }
    }

    fn dept(id: i64, name: &str) -> CompanyDepartment {
        CompanyDepartment {
            department_id: id,
            department_name: name.to_string(),
            description: None,
            department_code: String::new(),
            headquarter_id: None,
            is_active: true,
        }
    }

    #[test]
    fn location_falls_back_to_default() {
        let hqs = vec![hq(1, "Hà Nội"), hq(2, " ")];
        assert_eq!(resolve_location(&hqs, Some(1)), "Hà Nội");
        assert_eq!(resolve_location(&hqs, Some(2)), DEFAULT_LOCATION);
        assert_eq!(resolve_location(&hqs, Some(9)), DEFAULT_LOCATION);
        assert_eq!(resolve_location(&hqs, None), DEFAULT_LOCATION);
        assert_eq!(resolve_location(&[], Some(1)), DEFAULT_LOCATION);
    }

    #[test]
    fn department_falls_back_to_default() {
        let depts = vec![dept(3, "Data")];
        assert_eq!(resolve_department(&depts, Some(3)), "Data");
        assert_eq!(resolve_department(&depts, Some(4)), DEFAULT_DEPARTMENT);
        assert_eq!(resolve_department(&[], None), DEFAULT_DEPARTMENT);
    }

    #[tokio::test]
    async fn blank_email_skips_the_network() {
        // Nothing listens on port 9; any request would fail.
        let client = CareersClient::new(
            crate::config::ClientConfig::new("http://127.0.0.1:9").unwrap(),
        )
        .unwrap();
        assert!(application_status(&client, "   ").await.unwrap().is_empty());
    }
}
