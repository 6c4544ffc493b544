//! One method per backend operation.
//!
//! Each method fixes the verb, path and payload shape and otherwise defers
//! to the generic helpers on `CareersClient`. Every call is a single network
//! round trip.

use crate::client::{CareersClient, RequestOptions};
use crate::error::ApiError;
use crate::http::FilePayload;
use crate::query::QueryParams;
use crate::types::{
    Application, Candidate, CandidatePatch, CompanyDepartment, CompanyHeadquarter,
    CompanyPosition, JobPosting, JobPostingFilters, NewApplication, NewCandidate, UploadedFile,
};

pub const RECRUITMENT_SERVICE: &str = "/api/v1/recruitment-service";
pub const COMPANY_SERVICE: &str = "/api/v1/company-service";

fn recruitment(path: &str) -> String {
    format!("{RECRUITMENT_SERVICE}/{path}")
}

fn company(path: &str) -> String {
    format!("{COMPANY_SERVICE}/{path}")
}

impl CareersClient {
    pub async fn get_job_postings(
        &self,
        filters: &JobPostingFilters,
    ) -> Result<Vec<JobPosting>, ApiError> {
        let options = RequestOptions::new().params(filters.to_query());
        self.get(&recruitment("job-postings"), options).await
    }

    /// Fetch a posting by numeric id. Map a slug to its id with
    /// `slug::job_id_from_slug` first.
    pub async fn get_job_posting(&self, id: i64) -> Result<JobPosting, ApiError> {
        self.get(&recruitment(&format!("job-postings/{id}")), RequestOptions::new())
            .await
    }

    /// Create a candidate. A reused email comes back as a 400; check
    /// `ApiError::is_duplicate_email` to tell it apart from other
    /// validation failures.
    pub async fn create_candidate(&self, candidate: &NewCandidate) -> Result<Candidate, ApiError> {
        self.post(&recruitment("candidates"), candidate, RequestOptions::new())
            .await
    }

    pub async fn get_candidate(&self, id: i64) -> Result<Candidate, ApiError> {
        self.get(&recruitment(&format!("candidates/{id}")), RequestOptions::new())
            .await
    }

    pub async fn update_candidate(
        &self,
        id: i64,
        patch: &CandidatePatch,
    ) -> Result<Candidate, ApiError> {
        self.patch(
            &recruitment(&format!("candidates/{id}")),
            patch,
            RequestOptions::new(),
        )
        .await
    }

    pub async fn create_application(
        &self,
        application: &NewApplication,
    ) -> Result<Application, ApiError> {
        self.post(&recruitment("applications"), application, RequestOptions::new())
            .await
    }

    pub async fn get_applications_by_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<Application>, ApiError> {
        let options =
            RequestOptions::new().params(QueryParams::new().push("candidateId", candidate_id));
        self.get(&recruitment("applications"), options).await
    }

    /// Applications submitted under `email`, for applicants without an
    /// account.
    pub async fn get_applications_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Application>, ApiError> {
        let options = RequestOptions::new().params(QueryParams::new().push("email", email));
        self.get(&recruitment("applications"), options).await
    }

    pub async fn get_application(&self, id: i64) -> Result<Application, ApiError> {
        self.get(&recruitment(&format!("applications/{id}")), RequestOptions::new())
            .await
    }

    pub async fn get_departments(&self) -> Result<Vec<CompanyDepartment>, ApiError> {
        self.get(&company("departments"), RequestOptions::new()).await
    }

    pub async fn get_positions(&self) -> Result<Vec<CompanyPosition>, ApiError> {
        self.get(&company("positions"), RequestOptions::new()).await
    }

    pub async fn get_headquarters(&self) -> Result<Vec<CompanyHeadquarter>, ApiError> {
        self.get(&company("headquarters"), RequestOptions::new()).await
    }

    pub async fn upload_resume(
        &self,
        file: FilePayload,
        job_id: i64,
        candidate_id: i64,
    ) -> Result<UploadedFile, ApiError> {
        self.upload(
            &recruitment("files/resume"),
            file,
            [("jobId", job_id), ("candidateId", candidate_id)],
        )
        .await
    }
}
