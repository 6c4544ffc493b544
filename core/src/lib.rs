//! Async API client for the careers site backend.
//!
//! # Overview
//! Talks to the recruitment and company services: job postings, candidates,
//! applications, résumé uploads and company reference data. Every call is a
//! single HTTP round trip that returns a typed payload or one `ApiError`.
//!
//! # Design
//! - `CareersClient` is built from an explicit `ClientConfig`; there is no
//!   global instance.
//! - Request construction (`build_request`) and response interpretation
//!   (`parse_response`) are pure; only `execute` does I/O.
//! - Responses may or may not be wrapped in a `{ data, ... }` envelope; both
//!   shapes decode to the same types.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod http;
pub mod query;
pub mod slug;
pub mod types;
pub mod views;

pub use client::{parse_response, Body, CareersClient, RequestOptions};
pub use config::{ClientConfig, ConfigError};
pub use envelope::{Envelope, Payload, ResponseBody};
pub use error::{ApiError, ErrorBody, ErrorClass};
pub use http::{FilePayload, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use query::{QueryParams, QueryValue};
pub use types::{
    Application, ApplicationStatus, Candidate, CandidatePatch, CandidateStatus,
    CompanyDepartment, CompanyHeadquarter, CompanyPosition, EmploymentType, ExperienceLevel,
    JobPosting, JobPostingFilters, JobStatus, NewApplication, NewCandidate, ProgressStep,
    SalaryRange, UploadedFile,
};
