//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own seeded mock server on a random port, so tests
//! never share state, then drives the client over real HTTP. This is where
//! drift between the client DTOs and the server's JSON shows up.

use careers_core::views::{self, ApplyError, SubmitApplication, DEFAULT_LOCATION};
use careers_core::{
    ApplicationStatus, CandidatePatch, CareersClient, ClientConfig, EmploymentType, FilePayload,
    JobPostingFilters, JobStatus, NewCandidate, ProgressStep,
};
use mock_server::ResponseStyle;

/// Start a seeded mock server on its own runtime and return its base URL.
fn spawn_server(style: ResponseStyle) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, style).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client_for(base_url: &str) -> CareersClient {
    CareersClient::new(ClientConfig::new(base_url).unwrap()).unwrap()
}

fn applicant(email: &str) -> NewCandidate {
    NewCandidate {
        first_name: "An".to_string(),
        last_name: "Nguyen".to_string(),
        email: email.to_string(),
        phone_number: "0901234567".to_string(),
        city: "Hồ Chí Minh".to_string(),
        skills: "Rust, SQL".to_string(),
        ..Default::default()
    }
}

fn resume() -> FilePayload {
    FilePayload::new("an-nguyen.pdf", "application/pdf", b"%PDF-1.4 resume".to_vec())
}

#[tokio::test]
async fn apply_flow_end_to_end() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));

    // Step 1: browse open postings.
    let filters = JobPostingFilters {
        status: Some(JobStatus::Published),
        ..Default::default()
    };
    let jobs = client.get_job_postings(&filters).await.unwrap();
    assert_eq!(jobs.len(), 3);
    assert!(jobs.iter().all(|job| job.status == JobStatus::Published));

    // Step 2: open one, with reference labels resolved.
    let details = views::job_details(&client, 1).await.unwrap();
    assert_eq!(details.job.title, "Senior Backend Engineer");
    assert_eq!(details.department, "Engineering");
    assert_eq!(details.location, "Hồ Chí Minh");
    assert_eq!(details.job.employment_type, EmploymentType::FullTime);

    // Step 3: apply.
    let submitted = views::submit_application(
        &client,
        SubmitApplication {
            job_posting_id: 1,
            candidate: applicant("an@example.com"),
            cover_letter: Some("I would love to join.".to_string()),
            resume: resume(),
        },
    )
    .await
    .unwrap();
    assert_eq!(submitted.candidate.email, "an@example.com");
    assert_eq!(submitted.application.status, ApplicationStatus::Submitted);
    assert_eq!(submitted.application.progress_step(), ProgressStep::Submitted);
    let resume_url = submitted.application.resume_url.clone().unwrap();
    assert!(resume_url.starts_with("/api/v1/recruitment-service/files/resume/"));

    // Step 4: look the application up by email.
    let status = views::application_status(&client, " an@example.com ").await.unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].application.application_id, submitted.application.application_id);
    assert_eq!(
        status[0].job.as_ref().map(|job| job.title.as_str()),
        Some("Senior Backend Engineer")
    );

    // Step 5: the same lookups by id.
    let by_candidate = client
        .get_applications_by_candidate(submitted.candidate.candidate_id)
        .await
        .unwrap();
    assert_eq!(by_candidate, vec![submitted.application.clone()]);
    let fetched = client
        .get_application(submitted.application.application_id)
        .await
        .unwrap();
    assert_eq!(fetched.cover_letter.as_deref(), Some("I would love to join."));

    // Step 6: update the profile.
    let patch = CandidatePatch {
        city: Some("Hà Nội".to_string()),
        ..Default::default()
    };
    let updated = client
        .update_candidate(submitted.candidate.candidate_id, &patch)
        .await
        .unwrap();
    assert_eq!(updated.city, "Hà Nội");
    assert_eq!(updated.skills, "Rust, SQL");
    let reloaded = client.get_candidate(updated.candidate_id).await.unwrap();
    assert_eq!(reloaded.city, "Hà Nội");
}

#[tokio::test]
async fn reused_email_is_reported_as_duplicate() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));
    client.create_candidate(&applicant("an@example.com")).await.unwrap();

    let err = views::submit_application(
        &client,
        SubmitApplication {
            job_posting_id: 2,
            candidate: applicant("AN@example.com"),
            cover_letter: None,
            resume: resume(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplyError::DuplicateEmail(_)), "{err:?}");
    assert_eq!(err.api_error().status(), 400);
    assert_eq!(err.api_error().message(), "Email already exists");
}

#[tokio::test]
async fn applying_to_a_closed_posting_fails_at_the_last_step() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));

    let err = views::submit_application(
        &client,
        SubmitApplication {
            job_posting_id: 5,
            candidate: applicant("binh@example.com"),
            cover_letter: None,
            resume: resume(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplyError::Application(_)), "{err:?}");
    assert_eq!(err.api_error().status(), 400);
}

#[tokio::test]
async fn missing_posting_is_not_found() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));

    let err = client.get_job_posting(999).await.unwrap_err();
    assert_eq!(err.status(), 404);
    assert!(err.is_not_found());
    assert_eq!(err.message(), "Job posting not found");

    let err = views::job_details(&client, 999).await.unwrap_err();
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));

    let first = client.get_job_posting(2).await.unwrap();
    let second = client.get_job_posting(2).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn bare_responses_decode_the_same() {
    let enveloped = client_for(&spawn_server(ResponseStyle::Envelope));
    let bare = client_for(&spawn_server(ResponseStyle::Bare));

    let a = enveloped.get_job_posting(3).await.unwrap();
    let b = bare.get_job_posting(3).await.unwrap();
    assert_eq!(a.title, b.title);
    assert_eq!(a.employment_type, EmploymentType::Internship);

    let headquarters = bare.get_headquarters().await.unwrap();
    assert_eq!(headquarters.len(), 2);
    assert!(headquarters.iter().any(|hq| hq.is_main_headquarter && hq.city == DEFAULT_LOCATION));
}

#[tokio::test]
async fn listing_filters_reach_the_server() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));

    let filters = JobPostingFilters {
        search: Some("  analyst ".to_string()),
        ..Default::default()
    };
    let jobs = client.get_job_postings(&filters).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_posting_id, 2);

    let paged = JobPostingFilters {
        page: Some(2),
        limit: Some(2),
        ..Default::default()
    };
    let ids: Vec<i64> = client
        .get_job_postings(&paged)
        .await
        .unwrap()
        .iter()
        .map(|job| job.job_posting_id)
        .collect();
    assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn reference_data_decodes() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));

    let departments = client.get_departments().await.unwrap();
    let positions = client.get_positions().await.unwrap();
    assert_eq!(departments.len(), 3);
    assert_eq!(positions.len(), 3);
    assert!(positions.iter().all(|p| p.min_salary <= p.max_salary));
}

#[tokio::test]
async fn unknown_email_has_no_applications() {
    let client = client_for(&spawn_server(ResponseStyle::Envelope));
    let status = views::application_status(&client, "nobody@example.com").await.unwrap();
    assert!(status.is_empty());
}
