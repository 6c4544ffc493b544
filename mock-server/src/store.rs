//! In-memory backing store, seeded with reference data and a few postings.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::models::{
    Application, ApplicationQuery, Candidate, CreateApplication, CreateCandidate, Department,
    Headquarter, JobPosting, JobPostingQuery, Position, StoredFile, UpdateCandidate,
};

/// Why a store operation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(&'static str),
    Invalid(String),
}

#[derive(Debug, Default)]
pub struct Store {
    pub job_postings: Vec<JobPosting>,
    pub candidates: Vec<Candidate>,
    pub applications: Vec<Application>,
    pub departments: Vec<Department>,
    pub positions: Vec<Position>,
    pub headquarters: Vec<Headquarter>,
    pub files: HashMap<String, StoredFile>,
}

impl Store {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let now = Utc::now();
        let deadline = Some(now + Duration::days(30));

        let headquarters = vec![
            headquarter(1, "TechLeet Sài Gòn", "Hồ Chí Minh", true),
            headquarter(2, "TechLeet Hà Nội", "Hà Nội", false),
        ];
        let departments = vec![
            department(1, "Engineering", "ENG", 1),
            department(2, "Data", "DATA", 2),
            department(3, "Design", "DES", 1),
        ];
        let positions = vec![
            position(1, "Backend Engineer", "BE", 3, 30_000_000.0, 50_000_000.0),
            position(2, "Data Analyst", "DA", 2, 18_000_000.0, 30_000_000.0),
            position(3, "Product Designer", "PD", 1, 5_000_000.0, 8_000_000.0),
        ];

        let job = |id: i64, title: &str, kind: &str, level: &str, status: &str, dept: i64, hq: i64, salary: (f64, f64)| {
            JobPosting {
                job_posting_id: id,
                slug: slugify(title, id),
                title: title.to_string(),
                description: format!("Join TechLeet as a {title}."),
                requirements: "Solid fundamentals and good communication.".to_string(),
                benefits: "13th-month salary, private insurance, hybrid work.".to_string(),
                min_salary: Some(salary.0),
                max_salary: Some(salary.1),
                employment_type: kind.to_string(),
                experience_level: level.to_string(),
                status: status.to_string(),
                application_deadline: deadline,
                department_id: dept,
                position_id: dept,
                headquarter_id: hq,
                created_at: now,
                updated_at: now,
                is_active: true,
            }
        };
        let job_postings = vec![
            job(1, "Senior Backend Engineer", "full-time", "senior", "published", 1, 1, (30_000_000.0, 50_000_000.0)),
            job(2, "Data Analyst", "full-time", "mid", "published", 2, 2, (18_000_000.0, 30_000_000.0)),
            job(3, "Product Design Intern", "internship", "entry", "published", 3, 1, (5_000_000.0, 8_000_000.0)),
            job(4, "Engineering Manager", "full-time", "lead", "draft", 1, 1, (60_000_000.0, 90_000_000.0)),
            job(5, "QA Engineer", "contract", "mid", "closed", 1, 2, (20_000_000.0, 28_000_000.0)),
        ];

        Self {
            job_postings,
            departments,
            positions,
            headquarters,
            ..Self::default()
        }
    }

    /// Published postings matching `query`, ordered by id. Pages are 1-based.
    pub fn list_job_postings(&self, query: &JobPostingQuery) -> Vec<JobPosting> {
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matches: Vec<JobPosting> = self
            .job_postings
            .iter()
            .filter(|job| match query.status.as_deref() {
                Some("published") | Some("active") => job.is_published(),
                Some(status) => job.status == status,
                None => true,
            })
            .filter(|job| query.department_id.is_none_or_eq(job.department_id))
            .filter(|job| query.headquarter_id.is_none_or_eq(job.headquarter_id))
            .filter(|job| {
                query
                    .employment_type
                    .as_deref()
                    .map_or(true, |t| job.employment_type == t)
            })
            .filter(|job| {
                query
                    .experience_level
                    .as_deref()
                    .map_or(true, |l| job.experience_level == l)
            })
            .filter(|job| {
                query
                    .min_salary
                    .map_or(true, |min| job.max_salary.map_or(true, |max| max >= min))
            })
            .filter(|job| {
                query
                    .max_salary
                    .map_or(true, |max| job.min_salary.map_or(true, |min| min <= max))
            })
            .filter(|job| {
                search.as_deref().map_or(true, |needle| {
                    job.title.to_lowercase().contains(needle)
                        || job.description.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();
        matches.sort_by_key(|job| job.job_posting_id);

        match query.limit.filter(|limit| *limit > 0) {
            Some(limit) => {
                let page = query.page.unwrap_or(1).max(1);
                let offset = (page - 1).saturating_mul(limit);
                matches.into_iter().skip(offset).take(limit).collect()
            }
            None => matches,
        }
    }

    pub fn job_posting(&self, id: i64) -> Option<&JobPosting> {
        self.job_postings.iter().find(|job| job.job_posting_id == id)
    }

    pub fn candidate(&self, id: i64) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.candidate_id == id)
    }

    pub fn create_candidate(&mut self, input: CreateCandidate) -> Result<Candidate, StoreError> {
        let email = input.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(StoreError::Invalid("email must be an email".to_string()));
        }
        if self.candidates.iter().any(|c| c.email == email) {
            return Err(StoreError::Invalid("Email already exists".to_string()));
        }
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(StoreError::Invalid("firstName and lastName are required".to_string()));
        }

        let now = Utc::now();
        let candidate = Candidate {
            candidate_id: next_id(self.candidates.iter().map(|c| c.candidate_id)),
            first_name: input.first_name,
            last_name: input.last_name,
            email,
            phone_number: input.phone_number,
            date_of_birth: input.date_of_birth,
            address: input.address,
            city: input.city,
            postal_code: input.postal_code,
            education: input.education,
            work_experience: input.work_experience,
            skills: input.skills,
            certifications: input.certifications,
            portfolio_url: input.portfolio_url,
            linkedin_url: input.linkedin_url,
            resume_url: input.resume_url,
            status: input.status.unwrap_or_else(|| "active".to_string()),
            created_at: now,
            updated_at: now,
        };
        self.candidates.push(candidate.clone());
        Ok(candidate)
    }

    pub fn update_candidate(&mut self, id: i64, input: UpdateCandidate) -> Result<Candidate, StoreError> {
        let candidate = self
            .candidates
            .iter_mut()
            .find(|c| c.candidate_id == id)
            .ok_or(StoreError::NotFound("Candidate not found"))?;

        let set = |field: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *field = value;
            }
        };
        set(&mut candidate.first_name, input.first_name);
        set(&mut candidate.last_name, input.last_name);
        set(&mut candidate.phone_number, input.phone_number);
        set(&mut candidate.address, input.address);
        set(&mut candidate.city, input.city);
        set(&mut candidate.education, input.education);
        set(&mut candidate.work_experience, input.work_experience);
        set(&mut candidate.skills, input.skills);
        set(&mut candidate.status, input.status);
        candidate.postal_code = input.postal_code.or(candidate.postal_code.take());
        candidate.certifications = input.certifications.or(candidate.certifications.take());
        candidate.portfolio_url = input.portfolio_url.or(candidate.portfolio_url.take());
        candidate.linkedin_url = input.linkedin_url.or(candidate.linkedin_url.take());
        candidate.resume_url = input.resume_url.or(candidate.resume_url.take());
        candidate.updated_at = Utc::now();
        Ok(candidate.clone())
    }

    pub fn create_application(&mut self, input: CreateApplication) -> Result<Application, StoreError> {
        if self.candidate(input.candidate_id).is_none() {
            return Err(StoreError::NotFound("Candidate not found"));
        }
        let job = self
            .job_posting(input.job_posting_id)
            .ok_or(StoreError::NotFound("Job posting not found"))?;
        if !job.is_published() {
            return Err(StoreError::Invalid(
                "Job posting is not accepting applications".to_string(),
            ));
        }
        if self
            .applications
            .iter()
            .any(|a| a.candidate_id == input.candidate_id && a.job_posting_id == input.job_posting_id)
        {
            return Err(StoreError::Invalid(
                "Candidate has already applied for this job posting".to_string(),
            ));
        }

        let application = Application {
            application_id: next_id(self.applications.iter().map(|a| a.application_id)),
            candidate_id: input.candidate_id,
            job_posting_id: input.job_posting_id,
            cover_letter: input.cover_letter,
            resume_url: input.resume_url,
            status: "submitted".to_string(),
            applied_at: Utc::now(),
            screening_status: None,
        };
        self.applications.push(application.clone());
        Ok(application)
    }

    pub fn application(&self, id: i64) -> Option<&Application> {
        self.applications.iter().find(|a| a.application_id == id)
    }

    /// Applications filtered by candidate id and/or the candidate's email.
    pub fn list_applications(&self, query: &ApplicationQuery) -> Vec<Application> {
        let email = query.email.as_deref().map(|e| e.trim().to_lowercase());
        let email_owner = email
            .as_deref()
            .map(|email| self.candidates.iter().find(|c| c.email == email).map(|c| c.candidate_id));

        self.applications
            .iter()
            .filter(|a| query.candidate_id.is_none_or_eq(a.candidate_id))
            .filter(|a| match email_owner {
                None => true,
                Some(owner) => owner == Some(a.candidate_id),
            })
            .cloned()
            .collect()
    }
}

trait OptionEq<T> {
    fn is_none_or_eq(&self, value: T) -> bool;
}

impl<T: PartialEq> OptionEq<T> for Option<T> {
    fn is_none_or_eq(&self, value: T) -> bool {
        self.as_ref().map_or(true, |expected| *expected == value)
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

fn slugify(title: &str, id: i64) -> String {
    let words: Vec<String> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    format!("{}-{id}", words.join("-"))
}

fn headquarter(id: i64, name: &str, city: &str, main: bool) -> Headquarter {
    Headquarter {
        headquarter_id: id,
        headquarter_name: name.to_string(),
        headquarter_address: format!("1 Main Street, {city}"),
        headquarter_phone: "+84 28 0000 0000".to_string(),
        headquarter_email: "careers@techleet.example".to_string(),
        city: city.to_string(),
        postal_code: None,
        description: None,
        is_main_headquarter: main,
        is_active: true,
    }
}

fn department(id: i64, name: &str, code: &str, headquarter_id: i64) -> Department {
    Department {
        department_id: id,
        department_name: name.to_string(),
        description: None,
        department_code: code.to_string(),
        headquarter_id,
        is_active: true,
    }
}

fn position(id: i64, name: &str, code: &str, level: i32, min: f64, max: f64) -> Position {
    Position {
        position_id: id,
        position_name: name.to_string(),
        description: format!("{name} role"),
        min_salary: min,
        max_salary: max,
        level,
        position_code: code.to_string(),
        requirements: None,
        is_active: true,
    }
}
