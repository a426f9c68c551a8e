use crate::models::{JobCandidate, Profile};

/// Maximum number of skills named in a profile projection
const MAX_PROFILE_SKILLS: usize = 15;

/// Maximum number of project titles named in a profile projection
const MAX_PROFILE_PROJECTS: usize = 3;

/// Characters of posting body kept in a job projection
pub const JOB_BODY_CHARS: usize = 500;

/// Render a profile as a single sentence for embedding
///
/// Format:
/// `{name} is a {level} level professional[, with {education} degree in {field}]
/// [, skilled in {skills}][, with expertise in {domains}][, having worked on projects like {titles}].`
///
/// Clauses whose source list is empty are left out entirely.
pub fn project_profile(profile: &Profile) -> String {
    let name = profile.name.trim();
    let name = if name.is_empty() { "User" } else { name };

    let mut text = format!("{} is a {} level professional", name, profile.experience_level);

    if let (Some(education), Some(field)) = (
        non_empty(profile.education_level.as_deref()),
        non_empty(profile.field_of_study.as_deref()),
    ) {
        text.push_str(&format!(", with {} degree in {}", education, field));
    }

    let skills = join_non_empty(
        profile
            .skills
            .iter()
            .take(MAX_PROFILE_SKILLS)
            .map(|skill| skill.name.as_str()),
    );
    if !skills.is_empty() {
        text.push_str(&format!(", skilled in {}", skills));
    }

    let domains = join_non_empty(profile.domains.iter().map(|domain| domain.name.as_str()));
    if !domains.is_empty() {
        text.push_str(&format!(", with expertise in {}", domains));
    }

    let projects = join_non_empty(
        profile
            .projects
            .iter()
            .take(MAX_PROFILE_PROJECTS)
            .map(|project| project.title.as_str()),
    );
    if !projects.is_empty() {
        text.push_str(&format!(", having worked on projects like {}", projects));
    }

    text.push('.');
    text
}

/// Render a job posting as a single sentence for embedding
///
/// Format:
/// `Job: {title}[ at {company}][. {body}][. Experience level: {level}]
/// [. Remote work available | . Location: {location}][. Skills: {skills}].`
///
/// The body is flattened to one line and cut at [`JOB_BODY_CHARS`] characters.
pub fn project_job(job: &JobCandidate) -> String {
    let mut text = format!("Job: {}", job.title.trim());

    if let Some(company) = non_empty(job.company.as_deref()) {
        if company != "[deleted]" {
            text.push_str(&format!(" at {}", company));
        }
    }

    let body = flatten_body(&job.body);
    if !body.is_empty() {
        text.push_str(&format!(". {}", body));
    }

    text.push_str(&format!(". Experience level: {}", job.experience_level));

    if job.remote {
        text.push_str(". Remote work available");
    } else if let Some(location) = non_empty(Some(job.location.as_str())) {
        text.push_str(&format!(". Location: {}", location));
    }

    let skills = join_non_empty(job.skills_mentioned.iter().map(String::as_str));
    if !skills.is_empty() {
        text.push_str(&format!(". Skills: {}", skills));
    }

    text.push('.');
    text
}

fn flatten_body(body: &str) -> String {
    let flattened: String = body
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    flattened.trim().chars().take(JOB_BODY_CHARS).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn join_non_empty<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Domain, ExperienceLevel, Proficiency, Project, Skill};

    fn skill(name: &str) -> Skill {
        Skill { name: name.to_string(), proficiency: Proficiency::Intermediate, confidence: 0.8 }
    }

    #[test]
    fn test_project_profile_full() {
        let profile = Profile {
            id: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            experience_level: ExperienceLevel::Entry,
            education_level: Some("Bachelor's".to_string()),
            field_of_study: Some("Computer Science".to_string()),
            skills: vec![skill("python"), skill("sql")],
            domains: vec![Domain { name: "healthcare".to_string(), confidence: 0.7 }],
            projects: vec![Project { title: "Triage Bot".to_string() }],
        };

        assert_eq!(
            project_profile(&profile),
            "Asha is a entry level professional, with Bachelor's degree in Computer Science, \
             skilled in python, sql, with expertise in healthcare, \
             having worked on projects like Triage Bot."
        );
    }

    #[test]
    fn test_project_profile_omits_empty_clauses() {
        let profile = Profile {
            name: "Ravi".to_string(),
            experience_level: ExperienceLevel::Senior,
            education_level: Some("Master's".to_string()),
            ..Profile::default()
        };

        let text = project_profile(&profile);
        assert_eq!(text, "Ravi is a senior level professional.");
        assert!(!text.contains("skilled in"));
        assert!(!text.contains("expertise in"));
        assert!(!text.contains("projects like"));
        assert!(!text.contains("degree"));
    }

    #[test]
    fn test_project_profile_limits() {
        let profile = Profile {
            name: String::new(),
            skills: (0..20).map(|i| skill(&format!("s{}", i))).collect(),
            projects: (0..5).map(|i| Project { title: format!("p{}", i) }).collect(),
            ..Profile::default()
        };

        let text = project_profile(&profile);
        assert!(text.starts_with("User is a entry level professional"));
        assert!(text.contains("s14"));
        assert!(!text.contains("s15"));
        assert!(text.contains("p2"));
        assert!(!text.contains("p3"));
    }

    #[test]
    fn test_project_job_remote() {
        let mut job = JobCandidate::new("Python Intern");
        job.company = Some("acme".to_string());
        job.body = "remote internship,\npython required".to_string();
        job.remote = true;
        job.skills_mentioned = vec!["python".to_string()];

        assert_eq!(
            project_job(&job),
            "Job: Python Intern at acme. remote internship, python required. \
             Experience level: entry. Remote work available. Skills: python."
        );
    }

    #[test]
    fn test_project_job_location_and_deleted_author() {
        let mut job = JobCandidate::new("Senior Java Architect");
        job.company = Some("[deleted]".to_string());
        job.experience_level = ExperienceLevel::Senior;
        job.location = "Berlin".to_string();

        assert_eq!(
            project_job(&job),
            "Job: Senior Java Architect. Experience level: senior. Location: Berlin."
        );
    }

    #[test]
    fn test_project_job_truncates_body() {
        let mut job = JobCandidate::new("Long");
        job.body = "é".repeat(800);

        let text = project_job(&job);
        let body_chars = text.chars().filter(|c| *c == 'é').count();
        assert_eq!(body_chars, JOB_BODY_CHARS);
    }
}
