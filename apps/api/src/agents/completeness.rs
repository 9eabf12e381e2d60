use serde::{Deserialize, Serialize};

use crate::models::user::{is_populated, ProfileView, PROFILE_SECTIONS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Partial,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub entry_count: usize,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub completeness_percentage: f64,
    pub has_basic_info: bool,
    pub has_work_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub missing_sections: Vec<String>,
    pub sections: Vec<SectionHealth>,
}

/// Basic info fields that must all be filled for `has_basic_info`.
const REQUIRED_CONTACT_FIELDS: [&str; 3] = ["name", "email", "phone"];

pub fn compute_completeness_report(profile: ProfileView<'_>) -> CompletenessReport {
    let mut sections = Vec::with_capacity(PROFILE_SECTIONS.len());
    let mut missing_sections = Vec::new();

    for section in PROFILE_SECTIONS {
        if !profile.has_section(section) {
            missing_sections.push(section.to_string());
            sections.push(SectionHealth {
                section: section.to_string(),
                entry_count: 0,
                status: SectionStatus::Missing,
                recommendations: vec![recommendation_for(section).to_string()],
            });
            continue;
        }

        let (entry_count, status, recommendations) = if section == "basic_info" {
            let missing: Vec<&str> = REQUIRED_CONTACT_FIELDS
                .into_iter()
                .filter(|field| profile.basic_field(field).is_empty())
                .collect();
            if missing.is_empty() {
                (1, SectionStatus::Complete, Vec::new())
            } else {
                (
                    1,
                    SectionStatus::Partial,
                    vec![format!("Fill in your {}", missing.join(", "))],
                )
            }
        } else {
            let count = profile
                .entries(section)
                .iter()
                .filter(|entry| is_populated(entry))
                .count();
            // A populated non-list value still counts as one entry.
            (count.max(1), SectionStatus::Complete, Vec::new())
        };

        sections.push(SectionHealth {
            section: section.to_string(),
            entry_count,
            status,
            recommendations,
        });
    }

    let completed = PROFILE_SECTIONS.len() - missing_sections.len();
    let completeness_percentage = completed as f64 / PROFILE_SECTIONS.len() as f64 * 100.0;

    CompletenessReport {
        completeness_percentage,
        has_basic_info: profile.basic_info().is_some()
            && REQUIRED_CONTACT_FIELDS
                .into_iter()
                .all(|field| !profile.basic_field(field).is_empty()),
        has_work_experience: !profile.entries("work_experience").is_empty(),
        has_education: !profile.entries("education").is_empty(),
        has_skills: !profile.entries("skills").is_empty(),
        missing_sections,
        sections,
    }
}

fn recommendation_for(section: &str) -> &'static str {
    match section {
        "basic_info" => "Add your name, email and phone number so employers can reach you",
        "work_experience" => "Add at least one work experience entry",
        "education" => "Add your education history",
        "skills" => "List the skills you want employers to see",
        "projects" => "Add a project that shows your work",
        _ => "Add any certifications you hold",
    }
}
