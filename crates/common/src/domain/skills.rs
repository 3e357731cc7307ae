//! Skill vocabulary and matching
//!
//! Matching is a case-insensitive substring scan, so "Java" also matches
//! inside "JavaScript".

use std::collections::HashSet;

pub const SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "Rust",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring",
    "SQL",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "GraphQL",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "Linux",
    "Terraform",
    "Machine Learning",
    "Data Analysis",
    "HTML",
    "CSS",
];

/// Number of texts mentioning each vocabulary skill, zero counts dropped
pub fn count_skills<'a, I>(texts: I) -> Vec<(&'static str, i64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered: Vec<String> = texts.into_iter().map(str::to_lowercase).collect();

    SKILL_VOCABULARY
        .iter()
        .map(|skill| {
            let needle = skill.to_lowercase();
            let hits = lowered.iter().filter(|t| t.contains(&needle)).count() as i64;
            (*skill, hits)
        })
        .filter(|(_, hits)| *hits > 0)
        .collect()
}

/// Trim, drop blanks and case-insensitive duplicates, keep first spelling
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}
