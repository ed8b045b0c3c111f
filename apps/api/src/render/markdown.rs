use anyhow::Result;

use crate::models::dossier::{Dossier, TechnicalSkills};
use crate::render::DossierRenderer;

pub struct MarkdownRenderer;

impl DossierRenderer for MarkdownRenderer {
    fn media_type(&self) -> &'static str {
        "text/markdown; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, dossier: &Dossier) -> Result<Vec<u8>> {
        Ok(render_dossier_to_md(dossier).into_bytes())
    }
}

fn category_label(category: &str) -> &'static str {
    match category {
        "language_framework" => "Languages & frameworks",
        "ci_cd" => "CI/CD",
        "state_management" => "State management",
        "tests" => "Tests",
        "tools" => "Tools",
        "database_bigdata" => "Databases & big data",
        "data_analytics_visualisation" => "Data analytics & visualisation",
        "collaboration" => "Collaboration",
        "ux_ui" => "UX/UI",
        _ => "Other",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn push_bullets(md: &mut String, items: &[String]) {
    for item in items.iter().filter(|i| !i.trim().is_empty()) {
        md.push_str(&format!("- {item}\n"));
    }
}

fn push_skill_lines(md: &mut String, skills: &TechnicalSkills) {
    for (category, items) in skills.categories() {
        if !items.is_empty() {
            md.push_str(&format!(
                "- **{}:** {}\n",
                category_label(category),
                items.join(", ")
            ));
        }
    }
}

/// Renders the dossier as a Markdown document. Empty sections are omitted.
pub fn render_dossier_to_md(dossier: &Dossier) -> String {
    let header = &dossier.header;
    let name = dossier.full_name();
    let mut md = format!(
        "# {}\n\n",
        if name.is_empty() { "Skills dossier" } else { name.as_str() }
    );

    let mut headline = Vec::new();
    if !header.job_title.is_empty() {
        headline.push(format!("**{}**", header.job_title));
    }
    if !header.years_of_experience.is_empty() {
        headline.push(format!("{} years of experience", header.years_of_experience));
    }
    if !headline.is_empty() {
        md.push_str(&format!("{}\n\n", headline.join(" | ")));
    }
    if !header.profile_summary.is_empty() {
        md.push_str(&format!("## Profile\n\n{}\n\n", header.profile_summary));
    }

    if !dossier.recent_key_experiences.is_empty() {
        md.push_str("## Recent key experiences\n\n");
        for exp in &dossier.recent_key_experiences {
            md.push_str(&format!("### {} | {}\n", exp.role, exp.client));
            if !exp.duration.is_empty() {
                md.push_str(&format!("*{}*\n\n", exp.duration));
            }
            if !exp.description.is_empty() {
                md.push_str(&format!("{}\n\n", exp.description));
            }
            push_bullets(&mut md, &exp.responsibilities);
            md.push('\n');
        }
    }

    if !dossier.technical_skills.is_empty() {
        md.push_str("## Technical skills\n\n");
        push_skill_lines(&mut md, &dossier.technical_skills);
        md.push('\n');
    }

    let functional = &dossier.functional_skills;
    md.push_str("## Functional skills\n\n");
    if !functional.project_management.is_empty() {
        md.push_str(&format!(
            "- **Project management:** {}\n",
            functional.project_management.join(", ")
        ));
    }
    if !functional.scrum_methodology.is_empty() {
        md.push_str(&format!(
            "- **Scrum methodology:** {}\n",
            functional.scrum_methodology.join(", ")
        ));
    }
    md.push_str(&format!("- **Code review:** {}\n", yes_no(functional.code_review)));
    md.push_str(&format!(
        "- **Pair programming:** {}\n",
        yes_no(functional.pair_programming)
    ));
    md.push_str(&format!(
        "- **Deliverable quality:** {}\n",
        yes_no(functional.deliverable_quality)
    ));
    if !functional.mentoring.is_empty() {
        md.push_str(&format!("- **Mentoring:** {}\n", functional.mentoring));
    }
    md.push('\n');

    if !dossier.detailed_experiences.is_empty() {
        md.push_str("## Professional experience\n\n");
        for exp in &dossier.detailed_experiences {
            md.push_str(&format!("### {} | {}\n", exp.role, exp.client));
            if !exp.start_date.is_empty() || !exp.end_date.is_empty() {
                md.push_str(&format!("*{} → {}*\n\n", exp.start_date, exp.end_date));
            }
            if !exp.context.is_empty() {
                md.push_str(&format!("{}\n\n", exp.context));
            }
            if !exp.responsibilities.is_empty() {
                md.push_str("**Responsibilities**\n\n");
                push_bullets(&mut md, &exp.responsibilities);
                md.push('\n');
            }
            if !exp.deliverables.is_empty() {
                md.push_str("**Deliverables**\n\n");
                push_bullets(&mut md, &exp.deliverables);
                md.push('\n');
            }
            if !exp.technical_environment.is_empty() {
                md.push_str("**Technical environment**\n\n");
                push_skill_lines(&mut md, &exp.technical_environment);
                md.push('\n');
            }
        }
    }

    if !dossier.education.is_empty() {
        md.push_str("## Education\n\n");
        for edu in &dossier.education {
            md.push_str(&format!("- {}, {} ({})\n", edu.degree, edu.institution, edu.year));
        }
        md.push('\n');
    }

    if !dossier.certifications.is_empty() {
        md.push_str("## Certifications\n\n");
        for cert in &dossier.certifications {
            md.push_str(&format!("- {}, {} ({})\n", cert.title, cert.issuer, cert.year));
        }
        md.push('\n');
    }

    if !dossier.languages.is_empty() {
        md.push_str("## Languages\n\n");
        for lang in &dossier.languages {
            md.push_str(&format!("- {}: {}\n", lang.language, lang.level));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::dossier_payload;

    #[test]
    fn test_full_dossier_renders_every_section() {
        let dossier: Dossier = serde_json::from_value(dossier_payload("Jeanne")).unwrap();
        let md = render_dossier_to_md(&dossier);
        assert!(md.starts_with("# Jeanne Martin\n"));
        assert!(md.contains("**Lead Backend Developer** | 8 years of experience"));
        assert!(md.contains("- **Languages & frameworks:** Rust, Go"));
        assert!(md.contains("*2021-01 → 2024-01*"));
        assert!(md.contains("- **Mentoring:** Mentored 2 junior developers"));
        assert!(md.contains("- English: C1"));
        assert!(!md.contains("State management"));
    }

    #[test]
    fn test_empty_dossier_renders_without_panicking() {
        let md = render_dossier_to_md(&Dossier::default());
        assert!(md.starts_with("# Skills dossier"));
        assert!(!md.contains("## Education"));
        assert!(md.contains("- **Code review:** No"));
    }
}
