//! Post-extraction normalizer.
//!
//! Pure and total: every step is a best-effort rewrite that leaves a field
//! untouched when it cannot make sense of it.

pub mod dates;
pub mod experience;
pub mod languages;
pub mod skills;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::models::dossier::{Dossier, TechnicalSkills};
use crate::normalizer::dates::{normalize_date, normalize_date_range};
use crate::normalizer::experience::{derive_years, provided_years};
use crate::normalizer::languages::normalize_language_level;
use crate::normalizer::skills::clean_skill_list;

pub fn normalize(dossier: Dossier) -> Dossier {
    normalize_at(dossier, Local::now().date_naive())
}

/// `normalize` with an explicit "today" for open-ended ranges.
pub fn normalize_at(mut dossier: Dossier, today: NaiveDate) -> Dossier {
    for exp in &mut dossier.recent_key_experiences {
        exp.duration = normalize_date_range(&exp.duration);
    }
    for exp in &mut dossier.detailed_experiences {
        exp.start_date = normalize_date(&exp.start_date);
        exp.end_date = normalize_date(&exp.end_date);
        clean_categories(&mut exp.technical_environment);
    }

    for language in &mut dossier.languages {
        language.level = normalize_language_level(&language.level).as_str().to_string();
    }

    let header = &mut dossier.header;
    match provided_years(&header.years_of_experience) {
        Some(years) => header.years_of_experience = years.to_string(),
        None => {
            let derived = derive_years(&dossier.recent_key_experiences, today);
            if derived > 0 {
                info!("Derived years of experience from key experiences: {derived}");
                header.years_of_experience = derived.to_string();
            } else {
                debug!(
                    "Could not derive years of experience, keeping '{}'",
                    header.years_of_experience
                );
            }
        }
    }

    clean_categories(&mut dossier.technical_skills);
    let functional = &mut dossier.functional_skills;
    functional.project_management = clean_skill_list(&functional.project_management);
    functional.scrum_methodology = clean_skill_list(&functional.scrum_methodology);

    dossier
}

fn clean_categories(skills: &mut TechnicalSkills) {
    for category in skills.categories_mut() {
        *category = clean_skill_list(category);
    }
}
