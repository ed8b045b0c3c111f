/// The four proficiency buckets every language level is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageLevel {
    Beginner,
    Intermediate,
    Advanced,
    Native,
}

impl LanguageLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageLevel::Beginner => "beginner",
            LanguageLevel::Intermediate => "intermediate",
            LanguageLevel::Advanced => "advanced",
            LanguageLevel::Native => "native",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        let level = match label {
            "beginner" | "débutant" | "debutant" | "débutante" | "basic" | "basique" | "notions"
            | "elementary" | "élémentaire" | "elementaire" | "scolaire" | "a1" | "a2" => {
                LanguageLevel::Beginner
            }
            "intermediate" | "intermédiaire" | "intermediaire" | "moyen" | "conversational"
            | "b1" | "b2" => LanguageLevel::Intermediate,
            "advanced" | "avancé" | "avance" | "avancée" | "fluent" | "courant" | "courante"
            | "professional" | "professionnel" | "c1" => LanguageLevel::Advanced,
            "native" | "natif" | "native speaker" | "natif/bilingue" | "bilingual" | "bilingue"
            | "maternelle" | "langue maternelle" | "mother tongue" | "mothertongue" | "c2" => {
                LanguageLevel::Native
            }
            _ => return None,
        };
        Some(level)
    }
}

/// Maps a free-text proficiency label onto one of the four levels.
/// Labels like "Courant (C1)" are resolved by their first known word;
/// anything unrecognized is `Intermediate`.
pub fn normalize_language_level(raw: &str) -> LanguageLevel {
    let lower = raw.trim().to_lowercase();
    if let Some(level) = LanguageLevel::from_label(&lower) {
        return level;
    }
    if lower.contains("maternelle") || lower.contains("mother tongue") {
        return LanguageLevel::Native;
    }
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .find_map(LanguageLevel::from_label)
        .unwrap_or(LanguageLevel::Intermediate)
}
