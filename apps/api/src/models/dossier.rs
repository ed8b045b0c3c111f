use serde::{Deserialize, Serialize};

/// The structured skills dossier produced from one CV.
///
/// Field names are a wire contract shared with renderers and clients.
/// Every list defaults to empty and every scalar to `""`, so an absent key
/// never reaches a consumer as null. `header` and both skill blocks must be
/// present as objects; their contents may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    pub header: Header,
    #[serde(default)]
    pub recent_key_experiences: Vec<KeyExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub languages: Vec<Language>,
    pub technical_skills: TechnicalSkills,
    pub functional_skills: FunctionalSkills,
    #[serde(default)]
    pub detailed_experiences: Vec<DetailedExperience>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub job_title: String,
    /// Free text from the model; normalized to a whole number of years when possible.
    pub years_of_experience: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyExperience {
    pub client: String,
    pub role: String,
    pub duration: String,
    pub description: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub title: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub language: String,
    pub level: String,
}

/// The nine fixed skill buckets, used for the top-level skills and for every
/// detailed experience's technical environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalSkills {
    pub language_framework: Vec<String>,
    pub ci_cd: Vec<String>,
    pub state_management: Vec<String>,
    pub tests: Vec<String>,
    pub tools: Vec<String>,
    pub database_bigdata: Vec<String>,
    pub data_analytics_visualisation: Vec<String>,
    pub collaboration: Vec<String>,
    pub ux_ui: Vec<String>,
}

impl TechnicalSkills {
    pub const CATEGORIES: [&'static str; 9] = [
        "language_framework",
        "ci_cd",
        "state_management",
        "tests",
        "tools",
        "database_bigdata",
        "data_analytics_visualisation",
        "collaboration",
        "ux_ui",
    ];

    /// Category name paired with its skills, in schema order.
    pub fn categories(&self) -> [(&'static str, &Vec<String>); 9] {
        [
            ("language_framework", &self.language_framework),
            ("ci_cd", &self.ci_cd),
            ("state_management", &self.state_management),
            ("tests", &self.tests),
            ("tools", &self.tools),
            ("database_bigdata", &self.database_bigdata),
            ("data_analytics_visualisation", &self.data_analytics_visualisation),
            ("collaboration", &self.collaboration),
            ("ux_ui", &self.ux_ui),
        ]
    }

    pub fn categories_mut(&mut self) -> [&mut Vec<String>; 9] {
        [
            &mut self.language_framework,
            &mut self.ci_cd,
            &mut self.state_management,
            &mut self.tests,
            &mut self.tools,
            &mut self.database_bigdata,
            &mut self.data_analytics_visualisation,
            &mut self.collaboration,
            &mut self.ux_ui,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|(_, skills)| skills.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionalSkills {
    pub project_management: Vec<String>,
    pub code_review: bool,
    pub pair_programming: bool,
    pub deliverable_quality: bool,
    pub scrum_methodology: Vec<String>,
    #[serde(rename = "encadrement", alias = "mentoring")]
    pub mentoring: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedExperience {
    pub client: String,
    pub role: String,
    /// `YYYY-MM` or `YYYY`.
    pub start_date: String,
    /// `YYYY-MM`, `YYYY`, or a "present" word.
    pub end_date: String,
    pub context: String,
    pub responsibilities: Vec<String>,
    pub deliverables: Vec<String>,
    pub technical_environment: TechnicalSkills,
}

impl Dossier {
    /// "First Last", or empty when the CV carried no name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.header.first_name, self.header.last_name)
            .trim()
            .to_string()
    }
}
