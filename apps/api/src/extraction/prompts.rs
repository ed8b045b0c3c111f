// Extraction engine LLM prompt templates.
// All prompts for the extraction module are defined here.

/// Name of the function the model is forced to call.
pub const EXTRACTION_TOOL_NAME: &str = "extract_cv_data";

pub const EXTRACTION_TOOL_DESCRIPTION: &str =
    "Record the structured skills dossier extracted from a CV.";

pub const EXTRACTION_SYSTEM: &str = "\
You are an expert HR information extractor. \
Input: the raw text of a French or English CV. \
Output: a call to the extract_cv_data tool whose arguments follow the provided schema EXACTLY. \
Never add fields, never rename fields or skill categories, never turn a list into a single value. \
Dates are written YYYY-MM, or YYYY when the month is unknown. \
All lists are JSON arrays, possibly empty.";

/// Extraction prompt template. Replace `{cv_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Build a complete professional skills dossier from the CV below.

CV TEXT:
{cv_text}

EXTRACTION POLICY:
1. recent_key_experiences: exactly 5 entries, most recent first, choosing the most relevant
   recent roles even when some are short. Each has client, role, duration, a one-sentence
   description, and responsibilities when the CV lists them.
2. detailed_experiences: every professional experience, most recent first. For each one:
   - context: 3 to 5 sentences covering the client's industry, the project's goal, the team
     size when stated, and any notable constraints.
   - responsibilities: specific, technical, starting with strong action verbs; quantify when
     the CV does.
   - deliverables: concrete and measurable outcomes (shipped applications, documentation,
     performance gains, trainings given).
   - technical_environment: the technologies used, bucketed into the 9 categories below.
3. technical_skills: every skill bucketed into exactly these 9 categories:
   language_framework, ci_cd, state_management, tests, tools, database_bigdata,
   data_analytics_visualisation, collaboration, ux_ui.
4. functional_skills: project_management and scrum_methodology are lists; code_review,
   pair_programming and deliverable_quality are booleans; encadrement is ONE string
   describing mentoring or team leadership.
5. header.years_of_experience: a whole number computed from the periods worked.
6. start_date / end_date: YYYY-MM or YYYY. Use "present" for an ongoing position.

{no_fabrication}"#;
