// Criteria extraction prompt templates.

pub const CRITERIA_SYSTEM: &str = "\
You are an expert technical recruiter. \
Extract only measurable, objective hiring criteria from job descriptions: \
technical skills, tools, certifications, years of experience, and education. \
Do NOT include soft skills, personality traits, or company perks. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

/// Replace `{jd_text}` before sending.
pub const CRITERIA_PROMPT_TEMPLATE: &str = r#"Extract the key evaluation criteria from the job description below.

Return a JSON object with this EXACT schema:
{"criteria": ["criterion 1", "criterion 2"]}

Rules:
- Each criterion is a short, self-contained phrase (e.g. "5+ years of Python", "AWS Solutions Architect certification").
- At most 15 criteria, most important first.
- No soft skills.

JOB DESCRIPTION:
{jd_text}"#;
