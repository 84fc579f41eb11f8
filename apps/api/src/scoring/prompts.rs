// Scoring and candidate-naming prompt templates.

pub const NAME_SYSTEM: &str = "\
You extract candidate names from resumes. \
Respond with the candidate's full name only, formatted as FirstName LastName. \
If no name is present, respond with exactly: Unknown Candidate. \
No punctuation, labels, or explanations.";

/// Replace `{resume_text}` before sending.
pub const NAME_PROMPT_TEMPLATE: &str = "What is the full name of the candidate in this resume?

RESUME:
{resume_text}";

pub const SCORE_SYSTEM: &str = "\
You are a strict resume screener. \
Rate how well a resume satisfies one hiring criterion on a 0-5 scale, \
counting only what the resume explicitly states. \
0 = not mentioned, 5 = explicitly and fully met. \
Respond with a single integer and nothing else.";

/// Replace `{criterion}` and `{resume_text}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = "CRITERION:
{criterion}

RESUME:
{resume_text}

Score (0-5):";
