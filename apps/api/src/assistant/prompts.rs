// LLM prompt constants for the job-post assistant.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Polish prompt template. Replace `{title}`, `{description}`, `{skills}`, `{budget}`,
/// `{deadline}` and `{level}` before sending.
pub const POLISH_JOB_PROMPT_TEMPLATE: &str = r#"Write a professional job post summary for the marketplace and suggest a budget.

Job details:
Title: {title}
Description: {description}
Skills: {skills}
Budget: {budget}
Deadline: {deadline}
Experience level: {level}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "A polished job post of 3-6 sentences a freelancer would want to read.",
  "suggested_budget": 1500
}

Rules:
- "summary" is plain prose. Keep every fact the client gave; do not invent requirements.
- "suggested_budget" is a single number in the client's currency, reasonable for the scope,
  skills and deadline. Use the client's budget when it is already reasonable."#;

/// Advice prompt template. Replace `{description}` before sending.
pub const ADVISE_PROMPT_TEMPLATE: &str = r#"A client describes a job they want to post:

{description}

Advise them on a plan for the job and a realistic budget:
1. Break the work into 3-5 milestones with a rough duration each.
2. Name the skills and experience level a freelancer needs.
3. Suggest a budget range and explain what drives the cost.
Keep the answer under 250 words and use short markdown lists."#;
