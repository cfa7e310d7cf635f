// LLM prompt for the match endpoint.

/// Builds the single-turn prompt sent to the model for one résumé / JD pair.
/// Plain concatenation; the texts are embedded verbatim.
pub fn build_match_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "Compare this Resume: {resume_text} with this Job Description: {job_description}. \
         Provide a JSON response with the following structure: \
         {{\"matchPercentage\": <number between 0-100>, \"topTips\": [\"tip1\", \"tip2\", \"tip3\"]}}. \
         The matchPercentage should be a number representing how well the resume matches the job description. \
         The topTips should be an array of exactly 3 specific, actionable improvement suggestions. \
         Return ONLY valid JSON, no additional text."
    )
}
