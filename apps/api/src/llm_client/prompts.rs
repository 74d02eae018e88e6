// Prompts for candidate summaries.

pub const SUMMARY_SYSTEM: &str = "You are a helpful AI recruiter assistant that analyzes \
    resumes and provides concise summaries of candidate fit.";

/// User prompt for a summary, framed against `job_description` when given.
pub fn summary_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    match job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        Some(jd) => format!(
            "Review this resume:\n\n{resume_text}\n\nFor this job description:\n\n{jd}\n\n\
             Provide a concise 2-3 sentence summary of why this candidate might be a good fit."
        ),
        None => format!(
            "Review this resume:\n\n{resume_text}\n\n\
             Provide a concise 2-3 sentence summary of this candidate's strengths and the roles they fit."
        ),
    }
}
