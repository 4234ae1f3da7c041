use crate::models::{RetrievedContext, UserProfile};

/// Assemble the advisor prompt. Pure: the same inputs always yield the same text.
pub fn build_prompt(profile: &UserProfile, context: &RetrievedContext, query: &str) -> String {
    format!(
        "You are a business advisor specialized in Indian Retail.\n\
         \n\
         User Profile:\n\
         Industry: {industry}\n\
         Stage: {stage}\n\
         \n\
         Business Context:\n\
         {context}\n\
         \n\
         User Query:\n\
         {query}\n\
         \n\
         Provide a short, actionable recommendation in simple terms.",
        industry = profile.industry,
        stage = profile.stage,
        context = context.render(),
        query = query,
    )
}
