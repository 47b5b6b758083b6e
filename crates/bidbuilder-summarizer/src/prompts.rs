//! Fixed prompt templates.

/// Used when a document upload comes without a question.
pub const DEFAULT_DOCUMENT_QUESTION: &str =
    "Provide a concise 4-5 line summary covering the main topic, key points and essential information.";

/// One-sentence summary of a proposal.
pub fn proposal_summary(title: &str, description: &str) -> String {
    format!(
        "Summarize the following proposal titled \"{title}\" in one concise sentence:\n\n\
         {description}\n\n\
         Summary:"
    )
}

/// Map step: summarise one document chunk with respect to the question.
pub fn chunk_summary(question: &str, chunk: &str) -> String {
    format!(
        "You are reading one excerpt of a longer document.\n\
         Question: {question}\n\n\
         Summarize the information in this excerpt that is relevant to the question. \
         If nothing is relevant, reply with \"No relevant information.\"\n\n\
         Excerpt:\n{chunk}\n\n\
         Summary:"
    )
}

/// Reduce step: combine partial summaries into one answer.
pub fn combine_summaries(question: &str, partials: &[String]) -> String {
    let joined = partials
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{}] {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The following are summaries of consecutive parts of one document.\n\
         Question: {question}\n\n\
         {joined}\n\n\
         Using only these summaries, write a single concise answer to the question.\n\n\
         Answer:"
    )
}
