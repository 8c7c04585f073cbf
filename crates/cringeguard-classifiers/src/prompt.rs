//! System prompt construction

/// Build the system instruction listing every criterion as a bullet
pub fn system_prompt<S: AsRef<str>>(criteria: &[S]) -> String {
    let mut prompt = String::from(
        "You are a LinkedIn post analyzer. Your job is to determine if a post meets the following criteria:\n",
    );
    for criterion in criteria {
        prompt.push_str("- ");
        prompt.push_str(criterion.as_ref());
        prompt.push('\n');
    }
    prompt.push_str(
        "\nIf any of the above criteria are met, the post should be considered as a cringe post.\n\
         Analyze the post and respond with ONLY one of these formats:\n\
         - \"true: reason1, reason2, reason3\" (if cringe)\n\
         - \"false: reason1, reason2, reason3\" (if not cringe)",
    );
    prompt
}
