use indoc::formatdoc;

/// Render the instruction prompt for one chat turn
///
/// The message and the selected code are embedded verbatim. They come from
/// the same user who reads the answer, so nothing is escaped.
pub fn build_prompt(message: &str, selected_code: &str) -> String {
    formatdoc! {r#"
        You are VoxDiff, a code assistant running inside a code editor. You behave as a strict JSON API.

        Reply with exactly one JSON object and nothing else, using this schema:
        {{
          "explanation": string,
          "improved_code": string or null
        }}

        Rules:
        - "explanation" answers the user's request in a few sentences that read well aloud.
        - If the code must change, return the FULL rewritten code in "improved_code", not a diff.
        - Otherwise set "improved_code" to null.

        User request:
        {message}

        Selected code:
        {selected_code}"#,
        message = message,
        selected_code = selected_code,
    }
}
