//! Prompt templates sent to the model

use crate::constants::{defaults::SUGGESTION_REQUEST, session::ARTIFACTS_PER_SESSION};
use crate::markup::number_lines;

/// Ask for short, evocative style direction names as a JSON array
pub fn style_directions(prompt: &str) -> String {
    format!(
        "Generate {count} distinct, highly evocative design directions for: \"{prompt}\".\n\
         Never use artist or brand names.\n\
         Return ONLY a raw JSON array of {count} new creative names.",
        count = ARTIFACTS_PER_SESSION,
        prompt = prompt,
    )
}

/// Ask for one complete component under a style direction
pub fn artifact(prompt: &str, direction: &str) -> String {
    format!(
        "You are a UI engineer. Create a polished, high-fidelity UI component for: \"{prompt}\".\n\
         Conceptual direction: {direction}\n\
         Return ONLY raw HTML with inline CSS in a single document.",
    )
}

/// Planning call: which numbered lines does the instruction touch
pub fn plan(document: &str, instruction: &str) -> String {
    format!(
        "You are a code analyst.\n\
         Below is an HTML file with line numbers and a modification request.\n\
         Identify which lines need to change or where new lines must be inserted.\n\n\
         CODE:\n{code}\n\n\
         REQUEST:\n\"{instruction}\"\n\n\
         Return a JSON object with a single key \"lines\" holding an array of integer line numbers.\n\
         Example: {{ \"lines\": [12, 13, 14, 45] }}",
        code = number_lines(document),
    )
}

/// Execution call: the full document with the instruction applied
pub fn apply(document: &str, instruction: &str) -> String {
    format!(
        "You are a surgical code editor modifying an existing HTML/CSS component.\n\
         Preserve the layout, logic and character of the original; change only what the request needs.\n\n\
         ORIGINAL CODE:\n{document}\n\n\
         MODIFICATION:\n\"{instruction}\"\n\n\
         Rules:\n\
         1. Apply the modification.\n\
         2. Keep everything else intact.\n\
         3. Return the FULL, valid HTML document.\n\
         4. Output ONLY raw HTML, no markdown fences.",
    )
}

/// Variations call: back-to-back `{name, html}` objects
pub fn variations(prompt: &str) -> String {
    format!(
        "You are a UI/UX designer. Generate {count} RADICAL conceptual variations of: \"{prompt}\".\n\
         Never name real artists.\n\
         Output format, one JSON object per line:\n\
         {{ \"name\": \"Persona Name\", \"html\": \"...\" }}",
        count = ARTIFACTS_PER_SESSION,
    )
}

/// Prompt suggestions for the input placeholder
pub fn suggestions() -> String {
    format!(
        "Generate {} creative, short, diverse UI component prompts. Return ONLY a raw JSON array of strings.",
        SUGGESTION_REQUEST
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_prompt_numbers_lines() {
        let prompt = plan("<div>\n</div>", "make it red");
        assert!(prompt.contains("1: <div>\n2: </div>"));
        assert!(prompt.contains("\"make it red\""));
        assert!(prompt.contains("{ \"lines\": [12, 13, 14, 45] }"));
    }

    #[test]
    fn test_apply_prompt_carries_raw_document() {
        let prompt = apply("<p>x</p>", "bold");
        assert!(prompt.contains("ORIGINAL CODE:\n<p>x</p>\n"));
        assert!(!prompt.contains("1: <p>"));
    }

    #[test]
    fn test_variations_prompt_shows_object_shape() {
        assert!(variations("card").contains("{ \"name\": \"Persona Name\", \"html\": \"...\" }"));
    }
}
