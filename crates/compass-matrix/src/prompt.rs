//! Prompt assembly for the answer-matrix request.
//!
//! The model is asked for a JSON array of 40 objects named `postemp1` to
//! `postemp40`. Nothing here checks that against the number of questions.

const VALUE_ONLY_PREAMBLE: &str = "you are a back-end system and can only reply in valid json format with array of objects like \"postemp1\", \"postemp2\", \"postemp3\" to \"postemp40\",and each of the object must contain an attribute called value which should be type float with 2 decimals.\n";

const EXPLAINED_PREAMBLE: &str = "you are a back-end system and can only reply in valid json format with array of objects like \"postemp1\", \"postemp2\", \"postemp3\" to \"postemp40\", and each of those postempxx items must contain an attribute called explanation, another called confidence_score and another called value which is of type float with 2 decimals.\n";

const EXPLANATION_TRAILER: &str = "Put each of those values in an attribute called value. Also explain how you got the results and which table it came from and the numeric confidence score from 0 to 100 in each response and respond in json format with keys: \"value, \"explanation\" and \"confidence_score\"\n";

/// Kept verbatim, spelling included.
pub const THOUSAND_SEPARATOR_INSTRUCTION: &str =
    "and please remove the thousand seperators from the numeric value in the response";

/// Text placed between the table blob and the questions.
pub const QUESTIONS_SEPARATOR: &str = " \n\n answer the following questions: \n";

/// Builds the prompt from the CSV blob and the questions. Questions are
/// joined without a delimiter; each is expected to carry its own numbering.
#[must_use]
pub fn build_prompt(csv_blob: &str, questions: &[String], include_explanation: bool) -> String {
    let preamble = if include_explanation {
        EXPLAINED_PREAMBLE
    } else {
        VALUE_ONLY_PREAMBLE
    };

    let mut prompt = format!(
        "{preamble}Given the following tables in csv format: {csv_blob}{QUESTIONS_SEPARATOR}"
    );
    prompt.push_str(&questions.concat());

    if include_explanation {
        prompt.push_str(EXPLANATION_TRAILER);
        prompt.push_str(THOUSAND_SEPARATOR_INSTRUCTION);
    }

    prompt
}
