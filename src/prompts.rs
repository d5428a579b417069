//! Prompts sent to the generative service. Inputs are passed through as-is;
//! the extractor's character cap is the only size control.

pub fn question_prompt(topic: &str, paper_text: &str) -> String {
    format!(
        "Extract all questions about {} from this 9618 paper: {}",
        topic, paper_text
    )
}

pub fn answer_prompt(questions: &str) -> String {
    format!(
        "Provide a concise Cambridge-style mark scheme for these questions: {}",
        questions
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt() {
        assert_eq!(
            question_prompt("Data Representation", "1 Convert 45 to binary."),
            "Extract all questions about Data Representation from this 9618 paper: 1 Convert 45 to binary."
        );
    }

    #[test]
    fn test_answer_prompt_keeps_multiline_questions() {
        let prompt = answer_prompt("1 (a) ...\n(b) ...");
        assert_eq!(
            prompt,
            "Provide a concise Cambridge-style mark scheme for these questions: 1 (a) ...\n(b) ..."
        );
    }

    #[test]
    fn test_empty_inputs_pass_through() {
        assert_eq!(
            question_prompt("", ""),
            "Extract all questions about  from this 9618 paper: "
        );
    }
}
