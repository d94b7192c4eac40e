use anyhow::Result;

use crate::llm::{LlmClient, Message};

/// Fixed instruction for the attribution pass: relabel speakers only, never
/// rewrite the lines, and mark uncertain ones with a triple asterisk.
const REVIEW_INSTRUCTION: &str = "Please analyze this transcript for speaker attribution \
errors and refine it. Do not change the text itself, only which speaker you believe said \
it, based on the context of the conversation. If you are unsure about a particular line, \
denote that line with a triple asterisk ***";

pub fn build_prompt(transcript: &str) -> String {
    format!("{}\n\n{}", REVIEW_INSTRUCTION, transcript)
}

/// Sends the readable transcript for a speaker-attribution review and
/// returns the model's answer trimmed but otherwise verbatim. The model's
/// formatting is not validated; whatever it says passes through.
pub async fn refine_transcript(client: &LlmClient, transcript: &str) -> Result<String> {
    let messages = vec![Message {
        role: "user".to_string(),
        content: build_prompt(transcript),
    }];

    let refined = client.chat_completion(messages).await?;
    Ok(refined.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_instruction_then_transcript() {
        let prompt = build_prompt("Brett: Hi\nVictor: Bye\n");
        assert!(prompt.starts_with("Please analyze this transcript"));
        assert!(prompt.contains("triple asterisk ***"));
        assert!(prompt.ends_with("\n\nBrett: Hi\nVictor: Bye\n"));
    }
}
