use serde_json::{Value, json};

/// Instruction wrapped around the raw conversation
pub const REFORMAT_INSTRUCTIONS: &str = "Process the conversation below by inserting '@@' markers where the speaker changes. \
Also determine if the conversation starts with a doctor. Return a JSON object with the following fields:
  updatedText (string): the conversation with '@@' markers inserted,
  startWithDoctor (boolean): true if the first utterance is from the doctor, false otherwise.";

/// Build the user prompt for one conversation
pub fn build_reformat_prompt(conversation: &str) -> String {
    format!("{}\nConversation: {}", REFORMAT_INSTRUCTIONS, conversation)
}

/// Response schema the model output is constrained to
pub fn reformat_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "updatedText": {"type": "STRING"},
            "startWithDoctor": {"type": "BOOLEAN"}
        },
        "required": ["updatedText", "startWithDoctor"]
    })
}
