// Prompt text: one fixed system instruction and a per-name user message
// with the section headers the model is asked to fill in.

use serde::Serialize;

pub const SYSTEM_INSTRUCTIONS: &str = concat!(
    "You are NameSensei, a concise on-topic assistant for first-name etymology. ",
    "Given a first name, return:\n",
    "- Meaning (1-2 sentences)\n",
    "- Likely origin/language(s)\n",
    "- Common variants (omit if not notable)\n",
    "If multiple well-known etymologies exist, mention the top 1 or 2 without over-speculation. ",
    "Keep the entire answer under ~100 words, neutral and factual."
);

/// One role-tagged block of a chat request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

/// User message for `name`.
pub fn user_message(name: &str) -> String {
    format!("First name: {name} \n \nMeaning: ...\nOrigin: ...\nVariants: ...")
}

/// The ordered system + user pair sent for `name`.
pub fn messages(name: &str) -> [Message; 2] {
    [
        Message {
            role: "system",
            content: SYSTEM_INSTRUCTIONS.to_string(),
        },
        Message {
            role: "user",
            content: user_message(name),
        },
    ]
}
