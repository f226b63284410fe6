//! Model prompt construction
//!
//! One prompt per item: the keyword hints plus the full extracted text,
//! with a hard instruction to answer with the bare value only. The reply
//! still gets the full cleaning treatment; the instruction just raises the
//! odds of a clean answer.

/// Builds the value-extraction prompt for one item.
pub struct PromptBuilder<'a> {
    text: &'a str,
    keywords: &'a [String],
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder over the extracted text and the item's keywords.
    pub fn new(text: &'a str, keywords: &'a [String]) -> Self {
        Self { text, keywords }
    }

    /// Build the complete prompt.
    pub fn build(&self) -> String {
        let keywords = self.keywords.join(", ");

        let mut prompt = String::new();
        prompt.push_str(PARSER_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("Find the value for: \"{keywords}\"\n\n"));
        prompt.push_str("Text:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n");
        prompt
    }
}

const PARSER_INSTRUCTIONS: &str = "You are a parser robot. Your task is to locate the requested \
value in the text below and output that value and nothing else. Your output is consumed by a \
program; any explanation, reasoning, or extra text will break it.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_keywords_and_text() {
        let keywords = vec!["номер договора".to_string(), "договор №".to_string()];
        let prompt = PromptBuilder::new("Договор №: 45/ЦБ-2024", &keywords).build();

        assert!(prompt.contains("номер договора, договор №"));
        assert!(prompt.contains("Договор №: 45/ЦБ-2024"));
        assert!(prompt.contains("nothing else"));
    }

    #[test]
    fn full_text_is_embedded_verbatim() {
        let keywords = vec!["total".to_string()];
        let text = "line one\nline two\nline three";
        let prompt = PromptBuilder::new(text, &keywords).build();
        assert!(prompt.contains(text));
    }
}
