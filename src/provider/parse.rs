//! Pulls JSON payloads out of free-form model replies.

use serde::de::DeserializeOwned;

use crate::provider::{ProviderError, ProviderResult};

/// Fenced blocks of a reply, in order, as `(language, body)`.
/// An unclosed trailing block is kept, since replies are sometimes truncated.
fn fenced_blocks(text: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        match current.as_mut() {
            None if trimmed.starts_with("```") => {
                let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
                current = Some((lang, String::new()));
            }
            None => {}
            Some(_) if trimmed == "```" => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            Some((_, body)) => {
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(line);
            }
        }
    }
    if let Some(block) = current.filter(|(_, body)| !body.trim().is_empty()) {
        blocks.push(block);
    }

    blocks
}

/// Candidate JSON snippets, most specific first: ```json blocks, other fenced
/// blocks, the outermost `{...}` span and finally the whole reply.
pub fn json_candidates(text: &str) -> Vec<String> {
    let blocks = fenced_blocks(text);
    let mut candidates: Vec<String> = blocks
        .iter()
        .filter(|(lang, _)| lang == "json")
        .chain(blocks.iter().filter(|(lang, _)| lang != "json"))
        .map(|(_, body)| body.trim().to_string())
        .collect();

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            candidates.push(text[start..=end].to_string());
        }
    }
    candidates.push(text.trim().to_string());
    candidates.dedup();

    candidates
}

/// Deserializes the first candidate snippet that parses as `T`.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> ProviderResult<T> {
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let mut last_error = None;
    for candidate in json_candidates(text) {
        match serde_json::from_str::<T>(&candidate) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(e),
        }
    }

    Err(ProviderError::Unparseable(
        last_error.map_or_else(|| "no JSON found".to_string(), |e| e.to_string()),
    ))
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        title: String,
    }

    #[test]
    fn json_block_wins() {
        let text = "Here you go:\n```json\n{\"title\": \"Lists\"}\n```\nand more {noise}";
        let reply: Reply = parse_json_reply(text).unwrap();
        assert_eq!(reply.title, "Lists");
    }

    #[test]
    fn generic_block_is_used() {
        let text = "```\n{\"title\": \"Queues\"}\n```";
        let reply: Reply = parse_json_reply(text).unwrap();
        assert_eq!(reply.title, "Queues");
    }

    #[test]
    fn braces_are_the_fallback() {
        let text = "Sure! {\"title\": \"Heaps\"} Hope that helps.";
        let reply: Reply = parse_json_reply(text).unwrap();
        assert_eq!(reply.title, "Heaps");
    }

    #[test]
    fn fences_inside_json_strings_are_ignored() {
        let text = "```json\n{\"title\": \"Py\", \"content\": \"```python\\nprint(1)\\n```\"}\n```";
        let reply: Reply = parse_json_reply(text).unwrap();
        assert_eq!(reply.title, "Py");
    }

    #[test]
    fn truncated_block_is_still_tried() {
        let text = "```json\n{\"title\": \"Trees\"}";
        let reply: Reply = parse_json_reply(text).unwrap();
        assert_eq!(reply.title, "Trees");
    }

    #[test]
    fn garbage_is_unparseable() {
        let err = parse_json_reply::<Reply>("no json here").unwrap_err();
        assert!(matches!(err, ProviderError::Unparseable(_)));

        let err = parse_json_reply::<Reply>("   ").unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }
}
