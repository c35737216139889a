//! Google Gemini `generateContent` provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    learning::GeneratedModule,
    provider::{
        ChatBrief, ChatReply, ContentProvider, ModuleBrief, ProviderError, ProviderResult,
        parse::parse_json_reply, videos,
    },
};

const MODULE_INSTRUCTIONS: &str = r##"Create a comprehensive learning module for the topic the user wants to learn. Any subject is fine: programming, mathematics, languages, history, arts, business, health, cooking and so on.

Return ONLY valid JSON in this exact format:
{
  "title": "Engaging title for the learning module",
  "description": "2-3 sentence description of what students will learn and why it's valuable",
  "difficulty_level": 1,
  "prerequisites": ["prerequisite1", "prerequisite2"],
  "content": "# Title\n\n## Introduction\n...\n\n## Key Concepts\n...\n\n## Examples\n...\n\n## Applications\n...\n\n## Best Practices\n...\n\n## Summary\n...",
  "assignment_latex": "\\documentclass{article}\\begin{document}\\section{Practice Exercises}...\\end{document}",
  "quiz": {
    "questions": [
      {
        "question": "What is the main concept covered in this module?",
        "type": "multiple_choice",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "correct_answer": "Option A",
        "explanation": "Why this answer is correct"
      },
      {
        "question": "True or False: this topic has real-world applications",
        "type": "true_false",
        "correct_answer": "true",
        "explanation": "Why"
      }
    ]
  }
}

Rules:
- The content is markdown, at least 800 words, with the sections shown above.
- difficulty_level is 1 (easy), 2 (medium) or 3 (hard) and matches the requested difficulty.
- For multiple choice questions, correct_answer repeats the text of the correct option.
- Include 3 to 5 quiz questions.
- Make sure the JSON is valid: no unescaped quotes or raw newlines inside strings."##;

const CHAT_INSTRUCTIONS: &str = r#"You are a friendly tutor on a learning platform. Answer the learner's message clearly and briefly.

Return ONLY valid JSON in this format:
{
  "response": "your answer",
  "suggestions": ["follow-up question the learner could ask"],
  "learning_insights": ["short observation about the learner's progress"],
  "recommended_actions": ["concrete next step"]
}"#;

/// Google Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    fn transport_error(
        &self,
        e: reqwest::Error,
        otherwise: impl FnOnce(String) -> ProviderError,
    ) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            otherwise(e.to_string())
        }
    }

    /// Sends one prompt and returns the concatenated text of the first candidate.
    async fn generate_text(&self, prompt: String) -> ProviderResult<String> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e, ProviderError::NetworkError))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            });
        }

        // the client timeout also covers reading the body
        let reply: GeminiResponse = response.json().await.map_err(|e| {
            self.transport_error(e, |e| ProviderError::ApiError {
                status,
                message: format!("failed to parse response: {e}"),
            })
        })?;

        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

fn module_prompt(brief: &ModuleBrief) -> String {
    let mut prompt = format!(
        "{MODULE_INSTRUCTIONS}\n\nUSER PROMPT: {}\nDIFFICULTY: {}\nDURATION: {} minutes\n",
        brief.prompt, brief.difficulty, brief.duration_minutes
    );
    if let Some(background) = &brief.background {
        prompt.push_str(&format!("USER BACKGROUND: {background}\n"));
    }
    if !brief.history.is_empty() {
        prompt.push_str("USER LEARNING HISTORY:\n");
        for entry in &brief.history {
            match entry.score {
                Some(score) => prompt.push_str(&format!(
                    "- Completed module: {} with score: {score}\n",
                    entry.title
                )),
                None => prompt.push_str(&format!("- Started module: {}\n", entry.title)),
            }
        }
    }
    prompt
}

fn chat_prompt(brief: &ChatBrief) -> String {
    let mut prompt = format!("{CHAT_INSTRUCTIONS}\n\n");
    if let Some(module) = &brief.current_module {
        prompt.push_str(&format!(
            "CURRENT MODULE: {}\n{}\n",
            module.title, module.description
        ));
    }
    if !brief.known_modules.is_empty() {
        prompt.push_str(&format!(
            "LEARNER'S MODULES: {}\n",
            brief.known_modules.join(", ")
        ));
    }
    prompt.push_str(&format!("MESSAGE: {}\n", brief.message));
    prompt
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, brief), fields(model = %self.model, prompt = %brief.prompt))]
    async fn generate_module(&self, brief: &ModuleBrief) -> ProviderResult<GeneratedModule> {
        let text = self.generate_text(module_prompt(brief)).await?;
        let module: GeneratedModule = parse_json_reply(&text)?;
        let mut module = module.normalized().ok_or_else(|| {
            ProviderError::Unparseable("module has no title or content".to_string())
        })?;

        module.video_links = videos::recommend(&brief.prompt, &module.title, videos::MODULE_VIDEOS);
        tracing::debug!(
            title = %module.title,
            questions = module.quiz.questions.len(),
            "module generated"
        );
        Ok(module)
    }

    #[instrument(skip(self, brief), fields(model = %self.model))]
    async fn chat(&self, brief: &ChatBrief) -> ProviderResult<ChatReply> {
        let text = self.generate_text(chat_prompt(brief)).await?;

        // a plain-text answer is still an answer
        let mut reply = parse_json_reply::<ChatReply>(&text).unwrap_or_else(|_| ChatReply {
            response: text.trim().to_string(),
            suggestions: vec![],
            learning_insights: vec![],
            recommended_actions: vec![],
            context_used: false,
        });
        reply.context_used = brief.has_context();
        Ok(reply)
    }
}
