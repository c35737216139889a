//! Learning content as it is generated, stored and served.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Numeric level used by generators (1 = easy .. 3 = hard).
    pub fn level(&self) -> i32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty `{0}`, expected easy, medium or hard")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    /// Accepts the canonical vocabulary and the older
    /// beginner/intermediate/advanced one, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "beginner" => Ok(Self::Easy),
            "medium" | "intermediate" => Ok(Self::Medium),
            "hard" | "advanced" => Ok(Self::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Resolves an option letter (`"B"`, `"b)"`) to the option text it points at, so
    /// grading can compare submitted option text directly.
    fn resolve_letter_answer(&mut self) {
        if self.options.is_empty() || self.options.iter().any(|o| o == &self.correct_answer) {
            return;
        }

        let answer = self.correct_answer.trim().trim_end_matches([')', '.']);
        let mut chars = answer.chars();
        let (Some(letter), None) = (chars.next(), chars.next()) else {
            return;
        };

        if !letter.is_ascii_alphabetic() {
            return;
        }

        let index = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
        if let Some(option) = self.options.get(index) {
            self.correct_answer = option.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VideoLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedQuiz {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

/// Module content as returned by a content provider, before it is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedModule {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub difficulty_level: Option<i64>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub assignment_latex: Option<String>,
    #[serde(default)]
    pub quiz: GeneratedQuiz,
    #[serde(default, skip_deserializing)]
    pub video_links: Vec<VideoLink>,
}

impl GeneratedModule {
    /// Cleans provider output: trims text, drops unusable questions and
    /// resolves letter answers. Returns `None` when there is no usable content.
    pub fn normalized(mut self) -> Option<Self> {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();
        if self.title.is_empty() || self.content.is_empty() {
            return None;
        }

        self.description = self.description.trim().to_string();
        self.assignment_latex = self
            .assignment_latex
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        self.prerequisites.retain(|p| !p.trim().is_empty());

        self.quiz.questions.retain(|q| {
            !q.question.trim().is_empty() && !q.correct_answer.trim().is_empty()
        });
        for question in self.quiz.questions.iter_mut() {
            question.resolve_letter_answer();
        }

        Some(self)
    }
}
