//! Templated content for running without an API key.

use async_trait::async_trait;

use crate::{
    learning::{Difficulty, GeneratedModule, GeneratedQuiz, QuestionType, QuizQuestion},
    provider::{
        ChatBrief, ChatReply, ContentProvider, ModuleBrief, ProviderError, ProviderResult, videos,
    },
};

/// Deterministic provider: the same brief always yields the same module.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

const KEYWORD_ANSWERS: &[(&str, &str)] = &[
    ("hello", "Hello! I'm here to help you with your learning journey."),
    ("help", "I can help you with data structures, algorithms, and programming concepts."),
    ("heap", "A heap is a complete binary tree where each parent node is greater (max-heap) or smaller (min-heap) than its children."),
    ("stack", "A stack is a Last-In-First-Out (LIFO) data structure. Think of it like a stack of plates."),
    ("queue", "A queue is a First-In-First-Out (FIFO) data structure. Think of it like a line at a store."),
    ("tree", "A tree is a hierarchical data structure with nodes connected by edges, starting from a root node."),
    ("graph", "A graph is a collection of nodes (vertices) connected by edges. It can be directed or undirected."),
    ("algorithm", "An algorithm is a step-by-step procedure to solve a problem."),
    ("programming", "Programming is the process of creating instructions for computers to follow."),
];

const DEFAULT_ANSWER: &str = "That's an interesting question! I recommend checking out your learning modules for more detailed information.";

fn learner_level(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "beginner",
        Difficulty::Medium => "intermediate",
        Difficulty::Hard => "advanced",
    }
}

fn question(question: String, options: [&str; 4], answer: &str, explanation: String) -> QuizQuestion {
    QuizQuestion {
        question,
        question_type: QuestionType::MultipleChoice,
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: answer.to_string(),
        explanation,
    }
}

fn module_for(brief: &ModuleBrief) -> GeneratedModule {
    let topic = brief.prompt.trim();
    let level = learner_level(brief.difficulty);

    let content = format!(
        r#"# {topic}

## Overview
This module provides a solid foundation in {topic}, designed for {level} learners. Plan for about {minutes} minutes.

## Learning Objectives
By the end of this module, you will:
- Understand the basic concepts of {topic}
- Be able to apply fundamental principles
- Have hands-on experience with practical examples

## Content
### What is {topic}?
{topic} is an important subject. Understanding its principles will help you build a strong foundation for advanced topics.

### Key Concepts
1. **Fundamentals**: Core principles and basic understanding
2. **Applications**: Real-world use cases and examples
3. **Best Practices**: Tips and techniques for effective learning

### Practical Examples
Here are some basic examples to get you started:

```python
# Example code demonstrating {topic}
print("Hello, {topic}!")
```

## Next Steps
Continue practicing and exploring more advanced topics related to {topic}.
"#,
        minutes = brief.duration_minutes
    );

    let assignment = format!(
        r"\documentclass{{article}}
\usepackage{{amsmath}}
\title{{{topic} Practice Assignment}}
\author{{GyanForge}}
\date{{\today}}

\begin{{document}}
\maketitle

\section{{Exercise 1}}
Write a brief explanation of what you learned about {topic}.

\section{{Exercise 2}}
Complete the following practice problems:
\begin{{enumerate}}
\item Describe the main concepts of {topic}
\item Provide an example of how {topic} is used
\item List three benefits of learning {topic}
\end{{enumerate}}

\section{{Reflection}}
Write a short paragraph about how you plan to apply {topic} in your learning journey.

\end{{document}}"
    );

    let questions = vec![
        question(
            format!("What is the main purpose of learning {topic}?"),
            [
                "To build fundamental knowledge",
                "To complete assignments only",
                "To pass tests",
                "None of the above",
            ],
            "To build fundamental knowledge",
            format!("Learning {topic} helps build a strong foundation for more advanced concepts."),
        ),
        question(
            format!("Which of the following is a key benefit of studying {topic}?"),
            [
                "Improved problem-solving skills",
                "Better understanding of technology",
                "Enhanced learning abilities",
                "All of the above",
            ],
            "All of the above",
            format!("Studying {topic} provides multiple benefits including improved skills and understanding."),
        ),
        question(
            format!("What is the best approach to learning {topic}?"),
            [
                "Practice regularly",
                "Memorize everything",
                "Skip the basics",
                "Only read theory",
            ],
            "Practice regularly",
            format!("Regular practice is essential for mastering {topic} effectively."),
        ),
    ];

    GeneratedModule {
        title: format!("Introduction to {topic}"),
        description: format!(
            "A comprehensive introduction to {topic} covering fundamental concepts and practical applications."
        ),
        content,
        difficulty_level: Some(i64::from(brief.difficulty.level())),
        prerequisites: vec![
            "Basic computer knowledge".to_string(),
            "Willingness to learn".to_string(),
        ],
        assignment_latex: Some(assignment),
        quiz: GeneratedQuiz { questions },
        video_links: vec![],
    }
}

fn keyword_answer(message: &str) -> Option<(&'static str, &'static str)> {
    let message = message.to_lowercase();
    KEYWORD_ANSWERS
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .copied()
}

fn chat_reply(brief: &ChatBrief) -> ChatReply {
    let matched = keyword_answer(&brief.message);
    let response = matched.map_or(DEFAULT_ANSWER, |(_, answer)| answer).to_string();

    let mut suggestions = Vec::new();
    if let Some((keyword, _)) = matched.filter(|(k, _)| !matches!(*k, "hello" | "help")) {
        suggestions.push(format!("Can you show me an example of a {keyword}?"));
        suggestions.push(format!("When should I use a {keyword}?"));
    } else {
        suggestions.push("What should I learn next?".to_string());
    }

    let mut learning_insights = Vec::new();
    if !brief.known_modules.is_empty() {
        learning_insights.push(format!(
            "You have {} learning module(s); the latest is \"{}\".",
            brief.known_modules.len(),
            brief.known_modules[0]
        ));
    }

    let recommended_actions = match &brief.current_module {
        Some(module) => vec![
            format!("Review the content of \"{}\".", module.title),
            format!("Take the quiz for \"{}\".", module.title),
        ],
        None if brief.known_modules.is_empty() => {
            vec!["Generate your first learning module.".to_string()]
        }
        None => vec!["Take the quiz of your latest module.".to_string()],
    };

    ChatReply {
        response,
        suggestions,
        learning_insights,
        recommended_actions,
        context_used: brief.has_context(),
    }
}

#[async_trait]
impl ContentProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate_module(&self, brief: &ModuleBrief) -> ProviderResult<GeneratedModule> {
        let mut module = module_for(brief).normalized().ok_or_else(|| {
            ProviderError::Unparseable("empty topic".to_string())
        })?;
        module.video_links = videos::recommend(&brief.prompt, &module.title, videos::MODULE_VIDEOS);
        Ok(module)
    }

    async fn chat(&self, brief: &ChatBrief) -> ProviderResult<ChatReply> {
        Ok(chat_reply(brief))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{learning::document::strip_latex, provider::ModuleContext};

    fn brief(prompt: &str, difficulty: Difficulty) -> ModuleBrief {
        ModuleBrief {
            prompt: prompt.to_string(),
            difficulty,
            duration_minutes: 45,
            background: None,
            history: vec![],
        }
    }

    #[tokio::test]
    async fn module_is_templated_from_topic() {
        let module = OfflineProvider
            .generate_module(&brief("Python Lists", Difficulty::Hard))
            .await
            .unwrap();

        assert_eq!(module.title, "Introduction to Python Lists");
        assert!(module.content.contains("advanced learners"));
        assert!(module.content.contains("45 minutes"));
        assert_eq!(module.difficulty_level, Some(3));
        assert_eq!(module.quiz.questions.len(), 3);
        assert!(
            module
                .quiz
                .questions
                .iter()
                .all(|q| q.options.contains(&q.correct_answer))
        );
        assert_eq!(module.video_links.len(), 1);

        let assignment = strip_latex(module.assignment_latex.as_deref().unwrap());
        assert!(assignment.contains("Describe the main concepts of Python Lists"));
    }

    #[tokio::test]
    async fn module_is_deterministic() {
        let a = OfflineProvider.generate_module(&brief("Queues", Difficulty::Easy)).await.unwrap();
        let b = OfflineProvider.generate_module(&brief("Queues", Difficulty::Easy)).await.unwrap();
        assert_eq!(a.content, b.content);
        assert_eq!(a.video_links, b.video_links);
    }

    #[tokio::test]
    async fn chat_matches_keywords() {
        let reply = OfflineProvider
            .chat(&ChatBrief {
                message: "How does a STACK work?".to_string(),
                current_module: Some(ModuleContext {
                    title: "Stacks".to_string(),
                    description: String::new(),
                }),
                known_modules: vec!["Stacks".to_string()],
            })
            .await
            .unwrap();

        assert!(reply.response.contains("Last-In-First-Out"));
        assert!(reply.context_used);
        assert!(reply.suggestions[0].contains("stack"));
        assert!(reply.recommended_actions[1].contains("quiz"));
        assert_eq!(reply.learning_insights.len(), 1);
    }

    #[tokio::test]
    async fn chat_has_a_default() {
        let reply = OfflineProvider
            .chat(&ChatBrief {
                message: "Tell me about photosynthesis".to_string(),
                current_module: None,
                known_modules: vec![],
            })
            .await
            .unwrap();

        assert_eq!(reply.response, DEFAULT_ANSWER);
        assert!(!reply.context_used);
        assert!(reply.learning_insights.is_empty());
    }
}
