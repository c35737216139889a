mod content;
pub use content::{
    Difficulty, GeneratedModule, GeneratedQuiz, QuestionType, QuizQuestion, UnknownDifficulty,
    VideoLink,
};

mod grading;
pub use grading::{GradingError, QuestionFeedback, QuizOutcome, grade, next_steps};

pub mod document;

mod next_topics;
pub use next_topics::{MAX_SUGGESTIONS, TopicSuggestion, next_topics};
