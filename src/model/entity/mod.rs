mod user;
pub use user::{UserEntity, UserEntityCreate, normalize_email};

mod module;
pub use module::{LearningModule, ModuleCreate};

mod user_progress;
pub use user_progress::{ModuleProgressRow, ProgressStats, UserProgress};
