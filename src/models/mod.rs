pub mod language;
pub mod question;
pub mod review;
pub mod stage;
pub mod wire;

pub use language::Language;
pub use question::{Question, QuestionExample, QuestionId, QuestionSummary};
pub use review::{CodeReviewResponse, LineIssue, Review, ReviewCategory};
pub use stage::{Complexity, FeedbackStage, Stage};
