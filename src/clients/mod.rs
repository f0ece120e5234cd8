pub mod interview_client;

pub use interview_client::{InterviewApi, InterviewClient};
