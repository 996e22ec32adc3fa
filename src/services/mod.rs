pub mod questions;

pub use questions::{NewChoice, NewQuestion, QuestionService, ServiceError};
