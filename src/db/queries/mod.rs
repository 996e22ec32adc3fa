pub mod categories;
pub mod choices;
pub mod questions;
pub mod quizzes;
pub mod users;
