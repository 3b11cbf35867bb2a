pub mod middleware;

pub mod auth;
pub mod channels;
pub mod notes;
pub mod presentations;
pub mod promise_dates;
pub mod quizzes;
pub mod router;
pub mod scripts;
pub mod tabulations;
pub mod users;

pub use middleware::*;
