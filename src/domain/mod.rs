pub mod decimal;
pub mod engine;
pub mod errors;
pub mod evaluator;
pub mod models;
pub mod parser;
pub mod validator;

pub use decimal::*;
pub use engine::*;
pub use errors::*;
pub use evaluator::*;
pub use models::*;
pub use validator::*;
