pub mod quiz_flow;
pub mod quiz_selection;

pub use quiz_flow::QuizFlow;
pub use quiz_selection::QuizSelection;
