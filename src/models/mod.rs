pub mod consultation;
pub mod lesson;
pub mod question;
pub mod subject;

pub use consultation::{ConsultationPayload, NewConsultation};
pub use lesson::{Lesson, LessonSummary};
pub use question::{Difficulty, GeneratedItem, Question, GENERATED_LESSON_TAG};
pub use subject::{Section, Subject};
