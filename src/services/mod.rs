pub mod consultation_service;
pub mod content_service;
pub mod generation_service;
pub mod notifier;

pub use consultation_service::{ConsultationImage, ConsultationService};
pub use content_service::ContentService;
pub use generation_service::GenerationService;
pub use notifier::{LogNotifier, Notifier, NullNotifier, Severity};
