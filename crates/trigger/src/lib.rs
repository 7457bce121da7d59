pub mod bedrock;
pub mod error;
pub mod handler;
pub mod parser;
pub mod service;

pub use bedrock::BedrockIngestionService;
pub use error::{IngestionError, TriggerError};
pub use handler::{HandlerBody, HandlerResult, IngestionTrigger, TriggerOutcome};
pub use parser::{event_records, parse_record};
pub use service::{IngestionJob, IngestionJobStatus, IngestionJobSummary, IngestionService, IngestionTarget};
