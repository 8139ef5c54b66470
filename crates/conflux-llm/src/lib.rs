pub mod types;
pub mod traits;
pub mod workers;

pub use traits::{
    InferenceClient,
    CompletionRequest, CompletionOptions,
    ByteStream,
};

pub use types::Message;
pub use workers::WorkersAiClient;
