pub mod client;

pub use client::WorkersAiClient;
