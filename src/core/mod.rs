pub mod bruteforce;
pub mod combine;
pub mod engine;
pub mod hashcat;
pub mod job_pipeline;
pub mod rules;
pub mod scrape;
pub mod tools;
pub mod wordlist_io;

pub use crate::domain::model::TransformResult;
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
