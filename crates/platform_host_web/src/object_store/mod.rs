//! Remote bucket adapters.

mod listing;
pub mod s3;
mod signing;

pub use s3::S3ObjectStoreService;
