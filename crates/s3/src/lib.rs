//! bp-s3: S3 SDK adapter for bucket-publish
//!
//! Implements the `ObjectStore` trait from bp-core on top of aws-sdk-s3, so
//! any S3-compatible service (AWS, MinIO, Aliyun OSS, ...) can be a target.

mod client;

pub use client::S3Client;
