//! Async client for the video API.

pub mod client;

pub use client::{
    ClientError, CreateVideo, FieldError, UpdateVideo, Video, VideoClient,
};
