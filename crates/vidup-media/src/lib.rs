//! FFmpeg CLI wrapper for the enhancement pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A runner with timeout and stderr capture
//! - The `Transcoder` trait the job orchestrator calls through

pub mod command;
pub mod error;
pub mod fs_utils;
pub mod transcode;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use fs_utils::remove_quietly;
pub use transcode::{FfmpegTranscoder, Transcoder};
