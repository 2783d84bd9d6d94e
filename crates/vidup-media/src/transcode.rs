//! The external transcoder seam.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use vidup_models::EncodeProfile;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Opaque transcoder contract consumed by the job orchestrator.
///
/// The invocation may take substantial wall-clock time; callers must not
/// hold account locks across it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Re-encode `input` into `output` with the given profile.
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        profile: &EncodeProfile,
    ) -> MediaResult<()>;
}

/// FFmpeg-backed transcoder.
pub struct FfmpegTranscoder {
    runner: FfmpegRunner,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            runner: FfmpegRunner::new(),
        }
    }

    /// Kill jobs that run longer than `secs`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.runner = FfmpegRunner::new().with_timeout(secs);
        self
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        profile: &EncodeProfile,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(input, output).output_args(profile.to_ffmpeg_args());
        info!(
            input = %input.display(),
            output = %output.display(),
            codec = %profile.codec,
            "Starting transcode"
        );
        self.runner.run(&cmd).await
    }
}
