//! Fixed encode profile for the enhancement pipeline.

use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "slow";
/// Default target resolution
pub const DEFAULT_RESOLUTION: (u32, u32) = (1920, 1080);
/// Default video bitrate
pub const DEFAULT_VIDEO_BITRATE: &str = "16M";
/// Default frame rate
pub const DEFAULT_FPS: u32 = 30;

/// Encode profile handed to the transcoder.
///
/// The pipeline runs one fixed profile per job; the profile's internal
/// tuning is opaque to the admission core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeProfile {
    /// Video codec (e.g., "libx264")
    pub codec: String,
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Video bitrate (e.g., "16M")
    pub video_bitrate: String,
    /// Encoding preset
    pub preset: String,
    /// H.264 profile
    pub h264_profile: String,
    /// H.264 level
    pub h264_level: String,
    /// Pixel format
    pub pix_fmt: String,
    /// Output frame rate
    pub fps: u32,
    /// Move the moov atom to the front for streaming playback
    pub faststart: bool,
}

impl Default for EncodeProfile {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            width: DEFAULT_RESOLUTION.0,
            height: DEFAULT_RESOLUTION.1,
            video_bitrate: DEFAULT_VIDEO_BITRATE.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            h264_profile: "high".to_string(),
            h264_level: "4.2".to_string(),
            pix_fmt: "yuv420p".to_string(),
            fps: DEFAULT_FPS,
            faststart: true,
        }
    }
}

impl EncodeProfile {
    /// Convert to FFmpeg output arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        let mut args = vec![
            "-c:v".to_string(),
            self.codec.clone(),
            "-s".to_string(),
            format!("{}x{}", self.width, self.height),
            "-b:v".to_string(),
            self.video_bitrate.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-profile:v".to_string(),
            self.h264_profile.clone(),
            "-level".to_string(),
            self.h264_level.clone(),
            "-pix_fmt".to_string(),
            self.pix_fmt.clone(),
            "-r".to_string(),
            self.fps.to_string(),
        ];
        if self.faststart {
            args.push("-movflags".to_string());
            args.push("+faststart".to_string());
        }
        args
    }
}
