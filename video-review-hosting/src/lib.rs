//! # video-review-hosting
//!
//! Hosting backend for video-review-kit.
//!
//! Provides:
//! - `signing` / `server`: the signed-upload credential endpoint (`GET /api/uploads`)
//! - `UploadClient`: credential fetch + multipart upload to the hosting service
//! - `UploadFlow`: validate → sign → upload → playback, with observable status
//! - `UploadSubmission`: plugs the flow into `RecordingController` as its submission handler
//! - `GalleryClient`: lists previously submitted clips by tag
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use video_review_core::{Mp4DurationProbe, RecordingController};
//! use video_review_hosting::{HostingConfig, UploadClient, UploadFlow, UploadSubmission, VideoPlayer};
//!
//! let config = HostingConfig::from_env()?;
//! let mut controller = RecordingController::new(devices);
//! let flow = Arc::new(UploadFlow::new(
//!     Arc::new(UploadClient::new(&config)?),
//!     Arc::new(Mp4DurationProbe),
//!     Arc::new(VideoPlayer::new(&config)),
//!     controller.config(),
//! ));
//! controller.set_submission_handler(Arc::new(UploadSubmission::new(flow, tokio::runtime::Handle::current())));
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod gallery;
pub mod playback;
pub mod server;
pub mod signing;
pub mod submission;
pub mod upload;

pub use config::{HostingConfig, SigningSecret};
pub use error::HostingError;
pub use flow::{UploadFlow, UploadStatus};
pub use gallery::{GalleryClient, HostedResource};
pub use playback::{PlaybackTarget, VideoPlayer, VideoSource};
pub use signing::{CredentialSigner, SignatureAlgorithm, SignedCredential};
pub use submission::UploadSubmission;
pub use upload::{UploadClient, UploadResponse, UploadService};
