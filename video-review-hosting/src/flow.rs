use std::sync::Arc;

use tokio::sync::watch;

use video_review_core::{validate_duration, MediaProbe, RecordedFile, SessionConfiguration, ValidationOutcome};

use crate::error::HostingError;
use crate::playback::PlaybackTarget;
use crate::upload::UploadService;

/// Progress of a submitted file.
///
/// ```text
/// idle → validating → uploading → complete(asset id)
///            ↓            ↓
///          failed(message shown to the user)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Idle,
    Validating,
    Uploading,
    Complete(String),
    Failed(String),
}

impl UploadStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Validating | Self::Uploading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Failed(_))
    }

    /// The message to display, if the last attempt failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Validate, sign, upload, then hand the asset to playback.
///
/// One file at a time: a run started while another is in flight is refused.
pub struct UploadFlow {
    service: Arc<dyn UploadService>,
    probe: Arc<dyn MediaProbe>,
    playback: Arc<dyn PlaybackTarget>,
    session: SessionConfiguration,
    status: watch::Sender<UploadStatus>,
}

/// Marks the flow failed if a run is dropped before it settles.
struct InFlight<'a> {
    status: &'a watch::Sender<UploadStatus>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.status.send_if_modified(|status| {
            if !status.is_in_flight() {
                return false;
            }
            log::warn!("upload cancelled while {:?}", status);
            *status = UploadStatus::Failed("upload cancelled".into());
            true
        });
    }
}

impl UploadFlow {
    pub fn new(
        service: Arc<dyn UploadService>,
        probe: Arc<dyn MediaProbe>,
        playback: Arc<dyn PlaybackTarget>,
        session: &SessionConfiguration,
    ) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Self {
            service,
            probe,
            playback,
            session: session.clone(),
            status,
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    /// Run the whole pipeline for `file`, returning the hosted asset id.
    pub async fn run(&self, file: RecordedFile) -> Result<String, HostingError> {
        let claimed = self.status.send_if_modified(|status| {
            if status.is_in_flight() {
                return false;
            }
            *status = UploadStatus::Validating;
            true
        });
        if !claimed {
            log::debug!("upload already in progress, ignoring {}", file.name);
            return Err(HostingError::UploadInProgress);
        }
        let _in_flight = InFlight { status: &self.status };

        match self.upload_validated(&file).await {
            Ok(asset_id) => {
                self.playback.show(&asset_id);
                self.status.send_replace(UploadStatus::Complete(asset_id.clone()));
                Ok(asset_id)
            }
            Err(e) => {
                log::error!("upload of {} failed: {}", file.name, e);
                self.status.send_replace(UploadStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn upload_validated(&self, file: &RecordedFile) -> Result<String, HostingError> {
        match validate_duration(file, self.probe.as_ref(), &self.session) {
            ValidationOutcome::Fail(reason) => return Err(HostingError::Validation(reason)),
            ValidationOutcome::Indeterminate(reason) => {
                log::warn!("uploading without a duration check: {}", reason);
            }
            ValidationOutcome::Pass => {}
        }

        self.status.send_replace(UploadStatus::Uploading);
        let credential = self.service.request_credential().await?;
        let response = self.service.upload(file, &credential).await?;
        log::info!("upload complete: {}", response.public_id);
        Ok(response.public_id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::Notify;

    use video_review_core::{CaptureError, ProbedDuration};

    use super::*;
    use crate::signing::SignedCredential;
    use crate::upload::UploadResponse;

    struct FixedProbe(Result<ProbedDuration, CaptureError>);

    impl MediaProbe for FixedProbe {
        fn probe_duration(&self, _file: &RecordedFile) -> Result<ProbedDuration, CaptureError> {
            self.0.clone()
        }
    }

    struct PanickingProbe;

    impl MediaProbe for PanickingProbe {
        fn probe_duration(&self, _file: &RecordedFile) -> Result<ProbedDuration, CaptureError> {
            panic!("corrupt metadata");
        }
    }

    #[derive(Default)]
    struct StubService {
        credential_error: Option<HostingError>,
        upload_error: Option<HostingError>,
        uploads: Mutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl UploadService for StubService {
        async fn request_credential(&self) -> Result<SignedCredential, HostingError> {
            if let Some(ref gate) = self.gate {
                gate.notified().await;
            }
            match self.credential_error {
                Some(ref e) => Err(e.clone()),
                None => Ok(SignedCredential {
                    timestamp: 1,
                    signature: "sig".into(),
                }),
            }
        }

        async fn upload(&self, file: &RecordedFile, _credential: &SignedCredential) -> Result<UploadResponse, HostingError> {
            self.uploads.lock().push(file.name.clone());
            match self.upload_error {
                Some(ref e) => Err(e.clone()),
                None => Ok(UploadResponse {
                    public_id: "abc123".into(),
                    secure_url: None,
                    resource_type: None,
                    format: None,
                    duration: None,
                    bytes: None,
                }),
            }
        }
    }

    #[derive(Default)]
    struct ShownAssets(Mutex<Vec<String>>);

    impl PlaybackTarget for ShownAssets {
        fn show(&self, asset_id: &str) {
            self.0.lock().push(asset_id.to_string());
        }
    }

    fn flow(service: Arc<StubService>, duration: f64) -> (UploadFlow, Arc<ShownAssets>) {
        let shown = Arc::new(ShownAssets::default());
        let flow = UploadFlow::new(
            service,
            Arc::new(FixedProbe(Ok(ProbedDuration::Finite(duration)))),
            shown.clone(),
            &SessionConfiguration::default(),
        );
        (flow, shown)
    }

    fn clip() -> RecordedFile {
        RecordedFile::new("video-from-camera", "video/mp4", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn successful_upload_shows_asset() {
        let service = Arc::new(StubService::default());
        let (flow, shown) = flow(service.clone(), 12.0);

        assert_eq!(flow.run(clip()).await.unwrap(), "abc123");
        assert_eq!(flow.status(), UploadStatus::Complete("abc123".into()));
        assert_eq!(*shown.0.lock(), vec!["abc123".to_string()]);
        assert_eq!(*service.uploads.lock(), vec!["video-from-camera".to_string()]);
    }

    #[tokio::test]
    async fn too_long_is_rejected_before_network() {
        let service = Arc::new(StubService::default());
        let (flow, shown) = flow(service.clone(), 61.0);

        let err = flow.run(clip()).await.unwrap_err();

        assert!(matches!(err, HostingError::Validation(_)));
        assert_eq!(
            flow.status().error_message(),
            Some("file duration (61s) exceeds allowed maximum (1min)!")
        );
        assert!(service.uploads.lock().is_empty());
        assert!(shown.0.lock().is_empty());
    }

    #[tokio::test]
    async fn indeterminate_duration_still_uploads() {
        let service = Arc::new(StubService::default());
        let shown = Arc::new(ShownAssets::default());
        let flow = UploadFlow::new(
            service.clone(),
            Arc::new(FixedProbe(Err(CaptureError::ProbeFailed("no moov box".into())))),
            shown.clone(),
            &SessionConfiguration::default(),
        );

        assert!(flow.run(clip()).await.is_ok());
        assert_eq!(service.uploads.lock().len(), 1);
    }

    #[tokio::test]
    async fn credential_failure_is_displayed() {
        let service = Arc::new(StubService {
            credential_error: Some(HostingError::Credential("connection refused".into())),
            ..Default::default()
        });
        let (flow, _shown) = flow(service.clone(), 5.0);

        assert!(flow.run(clip()).await.is_err());
        assert_eq!(
            flow.status().error_message(),
            Some("Error creating upload: connection refused")
        );
        assert!(service.uploads.lock().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_is_displayed() {
        let service = Arc::new(StubService {
            upload_error: Some(HostingError::Http {
                status: 400,
                message: "Invalid Signature".into(),
            }),
            ..Default::default()
        });
        let (flow, shown) = flow(service, 5.0);

        assert!(flow.run(clip()).await.is_err());
        assert!(flow.status().error_message().unwrap().contains("Invalid Signature"));
        assert!(shown.0.lock().is_empty());
    }

    #[tokio::test]
    async fn second_run_while_in_flight_is_refused() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(StubService {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let (flow, _shown) = flow(service.clone(), 5.0);
        let flow = Arc::new(flow);
        let mut status = flow.subscribe();

        let first = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.run(clip()).await }
        });
        status.wait_for(|s| *s == UploadStatus::Uploading).await.unwrap();

        assert_eq!(flow.run(clip()).await, Err(HostingError::UploadInProgress));

        gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), "abc123");
        assert_eq!(service.uploads.lock().len(), 1);
    }

    #[tokio::test]
    async fn can_retry_after_failure() {
        let service = Arc::new(StubService::default());
        let (flow, _shown) = flow(service, 61.0);
        assert!(flow.run(clip()).await.is_err());
        // A failed run releases the flow for the next attempt.
        assert!(!flow.status().is_in_flight());
        assert!(matches!(flow.run(clip()).await, Err(HostingError::Validation(_))));
    }

    #[tokio::test]
    async fn ceiling_comes_from_session_configuration() {
        let service = Arc::new(StubService::default());
        let session = SessionConfiguration {
            max_duration_mins: 2,
            ..Default::default()
        };
        let flow = UploadFlow::new(
            service.clone(),
            Arc::new(FixedProbe(Ok(ProbedDuration::Finite(90.0)))),
            Arc::new(ShownAssets::default()),
            &session,
        );

        assert_eq!(flow.run(clip()).await.unwrap(), "abc123");
        assert_eq!(service.uploads.lock().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_run_releases_flow() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(StubService {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let (flow, _shown) = flow(service.clone(), 5.0);

        let timed_out = tokio::time::timeout(Duration::from_millis(50), flow.run(clip())).await;
        assert!(timed_out.is_err());
        assert_eq!(flow.status(), UploadStatus::Failed("upload cancelled".into()));

        gate.notify_one();
        assert_eq!(flow.run(clip()).await.unwrap(), "abc123");
        assert_eq!(service.uploads.lock().len(), 1);
    }

    #[tokio::test]
    async fn panicking_run_releases_flow() {
        let service = Arc::new(StubService::default());
        let flow = Arc::new(UploadFlow::new(
            service.clone(),
            Arc::new(PanickingProbe),
            Arc::new(ShownAssets::default()),
            &SessionConfiguration::default(),
        ));

        let joined = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.run(clip()).await }
        })
        .await;

        assert!(joined.unwrap_err().is_panic());
        assert_eq!(flow.status().error_message(), Some("upload cancelled"));
        assert!(service.uploads.lock().is_empty());
    }
}
