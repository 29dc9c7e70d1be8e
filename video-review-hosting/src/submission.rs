use std::sync::Arc;

use tokio::runtime::Handle;

use video_review_core::{RecordedFile, SubmissionHandler};

use crate::flow::UploadFlow;

/// Bridges the synchronous controller handoff onto the async upload flow.
pub struct UploadSubmission {
    flow: Arc<UploadFlow>,
    runtime: Handle,
}

impl UploadSubmission {
    pub fn new(flow: Arc<UploadFlow>, runtime: Handle) -> Self {
        Self { flow, runtime }
    }

    pub fn flow(&self) -> &Arc<UploadFlow> {
        &self.flow
    }
}

impl SubmissionHandler for UploadSubmission {
    fn submit(&self, file: RecordedFile) {
        let flow = Arc::clone(&self.flow);
        self.runtime.spawn(async move {
            if let Err(e) = flow.run(file).await {
                log::warn!("submission not uploaded: {}", e);
            }
        });
    }
}
