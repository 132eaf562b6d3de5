use tokio::sync::mpsc;

use super::{CompletionContext, CompletionJob, WorkerContext, WorkerJob};

/// Spawns each job onto the ambient tokio runtime.
pub struct WorkerContextTokio {}

impl WorkerContextTokio {
    pub fn new() -> Self {
        Self {}
    }
}

impl WorkerContext for WorkerContextTokio {
    fn schedule(&self, job: WorkerJob) {
        tokio::task::spawn(job);
    }
}

/// Serial dispatcher backed by an unbounded queue drained by a single task.
///
/// Must be created inside a tokio runtime. The consumer task exits when the
/// last handle is dropped.
pub struct CompletionContextTokio {
    sender: mpsc::UnboundedSender<CompletionJob>,
}

impl CompletionContextTokio {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<CompletionJob>();
        tokio::task::spawn(async move {
            while let Some(job) = receiver.recv().await {
                job();
            }
        });
        Self { sender }
    }
}

impl Clone for CompletionContextTokio {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl CompletionContext for CompletionContextTokio {
    fn dispatch(&self, job: CompletionJob) {
        let _ = self.sender.send(job);
    }
}
