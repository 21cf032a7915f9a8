//! Background job dispatch.
//!
//! The engine is CPU-bound and runs off the interactive thread. A job is a
//! worker thread plus a message channel: progress events stream out while
//! the driver runs, and exactly one terminal event follows. The
//! cancellation sentinel is forwarded verbatim as its own outcome kind and
//! never carries partial results.

use crate::design::{Design, SheetPreset};
use crate::nester::Nester;
use sheetnest_core::{CancelFlag, Config, Error, NestingResult, ProgressCallback};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;

/// Events emitted by a nesting job.
#[derive(Debug)]
pub enum JobEvent {
    /// Advisory progress report; may be coalesced by the consumer.
    Progress {
        /// Percent complete (0.0 - 100.0).
        percent: f64,
        /// Human-readable phase description.
        message: String,
    },
    /// Terminal: the ranked results.
    Complete(Vec<NestingResult>),
    /// Terminal: the engine failed.
    Error(String),
    /// Terminal: the job was cancelled; no partial results.
    Cancelled,
}

/// Handle to a running nesting job.
pub struct JobHandle {
    events: Receiver<JobEvent>,
    cancel: CancelFlag,
    worker: Option<JoinHandle<()>>,
}

impl JobHandle {
    /// The event stream. Progress events arrive in order, followed by
    /// exactly one terminal event.
    pub fn events(&self) -> &Receiver<JobEvent> {
        &self.events
    }

    /// Requests cooperative cancellation; the worker observes the flag at
    /// its next suspension point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Blocks until the worker thread has exited.
    pub fn join(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.cancel.cancel();
            let _ = worker.join();
        }
    }
}

/// Starts a nesting job on a worker thread.
pub fn start(design: Design, sheets: Vec<SheetPreset>, config: Config) -> JobHandle {
    let (sender, events) = channel();
    let nester = Nester::new(config);
    let cancel = nester.cancel_flag();

    let worker = std::thread::spawn(move || {
        run_job(&nester, &design, &sheets, &sender);
    });

    JobHandle {
        events,
        cancel,
        worker: Some(worker),
    }
}

fn run_job(
    nester: &Nester,
    design: &Design,
    sheets: &[SheetPreset],
    sender: &Sender<JobEvent>,
) {
    let progress_sender = Mutex::new(sender.clone());
    let progress: ProgressCallback = Box::new(move |info| {
        if let Ok(sender) = progress_sender.lock() {
            let _ = sender.send(JobEvent::Progress {
                percent: info.percent,
                message: info.message,
            });
        }
    });

    let outcome = nester.nest_with_progress(design, sheets, Some(&progress));

    let terminal = match outcome {
        Ok(results) => JobEvent::Complete(results),
        Err(Error::Cancelled) => JobEvent::Cancelled,
        Err(e) => JobEvent::Error(e.to_string()),
    };
    let _ = sender.send(terminal);
}
