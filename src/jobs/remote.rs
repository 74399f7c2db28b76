use std::time::Duration;

use crate::{
    foundation::error::{ClipforgeError, ClipforgeResult},
    jobs::kind::JobKind,
    timeline::model::Clip,
};

/// Lifecycle state reported by the remote job service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting for a worker.
    Queued,
    /// Running.
    Processing,
    /// Finished with results.
    Completed,
    /// Finished with an error.
    Failed,
    /// Stopped on request.
    Cancelled,
}

impl JobStatus {
    /// Whether the job can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Identifier the remote service assigns to a submitted job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Client side of the remote AI job service.
///
/// The editor core never calls this itself; it only turns completed results
/// into clips via [`clip_from_job_result`].
pub trait RemoteJobs {
    /// Submit a job and return the id the service assigned.
    fn submit_job(
        &mut self,
        kind: JobKind,
        payload: &serde_json::Value,
        device_id: Option<&str>,
        quality_preset: &str,
    ) -> ClipforgeResult<JobId>;

    /// `None` when the service does not know the job.
    fn job_status(&mut self, id: JobId) -> ClipforgeResult<Option<JobStatus>>;

    /// Result JSON, once available.
    fn job_results(&mut self, id: JobId) -> ClipforgeResult<Option<String>>;
}

/// Polling cadence for [`poll_job`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOptions {
    /// Wait between status checks.
    pub interval: Duration,
    /// Give up after this much total waiting.
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

/// How a polled job ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    /// Completed; carries the result JSON if the service returned one.
    Completed(Option<String>),
    /// The service reported failure.
    Failed,
    /// The job was cancelled.
    Cancelled,
    /// The service stopped recognising the job.
    Unknown,
    /// The timeout elapsed before a terminal status.
    TimedOut,
}

/// Poll until the job reaches a terminal state or the timeout elapses.
///
/// `sleep` is invoked between polls with `opts.interval`; elapsed time is the
/// sum of those intervals, so callers control the clock.
#[tracing::instrument(skip(remote, sleep))]
pub fn poll_job(
    remote: &mut dyn RemoteJobs,
    id: JobId,
    opts: PollOptions,
    mut sleep: impl FnMut(Duration),
) -> ClipforgeResult<JobOutcome> {
    if opts.interval.is_zero() {
        return Err(ClipforgeError::validation("poll interval must be > 0"));
    }

    let mut waited = Duration::ZERO;
    loop {
        let outcome = match remote.job_status(id)? {
            None => Some(JobOutcome::Unknown),
            Some(JobStatus::Completed) => Some(JobOutcome::Completed(remote.job_results(id)?)),
            Some(JobStatus::Failed) => Some(JobOutcome::Failed),
            Some(JobStatus::Cancelled) => Some(JobOutcome::Cancelled),
            Some(JobStatus::Queued | JobStatus::Processing) => None,
        };
        if let Some(outcome) = outcome {
            tracing::debug!(job = %id, ?outcome, "job finished");
            return Ok(outcome);
        }

        if waited + opts.interval > opts.timeout {
            tracing::warn!(job = %id, waited_ms = waited.as_millis() as u64, "job polling timed out");
            return Ok(JobOutcome::TimedOut);
        }
        sleep(opts.interval);
        waited += opts.interval;
    }
}

/// [`poll_job`] with a real thread sleep.
pub fn poll_job_blocking(
    remote: &mut dyn RemoteJobs,
    id: JobId,
    opts: PollOptions,
) -> ClipforgeResult<JobOutcome> {
    poll_job(remote, id, opts, std::thread::sleep)
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi", "m4v"];

fn looks_like_video(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.')
        .map(|(_, ext)| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Turn a completed job's result JSON into a clip carrying its generated media.
///
/// Recognised keys, in priority order: `videoUrl`, `imageUrl`, `mediaUrl`
/// (classified by file extension), `images[0].url`, `logos[0].url`. Returns
/// `Ok(None)` when the result carries no visual media.
pub fn clip_from_job_result(
    result_json: &str,
    clip_id: impl Into<String>,
    start: f64,
) -> ClipforgeResult<Option<Clip>> {
    let v: serde_json::Value = serde_json::from_str(result_json)?;
    let str_at = |key: &str| v.get(key).and_then(|u| u.as_str()).filter(|s| !s.is_empty());
    let first_url = |key: &str| {
        v.get(key)
            .and_then(|a| a.as_array())
            .and_then(|a| a.first())
            .and_then(|o| o.get("url"))
            .and_then(|u| u.as_str())
            .filter(|s| !s.is_empty())
    };

    let clip_id = clip_id.into();
    let clip = if let Some(url) = str_at("videoUrl") {
        Clip::video(clip_id, url)
    } else if let Some(url) = str_at("imageUrl") {
        Clip::image(clip_id, url)
    } else if let Some(url) = str_at("mediaUrl") {
        if looks_like_video(url) {
            Clip::video(clip_id, url)
        } else {
            Clip::image(clip_id, url)
        }
    } else if let Some(url) = first_url("images").or_else(|| first_url("logos")) {
        Clip::image(clip_id, url)
    } else {
        return Ok(None);
    };

    let clip = clip.with_timing(start, crate::timeline::model::DEFAULT_CLIP_DURATION);
    clip.validate()?;
    Ok(Some(clip))
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/remote.rs"]
mod tests;
