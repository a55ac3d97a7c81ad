// Copyright 2025 Lockbox LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Types and functions to make asynchronous jobs easier to use and to require
//! less boilerplate.
//!
//! Endpoints that operate on many entries at once may finish synchronously
//! when the input is small, or enqueue the work and return an [AsyncJobId]
//! handle. The caller then checks a companion status endpoint until the job
//! reports `complete` or `failed`. This crate implements that loop once,
//! generic over the launch and status types, so each generated namespace only
//! provides two closures.

pub use crate::model::AsyncJobId;
use crate::model::{LaunchResult, PollResult};
pub use lax::Result;
pub use lax::error::Error;
pub use lax::polling_backoff_policy::PollingBackoffPolicy;
pub use lax::polling_error_policy::PollingErrorPolicy;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// The result of polling an asynchronous job.
///
/// # Parameters
/// * `T` - the value type. This is the type returned when the job completes
///   successfully.
/// * `E` - the failure type reported by the service when the job fails.
#[derive(Debug)]
pub enum PollingResult<T, E> {
    /// The job is still in progress.
    ///
    /// Carries the job handle so callers can persist it and resume polling
    /// later.
    InProgress(AsyncJobId),
    /// The job reached a terminal state. This includes the outcome.
    Completed(std::result::Result<T, JobError<E>>),
    /// An error trying to poll the job.
    ///
    /// Not all errors indicate that the job failed. For example, polling may
    /// fail because it was not possible to reach the service. Such transient
    /// errors may disappear in the next polling attempt.
    PollingError(Error),
}

/// The terminal failure of an asynchronous job.
///
/// A job can end badly two ways: the service reports it as `failed`, with an
/// operation-specific union describing what went wrong, or the polling loop
/// gives up without learning the outcome.
#[derive(Debug)]
pub enum JobError<E> {
    /// The service reported the job as failed.
    Failed(E),
    /// The job's outcome could not be determined.
    ///
    /// The job may still be running, and may yet succeed. The handle remains
    /// usable until the service expires it.
    Polling(Error),
}

impl<E> std::fmt::Display for JobError<E>
where
    E: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "the service reported the job as failed: {e:?}"),
            Self::Polling(e) => write!(f, "the job outcome could not be determined: {e}"),
        }
    }
}

impl<E> std::error::Error for JobError<E>
where
    E: std::fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed(_) => None,
            Self::Polling(e) => Some(e),
        }
    }
}

mod sealed {
    pub trait Poller {}
}

/// The trait implemented by asynchronous job helpers.
///
/// # Parameters
/// * `T` - the value type. This is the type returned when the job completes
///   successfully.
/// * `E` - the failure type. The operation-specific error union reported when
///   the job fails.
pub trait Poller<T, E>: Send + sealed::Poller {
    /// Query the current status of the job.
    fn poll(&mut self) -> impl Future<Output = Option<PollingResult<T, E>>> + Send;

    /// Poll the job until it reaches a terminal state.
    fn until_done(self) -> impl Future<Output = std::result::Result<T, JobError<E>>> + Send;

    /// Convert a poller to a [futures::Stream].
    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = PollingResult<T, E>> + Unpin;
}

/// Creates a new `impl Poller<T, E>` from a launch closure and a status
/// closure.
///
/// The closures capture everything the two calls need: the request payload,
/// the stub, and any request options. The machinery only decides when to call
/// them and how to interpret what they return.
///
/// # Parameters
/// * `polling_error_policy` - classifies status check failures as recoverable
///   or final. It may also stop loops that see no error at all, see
///   [lax::polling_error_policy].
/// * `polling_backoff_policy` - how long to wait between status checks, see
///   [lax::polling_backoff_policy].
/// * `start` - launches the job.
/// * `query` - checks the status of the job launched by `start`. It receives
///   the job handle as its only input parameter.
pub fn new_poller<T, E, S, SF, Q, QF>(
    polling_error_policy: Arc<dyn PollingErrorPolicy>,
    polling_backoff_policy: Arc<dyn PollingBackoffPolicy>,
    start: S,
    query: Q,
) -> impl Poller<T, E>
where
    T: Send,
    E: Send,
    S: FnOnce() -> SF + Send + Sync,
    SF: Future<Output = Result<LaunchResult<T>>> + Send + 'static,
    Q: FnMut(AsyncJobId) -> QF + Send + Sync,
    QF: Future<Output = Result<PollResult<T, E>>> + Send + 'static,
{
    PollerImpl::new(polling_error_policy, polling_backoff_policy, start, query)
}

/// An implementation of `Poller` based on closures.
///
/// # Parameters
/// * `S` - the start closure. Launches the job. This implementation expects
///   that all necessary parameters, and request options, are captured by this
///   function.
/// * `Q` - the query closure. Checks the status of the job launched by
///   `start`. It receives the job handle as its only input parameter.
struct PollerImpl<S, Q> {
    error_policy: Arc<dyn PollingErrorPolicy>,
    backoff_policy: Arc<dyn PollingBackoffPolicy>,
    start: Option<S>,
    query: Q,
    job_id: Option<AsyncJobId>,
    loop_start: Instant,
    attempt_count: u32,
}

impl<S, Q> PollerImpl<S, Q> {
    pub fn new(
        error_policy: Arc<dyn PollingErrorPolicy>,
        backoff_policy: Arc<dyn PollingBackoffPolicy>,
        start: S,
        query: Q,
    ) -> Self {
        Self {
            error_policy,
            backoff_policy,
            start: Some(start),
            query,
            job_id: None,
            loop_start: Instant::now(),
            attempt_count: 0,
        }
    }
}

impl<S, Q> sealed::Poller for PollerImpl<S, Q> {}

impl<T, E, S, SF, Q, QF> Poller<T, E> for PollerImpl<S, Q>
where
    T: Send,
    E: Send,
    S: FnOnce() -> SF + Send + Sync,
    SF: Future<Output = Result<LaunchResult<T>>> + Send + 'static,
    Q: FnMut(AsyncJobId) -> QF + Send + Sync,
    QF: Future<Output = Result<PollResult<T, E>>> + Send + 'static,
{
    async fn poll(&mut self) -> Option<PollingResult<T, E>> {
        if let Some(start) = self.start.take() {
            let result = start().await;
            let (id, poll) = details::handle_start(result);
            self.job_id = id;
            return Some(poll);
        }
        if let Some(id) = self.job_id.take() {
            self.attempt_count += 1;
            let result = (self.query)(id.clone()).await;
            let (id, poll) = details::handle_poll(
                self.error_policy.clone(),
                self.loop_start,
                self.attempt_count,
                id,
                result,
            );
            self.job_id = id;
            return Some(poll);
        }
        None
    }

    async fn until_done(mut self) -> std::result::Result<T, JobError<E>> {
        while let Some(p) = self.poll().await {
            match p {
                // Return, the job completed or the polling policy is
                // exhausted.
                PollingResult::Completed(r) => return r,
                // Continue, the job was successfully polled and the polling
                // policy was queried.
                PollingResult::InProgress(_) => (),
                // Continue, the polling policy was queried and decided the
                // error is recoverable.
                PollingResult::PollingError(_) => (),
            }
            tokio::time::sleep(
                self.backoff_policy
                    .wait_period(self.loop_start, self.attempt_count),
            )
            .await;
        }
        // We can only get here if `poll()` returns `None`, but it only returns
        // `None` after it returned `PollingResult::Completed` and therefore
        // this is never reached.
        unreachable!("loop should exit via the `Completed` branch vs. this line");
    }

    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = PollingResult<T, E>> + Unpin {
        use futures::stream::unfold;
        Box::pin(unfold(Some(self), move |state| async move {
            if let Some(mut poller) = state {
                if let Some(pr) = poller.poll().await {
                    return Some((pr, Some(poller)));
                }
            };
            None
        }))
    }
}

mod details;
pub mod model;

#[cfg(test)]
mod tests {
    use super::*;
    use lax::error::envelope::ErrorEnvelope;
    use lax::exponential_backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
    use lax::polling_error_policy::{AlwaysContinue, PollingErrorPolicyExt, TransientOnly};
    use std::error::Error as _;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wire::{CodecError, TagRecord};

    #[derive(Clone, Debug, PartialEq)]
    struct TestValue(i32);

    #[derive(Clone, Debug, PartialEq)]
    struct TestFailure(&'static str);

    type Launch = LaunchResult<TestValue>;
    type Status = PollResult<TestValue, TestFailure>;

    #[tokio::test]
    async fn poller_until_done_success() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let query = |id: AsyncJobId| async move {
            assert_eq!(id, "job-123");
            Ok::<Status, Error>(PollResult::Complete(TestValue(42)))
        };
        let got = new_poller(
            Arc::new(AlwaysContinue),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        assert!(matches!(got, Ok(TestValue(42))), "{got:?}");
    }

    #[tokio::test]
    async fn poller_until_done_success_with_transient() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let mut query_count = 0;
        let query = move |_: AsyncJobId| {
            query_count += 1;
            let count = query_count;
            async move {
                match count {
                    1 => Err(transient_error()),
                    _ => Ok::<Status, Error>(PollResult::Complete(TestValue(42))),
                }
            }
        };
        let got = new_poller(
            Arc::new(TransientOnly),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        assert!(matches!(got, Ok(TestValue(42))), "{got:?}");
    }

    #[tokio::test]
    async fn poller_until_done_immediate_success() {
        let start = || async move { Ok::<Launch, Error>(LaunchResult::Complete(TestValue(7))) };
        let query = async |_: AsyncJobId| -> Result<Status> {
            panic!("the status endpoint must not be called after a synchronous completion");
        };
        let got = new_poller(
            Arc::new(AlwaysContinue),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        assert!(matches!(got, Ok(TestValue(7))), "{got:?}");
    }

    #[tokio::test]
    async fn poller_until_done_error_on_start() {
        let start = || async move { Err::<Launch, Error>(permanent_error()) };
        let query = async |_: AsyncJobId| -> Result<Status> {
            panic!("a failed launch leaves nothing to poll");
        };
        let got = new_poller(
            Arc::new(AlwaysContinue),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        match got {
            Err(JobError::Polling(e)) => {
                assert_eq!(e.envelope().and_then(|v| v.error.tag()), Some("path"));
            }
            r => panic!("{r:?}"),
        };
    }

    #[tokio::test]
    async fn poller_until_done_job_failed() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let query = |_: AsyncJobId| async move {
            Ok::<Status, Error>(PollResult::Failed(TestFailure("too_many_write_operations")))
        };
        let got = new_poller(
            Arc::new(AlwaysContinue),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        match got {
            Err(JobError::Failed(e)) => assert_eq!(e, TestFailure("too_many_write_operations")),
            r => panic!("{r:?}"),
        };
    }

    #[tokio::test]
    async fn poller_until_done_permanent_error() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let query = |_: AsyncJobId| async move { Err::<Status, Error>(permanent_error()) };
        let got = new_poller(
            Arc::new(TransientOnly),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        match got {
            Err(JobError::Polling(e)) => {
                assert_eq!(e.envelope().and_then(|v| v.error.tag()), Some("path"));
            }
            r => panic!("{r:?}"),
        };
    }

    #[tokio::test]
    async fn poller_until_done_attempt_limit() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let query = |_: AsyncJobId| async move { Ok::<Status, Error>(PollResult::InProgress) };
        let got = new_poller(
            Arc::new(AlwaysContinue.with_attempt_limit(3)),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        match got {
            Err(JobError::Polling(e)) => assert!(e.is_exhausted(), "{e:?}"),
            r => panic!("{r:?}"),
        };
    }

    #[tokio::test]
    async fn poller_until_done_three_status_checks() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = queries.clone();
        let query = move |_: AsyncJobId| {
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                match count {
                    1 | 2 => Ok::<Status, Error>(PollResult::InProgress),
                    _ => Ok::<Status, Error>(PollResult::Complete(TestValue(42))),
                }
            }
        };
        let backoff = Arc::new(RecordingBackoff::default());
        let got = new_poller(Arc::new(AlwaysContinue), backoff.clone(), start, query)
            .until_done()
            .await;
        assert!(matches!(got, Ok(TestValue(42))), "{got:?}");
        assert_eq!(queries.load(Ordering::SeqCst), 3);
        // One wait after the launch and one after each in-progress status.
        assert_eq!(backoff.calls(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn poller_until_done_decode_failure_is_fatal() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let mut query_count = 0;
        let query = move |_: AsyncJobId| {
            query_count += 1;
            let count = query_count;
            async move {
                match count {
                    1 => Err::<Status, Error>(deser_error()),
                    _ => panic!("decode failures must not be retried"),
                }
            }
        };
        let got = new_poller(
            Arc::new(AlwaysContinue),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .until_done()
        .await;
        match got {
            Err(JobError::Polling(e)) => {
                assert!(e.is_deserialization(), "{e:?}");
                let source = e.source().and_then(|s| s.downcast_ref::<CodecError>());
                assert!(
                    matches!(source, Some(CodecError::UnknownVariantTag { .. })),
                    "{source:?}"
                );
            }
            r => panic!("{r:?}"),
        };
    }

    #[tokio::test]
    async fn poll_returns_none_after_completed() {
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let mut query_count = 0;
        let query = move |_: AsyncJobId| {
            query_count += 1;
            let count = query_count;
            async move {
                match count {
                    1 => Ok::<Status, Error>(PollResult::InProgress),
                    _ => Ok::<Status, Error>(PollResult::Complete(TestValue(42))),
                }
            }
        };
        let mut poller = new_poller(
            Arc::new(AlwaysContinue),
            Arc::new(test_backoff()),
            start,
            query,
        );
        let p0 = poller.poll().await;
        assert!(
            matches!(&p0, Some(PollingResult::InProgress(id)) if id == "job-123"),
            "{p0:?}"
        );
        let p1 = poller.poll().await;
        assert!(
            matches!(&p1, Some(PollingResult::InProgress(id)) if id == "job-123"),
            "{p1:?}"
        );
        let p2 = poller.poll().await;
        assert!(
            matches!(&p2, Some(PollingResult::Completed(Ok(TestValue(42))))),
            "{p2:?}"
        );
        let p3 = poller.poll().await;
        assert!(p3.is_none(), "{p3:?}");
        let p4 = poller.poll().await;
        assert!(p4.is_none(), "{p4:?}");
    }

    #[tokio::test]
    async fn poller_into_stream() {
        use futures::StreamExt;
        let start =
            || async move { Ok::<Launch, Error>(LaunchResult::AsyncJobId("job-123".to_string())) };
        let query =
            |_: AsyncJobId| async move { Ok::<Status, Error>(PollResult::Complete(TestValue(42))) };
        let mut stream = new_poller(
            Arc::new(AlwaysContinue),
            Arc::new(test_backoff()),
            start,
            query,
        )
        .into_stream();
        // The stream should return 2 Some(t) and a None.
        let got = stream.next().await;
        assert!(
            matches!(&got, Some(PollingResult::InProgress(id)) if id == "job-123"),
            "{got:?}"
        );
        let got = stream.next().await;
        assert!(
            matches!(&got, Some(PollingResult::Completed(Ok(TestValue(42))))),
            "{got:?}"
        );
        let got = stream.next().await;
        assert!(got.is_none(), "{got:?}");
    }

    #[test]
    fn job_error_display_and_source() {
        let err: JobError<TestFailure> = JobError::Failed(TestFailure("conflict"));
        assert!(err.to_string().contains("conflict"), "{err}");
        assert!(err.source().is_none(), "{err:?}");

        let err: JobError<TestFailure> = JobError::Polling(permanent_error());
        assert!(err.to_string().contains("could not be determined"), "{err}");
        assert!(err.source().is_some(), "{err:?}");
    }

    #[derive(Debug, Default)]
    struct RecordingBackoff(Mutex<Vec<u32>>);

    impl RecordingBackoff {
        fn calls(&self) -> Vec<u32> {
            self.0.lock().expect("test mutex").clone()
        }
    }

    impl PollingBackoffPolicy for RecordingBackoff {
        fn wait_period(&self, _loop_start: Instant, attempt_count: u32) -> Duration {
            self.0.lock().expect("test mutex").push(attempt_count);
            Duration::from_millis(1)
        }
    }

    fn test_backoff() -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_delay(Duration::from_millis(1))
            .with_maximum_delay(Duration::from_millis(1))
            .build()
            .expect("hard-coded values should succeed")
    }

    fn transient_error() -> Error {
        Error::service(
            ErrorEnvelope::default()
                .set_error_summary("internal_error/...")
                .set_error(TagRecord::new("internal_error")),
        )
    }

    fn permanent_error() -> Error {
        Error::service(
            ErrorEnvelope::default()
                .set_error_summary("path/not_found/..")
                .set_error(TagRecord::new("path")),
        )
    }

    fn deser_error() -> Error {
        Error::deser(CodecError::unknown_tag("PollResult", "zz_unknown"))
    }
}
