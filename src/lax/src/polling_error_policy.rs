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

//! Defines the types for polling error policies.
//!
//! # Example
//! ```
//! # use lockbox_lax::polling_error_policy::*;
//! use std::time::Duration;
//! // Poll for at most 15 minutes or at most 50 attempts: whichever limit is
//! // reached first stops the polling loop.
//! let policy = TransientOnly
//!     .with_time_limit(Duration::from_secs(15 * 60))
//!     .with_attempt_limit(50);
//! ```
//!
//! The client libraries automatically poll asynchronous jobs and need to (1)
//! distinguish between transient and permanent errors, and (2) provide a
//! mechanism to limit the polling loop duration.
//!
//! We provide a trait that applications may implement to customize the
//! behavior of the polling loop, and some common implementations that should
//! meet most needs.

use crate::error::Error;
use crate::loop_state::LoopState;

/// Determines how errors are handled in the polling loop.
///
/// Implementations of this trait determine if polling errors may resolve in
/// future attempts, and for how long the polling loop may continue.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Query the polling policy after an error.
    ///
    /// # Parameters
    /// * `loop_start` - when the polling loop started.
    /// * `attempt_count` - the number of attempts. This includes the initial
    ///   attempt. This method is called after the job successfully launches,
    ///   it is always non-zero.
    /// * `error` - the last error when polling the job.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    fn on_error(
        &self,
        loop_start: std::time::Instant,
        attempt_count: u32,
        error: Error,
    ) -> LoopState;

    /// Called when the job is successfully polled, but the job is still in
    /// progress.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    fn on_in_progress(
        &self,
        _loop_start: std::time::Instant,
        _attempt_count: u32,
        _job_id: &str,
    ) -> Option<Error> {
        None
    }
}

/// Extension trait for [PollingErrorPolicy]
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Decorate a [PollingErrorPolicy] to limit the total elapsed time in the
    /// polling loop.
    ///
    /// While the time spent in the polling loop (including time in backoff) is
    /// less than the prescribed duration the `on_error()` method returns the
    /// results of the inner policy. After that time it returns
    /// [Exhausted][LoopState::Exhausted] if the inner policy returns
    /// [Continue][LoopState::Continue].
    ///
    /// # Example
    /// ```
    /// # use lockbox_lax::polling_error_policy::*;
    /// use std::time::{Duration, Instant};
    /// let policy = TransientOnly.with_time_limit(Duration::from_secs(10)).with_attempt_limit(3);
    /// let attempt_count = 4;
    /// assert!(policy.on_error(Instant::now(), attempt_count, transient_error()).is_exhausted());
    ///
    /// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
    /// fn transient_error() -> Error {
    ///     Error::service(ErrorEnvelope::default()
    ///         .set_error_summary("internal_error/...")
    ///         .set_error(wire::TagRecord::new("internal_error")))
    /// }
    /// ```
    fn with_time_limit(self, maximum_duration: std::time::Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Decorate a [PollingErrorPolicy] to limit the number of poll attempts.
    ///
    /// This policy decorates an inner policy and limits the total number of
    /// attempts. Note that `on_error()` is called only after a polling attempt.
    /// Therefore, setting the maximum number of attempts to 0 or 1 results in
    /// no polling after the job launches.
    ///
    /// The policy passes through the results from the inner policy as long as
    /// `attempt_count < maximum_attempts`. Once the maximum number of attempts
    /// is reached, the policy returns [Exhausted][LoopState::Exhausted] if the
    /// inner policy returns [Continue][LoopState::Continue], and passes the
    /// inner policy result otherwise.
    ///
    /// # Example
    /// ```
    /// # use lockbox_lax::polling_error_policy::*;
    /// use std::time::Instant;
    /// let policy = TransientOnly.with_attempt_limit(3);
    /// assert!(policy.on_error(Instant::now(), 0, transient_error()).is_continue());
    /// assert!(policy.on_error(Instant::now(), 1, transient_error()).is_continue());
    /// assert!(policy.on_error(Instant::now(), 2, transient_error()).is_continue());
    /// assert!(policy.on_error(Instant::now(), 3, transient_error()).is_exhausted());
    ///
    /// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
    /// fn transient_error() -> Error {
    ///     Error::service(ErrorEnvelope::default()
    ///         .set_error_summary("internal_error/...")
    ///         .set_error(wire::TagRecord::new("internal_error")))
    /// }
    /// ```
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// A polling policy that only continues on transient errors.
///
/// This policy must be decorated to limit the number of polling attempts or
/// the duration of the polling loop.
///
/// The policy treats interrupted transfers, timeouts, and HTTP 429 and 503
/// responses as transient. For errors with a decoded envelope it examines the
/// typed error tag, never the human-readable summary: only the reserved
/// `internal_error` tag is considered transient.
///
/// # Example
/// ```
/// # use lockbox_lax::polling_error_policy::*;
/// use std::time::Instant;
/// let policy = TransientOnly.with_attempt_limit(3);
/// let attempt_count = 4;
/// assert!(policy.on_error(Instant::now(), attempt_count, transient_error()).is_exhausted());
///
/// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
/// fn transient_error() -> Error {
///     Error::service(ErrorEnvelope::default()
///         .set_error_summary("internal_error/...")
///         .set_error(wire::TagRecord::new("internal_error")))
/// }
/// ```
#[derive(Clone, Debug)]
pub struct TransientOnly;

impl PollingErrorPolicy for TransientOnly {
    fn on_error(
        &self,
        _loop_start: std::time::Instant,
        _attempt_count: u32,
        error: Error,
    ) -> LoopState {
        if error.is_io() || error.is_timeout() {
            return LoopState::Continue(error);
        }
        if let Some(envelope) = error.envelope() {
            return if envelope.error.tag() == Some("internal_error") {
                LoopState::Continue(error)
            } else {
                LoopState::Permanent(error)
            };
        }

        match error.http_status_code() {
            Some(code)
                if code == http::StatusCode::TOO_MANY_REQUESTS.as_u16()
                    || code == http::StatusCode::SERVICE_UNAVAILABLE.as_u16() =>
            {
                LoopState::Continue(error)
            }
            _ => LoopState::Permanent(error),
        }
    }
}

/// A polling policy that continues on any error.
///
/// This policy must be decorated to limit the number of polling attempts or
/// the duration of the polling loop.
///
/// The policy continues regardless of the error type or contents.
///
/// # Example
/// ```
/// # use lockbox_lax::polling_error_policy::*;
/// use std::time::Instant;
/// let policy = AlwaysContinue;
/// assert!(policy.on_error(Instant::now(), 1, permanent_error()).is_continue());
///
/// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
/// fn permanent_error() -> Error {
///     Error::service(ErrorEnvelope::default()
///         .set_error_summary("path/not_found/..")
///         .set_error(wire::TagRecord::new("path")))
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AlwaysContinue;

impl PollingErrorPolicy for AlwaysContinue {
    fn on_error(
        &self,
        _loop_start: std::time::Instant,
        _attempt_count: u32,
        error: Error,
    ) -> LoopState {
        LoopState::Continue(error)
    }
}

/// A polling policy decorator that limits the total time in the polling loop.
///
/// This policy decorates an inner policy and limits the duration of polling
/// loops. While the time spent in the polling loop (including time in backoff)
/// is less than the prescribed duration the `on_error()` method returns the
/// results of the inner policy. After that time it returns
/// [Exhausted][LoopState::Exhausted] if the inner policy returns
/// [Continue][LoopState::Continue].
///
/// # Parameters
/// * `P` - the inner polling policy, defaults to [TransientOnly].
#[derive(Debug)]
pub struct LimitedElapsedTime<P = TransientOnly>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_duration: std::time::Duration,
}

impl LimitedElapsedTime {
    /// Creates a new instance, with the default inner policy.
    ///
    /// # Example
    /// ```
    /// # use lockbox_lax::polling_error_policy::*;
    /// use std::time::{Duration, Instant};
    /// let policy = LimitedElapsedTime::new(Duration::from_secs(10));
    /// let start = Instant::now() - Duration::from_secs(20);
    /// assert!(policy.on_error(start, 1, transient_error()).is_exhausted());
    ///
    /// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
    /// fn transient_error() -> Error {
    ///     Error::service(ErrorEnvelope::default()
    ///         .set_error_summary("internal_error/...")
    ///         .set_error(wire::TagRecord::new("internal_error")))
    /// }
    /// ```
    pub fn new(maximum_duration: std::time::Duration) -> Self {
        Self {
            inner: TransientOnly,
            maximum_duration,
        }
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    ///
    /// # Example
    /// ```
    /// # use lockbox_lax::polling_error_policy::*;
    /// use std::time::{Duration, Instant};
    /// let policy = LimitedElapsedTime::custom(AlwaysContinue, Duration::from_secs(10));
    /// let start = Instant::now() - Duration::from_secs(20);
    /// assert!(policy.on_error(start, 1, permanent_error()).is_exhausted());
    ///
    /// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
    /// fn permanent_error() -> Error {
    ///     Error::service(ErrorEnvelope::default()
    ///         .set_error_summary("path/not_found/..")
    ///         .set_error(wire::TagRecord::new("path")))
    /// }
    /// ```
    pub fn custom(inner: P, maximum_duration: std::time::Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    fn in_progress_impl(&self, start: std::time::Instant, job_id: &str) -> Option<Error> {
        let now = std::time::Instant::now();
        if now < start + self.maximum_duration {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            job_id,
            "elapsed time",
            format!("{:?}", now.checked_duration_since(start).unwrap()),
            format!("{:?}", self.maximum_duration),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedElapsedTime<P>
where
    P: PollingErrorPolicy + 'static,
{
    fn on_error(&self, start: std::time::Instant, count: u32, error: Error) -> LoopState {
        match self.inner.on_error(start, count, error) {
            LoopState::Permanent(e) => LoopState::Permanent(e),
            LoopState::Exhausted(e) => LoopState::Exhausted(e),
            LoopState::Continue(e) => {
                if std::time::Instant::now() >= start + self.maximum_duration {
                    LoopState::Exhausted(e)
                } else {
                    LoopState::Continue(e)
                }
            }
        }
    }

    fn on_in_progress(&self, start: std::time::Instant, count: u32, job_id: &str) -> Option<Error> {
        self.inner
            .on_in_progress(start, count, job_id)
            .or_else(|| self.in_progress_impl(start, job_id))
    }
}

/// A polling policy decorator that limits the number of attempts.
///
/// This policy decorates an inner policy and limits the polling total number
/// of attempts. Setting the maximum number of attempts to 0 results in no
/// polling attempts before the initial one.
///
/// The policy passes through the results from the inner policy as long as
/// `attempt_count < maximum_attempts`. However, once the maximum number of
/// attempts is reached, the policy replaces any [Continue][LoopState::Continue]
/// result with [Exhausted][LoopState::Exhausted].
///
/// # Parameters
/// * `P` - the inner polling policy.
#[derive(Debug)]
pub struct LimitedAttemptCount<P = TransientOnly>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Creates a new instance, with the default inner policy.
    ///
    /// # Example
    /// ```
    /// # use lockbox_lax::polling_error_policy::*;
    /// use std::time::Instant;
    /// let policy = LimitedAttemptCount::new(5);
    /// let attempt_count = 10;
    /// assert!(policy.on_error(Instant::now(), attempt_count, transient_error()).is_exhausted());
    ///
    /// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
    /// fn transient_error() -> Error {
    ///     Error::service(ErrorEnvelope::default()
    ///         .set_error_summary("internal_error/...")
    ///         .set_error(wire::TagRecord::new("internal_error")))
    /// }
    /// ```
    pub fn new(maximum_attempts: u32) -> Self {
        Self {
            inner: TransientOnly,
            maximum_attempts,
        }
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    ///
    /// # Example
    /// ```
    /// # use lockbox_lax::polling_error_policy::*;
    /// use std::time::Instant;
    /// let policy = LimitedAttemptCount::custom(AlwaysContinue, 2);
    /// assert!(policy.on_error(Instant::now(), 1, permanent_error()).is_continue());
    /// assert!(policy.on_error(Instant::now(), 2, permanent_error()).is_exhausted());
    ///
    /// use lockbox_lax::error::{Error, envelope::ErrorEnvelope};
    /// fn permanent_error() -> Error {
    ///     Error::service(ErrorEnvelope::default()
    ///         .set_error_summary("path/not_found/..")
    ///         .set_error(wire::TagRecord::new("path")))
    /// }
    /// ```
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }

    fn in_progress_impl(&self, count: u32, job_id: &str) -> Option<Error> {
        if count < self.maximum_attempts {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            job_id,
            "attempt count",
            count.to_string(),
            self.maximum_attempts.to_string(),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(&self, start: std::time::Instant, count: u32, error: Error) -> LoopState {
        match self.inner.on_error(start, count, error) {
            LoopState::Permanent(e) => LoopState::Permanent(e),
            LoopState::Exhausted(e) => LoopState::Exhausted(e),
            LoopState::Continue(e) => {
                if count >= self.maximum_attempts {
                    LoopState::Exhausted(e)
                } else {
                    LoopState::Continue(e)
                }
            }
        }
    }

    fn on_in_progress(&self, start: std::time::Instant, count: u32, job_id: &str) -> Option<Error> {
        self.inner
            .on_in_progress(start, count, job_id)
            .or_else(|| self.in_progress_impl(count, job_id))
    }
}

/// Indicates that a polling loop has been exhausted.
#[derive(Debug)]
pub struct Exhausted {
    job_id: String,
    limit_name: &'static str,
    value: String,
    limit: String,
}

impl Exhausted {
    pub fn new(job_id: &str, limit_name: &'static str, value: String, limit: String) -> Self {
        Self {
            job_id: job_id.to_string(),
            limit_name,
            value,
            limit,
        }
    }
}

impl std::fmt::Display for Exhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "polling loop for {} exhausted, {} value ({}) exceeds limit ({})",
            self.job_id, self.limit_name, self.value, self.limit
        )
    }
}

impl std::error::Error for Exhausted {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::envelope::ErrorEnvelope;
    use http::HeaderMap;
    use std::error::Error as _;
    use std::time::{Duration, Instant};
    use wire::TagRecord;

    mockall::mock! {
        #[derive(Debug)]
        Policy {}
        impl PollingErrorPolicy for Policy {
            fn on_error(&self, loop_start: std::time::Instant, attempt_count: u32, error: Error) -> LoopState;
            fn on_in_progress(&self, loop_start: std::time::Instant, attempt_count: u32, job_id: &str) -> Option<Error>;
        }
    }

    #[test]
    fn transient_only() {
        let p = TransientOnly;

        let now = std::time::Instant::now();
        assert!(p.on_in_progress(now, 0, "unused").is_none());
        assert!(p.on_error(now, 0, internal_error()).is_continue());
        assert!(p.on_error(now, 0, not_found()).is_permanent());
        assert!(p.on_error(now, 0, http_unavailable()).is_continue());
        assert!(p.on_error(now, 0, http_too_many_requests()).is_continue());
        assert!(p.on_error(now, 0, http_permission_denied()).is_permanent());

        assert!(
            p.on_error(now, 0, Error::io("err".to_string()))
                .is_continue()
        );
        assert!(
            p.on_error(now, 0, Error::timeout("err".to_string()))
                .is_continue()
        );

        assert!(
            p.on_error(now, 0, Error::ser("err".to_string()))
                .is_permanent()
        );
        assert!(
            p.on_error(now, 0, Error::deser("err".to_string()))
                .is_permanent()
        );
    }

    #[test]
    fn transient_only_ignores_summary_text() {
        let p = TransientOnly;
        let now = std::time::Instant::now();

        let error = Error::service(
            ErrorEnvelope::default()
                .set_error_summary("anything at all, even internal_error text")
                .set_error(TagRecord::new("path")),
        );
        assert!(p.on_error(now, 0, error).is_permanent());

        let error = Error::service(
            ErrorEnvelope::default()
                .set_error_summary("")
                .set_error(TagRecord::new("internal_error")),
        );
        assert!(p.on_error(now, 0, error).is_continue());
    }

    #[test]
    fn always_continue() {
        let p = AlwaysContinue;

        let now = std::time::Instant::now();
        assert!(p.on_in_progress(now, 0, "unused").is_none());
        assert!(p.on_error(now, 0, http_unavailable()).is_continue());
        assert!(p.on_error(now, 0, internal_error()).is_continue());
    }

    #[test_case::test_case(Error::io("err"))]
    #[test_case::test_case(Error::deser("err"))]
    #[test_case::test_case(Error::ser("err"))]
    fn always_continue_error_kind(error: Error) {
        let p = AlwaysContinue;
        let now = std::time::Instant::now();
        assert!(p.on_error(now, 0, error).is_continue());
    }

    #[test]
    fn with_time_limit() {
        let policy = AlwaysContinue.with_time_limit(Duration::from_secs(10));
        assert!(
            policy
                .on_error(Instant::now() - Duration::from_secs(1), 1, not_found())
                .is_continue(),
            "{policy:?}"
        );
        assert!(
            policy
                .on_error(Instant::now() - Duration::from_secs(20), 1, not_found())
                .is_exhausted(),
            "{policy:?}"
        );
    }

    #[test]
    fn with_attempt_limit() {
        let policy = AlwaysContinue.with_attempt_limit(3);
        assert!(
            policy.on_error(Instant::now(), 1, not_found()).is_continue(),
            "{policy:?}"
        );
        assert!(
            policy
                .on_error(Instant::now(), 5, not_found())
                .is_exhausted(),
            "{policy:?}"
        );
    }

    fn http_error(code: u16, message: &str) -> Error {
        let payload = bytes::Bytes::from_owner(message.to_string());
        Error::http(code, HeaderMap::new(), payload)
    }

    fn http_unavailable() -> Error {
        http_error(503, "SERVICE UNAVAILABLE")
    }

    fn http_too_many_requests() -> Error {
        http_error(429, "TOO MANY REQUESTS")
    }

    fn http_permission_denied() -> Error {
        http_error(403, "PERMISSION DENIED")
    }

    fn internal_error() -> Error {
        Error::service(
            ErrorEnvelope::default()
                .set_error_summary("internal_error/...")
                .set_error(TagRecord::new("internal_error")),
        )
    }

    fn not_found() -> Error {
        Error::service(
            ErrorEnvelope::default()
                .set_error_summary("path/not_found/..")
                .set_error(TagRecord::new("path")),
        )
    }

    #[test]
    fn test_limited_elapsed_time_on_error() {
        let policy = LimitedElapsedTime::new(Duration::from_secs(20));
        assert!(
            policy
                .on_error(
                    Instant::now() - Duration::from_secs(10),
                    1,
                    internal_error()
                )
                .is_continue(),
            "{policy:?}"
        );
        assert!(
            policy
                .on_error(
                    Instant::now() - Duration::from_secs(30),
                    1,
                    internal_error()
                )
                .is_exhausted(),
            "{policy:?}"
        );
    }

    #[test]
    fn test_limited_elapsed_time_in_progress() {
        let policy = LimitedElapsedTime::new(Duration::from_secs(20));
        let err = policy.on_in_progress(Instant::now() - Duration::from_secs(10), 1, "unused");
        assert!(err.is_none(), "{err:?}");
        let err = policy
            .on_in_progress(Instant::now() - Duration::from_secs(30), 1, "test-job-id")
            .unwrap();
        assert!(err.is_exhausted(), "{err:?}");
        let exhausted = err.source().and_then(|e| e.downcast_ref::<Exhausted>());
        assert!(exhausted.is_some());
        assert!(err.to_string().contains("test-job-id"), "{err}");
    }

    #[test]
    fn test_limited_time_forwards_on_error() {
        let mut mock = MockPolicy::new();
        mock.expect_on_error()
            .times(1..)
            .returning(|_, _, e| LoopState::Continue(e));

        let now = std::time::Instant::now();
        let policy = LimitedElapsedTime::custom(mock, Duration::from_secs(60));
        let rf = policy.on_error(now, 0, internal_error());
        assert!(rf.is_continue());
    }

    #[test]
    fn test_limited_time_forwards_in_progress() {
        let mut mock = MockPolicy::new();
        mock.expect_on_in_progress()
            .times(3)
            .returning(|_, _, _| None);

        let now = std::time::Instant::now();
        let policy = LimitedElapsedTime::custom(mock, Duration::from_secs(60));
        assert!(policy.on_in_progress(now, 1, "test-job-id").is_none());
        assert!(policy.on_in_progress(now, 2, "test-job-id").is_none());
        assert!(policy.on_in_progress(now, 3, "test-job-id").is_none());
    }

    #[test]
    fn test_limited_time_in_progress_returns_inner() {
        let mut mock = MockPolicy::new();
        mock.expect_on_in_progress()
            .times(1)
            .returning(|_, _, _| Some(internal_error()));

        let now = std::time::Instant::now();
        let policy = LimitedElapsedTime::custom(mock, Duration::from_secs(60));
        assert!(policy.on_in_progress(now, 1, "test-job-id").is_some());
    }

    #[test]
    fn test_limited_time_inner_continues() {
        let mut mock = MockPolicy::new();
        mock.expect_on_error()
            .times(1..)
            .returning(|_, _, e| LoopState::Continue(e));

        let now = std::time::Instant::now();
        let policy = LimitedElapsedTime::custom(mock, Duration::from_secs(60));
        let rf = policy.on_error(now - Duration::from_secs(10), 1, internal_error());
        assert!(rf.is_continue());

        let rf = policy.on_error(now - Duration::from_secs(70), 1, internal_error());
        assert!(rf.is_exhausted());
    }

    #[test]
    fn test_limited_time_inner_permanent() {
        let mut mock = MockPolicy::new();
        mock.expect_on_error()
            .times(2)
            .returning(|_, _, e| LoopState::Permanent(e));

        let now = std::time::Instant::now();
        let policy = LimitedElapsedTime::custom(mock, Duration::from_secs(60));

        let rf = policy.on_error(now - Duration::from_secs(10), 1, internal_error());
        assert!(rf.is_permanent());

        let rf = policy.on_error(now + Duration::from_secs(10), 1, internal_error());
        assert!(rf.is_permanent());
    }

    #[test]
    fn test_limited_time_inner_exhausted() {
        let mut mock = MockPolicy::new();
        mock.expect_on_error()
            .times(2)
            .returning(|_, _, e| LoopState::Exhausted(e));

        let now = std::time::Instant::now();
        let policy = LimitedElapsedTime::custom(mock, Duration::from_secs(60));

        let rf = policy.on_error(now - Duration::from_secs(10), 1, internal_error());
        assert!(rf.is_exhausted());

        let rf = policy.on_error(now + Duration::from_secs(10), 1, internal_error());
        assert!(rf.is_exhausted());
    }

    #[test]
    fn test_limited_attempt_count_on_error() {
        let policy = LimitedAttemptCount::new(20);
        assert!(
            policy
                .on_error(Instant::now(), 10, internal_error())
                .is_continue(),
            "{policy:?}"
        );
        assert!(
            policy
                .on_error(Instant::now(), 30, internal_error())
                .is_exhausted(),
            "{policy:?}"
        );
    }

    #[test]
    fn test_limited_attempt_count_in_progress() {
        let policy = LimitedAttemptCount::new(20);
        let err = policy.on_in_progress(Instant::now(), 10, "unused");
        assert!(err.is_none(), "{err:?}");
        let err = policy
            .on_in_progress(Instant::now(), 30, "test-job-id")
            .unwrap();
        assert!(err.is_exhausted(), "{err:?}");
        let exhausted = err.source().and_then(|e| e.downcast_ref::<Exhausted>());
        assert!(exhausted.is_some());
    }

    #[test]
    fn test_limited_attempt_count_forwards_on_error() {
        let mut mock = MockPolicy::new();
        mock.expect_on_error()
            .times(1..)
            .returning(|_, _, e| LoopState::Continue(e));

        let now = std::time::Instant::now();
        let policy = LimitedAttemptCount::custom(mock, 3);
        assert!(policy.on_error(now, 1, internal_error()).is_continue());
        assert!(policy.on_error(now, 2, internal_error()).is_continue());
        assert!(policy.on_error(now, 3, internal_error()).is_exhausted());
    }

    #[test]
    fn test_limited_attempt_count_forwards_in_progress() {
        let mut mock = MockPolicy::new();
        mock.expect_on_in_progress()
            .times(3)
            .returning(|_, _, _| None);

        let now = std::time::Instant::now();
        let policy = LimitedAttemptCount::custom(mock, 5);
        assert!(policy.on_in_progress(now, 1, "test-job-id").is_none());
        assert!(policy.on_in_progress(now, 2, "test-job-id").is_none());
        assert!(policy.on_in_progress(now, 3, "test-job-id").is_none());
    }

    #[test]
    fn test_limited_attempt_count_in_progress_returns_inner() {
        let mut mock = MockPolicy::new();
        mock.expect_on_in_progress()
            .times(1)
            .returning(|_, _, _| Some(internal_error()));

        let now = std::time::Instant::now();
        let policy = LimitedAttemptCount::custom(mock, 5);
        assert!(policy.on_in_progress(now, 1, "test-job-id").is_some());
    }

    #[test]
    fn test_limited_attempt_count_inner_permanent() {
        let mut mock = MockPolicy::new();
        mock.expect_on_error()
            .times(2)
            .returning(|_, _, e| LoopState::Permanent(e));
        let policy = LimitedAttemptCount::custom(mock, 2);
        let now = std::time::Instant::now();
        let rf = policy.on_error(now, 1, Error::ser("err"));
        assert!(rf.is_permanent());

        let rf = policy.on_error(now, 1, Error::ser("err"));
        assert!(rf.is_permanent());
    }

    #[test]
    fn test_limited_attempt_count_inner_exhausted() {
        let mut mock = MockPolicy::new();
        mock.expect_on_error()
            .times(2)
            .returning(|_, _, e| LoopState::Exhausted(e));
        let policy = LimitedAttemptCount::custom(mock, 2);
        let now = std::time::Instant::now();

        let rf = policy.on_error(now, 1, internal_error());
        assert!(rf.is_exhausted());

        let rf = policy.on_error(now, 1, internal_error());
        assert!(rf.is_exhausted());
    }

    #[test]
    fn test_exhausted_fmt() {
        let exhausted = Exhausted::new(
            "job-id",
            "limit-name",
            "test-value".to_string(),
            "test-limit".to_string(),
        );
        let fmt = format!("{exhausted}");
        assert!(fmt.contains("job-id"), "{fmt}");
        assert!(fmt.contains("limit-name"), "{fmt}");
        assert!(fmt.contains("test-value"), "{fmt}");
        assert!(fmt.contains("test-limit"), "{fmt}");
    }
}
