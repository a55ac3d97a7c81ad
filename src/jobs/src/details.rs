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

//! Simplifies the implementation of `PollerImpl`

use super::*;
use lax::loop_state::LoopState;
use lax::polling_error_policy::PollingErrorPolicy;
use std::sync::Arc;
use std::time::Instant;

pub(crate) fn handle_start<T, E>(
    result: Result<LaunchResult<T>>,
) -> (Option<AsyncJobId>, PollingResult<T, E>) {
    match result {
        Err(e) => (None, PollingResult::Completed(Err(JobError::Polling(e)))),
        Ok(LaunchResult::Complete(value)) => (None, PollingResult::Completed(Ok(value))),
        Ok(LaunchResult::AsyncJobId(id)) => (Some(id.clone()), PollingResult::InProgress(id)),
        Ok(LaunchResult::Other) => (
            None,
            PollingResult::Completed(Err(JobError::Polling(unresolved_state("launch result")))),
        ),
    }
}

pub(crate) fn handle_poll<T, E>(
    error_policy: Arc<dyn PollingErrorPolicy>,
    loop_start: Instant,
    attempt_count: u32,
    job_id: AsyncJobId,
    result: Result<PollResult<T, E>>,
) -> (Option<AsyncJobId>, PollingResult<T, E>) {
    match result {
        // Codec failures never reach the policy, they end the loop as-is.
        Err(e) if e.is_serialization() || e.is_deserialization() => {
            (None, PollingResult::Completed(Err(JobError::Polling(e))))
        }
        Err(e) => {
            let state = error_policy.on_error(loop_start, attempt_count, e);
            handle_polling_error(state, job_id)
        }
        Ok(PollResult::InProgress) => {
            match error_policy.on_in_progress(loop_start, attempt_count, &job_id) {
                None => (Some(job_id.clone()), PollingResult::InProgress(job_id)),
                Some(e) => (None, PollingResult::Completed(Err(JobError::Polling(e)))),
            }
        }
        Ok(PollResult::Complete(value)) => (None, PollingResult::Completed(Ok(value))),
        Ok(PollResult::Failed(error)) => {
            (None, PollingResult::Completed(Err(JobError::Failed(error))))
        }
        Ok(PollResult::Other) => (
            None,
            PollingResult::Completed(Err(JobError::Polling(unresolved_state("job status")))),
        ),
    }
}

fn handle_polling_error<T, E>(
    state: LoopState,
    job_id: AsyncJobId,
) -> (Option<AsyncJobId>, PollingResult<T, E>) {
    match state {
        LoopState::Continue(e) => (Some(job_id), PollingResult::PollingError(e)),
        LoopState::Exhausted(e) | LoopState::Permanent(e) => {
            (None, PollingResult::Completed(Err(JobError::Polling(e))))
        }
    }
}

fn unresolved_state(what: &str) -> Error {
    Error::deser(format!(
        "the {what} is tagged with a state this client cannot resolve, this is a bug in the service or the client library is outdated"
    ))
}
