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

//! The wire types shared by every asynchronous job endpoint.
//!
//! Launch endpoints respond with a [LaunchResult], status endpoints receive a
//! [PollArg] and respond with a [PollResult]. Generated namespaces alias
//! these types with their own payloads instead of declaring a union per
//! endpoint.

use wire::tagged::Tagged;
use wire::{CodecError, TagRecord};

/// The handle identifying a launched job.
///
/// Handles are opaque strings minted by the service. They expire eventually;
/// how long they stay valid is the service's decision, not part of the
/// contract.
pub type AsyncJobId = String;

/// The request body for a job status check.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct PollArg {
    /// Id of the asynchronous job. This is the value of a response returned
    /// from the method that launched the job.
    pub async_job_id: AsyncJobId,
}

impl PollArg {
    /// Sets the value of [async_job_id][PollArg::async_job_id].
    pub fn set_async_job_id<T: Into<AsyncJobId>>(mut self, v: T) -> Self {
        self.async_job_id = v.into();
        self
    }
}

/// The result of launching an asynchronous job.
///
/// Launch endpoints respond synchronously when the work is small enough and
/// hand back a job handle otherwise.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum LaunchResult<T> {
    /// The job finished synchronously. The response is included.
    Complete(T),
    /// The work was enqueued. Poll the status endpoint with this handle.
    AsyncJobId(AsyncJobId),
    /// A launch state this client does not recognize.
    Other,
}

impl<T> Tagged for LaunchResult<T>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
{
    fn typename() -> &'static str {
        "LaunchResult"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "complete" => record
                .payload(Self::typename(), "complete")
                .map(Self::Complete),
            "async_job_id" => record
                .nested(Self::typename(), "async_job_id")
                .map(Self::AsyncJobId),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::Complete(v) => TagRecord::with_payload(Self::typename(), "complete", v),
            Self::AsyncJobId(v) => TagRecord::with_nested(Self::typename(), "async_job_id", v),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl<T> serde::ser::Serialize for LaunchResult<T>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de, T> serde::de::Deserialize<'de> for LaunchResult<T>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// The status of an asynchronous job.
///
/// `T` is the response type, flat-merged beside the tag when the job
/// completes. `E` is the operation-specific failure union, nested under the
/// `failed` field.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum PollResult<T, E> {
    /// The job is still being processed.
    InProgress,
    /// The job finished. The response is included.
    Complete(T),
    /// The job failed with an operation-specific error.
    Failed(E),
    /// A job state this client does not recognize.
    Other,
}

impl<T, E> Tagged for PollResult<T, E>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
    E: Tagged,
{
    fn typename() -> &'static str {
        "PollResult"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "in_progress" => Ok(Self::InProgress),
            "complete" => record
                .payload(Self::typename(), "complete")
                .map(Self::Complete),
            "failed" => record
                .nested::<TagRecord>(Self::typename(), "failed")?
                .decode::<E>()
                .map(Self::Failed),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::InProgress => Ok(TagRecord::new("in_progress")),
            Self::Complete(v) => TagRecord::with_payload(Self::typename(), "complete", v),
            Self::Failed(v) => TagRecord::with_nested(Self::typename(), "failed", v),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl<T, E> serde::ser::Serialize for PollResult<T, E>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
    E: Tagged,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de, T, E> serde::de::Deserialize<'de> for PollResult<T, E>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
    E: Tagged,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// An error reported by the status endpoint itself.
///
/// This is the status check's own failure, not the job's: the job may still
/// be running when the check fails.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum PollError {
    /// The job id is invalid or expired.
    InvalidAsyncJobId,
    /// Something went wrong with the job on the server side.
    InternalError,
    /// A failure this client does not recognize.
    Other,
}

impl Tagged for PollError {
    fn typename() -> &'static str {
        "PollError"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "invalid_async_job_id" => Ok(Self::InvalidAsyncJobId),
            "internal_error" => Ok(Self::InternalError),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::InvalidAsyncJobId => Ok(TagRecord::new("invalid_async_job_id")),
            Self::InternalError => Ok(TagRecord::new("internal_error")),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl serde::ser::Serialize for PollError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for PollError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}
