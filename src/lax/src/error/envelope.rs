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

use wire::tagged::Tagged;
use wire::{CodecError, TagRecord};

/// The error document returned by failed Lockbox API calls.
///
/// The `error` field is the only part of the envelope suitable for branching.
/// Routes decode it into their declared error union, or keep it as a
/// [TagRecord] when the route is not known. The `error_summary` field is a
/// human-readable rendering of the same failure, useful in logs and bug
/// reports, and subject to change without notice.
///
/// # Example
/// ```
/// use lockbox_lax::error::envelope::ErrorEnvelope;
/// let json = serde_json::json!({
///     "error_summary": "too_many_write_operations/...",
///     "error": { ".tag": "too_many_write_operations" }
/// });
/// let envelope: ErrorEnvelope<wire::TagRecord> = serde_json::from_value(json)?;
/// assert_eq!(envelope.error.tag(), Some("too_many_write_operations"));
/// assert!(envelope.user_message.is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct ErrorEnvelope<E> {
    /// A human-readable summary of the error.
    ///
    /// The summary is assembled from the tags of the `error` field and may
    /// change between service releases. Use it for logging and troubleshooting
    /// only.
    #[serde(default)]
    pub error_summary: String,

    /// The typed description of the failure.
    pub error: E,

    /// An optional message, localized for the user the call was made on behalf
    /// of, that is safe to display verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<UserMessage>,
}

impl<E> ErrorEnvelope<E> {
    /// Sets the value of [error_summary][ErrorEnvelope::error_summary].
    pub fn set_error_summary<T: Into<String>>(mut self, v: T) -> Self {
        self.error_summary = v.into();
        self
    }

    /// Sets the value of [error][ErrorEnvelope::error].
    pub fn set_error<T: Into<E>>(mut self, v: T) -> Self {
        self.error = v.into();
        self
    }

    /// Sets the value of [user_message][ErrorEnvelope::user_message].
    pub fn set_user_message<T: Into<UserMessage>>(mut self, v: T) -> Self {
        self.user_message = Some(v.into());
        self
    }

    /// Sets or clears the value of [user_message][ErrorEnvelope::user_message].
    pub fn set_or_clear_user_message<T: Into<UserMessage>>(mut self, v: Option<T>) -> Self {
        self.user_message = v.map(|x| x.into());
        self
    }
}

impl ErrorEnvelope<TagRecord> {
    /// Extracts the typed error from a kind-agnostic envelope.
    ///
    /// Transports decode the envelope with a [TagRecord] error first, so the
    /// summary and user message survive even when the route's error type is
    /// not known. This method completes the decoding once the caller knows
    /// which error union the route declares.
    pub fn try_into_error<E: Tagged>(&self) -> Result<E, CodecError> {
        E::from_record(&self.error)
    }
}

/// A message that can be displayed to the user of the app.
///
/// The message is localized for the user the API call was made on behalf of.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct UserMessage {
    /// The message text.
    #[serde(default)]
    pub text: String,

    /// The IETF BCP 47 language tag of the message.
    #[serde(default)]
    pub locale: String,
}

impl UserMessage {
    /// Sets the value of [text][UserMessage::text].
    pub fn set_text<T: Into<String>>(mut self, v: T) -> Self {
        self.text = v.into();
        self
    }

    /// Sets the value of [locale][UserMessage::locale].
    pub fn set_locale<T: Into<String>>(mut self, v: T) -> Self {
        self.locale = v.into();
        self
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
