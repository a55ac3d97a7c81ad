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

mod core_error;
pub use core_error::*;

/// The error document returned by Lockbox services.
///
/// The Lockbox Client Libraries for Rust distinguish between errors detected
/// while trying to send a request (e.g. cannot open a connection), errors
/// trying to receive a response (e.g. the connection is dropped before the
/// full response), and errors returned by the service itself.
///
/// The types in this module represent the document returned by the Lockbox
/// services in the last case: a human-readable summary paired with a typed
/// description of the failure. Only the typed description is suitable for
/// branching, the summary text may change without notice, even for the same
/// underlying failure.
///
/// # Examples
///
/// ```
/// # use std::result::Result;
/// # use lockbox_lax::error;
/// use error::Error;
/// fn handle_error(e: Error) {
///     if let Some(envelope) = e.envelope() {
///         println!("the service reported {envelope:?}")
///     }
/// }
/// ```
///
/// ```
/// use lockbox_lax::error::envelope::ErrorEnvelope;
/// let json = serde_json::json!({
///     "error_summary": "path/not_found/..",
///     "error": { ".tag": "path", "path": { ".tag": "not_found" } }
/// });
/// let envelope: ErrorEnvelope<wire::TagRecord> = serde_json::from_value(json)?;
/// assert_eq!(envelope.error.tag(), Some("path"));
/// # Ok::<(), serde_json::Error>(())
/// ```
pub mod envelope;
