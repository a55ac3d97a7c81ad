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

//! The tagged record wire format for Lockbox APIs.
//!
//! Lockbox APIs represent unions and polymorphic structs as JSON objects
//! discriminated by a reserved `".tag"` key. The payload of a member is
//! either flat-merged beside the tag (struct payloads) or nested under a
//! field named after the member (union, primitive, and list payloads).
//! This crate implements that convention once, so generated code only has
//! to map tags to members.

mod record;
pub use crate::record::*;
pub mod tagged;
