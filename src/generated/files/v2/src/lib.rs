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

//! Lockbox Client Libraries for Rust - Files
//!
//! Generated types for the `files` namespace (v2). The namespace describes
//! the contents of a user's Lockbox and the operations that write to it.
//! Endpoints whose work may outlive the request complete as asynchronous
//! jobs; drive those through the [jobs] crate.
//!
//! All unions and polymorphic structs in this crate travel on the wire as
//! tagged records; see the [wire] crate for the convention they share.

pub mod model;
