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

//! Define traits required of all tagged types.

use crate::{CodecError, TagRecord};
use serde::{Deserialize as _, Serialize as _};

/// A trait that must be implemented by all tagged types.
///
/// Generated unions and polymorphic structs travel on the wire as
/// [TagRecord]s. Implementations map each member tag to its payload
/// placement; [serialize] and [deserialize] bridge the mapping into
/// [`serde`](::serde) so the generated trait impls stay one line long.
pub trait Tagged: serde::ser::Serialize + serde::de::DeserializeOwned {
    /// The typename of this type, as reported by codec errors.
    fn typename() -> &'static str;

    /// Resolves a record into a member of this type.
    fn from_record(record: &TagRecord) -> Result<Self, CodecError>;

    /// Renders this value as a record.
    fn to_record(&self) -> Result<TagRecord, CodecError>;
}

/// Serializes a tagged type through its record form.
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Tagged,
    S: serde::ser::Serializer,
{
    let record = value.to_record().map_err(serde::ser::Error::custom)?;
    record.serialize(serializer)
}

/// Deserializes a tagged type through its record form.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Tagged,
    D: serde::de::Deserializer<'de>,
{
    let record = TagRecord::deserialize(deserializer)?;
    T::from_record(&record).map_err(serde::de::Error::custom)
}
