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

/// The reserved discriminant key.
pub const TAG: &str = ".tag";

pub(crate) type Map = serde_json::Map<String, serde_json::Value>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `TagRecord` is a JSON object discriminated by the reserved `".tag"` key.
///
/// Every union value and polymorphic struct on the wire is such a record.
/// The discriminant names the member, and the member's payload is placed
/// according to its declared type:
///
/// - a **struct** payload is flat-merged beside the tag:
///
/// ```norust
///     {".tag": "complete", "entries": [...]}
/// ```
///
/// - a **union**, **primitive**, or **list** payload is nested under a
///   field named after the member:
///
/// ```norust
///     {".tag": "async_job_id", "async_job_id": "34g93hh34h04y384084"}
/// ```
///
/// - a **void** member is the tag alone:
///
/// ```norust
///     {".tag": "in_progress"}
/// ```
///
/// The `".tag"` key serializes before the payload's own keys because
/// [serde_json] keeps object keys ordered and `"."` sorts before ASCII
/// alphanumerics.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct TagRecord(Map);

impl TagRecord {
    /// Creates a record holding only the discriminant, for void members.
    pub fn new<T: Into<String>>(tag: T) -> Self {
        let mut map = Map::new();
        map.insert(TAG.to_string(), serde_json::Value::String(tag.into()));
        Self(map)
    }

    /// Creates a record with no discriminant, the message's fields flat.
    ///
    /// Polymorphic structs only write their subtype tag when it is known;
    /// the base representation is an untagged record.
    pub fn untagged<T>(type_name: &'static str, message: &T) -> Result<Self, CodecError>
    where
        T: serde::ser::Serialize,
    {
        let value =
            serde_json::to_value(message).map_err(|e| CodecError::shape(type_name, type_name, e))?;
        match value {
            serde_json::Value::Object(map) => Ok(Self(map)),
            _ => Err(CodecError::shape(
                type_name,
                type_name,
                "the payload does not serialize to a JSON object",
            )),
        }
    }

    /// Creates a record with the message's fields flat-merged beside the tag.
    ///
    /// This is the encoding of members whose payload is a struct.
    pub fn with_payload<T>(
        type_name: &'static str,
        tag: &str,
        message: &T,
    ) -> Result<Self, CodecError>
    where
        T: serde::ser::Serialize,
    {
        let value =
            serde_json::to_value(message).map_err(|e| CodecError::shape(type_name, tag, e))?;
        match value {
            serde_json::Value::Object(mut map) => {
                map.insert(TAG.to_string(), serde_json::Value::String(tag.to_string()));
                Ok(Self(map))
            }
            _ => Err(CodecError::shape(
                type_name,
                tag,
                "the payload does not serialize to a JSON object",
            )),
        }
    }

    /// Creates a record with the value nested under a field named after the
    /// tag.
    ///
    /// This is the encoding of members whose payload is a union, primitive,
    /// or list.
    pub fn with_nested<T>(
        type_name: &'static str,
        tag: &str,
        value: &T,
    ) -> Result<Self, CodecError>
    where
        T: serde::ser::Serialize,
    {
        let value =
            serde_json::to_value(value).map_err(|e| CodecError::shape(type_name, tag, e))?;
        let mut map = Map::new();
        map.insert(TAG.to_string(), serde_json::Value::String(tag.to_string()));
        map.insert(tag.to_string(), value);
        Ok(Self(map))
    }

    /// Returns the discriminant, if present and a string.
    pub fn tag(&self) -> Option<&str> {
        self.0.get(TAG).and_then(|v| v.as_str())
    }

    /// Returns the discriminant, or [CodecError::MissingDiscriminant] when it
    /// is absent or not a string.
    pub fn require_tag(&self, type_name: &'static str) -> Result<&str, CodecError> {
        self.tag()
            .ok_or_else(|| CodecError::missing_discriminant(type_name))
    }

    /// Decodes the record, minus the discriminant, as a flat struct payload.
    pub fn payload<T>(&self, type_name: &'static str, member: &str) -> Result<T, CodecError>
    where
        T: serde::de::DeserializeOwned,
    {
        let map = self
            .0
            .iter()
            .filter_map(|(k, v)| {
                if k == TAG {
                    return None;
                }
                Some((k.clone(), v.clone()))
            })
            .collect();
        serde_json::from_value::<T>(serde_json::Value::Object(map))
            .map_err(|e| CodecError::shape(type_name, member, e))
    }

    /// Decodes the payload nested under the field named `member`.
    pub fn nested<T>(&self, type_name: &'static str, member: &str) -> Result<T, CodecError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.0
            .get(member)
            .map(|v| serde_json::from_value::<T>(v.clone()))
            .ok_or_else(|| CodecError::shape(type_name, member, "the member field is missing"))?
            .map_err(|e| CodecError::shape(type_name, member, e))
    }

    /// Decodes a nullable nested payload.
    ///
    /// An absent or `null` field is `Ok(None)`.
    pub fn optional_nested<T>(
        &self,
        type_name: &'static str,
        member: &str,
    ) -> Result<Option<T>, CodecError>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.0.get(member) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(v) => serde_json::from_value::<T>(v.clone())
                .map(Some)
                .map_err(|e| CodecError::shape(type_name, member, e)),
        }
    }

    /// Decodes the record into a tagged type.
    pub fn decode<T>(&self) -> Result<T, CodecError>
    where
        T: crate::tagged::Tagged,
    {
        T::from_record(self)
    }

    /// Encodes a tagged type into a record.
    pub fn encode<T>(value: &T) -> Result<Self, CodecError>
    where
        T: crate::tagged::Tagged,
    {
        value.to_record()
    }
}

/// Implement [`serde`](::serde) serialization for [TagRecord].
impl serde::ser::Serialize for TagRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Implement [`serde`](::serde) deserialization for [TagRecord].
impl<'de> serde::de::Deserialize<'de> for TagRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Map::deserialize(deserializer)?;
        Ok(TagRecord(value))
    }
}

/// Indicates a problem encoding or decoding a tagged record.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum CodecError {
    /// The tag is not a member of a closed union.
    ///
    /// Open unions never produce this error, they fall back to their
    /// reserved `other` member.
    #[error("unknown tag `{tag}` for closed union {type_name}")]
    UnknownVariantTag {
        /// The union being decoded.
        type_name: &'static str,
        /// The unrecognized tag.
        tag: String,
    },

    /// The record requires a discriminant and carries none.
    #[error("the `.tag` discriminant for {type_name} is missing or is not a string")]
    MissingDiscriminant {
        /// The type being decoded.
        type_name: &'static str,
    },

    /// The payload beside or under the tag does not match the member's
    /// declared shape.
    ///
    /// The source error carries the expected and actual detail.
    #[error("the payload for member `{member}` of {type_name} does not match its declared shape, source={source:?}")]
    PayloadShapeMismatch {
        /// The type being encoded or decoded.
        type_name: &'static str,
        /// The member whose payload mismatched.
        member: String,
        #[source]
        source: BoxError,
    },
}

impl CodecError {
    /// A tag outside a closed union's member set.
    pub fn unknown_tag<T: Into<String>>(type_name: &'static str, tag: T) -> Self {
        Self::UnknownVariantTag {
            type_name,
            tag: tag.into(),
        }
    }

    /// A record with no usable discriminant.
    pub fn missing_discriminant(type_name: &'static str) -> Self {
        Self::MissingDiscriminant { type_name }
    }

    /// A payload that does not match its member's declared shape.
    pub fn shape<M, T>(type_name: &'static str, member: M, source: T) -> Self
    where
        M: Into<String>,
        T: Into<BoxError>,
    {
        Self::PayloadShapeMismatch {
            type_name,
            member: member.into(),
            source: source.into(),
        }
    }
}
