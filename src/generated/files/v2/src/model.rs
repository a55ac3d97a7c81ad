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

//! Types for the `files` namespace (v2).

use wire::tagged::Tagged;
use wire::{CodecError, TagRecord};

/// The fields shared by every metadata subtype.
///
/// A record tagged with a subtype this client does not recognize still
/// decodes to these fields. The unresolved tag is preserved in [tag][MetadataBase::tag]
/// so the value re-encodes unchanged.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct MetadataBase {
    /// The last component of the path (including extension). This never
    /// contains a slash.
    pub name: String,

    /// The lowercased full path in the user's Lockbox. This always starts
    /// with a slash. Absent for unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,

    /// The cased path to be used for display purposes only. Absent for
    /// unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,

    /// Set if the file or folder is contained in a shared folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_shared_folder_id: Option<String>,

    /// The subtype tag this client could not resolve. `None` when the record
    /// carried no tag at all.
    #[serde(skip)]
    pub tag: Option<String>,
}

impl MetadataBase {
    /// Sets the value of [name][MetadataBase::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [path_lower][MetadataBase::path_lower].
    pub fn set_path_lower<T: Into<String>>(mut self, v: T) -> Self {
        self.path_lower = Some(v.into());
        self
    }

    /// Sets the value of [path_display][MetadataBase::path_display].
    pub fn set_path_display<T: Into<String>>(mut self, v: T) -> Self {
        self.path_display = Some(v.into());
        self
    }

    /// Sets the value of [parent_shared_folder_id][MetadataBase::parent_shared_folder_id].
    pub fn set_parent_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.parent_shared_folder_id = Some(v.into());
        self
    }
}

/// Sharing info for a file that is contained in a shared folder or has
/// explicit members.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct FileSharingInfo {
    /// True if the file is inside a read-only shared folder. Defaults to
    /// false when absent.
    #[serde(default)]
    pub read_only: bool,

    /// Id of the shared folder that holds this file.
    pub parent_shared_folder_id: String,

    /// The last user to modify the file. Absent when that account has been
    /// deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

impl FileSharingInfo {
    /// Sets the value of [read_only][FileSharingInfo::read_only].
    pub fn set_read_only(mut self, v: bool) -> Self {
        self.read_only = v;
        self
    }

    /// Sets the value of [parent_shared_folder_id][FileSharingInfo::parent_shared_folder_id].
    pub fn set_parent_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.parent_shared_folder_id = v.into();
        self
    }

    /// Sets the value of [modified_by][FileSharingInfo::modified_by].
    pub fn set_modified_by<T: Into<String>>(mut self, v: T) -> Self {
        self.modified_by = Some(v.into());
        self
    }
}

/// Sharing info for a folder that is contained in a shared folder or is a
/// shared folder mount point.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct FolderSharingInfo {
    /// True if the folder is inside a read-only shared folder. Defaults to
    /// false when absent.
    #[serde(default)]
    pub read_only: bool,

    /// Set if the folder is contained in a shared folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_shared_folder_id: Option<String>,

    /// Set if the folder is a shared folder mount point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_folder_id: Option<String>,

    /// True when the user can only traverse the folder to reach content
    /// shared deeper in the tree. Defaults to false when absent.
    #[serde(default)]
    pub traverse_only: bool,

    /// True when the user has no access to the folder itself. Defaults to
    /// false when absent.
    #[serde(default)]
    pub no_access: bool,
}

impl FolderSharingInfo {
    /// Sets the value of [read_only][FolderSharingInfo::read_only].
    pub fn set_read_only(mut self, v: bool) -> Self {
        self.read_only = v;
        self
    }

    /// Sets the value of [parent_shared_folder_id][FolderSharingInfo::parent_shared_folder_id].
    pub fn set_parent_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.parent_shared_folder_id = Some(v.into());
        self
    }

    /// Sets the value of [shared_folder_id][FolderSharingInfo::shared_folder_id].
    pub fn set_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.shared_folder_id = Some(v.into());
        self
    }

    /// Sets the value of [traverse_only][FolderSharingInfo::traverse_only].
    pub fn set_traverse_only(mut self, v: bool) -> Self {
        self.traverse_only = v;
        self
    }

    /// Sets the value of [no_access][FolderSharingInfo::no_access].
    pub fn set_no_access(mut self, v: bool) -> Self {
        self.no_access = v;
        self
    }
}

/// Metadata for a file.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct FileMetadata {
    /// The last component of the path (including extension). This never
    /// contains a slash.
    pub name: String,

    /// A unique identifier of the file.
    pub id: String,

    /// The modification time reported by the client that uploaded the file,
    /// in ISO 8601 format. The service stores this value without verifying
    /// it, so it is only suitable for display.
    pub client_modified: String,

    /// The last time the file was modified on Lockbox, in ISO 8601 format.
    pub server_modified: String,

    /// A unique identifier of the current revision of the file. Can be used
    /// to detect changes and avoid conflicts.
    pub rev: String,

    /// The file size in bytes.
    pub size: u64,

    /// The lowercased full path in the user's Lockbox. This always starts
    /// with a slash. Absent for unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,

    /// The cased path to be used for display purposes only. Absent for
    /// unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,

    /// Set if the file is contained in a shared folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_shared_folder_id: Option<String>,

    /// A hash of the file content, suitable for verifying a download.
    /// Absent for some content types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,

    /// Set when the file has members granted access directly, not through a
    /// parent folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_explicit_shared_members: Option<bool>,

    /// Set if the file is contained in a shared folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharing_info: Option<FileSharingInfo>,
}

impl FileMetadata {
    /// Sets the value of [name][FileMetadata::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [id][FileMetadata::id].
    pub fn set_id<T: Into<String>>(mut self, v: T) -> Self {
        self.id = v.into();
        self
    }

    /// Sets the value of [client_modified][FileMetadata::client_modified].
    pub fn set_client_modified<T: Into<String>>(mut self, v: T) -> Self {
        self.client_modified = v.into();
        self
    }

    /// Sets the value of [server_modified][FileMetadata::server_modified].
    pub fn set_server_modified<T: Into<String>>(mut self, v: T) -> Self {
        self.server_modified = v.into();
        self
    }

    /// Sets the value of [rev][FileMetadata::rev].
    pub fn set_rev<T: Into<String>>(mut self, v: T) -> Self {
        self.rev = v.into();
        self
    }

    /// Sets the value of [size][FileMetadata::size].
    pub fn set_size(mut self, v: u64) -> Self {
        self.size = v;
        self
    }

    /// Sets the value of [path_lower][FileMetadata::path_lower].
    pub fn set_path_lower<T: Into<String>>(mut self, v: T) -> Self {
        self.path_lower = Some(v.into());
        self
    }

    /// Sets the value of [path_display][FileMetadata::path_display].
    pub fn set_path_display<T: Into<String>>(mut self, v: T) -> Self {
        self.path_display = Some(v.into());
        self
    }

    /// Sets the value of [parent_shared_folder_id][FileMetadata::parent_shared_folder_id].
    pub fn set_parent_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.parent_shared_folder_id = Some(v.into());
        self
    }

    /// Sets the value of [content_hash][FileMetadata::content_hash].
    pub fn set_content_hash<T: Into<String>>(mut self, v: T) -> Self {
        self.content_hash = Some(v.into());
        self
    }

    /// Sets the value of [has_explicit_shared_members][FileMetadata::has_explicit_shared_members].
    pub fn set_has_explicit_shared_members(mut self, v: bool) -> Self {
        self.has_explicit_shared_members = Some(v);
        self
    }

    /// Sets the value of [sharing_info][FileMetadata::sharing_info].
    pub fn set_sharing_info<T: Into<FileSharingInfo>>(mut self, v: T) -> Self {
        self.sharing_info = Some(v.into());
        self
    }
}

/// Metadata for a folder.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct FolderMetadata {
    /// The last component of the path. This never contains a slash.
    pub name: String,

    /// A unique identifier of the folder.
    pub id: String,

    /// The lowercased full path in the user's Lockbox. This always starts
    /// with a slash. Absent for unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,

    /// The cased path to be used for display purposes only. Absent for
    /// unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,

    /// Set if the folder is contained in a shared folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_shared_folder_id: Option<String>,

    /// Set if the folder is a shared folder mount point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_folder_id: Option<String>,

    /// Set if the folder is contained in a shared folder or is a shared
    /// folder mount point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharing_info: Option<FolderSharingInfo>,
}

impl FolderMetadata {
    /// Sets the value of [name][FolderMetadata::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [id][FolderMetadata::id].
    pub fn set_id<T: Into<String>>(mut self, v: T) -> Self {
        self.id = v.into();
        self
    }

    /// Sets the value of [path_lower][FolderMetadata::path_lower].
    pub fn set_path_lower<T: Into<String>>(mut self, v: T) -> Self {
        self.path_lower = Some(v.into());
        self
    }

    /// Sets the value of [path_display][FolderMetadata::path_display].
    pub fn set_path_display<T: Into<String>>(mut self, v: T) -> Self {
        self.path_display = Some(v.into());
        self
    }

    /// Sets the value of [parent_shared_folder_id][FolderMetadata::parent_shared_folder_id].
    pub fn set_parent_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.parent_shared_folder_id = Some(v.into());
        self
    }

    /// Sets the value of [shared_folder_id][FolderMetadata::shared_folder_id].
    pub fn set_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.shared_folder_id = Some(v.into());
        self
    }

    /// Sets the value of [sharing_info][FolderMetadata::sharing_info].
    pub fn set_sharing_info<T: Into<FolderSharingInfo>>(mut self, v: T) -> Self {
        self.sharing_info = Some(v.into());
        self
    }
}

/// Metadata for a file or folder that used to exist at this path but no
/// longer does.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct DeletedMetadata {
    /// The last component of the path. This never contains a slash.
    pub name: String,

    /// The lowercased full path in the user's Lockbox. This always starts
    /// with a slash. Absent for unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,

    /// The cased path to be used for display purposes only. Absent for
    /// unmounted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,

    /// Set if the entry was contained in a shared folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_shared_folder_id: Option<String>,
}

impl DeletedMetadata {
    /// Sets the value of [name][DeletedMetadata::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [path_lower][DeletedMetadata::path_lower].
    pub fn set_path_lower<T: Into<String>>(mut self, v: T) -> Self {
        self.path_lower = Some(v.into());
        self
    }

    /// Sets the value of [path_display][DeletedMetadata::path_display].
    pub fn set_path_display<T: Into<String>>(mut self, v: T) -> Self {
        self.path_display = Some(v.into());
        self
    }

    /// Sets the value of [parent_shared_folder_id][DeletedMetadata::parent_shared_folder_id].
    pub fn set_parent_shared_folder_id<T: Into<String>>(mut self, v: T) -> Self {
        self.parent_shared_folder_id = Some(v.into());
        self
    }
}

/// Metadata for a file or folder.
///
/// The service reports one of several subtypes, discriminated by the
/// reserved `".tag"` key. A record tagged with a subtype this client does
/// not recognize decodes to [Metadata::Base] with the tag preserved, and an
/// untagged record decodes to [Metadata::Base] directly. The service can
/// therefore add subtypes without breaking deployed clients.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Metadata {
    /// A file.
    File(FileMetadata),
    /// A folder.
    Folder(FolderMetadata),
    /// A file or folder that no longer exists at this path.
    Deleted(DeletedMetadata),
    /// The shared fields of a subtype this client does not recognize.
    Base(MetadataBase),
}

impl Default for Metadata {
    fn default() -> Self {
        Self::Base(MetadataBase::default())
    }
}

impl Tagged for Metadata {
    fn typename() -> &'static str {
        "Metadata"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.tag() {
            Some("file") => record.payload(Self::typename(), "file").map(Self::File),
            Some("folder") => record.payload(Self::typename(), "folder").map(Self::Folder),
            Some("deleted") => record
                .payload(Self::typename(), "deleted")
                .map(Self::Deleted),
            Some(tag) => {
                let tag = tag.to_string();
                record
                    .payload::<MetadataBase>(Self::typename(), &tag)
                    .map(|base| {
                        Self::Base(MetadataBase {
                            tag: Some(tag),
                            ..base
                        })
                    })
            }
            None => record
                .payload(Self::typename(), Self::typename())
                .map(Self::Base),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::File(v) => TagRecord::with_payload(Self::typename(), "file", v),
            Self::Folder(v) => TagRecord::with_payload(Self::typename(), "folder", v),
            Self::Deleted(v) => TagRecord::with_payload(Self::typename(), "deleted", v),
            Self::Base(v) => match &v.tag {
                Some(tag) => TagRecord::with_payload(Self::typename(), tag, v),
                None => TagRecord::untagged(Self::typename(), v),
            },
        }
    }
}

impl serde::ser::Serialize for Metadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for Metadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// The policy for writing over existing content.
///
/// This is a closed union. Members are never added without a new endpoint
/// version, so an unrecognized tag is a decode error.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum WriteMode {
    /// Do not overwrite. On conflict the service renames the upload.
    Add,
    /// Always overwrite the existing content.
    Overwrite,
    /// Overwrite only when the current revision matches the one given here.
    Update(String),
}

impl Tagged for WriteMode {
    fn typename() -> &'static str {
        "WriteMode"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "add" => Ok(Self::Add),
            "overwrite" => Ok(Self::Overwrite),
            "update" => record.nested(Self::typename(), "update").map(Self::Update),
            tag => Err(CodecError::unknown_tag(Self::typename(), tag)),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::Add => Ok(TagRecord::new("add")),
            Self::Overwrite => Ok(TagRecord::new("overwrite")),
            Self::Update(v) => TagRecord::with_nested(Self::typename(), "update", v),
        }
    }
}

impl serde::ser::Serialize for WriteMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for WriteMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// Why a path could not be resolved.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum LookupError {
    /// The path is not syntactically valid. The service may include detail.
    MalformedPath(Option<String>),
    /// There is nothing at the given path.
    NotFound,
    /// The path points to a folder where a file was expected.
    NotFile,
    /// The path points to a file where a folder was expected.
    NotFolder,
    /// The content is not available to this user.
    RestrictedContent,
    /// A failure mode this client does not recognize.
    Other,
}

impl Tagged for LookupError {
    fn typename() -> &'static str {
        "LookupError"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "malformed_path" => record
                .optional_nested(Self::typename(), "malformed_path")
                .map(Self::MalformedPath),
            "not_found" => Ok(Self::NotFound),
            "not_file" => Ok(Self::NotFile),
            "not_folder" => Ok(Self::NotFolder),
            "restricted_content" => Ok(Self::RestrictedContent),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::MalformedPath(Some(v)) => {
                TagRecord::with_nested(Self::typename(), "malformed_path", v)
            }
            Self::MalformedPath(None) => Ok(TagRecord::new("malformed_path")),
            Self::NotFound => Ok(TagRecord::new("not_found")),
            Self::NotFile => Ok(TagRecord::new("not_file")),
            Self::NotFolder => Ok(TagRecord::new("not_folder")),
            Self::RestrictedContent => Ok(TagRecord::new("restricted_content")),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl serde::ser::Serialize for LookupError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for LookupError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// What a write conflicted with.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum WriteConflictError {
    /// There is a file at the target path.
    File,
    /// There is a folder at the target path.
    Folder,
    /// There is a file somewhere along the target's ancestor path.
    FileAncestor,
    /// A conflict this client does not recognize.
    Other,
}

impl Tagged for WriteConflictError {
    fn typename() -> &'static str {
        "WriteConflictError"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            "file_ancestor" => Ok(Self::FileAncestor),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::File => Ok(TagRecord::new("file")),
            Self::Folder => Ok(TagRecord::new("folder")),
            Self::FileAncestor => Ok(TagRecord::new("file_ancestor")),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl serde::ser::Serialize for WriteConflictError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for WriteConflictError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// Why content could not be written at a path.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum WriteError {
    /// The path is not syntactically valid. The service may include detail.
    MalformedPath(Option<String>),
    /// The write would overwrite existing content.
    Conflict(WriteConflictError),
    /// The user does not have permission to write at the target.
    NoWritePermission,
    /// The write would exceed the user's storage quota.
    InsufficientSpace,
    /// The service does not save content under this name.
    DisallowedName,
    /// A failure mode this client does not recognize.
    Other,
}

impl Tagged for WriteError {
    fn typename() -> &'static str {
        "WriteError"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "malformed_path" => record
                .optional_nested(Self::typename(), "malformed_path")
                .map(Self::MalformedPath),
            "conflict" => record
                .nested::<TagRecord>(Self::typename(), "conflict")?
                .decode::<WriteConflictError>()
                .map(Self::Conflict),
            "no_write_permission" => Ok(Self::NoWritePermission),
            "insufficient_space" => Ok(Self::InsufficientSpace),
            "disallowed_name" => Ok(Self::DisallowedName),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::MalformedPath(Some(v)) => {
                TagRecord::with_nested(Self::typename(), "malformed_path", v)
            }
            Self::MalformedPath(None) => Ok(TagRecord::new("malformed_path")),
            Self::Conflict(v) => TagRecord::with_nested(Self::typename(), "conflict", v),
            Self::NoWritePermission => Ok(TagRecord::new("no_write_permission")),
            Self::InsufficientSpace => Ok(TagRecord::new("insufficient_space")),
            Self::DisallowedName => Ok(TagRecord::new("disallowed_name")),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl serde::ser::Serialize for WriteError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for WriteError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// The request body for a delete.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct DeleteArg {
    /// Path in the user's Lockbox to delete.
    pub path: String,
}

impl DeleteArg {
    /// Sets the value of [path][DeleteArg::path].
    pub fn set_path<T: Into<String>>(mut self, v: T) -> Self {
        self.path = v.into();
        self
    }
}

/// The response body for a delete.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct DeleteResult {
    /// Metadata of the deleted object.
    pub metadata: Metadata,
}

impl DeleteResult {
    /// Sets the value of [metadata][DeleteResult::metadata].
    pub fn set_metadata<T: Into<Metadata>>(mut self, v: T) -> Self {
        self.metadata = v.into();
        self
    }
}

/// Why a delete failed.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum DeleteError {
    /// The path to delete could not be resolved.
    PathLookup(LookupError),
    /// The delete could not write at the path.
    PathWrite(WriteError),
    /// A failure mode this client does not recognize.
    Other,
}

impl Tagged for DeleteError {
    fn typename() -> &'static str {
        "DeleteError"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "path_lookup" => record
                .nested::<TagRecord>(Self::typename(), "path_lookup")?
                .decode::<LookupError>()
                .map(Self::PathLookup),
            "path_write" => record
                .nested::<TagRecord>(Self::typename(), "path_write")?
                .decode::<WriteError>()
                .map(Self::PathWrite),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::PathLookup(v) => TagRecord::with_nested(Self::typename(), "path_lookup", v),
            Self::PathWrite(v) => TagRecord::with_nested(Self::typename(), "path_write", v),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl serde::ser::Serialize for DeleteError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for DeleteError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// The request body for a delete batch.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct DeleteBatchArg {
    /// The files and folders to delete.
    pub entries: Vec<DeleteArg>,
}

impl DeleteBatchArg {
    /// Sets the value of [entries][DeleteBatchArg::entries].
    pub fn set_entries<T, I>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<DeleteArg>,
    {
        self.entries = v.into_iter().map(|v| v.into()).collect();
        self
    }
}

/// Why a delete batch failed as a whole.
///
/// Failures of individual entries are reported per entry in
/// [DeleteBatchResultEntry] instead.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum DeleteBatchError {
    /// There are too many concurrent write operations in the user's
    /// Lockbox. Retry the batch later.
    TooManyWriteOperations,
    /// A failure mode this client does not recognize.
    Other,
}

impl Tagged for DeleteBatchError {
    fn typename() -> &'static str {
        "DeleteBatchError"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "too_many_write_operations" => Ok(Self::TooManyWriteOperations),
            _ => Ok(Self::Other),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::TooManyWriteOperations => Ok(TagRecord::new("too_many_write_operations")),
            Self::Other => Ok(TagRecord::new("other")),
        }
    }
}

impl serde::ser::Serialize for DeleteBatchError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for DeleteBatchError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// The outcome of one entry in a delete batch.
///
/// This is a closed union. A client that can decode the batch result at
/// all knows both outcomes, so an unrecognized tag is a decode error.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum DeleteBatchResultEntry {
    /// The entry was deleted. Its metadata is included.
    Success(DeleteResult),
    /// The entry failed. The reason is included.
    Failure(DeleteError),
}

impl Tagged for DeleteBatchResultEntry {
    fn typename() -> &'static str {
        "DeleteBatchResultEntry"
    }

    fn from_record(record: &TagRecord) -> Result<Self, CodecError> {
        match record.require_tag(Self::typename())? {
            "success" => record
                .payload(Self::typename(), "success")
                .map(Self::Success),
            "failure" => record
                .nested::<TagRecord>(Self::typename(), "failure")?
                .decode::<DeleteError>()
                .map(Self::Failure),
            tag => Err(CodecError::unknown_tag(Self::typename(), tag)),
        }
    }

    fn to_record(&self) -> Result<TagRecord, CodecError> {
        match self {
            Self::Success(v) => TagRecord::with_payload(Self::typename(), "success", v),
            Self::Failure(v) => TagRecord::with_nested(Self::typename(), "failure", v),
        }
    }
}

impl serde::ser::Serialize for DeleteBatchResultEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        wire::tagged::serialize(self, serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for DeleteBatchResultEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        wire::tagged::deserialize(deserializer)
    }
}

/// The response body for a completed delete batch.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct DeleteBatchResult {
    /// One entry per input path, in the order of the request.
    pub entries: Vec<DeleteBatchResultEntry>,
}

impl DeleteBatchResult {
    /// Sets the value of [entries][DeleteBatchResult::entries].
    pub fn set_entries<T, I>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<DeleteBatchResultEntry>,
    {
        self.entries = v.into_iter().map(|v| v.into()).collect();
        self
    }
}

/// The response of `files/delete_batch`.
///
/// Small batches complete synchronously with the result flat beside the
/// tag. Larger batches return a job handle to poll through
/// `files/delete_batch/check`.
pub type DeleteBatchLaunch = jobs::model::LaunchResult<DeleteBatchResult>;

/// The response of `files/delete_batch/check`.
pub type DeleteBatchJobStatus = jobs::model::PollResult<DeleteBatchResult, DeleteBatchError>;
