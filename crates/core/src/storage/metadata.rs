//! Metadata carried from the source object to the converted object.

use serde::{Deserialize, Serialize};

use super::traits::UserMetadata;

/// Metadata key holding the name the file was uploaded with.
pub const ORIGINAL_NAME_KEY: &str = "Original_Name";
/// Metadata key holding the caller's external id.
pub const EXTERNAL_ID_KEY: &str = "External_Id";
/// Metadata key holding the activity id.
pub const ACTIVITY_ID_KEY: &str = "Activity_Id";

/// The three caller-supplied values forwarded verbatim to the output object.
///
/// An absent value stays absent: it is never replaced by an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
}

impl ObjectMetadata {
    /// Extracts the carried fields from a backend metadata map.
    ///
    /// An exact key match wins; otherwise lookup ignores case, since S3 hands
    /// user metadata back lowercased. Among several case variants with no
    /// exact match, the lexicographically smallest key is used.
    pub fn from_user_metadata(metadata: &UserMetadata) -> Self {
        let lookup = |name: &str| {
            metadata.get(name).cloned().or_else(|| {
                metadata
                    .iter()
                    .filter(|(key, _)| key.eq_ignore_ascii_case(name))
                    .min_by(|(a, _), (b, _)| a.cmp(b))
                    .map(|(_, value)| value.clone())
            })
        };

        Self {
            original_name: lookup(ORIGINAL_NAME_KEY),
            external_id: lookup(EXTERNAL_ID_KEY),
            activity_id: lookup(ACTIVITY_ID_KEY),
        }
    }

    /// Builds the metadata map attached on upload. Absent fields are omitted.
    pub fn to_user_metadata(&self) -> UserMetadata {
        [
            (ORIGINAL_NAME_KEY, &self.original_name),
            (EXTERNAL_ID_KEY, &self.external_id),
            (ACTIVITY_ID_KEY, &self.activity_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }
}
