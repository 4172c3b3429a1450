//! Bucket quota model.

use serde::{Deserialize, Serialize};

/// Sentinel used by plans and the management API for "no threshold".
pub const QUOTA_UNSET: i64 = -1;

/// A `(limit, warning)` threshold pair attached to a bucket, in GB.
///
/// Either side may be [`QUOTA_UNSET`], but never both: a pair with both
/// sides unset means the bucket has no quota at all and is represented as
/// `None` wherever an `Option<BucketQuota>` appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketQuota {
    /// Hard limit.
    pub limit: i64,
    /// Soft limit that triggers a notification.
    pub warning: i64,
}

impl BucketQuota {
    /// Build a quota from raw sentinel-encoded values.
    ///
    /// Returns `None` when both values are [`QUOTA_UNSET`].
    pub fn from_raw(limit: i64, warning: i64) -> Option<Self> {
        if limit == QUOTA_UNSET && warning == QUOTA_UNSET {
            None
        } else {
            Some(Self { limit, warning })
        }
    }

    /// Validate that both values are either unset or non-negative.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [("limit", self.limit), ("warning", self.warning)] {
            if value < QUOTA_UNSET {
                return Err(format!(
                    "quota {field} must be -1 (unset) or non-negative, got {value}"
                ));
            }
        }
        Ok(())
    }
}
