//! Core identifier types for the Auric ledger
//!
//! Every participant and asset is addressed by a 256-bit identifier derived
//! from a BLAKE3 hash, so module addresses, depositors, and skill tokens all
//! share one wire representation.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $short:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            /// 256-bit BLAKE3-derived identifier
            id: [u8; 32],
        }

        impl $name {
            /// Create from raw bytes
            pub fn new(id: [u8; 32]) -> Self {
                Self { id }
            }

            /// Derive from arbitrary content using BLAKE3
            pub fn from_content(content: &[u8]) -> Self {
                let hash = blake3::hash(content);
                Self { id: *hash.as_bytes() }
            }

            /// Get the raw bytes
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.id
            }

            /// Convert to hex string
            pub fn to_hex(&self) -> String {
                hex::encode(self.id)
            }

            /// Parse from hex string
            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let bytes = hex::decode(s)?;
                if bytes.len() != 32 {
                    return Err(hex::FromHexError::InvalidStringLength);
                }
                let mut id = [0u8; 32];
                id.copy_from_slice(&bytes);
                Ok(Self { id })
            }

            /// Zero/null identifier
            pub const ZERO: Self = Self { id: [0u8; 32] };
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "({})"), &self.to_hex()[..$short])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", &self.to_hex()[..$short])
            }
        }
    };
}

id_type!(
    /// UserId - identifies a depositor across all modules
    UserId,
    "UserId",
    12
);

id_type!(
    /// SkillId - identifies one owned skill token instance
    SkillId,
    "SkillId",
    12
);

id_type!(
    /// QuestId - identifies a quest definition
    QuestId,
    "QuestId",
    12
);

id_type!(
    /// AchievementId - identifies an achievement definition
    AchievementId,
    "AchievementId",
    12
);

id_type!(
    /// ModuleId - address of a cooperating module, checked against the
    /// authorization table on every cross-module call
    ModuleId,
    "ModuleId",
    12
);
