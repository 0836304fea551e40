//! Authorization flags for permission-gated handlers.
//!
//! A handler may declare a set of required permissions; the dispatcher
//! invokes it only if the invoking member holds every required flag.
//! "No permissions declared" is modelled as `Option::None`, never as an
//! empty or sentinel set.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// A set of member authorization flags.
    ///
    /// Bit positions follow the platform's permission integer, so a member
    /// permission value received on an interaction can be decoded directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        /// Create invites to the guild.
        const CREATE_INVITES = 1 << 0;
        /// Remove members from the guild.
        const KICK_MEMBERS = 1 << 1;
        /// Ban members from the guild.
        const BAN_MEMBERS = 1 << 2;
        /// Full access; implies every other flag on the platform side.
        const ADMINISTRATOR = 1 << 3;
        /// Create, edit and delete channels.
        const MANAGE_CHANNELS = 1 << 4;
        /// Edit guild-level settings.
        const MANAGE_GUILD = 1 << 5;
        /// Delete and pin other members' messages.
        const MANAGE_MESSAGES = 1 << 13;
        /// Mute members in voice channels.
        const MUTE_MEMBERS = 1 << 22;
        /// Move members between voice channels.
        const MOVE_MEMBERS = 1 << 24;
        /// Edit roles below the bot's own.
        const MANAGE_ROLES = 1 << 28;
        /// Time members out.
        const MODERATE_MEMBERS = 1 << 40;
    }
}

impl Permissions {
    /// Subset test: does `self` satisfy `required`?
    ///
    /// True iff every flag in `required` is present in `self`.
    pub fn satisfies(self, required: Permissions) -> bool {
        self.contains(required)
    }
}

// The wire carries the raw permission integer. Unknown bits (flags added by
// the platform after this build) are dropped on decode rather than rejected.
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(Permissions::from_bits_truncate(bits))
    }
}
