//! Bans, role changes, and shield mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{BroadcasterRef, ModeratorRef, UserRef};

/// `channel.ban`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelBanEvent {
    /// Banned user.
    #[serde(flatten)]
    pub user: UserRef,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Who issued the ban.
    #[serde(flatten)]
    pub moderator: ModeratorRef,
    /// Ban reason.
    pub reason: String,
    /// When the ban was issued.
    pub banned_at: DateTime<Utc>,
    /// End of a timeout; null for permanent bans.
    pub ends_at: Option<DateTime<Utc>>,
    /// Whether the ban is permanent.
    pub is_permanent: bool,
}

/// `channel.unban`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelUnbanEvent {
    /// Unbanned user.
    #[serde(flatten)]
    pub user: UserRef,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Who lifted the ban.
    #[serde(flatten)]
    pub moderator: ModeratorRef,
}

/// A user gaining or losing a channel role.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleChange {
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// User whose role changed.
    #[serde(flatten)]
    pub user: UserRef,
}

/// `channel.moderator.add`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelModeratorAddEvent(pub RoleChange);

/// `channel.moderator.remove`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelModeratorRemoveEvent(pub RoleChange);

/// `channel.vip.add`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelVipAddEvent(pub RoleChange);

/// `channel.vip.remove`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelVipRemoveEvent(pub RoleChange);

/// `channel.shield_mode.begin`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelShieldModeBeginEvent {
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Who activated shield mode.
    #[serde(flatten)]
    pub moderator: ModeratorRef,
    /// Activation time.
    pub started_at: DateTime<Utc>,
}

/// `channel.shield_mode.end`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelShieldModeEndEvent {
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Who deactivated shield mode.
    #[serde(flatten)]
    pub moderator: ModeratorRef,
    /// Deactivation time.
    pub ended_at: DateTime<Utc>,
}
