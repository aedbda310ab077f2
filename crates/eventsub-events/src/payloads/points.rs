//! Channel points custom rewards and redemptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{BroadcasterRef, UserRef};

/// A limit that may be switched off.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLimit {
    /// Whether the limit applies.
    pub is_enabled: bool,
    /// The limit.
    pub value: u64,
}

/// Cooldown between redemptions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCooldown {
    /// Whether the cooldown applies.
    pub is_enabled: bool,
    /// Cooldown length.
    pub seconds: u64,
}

/// Reward image URLs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardImage {
    /// 28x28 image.
    pub url_1x: String,
    /// 56x56 image.
    pub url_2x: String,
    /// 112x112 image.
    pub url_4x: String,
}

/// A custom channel points reward.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomReward {
    /// Reward id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Whether the reward is enabled.
    pub is_enabled: bool,
    /// Whether the reward is paused.
    pub is_paused: bool,
    /// Whether the reward is in stock.
    pub is_in_stock: bool,
    /// Title.
    pub title: String,
    /// Cost in channel points.
    pub cost: u64,
    /// Prompt shown to viewers.
    pub prompt: String,
    /// Whether viewers must enter text.
    pub is_user_input_required: bool,
    /// Whether redemptions are fulfilled immediately.
    pub should_redemptions_skip_request_queue: bool,
    /// End of the current cooldown, if any.
    pub cooldown_expires_at: Option<DateTime<Utc>>,
    /// Redemptions this stream, if tracked.
    pub redemptions_redeemed_current_stream: Option<u64>,
    /// Per-stream cap.
    pub max_per_stream: RewardLimit,
    /// Per-user-per-stream cap.
    pub max_per_user_per_stream: RewardLimit,
    /// Cooldown.
    pub global_cooldown: GlobalCooldown,
    /// Background color (hex).
    pub background_color: String,
    /// Custom image, if uploaded.
    pub image: Option<RewardImage>,
    /// Default image.
    pub default_image: RewardImage,
}

/// `channel.channel_points_custom_reward.add`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPointsCustomRewardAddEvent(pub CustomReward);

/// `channel.channel_points_custom_reward.update`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPointsCustomRewardUpdateEvent(pub CustomReward);

/// `channel.channel_points_custom_reward.remove`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPointsCustomRewardRemoveEvent(pub CustomReward);

/// Reward summary attached to a redemption.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemedReward {
    /// Reward id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Cost in channel points.
    pub cost: u64,
    /// Prompt.
    pub prompt: String,
}

/// A viewer's redemption of a custom reward.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    /// Redemption id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Redeeming viewer.
    #[serde(flatten)]
    pub user: UserRef,
    /// Text the viewer entered, if required.
    pub user_input: String,
    /// `unfulfilled`, `fulfilled`, `canceled`, or `unknown`.
    pub status: String,
    /// Redeemed reward.
    pub reward: RedeemedReward,
    /// Redemption time.
    pub redeemed_at: DateTime<Utc>,
}

/// `channel.channel_points_custom_reward_redemption.add`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPointsCustomRewardRedemptionAddEvent(pub Redemption);

/// `channel.channel_points_custom_reward_redemption.update`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPointsCustomRewardRedemptionUpdateEvent(pub Redemption);
