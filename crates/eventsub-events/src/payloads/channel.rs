//! Channel activity: updates, follows, subscriptions, bits, raids, ads, shoutouts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{BroadcasterRef, ModeratorRef, OptionalUserRef, UserRef};

/// `channel.update`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelUpdateEvent {
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Stream title.
    pub title: String,
    /// Broadcast language (ISO 639-1).
    pub language: String,
    /// Category id.
    pub category_id: String,
    /// Category name.
    pub category_name: String,
    /// Content classification label ids.
    #[serde(default)]
    pub content_classification_labels: Vec<String>,
}

/// `channel.follow`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelFollowEvent {
    /// Follower.
    #[serde(flatten)]
    pub user: UserRef,
    /// Channel followed.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// When the follow happened.
    pub followed_at: DateTime<Utc>,
}

/// Subscriber details shared by subscribe and subscription-end events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Subscriber.
    #[serde(flatten)]
    pub user: UserRef,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// `"1000"`, `"2000"`, or `"3000"`.
    pub tier: String,
    /// Whether the subscription was a gift.
    pub is_gift: bool,
}

/// `channel.subscribe`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelSubscribeEvent(pub Subscriber);

/// `channel.subscription.end`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelSubscriptionEndEvent(pub Subscriber);

/// `channel.subscription.gift`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSubscriptionGiftEvent {
    /// Gifter; all null when anonymous.
    #[serde(flatten)]
    pub user: OptionalUserRef,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Number of subscriptions in this gift.
    pub total: u64,
    /// Tier of the gifted subscriptions.
    pub tier: String,
    /// Lifetime gift count; null when anonymous or not shared.
    pub cumulative_total: Option<u64>,
    /// Whether the gift was anonymous.
    pub is_anonymous: bool,
}

/// An emote span inside a chat text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    /// Start index.
    pub begin: u32,
    /// End index (inclusive).
    pub end: u32,
    /// Emote id.
    pub id: String,
}

/// Text plus emote positions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionMessage {
    /// Message text.
    pub text: String,
    /// Emote spans.
    #[serde(default)]
    pub emotes: Vec<Emote>,
}

/// `channel.subscription.message`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSubscriptionMessageEvent {
    /// Resubscriber.
    #[serde(flatten)]
    pub user: UserRef,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Subscription tier.
    pub tier: String,
    /// Resubscription message.
    pub message: SubscriptionMessage,
    /// Total months subscribed.
    pub cumulative_months: u32,
    /// Consecutive months; null when the user chose not to share.
    pub streak_months: Option<u32>,
    /// Months in the current subscription term.
    pub duration_months: u32,
}

/// `channel.cheer`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelCheerEvent {
    /// Whether the cheer was anonymous.
    pub is_anonymous: bool,
    /// Cheerer; all null when anonymous.
    #[serde(flatten)]
    pub user: OptionalUserRef,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Message sent with the cheer.
    pub message: String,
    /// Bits cheered.
    pub bits: u64,
}

/// `channel.raid`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelRaidEvent {
    /// Raiding broadcaster id.
    pub from_broadcaster_user_id: String,
    /// Raiding broadcaster login.
    pub from_broadcaster_user_login: String,
    /// Raiding broadcaster display name.
    pub from_broadcaster_user_name: String,
    /// Raided broadcaster id.
    pub to_broadcaster_user_id: String,
    /// Raided broadcaster login.
    pub to_broadcaster_user_login: String,
    /// Raided broadcaster display name.
    pub to_broadcaster_user_name: String,
    /// Viewers in the raid.
    pub viewers: u64,
}

/// `channel.ad_break.begin`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelAdBreakBeginEvent {
    /// Length of the break.
    pub duration_seconds: u32,
    /// When the break started.
    pub started_at: DateTime<Utc>,
    /// Whether the break was scheduled automatically.
    pub is_automatic: bool,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Who started the break.
    pub requester_user_id: String,
    /// Requester login.
    pub requester_user_login: String,
    /// Requester display name.
    pub requester_user_name: String,
}

/// `channel.shoutout.create`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelShoutoutCreateEvent {
    /// Channel sending the shoutout.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Channel receiving it.
    pub to_broadcaster_user_id: String,
    /// Receiving channel login.
    pub to_broadcaster_user_login: String,
    /// Receiving channel display name.
    pub to_broadcaster_user_name: String,
    /// Who sent it.
    #[serde(flatten)]
    pub moderator: ModeratorRef,
    /// Viewers who saw it.
    pub viewer_count: u64,
    /// When it was sent.
    pub started_at: DateTime<Utc>,
    /// When the channel can send another shoutout.
    pub cooldown_ends_at: DateTime<Utc>,
    /// When the channel can shout out the same target again.
    pub target_cooldown_ends_at: DateTime<Utc>,
}

/// `channel.shoutout.receive`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelShoutoutReceiveEvent {
    /// Channel receiving the shoutout.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Channel that sent it.
    pub from_broadcaster_user_id: String,
    /// Sending channel login.
    pub from_broadcaster_user_login: String,
    /// Sending channel display name.
    pub from_broadcaster_user_name: String,
    /// Viewers who saw it.
    pub viewer_count: u64,
    /// When it was sent.
    pub started_at: DateTime<Utc>,
}
