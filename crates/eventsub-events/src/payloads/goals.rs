//! Creator goals, hype trains, and charity donations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{BroadcasterRef, UserRef};

/// Shared goal fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// `follower`, `subscription`, `new_subscription`, ...
    #[serde(rename = "type")]
    pub goal_type: String,
    /// Description shown to viewers.
    pub description: String,
    /// Current progress.
    pub current_amount: i64,
    /// Target.
    pub target_amount: i64,
    /// Start time.
    pub started_at: DateTime<Utc>,
}

/// `channel.goal.begin`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelGoalBeginEvent(pub Goal);

/// `channel.goal.progress`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelGoalProgressEvent(pub Goal);

/// `channel.goal.end`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelGoalEndEvent {
    /// Final goal state.
    #[serde(flatten)]
    pub goal: Goal,
    /// Whether the target was reached.
    pub is_achieved: bool,
    /// End time.
    pub ended_at: DateTime<Utc>,
}

/// A contribution to a hype train.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HypeTrainContribution {
    /// Contributor.
    #[serde(flatten)]
    pub user: UserRef,
    /// `bits`, `subscription`, or `other`.
    #[serde(rename = "type")]
    pub contribution_type: String,
    /// Amount contributed.
    pub total: u64,
}

/// Shared hype train fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HypeTrain {
    /// Hype train id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Current level.
    pub level: u32,
    /// Total points.
    pub total: u64,
    /// Top contributors.
    #[serde(default)]
    pub top_contributions: Vec<HypeTrainContribution>,
    /// Start time.
    pub started_at: DateTime<Utc>,
}

/// A running hype train.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HypeTrainProgress {
    /// Shared fields.
    #[serde(flatten)]
    pub train: HypeTrain,
    /// Points toward the next level.
    pub progress: u64,
    /// Points required for the next level.
    pub goal: u64,
    /// Most recent contribution.
    pub last_contribution: HypeTrainContribution,
    /// When the train expires without new contributions.
    pub expires_at: DateTime<Utc>,
}

/// `channel.hype_train.begin`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelHypeTrainBeginEvent(pub HypeTrainProgress);

/// `channel.hype_train.progress`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelHypeTrainProgressEvent(pub HypeTrainProgress);

/// `channel.hype_train.end`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelHypeTrainEndEvent {
    /// Final train state.
    #[serde(flatten)]
    pub train: HypeTrain,
    /// End time.
    pub ended_at: DateTime<Utc>,
    /// When a new train can start.
    pub cooldown_ends_at: DateTime<Utc>,
}

/// A monetary amount in minor units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharityAmount {
    /// Amount in the currency's minor unit.
    pub value: i64,
    /// Decimal places implied by `value`.
    pub decimal_places: u32,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// `channel.charity_campaign.donate`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelCharityCampaignDonateEvent {
    /// Donation id.
    pub id: String,
    /// Campaign id.
    pub campaign_id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Donor.
    #[serde(flatten)]
    pub user: UserRef,
    /// Charity name.
    pub charity_name: String,
    /// Charity description.
    pub charity_description: String,
    /// Charity logo URL.
    pub charity_logo: String,
    /// Charity website.
    pub charity_website: String,
    /// Amount donated.
    pub amount: CharityAmount,
}
