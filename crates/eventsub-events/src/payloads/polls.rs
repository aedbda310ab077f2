//! Polls and predictions.
//!
//! Begin and progress events share one shape; end (and prediction lock)
//! events extend it with outcome fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{BroadcasterRef, UserRef};

// ── Polls ───────────────────────────────────────────────────────────

/// One poll choice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollChoice {
    /// Choice id.
    pub id: String,
    /// Choice title.
    pub title: String,
    /// Votes bought with channel points.
    #[serde(default)]
    pub channel_points_votes: u64,
    /// Total votes.
    #[serde(default)]
    pub votes: u64,
}

/// Paid voting settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSettings {
    /// Whether paid voting is enabled.
    pub is_enabled: bool,
    /// Cost per extra vote.
    pub amount_per_vote: u64,
}

/// Shared poll fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    /// Poll id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Question.
    pub title: String,
    /// Choices.
    pub choices: Vec<PollChoice>,
    /// Bits voting (always disabled on current servers).
    #[serde(default)]
    pub bits_voting: VotingSettings,
    /// Channel points voting.
    pub channel_points_voting: VotingSettings,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Scheduled end; absent on end events.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

/// `channel.poll.begin`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPollBeginEvent(pub Poll);

/// `channel.poll.progress`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPollProgressEvent(pub Poll);

/// `channel.poll.end`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPollEndEvent {
    /// Poll state at the end.
    #[serde(flatten)]
    pub poll: Poll,
    /// `completed`, `archived`, or `terminated`.
    pub status: String,
    /// Actual end time.
    pub ended_at: DateTime<Utc>,
}

// ── Predictions ─────────────────────────────────────────────────────

/// A top predictor on one outcome.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPredictor {
    /// Predictor.
    #[serde(flatten)]
    pub user: UserRef,
    /// Points won; null until the prediction resolves.
    pub channel_points_won: Option<u64>,
    /// Points wagered.
    pub channel_points_used: u64,
}

/// One prediction outcome.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Outcome id.
    pub id: String,
    /// Outcome title.
    pub title: String,
    /// `pink` or `blue`.
    pub color: String,
    /// Participating users.
    #[serde(default)]
    pub users: u64,
    /// Points wagered on this outcome.
    #[serde(default)]
    pub channel_points: u64,
    /// Up to ten biggest predictors.
    #[serde(default)]
    pub top_predictors: Vec<TopPredictor>,
}

/// Shared prediction fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Prediction id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Title.
    pub title: String,
    /// Outcomes.
    pub outcomes: Vec<PredictionOutcome>,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// When betting closes; absent once locked.
    #[serde(default)]
    pub locks_at: Option<DateTime<Utc>>,
}

/// `channel.prediction.begin`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPredictionBeginEvent(pub Prediction);

/// `channel.prediction.progress`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPredictionProgressEvent(pub Prediction);

/// `channel.prediction.lock`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPredictionLockEvent {
    /// Prediction state when locked.
    #[serde(flatten)]
    pub prediction: Prediction,
    /// Lock time.
    pub locked_at: DateTime<Utc>,
}

/// `channel.prediction.end`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPredictionEndEvent {
    /// Final prediction state.
    #[serde(flatten)]
    pub prediction: Prediction,
    /// Winning outcome; null when canceled.
    pub winning_outcome_id: Option<String>,
    /// `resolved` or `canceled`.
    pub status: String,
    /// End time.
    pub ended_at: DateTime<Utc>,
}
