//! Data-only event payload structs, one per typed subscription kind.
//!
//! Field names follow the wire (`snake_case`). Kinds that share a shape use
//! transparent newtypes so each kind still has its own payload type.

pub mod channel;
pub mod chat;
pub mod common;
pub mod goals;
pub mod moderation;
pub mod points;
pub mod polls;
pub mod stream;

pub use channel::{
    ChannelAdBreakBeginEvent, ChannelCheerEvent, ChannelFollowEvent, ChannelRaidEvent,
    ChannelShoutoutCreateEvent, ChannelShoutoutReceiveEvent, ChannelSubscribeEvent,
    ChannelSubscriptionEndEvent, ChannelSubscriptionGiftEvent, ChannelSubscriptionMessageEvent,
    ChannelUpdateEvent, Emote, Subscriber, SubscriptionMessage,
};
pub use chat::{
    ChannelChatClearEvent, ChannelChatClearUserMessagesEvent, ChannelChatMessageDeleteEvent,
    UserWhisperMessageEvent, Whisper,
};
pub use common::{BroadcasterRef, ModeratorRef, OptionalUserRef, UserRef};
pub use goals::{
    ChannelCharityCampaignDonateEvent, ChannelGoalBeginEvent, ChannelGoalEndEvent,
    ChannelGoalProgressEvent, ChannelHypeTrainBeginEvent, ChannelHypeTrainEndEvent,
    ChannelHypeTrainProgressEvent, CharityAmount, Goal, HypeTrain, HypeTrainContribution,
    HypeTrainProgress,
};
pub use moderation::{
    ChannelBanEvent, ChannelModeratorAddEvent, ChannelModeratorRemoveEvent,
    ChannelShieldModeBeginEvent, ChannelShieldModeEndEvent, ChannelUnbanEvent, ChannelVipAddEvent,
    ChannelVipRemoveEvent, RoleChange,
};
pub use points::{
    ChannelPointsCustomRewardAddEvent, ChannelPointsCustomRewardRedemptionAddEvent,
    ChannelPointsCustomRewardRedemptionUpdateEvent, ChannelPointsCustomRewardRemoveEvent,
    ChannelPointsCustomRewardUpdateEvent, CustomReward, GlobalCooldown, RedeemedReward,
    Redemption, RewardImage, RewardLimit,
};
pub use polls::{
    ChannelPollBeginEvent, ChannelPollEndEvent, ChannelPollProgressEvent,
    ChannelPredictionBeginEvent, ChannelPredictionEndEvent, ChannelPredictionLockEvent,
    ChannelPredictionProgressEvent, Poll, PollChoice, Prediction, PredictionOutcome,
    TopPredictor, VotingSettings,
};
pub use stream::{
    DropEntitlement, DropEntitlementData, DropEntitlementGrantEvent,
    ExtensionBitsTransactionCreateEvent, ExtensionProduct, StreamOfflineEvent, StreamOnlineEvent,
    UserAuthorizationGrantEvent, UserAuthorizationRevokeEvent, UserUpdateEvent,
};
