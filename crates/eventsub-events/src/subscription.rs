//! The subscription-type taxonomy.
//!
//! One [`define_subscriptions!`] invocation produces [`SubscriptionType`],
//! [`Event`], [`ALL_SUBSCRIPTION_TYPES`], and the decode table. Kinds listed
//! under `raw` are recognized on the wire but only reach the raw-event hook.

use serde::{Deserialize, Serialize};

use crate::payloads::{
    ChannelAdBreakBeginEvent, ChannelBanEvent, ChannelCharityCampaignDonateEvent,
    ChannelChatClearEvent, ChannelChatClearUserMessagesEvent, ChannelChatMessageDeleteEvent,
    ChannelCheerEvent, ChannelFollowEvent, ChannelGoalBeginEvent, ChannelGoalEndEvent,
    ChannelGoalProgressEvent, ChannelHypeTrainBeginEvent, ChannelHypeTrainEndEvent,
    ChannelHypeTrainProgressEvent, ChannelModeratorAddEvent, ChannelModeratorRemoveEvent,
    ChannelPointsCustomRewardAddEvent, ChannelPointsCustomRewardRedemptionAddEvent,
    ChannelPointsCustomRewardRedemptionUpdateEvent, ChannelPointsCustomRewardRemoveEvent,
    ChannelPointsCustomRewardUpdateEvent, ChannelPollBeginEvent, ChannelPollEndEvent,
    ChannelPollProgressEvent, ChannelPredictionBeginEvent, ChannelPredictionEndEvent,
    ChannelPredictionLockEvent, ChannelPredictionProgressEvent, ChannelRaidEvent,
    ChannelShieldModeBeginEvent, ChannelShieldModeEndEvent, ChannelShoutoutCreateEvent,
    ChannelShoutoutReceiveEvent, ChannelSubscribeEvent, ChannelSubscriptionEndEvent,
    ChannelSubscriptionGiftEvent, ChannelSubscriptionMessageEvent, ChannelUnbanEvent,
    ChannelUpdateEvent, ChannelVipAddEvent, ChannelVipRemoveEvent, DropEntitlementGrantEvent,
    ExtensionBitsTransactionCreateEvent, StreamOfflineEvent, StreamOnlineEvent,
    UserAuthorizationGrantEvent, UserAuthorizationRevokeEvent, UserUpdateEvent,
    UserWhisperMessageEvent,
};

/// A payload type bound to exactly one [`SubscriptionType`].
///
/// Implemented by the taxonomy macro for every typed payload, which is what
/// lets `HandlerRegistry::on::<E>` infer the kind from the closure argument.
pub trait TypedEvent: Sized + Send + 'static {
    /// The kind whose events decode into `Self`.
    const KIND: SubscriptionType;

    /// Unwrap the payload if `event` is of kind [`Self::KIND`].
    fn from_event(event: Event) -> Option<Self>;

    /// Wrap the payload in its [`Event`] variant.
    fn into_event(self) -> Event;
}

define_subscriptions! {
    typed {
        // ── Channel ──
        /// Broadcaster changed title, category, or language.
        ChannelUpdate => "channel.update" => ChannelUpdateEvent,
        /// A user followed the channel.
        ChannelFollow => "channel.follow" => ChannelFollowEvent,
        /// A user subscribed.
        ChannelSubscribe => "channel.subscribe" => ChannelSubscribeEvent,
        /// A subscription ended.
        ChannelSubscriptionEnd => "channel.subscription.end" => ChannelSubscriptionEndEvent,
        /// A user gifted subscriptions.
        ChannelSubscriptionGift => "channel.subscription.gift" => ChannelSubscriptionGiftEvent,
        /// A user shared a resubscription message.
        ChannelSubscriptionMessage => "channel.subscription.message" => ChannelSubscriptionMessageEvent,
        /// A user cheered bits.
        ChannelCheer => "channel.cheer" => ChannelCheerEvent,
        /// The broadcaster raided, or was raided by, another channel.
        ChannelRaid => "channel.raid" => ChannelRaidEvent,
        /// An ad break started.
        ChannelAdBreakBegin => "channel.ad_break.begin" => ChannelAdBreakBeginEvent,
        /// The channel sent a shoutout.
        ChannelShoutoutCreate => "channel.shoutout.create" => ChannelShoutoutCreateEvent,
        /// The channel received a shoutout.
        ChannelShoutoutReceive => "channel.shoutout.receive" => ChannelShoutoutReceiveEvent,

        // ── Moderation ──
        /// A user was banned or timed out.
        ChannelBan => "channel.ban" => ChannelBanEvent,
        /// A user was unbanned.
        ChannelUnban => "channel.unban" => ChannelUnbanEvent,
        /// A moderator was added.
        ChannelModeratorAdd => "channel.moderator.add" => ChannelModeratorAddEvent,
        /// A moderator was removed.
        ChannelModeratorRemove => "channel.moderator.remove" => ChannelModeratorRemoveEvent,
        /// A VIP was added.
        ChannelVipAdd => "channel.vip.add" => ChannelVipAddEvent,
        /// A VIP was removed.
        ChannelVipRemove => "channel.vip.remove" => ChannelVipRemoveEvent,
        /// Shield mode was activated.
        ChannelShieldModeBegin => "channel.shield_mode.begin" => ChannelShieldModeBeginEvent,
        /// Shield mode was deactivated.
        ChannelShieldModeEnd => "channel.shield_mode.end" => ChannelShieldModeEndEvent,

        // ── Chat ──
        /// All chat messages were cleared.
        ChannelChatClear => "channel.chat.clear" => ChannelChatClearEvent,
        /// One user's chat messages were cleared.
        ChannelChatClearUserMessages => "channel.chat.clear_user_messages" => ChannelChatClearUserMessagesEvent,
        /// A single chat message was deleted.
        ChannelChatMessageDelete => "channel.chat.message_delete" => ChannelChatMessageDeleteEvent,
        /// The user received a whisper.
        UserWhisperMessage => "user.whisper.message" => UserWhisperMessageEvent,

        // ── Channel points ──
        /// A custom reward was created.
        ChannelPointsCustomRewardAdd => "channel.channel_points_custom_reward.add" => ChannelPointsCustomRewardAddEvent,
        /// A custom reward was updated.
        ChannelPointsCustomRewardUpdate => "channel.channel_points_custom_reward.update" => ChannelPointsCustomRewardUpdateEvent,
        /// A custom reward was removed.
        ChannelPointsCustomRewardRemove => "channel.channel_points_custom_reward.remove" => ChannelPointsCustomRewardRemoveEvent,
        /// A viewer redeemed a custom reward.
        ChannelPointsCustomRewardRedemptionAdd => "channel.channel_points_custom_reward_redemption.add" => ChannelPointsCustomRewardRedemptionAddEvent,
        /// A redemption was fulfilled or canceled.
        ChannelPointsCustomRewardRedemptionUpdate => "channel.channel_points_custom_reward_redemption.update" => ChannelPointsCustomRewardRedemptionUpdateEvent,

        // ── Polls and predictions ──
        /// A poll started.
        ChannelPollBegin => "channel.poll.begin" => ChannelPollBeginEvent,
        /// Votes were cast on a poll.
        ChannelPollProgress => "channel.poll.progress" => ChannelPollProgressEvent,
        /// A poll ended.
        ChannelPollEnd => "channel.poll.end" => ChannelPollEndEvent,
        /// A prediction started.
        ChannelPredictionBegin => "channel.prediction.begin" => ChannelPredictionBeginEvent,
        /// Users participated in a prediction.
        ChannelPredictionProgress => "channel.prediction.progress" => ChannelPredictionProgressEvent,
        /// A prediction was locked.
        ChannelPredictionLock => "channel.prediction.lock" => ChannelPredictionLockEvent,
        /// A prediction ended.
        ChannelPredictionEnd => "channel.prediction.end" => ChannelPredictionEndEvent,

        // ── Goals, hype trains, charity ──
        /// A creator goal started.
        ChannelGoalBegin => "channel.goal.begin" => ChannelGoalBeginEvent,
        /// A creator goal progressed.
        ChannelGoalProgress => "channel.goal.progress" => ChannelGoalProgressEvent,
        /// A creator goal ended.
        ChannelGoalEnd => "channel.goal.end" => ChannelGoalEndEvent,
        /// A hype train started.
        ChannelHypeTrainBegin => "channel.hype_train.begin" => ChannelHypeTrainBeginEvent,
        /// A hype train progressed.
        ChannelHypeTrainProgress => "channel.hype_train.progress" => ChannelHypeTrainProgressEvent,
        /// A hype train ended.
        ChannelHypeTrainEnd => "channel.hype_train.end" => ChannelHypeTrainEndEvent,
        /// A user donated to the active charity campaign.
        ChannelCharityCampaignDonate => "channel.charity_campaign.donate" => ChannelCharityCampaignDonateEvent,

        // ── Stream, user, drops, extensions ──
        /// The stream went live.
        StreamOnline => "stream.online" => StreamOnlineEvent,
        /// The stream went offline.
        StreamOffline => "stream.offline" => StreamOfflineEvent,
        /// A user authorized the client.
        UserAuthorizationGrant => "user.authorization.grant" => UserAuthorizationGrantEvent,
        /// A user revoked the client's authorization.
        UserAuthorizationRevoke => "user.authorization.revoke" => UserAuthorizationRevokeEvent,
        /// A user updated their account.
        UserUpdate => "user.update" => UserUpdateEvent,
        /// Drop entitlements were granted (batched).
        DropEntitlementGrant => "drop.entitlement.grant" => DropEntitlementGrantEvent,
        /// An extension bits transaction completed.
        ExtensionBitsTransactionCreate => "extension.bits_transaction.create" => ExtensionBitsTransactionCreateEvent,
    }
    raw {
        AutomodMessageHold => "automod.message.hold",
        AutomodMessageUpdate => "automod.message.update",
        AutomodSettingsUpdate => "automod.settings.update",
        AutomodTermsUpdate => "automod.terms.update",
        ChannelChatMessage => "channel.chat.message",
        ChannelChatNotification => "channel.chat.notification",
        ChannelChatSettingsUpdate => "channel.chat_settings.update",
        ChannelChatUserMessageHold => "channel.chat.user_message_hold",
        ChannelChatUserMessageUpdate => "channel.chat.user_message_update",
        ChannelUnbanRequestCreate => "channel.unban_request.create",
        ChannelUnbanRequestResolve => "channel.unban_request.resolve",
        ChannelModerate => "channel.moderate",
        ChannelGuestStarSessionBegin => "channel.guest_star_session.begin",
        ChannelGuestStarSessionEnd => "channel.guest_star_session.end",
        ChannelGuestStarGuestUpdate => "channel.guest_star_guest.update",
        ChannelGuestStarSettingsUpdate => "channel.guest_star_settings.update",
        ChannelPointsAutomaticRewardRedemptionAdd => "channel.channel_points_automatic_reward_redemption.add",
        ChannelSuspiciousUserMessage => "channel.suspicious_user.message",
        ChannelSuspiciousUserUpdate => "channel.suspicious_user.update",
        ChannelWarningAcknowledge => "channel.warning.acknowledge",
        ChannelWarningSend => "channel.warning.send",
        /// Charity campaign lifecycle (donations are typed).
        ChannelCharityCampaignStart => "channel.charity_campaign.start",
        ChannelCharityCampaignProgress => "channel.charity_campaign.progress",
        ChannelCharityCampaignStop => "channel.charity_campaign.stop",
        ConduitShardDisabled => "conduit.shard.disabled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn taxonomy_size() {
        assert_eq!(ALL_SUBSCRIPTION_TYPES.len(), 74);
        let typed = ALL_SUBSCRIPTION_TYPES
            .iter()
            .filter(|t| t.has_typed_payload())
            .count();
        assert_eq!(typed, 49);
    }

    #[test]
    fn wire_strings_are_unique_and_parse_back() {
        let mut seen = HashSet::new();
        for t in ALL_SUBSCRIPTION_TYPES {
            assert!(seen.insert(t.as_str()), "duplicate wire string {t}");
            assert_eq!(t.as_str().parse::<SubscriptionType>().unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn unknown_wire_string_is_rejected() {
        let err = "channel.teleport".parse::<SubscriptionType>().unwrap_err();
        assert!(err.contains("channel.teleport"));
    }

    #[test]
    fn domain_prefix() {
        assert_eq!(SubscriptionType::ChannelFollow.domain(), "channel");
        assert_eq!(SubscriptionType::StreamOnline.domain(), "stream");
        assert_eq!(SubscriptionType::ConduitShardDisabled.domain(), "conduit");
        assert_eq!(SubscriptionType::DropEntitlementGrant.domain(), "drop");
    }

    #[test]
    fn raw_kinds_skip_decode() {
        let decoded = SubscriptionType::ChannelChatMessage
            .decode_event("not even json")
            .unwrap();
        assert!(decoded.is_none());
        assert!(Event::default_for(SubscriptionType::ChannelChatMessage).is_none());
    }

    #[test]
    fn typed_kind_decode_failure_is_an_error() {
        assert!(SubscriptionType::ChannelFollow.decode_event("[1,2").is_err());
    }

    #[test]
    fn every_typed_kind_round_trips_through_json() {
        for kind in ALL_SUBSCRIPTION_TYPES.into_iter().filter(|k| k.has_typed_payload()) {
            let event = Event::default_for(kind).unwrap();
            assert_eq!(event.subscription_type(), kind);
            let json = event.to_json().unwrap();
            let back = kind.decode_event(&json).unwrap().unwrap();
            assert_eq!(back, event, "round trip failed for {kind}");
        }
    }

    #[test]
    fn typed_event_kind_and_unwrap() {
        assert_eq!(ChannelFollowEvent::KIND, SubscriptionType::ChannelFollow);
        let event = ChannelFollowEvent::default().into_event();
        assert_eq!(event.subscription_type(), SubscriptionType::ChannelFollow);
        assert!(ChannelFollowEvent::from_event(event.clone()).is_some());
        assert!(ChannelCheerEvent::from_event(event).is_none());
    }
}
