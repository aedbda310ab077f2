use serde::{Deserialize, Serialize};

use super::common::BroadcasterRef;

/// `channel.chat.clear`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelChatClearEvent {
    /// Channel whose chat was cleared.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
}

/// `channel.chat.clear_user_messages`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelChatClearUserMessagesEvent {
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// User whose messages were cleared.
    pub target_user_id: String,
    /// Target login.
    pub target_user_login: String,
    /// Target display name.
    pub target_user_name: String,
}

/// `channel.chat.message_delete`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelChatMessageDeleteEvent {
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Author of the deleted message.
    pub target_user_id: String,
    /// Author login.
    pub target_user_login: String,
    /// Author display name.
    pub target_user_name: String,
    /// Deleted message id.
    pub message_id: String,
}

/// Whisper body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whisper {
    /// Message text.
    pub text: String,
}

/// `user.whisper.message`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserWhisperMessageEvent {
    /// Sender id.
    pub from_user_id: String,
    /// Sender login.
    pub from_user_login: String,
    /// Sender display name.
    pub from_user_name: String,
    /// Recipient id.
    pub to_user_id: String,
    /// Recipient login.
    pub to_user_login: String,
    /// Recipient display name.
    pub to_user_name: String,
    /// Whisper id.
    pub whisper_id: String,
    /// Body.
    pub whisper: Whisper,
}
