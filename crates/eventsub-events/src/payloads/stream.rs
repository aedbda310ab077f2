//! Stream state, user account, drops, and extension events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{BroadcasterRef, UserRef};

/// `stream.online`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamOnlineEvent {
    /// Stream id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// `live`, `playlist`, `watch_party`, `premiere`, or `rerun`.
    #[serde(rename = "type")]
    pub stream_type: String,
    /// Start time.
    pub started_at: DateTime<Utc>,
}

/// `stream.offline`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamOfflineEvent {
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
}

/// `user.authorization.grant`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAuthorizationGrantEvent {
    /// Client that was authorized.
    pub client_id: String,
    /// Authorizing user.
    #[serde(flatten)]
    pub user: UserRef,
}

/// `user.authorization.revoke`
///
/// Login and name are null when the user account was deleted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAuthorizationRevokeEvent {
    /// Client whose access was revoked.
    pub client_id: String,
    /// Revoking user.
    pub user_id: String,
    /// Login, if the account still exists.
    pub user_login: Option<String>,
    /// Display name, if the account still exists.
    pub user_name: Option<String>,
}

/// `user.update`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdateEvent {
    /// Updated user.
    #[serde(flatten)]
    pub user: UserRef,
    /// Email, only with the `user:read:email` scope.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the email is verified.
    pub email_verified: bool,
    /// Profile description.
    pub description: String,
}

/// Entitlement details.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DropEntitlementData {
    /// Organization owning the campaign.
    pub organization_id: String,
    /// Category id.
    pub category_id: String,
    /// Category name.
    pub category_name: String,
    /// Campaign id.
    pub campaign_id: String,
    /// Entitled user.
    #[serde(flatten)]
    pub user: UserRef,
    /// Entitlement id.
    pub entitlement_id: String,
    /// Benefit id.
    pub benefit_id: String,
    /// Grant time.
    pub created_at: DateTime<Utc>,
}

/// One granted entitlement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DropEntitlement {
    /// Message id for de-duplication.
    pub id: String,
    /// Details.
    pub data: DropEntitlementData,
}

/// `drop.entitlement.grant`
///
/// The only kind whose `event` is an array; the server batches grants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropEntitlementGrantEvent(pub Vec<DropEntitlement>);

/// Product bought in an extension transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionProduct {
    /// Product name.
    pub name: String,
    /// Product SKU.
    pub sku: String,
    /// Bits spent.
    pub bits: u64,
    /// Whether the product is in development.
    pub in_development: bool,
}

/// `extension.bits_transaction.create`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionBitsTransactionCreateEvent {
    /// Extension client id.
    pub extension_client_id: String,
    /// Transaction id.
    pub id: String,
    /// Channel.
    #[serde(flatten)]
    pub broadcaster: BroadcasterRef,
    /// Buyer.
    #[serde(flatten)]
    pub user: UserRef,
    /// Product.
    pub product: ExtensionProduct,
}
