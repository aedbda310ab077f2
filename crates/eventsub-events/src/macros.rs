/// Declarative macro generating `SubscriptionType`, `Event`,
/// `ALL_SUBSCRIPTION_TYPES`, wire-string helpers, and the per-kind event
/// decoder table from a single source of truth.
///
/// # Sections
///
/// - **`typed`**: subscription types whose `event` decodes into a payload
///   struct. Each payload type implements `TypedEvent` for exactly one kind.
/// - **`raw`**: subscription types the client recognizes but does not decode.
///   Their events only reach the raw-event hook.
macro_rules! define_subscriptions {
    (
        typed {
            $(
                $(#[doc = $doc:literal])*
                $variant:ident => $wire:literal => $payload_ty:ty
            ),* $(,)?
        }
        raw {
            $(
                $(#[doc = $rdoc:literal])*
                $rv:ident => $rw:literal
            ),* $(,)?
        }
    ) => {
        // ── SubscriptionType enum ───────────────────────────────────

        /// Discriminator for every recognized `subscription.type`.
        ///
        /// Each variant serializes to its wire string (e.g. `"channel.follow"`).
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum SubscriptionType {
            $(
                $(#[doc = $doc])*
                #[serde(rename = $wire)]
                $variant,
            )*
            $(
                #[doc = concat!("`", $rw, "`, delivered to the raw-event hook only.")]
                $(#[doc = $rdoc])*
                #[serde(rename = $rw)]
                $rv,
            )*
        }

        // ── ALL_SUBSCRIPTION_TYPES constant ─────────────────────────

        /// All subscription types in definition order (typed kinds first).
        pub const ALL_SUBSCRIPTION_TYPES: [SubscriptionType; { [$($wire,)* $($rw,)*].len() }] = [
            $(SubscriptionType::$variant,)*
            $(SubscriptionType::$rv,)*
        ];

        // ── SubscriptionType methods ────────────────────────────────

        impl SubscriptionType {
            /// Canonical wire string (e.g. `"channel.follow"`).
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                    $(Self::$rv => $rw,)*
                }
            }

            /// Domain prefix (e.g. `"channel"`, `"stream"`).
            #[must_use]
            pub fn domain(self) -> &'static str {
                let s = self.as_str();
                match s.find('.') {
                    Some(i) => &s[..i],
                    None => s,
                }
            }

            /// Whether events of this kind decode into a payload struct.
            #[must_use]
            pub fn has_typed_payload(self) -> bool {
                matches!(self, $(Self::$variant)|*)
            }

            /// Decode raw `event` JSON into the typed [`Event`] for this kind.
            ///
            /// Returns `Ok(None)` for raw-only kinds without touching `raw`.
            #[allow(clippy::too_many_lines)]
            pub fn decode_event(self, raw: &str) -> std::result::Result<Option<Event>, serde_json::Error> {
                match self {
                    $(
                        Self::$variant => Ok(Some(Event::$variant(serde_json::from_str(raw)?))),
                    )*
                    $(
                        Self::$rv => Ok(None),
                    )*
                }
            }
        }

        impl std::fmt::Display for SubscriptionType {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for SubscriptionType {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)*
                    $($rw => Ok(Self::$rv),)*
                    _ => Err(format!("unknown subscription type: {s}")),
                }
            }
        }

        // ── Event enum ──────────────────────────────────────────────

        /// A decoded notification event, one variant per typed kind.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Event {
            $(
                $(#[doc = $doc])*
                $variant($payload_ty),
            )*
        }

        impl Event {
            /// The subscription type this event was decoded for.
            #[must_use]
            pub fn subscription_type(&self) -> SubscriptionType {
                match self {
                    $(Self::$variant(_) => SubscriptionType::$variant,)*
                }
            }

            /// Serialize the payload back to `event` JSON.
            pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
                match self {
                    $(Self::$variant(payload) => serde_json::to_string(payload),)*
                }
            }

            /// An event of `kind` holding the payload's default value.
            ///
            /// `None` for raw-only kinds.
            #[must_use]
            pub fn default_for(kind: SubscriptionType) -> Option<Self> {
                match kind {
                    $(SubscriptionType::$variant => Some(Self::$variant(<$payload_ty>::default())),)*
                    $(SubscriptionType::$rv => None,)*
                }
            }
        }

        // ── TypedEvent impls ────────────────────────────────────────

        $(
            impl TypedEvent for $payload_ty {
                const KIND: SubscriptionType = SubscriptionType::$variant;

                fn from_event(event: Event) -> Option<Self> {
                    #[allow(unreachable_patterns)]
                    match event {
                        Event::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }

                fn into_event(self) -> Event {
                    Event::$variant(self)
                }
            }
        )*
    };
}
