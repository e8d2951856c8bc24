//! Access-token grant policy for broadcast rooms.
//!
//! Grants come in exactly two shapes: the publishing source (visible, can
//! only publish) and a viewer (hidden, can only subscribe). Each shape is a
//! plain [`VideoGrants`] value handed to one signing step; signing itself
//! is delegated to the service's token library.

use livekit_api::access_token::{AccessToken, AccessTokenError, VideoGrants};

/// Identity reserved for the publishing device. Every publisher token
/// carries it, so a room has at most one trusted source.
pub const PUBLISHER_IDENTITY: &str = "telescope";

/// Grants for a hidden viewer: join and subscribe, nothing else.
pub fn subscriber_grants(room_name: &str) -> VideoGrants {
    VideoGrants {
        room_join: true,
        room: room_name.to_owned(),
        can_publish: false,
        can_subscribe: true,
        can_publish_data: false,
        hidden: true,
        ..Default::default()
    }
}

/// Grants for the publishing source: join and publish, visible to the
/// room so viewers can find its tracks.
pub fn publisher_grants(room_name: &str) -> VideoGrants {
    VideoGrants {
        room_join: true,
        room: room_name.to_owned(),
        can_publish: true,
        can_subscribe: false,
        can_publish_data: false,
        hidden: false,
        ..Default::default()
    }
}

/// Sign `grants` for `identity` into a JWT using the given credentials.
pub fn sign(
    api_key: &str,
    api_secret: &str,
    identity: &str,
    display_name: &str,
    grants: VideoGrants,
) -> Result<String, AccessTokenError> {
    AccessToken::with_api_key(api_key, api_secret)
        .with_identity(identity)
        .with_name(display_name)
        .with_grants(grants)
        .to_jwt()
}
