//! Room controller: a façade over the remote room service.

use livekit_api::services::room::{CreateRoomOptions, RoomClient};
use tracing::debug;

use crate::config::ControllerConfig;
use crate::{proto, token, Result};

/// Thin control-plane client for one service endpoint.
///
/// Every room and participant operation is a single delegated call against
/// the remote service; nothing is cached or retried here, and failures
/// surface unchanged as [`Error`](crate::Error). Token issuance is pure
/// local computation with the held credentials.
///
/// Methods take `&self`, so one controller can serve concurrent in-flight
/// calls; [`RoomController::close`] consumes the controller, which makes
/// use-after-close unrepresentable.
pub struct RoomController {
    config: ControllerConfig,
    rooms: RoomClient,
}

impl std::fmt::Debug for RoomController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomController")
            .field("url", &self.config.url)
            .finish()
    }
}

impl RoomController {
    /// Construct a controller for the configured endpoint.
    ///
    /// The underlying client connects lazily, so construction performs no
    /// I/O; an unreachable endpoint surfaces as
    /// [`Error::Connection`](crate::Error::Connection) on first use.
    pub fn new(config: ControllerConfig) -> Self {
        let rooms = RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self { config, rooms }
    }

    /// Request creation of a room, returning the service's descriptor
    /// unchanged.
    pub async fn create_room(&self, name: &str) -> Result<proto::Room> {
        debug!(room = name, "creating room");
        let room = self
            .rooms
            .create_room(name, CreateRoomOptions::default())
            .await?;
        Ok(room)
    }

    /// Names of all rooms currently known to the service, in service order.
    pub async fn list_rooms(&self) -> Result<Vec<String>> {
        let rooms = self.rooms.list_rooms(Vec::new()).await?;
        Ok(rooms.into_iter().map(|room| room.name).collect())
    }

    /// Request deletion of a room. Whether deleting a nonexistent room
    /// succeeds is the service's call; it is not masked here.
    pub async fn delete_room(&self, name: &str) -> Result<()> {
        debug!(room = name, "deleting room");
        self.rooms.delete_room(name).await?;
        Ok(())
    }

    /// Identities of the participants currently in `room_name`.
    pub async fn list_participants(&self, room_name: &str) -> Result<Vec<String>> {
        let participants = self.rooms.list_participants(room_name).await?;
        Ok(participants
            .into_iter()
            .map(|participant| participant.identity)
            .collect())
    }

    /// Forcibly disconnect a participant by identity.
    pub async fn remove_participant(&self, room_name: &str, identity: &str) -> Result<()> {
        debug!(room = room_name, identity, "removing participant");
        self.rooms.remove_participant(room_name, identity).await?;
        Ok(())
    }

    /// Mint a token for a hidden viewer of `room_name`.
    pub fn issue_subscriber_token(
        &self,
        identity: &str,
        display_name: &str,
        room_name: &str,
    ) -> Result<String> {
        let jwt = token::sign(
            &self.config.api_key,
            &self.config.api_secret,
            identity,
            display_name,
            token::subscriber_grants(room_name),
        )?;
        Ok(jwt)
    }

    /// Mint a token for the publishing source of `room_name`. The identity
    /// is always [`token::PUBLISHER_IDENTITY`]; only the display name
    /// varies per source.
    pub fn issue_publisher_token(&self, display_name: &str, room_name: &str) -> Result<String> {
        let jwt = token::sign(
            &self.config.api_key,
            &self.config.api_secret,
            token::PUBLISHER_IDENTITY,
            display_name,
            token::publisher_grants(room_name),
        )?;
        Ok(jwt)
    }

    /// Release the underlying session. Consuming `self` makes further use
    /// a compile error, so this is trivially safe to call exactly once.
    pub fn close(self) {
        debug!(url = %self.config.url, "closing controller");
        drop(self.rooms);
    }
}
