//! Subcommand handlers.

pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod show;
pub mod user;
pub mod vote;
pub mod votes;

use soapbox_core::api::FeatureApi;
use soapbox_core::board::FeatureBoard;
use soapbox_core::config::ClientConfig;
use soapbox_core::store::FsStore;
use soapbox_core::user::UserSession;

/// The concrete board this frontend drives.
pub type Board = FeatureBoard<FeatureApi, FsStore>;

/// Load the persisted user session from the default store location.
pub fn open_session() -> UserSession<FsStore> {
    UserSession::init(FsStore::open_default())
}

/// Build a board over the HTTP service and the persisted session.
pub fn open_board(config: &ClientConfig) -> Board {
    FeatureBoard::new(FeatureApi::new(config), open_session())
}
