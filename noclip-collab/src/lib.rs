mod auth;
mod clips;
mod db;
mod friends;
mod util;

use std::sync::Arc;

pub use auth::*;
pub use clips::*;
pub use db::*;
pub use friends::*;

/// The noclip collab system, facilitating authentication, friendships, and clips.
pub struct Collab {
    pub auth: Auth,
    pub friends: Friends,
    pub clips: Clips,
}

impl Collab {
    pub fn new<Db>(database: Db) -> Self
    where
        Db: Database + 'static,
    {
        let database: SharedDatabase = Arc::new(database);

        let friends = Friends::new(&database);
        let clips = Clips::new(&database, &friends);

        Self {
            auth: Auth::new(&database),
            friends,
            clips,
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_collab() -> Collab {
    Collab::new(
        SqliteDatabase::in_memory()
            .await
            .expect("database is created"),
    )
}
