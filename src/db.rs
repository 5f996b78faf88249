use std::time::Duration;

use mongodb::{bson::doc, options::ClientOptions, Client, Database};

use crate::config::Config;

pub const DB_NAME: &str = "bistroDb";

pub const USERS: &str = "users";
pub const MENU: &str = "menu";
pub const REVIEWS: &str = "reviews";
pub const CARTS: &str = "carts";

/// Open the shared storage client. The client connects lazily; the handle is
/// cloned into every router and closed once at shutdown.
pub async fn connect(config: &Config) -> mongodb::error::Result<(Client, Database)> {
    let mut options = ClientOptions::parse(config.mongodb_uri()).await?;
    options.app_name = Some("bistro-boss-server".to_string());
    options.connect_timeout = Some(Duration::from_secs(10));
    options.server_selection_timeout = Some(Duration::from_secs(30));

    let client = Client::with_options(options)?;
    let database = client.database(DB_NAME);
    Ok((client, database))
}

pub async fn ping(db: &Database) -> mongodb::error::Result<()> {
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
