use mongodb::{error::Error, Client, Database};
use once_cell::sync::OnceCell;

static DB: OnceCell<Database> = OnceCell::new();

pub async fn connect(uri: &str, name: &str) -> Result<(), Error> {
    let client = Client::with_uri_str(uri).await?;
    let _ = DB.set(client.database(name));
    Ok(())
}

pub fn get_db() -> Option<Database> {
    DB.get().cloned()
}
