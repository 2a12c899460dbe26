use chrono::Utc;

use crate::controllers::paste;
use crate::App;

pub async fn run(mut app: App) -> anyhow::Result<()> {
    paste::purge_expired(&mut app, Utc::now()).await?;
    Ok(())
}
