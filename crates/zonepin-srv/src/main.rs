//! zonepin - pin a DNS host to a list of addresses through a web form.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    zonepin_srv::run().await
}
