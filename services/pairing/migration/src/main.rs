use sea_orm_migration::prelude::*;

use couplet_pairing_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
