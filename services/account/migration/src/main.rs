use sea_orm_migration::prelude::*;

mod m20260701_000001_create_organizations;
mod m20260701_000002_create_users;
mod m20260701_000003_create_user_auths;
mod m20260701_000004_create_access_tokens;
mod m20260701_000005_create_refresh_tokens;
mod m20260701_000006_create_verification_codes;
mod m20260701_000007_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260701_000001_create_organizations::Migration),
            Box::new(m20260701_000002_create_users::Migration),
            Box::new(m20260701_000003_create_user_auths::Migration),
            Box::new(m20260701_000004_create_access_tokens::Migration),
            Box::new(m20260701_000005_create_refresh_tokens::Migration),
            Box::new(m20260701_000006_create_verification_codes::Migration),
            Box::new(m20260701_000007_create_outbox_events::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
