use activity_export::db;
use activity_export::migration::{Migrator, MigratorTrait};

use crate::MigrateAction;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    match action {
        MigrateAction::Up => {
            let pending = Migrator::get_pending_migrations(&db).await?.len();
            if pending == 0 {
                println!("Schema is up to date.");
                return Ok(());
            }
            Migrator::up(&db, None).await?;
            println!("Applied {pending} migration(s).");
        }
        MigrateAction::Down => {
            Migrator::down(&db, Some(1)).await?;
            println!("Rolled back the most recent migration.");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_migration_with_status(&db).await? {
                println!("{:<48} {:?}", migration.name(), migration.status());
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping every table before reapplying migrations");
            Migrator::fresh(&db).await?;
            println!("Recreated schema from scratch.");
        }
    }

    Ok(())
}
