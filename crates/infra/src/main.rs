use anyhow::Context;

use taxclass_classification::backfill;
use taxclass_infra::{BackfillConfig, Snapshot};

fn main() -> anyhow::Result<()> {
    taxclass_observability::init();

    let config = BackfillConfig::from_env(std::env::args().nth(1))?;

    let snapshot = Snapshot::load(&config.snapshot_path)
        .with_context(|| format!("loading {}", config.snapshot_path.display()))?;
    let stores = snapshot.into_stores()?;
    let registry = stores.registry(config.registry);

    let report = backfill(&registry).context("fiscal classification backfill failed")?;

    Snapshot::capture(&stores)
        .save(&config.output_path)
        .with_context(|| format!("writing {}", config.output_path.display()))?;

    tracing::info!(
        output = %config.output_path.display(),
        assigned = report.products_assigned,
        created = report.classifications_created,
        "snapshot written"
    );
    Ok(())
}
