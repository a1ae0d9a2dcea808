use anyhow::Context;
use hackbook_domain::{AdvancementTable, CharacterClass, Level, ProgressionStats};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: cargo run -p xtask -- <command>

Commands:
  table-check           verify the advancement table for every class
  table-dump [class]    print the advancement table as JSON";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xtask=info,hackbook_domain=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("table-check") => table_check(),
        Some("table-dump") => table_dump(args.next().as_deref()),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}\n\n{USAGE}"),
        None => anyhow::bail!("{USAGE}"),
    }
}

fn table_check() -> anyhow::Result<()> {
    let table = AdvancementTable::standard();
    let mut failures = Vec::new();

    for &class in CharacterClass::all() {
        let rows: Vec<ProgressionStats> = Level::all().map(|lvl| table.stats(class, lvl)).collect();
        failures.extend(check_class(&table, class, &rows));

        let first = &rows[0];
        let last = &rows[rows.len() - 1];
        tracing::info!(
            class = %class,
            slots = %format!("{}..{}", first.slot_count, last.slot_count),
            max_xp = last.xp_threshold,
            "Checked {}",
            class.slot_label()
        );
    }

    if failures.is_empty() {
        println!("advancement table OK ({} classes)", CharacterClass::all().len());
        Ok(())
    } else {
        for failure in &failures {
            eprintln!("  {failure}");
        }
        anyhow::bail!("advancement table check failed ({} problems)", failures.len())
    }
}

fn check_class(
    table: &AdvancementTable,
    class: CharacterClass,
    rows: &[ProgressionStats],
) -> Vec<String> {
    let mut failures = Vec::new();

    if rows.first().map(|row| row.xp_threshold) != Some(0) {
        failures.push(format!("{class}: level 1 must need 0 XP"));
    }

    for pair in rows.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.slot_count < prev.slot_count {
            failures.push(format!(
                "{class}: slot count drops from {} to {} at level {}",
                prev.slot_count, next.slot_count, next.level
            ));
        }
        if next.xp_threshold <= prev.xp_threshold {
            failures.push(format!(
                "{class}: XP threshold does not rise at level {}",
                next.level
            ));
        }
        if prev.next_level_xp != Some(next.xp_threshold) {
            failures.push(format!(
                "{class}: next-level XP at level {} disagrees with level {}",
                prev.level, next.level
            ));
        }
    }

    for row in rows {
        if row.slot_count == 0 {
            failures.push(format!("{class}: no slots at level {}", row.level));
        }
        if table.level_for_xp(class, row.xp_threshold) != row.level {
            failures.push(format!(
                "{class}: level_for_xp({}) is not level {}",
                row.xp_threshold, row.level
            ));
        }
        let has_comeback = row.comeback_dice.is_some();
        if has_comeback != (class == CharacterClass::Brave) {
            failures.push(format!(
                "{class}: comeback dice present={has_comeback} at level {}",
                row.level
            ));
        }
    }

    failures
}

fn table_dump(class: Option<&str>) -> anyhow::Result<()> {
    let table = AdvancementTable::standard();
    let classes: Vec<CharacterClass> = match class {
        Some(name) => vec![name
            .parse::<CharacterClass>()
            .with_context(|| format!("parsing class name {name:?}"))?],
        None => CharacterClass::all().to_vec(),
    };

    let rows: Vec<ProgressionStats> = classes
        .iter()
        .flat_map(|&class| Level::all().map(move |lvl| table.stats(class, lvl)))
        .collect();

    let json = serde_json::to_string_pretty(&rows).context("serializing advancement table")?;
    println!("{json}");
    Ok(())
}
