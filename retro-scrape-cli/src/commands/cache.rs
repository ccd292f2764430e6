use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_scrape_lib::{FileSettings, clean_cache, merge_cache};

use crate::cli_types::TargetArgs;
use crate::error::CliError;
use crate::resolve::resolve_target;

/// Drop cache records whose files are gone from the input folder.
pub(crate) fn run_cache_clean(target: &TargetArgs, settings: &FileSettings) -> Result<(), CliError> {
    let (config, _) = resolve_target(target, settings)?;
    let removed = clean_cache(&config)?;
    log::info!(
        "{} Removed {} stale record{} from the '{}' cache",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        removed,
        if removed == 1 { "" } else { "s" },
        config.platform,
    );
    Ok(())
}

/// Merge the cache at `from` into the platform cache.
pub(crate) fn run_cache_merge(
    from: &Path,
    update: bool,
    target: &TargetArgs,
    settings: &FileSettings,
) -> Result<(), CliError> {
    let (config, _) = resolve_target(target, settings)?;
    match merge_cache(&config, from, update)? {
        Some(stats) => log::info!(
            "{} Merged {}: {} new, {} updated, {} kept",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            from.display().if_supports_color(Stdout, |t| t.cyan()),
            stats.inserted,
            stats.updated,
            stats.kept,
        ),
        None => log::warn!(
            "{} Nothing merged, {} holds no cache",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            from.display(),
        ),
    }
    Ok(())
}
