//! Layering of settings file sections and command line flags into a
//! [`ScrapeConfig`].
//!
//! Precedence, lowest first: built-in defaults, `[main]`, `[<platform>]`,
//! then flags given on the command line.

use std::path::PathBuf;

use retro_scrape_core::{ScrapeConfig, miss_log_name};
use retro_scrape_frontend::FrontendKind;
use retro_scrape_lib::{FileSettings, SectionSettings, default_cache_dir};
use retro_scrape_sources::SourceSettings;

use crate::cli_types::{ScrapeArgs, TargetArgs};
use crate::error::CliError;

/// Everything a scrape needs, resolved once before the run starts.
pub(crate) struct Resolved {
    pub config: ScrapeConfig,
    pub frontend: FrontendKind,
    pub sources: SourceSettings,
}

fn current_dir() -> Result<PathBuf, CliError> {
    std::env::current_dir().map_err(CliError::from)
}

/// Config for the folder and cache named by `target`, before any
/// scrape-only flags.
pub(crate) fn resolve_target(
    target: &TargetArgs,
    settings: &FileSettings,
) -> Result<(ScrapeConfig, SectionSettings), CliError> {
    let section = settings.section(target.platform);
    let input = match target.input.clone().or_else(|| section.input_dir.clone()) {
        Some(input) => input,
        None => current_dir()?,
    };

    let mut config = ScrapeConfig::new(target.platform, input);
    config.cache_dir = default_cache_dir();
    section.apply(&mut config)?;

    if let Some(ref dir) = target.input {
        config.input_dir = dir.clone();
    }
    if let Some(ref dir) = target.cache_dir {
        config.cache_dir = dir.clone();
    }
    if target.no_subdirs {
        config.subdirs = false;
    }
    Ok((config, section))
}

pub(crate) fn resolve_scrape(args: &ScrapeArgs, settings: &FileSettings) -> Result<Resolved, CliError> {
    let (mut config, section) = resolve_target(&args.target, settings)?;

    if let Some(source) = args.source {
        config = config.with_source(source);
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(min_match) = args.min_match {
        config.min_match = min_match;
    }
    if let Some(max_length) = args.max_length {
        config.max_length = max_length;
    }
    if let Some(ref region) = args.region {
        config.region = region.clone();
    }
    if let Some(ref language) = args.language {
        config.language = language.clone();
    }
    if let Some(ref dir) = args.media_dir {
        config.media_dir = dir.clone();
    }
    if let Some(ref emulator) = args.emulator {
        config.emulator = Some(emulator.clone());
    }
    // Switches only ever turn their option on; the file can set either way.
    config.include_video |= args.video;
    config.include_skipped |= args.include_skipped;
    config.keep_brackets |= args.keep_brackets;
    config.skip_existing |= args.skip_existing;
    config.pretend |= args.pretend;
    if args.no_local_cache {
        config.local_cache = false;
    }

    if !(1..=retro_scrape_core::MAX_THREADS).contains(&config.threads) {
        return Err(CliError::config(format!(
            "threads must be 1-{}, got {}",
            retro_scrape_core::MAX_THREADS,
            config.threads
        )));
    }

    let frontend = match (args.frontend, section.frontend.as_deref()) {
        (Some(kind), _) => kind,
        (None, Some(name)) => name.parse()?,
        (None, None) => FrontendKind::default(),
    };
    config.document_path = match args.output.clone().or(section.document) {
        Some(path) => path,
        None => config.input_dir.join(frontend.default_document_name()),
    };
    if args.media_dir.is_none() && section.media_dir.is_none() {
        config.media_dir = config.input_dir.join("media");
    }
    config.miss_log = config
        .cache_dir
        .join(miss_log_name(config.platform, config.source));
    config.validate()?;

    let sources = SourceSettings {
        credentials: settings.credentials(),
        import_file: args.import_file.clone(),
        ..Default::default()
    };
    Ok(Resolved {
        config,
        frontend,
        sources,
    })
}
