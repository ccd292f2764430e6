use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_scrape_core::Platform;

pub(crate) fn run_list() {
    log::info!("Supported platforms:");
    log::info!("");

    for platform in Platform::all() {
        let sources: Vec<&str> = platform.sources().iter().map(|s| s.name()).collect();
        log::info!(
            "  {} [default source: {}]",
            platform.short_name().if_supports_color(Stdout, |t| t.bold()),
            platform.default_source().if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("    Aliases: {}", platform.aliases().join(", "));
        log::info!("    Sources: {}", sources.join(", "));
        log::info!("    Extensions: {}", platform.extensions().join(" "));
    }
}
