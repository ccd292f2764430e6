use retro_scrape_core::Platform;

/// Map a `Platform` to its ScreenScraper system ID.
///
/// System IDs are third-party API details, so they live with the sources
/// rather than on `Platform`.
pub fn screenscraper_system_id(platform: Platform) -> Option<u32> {
    let id = match platform {
        Platform::Amiga => 64,
        Platform::Apple2 => 86,
        Platform::Arcade => 75,
        Platform::Atari2600 => 26,
        Platform::Atari5200 => 40,
        Platform::Atari7800 => 41,
        Platform::AtariJaguar => 27,
        Platform::AtariLynx => 28,
        Platform::AtariSt => 42,
        Platform::C64 => 66,
        Platform::Coleco => 48,
        Platform::GameGear => 21,
        Platform::GameBoy => 9,
        Platform::Gba => 12,
        Platform::Gbc => 10,
        Platform::Genesis | Platform::MegaDrive => 1,
        Platform::MasterSystem => 2,
        Platform::Msx => 113,
        Platform::N64 => 14,
        Platform::Nds => 15,
        Platform::NeoGeo => 142,
        Platform::Nes => 3,
        Platform::Ngpc => 82,
        Platform::PcEngine => 31,
        Platform::Psp => 61,
        Platform::Psx => 57,
        Platform::ScummVm => 123,
        Platform::Sega32x => 19,
        Platform::SegaCd => 20,
        Platform::Snes => 4,
        Platform::Vectrex => 102,
        Platform::Videopac => 104,
        Platform::VirtualBoy => 11,
        Platform::ZxSpectrum => 76,
    };
    Some(id)
}

/// Map a `Platform` to its TheGamesDB platform ID, if TheGamesDB lists it.
pub fn thegamesdb_platform_id(platform: Platform) -> Option<u32> {
    let id = match platform {
        Platform::Amiga => 4911,
        Platform::Apple2 => 4942,
        Platform::Arcade => 23,
        Platform::Atari2600 => 22,
        Platform::Atari5200 => 26,
        Platform::Atari7800 => 27,
        Platform::AtariJaguar => 28,
        Platform::AtariLynx => 4924,
        Platform::AtariSt => 4937,
        Platform::C64 => 40,
        Platform::Coleco => 31,
        Platform::GameGear => 20,
        Platform::GameBoy => 4,
        Platform::Gba => 5,
        Platform::Gbc => 41,
        Platform::Genesis => 18,
        Platform::MasterSystem => 35,
        Platform::MegaDrive => 36,
        Platform::Msx => 4929,
        Platform::N64 => 3,
        Platform::Nds => 8,
        Platform::NeoGeo => 24,
        Platform::Nes => 7,
        Platform::Ngpc => 4923,
        Platform::PcEngine => 34,
        Platform::Psp => 13,
        Platform::Psx => 10,
        Platform::ScummVm => return None,
        Platform::Sega32x => 33,
        Platform::SegaCd => 21,
        Platform::Snes => 6,
        Platform::Vectrex => 4939,
        Platform::Videopac => 4927,
        Platform::VirtualBoy => 4918,
        Platform::ZxSpectrum => 4913,
    };
    Some(id)
}

/// Map a region setting to the ScreenScraper region code used for names and media.
pub fn preferred_ss_region(region: &str) -> &'static str {
    match region.to_lowercase().as_str() {
        "us" | "usa" | "united states" => "us",
        "eu" | "europe" => "eu",
        "jp" | "japan" => "jp",
        "wor" | "world" => "wor",
        _ => "us",
    }
}
