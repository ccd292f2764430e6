//! Platform identifiers for every system the scraper knows about.
//!
//! The enum is the single lookup point for per-platform static data: the
//! folder/CLI short name, the aliases metadata sources use for the same
//! system, accepted file extensions, and which sources can scrape it.

use crate::source::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Amiga,
    Apple2,
    Arcade,
    Atari2600,
    Atari5200,
    Atari7800,
    AtariJaguar,
    AtariLynx,
    AtariSt,
    C64,
    Coleco,
    GameGear,
    GameBoy,
    Gba,
    Gbc,
    Genesis,
    MasterSystem,
    MegaDrive,
    Msx,
    N64,
    Nds,
    NeoGeo,
    Nes,
    Ngpc,
    PcEngine,
    Psp,
    Psx,
    ScummVm,
    Sega32x,
    SegaCd,
    Snes,
    Vectrex,
    Videopac,
    VirtualBoy,
    ZxSpectrum,
}

/// All platform variants in listing order.
const ALL_PLATFORMS: &[Platform] = &[
    Platform::Amiga,
    Platform::Apple2,
    Platform::Arcade,
    Platform::Atari2600,
    Platform::Atari5200,
    Platform::Atari7800,
    Platform::AtariJaguar,
    Platform::AtariLynx,
    Platform::AtariSt,
    Platform::C64,
    Platform::Coleco,
    Platform::GameGear,
    Platform::GameBoy,
    Platform::Gba,
    Platform::Gbc,
    Platform::Genesis,
    Platform::MasterSystem,
    Platform::MegaDrive,
    Platform::Msx,
    Platform::N64,
    Platform::Nds,
    Platform::NeoGeo,
    Platform::Nes,
    Platform::Ngpc,
    Platform::PcEngine,
    Platform::Psp,
    Platform::Psx,
    Platform::ScummVm,
    Platform::Sega32x,
    Platform::SegaCd,
    Platform::Snes,
    Platform::Vectrex,
    Platform::Videopac,
    Platform::VirtualBoy,
    Platform::ZxSpectrum,
];

/// Extensions accepted for every platform on top of the per-platform list.
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "7z"];

impl Platform {
    /// Canonical short name used for CLI arguments, config sections and cache folders.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Amiga => "amiga",
            Self::Apple2 => "apple2",
            Self::Arcade => "arcade",
            Self::Atari2600 => "atari2600",
            Self::Atari5200 => "atari5200",
            Self::Atari7800 => "atari7800",
            Self::AtariJaguar => "atarijaguar",
            Self::AtariLynx => "atarilynx",
            Self::AtariSt => "atarist",
            Self::C64 => "c64",
            Self::Coleco => "coleco",
            Self::GameGear => "gamegear",
            Self::GameBoy => "gb",
            Self::Gba => "gba",
            Self::Gbc => "gbc",
            Self::Genesis => "genesis",
            Self::MasterSystem => "mastersystem",
            Self::MegaDrive => "megadrive",
            Self::Msx => "msx",
            Self::N64 => "n64",
            Self::Nds => "nds",
            Self::NeoGeo => "neogeo",
            Self::Nes => "nes",
            Self::Ngpc => "ngpc",
            Self::PcEngine => "pcengine",
            Self::Psp => "psp",
            Self::Psx => "psx",
            Self::ScummVm => "scummvm",
            Self::Sega32x => "sega32x",
            Self::SegaCd => "segacd",
            Self::Snes => "snes",
            Self::Vectrex => "vectrex",
            Self::Videopac => "videopac",
            Self::VirtualBoy => "virtualboy",
            Self::ZxSpectrum => "zxspectrum",
        }
    }

    /// Every name a metadata source may use for this platform, lowercase.
    ///
    /// The short name always comes first. Candidates returned by a source
    /// carrying a platform name outside this list are not considered matches.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Amiga => &["amiga", "amiga (aga)"],
            Self::Apple2 => &["apple2", "apple ii"],
            Self::Arcade => &["arcade", "neo geo", "neo geo cd"],
            Self::Atari2600 => &["atari2600", "atari 2600"],
            Self::Atari5200 => &["atari5200", "atari 5200"],
            Self::Atari7800 => &["atari7800", "atari 7800"],
            Self::AtariJaguar => &["atarijaguar", "atari jaguar", "jaguar"],
            Self::AtariLynx => &["atarilynx", "atari lynx", "lynx"],
            Self::AtariSt => &["atarist", "atari st"],
            Self::C64 => &["c64", "commodore 64"],
            Self::Coleco => &["coleco", "colecovision"],
            Self::GameGear => &["gamegear", "sega game gear", "game gear"],
            Self::GameBoy => &["gb", "nintendo game boy", "game boy"],
            Self::Gba => &["gba", "nintendo game boy advance", "game boy advance"],
            Self::Gbc => &["gbc", "nintendo game boy color", "game boy color"],
            Self::Genesis => &["genesis", "sega genesis", "mega drive"],
            Self::MasterSystem => &["mastersystem", "sega master system", "master system"],
            Self::MegaDrive => &["megadrive", "sega mega drive", "mega drive"],
            Self::Msx => &["msx", "msx2", "msx2+", "msx r turbo"],
            Self::N64 => &["n64", "nintendo 64"],
            Self::Nds => &["nds", "nintendo ds"],
            Self::NeoGeo => &["neogeo", "neo geo", "neo geo cd", "arcade", "neo-geo"],
            Self::Nes => &["nes", "nintendo entertainment system (nes)", "nintendo"],
            Self::Ngpc => &["ngpc", "neo geo pocket color", "neo-geo pocket color"],
            Self::PcEngine => &[
                "pcengine",
                "turbografx 16",
                "turbografx cd",
                "turbografx-16",
                "pc engine",
                "pc engine cd-rom",
                "pc engine supergrafx",
            ],
            Self::Psp => &["psp", "sony playstation portable"],
            Self::Psx => &["psx", "sony playstation", "playstation"],
            Self::ScummVm => &["scummvm", "pc", "amiga", "amiga cd32", "dos", "cd32"],
            Self::Sega32x => &["sega32x", "sega 32x", "megadrive 32x"],
            Self::SegaCd => &["segacd", "sega cd"],
            Self::Snes => &["snes", "super nintendo (snes)", "super nintendo"],
            Self::Vectrex => &["vectrex"],
            Self::Videopac => &[
                "videopac",
                "magnavox odyssey 2",
                "videopac g7000",
                "magnavox odyssey²",
            ],
            Self::VirtualBoy => &["virtualboy", "nintendo virtual boy", "virtual boy"],
            Self::ZxSpectrum => &["zxspectrum", "sinclair zx spectrum", "zx spectrum"],
        }
    }

    /// Platform-specific file extensions, lowercase and without the dot.
    ///
    /// Archive extensions are not included here; see [`Platform::extensions`].
    fn native_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Amiga => &["uae", "adf", "dms", "adz", "rp9"],
            Self::Apple2 => &["dsk"],
            Self::Arcade | Self::NeoGeo => &[],
            Self::Atari2600 => &["bin", "a26", "rom", "gz"],
            Self::Atari5200 => &["a52", "bas", "bin", "car", "xex", "atr", "xfd", "dcm"],
            Self::Atari7800 => &["a78", "bin"],
            Self::AtariJaguar => &["j64", "jag"],
            Self::AtariLynx => &["lnx"],
            Self::AtariSt => &["st", "stx", "img", "rom", "raw", "ipf", "ctr"],
            Self::C64 => &["crt", "d64", "prg", "tap", "t64", "g64"],
            Self::Coleco => &["bin", "col", "rom"],
            Self::GameGear => &["gg"],
            Self::GameBoy => &["gb"],
            Self::Gba => &["gba"],
            Self::Gbc => &["gbc"],
            Self::Genesis | Self::MegaDrive => &["smd", "bin", "gen", "md", "sg"],
            Self::MasterSystem => &["sms"],
            Self::Msx => &["rom", "mx1", "mx2", "col", "dsk"],
            Self::N64 => &["z64", "n64", "v64"],
            Self::Nds => &["nds"],
            Self::Nes => &["nes", "smc", "sfc", "fig", "swc", "mgd"],
            Self::Ngpc => &["ngc"],
            Self::PcEngine => &["pce"],
            Self::Psp => &["cso", "iso", "pbp"],
            Self::Psx => &["cue", "cbn", "img", "iso", "m3u", "mdf", "pbp", "toc", "z", "znx"],
            Self::ScummVm => &["svm"],
            Self::Sega32x => &["32x", "bin", "md", "smd"],
            Self::SegaCd => &["cue", "iso"],
            Self::Snes => &["smc", "sfc", "fig", "swc"],
            Self::Vectrex => &["bin", "gam", "vec"],
            Self::Videopac => &["bin"],
            Self::VirtualBoy => &["vb"],
            Self::ZxSpectrum => &[
                "sna", "szx", "z80", "tap", "tzx", "gz", "udi", "mgt", "img", "trd", "scl", "dsk",
            ],
        }
    }

    /// All accepted file extensions: archives first, then platform-specific ones.
    pub fn extensions(&self) -> Vec<&'static str> {
        ARCHIVE_EXTENSIONS
            .iter()
            .chain(self.native_extensions())
            .copied()
            .collect()
    }

    /// Sources that can scrape this platform, preferred source first.
    ///
    /// The cache-only and import sources work for every platform and are
    /// always listed last.
    pub fn sources(&self) -> &'static [SourceKind] {
        use SourceKind::*;
        match self {
            Self::Arcade | Self::NeoGeo => &[ArcadeDb, TheGamesDb, ScreenScraper, LocalDb, Import],
            Self::Psx | Self::ScummVm => &[TheGamesDb, LocalDb, Import],
            _ => &[TheGamesDb, ScreenScraper, LocalDb, Import],
        }
    }

    /// Source used when none is configured.
    pub fn default_source(&self) -> SourceKind {
        self.sources()[0]
    }

    /// Whether `source` can be used for this platform.
    pub fn supports(&self, source: SourceKind) -> bool {
        self.sources().contains(&source)
    }

    /// Whether a platform name reported by a metadata source refers to this platform.
    pub fn matches_alias(&self, name: &str) -> bool {
        let lower = name.trim().to_lowercase();
        self.aliases().iter().any(|alias| *alias == lower)
    }

    /// All 35 platform variants.
    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown platform: '{0}'")]
pub struct PlatformParseError(pub String);

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse a platform from its short name or any alias (case-insensitive).
    ///
    /// Short names are checked across all platforms before aliases, so
    /// `arcade` resolves to [`Platform::Arcade`] even though it is also an
    /// alias of Neo Geo.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(&platform) = ALL_PLATFORMS.iter().find(|p| p.short_name() == lower) {
            return Ok(platform);
        }
        ALL_PLATFORMS
            .iter()
            .find(|p| p.aliases().contains(&lower.as_str()))
            .copied()
            .ok_or_else(|| PlatformParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
