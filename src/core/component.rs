//! Downloadable components of a RetroBat distribution
//!
//! Every component has a `get_<key>` enable flag, a primary source template,
//! an optional fallback template and a destination relative to the tree root.
//! `lrcores` and `emulators` are name-templated: they are fetched once per line
//! of their manifest with `{name}` bound to that line.

use std::fmt;

/// How a component's source is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Archive downloaded over HTTP and extracted.
    Archive,
    /// Git repository cloned and copied without VCS metadata.
    Git,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    System,
    RetrobatBinaries,
    Emulationstation,
    BatoceraPorts,
    DefaultTheme,
    Bios,
    Decorations,
    Retroarch,
    Wiimotegun,
    Batgui,
    Lrcores,
    Emulators,
}

impl Component {
    /// Every component, in acquisition order.
    pub const ALL: [Component; 12] = [
        Component::System,
        Component::RetrobatBinaries,
        Component::Emulationstation,
        Component::BatoceraPorts,
        Component::DefaultTheme,
        Component::Bios,
        Component::Decorations,
        Component::Retroarch,
        Component::Wiimotegun,
        Component::Batgui,
        Component::Lrcores,
        Component::Emulators,
    ];

    /// Single-source components fetched by the acquisition stage.
    pub const PACKAGES: [Component; 10] = [
        Component::System,
        Component::RetrobatBinaries,
        Component::Emulationstation,
        Component::BatoceraPorts,
        Component::DefaultTheme,
        Component::Bios,
        Component::Decorations,
        Component::Retroarch,
        Component::Wiimotegun,
        Component::Batgui,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::RetrobatBinaries => "retrobat_binaries",
            Self::Emulationstation => "emulationstation",
            Self::BatoceraPorts => "batocera_ports",
            Self::DefaultTheme => "default_theme",
            Self::Bios => "bios",
            Self::Decorations => "decorations",
            Self::Retroarch => "retroarch",
            Self::Wiimotegun => "wiimotegun",
            Self::Batgui => "batgui",
            Self::Lrcores => "lrcores",
            Self::Emulators => "emulators",
        }
    }

    /// Name of the `build.ini` enable flag.
    pub fn flag_key(&self) -> String {
        format!("get_{}", self.key())
    }

    /// Name of the `build.ini` key holding the primary source.
    pub fn url_key(&self) -> &'static str {
        match self {
            Self::System => "retrobat_system_path",
            Self::RetrobatBinaries => "retrobat_binaries_url",
            Self::Emulationstation => "emulationstation_url",
            Self::BatoceraPorts => "emulatorlauncher_url",
            Self::DefaultTheme => "theme_path",
            Self::Bios => "bios_git_url",
            Self::Decorations => "decorations_path",
            Self::Retroarch => "retroarch_package_url",
            Self::Wiimotegun => "wiimotegun_url",
            Self::Batgui => "batgui_url",
            Self::Lrcores => "lrcores_url",
            Self::Emulators => "emulators_url",
        }
    }

    /// Name of the `build.ini` key holding the fallback source.
    pub fn fallback_key(&self) -> String {
        format!("{}_fallback_url", self.key())
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::System | Self::DefaultTheme | Self::Bios | Self::Decorations => SourceKind::Git,
            _ => SourceKind::Archive,
        }
    }

    /// Destination template relative to the tree root (`""` is the root).
    pub fn destination(&self) -> &'static str {
        match self {
            Self::System | Self::RetrobatBinaries => "",
            Self::Emulationstation | Self::BatoceraPorts => "emulationstation",
            Self::DefaultTheme => "emulationstation/.emulationstation/themes/es-theme-carbon",
            Self::Bios => "bios",
            Self::Decorations => "system/decorations",
            Self::Retroarch => "emulators/retroarch",
            Self::Wiimotegun => "WiimoteGun",
            Self::Batgui => "BatGui",
            Self::Lrcores => "emulators/retroarch/cores",
            Self::Emulators => "emulators/{name}",
        }
    }

    pub fn default_url(&self) -> &'static str {
        match self {
            Self::System => "https://github.com/RetroBat-Official/retrobat-setup",
            Self::RetrobatBinaries => "{ftp}tools/retrobat_binaries_{arch}.7z",
            Self::Emulationstation => {
                "https://github.com/RetroBat-Official/emulationstation/releases/download/continuous-master/EmulationStation-Win32.zip"
            }
            Self::BatoceraPorts => {
                "https://github.com/RetroBat-Official/emulatorlauncher/releases/download/continuous/batocera-ports.zip"
            }
            Self::DefaultTheme => "https://github.com/fabricecaruso/es-theme-carbon",
            Self::Bios => "https://github.com/RetroBat-Official/retrobat-bios",
            Self::Decorations => "https://github.com/RetroBat-Official/retrobat-bezels",
            Self::Retroarch => "{buildbot}/stable/{retroarch_version}/{platform}/RetroArch.7z",
            Self::Wiimotegun => {
                "https://github.com/fabricecaruso/WiimoteGun/releases/download/v1.1/WiimoteGun.zip"
            }
            Self::Batgui => {
                "https://github.com/xReppa/rb_gui/releases/download/2.0.56.0/BatGui2056.zip"
            }
            Self::Lrcores => "{buildbot}/nightly/{platform}/latest/{name}_libretro.{ext}.zip",
            Self::Emulators => "{ftp}{branch}/emulators/{name}.7z",
        }
    }

    /// Secondary mirror consulted once after the primary is exhausted.
    pub fn default_fallback(&self) -> Option<&'static str> {
        match self {
            Self::Emulationstation => Some("{ftp}{branch}/emulationstation/EmulationStation-Win32.zip"),
            Self::BatoceraPorts => Some("{ftp}{branch}/emulationstation/batocera-ports.zip"),
            Self::Retroarch => Some("{ftp}{branch}/emulators/retroarch.7z"),
            Self::Lrcores => Some("{ftp}{branch}/lrcores/{name}_libretro.{ext}.zip"),
            _ => None,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = Component::ALL.iter().map(Component::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Component::ALL.len());
    }

    #[test]
    fn test_packages_exclude_name_templated_components() {
        assert!(!Component::PACKAGES.contains(&Component::Lrcores));
        assert!(!Component::PACKAGES.contains(&Component::Emulators));
        for c in Component::PACKAGES {
            assert!(!c.default_url().contains("{name}"), "{} uses {{name}}", c);
        }
    }

    #[test]
    fn test_system_is_fetched_first() {
        // Later stages read their manifests from the system component.
        assert_eq!(Component::PACKAGES[0], Component::System);
    }

    #[test]
    fn test_flag_keys_match_build_ini() {
        assert_eq!(Component::Bios.flag_key(), "get_bios");
        assert_eq!(Component::BatoceraPorts.flag_key(), "get_batocera_ports");
        assert_eq!(Component::Bios.url_key(), "bios_git_url");
    }

    #[test]
    fn test_git_components() {
        assert_eq!(Component::Bios.kind(), SourceKind::Git);
        assert_eq!(Component::Retroarch.kind(), SourceKind::Archive);
    }
}
