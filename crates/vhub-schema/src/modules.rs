use serde::Serialize;

/// Label prepended to every probe result whose editor executable resolved.
pub const EDITOR_LABEL: &str = "Editor";

const LABEL_SEPARATOR: &str = ", ";

/// A platform support module as installed under `Data/PlaybackEngines`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SupportModule {
    /// Folder name under the playback engines directory.
    pub folder: &'static str,
    /// Human-readable platform label.
    pub label: &'static str,
}

/// Known support modules, in display order.
pub const SUPPORT_MODULES: &[SupportModule] = &[
    SupportModule {
        folder: "WindowsStandaloneSupport",
        label: "Windows",
    },
    SupportModule {
        folder: "MacStandaloneSupport",
        label: "macOS",
    },
    SupportModule {
        folder: "LinuxStandaloneSupport",
        label: "Linux",
    },
    SupportModule {
        folder: "AndroidPlayer",
        label: "Android",
    },
    SupportModule {
        folder: "iOSSupport",
        label: "iOS",
    },
    SupportModule {
        folder: "AppleTVSupport",
        label: "tvOS",
    },
    SupportModule {
        folder: "MetroSupport",
        label: "UWP",
    },
    SupportModule {
        folder: "PS4Player",
        label: "PS4",
    },
    SupportModule {
        folder: "PS5Player",
        label: "PS5",
    },
    SupportModule {
        folder: "XboxOnePlayer",
        label: "Xbox One",
    },
    SupportModule {
        folder: "Switch",
        label: "Switch",
    },
    SupportModule {
        folder: "WebGLSupport",
        label: "WebGL",
    },
];

pub fn join_labels<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

pub fn split_labels(label: &str) -> Vec<&str> {
    label
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
