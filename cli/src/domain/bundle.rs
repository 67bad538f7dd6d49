//! Classification of the files found in a fetched bundle.
//!
//! Pure functions over file names; nothing here touches the filesystem.

/// Reserved name of the launcher script a publisher ships with the program.
pub const DEDICATED_LAUNCHER: &str = "run.sh";

/// Reserved name of the generic interpreter-based runner script.
pub const FALLBACK_RUNNER: &str = "runner.sh";

/// Optional informational metadata file.
pub const METADATA_FILE: &str = "metadata.json";

/// Extensions of single-file packaged programs.
pub const PACKAGE_EXTENSIONS: &[&str] = &[".whl", ".pkg"];

/// Archive formats that are expanded during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Tar,
    Zip,
}

impl ArchiveKind {
    /// Detect the archive format from a file name.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".tar") {
            Some(Self::Tar)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Canonical extension, without the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Tar => "tar",
            Self::Zip => "zip",
        }
    }
}

/// Whether `name` is a packaged-program file.
#[must_use]
pub fn is_package(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    PACKAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}

/// Whether `name` is one of the reserved launcher scripts.
#[must_use]
pub fn is_reserved_script(name: &str) -> bool {
    name == DEDICATED_LAUNCHER || name == FALLBACK_RUNNER
}

/// Whether a bundle listing holds anything the launcher knows how to use.
#[must_use]
pub fn is_recognizable(entries: &[String]) -> bool {
    entries
        .iter()
        .any(|e| is_reserved_script(e) || is_package(e))
}

/// Command name embedded in a packaged-program file name.
///
/// Takes the portion before the first `-` (or the name without its extension
/// when there is no `-`) and normalizes the remaining separators (`.` and
/// whitespace) to `_`. Returns `None` when nothing is left.
///
/// `mytool-1.0.0-plat.pkg` → `mytool`, `my.tool.pkg` → `my_tool`.
#[must_use]
pub fn infer_command_name(file_name: &str) -> Option<String> {
    let stem = match file_name.split_once('-') {
        Some((head, _)) => head,
        None => strip_package_extension(file_name),
    };
    let normalized: String = stem
        .trim()
        .chars()
        .map(|c| if c == '.' || c.is_whitespace() { '_' } else { c })
        .collect();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn strip_package_extension(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    PACKAGE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(name, |ext| &name[..name.len() - ext.len()])
}
