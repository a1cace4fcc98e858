//! Fixed conventions shared across the engine.

/// npm scope under which Slipstream capability plugins are published.
/// Manifest entries outside this prefix are ordinary dependencies, not
/// plugins.
pub const PLUGIN_NAMESPACE: &str = "@slipstream/plugins";

/// Marker file identifying a generated Slipstream project.
pub const PROJECT_MARKER: &str = ".slipstream";

/// The package manifest consulted for the installed plugin set.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Loader whose schema is managed by its own toolchain; it never gets a
/// YAML config under the data-source tree.
pub const PRISMA_LOADER: &str = "prisma";

/// Directory beside the executable holding the bundled catalog snapshot.
pub const SNAPSHOT_DIR: &str = "assets";

/// Filename of the bundled catalog snapshot.
pub const SNAPSHOT_FILE: &str = "plugins_list.json";
