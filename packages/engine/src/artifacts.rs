//! Artifact synchronizer.
//!
//! Every installed plugin is wired into the project through generated files:
//! a type stub re-exporting the plugin's capability, and a YAML config
//! seeding its default configuration. Artifact paths are a pure function of
//! the descriptor, so create and remove are idempotent by construction.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::constants::PRISMA_LOADER;
use crate::descriptor::ModuleDescriptor;
use crate::error::PluginError;
use crate::project::ProjectContext;

/// The two artifact trees a plugin can populate. A `Both`-role plugin owns
/// an independent artifact pair in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceTree {
    Data,
    Event,
}

impl SourceTree {
    /// The capability export re-exported by the tree's type stubs.
    fn capability(self) -> &'static str {
        match self {
            Self::Data => "DataSource",
            Self::Event => "EventSource",
        }
    }
}

pub struct ArtifactSynchronizer {
    datasources: PathBuf,
    eventsources: PathBuf,
}

impl ArtifactSynchronizer {
    pub fn new(project: &ProjectContext) -> Self {
        Self {
            datasources: project.datasources_dir(),
            eventsources: project.eventsources_dir(),
        }
    }

    /// Creates the stub and config files for every tree the descriptor's
    /// role covers. Re-running with the same descriptor overwrites the files
    /// with identical content. A failure in one tree leaves the files
    /// already written in a sibling tree in place.
    pub fn create(
        &self,
        identifier: &str,
        descriptor: &ModuleDescriptor,
    ) -> Result<(), PluginError> {
        for tree in trees(descriptor) {
            self.create_in_tree(identifier, descriptor, tree)?;
        }
        Ok(())
    }

    /// Deletes the stub and config files for every tree the descriptor's
    /// role covers. Files that are already absent are not an error.
    pub fn remove(
        &self,
        identifier: &str,
        descriptor: &ModuleDescriptor,
    ) -> Result<(), PluginError> {
        tracing::debug!(%identifier, "removing plugin artifacts");
        for tree in trees(descriptor) {
            self.remove_in_tree(descriptor, tree)?;
        }
        Ok(())
    }

    fn tree_root(&self, tree: SourceTree) -> &Path {
        match tree {
            SourceTree::Data => &self.datasources,
            SourceTree::Event => &self.eventsources,
        }
    }

    fn stub_path(&self, tree: SourceTree, loader_id: &str) -> PathBuf {
        self.tree_root(tree)
            .join("types")
            .join(format!("{loader_id}.ts"))
    }

    fn config_path(&self, tree: SourceTree, config_id: &str) -> PathBuf {
        self.tree_root(tree).join(format!("{config_id}.yaml"))
    }

    fn create_in_tree(
        &self,
        identifier: &str,
        descriptor: &ModuleDescriptor,
        tree: SourceTree,
    ) -> Result<(), PluginError> {
        let types_dir = self.tree_root(tree).join("types");
        fs::create_dir_all(&types_dir).map_err(|err| PluginError::ArtifactWrite {
            path: types_dir.clone(),
            reason: err.to_string(),
        })?;

        let stub = self.stub_path(tree, &descriptor.loader_id);
        fs::write(&stub, stub_body(identifier, tree)).map_err(|err| {
            PluginError::ArtifactWrite {
                path: stub.clone(),
                reason: err.to_string(),
            }
        })?;

        if wants_config(tree, &descriptor.loader_id) {
            let config = self.config_path(tree, &descriptor.config_id);
            let body = render_config(descriptor).map_err(|reason| PluginError::ArtifactWrite {
                path: config.clone(),
                reason,
            })?;
            fs::write(&config, body).map_err(|err| PluginError::ArtifactWrite {
                path: config.clone(),
                reason: err.to_string(),
            })?;
        }
        Ok(())
    }

    fn remove_in_tree(
        &self,
        descriptor: &ModuleDescriptor,
        tree: SourceTree,
    ) -> Result<(), PluginError> {
        remove_if_present(&self.stub_path(tree, &descriptor.loader_id))?;
        if wants_config(tree, &descriptor.loader_id) {
            remove_if_present(&self.config_path(tree, &descriptor.config_id))?;
        }
        Ok(())
    }
}

fn trees(descriptor: &ModuleDescriptor) -> Vec<SourceTree> {
    let mut trees = Vec::with_capacity(2);
    if descriptor.role.has_data_source() {
        trees.push(SourceTree::Data);
    }
    if descriptor.role.has_event_source() {
        trees.push(SourceTree::Event);
    }
    trees
}

/// Prisma manages its own schema files; it gets no YAML config under the
/// data-source tree.
fn wants_config(tree: SourceTree, loader_id: &str) -> bool {
    !(tree == SourceTree::Data && loader_id == PRISMA_LOADER)
}

fn stub_body(identifier: &str, tree: SourceTree) -> String {
    let capability = tree.capability();
    format!("import {{ {capability} }} from '{identifier}';\nexport default {capability};\n")
}

/// Renders the YAML config body: the `type` key first, then the default
/// config entries in order. A default-config `type` key overwrites the base
/// entry (last write wins).
fn render_config(descriptor: &ModuleDescriptor) -> Result<String, String> {
    let mut mapping = serde_yaml::Mapping::new();
    mapping.insert(
        serde_yaml::Value::String("type".to_string()),
        serde_yaml::Value::String(descriptor.loader_id.clone()),
    );
    for (key, value) in &descriptor.default_config {
        let value = serde_yaml::to_value(value).map_err(|e| e.to_string())?;
        mapping.insert(serde_yaml::Value::String(key.clone()), value);
    }
    serde_yaml::to_string(&mapping).map_err(|e| e.to_string())
}

fn remove_if_present(path: &Path) -> Result<(), PluginError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(PluginError::ArtifactWrite {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PACKAGE_MANIFEST, PROJECT_MARKER};
    use crate::descriptor::ModuleRole;

    fn sandbox() -> (tempfile::TempDir, ProjectContext) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_MARKER), "").unwrap();
        std::fs::write(dir.path().join(PACKAGE_MANIFEST), "{}").unwrap();
        let project = ProjectContext::locate(dir.path()).unwrap();
        (dir, project)
    }

    fn descriptor(role: ModuleRole, loader_id: &str, config_id: &str) -> ModuleDescriptor {
        ModuleDescriptor {
            role,
            loader_id: loader_id.to_string(),
            config_id: config_id.to_string(),
            default_config: serde_json::Map::new(),
        }
    }

    #[test]
    fn both_role_produces_two_stub_and_two_config_files() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let mut desc = descriptor(ModuleRole::Both, "mongo", "mongo-cfg");
        desc.default_config
            .insert("uri".to_string(), serde_json::json!("x"));

        sync.create("@slipstream/plugins-mongo", &desc).unwrap();

        let ds = project.datasources_dir();
        let es = project.eventsources_dir();
        assert!(ds.join("types").join("mongo.ts").is_file());
        assert!(es.join("types").join("mongo.ts").is_file());

        let ds_config = std::fs::read_to_string(ds.join("mongo-cfg.yaml")).unwrap();
        assert_eq!(ds_config, "type: mongo\nuri: x\n");
        let es_config = std::fs::read_to_string(es.join("mongo-cfg.yaml")).unwrap();
        assert_eq!(es_config, "type: mongo\nuri: x\n");
    }

    #[test]
    fn single_role_produces_one_artifact_pair() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let desc = descriptor(ModuleRole::EventSource, "kafka", "kafka");

        sync.create("@slipstream/plugins-kafka", &desc).unwrap();

        assert!(project
            .eventsources_dir()
            .join("types")
            .join("kafka.ts")
            .is_file());
        assert!(project.eventsources_dir().join("kafka.yaml").is_file());
        assert!(!project.datasources_dir().exists());
    }

    #[test]
    fn stub_reexports_the_tree_capability() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let desc = descriptor(ModuleRole::DataSource, "pg", "pg");

        sync.create("@slipstream/plugins-pg", &desc).unwrap();

        let stub = std::fs::read_to_string(
            project.datasources_dir().join("types").join("pg.ts"),
        )
        .unwrap();
        assert_eq!(
            stub,
            "import { DataSource } from '@slipstream/plugins-pg';\nexport default DataSource;\n"
        );
    }

    #[test]
    fn create_is_idempotent() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let mut desc = descriptor(ModuleRole::DataSource, "pg", "pg-cfg");
        desc.default_config
            .insert("host".to_string(), serde_json::json!("localhost"));
        desc.default_config
            .insert("port".to_string(), serde_json::json!(5432));

        sync.create("@slipstream/plugins-pg", &desc).unwrap();
        let stub_path = project.datasources_dir().join("types").join("pg.ts");
        let config_path = project.datasources_dir().join("pg-cfg.yaml");
        let first_stub = std::fs::read(&stub_path).unwrap();
        let first_config = std::fs::read(&config_path).unwrap();

        sync.create("@slipstream/plugins-pg", &desc).unwrap();
        assert_eq!(std::fs::read(&stub_path).unwrap(), first_stub);
        assert_eq!(std::fs::read(&config_path).unwrap(), first_config);
    }

    #[test]
    fn remove_tolerates_absent_files() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let desc = descriptor(ModuleRole::Both, "mongo", "mongo-cfg");

        sync.remove("@slipstream/plugins-mongo", &desc).unwrap();
        sync.create("@slipstream/plugins-mongo", &desc).unwrap();
        sync.remove("@slipstream/plugins-mongo", &desc).unwrap();
        sync.remove("@slipstream/plugins-mongo", &desc).unwrap();

        assert!(!project.datasources_dir().join("mongo-cfg.yaml").exists());
        assert!(!project
            .datasources_dir()
            .join("types")
            .join("mongo.ts")
            .exists());
    }

    #[test]
    fn prisma_gets_no_datasource_config() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let desc = descriptor(ModuleRole::DataSource, "prisma", "prisma");

        sync.create("@slipstream/plugins-prisma", &desc).unwrap();

        assert!(project
            .datasources_dir()
            .join("types")
            .join("prisma.ts")
            .is_file());
        assert!(!project.datasources_dir().join("prisma.yaml").exists());

        sync.remove("@slipstream/plugins-prisma", &desc).unwrap();
        assert!(!project
            .datasources_dir()
            .join("types")
            .join("prisma.ts")
            .exists());
    }

    #[test]
    fn prisma_under_event_tree_still_gets_a_config() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let desc = descriptor(ModuleRole::Both, "prisma", "prisma");

        sync.create("@slipstream/plugins-prisma", &desc).unwrap();

        assert!(!project.datasources_dir().join("prisma.yaml").exists());
        assert!(project.eventsources_dir().join("prisma.yaml").is_file());
    }

    #[test]
    fn default_config_may_override_type() {
        let (_dir, project) = sandbox();
        let sync = ArtifactSynchronizer::new(&project);
        let mut desc = descriptor(ModuleRole::DataSource, "pg", "pg-cfg");
        desc.default_config
            .insert("type".to_string(), serde_json::json!("custom"));

        sync.create("@slipstream/plugins-pg", &desc).unwrap();

        let config =
            std::fs::read_to_string(project.datasources_dir().join("pg-cfg.yaml")).unwrap();
        assert_eq!(config, "type: custom\n");
    }
}
