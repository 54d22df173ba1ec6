//! Manifest resolution for multi-repository workspaces
//!
//! Parses git-repo compatible XML manifests, expands `<include>` chains,
//! flattens nested project declarations, and merges the resulting document
//! sequence (plus any local overrides) into one consistent view of the
//! workspace.
//!
//! # Example Manifest
//!
//! ```xml
//! <manifest>
//!   <remote name="origin" fetch="https://github.com/org" />
//!   <default revision="main" remote="origin" />
//!
//!   <project path="services/auth" name="backend/auth-service">
//!     <annotation name="ci.shard" value="3" />
//!     <project path="vendor" name="backend/auth-vendor" />
//!   </project>
//!
//!   <include name="extra.xml" />
//! </manifest>
//! ```

mod include;
mod merge;
mod model;
mod parser;
mod resolver;

pub use include::{resolve_includes, MAX_INCLUDE_DEPTH};
pub use merge::{merge_all, ResolvedManifest};
pub use model::{
    Annotation, CopyFile, ExtendProject, Include, LinkFile, Manifest, ManifestDefault,
    ManifestServer, Project, ProjectTree, RemoveProject, RepoHooks,
};
pub use resolver::{
    resolve_workspace, resolve_workspace_default, DEFAULT_MANIFEST_NAME, LOCAL_MANIFEST_DIR,
    LOCAL_MANIFEST_FILE, MANIFESTS_DIR, MANIFEST_NAME_KEY, MANIFEST_XML_FILE,
};
