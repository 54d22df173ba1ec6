//! Document model for git-repo style XML manifests
//!
//! A [`Manifest`] mirrors the element tree of one manifest file. Projects are
//! parsed into [`ProjectTree`] nodes because `<project>` elements nest; the
//! flat, path-qualified form consumed by the merge engine is [`Project`],
//! produced by [`ProjectTree::flatten`]. Keeping the two forms as distinct
//! types means a value is never ambiguously "tree or flat".

use serde::Serialize;
use std::path::PathBuf;

/// A parsed manifest file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Manifest {
    /// Free-form notice text shown to users of the workspace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,

    /// Remote repositories
    pub remotes: Vec<Remote>,

    /// Default settings applied to projects that omit them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ManifestDefault>,

    /// Manifest server endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ManifestServer>,

    /// Top-level projects, possibly with nested sub-projects
    pub projects: Vec<ProjectTree>,

    /// Projects to drop from the merged result, by name
    pub remove_projects: Vec<RemoveProject>,

    /// Post-ingestion group/revision overrides, by name and path
    pub extend_projects: Vec<ExtendProject>,

    /// Hook-execution policy declared by this document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_hooks: Option<RepoHooks>,

    /// Other manifest files spliced in at this document's position
    pub includes: Vec<Include>,

    /// File this document was parsed from, for diagnostics only
    #[serde(skip)]
    pub source_file: PathBuf,
}

/// Remote repository definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    /// Remote name (e.g., "origin")
    pub name: String,

    /// Fetch URL base (e.g., "https://github.com/org")
    pub fetch: String,

    /// Alias to use instead of the name when creating the git remote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Push URL, when different from the fetch URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_url: Option<String>,

    /// Review server for code review (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,

    /// Default revision for projects on this remote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// Default settings for projects
///
/// Every attribute is optional; whatever is present fills in for projects
/// that omit the corresponding attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestDefault {
    /// Default remote name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    /// Default revision/branch (e.g., "main")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Default destination branch for uploads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_branch: Option<String>,

    /// Default upstream to track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,

    /// Sync options (parallel jobs, current-branch, smart-sync, tags)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_j: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_c: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_tags: Option<String>,
}

/// Manifest server endpoint (`<manifest-server>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestServer {
    /// Server URL
    pub url: String,
}

/// One source repository entry with a fully resolved checkout path
///
/// This is the flat form: nested `<project>` declarations have already been
/// expanded by [`ProjectTree::flatten`] and `path` is workspace-relative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    /// Repository name, relative to the remote fetch URL
    pub name: String,

    /// Checkout path, unique across the whole merged manifest
    pub path: String,

    /// Override remote for this project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    /// Override revision for this project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Destination branch for uploads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_branch: Option<String>,

    /// Comma-separated group tags, stored opaquely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,

    /// Sync options (current-branch, smart-sync, tags)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_c: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_tags: Option<String>,

    /// Upstream to track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,

    /// Shallow-clone depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_depth: Option<String>,

    /// Keep the path even when it collides with a repository name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_path: Option<String>,

    /// Tool-specific annotations, carried unmodified
    pub annotations: Vec<Annotation>,

    /// File-copy directives, carried unmodified
    pub copy_files: Vec<CopyFile>,

    /// Symlink directives, carried unmodified
    pub link_files: Vec<LinkFile>,
}

impl Project {
    /// Get an annotation value by name
    pub fn annotation(&self, name: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get the full repository URL given a remote
    pub fn full_url(&self, remote: &Remote) -> String {
        if self.name.starts_with("http://")
            || self.name.starts_with("https://")
            || self.name.starts_with("git@")
        {
            self.name.clone()
        } else {
            format!("{}/{}", remote.fetch.trim_end_matches('/'), &self.name)
        }
    }
}

/// A `<project>` element as declared, with its nested children
///
/// Child paths are relative to the parent's resolved path until
/// [`ProjectTree::flatten`] qualifies them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTree {
    /// The project's own attributes
    #[serde(flatten)]
    pub project: Project,

    /// Nested sub-projects, in declaration order
    pub projects: Vec<ProjectTree>,
}

impl ProjectTree {
    /// Flatten this tree into path-qualified entries, parent before children
    ///
    /// The node itself comes first with its path resolved against
    /// `parent_path`, followed by each child's flattened sequence in
    /// declaration order. The tree is left untouched; the returned list is
    /// the authoritative form.
    pub fn flatten(&self, parent_path: &str) -> Vec<Project> {
        let mut entry = self.project.clone();
        entry.path = join_path(parent_path, &self.project.path);
        let resolved = entry.path.clone();

        let mut out = vec![entry];
        for child in &self.projects {
            out.extend(child.flatten(&resolved));
        }
        out
    }
}

/// Tool-specific annotation attached to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub name: String,
    pub value: String,
    /// Whether the annotation survives manifest re-generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep: Option<String>,
}

/// File-copy directive (`<copyfile>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyFile {
    pub src: String,
    pub dest: String,
}

/// Symlink directive (`<linkfile>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkFile {
    pub src: String,
    pub dest: String,
}

/// Drop directive (`<remove-project>`), matching projects by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveProject {
    pub name: String,
}

/// Override directive (`<extend-project>`)
///
/// Applies only to a project whose name matches and whose resolved path
/// equals `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendProject {
    pub name: String,
    pub path: String,
    /// Extra group tags unioned into the project's groups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    /// Revision override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// Hook-execution policy (`<repo-hooks>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoHooks {
    /// Project hosting the hook scripts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_project: Option<String>,

    /// Comma-separated list of enabled hooks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_list: Option<String>,
}

/// Include directive (`<include>`), relative to the including file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Include {
    pub name: String,
}

impl Manifest {
    /// Flatten every top-level project tree, in declaration order
    pub fn all_projects(&self) -> Vec<Project> {
        self.projects.iter().flat_map(|p| p.flatten("")).collect()
    }
}

/// Join manifest-relative checkout paths with `/`
///
/// Manifest paths are workspace-relative slash paths, not host filesystem
/// paths, so joining is string-level.
fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}
