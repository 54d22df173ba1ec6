//! Multi-document merge
//!
//! Folds an ordered sequence of parsed manifests into one
//! [`ResolvedManifest`], enforcing uniqueness of checkout paths, remote
//! names, the default block and the manifest server, then applying
//! remove/extend directives. The fold short-circuits on the first error;
//! no partial result is ever returned.

use crate::manifest::model::{
    ExtendProject, Manifest, ManifestDefault, ManifestServer, Project, Remote,
};
use crate::{FlotillaError, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Source label used when a failure is attributed to the accumulated
/// manifest itself rather than to one contributing document.
const MERGED_SOURCE: &str = "merged manifest";

/// The single merged manifest produced by folding all contributing documents
///
/// Projects are flat and path-qualified; nested tree structure does not
/// survive merging. There is no repo-hooks field: the merge policy never
/// folds hook blocks, so callers that need the hook policy read it off the
/// root parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedManifest {
    /// Notice text adopted from the first document that carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,

    /// Remotes from all documents, first occurrence wins the position
    pub remotes: Vec<Remote>,

    /// The single effective default block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ManifestDefault>,

    /// The single effective manifest server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ManifestServer>,

    /// Flat, path-qualified project list
    pub projects: Vec<Project>,
}

impl ResolvedManifest {
    /// Fold one document into the accumulator
    ///
    /// Steps run in a fixed order: notice, remotes, default, server, a
    /// defensive duplicate-path check on the accumulator itself, project
    /// ingestion, removal directives, extension directives.
    pub fn merge(&mut self, incoming: Manifest) -> Result<()> {
        let source = incoming.source_file.display().to_string();

        if let Some(notice) = &incoming.notice {
            match &self.notice {
                None => self.notice = Some(notice.clone()),
                Some(existing) if existing == notice => {}
                Some(_) => {
                    return Err(FlotillaError::DuplicateNotice { src: source });
                }
            }
        }

        for remote in &incoming.remotes {
            match self.remotes.iter().find(|r| r.name == remote.name) {
                Some(existing) if existing == remote => {}
                Some(_) => {
                    return Err(FlotillaError::DuplicateRemote {
                        name: remote.name.clone(),
                        src: source,
                    });
                }
                None => self.remotes.push(remote.clone()),
            }
        }

        if let Some(default) = &incoming.default {
            match &self.default {
                None => self.default = Some(default.clone()),
                Some(existing) if existing == default => {}
                Some(_) => {
                    return Err(FlotillaError::DuplicateDefault { src: source });
                }
            }
        }

        if let Some(server) = &incoming.server {
            match &self.server {
                None => self.server = Some(server.clone()),
                Some(existing) if existing == server => {}
                Some(_) => {
                    return Err(FlotillaError::DuplicateServer { src: source });
                }
            }
        }

        // Defensive: the accumulator must not already hold a collision
        let mut paths: HashSet<String> = HashSet::new();
        for project in &self.projects {
            if !paths.insert(project.path.clone()) {
                return Err(FlotillaError::DuplicatePath {
                    path: project.path.clone(),
                    src: MERGED_SOURCE.to_string(),
                });
            }
        }

        for project in incoming.all_projects() {
            if paths.contains(&project.path) {
                return Err(FlotillaError::DuplicatePath {
                    path: project.path,
                    src: source,
                });
            }
            paths.insert(project.path.clone());
            self.projects.push(project);
        }

        let removed: HashSet<&str> = incoming
            .remove_projects
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        if !removed.is_empty() {
            self.projects.retain(|p| !removed.contains(p.name.as_str()));
        }

        // Last directive wins when one document names a project twice
        let mut extensions: HashMap<&str, &ExtendProject> = HashMap::new();
        for ext in &incoming.extend_projects {
            extensions.insert(ext.name.as_str(), ext);
        }
        for project in &mut self.projects {
            let Some(ext) = extensions.get(project.name.as_str()) else {
                continue;
            };
            if ext.path != project.path {
                continue;
            }
            match (&project.groups, &ext.groups) {
                (None, Some(extra)) => project.groups = Some(extra.clone()),
                (Some(own), Some(extra)) => {
                    project.groups = Some(format!("{},{}", own, extra));
                }
                _ => {}
            }
            if let Some(revision) = &ext.revision {
                if !revision.is_empty() {
                    project.revision = Some(revision.clone());
                }
            }
        }

        Ok(())
    }

    /// Get a remote by name
    pub fn get_remote(&self, name: &str) -> Option<&Remote> {
        self.remotes.iter().find(|r| r.name == name)
    }

    /// Get the remote named by the default block
    pub fn default_remote(&self) -> Option<&Remote> {
        let name = self.default.as_ref()?.remote.as_deref()?;
        self.get_remote(name)
    }

    /// Get the effective remote for a project
    pub fn project_remote(&self, project: &Project) -> Option<&Remote> {
        match &project.remote {
            Some(name) => self.get_remote(name),
            None => self.default_remote(),
        }
    }

    /// Get the effective revision for a project
    pub fn project_revision(&self, project: &Project) -> Option<String> {
        project
            .revision
            .clone()
            .or_else(|| self.default.as_ref().and_then(|d| d.revision.clone()))
    }
}

/// Fold an ordered document sequence into one manifest, from empty
pub fn merge_all(documents: Vec<Manifest>) -> Result<ResolvedManifest> {
    let mut resolved = ResolvedManifest::default();
    for document in documents {
        resolved.merge(document)?;
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc(source: &str, xml: &str) -> Manifest {
        let mut manifest = Manifest::parse(xml).unwrap();
        manifest.source_file = PathBuf::from(source);
        manifest
    }

    #[test]
    fn test_identical_remotes_merge_to_one() {
        let a = doc(
            "a.xml",
            r#"<manifest><remote name="origin" fetch="https://example.com" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><remote name="origin" fetch="https://example.com" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.remotes.len(), 1);
        assert_eq!(resolved.remotes[0].name, "origin");
    }

    #[test]
    fn test_conflicting_remotes_fail() {
        let a = doc(
            "a.xml",
            r#"<manifest><remote name="origin" fetch="https://example.com" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><remote name="origin" fetch="https://other.com" /></manifest>"#,
        );

        let err = merge_all(vec![a, b]).unwrap_err();
        match err {
            FlotillaError::DuplicateRemote { name, src } => {
                assert_eq!(name, "origin");
                assert_eq!(src, "b.xml");
            }
            other => panic!("expected DuplicateRemote, got {:?}", other),
        }
    }

    #[test]
    fn test_notice_first_writer_wins_and_identical_repeat_is_noop() {
        let a = doc("a.xml", "<manifest><notice>hello</notice></manifest>");
        let b = doc("b.xml", "<manifest><notice>hello</notice></manifest>");

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.notice.as_deref(), Some("hello"));
    }

    #[test]
    fn test_differing_notice_fails() {
        let a = doc("a.xml", "<manifest><notice>hello</notice></manifest>");
        let b = doc("b.xml", "<manifest><notice>goodbye</notice></manifest>");

        let err = merge_all(vec![a, b]).unwrap_err();
        assert!(matches!(
            err,
            FlotillaError::DuplicateNotice { src } if src == "b.xml"
        ));
    }

    #[test]
    fn test_default_identical_repeat_is_noop() {
        let a = doc(
            "a.xml",
            r#"<manifest><default remote="origin" revision="main" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><default remote="origin" revision="main" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        let default = resolved.default.unwrap();
        assert_eq!(default.remote.as_deref(), Some("origin"));
        assert_eq!(default.revision.as_deref(), Some("main"));
    }

    #[test]
    fn test_differing_default_fails() {
        let a = doc(
            "a.xml",
            r#"<manifest><default remote="origin" revision="main" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><default remote="origin" revision="dev" /></manifest>"#,
        );

        let err = merge_all(vec![a, b]).unwrap_err();
        assert!(matches!(err, FlotillaError::DuplicateDefault { .. }));
    }

    #[test]
    fn test_differing_server_fails() {
        let a = doc(
            "a.xml",
            r#"<manifest><manifest-server url="https://one.example.com" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><manifest-server url="https://two.example.com" /></manifest>"#,
        );

        let err = merge_all(vec![a, b]).unwrap_err();
        assert!(matches!(err, FlotillaError::DuplicateServer { .. }));
    }

    #[test]
    fn test_duplicate_path_across_documents_fails() {
        let a = doc(
            "a.xml",
            r#"<manifest><project name="first" path="libs/foo" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><project name="second" path="libs/foo" /></manifest>"#,
        );

        let err = merge_all(vec![a, b]).unwrap_err();
        match err {
            FlotillaError::DuplicatePath { path, src } => {
                assert_eq!(path, "libs/foo");
                assert_eq!(src, "b.xml");
            }
            other => panic!("expected DuplicatePath, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_path_within_one_document_fails() {
        let a = doc(
            "a.xml",
            r#"<manifest>
                <project name="parent" path="libs">
                    <project name="child" path="foo" />
                </project>
                <project name="other" path="libs/foo" />
            </manifest>"#,
        );

        let err = merge_all(vec![a]).unwrap_err();
        assert!(matches!(
            err,
            FlotillaError::DuplicatePath { path, src }
                if path == "libs/foo" && src == "a.xml"
        ));
    }

    #[test]
    fn test_nested_projects_are_flattened_into_the_result() {
        let a = doc(
            "a.xml",
            r#"<manifest>
                <project name="base-repo" path="base">
                    <project name="sub-repo" path="sub" />
                </project>
            </manifest>"#,
        );

        let resolved = merge_all(vec![a]).unwrap();
        let paths: Vec<&str> = resolved.projects.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["base", "base/sub"]);
    }

    #[test]
    fn test_remove_project_drops_every_path_with_that_name() {
        let a = doc(
            "a.xml",
            r#"<manifest>
                <project name="foo" path="one" />
                <project name="foo" path="two" />
                <project name="bar" path="three" />
            </manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><remove-project name="foo" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.projects.len(), 1);
        assert_eq!(resolved.projects[0].name, "bar");
    }

    #[test]
    fn test_removed_project_can_be_redeclared_by_a_later_document() {
        let a = doc(
            "a.xml",
            r#"<manifest><project name="foo" path="old" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><remove-project name="foo" /></manifest>"#,
        );
        let c = doc(
            "c.xml",
            r#"<manifest><project name="foo" path="new" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b, c]).unwrap();
        assert_eq!(resolved.projects.len(), 1);
        assert_eq!(resolved.projects[0].path, "new");
    }

    #[test]
    fn test_extend_project_unions_groups() {
        let a = doc(
            "a.xml",
            r#"<manifest><project name="foo" path="libs/foo" groups="core" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><extend-project name="foo" path="libs/foo" groups="extra" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.projects[0].groups.as_deref(), Some("core,extra"));
    }

    #[test]
    fn test_extend_project_adopts_groups_when_project_has_none() {
        let a = doc(
            "a.xml",
            r#"<manifest><project name="foo" path="libs/foo" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><extend-project name="foo" path="libs/foo" groups="extra" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.projects[0].groups.as_deref(), Some("extra"));
    }

    #[test]
    fn test_extend_project_with_wrong_path_applies_nothing() {
        let a = doc(
            "a.xml",
            r#"<manifest><project name="foo" path="libs/foo" groups="core" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><extend-project name="foo" path="elsewhere" groups="extra" revision="v2" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.projects[0].groups.as_deref(), Some("core"));
        assert_eq!(resolved.projects[0].revision, None);
    }

    #[test]
    fn test_extend_project_overrides_revision() {
        let a = doc(
            "a.xml",
            r#"<manifest><project name="foo" path="libs/foo" revision="main" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest><extend-project name="foo" path="libs/foo" revision="release" /></manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.projects[0].revision.as_deref(), Some("release"));
    }

    #[test]
    fn test_last_extend_directive_wins_within_a_document() {
        let a = doc(
            "a.xml",
            r#"<manifest><project name="foo" path="libs/foo" /></manifest>"#,
        );
        let b = doc(
            "b.xml",
            r#"<manifest>
                <extend-project name="foo" path="libs/foo" revision="first" />
                <extend-project name="foo" path="libs/foo" revision="second" />
            </manifest>"#,
        );

        let resolved = merge_all(vec![a, b]).unwrap();
        assert_eq!(resolved.projects[0].revision.as_deref(), Some("second"));
    }

    #[test]
    fn test_repo_hooks_are_not_folded() {
        let a = doc(
            "a.xml",
            r#"<manifest>
                <repo-hooks in-project="tools/hooks" enabled-list="pre-upload" />
                <project name="foo" path="libs/foo" />
            </manifest>"#,
        );

        let resolved = merge_all(vec![a]).unwrap();
        // The resolved form carries no hooks; the parsed document does.
        assert_eq!(resolved.projects.len(), 1);
        let json = serde_json::to_value(&resolved).unwrap();
        assert!(json.get("repo_hooks").is_none());
    }

    #[test]
    fn test_merge_all_of_nothing_is_empty() {
        let resolved = merge_all(vec![]).unwrap();
        assert_eq!(resolved, ResolvedManifest::default());
    }

    #[test]
    fn test_effective_settings_helpers() {
        let a = doc(
            "a.xml",
            r#"<manifest>
                <remote name="origin" fetch="https://github.com/org" />
                <remote name="mirror" fetch="https://mirror.example.com" />
                <default remote="origin" revision="main" />
                <project name="plain" path="plain" />
                <project name="pinned" path="pinned" remote="mirror" revision="v1.2" />
            </manifest>"#,
        );

        let resolved = merge_all(vec![a]).unwrap();
        let plain = &resolved.projects[0];
        let pinned = &resolved.projects[1];

        assert_eq!(resolved.default_remote().unwrap().name, "origin");
        assert_eq!(resolved.project_remote(plain).unwrap().name, "origin");
        assert_eq!(resolved.project_remote(pinned).unwrap().name, "mirror");
        assert_eq!(resolved.project_revision(plain).as_deref(), Some("main"));
        assert_eq!(resolved.project_revision(pinned).as_deref(), Some("v1.2"));
    }
}
