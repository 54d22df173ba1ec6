//! XML parser for manifest documents
//!
//! Purely structural: each element's attributes are copied into the document
//! model, unknown elements and attributes are ignored, and absent optional
//! attributes stay `None`. Nested `<project>` elements are tracked with an
//! explicit stack so sub-projects land under their parent in declaration
//! order.

use crate::manifest::model::{
    Annotation, CopyFile, ExtendProject, Include, LinkFile, Manifest, ManifestDefault,
    ManifestServer, Project, ProjectTree, Remote, RemoveProject, RepoHooks,
};
use crate::{FlotillaError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

impl Manifest {
    /// Parse a manifest from XML content
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut manifest = Manifest::default();
        // Open <project> elements, innermost last
        let mut stack: Vec<ProjectTree> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"notice" => {
                        let text = reader.read_text(e.name()).map_err(|e| {
                            FlotillaError::Parse(format!("invalid notice text: {}", e))
                        })?;
                        manifest.notice = Some(text.trim().to_string());
                    }
                    b"project" => stack.push(ProjectTree {
                        project: parse_project(e)?,
                        projects: Vec::new(),
                    }),
                    _ => parse_flat_element(&mut manifest, &mut stack, e)?,
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"project" => {
                        let node = ProjectTree {
                            project: parse_project(e)?,
                            projects: Vec::new(),
                        };
                        attach_project(&mut manifest, &mut stack, node);
                    }
                    _ => parse_flat_element(&mut manifest, &mut stack, e)?,
                },
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"project" {
                        if let Some(node) = stack.pop() {
                            attach_project(&mut manifest, &mut stack, node);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(FlotillaError::Parse(format!(
                        "Error parsing manifest XML: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(manifest)
    }

    /// Parse a manifest from a file, recording it as the document's source
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FlotillaError::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut manifest = Self::parse(&content).map_err(|e| match e {
            FlotillaError::Parse(msg) => {
                FlotillaError::Parse(format!("in '{}': {}", path.display(), msg))
            }
            other => other,
        })?;
        manifest.source_file = path.to_path_buf();
        Ok(manifest)
    }
}

/// Finished `<project>` node: hang it under its parent, or on the manifest
fn attach_project(manifest: &mut Manifest, stack: &mut Vec<ProjectTree>, node: ProjectTree) {
    match stack.last_mut() {
        Some(parent) => parent.projects.push(node),
        None => manifest.projects.push(node),
    }
}

/// Handle every element that carries no nested projects
fn parse_flat_element(
    manifest: &mut Manifest,
    stack: &mut Vec<ProjectTree>,
    e: &BytesStart,
) -> Result<()> {
    match e.name().as_ref() {
        b"remote" => manifest.remotes.push(parse_remote(e)?),
        b"default" => manifest.default = Some(parse_default(e)?),
        b"manifest-server" => manifest.server = Some(parse_server(e)?),
        b"remove-project" => manifest.remove_projects.push(RemoveProject {
            name: require_attr(e, b"name")?,
        }),
        b"extend-project" => manifest.extend_projects.push(parse_extend(e)?),
        b"repo-hooks" => {
            manifest.repo_hooks = Some(RepoHooks {
                in_project: get_attr(e, b"in-project")?,
                enabled_list: get_attr(e, b"enabled-list")?,
            })
        }
        b"include" => manifest.includes.push(Include {
            name: require_attr(e, b"name")?,
        }),
        b"annotation" => {
            if let Some(node) = stack.last_mut() {
                node.project.annotations.push(parse_annotation(e)?);
            }
        }
        b"copyfile" => {
            if let Some(node) = stack.last_mut() {
                node.project.copy_files.push(CopyFile {
                    src: require_attr(e, b"src")?,
                    dest: require_attr(e, b"dest")?,
                });
            }
        }
        b"linkfile" => {
            if let Some(node) = stack.last_mut() {
                node.project.link_files.push(LinkFile {
                    src: require_attr(e, b"src")?,
                    dest: require_attr(e, b"dest")?,
                });
            }
        }
        // Unknown elements are ignored
        _ => {}
    }
    Ok(())
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FlotillaError::Parse(format!("Invalid attribute: {}", e)))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| FlotillaError::Parse(format!("Invalid attribute value: {}", e)))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart, name: &[u8]) -> Result<String> {
    get_attr(e, name)?.ok_or_else(|| {
        FlotillaError::Parse(format!(
            "Missing required attribute '{}' on <{}>",
            String::from_utf8_lossy(name),
            String::from_utf8_lossy(e.name().as_ref())
        ))
    })
}

fn parse_remote(e: &BytesStart) -> Result<Remote> {
    Ok(Remote {
        name: require_attr(e, b"name")?,
        fetch: require_attr(e, b"fetch")?,
        alias: get_attr(e, b"alias")?,
        push_url: get_attr(e, b"pushurl")?,
        review: get_attr(e, b"review")?,
        revision: get_attr(e, b"revision")?,
    })
}

fn parse_default(e: &BytesStart) -> Result<ManifestDefault> {
    Ok(ManifestDefault {
        remote: get_attr(e, b"remote")?,
        revision: get_attr(e, b"revision")?,
        dest_branch: get_attr(e, b"dest-branch")?,
        upstream: get_attr(e, b"upstream")?,
        sync_j: get_attr(e, b"sync-j")?,
        sync_c: get_attr(e, b"sync-c")?,
        sync_s: get_attr(e, b"sync-s")?,
        sync_tags: get_attr(e, b"sync-tags")?,
    })
}

fn parse_server(e: &BytesStart) -> Result<ManifestServer> {
    Ok(ManifestServer {
        url: require_attr(e, b"url")?,
    })
}

fn parse_project(e: &BytesStart) -> Result<Project> {
    Ok(Project {
        name: require_attr(e, b"name")?,
        path: require_attr(e, b"path")?,
        remote: get_attr(e, b"remote")?,
        revision: get_attr(e, b"revision")?,
        dest_branch: get_attr(e, b"dest-branch")?,
        groups: get_attr(e, b"groups")?,
        sync_c: get_attr(e, b"sync-c")?,
        sync_s: get_attr(e, b"sync-s")?,
        sync_tags: get_attr(e, b"sync-tags")?,
        upstream: get_attr(e, b"upstream")?,
        clone_depth: get_attr(e, b"clone-depth")?,
        force_path: get_attr(e, b"force-path")?,
        annotations: Vec::new(),
        copy_files: Vec::new(),
        link_files: Vec::new(),
    })
}

fn parse_extend(e: &BytesStart) -> Result<ExtendProject> {
    Ok(ExtendProject {
        name: require_attr(e, b"name")?,
        // An absent path never matches a project, since project paths are
        // required to be non-empty.
        path: get_attr(e, b"path")?.unwrap_or_default(),
        groups: get_attr(e, b"groups")?,
        revision: get_attr(e, b"revision")?,
    })
}

fn parse_annotation(e: &BytesStart) -> Result<Annotation> {
    Ok(Annotation {
        name: require_attr(e, b"name")?,
        value: require_attr(e, b"value")?,
        keep: get_attr(e, b"keep")?,
    })
}
