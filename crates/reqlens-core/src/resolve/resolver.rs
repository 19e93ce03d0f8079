use crate::cache::{CachedResolution, ResolutionCache};
use crate::error::ResolveError;
use crate::models::{
    as_enum_sentinel, BindingSource, ClassProperty, Document, Endpoint, EnumInfo, ResolutionState,
};
use crate::parsers::csharp::{self, TypeDeclFinder, TypeDeclKind};
use crate::parsers::types::{is_file_like, is_simple_type, looks_like_enum, unwrap_type};
use crate::resolve::{CancelFlag, WorkspaceFiles};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Lines of context kept above a declaration in definition snippets,
/// enough to pick up `///` summaries
const SNIPPET_CONTEXT_LINES: usize = 3;

/// Everything learned about one type declaration
struct ResolvedShape {
    properties: Vec<ClassProperty>,
    definition_text: String,
}

/// Resolves declared C# type names to property trees by searching source
/// text, never symbol tables.
///
/// Lookup order: the originating document, then workspace files in
/// enumeration order, first declaration wins. Results and failures are both
/// cached against the origin file's content fingerprint.
pub struct TypeResolver<W: WorkspaceFiles> {
    workspace: W,
    cache: ResolutionCache,
    cancel: CancelFlag,
}

impl<W: WorkspaceFiles> TypeResolver<W> {
    /// Creates a resolver over a workspace
    pub fn new(workspace: W) -> Self {
        Self {
            workspace,
            cache: ResolutionCache::new(),
            cancel: CancelFlag::new(),
        }
    }

    /// Shares a cancellation flag with the host
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Read access to the cache, mostly for diagnostics
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Drops cached results originating from `file` (call on save)
    pub fn invalidate_file(&mut self, file: &str) {
        self.cache.invalidate_file(file);
    }

    /// Drops one type from the cache everywhere (manual re-resolution)
    pub fn invalidate_type(&mut self, type_name: &str) {
        self.cache.invalidate_type(type_name);
    }

    /// Resolves every body- and form-bound complex parameter of an endpoint
    /// in place.
    ///
    /// Already-attempted parameters are skipped without I/O, except failed
    /// ones whose type looks like an enum: those get one more chance, since
    /// half-typed enums are the common reason for a stale failure.
    pub fn resolve_parameters(
        &mut self,
        endpoint: &mut Endpoint,
        origin: &Document,
    ) -> Result<(), ResolveError> {
        for param in &mut endpoint.parameters {
            if self.cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }
            if !matches!(param.source, BindingSource::Body | BindingSource::Form) {
                continue;
            }

            let bare = unwrap_type(&param.declared_type);
            if is_simple_type(&bare) || is_file_like(&param.declared_type) {
                continue;
            }

            if param.resolution.is_attempted() {
                let retriable = param.resolution.is_failed() && looks_like_enum(&bare, &param.name);
                if !retriable {
                    continue;
                }
            }

            match self.resolve(&bare, origin)? {
                Some(properties) => {
                    param.definition_text = self
                        .cache
                        .definition_text(&origin.path, &bare, &origin.text)
                        .map(|s| s.to_string());
                    param.resolution = ResolutionState::Resolved(properties);
                }
                None => {
                    debug!(type_name = %bare, parameter = %param.name, "type did not resolve");
                    param.resolution = ResolutionState::Failed;
                }
            }
        }
        Ok(())
    }

    /// Resolves a type name to its property tree.
    ///
    /// `Ok(None)` means "searched and found nothing usable"; the outcome is
    /// recorded so the search does not rerun until the origin file changes.
    /// Cancellation aborts with an error and records nothing.
    pub fn resolve(
        &mut self,
        type_name: &str,
        origin: &Document,
    ) -> Result<Option<Vec<ClassProperty>>, ResolveError> {
        let bare = unwrap_type(type_name);
        if is_simple_type(&bare) {
            return Ok(None);
        }

        match self.cache.get(&origin.path, &bare, &origin.text) {
            Some(CachedResolution::Success(properties)) => {
                debug!(type_name = %bare, "resolution served from cache");
                return Ok(Some(properties.clone()));
            }
            // Cached failures stand, unless the name smells like an enum
            // that may have been finished typing since
            Some(CachedResolution::Failure) if !looks_like_enum(&bare, "") => return Ok(None),
            _ => {}
        }

        let mut visited = HashSet::new();
        visited.insert(bare.clone());

        match self.lookup(&bare, origin, &mut visited)? {
            Some(shape) => {
                self.cache.insert(
                    &origin.path,
                    &bare,
                    &origin.text,
                    CachedResolution::Success(shape.properties.clone()),
                    Some(shape.definition_text),
                );
                Ok(Some(shape.properties))
            }
            None => {
                self.cache
                    .insert(&origin.path, &bare, &origin.text, CachedResolution::Failure, None);
                Ok(None)
            }
        }
    }

    /// Resolves a type name expected to denote an enum.
    ///
    /// Goes through the same lookup and cache as [`resolve`](Self::resolve);
    /// a class match yields `Ok(None)` here, the same as no match at all.
    pub fn resolve_enum(
        &mut self,
        type_name: &str,
        origin: &Document,
    ) -> Result<Option<EnumInfo>, ResolveError> {
        let properties = self.resolve(type_name, origin)?;
        Ok(properties.as_deref().and_then(as_enum_sentinel).cloned())
    }

    /// Raw definition text of a type as last cached by a successful resolve
    pub fn definition_text(&self, type_name: &str, origin: &Document) -> Option<&str> {
        let bare = unwrap_type(type_name);
        self.cache.definition_text(&origin.path, &bare, &origin.text)
    }

    /// Origin document first, then the workspace in enumeration order
    fn lookup(
        &mut self,
        type_name: &str,
        origin: &Document,
        visited: &mut HashSet<String>,
    ) -> Result<Option<ResolvedShape>, ResolveError> {
        let finder = TypeDeclFinder::new(type_name);

        if let Some(shape) = self.extract_from(origin, &finder, type_name, visited)? {
            return Ok(Some(shape));
        }

        for path in self.workspace.enumerate() {
            if self.cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }

            let path_str = path.to_string_lossy().into_owned();
            if path_str == origin.path {
                continue;
            }

            let text = match self.workspace.read(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            if self.cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }

            let doc = Document::new(path_str, text);
            if let Some(shape) = self.extract_from(&doc, &finder, type_name, visited)? {
                debug!(type_name, found_in = %doc.path, "type resolved");
                return Ok(Some(shape));
            }
        }

        Ok(None)
    }

    /// Parses one document for the type's declaration and, for classes,
    /// recursively resolves complex property types with this document as
    /// the locality hint.
    fn extract_from(
        &mut self,
        doc: &Document,
        finder: &TypeDeclFinder,
        type_name: &str,
        visited: &mut HashSet<String>,
    ) -> Result<Option<ResolvedShape>, ResolveError> {
        if !finder.matches_text(&doc.text) {
            return Ok(None);
        }

        let lines = doc.lines();
        let Some(decl) = finder.find(&lines) else {
            return Ok(None);
        };
        let Some(body) = csharp::body_range(&lines, decl.line) else {
            return Ok(None);
        };

        let definition_text =
            csharp::definition_snippet(&lines, decl.line, body.close_line, SNIPPET_CONTEXT_LINES);
        let body_lines = &lines[body.open_line + 1..body.close_line.min(lines.len())];

        match decl.kind {
            TypeDeclKind::Enum => {
                let members = csharp::enum_members(body_lines);
                if members.is_empty() {
                    return Ok(None);
                }
                let info = EnumInfo {
                    first_value: members[0].clone(),
                    values: members,
                };
                Ok(Some(ResolvedShape {
                    properties: vec![ClassProperty::enum_sentinel(type_name, info)],
                    definition_text,
                }))
            }
            TypeDeclKind::ClassLike => {
                let mut properties: Vec<ClassProperty> = body_lines
                    .iter()
                    .filter_map(|line| csharp::parse_auto_property(line))
                    .map(|auto| {
                        let required = !auto.declared_type.contains('?');
                        ClassProperty::leaf(auto.name, auto.declared_type, required)
                    })
                    .collect();

                // A body with no auto-properties gives callers nothing to
                // synthesize from; treat it like a miss
                if properties.is_empty() {
                    return Ok(None);
                }

                for prop in &mut properties {
                    let bare = unwrap_type(&prop.declared_type);
                    if is_simple_type(&bare) || visited.contains(&bare) {
                        continue;
                    }
                    visited.insert(bare.clone());

                    if let Some(child) = self.lookup(&bare, doc, visited)? {
                        if let Some(info) = as_enum_sentinel(&child.properties) {
                            prop.enum_info = Some(info.clone());
                        } else {
                            prop.properties = child.properties;
                        }
                    }
                }

                Ok(Some(ResolvedShape {
                    properties,
                    definition_text,
                }))
            }
        }
    }
}
