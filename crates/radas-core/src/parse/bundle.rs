use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{DocumentFormat, parse_value};
use crate::error::ResolveError;

/// Component sections whose external targets are copied in place instead of
/// being imported as named schemas.
const INLINE_SECTIONS: &[&str] = &[
    "parameters",
    "responses",
    "requestBodies",
    "headers",
    "examples",
    "pathItems",
];

const LOCAL_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Where a node sits in the root document. Path items and component schemas
/// receive external targets inline; everything else gets a local reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location<'a> {
    Root,
    Components,
    ComponentSchemas,
    ComponentSchema(&'a str),
    Paths,
    PathItem,
    Other,
}

impl<'a> Location<'a> {
    fn child(self, key: &'a str) -> Location<'a> {
        match (self, key) {
            (Location::Root, "components") => Location::Components,
            (Location::Root, "paths") => Location::Paths,
            (Location::Components, "schemas") => Location::ComponentSchemas,
            (Location::ComponentSchemas, name) => Location::ComponentSchema(name),
            (Location::Paths, _) => Location::PathItem,
            _ => Location::Other,
        }
    }
}

/// Pulls every file-relative `$ref` into a single self-contained document.
///
/// Schema targets are imported into `components.schemas` under their last
/// pointer segment (or the file stem for whole-file references) and the
/// reference is rewritten to a local one. Parameter, response, request body
/// and path item targets are copied in place. Remote `http(s)` references are
/// left untouched.
pub struct Bundler {
    root_path: PathBuf,
    documents: HashMap<PathBuf, Value>,
    imported: HashMap<(PathBuf, String), String>,
    taken: HashSet<String>,
    schemas: Map<String, Value>,
    inlining: Vec<(PathBuf, String)>,
}

impl Bundler {
    pub fn new(root_path: &Path) -> Self {
        Self {
            root_path: canonical(root_path),
            documents: HashMap::new(),
            imported: HashMap::new(),
            taken: HashSet::new(),
            schemas: Map::new(),
            inlining: Vec::new(),
        }
    }

    /// Bundle `root`, which was read from the path given to [`Bundler::new`].
    pub fn bundle(mut self, mut root: Value) -> Result<Value, ResolveError> {
        if let Some(existing) = root
            .pointer("/components/schemas")
            .and_then(Value::as_object)
        {
            self.taken.extend(existing.keys().cloned());
        }

        let root_path = self.root_path.clone();
        self.rewrite(&mut root, &root_path, true, Location::Root)?;

        if !self.schemas.is_empty() {
            log::debug!("bundled {} external schema(s)", self.schemas.len());
            if let Some(schemas) = root
                .as_object_mut()
                .and_then(|map| object_entry(map, "components"))
                .and_then(|map| object_entry(map, "schemas"))
            {
                schemas.extend(std::mem::take(&mut self.schemas));
            }
        }
        Ok(root)
    }

    fn rewrite(
        &mut self,
        value: &mut Value,
        base: &Path,
        in_root: bool,
        location: Location<'_>,
    ) -> Result<(), ResolveError> {
        if let Some(reference) = value.get("$ref").and_then(Value::as_str) {
            let reference = reference.to_string();
            return self.rewrite_ref(value, &reference, base, in_root, location);
        }

        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    let child_location = if in_root {
                        location.child(key)
                    } else {
                        Location::Other
                    };
                    self.rewrite(child, base, in_root, child_location)?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.rewrite(item, base, in_root, Location::Other)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn rewrite_ref(
        &mut self,
        node: &mut Value,
        reference: &str,
        base: &Path,
        in_root: bool,
        location: Location<'_>,
    ) -> Result<(), ResolveError> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            log::warn!("remote reference {reference} is not fetched; it will be treated as unknown");
            return Ok(());
        }

        let (file_part, pointer) = match reference.split_once('#') {
            Some((file, pointer)) => (file, pointer.to_string()),
            None => (reference, String::new()),
        };

        let file = if file_part.is_empty() {
            if in_root {
                return Ok(());
            }
            base.to_path_buf()
        } else {
            let dir = base.parent().unwrap_or_else(|| Path::new("."));
            canonical(&dir.join(file_part))
        };

        if file == self.root_path {
            *node = ref_node(&format!("#{pointer}"));
            return Ok(());
        }

        let key = (file.clone(), pointer.clone());
        if location == Location::PathItem || is_inline_section(&pointer) {
            return self.inline(node, key);
        }

        if let Location::ComponentSchema(name) = location
            && !self.imported.contains_key(&key)
        {
            log::debug!("inlining {reference} as component schema {name}");
            self.imported.insert(key.clone(), name.to_string());
            return self.inline(node, key);
        }

        let name = self.import_schema(key)?;
        *node = ref_node(&format!("{LOCAL_SCHEMA_PREFIX}{name}"));
        Ok(())
    }

    fn inline(&mut self, node: &mut Value, key: (PathBuf, String)) -> Result<(), ResolveError> {
        if self.inlining.contains(&key) {
            return Err(ResolveError::CircularRef(display_ref(&key)));
        }
        let mut target = self.target(&key.0, &key.1)?;
        self.inlining.push(key.clone());
        let result = self.rewrite(&mut target, &key.0, false, Location::Other);
        self.inlining.pop();
        result?;
        *node = target;
        Ok(())
    }

    fn import_schema(&mut self, key: (PathBuf, String)) -> Result<String, ResolveError> {
        if let Some(name) = self.imported.get(&key) {
            return Ok(name.clone());
        }

        let base_name = key
            .1
            .rsplit('/')
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| {
                key.0
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "External".to_string());
        let name = self.unique_name(&base_name);
        log::debug!("importing {} as {name}", display_ref(&key));

        // Registered before recursing so self-referencing schemas terminate.
        self.imported.insert(key.clone(), name.clone());
        let mut target = self.target(&key.0, &key.1)?;
        self.rewrite(&mut target, &key.0, false, Location::Other)?;
        self.schemas.insert(name.clone(), target);
        Ok(name)
    }

    fn unique_name(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}{n}");
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }

    fn target(&mut self, file: &Path, pointer: &str) -> Result<Value, ResolveError> {
        let document = self.document(file)?;
        document
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| ResolveError::RefTargetNotFound(format!("{}#{pointer}", file.display())))
    }

    fn document(&mut self, file: &Path) -> Result<&Value, ResolveError> {
        if !self.documents.contains_key(file) {
            let text = fs::read_to_string(file).map_err(|source| ResolveError::ExternalRead {
                path: file.to_path_buf(),
                source,
            })?;
            let value = parse_value(&text, DocumentFormat::from_path(file)).map_err(|source| {
                ResolveError::ExternalParse {
                    path: file.to_path_buf(),
                    source,
                }
            })?;
            log::debug!("loaded referenced document {}", file.display());
            self.documents.insert(file.to_path_buf(), value);
        }
        self.documents
            .get(file)
            .ok_or_else(|| ResolveError::RefTargetNotFound(file.display().to_string()))
    }
}

/// Bundle a document read from `root_path`.
pub fn bundle(root: Value, root_path: &Path) -> Result<Value, ResolveError> {
    Bundler::new(root_path).bundle(root)
}

fn is_inline_section(pointer: &str) -> bool {
    let segments: Vec<&str> = pointer.split('/').filter(|s| !s.is_empty()).collect();
    segments.len() >= 2 && INLINE_SECTIONS.contains(&segments[segments.len() - 2])
}

fn ref_node(reference: &str) -> Value {
    let mut map = Map::new();
    map.insert("$ref".to_string(), Value::String(reference.to_string()));
    Value::Object(map)
}

fn object_entry<'m>(map: &'m mut Map<String, Value>, key: &str) -> Option<&'m mut Map<String, Value>> {
    let entry = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut()
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn display_ref(key: &(PathBuf, String)) -> String {
    format!("{}#{}", key.0.display(), key.1)
}
