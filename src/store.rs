//! Layer Store
//!
//! Maps relative layer paths onto directories below a root and mediates all
//! access to the `config.json` document stored in each of them.
//!
//! ```text
//! <root>/
//!   config.json
//!   <layer>/
//!     config.json
//!     <nested-layer>/
//!       config.json
//! ```
//!
//! Every operation holds shared locks on the directories from the store root
//! down to its layer. Initialization holds its layer directory exclusively, so
//! a reset never races work below it. Document reads share the document lock
//! and a read-modify-write holds it exclusively. Locks come from a
//! [`LockRegistry`] owned by the store and shared with the stores returned by
//! [`LayerStore::sublayer`].

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use walkdir::WalkDir;

use crate::document::{self, Document, DOCUMENT_FILE};
use crate::error::{LayerError, Result};
use crate::locks::{Access, LockRegistry};

/// Options for [`LayerStore::init_layer`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Document written when the layer has none yet.
    pub document: Document,

    /// Whether the layer should get a document at all.
    pub need_document: bool,

    /// Remove the layer directory and everything below it first.
    pub reset: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl InitOptions {
    /// Empty document, document required, no reset.
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            need_document: true,
            reset: false,
        }
    }

    /// Use `document` as the initial document.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    /// Create the directory only.
    pub fn without_document(mut self) -> Self {
        self.need_document = false;
        self
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

/// Hierarchical configuration store anchored at a root directory.
#[derive(Debug, Clone)]
pub struct LayerStore {
    root: PathBuf,
    /// Root of the store that created the lock registry.
    lock_root: PathBuf,
    locks: Arc<LockRegistry>,
}

impl LayerStore {
    /// Create a store rooted at `root`. No filesystem access happens here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            lock_root: root.clone(),
            root,
            locks: Arc::new(LockRegistry::new()),
        }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the lock registry used by this store.
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// Resolve a relative layer path against the root.
    ///
    /// An empty path (or `.`) is the root layer itself. Absolute paths and
    /// `..` components are rejected.
    fn resolve(&self, layer: &str) -> Result<PathBuf> {
        let mut target = self.root.clone();

        for component in Path::new(layer).components() {
            match component {
                Component::Normal(segment) => target.push(segment),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(LayerError::InvalidLayerPath {
                        path: PathBuf::from(layer),
                        reason: "parent directory components are not allowed".to_string(),
                    })
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(LayerError::InvalidLayerPath {
                        path: PathBuf::from(layer),
                        reason: "layer paths must be relative".to_string(),
                    })
                }
            }
        }

        debug!("Resolved layer '{}' to {}", layer, target.display());
        Ok(target)
    }

    /// Lock plan for `dir`: every directory from the lock root down to it,
    /// outermost first, with `dir` itself held as `access`.
    fn lock_plan(&self, dir: &Path, access: Access) -> Vec<(PathBuf, Access)> {
        let mut plan = vec![(self.lock_root.clone(), Access::Shared)];

        match dir.strip_prefix(&self.lock_root) {
            Ok(relative) => {
                let mut current = self.lock_root.clone();
                for component in relative.components() {
                    current.push(component);
                    plan.push((current.clone(), Access::Shared));
                }
            }
            Err(_) => plan.push((dir.to_path_buf(), Access::Shared)),
        }

        if let Some(last) = plan.last_mut() {
            last.1 = access;
        }
        plan
    }

    /// Create a layer directory and, unless disabled, its initial document.
    ///
    /// Existing directories are reused and an existing document is never
    /// overwritten. With `reset`, the layer and all its sub-layers are
    /// removed first. Steps completed before a failure are not rolled back.
    pub fn init_layer(&self, layer: &str, options: InitOptions) -> Result<()> {
        let target = self.resolve(layer)?;
        let document_path = target.join(DOCUMENT_FILE);
        let plan = self.lock_plan(&target, Access::Exclusive);

        self.locks.with_locks(&plan, || -> Result<()> {
            if options.reset && target.exists() {
                info!("Resetting layer: {}", target.display());
                fs::remove_dir_all(&target).map_err(|e| LayerError::DirectoryRemove {
                    path: target.clone(),
                    source: e,
                })?;
            }

            fs::create_dir_all(&target).map_err(|e| LayerError::DirectoryCreate {
                path: target.clone(),
                source: e,
            })?;

            if options.need_document && !document_path.exists() {
                info!("Creating document: {}", document_path.display());
                document::save(&document_path, &options.document)?;
            }

            Ok(())
        })
    }

    /// Get the directory of a layer.
    ///
    /// With `ensure_exists`, fails with `LayerNotFound` unless the directory
    /// is present. Without it, no filesystem access happens.
    pub fn layer_dir(&self, layer: &str, ensure_exists: bool) -> Result<PathBuf> {
        let target = self.resolve(layer)?;

        if ensure_exists && !target.is_dir() {
            return Err(LayerError::LayerNotFound { path: target });
        }

        Ok(target)
    }

    /// Get the path of a layer's document.
    ///
    /// The layer directory itself is not checked; with `ensure_exists`, the
    /// document file must be present.
    pub fn document_path(&self, layer: &str, ensure_exists: bool) -> Result<PathBuf> {
        let target = self.resolve(layer)?.join(DOCUMENT_FILE);

        if ensure_exists && !target.exists() {
            return Err(LayerError::DocumentNotFound { path: target });
        }

        Ok(target)
    }

    /// Run `f` on a layer's document path while holding its lock as `access`.
    fn with_document<T>(
        &self,
        layer: &str,
        access: Access,
        f: impl FnOnce(&Path) -> Result<T>,
    ) -> Result<T> {
        let dir = self.resolve(layer)?;
        let path = dir.join(DOCUMENT_FILE);

        let mut plan = self.lock_plan(&dir, Access::Shared);
        plan.push((path.clone(), access));

        self.locks.with_locks(&plan, || {
            if !path.exists() {
                return Err(LayerError::DocumentNotFound { path: path.clone() });
            }
            f(&path)
        })
    }

    /// Read a layer's whole document.
    pub fn read_document(&self, layer: &str) -> Result<Document> {
        self.with_document(layer, Access::Shared, document::load)
    }

    /// Get the value bound to `key` in a layer's document.
    ///
    /// A missing key yields `default` when one is given, otherwise
    /// `KeyNotFound`.
    pub fn get_value(&self, layer: &str, key: &str, default: Option<Value>) -> Result<Value> {
        let (path, mut document) = self.with_document(layer, Access::Shared, |path| {
            Ok((path.to_path_buf(), document::load(path)?))
        })?;

        match document.remove(key) {
            Some(value) => Ok(value),
            None => default.ok_or_else(|| LayerError::KeyNotFound {
                key: key.to_string(),
                path,
            }),
        }
    }

    /// Get a value and deserialize it into `T`.
    pub fn get_typed<T: DeserializeOwned>(&self, layer: &str, key: &str) -> Result<T> {
        let value = self.get_value(layer, key, None)?;

        serde_json::from_value(value).map_err(|e| LayerError::ValueType {
            key: key.to_string(),
            path: self
                .document_path(layer, false)
                .unwrap_or_else(|_| PathBuf::from(layer)),
            source: e,
        })
    }

    /// Bind `key` to `value` in a layer's document.
    ///
    /// The whole document is read, updated and written back under the
    /// document lock.
    pub fn set_value(&self, layer: &str, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();

        self.with_document(layer, Access::Exclusive, |path| {
            let mut document = document::load(path)?;
            document.insert(key.to_string(), value);
            document::save(path, &document)?;

            info!("Set '{}' in {}", key, path.display());
            Ok(())
        })
    }

    /// List the immediate sub-layers of the root, sorted by name.
    ///
    /// Only directories count; files such as the root's own `config.json`
    /// are skipped, as are directories whose names are not valid UTF-8.
    pub fn list_sublayers(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(LayerError::LayerNotFound {
                path: self.root.clone(),
            });
        }

        let plan = self.lock_plan(&self.root, Access::Shared);

        self.locks.with_locks(&plan, || -> Result<Vec<String>> {
            let mut sublayers = Vec::new();

            for entry in WalkDir::new(&self.root)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|e| LayerError::Read {
                    path: self.root.clone(),
                    source: io::Error::from(e),
                })?;

                let is_dir = entry.file_type().is_dir()
                    || (entry.path_is_symlink() && entry.path().is_dir());
                if !is_dir {
                    continue;
                }

                // Layer paths are `&str`, so a non-UTF-8 name could not be opened again.
                match entry.file_name().to_str() {
                    Some(name) => sublayers.push(name.to_string()),
                    None => warn!("Skipping non-UTF-8 sub-layer: {}", entry.path().display()),
                }
            }

            Ok(sublayers)
        })
    }

    /// Open an existing layer as a store of its own.
    ///
    /// The returned store shares this store's lock registry, and its
    /// operations lock the directories above its root too.
    pub fn sublayer(&self, layer: &str) -> Result<LayerStore> {
        let root = self.layer_dir(layer, true)?;

        Ok(LayerStore {
            root,
            lock_root: self.lock_root.clone(),
            locks: Arc::clone(&self.locks),
        })
    }
}
