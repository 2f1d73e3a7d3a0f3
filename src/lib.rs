//! layercfg - Layered Configuration Store
//!
//! Stores configuration as a tree of directories ("layers"), each holding an
//! optional `config.json` object. A global layer and per-project layers can
//! live side by side under one root, and any layer can be opened as the root
//! of a store of its own.
//!
//! ```no_run
//! use layercfg::{InitOptions, LayerStore};
//!
//! # fn main() -> layercfg::Result<()> {
//! let store = LayerStore::new("LWConfig");
//! store.init_layer("global", InitOptions::new())?;
//! store.init_layer("project", InitOptions::new())?;
//!
//! let project = store.sublayer("project")?;
//! project.init_layer("A", InitOptions::new())?;
//! project.set_value("A", "name", "x")?;
//! assert_eq!(project.get_value("A", "name", None)?, "x");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod locks;
pub mod store;

pub use document::{Document, DOCUMENT_FILE};
pub use error::{ErrorKind, LayerError, Result};
pub use store::{InitOptions, LayerStore};
