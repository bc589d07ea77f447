//! Lookup of loaded data and named styles.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use crate::error::{ConfigurationError, PlotResult};
use crate::objects::DataObject;
use crate::spec::identity;
use crate::style::{FALLBACK_STYLE, Style};

/// Source of loaded objects, keyed by unique identity (`name_IN_input`).
pub trait DataRegistry {
    /// Object registered under `identity`.
    fn lookup(&self, identity: &str) -> Option<&DataObject>;
}

/// Append-only in-memory [`DataRegistry`].
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    objects: HashMap<String, DataObject>,
}

impl DataStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `object` under `identity`.
    ///
    /// The first registration of an identity is kept; returns `false` if the
    /// identity was already taken.
    pub fn insert(&mut self, identity: impl Into<String>, object: DataObject) -> bool {
        match self.objects.entry(identity.into()) {
            Entry::Occupied(entry) => {
                warn!(identity = entry.key().as_str(), "identity already loaded, keeping first object");
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(object);
                true
            }
        }
    }

    /// Register `object` as `name` from `input`.
    pub fn insert_from(&mut self, name: &str, input: &str, object: DataObject) -> bool {
        self.insert(identity(name, input), object)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl DataRegistry for DataStore {
    fn lookup(&self, identity: &str) -> Option<&DataObject> {
        self.objects.get(identity)
    }
}

impl DataRegistry for HashMap<String, DataObject> {
    fn lookup(&self, identity: &str) -> Option<&DataObject> {
        self.get(identity)
    }
}

/// Named, validated styles.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, Style>,
}

impl StyleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in presets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for style in [Style::default_1d(), Style::default_1d_ratio(), Style::default_2d()] {
            registry.styles.insert(style.name.clone(), style);
        }
        registry
    }

    /// Validate and register `style`, replacing one with the same name.
    ///
    /// # Errors
    /// Returns the validation error; the registry is unchanged.
    pub fn insert(&mut self, style: Style) -> Result<(), ConfigurationError> {
        style.validate()?;
        debug!(style = style.name.as_str(), "registered style");
        self.styles.insert(style.name.clone(), style);
        Ok(())
    }

    /// Parse a JSON array of styles and register each of them.
    ///
    /// # Errors
    /// Fails on malformed JSON or the first invalid style; styles before it stay registered.
    pub fn load_json(&mut self, json: &str) -> PlotResult<usize> {
        let styles: Vec<Style> = serde_json::from_str(json)?;
        let count = styles.len();
        for style in styles {
            self.insert(style)?;
        }
        Ok(count)
    }

    /// Style registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    /// Style registered under `name`, or the fallback style with a warning.
    ///
    /// If not even the fallback is registered, the built-in 1D preset is used.
    pub fn get_style(&self, name: &str) -> Style {
        if let Some(style) = self.styles.get(name) {
            return style.clone();
        }
        warn!(requested = name, fallback = FALLBACK_STYLE, "unknown style, using fallback");
        self.styles
            .get(FALLBACK_STYLE)
            .cloned()
            .unwrap_or_else(Style::default_1d)
    }

    /// Registered style names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}
