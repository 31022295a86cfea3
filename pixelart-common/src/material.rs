//! Per-import colour → material cache

use hashbrown::HashMap;

use crate::color::{Color, ColorKey};
use crate::scene::{MaterialDefinition, MaterialHandle, MaterialLibrary};

/// Policy for materials missing from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialPolicy {
    /// Build a shader node graph instead of a flat colour
    pub use_nodes: bool,
    /// Adopt a library material whose name matches the proposed name
    pub reuse_existing: bool,
}

/// Maps each distinct colour to exactly one material handle for one import
///
/// Lookup order: colours already seen in this import, then (when reuse is
/// enabled) library materials by name, then a newly created material. There
/// is no eviction; the cache lives as long as one import.
#[derive(Debug)]
pub struct MaterialCache {
    policy: MaterialPolicy,
    by_color: HashMap<ColorKey, MaterialHandle>,
    created: usize,
    adopted: usize,
}

impl MaterialCache {
    pub fn new(policy: MaterialPolicy) -> Self {
        Self {
            policy,
            by_color: HashMap::new(),
            created: 0,
            adopted: 0,
        }
    }

    /// Handle for `color`, creating or adopting a material on first sight
    ///
    /// `name` is only consulted on a cache miss.
    pub fn get_or_create<L>(&mut self, library: &mut L, color: Color, name: &str) -> MaterialHandle
    where
        L: MaterialLibrary + ?Sized,
    {
        let key = color.key();
        if let Some(&handle) = self.by_color.get(&key) {
            return handle;
        }

        let existing = if self.policy.reuse_existing {
            library.find_material(name)
        } else {
            None
        };

        let handle = match existing {
            Some(handle) => {
                tracing::debug!("Reusing existing material '{}'", name);
                self.adopted += 1;
                handle
            }
            None => {
                let definition = MaterialDefinition::for_color(color, self.policy.use_nodes);
                self.created += 1;
                library.create_material(name, definition)
            }
        };

        self.by_color.insert(key, handle);
        handle
    }

    /// Materials newly created by this cache
    pub fn created(&self) -> usize {
        self.created
    }

    /// Existing library materials adopted by name
    pub fn adopted(&self) -> usize {
        self.adopted
    }

    /// Distinct colours seen so far
    pub fn len(&self) -> usize {
        self.by_color.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_color.is_empty()
    }
}
