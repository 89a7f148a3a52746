//! Executable images and process address spaces.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::memory::Frame;

/// An executable image known to the loader.
///
/// `entry` is opaque to the kernel; the platform uses it to start the
/// program once its address space exists.
#[derive(Debug, Clone)]
pub struct ProgramImage<E> {
    /// File name of the image, e.g. `fibonacci_cmd.coff`.
    pub name: String,
    /// Pages occupied by code and data.
    pub pages: usize,
    /// Platform entry point.
    pub entry: E,
}

/// Images installed on the machine, indexed by file name.
#[derive(Debug, Clone)]
pub struct ImageRegistry<E> {
    images: HashMap<String, ProgramImage<E>>,
}

impl<E> ImageRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
        }
    }

    /// Install an image, replacing any image with the same name.
    pub fn install(&mut self, name: &str, pages: usize, entry: E) {
        self.images.insert(
            String::from(name),
            ProgramImage {
                name: String::from(name),
                pages,
                entry,
            },
        );
    }

    /// Look up an image by file name.
    pub fn get(&self, name: &str) -> Option<&ProgramImage<E>> {
        self.images.get(name)
    }

    /// Names of all installed images, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.images.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of installed images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image is installed.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl<E> Default for ImageRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Memory owned by one process.
///
/// The argument strings live here, so the caller of `exec` may reuse its
/// own buffers as soon as the call returns.
#[derive(Debug)]
pub struct AddressSpace {
    /// Image the space was built from.
    pub image: String,
    /// Physical frames backing code, stack and argument area.
    pub frames: Vec<Frame>,
    /// Argument vector copied from the parent.
    pub args: Vec<String>,
}

impl AddressSpace {
    /// Number of pages mapped.
    pub fn page_count(&self) -> usize {
        self.frames.len()
    }
}

/// A program ready to be started: its entry point and its address space.
#[derive(Debug)]
pub struct LoadedImage<E> {
    /// Platform entry point.
    pub entry: E,
    /// Freshly built address space.
    pub space: AddressSpace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_install_and_lookup() {
        let mut registry = ImageRegistry::new();
        registry.install("echo.coff", 2, 7u8);
        registry.install("cat.coff", 3, 9u8);

        let image = registry.get("echo.coff").unwrap();
        assert_eq!(image.pages, 2);
        assert_eq!(image.entry, 7);
        assert!(registry.get("missing.coff").is_none());
        assert_eq!(registry.names(), ["cat.coff", "echo.coff"]);
    }

    #[test]
    fn test_registry_replaces_same_name() {
        let mut registry = ImageRegistry::new();
        registry.install("a.coff", 1, ());
        registry.install("a.coff", 4, ());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a.coff").unwrap().pages, 4);
    }
}
