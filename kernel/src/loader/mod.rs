//! Program Loader
//!
//! Builds the address space of a new process: validates the image name and
//! the argument vector, reserves frames for code, stack and arguments, and
//! copies the arguments into the new space.
//!
//! # Memory layout
//!
//! - image pages (code and data)
//! - `stack_pages` stack pages
//! - one argument page holding `argv` pointers and strings

pub mod program;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::{ARG_PAGES, EXECUTABLE_SUFFIX, MAX_STRING_LEN, PAGE_SIZE};
use crate::memory::FramePool;

pub use program::{AddressSpace, ImageRegistry, LoadedImage, ProgramImage};

/// Size of one `argv` pointer slot in the argument page.
const ARG_POINTER_SIZE: usize = 4;

/// Loader errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// Name is empty, too long or lacks the executable suffix
    NotExecutable,
    /// No installed image has this name
    NotFound,
    /// An argument string exceeds the string limit
    ArgumentTooLong,
    /// Arguments do not fit in the argument page
    ArgumentsTooLarge,
    /// Not enough free frames
    OutOfMemory,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotExecutable => write!(f, "not an executable image name"),
            LoadError::NotFound => write!(f, "image not found"),
            LoadError::ArgumentTooLong => write!(f, "argument too long"),
            LoadError::ArgumentsTooLarge => write!(f, "arguments exceed the argument area"),
            LoadError::OutOfMemory => write!(f, "out of physical memory"),
        }
    }
}

/// Loads images from a registry into frames taken from a pool.
pub struct Loader<E> {
    registry: ImageRegistry<E>,
    pool: FramePool,
    stack_pages: usize,
}

impl<E: Clone> Loader<E> {
    /// Create a loader over `registry` with `phys_pages` physical pages.
    pub fn new(registry: ImageRegistry<E>, phys_pages: usize, stack_pages: usize) -> Self {
        Self {
            registry,
            pool: FramePool::new(phys_pages),
            stack_pages,
        }
    }

    /// Build the address space for `name` with the given arguments.
    ///
    /// Either the whole space is built or no frame is taken.
    pub fn load(&self, name: &str, argv: &[&str]) -> Result<LoadedImage<E>, LoadError> {
        if name.is_empty() || name.len() > MAX_STRING_LEN || !name.ends_with(EXECUTABLE_SUFFIX) {
            return Err(LoadError::NotExecutable);
        }
        let image = self.registry.get(name).ok_or(LoadError::NotFound)?;

        let mut arg_bytes = 0;
        for arg in argv {
            if arg.len() > MAX_STRING_LEN {
                return Err(LoadError::ArgumentTooLong);
            }
            arg_bytes += ARG_POINTER_SIZE + arg.len() + 1;
        }
        if arg_bytes > ARG_PAGES * PAGE_SIZE {
            return Err(LoadError::ArgumentsTooLarge);
        }

        let pages = image.pages + self.stack_pages + ARG_PAGES;
        let frames = self.pool.allocate(pages).ok_or(LoadError::OutOfMemory)?;

        log::debug!(
            "[LOADER] {} loaded into {} pages ({} free)",
            name,
            pages,
            self.pool.free_count()
        );

        Ok(LoadedImage {
            entry: image.entry.clone(),
            space: AddressSpace {
                image: String::from(name),
                frames,
                args: argv.iter().map(|arg| String::from(*arg)).collect::<Vec<_>>(),
            },
        })
    }

    /// Tear down an address space and return its frames.
    pub fn unload(&self, space: AddressSpace) {
        log::debug!(
            "[LOADER] {} unloaded, {} pages returned",
            space.image,
            space.page_count()
        );
        self.pool.release(space.frames);
    }

    /// Number of free physical pages.
    pub fn free_pages(&self) -> usize {
        self.pool.free_count()
    }

    /// Physical pages managed by the loader.
    pub fn total_pages(&self) -> usize {
        self.pool.total()
    }
}
