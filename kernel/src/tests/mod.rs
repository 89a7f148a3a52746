//! Kernel Unit Tests Module
//!
//! Cross-module tests of the process lifecycle, driven from host threads.

mod syscall_tests;
