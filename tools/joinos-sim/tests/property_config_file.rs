//! Property 6: Machine configuration files
//!
//! Any positive page count and pid limit written to a TOML file is loaded
//! back and reaches the kernel configuration; missing files and unknown
//! keys are infrastructure errors.

use std::io::Write;

use joinos_sim::{MachineConfig, SimError};
use proptest::prelude::*;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn file_values_reach_kernel(phys_pages in 1usize..4096, max_pid in 0u32..100_000) {
        let file = write_config(&format!("phys_pages = {phys_pages}\nmax_pid = {max_pid}\n"));
        let config = MachineConfig::load(file.path()).unwrap();

        let kernel = config.kernel_config();
        prop_assert_eq!(kernel.phys_pages, phys_pages);
        prop_assert_eq!(kernel.max_pid, max_pid);
        prop_assert_eq!(kernel.stack_pages, MachineConfig::default().stack_pages);
    }
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = MachineConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SimError::ConfigNotFound { .. }));
    assert_eq!(err.exit_code_num(), 2);
}

#[test]
fn unknown_key_is_a_parse_error() {
    let file = write_config("memory = \"64M\"\n");
    assert!(matches!(
        MachineConfig::load(file.path()),
        Err(SimError::ConfigParse(_))
    ));
}

#[test]
fn input_is_fed_to_the_console() {
    let file = write_config("input = \"from file\\n\"\n");
    let config = MachineConfig::load(file.path()).unwrap();
    let report = joinos_sim::Machine::new(config)
        .run("echo.coff", &["echo.coff"])
        .unwrap();

    // echo.coff is the only process, so its halt is granted.
    assert_eq!(report.console, "echo: from file\n");
    assert_eq!(report.exit, joinos_sim::MachineExit::Halted { by: 0 });
}
