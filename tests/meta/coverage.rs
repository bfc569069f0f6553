//! Keeps `tests/unit` a mirror of `src` and every unit file wired in

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    /// Files that only organise modules or start a binary
    fn is_wiring(relative: &str) -> bool {
        relative == "lib.rs" || relative.ends_with("main.rs") || relative.ends_with("mod.rs")
    }

    /// Every `.rs` file and directory below `dir`, relative to `base`
    fn relative_paths(dir: &Path, base: &Path) -> io::Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        if !dir.is_dir() {
            return Ok(paths);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(io::Error::other)?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.extend(relative_paths(&path, base)?);
                paths.insert(relative);
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }
        Ok(paths)
    }

    fn both_trees() -> (BTreeSet<String>, BTreeSet<String>) {
        let src = relative_paths(Path::new(SRC_DIR), Path::new(SRC_DIR)).unwrap_or_default();
        let unit = relative_paths(Path::new(UNIT_DIR), Path::new(UNIT_DIR)).unwrap_or_default();
        assert!(!src.is_empty(), "src should not be empty");
        (src, unit)
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let (src, unit) = both_trees();
        let missing: Vec<_> = src
            .iter()
            .filter(|path| !is_wiring(path) && !unit.contains(*path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let (src, unit) = both_trees();
        let orphaned: Vec<_> = unit
            .iter()
            .filter(|path| !is_wiring(path) && !src.contains(*path))
            .map(|path| format!("  - tests/unit/{path} -> src/{path} (missing)"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned.join("\n")
        );
    }

    // A unit file left out of its parent's module list is never compiled
    #[test]
    fn test_unit_files_are_declared() {
        let (_, unit) = both_trees();
        let mut undeclared = Vec::new();

        for path in unit.iter().filter(|path| path.ends_with(".rs") && !is_wiring(path)) {
            let file = Path::new(path);
            let parent = file.parent().unwrap_or_else(|| Path::new(""));
            let module_list = Path::new(UNIT_DIR).join(parent).join(if parent.as_os_str().is_empty() {
                "main.rs"
            } else {
                "mod.rs"
            });
            let stem = file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default();

            let declared = fs::read_to_string(&module_list).is_ok_and(|content| {
                content
                    .lines()
                    .any(|line| line.trim().trim_start_matches("pub ") == format!("mod {stem};"))
            });
            if !declared {
                undeclared.push(format!("  - tests/unit/{path} (add to {})", module_list.display()));
            }
        }

        assert!(
            undeclared.is_empty(),
            "The following unit test files are not declared as modules:\n{}",
            undeclared.join("\n")
        );
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let mut files_without_tests = Vec::new();

        if let Err(error) = scan_for_tests(tests_dir, &mut files_without_tests) {
            assert!(tests_dir.exists(), "Failed to scan tests directory: {error}");
        }

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }

    fn scan_for_tests(dir: &Path, files_without_tests: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                scan_for_tests(&path, files_without_tests)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            // Module lists and harness entry points hold no tests of their own
            if is_wiring(file_name) {
                continue;
            }
            if !fs::read_to_string(&path)?.contains("#[test]") {
                files_without_tests.push(format!("  - {}", path.display()));
            }
        }
        Ok(())
    }
}
