//! Checks that `tests/unit` mirrors `src` file for file

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Entry points and module declarations carry no logic of their own
    fn is_exempt(relative: &str) -> bool {
        relative == "main.rs" || relative == "lib.rs" || relative.ends_with("mod.rs")
    }

    fn rust_paths(dir: &Path, base: &Path, paths: &mut BTreeSet<String>) -> io::Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_stripped| io::Error::other("entry outside base directory"))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.insert(relative);
                rust_paths(&path, base, paths)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }

        Ok(())
    }

    fn mirrored_sets() -> (BTreeSet<String>, BTreeSet<String>) {
        let mut src = BTreeSet::new();
        let mut unit = BTreeSet::new();
        let src_result = rust_paths(Path::new(SRC_DIR), Path::new(SRC_DIR), &mut src);
        assert!(src_result.is_ok(), "Failed to read {SRC_DIR}: {src_result:?}");
        let unit_result = rust_paths(Path::new(UNIT_DIR), Path::new(UNIT_DIR), &mut unit);
        assert!(unit_result.is_ok(), "Failed to read {UNIT_DIR}: {unit_result:?}");
        (src, unit)
    }

    // Tests that every source file has a unit test file at the same relative path
    // Verified by deleting tests/unit/spatial/tiles.rs
    #[test]
    fn test_every_source_file_has_unit_tests() {
        let (src, unit) = mirrored_sets();

        let missing: Vec<String> = src
            .iter()
            .filter(|path| !is_exempt(path) && !unit.contains(*path))
            .map(|path| format!("  - {SRC_DIR}/{path} -> {UNIT_DIR}/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    // Tests that no unit test file outlives its source file
    // Verified by adding tests/unit/io/unused.rs
    #[test]
    fn test_every_unit_test_has_source() {
        let (src, unit) = mirrored_sets();

        let orphaned: Vec<String> = unit
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src.contains(*path))
            .map(|path| format!("  - {UNIT_DIR}/{path}"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source file:\n{}",
            orphaned.join("\n")
        );
    }

    fn files_without_tests(dir: &Path, found: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                files_without_tests(&path, found)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                continue;
            }
            if path.file_name().and_then(|name| name.to_str()) == Some("mod.rs") {
                continue;
            }

            if !fs::read_to_string(&path)?.contains("#[test]") {
                found.push(format!("  - {}", path.display()));
            }
        }

        Ok(())
    }

    // Tests that each test file defines at least one test
    // Verified by removing every #[test] from tests/unit/io/error.rs
    #[test]
    fn test_every_test_file_contains_tests() {
        let mut found = Vec::new();
        let result = files_without_tests(Path::new("tests"), &mut found);
        assert!(result.is_ok(), "Failed to scan tests: {result:?}");

        assert!(
            found.is_empty(),
            "Test files without any #[test] function:\n{}",
            found.join("\n")
        );
    }
}
