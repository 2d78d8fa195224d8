// tests/path_set.rs

use std::error::Error;
use std::path::{Path, PathBuf};

use sniffer::scan::paths::{absolutize, normalize_against};
use sniffer::scan::PathSet;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn relative_paths_are_folded_onto_the_base() {
    assert_eq!(
        normalize_against(Path::new("a/./b/../c"), Path::new("/base")),
        PathBuf::from("/base/a/c")
    );
    assert_eq!(
        normalize_against(Path::new("../up"), Path::new("/base/dir")),
        PathBuf::from("/base/up")
    );
    assert_eq!(
        normalize_against(Path::new("."), Path::new("/base")),
        PathBuf::from("/base")
    );
}

#[test]
fn absolute_paths_ignore_the_base() {
    assert_eq!(
        normalize_against(Path::new("/proj/./src/../tests"), Path::new("/elsewhere")),
        PathBuf::from("/proj/tests")
    );
}

#[cfg(unix)]
#[test]
fn absolute_paths_never_fall_back_to_a_relative_root() -> TestResult {
    let path = absolutize(Path::new("/proj/src/.."))?;
    assert_eq!(path, PathBuf::from("/proj"));
    assert!(path.is_absolute());
    Ok(())
}

#[test]
fn relative_roots_resolve_against_the_working_directory() -> TestResult {
    let cwd = std::env::current_dir()?;
    let set = PathSet::new(["src", "./src/../src", "."])?;

    assert_eq!(set.roots(), &[cwd.join("src"), cwd.clone()]);
    assert!(set.roots().iter().all(|root| root.is_absolute()));
    Ok(())
}

#[cfg(unix)]
#[test]
fn duplicate_roots_are_kept_once() -> TestResult {
    let mut set = PathSet::new(["/proj/src", "/proj/./src", "/proj/tests/../src"])?;
    assert_eq!(set.len(), 1);

    set.add("/proj/tests")?;
    assert_eq!(
        set.roots(),
        &[PathBuf::from("/proj/src"), PathBuf::from("/proj/tests")]
    );
    Ok(())
}
