// tests/validator_chain.rs

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use sniffer::errors::SnifferError;
use sniffer::validate::{
    not_repo, DefaultValidator, Validator, ValidatorChain, ValidatorHandle, VCS_DIRS,
};

fn by_extension(name: &str, ext: &'static str) -> Validator {
    Validator::for_extensions(name, &[ext])
}

#[test]
fn default_validator_accepts_recognized_extensions() {
    let mut chain = ValidatorChain::default();

    assert!(chain.is_valid_type(Path::new("/p/src/lib.rs")));
    assert!(!chain.is_valid_type(Path::new("/p/README.md")));
    assert!(!chain.is_valid_type(Path::new("/p/src/.hidden.rs")));
    assert!(!chain.is_valid_type(Path::new("/p/.git/hooks/pre-commit.rs")));
}

#[test]
fn default_validator_extensions_accept_leading_dots() {
    let default = DefaultValidator::new(&[".py", "toml"]);
    assert_eq!(default.extensions(), &["py".to_string(), "toml".to_string()]);

    let mut chain = ValidatorChain::new(default);
    assert!(chain.is_valid_type(Path::new("/p/app.py")));
    assert!(chain.is_valid_type(Path::new("/p/Cargo.toml")));
    assert!(!chain.is_valid_type(Path::new("/p/main.rs")));
}

#[test]
fn vcs_directories_are_rejected_even_if_a_validator_accepts() {
    let mut chain = ValidatorChain::default();
    chain.add(Validator::new("everything", |_: &Path| true));

    for vcs in VCS_DIRS {
        let path = PathBuf::from("/p").join(vcs).join("objects/ab.rs");
        assert!(!chain.is_valid_type(&path), "{path:?} should be rejected");
    }
    assert!(chain.is_valid_type(Path::new("/p/src/git.rs")));
}

#[test]
fn not_repo_handles_both_separators() {
    assert!(!not_repo(Path::new(r"C:\work\.hg\store\x.rs")));
    assert!(!not_repo(Path::new("/work/.svn/x.rs")));
    assert!(not_repo(Path::new("/work/.github/x.rs")));
}

#[test]
fn conjunctive_mode_requires_every_validator() {
    let mut chain = ValidatorChain::default();
    chain.add(by_extension("rust", "rs"));
    chain.add(Validator::new("in_src", |p: &Path| {
        p.to_string_lossy().contains("/src/")
    }));

    assert!(!chain.is_selection_mode());
    assert!(chain.is_valid_type(Path::new("/p/src/lib.rs")));
    assert!(!chain.is_valid_type(Path::new("/p/tests/it.rs")));
    assert!(!chain.is_valid_type(Path::new("/p/src/notes.txt")));
    assert_eq!(chain.active_runner(), None);
}

#[test]
fn selection_mode_routes_to_the_first_accepting_validator() {
    let mut chain = ValidatorChain::default();
    chain.add(by_extension("v1", "type1").select_runnable("run1"));
    chain.add(by_extension("v2", "type2").select_runnable("run2"));
    assert!(chain.is_selection_mode());

    assert!(chain.is_valid_type(Path::new("/p/a.type1")));
    assert_eq!(chain.active_runner(), Some("run1"));

    assert!(chain.is_valid_type(Path::new("/p/b.type2")));
    assert_eq!(chain.active_runner(), Some("run2"));

    assert!(!chain.is_valid_type(Path::new("/p/c.other")));
    assert_eq!(chain.active_runner(), Some("run2"));
}

#[test]
fn selection_mode_untagged_acceptor_keeps_the_active_runner() {
    let mut chain = ValidatorChain::default();
    chain.add(by_extension("plain", "md"));
    chain.add(by_extension("tagged", "rs").select_runnable("unit"));

    assert!(chain.is_valid_type(Path::new("/p/lib.rs")));
    assert_eq!(chain.active_runner(), Some("unit"));

    assert!(chain.is_valid_type(Path::new("/p/README.md")));
    assert_eq!(chain.active_runner(), Some("unit"));
}

#[test]
fn accepts_does_not_select_a_runner() {
    let mut chain = ValidatorChain::default();
    chain.add(by_extension("v1", "type1").select_runnable("run1"));

    assert!(chain.accepts(Path::new("/p/a.type1")));
    assert_eq!(chain.active_runner(), None);
}

#[test]
fn removing_validators() {
    let mut chain = ValidatorChain::default();
    chain.add(by_extension("md", "md"));

    let err = chain.remove("missing").unwrap_err();
    assert!(matches!(err, SnifferError::ValidatorNotFound(ref n) if n == "missing"));

    let removed = chain.remove("md").expect("remove md");
    assert_eq!(removed.name(), "md");
    assert!(chain.is_empty());

    // Back to the default validator.
    assert!(chain.is_valid_type(Path::new("/p/lib.rs")));
    assert!(!chain.is_valid_type(Path::new("/p/README.md")));
}

#[test]
fn pinned_paths_are_always_accepted_outside_vcs() {
    let mut chain = ValidatorChain::default();
    chain.add(by_extension("v1", "type1").select_runnable("run1"));
    chain.pin("/p/scent.toml");
    chain.pin("/p/.git/scent.toml");

    assert!(chain.is_valid_type(Path::new("/p/scent.toml")));
    assert_eq!(chain.active_runner(), None);
    assert!(!chain.is_valid_type(Path::new("/p/.git/scent.toml")));
}

#[test]
fn queued_edits_apply_in_order() {
    let mut chain = ValidatorChain::default();
    chain.add(by_extension("old", "md"));

    let handle = ValidatorHandle::new();
    handle.remove_validator("old");
    handle.remove_validator("never-added");
    handle.add_validator(by_extension("new", "txt"));
    assert!(handle.has_pending());

    chain.apply(handle.drain());
    assert!(!handle.has_pending());

    let names: Vec<&str> = chain.validators().iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["new"]);
    assert!(chain.is_valid_type(Path::new("/p/notes.txt")));
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

proptest! {
    #[test]
    fn any_vcs_segment_is_rejected(
        before in proptest::collection::vec(segment(), 0..4),
        vcs in proptest::sample::select(VCS_DIRS.to_vec()),
        after in proptest::collection::vec(segment(), 0..4),
        file in segment(),
    ) {
        let mut path = PathBuf::from("/");
        for s in &before { path.push(s); }
        path.push(vcs);
        for s in &after { path.push(s); }
        path.push(format!("{file}.rs"));

        let mut chain = ValidatorChain::default();
        chain.add(Validator::new("everything", |_: &Path| true));
        prop_assert!(!chain.is_valid_type(&path));
    }

    #[test]
    fn default_validator_accepts_visible_rust_files(
        dirs in proptest::collection::vec(segment(), 0..5),
        file in segment(),
    ) {
        let mut path = PathBuf::from("/");
        for s in &dirs { path.push(s); }
        path.push(format!("{file}.rs"));

        let mut chain = ValidatorChain::default();
        prop_assert!(chain.is_valid_type(&path));
        path.set_extension("txt");
        prop_assert!(!chain.is_valid_type(&path));
    }

    #[test]
    fn selection_never_clears_the_active_runner(
        exts in proptest::collection::vec(
            proptest::sample::select(vec!["type1", "type2", "other"]), 1..20),
    ) {
        let mut chain = ValidatorChain::default();
        chain.add(Validator::for_extensions("v1", &["type1"]).select_runnable("run1"));
        chain.add(Validator::for_extensions("v2", &["type2"]).select_runnable("run2"));

        let mut expected: Option<&str> = None;
        for ext in exts {
            let accepted = chain.is_valid_type(Path::new(&format!("/p/f.{ext}")));
            match ext {
                "type1" => { prop_assert!(accepted); expected = Some("run1"); }
                "type2" => { prop_assert!(accepted); expected = Some("run2"); }
                _ => { prop_assert!(!accepted); }
            }
            prop_assert_eq!(chain.active_runner(), expected);
        }
    }
}
