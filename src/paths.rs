//! HVSC root directory handling.
//!
//! Entries in the SLDB, STIL and BUGlist are listed relative to the HVSC root
//! with forward slashes, e.g. `/MUSICIANS/H/Hubbard_Rob/Commando.sid`. The
//! helpers here turn absolute paths into that form.

use std::path::MAIN_SEPARATOR;

use log::debug;

/// Song length database, relative to the HVSC root.
pub const SLDB_FILE: &str = "DOCUMENTS/Songlengths.md5";
/// SID Tune Information List, relative to the HVSC root.
pub const STIL_FILE: &str = "DOCUMENTS/STIL.txt";
/// BUGlist, relative to the HVSC root.
pub const BUGS_FILE: &str = "DOCUMENTS/BUGlist.txt";

/// The HVSC root and the database files derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPaths {
    root: String,
    sldb: String,
    stil: String,
    bugs: String,
}

impl RootPaths {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        let paths = Self {
            sldb: join_paths(&root, SLDB_FILE),
            stil: join_paths(&root, STIL_FILE),
            bugs: join_paths(&root, BUGS_FILE),
            root,
        };
        debug!("HVSC root = {}", paths.root);
        debug!("HVSC sldb = {}", paths.sldb);
        debug!("HVSC stil = {}", paths.stil);
        debug!("HVSC bugs = {}", paths.bugs);
        paths
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn sldb(&self) -> &str {
        &self.sldb
    }

    pub fn stil(&self) -> &str {
        &self.stil
    }

    pub fn bugs(&self) -> &str {
        &self.bugs
    }

    pub fn strip_root(&self, path: &str) -> String {
        strip_root(&self.root, path)
    }

    pub fn is_under_root(&self, path: &str) -> bool {
        is_under_root(&self.root, path)
    }
}

/// Join `a` and `b` with a single separator.
///
/// `a` is expected without a trailing separator and `b` without a leading one;
/// when either is already present no second separator is inserted.
pub fn join_paths(a: &str, b: &str) -> String {
    let mut joined = String::with_capacity(a.len() + b.len() + 1);
    joined.push_str(a);
    if !a.ends_with(is_separator) && !b.starts_with(is_separator) {
        joined.push(MAIN_SEPARATOR);
    }
    joined.push_str(b);
    joined
}

/// Copy of `path` with `root` removed from its front.
///
/// The path is returned unchanged when `root` is empty, when `path` is not
/// strictly longer than `root`, or when it does not start with `root`.
pub fn strip_root(root: &str, path: &str) -> String {
    if is_under_root(root, path) {
        path[root.len()..].to_owned()
    } else {
        path.to_owned()
    }
}

/// True when `root` is non-empty and a strict byte prefix of `path`.
pub fn is_under_root(root: &str, path: &str) -> bool {
    !root.is_empty() && path.len() > root.len() && path.as_bytes().starts_with(root.as_bytes())
}

/// Replace backslashes with forward slashes in place.
pub fn normalize_separators(path: &mut String) {
    if path.contains('\\') {
        *path = path.replace('\\', "/");
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == MAIN_SEPARATOR
}
