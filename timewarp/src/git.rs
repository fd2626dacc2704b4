//! Name resolution through version-control history.
//!
//! An identifier that no scope binds is taken to be a revision. The
//! repository is force-checked-out at that revision, the tracked file is
//! restored from it, and its single expression becomes the identifier's value.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::config::Config;
use crate::error::{Error, Result, SyntaxError};
use crate::parse::Reader;
use crate::symtab::Symbol;
use crate::value::Value;

lazy_static! {
    /// Held for checkout, restore and read. Working-tree state is global to
    /// the process, so no two lookups may interleave those steps.
    static ref WORKTREE: Mutex<()> = Mutex::new(());
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitScope {
    repo: PathBuf,
    file_name: PathBuf,
}

impl GitScope {
    pub fn new(repo: impl Into<PathBuf>, file_name: impl Into<PathBuf>) -> Self {
        GitScope {
            repo: repo.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        GitScope::new(&config.repo_path, &config.tracked_file)
    }

    /// Check out revision `ident` and return the unevaluated expression its
    /// tracked file holds. Nothing is cached: every call touches the
    /// repository again.
    pub fn find(&self, ident: Symbol) -> Result<Value> {
        // git would parse it as an option, and no ref name starts with `-`
        if ident.name().starts_with('-') {
            return Err(Error::Lookup(ident));
        }
        let _worktree = WORKTREE.lock().unwrap_or_else(PoisonError::into_inner);
        log::info!("entering time machine: {}", ident);

        let file_name = self.file_name.to_string_lossy();
        self.run_git(&["checkout", "-f", ident.name()])?;
        self.run_git(&["checkout", ident.name(), "--", &*file_name])?;

        let file = File::open(self.repo.join(&self.file_name))?;
        let mut reader = Reader::new(BufReader::new(file));
        reader
            .next()
            .unwrap_or(Err(Error::Syntax(SyntaxError::UnexpectedEof)))
    }

    fn run_git(&self, args: &[&str]) -> Result<()> {
        let command = format!("git -C {} {}", self.repo.display(), args.join(" "));
        log::debug!("running `{}`", command);
        let status = Command::new("git").arg("-C").arg(&self.repo).args(args).status()?;
        if !status.success() {
            return Err(Error::ExternalProcess { command, status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = Config::new("/tmp/repo", "defs.lisp");
        assert_eq!(GitScope::from_config(&config), GitScope::new("/tmp/repo", "defs.lisp"));
    }

    #[test]
    fn test_option_like_identifier_never_reaches_git() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitScope::new(dir.path().join("absent"), "time.lisp");
        for name in ["-q", "--orphan", "-"] {
            match git.find(crate::symtab::intern(name)) {
                Err(Error::Lookup(sym)) => assert_eq!(sym.name(), name),
                other => panic!("{}: expected lookup error, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_missing_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitScope::new(dir.path().join("absent"), "time.lisp");
        assert!(git.find(crate::symtab::intern("v1")).is_err());
    }
}
