//! Shared fixtures: a media root in a temp dir and a fake external compiler.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use compressor::compiler::{ExternalOutput, ExternalRunner};
use compressor::config::{CompilerFormat, CompressConfig};
use compressor::Environment;
use tempfile::TempDir;

/// Stands in for a `.ccss` compiler binary.
///
/// The last command token is the source path; its `.css` sibling is
/// written with a `/* compiled */` header.
#[derive(Default)]
pub struct FakeCompiler {
    calls: Mutex<Vec<String>>,
}

impl FakeCompiler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExternalRunner for FakeCompiler {
    fn run(&self, command: &str) -> io::Result<ExternalOutput> {
        self.calls.lock().unwrap().push(command.to_owned());
        let source = PathBuf::from(command.split_whitespace().last().unwrap_or_default());
        let text = fs::read_to_string(&source)?;
        fs::write(source.with_extension("css"), format!("/* compiled */\n{text}"))?;
        Ok(ExternalOutput {
            exit_code: Some(0),
            ..ExternalOutput::default()
        })
    }
}

/// A project directory with a `media/` root.
pub struct Site {
    pub dir: TempDir,
}

impl Site {
    pub fn new() -> Self {
        let site = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(site.media()).unwrap();
        site
    }

    pub fn media(&self) -> PathBuf {
        self.dir.path().join("media")
    }

    /// Write `content` to `media/<rel>`.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.media().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Default config rooted at the site directory.
    pub fn config(&self) -> CompressConfig {
        let mut config = CompressConfig::default();
        config.finalize(self.dir.path());
        config
    }

    pub fn env(&self, config: CompressConfig) -> Environment {
        Environment::from_config(config).unwrap()
    }

    pub fn env_with_runner(&self, config: CompressConfig, runner: Arc<FakeCompiler>) -> Environment {
        Environment::from_config(config)
            .unwrap()
            .with_runner(runner)
            .unwrap()
    }
}

/// `.ccss` handled by the fake binary, optionally with a transform first.
pub fn ccss_format(transform: Option<&str>) -> CompilerFormat {
    CompilerFormat {
        transform: transform.map(Into::into),
        binary_path: Some("fakecss".into()),
        arguments: "*.ccss".into(),
    }
}

/// Move a file's mtime `secs` into the past.
pub fn age(path: &Path, secs: u64) {
    let when = SystemTime::now() - Duration::from_secs(secs);
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}
