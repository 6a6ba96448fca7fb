//! Shared helpers for specs.

use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Process exit code for protocol and transport failures (`-1`).
pub const TRANSPORT_FAILURE: i32 = 255;

/// A working directory plus an isolated state directory.
pub struct Project {
    work: TempDir,
    home: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { work: tempdir(), home: tempdir() }
    }

    pub fn path(&self) -> &Path {
        self.work.path()
    }

    pub fn socket(&self) -> PathBuf {
        self.home.path().join("server.sock")
    }

    pub fn vg(&self) -> Cli {
        let mut cmd = assert_cmd::Command::new(vg_bin());
        cmd.current_dir(self.work.path());
        isolate(&mut cmd, self.home.path());
        Cli { cmd, _home: None }
    }

    /// Start a long-running `vg` command; killed on drop.
    pub fn spawn(&self, args: &[&str]) -> Background {
        let mut cmd = std::process::Command::new(vg_bin());
        cmd.args(args)
            .current_dir(self.work.path())
            .env("VAGRANT_HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env_remove("VAGRANT_SERVER_SOCKET")
            .env_remove("VAGRANT_LOG_LEVEL")
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let child = cmd.spawn().unwrap_or_else(|e| panic!("spawning vg {:?}: {}", args, e));
        Background { child }
    }

    /// Run `vg server` and wait for its socket.
    pub fn server(&self) -> Background {
        let server = self.spawn(&["server"]);
        wait_for(|| self.socket().exists(), "server socket");
        server
    }
}

/// `vg` with a fresh state directory.
pub fn cli() -> Cli {
    let home = tempdir();
    let mut cmd = assert_cmd::Command::new(vg_bin());
    isolate(&mut cmd, home.path());
    Cli { cmd, _home: Some(home) }
}

pub struct Cli {
    cmd: assert_cmd::Command,
    _home: Option<TempDir>,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(self) -> Ran {
        self.exits(0)
    }

    pub fn exits(mut self, code: i32) -> Ran {
        let out = self.cmd.timeout(Duration::from_secs(30)).output().unwrap();
        let ran = Ran {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        };
        assert_eq!(ran.code, Some(code), "unexpected exit code\n{}", ran);
        ran
    }
}

pub struct Ran {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl Ran {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {:?}\n{}", needle, self);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {:?}\n{}", needle, self);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {:?}\n{}", needle, self);
        self
    }
}

impl std::fmt::Display for Ran {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exit: {:?}\n--- stdout\n{}--- stderr\n{}", self.code, self.stdout, self.stderr)
    }
}

pub struct Background {
    child: Child,
}

impl Drop for Background {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn wait_for(mut ready: impl FnMut() -> bool, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !ready() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn vg_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("vg")
}

fn tempdir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn isolate(cmd: &mut assert_cmd::Command, home: &Path) {
    cmd.env("VAGRANT_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("VAGRANT_SERVER_SOCKET")
        .env_remove("VAGRANT_LOG_LEVEL");
}
