// Shared helpers for integration tests.
//
// Provides a loopback HTTP server that serves in-memory bodies, tar.xz
// fixture builders, and a temporary sync root with DEPS.toml writers, so
// each integration test can set up an isolated environment without
// repeating filesystem or socket boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sha1::{Digest, Sha1};

use ezdeps_cli::cli::GlobalOpts;
use ezdeps_cli::logging::Logger;
use ezdeps_cli::manifest::MANIFEST_FILE_NAME;
use ezdeps_cli::platform::{Arch, Os};
use ezdeps_cli::record::RecordSet;

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Minimal HTTP/1.1 server on `127.0.0.1` answering `GET /<name>` from an
/// in-memory map.  Unknown names get a 404.  Every request is counted.
///
/// The accept thread lives until the test binary exits.
pub struct TestServer {
    port: u16,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<AtomicUsize>,
}

impl TestServer {
    /// Bind an ephemeral port and start serving.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let port = listener.local_addr().expect("local addr").port();
        let files: Arc<Mutex<HashMap<String, Vec<u8>>>> = Arc::default();
        let requests = Arc::new(AtomicUsize::new(0));

        let served = Arc::clone(&files);
        let counter = Arc::clone(&requests);
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                counter.fetch_add(1, Ordering::SeqCst);
                // A client that hangs up early only loses its own response.
                let _ = respond(stream, &served);
            }
        });

        Self {
            port,
            files,
            requests,
        }
    }

    /// Serve `body` at `/<name>`, replacing any previous body.
    pub fn serve(&self, name: &str, body: &[u8]) {
        self.files
            .lock()
            .expect("files lock")
            .insert(name.to_string(), body.to_vec());
    }

    /// Stop serving `/<name>`.
    pub fn remove(&self, name: &str) {
        self.files.lock().expect("files lock").remove(name);
    }

    /// Absolute URL for `/<name>`.
    pub fn url(&self, name: &str) -> String {
        format!("http://127.0.0.1:{}/{name}", self.port)
    }

    /// Number of requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn respond(stream: TcpStream, files: &Mutex<HashMap<String, Vec<u8>>>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 || header == "\r\n" || header == "\n" {
            break;
        }
    }

    let name = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .trim_start_matches('/')
        .to_string();
    let body = files.lock().expect("files lock").get(&name).cloned();

    let mut stream = stream;
    match body {
        Some(body) => {
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
                body.len()
            )?;
            stream.write_all(&body)?;
        }
        None => {
            stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            )?;
        }
    }
    stream.flush()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Build a `.tar.xz` in memory holding `files` (relative path, contents).
pub fn tar_xz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *contents)
            .expect("append tar entry");
    }
    let tar = builder.into_inner().expect("finish tar");

    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(&tar).expect("compress tar");
    encoder.finish().expect("finish xz stream")
}

/// Lowercase hex SHA-1 of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha1::digest(bytes))
}

/// One `[[deps]]` table.
pub fn dep_entry(file_name: &str, folder: &str, url: &str, sha1: &str) -> String {
    format!(
        "[[deps]]\nfile_name = \"{file_name}\"\nfolder = \"{folder}\"\nurl = \"{url}\"\nsha1 = \"{sha1}\"\n\n"
    )
}

// ---------------------------------------------------------------------------
// Sync root
// ---------------------------------------------------------------------------

/// An isolated sync root backed by a [`tempfile::TempDir`].
pub struct TestRoot {
    /// Temporary directory holding the top-level `DEPS.toml`.
    pub dir: tempfile::TempDir,
}

impl TestRoot {
    /// Create an empty root.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Canonical path of the root.
    pub fn path(&self) -> PathBuf {
        dunce::canonicalize(self.dir.path()).expect("canonicalize root")
    }

    /// Write `content` as the manifest in `rel_dir` (relative to the root).
    pub fn write_manifest(&self, rel_dir: &str, content: &str) {
        let dir = self.path().join(rel_dir);
        std::fs::create_dir_all(&dir).expect("create manifest dir");
        std::fs::write(dir.join(MANIFEST_FILE_NAME), content).expect("write manifest");
    }

    /// Path under the root.
    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.path().join(rel)
    }

    /// Read a file under the root.
    pub fn read(&self, rel: &str) -> Vec<u8> {
        std::fs::read(self.join(rel)).expect("read file under root")
    }

    /// File names listed in the record, in record order.
    pub fn recorded(&self) -> Vec<String> {
        RecordSet::load(&self.path())
            .expect("load record")
            .deps
            .into_iter()
            .map(|d| d.file_name)
            .collect()
    }

    /// Global options pointing at this root, pinned to linux-x64.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            dir: Some(self.path()),
            host_platform: Some(Os::Linux),
            host_arch: Some(Arch::X64),
            target_platform: Some(Os::Linux),
            target_arch: Some(Arch::X64),
            skip_config: true,
        }
    }
}

/// A fresh logger for one command run.
pub fn logger() -> Arc<Logger> {
    Arc::new(Logger::new("test"))
}
