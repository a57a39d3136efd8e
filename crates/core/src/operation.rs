// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sensitive operations an authority can be asked to authorize.

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::thread::{self, ThreadId};

/// Opaque context an authority evaluates checks against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SecurityContext {
    label: String,
}

impl SecurityContext {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Context used when no authority supplies one
    pub fn ambient() -> Self {
        Self::new("ambient")
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Named group of threads an authority attributes new threads to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThreadGroup {
    name: String,
}

impl ThreadGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Group of the calling thread, named after it (`main` when unnamed)
    pub fn current() -> Self {
        Self::new(thread::current().name().unwrap_or("main"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// File addressed by a read or write check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileTarget {
    /// Raw file descriptor
    Descriptor(i32),
    Path(PathBuf),
}

/// A non-termination check.
///
/// Guards forward these unchanged to the authority they replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Generic named permission
    Permission {
        name: String,
        context: Option<SecurityContext>,
    },
    CreateLoader,
    ThreadAccess(ThreadId),
    ThreadGroupAccess(ThreadGroup),
    Exec(String),
    /// Loading a dynamic library
    Link(String),
    Read {
        target: FileTarget,
        context: Option<SecurityContext>,
    },
    Write(FileTarget),
    Delete(PathBuf),
    Connect {
        host: String,
        port: u16,
        context: Option<SecurityContext>,
    },
    Listen(u16),
    Accept {
        host: String,
        port: u16,
    },
    Multicast {
        address: IpAddr,
        ttl: Option<u8>,
    },
    PropertiesAccess,
    PropertyAccess(String),
    PrintJobAccess,
    ClipboardAccess,
    EventQueueAccess,
    PackageAccess(String),
    PackageDefinition(String),
    /// Replacing a process-wide factory
    SetFactory,
    /// Reflective access to members of a type
    MemberAccess {
        type_name: String,
        which: i32,
    },
    SecurityAccess(String),
}

impl Operation {
    /// Short, stable name of the operation kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Permission { .. } => "permission",
            Self::CreateLoader => "create_loader",
            Self::ThreadAccess(_) => "thread_access",
            Self::ThreadGroupAccess(_) => "thread_group_access",
            Self::Exec(_) => "exec",
            Self::Link(_) => "link",
            Self::Read { .. } => "read",
            Self::Write(_) => "write",
            Self::Delete(_) => "delete",
            Self::Connect { .. } => "connect",
            Self::Listen(_) => "listen",
            Self::Accept { .. } => "accept",
            Self::Multicast { .. } => "multicast",
            Self::PropertiesAccess => "properties_access",
            Self::PropertyAccess(_) => "property_access",
            Self::PrintJobAccess => "print_job_access",
            Self::ClipboardAccess => "clipboard_access",
            Self::EventQueueAccess => "event_queue_access",
            Self::PackageAccess(_) => "package_access",
            Self::PackageDefinition(_) => "package_definition",
            Self::SetFactory => "set_factory",
            Self::MemberAccess { .. } => "member_access",
            Self::SecurityAccess(_) => "security_access",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission { name, .. } => write!(f, "permission '{}'", name),
            Self::Exec(cmd) => write!(f, "exec '{}'", cmd),
            Self::Link(lib) => write!(f, "link '{}'", lib),
            Self::Read {
                target: FileTarget::Path(path),
                ..
            }
            | Self::Write(FileTarget::Path(path)) => {
                write!(f, "{} '{}'", self.kind(), path.display())
            }
            Self::Read {
                target: FileTarget::Descriptor(fd),
                ..
            }
            | Self::Write(FileTarget::Descriptor(fd)) => write!(f, "{} fd {}", self.kind(), fd),
            Self::Delete(path) => write!(f, "delete '{}'", path.display()),
            Self::Connect { host, port, .. } => write!(f, "connect {}:{}", host, port),
            Self::Listen(port) => write!(f, "listen :{}", port),
            Self::Accept { host, port } => write!(f, "accept {}:{}", host, port),
            Self::PropertyAccess(key) => write!(f, "property_access '{}'", key),
            _ => f.write_str(self.kind()),
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
