//! # Interface Paths
//!
//! Normalized, slash-delimited route keys. `"users//list/"`, `"/users/list"`
//! and `"users/./list"` all name the same interface.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Canonicalize a raw route string. Empty and `.` segments are dropped,
    /// `..` removes the preceding segment.
    pub fn new(raw: &str) -> Self {
        let mut segments: Vec<String> = Vec::new();
        push_segments(&mut segments, raw);
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    /// Derive a new path by appending a normalized suffix
    pub fn join(&self, suffix: &str) -> Self {
        let mut segments = self.segments.clone();
        push_segments(&mut segments, suffix);
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

fn push_segments(segments: &mut Vec<String>, raw: &str) {
    for segment in raw.split('/') {
        match segment.trim() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment.to_string()),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Path::new(raw)
    }
}

impl From<String> for Path {
    fn from(raw: String) -> Self {
        Path::new(&raw)
    }
}

impl Add<&str> for &Path {
    type Output = Path;

    fn add(self, suffix: &str) -> Path {
        self.join(suffix)
    }
}

impl Add<&str> for Path {
    type Output = Path;

    fn add(self, suffix: &str) -> Path {
        self.join(suffix)
    }
}

impl PartialEq<str> for Path {
    fn eq(&self, other: &str) -> bool {
        *self == Path::new(other)
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        *self == Path::new(other)
    }
}
