//! Shared fixtures of the benchmarks.
//!
//! Raw HTTP/1 messages live under `resources/` and are embedded with
//! `include_str!` by each bench.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn normal(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Normal, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }
}

/// A raw message fixture.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    content: &'static str,
}

impl TestFile {
    pub const fn new(content: &'static str) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    /// Number of header lines in the message head.
    pub fn header_count(&self) -> usize {
        self.content.lines().skip(1).take_while(|line| !line.trim_end().is_empty()).count()
    }
}

/// Rough size class of a fixture.
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
