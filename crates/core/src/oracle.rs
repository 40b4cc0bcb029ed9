//! Font availability oracles.
//!
//! [`FontOracle`] is what the classifier consults; it cannot fail. Probes
//! that can fail implement [`FontProbe`] and are wrapped in [`FailOpen`],
//! which treats every probe failure as "installed" so that a broken probe
//! under-reports instead of raising false alarms.

use crate::error::OracleError;
use crate::normalize::FontMatching;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Answers whether a font is installed on the evaluating system.
pub trait FontOracle {
    fn is_installed(&self, name: &str) -> bool;
}

impl<T: FontOracle + ?Sized> FontOracle for &T {
    fn is_installed(&self, name: &str) -> bool {
        (**self).is_installed(name)
    }
}

impl<T: FontOracle + ?Sized> FontOracle for Box<T> {
    fn is_installed(&self, name: &str) -> bool {
        (**self).is_installed(name)
    }
}

/// A font detection mechanism that may fail.
pub trait FontProbe {
    fn probe(&self, name: &str) -> Result<bool, OracleError>;
}

/// Adapts a [`FontProbe`] into a [`FontOracle`] that assumes "installed"
/// whenever the probe fails.
#[derive(Debug, Clone)]
pub struct FailOpen<P> {
    probe: P,
}

impl<P: FontProbe> FailOpen<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// The wrapped probe.
    pub fn probe(&self) -> &P {
        &self.probe
    }
}

impl<P: FontProbe> FontOracle for FailOpen<P> {
    fn is_installed(&self, name: &str) -> bool {
        match self.probe.probe(name) {
            Ok(installed) => installed,
            Err(e) => {
                log::warn!("Font detect failed, assuming installed: {} ({})", name, e);
                true
            }
        }
    }
}

/// An oracle backed by a fixed set of installed font names.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    installed: HashSet<String>,
}

impl StaticOracle {
    /// Create an oracle that knows only the given fonts.
    pub fn new<I, S>(installed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: installed.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark another font as installed.
    pub fn with_installed(mut self, name: impl Into<String>) -> Self {
        self.installed.insert(name.into());
        self
    }
}

impl FontOracle for StaticOracle {
    fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(name)
    }
}

/// Reports every font as installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeInstalled;

impl FontOracle for AssumeInstalled {
    fn is_installed(&self, _name: &str) -> bool {
        true
    }
}

/// Checks a list of overrides before falling back to another oracle.
#[derive(Debug, Clone)]
pub struct WithOverrides<O> {
    inner: O,
    installed: HashSet<String>,
}

impl<O: FontOracle> WithOverrides<O> {
    pub fn new<I, S>(inner: O, installed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner,
            installed: installed.into_iter().map(Into::into).collect(),
        }
    }
}

impl<O: FontOracle> FontOracle for WithOverrides<O> {
    fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(name) || self.inner.is_installed(name)
    }
}

/// Memoises another oracle so that every name is asked at most once.
///
/// A scan wraps its oracle in one of these, which keeps the answers for a
/// given name identical across all slides of that scan. Names are cached
/// under their [`FontMatching`] key: the answer for the first spelling of a
/// family stands for every spelling that matches it.
#[derive(Debug)]
pub struct CachedOracle<O> {
    inner: O,
    matching: FontMatching,
    answers: RefCell<HashMap<String, bool>>,
}

impl<O: FontOracle> CachedOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            matching: FontMatching::Exact,
            answers: RefCell::new(HashMap::new()),
        }
    }

    /// Cache answers under the given matching policy's keys.
    pub fn with_matching(mut self, matching: FontMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Number of distinct names asked so far.
    pub fn queried(&self) -> usize {
        self.answers.borrow().len()
    }
}

impl<O: FontOracle> FontOracle for CachedOracle<O> {
    fn is_installed(&self, name: &str) -> bool {
        let key = self.matching.key(name);
        if let Some(&installed) = self.answers.borrow().get(&*key) {
            return installed;
        }
        let installed = self.inner.is_installed(name);
        log::debug!("Font '{}' installed: {}", name, installed);
        self.answers.borrow_mut().insert(key.into_owned(), installed);
        installed
    }
}
