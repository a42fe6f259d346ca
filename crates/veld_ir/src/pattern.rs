//! Pattern literals and their lazily compiled, cached form.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use regex::RegexBuilder;

use crate::inline::InlineMap;
use crate::operand::Operand;

/// Text-encoding mode the host runtime is operating under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

/// Compilation options carried by a pattern literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatternOpts {
    /// Compile once and keep the first result even when the source operand
    /// is not constant.
    pub once: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub extended: bool,
}

impl fmt::Display for PatternOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ignore_case {
            f.write_str("i")?;
        }
        if self.multiline {
            f.write_str("m")?;
        }
        if self.extended {
            f.write_str("x")?;
        }
        if self.once {
            f.write_str("o")?;
        }
        Ok(())
    }
}

/// A compiled pattern value.
#[derive(Debug)]
pub struct CompiledPattern {
    regex: regex::Regex,
    opts: PatternOpts,
    literal: bool,
}

impl CompiledPattern {
    pub fn compile(
        source: &str,
        opts: PatternOpts,
        encoding: Encoding,
    ) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(opts.ignore_case)
            .multi_line(opts.multiline)
            .ignore_whitespace(opts.extended)
            .unicode(encoding == Encoding::Utf8)
            .build()?;
        Ok(Self {
            regex,
            opts,
            literal: false,
        })
    }

    /// Marks this pattern as a literal. Literal patterns keep identity
    /// under the object model's duplication rules.
    pub fn into_literal(mut self) -> Self {
        self.literal = true;
        self
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn opts(&self) -> PatternOpts {
        self.opts
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn regex(&self) -> &regex::Regex {
        &self.regex
    }
}

/// The most recently compiled pattern, together with the encoding mode it
/// was compiled under.
#[derive(Clone, Debug)]
pub struct PatternCache {
    pub pattern: Rc<CompiledPattern>,
    pub encoding: Encoding,
}

/// A literal pattern operand. The compiled form is produced lazily by the
/// interpreter and cached here. The cache slot has a single writer per
/// instance; it is shared only when a constant pattern is reused across
/// inlined copies.
#[derive(Clone, Debug)]
pub struct PatternLit {
    source: Operand,
    opts: PatternOpts,
    cache: Rc<RefCell<Option<PatternCache>>>,
}

impl PatternLit {
    pub fn new(source: Operand, opts: PatternOpts) -> Self {
        Self {
            source,
            opts,
            cache: Rc::new(RefCell::new(None)),
        }
    }

    pub fn source(&self) -> &Operand {
        &self.source
    }

    pub(crate) fn source_mut(&mut self) -> &mut Operand {
        &mut self.source
    }

    pub fn opts(&self) -> PatternOpts {
        self.opts
    }

    pub fn is_constant(&self) -> bool {
        self.source.is_constant()
    }

    /// Returns the cached compiled pattern if it is still valid under
    /// `encoding`. A miss means the caller must recompile: the source is
    /// non-constant and the once flag is unset, or nothing is cached yet,
    /// or the encoding mode changed since the cached value was compiled.
    pub fn cached(&self, encoding: Encoding) -> Option<Rc<CompiledPattern>> {
        let cache = self.cache.borrow();
        let entry = cache.as_ref()?;
        if !self.source.is_constant() && !self.opts.once {
            return None;
        }
        if entry.encoding != encoding {
            return None;
        }
        Some(Rc::clone(&entry.pattern))
    }

    /// Stores a freshly compiled pattern as the new cache entry.
    pub fn store(&self, pattern: Rc<CompiledPattern>, encoding: Encoding) {
        *self.cache.borrow_mut() = Some(PatternCache { pattern, encoding });
    }

    /// Constant patterns are shared wholesale, cache slot included; a
    /// non-constant pattern gets a renamed source and a fresh cache.
    pub fn clone_for_inlining(&self, map: &InlineMap) -> PatternLit {
        if self.is_constant() {
            self.clone()
        } else {
            PatternLit::new(self.source.clone_for_inlining(map), self.opts)
        }
    }
}

impl PartialEq for PatternLit {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.opts == other.opts
    }
}

impl fmt::Display for PatternLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "re:|{}|{}", self.source, self.opts)
    }
}
