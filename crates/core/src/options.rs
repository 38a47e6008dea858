// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed view of a manifest's option lines.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Option keys stored as `key=value` lines.
pub const COMPILER_KEY: &str = "compiler";
pub const MEMTYPE_KEY: &str = "memtype";
pub const OPTIMIZATION_KEY: &str = "optimization";
pub const CFLAGS_KEY: &str = "cflags";
pub const LFLAGS_KEY: &str = "lflags";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown project option: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("unknown project flag: {0}")]
    UnknownFlag(String),
}

/// Source language of the project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Language {
    #[default]
    C,
    #[serde(rename = "C++")]
    Cpp,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }
}

impl FromStr for Language {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" | "c" => Ok(Language::C),
            "C++" | "c++" | "cpp" => Ok(Language::Cpp),
            other => Err(OptionError::InvalidValue {
                key: COMPILER_KEY.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Boolean project switches, stored as bare option lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    WarnAll,
    Doubles32,
    Exceptions,
    NoFcache,
    SimplePrintf,
    MathLib,
    PthreadLib,
    StripElf,
}

impl Flag {
    pub const ALL: [Flag; 8] = [
        Flag::WarnAll,
        Flag::Doubles32,
        Flag::Exceptions,
        Flag::NoFcache,
        Flag::SimplePrintf,
        Flag::MathLib,
        Flag::PthreadLib,
        Flag::StripElf,
    ];

    /// Toolchain argument the flag contributes.
    pub fn arg(&self) -> &'static str {
        match self {
            Flag::WarnAll => "-Wall",
            Flag::Doubles32 => "-m32bit-doubles",
            Flag::Exceptions => "-fexceptions",
            Flag::NoFcache => "-mno-fcache",
            Flag::SimplePrintf => "-Dprintf=__simple_printf",
            Flag::MathLib => "-lm",
            Flag::PthreadLib => "-lpthread",
            Flag::StripElf => "-s",
        }
    }

    /// Name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Flag::WarnAll => "warn-all",
            Flag::Doubles32 => "32bit-doubles",
            Flag::Exceptions => "exceptions",
            Flag::NoFcache => "no-fcache",
            Flag::SimplePrintf => "simple-printf",
            Flag::MathLib => "math-lib",
            Flag::PthreadLib => "pthread-lib",
            Flag::StripElf => "strip",
        }
    }

    fn from_arg(arg: &str) -> Option<Flag> {
        Flag::ALL.into_iter().find(|f| f.arg() == arg)
    }
}

impl FromStr for Flag {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::ALL
            .into_iter()
            .find(|f| f.name() == s || f.arg() == s)
            .ok_or_else(|| OptionError::UnknownFlag(s.to_string()))
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiler and linker settings of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOptions {
    pub compiler: Language,
    pub memtype: String,
    pub optimization: String,
    pub cflags: String,
    pub lflags: String,
    pub flags: BTreeSet<Flag>,
    /// Option lines this version does not understand, kept verbatim.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            compiler: Language::C,
            memtype: "LMM".to_string(),
            optimization: "-Os".to_string(),
            cflags: String::new(),
            lflags: String::new(),
            flags: BTreeSet::new(),
            extra: Vec::new(),
        }
    }
}

impl ProjectOptions {
    /// Build from option lines (markers already stripped).
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut options = ProjectOptions::default();
        for line in lines {
            let line = line.as_ref();
            if let Some(flag) = Flag::from_arg(line.trim()) {
                options.flags.insert(flag);
                continue;
            }
            let applied = match line.split_once('=') {
                Some((key, value)) => options.set(key.trim(), value.trim()).is_ok(),
                None => false,
            };
            if !applied {
                tracing::debug!(option = line, "keeping unrecognized project option");
                options.extra.push(line.to_string());
            }
        }
        options
    }

    /// Serialize back to option lines (without markers).
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{COMPILER_KEY}={}", self.compiler.as_str()),
            format!("{MEMTYPE_KEY}={}", self.memtype),
            format!("{OPTIMIZATION_KEY}={}", self.optimization),
        ];
        if !self.cflags.is_empty() {
            lines.push(format!("{CFLAGS_KEY}={}", self.cflags));
        }
        if !self.lflags.is_empty() {
            lines.push(format!("{LFLAGS_KEY}={}", self.lflags));
        }
        lines.extend(self.flags.iter().map(|f| f.arg().to_string()));
        lines.extend(self.extra.iter().cloned());
        lines
    }

    /// Set a `key=value` option.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), OptionError> {
        match key {
            COMPILER_KEY => self.compiler = value.parse()?,
            MEMTYPE_KEY => {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(OptionError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
                self.memtype = value.to_string();
            }
            OPTIMIZATION_KEY => self.optimization = value.to_string(),
            CFLAGS_KEY => self.cflags = value.to_string(),
            LFLAGS_KEY => self.lflags = value.to_string(),
            other => return Err(OptionError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn set_flag(&mut self, flag: Flag, on: bool) {
        if on {
            self.flags.insert(flag);
        } else {
            self.flags.remove(&flag);
        }
    }

    pub fn has(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// Compiler switches that precede the input files.
    pub fn compile_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if !self.optimization.is_empty() {
            args.push(self.optimization.clone());
        }
        args.push(format!("-m{}", self.memtype.to_lowercase()));
        for flag in [
            Flag::WarnAll,
            Flag::Doubles32,
            Flag::Exceptions,
            Flag::NoFcache,
            Flag::SimplePrintf,
        ] {
            if self.has(flag) {
                args.push(flag.arg().to_string());
            }
        }
        if self.compiler == Language::Cpp {
            args.push("-fno-rtti".to_string());
        }
        args.extend(self.cflags.split_whitespace().map(str::to_string));
        args
    }

    /// Library and linker switches that follow the input files.
    pub fn link_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for flag in [Flag::MathLib, Flag::PthreadLib] {
            if self.has(flag) {
                args.push(flag.arg().to_string());
            }
        }
        args.extend(self.lflags.split_whitespace().map(str::to_string));
        if self.has(Flag::StripElf) {
            args.push(Flag::StripElf.arg().to_string());
        }
        args
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
