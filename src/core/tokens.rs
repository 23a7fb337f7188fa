//! Budget unit counting.
//!
//! A precise BPE tokenizer is used when it is compiled in and loads;
//! otherwise text length divided by four stands in for it. The strategy is
//! picked once per process and never changes during a run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PlintError;

/// Maps text to a budget unit count.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    /// Human-readable name of the counting strategy.
    fn method(&self) -> &'static str;
}

/// Approximate count: ~4 characters per token for prose and markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxCounter;

impl TokenCounter for ApproxCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count() / 4
    }

    fn method(&self) -> &'static str {
        "approximation (~4 chars/token)"
    }
}

/// Precise count using the `cl100k_base` encoding.
#[cfg(feature = "tiktoken")]
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "tiktoken")]
impl TiktokenCounter {
    pub fn new() -> crate::error::Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| PlintError::Config(format!("load cl100k_base tokenizer: {e}")))?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "tiktoken")]
impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn method(&self) -> &'static str {
        "tiktoken (cl100k_base)"
    }
}

/// Requested counting strategy.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerMethod {
    /// Precise when available, approximate otherwise
    #[default]
    Auto,
    Tiktoken,
    Approximate,
}

impl FromStr for TokenizerMethod {
    type Err = PlintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "tiktoken" | "precise" => Ok(Self::Tiktoken),
            "approximate" | "approx" | "approximation" => Ok(Self::Approximate),
            other => Err(PlintError::Config(format!(
                "invalid tokenizer method {other} (expected auto|tiktoken|approximate)"
            ))),
        }
    }
}

impl fmt::Display for TokenizerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Tiktoken => write!(f, "tiktoken"),
            Self::Approximate => write!(f, "approximate"),
        }
    }
}

/// Pick the counter for this process.
#[must_use]
pub fn select_counter(method: TokenizerMethod) -> Box<dyn TokenCounter> {
    let counter: Box<dyn TokenCounter> = match method {
        TokenizerMethod::Approximate => Box::new(ApproxCounter),
        TokenizerMethod::Auto => precise_counter().unwrap_or_else(|| Box::new(ApproxCounter)),
        TokenizerMethod::Tiktoken => precise_counter().unwrap_or_else(|| {
            warn!("precise tokenizer requested but unavailable; using approximation");
            Box::new(ApproxCounter)
        }),
    };
    info!(method = counter.method(), "token counting method selected");
    counter
}

#[cfg(feature = "tiktoken")]
fn precise_counter() -> Option<Box<dyn TokenCounter>> {
    match TiktokenCounter::new() {
        Ok(counter) => Some(Box::new(counter)),
        Err(err) => {
            warn!(error = %err, "tokenizer failed to load");
            None
        }
    }
}

#[cfg(not(feature = "tiktoken"))]
const fn precise_counter() -> Option<Box<dyn TokenCounter>> {
    None
}
