//! Deterministic answer classification.
//!
//! Every answer maps to exactly one [`AnswerType`]. Checks run in priority
//! order and the first match wins:
//!
//! 1. `Unknown`: empty after normalization, or an "I don't know" phrase
//! 2. `Mechanism`: a named component, resource, process, or measured quantity
//! 3. `Context`: a condition, timing, or setting
//! 4. `Vague`: everything else

use std::sync::LazyLock;

use regex::Regex;
use whys_core::enums::AnswerType;

/// Multi-word inability phrases, matched on whole-word boundaries.
const UNKNOWN_PHRASES: &[&str] = &[
    "i dont know",
    "dont know",
    "do not know",
    "not sure",
    "no idea",
    "cant say",
    "cannot say",
    "cant tell",
    "cannot tell",
    "no clue",
    "hard to say",
    "not certain",
    "no one knows",
    "its unknown",
    "it is unknown",
    "cause is unknown",
    "reason is unknown",
    "still unknown",
];

/// Single-token inability markers, matched anywhere.
const UNKNOWN_TOKENS: &[&str] = &["idk", "dunno", "unsure"];

/// Answers that are unknown only when they are the whole reply. As a
/// modifier ("an unknown error code") the word describes the mechanism.
const UNKNOWN_ANSWERS: &[&str] = &["unknown", "cause unknown", "reason unknown", "unknown cause"];

const MECHANISM_TERMS: &[&str] = &[
    // data stores
    "database", "databases", "db", "query", "queries", "sql", "index", "indexes", "table",
    "tables", "schema", "replica", "replication", "shard", "transaction", "transactions",
    "deadlock", "lock", "locks", "postgres", "postgresql", "mysql", "redis", "mongodb",
    // compute and memory
    "cpu", "gpu", "memory", "ram", "heap", "stack", "swap", "leak", "gc", "garbage",
    "thread", "threads", "process", "processes", "kernel", "driver", "drivers", "firmware",
    "container", "containers", "pod", "pods", "vm",
    // services and plumbing
    "api", "endpoint", "endpoints", "server", "servers", "service", "services", "backend",
    "connection", "connections", "pool", "pools", "socket", "sockets", "port", "timeout",
    "timeouts", "retry", "retries", "cache", "caches", "cached", "queue", "queues",
    "worker", "workers", "scheduler", "cron", "job", "jobs", "request", "requests",
    "disk", "disks", "storage", "io", "network", "bandwidth", "packet", "packets", "dns",
    "cdn", "proxy", "balancer", "certificate", "tls", "ssl", "kafka", "nginx", "buffer",
    "buffers", "exception", "exceptions", "bug", "regression", "battery", "cpus",
];

const CONTEXT_TERMS: &[&str] = &[
    "after", "before", "during", "when", "whenever", "while", "since", "until", "once",
    "peak", "morning", "mornings", "afternoon", "evening", "night", "nightly", "overnight",
    "weekend", "weekends", "weekday", "weekdays", "daily", "weekly", "monthly", "hours",
    "hour", "today", "yesterday", "recently", "lately", "usually", "sometimes", "always",
    "update", "updates", "updated", "upgrade", "upgraded", "deploy", "deployed",
    "deployment", "release", "released", "rollout", "migration", "launch", "environment",
    "production", "staging", "configuration", "config", "setting", "settings", "version",
    "users", "customers", "traffic", "load", "holiday", "season", "region",
];

/// `100%`, `250ms`, `4 gb`, `30 seconds`.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*(?:%|(?:ms|milliseconds?|s|secs?|seconds?|minutes?|mins?|kb|mb|gb|tb|ghz|mhz|rps|qps|connections|threads|requests|errors)\b)",
    )
    .expect("valid quantity regex")
});

/// CamelCase component names such as `WindowServer` or `PostgreSQL`.
static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+[A-Z][A-Za-z0-9]*\b").expect("valid component regex"));

/// Lowercase, drop apostrophes, replace other non-alphanumerics with spaces,
/// and collapse whitespace.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | '`'))
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `text` names a component, resource, process, or measured quantity.
#[must_use]
pub fn has_mechanism_indicator(text: &str) -> bool {
    let normalized = normalize(text);
    contains_term(&normalized, MECHANISM_TERMS)
        || QUANTITY_RE.is_match(text)
        || COMPONENT_RE.is_match(text)
}

fn is_unknown(normalized: &str) -> bool {
    if normalized.is_empty() || UNKNOWN_ANSWERS.contains(&normalized) {
        return true;
    }
    let padded = format!(" {normalized} ");
    UNKNOWN_PHRASES
        .iter()
        .any(|p| padded.contains(&format!(" {p} ")))
        || contains_term(normalized, UNKNOWN_TOKENS)
}

fn is_context(normalized: &str) -> bool {
    contains_term(normalized, CONTEXT_TERMS)
}

fn contains_term(normalized: &str, terms: &[&str]) -> bool {
    normalized.split(' ').any(|token| terms.contains(&token))
}

/// Labels answers. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerClassifier;

impl AnswerClassifier {
    /// Classify a single answer.
    #[must_use]
    pub fn classify(text: &str) -> AnswerType {
        let normalized = normalize(text);
        if is_unknown(&normalized) {
            AnswerType::Unknown
        } else if has_mechanism_indicator(text) {
            AnswerType::Mechanism
        } else if is_context(&normalized) {
            AnswerType::Context
        } else {
            AnswerType::Vague
        }
    }
}
