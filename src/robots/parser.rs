//! Robots.txt rule parser
//!
//! Builds the ordered rule list for one crawler identity. Only `User-agent`,
//! `Allow` and `Disallow` directives are understood; everything else is ignored.

use crate::url::{decode_path, matches_wildcard};
use regex::Regex;
use std::sync::OnceLock;

/// One recorded `Allow`/`Disallow` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsRule {
    /// Percent-decoded path prefix
    pub path: String,
    /// true for `Allow`, false for `Disallow`
    pub allow: bool,
}

impl RobotsRule {
    pub fn allow(path: &str) -> Self {
        Self {
            path: path.to_string(),
            allow: true,
        }
    }

    pub fn deny(path: &str) -> Self {
        Self {
            path: path.to_string(),
            allow: false,
        }
    }
}

/// Directive recognised on a robots.txt line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    UserAgent(String),
    Allow(String),
    Disallow(String),
}

fn directive_regex() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        Regex::new(r"(?i)^(user-agent|allow|disallow)\s*:\s*([^#]*)")
            .expect("directive pattern is valid")
    })
}

fn parse_directive(line: &str) -> Option<Directive> {
    let captures = directive_regex().captures(line.trim())?;
    let value = captures.get(2)?.as_str().trim().to_string();

    match captures.get(1)?.as_str().to_ascii_lowercase().as_str() {
        "user-agent" => Some(Directive::UserAgent(value)),
        "allow" => Some(Directive::Allow(value)),
        "disallow" => Some(Directive::Disallow(value)),
        _ => None,
    }
}

/// Line-by-line robots.txt parser for a single crawler identity
///
/// `matching` is the parser state: it flips on every `User-agent` line
/// depending on whether the identity matches that line's wildcard. `Allow` and
/// `Disallow` lines are recorded only while it is set.
#[derive(Debug)]
pub struct RuleSetParser {
    user_agent: String,
    matching: bool,
    rules: Vec<RobotsRule>,
}

impl RuleSetParser {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            matching: false,
            rules: Vec::new(),
        }
    }

    /// Whether the directives currently being read apply to this identity
    pub fn is_matching(&self) -> bool {
        self.matching
    }

    /// Feeds one line of robots.txt
    pub fn feed_line(&mut self, line: &str) {
        match parse_directive(line) {
            Some(Directive::UserAgent(agent)) => {
                self.matching = matches_wildcard(&agent, &self.user_agent);
            }
            Some(Directive::Allow(path)) if self.matching => self.record(&path, true),
            Some(Directive::Disallow(path)) if self.matching => self.record(&path, false),
            _ => {}
        }
    }

    /// Appends a rule; repeated paths become additional entries
    fn record(&mut self, raw_path: &str, allow: bool) {
        // An empty value (`Disallow:`) places no restriction
        if raw_path.is_empty() {
            return;
        }

        let path = decode_path(raw_path).trim().to_string();

        self.rules.push(RobotsRule { path, allow });
    }

    /// Consumes the parser and returns the rules in file order
    pub fn finish(self) -> Vec<RobotsRule> {
        self.rules
    }
}

/// Parses a whole robots.txt body for one identity
pub fn parse_rules(content: &str, user_agent: &str) -> Vec<RobotsRule> {
    let mut parser = RuleSetParser::new(user_agent);
    for line in content.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}
