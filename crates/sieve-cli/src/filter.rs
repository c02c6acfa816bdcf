//! Interactive filtering harness
//!
//! Reads URLs one per line and writes each back prefixed with `+` (accepted)
//! or `-` (rejected).

use std::io::{self, BufRead, Write};

use clap::ValueEnum;
use serde::Serialize;

use sieve_core::{FilterEngine, HostResolver, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    pub format: OutputFormat,
    pub explain: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Serialize)]
struct DecisionRecord<'a> {
    url: &'a str,
    accepted: bool,
    rule: Option<MatchedRule<'a>>,
}

#[derive(Serialize)]
struct MatchedRule<'a> {
    index: usize,
    sign: bool,
    pattern: &'a str,
    scope: Option<&'a str>,
}

impl<'a> MatchedRule<'a> {
    fn new(index: usize, rule: &'a Rule) -> Self {
        Self {
            index,
            sign: rule.sign(),
            pattern: rule.pattern.as_str(),
            scope: rule.scope.as_deref(),
        }
    }
}

/// Filter every URL read from `input`, writing one line per URL to `output`.
pub fn run_filter<R, W, H>(
    engine: &FilterEngine<H>,
    input: R,
    mut output: W,
    opts: FilterOptions,
) -> io::Result<FilterStats>
where
    R: BufRead,
    W: Write,
    H: HostResolver,
{
    let mut stats = FilterStats::default();

    for line in input.lines() {
        let url = line?;

        let result = engine.evaluate(&url);
        if result.accepted {
            stats.accepted += 1;
        } else {
            stats.rejected += 1;
        }

        let matched = result
            .rule_index
            .map(|index| MatchedRule::new(index, &engine.rules()[index]));

        match opts.format {
            OutputFormat::Text => {
                let sign = if result.accepted { '+' } else { '-' };
                write!(output, "{}{}", sign, url)?;
                if opts.explain {
                    match &matched {
                        Some(rule) => {
                            let sigil = if rule.sign { '+' } else { '-' };
                            write!(output, "\t# rule {}: {}{}", rule.index, sigil, rule.pattern)?;
                            if let Some(scope) = rule.scope {
                                write!(output, " (>{})", scope)?;
                            }
                        }
                        None => write!(output, "\t# no rule matched")?,
                    }
                }
                writeln!(output)?;
            }
            OutputFormat::Json => {
                let record = DecisionRecord {
                    url: &url,
                    accepted: result.accepted,
                    rule: matched,
                };
                serde_json::to_writer(&mut output, &record)?;
                writeln!(output)?;
            }
        }
    }

    output.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_compiler::build_engine;
    use sieve_core::BasicRuleFactory;

    const RULES: &str = ">shop.example.com\n+/cart\n<\n+news\\.example\\.com\n-.*\n";

    fn filter(input: &str, opts: FilterOptions) -> (String, FilterStats) {
        let engine = build_engine(RULES, BasicRuleFactory).unwrap();
        let mut out = Vec::new();
        let stats = run_filter(&engine, input.as_bytes(), &mut out, opts).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_text_output() {
        let (out, stats) = filter(
            "http://news.example.com/a\nhttp://other.example.com/a\n\nhttp://shop.example.com/cart\n",
            FilterOptions::default(),
        );
        assert_eq!(
            out,
            "+http://news.example.com/a\n-http://other.example.com/a\n-\n+http://shop.example.com/cart\n"
        );
        assert_eq!(stats, FilterStats { accepted: 2, rejected: 2 });
    }

    #[test]
    fn test_every_input_line_gets_a_decision() {
        let engine = build_engine("+^$\n", BasicRuleFactory).unwrap();
        let mut out = Vec::new();
        let stats = run_filter(&engine, "\n\nhttp://a.com/\n".as_bytes(), &mut out, FilterOptions::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "+\n+\n-http://a.com/\n");
        assert_eq!(stats, FilterStats { accepted: 2, rejected: 1 });
    }

    #[test]
    fn test_explain_output() {
        let opts = FilterOptions {
            explain: true,
            ..FilterOptions::default()
        };
        let (out, _) = filter("http://shop.example.com/cart\nhttp://other.com/x\n", opts);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "+http://shop.example.com/cart\t# rule 0: +/cart (>shop.example.com)");
        assert_eq!(lines[1], "-http://other.com/x\t# rule 2: -.*");
    }

    #[test]
    fn test_explain_default_reject() {
        let engine = build_engine("+only-this\n", BasicRuleFactory).unwrap();
        let mut out = Vec::new();
        let opts = FilterOptions {
            explain: true,
            ..FilterOptions::default()
        };
        run_filter(&engine, "http://a.com/\n".as_bytes(), &mut out, opts).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "-http://a.com/\t# no rule matched\n");
    }

    #[test]
    fn test_json_output() {
        let opts = FilterOptions {
            format: OutputFormat::Json,
            explain: false,
        };
        let (out, _) = filter("http://shop.example.com/cart\n", opts);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["url"], "http://shop.example.com/cart");
        assert_eq!(value["accepted"], true);
        assert_eq!(value["rule"]["index"], 0);
        assert_eq!(value["rule"]["pattern"], "/cart");
        assert_eq!(value["rule"]["scope"], "shop.example.com");
    }

    #[test]
    fn test_json_default_reject_has_null_rule() {
        let engine = build_engine("", BasicRuleFactory).unwrap();
        let mut out = Vec::new();
        let opts = FilterOptions {
            format: OutputFormat::Json,
            explain: false,
        };
        run_filter(&engine, "x\n".as_bytes(), &mut out, opts).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["accepted"], false);
        assert!(value["rule"].is_null());
    }
}
