use super::error::ParseError;
use super::lines::LineStore;
use super::names::decode_name;
use super::types::{Method, Phase};
use regex::Regex;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"(begin|end)_(compilation|cfg)").expect("tag regex failed to compile")
    })
}

fn name_re() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r#"name "([^"]*)""#).expect("name regex failed to compile"))
}

fn method_re() -> &'static Regex {
    static METHOD: OnceLock<Regex> = OnceLock::new();
    METHOD.get_or_init(|| {
        Regex::new(r#"(?:^|\s)method "([^"]*)""#).expect("method regex failed to compile")
    })
}

fn opt_id_re() -> &'static Regex {
    static OPT_ID: OnceLock<Regex> = OnceLock::new();
    OPT_ID.get_or_init(|| Regex::new(r":(\d+)$").expect("opt id regex failed to compile"))
}

/// Structural markers recognised in a hydrogen log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    BeginCompilation,
    EndCompilation,
    BeginCfg,
    EndCfg,
}

impl Tag {
    /// Find the first tag anywhere in `line`.
    pub fn find(line: &str) -> Option<Tag> {
        let caps = tag_re().captures(line)?;
        let tag = match (&caps[1], &caps[2]) {
            ("begin", "compilation") => Tag::BeginCompilation,
            ("end", "compilation") => Tag::EndCompilation,
            ("begin", _) => Tag::BeginCfg,
            _ => Tag::EndCfg,
        };
        Some(tag)
    }
}

/// Parse state carried from one line to the next.
///
/// Only one pending begin tag is tracked: cfg blocks are assumed to close
/// before the next `begin_*` appears. The last element of `methods` is the
/// record new phases attach to.
#[derive(Debug, Default, Clone)]
pub struct ParserState {
    last_tag_line: Option<usize>,
    methods: Vec<Method>,
}

impl ParserState {
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Process line `n`, which must already be stored in `lines`.
    ///
    /// On error the state is left as it was before the call.
    pub fn step(&mut self, lines: &LineStore, n: usize) -> Result<(), ParseError> {
        let Some(tag) = lines.get(n).and_then(Tag::find) else {
            return Ok(());
        };

        match tag {
            Tag::BeginCompilation | Tag::BeginCfg => {
                self.last_tag_line = Some(n);
            }
            Tag::EndCompilation => {
                let begin = self.pending_begin(n)?;
                let header = begin + 1;
                let raw_name = field_name(lines, header)?;
                let opt_id = lines.get(header + 1).and_then(parse_opt_id);

                let method = Method::new(decode_name(&raw_name), opt_id);
                log::debug!(
                    "line {}: method {} (opt id {:?})",
                    n,
                    method.name.full,
                    method.opt_id
                );
                self.methods.push(method);
            }
            Tag::EndCfg => {
                let begin = self.pending_begin(n)?;
                let name = field_name(lines, begin + 1)?;
                let method = self
                    .methods
                    .last_mut()
                    .ok_or(ParseError::OrphanPhase { line: n })?;

                log::trace!("lines {}..{}: phase {}", begin, n, name);
                method.phases.push(Phase {
                    name,
                    start_line: begin,
                    end_line: n,
                });
            }
        }

        Ok(())
    }

    fn pending_begin(&self, line: usize) -> Result<usize, ParseError> {
        self.last_tag_line.ok_or(ParseError::MissingBeginTag { line })
    }
}

fn field_name(lines: &LineStore, index: usize) -> Result<String, ParseError> {
    lines
        .get(index)
        .and_then(|line| name_re().captures(line))
        .map(|caps| caps[1].to_string())
        .ok_or(ParseError::MissingName { line: index })
}

fn parse_opt_id(line: &str) -> Option<String> {
    let method = method_re().captures(line)?;
    let id = opt_id_re().captures(&method[1])?;
    Some(id[1].to_string())
}

/// Result of a completed parse: every stored line plus the method index.
#[derive(Debug, Default, Clone)]
pub struct ParsedLog {
    pub lines: LineStore,
    pub methods: Vec<Method>,
}

/// Single forward pass over a hydrogen log.
#[derive(Debug, Default)]
pub struct TraceParser {
    lines: LineStore,
    state: ParserState,
}

impl TraceParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line of the log, in file order.
    pub fn observe(&mut self, line: impl Into<String>) -> Result<(), ParseError> {
        let n = self.lines.append(line);
        self.state.step(&self.lines, n)
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    pub fn methods(&self) -> &[Method] {
        self.state.methods()
    }

    /// Hand back everything collected so far.
    pub fn finish(self) -> ParsedLog {
        log::debug!(
            "parsed {} lines, {} methods",
            self.lines.len(),
            self.state.methods.len()
        );
        ParsedLog {
            lines: self.lines,
            methods: self.state.methods,
        }
    }
}

/// Parse a complete sequence of lines.
pub fn parse_lines<I, S>(lines: I) -> Result<ParsedLog, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines
        .into_iter()
        .try_fold(TraceParser::new(), |mut parser, line| {
            parser.observe(line)?;
            Ok(parser)
        })
        .map(TraceParser::finish)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MethodName;
    use pretty_assertions::assert_eq;

    const SIMPLE: &[&str] = &[
        "begin_compilation",
        "  name \"f\"",
        "  method \"f:3\"",
        "  date 1400000000",
        "end_compilation",
        "begin_cfg",
        "  name \"P1\"",
        "  begin_block",
        "    name \"B0\"",
        "  end_block",
        "end_cfg",
    ];

    #[test]
    fn finds_tags_anywhere_in_line() {
        assert_eq!(Tag::find("begin_compilation"), Some(Tag::BeginCompilation));
        assert_eq!(Tag::find("  end_cfg"), Some(Tag::EndCfg));
        assert_eq!(Tag::find("xx begin_cfgyy"), Some(Tag::BeginCfg));
        assert_eq!(Tag::find("end_compilation\r"), Some(Tag::EndCompilation));
        assert_eq!(Tag::find("begin_block"), None);
    }

    #[test]
    fn single_method_single_phase() {
        let parsed = parse_lines(SIMPLE.iter().copied()).unwrap();

        assert_eq!(parsed.lines.len(), SIMPLE.len());
        assert_eq!(
            parsed.methods,
            vec![Method {
                name: MethodName {
                    full: "f".to_string(),
                    source: None,
                    short: "f".to_string(),
                },
                opt_id: Some("3".to_string()),
                phases: vec![Phase {
                    name: "P1".to_string(),
                    start_line: 5,
                    end_line: 10,
                }],
            }]
        );
    }

    #[test]
    fn opt_id_absent_without_numeric_suffix() {
        let parsed = parse_lines([
            "begin_compilation",
            "  name \"g\"",
            "  method \"g\"",
            "end_compilation",
            "begin_compilation",
            "  name \"h\"",
            "end_compilation",
        ])
        .unwrap();

        assert_eq!(parsed.methods.len(), 2);
        assert_eq!(parsed.methods[0].opt_id, None);
        assert_eq!(parsed.methods[1].opt_id, None);
    }

    #[test]
    fn phases_attach_to_latest_method() {
        let mut lines: Vec<&str> = SIMPLE.to_vec();
        lines.extend([
            "begin_compilation",
            "  name \"$lib$$max$\"",
            "  method \"max:12\"",
            "end_compilation",
            "begin_cfg",
            "  name \"H_GVN\"",
            "end_cfg",
            "begin_cfg",
            "  name \"H_DCE\"",
            "end_cfg",
        ]);

        let parsed = parse_lines(lines).unwrap();
        assert_eq!(parsed.methods.len(), 2);
        assert_eq!(parsed.methods[0].phases.len(), 1);

        let second = &parsed.methods[1];
        assert_eq!(second.name.source.as_deref(), Some("lib"));
        assert_eq!(second.name.short, "max");
        assert_eq!(second.opt_id.as_deref(), Some("12"));

        let names: Vec<&str> = second.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["H_GVN", "H_DCE"]);
        assert_eq!((second.phases[0].start_line, second.phases[0].end_line), (15, 17));
        assert_eq!((second.phases[1].start_line, second.phases[1].end_line), (18, 20));
    }

    #[test]
    fn missing_name_is_fatal() {
        let err = parse_lines(["begin_compilation", "  method \"f:1\"", "end_compilation"])
            .unwrap_err();
        assert_eq!(err, ParseError::MissingName { line: 1 });
    }

    #[test]
    fn end_without_begin_is_fatal() {
        let err = parse_lines(["noise", "end_compilation"]).unwrap_err();
        assert_eq!(err, ParseError::MissingBeginTag { line: 1 });
    }

    #[test]
    fn phase_before_any_method_is_fatal() {
        let err = parse_lines(["begin_cfg", "  name \"P\"", "end_cfg"]).unwrap_err();
        assert_eq!(err, ParseError::OrphanPhase { line: 2 });
    }

    #[test]
    fn failed_step_keeps_previous_state() {
        let mut parser = TraceParser::new();
        for line in SIMPLE {
            parser.observe(*line).unwrap();
        }
        parser.observe("begin_cfg").unwrap();
        assert!(parser.observe("end_cfg").is_err());

        assert_eq!(parser.lines().len(), SIMPLE.len() + 2);
        assert_eq!(parser.methods()[0].phases.len(), 1);
    }

    #[test]
    fn early_finish_returns_partial_result() {
        let mut parser = TraceParser::new();
        for line in &SIMPLE[..6] {
            parser.observe(*line).unwrap();
        }
        let parsed = parser.finish();
        assert_eq!(parsed.methods.len(), 1);
        assert!(parsed.methods[0].phases.is_empty());
    }

    #[test]
    fn nested_cfg_shares_single_begin_slot() {
        let mut lines: Vec<&str> = SIMPLE.to_vec();
        lines.extend([
            "begin_cfg",
            "  name \"OUTER\"",
            "begin_cfg",
            "  name \"INNER\"",
            "end_cfg",
            "end_cfg",
        ]);

        let parsed = parse_lines(lines).unwrap();
        assert_eq!(
            &parsed.methods[0].phases[1..],
            &[
                Phase {
                    name: "INNER".to_string(),
                    start_line: 13,
                    end_line: 15,
                },
                Phase {
                    name: "INNER".to_string(),
                    start_line: 13,
                    end_line: 16,
                },
            ]
        );
    }
}
