//! the statement classifier and scenario/group builder
//!
//! Consumes the scanner's flat depth-tagged record sequence and produces a
//! fully resolved [`ScenarioSet`]. Statements at depth 0 populate the
//! global scope or open a scenario/group; depth 1 statements configure the
//! open block or append steps to it; depth 2 statements configure the step
//! opened directly above them. Scope inheritance is by copy: a scenario
//! seeds its variables and config from the globals in force when its
//! `scenario` statement is reached, so nothing mutated later reaches back
//! into it.

use std::path::{Path, PathBuf};

use crate::error::PacerError;
use crate::language::{
    Assignment, Config, Expression, ExpressionKind, Group, GroupEntry, Numeric, Param, Scenario,
    ScenarioSet, Step, StepKind,
};
use crate::parsing::errors::{BuildError, CycleError, ReferenceError, SyntaxError};
use crate::parsing::expression::{parse_comparison, parse_expression};
use crate::parsing::resolver;
use crate::parsing::scanner::{scan, Record};

macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}

/// Every keyword the language recognizes. Anything else is an unknown
/// statement; one of these in the wrong place is a misplaced one.
const KEYWORDS: [&str; 24] = [
    "set",
    "endpoint",
    "load",
    "scenario",
    "group",
    "include",
    "name",
    "auth",
    "header",
    "blackfire",
    "follow_redirects",
    "warmup",
    "samples",
    "method",
    "body",
    "param",
    "json",
    "wait",
    "visit",
    "click",
    "submit",
    "follow",
    "reload",
    "expect",
];

/// Parse one file's content into a ScenarioSet, resolving `include` and
/// `load` along the way. This is the top of the pipeline; the recursive
/// entry used for loaded files is [`build`].
pub fn parse_scenarios(filename: &Path, content: &str) -> Result<ScenarioSet, PacerError> {
    let mut loading = Vec::new();

    // so the top-level file immediately participates in load cycle
    // detection; a filename that does not exist on disk (content handed in
    // directly) has nothing to canonicalize and cannot be re-loaded anyway
    if let Ok(canonical) = filename.canonicalize() {
        loading.push(canonical);
    }

    build(filename, content, &mut loading).map_err(|error| render(filename, content, error))
}

pub(crate) fn render(filename: &Path, content: &str, error: BuildError) -> PacerError {
    match error {
        BuildError::Parsing(error) => PacerError::new(filename, content, error),
        BuildError::Loaded { offset, inner } => PacerError::wrap(filename, content, offset, *inner),
    }
}

pub(crate) fn build<'i>(
    filename: &Path,
    content: &'i str,
    loading: &mut Vec<PathBuf>,
) -> Result<ScenarioSet, BuildError<'i>> {
    let records = scan(content)?;

    let mut builder = Builder {
        filename,
        loading,
        set: ScenarioSet::default(),
        block: None,
        step_open: false,
        counter: 0,
    };

    for record in &records {
        builder.process(record)?;
    }
    builder.close_block();

    Ok(builder.set)
}

/// The scenario or group currently under construction. At most one is
/// open at a time; a depth-0 statement closes it.
enum Block {
    Scenario(Scenario),
    Group(Group),
}

struct Builder<'a> {
    filename: &'a Path,
    loading: &'a mut Vec<PathBuf>,
    set: ScenarioSet,
    block: Option<Block>,
    // whether the most recent depth-1 statement opened a step, i.e.
    // whether depth-2 statements currently have somewhere to go
    step_open: bool,
    counter: usize,
}

impl<'a> Builder<'a> {
    fn process<'i>(&mut self, record: &Record<'i>) -> Result<(), BuildError<'i>> {
        let (keyword, rest) = split_statement(record.text);
        let offset = record.offset;
        let arg_offset = offset + (record.text.len() - rest.len());

        match record.depth {
            0 => {
                self.close_block();
                self.read_root(keyword, rest, offset, arg_offset)
            }
            1 => self.read_child(keyword, rest, offset, arg_offset),
            2 => self.read_setting(keyword, rest, offset, arg_offset),
            _ => Err(SyntaxError::UnexpectedIndent(offset).into()),
        }
    }

    fn close_block(&mut self) {
        self.step_open = false;
        match self.block.take() {
            Some(Block::Scenario(scenario)) => {
                self.set
                    .scenarios
                    .push(scenario);
            }
            Some(Block::Group(group)) => {
                // redefinition: the later definition wins
                self.set
                    .groups
                    .insert(group.name.clone(), group);
            }
            None => {}
        }
    }

    /// A statement at depth 0: global scope, or opening a scenario/group.
    fn read_root<'i>(
        &mut self,
        keyword: &'i str,
        rest: &'i str,
        offset: usize,
        arg_offset: usize,
    ) -> Result<(), BuildError<'i>> {
        match keyword {
            "scenario" => {
                self.counter += 1;
                let key = if rest.is_empty() {
                    format!("scenario {}", self.counter)
                } else {
                    rest.to_string()
                };
                self.block = Some(Block::Scenario(Scenario {
                    key,
                    variables: self
                        .set
                        .variables
                        .clone(),
                    config: self
                        .set
                        .config
                        .clone(),
                    steps: vec![],
                }));
                Ok(())
            }
            "group" => {
                if rest.is_empty() {
                    return Err(SyntaxError::MissingValue(arg_offset, "a group name").into());
                }
                self.block = Some(Block::Group(Group {
                    name: rest.to_string(),
                    entries: vec![],
                }));
                Ok(())
            }
            "set" => {
                let (name, value) = read_binding(rest, arg_offset)?;
                self.set
                    .variables
                    .insert(name.to_string(), value);
                Ok(())
            }
            "endpoint" => {
                let value = parse_expression(rest, arg_offset)?;
                self.set
                    .variables
                    .insert("endpoint".to_string(), value);
                Ok(())
            }
            "auth" | "header" | "blackfire" | "follow_redirects" | "warmup" => {
                apply_config(&mut self.set.config, keyword, rest, arg_offset)
            }
            "load" => self.read_load(rest, offset, arg_offset),
            _ if is_keyword(keyword) => {
                Err(SyntaxError::MisplacedStatement(offset, keyword).into())
            }
            _ => Err(SyntaxError::UnknownStatement(offset, keyword).into()),
        }
    }

    /// A statement at depth 1: a child of the open scenario or group.
    fn read_child<'i>(
        &mut self,
        keyword: &'i str,
        rest: &'i str,
        offset: usize,
        arg_offset: usize,
    ) -> Result<(), BuildError<'i>> {
        self.step_open = is_step_keyword(keyword);

        if self.block
            .is_none()
        {
            return Err(SyntaxError::UnexpectedIndent(offset).into());
        }

        if keyword == "include" {
            if rest.is_empty() {
                return Err(SyntaxError::MissingValue(arg_offset, "a group name").into());
            }
            return match self
                .block
                .as_mut()
                .unwrap()
            {
                Block::Scenario(scenario) => {
                    let steps = resolver::expand(&self.set.groups, rest, offset)?;
                    scenario
                        .steps
                        .extend(steps);
                    Ok(())
                }
                Block::Group(group) => {
                    // kept unexpanded; resolved when the group is included
                    // into a scenario
                    group
                        .entries
                        .push(GroupEntry::Include {
                            name: rest.to_string(),
                            offset,
                        });
                    Ok(())
                }
            };
        }

        if is_step_keyword(keyword) {
            let step = read_step(keyword, rest, arg_offset)?;
            match self
                .block
                .as_mut()
                .unwrap()
            {
                Block::Scenario(scenario) => {
                    scenario
                        .steps
                        .push(step);
                }
                Block::Group(group) => {
                    group
                        .entries
                        .push(GroupEntry::Step(step));
                }
            }
            return Ok(());
        }

        match self
            .block
            .as_mut()
            .unwrap()
        {
            Block::Scenario(scenario) => match keyword {
                "set" => {
                    let (name, value) = read_binding(rest, arg_offset)?;
                    scenario
                        .variables
                        .insert(name.to_string(), value);
                    Ok(())
                }
                "endpoint" => {
                    let value = parse_expression(rest, arg_offset)?;
                    scenario
                        .variables
                        .insert("endpoint".to_string(), value);
                    Ok(())
                }
                "name" | "auth" | "header" | "blackfire" | "follow_redirects" | "warmup" => {
                    apply_config(&mut scenario.config, keyword, rest, arg_offset)
                }
                _ if is_keyword(keyword) => {
                    Err(SyntaxError::MisplacedStatement(offset, keyword).into())
                }
                _ => Err(SyntaxError::UnknownStatement(offset, keyword).into()),
            },
            Block::Group(_) => {
                // groups are step template lists, nothing else
                if is_keyword(keyword) {
                    Err(SyntaxError::MisplacedStatement(offset, keyword).into())
                } else {
                    Err(SyntaxError::UnknownStatement(offset, keyword).into())
                }
            }
        }
    }

    /// A statement at depth 2: a setting of the step opened above it.
    fn read_setting<'i>(
        &mut self,
        keyword: &'i str,
        rest: &'i str,
        offset: usize,
        arg_offset: usize,
    ) -> Result<(), BuildError<'i>> {
        if !self.step_open {
            return Err(SyntaxError::UnexpectedIndent(offset).into());
        }

        let step = match &mut self.block {
            Some(Block::Scenario(scenario)) => scenario
                .steps
                .last_mut(),
            Some(Block::Group(group)) => match group
                .entries
                .last_mut()
            {
                Some(GroupEntry::Step(step)) => Some(step),
                _ => None,
            },
            None => None,
        };

        let step = step.ok_or(SyntaxError::UnexpectedIndent(offset))?;
        apply_step_setting(step, keyword, rest, offset, arg_offset)
    }

    /// `load "path"`: recursively parse another file and merge its groups
    /// and global variables; its scenarios are appended after the ones
    /// parsed so far.
    fn read_load<'i>(
        &mut self,
        rest: &'i str,
        offset: usize,
        arg_offset: usize,
    ) -> Result<(), BuildError<'i>> {
        let expression = parse_expression(rest, arg_offset)?;
        let path = match expression.kind {
            ExpressionKind::String(path) => path,
            _ => return Err(SyntaxError::MissingValue(arg_offset, "a quoted file path").into()),
        };

        // relative to the directory containing the file being parsed
        let base = self
            .filename
            .parent()
            .unwrap_or(Path::new("."));
        let target = base.join(&path);

        let canonical = target
            .canonicalize()
            .map_err(|error| {
                ReferenceError::UnresolvedLoad(offset, path.clone(), error.to_string())
            })?;

        if self.loading
            .contains(&canonical)
        {
            return Err(CycleError::Load(offset, canonical).into());
        }

        self.loading
            .push(canonical);
        let result = resolver::load_file(&target, self.loading);
        self.loading
            .pop();

        let loaded = result.map_err(|inner| BuildError::Loaded {
            offset,
            inner: Box::new(inner),
        })?;

        for (name, group) in loaded.groups {
            self.set
                .groups
                .insert(name, group);
        }
        for (name, value) in loaded.variables {
            self.set
                .variables
                .insert(name, value);
        }
        self.set
            .scenarios
            .extend(loaded.scenarios);

        Ok(())
    }
}

fn is_keyword(keyword: &str) -> bool {
    KEYWORDS.contains(&keyword)
}

fn is_step_keyword(keyword: &str) -> bool {
    matches!(keyword, "visit" | "click" | "submit" | "follow" | "reload")
}

fn is_identifier(content: &str) -> bool {
    let re = regex!(r"^[A-Za-z_][A-Za-z0-9_]*$");
    re.is_match(content)
}

/// Split a statement into its leading keyword and trimmed argument text.
fn split_statement(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim_start()),
        None => (text, ""),
    }
}

/// `NAME EXPR`, the shared shape of `set` and `param`.
fn read_binding<'i>(
    rest: &'i str,
    arg_offset: usize,
) -> Result<(&'i str, Expression), BuildError<'i>> {
    let (name, value) = split_statement(rest);
    if name.is_empty() {
        return Err(SyntaxError::MissingValue(arg_offset, "a variable name").into());
    }
    if !is_identifier(name) {
        return Err(SyntaxError::Expected(arg_offset, "an identifier").into());
    }

    let value_offset = arg_offset + (rest.len() - value.len());
    if value.is_empty() {
        return Err(SyntaxError::MissingValue(value_offset, "an expression").into());
    }

    let expression = parse_expression(value, value_offset)?;
    Ok((name, expression))
}

fn read_step<'i>(keyword: &'i str, rest: &'i str, arg_offset: usize) -> Result<Step, BuildError<'i>> {
    let kind = match keyword {
        "visit" => StepKind::Visit {
            url: read_target(rest, arg_offset, "a URL expression")?,
        },
        "click" => StepKind::Click {
            link: read_target(rest, arg_offset, "a link expression")?,
        },
        "submit" => StepKind::Submit {
            button: read_target(rest, arg_offset, "a button expression")?,
        },
        "follow" => {
            read_nothing(rest, arg_offset)?;
            StepKind::Follow
        }
        "reload" => {
            read_nothing(rest, arg_offset)?;
            StepKind::Reload
        }
        _ => unreachable!("read_step called on a non-step keyword"),
    };

    Ok(Step::new(kind))
}

fn read_target<'i>(
    rest: &'i str,
    arg_offset: usize,
    what: &'static str,
) -> Result<Expression, BuildError<'i>> {
    if rest.is_empty() {
        return Err(SyntaxError::MissingValue(arg_offset, what).into());
    }
    Ok(parse_expression(rest, arg_offset)?)
}

// follow and reload act on the previous response and take no argument
fn read_nothing<'i>(rest: &'i str, arg_offset: usize) -> Result<(), BuildError<'i>> {
    match rest.chars()
        .next()
    {
        Some(c) => Err(SyntaxError::UnexpectedToken(arg_offset, c).into()),
        None => Ok(()),
    }
}

/// Settings shared by the global scope and scenarios.
fn apply_config<'i>(
    config: &mut Config,
    keyword: &'i str,
    rest: &'i str,
    arg_offset: usize,
) -> Result<(), BuildError<'i>> {
    match keyword {
        "name" => config.name = Some(parse_expression(rest, arg_offset)?),
        "auth" => config.auth = Some(parse_expression(rest, arg_offset)?),
        "header" => {
            config
                .headers
                .push(parse_expression(rest, arg_offset)?);
        }
        "blackfire" => config.blackfire = Some(parse_expression(rest, arg_offset)?),
        "follow_redirects" => config.follow_redirects = Some(read_toggle(rest, arg_offset)?),
        "warmup" => config.warmup = Some(read_warmup(rest, arg_offset)?),
        _ => unreachable!("apply_config called on a non-config keyword"),
    }
    Ok(())
}

fn apply_step_setting<'i>(
    step: &mut Step,
    keyword: &'i str,
    rest: &'i str,
    offset: usize,
    arg_offset: usize,
) -> Result<(), BuildError<'i>> {
    match keyword {
        "header" => {
            step.headers
                .push(parse_expression(rest, arg_offset)?);
        }
        "samples" => step.samples = Some(read_samples(rest, arg_offset)?),
        "warmup" => step.warmup = Some(read_warmup(rest, arg_offset)?),
        "method" => step.method = Some(parse_expression(rest, arg_offset)?),
        "body" => step.body = Some(parse_expression(rest, arg_offset)?),
        "param" => {
            let (name, value) = read_binding(rest, arg_offset)?;
            step.params
                .push(Param {
                    name: name.to_string(),
                    value,
                });
        }
        "json" => step.json = Some(read_toggle(rest, arg_offset)?),
        "wait" => step.wait = Some(parse_expression(rest, arg_offset)?),
        "auth" => step.auth = Some(parse_expression(rest, arg_offset)?),
        "follow_redirects" => step.follow_redirects = Some(read_toggle(rest, arg_offset)?),
        "blackfire" => step.blackfire = Some(parse_expression(rest, arg_offset)?),
        "expect" => {
            step.expects
                .push(parse_comparison(rest, arg_offset)?);
        }
        "set" => {
            let (name, value) = read_binding(rest, arg_offset)?;
            step.sets
                .push(Assignment {
                    name: name.to_string(),
                    value,
                });
        }
        _ if is_keyword(keyword) => {
            return Err(SyntaxError::MisplacedStatement(offset, keyword).into());
        }
        _ => return Err(SyntaxError::UnknownStatement(offset, keyword).into()),
    }
    Ok(())
}

// with no argument a toggle means enabling: `follow_redirects` on a step
// is `follow_redirects true`
fn read_toggle<'i>(rest: &'i str, arg_offset: usize) -> Result<bool, BuildError<'i>> {
    if rest.is_empty() {
        return Ok(true);
    }
    let expression = parse_expression(rest, arg_offset)?;
    match expression.kind {
        ExpressionKind::Bool(value) => Ok(value),
        _ => Err(SyntaxError::Expected(arg_offset, "true or false").into()),
    }
}

// `true`, `false`, and `'auto'` are all kept as the raw literal text
fn read_warmup<'i>(rest: &'i str, arg_offset: usize) -> Result<String, BuildError<'i>> {
    let expression = parse_expression(rest, arg_offset)?;
    match &expression.kind {
        ExpressionKind::Bool(_) => Ok(expression.raw),
        ExpressionKind::String(value) if value == "auto" => Ok(expression.raw),
        _ => Err(SyntaxError::Expected(arg_offset, "true, false, or 'auto'").into()),
    }
}

fn read_samples<'i>(rest: &'i str, arg_offset: usize) -> Result<i64, BuildError<'i>> {
    let expression = parse_expression(rest, arg_offset)?;
    match expression.kind {
        ExpressionKind::Number(Numeric::Integral(value)) => Ok(value),
        _ => Err(SyntaxError::Expected(arg_offset, "an integer").into()),
    }
}
