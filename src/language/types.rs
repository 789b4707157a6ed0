//! Types representing the structural model of a parsed scenario script

use indexmap::IndexMap;
use serde::Serialize;

/// The result of parsing one top-level scenario file (and everything it
/// transitively `load`ed). Immutable once returned by the parser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScenarioSet {
    pub scenarios: Vec<Scenario>,
    pub groups: IndexMap<String, Group>,
    pub variables: IndexMap<String, Expression>,
    pub config: Config,
}

impl ScenarioSet {
    pub fn len(&self) -> usize {
        self.scenarios
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios
            .is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios
            .iter()
    }
}

impl<'a> IntoIterator for &'a ScenarioSet {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One named or anonymous sequence of navigation steps, with its own
/// variable and config scope seeded from the globals in force at the point
/// the `scenario` statement was encountered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub key: String,
    pub variables: IndexMap<String, Expression>,
    pub config: Config,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// The first step in declaration order, the scenario's primary action.
    pub fn block_step(&self) -> Option<&Step> {
        self.steps
            .first()
    }
}

/// A named, reusable step template list. Never executed directly; its
/// entries are deep-copied into scenarios by `include`. Nested `include`
/// statements are kept unexpanded so that group-to-group references are
/// resolved (and cycle-checked) at instantiation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub entries: Vec<GroupEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GroupEntry {
    Step(Step),
    Include { name: String, offset: usize },
}

/// Settings that cascade global → scenario. The `endpoint` keyword is not
/// here: it writes the variable map under the key `endpoint`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    pub name: Option<Expression>,
    pub auth: Option<Expression>,
    pub headers: Vec<Expression>,
    pub blackfire: Option<Expression>,
    pub follow_redirects: Option<bool>,
    pub warmup: Option<String>,
}

/// The navigation action a step performs, with its kind-specific target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StepKind {
    Visit { url: Expression },
    Click { link: Expression },
    Submit { button: Expression },
    Follow,
    Reload,
}

/// One navigation action plus its nested settings, assertions, and
/// extractions. Cloning a Step yields a structurally independent copy,
/// which is what `include` relies on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    pub headers: Vec<Expression>,
    pub samples: Option<i64>,
    pub warmup: Option<String>,
    pub method: Option<Expression>,
    pub body: Option<Expression>,
    pub params: Vec<Param>,
    pub json: Option<bool>,
    pub auth: Option<Expression>,
    pub wait: Option<Expression>,
    pub follow_redirects: Option<bool>,
    pub expects: Vec<Expression>,
    pub sets: Vec<Assignment>,
    pub blackfire: Option<Expression>,
}

impl Step {
    pub fn new(kind: StepKind) -> Step {
        Step {
            kind,
            headers: vec![],
            samples: None,
            warmup: None,
            method: None,
            body: None,
            params: vec![],
            json: None,
            auth: None,
            wait: None,
            follow_redirects: None,
            expects: vec![],
            sets: vec![],
            blackfire: None,
        }
    }

    /// The target expression of the action, if the kind has one. Follow
    /// and Reload operate on the preceding response and carry no target.
    pub fn target(&self) -> Option<&Expression> {
        match &self.kind {
            StepKind::Visit { url } => Some(url),
            StepKind::Click { link } => Some(link),
            StepKind::Submit { button } => Some(button),
            StepKind::Follow => None,
            StepKind::Reload => None,
        }
    }
}

/// A form parameter on a submit (or visit) step. File uploads are the
/// ordinary `param image file('path', 'display-name')` shape; the value is
/// just a function call expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub value: Expression,
}

/// A `set name expression` extraction binding on a step, visible to later
/// steps of the same scenario once evaluated by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub name: String,
    pub value: Expression,
}

/// A parsed value. Evaluation is deferred to the execution engine, so
/// every node keeps the exact source substring it was parsed from in
/// `raw`, quote characters included: `set env "prod"` stores the raw text
/// `"prod"`, not `prod`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub raw: String,
}

impl Expression {
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ExpressionKind {
    /// Quoted string; the payload is the content between the quotes, the
    /// surrounding `raw` keeps them.
    String(String),
    Number(Numeric),
    Bool(bool),
    Variable(String),
    Call {
        name: String,
        args: Vec<Expression>,
    },
    Chain {
        base: Box<Expression>,
        calls: Vec<MethodCall>,
    },
    Concat(Box<Expression>, Box<Expression>),
    Compare {
        left: Box<Expression>,
        op: String,
        right: Box<Expression>,
    },
    /// The `@` placeholder, standing for the value the chain has produced
    /// so far. Only valid as an argument of a chained method call.
    Current,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Numeric {
    Integral(i64),
    // kept as raw text; nothing in the parser needs the numeric value of
    // a decimal, and this way Eq stays derivable.
    Decimal(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MethodCall {
    pub name: String,
    pub args: Vec<Expression>,
}
