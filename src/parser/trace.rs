//! Parse trace: production labels and the sinks that receive them
//!
//! The parser reports two kinds of events, in order:
//! - a token, the moment it is consumed (`INTTK int`);
//! - a production, once all of its children have been reported (`<表达式>`).
//!
//! Reading the events back in order reconstructs the parse tree as a
//! post-order walk. Where the events go is up to the [`TraceSink`].

use std::fmt;
use std::io::{self, Write};

use super::lexer::Token;

/// How production labels are spelled in the trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    /// Teaching-course labels, e.g. `<表达式>`
    #[default]
    Course,
    /// English labels, e.g. `<expression>`
    Plain,
}

/// Grammar non-terminals the parser can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    Program,
    ConstantDeclaration,
    ConstantDefinition,
    VariableDeclaration,
    VariableDefinition,
    UninitializedDefinition,
    InitializedDefinition,
    DeclarationHeader,
    ValueFunctionDefinition,
    VoidFunctionDefinition,
    MainFunction,
    ParameterList,
    CompoundStatement,
    StatementList,
    Statement,
    AssignmentStatement,
    ConditionalStatement,
    Condition,
    LoopStatement,
    Step,
    SwitchStatement,
    CaseTable,
    CaseBranch,
    DefaultBranch,
    ValueCall,
    VoidCall,
    ValueParameterList,
    ReadStatement,
    WriteStatement,
    ReturnStatement,
    StringLiteral,
    Expression,
    Term,
    Factor,
    Constant,
    Integer,
    UnsignedInteger,
}

impl Production {
    /// Course name, without the angle brackets.
    pub fn course_name(self) -> &'static str {
        match self {
            Production::Program => "程序",
            Production::ConstantDeclaration => "常量说明",
            Production::ConstantDefinition => "常量定义",
            Production::VariableDeclaration => "变量说明",
            Production::VariableDefinition => "变量定义",
            Production::UninitializedDefinition => "变量定义无初始化",
            Production::InitializedDefinition => "变量定义及初始化",
            Production::DeclarationHeader => "声明头部",
            Production::ValueFunctionDefinition => "有返回值函数定义",
            Production::VoidFunctionDefinition => "无返回值函数定义",
            Production::MainFunction => "主函数",
            Production::ParameterList => "参数表",
            Production::CompoundStatement => "复合语句",
            Production::StatementList => "语句列",
            Production::Statement => "语句",
            Production::AssignmentStatement => "赋值语句",
            Production::ConditionalStatement => "条件语句",
            Production::Condition => "条件",
            Production::LoopStatement => "循环语句",
            Production::Step => "步长",
            Production::SwitchStatement => "情况语句",
            Production::CaseTable => "情况表",
            Production::CaseBranch => "情况子语句",
            Production::DefaultBranch => "缺省",
            Production::ValueCall => "有返回值函数调用语句",
            Production::VoidCall => "无返回值函数调用语句",
            Production::ValueParameterList => "值参数表",
            Production::ReadStatement => "读语句",
            Production::WriteStatement => "写语句",
            Production::ReturnStatement => "返回语句",
            Production::StringLiteral => "字符串",
            Production::Expression => "表达式",
            Production::Term => "项",
            Production::Factor => "因子",
            Production::Constant => "常量",
            Production::Integer => "整数",
            Production::UnsignedInteger => "无符号整数",
        }
    }

    /// English name, without the angle brackets.
    pub fn plain_name(self) -> &'static str {
        match self {
            Production::Program => "program",
            Production::ConstantDeclaration => "constant-declaration",
            Production::ConstantDefinition => "constant-definition",
            Production::VariableDeclaration => "variable-declaration",
            Production::VariableDefinition => "variable-definition",
            Production::UninitializedDefinition => {
                "variable-definition-without-initializer"
            }
            Production::InitializedDefinition => {
                "variable-definition-with-initializer"
            }
            Production::DeclarationHeader => "declaration-header",
            Production::ValueFunctionDefinition => "value-function-definition",
            Production::VoidFunctionDefinition => "void-function-definition",
            Production::MainFunction => "main-function",
            Production::ParameterList => "parameter-list",
            Production::CompoundStatement => "compound-statement",
            Production::StatementList => "statement-list",
            Production::Statement => "statement",
            Production::AssignmentStatement => "assignment-statement",
            Production::ConditionalStatement => "conditional-statement",
            Production::Condition => "condition",
            Production::LoopStatement => "loop-statement",
            Production::Step => "step",
            Production::SwitchStatement => "switch-statement",
            Production::CaseTable => "case-table",
            Production::CaseBranch => "case-branch",
            Production::DefaultBranch => "default-branch",
            Production::ValueCall => "value-function-call",
            Production::VoidCall => "void-function-call",
            Production::ValueParameterList => "value-parameter-list",
            Production::ReadStatement => "read-statement",
            Production::WriteStatement => "write-statement",
            Production::ReturnStatement => "return-statement",
            Production::StringLiteral => "string",
            Production::Expression => "expression",
            Production::Term => "term",
            Production::Factor => "factor",
            Production::Constant => "constant",
            Production::Integer => "integer",
            Production::UnsignedInteger => "unsigned-integer",
        }
    }

    /// Trace line for this production, e.g. `<表达式>` or `<expression>`.
    pub fn label(self, style: LabelStyle) -> String {
        let name = match style {
            LabelStyle::Course => self.course_name(),
            LabelStyle::Plain => self.plain_name(),
        };
        format!("<{name}>")
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.course_name())
    }
}

/// One entry of the trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Token(Token),
    Production(Production),
}

impl TraceEvent {
    /// The line written for this event: `KIND text` or `<label>`.
    pub fn render(&self, style: LabelStyle) -> String {
        match self {
            TraceEvent::Token(token) => format!("{} {}", token.kind, token.text),
            TraceEvent::Production(production) => production.label(style),
        }
    }
}

/// Append-only destination for trace events.
pub trait TraceSink {
    /// A token was consumed.
    fn token(&mut self, token: &Token);

    /// A production was fully matched.
    fn production(&mut self, production: Production);
}

/// In-memory sink keeping every event in order
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    events: Vec<TraceEvent>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Render every event as a trace line.
    pub fn lines(&self, style: LabelStyle) -> Vec<String> {
        self.events.iter().map(|e| e.render(style)).collect()
    }

    /// Only the production events, in order.
    pub fn productions(&self) -> impl Iterator<Item = Production> + '_ {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Production(p) => Some(*p),
            TraceEvent::Token(_) => None,
        })
    }
}

impl TraceSink for TraceRecorder {
    fn token(&mut self, token: &Token) {
        self.events.push(TraceEvent::Token(token.clone()));
    }

    fn production(&mut self, production: Production) {
        self.events.push(TraceEvent::Production(production));
    }
}

/// Sink writing one line per event to an [`io::Write`].
///
/// Writing stops at the first I/O error; the error is returned by
/// [`TraceWriter::finish`].
pub struct TraceWriter<W: Write> {
    out: W,
    style: LabelStyle,
    error: Option<io::Error>,
    lines: usize,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_style(out, LabelStyle::default())
    }

    pub fn with_style(out: W, style: LabelStyle) -> Self {
        Self {
            out,
            style,
            error: None,
            lines: 0,
        }
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{line}") {
            Ok(()) => self.lines += 1,
            Err(err) => self.error = Some(err),
        }
    }
}

impl<W: Write> TraceSink for TraceWriter<W> {
    fn token(&mut self, token: &Token) {
        self.write_line(format_args!("{} {}", token.kind, token.text));
    }

    fn production(&mut self, production: Production) {
        let label = production.label(self.style);
        self.write_line(format_args!("{label}"));
    }
}
