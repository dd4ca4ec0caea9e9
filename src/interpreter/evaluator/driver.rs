use std::{path::Path, rc::Rc};

use crate::{
    ast::{Expr, Statement},
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            scope::{BlockState, Scope},
        },
        lexer::{Separator, Token, TokenKind, render, tokenize},
        parser::{
            block::{Unit, UnitKind, split_units},
            core::parse_tokens,
            statement::parse_statement,
        },
        value::{
            convert::as_bool,
            core::Value,
            function::{Callable, FunctionValue, Procedure, SourceLine, UserFunction},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Reads the lines of a file or a body one logical line at a time.
pub(crate) struct Source<'a> {
    lines:    &'a [SourceLine],
    position: usize,
}

/// A body captured between braces.
pub(crate) struct Capture {
    /// The lines between the braces.
    pub(crate) body:   Vec<SourceLine>,
    /// Index just past the closing brace when the body closed on the header
    /// line.
    pub(crate) resume: Option<usize>,
}

impl<'a> Source<'a> {
    pub(crate) const fn new(lines: &'a [SourceLine]) -> Self {
        Self { lines,
               position: 0 }
    }

    /// Returns the number of the next logical line and its tokens.
    ///
    /// Physical lines ending in `...` are spliced with the line that follows
    /// before the result is returned.
    pub(crate) fn next_line(&mut self) -> Option<(usize, Result<Vec<Token>, ParseError>)> {
        let first = self.lines.get(self.position)?;
        self.position += 1;

        let mut tokens = Vec::new();
        let mut line = first;
        loop {
            let lexed = match tokenize(&line.text) {
                Ok(lexed) => lexed,
                Err(e) => return Some((first.number, Err(e))),
            };
            tokens.extend(lexed.tokens);
            if !lexed.continuation {
                break;
            }
            let Some(next) = self.lines.get(self.position) else {
                break;
            };
            self.position += 1;
            line = next;
        }

        Some((first.number, Ok(tokens)))
    }

    fn next_physical(&mut self) -> Option<&'a SourceLine> {
        let line = self.lines.get(self.position)?;
        self.position += 1;
        Some(line)
    }

    fn next_opens_body(&self) -> bool {
        self.lines
            .get(self.position)
            .is_some_and(|line| line.text.trim_start().starts_with('{'))
    }

    /// Captures the braced body of a declaration.
    ///
    /// `rest` holds the tokens following the declaration header. The body
    /// either opens there or, if the header ends the line, on the next line.
    /// Lines inside the body are kept verbatim; only the first and the last
    /// are cut at their braces.
    ///
    /// # Errors
    /// `ExpectedBody` if no `{` follows the header, `UnterminatedBody` if
    /// the braces never balance and `UnexpectedTrailingTokens` for anything
    /// after a closing brace on a later line.
    pub(crate) fn capture_body(&mut self, name: &str, line: usize, rest: &[Token]) -> Result<Capture, ParseError> {
        let mut body = Vec::new();
        let mut depth = 0usize;

        if rest.first().is_some_and(|t| t.is_separator(Separator::LBrace)) {
            if let Some(close) = scan_braces(rest, &mut depth) {
                push_rendered(&mut body, line, &rest[1..close]);
                return Ok(Capture { body,
                                    resume: Some(close + 1) });
            }
            push_rendered(&mut body, line, &rest[1..]);
        } else if rest.is_empty() && self.next_opens_body() {
            if let Some(opening) = self.next_physical() {
                let tokens = brace_tokens(&opening.text);
                if let Some(close) = scan_braces(&tokens, &mut depth) {
                    check_trailing(&tokens[close + 1..])?;
                    push_rendered(&mut body, opening.number, &tokens[1..close]);
                    return Ok(Capture { body,
                                        resume: None });
                }
                push_rendered(&mut body, opening.number, tokens.get(1..).unwrap_or_default());
            }
        } else {
            return Err(ParseError::ExpectedBody { name: name.to_string() });
        }

        while let Some(next) = self.next_physical() {
            let tokens = brace_tokens(&next.text);
            if let Some(close) = scan_braces(&tokens, &mut depth) {
                check_trailing(&tokens[close + 1..])?;
                push_rendered(&mut body, next.number, &tokens[..close]);
                return Ok(Capture { body,
                                    resume: None });
            }
            body.push(next.clone());
        }

        Err(ParseError::UnterminatedBody { name: name.to_string() })
    }
}

/// Tokens of a body line, used only to count its braces. A line that does
/// not lex has none; it is reported when the body runs.
fn brace_tokens(text: &str) -> Vec<Token> {
    tokenize(text).map(|lexed| lexed.tokens).unwrap_or_default()
}

/// Counts braces until `depth` returns to zero and returns the index of that
/// closing brace.
fn scan_braces(tokens: &[Token], depth: &mut usize) -> Option<usize> {
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Separator(Separator::LBrace) => *depth += 1,
            TokenKind::Separator(Separator::RBrace) => {
                *depth = depth.saturating_sub(1);
                if *depth == 0 {
                    return Some(index);
                }
            },
            _ => {},
        }
    }
    None
}

fn check_trailing(tokens: &[Token]) -> Result<(), ParseError> {
    match tokens.first() {
        Some(token) => Err(ParseError::UnexpectedTrailingTokens { token: token.text.clone() }),
        None => Ok(()),
    }
}

fn push_rendered(body: &mut Vec<SourceLine>, number: usize, tokens: &[Token]) {
    if !tokens.is_empty() {
        body.push(SourceLine { number,
                               text: render(tokens) });
    }
}

/// What to do after a unit ran.
pub(crate) enum Step {
    /// Go on with the next unit.
    Next(Flow),
    /// Split the line again starting at `offset`; the units after a body
    /// that closed on the header line were not known before.
    Resume {
        /// Token index the line continues at.
        offset: usize,
        /// What the unit produced.
        flow:   Flow,
    },
    /// Nothing more runs on this line.
    Finish(Flow),
}

const fn if_flow(outcome: Option<bool>) -> Flow {
    match outcome {
        Some(true) => Flow::TrueIf,
        Some(false) => Flow::FalseIf,
        None => Flow::Nothing,
    }
}

impl Interpreter {
    /// Reads and runs an Eve file.
    ///
    /// # Returns
    /// `false` if any error was reported while the file ran. Variables bound
    /// before an error stay in place either way.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.file_system.read_to_string(path) {
            Ok(text) => self.read_source(path, &text),
            Err(e) => {
                self.file = path.to_path_buf();
                self.line = 0;
                self.error_flag = false;
                self.report(&RuntimeError::Io { path:    path.display().to_string(),
                                                message: e.to_string(), }.into());
                false
            },
        }
    }

    /// Runs Eve source text as if it were the file `name`.
    ///
    /// The error flag is cleared first; relative paths in the script resolve
    /// against the directory of `name`.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{evaluator::core::Interpreter, output::CaptureOutputter, value::core::Value};
    ///
    /// let capture = CaptureOutputter::default();
    /// let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    ///
    /// let ok = interpreter.read_source("Pilefile", "int x\nx = 3\nint y\ny = x + 4\nprintln(string(y))");
    /// assert!(ok);
    /// assert_eq!(capture.output(), "7\n");
    /// assert_eq!(interpreter.global("y"), Some(Value::Int(7)));
    /// ```
    pub fn read_source(&mut self, name: impl AsRef<Path>, text: &str) -> bool {
        self.file = name.as_ref().to_path_buf();
        self.line = 0;
        self.error_flag = false;
        self.last_if = None;
        tracing::debug!(file = %self.file.display(), "reading");

        let lines = SourceLine::split(text);
        if let Err(e) = self.run_lines(&lines, false) {
            self.report(&e);
        }

        tracing::debug!(file = %self.file.display(), errors = self.error_flag, "finished");
        !self.error_flag
    }

    /// Runs another file for the `include` built-in.
    ///
    /// The caller's file, line, error flag and `if` state are restored
    /// afterwards.
    ///
    /// # Returns
    /// `true` if the included file ran without errors.
    pub(crate) fn include(&mut self, path: &str) -> EvalResult<bool> {
        if self.include_depth >= self.options.max_include_depth {
            return Err(RuntimeError::IncludeDepthExceeded { limit: self.options.max_include_depth }.into());
        }

        let resolved = self.script_path(path);
        let text = self.file_system
                       .read_to_string(&resolved)
                       .map_err(|e| RuntimeError::Io { path:    path.to_string(),
                                                       message: e.to_string(), })?;
        tracing::debug!(file = %resolved.display(), "include");

        let saved = (std::mem::take(&mut self.file), self.line, self.error_flag, self.last_if.take());
        self.include_depth += 1;
        let ok = ensure_sufficient_stack(|| self.read_source(&resolved, &text));
        self.include_depth -= 1;
        (self.file, self.line, self.error_flag, self.last_if) = saved;

        Ok(ok)
    }

    /// Evaluates an already tokenized line.
    ///
    /// With `is_start` the tokens are a whole statement line: `if`, `else`,
    /// braces and declarations are honored, and blocks may stay open across
    /// calls. Otherwise the tokens must form a single expression.
    ///
    /// Errors are reported through the outputter and yield [`Flow::Error`].
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{
    ///     evaluator::core::{Flow, Interpreter},
    ///     lexer::tokenize,
    ///     value::core::Value,
    /// };
    ///
    /// let mut interpreter = Interpreter::new();
    /// let tokens = tokenize("2 ** 3 ** 2").unwrap().tokens;
    /// assert_eq!(interpreter.eval_tokens(&tokens, false), Flow::Value(Value::Int(512)));
    /// ```
    pub fn eval_tokens(&mut self, tokens: &[Token], is_start: bool) -> Flow {
        let result = if is_start {
            let mut source = Source::new(&[]);
            self.run_line(tokens, &mut source, 1, false)
        } else {
            parse_tokens(tokens).map_err(Error::from)
                                .and_then(|expr| self.expression_flow(&expr))
        };

        result.unwrap_or_else(|e| {
                  self.report(&e);
                  Flow::Error
              })
    }

    /// Tokenizes and evaluates one statement line.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{evaluator::core::{Flow, Interpreter}, value::core::Value};
    ///
    /// let mut interpreter = Interpreter::new();
    /// assert_eq!(interpreter.eval_line("int a; int b"), Flow::Value(Value::Int(0)));
    /// assert_eq!(interpreter.eval_line("a = b = 3"), Flow::Value(Value::Int(3)));
    /// assert_eq!(interpreter.eval_line("if (a < b)"), Flow::Nothing);
    /// assert_eq!(interpreter.eval_line("a + b"), Flow::FalseIf);
    /// ```
    pub fn eval_line(&mut self, text: &str) -> Flow {
        match tokenize(text) {
            Ok(lexed) => self.eval_tokens(&lexed.tokens, true),
            Err(e) => {
                self.report(&e.into());
                Flow::Error
            },
        }
    }

    /// Runs a sequence of lines: a file, a function body or a procedure.
    ///
    /// Blocks opened by the lines must be closed by them; whatever is left
    /// open is reported and dropped.
    ///
    /// # Returns
    /// The flow of the last line, or [`Flow::Return`] if a `return` stopped
    /// the lines early.
    ///
    /// # Errors
    /// Only errors that abort a whole call chain, such as exceeding the call
    /// depth, are returned; everything else is reported where it happens.
    pub(crate) fn run_lines(&mut self, lines: &[SourceLine], in_function: bool) -> EvalResult<Flow> {
        let base = self.scopes.depth();
        let mut source = Source::new(lines);
        let result = self.run_source(&mut source, base, in_function);

        if let Ok(flow) = &result
           && !matches!(flow, Flow::Return(_))
           && self.scopes.has_open_block(base)
        {
            self.report(&RuntimeError::UnterminatedBlock.into());
        }
        self.scopes.truncate(base);
        result
    }

    fn run_source(&mut self, source: &mut Source<'_>, base: usize, in_function: bool) -> EvalResult<Flow> {
        let mut flow = Flow::Nothing;
        while let Some((number, tokens)) = source.next_line() {
            self.line = number;
            tracing::trace!(line = number, "line");

            let tokens = match tokens {
                Ok(tokens) => tokens,
                Err(e) => {
                    self.report(&e.into());
                    flow = Flow::Error;
                    continue;
                },
            };

            flow = self.run_line(&tokens, source, base, in_function)?;
            if matches!(flow, Flow::Return(_)) {
                break;
            }
        }
        Ok(flow)
    }

    /// Runs the units of one logical line.
    fn run_line(&mut self,
                tokens: &[Token],
                source: &mut Source<'_>,
                base: usize,
                in_function: bool)
                -> EvalResult<Flow> {
        let errors = self.error_count;
        let mut flow = Flow::Nothing;
        let mut rest = tokens;

        'line: loop {
            for unit in split_units(rest) {
                match self.run_unit(unit, rest, source, base, in_function)? {
                    Step::Next(next) => flow = next,
                    Step::Resume { offset, flow: next } => {
                        flow = next;
                        rest = &rest[offset..];
                        continue 'line;
                    },
                    Step::Finish(next) => {
                        flow = next;
                        break 'line;
                    },
                }
            }
            break;
        }

        if self.error_count > errors && !matches!(flow, Flow::Return(_)) {
            flow = Flow::Error;
        }
        Ok(flow)
    }

    fn run_unit(&mut self,
                unit: Unit,
                line: &[Token],
                source: &mut Source<'_>,
                base: usize,
                in_function: bool)
                -> EvalResult<Step> {
        if !matches!(unit.kind, UnitKind::Open) {
            self.scopes.current_mut().awaiting_body = false;
        }
        let skipping = self.scopes.current().skipping;

        match unit.kind {
            UnitKind::If(condition) => {
                self.enter_if(&condition, skipping)?;
                Ok(Step::Next(Flow::Nothing))
            },
            UnitKind::Else => Ok(Step::Next(self.enter_else(skipping))),
            UnitKind::Open => {
                self.open_block();
                Ok(Step::Next(Flow::Nothing))
            },
            UnitKind::Close => Ok(Step::Next(self.close_block(base)?)),
            UnitKind::Return(tokens) => self.run_return(&tokens, base, skipping, in_function),
            UnitKind::Statement(tokens) => {
                let after = unit.offset + tokens.len();
                self.run_statement(&tokens, &line[after..], after, source, base, skipping)
            },
            UnitKind::Invalid(e) => {
                if !skipping {
                    self.recover(e.into())?;
                }
                Ok(Step::Finish(Flow::Error))
            },
        }
    }

    /// Reports an error at the statement boundary.
    ///
    /// Inside a function call, errors that abort the whole call chain are
    /// handed back instead so the calls unwind.
    pub(crate) fn recover(&mut self, error: Error) -> EvalResult<()> {
        if self.call_depth > 0 && error.is_fatal() {
            return Err(error);
        }
        self.report(&error);
        Ok(())
    }

    fn enter_if(&mut self, condition: &[Token], skipping: bool) -> EvalResult<()> {
        self.last_if = None;
        let state = if skipping {
            BlockState::SkipIf
        } else {
            match self.eval_condition(condition) {
                Ok(true) => BlockState::IfBlock,
                Ok(false) => BlockState::SkipIf,
                Err(e) => {
                    self.recover(e)?;
                    BlockState::SkipIf
                },
            }
        };
        self.scopes.push(Scope::conditional(state));
        Ok(())
    }

    fn eval_condition(&mut self, tokens: &[Token]) -> EvalResult<bool> {
        let expr = parse_tokens(tokens)?;
        let value = self.eval_value(&expr)?;
        Ok(as_bool(&value)?)
    }

    fn enter_else(&mut self, skipping: bool) -> Flow {
        let state = match (skipping, self.last_if) {
            (false, Some(false)) => BlockState::ElseBlock,
            (false, None) => {
                self.report(&RuntimeError::ElseWithoutIf.into());
                BlockState::SkipElse
            },
            _ => BlockState::SkipElse,
        };
        self.last_if = None;
        self.scopes.push(Scope::conditional(state));
        Flow::Else
    }

    /// Opens a braced block. The `{` right after an `if` or `else` turns its
    /// single-statement body into a braced one.
    fn open_block(&mut self) {
        self.last_if = None;
        let top = self.scopes.current_mut();
        if top.single_line && top.awaiting_body {
            top.single_line = false;
            top.awaiting_body = false;
        } else {
            self.scopes.push(Scope::block());
        }
    }

    fn close_block(&mut self, base: usize) -> EvalResult<Flow> {
        while self.scopes.depth() > base && self.scopes.current().single_line {
            self.scopes.pop();
        }
        if self.scopes.depth() <= base {
            self.recover(RuntimeError::UnmatchedBrace.into())?;
            return Ok(Flow::Error);
        }

        let outcome = match self.scopes.pop().map(|scope| scope.state) {
            Some(BlockState::IfBlock) => Some(true),
            Some(BlockState::SkipIf) => Some(false),
            _ => None,
        };
        Ok(self.complete_statement(base, outcome).unwrap_or(if_flow(outcome)))
    }

    /// Closes the single-statement bodies the finished statement belonged
    /// to and records whether a following `else` may run.
    ///
    /// `outcome` is what the statement itself says about that, which is only
    /// known for the `}` closing an `if` body.
    ///
    /// # Returns
    /// The flow of the innermost `if` or `else` closed here, if any.
    fn complete_statement(&mut self, base: usize, mut outcome: Option<bool>) -> Option<Flow> {
        let mut closed = false;
        while self.scopes.depth() > base && self.scopes.current().single_line {
            let Some(scope) = self.scopes.pop() else {
                break;
            };
            closed = true;
            outcome = match scope.state {
                BlockState::IfBlock => Some(outcome.unwrap_or(true)),
                // A nested `if` inside the skipped body owns the next `else`.
                BlockState::SkipIf => Some(outcome.is_some()),
                BlockState::SkipElse => Some(true),
                BlockState::ElseBlock | BlockState::NoBlock => outcome,
            };
        }

        self.last_if = outcome;
        closed.then(|| if_flow(outcome))
    }

    fn finish_statement(&mut self, base: usize, flow: Flow) -> Flow {
        self.complete_statement(base, None).unwrap_or(flow)
    }

    fn run_return(&mut self, tokens: &[Token], base: usize, skipping: bool, in_function: bool) -> EvalResult<Step> {
        if skipping {
            return Ok(Step::Next(self.finish_statement(base, Flow::Nothing)));
        }
        if !in_function {
            self.recover(RuntimeError::ReturnOutsideFunction.into())?;
            return Ok(Step::Next(self.finish_statement(base, Flow::Error)));
        }

        let value = if tokens.is_empty() {
            None
        } else {
            let result = parse_tokens(tokens).map_err(Error::from)
                                             .and_then(|expr| self.eval_value(&expr));
            match result {
                Ok(value) => Some(value),
                Err(e) => {
                    self.recover(e)?;
                    None
                },
            }
        };
        Ok(Step::Finish(Flow::Return(value)))
    }

    /// Runs one statement unit.
    ///
    /// Declarations capture their body from `rest`, the tokens after the
    /// header, or from the following lines. Bodies are captured even when
    /// the statement is skipped so their braces do not leak into the
    /// surrounding code.
    fn run_statement(&mut self,
                     tokens: &[Token],
                     rest: &[Token],
                     after: usize,
                     source: &mut Source<'_>,
                     base: usize,
                     skipping: bool)
                     -> EvalResult<Step> {
        let statement = match parse_statement(tokens) {
            Ok(statement) => statement,
            Err(e) => {
                if !skipping {
                    self.recover(e.into())?;
                }
                return Ok(Step::Next(self.finish_statement(base, Flow::Error)));
            },
        };

        let name = match &statement {
            Statement::Expression(expr) => {
                let flow = if skipping {
                    Flow::Nothing
                } else {
                    match self.expression_flow(expr) {
                        Ok(flow) => flow,
                        Err(e) => {
                            self.recover(e)?;
                            Flow::Error
                        },
                    }
                };
                return Ok(Step::Next(self.finish_statement(base, flow)));
            },
            Statement::Function(signature) => signature.name.clone(),
            Statement::Class(name) | Statement::Procedure(name) => name.clone(),
        };

        let capture = match source.capture_body(&name, self.line, rest) {
            Ok(capture) => capture,
            Err(e) => {
                if !skipping {
                    self.recover(e.into())?;
                }
                return Ok(Step::Finish(self.finish_statement(base, Flow::Error)));
            },
        };

        let mut flow = Flow::Nothing;
        if !skipping && let Err(e) = self.declare_statement(statement, capture.body) {
            self.recover(e)?;
            flow = Flow::Error;
        }
        let flow = self.finish_statement(base, flow);

        Ok(match capture.resume {
            Some(end) => Step::Resume { offset: after + end,
                                        flow },
            None => Step::Finish(flow),
        })
    }

    /// Evaluates an expression statement.
    ///
    /// A statement that is just an unresolved name is an error; a call that
    /// returns nothing is not.
    fn expression_flow(&mut self, expr: &Expr) -> EvalResult<Flow> {
        let operand = self.eval_expr(expr)?;
        if matches!(&*operand.value(), Value::Void(name) if name.is_empty()) {
            return Ok(Flow::Nothing);
        }
        Ok(Flow::Value(operand.require_value()?.into_value()))
    }

    /// Binds a function, procedure or class declared with `body`.
    fn declare_statement(&mut self, statement: Statement, body: Vec<SourceLine>) -> EvalResult<()> {
        match statement {
            Statement::Function(signature) => {
                tracing::debug!(function = %signature.name, line = self.line, "function declared");
                let function = UserFunction { name: signature.name.clone(),
                                              params: signature.params,
                                              return_type: signature.return_type,
                                              body,
                                              file: self.file.clone(),
                                              line: self.line,
                                              is_method: false };
                let value = Value::Function(FunctionValue::unbound(Callable::User(Rc::new(function))));
                self.scopes.define(&signature.name, value)?;
            },
            Statement::Procedure(name) => {
                tracing::debug!(procedure = %name, line = self.line, "procedure declared");
                let procedure = Procedure { name: name.clone(),
                                            body,
                                            file: self.file.clone(),
                                            line: self.line };
                self.scopes.define(&name, Value::Procedure(Rc::new(procedure)))?;
            },
            Statement::Class(name) => {
                let class = self.build_class(&name, &body)?;
                self.register_class(class)?;
            },
            Statement::Expression(_) => {},
        }
        Ok(())
    }
}
