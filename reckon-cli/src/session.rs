//! Line handling for the REPL
//!
//! A `Session` owns the variable context and turns each input line into
//! output text. Errors are reported and never end the session.

use crate::config::OutputFormat;
use reckon::{parse, tokenize, Builtin, Context, ReckonError, Token};
use serde::Serialize;
use serde_json::json;

/// Command words; a variable with one of these names could never be read back
const RESERVED: [&str; 4] = ["let", "help", "vars", "exit"];

/// What the driver loop should do after a line
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Print the text (if any) and read the next line
    Continue(Option<String>),
    Exit,
}

#[derive(Debug, Serialize)]
struct EvalReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    expr: String,
    value: f64,
    dependencies: Vec<String>,
}

pub struct Session {
    ctx: Context<'static>,
    output: OutputFormat,
}

impl Session {
    pub fn new(output: OutputFormat) -> Self {
        Self {
            ctx: Context::new(),
            output,
        }
    }

    pub fn context(&self) -> &Context<'static> {
        &self.ctx
    }

    pub fn handle_line(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::Continue(None);
        }

        let output = match line {
            "exit" => return Outcome::Exit,
            "vars" => self.list_vars(),
            "help" => self.help(None),
            _ => {
                if let Some(topic) = line.strip_prefix("help ") {
                    self.help(Some(topic.trim()))
                } else if let Some(assignment) = line.strip_prefix("let ") {
                    self.assign(assignment)
                } else {
                    self.evaluate(line)
                }
            }
        };

        Outcome::Continue(Some(output))
    }

    fn evaluate(&self, line: &str) -> String {
        let result = parse(line).and_then(|expr| {
            let value = expr
                .interpret(&self.ctx)
                .map_err(|e| e.with_expression(line))?;
            Ok((expr, value))
        });

        match result {
            Ok((expr, value)) => {
                tracing::debug!(%expr, value, "evaluated");
                let report = EvalReport {
                    name: None,
                    expr: expr.to_string(),
                    value,
                    dependencies: expr.dependencies().into_iter().collect(),
                };
                match self.output {
                    OutputFormat::Text => format!("{} = {}", report.expr, value),
                    OutputFormat::Json => json!(report).to_string(),
                }
            }
            Err(e) => self.render_error(&e),
        }
    }

    /// Handle `<name> = <expr>` (the text after `let `)
    fn assign(&mut self, assignment: &str) -> String {
        let Some((target, rhs)) = assignment.split_once('=') else {
            return self.render_error(&ReckonError::invalid_assignment(assignment.trim()));
        };
        let name = target.trim();
        if !is_identifier(name) {
            return self.render_error(&ReckonError::invalid_assignment(name));
        }
        if RESERVED.contains(&name) {
            let err = ReckonError::invalid_assignment(name)
                .with_suggestion(format!("'{}' is a REPL command; pick another name", name));
            return self.render_error(&err);
        }

        let rhs = rhs.trim();
        let result = parse(rhs).and_then(|expr| {
            let value = expr
                .interpret(&self.ctx)
                .map_err(|e| e.with_expression(rhs))?;
            Ok((expr, value))
        });

        match result {
            Ok((expr, value)) => {
                self.ctx.set_variable(name, value);
                tracing::debug!(name, value, "assigned");
                match self.output {
                    OutputFormat::Text => format!("{} = {}", name, value),
                    OutputFormat::Json => json!(EvalReport {
                        name: Some(name),
                        expr: expr.to_string(),
                        value,
                        dependencies: expr.dependencies().into_iter().collect(),
                    })
                    .to_string(),
                }
            }
            Err(e) => self.render_error(&e),
        }
    }

    fn list_vars(&self) -> String {
        let vars = self.ctx.local_variables();
        match self.output {
            OutputFormat::Text if vars.is_empty() => "(no variables)".to_string(),
            OutputFormat::Text => vars
                .iter()
                .map(|(name, value)| format!("{} = {}", name, value))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = vars
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), json!(value)))
                    .collect();
                json!({ "variables": map }).to_string()
            }
        }
    }

    fn help(&self, topic: Option<&str>) -> String {
        match topic {
            None => match self.output {
                OutputFormat::Text => Builtin::ALL
                    .iter()
                    .map(|f| {
                        let meta = f.meta();
                        format!("{:<8} {}", meta.usage, meta.description)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
                OutputFormat::Json => {
                    let metas: Vec<_> = Builtin::ALL.iter().map(|f| f.meta()).collect();
                    json!({ "functions": metas }).to_string()
                }
            },
            Some(name) => match Builtin::from_name(name) {
                Ok(f) => {
                    let meta = f.meta();
                    match self.output {
                        OutputFormat::Text => format!(
                            "{}\n  {}\n  examples: {}\n  related: {}",
                            meta.usage,
                            meta.description,
                            meta.examples.join(", "),
                            meta.related.join(", ")
                        ),
                        OutputFormat::Json => json!(meta).to_string(),
                    }
                }
                Err(e) => self.render_error(&e),
            },
        }
    }

    fn render_error(&self, err: &ReckonError) -> String {
        tracing::debug!(code = %err.code, "reporting error");
        match self.output {
            OutputFormat::Text => format!("Error: {}", err),
            OutputFormat::Json => json!({ "error": err }).to_string(),
        }
    }
}

/// A single identifier token that spans the whole text
fn is_identifier(text: &str) -> bool {
    matches!(tokenize(text).as_slice(), [Token::Identifier(ident)] if ident == text)
}
