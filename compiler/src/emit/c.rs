//! C emit target.
//!
//! Commands and flags become `int` fields, arguments and value options
//! `char *` fields. Text is emitted as adjacent string literals, one per
//! source line, so the generated help reads like the grammar it came from.

use docopt_codegen_core::{Argument, Command, LeafKind, OptionSpec, Value, field_identifier};

use super::{EmitTarget, wrap};
use crate::config::{GeneratorConfig, LineEnding};
use crate::error::LiteralRenderError;

/// Indentation of statements inside the generated functions.
const BODY_INDENT: &str = "\n        ";

/// Renders fragments as C99.
///
/// # Examples
///
/// ```
/// use docopt_codegen::emit::{CTarget, EmitTarget};
/// use docopt_codegen::GeneratorConfig;
/// use docopt_codegen_core::Value;
///
/// let target = CTarget::new(&GeneratorConfig::default(), Some("console"));
/// assert_eq!(target.text_literal("a \"b\"\nc"), "\"a \\\"b\\\"\\r\\n\"\n\"c\"");
/// assert_eq!(target.literal(&Value::Bool(true)).unwrap(), "1");
/// assert_eq!(target.literal(&Value::Null).unwrap(), "NULL");
/// ```
#[derive(Debug, Clone)]
pub struct CTarget {
    line_ending: LineEnding,
    wrap_width: usize,
    /// `"<program> "`, removed from text literals when set.
    strip: Option<String>,
}

impl CTarget {
    pub fn new(config: &GeneratorConfig, program: Option<&str>) -> Self {
        let strip = if config.strip_program_name {
            program.map(|program| format!("{program} "))
        } else {
            None
        };
        Self {
            line_ending: config.line_ending,
            wrap_width: config.wrap_width,
            strip,
        }
    }

    fn unsupported(&self, value: &Value) -> LiteralRenderError {
        LiteralRenderError {
            target: self.name(),
            value: value.to_string(),
        }
    }

    /// Like [`literal`](EmitTarget::literal), but casts strings so they can
    /// initialize `char *` members.
    fn initializer(&self, value: &Value) -> Result<String, LiteralRenderError> {
        match value {
            Value::Text(text) => Ok(format!("(char*) {}", self.text_literal(text))),
            other => self.literal(other),
        }
    }

    fn optional_text(&self, text: Option<&str>) -> String {
        text.map_or_else(|| "NULL".to_string(), |text| self.text_literal(text))
    }
}

/// `"\n        a,\n        b"`, or empty without entries.
fn element_block(entries: Vec<String>) -> String {
    if entries.is_empty() {
        return String::new();
    }
    format!("{BODY_INDENT}{}", entries.join(&format!(",{BODY_INDENT}")))
}

impl EmitTarget for CTarget {
    fn name(&self) -> &'static str {
        "C"
    }

    fn literal(&self, value: &Value) -> Result<String, LiteralRenderError> {
        match value {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(flag) => Ok(if *flag { "1" } else { "0" }.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Text(text) => Ok(self.text_literal(text)),
            Value::List(_) => Err(self.unsupported(value)),
        }
    }

    fn text_literal(&self, text: &str) -> String {
        let newline = format!("{}\"\n\"", self.line_ending.escape());
        let mut escaped = text
            .replace('\\', r"\\")
            .replace('"', r#"\""#)
            .replace('\r', r"\r")
            .replace('\n', &newline);
        if let Some(prefix) = &self.strip {
            escaped = escaped.replace(prefix.as_str(), "");
        }
        format!("\"{escaped}\"")
    }

    fn declarations(&self, kind: LeafKind, identifiers: &[String]) -> String {
        if identifiers.is_empty() {
            return String::new();
        }
        let (comment, ty) = match kind {
            LeafKind::Command => ("commands", "int "),
            LeafKind::Argument => ("arguments", "char *"),
            LeafKind::Flag => ("options without arguments", "int "),
            LeafKind::Option => ("options with arguments", "char *"),
        };
        let fields: Vec<String> = identifiers.iter().map(|id| format!("{ty}{id}")).collect();
        format!("\n    /* {comment} */\n    {};", fields.join(";\n    "))
    }

    fn defaults(&self, values: &[&Value]) -> Result<String, LiteralRenderError> {
        if values.is_empty() {
            return Ok(String::new());
        }
        let literals = values
            .iter()
            .map(|value| self.initializer(value))
            .collect::<Result<Vec<_>, _>>()?;
        let lines = wrap(&literals, self.wrap_width);
        Ok(format!("{BODY_INDENT}{},", lines.join(BODY_INDENT)))
    }

    fn command_elements(&self, commands: &[Command]) -> Result<String, LiteralRenderError> {
        let entries = commands
            .iter()
            .map(|command| {
                Ok(format!(
                    "{{{}, {}}}",
                    self.text_literal(&command.name),
                    self.literal(&command.value)?
                ))
            })
            .collect::<Result<Vec<_>, LiteralRenderError>>()?;
        Ok(element_block(entries))
    }

    fn argument_elements(&self, arguments: &[Argument]) -> Result<String, LiteralRenderError> {
        let entries = arguments
            .iter()
            .map(|argument| {
                Ok(format!(
                    "{{{}, {}, NULL}}",
                    self.text_literal(&argument.name),
                    self.literal(&argument.value)?
                ))
            })
            .collect::<Result<Vec<_>, LiteralRenderError>>()?;
        Ok(element_block(entries))
    }

    fn option_elements(&self, options: &[&OptionSpec]) -> Result<String, LiteralRenderError> {
        let entries = options
            .iter()
            .map(|option| {
                format!(
                    "{{{}, {}, {}, 0, NULL}}",
                    self.optional_text(option.short.as_deref()),
                    self.optional_text(option.long.as_deref()),
                    option.argcount
                )
            })
            .collect();
        Ok(element_block(entries))
    }

    fn element_counts(&self, commands: usize, arguments: usize, options: usize) -> String {
        format!("{commands}, {arguments}, {options}")
    }

    fn command_bindings(&self, commands: &[Command]) -> String {
        let blocks: Vec<String> = commands
            .iter()
            .map(|command| {
                format!(
                    "if (!strcmp(command->name, {})) {{\n            args->{} = command->value;\n        }}",
                    self.text_literal(&command.name),
                    field_identifier(&command.name)
                )
            })
            .collect();
        if blocks.is_empty() {
            return String::new();
        }
        format!("{BODY_INDENT}{}", blocks.join(" else "))
    }

    fn argument_bindings(&self, arguments: &[Argument]) -> String {
        let blocks: Vec<String> = arguments
            .iter()
            .map(|argument| {
                format!(
                    "if (!strcmp(argument->name, {})) {{\n            args->{} = argument->value;\n        }}",
                    self.text_literal(&argument.name),
                    field_identifier(&argument.name)
                )
            })
            .collect();
        if blocks.is_empty() {
            return String::new();
        }
        format!("{BODY_INDENT}{}", blocks.join(" else "))
    }

    fn flag_bindings(&self, flags: &[OptionSpec]) -> String {
        flags
            .iter()
            .map(|flag| {
                let member = if flag.long.is_some() { "olong" } else { "oshort" };
                format!(
                    " else if (!strcmp(option->{member}, {})) {{\n            args->{} = option->value;\n        }}",
                    self.text_literal(flag.name()),
                    field_identifier(flag.name())
                )
            })
            .collect()
    }

    fn option_bindings(&self, options: &[OptionSpec]) -> String {
        options
            .iter()
            .map(|option| {
                let member = if option.long.is_some() { "olong" } else { "oshort" };
                format!(
                    " else if (!strcmp(option->{member}, {})) {{\n            if (option->argument)\n                args->{} = option->argument;\n        }}",
                    self.text_literal(option.name()),
                    field_identifier(option.name())
                )
            })
            .collect()
    }

    fn special_fields(&self, placeholders: &[String]) -> String {
        placeholders
            .iter()
            .map(|placeholder| format!("\n    const char *{placeholder};"))
            .collect()
    }

    fn special_messages(&self, messages: &[(String, String)]) -> String {
        messages
            .iter()
            .map(|(placeholder, literal)| format!("const char {placeholder}[] =\n{literal};\n\n"))
            .collect()
    }

    fn special_defaults(&self, placeholders: &[String]) -> String {
        if placeholders.is_empty() {
            return String::new();
        }
        format!(",{BODY_INDENT}{}", placeholders.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> CTarget {
        CTarget::new(&GeneratorConfig::default(), Some("console"))
    }

    #[test]
    fn test_text_literal_escapes_backslash_first() {
        assert_eq!(target().text_literal(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_text_literal_escapes_carriage_return() {
        assert_eq!(target().text_literal("a\rb"), r#""a\rb""#);
        assert!(!target().text_literal("a\r\nb").contains('\r'));
    }

    #[test]
    fn test_text_literal_lf_line_ending() {
        let config = GeneratorConfig {
            line_ending: LineEnding::Lf,
            ..GeneratorConfig::default()
        };
        let target = CTarget::new(&config, None);
        assert_eq!(target.text_literal("a\nb"), "\"a\\n\"\n\"b\"");
    }

    #[test]
    fn test_strip_program_name() {
        let config = GeneratorConfig {
            strip_program_name: true,
            ..GeneratorConfig::default()
        };
        let target = CTarget::new(&config, Some("console"));
        assert_eq!(target.text_literal("    console motor show"), "\"    motor show\"");
    }

    #[test]
    fn test_list_value_is_rejected() {
        let err = target()
            .literal(&Value::List(vec!["a".to_string()]))
            .unwrap_err();
        assert_eq!(err.target, "C");
        assert_eq!(err.value, r#"["a"]"#);
    }

    #[test]
    fn test_declarations() {
        let ids = vec!["motor".to_string(), "pid".to_string()];
        assert_eq!(
            target().declarations(LeafKind::Command, &ids),
            "\n    /* commands */\n    int motor;\n    int pid;"
        );
        assert_eq!(
            target().declarations(LeafKind::Option, &ids[..1]),
            "\n    /* options with arguments */\n    char *motor;"
        );
        assert_eq!(target().declarations(LeafKind::Flag, &[]), "");
    }

    #[test]
    fn test_defaults_wrap_at_width() {
        let zeros: Vec<Value> = vec![Value::Bool(false); 25];
        let mut values: Vec<&Value> = zeros.iter().collect();
        let angle = Value::from("360");
        values.push(&angle);
        let rendered = target().defaults(&values).unwrap();
        let expected_first = format!("{}0,", "0, ".repeat(23));
        assert_eq!(
            rendered,
            format!("\n        {expected_first}\n        0, (char*) \"360\",")
        );
    }

    #[test]
    fn test_defaults_never_split_a_string_literal() {
        let zeros: Vec<Value> = vec![Value::Bool(false); 21];
        let mut values: Vec<&Value> = zeros.iter().collect();
        let greeting = Value::from("hello world");
        values.push(&greeting);

        let rendered = target().defaults(&values).unwrap();
        let expected_first = format!("{}0,", "0, ".repeat(20));
        assert_eq!(
            rendered,
            format!("\n        {expected_first}\n        (char*) \"hello world\",")
        );
        for line in rendered.lines() {
            assert_eq!(line.matches('"').count() % 2, 0, "unbalanced quotes in {line:?}");
        }
    }

    #[test]
    fn test_element_tables() {
        let target = target();
        assert_eq!(
            target.command_elements(&[Command::new("all"), Command::new("show")]).unwrap(),
            "\n        {\"all\", 0},\n        {\"show\", 0}"
        );
        assert_eq!(
            target.argument_elements(&[Argument::new("<file>")]).unwrap(),
            "\n        {\"<file>\", NULL, NULL}"
        );
        let speed = OptionSpec::new(None, Some("--speed"), 0);
        let angle = OptionSpec::new(Some("-g"), Some("--angle"), 1);
        assert_eq!(
            target.option_elements(&[&speed, &angle]).unwrap(),
            "\n        {NULL, \"--speed\", 0, 0, NULL},\n        {\"-g\", \"--angle\", 1, 0, NULL}"
        );
    }

    #[test]
    fn test_command_bindings_chain_with_else() {
        let rendered = target().command_bindings(&[Command::new("all"), Command::new("out-and-back")]);
        assert_eq!(
            rendered,
            "\n        if (!strcmp(command->name, \"all\")) {\n            args->all = command->value;\n        } else if (!strcmp(command->name, \"out-and-back\")) {\n            args->out_and_back = command->value;\n        }"
        );
    }

    #[test]
    fn test_flag_binding_prefers_long_form() {
        let rendered = target().flag_bindings(&[
            OptionSpec::new(Some("-p"), Some("--plain-text"), 0),
            OptionSpec::new(Some("-q"), None, 0),
        ]);
        assert!(rendered.starts_with(" else if (!strcmp(option->olong, \"--plain-text\")) {"));
        assert!(rendered.contains(" else if (!strcmp(option->oshort, \"-q\")) {\n            args->q = option->value;"));
    }

    #[test]
    fn test_option_binding_guards_missing_argument() {
        let rendered = target().option_bindings(&[OptionSpec::new(None, Some("--step"), 1)]);
        assert_eq!(
            rendered,
            " else if (!strcmp(option->olong, \"--step\")) {\n            if (option->argument)\n                args->step = option->argument;\n        }"
        );
    }
}
