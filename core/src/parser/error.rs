use crate::parser::{Rule, Span};

/// Parser error with context
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Unclosed delimiter
    UnclosedDelimiter { delimiter: char },
    /// Invalid number literal
    InvalidNumber { text: String },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { depth: usize, max_depth: usize },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    /// Create a new ParseError
    pub fn new(kind: ParseErrorKind, source: String, span: Span) -> Self {
        Self { kind, source, span }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("Expected {}, found {}", expected, found)
            }
            ParseErrorKind::UnclosedDelimiter { delimiter } => {
                format!("Unclosed delimiter '{}'", delimiter)
            }
            ParseErrorKind::InvalidNumber { text } => {
                format!("Invalid number literal '{}'", text)
            }
            ParseErrorKind::MaxDepthExceeded { max_depth, .. } => format!(
                "Expression nesting depth exceeds maximum of {} levels",
                max_depth
            ),
            ParseErrorKind::Other { message } => message.clone(),
        }
    }

    /// Stable code for documentation lookup.
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::UnexpectedToken { .. } => "P001",
            ParseErrorKind::UnclosedDelimiter { .. } => "P002",
            ParseErrorKind::InvalidNumber { .. } => "P003",
            ParseErrorKind::MaxDepthExceeded { .. } => "P004",
            ParseErrorKind::Other { .. } => "P999",
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        match self.kind {
            ParseErrorKind::UnclosedDelimiter { .. } => {
                Some("Add the missing closing delimiter")
            }
            ParseErrorKind::InvalidNumber { .. } => {
                Some("Integers must fit in 64 bits; use a float literal such as 1e20")
            }
            ParseErrorKind::MaxDepthExceeded { .. } => {
                Some("Reduce nesting or simplify the expression")
            }
            ParseErrorKind::UnexpectedToken { .. } | ParseErrorKind::Other { .. } => None,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => {
            if span.0.start >= source.trim_end().len() {
                if let Some(delimiter) = unclosed_delimiter(source) {
                    return ParseError::new(
                        ParseErrorKind::UnclosedDelimiter { delimiter },
                        source.to_string(),
                        span,
                    );
                }
            }

            // Convert technical Pest messages to human-readable ones
            let expected = format_expected_rules(&positives);
            let found = format_found(&negatives, source, span.0.start);

            ParseErrorKind::UnexpectedToken { expected, found }
        }
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, source.to_string(), span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "something else".to_string();
    }

    // Group related rules into higher-level concepts
    let mut concepts = Vec::new();

    for rule in rules {
        let concept = match rule {
            Rule::integer | Rule::float | Rule::string | Rule::bytes => "literal",
            Rule::ident | Rule::lambda_params => "identifier",
            Rule::EOI => "end of input",
            Rule::trailing_comma => "','",
            Rule::call_op | Rule::index_op | Rule::field_op => "operator",
            Rule::named_assign
            | Rule::or
            | Rule::and
            | Rule::eq
            | Rule::ne
            | Rule::le
            | Rule::lt
            | Rule::ge
            | Rule::gt
            | Rule::shl
            | Rule::shr
            | Rule::bit_or
            | Rule::bit_xor
            | Rule::bit_and
            | Rule::add
            | Rule::sub
            | Rule::pow
            | Rule::mul
            | Rule::floor_div
            | Rule::div
            | Rule::rem => "operator",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        None => "something else".to_string(),
    }
}

/// Describe what was found at `pos`, preferring what Pest reported.
fn format_found(rules: &[Rule], source: &str, pos: usize) -> String {
    if let Some(rule) = rules.first() {
        return match rule {
            Rule::ident => "identifier".to_string(),
            Rule::integer => "integer".to_string(),
            Rule::float => "floating-point number".to_string(),
            Rule::string => "string".to_string(),
            Rule::bytes => "byte string".to_string(),
            Rule::EOI => "end of input".to_string(),
            _ => format!("{:?}", rule),
        };
    }

    match source.get(pos..).and_then(|rest| rest.chars().next()) {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}

/// Find the innermost bracket left open at the end of `source`.
fn unclosed_delimiter(source: &str) -> Option<char> {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                stack.pop();
            }
            _ => {}
        }
    }

    stack.pop()
}
