use crate::lexer::{Token, is_keyword};
use logos::Logos;
use nu_ansi_term::{Color, Style};
use reedline::StyledText;
use tally::registry::{Entry, Registry};

/// Colors a line by token, looking identifiers up in the registry so that
/// names the evaluator would reject stand out.
pub struct Highlighter {
    registry: &'static Registry,
}

impl Highlighter {
    pub fn new(registry: &'static Registry) -> Self {
        Self { registry }
    }

    fn style_for(&self, token: Token, text: &str) -> Style {
        let fg = match token {
            Token::Number => Color::Cyan,
            Token::Ident => match self.registry.lookup(text) {
                Some(Entry::Constant(_)) => Color::Cyan,
                Some(Entry::Function(_)) => Color::Blue,
                None if is_keyword(text) => Color::Magenta,
                None => Color::Red,
            },
            Token::StringDouble | Token::StringSingle => Color::Green,
            Token::Comment => Color::DarkGray,
            Token::LParen
            | Token::RParen
            | Token::LBracket
            | Token::RBracket
            | Token::Comma
            | Token::Operator => Color::White,
        };
        Style::new().fg(fg)
    }
}

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _: usize) -> StyledText {
        let mut output = StyledText::new();
        let mut curr_end = 0;

        for (token, span) in Token::lexer(line).spanned() {
            if span.start > curr_end {
                output.push((Style::new(), line[curr_end..span.start].to_string()));
            }
            let text = &line[span.clone()];
            let style = match token {
                Ok(token) => self.style_for(token, text),
                Err(_) => Style::new().fg(Color::Red).underline(),
            };
            output.push((style, text.to_string()));
            curr_end = span.end;
        }

        if curr_end < line.len() {
            output.push((Style::new(), line[curr_end..].to_string()));
        }

        output
    }
}
