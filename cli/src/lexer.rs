use logos::Logos;

/// Coarse tokens for the line editor. The real grammar lives in the core
/// parser; this only needs to be good enough for colors and bracket depth.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[regex(r"#[^\n]*")]
    Comment,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Strict Double Quote String (must end with ")
    #[regex(r#"[bB]?"(?:[^"\\\n]|\\.)*""#)]
    StringDouble,

    // Strict Single Quote String (must end with ')
    #[regex(r#"[bB]?'(?:[^'\\\n]|\\.)*'"#)]
    StringSingle,

    #[regex(r"\*\*|//|<<|>>|<=|>=|==|!=|:=|[-+*/%<>&|^~.:=!]")]
    Operator,
}

pub fn is_keyword(text: &str) -> bool {
    matches!(text, "and" | "or" | "not" | "lambda")
}

/// Number of brackets left open at the end of `buffer`, or `None` if the
/// buffer contains something the lexer cannot read (such as an unclosed
/// string).
pub fn calculate_depth(buffer: &str) -> Option<usize> {
    let mut depth: isize = 0;

    for token_res in Token::lexer(buffer) {
        match token_res {
            Ok(Token::LParen) | Ok(Token::LBracket) => depth += 1,
            Ok(Token::RParen) | Ok(Token::RBracket) => depth -= 1,

            // Valid tokens that don't affect depth
            Ok(_) => {}

            // If we hit an unclosed string (or any unknown char), abort immediately.
            Err(_) => {
                return None;
            }
        }
    }

    if depth < 0 {
        Some(0)
    } else {
        Some(depth as usize)
    }
}
