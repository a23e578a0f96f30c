use bumpalo::Bump;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use reedline::{
    DefaultCompleter, DescriptionMode, EditCommand, Emacs, FileBackedHistory, IdeMenu, KeyCode,
    KeyModifiers, Keybindings, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, ReedlineEvent, ReedlineMenu, Signal, ValidationResult,
    Validator, default_emacs_keybindings,
};
use std::borrow::Cow;
use std::io::BufRead;
use std::io::BufReader;
use tally::{DEFAULT_MAX_DEPTH, Engine, EngineOptions, EvalError, registry::Registry};
use tracing::debug;

mod highlighter;
mod lexer;

const HISTORY_SIZE: usize = 1000;

/// Tally - a sandboxed calculator
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Evaluate arithmetic expressions", long_about = None)]
struct Args {
    /// Print the parsed tree (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Maximum nesting depth of an expression
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Disable colored error output
    #[arg(long)]
    no_color: bool,

    /// Expression to evaluate (if not provided, reads from stdin)
    #[arg(allow_hyphen_values = true)]
    expression: Option<String>,
}

/// `expr> ` with a `...> ` continuation for unclosed brackets.
struct CalcPrompt;

impl Prompt for CalcPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("expr")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("...> ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

/// Keeps reading lines while brackets are open.
struct BracketValidator;

impl Validator for BracketValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        match lexer::calculate_depth(line) {
            Some(depth) if depth > 0 => ValidationResult::Incomplete,
            _ => ValidationResult::Complete,
        }
    }
}

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline(registry: &'static Registry) -> Reedline {
    let names: Vec<String> = registry.names().into_iter().map(String::from).collect();

    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&['_']);
        completions.insert(names);
        completions
    });

    // Use the interactive menu to select options from the completer
    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_max_completion_height(u16::MAX)
        .with_padding(0)
        .with_cursor_offset(0)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(0)
        .with_max_description_width(50)
        .with_description_offset(1)
        .with_correct_cursor_pos(false);

    let completion_menu = Box::new(ide_menu);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);

    let edit_mode = Box::new(Emacs::new(keybindings));

    let mut line_editor = Reedline::create()
        .with_highlighter(Box::new(highlighter::Highlighter::new(registry)))
        .with_validator(Box::new(BracketValidator))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_edit_mode(edit_mode);

    let history = dirs::data_dir()
        .map(|dir| dir.join("tally").join("history.txt"))
        .and_then(|path| FileBackedHistory::with_file(HISTORY_SIZE, path).ok());
    if let Some(history) = history {
        line_editor = line_editor.with_history(Box::new(history));
    }

    line_editor
}

/// Evaluates inputs and reports the outcome to stdout or stderr.
struct Session {
    engine: Engine<'static>,
    debug_parse: bool,
    use_color: bool,
}

impl Session {
    /// Returns whether `input` evaluated successfully.
    fn interpret_input(&self, input: &str) -> Result<bool> {
        if self.debug_parse {
            let arena = Bump::new();
            match self.engine.parse(&arena, input) {
                Ok(parsed) => {
                    println!("=== Parsed Tree ===");
                    println!("{:#?}", parsed.expr);
                    println!();
                }
                Err(e) => {
                    self.report(input, &e)?;
                    return Ok(false);
                }
            }
        }

        match self.engine.evaluate(input) {
            Ok(value) => {
                println!("{}", value);
                Ok(true)
            }
            Err(e) => {
                self.report(input, &e)?;
                Ok(false)
            }
        }
    }

    fn report(&self, input: &str, error: &EvalError) -> Result<()> {
        let mut stderr = std::io::stderr().lock();
        tally::render_error_to(input, error, &mut stderr, self.use_color).into_diagnostic()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use the RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let session = Session {
        engine: Engine::new(EngineOptions {
            max_depth: args.max_depth,
        }),
        debug_parse: args.debug_parse,
        use_color: !args.no_color && atty::is(atty::Stream::Stderr),
    };

    // Check if we have a direct expression argument
    if let Some(expr) = args.expression {
        debug!("evaluating argument");
        if !session.interpret_input(&expr)? {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Otherwise, check if we're in interactive or pipe mode
    let is_interactive = atty::is(atty::Stream::Stdin);
    debug!(is_interactive, "reading from stdin");

    if is_interactive {
        // Interactive REPL mode
        let mut line_editor = setup_reedline(session.engine.registry());
        let prompt = CalcPrompt;

        println!("Tally - type an expression to evaluate (Ctrl+D or Ctrl+C to exit)");

        loop {
            let sig = match line_editor.read_line(&prompt) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    return Ok(());
                }
            };

            match sig {
                Signal::Success(buffer) => {
                    if buffer.trim().is_empty() {
                        continue;
                    }
                    session.interpret_input(&buffer)?;
                }
                Signal::CtrlD | Signal::CtrlC => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            }
        }
    } else {
        // Pipe/stdin mode
        let stdin = std::io::stdin();
        let reader = BufReader::new(stdin.lock());
        let mut failed = false;

        for line in reader.lines() {
            let line = line.into_diagnostic()?;
            if line.trim().is_empty() {
                continue;
            }
            failed |= !session.interpret_input(&line)?;
        }

        if failed {
            std::process::exit(1);
        }
    }

    Ok(())
}
