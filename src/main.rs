use clap::{Parser as ClapParser, ValueEnum};
use gogo_parse::ast::types::{ArrayContents, Executable, ProgramNode, StatementNode, WordNode};
use gogo_parse::parser::{ParseError, Parser, ParserOptions};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fmt::Write as _;
use std::io::Read;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
    Tree,
}

#[derive(ClapParser)]
#[command(name = "gogo-parse")]
#[command(about = "Parse gogo shell command lines and print the syntax tree")]
#[command(version)]
struct Cli {
    /// Parse the script from command line argument
    #[arg(short = 'c')]
    script: Option<String>,

    /// Output format for the syntax tree
    #[arg(long = "format", value_enum, default_value = "tree")]
    format: Format,

    /// Print the token stream instead of the tree
    #[arg(long = "tokens")]
    tokens: bool,

    /// Print every statement, ordered by position, instead of the tree
    #[arg(long = "statements")]
    statements: bool,

    /// TOML file with parser options
    #[arg(long = "config")]
    config: Option<String>,

    /// Override the maximum nesting depth
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    /// Log tokens and statements to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Script file to parse
    #[arg()]
    script_file: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        // Only fails when a logger is already installed
        let _ = TermLogger::init(
            LevelFilter::Trace,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    }

    let mut options = match &cli.config {
        Some(path) => load_options(path),
        None => ParserOptions::default(),
    };
    if let Some(depth) = cli.max_depth {
        options.max_depth = depth;
    }

    // Determine script source: -c, file, or stdin
    let script = if let Some(s) = cli.script.clone() {
        s
    } else if let Some(ref file) = cli.script_file {
        match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: Cannot read script file: {}: {}", file, e);
                std::process::exit(1);
            }
        }
    } else {
        use std::io::IsTerminal;
        if std::io::stdin().is_terminal() {
            eprintln!("Error: No script provided. Use -c 'script', provide a script file, or pipe via stdin.");
            std::process::exit(1);
        }
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("Error: Cannot read stdin: {}", e);
            std::process::exit(1);
        }
        buf
    };

    let mut parser = Parser::with_options(&script, options);
    let program = match parser.program() {
        Ok(program) => program,
        Err(e) => {
            report(&e);
            std::process::exit(2);
        }
    };

    if cli.tokens {
        for token in parser.tokens() {
            println!("{}:{}\t{:?}", token.line(), token.column(), token.value);
        }
        return;
    }

    if cli.statements {
        for statement in parser.statements() {
            println!(
                "{}:{}\t{:?}",
                statement.token.line(),
                statement.token.column(),
                statement.token.value
            );
        }
        return;
    }

    let output = match cli.format {
        Format::Json => serde_json::to_string_pretty(&program).map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::to_string(&program).map_err(|e| e.to_string()),
        Format::Tree => Ok(render_tree(&program)),
    };
    match output {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            eprintln!("Error: Cannot serialize syntax tree: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_options(path: &str) -> ParserOptions {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: Cannot read config file: {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match toml::from_str(&content) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("gogo-parse: config parse error: {e}");
            std::process::exit(1);
        }
    }
}

fn report(e: &ParseError) {
    eprintln!("{}", e);
    if let ParseError::Eof(eof) = e {
        if !eof.repair.is_empty() {
            eprintln!("hint: input may continue with {:?}", eof.repair);
        }
    }
}

// =============================================================================
// TREE RENDERING
// =============================================================================

fn render_tree(program: &ProgramNode) -> String {
    let mut out = String::new();
    write_program(&mut out, program, 0);
    out
}

fn line(out: &mut String, depth: usize, label: &str, text: Option<&str>) {
    let _ = match text {
        Some(text) => writeln!(out, "{:indent$}{} {:?}", "", label, text, indent = depth * 2),
        None => writeln!(out, "{:indent$}{}", "", label, indent = depth * 2),
    };
}

fn write_program(out: &mut String, program: &ProgramNode, depth: usize) {
    line(out, depth, "program", None);
    for executable in &program.executables {
        write_executable(out, executable, depth + 1);
    }
}

fn write_executable(out: &mut String, executable: &Executable, depth: usize) {
    match executable {
        Executable::Statement(s) => write_statement(out, s, depth),
        Executable::Pipeline(p) => {
            line(out, depth, "pipeline", Some(&p.token.value));
            for e in &p.executables {
                write_executable(out, e, depth + 1);
            }
        }
        Executable::Operator(o) => line(out, depth, "operator", Some(o.as_str())),
    }
}

fn write_statement(out: &mut String, statement: &StatementNode, depth: usize) {
    line(out, depth, "statement", Some(&statement.token.value));
    for word in &statement.words {
        write_word(out, word, depth + 1);
    }
    for redirection in &statement.redirections {
        line(out, depth + 1, "redirection", Some(redirection.as_str()));
    }
}

fn write_word(out: &mut String, word: &WordNode, depth: usize) {
    match word {
        WordNode::Text(t) => line(out, depth, "text", Some(t.as_str())),
        WordNode::Sequence(n) => {
            line(out, depth, "sequence", Some(&n.token.value));
            write_program(out, &n.program, depth + 1);
        }
        WordNode::Closure(n) => {
            line(out, depth, "closure", Some(&n.token.value));
            write_program(out, &n.program, depth + 1);
        }
        WordNode::Array(n) => match &n.contents {
            ArrayContents::List(items) => {
                line(out, depth, "list", Some(&n.token.value));
                for item in items {
                    write_word(out, item, depth + 1);
                }
            }
            ArrayContents::Map(entries) => {
                line(out, depth, "map", Some(&n.token.value));
                for (key, value) in entries {
                    line(out, depth + 1, "entry", None);
                    write_word(out, key, depth + 2);
                    write_word(out, value, depth + 2);
                }
            }
        },
    }
}
