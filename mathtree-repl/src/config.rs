use crate::error::InvalidArgument;
use mathtree_compute::Limits;
use mathtree_error::Error;
use std::{fmt::Write, path::PathBuf};

/// A command-line option.
pub struct Opt {
    /// The option, including its leading `--`.
    pub name: &'static str,

    /// The name of the option's value, if it takes one.
    pub value: Option<&'static str>,

    /// What the option does.
    pub about: &'static str,
}

/// Every option the program accepts. Both argument parsing and the usage text are driven by this
/// table.
pub const OPTIONS: &[Opt] = &[
    Opt { name: "--var", value: Some("LETTER"), about: "differentiate with respect to LETTER (default `x`)" },
    Opt { name: "--grammar", value: Some("FILE"), about: "load the parser grammar from FILE" },
    Opt { name: "--steps", value: None, about: "print the rewrite steps taken while canonicalizing" },
    Opt { name: "--max-nodes", value: Some("N"), about: "fail if an intermediate tree has more than N nodes" },
    Opt { name: "--max-depth", value: Some("N"), about: "fail if an expression is nested more than N levels deep" },
    Opt { name: "--help", value: None, about: "print this message and exit" },
];

/// Returns the usage text, listing every option in [`OPTIONS`].
pub fn usage() -> String {
    let mut text = String::from("usage: mathtree [OPTIONS] [FILE]\n\noptions:\n");
    let width = OPTIONS.iter()
        .map(|opt| opt.name.len() + opt.value.map_or(0, |value| value.len() + 1))
        .max()
        .unwrap_or(0);
    for opt in OPTIONS {
        let flag = match opt.value {
            Some(value) => format!("{} {}", opt.name, value),
            None => opt.name.to_string(),
        };
        let _ = writeln!(text, "  {:width$}  {}", flag, opt.about, width = width);
    }
    text
}

/// Settings read from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The variable to differentiate with respect to.
    pub var: String,

    /// A file to load the parser grammar from, instead of the bundled grammar.
    pub grammar: Option<PathBuf>,

    /// Whether to print the rewrite steps taken while canonicalizing.
    pub steps: bool,

    /// The limits to build and canonicalize within.
    pub limits: Limits,

    /// A file of expressions to process, one per line.
    pub file: Option<PathBuf>,

    /// Whether only the usage text was asked for.
    pub help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            var: "x".to_string(),
            grammar: None,
            steps: false,
            limits: Limits::default(),
            file: None,
            help: false,
        }
    }
}

fn invalid(argument: &str, reason: impl Into<String>) -> Error {
    Error::detached(InvalidArgument { argument: argument.to_string(), reason: reason.into() })
}

fn parse_limit(value: &str) -> Result<usize, Error> {
    value.parse().map_err(|_| invalid(value, "expected a positive number"))
}

impl Config {
    /// Reads the configuration from the given arguments, excluding the program name.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, Error> {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if !arg.starts_with("--") {
                if config.file.is_some() {
                    return Err(invalid(&arg, "only one input file may be given"));
                }
                config.file = Some(PathBuf::from(arg));
                continue;
            }

            let opt = OPTIONS.iter()
                .find(|opt| opt.name == arg)
                .ok_or_else(|| invalid(&arg, "unknown option"))?;
            let value = match opt.value {
                Some(_) => args.next().ok_or_else(|| invalid(&arg, "missing value"))?,
                None => String::new(),
            };

            match opt.name {
                "--var" => {
                    if value.len() != 1 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                        return Err(invalid(&value, "variables are single letters"));
                    }
                    config.var = value;
                },
                "--grammar" => config.grammar = Some(PathBuf::from(value)),
                "--steps" => config.steps = true,
                "--max-nodes" => config.limits.max_nodes = parse_limit(&value)?,
                "--max-depth" => config.limits.max_depth = parse_limit(&value)?,
                _ => config.help = true,
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, Error> {
        Config::from_args(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&[]).unwrap(), Config::default());
    }

    #[test]
    fn options() {
        let config = parse(&[
            "--var", "t", "--steps", "--max-nodes", "500", "--max-depth", "12", "input.txt",
        ]).unwrap();
        assert_eq!(config.var, "t");
        assert!(config.steps);
        assert_eq!(config.limits, Limits { max_nodes: 500, max_depth: 12, ..Limits::default() });
        assert_eq!(config.file, Some(PathBuf::from("input.txt")));
        assert!(!config.help);
        assert!(parse(&["--help"]).unwrap().help);
    }

    #[test]
    fn usage_lists_every_option() {
        let text = usage();
        for opt in OPTIONS {
            assert!(text.contains(opt.name), "missing {}", opt.name);
            assert!(text.contains(opt.about), "missing description of {}", opt.name);
        }
        assert!(text.contains("--max-depth N"));
    }

    #[test]
    fn rejects_bad_arguments() {
        let err = parse(&["--max-nodes", "lots"]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidArgument>().map(|kind| kind.argument.as_str()),
            Some("lots"),
        );
        assert!(parse(&["--max-depth", "-1"]).is_err());
        assert!(parse(&["--var"]).is_err());
        assert!(parse(&["--var", "xy"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["a.txt", "b.txt"]).is_err());
    }
}
