//! Command-line parsing.

use std::iter::Peekable;
use std::path::PathBuf;
use std::slice::Iter;

use crate::config::{ConfigError, GeneratorConfig, LogLevel};

pub const USAGE: &str = "\
gdcpp - generate Godot GDExtension wrappers for C++ headers

Usage: gdcpp --headers <glob>... [options]

Options:
  -H, --headers <glob>...     Header files to wrap (glob patterns, repeatable)
  -I <dir>, -I<dir>           Include search path (repeatable)
  --include-rel-base <dir>    Searched first; original headers are included relative to it
  -o, --out-dir <dir>         Output directory (default: out)
  --prefix <prefix>           Prefix of generated files and classes (default: ocgd)
  --map <file>                JSON type mapping overrides
  --clang <path>              clang executable (default: clang)
  --include-originals         Include the input headers in every wrapper unit
  --clang-args <arg>...       Extra clang arguments, up to the next gdcpp option or `--`
  --std <std>                 C++ standard (default: c++17)
  --godot-base <class>        Godot base class of every wrapper (default: Object)
  --log-level <level>         CRITICAL, ERROR, WARNING, INFO or DEBUG (default: INFO)
  -j, --jobs <n>              Parse headers on n threads (default: 1)
  -h, --help                  Print this help
  -V, --version               Print the version

Options taking one value also accept --option=value.
RUST_LOG overrides --log-level.
";

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Box<GeneratorConfig>),
    Help,
    Version,
}

/// Long options, so `--clang-args` knows where its list ends.
const LONG_OPTIONS: &[&str] = &[
    "--headers",
    "--include-rel-base",
    "--out-dir",
    "--prefix",
    "--map",
    "--clang",
    "--include-originals",
    "--clang-args",
    "--std",
    "--godot-base",
    "--log-level",
    "--jobs",
    "--help",
    "--version",
];

fn is_long_option(arg: &str) -> bool {
    let name = arg.split_once('=').map_or(arg, |(name, _)| name);
    LONG_OPTIONS.contains(&name)
}

/// Parse arguments, not including the program name.
pub fn parse_args(args: &[String]) -> Result<Command, ConfigError> {
    let mut config = GeneratorConfig::default();
    let mut args = args.iter().peekable();

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (arg.as_str(), None),
        };

        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-H" | "--headers" => {
                let before = config.headers.len();
                config.headers.extend(inline.map(str::to_owned));
                while let Some(pattern) = args.next_if(|a| !a.starts_with('-')) {
                    config.headers.push(pattern.clone());
                }
                if config.headers.len() == before {
                    return Err(ConfigError::MissingValue(flag.to_owned()));
                }
            }
            "-I" => config.includes.push(value(flag, inline, &mut args)?.into()),
            "--include-rel-base" => {
                config.include_rel_base = Some(value(flag, inline, &mut args)?.into());
            }
            "-o" | "--out-dir" => config.out_dir = value(flag, inline, &mut args)?.into(),
            "--prefix" => config.prefix = value(flag, inline, &mut args)?.to_owned(),
            "--map" => config.mapping_file = Some(value(flag, inline, &mut args)?.into()),
            "--clang" => config.clang_path = value(flag, inline, &mut args)?.into(),
            "--include-originals" => config.include_originals = true,
            "--clang-args" => {
                config.clang_args_extra.extend(inline.map(str::to_owned));
                while let Some(extra) = args.next_if(|a| *a != "--" && !is_long_option(a)) {
                    config.clang_args_extra.push(extra.clone());
                }
                args.next_if(|a| *a == "--");
            }
            "--std" => config.cxx_std = value(flag, inline, &mut args)?.to_owned(),
            "--godot-base" => config.godot_base = value(flag, inline, &mut args)?.to_owned(),
            "--log-level" => {
                let level = value(flag, inline, &mut args)?;
                config.log_level = LogLevel::parse(level)
                    .ok_or_else(|| ConfigError::InvalidLogLevel(level.to_owned()))?;
            }
            "-j" | "--jobs" => {
                let jobs = value(flag, inline, &mut args)?;
                config.jobs = jobs
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::InvalidJobs(jobs.to_owned()))?;
            }
            _ => match arg.strip_prefix("-I") {
                Some(dir) => config.includes.push(PathBuf::from(dir)),
                None => return Err(ConfigError::UnknownOption(arg.clone())),
            },
        }
    }

    Ok(Command::Run(Box::new(config)))
}

/// The value of a single-value option: inline after `=`, else the next
/// argument.
fn value<'a>(
    flag: &str,
    inline: Option<&'a str>,
    args: &mut Peekable<Iter<'a, String>>,
) -> Result<&'a str, ConfigError> {
    if let Some(value) = inline {
        return Ok(value);
    }
    args.next()
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingValue(flag.to_owned()))
}
