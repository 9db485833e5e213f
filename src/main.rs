use saferm::{
    print_size, sanitize_user_path, Trash, TrashError, MAX_CAPACITY_MB, MIN_CAPACITY_MB,
    TRASH_DIRECTORY_NAME,
};
use std::env;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Options {
    set_size_mb: Option<i64>,
    show_contents: bool,
    clear_trash: bool,
    verbose: bool,
    show_used: bool,
    recursive: bool,
    paths: Vec<String>,
}

#[derive(Debug)]
struct CliError(String);

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn print_help(prog: &str) {
    println!(
        "\
usage: {prog} [options] <path>

Move files into the capacity-bounded ~/{dir} directory instead of deleting
them. When the trash grows past its capacity, the oldest items are removed.

options:
  -h, --help     show this help message and exit
  -setsize MB    set the trash capacity in MB ({min}..{max})
  -contents      list the contents of the trash
  -cleartrash    delete everything in the trash
  -used          print the space used and the trash capacity
  -verbose       print details of what saferm is doing
  -r             recursive delete (for directories)
",
        prog = prog,
        dir = TRASH_DIRECTORY_NAME,
        min = MIN_CAPACITY_MB,
        max = MAX_CAPACITY_MB,
    );
}

fn parse_args(args: &[String]) -> Result<Options, CliError> {
    let mut options = Options::default();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                return Err(CliError("help".to_string()));
            }
            "-contents" => options.show_contents = true,
            "-cleartrash" => options.clear_trash = true,
            "-verbose" => options.verbose = true,
            "-used" => options.show_used = true,
            "-r" => options.recursive = true,
            "-setsize" => {
                if i + 1 >= args.len() {
                    return Err(CliError("missing value for -setsize".to_string()));
                }
                i += 1;
                options.set_size_mb = Some(parse_size(&args[i])?);
            }
            _ if arg.starts_with("-setsize=") => {
                options.set_size_mb = Some(parse_size(&arg["-setsize=".len()..])?);
            }
            _ if arg.starts_with('-') => {
                return Err(CliError(format!("unrecognized arguments: {}", arg)));
            }
            _ => options.paths.push(arg.clone()),
        }
        i += 1;
    }

    Ok(options)
}

fn parse_size(value: &str) -> Result<i64, CliError> {
    value
        .parse::<i64>()
        .map_err(|_| CliError(format!("invalid size in MB: {}", value)))
}

/// Moves a directory tree into the trash bottom-up: every regular file goes
/// through the single-file move-in, emptied directories are removed behind
/// it.
fn move_in_recursive(trash: &mut Trash, path: &Path) -> saferm::Result<()> {
    let metadata = fs::metadata(path).map_err(|err| TrashError::io(path, err))?;
    if !metadata.is_dir() {
        trash.move_in(path)?;
        return Ok(());
    }
    let entries = fs::read_dir(path).map_err(|err| TrashError::io(path, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| TrashError::io(path, err))?;
        move_in_recursive(trash, &entry.path())?;
    }
    debug!(path = %sanitize_user_path(path), "removing emptied directory");
    fs::remove_dir(path).map_err(|err| TrashError::io(path, err))
}

fn run() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    let program = env::args().next().unwrap_or_else(|| "saferm".to_string());

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(error) if error.0 == "help" => {
            print_help(&program);
            return 0;
        }
        Err(error) => {
            eprintln!("saferm: {}", error);
            return 2;
        }
    };

    let default_filter = if options.verbose { "saferm=info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut trash = match Trash::open_default() {
        Ok(trash) => trash.with_verbose(options.verbose),
        Err(error) => {
            eprintln!("saferm: {}", error);
            return 1;
        }
    };

    let mut status = 0;

    if options.show_contents {
        match trash.contents() {
            Ok(names) => println!("Trash contents: {}", names.join(", ")),
            Err(error) => {
                eprintln!("saferm: {}", error);
                status = 1;
            }
        }
    }

    if let Some(mb) = options.set_size_mb {
        trash.set_capacity_mb(mb);
    }

    if options.clear_trash {
        if let Err(error) = trash.clear_all() {
            eprintln!("saferm: {}", error);
            status = 1;
        }
    }

    if options.show_used {
        match trash.space_used() {
            Ok(used) => println!(
                "Used space: {} out of {}",
                print_size(used),
                print_size(trash.capacity_bytes())
            ),
            Err(error) => {
                eprintln!("saferm: {}", error);
                status = 1;
            }
        }
    }

    for path in &options.paths {
        let path = Path::new(path);
        let result = if options.recursive {
            move_in_recursive(&mut trash, path)
        } else {
            trash.move_in(path).map(|_| ())
        };
        if let Err(error) = result {
            eprintln!("saferm: {}", error);
            status = 1;
        }
    }

    // The single durable write of the invocation. Losing it only degrades
    // bookkeeping, never the moved files themselves.
    if let Err(error) = trash.save() {
        eprintln!("saferm: {}", error);
        status = 1;
    }

    status
}

fn main() {
    std::process::exit(run());
}
